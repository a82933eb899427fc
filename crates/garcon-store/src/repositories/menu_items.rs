//! Menu item repository — per-establishment catalog.

use garcon_core::MenuItem;
use garcon_core::ids::{EstablishmentId, MenuItemId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::Result;

/// Menu item repository — stateless, every method takes `&Connection`.
pub struct MenuItemRepo;

fn from_row(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: MenuItemId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        is_active: row.get(4)?,
    })
}

impl MenuItemRepo {
    /// Get a menu item by ID, scoped to an establishment so one tenant can
    /// never order from another tenant's catalog.
    pub fn get_by_id(
        conn: &Connection,
        id: &MenuItemId,
        establishment_id: &EstablishmentId,
    ) -> Result<Option<MenuItem>> {
        let row = conn
            .query_row(
                "SELECT id, name, price, description, is_active
                 FROM menu_items WHERE id = ?1 AND establishment_id = ?2",
                params![id.as_str(), establishment_id.as_str()],
                from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// All active menu items of an establishment, in insertion order.
    pub fn list_active(
        conn: &Connection,
        establishment_id: &EstablishmentId,
    ) -> Result<Vec<MenuItem>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, price, description, is_active
             FROM menu_items WHERE establishment_id = ?1 AND is_active = 1
             ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![establishment_id.as_str()], from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Insert a new menu item.
    pub fn insert(
        conn: &Connection,
        item: &MenuItem,
        establishment_id: &EstablishmentId,
    ) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO menu_items (id, establishment_id, name, price, description, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id.as_str(),
                establishment_id.as_str(),
                item.name,
                item.price,
                item.description,
                item.is_active,
            ],
        )?;
        Ok(())
    }
}
