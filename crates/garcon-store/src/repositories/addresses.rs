//! Address repository — CRUD for the `addresses` table.

use garcon_core::Address;
use garcon_core::ids::AddressId;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::Result;

/// Address repository — stateless, every method takes `&Connection`.
pub struct AddressRepo;

/// Map the nine address columns starting at column `base`.
///
/// Shared by every query that joins `addresses`; callers must select the
/// columns in [`ADDRESS_COLUMNS`] order.
pub(crate) fn address_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Address> {
    Ok(Address {
        id: AddressId::new(row.get::<_, String>(base)?),
        street: row.get(base + 1)?,
        number: row.get(base + 2)?,
        complement: row.get(base + 3)?,
        neighborhood: row.get(base + 4)?,
        city: row.get(base + 5)?,
        state: row.get(base + 6)?,
        country: row.get(base + 7)?,
        zipcode: row.get(base + 8)?,
    })
}

pub(crate) const ADDRESS_COLUMNS: &str =
    "id, street, number, complement, neighborhood, city, state, country, zipcode";

impl AddressRepo {
    /// Get an address by ID.
    pub fn get_by_id(conn: &Connection, id: &AddressId) -> Result<Option<Address>> {
        let row = conn
            .query_row(
                &format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = ?1"),
                params![id.as_str()],
                |row| address_at(row, 0),
            )
            .optional()?;
        Ok(row)
    }

    /// Insert a new address.
    pub fn insert(conn: &Connection, address: &Address) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO addresses
                 (id, street, number, complement, neighborhood, city, state, country, zipcode)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                address.id.as_str(),
                address.street,
                address.number,
                address.complement,
                address.neighborhood,
                address.city,
                address.state,
                address.country,
                address.zipcode,
            ],
        )?;
        Ok(())
    }
}
