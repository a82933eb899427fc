//! Order repository — orders plus their line items.
//!
//! `insert` writes the order and all line items in one transaction so a
//! crash mid-write never leaves a headless order behind.

use garcon_core::ids::{EstablishmentId, MenuItemId, OrderId};
use garcon_core::{MenuItem, Order, OrderItem, OrderStatus};
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError};
use crate::repositories::addresses::address_at;

/// Order repository — stateless; `insert` takes `&mut Connection` for its
/// transaction, reads take `&Connection`.
pub struct OrderRepo;

const SELECT: &str = "SELECT o.id, o.status, o.checkout_session_id, o.patron_phone,
            o.establishment_id,
            a.id, a.street, a.number, a.complement, a.neighborhood,
            a.city, a.state, a.country, a.zipcode
     FROM orders o JOIN addresses a ON a.id = o.address_id";

struct OrderHead {
    id: OrderId,
    status: String,
    checkout_session_id: Option<String>,
    patron_phone: String,
    establishment_id: EstablishmentId,
    address: garcon_core::Address,
}

fn head_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderHead> {
    Ok(OrderHead {
        id: OrderId::new(row.get::<_, String>(0)?),
        status: row.get(1)?,
        checkout_session_id: row.get(2)?,
        patron_phone: row.get(3)?,
        establishment_id: EstablishmentId::new(row.get::<_, String>(4)?),
        address: address_at(row, 5)?,
    })
}

fn load_items(conn: &Connection, order_id: &OrderId) -> Result<Vec<OrderItem>> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.name, m.price, m.description, m.is_active, oi.amount, oi.observation
         FROM order_items oi JOIN menu_items m ON m.id = oi.item_id
         WHERE oi.order_id = ?1 ORDER BY oi.rowid",
    )?;
    let rows = stmt
        .query_map(params![order_id.as_str()], |row| {
            Ok(OrderItem {
                menu_item: MenuItem {
                    id: MenuItemId::new(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    price: row.get(2)?,
                    description: row.get(3)?,
                    is_active: row.get(4)?,
                },
                amount: row.get(5)?,
                observation: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn assemble(conn: &Connection, head: OrderHead) -> Result<Order> {
    let status = OrderStatus::parse(&head.status)
        .ok_or_else(|| StoreError::CorruptRow(format!("unknown order status {}", head.status)))?;
    let items = load_items(conn, &head.id)?;
    Ok(Order {
        id: head.id,
        address: head.address,
        status,
        items,
        patron_phone: head.patron_phone,
        establishment_id: head.establishment_id,
        checkout_session_id: head.checkout_session_id,
    })
}

impl OrderRepo {
    /// Get an order (with line items) by ID.
    pub fn get_by_id(conn: &Connection, id: &OrderId) -> Result<Option<Order>> {
        let head = conn
            .query_row(
                &format!("{SELECT} WHERE o.id = ?1"),
                params![id.as_str()],
                head_from_row,
            )
            .optional()?;
        head.map(|h| assemble(conn, h)).transpose()
    }

    /// Get the order bound to a checkout session.
    pub fn get_by_checkout_session(conn: &Connection, session_id: &str) -> Result<Option<Order>> {
        let head = conn
            .query_row(
                &format!("{SELECT} WHERE o.checkout_session_id = ?1"),
                params![session_id],
                head_from_row,
            )
            .optional()?;
        head.map(|h| assemble(conn, h)).transpose()
    }

    /// All orders of an establishment, newest first.
    pub fn list_by_establishment(
        conn: &Connection,
        establishment_id: &EstablishmentId,
    ) -> Result<Vec<Order>> {
        let heads = {
            let mut stmt = conn.prepare(&format!(
                "{SELECT} WHERE o.establishment_id = ?1 ORDER BY o.created_at DESC"
            ))?;
            let rows = stmt
                .query_map(params![establishment_id.as_str()], head_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };
        heads.into_iter().map(|h| assemble(conn, h)).collect()
    }

    /// Insert an order and its line items atomically. The delivery address
    /// must already exist; line items must reference existing menu items.
    pub fn insert(conn: &mut Connection, order: &Order) -> Result<()> {
        let tx = conn.transaction()?;
        let now = chrono::Utc::now().to_rfc3339();
        let _ = tx.execute(
            "INSERT INTO orders
                 (id, status, checkout_session_id, patron_phone, establishment_id,
                  address_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                order.id.as_str(),
                order.status.as_str(),
                order.checkout_session_id,
                order.patron_phone,
                order.establishment_id.as_str(),
                order.address.id.as_str(),
                now,
            ],
        )?;
        for item in &order.items {
            let _ = tx.execute(
                "INSERT INTO order_items (order_id, item_id, amount, observation)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    order.id.as_str(),
                    item.menu_item.id.as_str(),
                    item.amount,
                    item.observation,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Update an order's status. Returns `true` if a row changed.
    pub fn update_status(conn: &Connection, id: &OrderId, status: OrderStatus) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE orders SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id.as_str()],
        )?;
        Ok(changed > 0)
    }
}
