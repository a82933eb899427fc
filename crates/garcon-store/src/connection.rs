//! Connection pool and schema migrations.

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::errors::Result;

/// Shared r2d2 pool over SQLite connections.
pub type ConnectionPool = r2d2::Pool<SqliteConnectionManager>;

/// A checked-out pooled connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Open a pool against a database file, enabling WAL and foreign keys on
/// every checkout.
pub fn new_pool(path: &str) -> Result<ConnectionPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
    });
    Ok(r2d2::Pool::builder().build(manager)?)
}

/// Open an in-memory pool for tests.
///
/// Pool size is pinned to 1: each in-memory connection is its own database,
/// so a larger pool would hand out empty databases.
pub fn new_in_memory() -> Result<ConnectionPool> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    Ok(r2d2::Pool::builder().max_size(1).build(manager)?)
}

/// Run schema migrations. Idempotent — every statement is `IF NOT EXISTS`.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS addresses (
            id            TEXT PRIMARY KEY,
            street        TEXT NOT NULL,
            number        TEXT NOT NULL,
            complement    TEXT,
            neighborhood  TEXT NOT NULL,
            city          TEXT NOT NULL,
            state         TEXT NOT NULL,
            country       TEXT NOT NULL,
            zipcode       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS establishments (
            id                  TEXT PRIMARY KEY,
            name                TEXT NOT NULL,
            address_id          TEXT NOT NULL REFERENCES addresses(id),
            production_minutes  INTEGER NOT NULL,
            contact_number      TEXT NOT NULL,
            instructions        TEXT NOT NULL,
            whatsapp_api_key    TEXT NOT NULL,
            whatsapp_number_id  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_establishments_wa_number
            ON establishments(whatsapp_number_id);

        CREATE TABLE IF NOT EXISTS menu_items (
            id                TEXT PRIMARY KEY,
            establishment_id  TEXT NOT NULL REFERENCES establishments(id),
            name              TEXT NOT NULL,
            price             TEXT NOT NULL,
            description       TEXT NOT NULL,
            is_active         INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_menu_items_establishment
            ON menu_items(establishment_id);

        CREATE TABLE IF NOT EXISTS patrons (
            phone_number      TEXT NOT NULL,
            establishment_id  TEXT NOT NULL REFERENCES establishments(id),
            thread_id         TEXT NOT NULL,
            created_at        TEXT NOT NULL,
            PRIMARY KEY (phone_number, establishment_id)
        );

        CREATE INDEX IF NOT EXISTS idx_patrons_thread ON patrons(thread_id);

        CREATE TABLE IF NOT EXISTS orders (
            id                   TEXT PRIMARY KEY,
            status               TEXT NOT NULL,
            checkout_session_id  TEXT,
            patron_phone         TEXT NOT NULL,
            establishment_id     TEXT NOT NULL REFERENCES establishments(id),
            address_id           TEXT NOT NULL REFERENCES addresses(id),
            created_at           TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_orders_session
            ON orders(checkout_session_id);
        CREATE INDEX IF NOT EXISTS idx_orders_establishment
            ON orders(establishment_id);

        -- No unique key: an order may list the same item twice with
        -- different observations, so each line is its own row.
        CREATE TABLE IF NOT EXISTS order_items (
            order_id     TEXT NOT NULL REFERENCES orders(id),
            item_id      TEXT NOT NULL REFERENCES menu_items(id),
            amount       INTEGER NOT NULL,
            observation  TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_order_items_order
            ON order_items(order_id);",
    )?;
    Ok(())
}
