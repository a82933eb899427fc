//! # garcon-store
//!
//! SQLite persistence for the Garcon backend: connection pool, migrations,
//! and stateless repositories mapping rows to `garcon-core` domain types.
//!
//! Repositories hold no state — every method takes a `&Connection` (or
//! `&mut Connection` when it needs a transaction) so callers control
//! connection checkout and transaction scope.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod repositories;

pub use connection::{ConnectionPool, PooledConnection, new_in_memory, new_pool, run_migrations};
pub use errors::{Result, StoreError};
pub use repositories::addresses::AddressRepo;
pub use repositories::establishments::EstablishmentRepo;
pub use repositories::menu_items::MenuItemRepo;
pub use repositories::orders::OrderRepo;
pub use repositories::patrons::PatronRepo;
