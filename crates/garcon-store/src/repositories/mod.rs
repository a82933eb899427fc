//! Stateless repositories, one per aggregate.

pub mod addresses;
pub mod establishments;
pub mod menu_items;
pub mod orders;
pub mod patrons;
