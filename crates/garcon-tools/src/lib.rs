//! # garcon-tools
//!
//! Tool handlers the assistant can call during a run, plus the registry the
//! dispatcher looks them up in.
//!
//! Handlers are unit structs implementing [`GarconTool`]; everything they
//! need (database pool, geocoder, order placement) rides in the
//! [`ToolContext`], so the registry itself is stateless and shareable.
//!
//! Error discipline: [`ToolError::Domain`] carries a localized message the
//! assistant relays to the patron ("Pedido não encontrado."); everything
//! else is internal and the dispatcher replaces it with a generic message.

#![deny(unsafe_code)]

pub mod errors;
pub mod handlers;
pub mod registry;
pub mod traits;
pub mod validation;

pub use errors::ToolError;
pub use registry::{ToolRegistry, standard_registry};
pub use traits::{GarconTool, OrderPlacement, PlacedOrder, ToolContext, ToolDeps};
