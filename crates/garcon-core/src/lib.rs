//! # garcon-core
//!
//! Foundation types for the Garcon conversational-commerce backend.
//!
//! This crate provides the shared vocabulary that all other garcon crates
//! depend on:
//!
//! - **Branded IDs**: [`ids::ConversationId`], [`ids::ThreadId`],
//!   [`ids::OrderId`], etc. as newtypes over strings
//! - **Domain types**: [`domain::MenuItem`], [`domain::Order`],
//!   [`domain::Address`], [`domain::Establishment`], [`domain::Patron`]
//!
//! Fallible parsing lives at the boundaries that own it: the store maps
//! corrupt rows, the connectors map malformed wire data. This crate stays
//! error-free.
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other garcon crates.

#![deny(unsafe_code)]

pub mod domain;
pub mod ids;

pub use domain::{Address, Establishment, MenuItem, Order, OrderItem, OrderStatus, Patron};
