//! # garcon-connect
//!
//! Connectors for everything outward-facing that is not the assistant
//! runtime: the payment gateway (Stripe checkout), the outbound messenger
//! (WhatsApp Cloud API), and the geocoder (Google Maps places and
//! directions).
//!
//! Each connector is a trait plus one reqwest-backed implementation, so the
//! tool handlers and the orchestrator stay mockable.

#![deny(unsafe_code)]

pub mod errors;
pub mod geocoding;
pub mod messaging;
pub mod payment;

pub use errors::ConnectError;
pub use geocoding::{Geocoder, GoogleMaps, GoogleMapsConfig};
pub use messaging::{Messenger, WhatsAppCloud};
pub use payment::{
    CheckoutEvent, CheckoutSession, PaymentGateway, StripeConfig, StripeGateway,
    parse_checkout_event,
};
