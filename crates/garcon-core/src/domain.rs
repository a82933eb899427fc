//! Domain entities for the ordering flow.
//!
//! All of these serialize with serde, and any enum-valued field renders as
//! its scalar wire value (`"AWAITING_PAYMENT"`), never a symbolic name.
//! Tool handlers hand these directly to the assistant as JSON.

use serde::{Deserialize, Serialize};

use crate::ids::{AddressId, EstablishmentId, MenuItemId, OrderId, ThreadId};

/// A delivery (or establishment) address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Street name.
    pub street: String,
    /// Street number.
    pub number: String,
    /// Apartment, suite, etc.
    pub complement: Option<String>,
    /// Neighborhood.
    pub neighborhood: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Country.
    pub country: String,
    /// Postal code.
    pub zipcode: String,
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Single-line form consumed by the routing API.
        write!(
            f,
            "{}, {} - {} - {} - {} - {} - {}",
            self.street,
            self.number,
            self.complement.as_deref().unwrap_or(""),
            self.neighborhood,
            self.city,
            self.state,
            self.country
        )
    }
}

/// An item on an establishment's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique menu item ID.
    pub id: MenuItemId,
    /// Display name.
    pub name: String,
    /// Price in decimal string form (e.g. `"25.90"`), BRL.
    pub price: String,
    /// Short description shown to the patron.
    pub description: String,
    /// Whether the item can currently be ordered.
    pub is_active: bool,
}

impl MenuItem {
    /// Price in cents, for payment line items. `None` if the stored price
    /// string is malformed.
    pub fn price_cents(&self) -> Option<u64> {
        let value: f64 = self.price.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some((value * 100.0).round() as u64)
    }
}

/// One line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The menu item ordered.
    pub menu_item: MenuItem,
    /// Quantity.
    pub amount: u32,
    /// Free-text observation ("sem cebola").
    pub observation: String,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created, checkout session open, not yet paid.
    AwaitingPayment,
    /// Paid and being prepared.
    InPreparation,
    /// Handed to the courier.
    OutForDelivery,
    /// Delivered to the patron.
    Delivered,
    /// Canceled (payment failed or manual cancellation).
    Canceled,
    /// Something went wrong; a human needs to step in.
    ContactSupport,
}

impl OrderStatus {
    /// Wire value of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingPayment => "AWAITING_PAYMENT",
            Self::InPreparation => "IN_PREPARATION",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Canceled => "CANCELED",
            Self::ContactSupport => "CONTACT_SUPPORT",
        }
    }

    /// Parse a stored wire value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AWAITING_PAYMENT" => Some(Self::AwaitingPayment),
            "IN_PREPARATION" => Some(Self::InPreparation),
            "OUT_FOR_DELIVERY" => Some(Self::OutForDelivery),
            "DELIVERED" => Some(Self::Delivered),
            "CANCELED" => Some(Self::Canceled),
            "CONTACT_SUPPORT" => Some(Self::ContactSupport),
            _ => None,
        }
    }
}

/// An order placed by a patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Delivery address.
    pub address: Address,
    /// Current status.
    pub status: OrderStatus,
    /// Line items.
    pub items: Vec<OrderItem>,
    /// Phone number of the ordering patron.
    pub patron_phone: String,
    /// Owning establishment.
    pub establishment_id: EstablishmentId,
    /// Payment checkout session, set once the session is created.
    pub checkout_session_id: Option<String>,
}

/// One restaurant tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Establishment {
    /// Unique establishment ID.
    pub id: EstablishmentId,
    /// Display name.
    pub name: String,
    /// The establishment's own address (ETA origin).
    pub address: Address,
    /// Estimated kitchen production time in minutes.
    pub production_minutes: u32,
    /// Phone number patrons can call.
    pub contact_number: String,
    /// Establishment-specific policy text injected as run instructions.
    pub instructions: String,
    /// WhatsApp Cloud API token for this tenant.
    pub whatsapp_api_key: String,
    /// WhatsApp phone-number ID messages are sent from.
    pub whatsapp_number_id: String,
}

/// The durable binding between an end user and their assistant thread.
///
/// Created lazily the first time a phone number messages in; the thread
/// handle is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patron {
    /// The patron's phone number (conversation key).
    pub phone_number: String,
    /// Assistant runtime thread handle.
    pub thread_id: ThreadId,
    /// Establishment this patron talks to.
    pub establishment_id: EstablishmentId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_address() -> Address {
        Address {
            id: AddressId::new("adr_1"),
            street: "Av Boa Viagem".into(),
            number: "2080".into(),
            complement: Some("Sala 1001".into()),
            neighborhood: "Boa Viagem".into(),
            city: "Recife".into(),
            state: "PE".into(),
            country: "Brasil".into(),
            zipcode: "51111-000".into(),
        }
    }

    #[test]
    fn order_status_serializes_as_scalar_value() {
        let json = serde_json::to_string(&OrderStatus::AwaitingPayment).unwrap();
        assert_eq!(json, "\"AWAITING_PAYMENT\"");
    }

    #[test]
    fn order_status_roundtrip_all_variants() {
        for status in [
            OrderStatus::AwaitingPayment,
            OrderStatus::InPreparation,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Canceled,
            OrderStatus::ContactSupport,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("BOGUS"), None);
    }

    #[test]
    fn address_display_is_single_line() {
        let addr = sample_address();
        let s = addr.to_string();
        assert!(s.starts_with("Av Boa Viagem, 2080"));
        assert!(!s.contains('\n'));
    }

    #[test]
    fn price_cents_parses_decimal_string() {
        let mut item = MenuItem {
            id: MenuItemId::new("item_1"),
            name: "Combo".into(),
            price: "25.90".into(),
            description: "Combo da casa".into(),
            is_active: true,
        };
        assert_eq!(item.price_cents(), Some(2590));

        item.price = "10".into();
        assert_eq!(item.price_cents(), Some(1000));

        item.price = "abc".into();
        assert_eq!(item.price_cents(), None);

        item.price = "-1.00".into();
        assert_eq!(item.price_cents(), None);
    }

    #[test]
    fn order_serializes_status_inline() {
        let order = Order {
            id: OrderId::new("ord_1"),
            address: sample_address(),
            status: OrderStatus::InPreparation,
            items: vec![],
            patron_phone: "+5581999990000".into(),
            establishment_id: EstablishmentId::new("est_1"),
            checkout_session_id: None,
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], "IN_PREPARATION");
        assert_eq!(value["id"], "ord_1");
    }
}
