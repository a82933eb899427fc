//! Branded ID newtypes.
//!
//! Every externally visible identifier gets its own newtype so a thread ID
//! can never be passed where an order ID is expected. All IDs serialize as
//! plain strings (`#[serde(transparent)]`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! branded_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

branded_id!(
    /// One end-user conversation, keyed by the patron's phone number.
    ConversationId
);
branded_id!(
    /// The external assistant runtime's handle for a conversation.
    ThreadId
);
branded_id!(
    /// One assistant run (a single turn's unit of work at the runtime).
    RunId
);
branded_id!(
    /// An order.
    OrderId
);
branded_id!(
    /// A menu item.
    MenuItemId
);
branded_id!(
    /// A delivery address.
    AddressId
);
branded_id!(
    /// An establishment (one restaurant tenant).
    EstablishmentId
);

impl OrderId {
    /// Mint a fresh order ID.
    pub fn generate() -> Self {
        Self(format!("ord_{}", Uuid::now_v7()))
    }
}

impl AddressId {
    /// Mint a fresh address ID.
    pub fn generate() -> Self {
        Self(format!("adr_{}", Uuid::now_v7()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ThreadId::new("thread_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"thread_abc\"");
    }

    #[test]
    fn ids_roundtrip() {
        let id: ConversationId = serde_json::from_str("\"+5581999990000\"").unwrap();
        assert_eq!(id.as_str(), "+5581999990000");
    }

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert!(a.as_str().starts_with("ord_"));
        assert_ne!(a, b);

        let adr = AddressId::generate();
        assert!(adr.as_str().starts_with("adr_"));
    }
}
