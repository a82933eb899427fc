//! The tool handlers the assistant is configured with.

pub mod addresses;
pub mod establishment;
pub mod eta;
pub mod menu;
pub mod orders;

use garcon_store::PooledConnection;

use crate::errors::ToolError;
use crate::traits::ToolContext;

pub use addresses::{CreateAddress, GetAddressDataFromText};
pub use establishment::GetEstablishmentContactInfo;
pub use eta::GetEta;
pub use menu::GetAllMenuItems;
pub use orders::{CreateOrder, GetOrderDetails};

/// Check a connection out of the context's pool.
fn checkout(ctx: &ToolContext) -> Result<PooledConnection, ToolError> {
    ctx.deps
        .pool
        .get()
        .map_err(|e| ToolError::internal(e.to_string()))
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared fixtures for handler tests: an in-memory store seeded with one
    //! establishment, plus mockable geocoder and order placement.

    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;

    use garcon_connect::{ConnectError, Geocoder};
    use garcon_core::domain::{Address, Establishment, MenuItem, Order, Patron};
    use garcon_core::ids::{AddressId, EstablishmentId, MenuItemId, ThreadId};
    use garcon_store::{
        AddressRepo, ConnectionPool, EstablishmentRepo, MenuItemRepo, new_in_memory,
        run_migrations,
    };

    use crate::errors::ToolError;
    use crate::traits::{OrderPlacement, PlacedOrder, ToolContext, ToolDeps};

    /// Geocoder stub with scripted answers.
    pub struct FakeGeocoder {
        pub candidates: Vec<Value>,
        pub travel: Option<u64>,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn resolve_addresses(&self, _text: &str) -> Result<Vec<Value>, ConnectError> {
            Ok(self.candidates.clone())
        }

        async fn travel_seconds(
            &self,
            _origin: &Address,
            _destination: &Address,
        ) -> Result<Option<u64>, ConnectError> {
            Ok(self.travel)
        }
    }

    /// Placement stub that echoes the order back with a fixed URL.
    pub struct FakePlacement;

    #[async_trait]
    impl OrderPlacement for FakePlacement {
        async fn place_order(&self, mut order: Order) -> Result<PlacedOrder, ToolError> {
            order.checkout_session_id = Some("cs_test".into());
            Ok(PlacedOrder {
                payment_url: "https://pay.example/cs_test".into(),
                order,
            })
        }
    }

    pub fn seeded_pool() -> ConnectionPool {
        let pool = new_in_memory().unwrap();
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
        AddressRepo::insert(&conn, &establishment_address()).unwrap();
        EstablishmentRepo::insert(&conn, &establishment()).unwrap();
        MenuItemRepo::insert(
            &conn,
            &MenuItem {
                id: MenuItemId::new("item_1"),
                name: "Marmita G".into(),
                price: "25.90".into(),
                description: "Marmita grande".into(),
                is_active: true,
            },
            &EstablishmentId::new("est_1"),
        )
        .unwrap();
        pool
    }

    pub fn establishment_address() -> Address {
        Address {
            id: AddressId::new("adr_est"),
            street: "Rua da Aurora".into(),
            number: "100".into(),
            complement: None,
            neighborhood: "Boa Vista".into(),
            city: "Recife".into(),
            state: "PE".into(),
            country: "Brasil".into(),
            zipcode: "50050-000".into(),
        }
    }

    pub fn establishment() -> Establishment {
        Establishment {
            id: EstablishmentId::new("est_1"),
            name: "Cantina da Vó".into(),
            address: establishment_address(),
            production_minutes: 30,
            contact_number: "+5581988880000".into(),
            instructions: "Entregamos só no Recife.".into(),
            whatsapp_api_key: "wa-token".into(),
            whatsapp_number_id: "1234567890".into(),
        }
    }

    pub fn patron() -> Patron {
        Patron {
            phone_number: "+5581999990000".into(),
            thread_id: ThreadId::new("thread_1"),
            establishment_id: EstablishmentId::new("est_1"),
        }
    }

    pub fn context(pool: ConnectionPool, geocoder: FakeGeocoder) -> ToolContext {
        ToolContext {
            patron: patron(),
            establishment: establishment(),
            deps: Arc::new(ToolDeps {
                pool,
                geocoder: Arc::new(geocoder),
                orders: Arc::new(FakePlacement),
                eta_margin_minutes: 10,
            }),
        }
    }

    pub fn default_context() -> ToolContext {
        context(
            seeded_pool(),
            FakeGeocoder {
                candidates: vec![],
                travel: None,
            },
        )
    }
}
