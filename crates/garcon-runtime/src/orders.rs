//! Order service: placement with checkout session, and payment webhook
//! processing.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tracing::{info, instrument};

use garcon_connect::{CheckoutEvent, Messenger, PaymentGateway};
use garcon_core::domain::{Order, OrderStatus};
use garcon_store::{ConnectionPool, EstablishmentRepo, OrderRepo};
use garcon_tools::{OrderPlacement, PlacedOrder, ToolError};

use crate::errors::RuntimeError;

const PAID_REPLY: &str = "Seu pedido foi pago com sucesso e está sendo preparado.";
const CANCELED_REPLY: &str =
    "Seu pedido foi cancelado. Entre em contato conosco para mais informações.";

/// Places orders and reacts to their payment outcomes.
pub struct OrderService {
    pool: ConnectionPool,
    payments: Arc<dyn PaymentGateway>,
    messenger: Arc<dyn Messenger>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService").finish_non_exhaustive()
    }
}

impl OrderService {
    /// Build a service.
    pub fn new(
        pool: ConnectionPool,
        payments: Arc<dyn PaymentGateway>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            pool,
            payments,
            messenger,
        }
    }

    /// Apply a checkout outcome: flip the order's status and notify the
    /// patron from the owning establishment's WhatsApp number.
    #[instrument(skip_all, fields(session_id = %event.session_id, success = event.success))]
    pub async fn process_payment_event(&self, event: &CheckoutEvent) -> Result<(), RuntimeError> {
        let (order, establishment) = {
            let conn = self.pool.get()?;
            let order = OrderRepo::get_by_checkout_session(&conn, &event.session_id)?
                .ok_or_else(|| RuntimeError::UnknownCheckoutSession(event.session_id.clone()))?;
            let establishment = EstablishmentRepo::get_by_id(&conn, &order.establishment_id)?
                .ok_or_else(|| {
                    RuntimeError::UnknownEstablishment(order.establishment_id.clone())
                })?;
            (order, establishment)
        };

        let (status, reply) = if event.success {
            (OrderStatus::InPreparation, PAID_REPLY)
        } else {
            (OrderStatus::Canceled, CANCELED_REPLY)
        };
        {
            let conn = self.pool.get()?;
            let _ = OrderRepo::update_status(&conn, &order.id, status)?;
        }
        self.messenger
            .send_text(&establishment, &order.patron_phone, reply)
            .await?;

        counter!("garcon_payment_events_total",
            "outcome" => if event.success { "paid" } else { "canceled" })
        .increment(1);
        info!(order_id = %order.id, ?status, "payment event processed");
        Ok(())
    }
}

#[async_trait]
impl OrderPlacement for OrderService {
    async fn place_order(&self, mut order: Order) -> Result<PlacedOrder, ToolError> {
        let session = self.payments.create_checkout_session(&order).await?;
        order.checkout_session_id = Some(session.id);
        {
            let mut conn = self
                .pool
                .get()
                .map_err(|e| ToolError::internal(e.to_string()))?;
            OrderRepo::insert(&mut conn, &order)?;
        }
        info!(order_id = %order.id, "order placed with open checkout");
        Ok(PlacedOrder {
            payment_url: session.url,
            order,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use garcon_core::ids::OrderId;
    use garcon_core::domain::OrderItem;
    use garcon_store::MenuItemRepo;

    use super::*;
    use crate::testutil::{
        FakeGateway, FakeMessenger, establishment_address, patron, seeded_pool,
    };

    fn service(pool: ConnectionPool, messenger: Arc<FakeMessenger>) -> OrderService {
        OrderService::new(pool, Arc::new(FakeGateway), messenger)
    }

    fn pending_order(pool: &ConnectionPool) -> Order {
        let conn = pool.get().unwrap();
        let menu_item = MenuItemRepo::get_by_id(
            &conn,
            &"item_1".into(),
            &"est_1".into(),
        )
        .unwrap()
        .unwrap();
        Order {
            id: OrderId::generate(),
            address: establishment_address(),
            status: OrderStatus::AwaitingPayment,
            items: vec![OrderItem {
                menu_item,
                amount: 1,
                observation: String::new(),
            }],
            patron_phone: patron().phone_number,
            establishment_id: "est_1".into(),
            checkout_session_id: None,
        }
    }

    #[tokio::test]
    async fn place_order_persists_with_session_id() {
        let pool = seeded_pool();
        let svc = service(pool.clone(), Arc::new(FakeMessenger::default()));
        let order = pending_order(&pool);
        let order_id = order.id.clone();

        let placed = svc.place_order(order).await.unwrap();
        assert_eq!(placed.payment_url, "https://pay.example/cs_test");
        assert_eq!(placed.order.checkout_session_id.as_deref(), Some("cs_test"));

        let conn = pool.get().unwrap();
        let stored = OrderRepo::get_by_id(&conn, &order_id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::AwaitingPayment);
        assert_eq!(stored.checkout_session_id.as_deref(), Some("cs_test"));
    }

    #[tokio::test]
    async fn same_dish_twice_with_different_observations_places() {
        let pool = seeded_pool();
        let svc = service(pool.clone(), Arc::new(FakeMessenger::default()));
        let mut order = pending_order(&pool);
        let mut second = order.items[0].clone();
        second.observation = "sem cebola".into();
        order.items.push(second);
        let order_id = order.id.clone();

        let placed = svc.place_order(order).await.unwrap();
        assert_eq!(placed.order.items.len(), 2);

        let conn = pool.get().unwrap();
        let stored = OrderRepo::get_by_id(&conn, &order_id).unwrap().unwrap();
        assert_eq!(stored.items.len(), 2);
        assert_eq!(stored.items[1].observation, "sem cebola");
    }

    #[tokio::test]
    async fn successful_payment_starts_preparation_and_notifies() {
        let pool = seeded_pool();
        let messenger = Arc::new(FakeMessenger::default());
        let svc = service(pool.clone(), Arc::clone(&messenger));
        let placed = svc.place_order(pending_order(&pool)).await.unwrap();

        svc.process_payment_event(&CheckoutEvent {
            session_id: "cs_test".into(),
            success: true,
        })
        .await
        .unwrap();

        let conn = pool.get().unwrap();
        let stored = OrderRepo::get_by_id(&conn, &placed.order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::InPreparation);
        drop(conn);

        let sent = messenger.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+5581999990000");
        assert_eq!(sent[0].1, PAID_REPLY);
    }

    #[tokio::test]
    async fn failed_payment_cancels_and_notifies() {
        let pool = seeded_pool();
        let messenger = Arc::new(FakeMessenger::default());
        let svc = service(pool.clone(), Arc::clone(&messenger));
        let placed = svc.place_order(pending_order(&pool)).await.unwrap();

        svc.process_payment_event(&CheckoutEvent {
            session_id: "cs_test".into(),
            success: false,
        })
        .await
        .unwrap();

        let conn = pool.get().unwrap();
        let stored = OrderRepo::get_by_id(&conn, &placed.order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Canceled);
        drop(conn);

        assert_eq!(messenger.sent.lock()[0].1, CANCELED_REPLY);
    }

    #[tokio::test]
    async fn unknown_session_is_an_error() {
        let pool = seeded_pool();
        let svc = service(pool, Arc::new(FakeMessenger::default()));
        let err = svc
            .process_payment_event(&CheckoutEvent {
                session_id: "cs_missing".into(),
                success: true,
            })
            .await
            .unwrap_err();
        assert_matches!(err, RuntimeError::UnknownCheckoutSession(ref s) if s == "cs_missing");
    }
}
