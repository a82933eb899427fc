//! `create_order` and `get_order_details` tools.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use garcon_core::domain::{Order, OrderItem, OrderStatus};
use garcon_core::ids::{AddressId, MenuItemId, OrderId};
use garcon_store::{AddressRepo, MenuItemRepo, OrderRepo};

use crate::errors::ToolError;
use crate::handlers::checkout;
use crate::traits::{GarconTool, ToolContext};
use crate::validation::{optional_str, required_array, required_str, required_u32};

/// Creates an order from resolved menu items and an existing address, and
/// opens a checkout session for it.
pub struct CreateOrder;

#[async_trait]
impl GarconTool for CreateOrder {
    fn name(&self) -> &'static str {
        "create_order"
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let address_id = AddressId::new(required_str(&args, "address_id")?);
        let raw_items = required_array(&args, "items")?;

        let order = {
            let conn = checkout(ctx)?;

            let mut items = Vec::with_capacity(raw_items.len());
            for raw in raw_items {
                let item_id = MenuItemId::new(required_str(raw, "item_id")?);
                let amount = required_u32(raw, "amount")?;
                let observation = optional_str(raw, "observation").unwrap_or_default();

                let menu_item = MenuItemRepo::get_by_id(&conn, &item_id, &ctx.establishment.id)?
                    .ok_or_else(|| {
                        ToolError::domain(format!("Item {item_id} não encontrado."))
                    })?;
                items.push(OrderItem {
                    menu_item,
                    amount,
                    observation,
                });
            }

            let address = AddressRepo::get_by_id(&conn, &address_id)?
                .ok_or_else(|| ToolError::domain("Endereço não encontrado."))?;

            Order {
                id: OrderId::generate(),
                address,
                status: OrderStatus::AwaitingPayment,
                items,
                patron_phone: ctx.patron.phone_number.clone(),
                establishment_id: ctx.establishment.id.clone(),
                checkout_session_id: None,
            }
            // Connection goes back to the pool before placement, which
            // checks out its own.
        };

        let placed = ctx.deps.orders.place_order(order).await?;
        info!(
            order_id = %placed.order.id,
            patron = %ctx.patron.phone_number,
            "order created"
        );
        Ok(json!({
            "payment_url": placed.payment_url,
            "order_info": placed.order,
        }))
    }
}

/// Looks up an order by ID, scoped to the establishment.
pub struct GetOrderDetails;

#[async_trait]
impl GarconTool for GetOrderDetails {
    fn name(&self) -> &'static str {
        "get_order_details"
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let order_id = OrderId::new(required_str(&args, "order_id")?);
        let conn = checkout(ctx)?;
        let order = OrderRepo::get_by_id(&conn, &order_id)?
            // Another tenant's order is indistinguishable from no order.
            .filter(|o| o.establishment_id == ctx.establishment.id)
            .ok_or_else(|| ToolError::domain("Pedido não encontrado."))?;
        Ok(json!({ "order_info": order }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::handlers::testutil::{default_context, establishment_address};

    #[tokio::test]
    async fn create_order_places_and_returns_payment_url() {
        let ctx = default_context();
        let args = json!({
            "address_id": "adr_est",
            "items": [{"item_id": "item_1", "amount": 2, "observation": "sem cebola"}]
        });
        let out = CreateOrder.execute(args, &ctx).await.unwrap();
        assert_eq!(out["payment_url"], "https://pay.example/cs_test");
        assert_eq!(out["order_info"]["status"], "AWAITING_PAYMENT");
        assert_eq!(out["order_info"]["items"][0]["amount"], 2);
        assert_eq!(out["order_info"]["checkout_session_id"], "cs_test");
    }

    #[tokio::test]
    async fn unknown_menu_item_names_the_item_in_the_error() {
        let ctx = default_context();
        let args = json!({
            "address_id": "adr_est",
            "items": [{"item_id": "item_404", "amount": 1}]
        });
        let err = CreateOrder.execute(args, &ctx).await.unwrap_err();
        assert_matches!(err, ToolError::Domain { ref message }
            if message == "Item item_404 não encontrado.");
    }

    #[tokio::test]
    async fn unknown_address_is_a_domain_error() {
        let ctx = default_context();
        let args = json!({
            "address_id": "adr_404",
            "items": [{"item_id": "item_1", "amount": 1}]
        });
        let err = CreateOrder.execute(args, &ctx).await.unwrap_err();
        assert_matches!(err, ToolError::Domain { ref message }
            if message == "Endereço não encontrado.");
    }

    #[tokio::test]
    async fn get_order_details_finds_stored_orders() {
        let ctx = default_context();
        let order = {
            let mut conn = ctx.deps.pool.get().unwrap();
            let order = Order {
                id: OrderId::new("ord_1"),
                address: establishment_address(),
                status: OrderStatus::InPreparation,
                items: vec![],
                patron_phone: ctx.patron.phone_number.clone(),
                establishment_id: ctx.establishment.id.clone(),
                checkout_session_id: Some("cs_1".into()),
            };
            OrderRepo::insert(&mut conn, &order).unwrap();
            order
        };

        let out = GetOrderDetails
            .execute(json!({"order_id": "ord_1"}), &ctx)
            .await
            .unwrap();
        assert_eq!(out["order_info"]["id"], order.id.as_str());
        assert_eq!(out["order_info"]["status"], "IN_PREPARATION");
    }

    #[tokio::test]
    async fn missing_order_is_a_domain_error() {
        let ctx = default_context();
        let err = GetOrderDetails
            .execute(json!({"order_id": "ord_404"}), &ctx)
            .await
            .unwrap_err();
        assert_matches!(err, ToolError::Domain { ref message }
            if message == "Pedido não encontrado.");
    }
}
