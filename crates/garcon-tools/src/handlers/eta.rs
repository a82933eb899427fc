//! `get_eta` tool.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use garcon_core::ids::AddressId;
use garcon_store::AddressRepo;

use crate::errors::ToolError;
use crate::handlers::checkout;
use crate::traits::{GarconTool, ToolContext};
use crate::validation::required_str;

/// Estimates delivery time to one of the patron's stored addresses.
///
/// The estimate is travel time from the establishment plus its kitchen
/// production time plus a fixed safety margin.
pub struct GetEta;

#[async_trait]
impl GarconTool for GetEta {
    fn name(&self) -> &'static str {
        "get_eta"
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let address_id = AddressId::new(required_str(&args, "user_address_id")?);
        let destination = {
            let conn = checkout(ctx)?;
            AddressRepo::get_by_id(&conn, &address_id)?
                .ok_or_else(|| ToolError::domain("Endereço do usuário não encontrado."))?
        };

        let travel = ctx
            .deps
            .geocoder
            .travel_seconds(&ctx.establishment.address, &destination)
            .await?
            .ok_or_else(|| {
                ToolError::domain(
                    "Não foi possível calcular o tempo entre os endereços. A rota pode não existir.",
                )
            })?;

        let eta_seconds = travel
            + u64::from(ctx.establishment.production_minutes) * 60
            + u64::from(ctx.deps.eta_margin_minutes) * 60;
        let eta_minutes = eta_seconds / 60;
        info!(
            patron = %ctx.patron.phone_number,
            address_id = %address_id,
            eta_minutes,
            "eta calculated"
        );
        Ok(json!({
            "eta_seconds": eta_seconds,
            "eta_minutes": eta_minutes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::handlers::testutil::{FakeGeocoder, context, seeded_pool};

    #[tokio::test]
    async fn eta_adds_production_time_and_margin() {
        // 13 min travel + 30 min production + 10 min margin = 53 min.
        let ctx = context(
            seeded_pool(),
            FakeGeocoder {
                candidates: vec![],
                travel: Some(780),
            },
        );
        let out = GetEta
            .execute(json!({"user_address_id": "adr_est"}), &ctx)
            .await
            .unwrap();
        assert_eq!(out["eta_seconds"], 3180);
        assert_eq!(out["eta_minutes"], 53);
    }

    #[tokio::test]
    async fn unknown_address_is_a_domain_error() {
        let ctx = context(
            seeded_pool(),
            FakeGeocoder {
                candidates: vec![],
                travel: Some(780),
            },
        );
        let err = GetEta
            .execute(json!({"user_address_id": "adr_404"}), &ctx)
            .await
            .unwrap_err();
        assert_matches!(err, ToolError::Domain { ref message }
            if message == "Endereço do usuário não encontrado.");
    }

    #[tokio::test]
    async fn missing_route_is_a_domain_error() {
        let ctx = context(
            seeded_pool(),
            FakeGeocoder {
                candidates: vec![],
                travel: None,
            },
        );
        let err = GetEta
            .execute(json!({"user_address_id": "adr_est"}), &ctx)
            .await
            .unwrap_err();
        assert_matches!(err, ToolError::Domain { ref message }
            if message.starts_with("Não foi possível calcular o tempo"));
    }
}
