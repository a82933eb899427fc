//! `get_address_data_from_text` and `create_address` tools.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use garcon_core::domain::Address;
use garcon_core::ids::AddressId;
use garcon_store::AddressRepo;

use crate::errors::ToolError;
use crate::handlers::checkout;
use crate::traits::{GarconTool, ToolContext};
use crate::validation::{optional_str, required_str};

/// Resolves free-text into structured address candidates via the geocoder.
pub struct GetAddressDataFromText;

#[async_trait]
impl GarconTool for GetAddressDataFromText {
    fn name(&self) -> &'static str {
        "get_address_data_from_text"
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let text = required_str(&args, "text")?;
        let candidates = ctx.deps.geocoder.resolve_addresses(&text).await?;
        if candidates.is_empty() {
            return Err(ToolError::domain("Não foi possível encontrar o endereço."));
        }
        info!(candidates = candidates.len(), "address text resolved");
        Ok(Value::Array(candidates))
    }
}

/// Stores a confirmed address so later tools can reference it by ID.
pub struct CreateAddress;

#[async_trait]
impl GarconTool for CreateAddress {
    fn name(&self) -> &'static str {
        "create_address"
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let address = Address {
            id: AddressId::generate(),
            street: required_str(&args, "street")?,
            number: required_str(&args, "number")?,
            complement: optional_str(&args, "complement"),
            neighborhood: required_str(&args, "neighborhood")?,
            city: required_str(&args, "city")?,
            state: required_str(&args, "state")?,
            country: required_str(&args, "country")?,
            zipcode: required_str(&args, "zipcode")?,
        };
        let conn = checkout(ctx)?;
        AddressRepo::insert(&conn, &address)?;
        info!(address_id = %address.id, patron = %ctx.patron.phone_number, "address created");
        Ok(json!({ "address_info": address }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::handlers::testutil::{FakeGeocoder, context, default_context, seeded_pool};

    #[tokio::test]
    async fn address_text_resolution_returns_candidates() {
        let ctx = context(
            seeded_pool(),
            FakeGeocoder {
                candidates: vec![json!({"route": "Rua da Aurora", "street_number": "100"})],
                travel: None,
            },
        );
        let out = GetAddressDataFromText
            .execute(json!({"text": "rua da aurora 100"}), &ctx)
            .await
            .unwrap();
        assert_eq!(out[0]["route"], "Rua da Aurora");
    }

    #[tokio::test]
    async fn no_candidates_is_a_domain_error() {
        let ctx = default_context();
        let err = GetAddressDataFromText
            .execute(json!({"text": "xyzzy"}), &ctx)
            .await
            .unwrap_err();
        assert_matches!(err, ToolError::Domain { ref message }
            if message == "Não foi possível encontrar o endereço.");
    }

    #[tokio::test]
    async fn create_address_persists_and_is_orderable() {
        let ctx = default_context();
        let args = json!({
            "street": "Av Boa Viagem",
            "number": "2080",
            "complement": "Ap 301",
            "neighborhood": "Boa Viagem",
            "city": "Recife",
            "state": "PE",
            "country": "Brasil",
            "zipcode": "51111-000"
        });
        let out = CreateAddress.execute(args, &ctx).await.unwrap();
        let id = out["address_info"]["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("adr_"));

        let conn = ctx.deps.pool.get().unwrap();
        let stored = AddressRepo::get_by_id(&conn, &AddressId::new(&id))
            .unwrap()
            .unwrap();
        assert_eq!(stored.street, "Av Boa Viagem");
        assert_eq!(stored.complement.as_deref(), Some("Ap 301"));
    }

    #[tokio::test]
    async fn create_address_requires_all_fields() {
        let ctx = default_context();
        let err = CreateAddress
            .execute(json!({"street": "Av Boa Viagem"}), &ctx)
            .await
            .unwrap_err();
        assert_matches!(err, ToolError::Domain { ref message }
            if message.contains("number"));
    }
}
