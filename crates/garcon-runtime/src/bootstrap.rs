//! Production wiring: build the full orchestrator stack from settings.

use std::sync::Arc;

use garcon_assistant::{OpenAiAssistants, OpenAiConfig};
use garcon_connect::{GoogleMaps, GoogleMapsConfig, StripeConfig, StripeGateway, WhatsAppCloud};
use garcon_settings::GarconSettings;
use garcon_store::{new_pool, run_migrations};
use garcon_tools::{ToolDeps, standard_registry};

use crate::errors::RuntimeError;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::orders::OrderService;

/// Build the orchestrator and its order service from settings.
///
/// Missing credentials surface here, before anything is spawned.
pub fn build(settings: &GarconSettings) -> Result<(Arc<Orchestrator>, Arc<OrderService>), RuntimeError> {
    let pool = new_pool(&settings.database.path)?;
    {
        let conn = pool.get()?;
        run_migrations(&conn)?;
    }

    let runtime = Arc::new(OpenAiAssistants::new(OpenAiConfig {
        base_url: settings.assistant.base_url.clone(),
        api_key: settings.assistant.api_key.clone(),
        assistant_id: settings.assistant.assistant_id.clone(),
        max_transient_retries: settings.assistant.max_transient_retries,
    })?);
    let messenger = Arc::new(WhatsAppCloud::new(settings.messaging.base_url.clone()));
    let payments = Arc::new(StripeGateway::new(StripeConfig {
        base_url: settings.payment.base_url.clone(),
        api_key: settings.payment.api_key.clone(),
        success_url: settings.payment.success_url.clone(),
        cancel_url: settings.payment.cancel_url.clone(),
    })?);
    let geocoder = Arc::new(GoogleMaps::new(GoogleMapsConfig {
        base_url: settings.geocoding.base_url.clone(),
        api_key: settings.geocoding.api_key.clone(),
    })?);

    let orders = Arc::new(OrderService::new(
        pool.clone(),
        payments,
        Arc::clone(&messenger) as Arc<dyn garcon_connect::Messenger>,
    ));
    let deps = Arc::new(ToolDeps {
        pool: pool.clone(),
        geocoder,
        orders: Arc::clone(&orders) as Arc<dyn garcon_tools::OrderPlacement>,
        eta_margin_minutes: settings.orchestrator.eta_margin_minutes,
    });

    let orchestrator = Arc::new(Orchestrator::new(
        &OrchestratorConfig::from(settings),
        runtime,
        messenger,
        Arc::new(standard_registry()),
        deps,
        pool,
    ));
    Ok((orchestrator, orders))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use garcon_assistant::AssistantError;

    use super::*;

    #[test]
    fn missing_assistant_credentials_fail_fast() {
        let mut settings = GarconSettings::default();
        settings.database.path = ":memory:".into();
        let err = build(&settings).unwrap_err();
        assert_matches!(
            err,
            RuntimeError::Assistant(AssistantError::MissingCredential(_))
        );
    }

    #[test]
    fn fully_credentialed_settings_build() {
        let mut settings = GarconSettings::default();
        settings.database.path = ":memory:".into();
        settings.assistant.api_key = Some("sk-test".into());
        settings.assistant.assistant_id = Some("asst_1".into());
        settings.payment.api_key = Some("sk_live".into());
        settings.geocoding.api_key = Some("maps".into());
        let (orchestrator, _orders) = build(&settings).unwrap();
        drop(orchestrator);
    }
}
