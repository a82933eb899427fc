//! `get_establishment_contact_info` tool.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::errors::ToolError;
use crate::traits::{GarconTool, ToolContext};

/// Returns the establishment's human contact number.
pub struct GetEstablishmentContactInfo;

#[async_trait]
impl GarconTool for GetEstablishmentContactInfo {
    fn name(&self) -> &'static str {
        "get_establishment_contact_info"
    }

    async fn execute(&self, _args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        Ok(json!({
            "establishment_contact_info": {
                "phone_number": ctx.establishment.contact_number,
            }
        }))
    }
}
