//! `get_all_menu_items` tool.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use garcon_store::MenuItemRepo;

use crate::errors::ToolError;
use crate::handlers::checkout;
use crate::traits::{GarconTool, ToolContext};

/// Returns the establishment's active menu.
pub struct GetAllMenuItems;

#[async_trait]
impl GarconTool for GetAllMenuItems {
    fn name(&self) -> &'static str {
        "get_all_menu_items"
    }

    async fn execute(&self, _args: Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let conn = checkout(ctx)?;
        let items = MenuItemRepo::list_active(&conn, &ctx.establishment.id)?;
        info!(
            establishment_id = %ctx.establishment.id,
            count = items.len(),
            "menu listed"
        );
        Ok(json!({ "menu_items": items }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testutil::default_context;

    #[tokio::test]
    async fn lists_only_active_items_of_the_tenant() {
        let ctx = default_context();
        let out = GetAllMenuItems.execute(json!({}), &ctx).await.unwrap();
        let items = out["menu_items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "item_1");
        assert_eq!(items[0]["price"], "25.90");
    }
}
