//! Tool registry: central index of the handlers the assistant may call.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::handlers::{
    CreateAddress, CreateOrder, GetAddressDataFromText, GetAllMenuItems, GetEstablishmentContactInfo,
    GetEta, GetOrderDetails,
};
use crate::traits::GarconTool;

/// Maps tool names to their implementations.
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn GarconTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Overwrites any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn GarconTool>) {
        debug!(tool_name = tool.name(), "tool registered");
        let _ = self.tools.insert(tool.name(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn GarconTool>> {
        self.tools.get(name).cloned()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tools.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The full ordering tool set, matching the assistant's configuration.
pub fn standard_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetAllMenuItems));
    registry.register(Arc::new(CreateOrder));
    registry.register(Arc::new(GetOrderDetails));
    registry.register(Arc::new(GetEstablishmentContactInfo));
    registry.register(Arc::new(GetAddressDataFromText));
    registry.register(Arc::new(CreateAddress));
    registry.register(Arc::new(GetEta));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_the_full_tool_set() {
        let registry = standard_registry();
        assert_eq!(
            registry.names(),
            vec![
                "create_address",
                "create_order",
                "get_address_data_from_text",
                "get_all_menu_items",
                "get_establishment_contact_info",
                "get_eta",
                "get_order_details",
            ]
        );
    }

    #[test]
    fn unknown_tool_is_none() {
        assert!(standard_registry().get("launch_missiles").is_none());
    }
}
