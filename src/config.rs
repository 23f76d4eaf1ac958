use serde::Deserialize;

/// Registry settings.
///
/// ```rust
/// use listener_registry::{EventListenerRegistry, RegistryConfig};
///
/// let config: RegistryConfig = serde_json::from_str(r#"{ "name_prefix": "handler" }"#).unwrap();
/// let registry: EventListenerRegistry<()> = EventListenerRegistry::with_config(config);
/// assert_eq!(registry.config().name_prefix, "handler");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Prefix of generated names; the registry appends `-<n>`.
    pub name_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name_prefix: "listener".to_string(),
        }
    }
}

impl RegistryConfig {
    pub(crate) fn generated_name(&self, n: u64) -> String {
        format!("{}-{}", self.name_prefix, n)
    }
}
