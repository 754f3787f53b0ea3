//! Application configuration management.

use serde::Deserialize;

/// Core policy configuration.
///
/// These knobs are institutional policy, not invariants: changing them
/// affects which inputs are accepted, never how the ledger moves money.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Requisition validation policy.
    #[serde(default)]
    pub requisition: RequisitionConfig,
}

/// Requisition validation policy.
#[derive(Debug, Clone, Deserialize)]
pub struct RequisitionConfig {
    /// Minimum number of characters required in a justification.
    #[serde(default = "default_min_justification_chars")]
    pub min_justification_chars: usize,
    /// Maximum number of quotation support files per requisition.
    #[serde(default = "default_max_quotation_supports")]
    pub max_quotation_supports: usize,
}

fn default_min_justification_chars() -> usize {
    10
}

fn default_max_quotation_supports() -> usize {
    3
}

impl Default for RequisitionConfig {
    fn default() -> Self {
        Self {
            min_justification_chars: default_min_justification_chars(),
            max_quotation_supports: default_max_quotation_supports(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            requisition: RequisitionConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PROCURA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
