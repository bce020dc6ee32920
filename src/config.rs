use serde::{Deserialize, Serialize};

pub static BIN_NAME: &str = std::env!("CARGO_PKG_NAME");

/// CLI configuration, stored by confy in the user's config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the account service. Required.
    pub api_url: String,

    /// Overall deadline for each request, in seconds.
    pub timeout_secs: u64,

    /// ISO currency code used when printing amounts.
    pub currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            timeout_secs: 10,
            currency: "EUR".to_string(),
        }
    }
}

pub fn load() -> Result<AppConfig, confy::ConfyError> {
    confy::load(BIN_NAME, "config")
}
