use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix, e.g. `PAYPAL_USD_SOURCE_CURRENCY=KWD`.
pub const ENV_PREFIX: &str = "PAYPAL_USD";

/// Runtime settings shared by the rewriter and the audit path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Store base currency that switches the rewriter on.
    pub source_currency: String,
    /// Currency forced on every rewritten request.
    pub target_currency: String,
    /// Payment method code handled by the audit path.
    pub express_method_code: String,
    /// Registry slot the conversion record travels through.
    pub registry_key: String,
    pub module_signature: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_currency: "KWD".to_string(),
            target_currency: "USD".to_string(),
            express_method_code: "paypal_express".to_string(),
            registry_key: "paypal_conversion_data".to_string(),
            module_signature: "Logicrays_PaypalUsd".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional TOML file, then `PAYPAL_USD_*`
    /// environment variables. Missing keys keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Substring that identifies an attached conversion comment.
    pub fn conversion_marker(&self) -> String {
        format!(
            "{}→{} conversion applied via {} module",
            self.source_currency, self.target_currency, self.module_signature
        )
    }
}
