use crate::domain::conversion::ConversionRecord;
use crate::domain::ports::{ConversionRegistry, CurrencyConverter, StoreContext};
use crate::error::{BridgeError, Result};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// A thread-safe in-memory registry for conversion records.
///
/// Uses `Arc<RwLock<HashMap<String, ConversionRecord>>>` so the rewriter and
/// the audit path can hold clones of the same mailbox. Lives as long as the
/// process; nothing expires.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistry {
    slots: Arc<RwLock<HashMap<String, ConversionRecord>>>,
}

impl InMemoryRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversionRegistry for InMemoryRegistry {
    fn set(&self, key: &str, record: ConversionRecord, overwrite: bool) -> Result<()> {
        let mut slots = self.slots.write();
        if !overwrite && slots.contains_key(key) {
            return Err(BridgeError::RegistryKeyExists(key.to_string()));
        }
        slots.insert(key.to_string(), record);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<ConversionRecord> {
        self.slots.read().get(key).cloned()
    }
}

/// Converts with fixed multiplicative rates from the store currency.
///
/// `rates` maps a target currency to the factor applied to an amount in
/// `store_currency`.
#[derive(Debug, Clone)]
pub struct FixedRateConverter {
    store_currency: String,
    rates: HashMap<String, Decimal>,
}

impl FixedRateConverter {
    pub fn new(store_currency: impl Into<String>) -> Self {
        Self {
            store_currency: store_currency.into(),
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, to_currency: impl Into<String>, factor: Decimal) -> Self {
        self.rates.insert(to_currency.into(), factor);
        self
    }
}

impl CurrencyConverter for FixedRateConverter {
    fn convert(&self, amount: Decimal, from: Option<&str>, to: &str) -> Result<Decimal> {
        let from = from.unwrap_or(self.store_currency.as_str());
        if from == to {
            return Ok(amount);
        }
        if from != self.store_currency {
            return Err(BridgeError::ConversionNotSupported {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        let factor = self
            .rates
            .get(to)
            .ok_or_else(|| BridgeError::ConversionNotSupported {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        amount
            .checked_mul(*factor)
            .ok_or(BridgeError::DecimalMultiplicationFailed)
    }
}

/// Store context with a fixed base currency.
#[derive(Debug, Clone)]
pub struct StaticStoreContext {
    base_currency: String,
}

impl StaticStoreContext {
    pub fn new(base_currency: impl Into<String>) -> Self {
        Self {
            base_currency: base_currency.into(),
        }
    }
}

impl StoreContext for StaticStoreContext {
    fn base_currency_code(&self) -> Result<String> {
        if self.base_currency.trim().is_empty() {
            return Err(BridgeError::StoreUnavailable(
                "no base currency configured".to_string(),
            ));
        }
        Ok(self.base_currency.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn record(method: &str) -> ConversionRecord {
        ConversionRecord {
            comment: format!("converted by {method}"),
            original_currency: "KWD".to_string(),
            target_currency: "USD".to_string(),
            timestamp: Utc::now(),
            method: method.to_string(),
            token: String::new(),
            request_snapshot: Default::default(),
        }
    }

    #[test]
    fn test_registry_last_write_wins() {
        let registry = InMemoryRegistry::new();
        registry.set("k", record("SetExpressCheckout"), true).unwrap();
        registry.set("k", record("DoExpressCheckoutPayment"), true).unwrap();

        let stored = registry.get("k").unwrap();
        assert_eq!(stored.method, "DoExpressCheckoutPayment");
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_registry_refuses_overwrite_when_not_allowed() {
        let registry = InMemoryRegistry::new();
        registry.set("k", record("DoCapture"), false).unwrap();

        let result = registry.set("k", record("DoVoid"), false);
        assert!(matches!(result, Err(BridgeError::RegistryKeyExists(key)) if key == "k"));
        assert_eq!(registry.get("k").unwrap().method, "DoCapture");
    }

    #[test]
    fn test_registry_clones_share_slots() {
        let writer = InMemoryRegistry::new();
        let reader = writer.clone();
        writer.set("k", record("DoCapture"), true).unwrap();
        assert_eq!(reader.get("k").unwrap().method, "DoCapture");
    }

    #[test]
    fn test_fixed_rate_conversion() {
        let converter = FixedRateConverter::new("KWD").with_rate("USD", dec!(3.25));
        assert_eq!(converter.convert(dec!(10.000), None, "USD").unwrap(), dec!(32.50000));
        assert_eq!(converter.convert(dec!(10), Some("USD"), "USD").unwrap(), dec!(10));
    }

    #[test]
    fn test_unknown_pair_is_an_error() {
        let converter = FixedRateConverter::new("KWD").with_rate("USD", dec!(3.25));
        assert!(matches!(
            converter.convert(dec!(1), None, "EUR"),
            Err(BridgeError::ConversionNotSupported { .. })
        ));
        assert!(matches!(
            converter.convert(dec!(1), Some("BHD"), "USD"),
            Err(BridgeError::ConversionNotSupported { .. })
        ));
    }

    #[test]
    fn test_store_without_base_currency_is_unavailable() {
        assert_eq!(StaticStoreContext::new("KWD").base_currency_code().unwrap(), "KWD");
        assert!(matches!(
            StaticStoreContext::new(" ").base_currency_code(),
            Err(BridgeError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let converter = FixedRateConverter::new("KWD").with_rate("USD", Decimal::MAX);
        assert!(matches!(
            converter.convert(Decimal::MAX, None, "USD"),
            Err(BridgeError::DecimalMultiplicationFailed)
        ));
    }
}
