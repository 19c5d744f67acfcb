/// Currency codes PayPal lists as supported for its checkout methods.
pub const PAYPAL_CURRENCIES: [&str; 21] = [
    "AUD", "CAD", "CZK", "DKK", "EUR", "HKD", "HUF", "ILS", "JPY", "MXN", "NOK", "NZD", "PLN",
    "GBP", "RUB", "SGD", "SEK", "CHF", "TWD", "THB", "USD",
];

/// The set of quote currencies for which PayPal methods stay available.
///
/// The host hides PayPal when the quote currency is not on this list. Stores
/// whose amounts are rewritten to a PayPal currency at the gateway extend it
/// with their own base currency so the buttons keep showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAllowList {
    codes: Vec<String>,
}

impl Default for CurrencyAllowList {
    fn default() -> Self {
        Self {
            codes: PAYPAL_CURRENCIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl CurrencyAllowList {
    /// PayPal's own list plus `extra`, without duplicates.
    pub fn extended_with(mut self, extra: &str) -> Self {
        if !self.is_supported(extra) {
            self.codes.push(extra.to_string());
        }
        self
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}
