use super::conversion::ConversionRecord;
use super::order::{Payment, StatusHistoryEntry};
use crate::error::Result;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Exchange-rate conversion provided by the host.
pub trait CurrencyConverter: Send + Sync {
    /// Converts `amount` from `from` (the store's current currency when
    /// `None`) into `to`.
    fn convert(&self, amount: Decimal, from: Option<&str>, to: &str) -> Result<Decimal>;
}

/// Read access to the current store's settings.
pub trait StoreContext: Send + Sync {
    fn base_currency_code(&self) -> Result<String>;
}

/// Process-scoped mailbox between the request rewriter and the audit path.
///
/// One slot per key, last write wins. The rewriter is the only writer and the
/// audit attacher the only reader; callers must handle one order at a time
/// per registry, since nothing ties a record to the order it belongs to.
pub trait ConversionRegistry: Send + Sync {
    /// Stores `record` under `key`. Fails if the slot is taken and
    /// `overwrite` is false.
    fn set(&self, key: &str, record: ConversionRecord, overwrite: bool) -> Result<()>;
    fn get(&self, key: &str) -> Option<ConversionRecord>;
}

/// The slice of an order the audit path reads and appends to.
pub trait OrderHistory {
    fn payment(&self) -> Option<&Payment>;
    fn status_histories(&self) -> &[StatusHistoryEntry];
    fn add_comment_to_status_history(
        &mut self,
        comment: &str,
        is_customer_notified: bool,
        is_visible_on_front: bool,
    ) -> Result<&mut StatusHistoryEntry>;
}

pub type CurrencyConverterBox = Box<dyn CurrencyConverter>;
pub type StoreContextBox = Box<dyn StoreContext>;
pub type ConversionRegistryRef = Arc<dyn ConversionRegistry>;
