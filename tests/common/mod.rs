#![allow(dead_code)]

use paypal_usd::application::audit::AuditAttacher;
use paypal_usd::application::rewriter::RequestRewriter;
use paypal_usd::config::Settings;
use paypal_usd::domain::nvp::NvpRequest;
use paypal_usd::domain::order::{Order, Payment, StatusHistoryEntry};
use paypal_usd::infrastructure::in_memory::{
    FixedRateConverter, InMemoryRegistry, StaticStoreContext,
};
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const REGISTRY_KEY: &str = "paypal_conversion_data";
pub const MARKER: &str = "KWD→USD conversion applied via Logicrays_PaypalUsd module";

pub fn rewriter(
    base_currency: &str,
    rate: Decimal,
    registry: &InMemoryRegistry,
) -> RequestRewriter {
    RequestRewriter::new(
        Settings::default(),
        Box::new(FixedRateConverter::new(base_currency).with_rate("USD", rate)),
        Box::new(StaticStoreContext::new(base_currency)),
        Arc::new(registry.clone()),
    )
}

pub fn attacher(registry: &InMemoryRegistry) -> AuditAttacher {
    AuditAttacher::new(Settings::default(), Arc::new(registry.clone()))
}

pub fn request(fields: &[(&str, &str)]) -> NvpRequest {
    fields.iter().copied().collect()
}

/// The checkout call from the KWD store used across the suites.
pub fn kwd_checkout() -> NvpRequest {
    request(&[
        ("TOKEN", "EC-5GT12345AB"),
        ("PAYMENTACTION", "Sale"),
        ("CURRENCYCODE", "KWD"),
        ("AMT", "10.000"),
        ("ITEMAMT", "10.000"),
        ("L_AMT0", "10.000"),
        ("L_QTY0", "1"),
        ("SHIPPINGAMT", "0.000"),
        ("TAXAMT", "0.000"),
    ])
}

/// A PayPal Express order whose newest history entry is `trigger`.
pub fn express_order(trigger: &str) -> (Order, StatusHistoryEntry) {
    let mut order = Order::new("100000042", Some(Payment::new("paypal_express")));
    let history = StatusHistoryEntry::new(trigger);
    order.status_histories.push(history.clone());
    (order, history)
}

pub fn marker_comments(order: &Order) -> usize {
    order
        .status_histories
        .iter()
        .filter_map(|h| h.comment.as_deref())
        .filter(|c| c.contains(MARKER))
        .count()
}

pub fn request_csv(rows: &[(&str, &str)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "field,value").unwrap();
    for (field, value) in rows {
        writeln!(file, "{field},{value}").unwrap();
    }
    file
}
