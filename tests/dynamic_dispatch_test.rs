use chrono::Utc;
use paypal_usd::domain::conversion::ConversionRecord;
use paypal_usd::domain::ports::{ConversionRegistryRef, CurrencyConverterBox, StoreContextBox};
use paypal_usd::infrastructure::in_memory::{
    FixedRateConverter, InMemoryRegistry, StaticStoreContext,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

#[test]
fn test_ports_as_trait_objects() {
    let converter: CurrencyConverterBox =
        Box::new(FixedRateConverter::new("KWD").with_rate("USD", dec!(3.25)));
    let store: StoreContextBox = Box::new(StaticStoreContext::new("KWD"));
    let registry: ConversionRegistryRef = Arc::new(InMemoryRegistry::new());

    // Send + Sync: every port can cross a thread boundary
    let writer = Arc::clone(&registry);
    let handle = thread::spawn(move || {
        let amount = converter.convert(dec!(2), None, "USD").unwrap();
        let record = ConversionRecord {
            comment: format!("{} -> {amount}", store.base_currency_code().unwrap()),
            original_currency: "KWD".to_string(),
            target_currency: "USD".to_string(),
            timestamp: Utc::now(),
            method: "DoCapture".to_string(),
            token: String::new(),
            request_snapshot: Default::default(),
        };
        writer.set("paypal_conversion_data", record, true).unwrap();
    });
    handle.join().unwrap();

    let record = registry.get("paypal_conversion_data").unwrap();
    assert_eq!(record.comment, "KWD -> 6.50");
}
