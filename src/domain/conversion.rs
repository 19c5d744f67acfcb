use super::nvp::NvpRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The audit payload handed from the request rewriter to the order history.
///
/// Written once per converting call; a later call overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub comment: String,
    pub original_currency: String,
    pub target_currency: String,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    /// Express checkout token, empty when the call carried none.
    pub token: String,
    /// The request exactly as it left the rewriter.
    pub request_snapshot: NvpRequest,
}

/// Accumulates the human-readable conversion note.
#[derive(Debug, Clone)]
pub struct ConversionLog {
    source: String,
    target: String,
    parts: Vec<String>,
}

impl ConversionLog {
    pub fn new(marker: &str, source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            parts: vec![
                format!("{marker}."),
                format!("Original amounts in {source}, sent to PayPal in {target}."),
            ],
        }
    }

    pub fn record(&mut self, field: &str, original: &str, converted: &str) {
        self.parts.push(format!(
            "{field}: {} {original} → {} {converted}.",
            self.source, self.target
        ));
    }

    pub fn into_comment(self) -> String {
        self.parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_renders_header_and_entries() {
        let marker = "KWD→USD conversion applied via Logicrays_PaypalUsd module";
        let mut log = ConversionLog::new(marker, "KWD", "USD");
        log.record("AMT", "10.000", "32.50");

        assert_eq!(
            log.into_comment(),
            "KWD→USD conversion applied via Logicrays_PaypalUsd module. \
             Original amounts in KWD, sent to PayPal in USD. \
             AMT: KWD 10.000 → USD 32.50."
        );
    }

    #[test]
    fn test_record_roundtrips_through_json() {
        let record = ConversionRecord {
            comment: "note".to_string(),
            original_currency: "KWD".to_string(),
            target_currency: "USD".to_string(),
            timestamp: Utc::now(),
            method: "DoCapture".to_string(),
            token: String::new(),
            request_snapshot: [("AMT", "1.00")].into_iter().collect(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: ConversionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
