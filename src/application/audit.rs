use crate::config::Settings;
use crate::domain::order::{Payment, StatusHistoryEntry};
use crate::domain::ports::{ConversionRegistryRef, OrderHistory};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Why the audit path left an order alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyComment,
    NoPayment,
    ForeignMethod,
    NoConversion,
}

/// Result of one pass of [`AuditAttacher::after_add_status_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached { comment: String },
    /// The order already carries a conversion comment.
    Duplicate,
    NotApplicable(SkipReason),
    /// Writing the comment failed; the failure was logged and swallowed.
    Failed { reason: String },
}

/// Copies the conversion note onto the order's status history, once.
///
/// Runs after the host has added a status-history entry to an order. It
/// never fails the order flow: every problem ends up as an [`AttachOutcome`].
pub struct AuditAttacher {
    settings: Settings,
    registry: ConversionRegistryRef,
}

impl AuditAttacher {
    pub fn new(settings: Settings, registry: ConversionRegistryRef) -> Self {
        Self { settings, registry }
    }

    pub fn after_add_status_history<O>(
        &self,
        order: &mut O,
        history: &StatusHistoryEntry,
    ) -> AttachOutcome
    where
        O: OrderHistory + ?Sized,
    {
        if history.comment.as_deref().is_none_or(str::is_empty) {
            return AttachOutcome::NotApplicable(SkipReason::EmptyComment);
        }

        let Some(payment) = order.payment() else {
            return AttachOutcome::NotApplicable(SkipReason::NoPayment);
        };
        if payment.method != self.settings.express_method_code {
            return AttachOutcome::NotApplicable(SkipReason::ForeignMethod);
        }

        let Some(comment) = self.extract_conversion_info(payment) else {
            return AttachOutcome::NotApplicable(SkipReason::NoConversion);
        };

        let marker = self.settings.conversion_marker();
        let already_attached = order
            .status_histories()
            .iter()
            .filter_map(|entry| entry.comment.as_deref())
            .any(|existing| existing.contains(&marker));
        if already_attached {
            debug!("conversion comment already on the order");
            return AttachOutcome::Duplicate;
        }

        match order.add_comment_to_status_history(&comment, false, false) {
            Ok(entry) => {
                entry.is_customer_notified = false;
                info!("conversion comment attached to order history");
                AttachOutcome::Attached { comment }
            }
            Err(e) => {
                warn!(error = %e, "could not add conversion comment");
                AttachOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// The comment to attach, if a conversion happened.
    ///
    /// The registry record wins: its comment, followed by the PayPal
    /// transaction id or, failing that, the checkout token. Without a record,
    /// a conversion note the gateway stored in the payment's
    /// `paypal_transaction_data.NOTETEXT` is used instead.
    pub fn extract_conversion_info(&self, payment: &Payment) -> Option<String> {
        let record = self
            .registry
            .get(&self.settings.registry_key)
            .filter(|record| !record.comment.is_empty());

        let Some(record) = record else {
            return self.note_from_payment(payment);
        };

        let mut comment = record.comment;
        let transaction_id = payment.paypal_transaction_id();
        if !transaction_id.is_empty() {
            comment.push_str(&format!(" PayPal Transaction ID: {transaction_id}"));
        } else if !record.token.is_empty() {
            comment.push_str(&format!(" PayPal Token: {}", record.token));
        }
        Some(comment)
    }

    fn note_from_payment(&self, payment: &Payment) -> Option<String> {
        let note = payment
            .additional_information
            .get("paypal_transaction_data")
            .and_then(Value::as_object)
            .and_then(|data| data.get("NOTETEXT"))
            .and_then(Value::as_str)?;

        let needle = format!(
            "{}→{} conversion",
            self.settings.source_currency, self.settings.target_currency
        );
        note.contains(&needle)
            .then(|| format!("PayPal Transaction: {note}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversion::ConversionRecord;
    use crate::domain::order::Order;
    use crate::domain::ports::ConversionRegistry;
    use crate::infrastructure::in_memory::InMemoryRegistry;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;

    const COMMENT: &str = "KWD→USD conversion applied via Logicrays_PaypalUsd module. \
                           Original amounts in KWD, sent to PayPal in USD.";

    fn publish(registry: &InMemoryRegistry, token: &str) {
        let record = ConversionRecord {
            comment: COMMENT.to_string(),
            original_currency: "KWD".to_string(),
            target_currency: "USD".to_string(),
            timestamp: Utc::now(),
            method: "DoExpressCheckoutPayment".to_string(),
            token: token.to_string(),
            request_snapshot: Default::default(),
        };
        registry.set("paypal_conversion_data", record, true).unwrap();
    }

    fn attacher(registry: &InMemoryRegistry) -> AuditAttacher {
        AuditAttacher::new(Settings::default(), Arc::new(registry.clone()))
    }

    #[test]
    fn test_token_used_when_no_transaction_id() {
        let registry = InMemoryRegistry::new();
        publish(&registry, "EC-8AB");

        let info = attacher(&registry).extract_conversion_info(&Payment::new("paypal_express"));
        assert_eq!(info, Some(format!("{COMMENT} PayPal Token: EC-8AB")));
    }

    #[test]
    fn test_transaction_id_preferred_over_token() {
        let registry = InMemoryRegistry::new();
        publish(&registry, "EC-8AB");
        let mut payment = Payment::new("paypal_express");
        payment.last_trans_id = Some("7UX1".to_string());

        let info = attacher(&registry).extract_conversion_info(&payment);
        assert_eq!(info, Some(format!("{COMMENT} PayPal Transaction ID: 7UX1")));
    }

    #[test]
    fn test_payment_note_used_without_record() {
        let registry = InMemoryRegistry::new();
        let mut payment = Payment::new("paypal_express");
        payment.additional_information.insert(
            "paypal_transaction_data".to_string(),
            json!({ "NOTETEXT": "KWD→USD conversion applied" }),
        );

        let info = attacher(&registry).extract_conversion_info(&payment);
        assert_eq!(info.as_deref(), Some("PayPal Transaction: KWD→USD conversion applied"));
    }

    #[test]
    fn test_unrelated_payment_note_is_ignored() {
        let registry = InMemoryRegistry::new();
        let mut payment = Payment::new("paypal_express");
        payment.additional_information.insert(
            "paypal_transaction_data".to_string(),
            json!({ "NOTETEXT": "Leave at the door" }),
        );

        assert_eq!(attacher(&registry).extract_conversion_info(&payment), None);
    }

    #[test]
    fn test_unreadable_trigger_comment_is_skipped() {
        let registry = InMemoryRegistry::new();
        publish(&registry, "");
        let mut order = Order::new("1", Some(Payment::new("paypal_express")));
        let history = StatusHistoryEntry {
            comment: None,
            ..Default::default()
        };

        assert_eq!(
            attacher(&registry).after_add_status_history(&mut order, &history),
            AttachOutcome::NotApplicable(SkipReason::EmptyComment)
        );
        assert!(order.status_histories.is_empty());
    }
}
