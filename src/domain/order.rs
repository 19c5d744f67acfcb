use super::ports::OrderHistory;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A comment on the order's status history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    /// `None` when the host could not render the comment to text.
    pub comment: Option<String>,
    pub status: Option<String>,
    pub is_customer_notified: bool,
    pub is_visible_on_front: bool,
}

impl StatusHistoryEntry {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub txn_id: Option<String>,
}

/// The order's payment as the audit path sees it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Payment {
    /// Payment method code, e.g. `paypal_express`.
    pub method: String,
    pub last_trans_id: Option<String>,
    /// Free-form metadata the gateway integration attaches to the payment.
    pub additional_information: HashMap<String, Value>,
    pub transactions: Vec<PaymentTransaction>,
}

impl Payment {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }

    /// Metadata value rendered as text; numbers are accepted, other shapes are not.
    pub fn info_text(&self, key: &str) -> Option<String> {
        match self.additional_information.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The PayPal transaction id, looked up in order of reliability.
    ///
    /// The last transaction id wins; then the `paypal_transaction_id` or
    /// `txn_id` metadata keys; then the first recorded transaction that has
    /// an id. Empty when none of them yields one.
    pub fn paypal_transaction_id(&self) -> String {
        if let Some(id) = self.last_trans_id.as_ref().filter(|id| !id.is_empty()) {
            return id.clone();
        }

        let paypal_id_set = self
            .additional_information
            .get("paypal_transaction_id")
            .is_some_and(|v| !v.is_null());
        let from_info = if paypal_id_set {
            self.info_text("paypal_transaction_id")
        } else {
            self.info_text("txn_id")
        };
        if let Some(id) = from_info.filter(|id| !id.is_empty()) {
            return id;
        }

        self.transactions
            .iter()
            .filter_map(|t| t.txn_id.as_ref())
            .find(|id| !id.is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

/// In-memory order aggregate: a payment plus its status history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
    pub increment_id: String,
    pub payment: Option<Payment>,
    pub status_histories: Vec<StatusHistoryEntry>,
}

impl Order {
    pub fn new(increment_id: impl Into<String>, payment: Option<Payment>) -> Self {
        Self {
            increment_id: increment_id.into(),
            payment,
            status_histories: Vec::new(),
        }
    }
}

impl OrderHistory for Order {
    fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    fn status_histories(&self) -> &[StatusHistoryEntry] {
        &self.status_histories
    }

    fn add_comment_to_status_history(
        &mut self,
        comment: &str,
        is_customer_notified: bool,
        is_visible_on_front: bool,
    ) -> Result<&mut StatusHistoryEntry> {
        self.status_histories.push(StatusHistoryEntry {
            comment: Some(comment.to_string()),
            status: None,
            is_customer_notified,
            is_visible_on_front,
        });
        let index = self.status_histories.len() - 1;
        Ok(&mut self.status_histories[index])
    }
}
