use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single NVP field value.
///
/// The host builds requests from loosely typed data, so a field can hold text,
/// a number, a flag, or (rarely) a nested list. Only the first three are
/// scalars; nested values are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NvpValue {
    Flag(bool),
    Text(String),
    Number(Decimal),
    List(Vec<NvpValue>),
}

impl NvpValue {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, NvpValue::List(_))
    }

    /// Numeric reading of the value: the leading decimal prefix of text,
    /// `1`/`0` for flags, zero for anything unreadable.
    pub fn as_decimal(&self) -> Decimal {
        match self {
            NvpValue::Number(n) => *n,
            NvpValue::Flag(true) => Decimal::ONE,
            NvpValue::Flag(false) => Decimal::ZERO,
            NvpValue::Text(s) => leading_decimal(s),
            NvpValue::List(_) => Decimal::ZERO,
        }
    }

    /// Empty in the loose sense: `""`, `"0"`, zero, `false`, or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            NvpValue::Text(s) => s.is_empty() || s == "0",
            NvpValue::Number(n) => n.is_zero(),
            NvpValue::Flag(b) => !b,
            NvpValue::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for NvpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NvpValue::Text(s) => f.write_str(s),
            NvpValue::Number(n) => write!(f, "{}", n.normalize()),
            NvpValue::Flag(true) => f.write_str("1"),
            NvpValue::Flag(false) => Ok(()),
            NvpValue::List(_) => f.write_str("Array"),
        }
    }
}

impl From<&str> for NvpValue {
    fn from(value: &str) -> Self {
        NvpValue::Text(value.to_string())
    }
}

impl From<String> for NvpValue {
    fn from(value: String) -> Self {
        NvpValue::Text(value)
    }
}

impl From<Decimal> for NvpValue {
    fn from(value: Decimal) -> Self {
        NvpValue::Number(value)
    }
}

impl From<bool> for NvpValue {
    fn from(value: bool) -> Self {
        NvpValue::Flag(value)
    }
}

fn leading_decimal(raw: &str) -> Decimal {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    let number = &s[..end];
    if number.len() == digits_start || &number[digits_start..] == "." {
        return Decimal::ZERO;
    }
    Decimal::from_str(number.trim_end_matches('.')).unwrap_or(Decimal::ZERO)
}

/// One outbound NVP call's parameters, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NvpRequest {
    fields: Vec<(String, NvpValue)>,
}

impl NvpRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&NvpValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Overwrites the value in place, or appends the field if it is new.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<NvpValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Scalar field as text, if present.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|v| v.is_scalar())
            .map(ToString::to_string)
    }

    /// Scalar field as a number, if present.
    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        self.get(key)
            .filter(|v| v.is_scalar())
            .map(NvpValue::as_decimal)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NvpValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<NvpValue>> FromIterator<(K, V)> for NvpRequest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = NvpRequest::new();
        for (k, v) in iter {
            request.set(k, v);
        }
        request
    }
}

impl IntoIterator for NvpRequest {
    type Item = (String, NvpValue);
    type IntoIter = std::vec::IntoIter<(String, NvpValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Top-level amount fields that are converted, in wire order.
pub const TOP_LEVEL_AMOUNTS: [&str; 7] = [
    "AMT",
    "ITEMAMT",
    "TAXAMT",
    "SHIPPINGAMT",
    "HANDLINGAMT",
    "INSURANCEAMT",
    "SHIPDISCAMT",
];

/// The amounts worth mentioning in the conversion note.
pub const MAJOR_AMOUNTS: [&str; 4] = ["AMT", "ITEMAMT", "TAXAMT", "SHIPPINGAMT"];

const PAYMENT_REQUEST_PREFIX: &str = "PAYMENTREQUEST_";

/// What a field name means to the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `L_AMT{n}` and other `L_*AMT{n}` line amounts.
    LineAmount,
    /// One of [`TOP_LEVEL_AMOUNTS`].
    TopLevelAmount,
    /// `PAYMENTREQUEST_{n}_{AMOUNT}` for any top-level amount name.
    PaymentRequestAmount,
    MaxAmount,
    /// `CURRENCYCODE` or `PAYMENTREQUEST_{n}_CURRENCYCODE`.
    CurrencyCode,
    Other,
}

impl FieldKind {
    pub fn classify(key: &str) -> Self {
        if key == "MAXAMT" {
            return FieldKind::MaxAmount;
        }
        if key == "CURRENCYCODE" {
            return FieldKind::CurrencyCode;
        }
        if TOP_LEVEL_AMOUNTS.contains(&key) {
            return FieldKind::TopLevelAmount;
        }
        if is_line_amount(key) {
            return FieldKind::LineAmount;
        }
        match payment_request_suffix(key) {
            Some("CURRENCYCODE") => FieldKind::CurrencyCode,
            Some(suffix) if TOP_LEVEL_AMOUNTS.contains(&suffix) => FieldKind::PaymentRequestAmount,
            _ => FieldKind::Other,
        }
    }

    pub fn is_amount(self) -> bool {
        matches!(
            self,
            FieldKind::LineAmount
                | FieldKind::TopLevelAmount
                | FieldKind::PaymentRequestAmount
                | FieldKind::MaxAmount
        )
    }
}

fn is_line_amount(key: &str) -> bool {
    let stem = key.trim_end_matches(|c: char| c.is_ascii_digit());
    stem.len() < key.len()
        && stem.len() >= "L_AMT".len()
        && stem.starts_with("L_")
        && stem.ends_with("AMT")
}

/// `PAYMENTREQUEST_{n}_{SUFFIX}` -> `SUFFIX`.
fn payment_request_suffix(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(PAYMENT_REQUEST_PREFIX)?;
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    rest[digits..].strip_prefix('_')
}

/// Index `n` of an exact `L_AMT{n}` key.
pub fn line_item_index(key: &str) -> Option<u32> {
    let digits = key.strip_prefix("L_AMT")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
