use crate::domain::nvp::NvpRequest;
use crate::error::{BridgeError, Result};
use serde::Deserialize;
use std::io::Read;

/// One `field,value` row.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct NvpField {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Reads an NVP request from a two-column `field,value` CSV source.
///
/// Whitespace around cells is trimmed and short rows are accepted, so a
/// field with no value reads as empty text.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads the rows.
    pub fn fields(self) -> impl Iterator<Item = Result<NvpField>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BridgeError::from))
    }
}

/// Builds a request from rows, keeping the first-seen order of field names.
pub fn collect_request(fields: impl IntoIterator<Item = NvpField>) -> NvpRequest {
    fields.into_iter().map(|f| (f.field, f.value)).collect()
}
