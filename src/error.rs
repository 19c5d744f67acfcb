use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Conversion not supported: {from} -> {to}")]
    ConversionNotSupported { from: String, to: String },
    #[error("Decimal multiplication overflowed")]
    DecimalMultiplicationFailed,
    #[error("Store context unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Registry key already set: {0}")]
    RegistryKeyExists(String),
    #[error("Status history error: {0}")]
    HistoryError(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
