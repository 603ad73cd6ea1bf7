use thiserror::Error;

/// Failure taxonomy for pool event extraction.
///
/// Every variant is absorbed at the extraction boundary and turned into a
/// log line plus "no record"; none of these ever crosses `extract()`.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported transaction encoding")]
    UnsupportedEncoding,

    #[error("malformed account key '{key}': {reason}")]
    MalformedAccountKey { key: String, reason: String },

    #[error("instruction account list too short: offset {offset} missing ({available} indexes present)")]
    AccountOffsetOutOfRange { offset: usize, available: usize },

    #[error("account index {index} out of range ({available} account keys)")]
    AccountIndexOutOfRange { index: usize, available: usize },

    #[error("RPC error: {0}")]
    Rpc(String),
}

impl ExtractError {
    /// The known address-decoding defect class: skipped with a distinct
    /// log line instead of being reported as an unexpected error.
    pub fn is_decode_skip(&self) -> bool {
        matches!(self, ExtractError::MalformedAccountKey { .. })
    }
}
