use packcraft::{ReadError, WriteError};
use thiserror::Error;

/// Errors from turning records into text and back.
#[derive(Debug, Error)]
pub enum TextError {
    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),
    #[error("invalid base64: {0}")]
    Base64(#[from] ::base64::DecodeError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Read(#[from] ReadError),
}
