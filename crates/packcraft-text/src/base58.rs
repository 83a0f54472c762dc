//! Base58 (Bitcoin alphabet) around packed bytes.

use crate::errors::TextError;

pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn decode(text: &str) -> Result<Vec<u8>, TextError> {
    Ok(bs58::decode(text).into_vec()?)
}
