//! Base64 (standard alphabet) around packed bytes, without `=` padding on output.

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
};

use crate::errors::TextError;

pub fn encode(data: &[u8]) -> String {
    STANDARD_NO_PAD.encode(data)
}

/// Decodes padded or unpadded input by restoring the missing `=` first.
pub fn decode(text: &str) -> Result<Vec<u8>, TextError> {
    let missing = (4 - text.len() % 4) % 4;

    if missing == 0 {
        return Ok(STANDARD.decode(text)?);
    }

    let mut padded = String::with_capacity(text.len() + missing);
    padded.push_str(text);
    padded.extend(std::iter::repeat_n('=', missing));

    Ok(STANDARD.decode(padded)?)
}
