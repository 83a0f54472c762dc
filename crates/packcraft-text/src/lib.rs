//! Text forms of packed records.
//!
//! Packed buffers are raw bytes; these helpers turn them into base58 or base64
//! strings suitable for URLs, QR codes and the like, and back.
//!
//! ```
//! use packcraft::{Codec, Field, FieldKind, Record, Schema, Value};
//! use packcraft_text::TextCodec;
//!
//! let schema = Schema::compile(&[
//!     Field::new("count", FieldKind::integer(50)),
//!     Field::new("wrapped", FieldKind::boolean()),
//! ])
//! .unwrap();
//! let codec = Codec::new(schema);
//!
//! let record = Record::from([
//!     ("count".to_string(), Value::Int(25)),
//!     ("wrapped".to_string(), Value::Bool(true)),
//! ]);
//!
//! let text = codec.encode_base64(&record).unwrap();
//! assert_eq!(codec.decode_base64(&text).unwrap(), record);
//! ```

pub mod base58;
pub mod base64;
pub mod errors;

use packcraft::{Codec, ReadError, Record, Schema, WriteError};

pub use errors::TextError;

/// Anything that packs records into bytes can also produce text.
pub trait TextCodec {
    fn pack(&self, record: &Record) -> Result<Vec<u8>, WriteError>;

    fn unpack(&self, data: &[u8]) -> Result<Record, ReadError>;

    fn encode_base58(&self, record: &Record) -> Result<String, TextError> {
        Ok(crate::base58::encode(&self.pack(record)?))
    }

    fn decode_base58(&self, text: &str) -> Result<Record, TextError> {
        Ok(self.unpack(&crate::base58::decode(text)?)?)
    }

    /// Standard alphabet with the trailing `=` padding stripped.
    fn encode_base64(&self, record: &Record) -> Result<String, TextError> {
        Ok(crate::base64::encode(&self.pack(record)?))
    }

    /// Accepts padded and unpadded input.
    fn decode_base64(&self, text: &str) -> Result<Record, TextError> {
        Ok(self.unpack(&crate::base64::decode(text)?)?)
    }
}

impl TextCodec for Schema {
    fn pack(&self, record: &Record) -> Result<Vec<u8>, WriteError> {
        self.encode(record)
    }

    fn unpack(&self, data: &[u8]) -> Result<Record, ReadError> {
        self.decode(data)
    }
}

impl TextCodec for Codec {
    fn pack(&self, record: &Record) -> Result<Vec<u8>, WriteError> {
        self.encode(record)
    }

    fn unpack(&self, data: &[u8]) -> Result<Record, ReadError> {
        self.decode(data)
    }
}
