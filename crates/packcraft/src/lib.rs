//! # packcraft
//!
//! A declarative bit-packing codec.
//!
//! Declare a schema of typed fields once; records (field name to [Value]) are
//! packed into the smallest fixed-size byte string the field widths allow and
//! unpacked back losslessly. Fields are not byte-aligned, so several of them
//! routinely share a byte. Bits are laid out MSB-first in declaration order by
//! an explicit bit engine, so the wire form does not depend on the platform.
//!
//! Field kinds: integer, boolean, hex bytes, choice, multi-choice, date and
//! fixed-capacity list.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use packcraft::{Codec, Field, FieldKind, Record, Schema, Value};
//!
//! let schema = Schema::compile(&[
//!     Field::new("count", FieldKind::integer(50)),
//!     Field::new("wrapped", FieldKind::boolean()),
//!     Field::new("color", FieldKind::hex(6).unwrap()),
//!     Field::new("kind", FieldKind::choice(["bitter", "milky", "white"]).unwrap()),
//!     Field::new("made_on", FieldKind::date(2000, 2016).unwrap()),
//! ])
//! .unwrap();
//!
//! let record = Record::from([
//!     ("count".to_string(), Value::Int(25)),
//!     ("wrapped".to_string(), Value::Bool(true)),
//!     ("color".to_string(), Value::hex("ff0000")),
//!     ("kind".to_string(), Value::choice("bitter")),
//!     ("made_on".to_string(), Value::Date(NaiveDate::from_ymd_opt(2015, 9, 16).unwrap())),
//! ]);
//!
//! let codec = Codec::new(schema);
//! let packed = codec.encode(&record).unwrap();
//! assert_eq!(packed.len(), codec.schema().total_bytes());
//! assert_eq!(codec.decode(&packed).unwrap(), record);
//! ```

pub mod bits;
pub mod cache;
pub mod codec;
pub mod compiled;
pub mod errors;
pub mod field;
pub mod fragment;
pub mod pack;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use cache::CachePolicy;
pub use codec::Codec;
pub use errors::{CompileError, ReadError, ValueError, WriteError};
pub use field::{Field, FieldKind};
pub use schema::Schema;
pub use value::{Record, Value};
