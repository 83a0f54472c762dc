//! Error types for schema compilation, encoding and decoding.

use thiserror::Error;

/// Errors produced when compiling [crate::field::Field]s into a [crate::schema::Schema].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// No fields were given.
    #[error("schema has no fields")]
    EmptySchema,
    /// Field name is empty.
    #[error("field name must not be empty")]
    InvalidFieldName,
    /// Two fields share a name.
    #[error("duplicate field name `{0}`")]
    DuplicateFieldName(String),
    /// Integer declares neither a maximum value nor a bit count.
    #[error("integer field needs `max_value` or `num_bits`")]
    MissingIntegerWidth,
    /// Integer width is 0 or greater than 64 bits.
    #[error("invalid field size: {0} bits")]
    InvalidFieldSize(usize),
    /// Hex length is zero or odd.
    #[error("hex length must be a positive even number, got {0}")]
    InvalidHexLength(usize),
    /// Choice list is empty.
    #[error("choice list is empty")]
    EmptyChoices,
    /// Choice list contains the same label twice.
    #[error("duplicate choice `{0}`")]
    DuplicateChoice(String),
    /// `min_year` is greater than `max_year`.
    #[error("invalid year range {min_year}..={max_year}")]
    InvalidYearRange { min_year: i32, max_year: i32 },
    /// List capacity is zero.
    #[error("list capacity must be at least 1")]
    InvalidListCapacity,
}

/// Errors raised by a field kind while converting a single value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Value needs more bits than the field declares.
    #[error("value {value} does not fit in {bits} bits")]
    Overflow { value: u64, bits: usize },
    /// Value variant does not match the field kind.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Hex string has the wrong length or non-hex characters.
    #[error("invalid hex string `{value}` (expected {expected_len} hex digits)")]
    InvalidHex { value: String, expected_len: usize },
    /// Label is not one of the declared choices.
    #[error("`{0}` is not one of the declared choices")]
    NotAChoice(String),
    /// Stored choice index points past the choice list.
    #[error("choice index {index} out of range for {len} choices")]
    ChoiceIndexOutOfRange { index: u64, len: usize },
    /// List is longer than its declared capacity.
    #[error("list of length {len} exceeds capacity {max}")]
    CapacityExceeded { len: usize, max: usize },
    /// Year falls outside the declared range.
    #[error("year {year} outside {min_year}..={max_year}")]
    YearOutOfRange {
        year: i32,
        min_year: i32,
        max_year: i32,
    },
    /// Stored year/month/day do not form a calendar date.
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i64, month: u64, day: u64 },
    /// Bit-level read failed while decoding the value.
    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Errors produced when reading bits from a byte slice (e.g. during [crate::schema::Schema::decode]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Requested bit range is beyond the end of the data.
    #[error("bit range out of bounds")]
    OutOfBounds,
    /// More than 64 bits were requested in a single read.
    #[error("cannot read {0} bits at once (max 64)")]
    TooManyBits(usize),
    /// Input length differs from the schema's packed size.
    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A field could not rebuild its value.
    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<ValueError>,
    },
}

/// Errors produced when writing bits or encoding a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// Buffer is too short to write the value.
    #[error("bit range out of bounds")]
    OutOfBounds,
    /// More than 64 bits were written in a single call.
    #[error("cannot write {0} bits at once (max 64)")]
    TooManyBits(usize),
    /// Value does not fit in the requested number of bits.
    #[error("value {value} does not fit in {bits} bits")]
    Overflow { value: u64, bits: usize },
    /// Record has no value for a schema field.
    #[error("missing field `{0}`")]
    MissingField(String),
    /// A field rejected its value.
    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: ValueError,
    },
}

impl ReadError {
    pub(crate) fn field(field: &str, source: ValueError) -> Self {
        ReadError::Field {
            field: field.to_string(),
            source: Box::new(source),
        }
    }
}

impl WriteError {
    pub(crate) fn field(field: &str, source: ValueError) -> Self {
        WriteError::Field {
            field: field.to_string(),
            source,
        }
    }
}
