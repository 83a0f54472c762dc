//! Deserializable schema description.
//!
//! These types describe the fields of a record in a data format such as JSON
//! (for example a schema file shipped with your application). Field order in
//! [SchemaDef::fields] is the wire order.
//!
//! ```
//! use packcraft::schema::Schema;
//! use packcraft::serde::{FieldDef, FieldKindDef, SchemaDef};
//!
//! let def = SchemaDef {
//!     fields: vec![FieldDef {
//!         name: "count".to_string(),
//!         kind: FieldKindDef::Integer { max_value: Some(50), num_bits: None },
//!     }],
//! };
//! let schema = Schema::try_from(def).unwrap();
//! assert_eq!(schema.total_bits(), 6);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    errors::CompileError,
    field::{Field, FieldKind},
    schema::Schema,
};

/// Top-level schema definition consisting of an ordered list of fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SchemaDef {
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Key of the field in encoded and decoded records.
    pub name: String,
    pub kind: FieldKindDef,
}

/// Kind of field and its parameters.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    /// Unsigned integer. `num_bits` wins when both are given.
    Integer {
        #[serde(default)]
        max_value: Option<u64>,
        #[serde(default)]
        num_bits: Option<usize>,
    },
    Boolean,
    /// Hex string of `length` digits.
    Hex { length: usize },
    Choice { choices: Vec<String> },
    MultiChoice { choices: Vec<String> },
    Date { min_year: i32, max_year: i32 },
    /// Fixed-capacity list of `element`.
    List {
        element: Box<FieldKindDef>,
        max_length: usize,
    },
}

impl TryFrom<FieldKindDef> for FieldKind {
    type Error = CompileError;

    fn try_from(value: FieldKindDef) -> Result<Self, Self::Error> {
        match value {
            FieldKindDef::Integer {
                num_bits: Some(num_bits),
                ..
            } => FieldKind::integer_bits(num_bits),
            FieldKindDef::Integer {
                max_value: Some(max_value),
                ..
            } => Ok(FieldKind::integer(max_value)),
            FieldKindDef::Integer { .. } => Err(CompileError::MissingIntegerWidth),
            FieldKindDef::Boolean => Ok(FieldKind::Boolean),
            FieldKindDef::Hex { length } => FieldKind::hex(length),
            FieldKindDef::Choice { choices } => FieldKind::choice(choices),
            FieldKindDef::MultiChoice { choices } => FieldKind::multi_choice(choices),
            FieldKindDef::Date { min_year, max_year } => FieldKind::date(min_year, max_year),
            FieldKindDef::List {
                element,
                max_length,
            } => FieldKind::list((*element).try_into()?, max_length),
        }
    }
}

impl TryFrom<FieldDef> for Field {
    type Error = CompileError;

    fn try_from(value: FieldDef) -> Result<Self, Self::Error> {
        Ok(Field::new(value.name, value.kind.try_into()?))
    }
}

impl TryFrom<SchemaDef> for Schema {
    type Error = CompileError;

    fn try_from(value: SchemaDef) -> Result<Self, Self::Error> {
        let fields = value
            .fields
            .into_iter()
            .map(Field::try_from)
            .collect::<Result<Vec<Field>, CompileError>>()?;

        Schema::compile(&fields)
    }
}
