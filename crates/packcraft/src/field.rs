//! Definition of logical fields used to build a [crate::schema::Schema].

use std::{
    collections::HashSet,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{bits::bit_length, errors::CompileError};

/// Bits used for the month part of a date.
pub const MONTH_BITS: usize = 4;
/// Bits used for the day part of a date.
pub const DAY_BITS: usize = 5;

static DECLARATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A single named field in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used as the key in encoded and decoded records.
    pub name: String,
    /// Type of the field and its parameters.
    pub kind: FieldKind,
    /// Declaration sequence number. Fields built with [Field::new] get increasing
    /// numbers, so [crate::schema::Schema::compile_declared] can recover the order
    /// they were written in after passing through unordered storage.
    pub order: u64,
}

impl Field {
    /// Creates a field and stamps its declaration order.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Field {
            name: name.into(),
            kind,
            order: DECLARATION_COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Width of the field in bits.
    pub fn bit_width(&self) -> usize {
        self.kind.bit_width()
    }
}

/// The seven field kinds and their parameters.
///
/// Prefer the validating constructors ([FieldKind::integer], [FieldKind::hex], ...);
/// kinds built literally are validated when the schema is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned integer of `num_bits` bits (1..=64).
    Integer { num_bits: usize },
    Boolean,
    /// Fixed number of hex digits, stored as raw bytes.
    Hex { length: usize },
    /// Exactly one label out of `choices`, stored as its index.
    Choice { choices: Vec<String> },
    /// Any subset of `choices`, one bit per label.
    MultiChoice { choices: Vec<String> },
    /// Calendar date with the year stored relative to `min_year`.
    Date { min_year: i32, max_year: i32 },
    /// Up to `max_length` elements of one kind, preceded by a size prefix.
    List {
        element: Box<FieldKind>,
        max_length: usize,
    },
}

impl FieldKind {
    /// Integer wide enough to hold `max_value`.
    pub fn integer(max_value: u64) -> Self {
        FieldKind::Integer {
            num_bits: bit_length(max_value).max(1),
        }
    }

    /// Integer with an explicit width.
    pub fn integer_bits(num_bits: usize) -> Result<Self, CompileError> {
        let kind = FieldKind::Integer { num_bits };
        kind.validate()?;
        Ok(kind)
    }

    /// Single-bit flag.
    pub fn boolean() -> Self {
        FieldKind::Boolean
    }

    /// Hex string of `length` digits; `length` must be even.
    pub fn hex(length: usize) -> Result<Self, CompileError> {
        let kind = FieldKind::Hex { length };
        kind.validate()?;
        Ok(kind)
    }

    /// One label out of `choices`, stored as its index.
    pub fn choice<I, S>(choices: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = FieldKind::Choice {
            choices: choices.into_iter().map(Into::into).collect(),
        };
        kind.validate()?;
        Ok(kind)
    }

    /// Any subset of `choices`, one bit per label in declaration order.
    pub fn multi_choice<I, S>(choices: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = FieldKind::MultiChoice {
            choices: choices.into_iter().map(Into::into).collect(),
        };
        kind.validate()?;
        Ok(kind)
    }

    /// Date with years in `min_year..=max_year`.
    pub fn date(min_year: i32, max_year: i32) -> Result<Self, CompileError> {
        let kind = FieldKind::Date { min_year, max_year };
        kind.validate()?;
        Ok(kind)
    }

    /// Up to `max_length` values of `element`.
    pub fn list(element: FieldKind, max_length: usize) -> Result<Self, CompileError> {
        let kind = FieldKind::List {
            element: Box::new(element),
            max_length,
        };
        kind.validate()?;
        Ok(kind)
    }

    /// Checks the kind's parameters, recursing into list elements.
    pub fn validate(&self) -> Result<(), CompileError> {
        match self {
            FieldKind::Integer { num_bits } => {
                if *num_bits == 0 || *num_bits > 64 {
                    return Err(CompileError::InvalidFieldSize(*num_bits));
                }
            }
            FieldKind::Boolean => {}
            FieldKind::Hex { length } => {
                if *length == 0 || length % 2 != 0 {
                    return Err(CompileError::InvalidHexLength(*length));
                }
            }
            FieldKind::Choice { choices } | FieldKind::MultiChoice { choices } => {
                if choices.is_empty() {
                    return Err(CompileError::EmptyChoices);
                }

                let mut seen = HashSet::with_capacity(choices.len());
                for choice in choices {
                    if !seen.insert(choice.as_str()) {
                        return Err(CompileError::DuplicateChoice(choice.clone()));
                    }
                }
            }
            FieldKind::Date { min_year, max_year } => {
                if min_year > max_year {
                    return Err(CompileError::InvalidYearRange {
                        min_year: *min_year,
                        max_year: *max_year,
                    });
                }
            }
            FieldKind::List {
                element,
                max_length,
            } => {
                if *max_length == 0 {
                    return Err(CompileError::InvalidListCapacity);
                }
                element.validate()?;
            }
        }

        Ok(())
    }

    /// Number of bits this kind occupies in a packed buffer. Always at least 1
    /// for a kind that passes [FieldKind::validate].
    pub fn bit_width(&self) -> usize {
        match self {
            FieldKind::Integer { num_bits } => *num_bits,
            FieldKind::Boolean => 1,
            FieldKind::Hex { length } => length / 2 * 8,
            FieldKind::Choice { choices } => choice_bits(choices.len()),
            FieldKind::MultiChoice { choices } => choices.len(),
            FieldKind::Date { .. } => self.year_bits() + MONTH_BITS + DAY_BITS,
            FieldKind::List {
                element,
                max_length,
            } => list_prefix_bits(*max_length) + max_length * element.bit_width(),
        }
    }

    pub(crate) fn year_bits(&self) -> usize {
        match self {
            FieldKind::Date { min_year, max_year } => {
                let span = (*max_year as i64 - *min_year as i64).max(0) as u64;
                bit_length(span).max(1)
            }
            _ => 0,
        }
    }
}

pub(crate) fn choice_bits(len: usize) -> usize {
    bit_length(len.saturating_sub(1) as u64).max(1)
}

pub(crate) fn list_prefix_bits(max_length: usize) -> usize {
    bit_length(max_length as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_width_from_max_value() {
        assert_eq!(FieldKind::integer(50).bit_width(), 6);
        assert_eq!(FieldKind::integer(64).bit_width(), 7);
        assert_eq!(FieldKind::integer(63).bit_width(), 6);
        assert_eq!(FieldKind::integer(0).bit_width(), 1);
        assert_eq!(FieldKind::integer(u64::MAX).bit_width(), 64);
    }

    #[test]
    fn test_integer_bits_validation() {
        assert_eq!(FieldKind::integer_bits(12).unwrap().bit_width(), 12);
        assert_eq!(
            FieldKind::integer_bits(0).unwrap_err(),
            CompileError::InvalidFieldSize(0)
        );
        assert_eq!(
            FieldKind::integer_bits(65).unwrap_err(),
            CompileError::InvalidFieldSize(65)
        );
    }

    #[test]
    fn test_hex_width() {
        assert_eq!(FieldKind::hex(6).unwrap().bit_width(), 24);
        assert_eq!(
            FieldKind::hex(5).unwrap_err(),
            CompileError::InvalidHexLength(5)
        );
        assert_eq!(
            FieldKind::hex(0).unwrap_err(),
            CompileError::InvalidHexLength(0)
        );
    }

    #[test]
    fn test_choice_width() {
        assert_eq!(FieldKind::choice(["a"]).unwrap().bit_width(), 1);
        assert_eq!(FieldKind::choice(["a", "b"]).unwrap().bit_width(), 1);
        assert_eq!(FieldKind::choice(["a", "b", "c"]).unwrap().bit_width(), 2);
        assert_eq!(
            FieldKind::choice(["a", "b", "c", "d"]).unwrap().bit_width(),
            2
        );
        assert_eq!(
            FieldKind::choice(["a", "b", "c", "d", "e"])
                .unwrap()
                .bit_width(),
            3
        );
    }

    #[test]
    fn test_choice_validation() {
        assert_eq!(
            FieldKind::choice(Vec::<String>::new()).unwrap_err(),
            CompileError::EmptyChoices
        );
        assert_eq!(
            FieldKind::multi_choice(["x", "y", "x"]).unwrap_err(),
            CompileError::DuplicateChoice("x".to_string())
        );
    }

    #[test]
    fn test_multi_choice_width() {
        let kind = FieldKind::multi_choice(["bear", "car", "beer bottle", "heart"]).unwrap();
        assert_eq!(kind.bit_width(), 4);
    }

    #[test]
    fn test_date_width() {
        assert_eq!(FieldKind::date(2000, 2016).unwrap().bit_width(), 5 + 4 + 5);
        assert_eq!(FieldKind::date(2020, 2020).unwrap().bit_width(), 1 + 4 + 5);
        assert_eq!(
            FieldKind::date(2016, 2000).unwrap_err(),
            CompileError::InvalidYearRange {
                min_year: 2016,
                max_year: 2000
            }
        );
    }

    #[test]
    fn test_list_width() {
        let kind = FieldKind::list(FieldKind::integer(7), 5).unwrap();
        assert_eq!(kind.bit_width(), 3 + 5 * 3);

        assert_eq!(
            FieldKind::list(FieldKind::Boolean, 0).unwrap_err(),
            CompileError::InvalidListCapacity
        );
        assert_eq!(
            FieldKind::list(FieldKind::Hex { length: 3 }, 2).unwrap_err(),
            CompileError::InvalidHexLength(3)
        );
    }

    #[test]
    fn test_declaration_order_increases() {
        let first = Field::new("a", FieldKind::Boolean);
        let second = Field::new("b", FieldKind::Boolean);
        assert!(first.order < second.order);
    }
}
