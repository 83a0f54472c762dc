//! Conversion between field values and the bit patterns stored for them.
//!
//! [FieldKind::encode] turns a [Value] into a list of [Packed] patterns at
//! field-relative offsets; [FieldKind::decode] pulls the same ranges back out
//! through a [FieldReader] and rebuilds the value.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::{
    bits::{bit_length, read_bits_at},
    errors::{ReadError, ValueError},
    field::{DAY_BITS, FieldKind, MONTH_BITS, choice_bits, list_prefix_bits},
    fragment::Packed,
    value::Value,
};

/// Read access to the bits of one field inside a packed buffer.
///
/// Offsets passed to [FieldReader::read] are relative to the field start.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    data: &'a [u8],
    offset_bits: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8], offset_bits: usize) -> Self {
        FieldReader { data, offset_bits }
    }

    pub fn read(&self, offset_bits: usize, len_bits: usize) -> Result<u64, ReadError> {
        read_bits_at(self.data, self.offset_bits + offset_bits, len_bits)
    }

    /// Reader for a sub-range starting `by` bits into this field.
    fn at(&self, by: usize) -> FieldReader<'a> {
        FieldReader {
            data: self.data,
            offset_bits: self.offset_bits + by,
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: found.kind_name(),
    }
}

fn index_of(choices: &[String], label: &str) -> Result<usize, ValueError> {
    choices
        .iter()
        .position(|choice| choice == label)
        .ok_or_else(|| ValueError::NotAChoice(label.to_string()))
}

impl FieldKind {
    /// Computes the bit patterns for `value`.
    pub fn encode(&self, value: &Value) -> Result<Vec<Packed>, ValueError> {
        match (self, value) {
            (FieldKind::Integer { num_bits }, Value::Int(v)) => {
                if bit_length(*v) > *num_bits {
                    return Err(ValueError::Overflow {
                        value: *v,
                        bits: *num_bits,
                    });
                }
                Ok(vec![Packed::new(0, *num_bits, *v)])
            }
            (FieldKind::Integer { .. }, other) => Err(mismatch("integer", other)),

            (FieldKind::Boolean, Value::Bool(b)) => Ok(vec![Packed::new(0, 1, *b as u64)]),
            (FieldKind::Boolean, other) => Err(mismatch("boolean", other)),

            (FieldKind::Hex { length }, Value::Hex(digits)) => {
                let invalid = || ValueError::InvalidHex {
                    value: digits.clone(),
                    expected_len: *length,
                };

                if digits.len() != *length {
                    return Err(invalid());
                }
                let bytes = hex::decode(digits).map_err(|_| invalid())?;

                Ok(bytes
                    .iter()
                    .enumerate()
                    .map(|(i, byte)| Packed::new(i * 8, 8, *byte as u64))
                    .collect())
            }
            (FieldKind::Hex { .. }, other) => Err(mismatch("hex string", other)),

            (FieldKind::Choice { choices }, Value::Choice(label)) => {
                let index = index_of(choices, label)?;
                Ok(vec![Packed::new(0, choice_bits(choices.len()), index as u64)])
            }
            (FieldKind::Choice { .. }, other) => Err(mismatch("choice", other)),

            (FieldKind::MultiChoice { choices }, Value::Choices(labels)) => labels
                .iter()
                .map(|label| index_of(choices, label).map(|index| Packed::new(index, 1, 1)))
                .collect(),
            (FieldKind::MultiChoice { .. }, other) => Err(mismatch("choice set", other)),

            (FieldKind::Date { min_year, max_year }, Value::Date(date)) => {
                let year = date.year();
                if year < *min_year || year > *max_year {
                    return Err(ValueError::YearOutOfRange {
                        year,
                        min_year: *min_year,
                        max_year: *max_year,
                    });
                }

                let year_bits = self.year_bits();
                Ok(vec![
                    Packed::new(0, year_bits, (year as i64 - *min_year as i64) as u64),
                    Packed::new(year_bits, MONTH_BITS, date.month() as u64),
                    Packed::new(year_bits + MONTH_BITS, DAY_BITS, date.day() as u64),
                ])
            }
            (FieldKind::Date { .. }, other) => Err(mismatch("date", other)),

            (
                FieldKind::List {
                    element,
                    max_length,
                },
                Value::List(items),
            ) => {
                if items.len() > *max_length {
                    return Err(ValueError::CapacityExceeded {
                        len: items.len(),
                        max: *max_length,
                    });
                }

                let prefix_bits = list_prefix_bits(*max_length);
                let slot_bits = element.bit_width();

                let mut packed = vec![Packed::new(0, prefix_bits, items.len() as u64)];
                for (i, item) in items.iter().enumerate() {
                    let slot = prefix_bits + i * slot_bits;
                    packed.extend(element.encode(item)?.into_iter().map(|p| p.shifted(slot)));
                }

                Ok(packed)
            }
            (FieldKind::List { .. }, other) => Err(mismatch("list", other)),
        }
    }

    /// Rebuilds a value from the bits visible through `reader`.
    pub fn decode(&self, reader: &FieldReader<'_>) -> Result<Value, ValueError> {
        match self {
            FieldKind::Integer { num_bits } => Ok(Value::Int(reader.read(0, *num_bits)?)),

            FieldKind::Boolean => Ok(Value::Bool(reader.read(0, 1)? != 0)),

            FieldKind::Hex { length } => {
                let bytes = (0..length / 2)
                    .map(|i| reader.read(i * 8, 8).map(|b| b as u8))
                    .collect::<Result<Vec<u8>, ReadError>>()?;
                Ok(Value::Hex(hex::encode(bytes)))
            }

            FieldKind::Choice { choices } => {
                let index = reader.read(0, choice_bits(choices.len()))?;
                choices
                    .get(index as usize)
                    .map(|label| Value::Choice(label.clone()))
                    .ok_or(ValueError::ChoiceIndexOutOfRange {
                        index,
                        len: choices.len(),
                    })
            }

            FieldKind::MultiChoice { choices } => {
                let mut labels = BTreeSet::new();
                for (i, choice) in choices.iter().enumerate() {
                    if reader.read(i, 1)? != 0 {
                        labels.insert(choice.clone());
                    }
                }
                Ok(Value::Choices(labels))
            }

            FieldKind::Date { min_year, .. } => {
                let year_bits = self.year_bits();
                let year = *min_year as i64 + reader.read(0, year_bits)? as i64;
                let month = reader.read(year_bits, MONTH_BITS)?;
                let day = reader.read(year_bits + MONTH_BITS, DAY_BITS)?;

                i32::try_from(year)
                    .ok()
                    .and_then(|y| NaiveDate::from_ymd_opt(y, month as u32, day as u32))
                    .map(Value::Date)
                    .ok_or(ValueError::InvalidDate { year, month, day })
            }

            FieldKind::List {
                element,
                max_length,
            } => {
                let prefix_bits = list_prefix_bits(*max_length);
                let slot_bits = element.bit_width();

                let len = reader.read(0, prefix_bits)? as usize;
                if len > *max_length {
                    return Err(ValueError::CapacityExceeded {
                        len,
                        max: *max_length,
                    });
                }

                let items = (0..len)
                    .map(|i| element.decode(&reader.at(prefix_bits + i * slot_bits)))
                    .collect::<Result<Vec<Value>, ValueError>>()?;
                Ok(Value::List(items))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bits::write_bits_at;

    use super::*;

    fn pack(kind: &FieldKind, value: &Value) -> Vec<u8> {
        let mut data = vec![0u8; kind.bit_width().div_ceil(8)];
        for p in kind.encode(value).unwrap() {
            write_bits_at(&mut data, p.fragment.offset_bits, p.fragment.len_bits, p.bits).unwrap();
        }
        data
    }

    fn unpack(kind: &FieldKind, data: &[u8]) -> Result<Value, ValueError> {
        kind.decode(&FieldReader::new(data, 0))
    }

    #[test]
    fn test_integer_boundary() {
        let kind = FieldKind::integer_bits(5).unwrap();
        assert_eq!(
            kind.encode(&Value::Int(31)).unwrap(),
            vec![Packed::new(0, 5, 31)]
        );
        assert_eq!(
            kind.encode(&Value::Int(32)).unwrap_err(),
            ValueError::Overflow { value: 32, bits: 5 }
        );
    }

    #[test]
    fn test_integer_type_mismatch() {
        assert_eq!(
            FieldKind::integer(10).encode(&Value::Bool(true)).unwrap_err(),
            ValueError::TypeMismatch {
                expected: "integer",
                found: "boolean"
            }
        );
    }

    #[test]
    fn test_boolean() {
        let data = pack(&FieldKind::Boolean, &Value::Bool(true));
        assert_eq!(data, [0b1000_0000]);
        assert_eq!(unpack(&FieldKind::Boolean, &data), Ok(Value::Bool(true)));
        assert_eq!(
            FieldKind::Boolean.encode(&Value::Int(1)).unwrap_err(),
            ValueError::TypeMismatch {
                expected: "boolean",
                found: "integer"
            }
        );
    }

    #[test]
    fn test_hex_lowercases_on_decode() {
        let kind = FieldKind::hex(6).unwrap();
        let data = pack(&kind, &Value::hex("FF00aB"));
        assert_eq!(data, [0xFF, 0x00, 0xAB]);
        assert_eq!(unpack(&kind, &data), Ok(Value::hex("ff00ab")));
    }

    #[test]
    fn test_hex_rejects_bad_input() {
        let kind = FieldKind::hex(4).unwrap();
        assert_eq!(
            kind.encode(&Value::hex("abc")).unwrap_err(),
            ValueError::InvalidHex {
                value: "abc".to_string(),
                expected_len: 4
            }
        );
        assert_eq!(
            kind.encode(&Value::hex("zz00")).unwrap_err(),
            ValueError::InvalidHex {
                value: "zz00".to_string(),
                expected_len: 4
            }
        );
    }

    #[test]
    fn test_choice() {
        let kind = FieldKind::choice(["bitter", "milky", "white"]).unwrap();
        let data = pack(&kind, &Value::choice("white"));
        assert_eq!(data, [0b10_000000]);
        assert_eq!(unpack(&kind, &data), Ok(Value::choice("white")));
        assert_eq!(
            kind.encode(&Value::choice("dark")).unwrap_err(),
            ValueError::NotAChoice("dark".to_string())
        );
    }

    #[test]
    fn test_choice_index_out_of_range() {
        let kind = FieldKind::choice(["bitter", "milky", "white"]).unwrap();
        assert_eq!(
            unpack(&kind, &[0b11_000000]),
            Err(ValueError::ChoiceIndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_multi_choice() {
        let kind = FieldKind::multi_choice(["bear", "car", "beer bottle", "heart"]).unwrap();
        let data = pack(&kind, &Value::choices(["heart", "bear"]));
        assert_eq!(data, [0b1001_0000]);
        assert_eq!(unpack(&kind, &data), Ok(Value::choices(["bear", "heart"])));

        let empty = pack(&kind, &Value::choices(Vec::<String>::new()));
        assert_eq!(unpack(&kind, &empty), Ok(Value::choices(Vec::<String>::new())));

        assert_eq!(
            kind.encode(&Value::choices(["boat"])).unwrap_err(),
            ValueError::NotAChoice("boat".to_string())
        );
    }

    #[test]
    fn test_date() {
        let kind = FieldKind::date(2000, 2016).unwrap();
        let date = NaiveDate::from_ymd_opt(2015, 9, 16).unwrap();
        let data = pack(&kind, &Value::Date(date));
        // 01111 1001 10000
        assert_eq!(data, [0b01111_100, 0b1_10000_00]);
        assert_eq!(unpack(&kind, &data), Ok(Value::Date(date)));
    }

    #[test]
    fn test_date_year_relative_to_min_year() {
        let kind = FieldKind::date(1990, 1999).unwrap();
        let date = NaiveDate::from_ymd_opt(1995, 1, 31).unwrap();
        let packed = kind.encode(&Value::Date(date)).unwrap();
        assert_eq!(packed[0], Packed::new(0, 4, 5));
        assert_eq!(unpack(&kind, &pack(&kind, &Value::Date(date))), Ok(Value::Date(date)));
    }

    #[test]
    fn test_date_negative_min_year() {
        let kind = FieldKind::date(i32::MIN, 2000).unwrap();
        assert_eq!(kind.bit_width(), 32 + 4 + 5);

        let date = NaiveDate::from_ymd_opt(1995, 1, 1).unwrap();
        let packed = kind.encode(&Value::Date(date)).unwrap();
        assert_eq!(packed[0], Packed::new(0, 32, (1u64 << 31) + 1995));
        assert_eq!(unpack(&kind, &pack(&kind, &Value::Date(date))), Ok(Value::Date(date)));
    }

    #[test]
    fn test_date_out_of_range() {
        let kind = FieldKind::date(2000, 2016).unwrap();
        let date = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        assert_eq!(
            kind.encode(&Value::Date(date)).unwrap_err(),
            ValueError::YearOutOfRange {
                year: 2017,
                min_year: 2000,
                max_year: 2016
            }
        );
    }

    #[test]
    fn test_invalid_date_on_decode() {
        let kind = FieldKind::date(2000, 2016).unwrap();
        // year 1, month 2, day 30
        let mut data = vec![0u8; 2];
        write_bits_at(&mut data, 0, 5, 1).unwrap();
        write_bits_at(&mut data, 5, 4, 2).unwrap();
        write_bits_at(&mut data, 9, 5, 30).unwrap();
        assert_eq!(
            unpack(&kind, &data),
            Err(ValueError::InvalidDate {
                year: 2001,
                month: 2,
                day: 30
            })
        );
    }

    #[test]
    fn test_list_slots() {
        let kind = FieldKind::list(FieldKind::integer(15), 3).unwrap();
        let value = Value::List(vec![Value::Int(1), Value::Int(15)]);
        let data = pack(&kind, &value);
        // size 10, slots 0001 1111 0000
        assert_eq!(data, [0b10_0001_11, 0b11_0000_00]);
        assert_eq!(unpack(&kind, &data), Ok(value));
    }

    #[test]
    fn test_list_capacity() {
        let kind = FieldKind::list(FieldKind::Boolean, 2).unwrap();
        assert_eq!(
            kind.encode(&Value::List(vec![Value::Bool(true); 3])).unwrap_err(),
            ValueError::CapacityExceeded { len: 3, max: 2 }
        );
        // size prefix 3 in 2 bits
        assert_eq!(
            unpack(&kind, &[0b11_000000]),
            Err(ValueError::CapacityExceeded { len: 3, max: 2 })
        );
    }

    #[test]
    fn test_list_of_wide_elements() {
        let kind = FieldKind::list(FieldKind::hex(20).unwrap(), 2).unwrap();
        let value = Value::List(vec![Value::hex("00112233445566778899")]);
        let data = pack(&kind, &value);
        assert_eq!(unpack(&kind, &data), Ok(value));
    }
}
