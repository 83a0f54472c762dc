use crate::{
    bits::write_bits_at,
    errors::{CompileError, ReadError, WriteError},
    field::{Field, FieldKind},
    fragment::Packed,
    pack::FieldReader,
    value::Value,
};

/// A [Field] placed at its absolute bit offset inside the packed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub name: String,
    pub kind: FieldKind,
    pub offset_bits: usize,
    pub len_bits: usize,
}

impl CompiledField {
    /// Validates `field` and places it at `offset_bits`.
    pub fn compile(field: &Field, offset_bits: usize) -> Result<Self, CompileError> {
        if field.name.is_empty() {
            return Err(CompileError::InvalidFieldName);
        }

        field.kind.validate()?;

        Ok(CompiledField {
            name: field.name.clone(),
            kind: field.kind.clone(),
            offset_bits,
            len_bits: field.bit_width(),
        })
    }

    /// Computes the field-relative bit patterns for `value`.
    pub fn pack(&self, value: &Value) -> Result<Vec<Packed>, WriteError> {
        self.kind
            .encode(value)
            .map_err(|e| WriteError::field(&self.name, e))
    }

    /// Writes previously packed patterns into `data` at this field's offset.
    pub fn write(&self, data: &mut [u8], packed: &[Packed]) -> Result<(), WriteError> {
        for p in packed {
            write_bits_at(
                data,
                self.offset_bits + p.fragment.offset_bits,
                p.fragment.len_bits,
                p.bits,
            )?;
        }

        Ok(())
    }

    /// Decodes this field's value out of `data`.
    pub fn read(&self, data: &[u8]) -> Result<Value, ReadError> {
        self.kind
            .decode(&FieldReader::new(data, self.offset_bits))
            .map_err(|e| ReadError::field(&self.name, e))
    }
}
