//! Schema: the compiled layout of a record and the uncached encode/decode paths.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::{
    compiled::CompiledField,
    errors::{CompileError, ReadError, WriteError},
    field::Field,
    fragment::Packed,
    value::{Record, Value},
};

/// A compiled schema: fields placed back to back in declaration order.
///
/// Use [Schema::compile] to build from [Field]s, then [Schema::encode] /
/// [Schema::decode], or wrap it in a [crate::codec::Codec] to cache packed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    total_bits: usize,
    /// Compiled fields in wire order.
    fields: Vec<CompiledField>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Compiles `fields` in slice order. Fails on an empty slice, an empty or
    /// duplicate name, or an invalid field kind.
    pub fn compile(fields: &[Field]) -> Result<Self, CompileError> {
        if fields.is_empty() {
            return Err(CompileError::EmptySchema);
        }

        let mut compiled_fields: Vec<CompiledField> = Vec::with_capacity(fields.len());
        let mut index = HashMap::with_capacity(fields.len());
        let mut cursor = 0;

        for field in fields {
            let compiled_field = CompiledField::compile(field, cursor)?;

            if index
                .insert(compiled_field.name.clone(), compiled_fields.len())
                .is_some()
            {
                return Err(CompileError::DuplicateFieldName(field.name.clone()));
            }

            cursor += compiled_field.len_bits;
            compiled_fields.push(compiled_field);
        }

        debug!(
            fields = compiled_fields.len(),
            total_bits = cursor,
            total_bytes = cursor.div_ceil(8),
            "compiled schema"
        );

        Ok(Self {
            total_bits: cursor,
            fields: compiled_fields,
            index,
        })
    }

    /// Compiles fields that may have lost their order (e.g. collected from a
    /// map), restoring the order they were created in with [Field::new].
    pub fn compile_declared<I>(fields: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = Field>,
    {
        let mut fields: Vec<Field> = fields.into_iter().collect();
        fields.sort_by_key(|field| field.order);
        Self::compile(&fields)
    }

    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    /// Size of every packed buffer of this schema.
    pub fn total_bytes(&self) -> usize {
        self.total_bits.div_ceil(8)
    }

    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// `(offset_bits, len_bits)` of the named field.
    pub fn layout_of(&self, name: &str) -> Option<(usize, usize)> {
        self.field(name).map(|f| (f.offset_bits, f.len_bits))
    }

    /// Packs `record` into a buffer of [Schema::total_bytes] bytes.
    ///
    /// Every schema field must be present in `record`; extra keys are ignored.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>, WriteError> {
        self.encode_with(record, |_, field, value| field.pack(value))
    }

    /// Drives encoding, asking `pack` for each field's patterns.
    pub(crate) fn encode_with<F, P>(&self, record: &Record, mut pack: F) -> Result<Vec<u8>, WriteError>
    where
        F: FnMut(usize, &CompiledField, &Value) -> Result<P, WriteError>,
        P: AsRef<[Packed]>,
    {
        let mut data = vec![0u8; self.total_bytes()];

        for (i, field) in self.fields.iter().enumerate() {
            let value = record
                .get(&field.name)
                .ok_or_else(|| WriteError::MissingField(field.name.clone()))?;

            let packed = pack(i, field, value)?;
            field.write(&mut data, packed.as_ref())?;
        }

        Ok(data)
    }

    /// Unpacks a buffer produced by [Schema::encode]. `data` must be exactly
    /// [Schema::total_bytes] long.
    pub fn decode(&self, data: &[u8]) -> Result<Record, ReadError> {
        if data.len() != self.total_bytes() {
            return Err(ReadError::LengthMismatch {
                expected: self.total_bytes(),
                actual: data.len(),
            });
        }

        let mut map: BTreeMap<String, Value> = BTreeMap::new();

        for field in &self.fields {
            map.insert(field.name.clone(), field.read(data)?);
        }

        Ok(map)
    }
}
