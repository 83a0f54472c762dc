//! Bit ranges relative to the start of a field.

/// A contiguous bit range inside a field, relative to the field's first bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fragment {
    pub offset_bits: usize,
    pub len_bits: usize,
}

impl Fragment {
    pub fn new(offset_bits: usize, len_bits: usize) -> Self {
        Fragment {
            offset_bits,
            len_bits,
        }
    }

    /// Same range moved `by` bits further into the field.
    pub fn shifted(self, by: usize) -> Self {
        Fragment {
            offset_bits: self.offset_bits + by,
            ..self
        }
    }
}

/// A bit pattern ready to be written into its [Fragment].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packed {
    pub fragment: Fragment,
    pub bits: u64,
}

impl Packed {
    pub fn new(offset_bits: usize, len_bits: usize, bits: u64) -> Self {
        Packed {
            fragment: Fragment::new(offset_bits, len_bits),
            bits,
        }
    }

    pub fn shifted(self, by: usize) -> Self {
        Packed {
            fragment: self.fragment.shifted(by),
            ..self
        }
    }
}
