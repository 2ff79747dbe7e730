//! Declarative register/field descriptor tables. A `RegisterLayout` is the
//! data that used to be hand-expanded per peripheral: an ordered list of
//! word-sized registers, each with its byte offset, reset value, bitfields,
//! optional write-enable gate, and shadow marking. Construction validates the
//! structural invariants once so the engine's hot paths can trust them.
use std::{error::Error, fmt};

use ahash::AHashMap;
use smallvec::SmallVec;

use super::field::FieldDesc;
use super::gate::GateDesc;

/// Register word width. The engine models 32-bit CSR files.
pub const WORD_BYTES: u32 = 4;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug)]
pub enum LayoutError {
    DuplicateName {
        name: &'static str,
    },
    NonContiguousOffset {
        name: &'static str,
        offset: u32,
        expected: u32,
    },
    FieldOutOfWidth {
        register: &'static str,
        bit_offset: u32,
        bit_width: u32,
    },
    FieldOverlap {
        register: &'static str,
        bit_offset: u32,
    },
    BadGateCompanion {
        register: &'static str,
        companion: usize,
    },
    BadCrossTarget {
        register: &'static str,
        target: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::DuplicateName { name } => {
                write!(f, "register name '{name}' declared more than once")
            }
            LayoutError::NonContiguousOffset {
                name,
                offset,
                expected,
            } => write!(
                f,
                "register '{name}' offset 0x{offset:X} breaks the flat table (expected 0x{expected:X})"
            ),
            LayoutError::FieldOutOfWidth {
                register,
                bit_offset,
                bit_width,
            } => write!(
                f,
                "field at bit {bit_offset} width {bit_width} of '{register}' exceeds the register word"
            ),
            LayoutError::FieldOverlap {
                register,
                bit_offset,
            } => write!(
                f,
                "field at bit {bit_offset} of '{register}' overlaps an earlier field"
            ),
            LayoutError::BadGateCompanion {
                register,
                companion,
            } => write!(
                f,
                "gate companion index {companion} of '{register}' is out of range"
            ),
            LayoutError::BadCrossTarget { register, target } => write!(
                f,
                "cross-effect target index {target} of '{register}' is out of range"
            ),
        }
    }
}

impl Error for LayoutError {}

/// One register's static description.
#[derive(Debug, Clone)]
pub struct RegisterDesc {
    pub name: &'static str,
    /// Byte offset within the owning sub-interface. Word aligned.
    pub offset: u32,
    /// Word restored by reset.
    pub reset_value: u32,
    pub fields: SmallVec<[FieldDesc; 4]>,
    /// Companion lock evaluated on every write when present.
    pub gate: Option<GateDesc>,
    /// Requires the two-phase staged-write protocol when set.
    pub shadowed: bool,
}

impl RegisterDesc {
    pub fn new(name: &'static str, offset: u32) -> Self {
        Self {
            name,
            offset,
            reset_value: 0,
            fields: SmallVec::new(),
            gate: None,
            shadowed: false,
        }
    }

    pub fn reset_value(mut self, value: u32) -> Self {
        self.reset_value = value;
        self
    }

    pub fn field(mut self, field: FieldDesc) -> Self {
        self.fields.push(field);
        self
    }

    pub fn gated_by(mut self, gate: GateDesc) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn shadowed(mut self) -> Self {
        self.shadowed = true;
        self
    }
}

/// Validated, immutable register table for one sub-interface.
#[derive(Debug)]
pub struct RegisterLayout {
    registers: Vec<RegisterDesc>,
    by_name: AHashMap<&'static str, usize>,
}

impl RegisterLayout {
    /// Validate and freeze a register table. Storage is a flat word array
    /// with `index = offset / 4`, so offsets must run densely from zero;
    /// field bit ranges must stay inside the word and never overlap; gate
    /// companions and cross-effect targets must point at registers that
    /// exist.
    pub fn new(registers: Vec<RegisterDesc>) -> LayoutResult<Self> {
        let count = registers.len();
        let mut by_name = AHashMap::with_capacity(count);

        for (index, reg) in registers.iter().enumerate() {
            if by_name.insert(reg.name, index).is_some() {
                return Err(LayoutError::DuplicateName { name: reg.name });
            }
            let expected = index as u32 * WORD_BYTES;
            if reg.offset != expected {
                return Err(LayoutError::NonContiguousOffset {
                    name: reg.name,
                    offset: reg.offset,
                    expected,
                });
            }

            let mut covered = 0u32;
            for field in &reg.fields {
                if field.bit_width == 0
                    || field.bit_width > 32
                    || field.bit_offset >= 32
                    || field.bit_offset + field.bit_width > 32
                {
                    return Err(LayoutError::FieldOutOfWidth {
                        register: reg.name,
                        bit_offset: field.bit_offset,
                        bit_width: field.bit_width,
                    });
                }
                let mask = field.mask();
                if covered & mask != 0 {
                    return Err(LayoutError::FieldOverlap {
                        register: reg.name,
                        bit_offset: field.bit_offset,
                    });
                }
                covered |= mask;

                if let Some(cross) = &field.cross {
                    if cross.target >= count {
                        return Err(LayoutError::BadCrossTarget {
                            register: reg.name,
                            target: cross.target,
                        });
                    }
                }
            }

            if let Some(gate) = &reg.gate {
                if gate.companion >= count {
                    return Err(LayoutError::BadGateCompanion {
                        register: reg.name,
                        companion: gate.companion,
                    });
                }
            }
        }

        Ok(Self { registers, by_name })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    #[inline(always)]
    pub fn register(&self, index: usize) -> &RegisterDesc {
        &self.registers[index]
    }

    pub fn registers(&self) -> &[RegisterDesc] {
        &self.registers
    }

    /// In-block index of a register by its declared name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Byte offset of a register by its declared name.
    pub fn offset_of(&self, name: &str) -> Option<u32> {
        self.index_of(name).map(|i| self.registers[i].offset)
    }
}
