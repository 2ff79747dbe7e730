//! Address decode across a peripheral's independently addressed
//! sub-interfaces. Each sub-interface owns a contiguous, word-aligned span
//! and the `RegisterBlock` behind it; decoding maps an absolute address to
//! (sub-interface, in-block register index). A span may be larger than its
//! register count covers (sparse debug/ROM windows), in which case in-span
//! addresses past the last register still fail to decode.
use std::{error::Error, fmt};

use crate::csr::{RegisterBlock, WORD_BYTES};

use super::error::{AccessError, AccessResult};

/// Transfer widths a sub-interface accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessWidth {
    /// Exact word-size transfers at natural alignment only.
    WordOnly,
    /// 1/2/4-byte transfers, each aligned to its own size, with byte-enable
    /// lanes honored.
    ByteEnabled,
}

/// One independently addressed register window of a peripheral.
#[derive(Debug)]
pub struct SubInterface {
    pub name: &'static str,
    pub base: u32,
    pub span_bytes: u32,
    pub width: AccessWidth,
    pub block: RegisterBlock,
}

impl SubInterface {
    pub fn new(
        name: &'static str,
        base: u32,
        span_bytes: u32,
        width: AccessWidth,
        block: RegisterBlock,
    ) -> Self {
        Self {
            name,
            base,
            span_bytes,
            width,
            block,
        }
    }

    #[inline(always)]
    pub fn contains(&self, address: u32) -> bool {
        address >= self.base && address - self.base < self.span_bytes
    }
}

pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug)]
pub enum MapError {
    MisalignedSpan {
        interface: &'static str,
    },
    SpanTooSmall {
        interface: &'static str,
        span_bytes: u32,
        register_bytes: u32,
    },
    Overlap {
        interface: &'static str,
        other: &'static str,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::MisalignedSpan { interface } => {
                write!(f, "sub-interface '{interface}' span is not word aligned")
            }
            MapError::SpanTooSmall {
                interface,
                span_bytes,
                register_bytes,
            } => write!(
                f,
                "sub-interface '{interface}' span {span_bytes} bytes cannot hold {register_bytes} register bytes"
            ),
            MapError::Overlap { interface, other } => {
                write!(f, "sub-interface '{interface}' overlaps '{other}'")
            }
        }
    }
}

impl Error for MapError {}

/// A decoded transaction target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Position of the sub-interface within the map.
    pub interface: usize,
    /// In-block register index.
    pub index: usize,
}

/// The peripheral's full decode table: every sub-interface with its span.
#[derive(Debug)]
pub struct AddressMap {
    interfaces: Vec<SubInterface>,
}

impl AddressMap {
    /// Validate spans (word aligned, large enough for their registers, and
    /// mutually disjoint) and freeze the map.
    pub fn new(interfaces: Vec<SubInterface>) -> MapResult<Self> {
        for iface in &interfaces {
            if iface.base % WORD_BYTES != 0 || iface.span_bytes % WORD_BYTES != 0 {
                return Err(MapError::MisalignedSpan {
                    interface: iface.name,
                });
            }
            let register_bytes = iface.block.len() as u32 * WORD_BYTES;
            if iface.span_bytes < register_bytes {
                return Err(MapError::SpanTooSmall {
                    interface: iface.name,
                    span_bytes: iface.span_bytes,
                    register_bytes,
                });
            }
        }
        for (i, a) in interfaces.iter().enumerate() {
            for b in &interfaces[i + 1..] {
                let disjoint =
                    a.base + a.span_bytes <= b.base || b.base + b.span_bytes <= a.base;
                if !disjoint {
                    return Err(MapError::Overlap {
                        interface: a.name,
                        other: b.name,
                    });
                }
            }
        }
        Ok(Self { interfaces })
    }

    /// Map an absolute address to its sub-interface and register index.
    pub fn decode(&self, address: u32) -> AccessResult<Target> {
        for (pos, iface) in self.interfaces.iter().enumerate() {
            if iface.contains(address) {
                let index = ((address - iface.base) / WORD_BYTES) as usize;
                if index >= iface.block.len() {
                    // In-span but past the last register: sparse window.
                    return Err(AccessError::Decode { address });
                }
                return Ok(Target {
                    interface: pos,
                    index,
                });
            }
        }
        Err(AccessError::Decode { address })
    }

    #[inline(always)]
    pub fn interface(&self, pos: usize) -> &SubInterface {
        &self.interfaces[pos]
    }

    #[inline(always)]
    pub fn interface_mut(&mut self, pos: usize) -> &mut SubInterface {
        &mut self.interfaces[pos]
    }

    pub fn interfaces(&self) -> &[SubInterface] {
        &self.interfaces
    }

    pub fn interfaces_mut(&mut self) -> &mut [SubInterface] {
        &mut self.interfaces
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}
