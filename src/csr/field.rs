//! Per-field access policies and the pure transforms they imply. A policy is
//! fixed when the register layout is built and describes how one bitfield
//! reacts to a software write, a software read, and a hardware-side update.
//! Everything here is mask arithmetic on 32-bit words with no storage access,
//! so the `RegisterBlock` write/read paths stay declarative.

/// How one bitfield responds to software and hardware access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Plain read/write passthrough.
    ReadWrite,
    /// Hardware-readable; software writes have no effect.
    WriteIgnore,
    /// A written `1` clears the corresponding stored bit, `0` leaves it.
    WriteOneToClear,
    /// Reading the register clears this field's stored bits as a side effect.
    ReadClear,
    /// Stored value is driven by the hardware-facing `d` input when its
    /// enable strobe asserts; software write data is dropped.
    HwExtend,
    /// Status/constant field reflecting external state only.
    Constant,
}

impl FieldPolicy {
    /// Compute the next register word after a software write to this field.
    ///
    /// `mask` selects the writable bits: the field's mask restricted by the
    /// expanded byte-enable, so bytes outside the enable never change. Bits
    /// outside `mask` pass through from `current` unchanged.
    pub fn apply_write(self, current: u32, incoming: u32, mask: u32) -> u32 {
        let raw = incoming & mask;
        match self {
            FieldPolicy::ReadWrite | FieldPolicy::ReadClear => (current & !mask) | raw,
            FieldPolicy::WriteOneToClear => current & !raw,
            FieldPolicy::WriteIgnore | FieldPolicy::HwExtend | FieldPolicy::Constant => current,
        }
    }

    /// True if a software read of the containing register zeroes this field.
    #[inline(always)]
    pub fn clears_on_read(self) -> bool {
        matches!(self, FieldPolicy::ReadClear)
    }

    /// True if the hardware-side update strobe may drive this field. These
    /// are the fields software cannot durably own: status bits, hw-extend
    /// values, and read-clear accumulators.
    #[inline(always)]
    pub fn hw_writable(self) -> bool {
        !matches!(self, FieldPolicy::ReadWrite | FieldPolicy::WriteOneToClear)
    }
}

/// How a cross-register side effect folds the written bits into its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// OR the masked write bits into the target word.
    SetBits,
    /// Clear the masked write bits in the target word.
    ClearBits,
}

/// A declared edge from one field to another register: writing the field also
/// mutates `target` under `mask`. Mirrors hardware's "test register forces
/// status/interrupt bits" behavior. Applied after the owning register's own
/// merge, independent of the target's gate or shadow state.
#[derive(Debug, Clone, Copy)]
pub struct CrossEffect {
    /// In-block index of the register receiving the side effect.
    pub target: usize,
    /// Bits of the target the effect may touch.
    pub mask: u32,
    pub combine: Combine,
}

impl CrossEffect {
    /// Fold the byte-masked write data into the target's current word.
    pub fn apply(&self, target_word: u32, masked_write: u32) -> u32 {
        let bits = masked_write & self.mask;
        match self.combine {
            Combine::SetBits => target_word | bits,
            Combine::ClearBits => target_word & !bits,
        }
    }
}

/// One bitfield within a register: position, width, policy, and an optional
/// cross-register effect triggered by writes that reach this field.
#[derive(Debug, Clone)]
pub struct FieldDesc {
    pub bit_offset: u32,
    pub bit_width: u32,
    pub policy: FieldPolicy,
    pub cross: Option<CrossEffect>,
}

impl FieldDesc {
    pub fn new(bit_offset: u32, bit_width: u32, policy: FieldPolicy) -> Self {
        Self {
            bit_offset,
            bit_width,
            policy,
            cross: None,
        }
    }

    pub fn with_cross(mut self, target: usize, mask: u32, combine: Combine) -> Self {
        self.cross = Some(CrossEffect {
            target,
            mask,
            combine,
        });
        self
    }

    /// Bitmask selecting this field within its register word.
    #[inline(always)]
    pub fn mask(&self) -> u32 {
        if self.bit_width >= 32 {
            u32::MAX
        } else {
            ((1u32 << self.bit_width) - 1) << self.bit_offset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_overwrites_only_field_bits() {
        let next = FieldPolicy::ReadWrite.apply_write(0xFFFF_0000, 0x0000_00AB, 0x0000_00FF);
        assert_eq!(
            next, 0xFFFF_00AB,
            "field bits take the write, other bits pass through"
        );
    }

    #[test]
    fn write_one_to_clear_clears_set_bits_only() {
        let mask = 1 << 2;
        let next = FieldPolicy::WriteOneToClear.apply_write(0b100, 0b100, mask);
        assert_eq!(next, 0, "writing 1 to a set W1C bit clears it");
        let noop = FieldPolicy::WriteOneToClear.apply_write(0b100, 0b010, mask);
        assert_eq!(noop, 0b100, "a 0 (or out-of-field) write bit is a no-op");
    }

    #[test]
    fn write_ignore_and_hw_fields_drop_software_writes() {
        for policy in [
            FieldPolicy::WriteIgnore,
            FieldPolicy::HwExtend,
            FieldPolicy::Constant,
        ] {
            let next = policy.apply_write(0x1234_5678, 0xFFFF_FFFF, 0x0000_FF00);
            assert_eq!(
                next, 0x1234_5678,
                "{policy:?} must not react to software data"
            );
        }
    }

    #[test]
    fn field_mask_covers_full_width() {
        let full = FieldDesc::new(0, 32, FieldPolicy::ReadWrite);
        assert_eq!(full.mask(), u32::MAX, "32-bit field spans the whole word");
        let narrow = FieldDesc::new(8, 2, FieldPolicy::ReadWrite);
        assert_eq!(narrow.mask(), 0b11 << 8, "narrow field mask is positioned");
    }

    #[test]
    fn cross_effect_combines_under_mask() {
        let set = CrossEffect {
            target: 0,
            mask: 0x1FF,
            combine: Combine::SetBits,
        };
        assert_eq!(
            set.apply(0b0001, 0b1010),
            0b1011,
            "set-bits ORs the masked write into the target"
        );
        let clear = CrossEffect {
            target: 0,
            mask: 0x0F,
            combine: Combine::ClearBits,
        };
        assert_eq!(
            clear.apply(0b1111, 0b0101),
            0b1010,
            "clear-bits knocks out the masked write bits"
        );
    }
}
