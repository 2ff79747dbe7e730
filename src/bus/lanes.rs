//! Byte-enable lane masks. A lane mask carries one bit per byte lane of the
//! 32-bit data path; expanding it gives the full-width byte mask the write
//! path merges under.
use bitflags::bitflags;

bitflags! {
    /// One bit per byte lane of a word transfer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LaneMask: u8 {
        const LANE0 = 0b0001;
        const LANE1 = 0b0010;
        const LANE2 = 0b0100;
        const LANE3 = 0b1000;
        const ALL   = 0b1111;
    }
}

impl LaneMask {
    /// Lanes covered by a `len`-byte transfer starting at byte `shift`
    /// within the word. `len` must be 1, 2, or 4 and the pair in-bounds.
    pub fn for_transfer(shift: usize, len: usize) -> Self {
        let bits = (((1u16 << len) - 1) << shift) as u8;
        LaneMask::from_bits_truncate(bits)
    }

    /// Expand the per-lane bits into a 32-bit byte mask.
    pub fn byte_mask(self) -> u32 {
        let mut mask = 0u32;
        for lane in 0..4 {
            if self.bits() & (1 << lane) != 0 {
                mask |= 0xFF << (8 * lane);
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_covers_enabled_lanes_only() {
        assert_eq!(LaneMask::ALL.byte_mask(), 0xFFFF_FFFF);
        assert_eq!(LaneMask::LANE0.byte_mask(), 0x0000_00FF);
        assert_eq!(
            (LaneMask::LANE1 | LaneMask::LANE3).byte_mask(),
            0xFF00_FF00,
            "non-contiguous lanes expand independently"
        );
        assert_eq!(LaneMask::empty().byte_mask(), 0);
    }

    #[test]
    fn transfer_lanes_follow_offset_and_length() {
        assert_eq!(LaneMask::for_transfer(0, 4), LaneMask::ALL);
        assert_eq!(LaneMask::for_transfer(2, 2), LaneMask::LANE2 | LaneMask::LANE3);
        assert_eq!(LaneMask::for_transfer(1, 1), LaneMask::LANE1);
    }
}
