//! The register block proper: flat word storage plus the orchestration that
//! turns "apply this write" / "produce this read" into gate checks, shadow
//! staging, per-field policy transforms, and cross-register side effects.
//! One block backs one sub-interface and is exclusively owned by it; the
//! engine performs no internal locking, so hosts with concurrent bus masters
//! must serialize access externally.
use crate::bus::lanes::LaneMask;

use super::layout::RegisterLayout;
use super::racl::{AccessTable, Direction};
use super::shadow::{ShadowOutcome, ShadowState};

/// Storage and access engine for one peripheral sub-interface.
#[derive(Debug)]
pub struct RegisterBlock {
    layout: RegisterLayout,
    regs: Vec<u32>,
    shadow: Vec<ShadowState>,
    access: AccessTable,
}

impl RegisterBlock {
    pub fn new(layout: RegisterLayout) -> Self {
        let count = layout.len();
        let mut block = Self {
            layout,
            regs: vec![0; count],
            shadow: vec![ShadowState::default(); count],
            access: AccessTable::new(count),
        };
        block.reset();
        block
    }

    /// Restore declared reset values, clear all shadow staging, and reopen
    /// the access-control table.
    pub fn reset(&mut self) {
        for (word, desc) in self.regs.iter_mut().zip(self.layout.registers()) {
            *word = desc.reset_value;
        }
        for state in &mut self.shadow {
            state.reset();
        }
        self.access.reset();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    #[inline(always)]
    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Side-effect-free view of one stored word. Verification code uses this
    /// where `produce_read` would disturb read-clear or shadow state.
    #[inline(always)]
    pub fn peek(&self, index: usize) -> u32 {
        self.regs[index]
    }

    /// Apply one software write. The caller must have decoded `index`
    /// successfully; gate denial, shadow staging, and policy-ignored fields
    /// are all defined no-ops, so this never fails.
    pub fn apply_write(&mut self, index: usize, wdata: u32, lanes: LaneMask) {
        debug_assert!(index < self.regs.len(), "write index must be pre-decoded");
        let byte_mask = lanes.byte_mask();
        let incoming = wdata & byte_mask;

        let desc = self.layout.register(index);

        // Gate check against the companion's *current* stored word.
        if let Some(gate) = &desc.gate {
            if !gate.is_open(self.regs[gate.companion]) {
                return;
            }
        }

        // Shadow staging; only a confirmed second write reaches the fields,
        // and it carries the staged word as the effective write data.
        let effective = if desc.shadowed {
            match self.shadow[index].offer(incoming) {
                ShadowOutcome::Commit(staged) => staged,
                ShadowOutcome::Staged | ShadowOutcome::Discarded => return,
            }
        } else {
            incoming
        };

        let mut word = self.regs[index];
        for field in &desc.fields {
            // Bytes outside the enable never change, so the writable mask is
            // the field mask restricted by the expanded byte-enable.
            word = field
                .policy
                .apply_write(word, effective, field.mask() & byte_mask);
        }
        self.regs[index] = word;

        // Declared cross-register effects fire after the merge and ignore
        // the target's own gate/shadow protections.
        for field in &desc.fields {
            if let Some(cross) = &field.cross {
                let target = cross.target;
                self.regs[target] = cross.apply(self.regs[target], effective);
            }
        }
    }

    /// Produce one software read. The returned word is captured before any
    /// side effect: read-clear fields are then zeroed in storage per field
    /// mask, and a shadowed register's staging phase rearms. Gates are never
    /// consulted on reads.
    pub fn produce_read(&mut self, index: usize) -> u32 {
        debug_assert!(index < self.regs.len(), "read index must be pre-decoded");
        let rdata = self.regs[index];

        let desc = self.layout.register(index);
        let mut word = rdata;
        for field in &desc.fields {
            if field.policy.clears_on_read() {
                word &= !field.mask();
            }
        }
        self.regs[index] = word;

        if desc.shadowed {
            self.shadow[index].note_read();
        }

        rdata
    }

    /// Hardware-side update strobe: drive the bits of fields the hardware
    /// owns (hw-extend, constant/status, write-ignore, read-clear) from
    /// `value`, bypassing software write policy. Software-owned fields are
    /// untouched.
    pub fn hw_update(&mut self, index: usize, value: u32) {
        debug_assert!(index < self.regs.len(), "hw update index must exist");
        let desc = self.layout.register(index);
        let mut word = self.regs[index];
        for field in &desc.fields {
            if field.policy.hw_writable() {
                let mask = field.mask();
                word = (word & !mask) | (value & mask);
            }
        }
        self.regs[index] = word;
    }

    /// Role-based allow/deny lookup for one register and direction.
    #[inline(always)]
    pub fn check_access(&self, index: usize, direction: Direction) -> bool {
        self.access.check(index, direction)
    }

    /// Configure both directions' permissions for one register atomically.
    /// Returns false when the index is beyond this block.
    pub fn set_register_policy(&mut self, index: usize, allow_read: bool, allow_write: bool) -> bool {
        self.access.set_policy(index, allow_read, allow_write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csr::field::{Combine, FieldDesc, FieldPolicy};
    use crate::csr::gate::GateDesc;
    use crate::csr::layout::RegisterDesc;
    use crate::csr::shadow::ShadowPhase;

    // A compact block exercising every policy kind:
    //   0 INTR_STATE  w1c[8:0], with hw-set via INTR_TEST
    //   1 INTR_ENABLE rw[8:0]
    //   2 INTR_TEST   rw[8:0] -> sets INTR_STATE bits
    //   3 REGWEN      rw[0:0] lock token
    //   4 CFG         rw[7:0], gated by REGWEN == 1, shadowed
    //   5 STATUS      write-ignore[7:0], hw-extend[23:16]
    //   6 ERR_CODE    read-clear[15:0], rw[31:24]
    fn sample_block() -> RegisterBlock {
        let layout = RegisterLayout::new(vec![
            RegisterDesc::new("INTR_STATE", 0x0)
                .field(FieldDesc::new(0, 9, FieldPolicy::WriteOneToClear)),
            RegisterDesc::new("INTR_ENABLE", 0x4)
                .field(FieldDesc::new(0, 9, FieldPolicy::ReadWrite)),
            RegisterDesc::new("INTR_TEST", 0x8).field(
                FieldDesc::new(0, 9, FieldPolicy::ReadWrite)
                    .with_cross(0, 0x1FF, Combine::SetBits),
            ),
            RegisterDesc::new("REGWEN", 0xC)
                .reset_value(1)
                .field(FieldDesc::new(0, 1, FieldPolicy::ReadWrite)),
            RegisterDesc::new("CFG", 0x10)
                .field(FieldDesc::new(0, 8, FieldPolicy::ReadWrite))
                .gated_by(GateDesc::new(3, 0, 1, 1))
                .shadowed(),
            RegisterDesc::new("STATUS", 0x14)
                .field(FieldDesc::new(0, 8, FieldPolicy::WriteIgnore))
                .field(FieldDesc::new(16, 8, FieldPolicy::HwExtend)),
            RegisterDesc::new("ERR_CODE", 0x18)
                .field(FieldDesc::new(0, 16, FieldPolicy::ReadClear))
                .field(FieldDesc::new(24, 8, FieldPolicy::ReadWrite)),
        ])
        .expect("sample layout should validate");
        RegisterBlock::new(layout)
    }

    #[test]
    fn write_one_to_clear_status_bit() {
        let mut block = sample_block();
        block.hw_update(0, 0); // no-op, INTR_STATE has no hw fields
        // Seed bit 2 through the declared INTR_TEST edge.
        block.apply_write(2, 0b100, LaneMask::ALL);
        assert_eq!(block.peek(0), 0b100, "test write forces the status bit");
        block.apply_write(0, 0b100, LaneMask::ALL);
        assert_eq!(block.peek(0), 0, "writing 1 clears the stored bit");
        block.apply_write(2, 0b100, LaneMask::ALL);
        block.apply_write(0, 0b010, LaneMask::ALL);
        assert_eq!(block.peek(0), 0b100, "writing 0 to bit 2 is a no-op");
    }

    #[test]
    fn write_ignore_fields_never_change() {
        let mut block = sample_block();
        block.hw_update(5, 0x00AB_0000);
        for junk in [0u32, 0xFFFF_FFFF, 0x1234_5678] {
            block.apply_write(5, junk, LaneMask::ALL);
            assert_eq!(
                block.produce_read(5),
                0x00AB_0000,
                "software writes must not disturb status fields"
            );
        }
    }

    #[test]
    fn byte_enable_restricts_the_merge() {
        let mut block = sample_block();
        block.apply_write(1, 0x0000_01FF, LaneMask::ALL);
        // Lane 1 only: bits [15:8] of the data are live, the rest ignored.
        block.apply_write(1, 0x0000_0000, LaneMask::LANE1);
        assert_eq!(
            block.peek(1),
            0x0000_00FF,
            "disabled lanes keep their previous bytes"
        );
    }

    #[test]
    fn gate_denial_silently_drops_the_write() {
        let mut block = sample_block();
        block.apply_write(3, 0, LaneMask::ALL); // lock
        block.apply_write(4, 0x5A, LaneMask::ALL);
        block.apply_write(4, 0x5A, LaneMask::ALL);
        assert_eq!(block.peek(4), 0, "locked register never commits");
        block.apply_write(3, 1, LaneMask::ALL); // unlock
        block.apply_write(4, 0x5A, LaneMask::ALL);
        block.apply_write(4, 0x5A, LaneMask::ALL);
        assert_eq!(block.peek(4), 0x5A, "unlocked shadow write commits");
    }

    #[test]
    fn gate_uses_current_companion_value() {
        let mut block = sample_block();
        block.apply_write(4, 0x11, LaneMask::ALL); // staged while unlocked
        block.apply_write(3, 0, LaneMask::ALL); // lock between the two writes
        block.apply_write(4, 0x11, LaneMask::ALL);
        assert_eq!(
            block.peek(4),
            0,
            "confirm write re-evaluates the gate at its own time"
        );
    }

    #[test]
    fn shadow_single_write_does_not_commit() {
        let mut block = sample_block();
        block.apply_write(4, 0x77, LaneMask::ALL);
        assert_eq!(block.peek(4), 0, "first write only stages");
    }

    #[test]
    fn shadow_mismatch_discards_and_restarts() {
        let mut block = sample_block();
        block.apply_write(4, 0x11, LaneMask::ALL);
        block.apply_write(4, 0x22, LaneMask::ALL);
        assert_eq!(block.peek(4), 0, "mismatched confirm commits nothing");
        // Third write is a fresh first write.
        block.apply_write(4, 0x33, LaneMask::ALL);
        assert_eq!(block.peek(4), 0, "restarted protocol stages again");
        block.apply_write(4, 0x33, LaneMask::ALL);
        assert_eq!(block.peek(4), 0x33, "matched confirm commits");
    }

    #[test]
    fn shadow_read_rearms_the_phase() {
        let mut block = sample_block();
        block.apply_write(4, 0x44, LaneMask::ALL);
        let _ = block.produce_read(4);
        assert_eq!(block.shadow[4].phase(), ShadowPhase::AwaitingFirst);
        block.apply_write(4, 0x44, LaneMask::ALL);
        assert_eq!(block.peek(4), 0, "post-read write stages instead of confirming");
    }

    #[test]
    fn read_clear_returns_then_zeroes_per_field() {
        let mut block = sample_block();
        block.hw_update(6, 0xBEEF);
        block.apply_write(6, 0x5500_0000, LaneMask::ALL);
        let first = block.produce_read(6);
        assert_eq!(first, 0x5500_BEEF, "read returns the pre-clear value");
        let second = block.produce_read(6);
        assert_eq!(
            second, 0x5500_0000,
            "only the read-clear field is zeroed; the rw neighbor survives"
        );
    }

    #[test]
    fn reset_restores_declared_values_and_state() {
        let mut block = sample_block();
        block.apply_write(1, 0x1FF, LaneMask::ALL);
        block.apply_write(4, 0x5A, LaneMask::ALL); // leaves shadow armed
        block.set_register_policy(1, false, false);
        block.reset();
        assert_eq!(block.peek(1), 0, "storage back to reset values");
        assert_eq!(block.peek(3), 1, "nonzero declared reset value restored");
        assert_eq!(block.shadow[4].phase(), ShadowPhase::AwaitingFirst);
        assert!(block.check_access(1, Direction::Read), "racl reopened");
        assert!(block.check_access(1, Direction::Write), "racl reopened");
    }
}
