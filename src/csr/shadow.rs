//! Two-phase staged-write protocol for shadow-protected registers. A shadow
//! register only commits after two consecutive identical writes, guarding
//! security-sensitive configuration against single-upset corruption. Any
//! software read of the register drops the protocol back to its first phase.

/// Where the staged-write protocol currently stands for one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowPhase {
    /// No write staged; the next write arms the protocol.
    #[default]
    AwaitingFirst,
    /// A first write is staged; a matching second write commits it.
    AwaitingConfirm,
}

/// What a staged write attempt resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowOutcome {
    /// First write captured verbatim; nothing committed.
    Staged,
    /// Second write matched the stage; commit with the carried word.
    Commit(u32),
    /// Second write mismatched; stage discarded, phase rearmed.
    Discarded,
}

/// Per-register staging buffer plus phase flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowState {
    stage: u32,
    phase: ShadowPhase,
}

impl ShadowState {
    /// Drive one byte-masked write through the protocol. Only a confirming
    /// write that exactly matches the staged word yields a commit.
    pub fn offer(&mut self, masked_word: u32) -> ShadowOutcome {
        match self.phase {
            ShadowPhase::AwaitingFirst => {
                self.stage = masked_word;
                self.phase = ShadowPhase::AwaitingConfirm;
                ShadowOutcome::Staged
            }
            ShadowPhase::AwaitingConfirm => {
                self.phase = ShadowPhase::AwaitingFirst;
                if masked_word == self.stage {
                    ShadowOutcome::Commit(self.stage)
                } else {
                    self.stage = 0;
                    ShadowOutcome::Discarded
                }
            }
        }
    }

    /// A software read of the register rearms the protocol. This happens on
    /// every read, diagnostic polling included.
    pub fn note_read(&mut self) {
        self.phase = ShadowPhase::AwaitingFirst;
    }

    pub fn reset(&mut self) {
        self.stage = 0;
        self.phase = ShadowPhase::AwaitingFirst;
    }

    #[inline(always)]
    pub fn phase(&self) -> ShadowPhase {
        self.phase
    }
}
