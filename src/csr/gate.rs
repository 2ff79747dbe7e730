//! Write-enable gating: a register may declare that writes only take effect
//! while a companion lock register holds a specific unlock token. The gate is
//! evaluated against the companion's current stored word at write time, never
//! a cached copy, and a closed gate silently drops the write.

/// Declares the companion register and the token sub-field that must match
/// for writes to the guarded register to take effect.
#[derive(Debug, Clone, Copy)]
pub struct GateDesc {
    /// In-block index of the companion lock register.
    pub companion: usize,
    /// Bit offset of the token sub-field within the companion word.
    pub bit_offset: u32,
    /// Width in bits of the token sub-field.
    pub token_width: u32,
    /// Exact value that means "unlocked". A narrow encoded token, not a
    /// bitmask; any other value keeps the gate closed.
    pub unlock_token: u32,
}

impl GateDesc {
    pub fn new(companion: usize, bit_offset: u32, token_width: u32, unlock_token: u32) -> Self {
        Self {
            companion,
            bit_offset,
            token_width,
            unlock_token,
        }
    }

    /// Extract the token sub-field from the companion's current word and
    /// compare it for exact equality with the unlock token.
    pub fn is_open(&self, companion_word: u32) -> bool {
        let width_mask = if self.token_width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.token_width) - 1
        };
        ((companion_word >> self.bit_offset) & width_mask) == self.unlock_token
    }
}
