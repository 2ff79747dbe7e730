use std::{error::Error, fmt};

use crate::csr::Direction;

pub type AccessResult<T> = Result<T, AccessError>;

/// Everything that can go wrong for one bus transaction. Gate-denied writes,
/// shadow mismatches, and writes to ignore/constant fields are defined
/// no-ops and never appear here.
#[derive(Debug)]
pub enum AccessError {
    /// Address outside every configured span, or decoded index beyond the
    /// sub-interface's register count (sparse windows).
    Decode { address: u32 },
    /// Transfer size or alignment illegal for the targeted sub-interface.
    Alignment { address: u32, len: usize },
    /// Access-control table denies this direction for the register.
    Denied { address: u32, direction: Direction },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::Decode { address } => {
                write!(f, "address 0x{address:08X} does not decode to a register")
            }
            AccessError::Alignment { address, len } => write!(
                f,
                "{len}-byte transfer at 0x{address:08X} violates size/alignment rules"
            ),
            AccessError::Denied { address, direction } => {
                let dir = match direction {
                    Direction::Read => "read",
                    Direction::Write => "write",
                };
                write!(f, "{dir} of 0x{address:08X} denied by access policy")
            }
        }
    }
}

impl Error for AccessError {}
