//! Role-based access filtering: a per-register, per-direction allow/deny
//! table, defaulting to all-allowed. Orthogonal to write-enable gates; both
//! must pass for a write to land. The table resets to all-allowed on block
//! reset regardless of prior configuration.

/// Which way a bus transaction moves data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// Per-register read/write permission table.
#[derive(Debug, Clone)]
pub struct AccessTable {
    allow_read: Vec<bool>,
    allow_write: Vec<bool>,
}

impl AccessTable {
    pub fn new(register_count: usize) -> Self {
        Self {
            allow_read: vec![true; register_count],
            allow_write: vec![true; register_count],
        }
    }

    /// Look up the permission for one register in one direction. Indexes
    /// beyond the table (sparse windows) are always allowed.
    pub fn check(&self, index: usize, direction: Direction) -> bool {
        let table = match direction {
            Direction::Read => &self.allow_read,
            Direction::Write => &self.allow_write,
        };
        table.get(index).copied().unwrap_or(true)
    }

    /// Set both directions' flags for one register atomically. Out-of-range
    /// indexes are ignored so a cascade across sub-interfaces can probe.
    pub fn set_policy(&mut self, index: usize, allow_read: bool, allow_write: bool) -> bool {
        if index >= self.allow_read.len() {
            return false;
        }
        self.allow_read[index] = allow_read;
        self.allow_write[index] = allow_write;
        true
    }

    /// Restore every entry to allowed.
    pub fn reset(&mut self) {
        self.allow_read.fill(true);
        self.allow_write.fill(true);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.allow_read.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.allow_read.is_empty()
    }
}
