//! Bus-facing transaction surface. The adapter accepts one transaction at a
//! time, validates transfer size and alignment for the addressed
//! sub-interface, runs the access-control check, then dispatches into the
//! decoded `RegisterBlock`. Processing is fully synchronous: a transaction
//! always completes with a definite status before the next is accepted.
use crate::csr::{Direction, WORD_BYTES};

use super::decoder::{AccessWidth, AddressMap, Target};
use super::error::{AccessError, AccessResult};
use super::lanes::LaneMask;

/// Completion status reported back to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusStatus {
    Ok,
    /// Illegal size/alignment, or an access denial configured to error.
    CommandError,
    /// No register decodes at the transaction address.
    AddressError,
}

/// One inbound bus transfer. Ephemeral: built by the bus, consumed by the
/// adapter, never retained. `data` holds the transfer's `len` bytes in bus
/// order (little endian within the word).
#[derive(Debug, Clone, Copy)]
pub struct Transaction {
    pub address: u32,
    pub direction: Direction,
    pub data: [u8; 4],
    pub len: usize,
    pub byte_enable: Option<LaneMask>,
}

impl Transaction {
    pub fn write(address: u32, payload: &[u8]) -> Self {
        let mut data = [0u8; 4];
        let len = payload.len().min(4);
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            address,
            direction: Direction::Write,
            data,
            len,
            byte_enable: None,
        }
    }

    pub fn write_word(address: u32, word: u32) -> Self {
        Self::write(address, &word.to_le_bytes())
    }

    pub fn read(address: u32, len: usize) -> Self {
        Self {
            address,
            direction: Direction::Read,
            data: [0; 4],
            len,
            byte_enable: None,
        }
    }

    pub fn with_byte_enable(mut self, lanes: LaneMask) -> Self {
        self.byte_enable = Some(lanes);
        self
    }
}

/// Transaction outcome: status plus, for reads, the returned bytes.
#[derive(Debug, Clone, Copy)]
pub struct Response {
    pub status: BusStatus,
    pub data: [u8; 4],
}

impl Response {
    fn status_only(status: BusStatus) -> Self {
        Self {
            status,
            data: [0; 4],
        }
    }

    /// The response payload as a little-endian word.
    #[inline(always)]
    pub fn word(&self) -> u32 {
        u32::from_le_bytes(self.data)
    }
}

/// Deployment-time switches, fixed at construction. The setter façade on
/// the adapter covers hosts that reconfigure between test phases.
#[derive(Debug, Clone, Copy)]
pub struct AdapterConfig {
    /// Master switch for role-based access filtering.
    pub racl_enabled: bool,
    /// When set, a denied access completes with a command error instead of
    /// a silently successful no-op.
    pub deny_is_error: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            racl_enabled: false,
            deny_is_error: false,
        }
    }
}

/// Translates bus transactions into decoder and register-block calls.
pub struct BusAdapter {
    map: AddressMap,
    config: AdapterConfig,
}

impl BusAdapter {
    pub fn new(map: AddressMap, config: AdapterConfig) -> Self {
        Self { map, config }
    }

    pub fn with_defaults(map: AddressMap) -> Self {
        Self::new(map, AdapterConfig::default())
    }

    /// Process one transaction to completion. Every outcome is a definite
    /// status; nothing here blocks, queues, or suspends.
    pub fn transact(&mut self, txn: &Transaction) -> Response {
        match self.try_transact(txn) {
            Ok(response) => response,
            Err(ref err) => Response::status_only(BusStatus::from(err)),
        }
    }

    fn try_transact(&mut self, txn: &Transaction) -> AccessResult<Response> {
        // Universal transfer legality: power-of-two length up to a word,
        // aligned to its own size. Checked before decode, so a bad transfer
        // to an unmapped address still reports the command error.
        if !matches!(txn.len, 1 | 2 | 4) || txn.address as usize % txn.len != 0 {
            return Err(AccessError::Alignment {
                address: txn.address,
                len: txn.len,
            });
        }

        let word_addr = txn.address & !(WORD_BYTES - 1);
        let iface_pos = self
            .find_interface(word_addr)
            .ok_or(AccessError::Decode {
                address: txn.address,
            })?;

        if self.map.interface(iface_pos).width == AccessWidth::WordOnly
            && txn.len != WORD_BYTES as usize
        {
            return Err(AccessError::Alignment {
                address: txn.address,
                len: txn.len,
            });
        }

        // Access filtering runs before index validation, as the bus fabric
        // would filter before the peripheral decodes.
        if self.config.racl_enabled {
            let iface = self.map.interface(iface_pos);
            let index = ((word_addr - iface.base) / WORD_BYTES) as usize;
            if !iface.block.check_access(index, txn.direction) {
                if self.config.deny_is_error {
                    return Err(AccessError::Denied {
                        address: txn.address,
                        direction: txn.direction,
                    });
                }
                // Silently successful no-op: software cannot observe the
                // denial except by reading back state.
                return Ok(Response::status_only(BusStatus::Ok));
            }
        }

        let target = self.map.decode(word_addr)?;

        match txn.direction {
            Direction::Write => {
                self.dispatch_write(target, txn);
                Ok(Response::status_only(BusStatus::Ok))
            }
            Direction::Read => Ok(self.dispatch_read(target, txn)),
        }
    }

    fn dispatch_write(&mut self, target: Target, txn: &Transaction) {
        let shift = (txn.address % WORD_BYTES) as usize;
        let mut word_bytes = [0u8; 4];
        word_bytes[shift..shift + txn.len].copy_from_slice(&txn.data[..txn.len]);
        let wdata = u32::from_le_bytes(word_bytes);

        let natural = LaneMask::for_transfer(shift, txn.len);
        let lanes = match txn.byte_enable {
            // An explicit byte-enable can only narrow the transfer.
            Some(explicit) => explicit & natural,
            None => natural,
        };

        let iface = self.map.interface_mut(target.interface);
        iface.block.apply_write(target.index, wdata, lanes);
    }

    fn dispatch_read(&mut self, target: Target, txn: &Transaction) -> Response {
        let iface = self.map.interface_mut(target.interface);
        let word = iface.block.produce_read(target.index);

        let shift = (txn.address % WORD_BYTES) as usize;
        let mut data = [0u8; 4];
        data[..txn.len].copy_from_slice(&word.to_le_bytes()[shift..shift + txn.len]);
        Response {
            status: BusStatus::Ok,
            data,
        }
    }

    /// Verification convenience: a full-word predicted write that bypasses
    /// transfer validation and access control but not field policy.
    pub fn predict_write(&mut self, address: u32, word: u32) -> AccessResult<()> {
        let target = self.map.decode(address)?;
        let iface = self.map.interface_mut(target.interface);
        iface.block.apply_write(target.index, word, LaneMask::ALL);
        Ok(())
    }

    /// Verification convenience: a full-word read with normal read side
    /// effects, bypassing transfer validation and access control.
    pub fn read(&mut self, address: u32) -> AccessResult<u32> {
        let target = self.map.decode(address)?;
        let iface = self.map.interface_mut(target.interface);
        Ok(iface.block.produce_read(target.index))
    }

    /// Side-effect-free word inspection at an absolute address.
    pub fn peek(&self, address: u32) -> AccessResult<u32> {
        let target = self.map.decode(address)?;
        Ok(self.map.interface(target.interface).block.peek(target.index))
    }

    /// Reset every sub-interface: register values, shadow staging, and the
    /// access-control tables.
    pub fn reset(&mut self) {
        for iface in self.map.interfaces_mut() {
            iface.block.reset();
        }
    }

    pub fn set_racl_enabled(&mut self, enabled: bool) {
        self.config.racl_enabled = enabled;
    }

    pub fn set_deny_is_error(&mut self, deny_is_error: bool) {
        self.config.deny_is_error = deny_is_error;
    }

    /// Configure one register's read/write permissions. The index targets
    /// the first sub-interface with that many registers, cascading in map
    /// order the way the expanded per-peripheral models do.
    pub fn set_register_policy(&mut self, index: usize, allow_read: bool, allow_write: bool) {
        for iface in self.map.interfaces_mut() {
            if iface.block.set_register_policy(index, allow_read, allow_write) {
                return;
            }
        }
    }

    #[inline(always)]
    pub fn config(&self) -> AdapterConfig {
        self.config
    }

    #[inline(always)]
    pub fn map(&self) -> &AddressMap {
        &self.map
    }

    #[inline(always)]
    pub fn map_mut(&mut self) -> &mut AddressMap {
        &mut self.map
    }

    fn find_interface(&self, address: u32) -> Option<usize> {
        self.map
            .interfaces()
            .iter()
            .position(|iface| iface.contains(address))
    }
}

impl From<&AccessError> for BusStatus {
    fn from(err: &AccessError) -> Self {
        match err {
            AccessError::Decode { .. } => BusStatus::AddressError,
            AccessError::Alignment { .. } | AccessError::Denied { .. } => BusStatus::CommandError,
        }
    }
}
