//! A generic, data-driven model of a hardware configuration-and-status
//! register (CSR) block. One engine, parameterized by declarative register
//! and field descriptor tables, reproduces the software-visible read/write
//! side effects a real register file exhibits: write-ignore,
//! write-one-to-clear, read-to-clear, hardware-extend gating, register
//! write-enable locks, shadowed double-write commit, and role-based access
//! filtering.
//!
//! Layering, leaves first: field policies and descriptors (`csr::field`,
//! `csr::layout`), the gate/shadow/access helpers (`csr::gate`,
//! `csr::shadow`, `csr::racl`), the storage-owning `csr::RegisterBlock`,
//! and the bus-facing surface (`bus::AddressMap`, `bus::BusAdapter`) that
//! turns inbound transactions into decoded block calls and response
//! statuses.
//!
//! The engine maintains only the software-visible mirror of register state
//! and its access policy. It is single-threaded and synchronous; hosts with
//! concurrent bus masters must wrap it in external mutual exclusion.

pub mod bus;
pub mod csr;

pub use bus::{
    AccessError, AccessResult, AccessWidth, AdapterConfig, AddressMap, BusAdapter, BusStatus,
    LaneMask, Response, SubInterface, Transaction,
};
pub use csr::{
    Combine, Direction, FieldDesc, FieldPolicy, GateDesc, LayoutError, RegisterBlock,
    RegisterDesc, RegisterLayout, WORD_BYTES,
};
