pub mod adapter;
pub mod decoder;
pub mod error;
pub mod lanes;

pub use adapter::{AdapterConfig, BusAdapter, BusStatus, Response, Transaction};
pub use decoder::{AccessWidth, AddressMap, MapError, MapResult, SubInterface, Target};
pub use error::{AccessError, AccessResult};
pub use lanes::LaneMask;
