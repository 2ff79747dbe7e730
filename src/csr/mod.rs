pub mod block;
pub mod field;
pub mod gate;
pub mod layout;
pub mod racl;
pub mod shadow;

pub use block::RegisterBlock;
pub use field::{Combine, CrossEffect, FieldDesc, FieldPolicy};
pub use gate::GateDesc;
pub use layout::{LayoutError, LayoutResult, RegisterDesc, RegisterLayout, WORD_BYTES};
pub use racl::{AccessTable, Direction};
pub use shadow::{ShadowOutcome, ShadowPhase, ShadowState};
