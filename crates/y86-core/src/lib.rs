//! Sequential simulator core for the Y86-64 teaching ISA.
//!
//! The engine loads a textual object image into a sparse byte-addressable
//! memory, executes one instruction per step through a five-phase functional
//! pipeline (fetch/decode, operand read, execute, memory, write-back,
//! PC update), and emits a structured snapshot after every step. Machine
//! faults (`ADR`, `INS`) and `halt` surface exclusively as sticky status
//! transitions; no input image can make the engine panic.

/// Host-facing machine state and stepping contract.
pub mod api;
pub use api::Machine;

/// Instruction-format tables.
pub mod encoding;
pub use encoding::{split_code_byte, split_register_byte, AluFn, Icode};

/// Instruction fetch and decode.
pub mod decoder;
pub use decoder::{Decoded, Decoder};

/// Pipeline fault taxonomy.
pub mod fault;
pub use fault::Fault;

/// Five-phase executor and condition evaluator.
pub mod execute;
pub use execute::condition_holds;

/// Textual image loader.
pub mod loader;
pub use loader::{load_image, load_image_str, LoadOptions, DEFAULT_BOUND_SLACK};

/// Sparse memory and bounds policy.
pub mod memory;
pub use memory::{qword_base, AccessViolation, BoundsPolicy, Memory, QWORD_BYTES};

/// Architectural state primitives.
pub mod state;
pub use state::{CondCodes, Register, RegisterFile, Status, REGISTER_COUNT};

/// Per-step trace snapshots.
pub mod trace;
pub use trace::{CondCodeDump, RegisterDump, Snapshot};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use serde_json as _;
