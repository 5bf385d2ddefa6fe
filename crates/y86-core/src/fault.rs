use thiserror::Error;

use crate::memory::AccessViolation;
use crate::state::Status;

/// Fault raised by the decode or execute pipeline of a single step.
///
/// Faults are plumbed between phases with `Result` but never escape the
/// engine as Rust errors: the step driver converts them into the sticky
/// [`Status`] transition the trace reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Fault {
    /// A fetch, operand, or stack access was rejected.
    #[error("bad address: {0}")]
    BadAddress(#[from] AccessViolation),
    /// The opcode nibble is unassigned, or an `opq` function nibble is
    /// outside the defined four.
    #[error("illegal instruction encoding")]
    IllegalInstruction,
}

impl Fault {
    /// Maps this fault onto the machine status it latches.
    #[must_use]
    pub const fn status(self) -> Status {
        match self {
            Self::BadAddress(_) => Status::Adr,
            Self::IllegalInstruction => Status::Ins,
        }
    }
}
