//! Address legality policy for the sparse store.

use thiserror::Error;

/// Raised when the bounds policy rejects an access range.
///
/// Carries the full rejected range so callers can report the faulting access
/// precisely; inside the engine it only ever surfaces as an `ADR` status
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("access of {len} byte(s) at {addr:#x} rejected by bounds policy")]
pub struct AccessViolation {
    /// Signed start address of the rejected access.
    pub addr: i64,
    /// Length of the rejected access in bytes.
    pub len: u64,
}

/// Legality policy applied to every memory access.
///
/// Addresses are signed: a negative address is illegal under either variant.
/// The bounded variant additionally rejects any access whose final byte lies
/// above the inclusive `upper` address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BoundsPolicy {
    /// Any non-negative address is legal.
    #[default]
    Unbounded,
    /// Non-negative addresses up to and including `upper` are legal.
    Bounded {
        /// Inclusive upper address.
        upper: u64,
    },
}

impl BoundsPolicy {
    /// Validates the range `[addr, addr + len - 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessViolation`] when `addr` is negative or, under
    /// [`BoundsPolicy::Bounded`], when the range ends above `upper`.
    #[allow(clippy::cast_sign_loss)]
    pub const fn check(self, addr: i64, len: u64) -> Result<(), AccessViolation> {
        if addr < 0 {
            return Err(AccessViolation { addr, len });
        }
        match self {
            Self::Unbounded => Ok(()),
            Self::Bounded { upper } => {
                if (addr as u64) + len - 1 <= upper {
                    Ok(())
                } else {
                    Err(AccessViolation { addr, len })
                }
            }
        }
    }
}
