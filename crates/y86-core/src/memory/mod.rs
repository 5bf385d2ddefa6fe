//! Sparse byte-addressable memory with touched-qword tracking.
//!
//! The store is a mapping from 64-bit addresses to bytes; unmapped bytes read
//! as zero once the bounds policy has admitted the access. Every written byte
//! records its 8-byte-aligned base in a touched set, which bounds the memory
//! portion of trace snapshots without scanning the whole map.

/// Address legality policy and its rejection error.
pub mod bounds;

pub use bounds::{AccessViolation, BoundsPolicy};

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Width in bytes of a quadword access.
pub const QWORD_BYTES: u64 = 8;

/// Returns the 8-byte-aligned base of the block containing `addr`.
#[must_use]
pub const fn qword_base(addr: u64) -> u64 {
    addr & !(QWORD_BYTES - 1)
}

/// Sparse byte store behind a [`BoundsPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Memory {
    bytes: HashMap<u64, u8>,
    touched: BTreeSet<u64>,
    bounds: BoundsPolicy,
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
impl Memory {
    /// Creates an empty store governed by `bounds`.
    #[must_use]
    pub fn new(bounds: BoundsPolicy) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Returns the active bounds policy.
    #[must_use]
    pub const fn bounds(&self) -> BoundsPolicy {
        self.bounds
    }

    /// Replaces the bounds policy. Existing contents are unaffected.
    pub const fn set_bounds(&mut self, bounds: BoundsPolicy) {
        self.bounds = bounds;
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`AccessViolation`] when the bounds policy rejects `[addr]`.
    pub fn read1(&self, addr: i64) -> Result<u8, AccessViolation> {
        self.bounds.check(addr, 1)?;
        Ok(self.peek1(addr as u64))
    }

    /// Writes one byte and records its touched qword.
    ///
    /// # Errors
    ///
    /// Returns [`AccessViolation`] when the bounds policy rejects `[addr]`.
    pub fn write1(&mut self, addr: i64, value: u8) -> Result<(), AccessViolation> {
        self.bounds.check(addr, 1)?;
        self.store(addr as u64, value);
        Ok(())
    }

    /// Reads a little-endian quadword.
    ///
    /// # Errors
    ///
    /// Returns [`AccessViolation`] when the bounds policy rejects any byte of
    /// `[addr, addr + 7]`.
    pub fn read8(&self, addr: i64) -> Result<u64, AccessViolation> {
        self.bounds.check(addr, QWORD_BYTES)?;
        Ok(self.peek8(addr as u64))
    }

    /// Writes a little-endian quadword.
    ///
    /// The full range is checked before the first byte is stored, so a
    /// rejected write leaves no partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AccessViolation`] when the bounds policy rejects any byte of
    /// `[addr, addr + 7]`.
    pub fn write8(&mut self, addr: i64, value: u64) -> Result<(), AccessViolation> {
        self.bounds.check(addr, QWORD_BYTES)?;
        let base = addr as u64;
        for i in 0..QWORD_BYTES {
            self.store(base + i, (value >> (8 * i)) as u8);
        }
        Ok(())
    }

    /// Assembles the quadword at `base` without consulting the bounds policy.
    ///
    /// Trace emission uses this to project touched blocks: the dump is a
    /// read-only view and must not be able to fail.
    #[must_use]
    pub fn peek8(&self, base: u64) -> u64 {
        let mut value = 0_u64;
        for i in 0..QWORD_BYTES {
            value |= u64::from(self.peek1(base.wrapping_add(i))) << (8 * i);
        }
        value
    }

    /// Iterates the 8-byte-aligned bases of every block ever written.
    pub fn touched_qwords(&self) -> impl Iterator<Item = u64> + '_ {
        self.touched.iter().copied()
    }

    /// Projects every touched qword whose assembled value is non-zero.
    #[must_use]
    pub fn dump_nonzero_qwords(&self) -> BTreeMap<u64, i64> {
        self.touched
            .iter()
            .filter_map(|&base| {
                let value = self.peek8(base) as i64;
                (value != 0).then_some((base, value))
            })
            .collect()
    }

    fn peek1(&self, addr: u64) -> u8 {
        self.bytes.get(&addr).copied().unwrap_or(0)
    }

    fn store(&mut self, addr: u64, value: u8) {
        self.bytes.insert(addr, value);
        self.touched.insert(qword_base(addr));
    }
}
