//! Instruction fetch and decode.
//!
//! The decoder reads 1 to 10 bytes starting at the program counter and
//! produces a [`Decoded`] record, or a [`Fault`] when a read is rejected
//! (`ADR`) or the opcode nibble is unassigned (`INS`). The `ifun` nibble is
//! carried through unvalidated; `opq` checks it during execute and the
//! condition evaluator treats undefined values as false.

#![allow(clippy::cast_possible_wrap)]

use crate::encoding::{split_code_byte, split_register_byte, Icode};
use crate::fault::Fault;
use crate::memory::Memory;
use crate::state::Register;

/// Fully decoded instruction with its post-fetch program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Instruction class.
    pub icode: Icode,
    /// Function nibble, interpreted per class.
    pub ifun: u8,
    /// First register operand; `None` when absent or encoded as `0xF`.
    pub ra: Option<Register>,
    /// Second register operand; `None` when absent or encoded as `0xF`.
    pub rb: Option<Register>,
    /// 8-byte little-endian constant; zero when the class carries none.
    pub val_c: u64,
    /// Address of the next sequential instruction.
    pub val_p: u64,
}

/// Instruction decoder over the sparse store.
pub struct Decoder;

impl Decoder {
    /// Fetches and decodes the instruction at `pc`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::BadAddress`] when any byte of the encoding cannot be
    /// read, and [`Fault::IllegalInstruction`] for opcode nibbles outside
    /// `0x0..=0xB`.
    pub fn fetch(mem: &Memory, pc: u64) -> Result<Decoded, Fault> {
        let code = mem.read1(pc as i64)?;
        let (icode_bits, ifun) = split_code_byte(code);
        let icode = Icode::from_nibble(icode_bits).ok_or(Fault::IllegalInstruction)?;

        let mut cursor = pc.wrapping_add(1);

        let (ra, rb) = if icode.has_register_byte() {
            let operands = mem.read1(cursor as i64)?;
            cursor = cursor.wrapping_add(1);
            let (ra_bits, rb_bits) = split_register_byte(operands);
            (Register::from_nibble(ra_bits), Register::from_nibble(rb_bits))
        } else {
            (None, None)
        };

        let val_c = if icode.has_constant() {
            let value = mem.read8(cursor as i64)?;
            cursor = cursor.wrapping_add(8);
            value
        } else {
            0
        };

        Ok(Decoded {
            icode,
            ifun,
            ra,
            rb,
            val_c,
            val_p: cursor,
        })
    }
}
