//! Instruction-format tables: opcode classification and operand layout.
//!
//! Every instruction starts with one code byte whose high nibble selects the
//! instruction class ([`Icode`]) and whose low nibble (`ifun`) is interpreted
//! per class: ALU function for `opq`, condition function for `jxx`/`rrmovq`,
//! zero otherwise.

/// Instruction class, from the high nibble of the code byte.
///
/// Nibbles `0xC..=0xF` are unassigned and fault at decode with an `INS`
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Icode {
    /// Stop the machine.
    Halt = 0x0,
    /// Do nothing.
    Nop = 0x1,
    /// Register move, conditional when `ifun != 0`.
    Rrmovq = 0x2,
    /// Immediate-to-register move.
    Irmovq = 0x3,
    /// Register-to-memory store at `rB + valC`.
    Rmmovq = 0x4,
    /// Memory-to-register load from `rB + valC`.
    Mrmovq = 0x5,
    /// ALU operation `rB OP rA` selected by `ifun`.
    Opq = 0x6,
    /// Jump, conditional when `ifun != 0`.
    Jxx = 0x7,
    /// Push the return address and jump.
    Call = 0x8,
    /// Pop the return address and jump to it.
    Ret = 0x9,
    /// Push `rA`.
    Pushq = 0xA,
    /// Pop into `rA`.
    Popq = 0xB,
}

impl Icode {
    /// Decodes the opcode nibble; `None` for the unassigned range.
    #[must_use]
    pub const fn from_nibble(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(Self::Halt),
            0x1 => Some(Self::Nop),
            0x2 => Some(Self::Rrmovq),
            0x3 => Some(Self::Irmovq),
            0x4 => Some(Self::Rmmovq),
            0x5 => Some(Self::Mrmovq),
            0x6 => Some(Self::Opq),
            0x7 => Some(Self::Jxx),
            0x8 => Some(Self::Call),
            0x9 => Some(Self::Ret),
            0xA => Some(Self::Pushq),
            0xB => Some(Self::Popq),
            _ => None,
        }
    }

    /// Whether a register byte (`rA`/`rB` nibbles) follows the code byte.
    #[must_use]
    pub const fn has_register_byte(self) -> bool {
        matches!(
            self,
            Self::Rrmovq
                | Self::Irmovq
                | Self::Rmmovq
                | Self::Mrmovq
                | Self::Opq
                | Self::Pushq
                | Self::Popq
        )
    }

    /// Whether an 8-byte little-endian constant (`valC`) follows.
    #[must_use]
    pub const fn has_constant(self) -> bool {
        matches!(
            self,
            Self::Irmovq | Self::Rmmovq | Self::Mrmovq | Self::Jxx | Self::Call
        )
    }

    /// Total encoded length in bytes: 1, 2, 9, or 10.
    #[must_use]
    pub const fn encoded_len(self) -> u64 {
        1 + if self.has_register_byte() { 1 } else { 0 } + if self.has_constant() { 8 } else { 0 }
    }
}

/// ALU function selected by the `ifun` nibble of an `opq` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AluFn {
    /// `rB + rA`.
    Addq = 0x0,
    /// `rB - rA`.
    Subq = 0x1,
    /// `rB & rA`.
    Andq = 0x2,
    /// `rB ^ rA`.
    Xorq = 0x3,
}

impl AluFn {
    /// Decodes the `opq` function nibble; `None` faults as `INS` at execute.
    #[must_use]
    pub const fn from_nibble(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(Self::Addq),
            0x1 => Some(Self::Subq),
            0x2 => Some(Self::Andq),
            0x3 => Some(Self::Xorq),
            _ => None,
        }
    }
}

/// Splits a code byte into `(icode, ifun)` nibbles.
#[must_use]
pub const fn split_code_byte(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0xF)
}

/// Splits a register byte into `(rA, rB)` nibbles.
#[must_use]
pub const fn split_register_byte(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0xF)
}

#[cfg(test)]
mod tests {
    use super::{split_code_byte, split_register_byte, AluFn, Icode};

    #[test]
    fn opcode_nibbles_roundtrip_and_unassigned_range_rejects() {
        for bits in 0x0_u8..=0xB {
            let icode = Icode::from_nibble(bits).expect("assigned opcode");
            assert_eq!(icode as u8, bits);
        }
        for bits in 0xC_u8..=0xF {
            assert!(Icode::from_nibble(bits).is_none());
        }
    }

    #[test]
    fn encoded_lengths_match_operand_layout() {
        let expected: [(Icode, u64); 12] = [
            (Icode::Halt, 1),
            (Icode::Nop, 1),
            (Icode::Rrmovq, 2),
            (Icode::Irmovq, 10),
            (Icode::Rmmovq, 10),
            (Icode::Mrmovq, 10),
            (Icode::Opq, 2),
            (Icode::Jxx, 9),
            (Icode::Call, 9),
            (Icode::Ret, 1),
            (Icode::Pushq, 2),
            (Icode::Popq, 2),
        ];
        for (icode, len) in expected {
            assert_eq!(icode.encoded_len(), len, "{icode:?}");
        }
    }

    #[test]
    fn alu_function_nibbles_decode_only_the_defined_four() {
        assert_eq!(AluFn::from_nibble(0x0), Some(AluFn::Addq));
        assert_eq!(AluFn::from_nibble(0x1), Some(AluFn::Subq));
        assert_eq!(AluFn::from_nibble(0x2), Some(AluFn::Andq));
        assert_eq!(AluFn::from_nibble(0x3), Some(AluFn::Xorq));
        for bits in 0x4_u8..=0xF {
            assert!(AluFn::from_nibble(bits).is_none());
        }
    }

    #[test]
    fn nibble_splitters_separate_high_and_low() {
        assert_eq!(split_code_byte(0x61), (0x6, 0x1));
        assert_eq!(split_register_byte(0xF4), (0xF, 0x4));
    }
}
