//! Per-step trace snapshots.
//!
//! A snapshot is a pure projection of machine state taken after every step,
//! including steps that fault. It is the only interop surface between the
//! engine and trace consumers; with the `serde` feature it serializes to the
//! `STAT`/`PC`/`CC`/`REG`/`MEM` record shape.

#![allow(clippy::cast_possible_wrap)]

use std::collections::BTreeMap;

use crate::api::Machine;
use crate::state::{CondCodes, Register, RegisterFile};

/// Condition codes as the 0/1 integers the trace reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CondCodeDump {
    /// Zero flag.
    #[cfg_attr(feature = "serde", serde(rename = "ZF"))]
    pub zf: u8,
    /// Sign flag.
    #[cfg_attr(feature = "serde", serde(rename = "SF"))]
    pub sf: u8,
    /// Signed-overflow flag.
    #[cfg_attr(feature = "serde", serde(rename = "OF"))]
    pub of: u8,
}

impl From<CondCodes> for CondCodeDump {
    fn from(cc: CondCodes) -> Self {
        Self {
            zf: u8::from(cc.zf),
            sf: u8::from(cc.sf),
            of: u8::from(cc.of),
        }
    }
}

/// Every named register with its signed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub struct RegisterDump {
    pub rax: i64,
    pub rcx: i64,
    pub rdx: i64,
    pub rbx: i64,
    pub rsp: i64,
    pub rbp: i64,
    pub rsi: i64,
    pub rdi: i64,
    pub r8: i64,
    pub r9: i64,
    pub r10: i64,
    pub r11: i64,
    pub r12: i64,
    pub r13: i64,
    pub r14: i64,
}

impl From<&RegisterFile> for RegisterDump {
    fn from(regs: &RegisterFile) -> Self {
        Self {
            rax: regs.get(Register::Rax),
            rcx: regs.get(Register::Rcx),
            rdx: regs.get(Register::Rdx),
            rbx: regs.get(Register::Rbx),
            rsp: regs.get(Register::Rsp),
            rbp: regs.get(Register::Rbp),
            rsi: regs.get(Register::Rsi),
            rdi: regs.get(Register::Rdi),
            r8: regs.get(Register::R8),
            r9: regs.get(Register::R9),
            r10: regs.get(Register::R10),
            r11: regs.get(Register::R11),
            r12: regs.get(Register::R12),
            r13: regs.get(Register::R13),
            r14: regs.get(Register::R14),
        }
    }
}

/// One per-step trace record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Snapshot {
    /// Numeric machine status.
    #[cfg_attr(feature = "serde", serde(rename = "STAT"))]
    pub stat: u8,
    /// Program counter, reported signed.
    #[cfg_attr(feature = "serde", serde(rename = "PC"))]
    pub pc: i64,
    /// Condition codes.
    #[cfg_attr(feature = "serde", serde(rename = "CC"))]
    pub cc: CondCodeDump,
    /// Register file contents.
    #[cfg_attr(feature = "serde", serde(rename = "REG"))]
    pub reg: RegisterDump,
    /// Non-zero touched qwords, keyed by their aligned base address.
    #[cfg_attr(feature = "serde", serde(rename = "MEM"))]
    pub mem: BTreeMap<u64, i64>,
}

impl Snapshot {
    /// Projects the machine into a trace record without mutating it.
    #[must_use]
    pub fn from_machine(machine: &Machine) -> Self {
        Self {
            stat: machine.status.as_u8(),
            pc: machine.pc as i64,
            cc: CondCodeDump::from(machine.cc),
            reg: RegisterDump::from(&machine.regs),
            mem: machine.mem.dump_nonzero_qwords(),
        }
    }
}
