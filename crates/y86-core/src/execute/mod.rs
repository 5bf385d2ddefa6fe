//! Five-phase sequential executor.
//!
//! One step runs fetch/decode, operand read, execute, memory, write-back,
//! and PC update in order. A fault in any phase latches the matching status
//! and abandons the remaining phases; PC is only assigned in the final phase,
//! so a faulting step always leaves it at the address that triggered the
//! fault.
//!
//! One deliberate asymmetry: `call` and `pushq` assign the decremented stack
//! pointer already in the execute phase, and the memory-phase store address
//! is derived from that new value. A store that then faults leaves `rsp`
//! decremented. This ordering also means `pushq %rsp` stores the *new* stack
//! pointer.

#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

mod alu;
mod cond;

pub use cond::condition_holds;

use crate::api::Machine;
use crate::decoder::{Decoded, Decoder};
use crate::encoding::{AluFn, Icode};
use crate::fault::Fault;
use crate::state::Register;

/// Operand values read during the decode phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Operands {
    val_a: i64,
    val_b: i64,
}

/// Runs one full step. The caller has already established that the machine
/// status permits execution.
pub(crate) fn step_once(machine: &mut Machine) {
    let decoded = match Decoder::fetch(&machine.mem, machine.pc) {
        Ok(decoded) => decoded,
        Err(fault) => {
            machine.status = fault.status();
            return;
        }
    };

    let operands = read_operands(machine, &decoded);

    let val_e = match execute(machine, &decoded, operands) {
        Ok(val_e) => val_e,
        Err(fault) => {
            machine.status = fault.status();
            return;
        }
    };

    let val_m = match memory_access(machine, &decoded, operands, val_e) {
        Ok(val_m) => val_m,
        Err(fault) => {
            machine.status = fault.status();
            return;
        }
    };

    write_back(machine, &decoded, operands, val_e, val_m);
    update_pc(machine, &decoded, val_m);
}

/// Decode phase: sources `valA` and `valB` from the register file.
fn read_operands(machine: &Machine, decoded: &Decoded) -> Operands {
    let val_a = match decoded.icode {
        Icode::Rrmovq | Icode::Opq | Icode::Rmmovq | Icode::Pushq => {
            machine.regs.read(decoded.ra)
        }
        Icode::Popq | Icode::Ret => machine.regs.get(Register::Rsp),
        _ => 0,
    };
    let val_b = match decoded.icode {
        Icode::Rmmovq
        | Icode::Mrmovq
        | Icode::Opq
        | Icode::Pushq
        | Icode::Popq
        | Icode::Call
        | Icode::Ret => machine.regs.get(decoded.rb.unwrap_or(Register::Rsp)),
        _ => 0,
    };
    Operands { val_a, val_b }
}

/// Execute phase: computes `valE`, updates flags for `opq`, and
/// pre-decrements `rsp` for `call`/`pushq`.
fn execute(machine: &mut Machine, decoded: &Decoded, operands: Operands) -> Result<i64, Fault> {
    match decoded.icode {
        Icode::Opq => {
            let fun = AluFn::from_nibble(decoded.ifun).ok_or(Fault::IllegalInstruction)?;
            let (result, cc) = alu::apply(fun, operands.val_a, operands.val_b);
            machine.cc = cc;
            Ok(result)
        }
        Icode::Rmmovq | Icode::Mrmovq => Ok(operands.val_b.wrapping_add(decoded.val_c as i64)),
        Icode::Call | Icode::Pushq => {
            let val_e = operands.val_b.wrapping_sub(8);
            machine.regs.set(Register::Rsp, val_e);
            Ok(val_e)
        }
        Icode::Ret | Icode::Popq => Ok(operands.val_b.wrapping_add(8)),
        _ => Ok(0),
    }
}

/// Memory phase: at most one 8-byte access; returns `valM` (zero when the
/// class performs no read).
fn memory_access(
    machine: &mut Machine,
    decoded: &Decoded,
    operands: Operands,
    val_e: i64,
) -> Result<u64, Fault> {
    match decoded.icode {
        Icode::Rmmovq | Icode::Pushq => {
            machine.mem.write8(val_e, operands.val_a as u64)?;
            Ok(0)
        }
        Icode::Mrmovq => Ok(machine.mem.read8(val_e)?),
        Icode::Call => {
            machine.mem.write8(val_e, decoded.val_p)?;
            Ok(0)
        }
        // The stack reads use the pre-increment pointer.
        Icode::Ret | Icode::Popq => Ok(machine.mem.read8(operands.val_b)?),
        _ => Ok(0),
    }
}

/// Write-back phase: destination register updates, including the idempotent
/// `rsp` re-assignment for the stack classes.
fn write_back(
    machine: &mut Machine,
    decoded: &Decoded,
    operands: Operands,
    val_e: i64,
    val_m: u64,
) {
    match decoded.icode {
        Icode::Rrmovq => {
            if condition_holds(decoded.ifun, machine.cc) {
                machine.regs.write(decoded.rb, operands.val_a);
            }
        }
        Icode::Irmovq => machine.regs.write(decoded.rb, decoded.val_c as i64),
        Icode::Opq => machine.regs.write(decoded.rb, val_e),
        Icode::Mrmovq => machine.regs.write(decoded.ra, val_m as i64),
        Icode::Call | Icode::Pushq => machine.regs.set(Register::Rsp, val_e),
        Icode::Ret | Icode::Popq => {
            machine.regs.set(Register::Rsp, val_e);
            if decoded.icode == Icode::Popq {
                machine.regs.write(decoded.ra, val_m as i64);
            }
        }
        _ => {}
    }
}

/// PC-update phase; `halt` latches its status here instead of advancing.
fn update_pc(machine: &mut Machine, decoded: &Decoded, val_m: u64) {
    match decoded.icode {
        Icode::Jxx => {
            machine.pc = if condition_holds(decoded.ifun, machine.cc) {
                decoded.val_c
            } else {
                decoded.val_p
            };
        }
        Icode::Call => machine.pc = decoded.val_c,
        Icode::Ret => machine.pc = val_m,
        Icode::Halt => machine.status = crate::state::Status::Hlt,
        _ => machine.pc = decoded.val_p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::BoundsPolicy;
    use crate::state::Status;

    fn machine_with(bytes: &[u8]) -> Machine {
        let mut machine = Machine::default();
        for (i, byte) in bytes.iter().enumerate() {
            machine.mem.write1(i as i64, *byte).expect("in bounds");
        }
        machine
    }

    #[test]
    fn nop_advances_pc_by_one() {
        let mut machine = machine_with(&[0x10, 0x10]);
        step_once(&mut machine);
        assert_eq!(machine.pc, 1);
        assert_eq!(machine.status, Status::Aok);
    }

    #[test]
    fn halt_latches_status_without_moving_pc() {
        let mut machine = machine_with(&[0x00]);
        step_once(&mut machine);
        assert_eq!(machine.status, Status::Hlt);
        assert_eq!(machine.pc, 0);
    }

    #[test]
    fn irmovq_writes_the_constant() {
        let mut machine = machine_with(&[0x30, 0xF2, 0x2A, 0, 0, 0, 0, 0, 0, 0]);
        step_once(&mut machine);
        assert_eq!(machine.regs.get(Register::Rdx), 0x2A);
        assert_eq!(machine.pc, 10);
    }

    #[test]
    fn opq_with_undefined_function_faults_before_any_effect() {
        // 0x64 would be an undefined "opq" function.
        let mut machine = machine_with(&[0x64, 0x01]);
        machine.regs.set(Register::Rax, 7);
        machine.regs.set(Register::Rcx, 9);
        let flags_before = machine.cc;

        step_once(&mut machine);

        assert_eq!(machine.status, Status::Ins);
        assert_eq!(machine.pc, 0);
        assert_eq!(machine.cc, flags_before);
        assert_eq!(machine.regs.get(Register::Rcx), 9);
    }

    #[test]
    fn pushq_stores_at_the_decremented_stack_pointer() {
        let mut machine = machine_with(&[0xA0, 0x0F]);
        machine.regs.set(Register::Rsp, 0x100);
        machine.regs.set(Register::Rax, 0x55);

        step_once(&mut machine);

        assert_eq!(machine.regs.get(Register::Rsp), 0xF8);
        assert_eq!(machine.mem.read8(0xF8), Ok(0x55));
    }

    #[test]
    fn pushq_rsp_stores_the_new_value() {
        let mut machine = machine_with(&[0xA0, 0x4F]);
        machine.regs.set(Register::Rsp, 0x100);

        step_once(&mut machine);

        assert_eq!(machine.regs.get(Register::Rsp), 0xF8);
        assert_eq!(machine.mem.read8(0xF8), Ok(0xF8));
    }

    #[test]
    fn faulting_push_store_keeps_the_decremented_rsp_and_pc() {
        let mut machine = machine_with(&[0xA0, 0x0F]);
        machine.mem.set_bounds(BoundsPolicy::Bounded { upper: 0x10 });
        machine.regs.set(Register::Rsp, 0x100);

        step_once(&mut machine);

        assert_eq!(machine.status, Status::Adr);
        assert_eq!(machine.pc, 0);
        assert_eq!(machine.regs.get(Register::Rsp), 0xF8);
    }

    #[test]
    fn popq_reads_through_the_old_pointer_then_bumps_it() {
        let mut machine = machine_with(&[0xB0, 0x3F]);
        machine.regs.set(Register::Rsp, 0x80);
        machine.mem.write8(0x80, 0x99).expect("in bounds");

        step_once(&mut machine);

        assert_eq!(machine.regs.get(Register::Rbx), 0x99);
        assert_eq!(machine.regs.get(Register::Rsp), 0x88);
    }

    #[test]
    fn popq_into_rsp_keeps_the_loaded_value() {
        let mut machine = machine_with(&[0xB0, 0x4F]);
        machine.regs.set(Register::Rsp, 0x80);
        machine.mem.write8(0x80, 0x1234).expect("in bounds");

        step_once(&mut machine);

        assert_eq!(machine.regs.get(Register::Rsp), 0x1234);
    }

    #[test]
    fn conditional_move_with_false_condition_writes_nothing() {
        // cmove %rax, %rbx with ZF clear.
        let mut machine = machine_with(&[0x23, 0x03]);
        machine.cc.zf = false;
        machine.regs.set(Register::Rax, 7);
        machine.regs.set(Register::Rbx, 1);

        step_once(&mut machine);

        assert_eq!(machine.regs.get(Register::Rbx), 1);
        assert_eq!(machine.pc, 2);
        assert_eq!(machine.status, Status::Aok);
    }

    #[test]
    fn undefined_jump_function_falls_through() {
        let mut machine = machine_with(&[0x7F, 0x40, 0, 0, 0, 0, 0, 0, 0]);
        step_once(&mut machine);
        assert_eq!(machine.status, Status::Aok);
        assert_eq!(machine.pc, 9);
    }
}
