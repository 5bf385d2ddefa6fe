//! Host-facing machine state and stepping contract.

use crate::execute;
use crate::memory::{BoundsPolicy, Memory};
use crate::state::{CondCodes, RegisterFile, Status};
use crate::trace::Snapshot;

/// Complete architectural state of one simulated machine.
///
/// The engine is single-threaded and non-suspending: a step is an atomic,
/// synchronous transformation, and observations between steps always see a
/// consistent post-step state. Callers that step from a worker thread must
/// serialize access themselves; the machine exposes no synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    /// General-purpose register file.
    pub regs: RegisterFile,
    /// Address of the next instruction to fetch.
    pub pc: u64,
    /// Condition codes.
    pub cc: CondCodes,
    /// Termination status; execution happens only while `AOK`.
    pub status: Status,
    /// Sparse byte-addressable memory.
    pub mem: Memory,
}

impl Machine {
    /// Creates a reset machine whose memory obeys `bounds`.
    #[must_use]
    pub fn new(bounds: BoundsPolicy) -> Self {
        Self {
            regs: RegisterFile::default(),
            pc: 0,
            cc: CondCodes::default(),
            status: Status::Aok,
            mem: Memory::new(bounds),
        }
    }

    /// Executes one instruction and returns the post-step snapshot.
    ///
    /// When the status is no longer `AOK` the machine is left untouched and
    /// the current state is still snapshotted, so driver loops can call this
    /// unconditionally.
    pub fn step(&mut self) -> Snapshot {
        if self.status.is_aok() {
            execute::step_once(self);
        }
        self.snapshot()
    }

    /// Projects the current state into a trace record without mutating it.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_machine(self)
    }

    /// Steps until the status leaves `AOK` or `step_limit` steps have run,
    /// collecting every snapshot (including the terminal one).
    pub fn run(&mut self, step_limit: usize) -> Vec<Snapshot> {
        let mut trace = Vec::new();
        for _ in 0..step_limit {
            trace.push(self.step());
            if !self.status.is_aok() {
                break;
            }
        }
        trace
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(BoundsPolicy::Unbounded)
    }
}
