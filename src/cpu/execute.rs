//! CPU execution engine for the S12.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.

use crate::cpu::{Memory, Registers};
use crate::cpu::decode::{self, DecodeError, Instruction, Opcode};
use crate::cpu::trace::TraceRecord;
use crate::cpu::word::{Addr, Word};
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, info, trace};

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU has halted (executed HALT). Further steps are no-ops.
    Halted,
    /// CPU fetched an undefined opcode.
    Faulted,
}

/// Result of a single `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// The word fetched at the pre-step PC, or `Word::ZERO` when the CPU
    /// was already halted.
    pub word: Word,
    /// The trace record appended by this step, if an instruction ran.
    pub record: Option<TraceRecord>,
}

impl Step {
    /// The sentinel returned by every step after halt.
    pub const HALTED: Step = Step { word: Word::ZERO, record: None };

    /// Whether the returned word carries the HALT opcode.
    pub fn is_halt(&self) -> bool {
        self.word.opcode_bits() == Opcode::Halt.bits()
    }

    /// The returned word as 12 binary digits.
    pub fn bits(&self) -> String {
        self.word.to_bin()
    }
}

/// The S12 CPU: registers, memory, run state and trace.
#[derive(Clone, Serialize, Deserialize)]
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Current execution state.
    pub state: CpuState,
    /// Instructions executed so far.
    pub cycles: u64,
    /// Executed instructions, in order.
    trace: Vec<TraceRecord>,
}

impl Cpu {
    /// Create a new CPU with zeroed state.
    pub fn new() -> Self {
        Self::from_parts(Memory::new(), Registers::new())
    }

    /// Create a CPU ready to run from the given memory and registers.
    pub fn from_parts(mem: Memory, regs: Registers) -> Self {
        Self {
            regs,
            mem,
            state: CpuState::Running,
            cycles: 0,
            trace: Vec::new(),
        }
    }

    /// Execute a single instruction.
    ///
    /// Once halted, returns [`Step::HALTED`] without touching any state.
    /// An undefined opcode leaves memory and registers untouched and
    /// moves the CPU to [`CpuState::Faulted`].
    pub fn step(&mut self) -> Result<Step, CpuError> {
        match self.state {
            CpuState::Running => {}
            CpuState::Halted => return Ok(Step::HALTED),
            CpuState::Faulted => return Err(CpuError::NotRunning(self.state)),
        }

        // Fetch
        let pc = self.regs.pc;
        let word = self.mem.read(pc);

        // Decode
        let instr = match decode::decode(word) {
            Ok(instr) => instr,
            Err(DecodeError::InvalidOpcode(opcode)) => {
                debug!(opcode, pc = pc.value(), word = word.value(), "invalid opcode");
                self.state = CpuState::Faulted;
                return Err(CpuError::InvalidOpcode { opcode, pc, word });
            }
        };

        // Advance PC before execute (jumps will override)
        self.regs.advance_pc();

        // Execute
        self.execute(instr);

        let record = TraceRecord::new(pc, word, instr);
        trace!(pc = pc.value(), word = word.value(), acc = self.regs.acc.value(), "{}", instr);
        self.trace.push(record);
        self.cycles += 1;

        if self.state == CpuState::Halted {
            info!(cycles = self.cycles, pc = self.regs.pc.value(), "halted");
        }

        Ok(Step { word, record: Some(record) })
    }

    /// Run until halt or error.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;

        while self.state == CpuState::Running {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    pub fn run_limited(&mut self, max_cycles: u64) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles.saturating_add(max_cycles);

        while self.state == CpuState::Running && self.cycles < limit {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Execute a decoded instruction. PC already points past it.
    fn execute(&mut self, instr: Instruction) {
        let addr = instr.operand;
        match instr.opcode {
            Opcode::Halt => {
                self.state = CpuState::Halted;
            }

            // ==================== Arithmetic / Logic ====================

            Opcode::Add => {
                self.regs.acc = self.regs.acc.wrapping_add(self.mem.read(addr));
            }

            Opcode::Sub => {
                self.regs.acc = self.regs.acc.wrapping_sub(self.mem.read(addr));
            }

            Opcode::And => {
                self.regs.acc = self.regs.acc.and(self.mem.read(addr));
            }

            Opcode::Or => {
                self.regs.acc = self.regs.acc.or(self.mem.read(addr));
            }

            // ==================== Data Transfer ====================

            Opcode::Load => {
                self.regs.acc = self.mem.read(addr);
            }

            Opcode::Store => {
                self.mem.write(addr, self.regs.acc);
            }

            Opcode::LoadI => {
                self.regs.acc = self.mem.read_indirect(addr);
            }

            Opcode::StoreI => {
                self.mem.write_indirect(addr, self.regs.acc);
            }

            // ==================== Control Flow ====================

            Opcode::Jz => {
                if self.regs.acc.is_zero() {
                    self.regs.jump(addr);
                }
            }

            Opcode::Jn => {
                if self.regs.acc.is_negative() {
                    self.regs.jump(addr);
                }
            }

            Opcode::Jmp => {
                self.regs.jump(addr);
            }
        }
    }

    /// Executed instructions, in order.
    pub fn trace(&self) -> &[TraceRecord] {
        &self.trace
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.trace.last().map(|rec| rec.instruction)
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("unknown opcode 0x{opcode:X} at PC=0x{pc} (word=0x{word})")]
    InvalidOpcode { opcode: u8, pc: Addr, word: Word },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::encode;

    fn cpu_with(program: &[(u8, u16)]) -> Cpu {
        let mut cpu = Cpu::new();
        for &(addr, value) in program {
            cpu.mem.write(Addr::new(addr), Word::new(value));
        }
        cpu
    }

    fn op(opcode: Opcode, addr: u8) -> u16 {
        encode(&Instruction::new(opcode, Addr::new(addr))).value()
    }

    #[test]
    fn test_cpu_halt() {
        let mut cpu = Cpu::new();

        let executed = cpu.run().unwrap();

        assert_eq!(executed, 1);
        assert!(cpu.is_halted());
        assert_eq!(cpu.regs.pc, Addr::new(1));
    }

    #[test]
    fn test_add_then_halt() {
        let mut cpu = cpu_with(&[(0, 0x102), (1, 0x000), (2, 0x005)]);

        let first = cpu.step().unwrap();
        assert_eq!(first.word.value(), 0x102);
        assert!(!first.is_halt());

        let second = cpu.step().unwrap();
        assert!(second.is_halt());
        assert_eq!(second.bits(), "000000000000");

        assert_eq!(cpu.regs.acc.value(), 5);
        assert_eq!(cpu.regs.pc.value(), 2);
        let lines: Vec<String> = cpu.trace().iter().map(|r| r.to_string()).collect();
        assert_eq!(lines, ["ADD 02", "HALT"]);
    }

    #[test]
    fn test_add_wraps() {
        let mut cpu = cpu_with(&[(0, op(Opcode::Add, 0x10)), (0x10, 1)]);
        cpu.regs.acc = Word::new(0xFFF);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.acc, Word::ZERO);
    }

    #[test]
    fn test_sub_wraps() {
        let mut cpu = cpu_with(&[(0, op(Opcode::Sub, 0x10)), (0x10, 1)]);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.acc.value(), 0xFFF);
    }

    #[test]
    fn test_and_or() {
        let mut cpu = cpu_with(&[
            (0, op(Opcode::And, 0x10)),
            (1, op(Opcode::Or, 0x11)),
            (0x10, 0x0F0),
            (0x11, 0x801),
        ]);
        cpu.regs.acc = Word::new(0x3CC);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.acc.value(), 0x0C0);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.acc.value(), 0x8C1);
    }

    #[test]
    fn test_load_store() {
        let mut cpu = cpu_with(&[
            (0, op(Opcode::Load, 0x10)),
            (1, op(Opcode::Store, 0x11)),
            (0x10, 0x42),
        ]);
        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.mem.read(Addr::new(0x11)).value(), 0x42);
    }

    #[test]
    fn test_loadi() {
        let mut cpu = cpu_with(&[(0, op(Opcode::LoadI, 0x10)), (0x10, 0x20), (0x20, 0x123)]);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.acc.value(), 0x123);
    }

    #[test]
    fn test_storei() {
        let mut cpu = cpu_with(&[(0, op(Opcode::StoreI, 0x10)), (0x10, 0x30)]);
        cpu.regs.acc = Word::new(0x777);
        cpu.step().unwrap();
        assert_eq!(cpu.mem.read(Addr::new(0x30)).value(), 0x777);
        assert_eq!(cpu.mem.read(Addr::new(0x10)).value(), 0x30);
    }

    #[test]
    fn test_jz() {
        let mut cpu = cpu_with(&[(0, op(Opcode::Jz, 0x05))]);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.pc.value(), 5);

        let mut cpu = cpu_with(&[(0, op(Opcode::Jz, 0x05))]);
        cpu.regs.acc = Word::new(1);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.pc.value(), 1);
    }

    #[test]
    fn test_jn() {
        let mut cpu = cpu_with(&[(0, op(Opcode::Jn, 0x07))]);
        cpu.regs.acc = Word::new(0x800);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.pc.value(), 7);

        let mut cpu = cpu_with(&[(0, op(Opcode::Jn, 0x07))]);
        cpu.regs.acc = Word::new(0x7FF);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.pc.value(), 1);
    }

    #[test]
    fn test_jmp() {
        let mut cpu = cpu_with(&[(0, op(Opcode::Jmp, 0xC0))]);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.pc.value(), 0xC0);
    }

    #[test]
    fn test_pc_wraps_at_end_of_memory() {
        let mut cpu = cpu_with(&[(0xFF, op(Opcode::Load, 0x00))]);
        cpu.regs.pc = Addr::new(0xFF);
        cpu.step().unwrap();
        assert_eq!(cpu.regs.pc, Addr::ZERO);
    }

    #[test]
    fn test_step_after_halt_is_noop() {
        let mut cpu = cpu_with(&[(0, 0x000), (1, op(Opcode::Jmp, 0x00))]);
        cpu.regs.acc = Word::new(0x321);
        cpu.step().unwrap();

        let snapshot = (cpu.regs, cpu.mem.clone(), cpu.trace().len());
        for _ in 0..3 {
            assert_eq!(cpu.step().unwrap(), Step::HALTED);
        }
        assert_eq!((cpu.regs, cpu.mem.clone(), cpu.trace().len()), snapshot);
    }

    #[test]
    fn test_invalid_opcode_is_fatal() {
        let mut cpu = cpu_with(&[(0, op(Opcode::Load, 0x10)), (1, 0xF12), (0x10, 0x9)]);
        cpu.step().unwrap();

        let err = cpu.step().unwrap_err();
        assert_eq!(
            err,
            CpuError::InvalidOpcode { opcode: 0xF, pc: Addr::new(1), word: Word::new(0xF12) }
        );
        assert_eq!(cpu.state, CpuState::Faulted);
        assert_eq!(cpu.regs.pc.value(), 1);
        assert_eq!(cpu.regs.acc.value(), 0x9);
        assert_eq!(cpu.trace().len(), 1);

        assert_eq!(cpu.step(), Err(CpuError::NotRunning(CpuState::Faulted)));
    }

    #[test]
    fn test_invalid_opcode_message() {
        let err = CpuError::InvalidOpcode { opcode: 0xC, pc: Addr::new(0x1A), word: Word::new(0xC05) };
        assert_eq!(err.to_string(), "unknown opcode 0xC at PC=0x1A (word=0xC05)");
    }

    #[test]
    fn test_run_limited() {
        // Tight infinite loop
        let mut cpu = cpu_with(&[(0, op(Opcode::Jmp, 0x00))]);
        let executed = cpu.run_limited(10).unwrap();
        assert_eq!(executed, 10);
        assert!(cpu.is_running());
        assert_eq!(cpu.last_instruction(), Some(Instruction::new(Opcode::Jmp, Addr::ZERO)));
    }

    #[test]
    fn test_snapshot_rejects_truncated_memory() {
        let mut json: serde_json::Value = serde_json::to_value(Cpu::new()).unwrap();
        json["mem"] = serde_json::json!([0]);
        assert!(serde_json::from_value::<Cpu>(json).is_err());
    }

    #[test]
    fn test_snapshot_roundtrip_after_run() {
        let mut cpu = cpu_with(&[(0, op(Opcode::Load, 0x10)), (0x10, 0x800)]);
        cpu.run().unwrap();

        let json = serde_json::to_string(&cpu).unwrap();
        let back: Cpu = serde_json::from_str(&json).unwrap();
        assert_eq!(back.regs, cpu.regs);
        assert_eq!(back.mem, cpu.mem);
        assert_eq!(back.state, CpuState::Halted);
        assert_eq!(back.trace(), cpu.trace());
    }

    #[test]
    fn test_self_modifying_code() {
        // STORE overwrites the next instruction with HALT
        let mut cpu = cpu_with(&[
            (0, op(Opcode::Store, 0x01)),
            (1, op(Opcode::Jmp, 0x00)),
        ]);
        let executed = cpu.run_limited(100).unwrap();
        assert_eq!(executed, 2);
        assert!(cpu.is_halted());
    }
}
