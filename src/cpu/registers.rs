//! S12 CPU registers.
//!
//! The S12 has 2 registers:
//! - PC: 8-bit program counter
//! - ACC: 12-bit accumulator

use crate::cpu::word::{Addr, Word};
use serde::{Serialize, Deserialize};

/// The S12 register file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    /// PC: address of the next instruction to fetch
    pub pc: Addr,

    /// ACC: the accumulator, the only general-purpose register
    pub acc: Word,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a register file with explicit initial values.
    pub fn with_values(pc: Addr, acc: Word) -> Self {
        Self { pc, acc }
    }

    /// Increment the program counter by 1 (wrapping).
    /// Returns the old value.
    pub fn advance_pc(&mut self) -> Addr {
        let old = self.pc;
        self.pc = self.pc.next();
        old
    }

    /// Set the program counter to an absolute address.
    pub fn jump(&mut self, addr: Addr) {
        self.pc = addr;
    }

    /// `("0xPC", "0xACC")`, the summary the console driver prints.
    pub fn summary(&self) -> (String, String) {
        (
            format!("0x{:02X}", self.pc.value()),
            format!("0x{:03X}", self.acc.value()),
        )
    }
}
