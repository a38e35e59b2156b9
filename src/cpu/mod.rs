//! CPU emulation for the S12 computer.
//!
//! This module implements the complete S12 architecture:
//! - 256 twelve-bit memory cells
//! - 2 registers: ACC (accumulator), PC (program counter)
//! - 12-instruction set with single-address architecture

pub mod word;
pub mod memory;
pub mod registers;
pub mod decode;
pub mod trace;
pub mod execute;

pub use word::{Addr, Word, mask8, mask12};
pub use memory::{Memory, MemoryError, MEMORY_SIZE};
pub use registers::Registers;
pub use decode::{Instruction, Opcode, DecodeError};
pub use trace::TraceRecord;
pub use execute::{Cpu, CpuError, CpuState, Step};
