//! # S12 Emulator
//!
//! An emulator of the S12, a small 12-bit accumulator machine with
//! 256 words of memory, an 8-bit program counter and twelve opcodes.
//!
//! A run loads a memory image, steps the CPU until it halts or a cycle
//! cap is reached, then exports the final memory image and the
//! mnemonic trace.

pub mod cpu;
pub mod image;
pub mod sim;
pub mod config;
pub mod driver;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use cpu::{Addr, Cpu, CpuError, CpuState, Instruction, Memory, Opcode, Registers, Step, TraceRecord, Word};
pub use image::{ExportError, Image, LoadError, load_image, parse_image};
pub use sim::Simulator;
pub use config::RunConfig;
pub use driver::{RunReport, run_cycles};
