//! Instruction decoder for the S12.
//!
//! Every instruction is a single 12-bit word:
//! - Bits 11-8: opcode (12 of the 16 values are defined)
//! - Bits 7-0: operand address

use std::fmt;
use crate::cpu::word::{Addr, Word};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The twelve S12 opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    // ==================== Control ====================

    /// Halt execution
    Halt = 0x0,

    // ==================== Arithmetic ====================

    /// ACC := ACC + [addr]
    Add = 0x1,

    /// ACC := ACC - [addr] (mod 4096)
    Sub = 0xB,

    // ==================== Branches ====================

    /// Jump if ACC = 0
    Jz = 0x2,

    /// Jump if the sign bit of ACC is set
    Jn = 0x3,

    /// Unconditional jump
    Jmp = 0xA,

    // ==================== Data Transfer ====================

    /// ACC := [addr]
    Load = 0x4,

    /// [addr] := ACC
    Store = 0x5,

    /// ACC := [[addr]]
    LoadI = 0x6,

    /// [[addr]] := ACC
    StoreI = 0x7,

    // ==================== Logic ====================

    /// ACC := ACC & [addr]
    And = 0x8,

    /// ACC := ACC | [addr]
    Or = 0x9,
}

impl Opcode {
    /// All defined opcodes, in encoding order.
    pub const ALL: [Opcode; 12] = [
        Opcode::Halt,
        Opcode::Add,
        Opcode::Jz,
        Opcode::Jn,
        Opcode::Load,
        Opcode::Store,
        Opcode::LoadI,
        Opcode::StoreI,
        Opcode::And,
        Opcode::Or,
        Opcode::Jmp,
        Opcode::Sub,
    ];

    /// Decode the 4-bit opcode field.
    pub fn from_bits(bits: u8) -> Result<Self, DecodeError> {
        Opcode::ALL
            .get(bits as usize)
            .copied()
            .ok_or(DecodeError::InvalidOpcode(bits))
    }

    /// The 4-bit encoding.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "HALT",
            Opcode::Add => "ADD",
            Opcode::Jz => "JZ",
            Opcode::Jn => "JN",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::LoadI => "LOADI",
            Opcode::StoreI => "STOREI",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Jmp => "JMP",
            Opcode::Sub => "SUB",
        }
    }
}

/// Decoded S12 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Addr,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Addr) -> Self {
        Self { opcode, operand }
    }

    /// The halt instruction (all-zero word).
    pub fn halt() -> Self {
        Self::new(Opcode::Halt, Addr::ZERO)
    }

    pub fn is_halt(&self) -> bool {
        self.opcode == Opcode::Halt
    }
}

impl fmt::Display for Instruction {
    /// Trace form: `HALT`, or mnemonic plus two hex digits (`ADD 02`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_halt() {
            f.write_str(self.opcode.mnemonic())
        } else {
            write!(f, "{} {}", self.opcode.mnemonic(), self.operand)
        }
    }
}

/// Decode a 12-bit instruction word.
pub fn decode(word: Word) -> Result<Instruction, DecodeError> {
    let opcode = Opcode::from_bits(word.opcode_bits())?;
    Ok(Instruction::new(opcode, word.operand()))
}

/// Encode an instruction back to a 12-bit word.
pub fn encode(instr: &Instruction) -> Word {
    Word::new(((instr.opcode.bits() as u16) << 8) | instr.operand.value() as u16)
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid opcode: 0x{0:X}")]
    InvalidOpcode(u8),
}
