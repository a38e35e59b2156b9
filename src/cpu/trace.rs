//! Execution trace and disassembly.
//!
//! A trace record is appended for every executed instruction; the
//! exporter writes one `Display` line per record.

use std::fmt;
use crate::cpu::decode::{decode, Instruction};
use crate::cpu::memory::Memory;
use crate::cpu::word::{Addr, Word};
use serde::{Serialize, Deserialize};

/// One executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Address the instruction was fetched from.
    pub pc: Addr,
    /// Raw fetched word.
    pub word: Word,
    /// Decoded form.
    pub instruction: Instruction,
}

impl TraceRecord {
    pub fn new(pc: Addr, word: Word, instruction: Instruction) -> Self {
        Self { pc, word, instruction }
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instruction)
    }
}

/// Disassemble a single word to text. Undefined opcodes render as `???`.
pub fn disassemble_word(word: Word) -> String {
    match decode(word) {
        Ok(instr) => instr.to_string(),
        Err(_) => "???".to_string(),
    }
}

/// Full memory listing, one `AA: WWW  MNEMONIC` line per cell.
pub fn disassemble(mem: &Memory) -> String {
    let mut output = String::new();
    output.push_str("; S12 Disassembly\n");
    output.push_str("; ---------------\n");

    for (addr, word) in mem.iter() {
        output.push_str(&format!("{}: {}  {}\n", addr, word, disassemble_word(word)));
    }

    output
}
