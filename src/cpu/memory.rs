//! S12 memory subsystem.
//!
//! 256 twelve-bit words, word-addressed. Code and data share the same
//! cells; an 8-bit address can never fall outside the array, so reads
//! and writes are infallible.

use crate::cpu::word::{Addr, Word};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The number of memory cells in the S12.
pub const MEMORY_SIZE: usize = 256;

/// S12 memory: 256 twelve-bit cells.
///
/// Serializes as a flat array of cell values; deserializing anything but
/// exactly 256 cells is rejected.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Word>", into = "Vec<Word>")]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![Word::ZERO; MEMORY_SIZE],
        }
    }

    #[inline]
    pub fn read(&self, addr: Addr) -> Word {
        self.cells[addr.index()]
    }

    #[inline]
    pub fn write(&mut self, addr: Addr, value: Word) {
        self.cells[addr.index()] = value;
    }

    /// Read the cell at `addr`, then treat its low 8 bits as a second
    /// address and read that cell.
    pub fn read_indirect(&self, addr: Addr) -> Word {
        self.read(self.read(addr).as_addr())
    }

    /// Write `value` to the cell whose address is held (low 8 bits) at `addr`.
    pub fn write_indirect(&mut self, addr: Addr, value: Word) {
        let target = self.read(addr).as_addr();
        self.write(target, value);
    }

    /// Iterate over `(address, word)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Addr, Word)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &w)| (Addr::from_u32(i as u32), w))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Word>> for Memory {
    type Error = MemoryError;

    fn try_from(cells: Vec<Word>) -> Result<Self, Self::Error> {
        if cells.len() != MEMORY_SIZE {
            return Err(MemoryError::WrongSize(cells.len()));
        }
        Ok(Self { cells })
    }
}

impl From<Memory> for Vec<Word> {
    fn from(mem: Memory) -> Self {
        mem.cells
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count non-zero cells
        let non_zero = self.cells.iter().filter(|cell| !cell.is_zero()).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur when building memory from raw cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("memory must have 256 cells, found {0}")]
    WrongSize(usize),
}
