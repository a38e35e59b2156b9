//! Fixed-width machine values.
//!
//! The S12 has exactly two widths:
//! - `Word`: 12-bit memory cell / accumulator value
//! - `Addr`: 8-bit address / program counter value
//!
//! Both are stored in host integers and re-masked on every construction,
//! so a value outside its width can never be observed.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Mask for a 12-bit word.
pub const WORD_MASK: u16 = 0xFFF;

/// Sign bit of a 12-bit word (two's complement).
pub const SIGN_BIT: u16 = 0x800;

/// Mask a host integer down to 12 bits.
#[inline]
pub const fn mask12(value: u32) -> u16 {
    (value & WORD_MASK as u32) as u16
}

/// Mask a host integer down to 8 bits.
#[inline]
pub const fn mask8(value: u32) -> u8 {
    (value & 0xFF) as u8
}

// ============================================================================
// Word
// ============================================================================

/// A 12-bit machine word.
///
/// Words double as data and instruction encodings: bits 11-8 are the
/// opcode, bits 7-0 the operand address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub struct Word(u16);

impl Word {
    /// The all-zero word (also the HALT encoding).
    pub const ZERO: Word = Word(0);

    /// Create a word, masking to 12 bits.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value & WORD_MASK)
    }

    /// Create a word from any host integer, masking to 12 bits.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self(mask12(value))
    }

    /// Raw value in `[0, 4095]`.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Bits 11-8.
    #[inline]
    pub const fn opcode_bits(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    /// Bits 7-0, as an address.
    #[inline]
    pub const fn operand(self) -> Addr {
        Addr((self.0 & 0xFF) as u8)
    }

    /// Whether the two's-complement sign bit is set.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 & SIGN_BIT != 0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Modular addition.
    #[inline]
    pub const fn wrapping_add(self, rhs: Word) -> Word {
        Word::new(self.0.wrapping_add(rhs.0))
    }

    /// Modular subtraction (mod 4096).
    #[inline]
    pub const fn wrapping_sub(self, rhs: Word) -> Word {
        Word::new(self.0.wrapping_sub(rhs.0))
    }

    #[inline]
    pub const fn and(self, rhs: Word) -> Word {
        Word::new(self.0 & rhs.0)
    }

    #[inline]
    pub const fn or(self, rhs: Word) -> Word {
        Word::new(self.0 | rhs.0)
    }

    /// Interpret the low 8 bits as an address (used by indirect modes).
    #[inline]
    pub const fn as_addr(self) -> Addr {
        self.operand()
    }

    /// Render as exactly 12 binary digits.
    pub fn to_bin(self) -> String {
        bin12(self.0)
    }
}

impl From<u16> for Word {
    fn from(value: u16) -> Self {
        Word::new(value)
    }
}

impl From<Word> for u16 {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word(0x{:03X})", self.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X}", self.0)
    }
}

// ============================================================================
// Addr
// ============================================================================

/// An 8-bit address. Arithmetic wraps (255 + 1 = 0).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Addr(u8);

impl Addr {
    pub const ZERO: Addr = Addr(0);

    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Create an address from any host integer, masking to 8 bits.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self(mask8(value))
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The following address, wrapping at 255.
    #[inline]
    pub const fn next(self) -> Addr {
        Addr(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Addr(0x{:02X})", self.0)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.0)
    }
}

// ============================================================================
// Renderers
// ============================================================================

/// Exactly 8 binary digits.
pub fn bin8(value: u8) -> String {
    format!("{:08b}", value)
}

/// Exactly 12 binary digits of the masked value.
pub fn bin12(value: u16) -> String {
    format!("{:012b}", value & WORD_MASK)
}

/// Two uppercase hex digits.
pub fn hex2(value: u8) -> String {
    format!("{:02X}", value)
}
