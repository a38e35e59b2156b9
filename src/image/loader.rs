//! Memory image loader.
//!
//! Accepts two textual encodings in one pass:
//!
//! - Project format: an optional `PPPPPPPP AAAAAAAAAAAA` binary header
//!   (PC, ACC) followed by `AA WWWWWWWWWWWW` lines.
//! - Benchmark format: `AA WWW` lines with a hex value.
//!
//! Anything after `;` or `//` is a comment. Blank lines, a bare `...`
//! and any line that does not fit either shape are skipped.

use std::path::{Path, PathBuf};
use crate::cpu::{Addr, Cpu, Memory, Registers, Word};
use thiserror::Error;
use tracing::{debug, info};

/// A parsed memory image: initial memory and registers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub memory: Memory,
    pub registers: Registers,
}

impl Image {
    /// Build a CPU ready to run this image.
    pub fn into_cpu(self) -> Cpu {
        Cpu::from_parts(self.memory, self.registers)
    }
}

/// Read and parse a memory image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let image = parse_image(&text);
    info!(path = %path.display(), pc = image.registers.pc.value(), "loaded memory image");
    Ok(image)
}

/// Parse memory image text. Never fails; unrecognized lines are skipped.
pub fn parse_image(text: &str) -> Image {
    let mut image = Image::default();
    // Open until a line parses as either a header or a memory line
    let mut header_slot = true;

    for (line_num, raw) in text.lines().enumerate() {
        let line = strip_comment(raw);
        if line.is_empty() || line == "..." {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let &[first, second] = tokens.as_slice() else {
            debug!(line = line_num + 1, "skipping line: expected 2 tokens, found {}", tokens.len());
            continue;
        };

        if header_slot {
            if let Some(registers) = parse_header(first, second) {
                debug!(line = line_num + 1, pc = registers.pc.value(), acc = registers.acc.value(), "header");
                image.registers = registers;
                header_slot = false;
                continue;
            }
        }

        match parse_memory_line(first, second) {
            Some((addr, value)) => {
                image.memory.write(addr, value);
                header_slot = false;
            }
            None => debug!(line = line_num + 1, "skipping unrecognized line: {}", line),
        }
    }

    image
}

/// Drop `;` and `//` comments and surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    let line = line.split(';').next().unwrap_or("");
    let line = line.split("//").next().unwrap_or("");
    line.trim()
}

/// `PPPPPPPP AAAAAAAAAAAA`: 8 binary digits of PC, 12 of ACC.
fn parse_header(pc: &str, acc: &str) -> Option<Registers> {
    if !is_binary(pc, 8) || !is_binary(acc, 12) {
        return None;
    }
    let pc = u8::from_str_radix(pc, 2).ok()?;
    let acc = u16::from_str_radix(acc, 2).ok()?;
    Some(Registers::with_values(Addr::new(pc), Word::new(acc)))
}

/// `AA VVVVVVVVVVVV` or `AA VVV`.
///
/// The value is binary only when it is exactly 12 characters of `0`/`1`;
/// anything else of 1-3 hex digits is hex, so `010` reads as 0x010.
fn parse_memory_line(addr: &str, value: &str) -> Option<(Addr, Word)> {
    if addr.len() != 2 || !addr.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let addr = u8::from_str_radix(addr, 16).ok()?;

    let value = if is_binary(value, 12) {
        u16::from_str_radix(value, 2).ok()?
    } else if (1..=3).contains(&value.len()) && value.chars().all(|c| c.is_ascii_hexdigit()) {
        u16::from_str_radix(value, 16).ok()?
    } else {
        return None;
    };

    Some((Addr::new(addr), Word::new(value)))
}

fn is_binary(token: &str, width: usize) -> bool {
    token.len() == width && token.chars().all(|c| c == '0' || c == '1')
}

/// Errors that can occur while loading a memory image.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read memory image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
