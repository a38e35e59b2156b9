//! State and trace export.
//!
//! Memory export is the 257-line project format: a `PPPPPPPP AAAAAAAAAAAA`
//! header and one `AA WWWWWWWWWWWW` line per cell. The cell lines alone
//! are available as a header-less dump. Trace export is one mnemonic line
//! per executed instruction.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use crate::cpu::{Memory, Registers, TraceRecord, MEMORY_SIZE};
use crate::cpu::word::{bin8, bin12, hex2};
use thiserror::Error;
use tracing::info;

/// Render the project-format memory file.
pub fn render_memory(regs: &Registers, mem: &Memory) -> String {
    let mut out = String::with_capacity(22 + 16 * MEMORY_SIZE);
    out.push_str(&bin8(regs.pc.value()));
    out.push(' ');
    out.push_str(&bin12(regs.acc.value()));
    out.push('\n');
    out.push_str(&render_memory_cells(mem));
    out
}

/// The 256 `AA WWWWWWWWWWWW` cell lines, without the register header.
pub fn render_memory_cells(mem: &Memory) -> String {
    let mut out = String::with_capacity(16 * MEMORY_SIZE);
    for (addr, word) in mem.iter() {
        out.push_str(&hex2(addr.value()));
        out.push(' ');
        out.push_str(&bin12(word.value()));
        out.push('\n');
    }
    out
}

/// Render the trace, one line per record.
pub fn render_trace(trace: &[TraceRecord]) -> String {
    let mut out = String::new();
    for record in trace {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

/// Write the project-format memory file to disk.
pub fn write_memory<P: AsRef<Path>>(path: P, regs: &Registers, mem: &Memory) -> Result<(), ExportError> {
    write_text(path.as_ref(), &render_memory(regs, mem))?;
    info!(path = %path.as_ref().display(), "wrote memory image");
    Ok(())
}

/// Write the trace file to disk.
pub fn write_trace<P: AsRef<Path>>(path: P, trace: &[TraceRecord]) -> Result<(), ExportError> {
    write_text(path.as_ref(), &render_trace(trace))?;
    info!(path = %path.as_ref().display(), lines = trace.len(), "wrote trace");
    Ok(())
}

fn write_text(path: &Path, text: &str) -> Result<(), ExportError> {
    let err = |source: std::io::Error| ExportError::Write { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes()).map_err(err)?;
    writer.flush().map_err(err)?;
    Ok(())
}

/// Errors that can occur while writing output files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
