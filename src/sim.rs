//! Driver-facing simulator interface.
//!
//! The console driver and the WebAssembly bindings talk to the engine
//! only through [`Simulator`].

use std::path::Path;
use crate::cpu::{Cpu, CpuError};
use crate::image::{self, ExportError, LoadError};

/// The operations a driver needs to run an S12 program.
pub trait Simulator {
    /// Replace the whole machine state with the image at `path`.
    ///
    /// On failure the previous state is kept unchanged.
    fn load_image(&mut self, path: &Path) -> Result<(), LoadError>;

    /// Execute one instruction and return the fetched word as 12 binary
    /// digits. After halt every call returns `000000000000`.
    fn step_bits(&mut self) -> Result<String, CpuError>;

    /// `("0xPC", "0xACC")`.
    fn register_summary(&self) -> (String, String);

    /// The 256 memory cell lines, without the register header.
    fn memory_state(&self) -> String;

    /// Write the project-format memory image.
    fn export_memory(&self, path: &Path) -> Result<(), ExportError>;

    /// Write the mnemonic trace.
    fn export_trace(&self, path: &Path) -> Result<(), ExportError>;
}

impl Simulator for Cpu {
    fn load_image(&mut self, path: &Path) -> Result<(), LoadError> {
        *self = image::load_image(path)?.into_cpu();
        Ok(())
    }

    fn step_bits(&mut self) -> Result<String, CpuError> {
        Ok(self.step()?.bits())
    }

    fn register_summary(&self) -> (String, String) {
        self.regs.summary()
    }

    fn memory_state(&self) -> String {
        image::render_memory_cells(&self.mem)
    }

    fn export_memory(&self, path: &Path) -> Result<(), ExportError> {
        image::write_memory(path, &self.regs, &self.mem)
    }

    fn export_trace(&self, path: &Path) -> Result<(), ExportError> {
        image::write_trace(path, self.trace())
    }
}
