//! WebAssembly bindings for the S12 emulator.
//!
//! This module provides JavaScript-friendly wrappers around the core emulator.
//! Images are passed as text since there is no filesystem in the browser.

use wasm_bindgen::prelude::*;
use crate::cpu::{Addr, Cpu, MEMORY_SIZE};
use crate::cpu::trace::disassemble;
use crate::image::{parse_image, render_memory, render_memory_cells, render_trace, Image};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly simulator wrapper.
#[wasm_bindgen]
pub struct WasmSim {
    cpu: Cpu,
    image: Image,
}

#[wasm_bindgen]
impl WasmSim {
    /// Create a new simulator with zeroed memory.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            image: Image::default(),
        }
    }

    /// Load a memory image from its text form.
    #[wasm_bindgen]
    pub fn load_text(&mut self, text: &str) {
        self.image = parse_image(text);
        self.cpu = self.image.clone().into_cpu();
    }

    /// Step one instruction. Returns the fetched word as 12 binary digits.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<String, JsError> {
        self.cpu.step()
            .map(|step| step.bits())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Run until halt or max cycles. Returns the total cycle count.
    #[wasm_bindgen]
    pub fn run(&mut self, max_cycles: u32) -> Result<u64, JsError> {
        self.cpu.run_limited(max_cycles as u64)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(self.cpu.cycles)
    }

    /// Reset to the last loaded image.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.cpu = self.image.clone().into_cpu();
    }

    #[wasm_bindgen]
    pub fn is_halted(&self) -> bool {
        self.cpu.is_halted()
    }

    #[wasm_bindgen]
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles
    }

    #[wasm_bindgen]
    pub fn pc(&self) -> u8 {
        self.cpu.regs.pc.value()
    }

    #[wasm_bindgen]
    pub fn acc(&self) -> u16 {
        self.cpu.regs.acc.value()
    }

    /// `"0xPC 0xACC"`.
    #[wasm_bindgen]
    pub fn register_summary(&self) -> String {
        let (pc, acc) = self.cpu.regs.summary();
        format!("{} {}", pc, acc)
    }

    /// Get memory cell value at index (0-255).
    #[wasm_bindgen]
    pub fn memory_at(&self, index: usize) -> u16 {
        if index < MEMORY_SIZE {
            self.cpu.mem.read(Addr::from_u32(index as u32)).value()
        } else {
            0
        }
    }

    /// Project-format memory image.
    #[wasm_bindgen]
    pub fn memory_text(&self) -> String {
        render_memory(&self.cpu.regs, &self.cpu.mem)
    }

    /// Memory cell lines without the register header.
    #[wasm_bindgen]
    pub fn memory_state(&self) -> String {
        render_memory_cells(&self.cpu.mem)
    }

    /// Mnemonic trace so far.
    #[wasm_bindgen]
    pub fn trace_text(&self) -> String {
        render_trace(self.cpu.trace())
    }

    /// Full memory disassembly.
    #[wasm_bindgen]
    pub fn disassembly(&self) -> String {
        disassemble(&self.cpu.mem)
    }
}

impl Default for WasmSim {
    fn default() -> Self {
        Self::new()
    }
}
