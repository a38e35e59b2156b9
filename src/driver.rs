//! Console run loop: load, step, export, report.
//!
//! The binary is a thin shell over [`run`]; everything it prints and the
//! exit code it returns come from the [`RunReport`].

use crate::config::RunConfig;
use crate::cpu::{Cpu, CpuError};
use crate::image::{ExportError, LoadError};
use crate::sim::Simulator;
use tracing::debug;

/// Exit code when the memory image cannot be read or parsed.
pub const EXIT_LOAD_FAILURE: i32 = 3;

/// Exit code when execution stops on an undefined opcode.
pub const EXIT_INVALID_OPCODE: i32 = 4;

/// Outcome of one console run.
pub struct RunReport {
    /// Machine state after the last step.
    pub cpu: Cpu,
    /// Number of `step` calls that completed.
    pub cycles: u64,
    /// The fault that stopped execution, if any.
    pub fault: Option<CpuError>,
    pub memory_export: Result<(), ExportError>,
    pub trace_export: Result<(), ExportError>,
    config: RunConfig,
}

impl RunReport {
    /// 0 on a normal stop, [`EXIT_INVALID_OPCODE`] after a fault.
    /// Export failures only produce warnings.
    pub fn exit_code(&self) -> i32 {
        match self.fault {
            Some(_) => EXIT_INVALID_OPCODE,
            None => 0,
        }
    }

    /// One line per output file that could not be written.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.memory_export.is_err() {
            out.push(format!(
                "Warning: failed to write memory output file: {}",
                self.config.mem_out_path().display()
            ));
        }
        if self.trace_export.is_err() {
            out.push(format!(
                "Warning: failed to write trace file: {}",
                self.config.trace_path().display()
            ));
        }
        out
    }

    /// The three-line console summary.
    pub fn summary(&self) -> String {
        let (pc, acc) = self.cpu.register_summary();
        format!("Cycles Executed: {}\nPC: {}\nACC: {}", self.cycles, pc, acc)
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

/// Step `sim` until the fetched word is a HALT, a fault occurs, or
/// `max` steps have been taken. The HALT fetch counts as a cycle.
pub fn run_cycles<S: Simulator>(sim: &mut S, max: u64) -> (u64, Option<CpuError>) {
    let mut executed = 0u64;
    while executed < max {
        match sim.step_bits() {
            Ok(bits) => {
                executed += 1;
                if bits.starts_with("0000") {
                    break;
                }
            }
            Err(e) => return (executed, Some(e)),
        }
    }
    (executed, None)
}

/// Load the image named by `config`, run it, and write both output files.
///
/// Only a load failure is an `Err`; faults and export failures are
/// recorded in the report so the outputs are still attempted.
pub fn run(config: &RunConfig) -> Result<RunReport, LoadError> {
    let mut cpu = Cpu::new();
    cpu.load_image(&config.input)?;

    let (cycles, fault) = run_cycles(&mut cpu, config.max_cycles);
    debug!(cycles, faulted = fault.is_some(), "run finished");

    let memory_export = cpu.export_memory(&config.mem_out_path());
    if let Err(e) = &memory_export {
        debug!("{}", e);
    }
    let trace_export = cpu.export_trace(&config.trace_path());
    if let Err(e) = &trace_export {
        debug!("{}", e);
    }

    Ok(RunReport {
        cpu,
        cycles,
        fault,
        memory_export,
        trace_export,
        config: config.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{Addr, Word};

    #[test]
    fn test_run_cycles_counts_halt_fetch() {
        let mut cpu = Cpu::new();
        cpu.mem.write(Addr::new(0), Word::new(0x102));
        let (cycles, fault) = run_cycles(&mut cpu, u64::MAX);
        assert_eq!(cycles, 2);
        assert!(fault.is_none());
    }

    #[test]
    fn test_run_cycles_respects_cap() {
        // JMP 00 loops forever
        let mut cpu = Cpu::new();
        cpu.mem.write(Addr::new(0), Word::new(0xA00));
        let (cycles, fault) = run_cycles(&mut cpu, 7);
        assert_eq!(cycles, 7);
        assert!(fault.is_none());
    }

    #[test]
    fn test_run_cycles_stops_on_fault() {
        let mut cpu = Cpu::new();
        cpu.mem.write(Addr::new(0), Word::new(0x101));
        cpu.mem.write(Addr::new(1), Word::new(0xC00));
        let (cycles, fault) = run_cycles(&mut cpu, u64::MAX);
        assert_eq!(cycles, 1);
        assert!(matches!(fault, Some(CpuError::InvalidOpcode { .. })));
    }
}
