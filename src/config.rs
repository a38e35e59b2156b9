//! Run configuration for the console driver.

use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

/// Resolved settings for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Memory image to load.
    pub input: PathBuf,
    /// Base name for `<base>_memOut` and `<base>_trace`.
    pub output_base: String,
    /// Maximum number of `step` calls.
    pub max_cycles: u64,
}

impl RunConfig {
    /// Build a config, deriving the output base from the input file name
    /// when none is given.
    pub fn new(input: impl Into<PathBuf>, output_base: Option<String>, max_cycles: Option<u64>) -> Self {
        let input = input.into();
        let output_base = output_base.unwrap_or_else(|| default_base_name(&input));
        Self {
            input,
            output_base,
            max_cycles: max_cycles.unwrap_or(u64::MAX),
        }
    }

    pub fn mem_out_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_memOut", self.output_base))
    }

    pub fn trace_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_trace", self.output_base))
    }
}

/// File name without directories and without its last extension.
/// A name whose only dot is the leading one (`.img`) is kept whole.
pub fn default_base_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match name.rfind('.') {
        Some(dot) if dot > 0 => name[..dot].to_string(),
        _ => name,
    }
}
