//! Memory image files.
//!
//! This module provides:
//! - A tolerant loader for project (binary) and benchmark (hex) images
//! - Exporters for the final memory image and the execution trace

pub mod loader;
pub mod export;

pub use loader::{Image, LoadError, load_image, parse_image};
pub use export::{ExportError, render_memory, render_memory_cells, render_trace, write_memory, write_trace};
