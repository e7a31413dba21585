//! Stable, instrumented merge sort for the hotspot CSV export.
//!
//! The `sort` module holds the algorithm and its counters; `record` parses
//! input lines, and `report` writes the sorted file and the statistics.

/// Use mimalloc as the global allocator. Every merge clones each record in
/// its range, so sorting is dominated by small allocations.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod error;
pub mod record;
pub mod report;
pub mod sort;

pub use error::{Error, Result};
