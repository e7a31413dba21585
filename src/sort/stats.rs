use std::time::Duration;

/// Counters collected by one sort run.
///
/// Owned by the caller and passed down by `&mut`; nothing here is global,
/// so independent sorts never see each other's counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Comparator invocations.
    pub comparisons: u64,
    /// Whole-record copies between the array and merge temporaries.
    pub movements: u64,
    /// Wall-clock time spent inside the sort only.
    pub elapsed: Duration,
}

impl SortStats {
    pub fn new() -> SortStats {
        SortStats::default()
    }

    /// Zero every counter before a new run.
    pub fn reset(&mut self) {
        *self = SortStats::default();
    }

    /// Elapsed time in fractional seconds, as printed in reports.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
