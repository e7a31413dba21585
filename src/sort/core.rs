/// Stable top-down merge sort over parsed records, plus the file-level driver.
///
/// Every merge copies both runs out to scoped temporaries and writes them
/// back, and every copy is counted: comparison and movement totals are exact
/// and reproducible for a given input.
use std::cmp::Ordering;
use std::mem;
use std::path::PathBuf;
use std::time::Instant;

use super::compare::compare_records;
use super::stats::SortStats;
use crate::common::progress;
use crate::error::Result;
use crate::record::{FieldKey, ParsedInput, Record, read_records};
use crate::report::{OutputMode, StatsReport, write_sorted_csv, write_stats_report, write_to_path};

/// Merge the sorted runs `records[left..=middle]` and `records[middle+1..=right]`.
///
/// Both runs are cloned into temporaries (one movement per record), then
/// written back in order (one movement per record). On ties the left run
/// wins, which keeps the sort stable. Once either side runs dry the rest of
/// the other is appended without further comparisons.
pub fn merge(
    records: &mut [Record],
    left: usize,
    middle: usize,
    right: usize,
    key: FieldKey,
    stats: &mut SortStats,
) {
    debug_assert!(left <= middle && middle < right && right < records.len());

    let mut lhs = records[left..=middle].to_vec();
    let mut rhs = records[middle + 1..=right].to_vec();
    stats.movements += (lhs.len() + rhs.len()) as u64;

    let (mut i, mut j, mut k) = (0, 0, left);

    while i < lhs.len() && j < rhs.len() {
        if compare_records(&lhs[i], &rhs[j], key, stats) != Ordering::Greater {
            records[k] = mem::take(&mut lhs[i]);
            i += 1;
        } else {
            records[k] = mem::take(&mut rhs[j]);
            j += 1;
        }
        stats.movements += 1;
        k += 1;
    }

    while i < lhs.len() {
        records[k] = mem::take(&mut lhs[i]);
        stats.movements += 1;
        i += 1;
        k += 1;
    }

    while j < rhs.len() {
        records[k] = mem::take(&mut rhs[j]);
        stats.movements += 1;
        j += 1;
        k += 1;
    }

    debug_assert_eq!(k, right + 1);
}

/// Sort `records[left..=right]` in place by `key`.
/// Ranges of zero or one element are already sorted.
pub fn merge_sort_range(
    records: &mut [Record],
    left: usize,
    right: usize,
    key: FieldKey,
    stats: &mut SortStats,
) {
    if left >= right {
        return;
    }
    let middle = left + (right - left) / 2;
    merge_sort_range(records, left, middle, key, stats);
    merge_sort_range(records, middle + 1, right, key, stats);
    merge(records, left, middle, right, key, stats);
}

/// Sort a whole slice in place by `key`, ascending and stable.
pub fn merge_sort(records: &mut [Record], key: FieldKey, stats: &mut SortStats) {
    if records.len() > 1 {
        merge_sort_range(records, 0, records.len() - 1, key, stats);
    }
}

/// Run one instrumented sort into a caller-owned context.
/// Counters are reset first; the timer brackets the sort and nothing else.
pub fn sort_records_with(records: &mut [Record], key: FieldKey, stats: &mut SortStats) {
    stats.reset();
    let start = Instant::now();
    merge_sort(records, key, stats);
    stats.elapsed = start.elapsed();
}

/// Run one instrumented sort and return its counters.
pub fn sort_records(records: &mut [Record], key: FieldKey) -> SortStats {
    let mut stats = SortStats::new();
    sort_records_with(records, key, &mut stats);
    stats
}

/// Configuration for a file sort run.
#[derive(Debug, Clone)]
pub struct SortConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats_output: PathBuf,
    pub key: FieldKey,
    pub mode: OutputMode,
    pub verbose: bool,
}

pub const DEFAULT_INPUT: &str = "focos_br_sc_ref_2024.csv";
pub const DEFAULT_OUTPUT: &str = "dados_ordenados.csv";
pub const DEFAULT_STATS_OUTPUT: &str = "estatisticas_execucao.txt";

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            stats_output: PathBuf::from(DEFAULT_STATS_OUTPUT),
            key: FieldKey::Id,
            mode: OutputMode::Reconstruct,
            verbose: false,
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub records: usize,
    pub key: FieldKey,
    pub stats: SortStats,
    pub output: PathBuf,
    pub stats_output: PathBuf,
}

/// Read, sort, and write: the sorted CSV first, then the statistics report.
pub fn sort_file(config: &SortConfig) -> Result<RunSummary> {
    progress(
        config.verbose,
        format_args!("reading {}", config.input.display()),
    );
    let ParsedInput {
        header,
        mut records,
    } = read_records(&config.input)?;
    progress(config.verbose, format_args!("read {} records", records.len()));

    progress(config.verbose, format_args!("sorting by {}", config.key));
    let stats = sort_records(&mut records, config.key);
    progress(
        config.verbose,
        format_args!("sorted in {:.6} seconds", stats.elapsed_secs()),
    );

    progress(
        config.verbose,
        format_args!("writing {}", config.output.display()),
    );
    write_to_path(&config.output, |w| {
        write_sorted_csv(w, &header, &records, config.mode)
    })?;

    let report = StatsReport {
        input_name: config.input.display().to_string(),
        records: records.len(),
        key: config.key,
        stats,
    };
    progress(
        config.verbose,
        format_args!("writing {}", config.stats_output.display()),
    );
    write_to_path(&config.stats_output, |w| write_stats_report(w, &report))?;

    Ok(RunSummary {
        records: records.len(),
        key: config.key,
        stats,
        output: config.output.clone(),
        stats_output: config.stats_output.clone(),
    })
}
