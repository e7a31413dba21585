use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::record::{FieldKey, Record};
use crate::sort::{RunSummary, SortStats};

/// 256KB output buffer; sorted CSVs are written in one sequential pass.
const OUTPUT_BUF_SIZE: usize = 256 * 1024;

/// How sorted records are written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Rebuild each line from its parsed columns; coordinates as `%12.6f`.
    /// Lines that were missing columns are written raw instead.
    #[default]
    Reconstruct,
    /// Write every source line exactly as it was read.
    Raw,
}

/// Everything the statistics report prints.
#[derive(Debug, Clone)]
pub struct StatsReport {
    /// Name of the processed file, as the caller wants it shown.
    pub input_name: String,
    pub records: usize,
    pub key: FieldKey,
    pub stats: SortStats,
}

/// Write one record as `id,foco,lat,lon,data,pais,estado,municipio,bioma`.
fn write_reconstructed(out: &mut impl Write, r: &Record) -> io::Result<()> {
    out.write_all(r.id())?;
    out.write_all(b",")?;
    out.write_all(r.secondary_id())?;
    write!(out, ",{:12.6},{:12.6},", r.lat(), r.lon())?;
    out.write_all(r.date())?;
    for text in [r.country(), r.region1(), r.region2(), r.biome()] {
        out.write_all(b",")?;
        out.write_all(text)?;
    }
    out.write_all(b"\n")
}

/// Write the header line followed by every record in slice order.
pub fn write_sorted_csv(
    out: &mut impl Write,
    header: &[u8],
    records: &[Record],
    mode: OutputMode,
) -> io::Result<()> {
    out.write_all(header)?;
    out.write_all(b"\n")?;
    for r in records {
        if mode == OutputMode::Raw || !r.is_complete() {
            out.write_all(r.raw())?;
            out.write_all(b"\n")?;
        } else {
            write_reconstructed(out, r)?;
        }
    }
    Ok(())
}

/// Write the statistics block for one run.
pub fn write_stats_report(out: &mut impl Write, report: &StatsReport) -> io::Result<()> {
    let mut buf = itoa::Buffer::new();
    writeln!(out, "===== MERGESORT EXECUTION STATISTICS =====")?;
    writeln!(out)?;
    writeln!(out, "Input file: {}", report.input_name)?;
    writeln!(out, "Total records: {}", buf.format(report.records))?;
    writeln!(out, "Sort field: {}", report.key.name())?;
    writeln!(out)?;
    writeln!(out, "--- Performance Metrics ---")?;
    writeln!(
        out,
        "Sort time: {:.6} seconds",
        report.stats.elapsed_secs()
    )?;
    writeln!(
        out,
        "Total comparisons: {}",
        buf.format(report.stats.comparisons)
    )?;
    writeln!(out, "Total movements: {}", buf.format(report.stats.movements))?;
    writeln!(out)?;
    writeln!(out, "===== END OF STATISTICS =====")
}

/// The console summary printed after a successful run.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut buf = itoa::Buffer::new();
    let mut s = String::with_capacity(256);
    s.push_str("===== RUN SUMMARY =====\n");
    s.push_str(&format!("Sorted file: {}\n", summary.output.display()));
    s.push_str(&format!("Statistics: {}\n", summary.stats_output.display()));
    s.push_str(&format!("Records: {}\n", buf.format(summary.records)));
    s.push_str(&format!("Sort field: {}\n", summary.key));
    s.push_str(&format!(
        "Sort time: {:.6} seconds\n",
        summary.stats.elapsed_secs()
    ));
    s.push_str(&format!(
        "Comparisons: {}\n",
        buf.format(summary.stats.comparisons)
    ));
    s.push_str(&format!(
        "Movements: {}\n",
        buf.format(summary.stats.movements)
    ));
    s
}

/// Create `path`, hand a buffered writer to `f`, and flush.
/// I/O failures come back tagged with the path.
pub fn write_to_path<F>(path: &Path, f: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::with_capacity(OUTPUT_BUF_SIZE, file);
    f(&mut writer).map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))
}
