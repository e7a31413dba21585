use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

use fmsort::common::{TOOL_NAME, reset_sigpipe};
use fmsort::record::FieldKey;
use fmsort::report::{OutputMode, format_summary};
use fmsort::sort::{
    DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_STATS_OUTPUT, SortConfig, sort_file,
};

#[derive(Parser)]
#[command(
    name = "fmsort",
    version,
    about = "Sort a hotspot CSV by one column with an instrumented merge sort"
)]
struct Cli {
    /// Column to sort by: name (lat, bioma, ...) or menu number 1-9.
    /// Prompts interactively when omitted.
    #[arg(short = 'k', long = "field", value_name = "FIELD")]
    field: Option<String>,

    /// Write the sorted CSV to FILE
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Write the statistics report to FILE
    #[arg(short = 's', long = "stats", value_name = "FILE", default_value = DEFAULT_STATS_OUTPUT)]
    stats: PathBuf,

    /// Copy source lines verbatim instead of rebuilding them from parsed fields
    #[arg(long = "raw")]
    raw: bool,

    /// Print progress to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Input CSV ("-" for standard input)
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,
}

/// Show the field menu and read one choice from stdin.
/// Returns None for 0, anything out of range, or unparsable input.
fn prompt_field() -> io::Result<Option<FieldKey>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out)?;
    writeln!(out, "===== MERGESORT CSV SORTING =====")?;
    writeln!(out)?;
    writeln!(out, "Choose the field to sort by:")?;
    for key in FieldKey::ALL {
        writeln!(out, "{}. {}", key.menu_index(), key.label())?;
    }
    writeln!(out, "0. Exit")?;
    writeln!(out)?;
    write!(out, "Option: ")?;
    out.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(FieldKey::from_menu_index))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let key = match cli.field {
        Some(ref spec) => spec.parse::<FieldKey>()?,
        None => match prompt_field().context("reading field choice")? {
            Some(key) => key,
            None => {
                println!("Invalid option or exit requested.");
                return Ok(());
            }
        },
    };

    let config = SortConfig {
        input: cli.input,
        output: cli.output,
        stats_output: cli.stats,
        key,
        mode: if cli.raw {
            OutputMode::Raw
        } else {
            OutputMode::Reconstruct
        },
        verbose: cli.verbose,
    };

    let summary =
        sort_file(&config).with_context(|| format!("sorting by {} failed", config.key))?;

    println!();
    print!("{}", format_summary(&summary));
    Ok(())
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", TOOL_NAME, e);
        process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;
    use std::process::{Command, Output, Stdio};

    const CSV: &[u8] = b"id_bdq,foco_id,lat,lon,data_pas,pais,estado,municipio,bioma\n\
1,a,-26.5,-49.0,2024-01-02,Brasil,SC,Blumenau,Mata Atlantica\n\
2,b,-28.25,-50.5,2024-01-01,Brasil,SC,Lages,Pampa\n\
3,c,-27.0,-48.5,2024-01-03,Brasil,SC,Florianopolis,Mata Atlantica\n";

    fn cmd() -> Command {
        let mut path = std::env::current_exe().unwrap();
        path.pop();
        path.pop();
        path.push("fmsort");
        Command::new(path)
    }

    fn run_with_stdin(command: &mut Command, input: &[u8]) -> Output {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child.stdin.take().unwrap().write_all(input).unwrap();
        child.wait_with_output().unwrap()
    }

    /// Point -o and -s into `dir` and read from `input`.
    fn sort_cmd(dir: &Path, input: &Path) -> Command {
        let mut c = cmd();
        c.arg("-o")
            .arg(dir.join("out.csv"))
            .arg("-s")
            .arg(dir.join("stats.txt"))
            .arg(input);
        c
    }

    fn ids_of(csv: &str) -> Vec<&str> {
        csv.lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect()
    }

    #[test]
    fn test_help() {
        let output = cmd().arg("--help").output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Usage:"));
        assert!(stdout.contains("--field"));
        assert!(stdout.contains("--raw"));
    }

    #[test]
    fn test_menu_exit_choice() {
        let output = run_with_stdin(&mut cmd(), b"0\n");
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("===== MERGESORT CSV SORTING ====="));
        assert!(stdout.contains("9. bioma"));
        assert!(stdout.contains("Invalid option or exit requested."));
    }

    #[test]
    fn test_menu_out_of_range_choice() {
        let output = run_with_stdin(&mut cmd(), b"42\n");
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Invalid option or exit requested."));
    }

    #[test]
    fn test_menu_choice_sorts_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, CSV).unwrap();

        // 5 = data_pas
        let output = run_with_stdin(&mut sort_cmd(dir.path(), &input), b"5\n");
        assert!(output.status.success());
        let sorted = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(ids_of(&sorted), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_invalid_field_is_usage_error() {
        let output = cmd().args(["-k", "altitude"]).output().unwrap();
        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.starts_with("fmsort:"));
        assert!(stderr.contains("altitude"));
    }

    #[test]
    fn test_missing_input_exits_2() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.csv");
        let output = sort_cmd(dir.path(), &input)
            .args(["-k", "lat"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.starts_with("fmsort:"));
        assert!(stderr.contains("absent.csv"));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_sort_by_latitude_prints_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, CSV).unwrap();

        let output = sort_cmd(dir.path(), &input)
            .args(["-k", "lat"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("===== RUN SUMMARY ====="));
        assert!(stdout.contains("Records: 3"));
        assert!(stdout.contains("Sort field: lat"));
        assert!(stdout.contains("Comparisons: 3"));
        assert!(stdout.contains("Movements: 10"));

        let sorted = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert!(sorted.starts_with("id_bdq,foco_id,lat,lon,"));
        assert_eq!(ids_of(&sorted), vec!["2", "3", "1"]);
        assert!(sorted.contains("-28.250000"));

        let report = std::fs::read_to_string(dir.path().join("stats.txt")).unwrap();
        assert!(report.contains("Total records: 3"));
        assert!(report.contains("Total movements: 10"));
    }

    #[test]
    fn test_raw_keeps_source_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, CSV).unwrap();

        let output = sort_cmd(dir.path(), &input)
            .args(["-k", "bioma", "--raw"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let sorted = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        let expected = "id_bdq,foco_id,lat,lon,data_pas,pais,estado,municipio,bioma\n\
1,a,-26.5,-49.0,2024-01-02,Brasil,SC,Blumenau,Mata Atlantica\n\
3,c,-27.0,-48.5,2024-01-03,Brasil,SC,Florianopolis,Mata Atlantica\n\
2,b,-28.25,-50.5,2024-01-01,Brasil,SC,Lages,Pampa\n";
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_stdin_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = sort_cmd(dir.path(), Path::new("-"));
        c.args(["-k", "1"]);
        let output = run_with_stdin(&mut c, CSV);
        assert!(output.status.success());
        let sorted = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(ids_of(&sorted), vec!["1", "2", "3"]);
    }
}
