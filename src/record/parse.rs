/// Line splitting and field parsing for the comma-delimited export.
use std::path::Path;

use memchr::{memchr, memchr_iter};

use super::core::{FIELD_COUNT, FieldKey, Record};
use crate::common::io::read_input;
use crate::error::{Error, Result};

/// A parsed input file: the header line and every data record in file order.
#[derive(Debug, Clone, Default)]
pub struct ParsedInput {
    /// First line of the file, without its terminator.
    pub header: Vec<u8>,
    pub records: Vec<Record>,
}

/// C `isspace`: space, \t, \n, \v, \f, \r.
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Shrink `(start, end)` so it excludes leading and trailing whitespace.
#[inline]
fn trim_span(line: &[u8], mut start: usize, mut end: usize) -> (usize, usize) {
    while start < end && is_space(line[start]) {
        start += 1;
    }
    while end > start && is_space(line[end - 1]) {
        end -= 1;
    }
    (start, end)
}

/// Length of the longest prefix that reads as a decimal float:
/// `[+-]digits[.digits][(e|E)[+-]digits]`. Zero if there are no digits.
fn numeric_prefix_len(s: &[u8]) -> usize {
    let mut i = 0;
    if i < s.len() && (s[i] == b'+' || s[i] == b'-') {
        i += 1;
    }
    let mut has_digits = false;
    while i < s.len() && s[i].is_ascii_digit() {
        i += 1;
        has_digits = true;
    }
    if i < s.len() && s[i] == b'.' {
        i += 1;
        while i < s.len() && s[i].is_ascii_digit() {
            i += 1;
            has_digits = true;
        }
    }
    if !has_digits {
        return 0;
    }
    // Exponent only counts when at least one digit follows it
    if i < s.len() && (s[i] == b'e' || s[i] == b'E') {
        let mut j = i + 1;
        if j < s.len() && (s[j] == b'+' || s[j] == b'-') {
            j += 1;
        }
        if j < s.len() && s[j].is_ascii_digit() {
            while j < s.len() && s[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

/// Parse a coordinate the way `atof` does: use the leading numeric prefix,
/// fall back to 0.0 when there is none.
pub fn parse_coordinate(s: &[u8]) -> f64 {
    let (start, end) = trim_span(s, 0, s.len());
    let s = &s[start..end];
    let n = numeric_prefix_len(s);
    if n == 0 {
        return 0.0;
    }
    std::str::from_utf8(&s[..n])
        .ok()
        .and_then(|t| t.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Split one data line into a `Record`.
///
/// At most nine columns are read; columns beyond the ninth stay in the raw
/// line only. Missing columns are empty text or 0.0.
pub fn parse_line(line: &[u8]) -> Record {
    let mut spans = [(line.len(), line.len()); FIELD_COUNT];
    let mut field_count = 0;
    let mut start = 0;

    while field_count < FIELD_COUNT {
        let end = match memchr(b',', &line[start..]) {
            Some(pos) => start + pos,
            None => line.len(),
        };
        spans[field_count] = trim_span(line, start, end);
        field_count += 1;
        if end == line.len() {
            break;
        }
        start = end + 1;
    }

    let coordinate = |key: FieldKey| {
        let (s, e) = spans[key.column()];
        parse_coordinate(&line[s..e])
    };
    let lat = coordinate(FieldKey::Latitude);
    let lon = coordinate(FieldKey::Longitude);

    Record::from_parts(line.into(), spans, lat, lon, field_count)
}

/// Split a whole file into header + records.
///
/// Lines end in LF; a CR before the LF is dropped. Blank (all-whitespace)
/// data lines are skipped. A last line without a terminator still counts.
pub fn parse_records(data: &[u8]) -> ParsedInput {
    let mut lines = Vec::with_capacity(data.len() / 64 + 1);
    let mut start = 0usize;
    for pos in memchr_iter(b'\n', data) {
        lines.push(strip_cr(data, start, pos));
        start = pos + 1;
    }
    if start < data.len() {
        lines.push(strip_cr(data, start, data.len()));
    }

    let mut iter = lines.into_iter();
    let header = match iter.next() {
        Some((s, e)) => data[s..e].to_vec(),
        None => return ParsedInput::default(),
    };

    let records = iter
        .filter(|&(s, e)| {
            let (ts, te) = trim_span(data, s, e);
            ts < te
        })
        .map(|(s, e)| parse_line(&data[s..e]))
        .collect();

    ParsedInput { header, records }
}

#[inline]
fn strip_cr(data: &[u8], start: usize, mut end: usize) -> (usize, usize) {
    if end > start && data[end - 1] == b'\r' {
        end -= 1;
    }
    (start, end)
}

/// Read and parse an input file ("-" for stdin).
/// A file with no bytes at all has no header and is rejected.
pub fn read_records(path: &Path) -> Result<ParsedInput> {
    let data = read_input(path).map_err(|e| Error::io(path, e))?;
    if data.is_empty() {
        return Err(Error::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(parse_records(&data))
}
