//! CSV reporting for the bench runner.
//!
//! The source's `CSVWriter` opens the file once per row and appends a
//! trailing newline by hand; here the `csv` crate owns buffering and
//! quoting, and a `BenchRow` is just the record shape the source's
//! `overallHeadings`/`overallResults` pair described informally.

use std::path::Path;

use serde::Serialize;

/// One row of the benchmark report: one codec run against one input file.
#[derive(Clone, Debug, Serialize)]
pub struct BenchRow {
    pub file: String,
    pub codec: String,
    pub params: String,
    pub original_bytes: u64,
    pub entropy_bits_per_byte: f64,
    pub encoded_bytes: u64,
    pub ratio: f64,
    pub encode_seconds: f64,
    pub decode_seconds: f64,
}

/// Shannon entropy of a byte slice, in bits per byte -- the same quantity
/// `Experimenter::calculateEntropy` computes from a character histogram.
pub fn entropy_bits_per_byte(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut counts = [0u64; 256];
    for &b in data {
        counts[b as usize] += 1;
    }
    let len = data.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Write all rows to `path` as CSV, header first. Overwrites any existing file.
pub fn write_rows<P: AsRef<Path>>(path: P, rows: &[BenchRow]) -> Result<(), crate::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
