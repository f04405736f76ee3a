//! Plain-text matrix format.
//!
//! ```text
//!
//! 2,3
//! 1,2,3
//! 4,5,6
//! ```
//!
//! A matrix is written as a blank line, a `rows,cols` header and one
//! comma-separated line per row. Values use the shortest representation that
//! parses back to the same `f64`. On load, blank lines and lines starting
//! with `--` are skipped, so files may carry comments and several matrices.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::math::{Matrix, MatrixRead};

const MAX_PREALLOCATED_VALUES: usize = 1 << 16;

/// Write `matrix` to `writer`.
pub fn save<W: Write>(matrix: &impl MatrixRead, writer: &mut W) -> Result<()> {
    let (rows, cols) = matrix.shape();
    writeln!(writer).context("Failed to write matrix separator")?;
    writeln!(writer, "{},{}", rows, cols).context("Failed to write matrix header")?;

    if cols > 0 {
        let values = matrix.to_row_major();
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut *writer);
        for (row_idx, row) in values.chunks(cols).enumerate() {
            csv_writer
                .write_record(row.iter().map(|v| v.to_string()))
                .with_context(|| format!("Failed to write matrix row {}", row_idx))?;
        }
        csv_writer.flush().context("Failed to flush matrix rows")?;
    }
    log::debug!("saved {}x{} matrix", rows, cols);
    Ok(())
}

/// Read the next matrix from `reader`.
///
/// Only the lines belonging to that matrix are consumed, so repeated calls
/// read consecutive matrices from one stream.
pub fn load<R: BufRead>(reader: &mut R) -> Result<Matrix> {
    let header = next_content_line(reader)?.ok_or_else(|| anyhow!("No matrix header found"))?;
    let dims = parse_record(&header).context("Failed to parse matrix header")?;
    if dims.len() != 2 {
        return Err(anyhow!(
            "Matrix header must be `rows,cols`, found {} fields in '{}'",
            dims.len(),
            header.trim()
        ));
    }
    let rows: usize = dims[0]
        .parse()
        .with_context(|| format!("Invalid row count '{}'", &dims[0]))?;
    let cols: usize = dims[1]
        .parse()
        .with_context(|| format!("Invalid column count '{}'", &dims[1]))?;

    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| anyhow!("Matrix header {}x{} is too large", rows, cols))?;

    // grow with the rows actually read; the header alone is not trusted
    let mut data = Vec::with_capacity(len.min(MAX_PREALLOCATED_VALUES));
    // a zero-column matrix has no row lines
    if cols > 0 {
        for row_idx in 0..rows {
            let line = next_content_line(reader)?
                .ok_or_else(|| anyhow!("Expected {} rows, found {}", rows, row_idx))?;
            let record = parse_record(&line).with_context(|| format!("Failed to read row {}", row_idx))?;
            if record.len() != cols {
                return Err(anyhow!(
                    "Row {} has {} values, expected {}",
                    row_idx,
                    record.len(),
                    cols
                ));
            }
            for (col_idx, field) in record.iter().enumerate() {
                let value = field
                    .parse::<f64>()
                    .with_context(|| format!("Invalid value '{}' at row {}, column {}", field, row_idx, col_idx))?;
                data.push(value);
            }
        }
    }

    log::debug!("loaded {}x{} matrix", rows, cols);
    Matrix::from_shape_vec((rows, cols), data).context("Failed to build matrix")
}

/// Write `matrix` to a new file at `path`, replacing any existing file.
pub fn save_to_path<P: AsRef<Path>>(matrix: &impl MatrixRead, path: P) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("Failed to create matrix file: {}", path.as_ref().display()))?;
    let mut writer = BufWriter::new(file);
    save(matrix, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write matrix file: {}", path.as_ref().display()))
}

/// Read the first matrix stored in the file at `path`.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Matrix> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open matrix file: {}", path.as_ref().display()))?;
    load(&mut BufReader::new(file))
        .with_context(|| format!("Failed to load matrix from {}", path.as_ref().display()))
}

impl Matrix {
    /// See [`save`].
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        save(self, writer)
    }

    /// See [`load`].
    pub fn load<R: BufRead>(reader: &mut R) -> Result<Matrix> {
        load(reader)
    }
}

/// Next line that is neither blank nor a `--` comment, or `None` at end of input.
fn next_content_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).context("Failed to read matrix text")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        return Ok(Some(trimmed.to_string()));
    }
}

fn parse_record(line: &str) -> Result<StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Err(anyhow!("Empty record"));
    }
    Ok(record)
}
