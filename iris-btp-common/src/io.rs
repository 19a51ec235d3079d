//! Text codecs for the four on-disk formats: iris-code matrices, protected
//! templates, comparison lists, and score files.

use crate::bits::BitMatrix;
use crate::error::{Error, Result};
use crate::template::{BloomFilter, BloomTemplate};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

fn parse_bit_line(line: &str, path: &Path, line_no: usize) -> Result<Vec<bool>> {
    let mut bits = Vec::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '0' => bits.push(false),
            '1' => bits.push(true),
            c if c.is_whitespace() => {}
            c => {
                return Err(Error::MalformedInput(format!(
                    "{}:{}: invalid character {:?} in bit row",
                    path.display(),
                    line_no,
                    c
                )))
            }
        }
    }
    Ok(bits)
}

fn read_bit_rows(path: &Path) -> Result<Vec<Vec<bool>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_bit_line(&line, path, i + 1)?);
    }
    Ok(rows)
}

/// Read an iris-code matrix: one row per line, bits as `0`/`1` characters,
/// optionally whitespace-separated.
pub fn read_iris_code(path: &Path) -> Result<BitMatrix> {
    let rows = read_bit_rows(path)?;
    BitMatrix::from_rows(&rows)
        .map_err(|e| Error::MalformedInput(format!("{}: {}", path.display(), e)))
}

/// Write a protected template, one Bloom filter per line with bits
/// space-separated, matching the reference `%d` text output.
pub fn write_template(path: &Path, template: &BloomTemplate) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut line = String::with_capacity(2 * template.filter_len());
    for filter in template.filters() {
        line.clear();
        for (i, bit) in filter.bits().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push(if bit { '1' } else { '0' });
        }
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a protected template back from its text form. A missing file is a
/// `MissingResource`, since templates are referenced by comparison lists.
pub fn read_template(path: &Path) -> Result<BloomTemplate> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::MissingResource(path.display().to_string())
        } else {
            Error::Io(e)
        }
    })?;
    let reader = BufReader::new(file);
    let mut filters = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let bits = parse_bit_line(&line, path, i + 1)?;
        filters.push(
            BloomFilter::from_bits(&bits)
                .map_err(|e| Error::MalformedInput(format!("{}: {}", path.display(), e)))?,
        );
    }
    BloomTemplate::from_filters(filters)
        .map_err(|e| Error::MalformedInput(format!("{}: {}", path.display(), e)))
}

/// Read a comparison list: one comparison per line, two whitespace-separated
/// template identifiers, each a bare filename without directory components.
pub fn read_comparison_list(path: &Path) -> Result<Vec<(String, String)>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut pairs = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = line.split_whitespace().collect::<Vec<_>>();
        if fields.len() != 2 {
            return Err(Error::MalformedInput(format!(
                "{}:{}: expected two template identifiers, found {}",
                path.display(),
                i + 1,
                fields.len()
            )));
        }
        for field in &fields {
            if field.contains('/') || field.contains('\\') {
                return Err(Error::MalformedInput(format!(
                    "{}:{}: identifier {:?} must be a bare filename",
                    path.display(),
                    i + 1,
                    field
                )));
            }
        }
        pairs.push((fields[0].to_owned(), fields[1].to_owned()));
    }
    Ok(pairs)
}

/// Write scores one per line, in the order they were computed.
pub fn write_scores(path: &Path, scores: &[f64]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for score in scores {
        writeln!(writer, "{}", score)?;
    }
    writer.flush()?;
    Ok(())
}
