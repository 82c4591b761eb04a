// sequence loading for the command-line tools
// FASTA, FASTQ or one-sequence-per-line text, optionally gzipped

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Fasta,
    Fastq,
    Plain,
}

/// Load every sequence in `path`, upper-cased, in file order.
pub fn load_sequences(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let reader = open(path)?;
    let records = parse(reader)?;
    if records.is_empty() {
        return Err(Error::NoSequence {
            path: path.to_path_buf(),
        });
    }
    log::debug!("Loaded {} sequences from {}", records.len(), path.display());
    Ok(records)
}

/// Load `path` as a single sequence, joining all records.
pub fn load_sequence(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let sequence = load_sequences(path)?.concat();
    log::info!("Loaded {} bases from {}", sequence.len(), path.display());
    Ok(sequence)
}

fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

fn parse(reader: impl BufRead) -> Result<Vec<String>> {
    let mut records: Vec<String> = Vec::new();
    let mut format: Option<Format> = None;
    let mut line_count = 0usize;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fmt = *format.get_or_insert_with(|| match line.as_bytes()[0] {
            b'>' => Format::Fasta,
            b'@' => Format::Fastq,
            _ => Format::Plain,
        });
        line_count += 1;

        match fmt {
            Format::Fasta => {
                if line.starts_with('>') {
                    records.push(String::new());
                } else if let Some(current) = records.last_mut() {
                    current.push_str(&line.to_ascii_uppercase());
                }
            }
            // sequence is on line 2, 6, 10, ... of the record stream
            Format::Fastq => {
                if line_count % 4 == 2 {
                    records.push(line.to_ascii_uppercase());
                }
            }
            Format::Plain => records.push(line.to_ascii_uppercase()),
        }
    }

    records.retain(|r| !r.is_empty());
    Ok(records)
}
