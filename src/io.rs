// Sequence and alignment file boundary: FASTA via noodles, GenBank via gb-io.

use crate::alignment::AlignmentMatrix;
use crate::error::{AlignError, Result};
use crate::sequence::{Sequence, SequenceSet};
use noodles::fasta;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const LINE_WIDTH: usize = 60;

fn read_fasta_records(path: &Path) -> Result<Vec<Sequence>> {
    let file = File::open(path).map_err(|e| {
        AlignError::unreadable(
            path,
            format!("{e} -- make sure the file exists and contains sequences in fasta format"),
        )
    })?;
    let mut reader = fasta::io::Reader::new(BufReader::new(file));

    let mut sequences = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AlignError::unreadable(path, e))?;
        let mut sequence = Sequence::new(
            String::from_utf8_lossy(record.name()).into_owned(),
            record.sequence().as_ref().to_vec(),
        );
        sequence.description = record
            .description()
            .map(|d| String::from_utf8_lossy(d).into_owned());
        sequences.push(sequence);
    }
    Ok(sequences)
}

/// Reads every FASTA file into one set. Nothing is returned unless all files
/// parse and no identifier repeats with different residues.
pub fn read_sequences<P: AsRef<Path>>(paths: &[P]) -> Result<SequenceSet> {
    let mut set = SequenceSet::new();
    for path in paths {
        for sequence in read_fasta_records(path.as_ref())? {
            set.insert(sequence)?;
        }
    }
    Ok(set)
}

fn is_genbank(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("gb") | Some("genbank")
    )
}

/// Reads exactly one reference record, GenBank for `.gb`/`.genbank`,
/// FASTA otherwise.
pub fn read_single_reference(path: &Path) -> Result<Sequence> {
    if !path.is_file() {
        return Err(AlignError::unreadable(
            path,
            "cannot read reference sequence, make sure the file exists",
        ));
    }

    let mut records: Vec<Sequence> = if is_genbank(path) {
        gb_io::reader::parse_file(path)
            .map_err(|e| AlignError::unreadable(path, e))?
            .into_iter()
            .map(|seq| {
                let id = seq
                    .version
                    .clone()
                    .or_else(|| seq.accession.clone())
                    .or_else(|| seq.name.clone())
                    .unwrap_or_default();
                let mut sequence = Sequence::new(id, seq.seq);
                sequence.description = seq.definition;
                sequence
            })
            .collect()
    } else {
        read_fasta_records(path)?
    };

    if records.len() != 1 {
        return Err(AlignError::unreadable(
            path,
            format!(
                "expected one sequence in genbank or fasta format, found {}",
                records.len()
            ),
        ));
    }
    Ok(records.remove(0))
}

/// Reads an aligned FASTA file. Empty or ragged files are unreadable.
pub fn read_alignment(path: &Path) -> Result<AlignmentMatrix> {
    let rows = read_fasta_records(path)?;
    if rows.is_empty() {
        return Err(AlignError::unreadable(path, "no records found"));
    }
    AlignmentMatrix::new(rows).map_err(|e| AlignError::unreadable(path, e))
}

pub fn write_fasta<'a, I>(sequences: I, path: &Path) -> Result<()>
where
    I: IntoIterator<Item = &'a Sequence>,
{
    let write = || -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for sequence in sequences {
            match &sequence.description {
                Some(description) => writeln!(writer, ">{} {}", sequence.id, description)?,
                None => writeln!(writer, ">{}", sequence.id)?,
            }
            for line in sequence.residues.chunks(LINE_WIDTH) {
                writer.write_all(line)?;
                writer.write_all(b"\n")?;
            }
        }
        writer.flush()
    };
    write().map_err(|e| AlignError::write(path, e))
}

pub fn write_alignment(matrix: &AlignmentMatrix, path: &Path) -> Result<()> {
    write_fasta(matrix.rows(), path)
}
