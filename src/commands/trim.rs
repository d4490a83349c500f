// Reference trimming of an alignment that is already on disk, and the
// post-alignment steps shared with `align`.

use crate::alignment::AlignmentMatrix;
use crate::error::Result;
use crate::finalize::{fill_gaps, finalize};
use crate::io::{read_alignment, write_alignment};
use crate::notes::Notes;
use crate::trim::{remove_reference, trim};
use log::info;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `path` with `suffix` appended to its file name, e.g. `out.fasta.log`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Where the insertion table for an output alignment goes.
pub fn insertion_report_path(output: &Path) -> PathBuf {
    with_suffix(output, ".insertions.csv")
}

/// Normalizes aligner output, trims it to the reference and applies the
/// requested removals and substitutions.
pub fn reconcile(
    matrix: AlignmentMatrix,
    reference: Option<&str>,
    remove_ref: bool,
    fill: bool,
    insertion_report: Option<&Path>,
    notes: &mut Notes,
) -> Result<AlignmentMatrix> {
    let mut matrix = finalize(matrix, notes)?;

    if let Some(reference) = reference {
        let (trimmed, report_written) = trim(&matrix, reference, insertion_report, notes)?;
        if report_written {
            if let Some(path) = insertion_report {
                info!("Wrote insertions relative to {} to {}", reference, path.display());
            }
        }
        matrix = trimmed;
        if remove_ref {
            matrix = remove_reference(&matrix, reference);
        }
    }

    if fill {
        matrix = fill_gaps(matrix)?;
    }
    Ok(matrix)
}

#[derive(Debug, Clone)]
pub struct TrimOptions {
    pub alignment: PathBuf,
    pub output: PathBuf,
    pub reference_name: String,
    pub remove_reference: bool,
    pub fill_gaps: bool,
}

pub fn run_trim(opts: &TrimOptions, notes: &mut Notes) -> Result<AlignmentMatrix> {
    let matrix = read_alignment(&opts.alignment)?;
    info!(
        "Read {} aligned sequences ({} columns) from {}",
        matrix.len(),
        matrix.width(),
        opts.alignment.display()
    );

    let report = insertion_report_path(&opts.output);
    let matrix = reconcile(
        matrix,
        Some(&opts.reference_name),
        opts.remove_reference,
        opts.fill_gaps,
        Some(&report),
        notes,
    )?;

    write_alignment(&matrix, &opts.output)?;
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlignError;
    use crate::sequence::Sequence;

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("dir/out.fasta"), ".log"),
            PathBuf::from("dir/out.fasta.log")
        );
    }

    #[test]
    fn test_reconcile_order_of_steps() {
        let matrix = AlignmentMatrix::new(vec![
            Sequence::new("ref", "ac-gt-"),
            Sequence::new("_R_x", "actg--"),
        ])
        .unwrap();
        let mut notes = Notes::new();

        let out = reconcile(matrix, Some("ref"), true, true, None, &mut notes).unwrap();

        assert_eq!(out.names().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(out.rows()[0].residues, b"ACGN");
    }

    #[test]
    fn test_reconcile_strips_marker_before_lookup() {
        let matrix = AlignmentMatrix::new(vec![
            Sequence::new("_R_ref", "AC-GT"),
            Sequence::new("x", "ACTGT"),
        ])
        .unwrap();

        let out = reconcile(matrix, Some("ref"), false, false, None, &mut Notes::new()).unwrap();
        assert_eq!(out.width(), 4);
    }

    #[test]
    fn test_run_trim_missing_reference() {
        let dir = tempfile::TempDir::new().unwrap();
        let alignment = dir.path().join("aln.fasta");
        std::fs::write(&alignment, ">a\nAC-GT\n>b\nACTGT\n").unwrap();
        let opts = TrimOptions {
            alignment,
            output: dir.path().join("out.fasta"),
            reference_name: "missing".to_string(),
            remove_reference: false,
            fill_gaps: false,
        };

        assert!(matches!(
            run_trim(&opts, &mut Notes::new()),
            Err(AlignError::ReferenceRowNotFound(_))
        ));
        assert!(!opts.output.exists());
    }
}
