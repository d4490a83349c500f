use crate::alignment::{AlignmentMatrix, GAP};
use crate::error::{AlignError, Result};
use crate::insertions::{catalog_insertions, write_report};
use crate::notes::{Note, Notes};
use std::path::Path;

/// One entry per column, true where the reference row holds a residue.
pub fn reference_mask(matrix: &AlignmentMatrix, reference: &str) -> Result<Vec<bool>> {
    let row = matrix
        .row(reference)
        .ok_or_else(|| AlignError::ReferenceRowNotFound(reference.to_string()))?;
    Ok(row.residues.iter().map(|&r| r != GAP).collect())
}

/// Drops every column gapped in the reference, so the result is exactly as
/// wide as the ungapped reference.
///
/// When columns are dropped and `insertion_report` is given, the dropped
/// material is cataloged and written there first. Returns the trimmed matrix
/// and whether a report was written.
pub fn trim(
    matrix: &AlignmentMatrix,
    reference: &str,
    insertion_report: Option<&Path>,
    notes: &mut Notes,
) -> Result<(AlignmentMatrix, bool)> {
    let mask = reference_mask(matrix, reference)?;

    if mask.iter().all(|&real| real) {
        notes.push(Note::NoGapsInReference {
            reference: reference.to_string(),
        });
        return Ok((matrix.clone(), false));
    }

    let mut report_written = false;
    if let Some(path) = insertion_report {
        let report = catalog_insertions(matrix, &mask, notes);
        write_report(&report, path)?;
        report_written = true;
    }

    let trimmed = matrix.project(&mask)?;
    notes.push(Note::Trimmed {
        reference: reference.to_string(),
        removed_columns: matrix.width() - trimmed.width(),
    });
    Ok((trimmed, report_written))
}

/// Every row except `reference`. A no-op when the row is already gone.
pub fn remove_reference(matrix: &AlignmentMatrix, reference: &str) -> AlignmentMatrix {
    matrix.filter_rows(|row| row.id != reference)
}
