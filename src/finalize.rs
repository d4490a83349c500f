use crate::alignment::{AlignmentMatrix, GAP};
use crate::error::Result;
use crate::notes::{Note, Notes};

/// Prefix MAFFT's `--adjustdirection` puts on reoriented sequences.
pub const REVERSE_COMPLEMENT_MARKER: &str = "_R_";

/// Fully ambiguous nucleotide.
pub const AMBIGUOUS: u8 = b'N';

/// Uppercases residues and strips the reverse-complement marker from
/// identifiers and descriptions. Safe to apply more than once.
pub fn finalize(matrix: AlignmentMatrix, notes: &mut Notes) -> Result<AlignmentMatrix> {
    matrix.map_rows(|mut row| {
        row.residues.make_ascii_uppercase();
        if let Some(id) = row.id.strip_prefix(REVERSE_COMPLEMENT_MARKER) {
            row.id = id.to_string();
            notes.push(Note::ReverseComplemented {
                name: row.id.clone(),
            });
        }
        if let Some(description) = row
            .description
            .as_deref()
            .and_then(|d| d.strip_prefix(REVERSE_COMPLEMENT_MARKER))
        {
            row.description = Some(description.to_string());
        }
        row
    })
}

/// Replaces every gap with `N`, marking it as missing data rather than a
/// deletion. Lossy.
pub fn fill_gaps(matrix: AlignmentMatrix) -> Result<AlignmentMatrix> {
    matrix.map_rows(|mut row| {
        for residue in row.residues.iter_mut().filter(|r| **r == GAP) {
            *residue = AMBIGUOUS;
        }
        row
    })
}
