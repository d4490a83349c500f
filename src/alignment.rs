use crate::error::{AlignError, Result};
use crate::sequence::Sequence;

pub const GAP: u8 = b'-';

/// Rows of equal width. Column structure is fixed once built; any projection
/// goes through [`AlignmentMatrix::project`] and yields a new matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentMatrix {
    rows: Vec<Sequence>,
    width: usize,
}

impl AlignmentMatrix {
    pub fn new(rows: Vec<Sequence>) -> Result<Self> {
        let width = rows.first().map_or(0, Sequence::len);
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(AlignError::UnequalRowLength {
                name: row.id.clone(),
                expected: width,
                found: row.len(),
            });
        }
        Ok(AlignmentMatrix { rows, width })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Sequence] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&Sequence> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.row(id).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.id.as_str())
    }

    /// Appends a row that must match the current width.
    pub fn push(&mut self, row: Sequence) -> Result<()> {
        if !self.rows.is_empty() && row.len() != self.width {
            return Err(AlignError::UnequalRowLength {
                found: row.len(),
                expected: self.width,
                name: row.id,
            });
        }
        self.width = row.len();
        self.rows.push(row);
        Ok(())
    }

    /// Rebuilds every row through `f`. The closure must keep row widths intact.
    pub fn map_rows<F>(self, f: F) -> Result<Self>
    where
        F: FnMut(Sequence) -> Sequence,
    {
        AlignmentMatrix::new(self.rows.into_iter().map(f).collect())
    }

    /// Keeps only the columns where `mask` is true. The mask must cover every
    /// column.
    pub fn project(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.width {
            return Err(AlignError::MaskWidth {
                expected: self.width,
                found: mask.len(),
            });
        }
        let rows = self
            .rows
            .iter()
            .map(|row| Sequence {
                id: row.id.clone(),
                description: row.description.clone(),
                residues: row
                    .residues
                    .iter()
                    .zip(mask)
                    .filter_map(|(&residue, &keep)| keep.then_some(residue))
                    .collect(),
            })
            .collect();
        Ok(AlignmentMatrix {
            rows,
            width: mask.iter().filter(|&&keep| keep).count(),
        })
    }

    /// Keeps only the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Sequence) -> bool,
    {
        AlignmentMatrix {
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
            width: self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = AlignmentMatrix::new(vec![
            Sequence::new("a", "AC-GT"),
            Sequence::new("b", "ACGT"),
        ]);
        assert!(matches!(
            result,
            Err(AlignError::UnequalRowLength { expected: 5, found: 4, .. })
        ));
    }

    #[test]
    fn test_project_keeps_row_order() {
        let matrix = AlignmentMatrix::new(vec![
            Sequence::new("a", "AC-GT"),
            Sequence::new("b", "ACTGT"),
        ])
        .unwrap();

        let projected = matrix.project(&[true, false, false, true, true]).unwrap();
        assert_eq!(projected.width(), 3);
        assert_eq!(projected.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(projected.rows()[1].residues, b"AGT");
        // The source matrix is untouched.
        assert_eq!(matrix.width(), 5);
    }

    #[test]
    fn test_project_rejects_mask_of_wrong_width() {
        let matrix = AlignmentMatrix::new(vec![Sequence::new("a", "ACGT")]).unwrap();
        assert!(matches!(
            matrix.project(&[true, true, false, true, true]),
            Err(AlignError::MaskWidth { expected: 4, found: 5 })
        ));
        assert!(matches!(
            matrix.project(&[true, true]),
            Err(AlignError::MaskWidth { expected: 4, found: 2 })
        ));
    }

    #[test]
    fn test_push_checks_width() {
        let mut matrix = AlignmentMatrix::new(vec![Sequence::new("a", "ACGT")]).unwrap();
        match matrix.push(Sequence::new("b", "ACG")) {
            Err(AlignError::UnequalRowLength {
                name,
                expected,
                found,
            }) => {
                assert_eq!(name, "b");
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("expected UnequalRowLength, got {:?}", other),
        }
        matrix.push(Sequence::new("c", "A-GT")).unwrap();
        assert_eq!(matrix.len(), 2);
    }
}
