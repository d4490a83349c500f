//! Cataloging of material that sits in columns gapped in the reference.
//!
//! Positions follow the GFF convention used by annotation viewers: 1-based,
//! with an insertion reported immediately to the right of its reference base.
//! A run before the first reference base has no left anchor and is reported
//! at position 0.

use crate::alignment::{AlignmentMatrix, GAP};
use crate::error::{AlignError, Result};
use crate::notes::{Note, Notes};
use log::info;
use rustc_hash::FxHashMap;
use std::fmt;
use std::io;
use std::ops::Range;
use std::path::Path;

/// Residues that say nothing about the inserted material.
pub fn is_placeholder(residue: u8) -> bool {
    matches!(residue, GAP | b'N' | b'n' | b'?')
}

/// One distinct inserted string and the rows carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedContent {
    pub residues: String,
    pub strains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionRun {
    /// Alignment columns covered by the run.
    pub columns: Range<usize>,
    /// 0-based reference coordinate of the base immediately left of the run.
    pub left_anchor: Option<usize>,
    /// Distinct content in first-seen row order.
    pub content: Vec<InsertedContent>,
}

impl InsertionRun {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 1-based position of the reference base the run follows.
    pub fn ref_position(&self) -> usize {
        self.left_anchor.map_or(0, |anchor| anchor + 1)
    }

    /// Only gaps and placeholders were found in the run.
    pub fn is_artifact(&self) -> bool {
        self.content.is_empty()
    }

    pub fn header(&self) -> String {
        format!(
            "insertion: {}bp @ ref pos {}",
            self.len(),
            self.ref_position()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertionReport {
    pub runs: Vec<InsertionRun>,
}

impl InsertionReport {
    /// Sparse per-strain view: strains in first-contribution order, one cell
    /// per run, empty where the strain inserted nothing.
    pub fn strain_table(&self) -> Vec<(String, Vec<String>)> {
        let mut order: Vec<String> = Vec::new();
        let mut cells: FxHashMap<&str, Vec<String>> = FxHashMap::default();

        for (idx, run) in self.runs.iter().enumerate() {
            for content in &run.content {
                for strain in &content.strains {
                    let row = cells.entry(strain.as_str()).or_insert_with(|| {
                        order.push(strain.clone());
                        vec![String::new(); self.runs.len()]
                    });
                    row[idx] = content.residues.clone();
                }
            }
        }

        order
            .into_iter()
            .map(|strain| {
                let row = cells.remove(strain.as_str()).unwrap_or_default();
                (strain, row)
            })
            .collect()
    }
}

impl fmt::Display for InsertionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            writeln!(
                f,
                "{}bp insertion at ref position {}",
                run.len(),
                run.ref_position()
            )?;
            for content in &run.content {
                writeln!(f, "\t{}: {}", content.residues, content.strains.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Maximal runs of false mask entries with their left reference anchor.
pub fn insertion_runs(mask: &[bool]) -> Vec<(Range<usize>, Option<usize>)> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    let mut real_seen = 0usize;

    for (col, &real) in mask.iter().enumerate() {
        match (real, open) {
            (false, None) => open = Some(col),
            (true, Some(start)) => {
                runs.push((start..col, real_seen.checked_sub(1)));
                open = None;
            }
            _ => {}
        }
        if real {
            real_seen += 1;
        }
    }
    if let Some(start) = open {
        runs.push((start..mask.len(), real_seen.checked_sub(1)));
    }

    runs
}

/// Groups each row's non-placeholder residues inside every insertion run.
pub fn catalog_insertions(
    matrix: &AlignmentMatrix,
    mask: &[bool],
    notes: &mut Notes,
) -> InsertionReport {
    let runs: Vec<InsertionRun> = insertion_runs(mask)
        .into_iter()
        .map(|(columns, left_anchor)| {
            let mut content: Vec<InsertedContent> = Vec::new();
            let mut by_residues: FxHashMap<Vec<u8>, usize> = FxHashMap::default();

            for row in matrix.rows() {
                let inserted: Vec<u8> = row.residues[columns.clone()]
                    .iter()
                    .copied()
                    .filter(|&r| !is_placeholder(r))
                    .collect();
                if inserted.is_empty() {
                    continue;
                }
                match by_residues.get(&inserted) {
                    Some(&idx) => content[idx].strains.push(row.id.clone()),
                    None => {
                        by_residues.insert(inserted.clone(), content.len());
                        content.push(InsertedContent {
                            residues: String::from_utf8_lossy(&inserted).into_owned(),
                            strains: vec![row.id.clone()],
                        });
                    }
                }
            }

            InsertionRun {
                columns,
                left_anchor,
                content,
            }
        })
        .collect();

    let report = InsertionReport { runs };
    for line in report.to_string().lines() {
        info!("{line}");
    }
    for run in report.runs.iter().filter(|run| run.is_artifact()) {
        notes.push(Note::ArtifactInsertion {
            length: run.len(),
            ref_position: run.ref_position(),
        });
    }
    report
}

/// Writes the sparse strain table as CSV, header `strain,<run headers...>`.
pub fn write_report(report: &InsertionReport, path: &Path) -> Result<()> {
    let to_write_error = |e: csv::Error| AlignError::write(path, io::Error::from(e));

    let mut writer = csv::Writer::from_path(path).map_err(to_write_error)?;

    let mut header = vec!["strain".to_string()];
    header.extend(report.runs.iter().map(InsertionRun::header));
    writer.write_record(&header).map_err(to_write_error)?;

    for (strain, cells) in report.strain_table() {
        writer
            .write_record(std::iter::once(strain).chain(cells))
            .map_err(to_write_error)?;
    }

    writer.flush().map_err(|e| AlignError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;
    use crate::trim::reference_mask;

    #[test]
    fn test_runs_partition_columns() {
        let mask = [false, false, true, true, false, true, false, false, true, false];
        let runs = insertion_runs(&mask);

        assert_eq!(
            runs,
            vec![
                (0..2, None),
                (4..5, Some(1)),
                (6..8, Some(2)),
                (9..10, Some(3)),
            ]
        );

        let mut covered = vec![0u8; mask.len()];
        for (range, _) in &runs {
            for col in range.clone() {
                covered[col] += 1;
            }
        }
        for (col, &real) in mask.iter().enumerate() {
            covered[col] += real as u8;
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_single_base_insertion() {
        let matrix = AlignmentMatrix::new(vec![
            Sequence::new("ref", "AC-GT"),
            Sequence::new("x", "ACTGT"),
        ])
        .unwrap();
        let mask = reference_mask(&matrix, "ref").unwrap();
        let mut notes = Notes::new();

        let report = catalog_insertions(&matrix, &mask, &mut notes);

        assert_eq!(report.runs.len(), 1);
        let run = &report.runs[0];
        assert_eq!(run.len(), 1);
        assert_eq!(run.ref_position(), 2);
        assert_eq!(
            run.content,
            vec![InsertedContent {
                residues: "T".to_string(),
                strains: vec!["x".to_string()],
            }]
        );
        assert!(notes.is_empty());
    }

    #[test]
    fn test_content_grouped_and_placeholders_stripped() {
        let matrix = AlignmentMatrix::new(vec![
            Sequence::new("ref", "--AC--GT"),
            Sequence::new("a", "TTACGAGT"),
            Sequence::new("b", "-TACG-GT"),
            Sequence::new("c", "N?ACGNGT"),
            Sequence::new("d", "--ACNNGT"),
        ])
        .unwrap();
        let mask = reference_mask(&matrix, "ref").unwrap();

        let report = catalog_insertions(&matrix, &mask, &mut Notes::new());

        assert_eq!(report.runs[0].ref_position(), 0);
        assert_eq!(report.runs[0].content.len(), 2);
        assert_eq!(report.runs[0].content[0].residues, "TT");
        assert_eq!(report.runs[0].content[1].residues, "T");

        assert_eq!(report.runs[1].ref_position(), 2);
        assert_eq!(
            report.runs[1].content,
            vec![
                InsertedContent {
                    residues: "GA".to_string(),
                    strains: vec!["a".to_string()],
                },
                InsertedContent {
                    residues: "G".to_string(),
                    strains: vec!["b".to_string(), "c".to_string()],
                },
            ]
        );

        let table = report.strain_table();
        assert_eq!(
            table,
            vec![
                ("a".to_string(), vec!["TT".to_string(), "GA".to_string()]),
                ("b".to_string(), vec!["T".to_string(), "G".to_string()]),
                ("c".to_string(), vec![String::new(), "G".to_string()]),
            ]
        );
    }

    #[test]
    fn test_placeholder_only_run_is_flagged() {
        let matrix = AlignmentMatrix::new(vec![
            Sequence::new("ref", "AC--GT"),
            Sequence::new("x", "ACN?GT"),
        ])
        .unwrap();
        let mask = reference_mask(&matrix, "ref").unwrap();
        let mut notes = Notes::new();

        let report = catalog_insertions(&matrix, &mask, &mut notes);

        assert!(report.runs[0].is_artifact());
        assert!(report.strain_table().is_empty());
        assert_eq!(
            notes.entries(),
            &[Note::ArtifactInsertion {
                length: 2,
                ref_position: 2,
            }]
        );
        // The warning travels as a note only, not in the info summary.
        assert_eq!(report.to_string(), "2bp insertion at ref position 2\n");
        assert_eq!(notes.entries().iter().filter(|n| n.is_warning()).count(), 1);
    }

    #[test]
    fn test_write_report() {
        let matrix = AlignmentMatrix::new(vec![
            Sequence::new("ref", "AC-GT-"),
            Sequence::new("x", "ACTGT-"),
            Sequence::new("y", "AC-GTA"),
            Sequence::new("z", "AC-GT-"),
        ])
        .unwrap();
        let mask = reference_mask(&matrix, "ref").unwrap();
        let report = catalog_insertions(&matrix, &mask, &mut Notes::new());

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("insertions.csv");
        write_report(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "strain,insertion: 1bp @ ref pos 2,insertion: 1bp @ ref pos 4\nx,T,\ny,,A\n"
        );
    }

    #[test]
    fn test_write_failure_propagates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("insertions.csv");
        let result = write_report(&InsertionReport::default(), &path);
        assert!(matches!(result, Err(AlignError::Write { .. })));
    }
}
