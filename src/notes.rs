use log::{info, warn};
use std::fmt;

/// Non-fatal observations made while reconciling an alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    /// A candidate was dropped because the existing alignment already holds it.
    AlreadyAligned { name: String },
    /// The aligner reoriented this row and tagged it with the `_R_` marker.
    ReverseComplemented { name: String },
    /// The reference row has no gaps, so trimming kept every column.
    NoGapsInReference { reference: String },
    /// Columns gapped in the reference were removed.
    Trimmed {
        reference: String,
        removed_columns: usize,
    },
    /// An insertion run held nothing but gaps and placeholder residues.
    ArtifactInsertion { length: usize, ref_position: usize },
}

impl Note {
    pub fn is_warning(&self) -> bool {
        matches!(self, Note::ArtifactInsertion { .. })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::AlreadyAligned { name } => {
                write!(f, "Excluding {name} as it is already present in the alignment")
            }
            Note::ReverseComplemented { name } => write!(
                f,
                "Sequence \"{name}\" was reverse-complemented by the alignment program."
            ),
            Note::NoGapsInReference { reference } => write!(
                f,
                "No gaps in alignment to trim (with respect to the reference, {reference})"
            ),
            Note::Trimmed {
                reference,
                removed_columns,
            } => write!(
                f,
                "Trimmed {removed_columns} columns gapped in {reference} from the alignment"
            ),
            Note::ArtifactInsertion {
                length,
                ref_position,
            } => write!(
                f,
                "{length}bp insertion at ref position {ref_position} was caused by 'N's or '?'s in provided sequences"
            ),
        }
    }
}

/// Collects notes in emission order and mirrors each one to the log.
#[derive(Debug, Default)]
pub struct Notes {
    entries: Vec<Note>,
}

impl Notes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, note: Note) {
        if note.is_warning() {
            warn!("{note}");
        } else {
            info!("{note}");
        }
        self.entries.push(note);
    }

    pub fn entries(&self) -> &[Note] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, note: &Note) -> bool {
        self.entries.contains(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_keep_emission_order() {
        let mut notes = Notes::new();
        notes.push(Note::AlreadyAligned {
            name: "b".to_string(),
        });
        notes.push(Note::ArtifactInsertion {
            length: 2,
            ref_position: 7,
        });

        assert_eq!(notes.len(), 2);
        assert!(!notes.entries()[0].is_warning());
        assert!(notes.entries()[1].is_warning());
        assert_eq!(
            notes.entries()[0].to_string(),
            "Excluding b as it is already present in the alignment"
        );
    }
}
