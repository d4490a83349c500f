use crate::alignment::AlignmentMatrix;
use crate::notes::{Note, Notes};
use crate::sequence::SequenceSet;

/// Decides which candidates still need aligning.
///
/// Without an existing alignment every candidate is aligned from scratch.
/// Otherwise candidates whose identifier already names a row of `existing`
/// are dropped, one note per dropped identifier, and the remainder is what
/// the aligner adds while holding `existing`'s columns fixed.
pub fn plan_merge(
    mut candidates: SequenceSet,
    existing: Option<&AlignmentMatrix>,
    notes: &mut Notes,
) -> SequenceSet {
    let Some(existing) = existing else {
        return candidates;
    };

    for name in candidates.prune(|seq| existing.contains(&seq.id)) {
        notes.push(Note::AlreadyAligned { name });
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;

    fn candidates() -> SequenceSet {
        SequenceSet::from_sequences(vec![
            Sequence::new("a", "ACGT"),
            Sequence::new("b", "ACCT"),
            Sequence::new("c", "AGGT"),
        ])
        .unwrap()
    }

    #[test]
    fn test_no_existing_alignment_keeps_everything() {
        let mut notes = Notes::new();
        let planned = plan_merge(candidates(), None, &mut notes);
        assert_eq!(planned.len(), 3);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_existing_rows_are_set_difference() {
        let existing = AlignmentMatrix::new(vec![
            Sequence::new("b", "AC-CT"),
            Sequence::new("z", "ACGCT"),
        ])
        .unwrap();
        let mut notes = Notes::new();

        let planned = plan_merge(candidates(), Some(&existing), &mut notes);

        assert_eq!(planned.names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(planned.get("c").unwrap().residues, b"AGGT");
        assert_eq!(
            notes.entries(),
            &[Note::AlreadyAligned {
                name: "b".to_string()
            }]
        );
        // Nothing about the existing alignment changes.
        assert_eq!(existing.len(), 2);
    }
}
