use crate::error::{AlignError, Result};
use rustc_hash::FxHashMap;

/// A named sequence as read from a source. Residues are kept byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub residues: Vec<u8>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Sequence {
            id: id.into(),
            description: None,
            residues: residues.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residue equality ignoring case.
    pub fn same_residues(&self, other: &Sequence) -> bool {
        self.residues.eq_ignore_ascii_case(&other.residues)
    }
}

/// Sequences keyed by identifier, iterated in first-read order.
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    sequences: Vec<Sequence>,
    by_id: FxHashMap<String, usize>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from records of one or more sources. A repeated identifier
    /// is tolerated only when its residues match the first occurrence.
    pub fn from_sequences<I>(sequences: I) -> Result<Self>
    where
        I: IntoIterator<Item = Sequence>,
    {
        let mut set = SequenceSet::new();
        for sequence in sequences {
            set.insert(sequence)?;
        }
        Ok(set)
    }

    /// Adds a sequence. An identical duplicate replaces the stored entry in
    /// place; a duplicate id with different residues is a conflict.
    pub fn insert(&mut self, sequence: Sequence) -> Result<()> {
        match self.by_id.get(&sequence.id) {
            Some(&idx) => {
                if !self.sequences[idx].same_residues(&sequence) {
                    return Err(AlignError::DuplicateConflict(sequence.id));
                }
                self.sequences[idx] = sequence;
            }
            None => {
                self.by_id.insert(sequence.id.clone(), self.sequences.len());
                self.sequences.push(sequence);
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.by_id.get(id).map(|&idx| &self.sequences[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(|s| s.id.as_str())
    }

    /// Removes every entry for which `exclude` returns true, returning the
    /// removed identifiers in set order.
    pub fn prune<F>(&mut self, mut exclude: F) -> Vec<String>
    where
        F: FnMut(&Sequence) -> bool,
    {
        let (removed, kept): (Vec<Sequence>, Vec<Sequence>) =
            std::mem::take(&mut self.sequences)
                .into_iter()
                .partition(|s| exclude(s));

        self.by_id = kept
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.id.clone(), idx))
            .collect();
        self.sequences = kept;

        removed.into_iter().map(|s| s.id).collect()
    }
}

impl IntoIterator for SequenceSet {
    type Item = Sequence;
    type IntoIter = std::vec::IntoIter<Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.into_iter()
    }
}
