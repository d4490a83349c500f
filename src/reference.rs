use crate::alignment::AlignmentMatrix;
use crate::error::{AlignError, ReferenceScope, Result};
use crate::sequence::{Sequence, SequenceSet};
use std::path::PathBuf;

/// How the user asked for a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    /// A strain already present in the input.
    Name(String),
    /// A file holding a single sequence that is added to the input.
    Sequence(PathBuf),
}

impl ReferenceSource {
    /// Validates the reference options. Name and sequence exclude each other,
    /// and removal needs a reference.
    pub fn from_options(
        name: Option<String>,
        sequence: Option<PathBuf>,
        remove_reference: bool,
    ) -> Result<Option<Self>> {
        let source = match (name, sequence) {
            (Some(_), Some(_)) => return Err(AlignError::ConflictingReference),
            (Some(name), None) => Some(ReferenceSource::Name(name)),
            (None, Some(path)) => Some(ReferenceSource::Sequence(path)),
            (None, None) => None,
        };
        if remove_reference && source.is_none() {
            return Err(AlignError::ReferenceRequired);
        }
        Ok(source)
    }
}

/// A reference once its sequence, if any, has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceMode {
    ByName(String),
    BySequence(Sequence),
}

impl ReferenceMode {
    pub fn name(&self) -> &str {
        match self {
            ReferenceMode::ByName(name) => name,
            ReferenceMode::BySequence(sequence) => &sequence.id,
        }
    }
}

/// Checks that the reference can be used with the given inputs and returns
/// its row name.
///
/// By name it must be a row of `existing` when there is one, otherwise a
/// candidate. By sequence it must be exactly as long as `existing` is wide.
pub fn resolve_reference(
    mode: &ReferenceMode,
    existing: Option<&AlignmentMatrix>,
    candidates: &SequenceSet,
) -> Result<String> {
    match mode {
        ReferenceMode::ByName(name) => {
            let (present, scope) = match existing {
                Some(aln) => (aln.contains(name), ReferenceScope::ExistingAlignment),
                None => (candidates.contains(name), ReferenceScope::SequenceSample),
            };
            if !present {
                return Err(AlignError::ReferenceNotFound {
                    name: name.clone(),
                    scope,
                });
            }
            Ok(name.clone())
        }
        ReferenceMode::BySequence(sequence) => {
            if let Some(aln) = existing {
                if sequence.len() != aln.width() {
                    return Err(AlignError::LengthMismatch {
                        alignment_width: aln.width(),
                        reference_len: sequence.len(),
                    });
                }
            }
            Ok(sequence.id.clone())
        }
    }
}

/// Adds an external reference to the existing alignment as a last row.
pub fn append_reference(existing: &mut AlignmentMatrix, reference: Sequence) -> Result<()> {
    if reference.len() != existing.width() {
        return Err(AlignError::LengthMismatch {
            alignment_width: existing.width(),
            reference_len: reference.len(),
        });
    }
    existing.push(reference)
}

/// Submission order for a from-scratch alignment. An external reference goes
/// first so that the aligner orients every other sequence against it.
pub fn prepend_reference<'a>(
    reference: Option<&'a Sequence>,
    candidates: &'a SequenceSet,
) -> impl Iterator<Item = &'a Sequence> {
    reference.into_iter().chain(candidates.iter())
}
