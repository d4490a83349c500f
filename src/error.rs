use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlignError>;

/// Where a by-name reference was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceScope {
    ExistingAlignment,
    SequenceSample,
}

impl std::fmt::Display for ReferenceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceScope::ExistingAlignment => write!(f, "the supplied alignment"),
            ReferenceScope::SequenceSample => write!(f, "the sequence sample"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("Cannot read '{}': {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("Detected duplicate input strains \"{0}\" but the sequences are different.")]
    DuplicateConflict(String),

    #[error("Duplicate strains of \"{0}\" detected")]
    DuplicateStrain(String),

    #[error("You cannot provide both a reference name and a reference sequence")]
    ConflictingReference,

    #[error("You've asked to remove the reference but haven't specified one")]
    ReferenceRequired,

    #[error("Specified reference name {name} is not in {scope}.")]
    ReferenceNotFound { name: String, scope: ReferenceScope },

    #[error("Reference {0} not found in alignment")]
    ReferenceRowNotFound(String),

    #[error(
        "Provided existing alignment ({alignment_width}bp) is not the same length as the reference sequence ({reference_len}bp)"
    )]
    LengthMismatch {
        alignment_width: usize,
        reference_len: usize,
    },

    #[error("Row \"{name}\" has {found} columns but the alignment is {expected} columns wide")]
    UnequalRowLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Column mask has {found} entries but the alignment is {expected} columns wide")]
    MaskWidth { expected: usize, found: usize },

    #[error("Error during alignment: {0}")]
    ExternalTool(String),

    #[error("Couldn't write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AlignError {
    pub fn unreadable(path: &Path, reason: impl ToString) -> Self {
        AlignError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: &Path, source: io::Error) -> Self {
        AlignError::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}
