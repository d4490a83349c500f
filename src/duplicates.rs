use crate::alignment::AlignmentMatrix;
use crate::error::{AlignError, Result};
use crate::sequence::SequenceSet;
use rustc_hash::FxHashSet;

/// Anything that carries strain names for a cross-collection collision scan.
#[derive(Debug, Clone, Copy)]
pub enum NameSource<'a> {
    Set(&'a SequenceSet),
    Rows(&'a AlignmentMatrix),
    Single(&'a str),
}

impl<'a> NameSource<'a> {
    pub fn names(&self) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match *self {
            NameSource::Set(set) => Box::new(set.names()),
            NameSource::Rows(matrix) => Box::new(matrix.names()),
            NameSource::Single(name) => Box::new(std::iter::once(name)),
        }
    }

    fn is_empty(&self) -> bool {
        match *self {
            NameSource::Set(set) => set.is_empty(),
            NameSource::Rows(matrix) => matrix.is_empty(),
            NameSource::Single(name) => name.is_empty(),
        }
    }
}

impl<'a> From<&'a SequenceSet> for NameSource<'a> {
    fn from(set: &'a SequenceSet) -> Self {
        NameSource::Set(set)
    }
}

impl<'a> From<&'a AlignmentMatrix> for NameSource<'a> {
    fn from(matrix: &'a AlignmentMatrix) -> Self {
        NameSource::Rows(matrix)
    }
}

impl<'a> From<&'a str> for NameSource<'a> {
    fn from(name: &'a str) -> Self {
        NameSource::Single(name)
    }
}

/// Fails on the first name seen twice across `sources`, in argument order.
/// Absent and empty sources are skipped. Content is not compared.
pub fn check_duplicates<'a, I>(sources: I) -> Result<()>
where
    I: IntoIterator<Item = Option<NameSource<'a>>>,
{
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for source in sources.into_iter().flatten() {
        if source.is_empty() {
            continue;
        }
        for name in source.names() {
            if !seen.insert(name) {
                return Err(AlignError::DuplicateStrain(name.to_string()));
            }
        }
    }
    Ok(())
}
