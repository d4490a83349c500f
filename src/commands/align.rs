// Align command: merges new sequences into (or builds) an alignment through an
// external aligner and reconciles the result with the reference.
//
// Intermediate files are named after the output (or the existing alignment)
// and only removed once the whole run has succeeded.

use crate::aligner::{AlignerConfig, ExternalAligner};
use crate::alignment::AlignmentMatrix;
use crate::commands::trim::{insertion_report_path, reconcile, with_suffix};
use crate::duplicates::{check_duplicates, NameSource};
use crate::error::{AlignError, Result};
use crate::io::{read_alignment, read_sequences, read_single_reference, write_alignment, write_fasta};
use crate::merge::plan_merge;
use crate::notes::Notes;
use crate::reference::{
    append_reference, prepend_reference, resolve_reference, ReferenceMode, ReferenceSource,
};
use log::{debug, info};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AlignOptions {
    pub sequences: Vec<PathBuf>,
    pub output: PathBuf,
    pub threads: NonZeroUsize,
    pub reference: Option<ReferenceSource>,
    pub remove_reference: bool,
    pub fill_gaps: bool,
    pub existing_alignment: Option<PathBuf>,
    /// Keep copies of what went into and came out of the aligner.
    pub debug: bool,
}

impl AlignOptions {
    /// Builds options from raw flags, rejecting conflicting reference settings.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequences: Vec<PathBuf>,
        output: PathBuf,
        threads: NonZeroUsize,
        reference_name: Option<String>,
        reference_sequence: Option<PathBuf>,
        remove_reference: bool,
        fill_gaps: bool,
        existing_alignment: Option<PathBuf>,
        debug: bool,
    ) -> Result<Self> {
        let reference =
            ReferenceSource::from_options(reference_name, reference_sequence, remove_reference)?;
        Ok(AlignOptions {
            sequences,
            output,
            threads,
            reference,
            remove_reference,
            fill_gaps,
            existing_alignment,
            debug,
        })
    }
}

fn copy_snapshot(from: &Path, to: &Path) -> Result<()> {
    debug!("Copying {} to {}", from.display(), to.display());
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| AlignError::write(to, e))
}

/// Runs the whole align pipeline and returns the alignment written to
/// `opts.output`.
pub fn run_align(
    opts: &AlignOptions,
    aligner: &dyn ExternalAligner,
    notes: &mut Notes,
) -> Result<AlignmentMatrix> {
    let mut temp_files: Vec<PathBuf> = Vec::new();

    let sequences = read_sequences(&opts.sequences)?;
    info!(
        "Read {} sequences from {} file(s)",
        sequences.len(),
        opts.sequences.len()
    );
    let mut existing = opts
        .existing_alignment
        .as_deref()
        .map(read_alignment)
        .transpose()?;

    let mode = match &opts.reference {
        Some(ReferenceSource::Name(name)) => Some(ReferenceMode::ByName(name.clone())),
        Some(ReferenceSource::Sequence(path)) => {
            Some(ReferenceMode::BySequence(read_single_reference(path)?))
        }
        None => None,
    };
    let reference_name = mode
        .as_ref()
        .map(|mode| resolve_reference(mode, existing.as_ref(), &sequences))
        .transpose()?;
    if let Some(mode) = &mode {
        info!("Using {} as the reference", mode.name());
    }

    // An external reference joins the existing alignment as an extra row, and
    // the aligner extends that copy instead of the original file.
    let mut existing_path = opts.existing_alignment.clone();
    if let (Some(aln), Some(original), Some(ReferenceMode::BySequence(reference))) =
        (existing.as_mut(), opts.existing_alignment.as_deref(), mode.as_ref())
    {
        append_reference(aln, reference.clone())?;
        let with_reference = with_suffix(original, ".ref.fasta");
        write_alignment(aln, &with_reference)?;
        temp_files.push(with_reference.clone());
        existing_path = Some(with_reference);
    }

    let planned = plan_merge(sequences, existing.as_ref(), notes);
    let prepended = match (&existing, &mode) {
        (None, Some(ReferenceMode::BySequence(reference))) => Some(reference),
        _ => None,
    };
    check_duplicates([
        existing.as_ref().map(NameSource::Rows),
        prepended.map(|reference| NameSource::Single(reference.id.as_str())),
        Some(NameSource::Set(&planned)),
    ])?;

    let to_align = if existing.is_some() {
        with_suffix(&opts.output, ".new_seqs_to_align.fasta")
    } else {
        with_suffix(&opts.output, ".to_align.fasta")
    };
    write_fasta(prepend_reference(prepended, &planned), &to_align)?;
    temp_files.push(to_align.clone());

    if opts.debug && existing.is_none() {
        copy_snapshot(&to_align, &with_suffix(&opts.output, ".pre_aligner.fasta"))?;
    }

    let config = AlignerConfig {
        sequences: to_align,
        existing_alignment: existing_path,
        output: opts.output.clone(),
        log: with_suffix(&opts.output, ".log"),
        threads: opts.threads,
        adjust_direction: true,
    };
    aligner.align(&config)?;

    if opts.debug {
        copy_snapshot(&opts.output, &with_suffix(&opts.output, ".post_aligner.fasta"))?;
    }

    let aligned = read_alignment(&opts.output)?;
    info!(
        "Aligner produced {} sequences over {} columns",
        aligned.len(),
        aligned.width()
    );

    let report = insertion_report_path(&opts.output);
    let aligned = reconcile(
        aligned,
        reference_name.as_deref(),
        opts.remove_reference,
        opts.fill_gaps,
        Some(&report),
        notes,
    )?;
    write_alignment(&aligned, &opts.output)?;

    for path in &temp_files {
        debug!("Removing {}", path.display());
        fs::remove_file(path).map_err(|e| AlignError::write(path, e))?;
    }

    Ok(aligned)
}
