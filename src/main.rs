use clap::Parser;
use log::error;
use refalign::aligner::Method;
use refalign::commands::align::{run_align, AlignOptions};
use refalign::commands::trim::{run_trim, TrimOptions};
use refalign::error::Result;
use refalign::notes::Notes;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Common options shared between all commands
#[derive(Parser, Debug)]
struct CommonOpts {
    /// Output alignment file.
    #[clap(short = 'o', long, value_parser, default_value = "alignment.fasta")]
    output: PathBuf,

    /// Remove the reference sequence from the final alignment.
    #[clap(long, action)]
    remove_reference: bool,

    /// Replace gaps by N after aligning, when gaps represent missing data rather than true indels.
    #[clap(long, action)]
    fill_gaps: bool,

    /// Verbosity level (0 = error, 1 = info, 2 = debug)
    #[clap(short, long, default_value = "1")]
    verbose: u8,
}

/// Reference-aware alignment of sequences and reconciliation against existing alignments.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
enum Args {
    /// Align sequences, optionally adding them to an existing alignment, and strip insertions relative to a reference
    Align {
        #[clap(flatten)]
        common: CommonOpts,

        /// Sequences to align (FASTA)
        #[clap(short = 's', long, value_parser, num_args = 1.., required = true)]
        sequences: Vec<PathBuf>,

        /// Number of threads for the aligner, or 'auto' for all available cores.
        #[clap(long = "nthreads", value_parser = parse_threads, default_value = "1")]
        threads: NonZeroUsize,

        /// Alignment program to use
        #[clap(long, value_enum, default_value = "mafft")]
        method: Method,

        /// Strip insertions relative to this reference; use if the reference is already in the input sequences
        #[clap(long, value_parser)]
        reference_name: Option<String>,

        /// Add this reference sequence (FASTA or GenBank) to the dataset and strip insertions relative to it
        #[clap(long, value_parser)]
        reference_sequence: Option<PathBuf>,

        /// An existing alignment to which the sequences will be added. The output keeps its length.
        #[clap(long, value_parser)]
        existing_alignment: Option<PathBuf>,

        /// Keep the files passed to and produced by the aligner, for debugging poor alignments.
        #[clap(long, action)]
        debug: bool,
    },
    /// Strip insertions relative to a reference from an existing alignment
    Trim {
        #[clap(flatten)]
        common: CommonOpts,

        /// Aligned sequences (FASTA)
        #[clap(short = 'a', long, value_parser)]
        alignment: PathBuf,

        /// Name of the reference row
        #[clap(short = 'r', long, value_parser)]
        reference_name: String,
    },
}

fn parse_threads(value: &str) -> std::result::Result<NonZeroUsize, String> {
    if value == "auto" {
        return NonZeroUsize::new(num_cpus::get()).ok_or_else(|| "no CPUs detected".to_string());
    }
    value
        .parse::<NonZeroUsize>()
        .map_err(|e| format!("'{value}' is not a positive number or 'auto': {e}"))
}

fn init_logger(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();
}

fn run(args: Args, notes: &mut Notes) -> Result<()> {
    match args {
        Args::Align {
            common,
            sequences,
            threads,
            method,
            reference_name,
            reference_sequence,
            existing_alignment,
            debug,
        } => {
            init_logger(common.verbose);
            let opts = AlignOptions::new(
                sequences,
                common.output,
                threads,
                reference_name,
                reference_sequence,
                common.remove_reference,
                common.fill_gaps,
                existing_alignment,
                debug,
            )?;
            let aligner = method.aligner();
            run_align(&opts, aligner.as_ref(), notes)?;
        }
        Args::Trim {
            common,
            alignment,
            reference_name,
        } => {
            init_logger(common.verbose);
            let opts = TrimOptions {
                alignment,
                output: common.output,
                reference_name,
                remove_reference: common.remove_reference,
                fill_gaps: common.fill_gaps,
            };
            run_trim(&opts, notes)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut notes = Notes::new();

    match run(args, &mut notes) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
