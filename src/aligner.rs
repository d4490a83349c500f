use crate::error::{AlignError, Result};
use log::{debug, info};
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Everything an external aligner needs for one batch run.
#[derive(Debug, Clone)]
pub struct AlignerConfig {
    /// Sequences to align, or to add when `existing_alignment` is set.
    pub sequences: PathBuf,
    /// Alignment to extend. Its width is kept fixed.
    pub existing_alignment: Option<PathBuf>,
    pub output: PathBuf,
    pub log: PathBuf,
    pub threads: NonZeroUsize,
    /// Let the aligner reverse-complement sequences it finds in the wrong
    /// orientation.
    pub adjust_direction: bool,
}

/// A multiple sequence aligner run as a single batch step.
pub trait ExternalAligner {
    fn align(&self, config: &AlignerConfig) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    Mafft,
}

impl Method {
    pub fn aligner(self) -> Box<dyn ExternalAligner> {
        match self {
            Method::Mafft => Box::new(Mafft::default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mafft {
    pub program: PathBuf,
}

impl Default for Mafft {
    fn default() -> Self {
        Mafft {
            program: PathBuf::from("mafft"),
        }
    }
}

impl Mafft {
    /// Arguments for `mafft`. Output and log go through redirected stdout and
    /// stderr rather than flags.
    pub fn arguments(config: &AlignerConfig) -> Vec<String> {
        let mut args = Vec::new();
        if config.existing_alignment.is_some() {
            args.push("--add".to_string());
            args.push(config.sequences.display().to_string());
            args.push("--keeplength".to_string());
        }
        args.extend(
            ["--reorder", "--anysymbol", "--nomemsave"]
                .iter()
                .map(|s| s.to_string()),
        );
        if config.adjust_direction {
            args.push("--adjustdirection".to_string());
        }
        args.push("--thread".to_string());
        args.push(config.threads.to_string());
        match &config.existing_alignment {
            Some(existing) => args.push(existing.display().to_string()),
            None => args.push(config.sequences.display().to_string()),
        }
        args
    }
}

impl ExternalAligner for Mafft {
    fn align(&self, config: &AlignerConfig) -> Result<()> {
        let args = Mafft::arguments(config);
        info!(
            "using mafft to align via:\n\t{} {} 1> {} 2> {}\n\n\tKatoh et al, Nucleic Acid Research, vol 30, issue 14\n\thttps://doi.org/10.1093%2Fnar%2Fgkf436",
            self.program.display(),
            args.join(" "),
            config.output.display(),
            config.log.display()
        );

        let stdout = File::create(&config.output).map_err(|e| AlignError::write(&config.output, e))?;
        let stderr = File::create(&config.log).map_err(|e| AlignError::write(&config.log, e))?;

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(|e| {
                AlignError::ExternalTool(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                ))
            })?;
        debug!("mafft exited with {status}");

        if !status.success() {
            return Err(AlignError::ExternalTool(format!(
                "{} exited with {status}, see {}",
                self.program.display(),
                config.log.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(existing: Option<&str>) -> AlignerConfig {
        AlignerConfig {
            sequences: PathBuf::from("seqs.fasta"),
            existing_alignment: existing.map(PathBuf::from),
            output: PathBuf::from("out.fasta"),
            log: PathBuf::from("out.fasta.log"),
            threads: NonZeroUsize::new(4).unwrap(),
            adjust_direction: true,
        }
    }

    #[test]
    fn test_from_scratch_arguments() {
        assert_eq!(
            Mafft::arguments(&config(None)).join(" "),
            "--reorder --anysymbol --nomemsave --adjustdirection --thread 4 seqs.fasta"
        );
    }

    #[test]
    fn test_extend_arguments_keep_length() {
        assert_eq!(
            Mafft::arguments(&config(Some("existing.fasta"))).join(" "),
            "--add seqs.fasta --keeplength --reorder --anysymbol --nomemsave --adjustdirection --thread 4 existing.fasta"
        );
    }

    #[test]
    fn test_missing_program_is_external_tool_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = config(None);
        config.output = dir.path().join("out.fasta");
        config.log = dir.path().join("out.fasta.log");
        let mafft = Mafft {
            program: dir.path().join("no-such-mafft"),
        };

        assert!(matches!(
            mafft.align(&config),
            Err(AlignError::ExternalTool(_))
        ));
    }
}
