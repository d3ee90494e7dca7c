use std::path::PathBuf;

use clap::Parser;

use crate::chimeric::ChimeraValidator;
use crate::error::Error;

// ---------------------------------------------------------------------------
// Run mode enum
// ---------------------------------------------------------------------------

/// `--runMode` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Assign reads to restriction fragments from a boundary table.
    Fragments,
    /// No fragment boundaries; every read lands in fragment 0 of its chromosome.
    Binless,
}

impl std::str::FromStr for RunMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fragments" => Ok(Self::Fragments),
            "binless" => Ok(Self::Binless),
            _ => Err(format!(
                "unknown runMode '{s}'; expected 'fragments' or 'binless'"
            )),
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fragments => write!(f, "fragments"),
            Self::Binless => write!(f, "binless"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters struct
// ---------------------------------------------------------------------------

/// ruHiC command-line parameters.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ruHiC",
    about = "Classify Hi-C read pairs and partition valid contacts by chromosome pair",
    version
)]
pub struct Parameters {
    // ── Run ─────────────────────────────────────────────────────────────
    /// Run mode: fragments or binless
    #[arg(long = "runMode", default_value = "fragments")]
    pub run_mode: RunMode,

    // ── Inputs ──────────────────────────────────────────────────────────
    /// BAM file, sorted so that all records of a read pair are contiguous
    #[arg(long = "bamFile")]
    pub bam_file: PathBuf,

    /// Restriction fragment BED file (plain or gzipped); fragments mode only
    #[arg(long = "fragmentFile")]
    pub fragment_file: Option<PathBuf>,

    /// Chromosome sizes (name<TAB>length); binless mode, defaults to the BAM header
    #[arg(long = "chromSizes")]
    pub chrom_sizes: Option<PathBuf>,

    // ── Output ──────────────────────────────────────────────────────────
    /// Output file name prefix (including path)
    #[arg(long = "outPrefix", default_value = "./")]
    pub out_prefix: String,

    /// Pairs held in memory per chromosome pair before flushing to disk
    #[arg(long = "storage", default_value_t = 10000)]
    pub storage: usize,

    // ── Filtering ───────────────────────────────────────────────────────
    /// Discard read pairs with invalid chimeric alignments
    #[arg(long = "chimeraStrict")]
    pub chimera_strict: bool,

    /// Maximum distance between chimeric segments; unset = fragment identity check
    #[arg(long = "chimeraSpan")]
    pub chimera_span: Option<u64>,

    /// Minimum mapping quality; unset = no filtering
    #[arg(long = "minMapq")]
    pub min_mapq: Option<u8>,

    /// Remove duplicate-flagged alignments
    #[arg(long = "dedup", default_value_t = true, action = clap::ArgAction::Set)]
    pub dedup: bool,
}

impl Parameters {
    /// Chimera validation strategy implied by `--chimeraSpan`.
    pub fn chimera_validator(&self) -> ChimeraValidator {
        match self.chimera_span {
            Some(max_span) => ChimeraValidator::ByDistance { max_span },
            None => ChimeraValidator::ByFragment,
        }
    }

    /// Validate parameter combinations that clap alone cannot enforce.
    pub fn validate(&self) -> Result<(), Error> {
        if self.run_mode == RunMode::Fragments && self.fragment_file.is_none() {
            return Err(Error::Parameter(
                "--fragmentFile is required when --runMode fragments".into(),
            ));
        }

        if self.storage == 0 {
            return Err(Error::Parameter(
                "--storage must be a positive integer".into(),
            ));
        }

        if self.chimera_span == Some(0) {
            return Err(Error::Parameter(
                "--chimeraSpan must be a positive integer".into(),
            ));
        }

        if self.out_prefix.is_empty() {
            return Err(Error::Parameter("--outPrefix must not be empty".into()));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
