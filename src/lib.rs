#![allow(non_snake_case)]

pub mod chimeric;
pub mod error;
pub mod genome;
pub mod index;
pub mod io;
pub mod pairs;
pub mod params;
pub mod stats;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Error;
use crate::genome::sizes::load_chrom_sizes;
use crate::genome::ChromConverter;
use crate::index::bed::load_fragments;
use crate::index::FragmentIndex;
use crate::io::bam::open_bam;
use crate::io::pairs::PairRouter;
use crate::pairs::{EngineConfig, PairEngine};
use crate::params::{Parameters, RunMode};
use crate::stats::PairStats;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Chromosome names, in chromosome id order
    pub chr_names: Vec<String>,
    /// `paths[i][j]` (for `j <= i`) is the file for chromosome pair `(i, j)`,
    /// or `None` if that pair produced no output.
    pub paths: Vec<Vec<Option<PathBuf>>>,
    pub stats: PairStats,
}

/// Top-level dispatcher. Called from `main()` after CLI parsing.
pub fn run(params: &Parameters) -> anyhow::Result<RunSummary> {
    params.validate()?;

    info!("ruHiC v{}", env!("CARGO_PKG_VERSION"));
    info!("runMode: {}", params.run_mode);
    info!("bamFile: {}", params.bam_file.display());
    info!("outPrefix: {}", params.out_prefix);
    info!("storage: {}", params.storage);
    info!("dedup: {}", params.dedup);
    info!("minMapq: {:?}", params.min_mapq);
    info!("chimeraStrict: {}", params.chimera_strict);
    info!("chimeraSpan: {:?}", params.chimera_span);

    let source = open_bam(&params.bam_file)?;
    let index = load_index(params, source.reference_names(), source.reference_lengths())?;
    let chr_names = index.chr_names();
    let converter = ChromConverter::from_names(&source.reference_names(), &chr_names)?;

    create_prefix_dir(&params.out_prefix)?;
    let mut router = PairRouter::new(&params.out_prefix, index.n_chroms(), params.storage)?;

    let config = EngineConfig {
        remove_duplicates: params.dedup,
        min_mapq: params.min_mapq,
        remove_invalid_chimeras: params.chimera_strict,
        chimera_validator: params.chimera_validator(),
    };
    let engine = PairEngine::new(&index, &converter, config);

    info!("Classifying read pairs...");
    let stats = engine.run(source, &mut router)?;
    let paths = router.finish()?;

    let summary_path = PathBuf::from(format!("{}summary.tsv", params.out_prefix));
    stats.write_summary(&summary_path, &chr_names, &paths)?;
    stats.print_summary();
    info!("Summary written to {}", summary_path.display());

    Ok(RunSummary {
        chr_names,
        paths,
        stats,
    })
}

/// Build the fragment index for the configured run mode.
fn load_index(
    params: &Parameters,
    bam_names: Vec<String>,
    bam_lengths: Vec<u64>,
) -> Result<FragmentIndex, Error> {
    match params.run_mode {
        RunMode::Fragments => {
            let path = params.fragment_file.as_deref().ok_or_else(|| {
                Error::Parameter("--fragmentFile is required when --runMode fragments".into())
            })?;
            info!("fragmentFile: {}", path.display());
            Ok(FragmentIndex::Fragments(load_fragments(path)?))
        }
        RunMode::Binless => match &params.chrom_sizes {
            Some(path) => {
                info!("chromSizes: {}", path.display());
                let sizes = load_chrom_sizes(path)?;
                Ok(FragmentIndex::Binless {
                    names: sizes.names,
                    lengths: sizes.lengths,
                })
            }
            None => {
                info!("chromSizes: taken from BAM header");
                Ok(FragmentIndex::Binless {
                    names: bam_names,
                    lengths: bam_lengths,
                })
            }
        },
    }
}

/// Create the directory part of the output prefix if it does not exist yet.
fn create_prefix_dir(prefix: &str) -> Result<(), Error> {
    let prefix_path = Path::new(prefix);
    let dir = if prefix.ends_with('/') {
        Some(prefix_path)
    } else {
        prefix_path.parent()
    };

    match dir {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| Error::io(e, dir))
        }
        _ => Ok(()),
    }
}
