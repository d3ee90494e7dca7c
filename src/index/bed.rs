/// Restriction fragment BED loading
///
/// Expected columns (tab-separated, extra columns ignored):
/// 1. chrom
/// 2. start (0-based inclusive)
/// 3. end (0-based exclusive)
///
/// Fragments are converted to 1-based closed intervals `[start + 1, end]`.
use crate::error::Error;
use crate::index::table::FragmentTable;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One fragment from a BED line, already 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
struct BedFragment {
    chrom: String,
    start: u64,
    end: u64,
}

/// Load a fragment BED file (plain or `.gz`) into a validated table.
///
/// Chromosomes are numbered in order of first appearance; fragments are
/// sorted by start within each chromosome.
pub fn load_fragments(path: &Path) -> Result<FragmentTable, Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let path_str = path.to_string_lossy();
    let reader: Box<dyn BufRead> = if path_str.ends_with(".gz") || path_str.ends_with(".gzip") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut order: Vec<String> = Vec::new();
    let mut by_chrom: HashMap<String, Vec<(u64, u64)>> = HashMap::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(e, path))?;
        let line = line.trim();
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("track")
            || line.starts_with("browser")
        {
            continue;
        }

        let frag = parse_bed_line(line).map_err(|msg| {
            Error::Parameter(format!("{}:{}: {}", path.display(), line_num + 1, msg))
        })?;

        by_chrom
            .entry(frag.chrom.clone())
            .or_insert_with(|| {
                order.push(frag.chrom.clone());
                Vec::new()
            })
            .push((frag.start, frag.end));
    }

    if order.is_empty() {
        return Err(Error::Parameter(format!(
            "no fragments found in {}",
            path.display()
        )));
    }

    let mut starts = Vec::with_capacity(order.len());
    let mut ends = Vec::with_capacity(order.len());
    for chrom in &order {
        let mut frags = by_chrom.remove(chrom).unwrap_or_default();
        frags.sort_unstable();
        starts.push(frags.iter().map(|&(s, _)| s).collect());
        ends.push(frags.iter().map(|&(_, e)| e).collect());
    }

    let table = FragmentTable::new(order, starts, ends)?;
    log::info!(
        "Loaded {} fragments on {} chromosomes from {}",
        table.n_fragments(),
        table.n_chroms(),
        path.display()
    );
    Ok(table)
}

/// Parse a single BED line
fn parse_bed_line(line: &str) -> Result<BedFragment, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(format!("BED line has {} fields, expected at least 3", fields.len()));
    }

    let chrom = fields[0].to_string();
    let start = fields[1]
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid start position '{}': {}", fields[1], e))?;
    let end = fields[2]
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid end position '{}': {}", fields[2], e))?;
    if end <= start {
        return Err(format!("fragment end {end} is not after start {start}"));
    }

    Ok(BedFragment {
        chrom,
        start: start + 1,
        end,
    })
}
