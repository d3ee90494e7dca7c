pub mod bed;
pub mod table;

use log::warn;

use crate::pairs::segment::Segment;
use table::FragmentTable;

/// Maps a segment's 5' end onto a fragment id.
///
/// Built once before classification and read-only afterwards.
#[derive(Debug, Clone)]
pub enum FragmentIndex {
    /// Restriction fragment boundaries, searched by binary search.
    Fragments(FragmentTable),
    /// No boundaries: every segment lands in fragment 0 of its chromosome.
    Binless {
        names: Vec<String>,
        lengths: Vec<u64>,
    },
}

impl FragmentIndex {
    pub fn n_chroms(&self) -> usize {
        match self {
            Self::Fragments(table) => table.n_chroms(),
            Self::Binless { names, .. } => names.len(),
        }
    }

    /// Chromosome names, in chromosome id order
    pub fn chr_names(&self) -> Vec<String> {
        match self {
            Self::Fragments(table) => table.names(),
            Self::Binless { names, .. } => names.clone(),
        }
    }

    /// Whether fragment ids carry meaning for dangling-end / self-circle calls
    pub fn detects_self_ligation(&self) -> bool {
        matches!(self, Self::Fragments(_))
    }

    /// Fragment id containing the 5' end of `segment`.
    ///
    /// Reverse-strand reads are placed by the first fragment end at or after
    /// their 5' end, forward-strand reads by the last fragment start at or
    /// before it. Reads falling off the end of the chromosome are clamped to
    /// the last fragment with a warning.
    pub fn locate(&self, segment: &Segment) -> usize {
        let pos5 = segment.five_prime_pos();
        match self {
            Self::Fragments(table) => {
                let chr = table.chromosome(segment.chr_idx);
                if segment.is_reverse {
                    let index = chr.ends.partition_point(|&end| end < pos5);
                    if index == chr.len() {
                        warn!(
                            "read aligned off end of chromosome {} (5' end at {})",
                            chr.name, pos5
                        );
                        return chr.len() - 1;
                    }
                    index
                } else {
                    let index = chr.starts.partition_point(|&start| start <= pos5);
                    if index == 0 {
                        warn!(
                            "read aligned before start of chromosome {} (5' end at {})",
                            chr.name, pos5
                        );
                        return 0;
                    }
                    index - 1
                }
            }
            Self::Binless { names, lengths } => {
                if segment.is_reverse && pos5 > lengths[segment.chr_idx] {
                    warn!(
                        "read aligned off end of chromosome {} (5' end at {})",
                        names[segment.chr_idx], pos5
                    );
                }
                0
            }
        }
    }
}
