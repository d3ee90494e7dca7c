// Per-chromosome restriction fragment boundaries

use crate::error::Error;

/// Sorted fragment boundaries of one chromosome (1-based, closed intervals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChrFragments {
    pub name: String,
    /// Fragment start positions, ascending
    pub starts: Vec<u64>,
    /// Fragment end positions, ascending
    pub ends: Vec<u64>,
}

impl ChrFragments {
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// Fragment boundaries for every chromosome, indexed by chromosome id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentTable {
    chromosomes: Vec<ChrFragments>,
}

impl FragmentTable {
    /// Build a table from parallel per-chromosome start/end vectors.
    ///
    /// Every chromosome needs at least one fragment, equally long start and
    /// end vectors, and both vectors sorted in ascending order.
    pub fn new(
        names: Vec<String>,
        starts: Vec<Vec<u64>>,
        ends: Vec<Vec<u64>>,
    ) -> Result<Self, Error> {
        if names.len() != starts.len() || starts.len() != ends.len() {
            return Err(Error::Parameter(format!(
                "number of start/end position vectors should be equal ({} names, {} start, {} end)",
                names.len(),
                starts.len(),
                ends.len()
            )));
        }

        let mut chromosomes = Vec::with_capacity(names.len());
        for ((name, starts), ends) in names.into_iter().zip(starts).zip(ends) {
            if starts.len() != ends.len() {
                return Err(Error::Parameter(format!(
                    "start/end vectors for '{name}' should have the same length"
                )));
            }
            if starts.is_empty() {
                return Err(Error::Parameter(format!(
                    "chromosome '{name}' has no fragments"
                )));
            }
            if !is_sorted(&starts) || !is_sorted(&ends) {
                return Err(Error::Parameter(format!(
                    "fragment boundaries for '{name}' are not sorted"
                )));
            }
            chromosomes.push(ChrFragments { name, starts, ends });
        }

        Ok(Self { chromosomes })
    }

    pub fn n_chroms(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn chromosome(&self, chr_idx: usize) -> &ChrFragments {
        &self.chromosomes[chr_idx]
    }

    pub fn names(&self) -> Vec<String> {
        self.chromosomes.iter().map(|c| c.name.clone()).collect()
    }

    /// Total fragment count across all chromosomes
    pub fn n_fragments(&self) -> usize {
        self.chromosomes.iter().map(ChrFragments::len).sum()
    }
}

fn is_sorted(values: &[u64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
