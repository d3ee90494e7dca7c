pub mod sizes;

use std::collections::HashMap;

use crate::error::Error;

/// Maps BAM reference ids (tids) onto chromosome ids of the fragment index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromConverter {
    indices: Vec<usize>,
}

impl ChromConverter {
    /// Wrap a raw conversion table.
    ///
    /// There may not be more BAM chromosomes than index chromosomes, and every
    /// entry must be a valid index chromosome id.
    pub fn new(indices: Vec<usize>, n_chroms: usize) -> Result<Self, Error> {
        if indices.len() > n_chroms {
            return Err(Error::Parameter(format!(
                "more chromosomes in the BAM file ({}) than in the fragment list ({})",
                indices.len(),
                n_chroms
            )));
        }
        if let Some(bad) = indices.iter().find(|&&i| i >= n_chroms) {
            return Err(Error::Parameter(format!(
                "conversion index {bad} out of range (n_chroms = {n_chroms})"
            )));
        }
        Ok(Self { indices })
    }

    /// Build the conversion table by matching chromosome names.
    pub fn from_names(bam_names: &[String], index_names: &[String]) -> Result<Self, Error> {
        let lookup: HashMap<&str, usize> = index_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let indices = bam_names
            .iter()
            .map(|name| {
                lookup.get(name.as_str()).copied().ok_or_else(|| {
                    Error::Parameter(format!(
                        "BAM chromosome '{name}' not present in the fragment list"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(indices, index_names.len())
    }

    /// Number of BAM chromosomes covered
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Convert the tid of a mapped record.
    pub fn convert(&self, tid: Option<usize>, read_name: &str) -> Result<usize, Error> {
        tid.and_then(|t| self.indices.get(t).copied())
            .ok_or_else(|| {
                Error::MalformedRecord(format!(
                    "tid for read '{read_name}' out of range of BAM header"
                ))
            })
    }
}
