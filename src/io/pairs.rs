// Per-chromosome-pair output files with bounded in-memory buffers

use crate::error::Error;
use crate::pairs::segment::Segment;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One emitted contact, as written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRecord {
    /// 1-based fragment id of the anchor
    pub anchor_fragment: usize,
    /// 1-based fragment id of the target
    pub target_fragment: usize,
    pub anchor_pos: u64,
    pub target_pos: u64,
    /// Alignment width, negative for reverse-strand anchors
    pub anchor_width: i64,
    /// Alignment width, negative for reverse-strand targets
    pub target_width: i64,
}

impl PairRecord {
    /// Build the record for an anchor/target pair with assigned fragments
    pub fn new(anchor: &Segment, target: &Segment) -> Self {
        Self {
            anchor_fragment: anchor.fragment_id().unwrap_or_default() + 1,
            target_fragment: target.fragment_id().unwrap_or_default() + 1,
            anchor_pos: anchor.pos,
            target_pos: target.pos,
            anchor_width: anchor.signed_width(),
            target_width: target.signed_width(),
        }
    }
}

impl fmt::Display for PairRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.anchor_fragment,
            self.target_fragment,
            self.anchor_pos,
            self.target_pos,
            self.anchor_width,
            self.target_width
        )
    }
}

/// Buffered records for one chromosome pair
#[derive(Debug)]
struct PairBucket {
    path: PathBuf,
    records: Vec<PairRecord>,
    written: bool,
}

impl PairBucket {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: Vec::new(),
            written: false,
        }
    }

    /// Write out buffered records. The file is truncated on the first flush
    /// and appended to afterwards.
    fn flush(&mut self) -> Result<(), Error> {
        if self.records.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(self.written)
            .truncate(!self.written)
            .open(&self.path)
            .map_err(|e| Error::io(e, &self.path))?;
        let mut writer = BufWriter::new(file);
        for record in &self.records {
            writeln!(writer, "{record}").map_err(|e| Error::io(e, &self.path))?;
        }
        writer.flush().map_err(|e| Error::io(e, &self.path))?;

        log::debug!(
            "Flushed {} pairs to {}",
            self.records.len(),
            self.path.display()
        );
        self.records.clear();
        self.written = true;
        Ok(())
    }
}

/// Triangular matrix of output buckets, one per unordered chromosome pair.
///
/// Bucket `(i, j)` with `i >= j` is written to `<prefix><i>_<j>`.
pub struct PairRouter {
    buckets: Vec<Vec<PairBucket>>,
    capacity: usize,
}

impl PairRouter {
    /// Create buckets for `n_chroms * (n_chroms + 1) / 2` chromosome pairs.
    /// Nothing touches the disk until a bucket flushes.
    pub fn new(prefix: &str, n_chroms: usize, capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::Parameter(
                "number of stored pairs should be a positive integer".into(),
            ));
        }

        let buckets = (0..n_chroms)
            .map(|i| {
                (0..=i)
                    .map(|j| PairBucket::new(PathBuf::from(format!("{prefix}{i}_{j}"))))
                    .collect()
            })
            .collect();

        Ok(Self { buckets, capacity })
    }

    pub fn n_chroms(&self) -> usize {
        self.buckets.len()
    }

    /// Queue one pair; the anchor's chromosome must be >= the target's.
    ///
    /// A full bucket is flushed before the new record is accepted.
    pub fn add(&mut self, anchor: &Segment, target: &Segment) -> Result<(), Error> {
        let bucket = self
            .buckets
            .get_mut(anchor.chr_idx)
            .and_then(|row| row.get_mut(target.chr_idx))
            .ok_or_else(|| {
                Error::MalformedRecord(format!(
                    "no output bucket for chromosome pair ({}, {})",
                    anchor.chr_idx, target.chr_idx
                ))
            })?;

        if bucket.records.len() >= self.capacity {
            bucket.flush()?;
        }
        bucket.records.push(PairRecord::new(anchor, target));
        Ok(())
    }

    /// Flush one bucket regardless of fill level
    pub fn flush(&mut self, anchor_chr: usize, target_chr: usize) -> Result<(), Error> {
        match self
            .buckets
            .get_mut(anchor_chr)
            .and_then(|row| row.get_mut(target_chr))
        {
            Some(bucket) => bucket.flush(),
            None => Ok(()),
        }
    }

    /// Flush every bucket and report which files were written.
    ///
    /// Row `i` of the result has `i + 1` entries; `None` marks a chromosome
    /// pair that produced no output.
    pub fn finish(mut self) -> Result<Vec<Vec<Option<PathBuf>>>, Error> {
        for row in &mut self.buckets {
            for bucket in row.iter_mut() {
                bucket.flush()?;
            }
        }

        Ok(self
            .buckets
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|bucket| bucket.written.then_some(bucket.path))
                    .collect()
            })
            .collect())
    }

    /// Path of a bucket's file, whether or not it has been written
    pub fn path(&self, anchor_chr: usize, target_chr: usize) -> Option<&Path> {
        self.buckets
            .get(anchor_chr)
            .and_then(|row| row.get(target_chr))
            .map(|bucket| bucket.path.as_path())
    }
}
