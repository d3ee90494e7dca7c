/// Read-pair classification diagnostics
use crate::error::Error;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Counters accumulated over one engine run
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PairStats {
    /// Read pairs with records for both mates
    pub total: u64,
    /// Pairs whose 5' alignment carries the duplicate flag
    pub duplicates: u64,
    /// Pairs where a mate has no usable 5' alignment (unmapped or low MAPQ)
    pub filtered: u64,
    /// Pairs that passed all mapping filters
    pub mapped: u64,
    /// Same fragment, inward-facing
    pub dangling: u64,
    /// Same fragment, outward-facing or overlapping
    pub self_circles: u64,
    /// Groups with records for only one mate
    pub singletons: u64,
    /// Pairs with more than two alignment records
    pub chimeric_total: u64,
    /// Chimeric pairs that passed mapping filters
    pub chimeric_mapped: u64,
    /// Mapped chimeric pairs still holding a split mate after filtering
    pub chimeric_multi: u64,
    /// Mapped chimeric pairs failing chimera validation
    pub chimeric_invalid: u64,
}

impl PairStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print summary statistics to log
    pub fn print_summary(&self) {
        info!("=== Pair Summary ===");
        info!("Singleton groups: {}", self.singletons);
        if self.total == 0 {
            info!("No read pairs processed");
            return;
        }

        let pct = |n: u64| 100.0 * n as f64 / self.total as f64;
        info!("Read pairs: {}", self.total);
        info!(
            "Duplicates: {} ({:.2}%)",
            self.duplicates,
            pct(self.duplicates)
        );
        info!("Filtered: {} ({:.2}%)", self.filtered, pct(self.filtered));
        info!("Mapped: {} ({:.2}%)", self.mapped, pct(self.mapped));
        info!(
            "Dangling ends: {} ({:.2}%)",
            self.dangling,
            pct(self.dangling)
        );
        info!(
            "Self-circles: {} ({:.2}%)",
            self.self_circles,
            pct(self.self_circles)
        );
        info!(
            "Chimeric pairs: {} total, {} mapped, {} multi-segment, {} invalid",
            self.chimeric_total, self.chimeric_mapped, self.chimeric_multi, self.chimeric_invalid
        );
    }

    /// Write counters and the table of output files to `path`.
    ///
    /// `paths[i][j]` is the file for chromosome pair `(i, j)`; only written
    /// buckets are listed.
    pub fn write_summary(
        &self,
        path: &Path,
        chr_names: &[String],
        paths: &[Vec<Option<PathBuf>>],
    ) -> Result<(), Error> {
        let file = File::create(path).map_err(|e| Error::io(e, path))?;
        let mut w = BufWriter::new(file);

        let mut write_all = || -> std::io::Result<()> {
            writeln!(w, "## Mapping")?;
            writeln!(w, "total\t{}", self.total)?;
            writeln!(w, "marked\t{}", self.duplicates)?;
            writeln!(w, "filtered\t{}", self.filtered)?;
            writeln!(w, "mapped\t{}", self.mapped)?;
            writeln!(w, "## Same fragment")?;
            writeln!(w, "dangling\t{}", self.dangling)?;
            writeln!(w, "self.circle\t{}", self.self_circles)?;
            writeln!(w, "## Singletons")?;
            writeln!(w, "singles\t{}", self.singletons)?;
            writeln!(w, "## Chimeras")?;
            writeln!(w, "total\t{}", self.chimeric_total)?;
            writeln!(w, "mapped\t{}", self.chimeric_mapped)?;
            writeln!(w, "multi\t{}", self.chimeric_multi)?;
            writeln!(w, "invalid\t{}", self.chimeric_invalid)?;
            writeln!(w, "## Files")?;
            for (i, row) in paths.iter().enumerate() {
                for (j, file) in row.iter().enumerate() {
                    if let Some(file) = file {
                        writeln!(w, "{}\t{}\t{}", chr_names[i], chr_names[j], file.display())?;
                    }
                }
            }
            w.flush()
        };
        write_all().map_err(|e| Error::io(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stats_default() {
        let stats = PairStats::new();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.singletons, 0);
        assert_eq!(stats.chimeric_invalid, 0);
        stats.print_summary();
    }

    #[test]
    fn test_write_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.tsv");
        let stats = PairStats {
            total: 10,
            duplicates: 1,
            filtered: 2,
            mapped: 7,
            dangling: 1,
            self_circles: 1,
            singletons: 3,
            chimeric_total: 4,
            chimeric_mapped: 3,
            chimeric_multi: 2,
            chimeric_invalid: 1,
        };
        let names = vec!["chr1".to_string(), "chr2".to_string()];
        let paths = vec![
            vec![Some(PathBuf::from("out_0_0"))],
            vec![None, Some(PathBuf::from("out_1_1"))],
        ];
        stats.print_summary();
        stats.write_summary(&path, &names, &paths).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("total\t10\n"));
        assert!(content.contains("singles\t3\n"));
        assert!(content.contains("invalid\t1\n"));
        assert!(content.contains("chr1\tchr1\tout_0_0\n"));
        assert!(content.contains("chr2\tchr2\tout_1_1\n"));
        assert!(!content.contains("chr2\tchr1"));
    }
}
