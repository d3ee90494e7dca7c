use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Error;

/// Chromosome names and lengths, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChromSizes {
    pub names: Vec<String>,
    pub lengths: Vec<u64>,
}

/// Parse a chromosome sizes table (`name<TAB>length`).
///
/// Blank lines and `#` comments are skipped; lengths must be positive.
pub fn load_chrom_sizes(path: &Path) -> Result<ChromSizes, Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let reader = BufReader::new(file);

    let mut sizes = ChromSizes::default();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| Error::io(e, path))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(name), Some(length)) = (fields.next(), fields.next()) else {
            return Err(Error::Parameter(format!(
                "{}:{}: expected 'name<TAB>length'",
                path.display(),
                line_num + 1
            )));
        };

        let length = length.parse::<u64>().ok().filter(|&l| l > 0).ok_or_else(|| {
            Error::Parameter(format!(
                "{}:{}: chromosome lengths must be positive integers, got '{}'",
                path.display(),
                line_num + 1,
                length
            ))
        })?;

        sizes.names.push(name.to_string());
        sizes.lengths.push(length);
    }

    if sizes.names.is_empty() {
        return Err(Error::Parameter(format!(
            "no chromosomes found in {}",
            path.display()
        )));
    }

    Ok(sizes)
}
