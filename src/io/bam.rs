/// BAM input with noodles (streaming, records decoded one at a time)
use crate::error::Error;
use crate::pairs::cigar::CigarOp;
use bstr::{BString, ByteSlice};
use noodles::bam;
use noodles::sam;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// The fields of one alignment record that pair classification consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub name: BString,
    /// BAM reference id; `None` for unplaced records
    pub reference_id: Option<usize>,
    /// Leftmost position (1-based); `None` for unplaced records
    pub alignment_start: Option<u64>,
    pub is_reverse: bool,
    /// Read 1 of the pair; everything else is treated as read 2
    pub is_first_mate: bool,
    pub is_duplicate: bool,
    pub is_unmapped: bool,
    /// `None` when the mapping quality is unavailable (255)
    pub mapping_quality: Option<u8>,
    pub cigar: Vec<CigarOp>,
}

impl AlignmentRecord {
    /// Decode the fields we need from a raw BAM record
    pub fn from_bam(record: &bam::Record) -> Result<Self, Error> {
        let flags = record.flags();
        let name = record
            .name()
            .map(|n| BString::from(n.to_vec()))
            .unwrap_or_default();

        let malformed = |what: &str, e: std::io::Error| {
            Error::MalformedRecord(format!(
                "invalid {} for read '{}': {}",
                what,
                name.to_str_lossy(),
                e
            ))
        };

        let reference_id = record
            .reference_sequence_id()
            .transpose()
            .map_err(|e| malformed("reference sequence id", e))?;
        let alignment_start = record
            .alignment_start()
            .transpose()
            .map_err(|e| malformed("alignment start", e))?
            .map(|p| p.get() as u64);
        let cigar = record
            .cigar()
            .iter()
            .map(|op| op.map(CigarOp::from))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| malformed("CIGAR", e))?;

        Ok(Self {
            reference_id,
            alignment_start,
            is_reverse: flags.is_reverse_complemented(),
            is_first_mate: flags.is_first_segment(),
            is_duplicate: flags.is_duplicate(),
            is_unmapped: flags.is_unmapped(),
            mapping_quality: record.mapping_quality().map(|mq| mq.get()),
            cigar,
            name,
        })
    }

    /// Read name for messages
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_str_lossy()
    }
}

/// Streaming BAM reader yielding [`AlignmentRecord`]s
pub struct BamRecordSource<R> {
    reader: bam::io::Reader<R>,
    header: sam::Header,
    record: bam::Record,
    path: PathBuf,
}

/// Open a BAM file and read its header
pub fn open_bam(path: &Path) -> Result<BamRecordSource<impl Read>, Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let mut reader = bam::io::Reader::new(file);
    let header = reader.read_header().map_err(|e| Error::io(e, path))?;

    Ok(BamRecordSource {
        reader,
        header,
        record: bam::Record::default(),
        path: path.to_path_buf(),
    })
}

impl<R> BamRecordSource<R> {
    /// Reference sequence names, in tid order
    pub fn reference_names(&self) -> Vec<String> {
        self.header
            .reference_sequences()
            .keys()
            .map(|name| name.to_string())
            .collect()
    }

    /// Reference sequence lengths, in tid order
    pub fn reference_lengths(&self) -> Vec<u64> {
        self.header
            .reference_sequences()
            .values()
            .map(|map| map.length().get() as u64)
            .collect()
    }
}

impl<R: Read> Iterator for BamRecordSource<R> {
    type Item = Result<AlignmentRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(0) => None,
            Ok(_) => Some(AlignmentRecord::from_bam(&self.record)),
            Err(e) => Some(Err(Error::io(e, &self.path))),
        }
    }
}
