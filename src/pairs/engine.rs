// Read-pair reconstruction, classification and routing

use std::iter::Peekable;

use log::info;

use crate::chimeric::ChimeraValidator;
use crate::error::Error;
use crate::genome::ChromConverter;
use crate::index::FragmentIndex;
use crate::io::bam::AlignmentRecord;
use crate::io::pairs::PairRouter;
use crate::stats::PairStats;

use super::cigar;
use super::classify::{fragment_relation, PairRelation};
use super::segment::Segment;

/// Filtering and validation policy for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Drop duplicate-flagged alignments and pairs
    pub remove_duplicates: bool,
    /// Alignments below this mapping quality count as unmapped
    pub min_mapq: Option<u8>,
    /// Drop pairs that fail chimera validation instead of only counting them
    pub remove_invalid_chimeras: bool,
    pub chimera_validator: ChimeraValidator,
}

/// All records sharing one query name
#[derive(Debug)]
struct ReadGroup {
    /// Kept alignments of read 1, 5' segment first
    mate1: Vec<Segment>,
    /// Kept alignments of read 2, 5' segment first
    mate2: Vec<Segment>,
    n_records: usize,
    has_first: bool,
    has_second: bool,
    is_duplicate: bool,
    first_unmapped: bool,
    second_unmapped: bool,
}

impl ReadGroup {
    fn new() -> Self {
        Self {
            mate1: Vec::new(),
            mate2: Vec::new(),
            n_records: 0,
            has_first: false,
            has_second: false,
            is_duplicate: false,
            first_unmapped: true,
            second_unmapped: true,
        }
    }

    /// Both mates kept an alignment, and both lead with their genuine 5' end
    fn has_five_prime_ends(&self) -> bool {
        matches!(
            (self.mate1.first(), self.mate2.first()),
            (Some(a), Some(b)) if a.is_primary() && b.is_primary()
        )
    }
}

/// Pick the anchor (larger chromosome, then fragment, then 5' position) and target.
pub fn canonical_order<'s>(a: &'s Segment, b: &'s Segment) -> (&'s Segment, &'s Segment) {
    let key = |s: &Segment| (s.chr_idx, s.fragment_id(), s.five_prime_pos());
    if key(a) > key(b) {
        (a, b)
    } else {
        (b, a)
    }
}

/// Single-pass classifier over a query-name-grouped alignment stream
pub struct PairEngine<'a> {
    index: &'a FragmentIndex,
    converter: &'a ChromConverter,
    config: EngineConfig,
}

impl<'a> PairEngine<'a> {
    pub fn new(index: &'a FragmentIndex, converter: &'a ChromConverter, config: EngineConfig) -> Self {
        Self {
            index,
            converter,
            config,
        }
    }

    /// Classify every read pair in `records`, sending valid pairs to `router`.
    ///
    /// Records of one query name must be contiguous. The first fatal error
    /// aborts the run.
    pub fn run<I>(&self, records: I, router: &mut PairRouter) -> Result<PairStats, Error>
    where
        I: IntoIterator<Item = Result<AlignmentRecord, Error>>,
    {
        let mut records = records.into_iter().peekable();
        let mut stats = PairStats::new();
        let mut n_groups: u64 = 0;

        while let Some(group) = self.next_group(&mut records)? {
            self.classify(group, &mut stats, router)?;
            n_groups += 1;
            if n_groups % 1_000_000 == 0 {
                info!("Processed {} read groups", n_groups);
            }
        }

        Ok(stats)
    }

    /// Collect the next run of records sharing a query name.
    fn next_group<I>(&self, records: &mut Peekable<I>) -> Result<Option<ReadGroup>, Error>
    where
        I: Iterator<Item = Result<AlignmentRecord, Error>>,
    {
        let first = match records.next() {
            Some(record) => record?,
            None => return Ok(None),
        };

        let name = first.name.clone();
        let mut group = ReadGroup::new();
        self.add_record(&mut group, first)?;

        while let Some(record) =
            records.next_if(|r| matches!(r, Ok(next) if next.name == name))
        {
            self.add_record(&mut group, record?)?;
        }

        Ok(Some(group))
    }

    /// Apply per-record filters and file the record under its mate.
    fn add_record(&self, group: &mut ReadGroup, record: AlignmentRecord) -> Result<(), Error> {
        group.n_records += 1;
        let is_first = record.is_first_mate;
        if is_first {
            group.has_first = true;
        } else {
            group.has_second = true;
        }

        let low_quality = matches!(
            (self.config.min_mapq, record.mapping_quality),
            (Some(min), Some(mapq)) if mapq < min
        );
        let unusable = record.is_unmapped || low_quality;

        let read_name = record.name_str();
        let span = cigar::interpret(
            &record.cigar,
            record.is_reverse,
            record.is_unmapped,
            &read_name,
        )?;

        // Duplicate and mapping status of a mate are decided by its 5' alignment
        if span.offset == 0 && span.width > 0 {
            if record.is_duplicate {
                group.is_duplicate = true;
            }
            if !unusable {
                if is_first {
                    group.first_unmapped = false;
                } else {
                    group.second_unmapped = false;
                }
            }
        }

        if unusable || (record.is_duplicate && self.config.remove_duplicates) {
            return Ok(());
        }

        let chr_idx = self.converter.convert(record.reference_id, &read_name)?;
        let pos = record.alignment_start.ok_or_else(|| {
            Error::MalformedRecord(format!("mapped read '{read_name}' has no position"))
        })?;

        let segment = Segment::new(chr_idx, pos, record.is_reverse, span.offset, span.width);
        let mate = if is_first {
            &mut group.mate1
        } else {
            &mut group.mate2
        };
        if segment.is_primary() {
            mate.insert(0, segment);
        } else {
            mate.push(segment);
        }
        Ok(())
    }

    fn classify(
        &self,
        mut group: ReadGroup,
        stats: &mut PairStats,
        router: &mut PairRouter,
    ) -> Result<(), Error> {
        if !group.has_first || !group.has_second {
            stats.singletons += 1;
            return Ok(());
        }
        stats.total += 1;

        let is_chimera = group.n_records > 2;
        if is_chimera {
            stats.chimeric_total += 1;
        }
        if group.is_duplicate {
            stats.duplicates += 1;
        }
        let is_unmapped = group.first_unmapped || group.second_unmapped;
        if is_unmapped {
            stats.filtered += 1;
        }

        if is_unmapped
            || (self.config.remove_duplicates && group.is_duplicate)
            || !group.has_five_prime_ends()
        {
            return Ok(());
        }
        stats.mapped += 1;

        for segment in group.mate1.iter_mut().chain(group.mate2.iter_mut()) {
            let fragment_id = self.index.locate(segment);
            segment.set_fragment_id(fragment_id);
        }
        let (read1, read2) = (&group.mate1[0], &group.mate2[0]);

        if self.index.detects_self_ligation() {
            match fragment_relation(read1, read2) {
                PairRelation::InwardPair { .. } => {
                    stats.dangling += 1;
                    return Ok(());
                }
                PairRelation::MateOverlap => {
                    stats.self_circles += 1;
                    return Ok(());
                }
                PairRelation::Unrelated => {}
            }
        }

        if is_chimera {
            stats.chimeric_mapped += 1;
            // Extra records may all have been filtered, leaving a plain pair
            let is_split = group.mate1.len() > 1 || group.mate2.len() > 1;
            if is_split {
                stats.chimeric_multi += 1;
            }
            let invalid = is_split
                && self
                    .config
                    .chimera_validator
                    .is_invalid(&group.mate1, &group.mate2);
            if invalid {
                stats.chimeric_invalid += 1;
                if self.config.remove_invalid_chimeras {
                    return Ok(());
                }
            }
        }

        let (anchor, target) = canonical_order(read1, read2);
        router.add(anchor, target)
    }
}
