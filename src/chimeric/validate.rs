// Structural plausibility checks for split-alignment read pairs

use crate::pairs::classify::{fragment_relation, pair_relation, PairRelation};
use crate::pairs::segment::Segment;

/// Strategy for deciding whether a chimeric read pair is invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChimeraValidator {
    /// The extra piece must share a fragment with, and face, the other mate's 5' piece
    ByFragment,
    /// The extra piece must face the other mate's 5' piece within `max_span` bp
    ByDistance { max_span: u64 },
}

impl ChimeraValidator {
    /// Check a read pair whose mates hold their 5' segment first.
    ///
    /// Mates with more than two segments are always invalid. Mates with a
    /// single segment contribute no check.
    pub fn is_invalid(&self, mate1: &[Segment], mate2: &[Segment]) -> bool {
        if mate1.len() > 2 || mate2.len() > 2 {
            return true;
        }
        self.split_is_invalid(mate1, mate2) || self.split_is_invalid(mate2, mate1)
    }

    /// Check the second piece of `split` against the 5' piece of `other`
    fn split_is_invalid(&self, split: &[Segment], other: &[Segment]) -> bool {
        let (Some(piece), Some(anchor)) = (split.get(1), other.first()) else {
            return false;
        };
        match self {
            Self::ByFragment => !matches!(
                fragment_relation(anchor, piece),
                PairRelation::InwardPair { .. }
            ),
            Self::ByDistance { max_span } => match pair_relation(anchor, piece) {
                PairRelation::InwardPair { distance } => distance > *max_span,
                _ => true,
            },
        }
    }
}
