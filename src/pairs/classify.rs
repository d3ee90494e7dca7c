// Relationship between two segments: inward-facing pair, overlapping mates, or neither

use super::segment::Segment;

/// How two segments relate as the ends of a single ligation product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRelation {
    /// Different chromosomes, or same strand
    Unrelated,
    /// Opposite strands facing each other; distance between the 5' ends (>= 1)
    InwardPair { distance: u64 },
    /// Opposite strands but the reverse 5' end lies before the forward one.
    /// Overextended or nested reads; cannot come from a single fragment.
    MateOverlap,
}

/// Compare the 5' ends of two segments, ignoring fragment assignment.
pub fn pair_relation(left: &Segment, right: &Segment) -> PairRelation {
    if left.chr_idx != right.chr_idx || left.is_reverse == right.is_reverse {
        return PairRelation::Unrelated;
    }

    let (forward, reverse) = if left.is_reverse {
        (right, left)
    } else {
        (left, right)
    };
    let f5 = forward.pos;
    let r5 = reverse.five_prime_pos();

    if r5 < f5 {
        return PairRelation::MateOverlap;
    }
    PairRelation::InwardPair {
        distance: r5 - f5 + 1,
    }
}

/// Like [`pair_relation`], but only for segments sharing a fragment id.
///
/// On the two primary segments of a pair, `InwardPair` is a dangling end and
/// `MateOverlap` is a self-circle.
pub fn fragment_relation(left: &Segment, right: &Segment) -> PairRelation {
    match (left.fragment_id(), right.fragment_id()) {
        (Some(a), Some(b)) if a == b => pair_relation(left, right),
        _ => PairRelation::Unrelated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(chr: usize, pos: u64, rev: bool, width: u64, frag: usize) -> Segment {
        let mut s = Segment::new(chr, pos, rev, 0, width);
        s.set_fragment_id(frag);
        s
    }

    #[test]
    fn test_inward_pair_distance() {
        let fwd = seg(0, 50, false, 10, 0);
        let rev = seg(0, 141, true, 10, 0); // 5' end at 150
        assert_eq!(
            pair_relation(&fwd, &rev),
            PairRelation::InwardPair { distance: 101 }
        );
        // Argument order does not matter
        assert_eq!(
            pair_relation(&rev, &fwd),
            PairRelation::InwardPair { distance: 101 }
        );
    }

    #[test]
    fn test_touching_ends_distance_one() {
        let fwd = seg(0, 100, false, 1, 0);
        let rev = seg(0, 100, true, 1, 0);
        assert_eq!(
            pair_relation(&fwd, &rev),
            PairRelation::InwardPair { distance: 1 }
        );
    }

    #[test]
    fn test_mate_overlap() {
        let fwd = seg(0, 200, false, 50, 2);
        let rev = seg(0, 100, true, 50, 2); // 5' end at 149 < 200
        assert_eq!(pair_relation(&fwd, &rev), PairRelation::MateOverlap);
        assert_eq!(fragment_relation(&rev, &fwd), PairRelation::MateOverlap);
    }

    #[test]
    fn test_same_strand_unrelated() {
        let a = seg(0, 10, false, 50, 0);
        let b = seg(0, 500, false, 50, 0);
        assert_eq!(pair_relation(&a, &b), PairRelation::Unrelated);
    }

    #[test]
    fn test_different_chromosome_unrelated() {
        let a = seg(0, 10, false, 50, 0);
        let b = seg(1, 500, true, 50, 0);
        assert_eq!(pair_relation(&a, &b), PairRelation::Unrelated);
    }

    #[test]
    fn test_fragment_relation_requires_same_fragment() {
        let fwd = seg(0, 50, false, 10, 0);
        let rev = seg(0, 141, true, 10, 1);
        assert_eq!(fragment_relation(&fwd, &rev), PairRelation::Unrelated);
        assert_eq!(
            pair_relation(&fwd, &rev),
            PairRelation::InwardPair { distance: 101 }
        );
    }

    #[test]
    fn test_fragment_relation_unassigned() {
        let a = Segment::new(0, 50, false, 0, 10);
        let b = Segment::new(0, 60, true, 0, 10);
        assert_eq!(fragment_relation(&a, &b), PairRelation::Unrelated);
    }
}
