/// CIGAR operations and the 5' clip / reference width derived from them
use std::fmt;

use noodles::sam::alignment::record::cigar::op::{Kind, Op};

use crate::error::Error;

/// CIGAR operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarOp {
    /// M: match/mismatch (default mode)
    Match(u32),
    /// =: exact match (optional)
    Equal(u32),
    /// X: mismatch (optional)
    Diff(u32),
    /// I: insertion to reference
    Ins(u32),
    /// D: deletion from reference
    Del(u32),
    /// N: skipped reference region
    RefSkip(u32),
    /// S: soft clip (clipped sequence present in read)
    SoftClip(u32),
    /// H: hard clip (clipped sequence not present)
    HardClip(u32),
    /// P: padding
    Pad(u32),
}

impl CigarOp {
    /// Get the operation character
    pub fn op_char(&self) -> char {
        match self {
            CigarOp::Match(_) => 'M',
            CigarOp::Equal(_) => '=',
            CigarOp::Diff(_) => 'X',
            CigarOp::Ins(_) => 'I',
            CigarOp::Del(_) => 'D',
            CigarOp::RefSkip(_) => 'N',
            CigarOp::SoftClip(_) => 'S',
            CigarOp::HardClip(_) => 'H',
            CigarOp::Pad(_) => 'P',
        }
    }

    /// Get the operation length
    pub fn len(&self) -> u32 {
        match self {
            CigarOp::Match(n)
            | CigarOp::Equal(n)
            | CigarOp::Diff(n)
            | CigarOp::Ins(n)
            | CigarOp::Del(n)
            | CigarOp::RefSkip(n)
            | CigarOp::SoftClip(n)
            | CigarOp::HardClip(n)
            | CigarOp::Pad(n) => *n,
        }
    }

    /// Check if operation is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if operation consumes reference bases
    pub fn consumes_reference(&self) -> bool {
        matches!(
            self,
            CigarOp::Match(_)
                | CigarOp::Equal(_)
                | CigarOp::Diff(_)
                | CigarOp::Del(_)
                | CigarOp::RefSkip(_)
        )
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len(), self.op_char())
    }
}

impl From<Op> for CigarOp {
    fn from(op: Op) -> Self {
        let len = op.len() as u32;
        match op.kind() {
            Kind::Match => CigarOp::Match(len),
            Kind::SequenceMatch => CigarOp::Equal(len),
            Kind::SequenceMismatch => CigarOp::Diff(len),
            Kind::Insertion => CigarOp::Ins(len),
            Kind::Deletion => CigarOp::Del(len),
            Kind::Skip => CigarOp::RefSkip(len),
            Kind::SoftClip => CigarOp::SoftClip(len),
            Kind::HardClip => CigarOp::HardClip(len),
            Kind::Pad => CigarOp::Pad(len),
        }
    }
}

/// Reference span of a CIGAR (sum of reference-consuming operations).
pub fn reference_length(cigar: &[CigarOp]) -> u64 {
    cigar
        .iter()
        .filter(|op| op.consumes_reference())
        .map(|op| u64::from(op.len()))
        .sum()
}

/// Offset and width of one alignment, as derived from its CIGAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarSpan {
    /// Hard-clipped bases at the 5' end of the read (0 = genuine 5' end).
    pub offset: u32,
    /// Reference span of the alignment.
    pub width: u64,
}

/// Derive the 5' hard-clip offset and the reference width of an alignment.
///
/// Only the outermost operation on the 5' side is inspected: the first one for
/// forward-strand alignments, the last one for reverse-strand alignments.
/// An empty CIGAR is only legal on unmapped records, which get `(0, 0)`.
pub fn interpret(
    cigar: &[CigarOp],
    is_reverse: bool,
    is_unmapped: bool,
    read_name: &str,
) -> Result<CigarSpan, Error> {
    if cigar.is_empty() {
        if is_unmapped {
            return Ok(CigarSpan {
                offset: 0,
                width: 0,
            });
        }
        return Err(Error::MalformedRecord(format!(
            "zero-length CIGAR for read '{read_name}'"
        )));
    }

    let five_prime = if is_reverse {
        cigar.last()
    } else {
        cigar.first()
    };
    let offset = match five_prime {
        Some(CigarOp::HardClip(n)) => *n,
        _ => 0,
    };

    Ok(CigarSpan {
        offset,
        width: reference_length(cigar),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cigar_op_display() {
        assert_eq!(CigarOp::Match(50).to_string(), "50M");
        assert_eq!(CigarOp::HardClip(20).to_string(), "20H");
        assert_eq!(CigarOp::Del(2).to_string(), "2D");
        assert_eq!(CigarOp::RefSkip(1000).to_string(), "1000N");
    }

    #[test]
    fn test_from_noodles_op() {
        assert_eq!(CigarOp::from(Op::new(Kind::Match, 30)), CigarOp::Match(30));
        assert_eq!(
            CigarOp::from(Op::new(Kind::HardClip, 7)),
            CigarOp::HardClip(7)
        );
        assert_eq!(CigarOp::from(Op::new(Kind::Skip, 100)), CigarOp::RefSkip(100));
    }

    #[test]
    fn test_reference_length() {
        let cigar = vec![
            CigarOp::HardClip(5),
            CigarOp::SoftClip(3),
            CigarOp::Match(40),
            CigarOp::Ins(2),
            CigarOp::Del(4),
            CigarOp::Match(10),
        ];
        // 40 + 4 + 10, clips and insertions do not consume reference
        assert_eq!(reference_length(&cigar), 54);
        assert_eq!(reference_length(&cigar), reference_length(&cigar));
    }

    #[test]
    fn test_forward_leading_hard_clip() {
        let cigar = vec![CigarOp::HardClip(20), CigarOp::Match(30)];
        let span = interpret(&cigar, false, false, "r1").unwrap();
        assert_eq!(span, CigarSpan { offset: 20, width: 30 });
    }

    #[test]
    fn test_forward_ignores_trailing_hard_clip() {
        let cigar = vec![CigarOp::Match(30), CigarOp::HardClip(20)];
        let span = interpret(&cigar, false, false, "r1").unwrap();
        assert_eq!(span.offset, 0);
        assert_eq!(span.width, 30);
    }

    #[test]
    fn test_reverse_trailing_hard_clip() {
        let cigar = vec![CigarOp::HardClip(5), CigarOp::Match(30), CigarOp::HardClip(20)];
        let span = interpret(&cigar, true, false, "r1").unwrap();
        assert_eq!(span.offset, 20);
        assert_eq!(span.width, 30);
    }

    #[test]
    fn test_soft_clip_is_not_offset() {
        let cigar = vec![CigarOp::SoftClip(10), CigarOp::Match(40)];
        let span = interpret(&cigar, false, false, "r1").unwrap();
        assert_eq!(span.offset, 0);
        assert_eq!(span.width, 40);
    }

    #[test]
    fn test_interior_hard_clip_ignored() {
        let cigar = vec![CigarOp::SoftClip(2), CigarOp::HardClip(10), CigarOp::Match(40)];
        let span = interpret(&cigar, false, false, "r1").unwrap();
        assert_eq!(span.offset, 0);
    }

    #[test]
    fn test_empty_cigar_unmapped() {
        let span = interpret(&[], false, true, "r1").unwrap();
        assert_eq!(span, CigarSpan { offset: 0, width: 0 });
    }

    #[test]
    fn test_empty_cigar_mapped_is_error() {
        let err = interpret(&[], true, false, "read42").unwrap_err();
        match err {
            Error::MalformedRecord(msg) => assert!(msg.contains("read42")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
