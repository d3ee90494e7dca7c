// Segment: one alignment piece of one mate

/// A single alignment of one mate, reduced to what pair classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Chromosome index in the fragment index (not the BAM tid)
    pub chr_idx: usize,
    /// Leftmost reference position (1-based)
    pub pos: u64,
    /// Strand (false = forward, true = reverse)
    pub is_reverse: bool,
    /// Hard-clipped bases at the read's 5' end; non-zero for split-alignment pieces
    pub offset: u32,
    /// Reference span of the alignment
    pub width: u64,
    fragment_id: Option<usize>,
}

impl Segment {
    /// Create a segment with no fragment assigned yet
    pub fn new(chr_idx: usize, pos: u64, is_reverse: bool, offset: u32, width: u64) -> Self {
        Self {
            chr_idx,
            pos,
            is_reverse,
            offset,
            width,
            fragment_id: None,
        }
    }

    /// Genomic coordinate of the 5' end of this alignment
    pub fn five_prime_pos(&self) -> u64 {
        if self.is_reverse {
            (self.pos + self.width).saturating_sub(1)
        } else {
            self.pos
        }
    }

    /// Does this segment carry the read's genuine 5' end?
    pub fn is_primary(&self) -> bool {
        self.offset == 0
    }

    pub fn fragment_id(&self) -> Option<usize> {
        self.fragment_id
    }

    /// Bind the fragment id. Called once, after all filtering is done.
    pub fn set_fragment_id(&mut self, id: usize) {
        debug_assert!(self.fragment_id.is_none(), "fragment id assigned twice");
        self.fragment_id = Some(id);
    }

    /// Width with the strand folded into the sign (negative = reverse)
    pub fn signed_width(&self) -> i64 {
        let width = self.width as i64;
        if self.is_reverse {
            -width
        } else {
            width
        }
    }
}
