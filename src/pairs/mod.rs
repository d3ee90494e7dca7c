// Read-pair reconstruction and classification
//
// Records sharing a query name are folded into per-mate segment lists, each
// segment is placed on a fragment, and the pair is classified as a dangling
// end, a self-circle, or a contact to be written out.

pub mod cigar;
pub mod classify;
pub mod engine;
pub mod segment;

pub use classify::PairRelation;
pub use engine::{EngineConfig, PairEngine};
pub use segment::Segment;
