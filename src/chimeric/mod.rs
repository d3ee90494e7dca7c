// Chimeric read-pair validation
//
// A mate with more than one alignment is a split read: its 5' piece plus one
// or more hard-clipped pieces. A plausible chimera comes from one ligation
// junction, so its extra piece must pair inward with the other mate's 5' piece.

mod validate;

pub use validate::ChimeraValidator;
