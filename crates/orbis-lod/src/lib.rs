//! Level-of-detail management: distance-based resolution selection, the
//! per-chunk regeneration decision, and viewer-move triggering.

mod decision;
mod selector;
mod viewer;

pub use decision::{DEFAULT_FAR_REGENERATION_DISTANCE, LodDecision, decide_regeneration};
pub use selector::{DetailLevel, LodConfig, LodError, LodSelector, chunk_distance_to_viewer};
pub use viewer::{DEFAULT_VIEWER_MOVE_THRESHOLD, ViewerTracker};
