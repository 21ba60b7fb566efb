//! Whether a chunk needs a new mesh after a resolution change.

/// Chunks farther than this are left at their current resolution during
/// incremental passes.
pub const DEFAULT_FAR_REGENERATION_DISTANCE: f32 = 120.0;

/// Outcome of a chunk's LOD check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LodDecision {
    /// The requested resolution is already active.
    Unchanged,
    /// A cached mesh for the requested resolution exists and is swapped in.
    Reuse(u32),
    /// The chunk is too far away to be worth rebuilding this pass.
    Deferred,
    /// The chunk must build a mesh at the requested resolution.
    Regenerate(u32),
}

impl LodDecision {
    /// True only for [`LodDecision::Regenerate`].
    pub fn requires_regeneration(self) -> bool {
        matches!(self, LodDecision::Regenerate(_))
    }
}

/// Decide what a chunk does when its selected resolution becomes
/// `new_resolution`.
///
/// Checks, in order: same as `current_resolution` → unchanged; a cached
/// variant with vertices → reuse; `distance > far_cutoff` → deferred, unless
/// the chunk has no mesh at all; otherwise regenerate.
pub fn decide_regeneration(
    current_resolution: Option<u32>,
    new_resolution: u32,
    has_cached_variant: bool,
    distance: f32,
    far_cutoff: f32,
) -> LodDecision {
    if current_resolution == Some(new_resolution) {
        LodDecision::Unchanged
    } else if has_cached_variant {
        LodDecision::Reuse(new_resolution)
    } else if distance > far_cutoff && current_resolution.is_some() {
        LodDecision::Deferred
    } else {
        LodDecision::Regenerate(new_resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUTOFF: f32 = DEFAULT_FAR_REGENERATION_DISTANCE;

    #[test]
    fn test_same_resolution_is_noop() {
        let d = decide_regeneration(Some(16), 16, true, 0.0, CUTOFF);
        assert_eq!(d, LodDecision::Unchanged);
        assert!(!d.requires_regeneration());
    }

    #[test]
    fn test_cached_variant_is_reused() {
        let d = decide_regeneration(Some(16), 64, true, 500.0, CUTOFF);
        assert_eq!(d, LodDecision::Reuse(64));
        assert!(!d.requires_regeneration());
    }

    #[test]
    fn test_far_chunk_is_deferred() {
        let d = decide_regeneration(Some(16), 4, false, 121.0, CUTOFF);
        assert_eq!(d, LodDecision::Deferred);
        assert!(!d.requires_regeneration());
    }

    #[test]
    fn test_cutoff_boundary_still_regenerates() {
        let d = decide_regeneration(Some(16), 4, false, CUTOFF, CUTOFF);
        assert_eq!(d, LodDecision::Regenerate(4));
    }

    #[test]
    fn test_far_chunk_without_mesh_regenerates() {
        let d = decide_regeneration(None, 4, false, 500.0, CUTOFF);
        assert_eq!(d, LodDecision::Regenerate(4));
    }

    #[test]
    fn test_near_uncached_chunk_regenerates() {
        let d = decide_regeneration(None, 32, false, 10.0, CUTOFF);
        assert_eq!(d, LodDecision::Regenerate(32));
        assert!(d.requires_regeneration());
    }
}
