//! Distance-based resolution selection over an ordered detail table.

use glam::Vec3;
use orbis_sphere::Aabb;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_FAR_REGENERATION_DISTANCE, DEFAULT_VIEWER_MOVE_THRESHOLD};

/// One entry of the detail table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailLevel {
    /// Patch resolution (vertices per side) used at this level.
    pub resolution: u32,
    /// Chunks farther than this from the viewer fall through to the next,
    /// coarser level.
    pub visible_distance_threshold: f32,
}

impl DetailLevel {
    /// Create a detail level.
    pub const fn new(resolution: u32, visible_distance_threshold: f32) -> Self {
        Self {
            resolution,
            visible_distance_threshold,
        }
    }
}

/// Errors raised when a detail table cannot drive selection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodError {
    /// The table has no entries.
    #[error("detail table is empty")]
    Empty,
    /// A threshold is smaller than the one before it.
    #[error("detail thresholds must be ascending: level {index} has {threshold} after {previous}")]
    NotAscending {
        /// Index of the offending level.
        index: usize,
        /// Its threshold.
        threshold: f32,
        /// Threshold of the previous level.
        previous: f32,
    },
    /// A patch resolution too small to form a single grid cell.
    #[error("detail level {index} has resolution {resolution}, need at least 2")]
    ResolutionTooSmall {
        /// Index of the offending level.
        index: usize,
        /// Its resolution.
        resolution: u32,
    },
}

/// LOD settings for a chunked planet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Detail table, finest first, ascending thresholds.
    pub detail_levels: Vec<DetailLevel>,
    /// Chunks farther than this are not rebuilt during incremental passes.
    pub far_regeneration_distance: f32,
    /// Viewer displacement that triggers a new LOD check.
    pub viewer_move_threshold: f32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            detail_levels: vec![
                DetailLevel::new(64, 20.0),
                DetailLevel::new(32, 40.0),
                DetailLevel::new(16, 60.0),
                DetailLevel::new(4, f32::INFINITY),
            ],
            far_regeneration_distance: DEFAULT_FAR_REGENERATION_DISTANCE,
            viewer_move_threshold: DEFAULT_VIEWER_MOVE_THRESHOLD,
        }
    }
}

/// Maps viewer distance to a patch resolution.
#[derive(Clone, Debug)]
pub struct LodSelector {
    levels: Vec<DetailLevel>,
}

impl LodSelector {
    /// Create a selector over a validated detail table.
    ///
    /// # Errors
    ///
    /// Returns [`LodError`] if the table is empty, thresholds are not
    /// ascending, or a resolution is below 2.
    pub fn new(levels: Vec<DetailLevel>) -> Result<Self, LodError> {
        if levels.is_empty() {
            return Err(LodError::Empty);
        }
        for (index, level) in levels.iter().enumerate() {
            if level.resolution < 2 {
                return Err(LodError::ResolutionTooSmall {
                    index,
                    resolution: level.resolution,
                });
            }
            if index > 0 {
                let previous = levels[index - 1].visible_distance_threshold;
                if level.visible_distance_threshold < previous {
                    return Err(LodError::NotAscending {
                        index,
                        threshold: level.visible_distance_threshold,
                        previous,
                    });
                }
            }
        }
        Ok(Self { levels })
    }

    /// The detail table.
    pub fn levels(&self) -> &[DetailLevel] {
        &self.levels
    }

    /// Finest resolution of the table.
    pub fn finest_resolution(&self) -> u32 {
        self.levels[0].resolution
    }

    /// Resolution for a chunk at `distance` from the viewer.
    ///
    /// Starting at the finest level, moves to the next coarser level while the
    /// distance exceeds the current threshold; the last level catches
    /// everything beyond.
    pub fn select_resolution(&self, distance: f32) -> u32 {
        let last = self.levels.len() - 1;
        let mut index = 0;
        while index < last && distance > self.levels[index].visible_distance_threshold {
            index += 1;
        }
        self.levels[index].resolution
    }

    /// Resolution for a chunk with world bounds `bounds`, seen from `viewer`.
    pub fn select_for_bounds(&self, bounds: &Aabb, viewer: Vec3) -> u32 {
        self.select_resolution(chunk_distance_to_viewer(bounds, viewer))
    }
}

/// Distance from the viewer to the nearest point of a chunk's world bounds.
pub fn chunk_distance_to_viewer(bounds: &Aabb, viewer: Vec3) -> f32 {
    bounds.squared_distance(viewer).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_selector() -> LodSelector {
        LodSelector::new(vec![
            DetailLevel::new(64, 20.0),
            DetailLevel::new(16, 60.0),
            DetailLevel::new(4, f32::INFINITY),
        ])
        .unwrap()
    }

    #[test]
    fn test_example_distance_45_selects_16() {
        assert_eq!(example_selector().select_resolution(45.0), 16);
    }

    #[test]
    fn test_close_selects_finest() {
        let selector = example_selector();
        assert_eq!(selector.select_resolution(0.0), 64);
        assert_eq!(selector.select_resolution(20.0), 64);
        assert_eq!(selector.finest_resolution(), 64);
    }

    #[test]
    fn test_far_selects_coarsest() {
        let selector = example_selector();
        assert_eq!(selector.select_resolution(60.5), 4);
        assert_eq!(selector.select_resolution(f32::MAX), 4);
    }

    #[test]
    fn test_all_thresholds_exceeded_uses_last_level() {
        let selector =
            LodSelector::new(vec![DetailLevel::new(8, 10.0), DetailLevel::new(4, 20.0)]).unwrap();
        assert_eq!(selector.select_resolution(1000.0), 4);
    }

    #[test]
    fn test_selection_is_monotonic_in_distance() {
        let selector = LodSelector::new(LodConfig::default().detail_levels).unwrap();
        let mut previous = u32::MAX;
        for step in 0..400 {
            let distance = step as f32 * 0.5;
            let resolution = selector.select_resolution(distance);
            assert!(
                resolution <= previous,
                "resolution rose from {previous} to {resolution} at distance {distance}"
            );
            previous = resolution;
        }
    }

    #[test]
    fn test_select_for_bounds_uses_box_distance() {
        let selector = example_selector();
        let bounds = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(selector.select_for_bounds(&bounds, Vec3::splat(0.5)), 64);
        assert_eq!(selector.select_for_bounds(&bounds, Vec3::new(46.0, 0.5, 0.5)), 16);
        assert_eq!(chunk_distance_to_viewer(&bounds, Vec3::new(4.0, 0.0, 0.0)), 3.0);
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(LodSelector::new(vec![]).unwrap_err(), LodError::Empty);
    }

    #[test]
    fn test_descending_thresholds_rejected() {
        let err = LodSelector::new(vec![DetailLevel::new(8, 50.0), DetailLevel::new(4, 10.0)])
            .unwrap_err();
        assert!(matches!(err, LodError::NotAscending { index: 1, .. }));
    }

    #[test]
    fn test_tiny_resolution_rejected() {
        let err = LodSelector::new(vec![DetailLevel::new(1, 50.0)]).unwrap_err();
        assert_eq!(err, LodError::ResolutionTooSmall { index: 0, resolution: 1 });
    }
}
