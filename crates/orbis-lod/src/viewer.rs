//! Event-driven LOD rechecks: a new check only once the viewer has moved far
//! enough since the last one.

use glam::Vec3;

/// Viewer displacement that triggers a new LOD check.
pub const DEFAULT_VIEWER_MOVE_THRESHOLD: f32 = 20.0;

/// Tracks the viewer position at the last LOD check.
#[derive(Clone, Debug)]
pub struct ViewerTracker {
    threshold: f32,
    last_check: Option<Vec3>,
}

impl ViewerTracker {
    /// Create a tracker that fires after `threshold` units of movement.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last_check: None,
        }
    }

    /// Position recorded at the last check.
    pub fn last_check(&self) -> Option<Vec3> {
        self.last_check
    }

    /// Record `viewer` as checked without testing the threshold.
    pub fn mark_checked(&mut self, viewer: Vec3) {
        self.last_check = Some(viewer);
    }

    /// Returns true (and records the position) when the viewer has moved more
    /// than the threshold since the last check. The first call always fires.
    pub fn should_check(&mut self, viewer: Vec3) -> bool {
        let moved = match self.last_check {
            None => true,
            Some(last) => last.distance(viewer) > self.threshold,
        };
        if moved {
            self.last_check = Some(viewer);
        }
        moved
    }
}

impl Default for ViewerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWER_MOVE_THRESHOLD)
    }
}
