//! Axis-aligned bounding boxes for chunk distance queries.

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
///
/// Invariant: `min <= max` on every axis for boxes built from at least one
/// point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two corners, sorting components per axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box enclosing all `points`, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| acc.grow(p)))
    }

    /// Smallest box enclosing `points` after applying `transform` to each.
    pub fn from_transformed_points(points: &[Vec3], transform: &Mat4) -> Option<Self> {
        Self::from_points(points.iter().map(|&p| transform.transform_point3(p)))
    }

    /// This box extended to contain `point`.
    #[must_use]
    pub fn grow(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns true if `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Squared distance from `point` to the closest point of the box; zero
    /// when the point is inside.
    pub fn squared_distance(&self, point: Vec3) -> f32 {
        let closest = point.clamp(self.min, self.max);
        point.distance_squared(closest)
    }

    /// Distance from `point` to the box.
    pub fn distance(&self, point: Vec3) -> f32 {
        self.squared_distance(point).sqrt()
    }
}
