//! Axis-aligned bounding boxes.

use thiserror::Error;

use crate::Vec3;

/// Box aligned to the space axes, spanned by two opposite corners.
/// `max` is the corner facing (+X, +Y, +Z), `min` the one facing
/// (-X, -Y, -Z); `min[i] <= max[i]` holds on every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AabbError {
    #[error("cannot compute a bounding box of an empty point set")]
    Empty,
}

/// Index pairs into [`Aabb::corners`] forming the 12 wireframe edges.
pub const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    [0, 6],
    [1, 7],
    [2, 4],
    [3, 5],
    [0, 3],
    [1, 2],
    [4, 7],
    [5, 6],
];

impl Aabb {
    /// Componentwise min/max fold over a point sequence.
    /// An empty sequence is an explicit error.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Result<Self, AabbError> {
        let mut iter = points.into_iter();
        let first = iter.next().ok_or(AabbError::Empty)?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = min.min(p);
            max = max.max(p);
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).length()
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// The 8 corners, numbered counter-clockwise around the -Z face first.
    pub fn corners(&self) -> [Vec3; 8] {
        let (mn, mx) = (self.min, self.max);
        [
            mn,
            Vec3::new(mx.x, mn.y, mn.z),
            Vec3::new(mx.x, mx.y, mn.z),
            Vec3::new(mn.x, mx.y, mn.z),
            mx,
            Vec3::new(mn.x, mx.y, mx.z),
            Vec3::new(mn.x, mn.y, mx.z),
            Vec3::new(mx.x, mn.y, mx.z),
        ]
    }
}
