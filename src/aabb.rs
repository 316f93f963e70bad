/*

    Axis Aligned Bounding Box

    Stored as two corner points. Keeping min <= max on every
    axis is the caller's job and is not corrected here; a box
    that violates it propagates through size/volume as negative
    values.

*/

use serde::{Deserialize, Serialize};

use crate::numeric::{Float, Matrix4, Vector3, in_range, transform_point};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// Merge identity: merging any point into the empty box
    /// yields the point-box for that point.
    pub const EMPTY: Self = Self {
        min: Vector3::INFINITY,
        max: Vector3::NEG_INFINITY,
    };

    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    pub fn from_coords(
        min_x: Float,
        min_y: Float,
        min_z: Float,
        max_x: Float,
        max_y: Float,
        max_z: Float,
    ) -> Self {
        Self::new(
            Vector3::new(min_x, min_y, min_z),
            Vector3::new(max_x, max_y, max_z),
        )
    }

    pub fn from_center_half_size(center: Vector3, half_size: Vector3) -> Self {
        Self::new(center - half_size, center + half_size)
    }

    /// Smallest box enclosing all the given points. An empty
    /// iterator yields [`Aabb::EMPTY`].
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vector3>,
    {
        let mut aabb = Self::EMPTY;
        for point in points {
            aabb.merge_point(point);
        }
        aabb
    }

    /// Grow the box just enough to enclose `point`. Merging a
    /// point already inside is a no-op.
    pub fn merge_point(&mut self, point: Vector3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow the box to the smallest box enclosing both inputs.
    pub fn merge(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Apply an affine transform to the box.
    ///
    /// Transforming only min and max is correct solely for
    /// axis-aligned scalings. Rotation or shear can push any
    /// corner out to a new extreme on any axis, so all 8 corners
    /// go through the matrix and the bounds are re-accumulated
    /// from the empty box.
    pub fn transform(&mut self, matrix: &Matrix4) {
        let corners = self.corners();
        *self = Self::EMPTY;
        for corner in corners {
            self.merge_point(transform_point(matrix, &corner));
        }
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn half_size(&self) -> Vector3 {
        self.size() * 0.5
    }

    pub fn volume(&self) -> Float {
        let d = self.size();
        d.x * d.y * d.z
    }

    /// One of the 8 corners, `None` for indices past 7.
    ///
    /// ```text
    ///    1-------2
    ///   /|      /|
    ///  / |     / |
    /// 6-------7  |
    /// |  0----|--3
    /// | /     | /
    /// |/      |/
    /// 5-------4
    /// ```
    pub fn corner(&self, index: u8) -> Option<Vector3> {
        match index {
            0 => Some(self.min),
            1 => Some(Vector3::new(self.min.x, self.max.y, self.min.z)),
            2 => Some(Vector3::new(self.max.x, self.max.y, self.min.z)),
            3 => Some(Vector3::new(self.max.x, self.min.y, self.min.z)),
            4 => Some(Vector3::new(self.max.x, self.min.y, self.max.z)),
            5 => Some(Vector3::new(self.min.x, self.min.y, self.max.z)),
            6 => Some(Vector3::new(self.min.x, self.max.y, self.max.z)),
            7 => Some(self.max),
            _ => None,
        }
    }

    /// All 8 corners in the winding order documented on [`Aabb::corner`].
    pub fn corners(&self) -> [Vector3; 8] {
        [
            self.min,
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            self.max,
        ]
    }

    /// Closed-interval containment on all three axes.
    pub fn contains(&self, point: Vector3) -> bool {
        in_range(point.x, self.min.x, self.max.x)
            && in_range(point.y, self.min.y, self.max.y)
            && in_range(point.z, self.min.z, self.max.z)
    }

    /// Squared distance from `point` to the nearest point on the
    /// box, 0 when contained.
    pub fn distance_squared(&self, point: Vector3) -> Float {
        if self.contains(point) {
            return 0.0;
        }

        let mut gap = Vector3::ZERO;

        if point.x < self.min.x {
            gap.x = self.min.x - point.x;
        } else if point.x > self.max.x {
            gap.x = point.x - self.max.x;
        }

        if point.y < self.min.y {
            gap.y = self.min.y - point.y;
        } else if point.y > self.max.y {
            gap.y = point.y - self.max.y;
        }

        if point.z < self.min.z {
            gap.z = self.min.z - point.z;
        } else if point.z > self.max.z {
            gap.z = point.z - self.max.z;
        }

        gap.length_squared()
    }

    pub fn distance(&self, point: Vector3) -> Float {
        self.distance_squared(point).sqrt()
    }
}
