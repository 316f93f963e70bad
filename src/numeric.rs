/*

    Declare numeric types used throughout this crate.

    WARNING: If you like to use f64 instead of f32
    during computations, you need to change both the
    scalar alias and the vector/matrix aliases below
    (DVec3, DMat4, ...) together.

*/

use bevy_math::{Mat4, UVec2, Vec3, Vec4};

pub type Float = f32;
pub type Vector3 = Vec3;
pub type Vector4 = Vec4;
pub type Matrix4 = Mat4;
pub type Vector2u = UVec2;

pub fn in_range(x: Float, min: Float, max: Float) -> bool {
    min <= x && x <= max
}

pub fn transform_point(mat: &Matrix4, v: &Vector3) -> Vector3 {
    let v4 = Vector4::new(v.x, v.y, v.z, 1.0);
    let r = *mat * v4;
    Vector3::new(r.x, r.y, r.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn transform_point_applies_translation() {
        let m = Matrix4::from_translation(Vector3::new(1.0, -2.0, 3.0));
        let p = transform_point(&m, &Vector3::new(4.0, 4.0, 4.0));
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 7.0);
    }

    #[test]
    fn in_range_is_inclusive() {
        assert!(in_range(0.0, 0.0, 1.0));
        assert!(in_range(1.0, 0.0, 1.0));
        assert!(!in_range(1.5, 0.0, 1.0));
        assert!(!in_range(-0.5, 0.0, 1.0));
    }
}
