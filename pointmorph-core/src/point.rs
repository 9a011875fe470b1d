//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Number of `f32` components stored per vertex in a flat position array
pub const COMPONENTS_PER_VERTEX: usize = 3;

/// Linear interpolation between two scalars.
///
/// Evaluated as `(1 - t) * a + t * b` so that `t == 0` returns `a` and
/// `t == 1` returns `b` exactly.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

/// Component-wise [`lerp`] between two points
#[inline]
pub fn lerp_point(a: &Point3f, b: &Point3f, t: f32) -> Point3f {
    Point3f::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t), lerp(a.z, b.z, t))
}

/// Component-wise [`lerp`] between two vectors
#[inline]
pub fn lerp_vector(a: &Vector3f, b: &Vector3f, t: f32) -> Vector3f {
    Vector3f::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t), lerp(a.z, b.z, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let (a, b) = (0.1_f32, 0.7_f32);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
    }

    #[test]
    fn test_lerp_point_midpoint() {
        let p = lerp_point(&Point3f::new(0.0, 2.0, -4.0), &Point3f::new(2.0, 4.0, 4.0), 0.5);
        assert_eq!(p, Point3f::new(1.0, 3.0, 0.0));
    }
}
