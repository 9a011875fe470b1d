//! 3D transformation utilities

use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D transformation that can be applied to points, clouds and buffers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

/// Rotation for XYZ Euler angles in radians.
///
/// Matches the intrinsic `X`, then `Y`, then `Z` convention, i.e. the matrix
/// `Rx * Ry * Rz`.
pub fn euler_xyz(angles: &Vector3<f32>) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angles.x)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angles.y)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angles.z)
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a rotation transformation from a quaternion
    pub fn rotation(rotation: UnitQuaternion<f32>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Rotation from XYZ Euler angles in radians
    pub fn euler(angles: Vector3<f32>) -> Self {
        Self::rotation(euler_xyz(&angles))
    }

    /// Create a scaling transformation
    pub fn scaling(scale: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Object placement: rotate by XYZ Euler angles, then translate
    pub fn from_translation_euler(translation: Vector3<f32>, angles: Vector3<f32>) -> Self {
        let isometry = Isometry3::from_parts(translation.into(), euler_xyz(&angles));
        Self {
            matrix: isometry.to_homogeneous(),
        }
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Compose this transformation with another
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Unit;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_euler_x_rotation() {
        let t = Transform3D::euler(Vector3::new(FRAC_PI_2, 0.0, 0.0));
        let p = t.transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_euler_order_is_xyz() {
        let angles = Vector3::new(0.3, -0.7, 1.1);
        let about = |axis: Unit<Vector3<f32>>, angle: f32| {
            Transform3D::rotation(UnitQuaternion::from_axis_angle(&axis, angle))
        };
        let expected = about(Vector3::x_axis(), angles.x)
            .compose(about(Vector3::y_axis(), angles.y))
            .compose(about(Vector3::z_axis(), angles.z));
        let actual = Transform3D::euler(angles);
        assert_relative_eq!(actual.matrix, expected.matrix, epsilon = 1e-6);
    }

    #[test]
    fn test_translation_applied_after_rotation() {
        let t = Transform3D::from_translation_euler(
            Vector3::new(0.0, 0.0, 3.0),
            Vector3::new(0.0, 0.0, FRAC_PI_2),
        );
        let p = t.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_identity() {
        let p = Point3::new(1.5, -2.0, 0.25);
        assert_eq!(Transform3D::default().transform_point(&p), p);
        assert_eq!(Transform3D::default().matrix, Matrix4::identity());
    }
}
