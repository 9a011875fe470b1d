//! Renderable point objects

use crate::buffer::PositionBuffer;
use crate::point::*;
use crate::point_cloud::PointCloud3f;
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};

/// Uniform render style of a point cloud
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    /// Point size in world units
    pub size: f32,
    pub color: [u8; 3],
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size: 0.012,
            color: [255, 255, 255],
        }
    }
}

impl PointStyle {
    pub fn with_params(size: f32, color: [u8; 3]) -> Self {
        Self { size, color }
    }
}

/// A point cloud placed in the scene.
///
/// `geometry` holds object-space positions. `position` and `rotation`
/// (XYZ Euler, radians) place the object without touching the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsObject {
    pub geometry: PositionBuffer,
    pub style: PointStyle,
    pub position: Vector3f,
    pub rotation: Vector3f,
}

impl PointsObject {
    pub fn new(geometry: PositionBuffer, style: PointStyle) -> Self {
        Self {
            geometry,
            style,
            position: Vector3f::zeros(),
            rotation: Vector3f::zeros(),
        }
    }

    pub fn from_cloud(cloud: &PointCloud3f, style: PointStyle) -> Self {
        Self::new(PositionBuffer::from_cloud(cloud), style)
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    /// Object-to-world transform
    pub fn world_transform(&self) -> Transform3D {
        Transform3D::from_translation_euler(self.position, self.rotation)
    }

    /// Positions after applying the object transform
    pub fn world_points(&self) -> PointCloud3f {
        let transform = self.world_transform();
        self.geometry
            .points()
            .iter()
            .map(|p| transform.transform_point(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = PointStyle::default();
        assert_eq!(style.size, 0.012);
        assert_eq!(style.color, [255, 255, 255]);
    }

    #[test]
    fn test_world_points_translate() {
        let cloud = PointCloud3f::from_points(vec![Point3f::new(1.0, 0.0, 0.0)]);
        let mut object = PointsObject::from_cloud(&cloud, PointStyle::default());
        object.position = Vector3f::new(0.0, 0.0, -150.0);
        let world = object.world_points();
        assert_eq!(world[0], Point3f::new(1.0, 0.0, -150.0));
        // geometry is left in object space
        assert_eq!(object.geometry.vertex(0), Some(Point3f::new(1.0, 0.0, 0.0)));
    }
}
