//! Flat position buffer shared with the renderer

use crate::error::{Error, Result};
use crate::point::*;
use crate::point_cloud::PointCloud3f;
use serde::{Deserialize, Serialize};

/// The live `[x0, y0, z0, x1, ...]` position array of a renderable object.
///
/// Writers mutate the array and then call [`PositionBuffer::mark_dirty`];
/// the renderer picks changes up with [`PositionBuffer::take_dirty`].
/// `version` increases by one on every `mark_dirty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionBuffer {
    array: Vec<f32>,
    needs_update: bool,
    version: u64,
}

impl PositionBuffer {
    /// Wrap a flat position array. The length must be a multiple of three.
    pub fn from_flat(array: Vec<f32>) -> Result<Self> {
        if array.len() % COMPONENTS_PER_VERTEX != 0 {
            return Err(Error::InvalidData(format!(
                "position array length {} is not a multiple of {}",
                array.len(),
                COMPONENTS_PER_VERTEX
            )));
        }
        Ok(Self {
            array,
            needs_update: false,
            version: 0,
        })
    }

    /// Copy the positions of a point cloud into a new buffer
    pub fn from_cloud(cloud: &PointCloud3f) -> Self {
        Self {
            array: cloud.as_flat().to_vec(),
            needs_update: false,
            version: 0,
        }
    }

    /// Number of `f32` components
    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.array.len() / COMPONENTS_PER_VERTEX
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.array
    }

    /// Mutable access to the raw components. Callers mark the buffer dirty
    /// once they are done writing.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.array
    }

    /// View the buffer as points
    pub fn points(&self) -> &[Point3f] {
        bytemuck::cast_slice(&self.array)
    }

    pub fn points_mut(&mut self) -> &mut [Point3f] {
        bytemuck::cast_slice_mut(&mut self.array)
    }

    /// Get a single vertex
    pub fn vertex(&self, index: usize) -> Option<Point3f> {
        self.points().get(index).copied()
    }

    /// Overwrite the whole array from `source` and mark the buffer dirty
    pub fn copy_from(&mut self, source: &[f32]) -> Result<()> {
        if source.len() != self.array.len() {
            return Err(Error::length_mismatch(self.array.len(), source.len()));
        }
        self.array.copy_from_slice(source);
        self.mark_dirty();
        Ok(())
    }

    /// Flag the array for re-upload
    pub fn mark_dirty(&mut self) {
        self.needs_update = true;
        self.version += 1;
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Clear the dirty flag, returning whether it was set
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.needs_update, false)
    }

    /// Snapshot the current positions as a point cloud
    pub fn to_cloud(&self) -> PointCloud3f {
        PointCloud3f::from_points(self.points().to_vec())
    }
}

impl From<&PointCloud3f> for PositionBuffer {
    fn from(cloud: &PointCloud3f) -> Self {
        Self::from_cloud(cloud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_requires_whole_vertices() {
        assert!(PositionBuffer::from_flat(vec![0.0; 4]).is_err());
        let buffer = PositionBuffer::from_flat(vec![0.0; 6]).unwrap();
        assert_eq!(buffer.vertex_count(), 2);
        assert!(!buffer.needs_update());
    }

    #[test]
    fn test_dirty_flag_lifecycle() {
        let mut buffer = PositionBuffer::from_flat(vec![0.0; 3]).unwrap();
        buffer.copy_from(&[1.0, 2.0, 3.0]).unwrap();
        assert!(buffer.needs_update());
        assert_eq!(buffer.version(), 1);
        assert!(buffer.take_dirty());
        assert!(!buffer.take_dirty());
        assert_eq!(buffer.vertex(0), Some(Point3f::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_copy_from_length_mismatch() {
        let mut buffer = PositionBuffer::from_flat(vec![0.0; 3]).unwrap();
        match buffer.copy_from(&[1.0; 6]) {
            Err(Error::LengthMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 6);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!buffer.needs_update());
    }

    #[test]
    fn test_points_view_matches_cloud() {
        let cloud = PointCloud3f::from_points(vec![
            Point3f::new(1.0, 2.0, 3.0),
            Point3f::new(4.0, 5.0, 6.0),
        ]);
        let buffer = PositionBuffer::from_cloud(&cloud);
        assert_eq!(buffer.points(), cloud.points.as_slice());
        assert_eq!(buffer.to_cloud(), cloud);
    }
}
