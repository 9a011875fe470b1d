//! Point cloud data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A generic point cloud container.
///
/// Point order is significant: index `i` of one cloud is assumed to
/// correspond to index `i` of every cloud it is morphed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// A point cloud with 3D points
pub type PointCloud3f = PointCloud<Point3f>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
        }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<T> {
        self.points.iter()
    }

    /// Get a mutable iterator over the points
    pub fn iter_mut(&mut self) -> std::slice::IterMut<T> {
        self.points.iter_mut()
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IndexMut<usize> for PointCloud<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.points[index]
    }
}

impl<T> IntoIterator for PointCloud<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> Extend<T> for PointCloud<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}

impl PointCloud<Point3f> {
    /// Build a cloud from a flat `[x0, y0, z0, x1, ...]` position array
    pub fn from_flat(positions: &[f32]) -> Result<Self> {
        let points: &[Point3f] = bytemuck::try_cast_slice(positions).map_err(|_| {
            Error::InvalidData(format!(
                "flat position array length {} is not a multiple of {}",
                positions.len(),
                COMPONENTS_PER_VERTEX
            ))
        })?;
        Ok(Self::from_points(points.to_vec()))
    }

    /// View the points as a flat `[x0, y0, z0, x1, ...]` array
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.points)
    }

    /// Concatenate several clouds in order into one.
    ///
    /// Vertex order within each source is preserved and sources follow each
    /// other, which is the only correspondence later morphs can rely on.
    pub fn merge<'a, I>(clouds: I) -> Self
    where
        I: IntoIterator<Item = &'a PointCloud3f>,
    {
        let mut merged = Self::new();
        for cloud in clouds {
            merged.points.extend_from_slice(&cloud.points);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_roundtrip_keeps_order() {
        let flat = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let cloud = PointCloud3f::from_flat(&flat).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[1], Point3f::new(4.0, 5.0, 6.0));
        assert_eq!(cloud.as_flat(), &flat);
    }

    #[test]
    fn test_from_flat_rejects_partial_vertex() {
        assert!(PointCloud3f::from_flat(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_merge_concatenates_in_order() {
        let a = PointCloud::from_points(vec![Point3f::new(0.0, 0.0, 0.0)]);
        let b = PointCloud::from_points(vec![
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
        ]);
        let merged = PointCloud3f::merge([&a, &b]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].x, 0.0);
        assert_eq!(merged[2].x, 2.0);
    }
}
