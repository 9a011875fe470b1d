//! Point cloud decimation and vertex-count normalization
//!
//! This crate provides what is needed to make two point clouds morphable:
//! - Greedy nearest-pair collapse decimation
//! - Uniform stride decimation
//! - A normalizer that reduces a source cloud to a target's vertex count

pub mod pair_collapse;
pub mod stride;
pub mod normalize;

pub use pair_collapse::*;
pub use stride::*;
pub use normalize::*;

use pointmorph_core::{PointCloud3f, Result};

/// Reduce the number of points in a cloud
pub trait Decimator {
    /// Return a copy of `cloud` with approximately `remove` fewer points.
    ///
    /// Implementations keep surviving points in their original relative
    /// order. The exact resulting count is not guaranteed.
    fn decimate(&self, cloud: &PointCloud3f, remove: usize) -> Result<PointCloud3f>;
}

impl<D: Decimator + ?Sized> Decimator for &D {
    fn decimate(&self, cloud: &PointCloud3f, remove: usize) -> Result<PointCloud3f> {
        (**self).decimate(cloud, remove)
    }
}

impl<D: Decimator + ?Sized> Decimator for Box<D> {
    fn decimate(&self, cloud: &PointCloud3f, remove: usize) -> Result<PointCloud3f> {
        (**self).decimate(cloud, remove)
    }
}

pub(crate) fn check_removal(cloud: &PointCloud3f, remove: usize) -> Result<()> {
    if remove > cloud.len() {
        return Err(pointmorph_core::Error::InvalidData(format!(
            "cannot remove {} points from a cloud of {}",
            remove,
            cloud.len()
        )));
    }
    Ok(())
}
