//! Uniform stride decimation

use crate::{check_removal, Decimator};
use pointmorph_core::{PointCloud3f, Result};

/// Drops points at evenly spaced indices.
///
/// Deterministic and exact: the result always has `len - remove` points.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrideDecimator;

impl StrideDecimator {
    pub fn new() -> Self {
        Self
    }
}

/// Indices removed when dropping `remove` of `len` points, in ascending order.
///
/// Index `k` sits at the middle of the `k`-th of `remove` equal slices.
fn dropped_indices(len: usize, remove: usize) -> impl Iterator<Item = usize> {
    (0..remove).map(move |k| (2 * k + 1) * len / (2 * remove))
}

impl Decimator for StrideDecimator {
    fn decimate(&self, cloud: &PointCloud3f, remove: usize) -> Result<PointCloud3f> {
        check_removal(cloud, remove)?;
        if remove == 0 {
            return Ok(cloud.clone());
        }

        let mut dropped = dropped_indices(cloud.len(), remove).peekable();
        let mut kept = PointCloud3f::with_capacity(cloud.len() - remove);
        for (i, point) in cloud.iter().enumerate() {
            if dropped.peek() == Some(&i) {
                dropped.next();
            } else {
                kept.push(*point);
            }
        }

        log::debug!("stride decimation: {} -> {} points", cloud.len(), kept.len());
        Ok(kept)
    }
}
