//! Vertex-count normalization
//!
//! Makes two clouds morphable by reducing the source to the target's vertex
//! count. Clouds can only shrink; a target larger than the source is left
//! for the caller to deal with.

use crate::Decimator;
use pointmorph_core::{Error, PointCloud3f, Result};

/// Signed difference `count(target) - count(source)`.
///
/// Negative means the source has to lose `-delta` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimplificationDelta(pub isize);

impl SimplificationDelta {
    pub fn between(source_len: usize, target_len: usize) -> Self {
        Self(target_len as isize - source_len as isize)
    }

    pub fn value(self) -> isize {
        self.0
    }

    /// Number of points the source has to lose, if any
    pub fn removal_count(self) -> Option<usize> {
        (self.0 < 0).then(|| self.0.unsigned_abs())
    }
}

/// Outcome of [`normalize`]
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub cloud: PointCloud3f,
    /// Delta between the original source and the target
    pub delta: SimplificationDelta,
    /// `count(target) - count(cloud)` after decimation
    pub residual: isize,
}

impl Normalized {
    /// Whether the result has exactly the target's vertex count
    pub fn is_exact(&self) -> bool {
        self.residual == 0
    }
}

/// Reduce `source` towards the vertex count of `target`.
///
/// The decimator is asked to remove `-delta` points when the source is the
/// larger cloud. Decimation is best-effort, so check [`Normalized::residual`]
/// (or call [`ensure_matching_counts`]) before morphing.
///
/// # Example
/// ```rust
/// use pointmorph_core::{Point3f, PointCloud3f};
/// use pointmorph_simplification::{normalize, StrideDecimator};
///
/// fn main() -> pointmorph_core::Result<()> {
///     let source: PointCloud3f = (0..10).map(|i| Point3f::new(i as f32, 0.0, 0.0)).collect();
///     let target: PointCloud3f = (0..8).map(|i| Point3f::new(0.0, i as f32, 0.0)).collect();
///
///     let normalized = normalize(&source, &target, &StrideDecimator::new())?;
///     assert_eq!(normalized.delta.value(), -2);
///     assert!(normalized.is_exact());
///     Ok(())
/// }
/// ```
pub fn normalize<D>(source: &PointCloud3f, target: &PointCloud3f, decimator: &D) -> Result<Normalized>
where
    D: Decimator + ?Sized,
{
    let delta = SimplificationDelta::between(source.len(), target.len());

    let cloud = match delta.removal_count() {
        Some(remove) => decimator.decimate(source, remove)?,
        None => {
            if delta.value() > 0 {
                log::warn!(
                    "target has {} more points than source; clouds are never grown",
                    delta.value()
                );
            }
            source.clone()
        }
    };

    let residual = target.len() as isize - cloud.len() as isize;
    if residual != 0 {
        log::warn!("normalization left a residual of {} points", residual);
    }
    log::debug!(
        "normalized {} -> {} points (target {}, delta {})",
        source.len(),
        cloud.len(),
        target.len(),
        delta.value()
    );

    Ok(Normalized {
        cloud,
        delta,
        residual,
    })
}

/// Fail with [`Error::LengthMismatch`] unless both clouds have the same size
pub fn ensure_matching_counts(source: &PointCloud3f, target: &PointCloud3f) -> Result<()> {
    if source.len() != target.len() {
        return Err(Error::length_mismatch(target.len(), source.len()));
    }
    Ok(())
}
