//! Linear array morphing
//!
//! Interpolates every component of a flat position array from a start array
//! to an end array. Progress fully determines the output, so dropped or
//! repeated progress updates are harmless.

use crate::{check_progress, RedrawSink};
use pointmorph_core::{lerp, Error, PointCloud3f, PointsObject, PositionBuffer, Result, COMPONENTS_PER_VERTEX};

/// Write `lerp(start[i], end[i], t)` into every `out[i]`.
///
/// All three slices must have the same length.
pub fn lerp_into(out: &mut [f32], start: &[f32], end: &[f32], t: f32) -> Result<()> {
    if start.len() != end.len() {
        return Err(Error::length_mismatch(start.len(), end.len()));
    }
    if out.len() != start.len() {
        return Err(Error::length_mismatch(start.len(), out.len()));
    }
    for ((o, &a), &b) in out.iter_mut().zip(start).zip(end) {
        *o = lerp(a, b, t);
    }
    Ok(())
}

/// A start/end pair of flat position arrays of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayMorph {
    start: Vec<f32>,
    end: Vec<f32>,
}

impl ArrayMorph {
    /// Pair two flat arrays. Fails if the lengths differ or do not describe
    /// whole vertices.
    pub fn new(start: Vec<f32>, end: Vec<f32>) -> Result<Self> {
        if start.len() != end.len() {
            return Err(Error::length_mismatch(start.len(), end.len()));
        }
        if start.len() % COMPONENTS_PER_VERTEX != 0 {
            return Err(Error::InvalidData(format!(
                "position array length {} is not a multiple of {}",
                start.len(),
                COMPONENTS_PER_VERTEX
            )));
        }
        Ok(Self { start, end })
    }

    pub fn from_clouds(start: &PointCloud3f, end: &PointCloud3f) -> Result<Self> {
        Self::new(start.as_flat().to_vec(), end.as_flat().to_vec())
    }

    /// Number of `f32` components
    pub fn len(&self) -> usize {
        self.start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    pub fn start(&self) -> &[f32] {
        &self.start
    }

    pub fn end(&self) -> &[f32] {
        &self.end
    }

    /// Set `buffer` to the interpolation at `progress` and mark it dirty.
    ///
    /// Progress is clamped to `[0, 1]`. The buffer is left untouched on error.
    pub fn apply(&self, buffer: &mut PositionBuffer, progress: f32) -> Result<()> {
        let t = check_progress(progress)?;
        lerp_into(buffer.as_mut_slice(), &self.start, &self.end, t)?;
        buffer.mark_dirty();
        Ok(())
    }
}

/// Morph `object`'s geometry between `start` and `end` at `progress`, then
/// request one redraw.
///
/// # Example
/// ```rust
/// use pointmorph_core::{PointStyle, PointsObject, PositionBuffer};
/// use pointmorph_morph::{morph, NoRedraw};
///
/// fn main() -> pointmorph_core::Result<()> {
///     let mut object = PointsObject::new(PositionBuffer::from_flat(vec![0.0; 3])?, PointStyle::default());
///     morph(&mut object, &[0.0, 0.0, 0.0], &[2.0, 4.0, 6.0], 0.5, &mut NoRedraw)?;
///     assert_eq!(object.geometry.as_slice(), &[1.0, 2.0, 3.0]);
///     Ok(())
/// }
/// ```
pub fn morph<S>(object: &mut PointsObject, start: &[f32], end: &[f32], progress: f32, sink: &mut S) -> Result<()>
where
    S: RedrawSink + ?Sized,
{
    let t = check_progress(progress)?;
    lerp_into(object.geometry.as_mut_slice(), start, end, t)?;
    object.geometry.mark_dirty();
    sink.request_redraw();
    Ok(())
}
