//! Phase-offset keyframe blending
//!
//! A stack of keyframe geometries is blended by a global position `percent`:
//! its integer part picks the bracketing pair of keyframes and its
//! fractional part the weight between them. Each vertex is shifted in time
//! by its own offset, scaled by [`round_step`] so the stagger vanishes at
//! both keyframes, then eased with [`smooth`] and clamped to `[0, 1]`.

use crate::easing::{round_step, smooth};
use crate::offsets::VertexOffsetTable;
use pointmorph_core::{lerp_point, Error, PointCloud3f, PositionBuffer, Result};
use rayon::prelude::*;

/// Why an update left the buffer untouched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    /// No geometry registered at a bracketing index
    MissingKeyframe { index: usize },
    /// `percent` was negative or not finite
    UnnormalizedRange { percent: f32 },
}

/// Result of [`PhaseMorpher::update_geometry`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MorphOutcome {
    Applied {
        lower: usize,
        upper: usize,
        /// Fractional part of `percent`, before stagger and easing
        fraction: f32,
    },
    Skipped(SkipReason),
}

impl MorphOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MorphOutcome::Applied { .. })
    }
}

/// Blend weight of one vertex at `fraction` with phase `offset`
#[inline]
pub fn staggered_weight(fraction: f32, offset: f32) -> f32 {
    let staggered = fraction + round_step(fraction) * offset;
    smooth(staggered).clamp(0.0, 1.0)
}

/// Sparse stack of keyframe geometries blended with per-vertex phase offsets
#[derive(Debug, Clone, Default)]
pub struct PhaseMorpher {
    geometries: Vec<Option<PointCloud3f>>,
    offsets: Option<VertexOffsetTable>,
    /// Set once offsets are supplied through `set_vertex_offsets`
    explicit_offsets: bool,
}

impl PhaseMorpher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `geometry` at `index`, or append it when `index` is
    /// `None`. An occupied slot is overwritten. Returns the slot used.
    ///
    /// Unless offsets were set explicitly, the offset table follows the
    /// resting geometry in slot 0. Until slot 0 is filled, the first
    /// registered geometry stands in for it.
    pub fn add_geometry(&mut self, geometry: &PointCloud3f, index: Option<usize>) -> usize {
        let slot = index.unwrap_or(self.geometries.len());
        if slot >= self.geometries.len() {
            self.geometries.resize(slot + 1, None);
        }
        self.geometries[slot] = Some(geometry.clone());

        if !self.explicit_offsets && (slot == 0 || self.offsets.is_none()) {
            self.offsets = Some(VertexOffsetTable::from_cloud(geometry));
        }
        slot
    }

    /// Replace the vertex offset table. Later registrations no longer
    /// reseed it.
    pub fn set_vertex_offsets(&mut self, offsets: VertexOffsetTable) {
        self.offsets = Some(offsets);
        self.explicit_offsets = true;
    }

    pub fn vertex_offsets(&self) -> Option<&VertexOffsetTable> {
        self.offsets.as_ref()
    }

    pub fn geometry(&self, index: usize) -> Option<&PointCloud3f> {
        self.geometries.get(index).and_then(Option::as_ref)
    }

    /// Number of slots, including empty ones
    pub fn slot_count(&self) -> usize {
        self.geometries.len()
    }

    /// Number of registered geometries
    pub fn keyframe_count(&self) -> usize {
        self.geometries.iter().filter(|g| g.is_some()).count()
    }

    fn keyframe(&self, index: usize) -> std::result::Result<&PointCloud3f, SkipReason> {
        self.geometry(index)
            .ok_or(SkipReason::MissingKeyframe { index })
    }

    /// Write the blend at `percent` into `buffer`.
    ///
    /// Out-of-range, negative and non-finite positions are skipped, not
    /// errors, so scrubbing past the registered keyframes is harmless.
    /// Mismatched vertex counts between the keyframes, the offset table and
    /// the buffer fail with [`Error::LengthMismatch`] and leave the buffer
    /// untouched.
    pub fn update_geometry(&self, percent: f32, buffer: &mut PositionBuffer) -> Result<MorphOutcome> {
        if !percent.is_finite() || percent < 0.0 {
            log::trace!("phase morph skipped: percent {} out of range", percent);
            return Ok(MorphOutcome::Skipped(SkipReason::UnnormalizedRange { percent }));
        }

        let floor = percent.floor();
        let lower = floor as usize;
        let upper = percent.ceil() as usize;
        let (from, to) = match (self.keyframe(lower), self.keyframe(upper)) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(reason), _) | (_, Err(reason)) => {
                log::trace!("phase morph skipped at {}: {:?}", percent, reason);
                return Ok(MorphOutcome::Skipped(reason));
            }
        };

        let vertex_count = buffer.vertex_count();
        if from.len() != vertex_count {
            return Err(Error::length_mismatch(vertex_count, from.len()));
        }
        if to.len() != vertex_count {
            return Err(Error::length_mismatch(vertex_count, to.len()));
        }
        let offsets = self
            .offsets
            .as_ref()
            .ok_or_else(|| Error::Algorithm("vertex offsets not initialised".to_string()))?;
        if offsets.len() != vertex_count {
            return Err(Error::length_mismatch(vertex_count, offsets.len()));
        }

        let fraction = percent - floor;
        buffer
            .points_mut()
            .par_iter_mut()
            .zip(from.points.par_iter())
            .zip(to.points.par_iter())
            .zip(offsets.as_slice().par_iter())
            .for_each(|(((out, a), b), &offset)| {
                *out = lerp_point(a, b, staggered_weight(fraction, offset));
            });
        buffer.mark_dirty();

        Ok(MorphOutcome::Applied {
            lower,
            upper,
            fraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pointmorph_core::Point3f;

    fn zeros() -> PointCloud3f {
        PointCloud3f::from_points(vec![Point3f::origin(); 3])
    }

    fn ramp() -> PointCloud3f {
        PointCloud3f::from_points(vec![
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(2.0, 2.0, 2.0),
            Point3f::new(3.0, 3.0, 3.0),
        ])
    }

    fn lockstep_morpher() -> PhaseMorpher {
        let mut morpher = PhaseMorpher::new();
        morpher.add_geometry(&zeros(), Some(0));
        morpher.add_geometry(&ramp(), Some(1));
        morpher.set_vertex_offsets(VertexOffsetTable::zeros(3));
        morpher
    }

    #[test]
    fn test_add_geometry_appends_and_overwrites() {
        let mut morpher = PhaseMorpher::new();
        assert_eq!(morpher.add_geometry(&zeros(), None), 0);
        assert_eq!(morpher.add_geometry(&ramp(), None), 1);
        assert_eq!(morpher.add_geometry(&ramp(), Some(0)), 0);
        assert_eq!(morpher.geometry(0), Some(&ramp()));
        assert_eq!(morpher.keyframe_count(), 2);

        assert_eq!(morpher.add_geometry(&zeros(), Some(4)), 4);
        assert_eq!(morpher.slot_count(), 5);
        assert_eq!(morpher.keyframe_count(), 3);
        assert!(morpher.geometry(3).is_none());
    }

    #[test]
    fn test_offsets_seeded_from_first_geometry() {
        let mut morpher = PhaseMorpher::new();
        morpher.add_geometry(&ramp(), None);
        morpher.add_geometry(&zeros(), None);
        assert_eq!(
            morpher.vertex_offsets(),
            Some(&VertexOffsetTable::from_cloud(&ramp()))
        );
    }

    #[test]
    fn test_offsets_follow_slot_zero() {
        let mut morpher = PhaseMorpher::new();
        morpher.add_geometry(&ramp(), Some(5));
        morpher.add_geometry(&zeros(), Some(0));
        assert_eq!(
            morpher.vertex_offsets(),
            Some(&VertexOffsetTable::from_cloud(&zeros()))
        );

        morpher.add_geometry(&ramp(), Some(0));
        assert_eq!(
            morpher.vertex_offsets(),
            Some(&VertexOffsetTable::from_cloud(&ramp()))
        );
    }

    #[test]
    fn test_explicit_offsets_survive_reregistration() {
        let mut morpher = lockstep_morpher();
        morpher.add_geometry(&ramp(), Some(0));
        assert_eq!(morpher.vertex_offsets(), Some(&VertexOffsetTable::zeros(3)));
    }

    #[test]
    fn test_lockstep_midpoint() {
        let morpher = lockstep_morpher();
        let mut buffer = PositionBuffer::from_cloud(&zeros());

        let outcome = morpher.update_geometry(0.5, &mut buffer).unwrap();
        assert_eq!(
            outcome,
            MorphOutcome::Applied { lower: 0, upper: 1, fraction: 0.5 }
        );

        // smooth(0.5) == 0.5
        let expected = [0.5, 0.5, 0.5, 1.0, 1.0, 1.0, 1.5, 1.5, 1.5];
        assert_eq!(buffer.as_slice(), &expected);
        assert!(buffer.needs_update());
    }

    #[test]
    fn test_integer_percent_lands_on_keyframe() {
        let mut morpher = lockstep_morpher();
        morpher.set_vertex_offsets(VertexOffsetTable::from_values(vec![0.04, -0.05, 0.01]).unwrap());
        let mut buffer = PositionBuffer::from_cloud(&zeros());

        morpher.update_geometry(1.0, &mut buffer).unwrap();
        assert_eq!(buffer.to_cloud(), ramp());

        morpher.update_geometry(0.0, &mut buffer).unwrap();
        assert_eq!(buffer.to_cloud(), zeros());
    }

    #[test]
    fn test_missing_upper_keyframe_is_noop() {
        let morpher = lockstep_morpher();
        let mut buffer = PositionBuffer::from_cloud(&ramp());
        buffer.take_dirty();

        let outcome = morpher.update_geometry(1.5, &mut buffer).unwrap();
        assert_eq!(outcome, MorphOutcome::Skipped(SkipReason::MissingKeyframe { index: 2 }));
        assert_eq!(buffer.to_cloud(), ramp());
        assert!(!buffer.needs_update());
    }

    #[test]
    fn test_gap_in_stack_is_noop() {
        let mut morpher = lockstep_morpher();
        morpher.add_geometry(&zeros(), Some(3));
        let mut buffer = PositionBuffer::from_cloud(&zeros());
        let outcome = morpher.update_geometry(1.25, &mut buffer).unwrap();
        assert_eq!(outcome, MorphOutcome::Skipped(SkipReason::MissingKeyframe { index: 2 }));
    }

    #[test]
    fn test_negative_and_non_finite_percent_skipped() {
        let morpher = lockstep_morpher();
        let mut buffer = PositionBuffer::from_cloud(&zeros());
        for percent in [-0.25, f32::NAN, f32::INFINITY] {
            let outcome = morpher.update_geometry(percent, &mut buffer).unwrap();
            assert!(matches!(
                outcome,
                MorphOutcome::Skipped(SkipReason::UnnormalizedRange { .. })
            ));
        }
        assert_eq!(buffer.version(), 0);
    }

    #[test]
    fn test_vertex_count_mismatch_fails() {
        let morpher = lockstep_morpher();
        let mut buffer = PositionBuffer::from_flat(vec![0.0; 6]).unwrap();
        assert!(matches!(
            morpher.update_geometry(0.5, &mut buffer),
            Err(Error::LengthMismatch { .. })
        ));

        let mut morpher = lockstep_morpher();
        morpher.set_vertex_offsets(VertexOffsetTable::zeros(2));
        let mut buffer = PositionBuffer::from_cloud(&zeros());
        assert!(morpher.update_geometry(0.5, &mut buffer).is_err());
        assert_eq!(buffer.to_cloud(), zeros());
    }

    #[test]
    fn test_weight_is_clamped() {
        // smooth dips below zero just after 0 and a positive offset pushes
        // the staggered value past 1 near the end
        assert_eq!(staggered_weight(0.05, 0.0), 0.0);
        assert!(staggered_weight(0.999, 0.049) <= 1.0);
        for i in 0..=100 {
            let w = staggered_weight(i as f32 / 100.0, -0.05);
            assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn test_stagger_differs_per_vertex_mid_transition() {
        let mut morpher = lockstep_morpher();
        morpher.set_vertex_offsets(VertexOffsetTable::from_values(vec![0.04, 0.0, -0.04]).unwrap());
        let mut buffer = PositionBuffer::from_cloud(&zeros());
        morpher.update_geometry(0.5, &mut buffer).unwrap();

        let weights: Vec<f32> = buffer
            .points()
            .iter()
            .zip(ramp().iter())
            .map(|(p, target)| p.x / target.x)
            .collect();
        assert!(weights[0] > weights[1]);
        assert!(weights[1] > weights[2]);
        assert_relative_eq!(weights[1], 0.5, epsilon = 1e-6);
    }
}
