//! Deterministic per-vertex phase offsets
//!
//! Each vertex gets a small offset derived only from its resting position,
//! so the stagger pattern is reproducible without storing any state.

use pointmorph_core::{Error, Point3f, PointCloud3f, Result};

pub const LCG_MULTIPLIER: u32 = 1_103_515_245;
pub const LCG_INCREMENT: u32 = 12_345;
pub const LCG_MODULUS: u32 = 65_536;

/// Offsets lie in `[-MAX_VERTEX_OFFSET, MAX_VERTEX_OFFSET)`
pub const MAX_VERTEX_OFFSET: f32 = 0.05;

/// One step of a linear congruential generator, scaled to `[0, 1)`.
///
/// `((a * seed + c) mod m) / m` in wrapping `u32` arithmetic, which gives the
/// same residue as exact arithmetic because `m` divides `2³²`.
#[inline]
pub fn lcg_random(seed: u32) -> f32 {
    let value = LCG_MULTIPLIER
        .wrapping_mul(seed)
        .wrapping_add(LCG_INCREMENT)
        % LCG_MODULUS;
    value as f32 / LCG_MODULUS as f32
}

/// Seed of a vertex, a pure function of the value `x + y`.
///
/// The generator only sees the seed modulo 2¹⁶, which for raw `f32` bits
/// would be the low mantissa bits alone and zero for every short binary
/// fraction. Folding the upper half word (sign, exponent, high mantissa)
/// into the lower one lets sums like `0.75` and `1.5` seed differently.
/// `-0.0` seeds like `0.0`.
#[inline]
pub fn vertex_seed(point: &Point3f) -> u32 {
    let sum = point.x + point.y;
    let bits = if sum == 0.0 { 0 } else { sum.to_bits() };
    bits ^ (bits >> 16)
}

/// Rescale [`lcg_random`] to `[-0.05, 0.05)`
#[inline]
pub fn vertex_offset(seed: u32) -> f32 {
    lcg_random(seed) * (2.0 * MAX_VERTEX_OFFSET) - MAX_VERTEX_OFFSET
}

/// One phase offset per vertex
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexOffsetTable {
    offsets: Vec<f32>,
}

impl VertexOffsetTable {
    /// Derive offsets from the resting coordinates of `cloud`
    pub fn from_cloud(cloud: &PointCloud3f) -> Self {
        Self {
            offsets: cloud.iter().map(|p| vertex_offset(vertex_seed(p))).collect(),
        }
    }

    /// Use explicit offsets. Every value must be finite and within range.
    pub fn from_values(offsets: Vec<f32>) -> Result<Self> {
        if let Some(bad) = offsets
            .iter()
            .find(|o| !(-MAX_VERTEX_OFFSET..MAX_VERTEX_OFFSET).contains(*o))
        {
            return Err(Error::InvalidData(format!(
                "vertex offset {} outside [-{}, {})",
                bad, MAX_VERTEX_OFFSET, MAX_VERTEX_OFFSET
            )));
        }
        Ok(Self { offsets })
    }

    /// No stagger: every vertex moves in lockstep
    pub fn zeros(vertex_count: usize) -> Self {
        Self {
            offsets: vec![0.0; vertex_count],
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.offsets
    }
}
