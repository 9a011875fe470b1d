//! Morph timelines
//!
//! A timeline is an ordered list of equally long stages on a `[0, 1]`
//! progress axis. Every stage animates one property of a [`PointsObject`]:
//! its position, its rotation or its geometry. Start values are resolved
//! once at build time by replaying the stages in order, which makes
//! [`Timeline::seek`] a pure function of progress.

use crate::array_morph::ArrayMorph;
use crate::easing::Ease;
use crate::{check_progress, RedrawSink};
use pointmorph_core::{lerp_vector, Error, PointsObject, Result, Vector3f};
use serde::{Deserialize, Serialize};

/// Per-axis target values. Axes left as `None` keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisTargets {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl AxisTargets {
    pub fn xyz(x: f32, y: f32, z: f32) -> Self {
        Self { x: Some(x), y: Some(y), z: Some(z) }
    }

    pub fn x(x: f32) -> Self {
        Self { x: Some(x), ..Self::default() }
    }

    pub fn y(y: f32) -> Self {
        Self { y: Some(y), ..Self::default() }
    }

    pub fn z(z: f32) -> Self {
        Self { z: Some(z), ..Self::default() }
    }

    /// Targets applied on top of `from`
    pub fn resolve(&self, from: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.x.unwrap_or(from.x),
            self.y.unwrap_or(from.y),
            self.z.unwrap_or(from.z),
        )
    }
}

/// What a stage animates
#[derive(Debug, Clone, PartialEq)]
pub enum StageKind {
    /// Move the object to the given position
    Translate(AxisTargets),
    /// Rotate the object to the given XYZ Euler angles, in radians
    Rotate(AxisTargets),
    /// Morph the geometry into the given flat position array
    Morph(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub kind: StageKind,
    pub ease: Ease,
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Translate { from: Vector3f, to: Vector3f },
    Rotate { from: Vector3f, to: Vector3f },
    Morph(ArrayMorph),
}

#[derive(Debug, Clone, PartialEq)]
struct ResolvedStage {
    action: Action,
    ease: Ease,
}

/// Collects stages for a [`Timeline`]
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    stages: Vec<Stage>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, kind: StageKind, ease: Ease) -> Self {
        self.stages.push(Stage { kind, ease });
        self
    }

    pub fn translate_to(self, targets: AxisTargets) -> Self {
        self.stage(StageKind::Translate(targets), Ease::Linear)
    }

    pub fn rotate_to(self, targets: AxisTargets) -> Self {
        self.stage(StageKind::Rotate(targets), Ease::Linear)
    }

    pub fn morph_to(self, end: Vec<f32>) -> Self {
        self.stage(StageKind::Morph(end), Ease::Linear)
    }

    /// Set the ease of the most recently added stage
    pub fn eased(mut self, ease: Ease) -> Self {
        if let Some(last) = self.stages.last_mut() {
            last.ease = ease;
        }
        self
    }

    /// Resolve every stage against the current state of `object`.
    ///
    /// Fails with [`Error::LengthMismatch`] if a morph target does not match
    /// the object's buffer.
    pub fn build(self, object: &PointsObject) -> Result<Timeline> {
        let initial_position = object.position;
        let initial_rotation = object.rotation;
        let initial_positions = object.geometry.as_slice().to_vec();

        let mut position = initial_position;
        let mut rotation = initial_rotation;
        let mut positions = initial_positions.clone();
        let mut stages = Vec::with_capacity(self.stages.len());

        for stage in self.stages {
            let action = match stage.kind {
                StageKind::Translate(targets) => {
                    let to = targets.resolve(&position);
                    let from = std::mem::replace(&mut position, to);
                    Action::Translate { from, to }
                }
                StageKind::Rotate(targets) => {
                    let to = targets.resolve(&rotation);
                    let from = std::mem::replace(&mut rotation, to);
                    Action::Rotate { from, to }
                }
                StageKind::Morph(end) => {
                    if end.len() != positions.len() {
                        return Err(Error::length_mismatch(positions.len(), end.len()));
                    }
                    let start = std::mem::replace(&mut positions, end.clone());
                    Action::Morph(ArrayMorph::new(start, end)?)
                }
            };
            stages.push(ResolvedStage {
                action,
                ease: stage.ease,
            });
        }

        log::debug!(
            "built morph timeline: {} stages over {} vertices",
            stages.len(),
            object.vertex_count()
        );

        Ok(Timeline {
            stages,
            initial_position,
            initial_rotation,
            initial_positions,
        })
    }
}

/// A resolved sequence of morph stages
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    stages: Vec<ResolvedStage>,
    initial_position: Vector3f,
    initial_rotation: Vector3f,
    initial_positions: Vec<f32>,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    /// The six-stage sequence of the scroll demo: move to the origin, level
    /// the x rotation, morph into `first`, spin a full turn about y, morph
    /// into `second`, then turn to face backwards. Every stage eases with
    /// [`Ease::QuadOut`].
    pub fn demo_sequence(object: &PointsObject, first: Vec<f32>, second: Vec<f32>) -> Result<Self> {
        Self::demo_sequence_with_ease(object, first, second, Ease::QuadOut)
    }

    /// [`Timeline::demo_sequence`] with `ease` on every stage
    pub fn demo_sequence_with_ease(
        object: &PointsObject,
        first: Vec<f32>,
        second: Vec<f32>,
        ease: Ease,
    ) -> Result<Self> {
        Self::builder()
            .translate_to(AxisTargets::xyz(0.0, 0.0, 0.0))
            .eased(ease)
            .rotate_to(AxisTargets::x(0.0))
            .eased(ease)
            .morph_to(first)
            .eased(ease)
            .rotate_to(AxisTargets::y(-360f32.to_radians()))
            .eased(ease)
            .morph_to(second)
            .eased(ease)
            .rotate_to(AxisTargets::y(180f32.to_radians()))
            .eased(ease)
            .build(object)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Active stage and its local progress at global `progress`.
    ///
    /// Returns `None` for an empty timeline.
    pub fn locate(&self, progress: f32) -> Option<(usize, f32)> {
        let count = self.stages.len();
        if count == 0 {
            return None;
        }
        let scaled = progress.clamp(0.0, 1.0) * count as f32;
        let active = (scaled.floor() as usize).min(count - 1);
        let local = (scaled - active as f32).clamp(0.0, 1.0);
        Some((active, local))
    }

    /// Put `object` in the state the timeline describes at `progress` and
    /// request one redraw.
    ///
    /// Stages before the active one are applied in full, the active one at
    /// its (eased) local progress and later ones not at all.
    pub fn seek<S>(&self, object: &mut PointsObject, progress: f32, sink: &mut S) -> Result<()>
    where
        S: RedrawSink + ?Sized,
    {
        let progress = check_progress(progress)?;
        if object.geometry.len() != self.initial_positions.len() {
            return Err(Error::length_mismatch(
                self.initial_positions.len(),
                object.geometry.len(),
            ));
        }

        object.position = self.initial_position;
        object.rotation = self.initial_rotation;
        let mut last_morph: Option<(&ArrayMorph, f32)> = None;

        if let Some((active, local)) = self.locate(progress) {
            for (index, stage) in self.stages[..=active].iter().enumerate() {
                let t = if index < active { 1.0 } else { stage.ease.apply(local) };
                match &stage.action {
                    Action::Translate { from, to } => object.position = lerp_vector(from, to, t),
                    Action::Rotate { from, to } => object.rotation = lerp_vector(from, to, t),
                    Action::Morph(morph) => last_morph = Some((morph, t)),
                }
            }
        }

        match last_morph {
            Some((morph, t)) => morph.apply(&mut object.geometry, t)?,
            None if object.geometry.as_slice() != self.initial_positions.as_slice() => {
                object.geometry.copy_from(&self.initial_positions)?
            }
            None => {}
        }

        sink.request_redraw();
        Ok(())
    }
}
