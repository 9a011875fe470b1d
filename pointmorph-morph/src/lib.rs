//! Point cloud morphing
//!
//! This crate drives the live position buffer of a point object:
//! - Linear array morphing between two flat position arrays
//! - Morph timelines of translate / rotate / morph stages scrubbed by progress
//! - Scroll-to-progress mapping and scrub smoothing
//! - Phase-offset blending across a stack of keyframe geometries

pub mod easing;
pub mod array_morph;
pub mod offsets;
pub mod phase;
pub mod timeline;
pub mod scroll;

pub use easing::*;
pub use array_morph::*;
pub use offsets::*;
pub use phase::*;
pub use timeline::*;
pub use scroll::*;

/// Receives a redraw request after a morph step has written its buffer
pub trait RedrawSink {
    fn request_redraw(&mut self);
}

impl<F: FnMut()> RedrawSink for F {
    fn request_redraw(&mut self) {
        self()
    }
}

/// Sink that ignores redraw requests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedraw;

impl RedrawSink for NoRedraw {
    fn request_redraw(&mut self) {}
}

/// Sink that counts redraw requests
#[derive(Debug, Clone, Copy, Default)]
pub struct RedrawCounter {
    pub count: usize,
}

impl RedrawSink for RedrawCounter {
    fn request_redraw(&mut self) {
        self.count += 1;
    }
}

pub(crate) fn check_progress(progress: f32) -> pointmorph_core::Result<f32> {
    if !progress.is_finite() {
        return Err(pointmorph_core::Error::InvalidData(format!(
            "progress must be finite, got {}",
            progress
        )));
    }
    Ok(progress.clamp(0.0, 1.0))
}
