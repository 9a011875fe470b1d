//! Scroll-driven morph demo
//!
//! Loads the three models of a scene, normalizes their vertex counts and
//! plays either the six-stage timeline or the phase-offset blend while a
//! simulated scroll moves from top to bottom. Every frame can be exported
//! as a PLY point cloud.
//!
//! ```text
//! cargo run --bin scroll_morph -- demos/scene.toml --output frames/
//! ```

mod scene;

use anyhow::Result;
use clap::Parser;
use pointmorph_core::{PointsObject, PositionBuffer};
use pointmorph_io::write_ply_points;
use pointmorph_morph::{MorphOutcome, PhaseMorpher, RedrawCounter, RedrawSink, Scrub, ScrollRange, Timeline};
use scene::{MorphMode, SceneConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Scrub a point cloud morph with a simulated scroll")]
struct Args {
    /// Scene description in TOML
    config: PathBuf,

    /// Directory that receives one PLY file per frame
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Follow the scroll position without lag
    #[arg(long)]
    no_scrub: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Progress values of a scroll from the top of the range to its end,
/// followed by the frames the scrub needs to settle
fn scroll_progress(config: &SceneConfig, no_scrub: bool) -> Vec<f32> {
    let scroll = &config.scroll;
    let range = ScrollRange::pinned(scroll.viewport_height, scroll.length_percent);
    let mut scrub = Scrub::with_params(if no_scrub { 0.0 } else { scroll.lag_seconds });
    let dt = 1.0 / scroll.fps.max(1.0);

    let last = scroll.frames.saturating_sub(1).max(1) as f32;
    let mut values: Vec<f32> = (0..scroll.frames)
        .map(|frame| {
            let position = range.start + range.length * frame as f32 / last;
            scrub.advance(range.progress(position), dt)
        })
        .collect();

    let target = range.progress(range.start + range.length);
    while (target - scrub.current()).abs() > 1e-3 {
        values.push(scrub.advance(target, dt));
    }
    scrub.snap(target);
    values.push(scrub.current());
    values
}

/// Seek one frame of the timeline. A failed step is logged and leaves the
/// frame without a visual update.
fn timeline_frame<S: RedrawSink>(
    timeline: &Timeline,
    object: &mut PointsObject,
    progress: f32,
    frame: usize,
    sink: &mut S,
) -> bool {
    match timeline.seek(object, progress, sink) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("frame {}: timeline step failed: {}", frame, e);
            false
        }
    }
}

/// Blend one frame of the keyframe stack. Returns whether the buffer was
/// written; skips and failures leave it untouched.
fn phase_frame<S: RedrawSink>(
    morpher: &PhaseMorpher,
    buffer: &mut PositionBuffer,
    percent: f32,
    frame: usize,
    sink: &mut S,
) -> bool {
    match morpher.update_geometry(percent, buffer) {
        Ok(MorphOutcome::Applied { .. }) => {
            sink.request_redraw();
            true
        }
        Ok(MorphOutcome::Skipped(reason)) => {
            log::debug!("frame {} skipped: {:?}", frame, reason);
            false
        }
        Err(e) => {
            log::warn!("frame {}: phase step failed: {}", frame, e);
            false
        }
    }
}

fn frame_path(output: &Option<PathBuf>, frame: usize) -> Option<PathBuf> {
    output
        .as_ref()
        .map(|dir| dir.join(format!("frame_{:04}.ply", frame)))
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str())).init();

    let config = SceneConfig::load(&args.config)?;
    let clouds = config.load_clouds()?;
    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)?;
    }

    let progress = scroll_progress(&config, args.no_scrub);
    log::info!(
        "{} frames, {} points per frame, mode {:?}",
        progress.len(),
        clouds.first.len(),
        config.mode
    );

    let mut redraws = RedrawCounter::default();
    let mut skipped = 0usize;
    match config.mode {
        MorphMode::Timeline => {
            let mut object = config.build_object(&clouds.base);
            let timeline = Timeline::demo_sequence(
                &object,
                clouds.first.as_flat().to_vec(),
                clouds.second.as_flat().to_vec(),
            )?;

            for (frame, &p) in progress.iter().enumerate() {
                if !timeline_frame(&timeline, &mut object, p, frame, &mut redraws) {
                    skipped += 1;
                    continue;
                }
                object.geometry.take_dirty();
                if let Some(path) = frame_path(&args.output, frame) {
                    write_ply_points(&object.world_points(), path)?;
                }
            }
            log::info!(
                "final position {:?}, rotation {:?}",
                object.position,
                object.rotation
            );
        }
        MorphMode::Phase => {
            let mut morpher = PhaseMorpher::new();
            for cloud in [&clouds.base, &clouds.first, &clouds.second] {
                morpher.add_geometry(cloud, None);
            }
            let mut buffer = PositionBuffer::from_cloud(&clouds.base);
            let span = (morpher.slot_count() - 1) as f32;

            for (frame, &p) in progress.iter().enumerate() {
                if !phase_frame(&morpher, &mut buffer, p * span, frame, &mut redraws) {
                    skipped += 1;
                    continue;
                }
                buffer.take_dirty();
                if let Some(path) = frame_path(&args.output, frame) {
                    write_ply_points(&buffer.to_cloud(), path)?;
                }
            }
        }
    }

    log::info!("{} redraws requested, {} frames skipped", redraws.count, skipped);
    if let Some(dir) = &args.output {
        println!("Wrote {} frames to {}", progress.len() - skipped, dir.display());
    }
    Ok(())
}
