//! Scene configuration shared by the demos

use anyhow::{Context, Result};
use pointmorph_core::{
    Drawable, PointCloud3f, PointStyle, PointsObject, Transform3D, Transformable, Vector3f,
};
use pointmorph_simplification::{normalize, Decimator, PairCollapseDecimator, StrideDecimator};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimatorKind {
    #[default]
    PairCollapse,
    Stride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphMode {
    /// Six-stage translate / rotate / morph sequence scrubbed by scroll
    #[default]
    Timeline,
    /// Staggered blend across the three keyframes
    Phase,
}

/// One model file and the geometry transform baked into it at load time
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub scale: [f32; 3],
    /// XYZ Euler angles in degrees, applied after scaling
    pub rotation_deg: [f32; 3],
    /// Keep only the first `n` position sources of the file
    pub max_sources: Option<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            scale: [1.0; 3],
            rotation_deg: [0.0; 3],
            max_sources: None,
        }
    }
}

impl ModelConfig {
    pub fn geometry_transform(&self) -> Transform3D {
        let angles = Vector3f::from(self.rotation_deg).map(f32::to_radians);
        Transform3D::euler(angles).compose(Transform3D::scaling(Vector3f::from(self.scale)))
    }

    /// Load, merge and transform the model's positions
    pub fn load_cloud(&self) -> Result<PointCloud3f> {
        let model = pointmorph_io::load_model(&self.path)
            .with_context(|| format!("loading model {}", self.path.display()))?;
        let take = self.max_sources.unwrap_or(model.sources.len());
        let mut cloud = PointCloud3f::merge(model.sources.iter().take(take).map(|s| &s.cloud));
        cloud.transform(&self.geometry_transform());
        let (min, max) = cloud.bounding_box();
        log::info!(
            "{}: {} points, bounds [{:.2}, {:.2}, {:.2}] .. [{:.2}, {:.2}, {:.2}]",
            model.name,
            cloud.len(),
            min.x,
            min.y,
            min.z,
            max.x,
            max.y,
            max.z
        );
        Ok(cloud)
    }
}

/// Placement and style of the displayed object
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    pub position: [f32; 3],
    pub rotation_deg: [f32; 3],
    pub style: PointStyle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub viewport_height: f32,
    /// Scroll length as a percentage of the viewport height
    pub length_percent: f32,
    pub lag_seconds: f32,
    pub fps: f32,
    /// Frames spent scrolling from top to bottom
    pub frames: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            viewport_height: 800.0,
            length_percent: 500.0,
            lag_seconds: 1.5,
            fps: 60.0,
            frames: 240,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    /// Model shown first; decimated to the first target's size
    pub base: ModelConfig,
    pub first: ModelConfig,
    pub second: ModelConfig,
    #[serde(default)]
    pub object: ObjectConfig,
    #[serde(default)]
    pub decimator: DecimatorKind,
    /// Pair-collapse distance limit
    #[serde(default)]
    pub max_pair_distance: Option<f32>,
    #[serde(default)]
    pub mode: MorphMode,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

/// The three clouds after normalization, all with the same vertex count
pub struct SceneClouds {
    pub base: PointCloud3f,
    pub first: PointCloud3f,
    pub second: PointCloud3f,
}

impl SceneConfig {
    /// Read a TOML scene. Relative model paths resolve against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene config {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing scene config {}", path.display()))?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        for model in [&mut config.base, &mut config.first, &mut config.second] {
            if model.path.is_relative() {
                model.path = dir.join(&model.path);
            }
        }
        Ok(config)
    }

    pub fn decimator(&self) -> Box<dyn Decimator> {
        match self.decimator {
            DecimatorKind::PairCollapse => Box::new(PairCollapseDecimator::with_params(self.max_pair_distance)),
            DecimatorKind::Stride => Box::new(StrideDecimator::new()),
        }
    }

    /// Load all models and reduce the base and the second target to the
    /// first target's vertex count
    pub fn load_clouds(&self) -> Result<SceneClouds> {
        let decimator = self.decimator();
        let base = self.base.load_cloud()?;
        let first = self.first.load_cloud()?;
        let second = self.second.load_cloud()?;

        let base = normalize(&base, &first, &decimator)?;
        let second = normalize(&second, &first, &decimator)?;
        for (name, normalized) in [("base", &base), ("second", &second)] {
            anyhow::ensure!(
                normalized.is_exact(),
                "{} model could not be matched to {} points (residual {})",
                name,
                first.len(),
                normalized.residual
            );
        }

        Ok(SceneClouds {
            base: base.cloud,
            first,
            second: second.cloud,
        })
    }

    /// The displayed object, placed and styled from `[object]`
    pub fn build_object(&self, geometry: &PointCloud3f) -> PointsObject {
        let mut object = PointsObject::from_cloud(geometry, self.object.style);
        object.position = Vector3f::from(self.object.position);
        object.rotation = Vector3f::from(self.object.rotation_deg).map(f32::to_radians);
        object
    }
}
