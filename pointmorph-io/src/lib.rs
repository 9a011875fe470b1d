//! Model loading and point cloud export
//!
//! Models are read as one or more named position sources. Only positions
//! matter to the morph engine, so faces, normals and colours are ignored
//! and the sources of a model can be merged into a single cloud.

pub mod obj;
pub mod ply;

use std::path::Path;
use pointmorph_core::{PointCloud3f, Result};

/// A named block of positions found in a model file
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSource {
    pub name: String,
    pub cloud: PointCloud3f,
}

/// Everything position-related read from one model file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub name: String,
    pub sources: Vec<PositionSource>,
}

impl LoadedModel {
    /// All sources concatenated in load order
    pub fn merged(&self) -> PointCloud3f {
        PointCloud3f::merge(self.sources.iter().map(|s| &s.cloud))
    }

    pub fn source(&self, name: &str) -> Option<&PositionSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn vertex_count(&self) -> usize {
        self.sources.iter().map(|s| s.cloud.len()).sum()
    }
}

/// Trait for reading models from files
pub trait ModelReader {
    fn read_model<P: AsRef<Path>>(path: P) -> Result<LoadedModel>;
}

/// Trait for writing point clouds to files
pub trait PointCloudWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud3f, path: P) -> Result<()>;
}

pub(crate) fn model_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string()
}

/// Auto-detect format and read a model
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<LoadedModel> {
    let path = path.as_ref();
    let model = match path.extension().and_then(|s| s.to_str()) {
        Some("obj") => obj::ObjReader::read_model(path)?,
        Some("ply") => ply::PlyReader::read_model(path)?,
        _ => {
            return Err(pointmorph_core::Error::UnsupportedFormat(format!(
                "Unsupported model format: {:?}",
                path.extension()
            )))
        }
    };
    log::debug!(
        "loaded {:?}: {} sources, {} vertices",
        path,
        model.sources.len(),
        model.vertex_count()
    );
    Ok(model)
}

/// Read a model and merge all of its sources
pub fn load_merged<P: AsRef<Path>>(path: P) -> Result<PointCloud3f> {
    Ok(load_model(path)?.merged())
}

/// Write a point cloud as an ASCII PLY vertex list
pub fn write_ply_points<P: AsRef<Path>>(cloud: &PointCloud3f, path: P) -> Result<()> {
    ply::PlyWriter::write_point_cloud(cloud, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointmorph_core::Point3f;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pointmorph_io_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_merged_keeps_source_order() {
        let model = LoadedModel {
            name: "scene".to_string(),
            sources: vec![
                PositionSource {
                    name: "a".to_string(),
                    cloud: PointCloud3f::from_points(vec![Point3f::new(1.0, 0.0, 0.0)]),
                },
                PositionSource {
                    name: "b".to_string(),
                    cloud: PointCloud3f::from_points(vec![
                        Point3f::new(2.0, 0.0, 0.0),
                        Point3f::new(3.0, 0.0, 0.0),
                    ]),
                },
            ],
        };
        let merged = model.merged();
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(merged.iter().map(|p| p.x).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert!(model.source("b").is_some());
        assert!(model.source("c").is_none());
    }

    #[test]
    fn test_load_model_dispatches_on_extension() {
        let obj_path = temp_path("tri.obj");
        fs::write(&obj_path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let cloud = load_merged(&obj_path).unwrap();
        assert_eq!(cloud.len(), 3);
        let _ = fs::remove_file(&obj_path);

        let ply_path = temp_path("pts.ply");
        write_ply_points(&cloud, &ply_path).unwrap();
        let reloaded = load_merged(&ply_path).unwrap();
        assert_eq!(reloaded, cloud);
        let _ = fs::remove_file(&ply_path);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_model("scene.gltf"),
            Err(pointmorph_core::Error::UnsupportedFormat(_))
        ));
    }
}
