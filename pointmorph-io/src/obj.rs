//! OBJ format support
//!
//! Every `o` object with faces becomes one position source holding the
//! vertices its faces reference, in file order. Vertices that no face uses
//! (point-only files) are collected in a trailing `points` source.

use crate::{model_name, LoadedModel, ModelReader, PositionSource};
use ::obj::{LoadConfig, ObjData};
use pointmorph_core::{Error, Point3f, PointCloud3f, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Name of the source holding vertices referenced by no face
pub const UNREFERENCED_SOURCE: &str = "points";

pub struct ObjReader;

impl ObjReader {
    /// Parse OBJ text from any reader
    pub fn read_from<R: Read>(reader: R, name: String) -> Result<LoadedModel> {
        // non-strict so exporter-specific commands are skipped
        let data = ObjData::load_buf_with_config(reader, LoadConfig { strict: false })
            .map_err(|e| Error::InvalidData(format!("OBJ parse error: {}", e)))?;

        let mut referenced = vec![false; data.position.len()];
        let mut sources = Vec::new();

        for object in &data.objects {
            let indices: BTreeSet<usize> = object
                .groups
                .iter()
                .flat_map(|group| group.polys.iter())
                .flat_map(|poly| poly.0.iter().map(|tuple| tuple.0))
                .collect();
            if indices.is_empty() {
                continue;
            }

            let mut cloud = PointCloud3f::with_capacity(indices.len());
            for index in indices {
                let position = data.position.get(index).ok_or_else(|| {
                    Error::InvalidData(format!(
                        "face of '{}' references vertex {} of {}",
                        object.name,
                        index + 1,
                        data.position.len()
                    ))
                })?;
                referenced[index] = true;
                cloud.push(Point3f::from(*position));
            }
            sources.push(PositionSource {
                name: object.name.clone(),
                cloud,
            });
        }

        let loose: PointCloud3f = data
            .position
            .iter()
            .zip(&referenced)
            .filter(|(_, used)| !**used)
            .map(|(position, _)| Point3f::from(*position))
            .collect();
        if !loose.is_empty() {
            sources.push(PositionSource {
                name: UNREFERENCED_SOURCE.to_string(),
                cloud: loose,
            });
        }

        Ok(LoadedModel { name, sources })
    }
}

impl ModelReader for ObjReader {
    fn read_model<P: AsRef<Path>>(path: P) -> Result<LoadedModel> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file), model_name(path))
    }
}
