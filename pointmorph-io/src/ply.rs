//! PLY format support

use crate::{model_name, LoadedModel, ModelReader, PointCloudWriter, PositionSource};
use pointmorph_core::{Error, Point3f, PointCloud3f, Result};
use std::path::Path;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use ply_rs::{
    parser::Parser,
    writer::Writer,
    ply::{Property, PropertyDef, PropertyType, ScalarType, ElementDef, Ply, Addable, DefaultElement},
};

pub struct PlyReader;
pub struct PlyWriter;

impl ModelReader for PlyReader {
    fn read_model<P: AsRef<Path>>(path: P) -> Result<LoadedModel> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser.read_ply(&mut reader)?;

        let mut cloud = PointCloud3f::new();
        if let Some(vertex_element) = ply.payload.get("vertex") {
            cloud = PointCloud3f::with_capacity(vertex_element.len());
            for vertex in vertex_element {
                let x = extract_property_value(vertex, "x")?;
                let y = extract_property_value(vertex, "y")?;
                let z = extract_property_value(vertex, "z")?;

                cloud.push(Point3f::new(x, y, z));
            }
        }

        Ok(LoadedModel {
            name: model_name(path),
            sources: vec![PositionSource {
                name: "vertex".to_string(),
                cloud,
            }],
        })
    }
}

impl PointCloudWriter for PlyWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud3f, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let mut ply = Ply::<DefaultElement>::new();

        let mut vertex_element = ElementDef::new("vertex".to_string());
        vertex_element.count = cloud.len();
        for axis in ["x", "y", "z"] {
            vertex_element.properties.add(PropertyDef::new(
                axis.to_string(),
                PropertyType::Scalar(ScalarType::Float),
            ));
        }
        ply.header.elements.add(vertex_element);

        let vertices = cloud
            .iter()
            .map(|point| {
                let mut vertex = DefaultElement::new();
                vertex.insert("x".to_string(), Property::Float(point.x));
                vertex.insert("y".to_string(), Property::Float(point.y));
                vertex.insert("z".to_string(), Property::Float(point.z));
                vertex
            })
            .collect();
        ply.payload.insert("vertex".to_string(), vertices);

        let writer_instance = Writer::new();
        writer_instance.write_ply(&mut writer, &mut ply)?;

        Ok(())
    }
}

/// Extract a property value as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        Some(Property::Short(val)) => Ok(*val as f32),
        Some(Property::UShort(val)) => Ok(*val as f32),
        _ => Err(Error::InvalidData(
            format!("Property '{}' not found or invalid type", name)
        )),
    }
}
