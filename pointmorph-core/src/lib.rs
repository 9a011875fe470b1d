//! Core data structures and traits for pointmorph
//!
//! This crate provides the fundamental types shared by the morph engine:
//! points, point clouds, the flat position buffer a renderer consumes,
//! renderable point objects and 3D transforms.

pub mod point;
pub mod point_cloud;
pub mod buffer;
pub mod object;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use buffer::*;
pub use object::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4, UnitQuaternion};
