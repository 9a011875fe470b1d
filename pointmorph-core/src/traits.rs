//! Core traits for pointmorph

use crate::{point::*, point_cloud::*, transform::Transform3D};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

/// Trait for geometry that can be transformed in place
pub trait Transformable {
    /// Apply a transformation to the geometry
    fn transform(&mut self, transform: &Transform3D);
}

fn bounds_of(points: &[Point3f]) -> (Point3f, Point3f) {
    let Some(first) = points.first() else {
        return (Point3f::origin(), Point3f::origin());
    };

    let mut min = *first;
    let mut max = *first;
    for p in points {
        min = min.inf(p);
        max = max.sup(p);
    }
    (min, max)
}

impl Drawable for PointCloud3f {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(&self.points)
    }
}

impl Transformable for PointCloud3f {
    fn transform(&mut self, transform: &Transform3D) {
        for point in &mut self.points {
            *point = transform.transform_point(point);
        }
    }
}
