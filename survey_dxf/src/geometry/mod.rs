//! Basic geometry primitives for CAD operations.

mod point3;

pub use point3::Point3;

/// Representation of a 2D point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Arithmetic mean of all vertices in x, y and z.
///
/// This is the label anchor for polygons, not an area-weighted centroid.
/// Returns `None` for an empty slice.
pub fn mean_center(vertices: &[Point3]) -> Option<Point3> {
    if vertices.is_empty() {
        return None;
    }
    let n = vertices.len() as f64;
    let (sx, sy, sz) = vertices
        .iter()
        .fold((0.0, 0.0, 0.0), |(sx, sy, sz), p| (sx + p.x, sy + p.y, sz + p.z));
    Some(Point3::new(sx / n, sy / n, sz / n))
}

/// The vertex at index `len / 2` (integer floor). No interpolation is done.
pub fn middle_vertex(vertices: &[Point3]) -> Option<Point3> {
    vertices.get(vertices.len() / 2).copied()
}
