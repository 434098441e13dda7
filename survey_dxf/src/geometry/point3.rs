//! Basic 3D point type used throughout the crate.

/// Representation of a 3D point.
///
/// Depending on the stage of the pipeline this holds raw geodetic ordinates
/// (longitude, latitude, height) or projected feet (easting, northing,
/// corrected elevation).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns this point translated by the given offsets.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z)
    }

    /// Drops the elevation.
    pub fn plan(&self) -> super::Point {
        super::Point::new(self.x, self.y)
    }
}
