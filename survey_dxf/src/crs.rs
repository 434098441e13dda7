//! Coordinate reference system utilities built on top of the `proj` crate.

use proj::Proj;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::geometry::Point3;

/// Meters to US survey feet.
pub const METERS_TO_US_FEET: f64 = 3.280833333;

/// Geoid offset applied by the geometry pipeline, in meters.
pub const DEFAULT_GEOID_OFFSET: f64 = 34.67;

/// Representation of a coordinate reference system.
///
/// A CRS is stored as a definition string understood by PROJ. When created
/// from an EPSG code the numeric value is retained so that callers can
/// inspect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    definition: String,
    epsg: Option<u32>,
}

impl Crs {
    /// Creates a new CRS from the given EPSG code.
    pub fn from_epsg(code: u32) -> Self {
        Self {
            definition: format!("EPSG:{}", code),
            epsg: Some(code),
        }
    }

    /// Returns the EPSG code for this CRS, if available.
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Returns the underlying definition string.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// WGS84 geographic coordinates (EPSG:4326).
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// NAD83 / Maryland state plane in US survey feet (EPSG:2248).
    pub fn maryland_ftus() -> Self {
        Self::from_epsg(2248)
    }
}

/// A geodetic coordinate: degrees, degrees, meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub lon: f64,
    pub lat: f64,
    pub height: f64,
}

impl Geodetic {
    pub fn new(lon: f64, lat: f64, height: f64) -> Self {
        Self { lon, lat, height }
    }
}

impl From<Point3> for Geodetic {
    fn from(p: Point3) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

/// Elevation correction applied to every projected coordinate.
///
/// `z_ft = (height + geoid_offset - instrument_height) * METERS_TO_US_FEET`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationModel {
    pub geoid_offset: f64,
}

impl ElevationModel {
    /// Heights are taken as they are (orthometric or ellipsoidal).
    pub fn direct() -> Self {
        Self { geoid_offset: 0.0 }
    }

    /// Ellipsoidal heights lifted by the fixed geoid offset.
    pub fn with_geoid_offset(geoid_offset: f64) -> Self {
        Self { geoid_offset }
    }

    /// Corrected elevation in US survey feet.
    pub fn corrected_feet(&self, height: f64, instrument_height: f64) -> f64 {
        (height + self.geoid_offset - instrument_height) * METERS_TO_US_FEET
    }
}

impl Default for ElevationModel {
    fn default() -> Self {
        Self::direct()
    }
}

/// Forward and inverse transform between a geographic and a projected CRS.
///
/// Build one per process and share it by reference; it is never mutated after
/// construction.
pub struct Projector {
    source: Crs,
    target: Crs,
    forward: Proj,
    inverse: Proj,
}

impl std::fmt::Debug for Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}

impl Projector {
    /// Creates the transform pair. Axis order is always (lon, lat) -> (x, y).
    pub fn new(source: Crs, target: Crs) -> Result<Self, ProjectionError> {
        let create = |from: &Crs, to: &Crs| {
            Proj::new_known_crs(from.definition(), to.definition(), None).map_err(|e| {
                ProjectionError::Create {
                    from: from.definition().to_string(),
                    to: to.definition().to_string(),
                    message: e.to_string(),
                }
            })
        };
        let forward = create(&source, &target)?;
        let inverse = create(&target, &source)?;
        Ok(Self {
            source,
            target,
            forward,
            inverse,
        })
    }

    /// WGS84 to NAD83 / Maryland (ftUS), the only pair used by the converter.
    pub fn maryland() -> Result<Self, ProjectionError> {
        Self::new(Crs::wgs84(), Crs::maryland_ftus())
    }

    /// Projects longitude/latitude in degrees to planar feet.
    pub fn project_xy(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
            return Err(ProjectionError::OutOfRange { lon, lat });
        }
        let (x, y) = self
            .forward
            .convert((lon, lat))
            .map_err(|e| ProjectionError::Proj(e.to_string()))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { lon, lat });
        }
        Ok((x, y))
    }

    /// Converts planar feet back to longitude/latitude in degrees.
    pub fn unproject_xy(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let (lon, lat) = self
            .inverse
            .convert((x, y))
            .map_err(|e| ProjectionError::Proj(e.to_string()))?;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::NonFinite { lon: x, lat: y });
        }
        Ok((lon, lat))
    }

    /// Projects a geodetic coordinate and applies the elevation correction.
    pub fn project(
        &self,
        coord: Geodetic,
        instrument_height: f64,
        elevation: &ElevationModel,
    ) -> Result<Point3, ProjectionError> {
        let (x, y) = self.project_xy(coord.lon, coord.lat)?;
        let z = elevation.corrected_feet(coord.height, instrument_height);
        Ok(Point3::new(x, y, z))
    }
}
