//! Parser for the tagged geometry strings found in `Geometry` columns.
//!
//! Accepted forms are `POINT`, `LINESTRING` and `POLYGON`, optionally
//! followed by `Z`, and a parenthesized vertex list:
//!
//! ```text
//! POINTZ(-77.0 38.9 100.0)
//! LINESTRINGZ(-77.0 38.9 10.0, -77.1 38.95 12.0)
//! POLYGONZ((-77.0 38.9 1.0, -77.1 38.9 1.0, -77.1 39.0 1.0, -77.0 38.9 1.0))
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::GeometryError;
use crate::geometry::Point3;

static TAGGED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*(POINT|LINESTRING|POLYGON)\s*Z?\s*\((.*)\)\s*$").unwrap()
});

/// Geometry class named by the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl GeometryKind {
    /// Name used in the summary table.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded geometry. Coordinates are raw (lon, lat, height) triples.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Exactly one vertex.
    Point(Point3),
    /// One or more vertices in listed order.
    LineString(Vec<Point3>),
    /// One or more vertices in listed order; the ring is not closed or
    /// repaired.
    Polygon(Vec<Point3>),
    /// The tag was not one of the supported classes.
    Unrecognized,
}

impl Geometry {
    pub fn kind(&self) -> Option<GeometryKind> {
        match self {
            Geometry::Point(_) => Some(GeometryKind::Point),
            Geometry::LineString(_) => Some(GeometryKind::LineString),
            Geometry::Polygon(_) => Some(GeometryKind::Polygon),
            Geometry::Unrecognized => None,
        }
    }

    /// All vertices in order. Empty for [`Geometry::Unrecognized`].
    pub fn coordinates(&self) -> Vec<Point3> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::LineString(v) | Geometry::Polygon(v) => v.clone(),
            Geometry::Unrecognized => Vec::new(),
        }
    }
}

/// Parses a tagged geometry string.
///
/// An unknown tag is not an error and yields [`Geometry::Unrecognized`].
/// Bad numbers or vertex counts are reported as [`GeometryError`].
pub fn parse_geometry(text: &str) -> Result<Geometry, GeometryError> {
    let Some(caps) = TAGGED.captures(text) else {
        return Ok(Geometry::Unrecognized);
    };
    let tag = caps[1].to_ascii_uppercase();
    let body = caps[2].trim().trim_start_matches('(').trim_end_matches(')');
    let vertices = parse_vertices(body)?;
    match tag.as_str() {
        "POINT" => match vertices.as_slice() {
            [p] => Ok(Geometry::Point(*p)),
            other => Err(GeometryError::PointVertexCount(other.len())),
        },
        "LINESTRING" => Ok(Geometry::LineString(vertices)),
        _ => Ok(Geometry::Polygon(vertices)),
    }
}

/// Parses the coordinates of a tagged string, `[]` when the tag is unknown.
pub fn parse_coordinates(text: &str) -> Result<Vec<Point3>, GeometryError> {
    parse_geometry(text).map(|g| g.coordinates())
}

fn parse_vertices(body: &str) -> Result<Vec<Point3>, GeometryError> {
    if body.trim().is_empty() {
        return Err(GeometryError::Empty);
    }
    body.split(',').map(parse_vertex).collect()
}

fn parse_vertex(vertex: &str) -> Result<Point3, GeometryError> {
    let ordinates = vertex
        .split_whitespace()
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| GeometryError::InvalidNumber(s.to_string()))
        })
        .collect::<Result<Vec<f64>, _>>()?;
    match ordinates.as_slice() {
        [x, y] => Ok(Point3::new(*x, *y, 0.0)),
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        other => Err(GeometryError::VertexArity {
            vertex: vertex.trim().to_string(),
            count: other.len(),
        }),
    }
}
