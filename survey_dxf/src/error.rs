//! Error types shared by the conversion pipeline.

use thiserror::Error;

/// Batch level failure. Any of these aborts a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in {file}: {message}")]
    Csv { file: String, message: String },

    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("DXF error: {0}")]
    Dxf(String),

    #[error("could not persist artifact: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Failure to turn a geodetic coordinate into planar feet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("coordinate out of range: lon {lon}, lat {lat}")]
    OutOfRange { lon: f64, lat: f64 },

    #[error("non-finite projection result for lon {lon}, lat {lat}")]
    NonFinite { lon: f64, lat: f64 },

    #[error("could not create transform {from} -> {to}: {message}")]
    Create {
        from: String,
        to: String,
        message: String,
    },

    #[error("PROJ conversion failed: {0}")]
    Proj(String),
}

/// Malformed content inside a tagged geometry string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("vertex {vertex:?} has {count} ordinates, expected 2 or 3")]
    VertexArity { vertex: String, count: usize },

    #[error("geometry has no vertices")]
    Empty,

    #[error("point geometry has {0} vertices")]
    PointVertexCount(usize),
}

/// Reason a single row was excluded from the output. Row errors never abort
/// the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("missing or non-numeric {0}")]
    MissingField(&'static str),

    #[error("unrecognized geometry tag")]
    UnrecognizedGeometry,

    #[error("malformed geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
