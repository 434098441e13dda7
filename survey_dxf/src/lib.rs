//! Core library for converting survey CSV exports into DXF drawings.
//!
//! The crate is organised as a small pipeline: [`table`] reads and merges the
//! uploaded CSV files, [`ingest`] turns rows into typed records, [`crs`]
//! projects geodetic coordinates into Maryland state plane feet, [`drawing`]
//! renders markers, outlines and labels onto named layers and [`summary`]
//! collects the cleaned output table. [`io`] serializes both artifacts.

pub mod config;
pub mod crs;
pub mod drawing;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod io;
pub mod layers;
pub mod pipeline;
pub mod styles;
pub mod summary;
pub mod table;
pub mod wkt;

pub use config::ConversionOptions;
pub use crs::{ElevationModel, Projector};
pub use error::{ConvertError, Result};
pub use pipeline::{convert_geometries, convert_points, Conversion, ConversionReport, PipelineKind};
pub use table::Table;
