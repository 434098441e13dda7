//! The two conversion pipelines: point-only uploads and uploads with a
//! tagged `Geometry` column.

use crate::config::ConversionOptions;
use crate::crs::{Geodetic, Projector};
use crate::drawing::{DrawingDocument, DrawingEmitter};
use crate::error::Result;
use crate::geometry::Point3;
use crate::ingest::{ingest_geometries, ingest_points};
use crate::io::{write_artifacts, ArtifactDirs, Artifacts};
use crate::layers::PointLayers;
use crate::summary::{SummaryBuilder, SummaryRow};
use crate::table::Table;
use crate::wkt::Geometry;

/// Which pipeline variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// `Latitude`/`Longitude`/`Elevation` columns, one point per row.
    Points,
    /// A `Geometry` column holding tagged point/line/polygon strings.
    Geometry,
}

impl PipelineKind {
    /// Default options for this variant.
    pub fn default_options(&self) -> ConversionOptions {
        match self {
            PipelineKind::Points => ConversionOptions::points(),
            PipelineKind::Geometry => ConversionOptions::geometry(),
        }
    }
}

/// Counts of what happened to the input during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub files_read: usize,
    pub files_skipped: Vec<String>,
    pub rows_read: usize,
    pub rows_rejected: usize,
    pub projection_failures: usize,
    pub records_written: usize,
    pub entities: usize,
}

impl ConversionReport {
    fn log(&self) {
        log::info!(
            "converted {} of {} rows from {} files \
             ({} rejected, {} projection failures, {} files skipped), {} entities",
            self.records_written,
            self.rows_read,
            self.files_read,
            self.rows_rejected,
            self.projection_failures,
            self.files_skipped.len(),
            self.entities
        );
    }
}

/// A finished run: the drawing, the summary table and the report.
#[derive(Debug)]
pub struct Conversion {
    pub document: DrawingDocument,
    pub summary: Table,
    pub report: ConversionReport,
}

impl Conversion {
    /// Serializes both artifacts; see [`write_artifacts`].
    pub fn write_artifacts(&self, dirs: ArtifactDirs<'_>) -> Result<Artifacts> {
        write_artifacts(&self.document, &self.summary, dirs)
    }
}

/// Runs the selected pipeline.
pub fn convert(
    kind: PipelineKind,
    tables: &[Table],
    projector: &Projector,
    options: &ConversionOptions,
) -> Result<Conversion> {
    match kind {
        PipelineKind::Points => convert_points(tables, projector, options),
        PipelineKind::Geometry => convert_geometries(tables, projector, options),
    }
}

/// Point pipeline: merged uploads, one X marker with elevation and remarks
/// labels per row, drawn on `v-<file>` layers.
pub fn convert_points(
    tables: &[Table],
    projector: &Projector,
    options: &ConversionOptions,
) -> Result<Conversion> {
    options.validate()?;
    let batch = ingest_points(tables, options);
    let mut report = ConversionReport {
        files_read: tables.len(),
        rows_read: batch.rows_read,
        rows_rejected: batch.rejected,
        ..Default::default()
    };
    let mut emitter = DrawingEmitter::new(options.display, options.baseline_elevation);
    let mut summary = SummaryBuilder::for_points(&batch.schema);

    for record in &batch.records {
        let projected =
            projector.project(record.geodetic(), record.instrument_height, &options.elevation);
        let at = match projected {
            Ok(at) => at,
            Err(e) => {
                log::warn!("skipping point from {}: {}", record.source, e);
                report.projection_failures += 1;
                continue;
            }
        };
        let layers = PointLayers::for_source(&record.source);
        emitter.survey_point(&layers, at, record.fix, &record.remarks);
        summary.push_point(&record.values, at);
    }

    report.records_written = summary.len();
    let document = emitter.into_document();
    report.entities = document.entities().len();
    report.log();
    Ok(Conversion {
        document,
        summary: summary.finish("processed_points"),
        report,
    })
}

/// Geometry pipeline: every upload on its own, points on `v-points`, lines
/// and polygons on per-feature layers.
pub fn convert_geometries(
    tables: &[Table],
    projector: &Projector,
    options: &ConversionOptions,
) -> Result<Conversion> {
    options.validate()?;
    let batch = ingest_geometries(tables, options);
    let mut report = ConversionReport {
        files_read: tables.len(),
        files_skipped: batch.skipped_files.clone(),
        rows_read: batch.rows_read,
        rows_rejected: batch.rejected,
        ..Default::default()
    };
    let mut emitter = DrawingEmitter::new(options.display, options.baseline_elevation);
    let mut summary = SummaryBuilder::for_geometries();
    let point_layers = PointLayers::shared();

    for record in &batch.records {
        let Some(kind) = record.geometry.kind() else {
            continue;
        };
        let projected: std::result::Result<Vec<Point3>, _> = record
            .geometry
            .coordinates()
            .into_iter()
            .map(|c| {
                projector.project(Geodetic::from(c), record.instrument_height, &options.elevation)
            })
            .collect();
        let vertices = match projected {
            Ok(v) => v,
            Err(e) => {
                log::warn!("skipping {} {:?} from {}: {}", kind, record.name, record.source, e);
                report.projection_failures += 1;
                continue;
            }
        };

        match &record.geometry {
            Geometry::Point(_) => {
                emitter.survey_point(&point_layers, vertices[0], record.fix, &record.remarks)
            }
            Geometry::LineString(_) => emitter.line_feature(&record.name, &vertices),
            Geometry::Polygon(_) => {
                emitter.polygon_feature(&record.name, &record.remarks, &vertices)
            }
            Geometry::Unrecognized => continue,
        }
        summary.push_feature(&SummaryRow {
            kind,
            name: record.name.clone(),
            remarks: record.remarks.clone(),
            vertices,
        });
    }

    report.records_written = summary.len();
    let document = emitter.into_document();
    report.entities = document.entities().len();
    report.log();
    Ok(Conversion {
        document,
        summary: summary.finish("processed_geometries"),
        report,
    })
}
