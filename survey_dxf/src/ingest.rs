//! Turns CSV rows into typed survey records.
//!
//! Rows that fail coercion of a mandatory field are dropped and counted; they
//! never abort the batch.

use crate::config::ConversionOptions;
use crate::crs::Geodetic;
use crate::error::RowError;
use crate::styles::FixQuality;
use crate::table::{harmonize, Row, Schema, Table, LAYER_COLUMN};
use crate::wkt::{parse_geometry, Geometry};

pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const ELEVATION: &str = "Elevation";
pub const INSTRUMENT_HT: &str = "Instrument Ht";
pub const ORTHO_HEIGHT: &str = "Ortho Height";
pub const FIX_ID: &str = "Fix ID";
pub const REMARKS: &str = "Remarks";
pub const ID: &str = "ID";
pub const NAME: &str = "Name";
pub const GEOMETRY: &str = "Geometry";

/// Parses a numeric cell. Empty, non-numeric and non-finite values are null.
pub fn coerce_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Integer sort key of an `ID` cell. Non-numeric IDs sort as 0 and
/// fractional IDs truncate toward zero.
pub fn id_sort_key(value: &str) -> i64 {
    coerce_number(value).map(|v| v as i64).unwrap_or(0)
}

/// Values used for optional fields that are absent or unparsable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDefaults {
    pub instrument_height: f64,
    pub fix_code: f64,
}

impl FieldDefaults {
    pub fn from_options(options: &ConversionOptions) -> Self {
        Self {
            instrument_height: options.default_instrument_height,
            fix_code: 0.0,
        }
    }

    fn instrument_height(&self, row: &Row<'_>) -> f64 {
        row.get(INSTRUMENT_HT)
            .and_then(coerce_number)
            .unwrap_or(self.instrument_height)
    }

    fn fix(&self, row: &Row<'_>) -> FixQuality {
        let code = row.get(FIX_ID).and_then(coerce_number).unwrap_or(self.fix_code);
        FixQuality::from_code(code)
    }
}

fn text(row: &Row<'_>, column: &str) -> String {
    row.get(column).unwrap_or_default().trim().to_string()
}

fn required(row: &Row<'_>, column: &'static str) -> Result<f64, RowError> {
    row.get(column)
        .and_then(coerce_number)
        .ok_or(RowError::MissingField(column))
}

/// One validated row of the point pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Harmonized cells, in schema order.
    pub values: Vec<String>,
    /// Base name of the source file.
    pub source: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub ortho_height: Option<f64>,
    pub instrument_height: f64,
    pub fix: FixQuality,
    pub remarks: String,
    pub sort_key: i64,
}

impl PointRecord {
    /// Orthometric height when available, otherwise the `Elevation` column.
    pub fn height(&self) -> f64 {
        self.ortho_height.unwrap_or(self.elevation)
    }

    pub fn geodetic(&self) -> Geodetic {
        Geodetic::new(self.longitude, self.latitude, self.height())
    }

    pub fn from_row(row: &Row<'_>, defaults: &FieldDefaults) -> Result<Self, RowError> {
        let latitude = required(row, LATITUDE)?;
        let longitude = required(row, LONGITUDE)?;
        let elevation = required(row, ELEVATION)?;
        Ok(Self {
            values: row.values().to_vec(),
            source: text(row, LAYER_COLUMN),
            latitude,
            longitude,
            elevation,
            ortho_height: row.get(ORTHO_HEIGHT).and_then(coerce_number),
            instrument_height: defaults.instrument_height(row),
            fix: defaults.fix(row),
            remarks: text(row, REMARKS),
            sort_key: row.get(ID).map(id_sort_key).unwrap_or(0),
        })
    }
}

/// Result of reading all point uploads.
#[derive(Debug, Clone, Default)]
pub struct PointBatch {
    /// Harmonized columns, including `Layer`.
    pub schema: Schema,
    pub records: Vec<PointRecord>,
    pub rows_read: usize,
    pub rejected: usize,
}

/// Merges the uploads, validates every row and orders the survivors by `ID`
/// when that column exists.
pub fn ingest_points(tables: &[Table], options: &ConversionOptions) -> PointBatch {
    let merged = harmonize(tables, options.schema_merge);
    let defaults = FieldDefaults::from_options(options);
    let mut batch = PointBatch {
        schema: merged.schema().clone(),
        ..Default::default()
    };
    for (idx, row) in merged.rows().enumerate() {
        batch.rows_read += 1;
        match PointRecord::from_row(&row, &defaults) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                log::debug!("dropping point row {}: {}", idx + 1, e);
                batch.rejected += 1;
            }
        }
    }
    if merged.has_column(ID) {
        batch.records.sort_by_key(|r| r.sort_key);
    }
    batch
}

/// One validated row of the geometry pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    pub source: String,
    pub name: String,
    pub remarks: String,
    pub instrument_height: f64,
    pub fix: FixQuality,
    /// Never [`Geometry::Unrecognized`].
    pub geometry: Geometry,
}

impl GeometryRecord {
    pub fn from_row(
        row: &Row<'_>,
        source: &str,
        defaults: &FieldDefaults,
    ) -> Result<Self, RowError> {
        let geometry = parse_geometry(row.get(GEOMETRY).unwrap_or_default())?;
        if geometry == Geometry::Unrecognized {
            return Err(RowError::UnrecognizedGeometry);
        }
        let name = [NAME, ID]
            .iter()
            .map(|c| text(row, c))
            .find(|s| !s.is_empty())
            .unwrap_or_default();
        Ok(Self {
            source: source.to_string(),
            name,
            remarks: text(row, REMARKS),
            instrument_height: defaults.instrument_height(row),
            fix: defaults.fix(row),
            geometry,
        })
    }
}

/// Result of reading all geometry uploads.
#[derive(Debug, Clone, Default)]
pub struct GeometryBatch {
    pub records: Vec<GeometryRecord>,
    pub rows_read: usize,
    pub rejected: usize,
    /// Uploads without a `Geometry` column.
    pub skipped_files: Vec<String>,
}

/// Reads each upload on its own, in upload order. Files lacking a
/// `Geometry` column are skipped as a whole.
pub fn ingest_geometries(tables: &[Table], options: &ConversionOptions) -> GeometryBatch {
    let defaults = FieldDefaults::from_options(options);
    let mut batch = GeometryBatch::default();
    for table in tables {
        if !table.has_column(GEOMETRY) {
            log::warn!("skipping {}: no {} column", table.name(), GEOMETRY);
            batch.skipped_files.push(table.name().to_string());
            continue;
        }
        for (idx, row) in table.rows().enumerate() {
            batch.rows_read += 1;
            match GeometryRecord::from_row(&row, table.name(), &defaults) {
                Ok(record) => batch.records.push(record),
                Err(e) => {
                    log::debug!("dropping {} row {}: {}", table.name(), idx + 1, e);
                    batch.rejected += 1;
                }
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;

    #[test]
    fn coerce_rejects_text_and_nan() {
        assert_eq!(coerce_number(" 38.5 "), Some(38.5));
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("abc"), None);
        assert_eq!(coerce_number("NaN"), None);
    }

    #[test]
    fn ids_sort_numerically_with_text_as_zero() {
        let csv = "ID,Latitude,Longitude,Elevation\n\
                   3,38.9,-77,1\n1,38.9,-77,1\nx,38.9,-77,1\n2,38.9,-77,1\n";
        let table = Table::parse("pts", csv).unwrap();
        let batch = ingest_points(&[table], &ConversionOptions::points());
        let ids: Vec<&str> = batch.records.iter().map(|r| r.values[0].as_str()).collect();
        assert_eq!(ids, vec!["x", "1", "2", "3"]);
    }

    #[test]
    fn missing_latitude_drops_only_that_row() {
        let csv = "Latitude,Longitude,Elevation\n,-77,1\n38.9,-77,2\n";
        let table = Table::parse("pts", csv).unwrap();
        let batch = ingest_points(&[table], &ConversionOptions::points());
        assert_eq!(batch.rows_read, 2);
        assert_eq!(batch.rejected, 1);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].elevation, 2.0);
    }

    #[test]
    fn point_defaults_and_ortho_height() {
        let csv = "Latitude,Longitude,Elevation,Ortho Height,Instrument Ht,Fix ID\n\
                   38.9,-77,10,,,4\n\
                   38.9,-77,10,5.5,2,x\n";
        let table = Table::parse("north", csv).unwrap();
        let batch = ingest_points(&[table], &ConversionOptions::points());
        let [a, b] = batch.records.as_slice() else {
            panic!("expected two records");
        };
        assert_eq!(a.height(), 10.0);
        assert_eq!(a.instrument_height, 0.0);
        assert_eq!(a.fix, FixQuality::RtkFixed);
        assert_eq!(a.source, "north");
        assert_eq!(b.height(), 5.5);
        assert_eq!(b.instrument_height, 2.0);
        assert_eq!(b.fix, FixQuality::Other);
    }

    #[test]
    fn geometry_rows_and_skipped_files() {
        let good = Table::parse(
            "feat",
            "Geometry,Name,Remarks,Instrument Ht\n\
             POINTZ(-77 38.9 1),P1,gate,\n\
             CIRCLE(1 2 3),C,,\n\
             \"LINESTRINGZ(-77 38.9 1, -77.1 38.9 2)\",,,2.0\n",
        )
        .unwrap();
        let bad = Table::parse("plain", "Latitude,Longitude\n38.9,-77\n").unwrap();
        let batch = ingest_geometries(&[bad, good], &ConversionOptions::geometry());
        assert_eq!(batch.skipped_files, vec!["plain".to_string()]);
        assert_eq!(batch.rows_read, 3);
        assert_eq!(batch.rejected, 1);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].name, "P1");
        assert_eq!(batch.records[0].instrument_height, 1.6);
        assert_eq!(batch.records[0].geometry, Geometry::Point(Point3::new(-77.0, 38.9, 1.0)));
        assert_eq!(batch.records[1].name, "");
        assert_eq!(batch.records[1].instrument_height, 2.0);
    }

    #[test]
    fn name_falls_back_to_id() {
        let t = Table::parse("f", "Geometry,ID\nPOINTZ(-77 38.9 1),17\n").unwrap();
        let batch = ingest_geometries(&[t], &ConversionOptions::geometry());
        assert_eq!(batch.records[0].name, "17");
    }
}
