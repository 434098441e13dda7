//! The cleaned output table, one row per processed record.

use crate::geometry::Point3;
use crate::table::{Schema, Table};
use crate::wkt::GeometryKind;

pub const ORTHO_FT: &str = "Ortho_ft";
pub const X_FT: &str = "X_ft";
pub const Y_FT: &str = "Y_ft";
pub const Z_FT: &str = "Z_ft";

/// Projected result of one geometry record.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub kind: GeometryKind,
    pub name: String,
    pub remarks: String,
    /// Projected vertices; exactly one for points.
    pub vertices: Vec<Point3>,
}

impl SummaryRow {
    /// The coordinate of a point feature.
    pub fn position(&self) -> Option<Point3> {
        match (self.kind, self.vertices.as_slice()) {
            (GeometryKind::Point, [p]) => Some(*p),
            _ => None,
        }
    }
}

/// Accumulates output rows in processing order.
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SummaryBuilder {
    /// `Type, Name, Remarks, X_ft, Y_ft, Z_ft, Vertices`.
    pub fn for_geometries() -> Self {
        let columns = ["Type", "Name", "Remarks", X_FT, Y_FT, Z_FT, "Vertices"];
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// The harmonized input columns followed by `Ortho_ft, X_ft, Y_ft`.
    pub fn for_points(schema: &Schema) -> Self {
        let mut columns = schema.columns().to_vec();
        columns.extend([ORTHO_FT, X_FT, Y_FT].iter().map(|c| c.to_string()));
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_feature(&mut self, row: &SummaryRow) {
        let (x, y, z) = match row.position() {
            Some(p) => (p.x.to_string(), p.y.to_string(), p.z.to_string()),
            None => Default::default(),
        };
        let vertices = if row.kind == GeometryKind::Point {
            String::new()
        } else {
            row.vertices
                .iter()
                .map(|p| format!("{} {} {}", p.x, p.y, p.z))
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.rows.push(vec![
            row.kind.to_string(),
            row.name.clone(),
            row.remarks.clone(),
            x,
            y,
            z,
            vertices,
        ]);
    }

    /// Input cells of a point row plus its projected coordinate.
    pub fn push_point(&mut self, values: &[String], at: Point3) {
        let mut out = values.to_vec();
        out.extend([at.z, at.x, at.y].iter().map(|v| v.to_string()));
        self.rows.push(out);
    }

    pub fn finish(self, name: &str) -> Table {
        Table::new(name, self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_rows() {
        let mut b = SummaryBuilder::for_geometries();
        b.push_feature(&SummaryRow {
            kind: GeometryKind::Point,
            name: "P1".into(),
            remarks: "".into(),
            vertices: vec![Point3::new(1.5, 2.0, 3.25)],
        });
        b.push_feature(&SummaryRow {
            kind: GeometryKind::LineString,
            name: "L1".into(),
            remarks: "fence".into(),
            vertices: vec![Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 1.0, 2.0)],
        });
        let t = b.finish("summary");
        let rows: Vec<Vec<String>> = t.rows().map(|r| r.values().to_vec()).collect();
        assert_eq!(rows[0], vec!["Point", "P1", "", "1.5", "2", "3.25", ""]);
        assert_eq!(rows[1], vec!["LineString", "L1", "fence", "", "", "", "0 0 1, 1 1 2"]);
    }

    #[test]
    fn point_rows_append_coordinates() {
        let schema = Schema::new(["ID", "Layer"]);
        let mut b = SummaryBuilder::for_points(&schema);
        b.push_point(&["7".to_string(), "north".to_string()], Point3::new(10.0, 20.0, 3.5));
        assert_eq!(b.columns(), ["ID", "Layer", "Ortho_ft", "X_ft", "Y_ft"]);
        let t = b.finish("points");
        let row = t.rows().next().unwrap();
        assert_eq!(row.get("Ortho_ft"), Some("3.5"));
        assert_eq!(row.get("X_ft"), Some("10"));
    }
}
