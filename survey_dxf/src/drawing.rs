//! In-memory drawing document and the rules that turn projected survey
//! features into markers, outlines and labels.

use crate::geometry::{mean_center, middle_vertex, Point, Point3};
use crate::layers::{line_layer, polygon_layer, LayerManager, PointLayers};
use crate::styles::{AciColor, DisplayParams, FixQuality, LINE_COLOR, POLYGON_COLOR};

/// Geometry of a drawing entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Straight 3-D segment.
    Line { start: Point3, end: Point3 },
    /// Planar polyline at a single elevation.
    Polyline {
        vertices: Vec<Point>,
        elevation: f64,
        closed: bool,
    },
    /// 3-D point.
    Point(Point3),
    /// Single line of text anchored at `insert`.
    Text {
        insert: Point3,
        height: f64,
        value: String,
    },
}

/// A drawing entity placed on exactly one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub layer: String,
    pub color: AciColor,
    pub kind: EntityKind,
}

/// Layers plus an append-only entity list.
#[derive(Debug, Default)]
pub struct DrawingDocument {
    layers: LayerManager,
    entities: Vec<Entity>,
}

impl DrawingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entities on the named layer, in insertion order.
    pub fn entities_on<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.layer == layer)
    }

    /// Creates the layer if needed; existing layers are left alone.
    pub fn ensure_layer(&mut self, name: &str, color: AciColor) {
        self.layers.ensure_layer(name, color);
    }

    /// Appends an entity, registering its layer on first use.
    pub fn add(&mut self, layer: &str, color: AciColor, kind: EntityKind) {
        self.layers.ensure_layer(layer, color);
        self.entities.push(Entity {
            layer: layer.to_string(),
            color,
            kind,
        });
    }
}

/// Renders survey features into a [`DrawingDocument`].
#[derive(Debug)]
pub struct DrawingEmitter {
    doc: DrawingDocument,
    display: DisplayParams,
    baseline_elevation: f64,
}

impl DrawingEmitter {
    pub fn new(display: DisplayParams, baseline_elevation: f64) -> Self {
        Self {
            doc: DrawingDocument::new(),
            display,
            baseline_elevation,
        }
    }

    pub fn document(&self) -> &DrawingDocument {
        &self.doc
    }

    pub fn into_document(self) -> DrawingDocument {
        self.doc
    }

    /// X marker of half-width `marker_size` centered on `center`, plus a
    /// horizontal bar when `bisector` is set.
    pub fn marker(&mut self, layer: &str, center: Point3, color: AciColor, bisector: bool) {
        let s = self.display.marker_size;
        self.doc.add(
            layer,
            color,
            EntityKind::Line {
                start: center.offset(-s, -s),
                end: center.offset(s, s),
            },
        );
        self.doc.add(
            layer,
            color,
            EntityKind::Line {
                start: center.offset(-s, s),
                end: center.offset(s, -s),
            },
        );
        if bisector {
            self.doc.add(
                layer,
                color,
                EntityKind::Line {
                    start: center.offset(-s, 0.0),
                    end: center.offset(s, 0.0),
                },
            );
        }
    }

    /// Text label of the configured height.
    pub fn label(&mut self, layer: &str, insert: Point3, color: AciColor, value: &str) {
        self.doc.add(
            layer,
            color,
            EntityKind::Text {
                insert,
                height: self.display.text_height,
                value: value.to_string(),
            },
        );
    }

    /// Survey point: marker, elevation label and optional remarks label.
    pub fn survey_point(
        &mut self,
        layers: &PointLayers,
        at: Point3,
        fix: FixQuality,
        remarks: &str,
    ) {
        let color = fix.color();
        for name in layers.names() {
            self.doc.ensure_layer(name, color);
        }
        let s = self.display.marker_size;
        let h = self.display.text_height;
        self.marker(&layers.marker, at, color, fix.has_bisector());
        self.label(&layers.elevation, at.offset(s, s), color, &format!("{:.2}", at.z));
        if !remarks.trim().is_empty() {
            self.label(&layers.remarks, at.offset(s, -s - h), color, remarks);
        }
    }

    /// Open polyline at the baseline elevation, a 3-D point and marker at
    /// every vertex, and the name at vertex `len / 2`.
    pub fn line_feature(&mut self, name: &str, vertices: &[Point3]) {
        let layer = line_layer(name);
        self.outline(&layer, vertices, false, LINE_COLOR);
        if let Some(anchor) = middle_vertex(vertices) {
            if !name.is_empty() {
                self.label(&layer, anchor, LINE_COLOR, name);
            }
        }
    }

    /// Closed polyline at the baseline elevation, a 3-D point and marker at
    /// every vertex, and "name remarks" at the mean of the vertices.
    pub fn polygon_feature(&mut self, name: &str, remarks: &str, vertices: &[Point3]) {
        let layer = polygon_layer(name);
        self.outline(&layer, vertices, true, POLYGON_COLOR);
        let text = format!("{} {}", name, remarks).trim().to_string();
        if let Some(center) = mean_center(vertices) {
            if !text.is_empty() {
                self.label(&layer, center, POLYGON_COLOR, &text);
            }
        }
    }

    fn outline(&mut self, layer: &str, vertices: &[Point3], closed: bool, color: AciColor) {
        if vertices.is_empty() {
            return;
        }
        self.doc.add(
            layer,
            color,
            EntityKind::Polyline {
                vertices: vertices.iter().map(Point3::plan).collect(),
                elevation: self.baseline_elevation,
                closed,
            },
        );
        for v in vertices {
            self.doc.add(layer, color, EntityKind::Point(*v));
            self.marker(layer, *v, color, false);
        }
    }
}
