//! DXF export of a [`DrawingDocument`].

use std::io::Write;

use dxf::entities::{Entity as DxfEntity, EntityType, Line, LwPolyline, ModelPoint, Text};
use dxf::enums::AcadVersion;
use dxf::{Color, Drawing, LwPolylineVertex};

use crate::drawing::{DrawingDocument, Entity, EntityKind};
use crate::error::{ConvertError, Result};
use crate::geometry::Point3;

fn point(p: Point3) -> dxf::Point {
    dxf::Point::new(p.x, p.y, p.z)
}

/// Builds a `dxf` drawing with every layer and entity of `doc`.
pub fn to_drawing(doc: &DrawingDocument) -> Drawing {
    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2000;

    for layer in doc.layers().iter() {
        let mut dxf_layer = dxf::tables::Layer::default();
        dxf_layer.name = layer.name.clone();
        dxf_layer.color = Color::from_index(layer.color.index());
        drawing.add_layer(dxf_layer);
    }

    for entity in doc.entities() {
        drawing.add_entity(convert_entity(entity));
    }
    drawing
}

fn convert_entity(entity: &Entity) -> DxfEntity {
    let specific = match &entity.kind {
        EntityKind::Line { start, end } => {
            let mut line = Line::default();
            line.p1 = point(*start);
            line.p2 = point(*end);
            EntityType::Line(line)
        }
        EntityKind::Polyline {
            vertices,
            elevation,
            closed,
        } => {
            let mut poly = LwPolyline::default();
            poly.set_is_closed(*closed);
            poly.elevation = *elevation;
            poly.vertices = vertices
                .iter()
                .map(|v| {
                    let mut vertex = LwPolylineVertex::default();
                    vertex.x = v.x;
                    vertex.y = v.y;
                    vertex
                })
                .collect();
            EntityType::LwPolyline(poly)
        }
        EntityKind::Point(p) => {
            let mut model_point = ModelPoint::default();
            model_point.location = point(*p);
            EntityType::ModelPoint(model_point)
        }
        EntityKind::Text {
            insert,
            height,
            value,
        } => {
            let mut text = Text::default();
            text.location = point(*insert);
            text.text_height = *height;
            text.value = value.clone();
            EntityType::Text(text)
        }
    };

    let mut dxf_entity = DxfEntity::new(specific);
    dxf_entity.common.layer = entity.layer.clone();
    dxf_entity.common.color = Color::from_index(entity.color.index());
    dxf_entity
}

/// Serializes `doc` as ASCII DXF.
pub fn write_dxf<W: Write>(doc: &DrawingDocument, writer: &mut W) -> Result<()> {
    to_drawing(doc)
        .save(writer)
        .map_err(|e| ConvertError::Dxf(e.to_string()))
}
