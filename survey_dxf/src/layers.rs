//! Drawing layers and the layer naming scheme.

use std::collections::HashMap;

use crate::styles::AciColor;

/// Prefix shared by every generated layer name.
pub const LAYER_PREFIX: &str = "v";

/// Representation of a drawing layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub color: AciColor,
}

impl Layer {
    /// Creates a new layer.
    pub fn new(name: &str, color: AciColor) -> Self {
        Self {
            name: name.to_string(),
            color,
        }
    }
}

/// Insertion-ordered registry of layers. A name is registered at most once.
#[derive(Debug, Default)]
pub struct LayerManager {
    layers: Vec<Layer>,
    index: HashMap<String, usize>,
}

impl LayerManager {
    /// Creates an empty layer manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the layer if it does not exist yet. Returns `true` when a new
    /// layer was added; an existing layer is left untouched.
    pub fn ensure_layer(&mut self, name: &str, color: AciColor) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.layers.len());
        self.layers.push(Layer::new(name, color));
        true
    }

    /// Retrieves a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.index.get(name).map(|&i| &self.layers[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterator over all layer names in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.name.as_str())
    }

    /// Iterator over all layers in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Layers a survey point is drawn on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointLayers {
    /// Parent layer, created for per-file layer sets only.
    pub base: Option<String>,
    /// X marker lines.
    pub marker: String,
    /// Elevation label.
    pub elevation: String,
    /// Remarks label.
    pub remarks: String,
}

impl PointLayers {
    /// `v-<source>` with `-X`, `-ORTHO` and `-ANNO` sublayers.
    pub fn for_source(source: &str) -> Self {
        let source = if source.is_empty() { "default" } else { source };
        let base = format!("{}-{}", LAYER_PREFIX, source);
        Self {
            marker: format!("{}-X", base),
            elevation: format!("{}-ORTHO", base),
            remarks: format!("{}-ANNO", base),
            base: Some(base),
        }
    }

    /// The single `v-points` layer shared by every point feature; remarks go
    /// to `v-points-ANNO`.
    pub fn shared() -> Self {
        let points = format!("{}-points", LAYER_PREFIX);
        Self {
            base: None,
            marker: points.clone(),
            elevation: points.clone(),
            remarks: format!("{}-ANNO", points),
        }
    }

    /// Every distinct layer name of this set, parent first.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(4);
        let all = self
            .base
            .iter()
            .chain([&self.marker, &self.elevation, &self.remarks]);
        for name in all {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }
        names
    }
}

/// Layer suffix for lines and polygons without a name.
pub const UNNAMED_FEATURE: &str = "unnamed";

fn feature_suffix(name: &str) -> &str {
    if name.is_empty() {
        UNNAMED_FEATURE
    } else {
        name
    }
}

/// Layer for one line feature.
pub fn line_layer(name: &str) -> String {
    format!("{}-lines-{}", LAYER_PREFIX, feature_suffix(name))
}

/// Layer for one polygon feature.
pub fn polygon_layer(name: &str) -> String {
    format!("{}-polygons-{}", LAYER_PREFIX, feature_suffix(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_layer_is_idempotent() {
        let mut mgr = LayerManager::new();
        assert!(mgr.ensure_layer("v-a", AciColor::RED));
        assert!(!mgr.ensure_layer("v-a", AciColor::YELLOW));
        assert_eq!(mgr.len(), 1);
        assert_eq!(mgr.layer("v-a").unwrap().color, AciColor::RED);
    }

    #[test]
    fn per_source_names() {
        let set = PointLayers::for_source("north");
        assert_eq!(set.names(), vec!["v-north", "v-north-X", "v-north-ORTHO", "v-north-ANNO"]);
        assert_eq!(PointLayers::for_source("").marker, "v-default-X");
    }

    #[test]
    fn shared_names() {
        let set = PointLayers::shared();
        assert_eq!(set.names(), vec!["v-points", "v-points-ANNO"]);
        assert_eq!(line_layer("fence"), "v-lines-fence");
        assert_eq!(polygon_layer("lot 4"), "v-polygons-lot 4");
        assert_eq!(line_layer(""), "v-lines-unnamed");
        assert_eq!(polygon_layer(""), "v-polygons-unnamed");
    }
}
