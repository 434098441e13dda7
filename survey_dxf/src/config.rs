//! Conversion settings, with per-pipeline defaults and JSON loading.

use serde::{Deserialize, Serialize};

use crate::crs::{ElevationModel, DEFAULT_GEOID_OFFSET};
use crate::error::{ConvertError, Result};
use crate::styles::DisplayParams;
use crate::table::SchemaMerge;

/// Everything that can be tuned for one conversion run.
///
/// Missing keys in a JSON file fall back to [`ConversionOptions::points`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    pub display: DisplayParams,
    pub elevation: ElevationModel,
    /// Instrument height in meters used when a row has none.
    pub default_instrument_height: f64,
    /// Elevation of line and polygon outlines.
    pub baseline_elevation: f64,
    pub schema_merge: SchemaMerge,
}

impl ConversionOptions {
    /// Defaults of the point pipeline: heights used as-is, no instrument
    /// height unless given.
    pub fn points() -> Self {
        Self {
            display: DisplayParams::default(),
            elevation: ElevationModel::direct(),
            default_instrument_height: 0.0,
            baseline_elevation: 0.0,
            schema_merge: SchemaMerge::Union,
        }
    }

    /// Defaults of the geometry pipeline: geoid offset applied, 1.6 m pole.
    pub fn geometry() -> Self {
        Self {
            elevation: ElevationModel::with_geoid_offset(DEFAULT_GEOID_OFFSET),
            default_instrument_height: 1.6,
            ..Self::points()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| ConvertError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Display sizes must be positive and every value finite.
    pub fn validate(&self) -> Result<()> {
        let d = &self.display;
        if !(d.marker_size.is_finite() && d.marker_size > 0.0) {
            return Err(ConvertError::Config(format!(
                "marker size must be positive, got {}",
                d.marker_size
            )));
        }
        if !(d.text_height.is_finite() && d.text_height > 0.0) {
            return Err(ConvertError::Config(format!(
                "text height must be positive, got {}",
                d.text_height
            )));
        }
        let finite = [
            ("geoid_offset", self.elevation.geoid_offset),
            ("default_instrument_height", self.default_instrument_height),
            ("baseline_elevation", self.baseline_elevation),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConvertError::Config(format!("{} is not finite", name)));
            }
        }
        Ok(())
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let opts =
            ConversionOptions::from_json_str(r#"{"display":{"marker_size":0.5,"text_height":1.0}}"#)
                .unwrap();
        assert_eq!(opts.display, DisplayParams::new(0.5, 1.0));
        assert_eq!(opts.elevation, ElevationModel::direct());
        assert_eq!(opts.schema_merge, SchemaMerge::Union);
    }

    #[test]
    fn geometry_defaults() {
        let opts = ConversionOptions::geometry();
        assert_eq!(opts.elevation.geoid_offset, 34.67);
        assert_eq!(opts.default_instrument_height, 1.6);
    }

    #[test]
    fn rejects_bad_sizes() {
        let err = ConversionOptions::from_json_str(
            r#"{"display":{"marker_size":0.0,"text_height":1.0},"schema_merge":"first_file"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
        assert!(ConversionOptions::from_json_str("not json").is_err());
    }
}
