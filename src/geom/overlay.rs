use anyhow::{bail, Result};
use geo::{BooleanOps, Geometry, MultiLineString, MultiPolygon};
use tracing::debug;

use crate::layer::{as_multilinestring, as_multipolygon, Feature, Layer};
use super::border::line_length;

/// Union of all shapes into a single MultiPolygon.
/// This may be slow for large numbers of complex polygons.
pub fn dissolve(shapes: &[MultiPolygon<f64>]) -> Option<MultiPolygon<f64>> {
    shapes.iter().cloned().reduce(|a, b| a.union(&b))
}

/// Remove from `shape` every area covered by `mask`.
#[inline]
pub fn subtract_area(shape: &MultiPolygon<f64>, mask: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    shape.difference(mask)
}

/// Remove from `lines` every part lying inside `mask`.
#[inline]
pub fn subtract_from_lines(lines: &MultiLineString<f64>, mask: &MultiPolygon<f64>) -> MultiLineString<f64> {
    mask.clip(lines, true)
}

/// Collapse a one-member MultiPolygon to a Polygon.
fn areal(shape: MultiPolygon<f64>) -> Geometry<f64> {
    match <[_; 1]>::try_from(shape.0) {
        Ok([polygon]) => Geometry::Polygon(polygon),
        Err(polygons) => Geometry::MultiPolygon(MultiPolygon(polygons)),
    }
}

/// Collapse a one-member MultiLineString to a LineString.
fn linear(lines: MultiLineString<f64>) -> Geometry<f64> {
    match <[_; 1]>::try_from(lines.0) {
        Ok([line]) => Geometry::LineString(line),
        Err(lines) => Geometry::MultiLineString(MultiLineString(lines)),
    }
}

impl Layer {
    /// Overlay difference: subtract the union of `mask`'s polygons from every row.
    /// Areal rows lose the covered area, linear rows lose the covered parts,
    /// other rows pass through. Zero-length line parts are discarded and rows
    /// left empty are dropped.
    pub fn difference(&self, mask: &Layer) -> Result<Layer> {
        if self.epsg() != mask.epsg() {
            bail!("[difference] CRS mismatch: {} is {:?}, {} is {:?}",
                self.name(), self.epsg(), mask.name(), mask.epsg());
        }

        let Some(mask_shape) = dissolve(&mask.polygons()) else {
            return Ok(self.clone());
        };

        let features: Vec<Feature> = self.features().iter()
            .filter_map(|feature| {
                let geometry = if let Some(shape) = as_multipolygon(&feature.geometry) {
                    let rest = subtract_area(&shape, &mask_shape);
                    if rest.0.is_empty() { return None }
                    areal(rest)
                } else if let Some(lines) = as_multilinestring(&feature.geometry) {
                    let parts: Vec<_> = subtract_from_lines(&lines, &mask_shape).0.into_iter()
                        .filter(|part| line_length(part) > 0.0)
                        .collect();
                    if parts.is_empty() { return None }
                    linear(MultiLineString(parts))
                } else {
                    feature.geometry.clone()
                };
                Some(Feature { geometry, properties: feature.properties.clone() })
            })
            .collect();

        debug!(layer = self.name(), mask = mask.name(), before = self.len(), after = features.len(), "overlay difference");
        Ok(self.with_features(features))
    }
}
