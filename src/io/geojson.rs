use std::path::Path;

use anyhow::{anyhow, Context, Result};
use geo::orient::{Direction, Orient};
use geo::{Coord, Geometry, LineString, Polygon};
use serde_json::{json, Value};
use tracing::info;

use crate::common::write_atomic;
use crate::layer::Layer;

#[inline]
fn position(c: &Coord<f64>) -> Value { json!([c.x, c.y]) }

fn line_coords(ls: &LineString<f64>) -> Value {
    Value::Array(ls.coords().map(position).collect())
}

/// Rings with exterior counter-clockwise and holes clockwise.
fn polygon_coords(polygon: &Polygon<f64>) -> Value {
    let polygon = polygon.orient(Direction::Default);
    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors())
        .map(line_coords)
        .collect();
    Value::Array(rings)
}

/// Convert a geometry to a serde_json::Value holding a GeoJSON geometry object.
pub fn geometry_to_geojson(geometry: &Geometry<f64>) -> Result<Value> {
    Ok(match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": position(&p.0) }),
        Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.0.iter().map(|p| position(&p.0)).collect::<Vec<_>>(),
        }),
        Geometry::Line(l) => json!({
            "type": "LineString",
            "coordinates": [position(&l.start), position(&l.end)],
        }),
        Geometry::LineString(ls) => json!({ "type": "LineString", "coordinates": line_coords(ls) }),
        Geometry::MultiLineString(mls) => json!({
            "type": "MultiLineString",
            "coordinates": mls.0.iter().map(line_coords).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(p) => json!({ "type": "Polygon", "coordinates": polygon_coords(p) }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_coords).collect::<Vec<_>>(),
        }),
        Geometry::Rect(r) => json!({ "type": "Polygon", "coordinates": polygon_coords(&r.to_polygon()) }),
        Geometry::Triangle(t) => json!({ "type": "Polygon", "coordinates": polygon_coords(&t.to_polygon()) }),
        Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.0.iter().map(geometry_to_geojson).collect::<Result<Vec<_>>>()?,
        }),
    })
}

/// Export a layer as a GeoJSON FeatureCollection. Properties are written as stored.
pub fn layer_to_geojson(layer: &Layer) -> Result<Value> {
    let features = layer.features().iter().enumerate()
        .map(|(idx, feature)| {
            let geometry = geometry_to_geojson(&feature.geometry)
                .with_context(|| anyhow!("[layer_to_geojson] {} feature {idx}", layer.name()))?;
            Ok(json!({
                "type": "Feature",
                "properties": feature.properties,
                "geometry": geometry,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "type": "FeatureCollection",
        "name": layer.name(),
        "features": features,
    }))
}

/// Write a layer to `path` as GeoJSON, replacing any existing file.
pub fn write_geojson(layer: &Layer, path: &Path) -> Result<()> {
    let collection = layer_to_geojson(layer)?;
    let bytes = serde_json::to_vec(&collection).context("Failed to serialize GeoJSON to bytes")?;
    write_atomic(path, &bytes)?;
    info!(layer = layer.name(), features = layer.len(), path = %path.display(), "wrote GeoJSON");
    Ok(())
}
