use geo::{Geometry, MultiLineString, MultiPolygon};
use serde_json::{Map, Value};

use crate::config::OutputLayer;

/// One row of a layer: a geometry plus its attributes.
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub properties: Map<String, Value>,
}

impl Feature {
    /// A feature with no attributes.
    pub fn bare(geometry: impl Into<Geometry<f64>>) -> Self {
        Self { geometry: geometry.into(), properties: Map::new() }
    }
}

/// An in-memory geometry table, tagged with the EPSG code of its coordinates (if known).
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    features: Vec<Feature>,
    epsg: Option<u32>,
}

impl Layer {
    pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self { name: name.into(), features, epsg: None }
    }

    /// Declare the CRS of the coordinates without touching them.
    pub fn with_epsg(mut self, epsg: u32) -> Self {
        self.epsg = Some(epsg);
        self
    }

    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub fn epsg(&self) -> Option<u32> { self.epsg }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Feature] { &self.features }

    /// Replace the rows, keeping name and CRS.
    pub(crate) fn with_features(&self, features: Vec<Feature>) -> Self {
        Self { name: self.name.clone(), features, epsg: self.epsg }
    }

    /// Areal geometry of every row as a MultiPolygon; non-areal rows are skipped.
    pub fn polygons(&self) -> Vec<MultiPolygon<f64>> {
        self.features.iter().filter_map(|f| as_multipolygon(&f.geometry)).collect()
    }

    /// Linear geometry of every row as a MultiLineString; non-linear rows are skipped.
    pub fn lines(&self) -> Vec<MultiLineString<f64>> {
        self.features.iter().filter_map(|f| as_multilinestring(&f.geometry)).collect()
    }

    /// Keep only the columns of `output`, renamed and in its order.
    /// A source column missing from a row becomes `null`.
    pub fn select_columns(self, output: &OutputLayer) -> Self {
        let features = self.features.into_iter()
            .map(|Feature { geometry, mut properties }| {
                let properties = output.columns.iter()
                    .map(|&(to, from)| (to.to_string(), properties.remove(from).unwrap_or(Value::Null)))
                    .collect();
                Feature { geometry, properties }
            })
            .collect();
        Self { name: output.name.to_string(), features, epsg: self.epsg }
    }
}

pub(crate) fn as_multipolygon(geometry: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => Some(MultiPolygon(vec![p.clone()])),
        Geometry::MultiPolygon(mp) => Some(mp.clone()),
        Geometry::Rect(r) => Some(MultiPolygon(vec![r.to_polygon()])),
        _ => None,
    }
}

pub(crate) fn as_multilinestring(geometry: &Geometry<f64>) -> Option<MultiLineString<f64>> {
    match geometry {
        Geometry::LineString(ls) => Some(MultiLineString(vec![ls.clone()])),
        Geometry::MultiLineString(mls) => Some(mls.clone()),
        Geometry::Line(l) => Some(MultiLineString(vec![(*l).into()])),
        _ => None,
    }
}
