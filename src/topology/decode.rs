use std::fmt;
use std::str::FromStr;

use geo::Geometry;
use geojson::feature::Id;
use serde_json::{Map, Value};
use topojson::{to_geojson, TopoJson};
use tracing::debug;

use crate::layer::{Feature, Layer};
use super::TopologyError;

/// A parsed TopoJSON topology. Arcs stay shared until a layer is requested.
pub struct Topology(topojson::Topology);

impl Topology {
    /// Parse a TopoJSON document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TopologyError> {
        let text = std::str::from_utf8(bytes)?;
        let parsed = TopoJson::from_str(text).map_err(|e| TopologyError::Parse(e.to_string()))?;
        match parsed {
            TopoJson::Topology(topology) => {
                debug!(arcs = topology.arcs.len(), objects = topology.objects.len(), "parsed topology");
                Ok(Self(topology))
            }
            _ => Err(TopologyError::NotATopology),
        }
    }

    /// Number of arcs in the topology.
    #[inline] pub fn arc_count(&self) -> usize { self.0.arcs.len() }

    /// Names of all top-level objects, sorted.
    pub fn object_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.objects.iter().map(|object| object.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Decode the named object into a layer, one row per member geometry.
    /// The returned layer carries no CRS; callers assign it.
    pub fn layer(&self, name: &str) -> Result<Layer, TopologyError> {
        if !self.0.objects.iter().any(|object| object.name == name) {
            return Err(TopologyError::UnknownLayer(name.to_string()));
        }

        let key = name.to_string();
        let collection = to_geojson(&self.0, &key)
            .map_err(|e| TopologyError::Convert { layer: key.clone(), message: e.to_string() })?;

        let mut features = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            features.extend(rows(feature)?);
        }
        Ok(Layer::new(name, features))
    }
}

impl fmt::Debug for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topology")
            .field("arcs", &self.arc_count())
            .field("objects", &self.object_names())
            .finish()
    }
}

/// Rows of one converted feature. A null geometry yields none; a geometry
/// collection yields one row per member, each with the feature's attributes.
fn rows(feature: geojson::Feature) -> Result<Vec<Feature>, TopologyError> {
    let id = object_id(&feature);
    let Some(geometry) = feature.geometry else { return Ok(Vec::new()) };
    let geometry = Geometry::<f64>::try_from(geometry.value)
        .map_err(|e| TopologyError::Geometry(e.to_string()))?;

    let mut properties = feature.properties.unwrap_or_default();
    if let Some(id) = id {
        properties.entry("id").or_insert(id);
    }

    let mut out = Vec::new();
    flatten(geometry, &properties, &mut out);
    Ok(out)
}

/// The object-level `id`, wherever the conversion left it.
fn object_id(feature: &geojson::Feature) -> Option<Value> {
    match &feature.id {
        Some(Id::String(s)) => Some(Value::from(s.as_str())),
        Some(Id::Number(n)) => Some(Value::Number(n.clone())),
        None => feature.foreign_members.as_ref()?.get("id").cloned(),
    }
}

fn flatten(geometry: Geometry<f64>, properties: &Map<String, Value>, out: &mut Vec<Feature>) {
    match geometry {
        Geometry::GeometryCollection(collection) => {
            for member in collection.0 {
                flatten(member, properties, out);
            }
        }
        geometry => out.push(Feature { geometry, properties: properties.clone() }),
    }
}
