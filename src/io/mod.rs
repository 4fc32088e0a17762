//! File formats written by the pipeline.
//!
//! - `geojson` - RFC 7946 FeatureCollections, one file per output layer

pub(crate) mod geojson;

pub use geojson::{geometry_to_geojson, layer_to_geojson, write_geojson};
