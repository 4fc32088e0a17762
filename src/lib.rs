#![doc = "Swiss administrative boundaries: topology archive to GeoJSON and map tiles"]
mod common;
pub mod config;
mod geom;
mod io;
mod layer;
mod pipeline;
mod tiles;
mod topology;

#[doc(inline)]
pub use config::PipelineConfig;

#[doc(inline)]
pub use layer::{Feature, Layer};

#[doc(inline)]
pub use topology::{Topology, TopologyError};

#[doc(inline)]
pub use geom::{dissolve, internal_borders, line_length, subtract_area, subtract_from_lines, Reprojector};

#[doc(inline)]
pub use io::{geometry_to_geojson, layer_to_geojson, write_geojson};

#[doc(inline)]
pub use pipeline::{canton_borders, fetch_topology, run, write_layers, DerivedLayers, SourceLayers, WrittenLayer};

#[doc(inline)]
pub use tiles::TileJob;
