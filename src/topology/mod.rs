//! Decoding of TopoJSON topologies into geometry tables.
//!
//! Parsing and arc resolution (quantization, delta encoding, reversed arcs)
//! are done by the `topojson` crate; this module turns its features into
//! [`Layer`](crate::Layer) rows.

mod decode;
mod error;

pub use decode::Topology;
pub use error::TopologyError;
