//! Geometric derivations on layers: dissolve, internal borders, overlay difference, re-projection.

mod border;
mod merge;
mod overlay;
mod proj;
mod segment;

pub use border::{internal_borders, line_length};
pub use overlay::{dissolve, subtract_area, subtract_from_lines};
pub use proj::Reprojector;
