use ahash::AHashSet;
use geo::{BoundingRect, LineString, MultiPolygon};
use tracing::debug;

use super::merge::merge_segments;
use super::overlay::dissolve;
use super::segment::{ring_segments, Segment, SegmentIndex};

/// Relative snapping tolerance between input rings and the dissolved outline.
const COVER_TOLERANCE: f64 = 1e-7;

/// Union of every ring segment of every shape. Shared edges appear once.
pub(crate) fn union_boundaries(shapes: &[MultiPolygon<f64>]) -> Vec<Segment> {
    let mut seen = AHashSet::new();
    shapes.iter()
        .flat_map(ring_segments)
        .filter(|s| !s.is_degenerate() && seen.insert(s.key()))
        .collect()
}

/// Segments of the boundary of the dissolved shapes (outer silhouette and hole rings).
pub(crate) fn outer_boundary(shapes: &[MultiPolygon<f64>]) -> Vec<Segment> {
    dissolve(shapes).map(|union| ring_segments(&union)).unwrap_or_default()
}

/// Length of a line; zero for degenerate lines.
#[inline]
pub fn line_length(line: &LineString<f64>) -> f64 {
    line.lines().map(|l| l.dx().hypot(l.dy())).sum()
}

/// Borders shared between shapes, merged into maximal single-part lines.
///
/// The union of all shape boundaries minus the boundary of the shapes'
/// union leaves the internal edges. Shapes that share no edge contribute
/// nothing. Zero-length lines are dropped.
pub fn internal_borders(shapes: &[MultiPolygon<f64>]) -> Vec<LineString<f64>> {
    let boundaries = union_boundaries(shapes);
    let silhouette = SegmentIndex::new(outer_boundary(shapes));

    let tol = shapes.iter()
        .filter_map(|s| s.bounding_rect())
        .map(|r| r.width().max(r.height()))
        .fold(0.0, f64::max)
        * COVER_TOLERANCE;

    let internal: Vec<Segment> = boundaries.into_iter()
        .filter(|s| !silhouette.covers(s, tol))
        .collect();

    let lines: Vec<LineString<f64>> = merge_segments(&internal).into_iter()
        .filter(|line| line_length(line) > 0.0)
        .collect();

    debug!(silhouette = silhouette.len(), internal = internal.len(), lines = lines.len(), "internal borders");
    lines
}
