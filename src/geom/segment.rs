use geo::{Coord, LineString, MultiPolygon};
use rstar::{RTree, RTreeObject, AABB};

/// Bit-exact identity of an undirected segment.
pub(crate) type SegmentKey = [u64; 4];

/// Bit-exact identity of a vertex. `-0.0` and `0.0` share a key.
#[inline]
pub(crate) fn coord_key(c: Coord<f64>) -> [u64; 2] {
    [(c.x + 0.0).to_bits(), (c.y + 0.0).to_bits()]
}

/// An undirected straight segment; endpoints are stored in lexicographic order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    a: Coord<f64>,
    b: Coord<f64>,
}

impl Segment {
    pub(crate) fn new(p: Coord<f64>, q: Coord<f64>) -> Self {
        if (p.x, p.y) <= (q.x, q.y) { Self { a: p, b: q } } else { Self { a: q, b: p } }
    }

    #[inline] pub(crate) fn a(&self) -> Coord<f64> { self.a }

    #[inline] pub(crate) fn b(&self) -> Coord<f64> { self.b }

    #[inline] pub(crate) fn is_degenerate(&self) -> bool { self.a == self.b }

    pub(crate) fn key(&self) -> SegmentKey {
        let [ax, ay] = coord_key(self.a);
        let [bx, by] = coord_key(self.b);
        [ax, ay, bx, by]
    }

    /// Point at parameter `t` in `[0, 1]` along the segment.
    #[inline]
    pub(crate) fn at(&self, t: f64) -> Coord<f64> {
        Coord { x: self.a.x + (self.b.x - self.a.x) * t, y: self.a.y + (self.b.y - self.a.y) * t }
    }

    /// Euclidean distance from `p` to the closest point of the segment.
    pub(crate) fn distance_to(&self, p: Coord<f64>) -> f64 {
        let (dx, dy) = (self.b.x - self.a.x, self.b.y - self.a.y);
        let len2 = dx * dx + dy * dy;
        let t = if len2 == 0.0 { 0.0 }
            else { (((p.x - self.a.x) * dx + (p.y - self.a.y) * dy) / len2).clamp(0.0, 1.0) };
        let c = self.at(t);
        (p.x - c.x).hypot(p.y - c.y)
    }
}

impl RTreeObject for Segment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.a.x, self.a.y], [self.b.x, self.b.y])
    }
}

/// Straight segments of a line, in order.
pub(crate) fn line_segments(line: &LineString<f64>) -> impl Iterator<Item = Segment> + '_ {
    line.lines().map(|l| Segment::new(l.start, l.end))
}

/// All ring segments (exteriors and holes) of a MultiPolygon.
pub(crate) fn ring_segments(shape: &MultiPolygon<f64>) -> Vec<Segment> {
    shape.0.iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .flat_map(line_segments)
        .collect()
}

/// R-tree over segments for "does this lie on that line set" queries.
#[derive(Debug, Clone)]
pub(crate) struct SegmentIndex {
    rtree: RTree<Segment>,
}

impl SegmentIndex {
    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        Self { rtree: RTree::bulk_load(segments) }
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.rtree.size() }

    /// True if `p` is within `tol` of any indexed segment.
    pub(crate) fn touches(&self, p: Coord<f64>, tol: f64) -> bool {
        let envelope = AABB::from_corners([p.x - tol, p.y - tol], [p.x + tol, p.y + tol]);
        self.rtree.locate_in_envelope_intersecting(&envelope)
            .any(|s| s.distance_to(p) <= tol)
    }

    /// True if `segment` runs along the indexed line set (sampled at five stations).
    pub(crate) fn covers(&self, segment: &Segment, tol: f64) -> bool {
        [0.0, 0.25, 0.5, 0.75, 1.0].iter().all(|&t| self.touches(segment.at(t), tol))
    }
}
