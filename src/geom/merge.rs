use ahash::AHashMap;
use geo::{Coord, LineString};

use super::segment::{coord_key, Segment};

/// Merge segments into maximal continuous lines.
///
/// A line runs through every vertex shared by exactly two segments and stops
/// at endpoints and junctions (degree other than two). Components with no such
/// stop are closed rings and come out once, starting at their first-seen vertex.
/// Segments are expected to be unique; degenerate ones are ignored.
pub(crate) fn merge_segments(segments: &[Segment]) -> Vec<LineString<f64>> {
    let mut index: AHashMap<[u64; 2], usize> = AHashMap::new();
    let mut nodes: Vec<Coord<f64>> = Vec::new();
    let mut incident: Vec<Vec<usize>> = Vec::new();
    let mut edges: Vec<(usize, usize)> = Vec::with_capacity(segments.len());

    let mut node_id = |c: Coord<f64>, nodes: &mut Vec<Coord<f64>>, incident: &mut Vec<Vec<usize>>| -> usize {
        *index.entry(coord_key(c)).or_insert_with(|| {
            nodes.push(c);
            incident.push(Vec::new());
            nodes.len() - 1
        })
    };

    for segment in segments.iter().filter(|s| !s.is_degenerate()) {
        let u = node_id(segment.a(), &mut nodes, &mut incident);
        let v = node_id(segment.b(), &mut nodes, &mut incident);
        let e = edges.len();
        edges.push((u, v));
        incident[u].push(e);
        incident[v].push(e);
    }

    let mut visited = vec![false; edges.len()];
    let mut lines = Vec::new();

    let walk = |start: usize, first: usize, visited: &mut Vec<bool>| -> LineString<f64> {
        let mut coords = vec![nodes[start]];
        let (mut at, mut edge) = (start, first);
        loop {
            visited[edge] = true;
            let (u, v) = edges[edge];
            let next = if u == at { v } else { u };
            coords.push(nodes[next]);
            if incident[next].len() != 2 { break }
            match incident[next].iter().copied().find(|&e| !visited[e]) {
                Some(e) => { at = next; edge = e; }
                None => break, // ring closed
            }
        }
        LineString(coords)
    };

    // Open chains first: start at every endpoint / junction.
    for node in 0..nodes.len() {
        if incident[node].len() == 2 { continue }
        for i in 0..incident[node].len() {
            let edge = incident[node][i];
            if !visited[edge] {
                lines.push(walk(node, edge, &mut visited));
            }
        }
    }

    // Whatever is left forms closed rings.
    for edge in 0..edges.len() {
        if !visited[edge] {
            lines.push(walk(edges[edge].0, edge, &mut visited));
        }
    }

    lines
}
