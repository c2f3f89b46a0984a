//! Doubly connected edge list of a simple polygon that gets cut into pieces by diagonals.
//!
//! Half-edges live in one arena and refer to each other by index. Boundary edge `i`
//! (from vertex `i` to vertex `i+1`) is half-edge `2*i`, its twin is `2*i+1`.
//! Diagonals are appended after the boundary.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{ang, is_clockwise, is_notch, Edge, Vertex};
use crate::io::SegmentFile;

pub type VertexId = usize;
pub type HalfEdgeId = usize;

#[derive(Clone, Copy, Debug)]
struct HalfEdge {
    origin: VertexId,
    twin: HalfEdgeId,
    prev: HalfEdgeId,
    next: HalfEdgeId,
}

#[derive(Clone, Debug)]
pub struct Dcel {
    vertices: Vec<Vertex>,
    half_edges: Vec<HalfEdge>,
    /// one incident half-edge per inner face
    faces: Vec<HalfEdgeId>,
    /// diagonals in insertion order, each given by the half-edge leaving its first end
    diagonals: Vec<HalfEdgeId>,
    /// for every vertex, the other ends of its diagonals
    diagonal_ends: Vec<BTreeSet<VertexId>>,
    notches: Vec<bool>,
}

impl Dcel {
    /// Builds the closed polygon. The vertices are stored clockwise, a counter-clockwise
    /// input is reversed.
    pub fn from_polygon(mut vertices: Vec<Vertex>) -> Result<Self> {
        let n = vertices.len();
        if n < 3 {
            return Err(Error::DegeneratePolygon(n));
        }
        if !is_clockwise(&vertices) {
            vertices.reverse();
        }

        let mut half_edges = Vec::with_capacity(2 * n);
        for i in 0..n {
            let succ = (i + 1) % n;
            let pred = (i + n - 1) % n;
            // along the boundary
            half_edges.push(HalfEdge { origin: i, twin: 2 * i + 1, prev: 2 * pred, next: 2 * succ });
            // against it
            half_edges.push(HalfEdge { origin: succ, twin: 2 * i, prev: 2 * succ + 1, next: 2 * pred + 1 });
        }

        let notches = (0..n)
            .map(|i| is_notch(vertices[(i + n - 1) % n], vertices[i], vertices[(i + 1) % n]))
            .collect();

        return Ok(Dcel {
            vertices,
            half_edges,
            faces: vec![0],
            diagonals: vec![],
            diagonal_ends: vec![BTreeSet::new(); n],
            notches,
        });
    }

    pub fn nvertices(&self) -> usize {
        self.vertices.len()
    }

    /// the polygon in clockwise order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, v: VertexId) -> Vertex {
        self.vertices[v]
    }

    pub fn is_notch(&self, v: VertexId) -> bool {
        self.notches[v]
    }

    pub fn ndiagonals(&self) -> usize {
        self.diagonals.len()
    }

    pub fn nfaces(&self) -> usize {
        self.faces.len()
    }

    fn origin(&self, e: HalfEdgeId) -> VertexId {
        self.half_edges[e].origin
    }

    fn twin(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[e].twin
    }

    fn next(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[e].next
    }

    fn prev(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[e].prev
    }

    /// half-edges around the face of `start`, beginning with `start`
    fn cycle(&self, start: HalfEdgeId) -> Vec<HalfEdgeId> {
        let mut out = vec![start];
        let mut e = self.next(start);
        while e != start && out.len() <= self.half_edges.len() {
            out.push(e);
            e = self.next(e);
        }
        return out;
    }

    /// vertex ids of every inner face, walked clockwise
    pub fn faces(&self) -> Vec<Vec<VertexId>> {
        self.faces
            .iter()
            .map(|&f| self.cycle(f).into_iter().map(|e| self.origin(e)).collect())
            .collect()
    }

    /// whether `a` and `b` are already joined, by the boundary or by a diagonal
    pub fn adjacent(&self, a: VertexId, b: VertexId) -> bool {
        let n = self.nvertices();
        (a + 1) % n == b
            || (b + 1) % n == a
            || self.diagonal_ends[a].contains(&b)
            || self.diagonal_ends[b].contains(&a)
    }

    /// Cuts off `polygon` by a diagonal from its last vertex to its first.
    /// Returns `false` when the two are adjacent already and nothing was added.
    pub fn add_diagonal(&mut self, polygon: &[VertexId]) -> Result<bool> {
        let (first, last) = match (polygon.first(), polygon.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => return Ok(false),
        };
        if self.adjacent(last, first) {
            return Ok(false);
        }

        // the face holding both ends, with the half-edges leaving them
        let mut found = None;
        for (fi, &f) in self.faces.iter().enumerate() {
            let cycle = self.cycle(f);
            let leaving = |v| cycle.iter().copied().find(|&e| self.origin(e) == v);
            if let (Some(from_first), Some(from_last)) = (leaving(first), leaving(last)) {
                found = Some((fi, from_first, from_last));
                break;
            }
        }
        let (face, from_first, from_last) = found.ok_or(Error::MissingFace(first, last))?;

        let diag = self.half_edges.len();
        let twin = diag + 1;
        let before_first = self.prev(from_first);
        let before_last = self.prev(from_last);
        self.half_edges.push(HalfEdge { origin: last, twin, prev: before_last, next: from_first });
        self.half_edges.push(HalfEdge { origin: first, twin: diag, prev: before_first, next: from_last });
        self.half_edges[before_last].next = diag;
        self.half_edges[before_first].next = twin;
        self.half_edges[from_last].prev = twin;
        self.half_edges[from_first].prev = diag;

        self.diagonals.push(diag);
        self.diagonal_ends[last].insert(first);
        self.diagonal_ends[first].insert(last);

        self.faces.swap_remove(face);
        self.faces.push(diag);
        self.faces.push(twin);
        debug!(from = last, to = first, "added diagonal");
        return Ok(true);
    }

    /// A diagonal may only go if each end either keeps more than two diagonals
    /// or is not a notch.
    fn removable(&self, s: VertexId, t: VertexId) -> bool {
        let ds = self.diagonal_ends[s].len();
        let dt = self.diagonal_ends[t].len();
        (ds > 2 && dt > 2)
            || (ds > 2 && !self.notches[t])
            || (dt > 2 && !self.notches[s])
            || (!self.notches[s] && !self.notches[t])
    }

    fn remove_diagonal(&mut self, d: HalfEdgeId) {
        let t = self.twin(d);
        let untouched = self
            .faces
            .iter()
            .copied()
            .filter(|&f| {
                let cycle = self.cycle(f);
                !cycle.contains(&d) && !cycle.contains(&t)
            })
            .collect();
        self.faces = untouched;

        let (d_prev, d_next) = (self.prev(d), self.next(d));
        let (t_prev, t_next) = (self.prev(t), self.next(t));
        self.half_edges[d_prev].next = t_next;
        self.half_edges[t_next].prev = d_prev;
        self.half_edges[d_next].prev = t_prev;
        self.half_edges[t_prev].next = d_next;

        self.faces.push(d_next);
    }

    /// Drops every diagonal whose removal keeps both merged corners convex.
    /// Diagonals are visited in insertion order, the survivors are the essential ones.
    pub fn merge(&mut self) {
        let mut essential = Vec::with_capacity(self.diagonals.len());
        for d in std::mem::take(&mut self.diagonals) {
            let t = self.twin(d);
            let (s, e) = (self.origin(d), self.origin(t));
            if self.removable(s, e) {
                // corner at s after the merge: from before s on this side to after s on the other
                let s_before = self.origin(self.prev(d));
                let s_after = self.origin(self.twin(self.next(t)));
                let e_before = self.origin(self.prev(t));
                let e_after = self.origin(self.twin(self.next(d)));
                let p = |v| self.vertex(v);
                if ang(p(s_before), p(s), p(s_after)) >= 0. && ang(p(e_before), p(e), p(e_after)) >= 0. {
                    self.diagonal_ends[s].remove(&e);
                    self.diagonal_ends[e].remove(&s);
                    self.remove_diagonal(d);
                    debug!(from = s, to = e, "removed diagonal");
                    continue;
                }
            }
            essential.push(d);
        }
        self.diagonals = essential;
    }

    /// the boundary edges in polygon order
    pub fn boundary(&self) -> Vec<Edge> {
        let n = self.nvertices();
        (0..n).map(|i| Edge::new(self.vertices[i], self.vertices[(i + 1) % n])).collect()
    }

    pub fn diagonals(&self) -> Vec<Edge> {
        self.diagonals
            .iter()
            .map(|&d| Edge::new(self.vertex(self.origin(d)), self.vertex(self.origin(self.twin(d)))))
            .collect()
    }

    /// vertices plus boundary edges followed by the current diagonals
    pub fn to_segment_file(&self) -> SegmentFile {
        let mut edges = self.boundary();
        edges.extend(self.diagonals());
        SegmentFile { vertices: self.vertices.clone(), edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples;

    /// faces rotated to start at their smallest vertex, sorted
    fn normalized_faces(d: &Dcel) -> Vec<Vec<VertexId>> {
        let mut faces = d.faces();
        for f in &mut faces {
            let start = (0..f.len()).min_by_key(|&i| f[i]).unwrap_or(0);
            f.rotate_left(start);
        }
        faces.sort();
        return faces;
    }

    #[test]
    fn closed_polygon() {
        let d = Dcel::from_polygon(examples::square()).unwrap();
        assert_eq!(d.nvertices(), 4);
        assert_eq!(d.faces(), vec![vec![0, 1, 2, 3]]);
        assert!(d.adjacent(0, 3));
        assert!(d.adjacent(2, 1));
        assert!(!d.adjacent(0, 2));
        assert!((0..4).all(|v| !d.is_notch(v)));
    }

    #[test]
    fn counter_clockwise_input_is_reversed() {
        let mut ccw = examples::square();
        ccw.reverse();
        let d = Dcel::from_polygon(ccw).unwrap();
        assert_eq!(d.vertices(), &examples::square()[..]);
        // the first boundary edge leaves vertex 0 towards vertex 1
        assert_eq!(d.boundary()[0], Edge::new(d.vertex(0), d.vertex(1)));
    }

    #[test]
    fn too_small() {
        let r = Dcel::from_polygon(vec![Vertex::new(0., 0.), Vertex::new(1., 1.)]);
        assert!(matches!(r, Err(Error::DegeneratePolygon(2))));
    }

    #[test]
    fn notch_detected() {
        let d = Dcel::from_polygon(examples::arrow()).unwrap();
        let notches: Vec<VertexId> = (0..d.nvertices()).filter(|&v| d.is_notch(v)).collect();
        assert_eq!(notches, vec![3]);
    }

    #[test]
    fn diagonal_splits_face() {
        let mut d = Dcel::from_polygon(examples::arrow()).unwrap();
        assert!(d.add_diagonal(&[0, 1, 2, 3]).unwrap());
        assert_eq!(normalized_faces(&d), vec![vec![0, 1, 2, 3], vec![0, 3, 4]]);
        assert!(d.adjacent(3, 0));
        // a second attempt is a no-op
        assert!(!d.add_diagonal(&[0, 1, 2, 3]).unwrap());
        assert_eq!(d.ndiagonals(), 1);
        assert_eq!(d.diagonals(), vec![Edge::new(d.vertex(3), d.vertex(0))]);
    }

    #[test]
    fn boundary_neighbours_get_no_diagonal() {
        let mut d = Dcel::from_polygon(examples::square()).unwrap();
        assert!(!d.add_diagonal(&[0, 1, 2, 3]).unwrap());
        assert_eq!(d.nfaces(), 1);
    }

    #[test]
    fn merge_removes_inessential_diagonal() {
        // both halves of the square are convex, so the cut is not needed
        let mut d = Dcel::from_polygon(examples::square()).unwrap();
        d.add_diagonal(&[0, 1, 2]).unwrap();
        assert_eq!(d.nfaces(), 2);
        d.merge();
        assert_eq!(d.ndiagonals(), 0);
        assert_eq!(d.faces().len(), 1);
        assert_eq!(d.faces()[0].len(), 4);
        assert!(!d.adjacent(0, 2));
    }

    #[test]
    fn merge_keeps_diagonal_at_notch() {
        let mut d = Dcel::from_polygon(examples::arrow()).unwrap();
        d.add_diagonal(&[0, 1, 2, 3]).unwrap();
        d.merge();
        assert_eq!(d.ndiagonals(), 1);
    }

    #[test]
    fn segment_file_layout() {
        let mut d = Dcel::from_polygon(examples::arrow()).unwrap();
        d.add_diagonal(&[0, 1, 2, 3]).unwrap();
        let s = d.to_segment_file();
        assert_eq!(s.vertices, examples::arrow());
        assert_eq!(s.edges.len(), 6);
        assert_eq!(s.edges[4], Edge::new(d.vertex(4), d.vertex(0)));
        assert_eq!(s.edges[5], Edge::new(d.vertex(3), d.vertex(0)));
    }
}
