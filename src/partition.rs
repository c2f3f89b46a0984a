//! Convex decomposition of a simple polygon: split by convex chains, then merge
//! the pieces back where a diagonal turns out to be unnecessary.

use tracing::{debug, info};

use crate::dcel::{Dcel, VertexId};
use crate::error::{Error, Result};
use crate::geometry::{ang, inside_polygon, is_notch, same_side, segments_cross, Rect, Vertex};

fn points(dcel: &Dcel, ids: &[VertexId]) -> Vec<Vertex> {
    ids.iter().map(|&v| dcel.vertex(v)).collect()
}

/// Grows a convex chain from the head of `remaining` as long as closing it back
/// to the start keeps every corner convex.
fn convex_chain(dcel: &Dcel, remaining: &[VertexId]) -> Vec<VertexId> {
    let n = remaining.len();
    let p = |v: VertexId| dcel.vertex(v);
    let mut chain = vec![remaining[0], remaining[1]];
    while chain.len() < n {
        let i = chain.len() - 1;
        let candidate = remaining[i + 1];
        let convex = ang(p(chain[i - 1]), p(chain[i]), p(candidate)) >= 0.
            && ang(p(chain[i]), p(candidate), p(chain[0])) >= 0.
            && ang(p(candidate), p(chain[0]), p(chain[1])) >= 0.;
        if !convex {
            break;
        }
        chain.push(candidate);
    }
    return chain;
}

/// Drops the chain's tail up to the first vertex on the far side of the line
/// through the chain start and `notch`.
fn cut_at_notch(dcel: &Dcel, chain: &mut Vec<VertexId>, notch: VertexId) {
    let p = |v: VertexId| dcel.vertex(v);
    let last = match chain.pop() {
        Some(last) => last,
        None => return,
    };
    while chain.len() > 2 {
        let tail = chain[chain.len() - 1];
        if same_side(p(chain[0]), p(notch), p(last), p(tail)) {
            chain.pop();
        } else {
            break;
        }
    }
}

/// whether the segment `a`-`b` runs through the inside of the polygon `remaining`
fn diagonal_inside(dcel: &Dcel, remaining: &[VertexId], a: VertexId, b: VertexId) -> bool {
    let p = |v: VertexId| dcel.vertex(v);
    let n = remaining.len();
    for i in 0..n {
        let (u, w) = (remaining[i], remaining[(i + 1) % n]);
        if [u, w].contains(&a) || [u, w].contains(&b) {
            continue;
        }
        if segments_cross(p(a), p(b), p(u), p(w)) {
            return false;
        }
    }
    let (pa, pb) = (p(a), p(b));
    let mid = Vertex::new((pa.x + pb.x) / 2., (pa.y + pb.y) / 2.);
    inside_polygon(&points(dcel, remaining), mid)
}

/// Splits the polygon into convex pieces by adding diagonals to `dcel`.
/// Returns the pieces that were cut off, in order.
pub fn split(dcel: &mut Dcel) -> Result<Vec<Vec<VertexId>>> {
    let mut remaining: Vec<VertexId> = (0..dcel.nvertices()).collect();
    let mut pieces = vec![];
    // consecutive rounds without cutting anything off
    let mut idle = 0;

    while remaining.len() > 3 {
        let n = remaining.len();
        let mut chain = convex_chain(dcel, &remaining);

        if chain.len() == n {
            debug!(size = n, "remainder is convex");
            pieces.push(chain);
            break;
        }

        let notches: Vec<VertexId> = (chain.len()..n)
            .filter(|&j| {
                let p = |k: usize| dcel.vertex(remaining[k % n]);
                is_notch(p(j - 1), p(j), p(j + 1))
            })
            .map(|j| remaining[j])
            .collect();

        loop {
            let corners = points(dcel, &chain);
            let rect = match Rect::around(corners.iter().copied()) {
                Some(rect) => rect,
                None => break,
            };
            let inside = notches
                .iter()
                .copied()
                .filter(|&v| rect.contains_strictly(dcel.vertex(v)))
                .find(|&v| inside_polygon(&corners, dcel.vertex(v)));
            match inside {
                Some(notch) => cut_at_notch(dcel, &mut chain, notch),
                None => break,
            }
        }

        // the closing diagonal must not leave the remainder
        while chain.len() > 2 && !diagonal_inside(dcel, &remaining, chain[0], chain[chain.len() - 1]) {
            chain.pop();
        }

        let keep_from = chain.len() - 1;
        if chain.len() == 2 {
            idle += 1;
            if idle >= n {
                return Err(Error::SplitStalled(n));
            }
        } else {
            idle = 0;
            debug!(size = chain.len(), "convex piece");
            pieces.push(chain.clone());
        }

        // continue behind the piece, closing back to its start
        let mut next = remaining[keep_from..].to_vec();
        next.push(chain[0]);
        remaining = next;
    }

    for piece in &pieces {
        dcel.add_diagonal(piece)?;
    }
    info!(pieces = pieces.len(), diagonals = dcel.ndiagonals(), "split polygon");
    return Ok(pieces);
}

/// Split followed by merge, keeping a snapshot of every stage.
#[derive(Clone, Debug)]
pub struct Decomposition {
    pub polygon: Dcel,
    pub split: Dcel,
    pub merged: Dcel,
}

pub fn decompose(vertices: Vec<Vertex>) -> Result<Decomposition> {
    let polygon = Dcel::from_polygon(vertices)?;
    let mut split_dcel = polygon.clone();
    split(&mut split_dcel)?;
    let mut merged = split_dcel.clone();
    merged.merge();
    info!(
        vertices = polygon.nvertices(),
        split = split_dcel.ndiagonals(),
        essential = merged.ndiagonals(),
        "decomposed polygon"
    );
    return Ok(Decomposition { polygon, split: split_dcel, merged });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples;

    fn all_faces_convex(d: &Dcel) -> bool {
        d.faces().iter().all(|face| {
            let n = face.len();
            (0..n).all(|i| {
                let p = |k: usize| d.vertex(face[k % n]);
                ang(p(i), p(i + 1), p(i + 2)) >= 0.
            })
        })
    }

    #[test]
    fn convex_polygon_needs_no_diagonal() {
        let mut d = Dcel::from_polygon(examples::square()).unwrap();
        let pieces = split(&mut d).unwrap();
        assert_eq!(pieces, vec![vec![0, 1, 2, 3]]);
        assert_eq!(d.ndiagonals(), 0);
    }

    #[test]
    fn triangle_is_left_alone() {
        let tri = vec![Vertex::new(0., 0.), Vertex::new(0., 1.), Vertex::new(1., 0.)];
        let mut d = Dcel::from_polygon(tri).unwrap();
        assert!(split(&mut d).unwrap().is_empty());
        assert_eq!(d.nfaces(), 1);
    }

    #[test]
    fn arrow_is_cut_at_its_notch() {
        let mut d = Dcel::from_polygon(examples::arrow()).unwrap();
        let pieces = split(&mut d).unwrap();
        assert_eq!(pieces, vec![vec![0, 1, 2, 3]]);
        assert_eq!(d.ndiagonals(), 1);
        assert_eq!(d.nfaces(), 2);
        assert!(all_faces_convex(&d));
    }

    #[test]
    fn comb_pieces_are_convex() {
        let result = decompose(examples::comb()).unwrap();
        assert_eq!(result.polygon.ndiagonals(), 0);
        // one cut behind every tooth
        assert_eq!(result.split.ndiagonals(), 3);
        assert!(all_faces_convex(&result.split));
        assert!(result.merged.ndiagonals() <= result.split.ndiagonals());
        assert_eq!(result.merged.nfaces(), result.merged.ndiagonals() + 1);
        assert!(all_faces_convex(&result.merged));
    }

    #[test]
    fn stalled_split_is_an_error() {
        // every closing diagonal of the last four vertices leaves the remainder
        let stuck = vec![
            Vertex::new(1., 3.),
            Vertex::new(0., 4.),
            Vertex::new(4., 3.),
            Vertex::new(0., 0.),
            Vertex::new(3., 3.),
        ];
        assert!(matches!(decompose(stuck), Err(Error::SplitStalled(4))));
        // self intersecting input
        let bowtie = vec![Vertex::new(0., 0.), Vertex::new(2., 2.), Vertex::new(2., 0.), Vertex::new(0., 2.)];
        assert!(matches!(decompose(bowtie), Err(Error::SplitStalled(4))));
    }

    #[test]
    fn decompose_rejects_segment() {
        assert!(matches!(decompose(vec![Vertex::new(0., 0.), Vertex::new(1., 0.)]), Err(Error::DegeneratePolygon(2))));
    }
}
