/// A point in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Vertex { x, y }
    }
}

/// A line segment given by its two end points.
/// Edges carry their own coordinates, they are not indices into a vertex list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: Vertex,
    pub to: Vertex,
}

impl Edge {
    pub fn new(from: Vertex, to: Vertex) -> Self {
        Edge { from, to }
    }
}

/// Signed turn at `b` when walking `a -> b -> c`, in degrees.
/// Walking a clockwise polygon, convex corners are `>= 0` and reflex corners `< 0`.
pub fn ang(a: Vertex, b: Vertex, c: Vertex) -> f64 {
    let (ux, uy) = (b.x - a.x, b.y - a.y);
    let (vx, vy) = (b.x - c.x, b.y - c.y);
    let dot = ux * vx + uy * vy;
    let det = ux * vy - vx * uy;
    return det.atan2(dot).to_degrees();
}

pub fn is_notch(a: Vertex, b: Vertex, c: Vertex) -> bool {
    ang(a, b, c) < 0.
}

/// whether `p` and `q` lie on the same side of the line through `a` and `b`
/// (points on the line count as both sides)
pub fn same_side(a: Vertex, b: Vertex, p: Vertex, q: Vertex) -> bool {
    let side = |v: Vertex| (b.x - a.x) * (v.y - a.y) - (b.y - a.y) * (v.x - a.x);
    side(p) * side(q) >= 0.
}

/// whether the segments `p1`-`p2` and `q1`-`q2` cross in a single interior point
pub fn segments_cross(p1: Vertex, p2: Vertex, q1: Vertex, q2: Vertex) -> bool {
    let cross = |o: Vertex, a: Vertex, b: Vertex| (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x);
    cross(q1, q2, p1) * cross(q1, q2, p2) < 0. && cross(p1, p2, q1) * cross(p1, p2, q2) < 0.
}

/// Axis aligned box `[x_min, x_max] x [y_min, y_max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Rect {
    /// smallest box around all `points`, `None` if there are none
    pub fn around<I: IntoIterator<Item = Vertex>>(points: I) -> Option<Rect> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut r = Rect { x_min: first.x, x_max: first.x, y_min: first.y, y_max: first.y };
        for p in points {
            r.x_min = r.x_min.min(p.x);
            r.x_max = r.x_max.max(p.x);
            r.y_min = r.y_min.min(p.y);
            r.y_max = r.y_max.max(p.y);
        }
        Some(r)
    }

    pub fn grow(&self, margin: f64) -> Rect {
        Rect {
            x_min: self.x_min - margin,
            x_max: self.x_max + margin,
            y_min: self.y_min - margin,
            y_max: self.y_max + margin,
        }
    }

    /// strict containment, points on the border are outside
    pub fn contains_strictly(&self, v: Vertex) -> bool {
        self.x_min < v.x && v.x < self.x_max && self.y_min < v.y && v.y < self.y_max
    }
}

/// Even-odd ray casting. Polygons with less than three corners contain nothing.
pub fn inside_polygon(polygon: &[Vertex], v: Vertex) -> bool {
    let n = polygon.len();
    if n <= 2 {
        return false;
    }
    let mut inside = false;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if (a.y > v.y) != (b.y > v.y) {
            let crossing = (b.x - a.x) * (v.y - a.y) / (b.y - a.y) + a.x;
            if v.x < crossing {
                inside = !inside;
            }
        }
    }
    return inside;
}

/// Orientation test: positive area sum `(x2 - x1) * (y2 + y1)` means clockwise.
pub fn is_clockwise(polygon: &[Vertex]) -> bool {
    let n = polygon.len();
    let mut sum = 0.;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        sum += (b.x - a.x) * (b.y + a.y);
    }
    sum > 0.
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vertex {
        Vertex::new(x, y)
    }

    #[test]
    fn turn_sign() {
        // clockwise square
        let sq = [v(0., 0.), v(0., 1.), v(1., 1.), v(1., 0.)];
        assert!(is_clockwise(&sq));
        for i in 0..4 {
            assert!(ang(sq[i], sq[(i + 1) % 4], sq[(i + 2) % 4]) > 0.);
        }
        // reflex corner of a clockwise arrow head
        assert!(is_notch(v(4., 4.), v(2., 2.), v(4., 0.)));
        // straight line is not a notch
        assert!(!is_notch(v(0., 0.), v(1., 1.), v(2., 2.)));
    }

    #[test]
    fn orientation() {
        let ccw = [v(0., 0.), v(1., 0.), v(1., 1.), v(0., 1.)];
        assert!(!is_clockwise(&ccw));
        let cw: Vec<Vertex> = ccw.iter().rev().cloned().collect();
        assert!(is_clockwise(&cw));
    }

    #[test]
    fn sides() {
        assert!(same_side(v(0., 0.), v(1., 0.), v(5., 1.), v(-3., 2.)));
        assert!(!same_side(v(0., 0.), v(1., 0.), v(5., 1.), v(-3., -2.)));
        // vertical line
        assert!(same_side(v(0., 0.), v(0., 1.), v(2., 7.), v(1., -1.)));
        assert!(!same_side(v(0., 0.), v(0., 1.), v(2., 7.), v(-1., -1.)));
        // on the line
        assert!(same_side(v(0., 0.), v(1., 1.), v(2., 2.), v(-1., 5.)));
    }

    #[test]
    fn crossings() {
        assert!(segments_cross(v(0., 0.), v(2., 2.), v(0., 2.), v(2., 0.)));
        assert!(!segments_cross(v(0., 0.), v(1., 1.), v(0., 2.), v(2., 0.)));
        // touching at an end point is not a crossing
        assert!(!segments_cross(v(0., 0.), v(1., 1.), v(1., 1.), v(2., 0.)));
        assert!(!segments_cross(v(0., 0.), v(1., 0.), v(0., 1.), v(1., 1.)));
    }

    #[test]
    fn boxes() {
        assert_eq!(Rect::around(vec![]), None);
        let r = Rect::around(vec![v(1., 5.), v(-2., 3.), v(4., -1.)]).unwrap();
        assert_eq!(r, Rect { x_min: -2., x_max: 4., y_min: -1., y_max: 5. });
        assert!(r.contains_strictly(v(0., 0.)));
        assert!(!r.contains_strictly(v(4., 0.)));
        let g = r.grow(3.);
        assert_eq!(g, Rect { x_min: -5., x_max: 7., y_min: -4., y_max: 8. });
    }

    #[test]
    fn ray_casting() {
        let tri = [v(0., 0.), v(0., 4.), v(4., 0.)];
        assert!(inside_polygon(&tri, v(1., 1.)));
        assert!(!inside_polygon(&tri, v(3., 3.)));
        assert!(!inside_polygon(&tri[..2], v(0., 1.)));
    }
}
