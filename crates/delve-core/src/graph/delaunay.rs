//! Bowyer-Watson Delaunay triangulation and its Voronoi dual

use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::{Point, Segment};

use super::spanning::ConnectivityTracker;

#[derive(Debug, Clone, Copy)]
struct Triangle {
    v: [usize; 3],
    cx: f64,
    cy: f64,
    r2: f64,
}

impl Triangle {
    /// Build a triangle, or `None` if the corners are collinear
    fn new(v: [usize; 3], pts: &[(f64, f64)]) -> Option<Self> {
        let (ax, ay) = pts[v[0]];
        let (bx, by) = pts[v[1]];
        let (cx, cy) = pts[v[2]];

        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
        if d.abs() < 1e-9 {
            return None;
        }

        let a2 = ax * ax + ay * ay;
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
        let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
        let r2 = (ax - ux) * (ax - ux) + (ay - uy) * (ay - uy);

        Some(Self { v, cx: ux, cy: uy, r2 })
    }

    fn circumcircle_contains(&self, (x, y): (f64, f64)) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        dx * dx + dy * dy < self.r2
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [ordered(a, b), ordered(b, c), ordered(c, a)]
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// A triangulated point set
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    /// Corner indices into the input points
    pub triangles: Vec<[usize; 3]>,
    /// Unique undirected edges `(a, b)` with `a < b`, sorted
    pub edges: Vec<(usize, usize)>,
    /// Voronoi edges between circumcenters of adjacent triangles
    pub voronoi: Vec<Segment>,
}

/// Triangulate `points`.
///
/// Fewer than two points give no edges. Coincident points and collinear runs
/// that leave the triangulation disconnected are chained in (x, y) order, so
/// the edge set always connects every input point.
pub fn triangulate(points: &[Point]) -> Triangulation {
    let n = points.len();
    if n < 2 {
        return Triangulation::default();
    }

    // Coincident points are triangulated once, by their first occurrence
    let mut unique: Vec<usize> = Vec::with_capacity(n);
    let mut seen: BTreeSet<(u32, u32)> = BTreeSet::new();
    for (i, p) in points.iter().enumerate() {
        // adding zero folds -0.0 into 0.0
        if seen.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())) {
            unique.push(i);
        }
    }

    let mut pts: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for &(x, y) in &pts {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    // Super triangle, appended after the real points
    pts.push((mid_x - 100.0 * span, mid_y - 100.0 * span));
    pts.push((mid_x, mid_y + 100.0 * span));
    pts.push((mid_x + 100.0 * span, mid_y - 100.0 * span));

    let mut triangles: Vec<Triangle> = Triangle::new([n, n + 1, n + 2], &pts)
        .into_iter()
        .collect();

    for &i in &unique {
        let p = pts[i];

        let mut boundary: BTreeMap<(usize, usize), u32> = BTreeMap::new();
        triangles.retain(|t| {
            if t.circumcircle_contains(p) {
                for e in t.edges() {
                    *boundary.entry(e).or_insert(0) += 1;
                }
                false
            } else {
                true
            }
        });

        for (&(a, b), &count) in &boundary {
            if count == 1 {
                if let Some(t) = Triangle::new([a, b, i], &pts) {
                    triangles.push(t);
                }
            }
        }
    }

    triangles.retain(|t| t.v.iter().all(|&v| v < n));

    let mut edge_set: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut owners: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for (ti, t) in triangles.iter().enumerate() {
        for e in t.edges() {
            edge_set.insert(e);
            owners.entry(e).or_default().push(ti);
        }
    }

    let voronoi = owners
        .values()
        .filter(|tris| tris.len() == 2)
        .map(|tris| {
            let (a, b) = (&triangles[tris[0]], &triangles[tris[1]]);
            Segment::new(
                Point::new(a.cx as f32, a.cy as f32),
                Point::new(b.cx as f32, b.cy as f32),
            )
        })
        .collect();

    chain_disconnected(points, &mut edge_set);

    Triangulation {
        triangles: triangles.iter().map(|t| t.v).collect(),
        edges: edge_set.into_iter().collect(),
        voronoi,
    }
}

/// Link components left apart by degenerate input, walking points in (x, y) order
fn chain_disconnected(points: &[Point], edges: &mut BTreeSet<(usize, usize)>) {
    let mut tracker = ConnectivityTracker::new(points.len());
    for &(a, b) in edges.iter() {
        tracker.merge(a, b);
    }
    if tracker.all_connected() {
        return;
    }

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .x
            .total_cmp(&points[b].x)
            .then(points[a].y.total_cmp(&points[b].y))
            .then(a.cmp(&b))
    });

    for pair in order.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if !tracker.are_connected(a, b) {
            edges.insert(ordered(a, b));
            tracker.merge(a, b);
        }
    }
}
