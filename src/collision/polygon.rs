//! Convex polygons and decomposition of arbitrary simple polygons
//! into convex pieces.

use crate::math::{self as m, Unit};

use itertools::Itertools;
use thiserror::Error;

/// Tolerance for cross products deciding whether a corner turns.
/// Corners straighter than this count as collinear.
const EPS: f64 = 1e-9;

/// Reasons polygon input can be rejected at ingestion time.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon has zero area")]
    ZeroArea,
    #[error("polygon outline is self-intersecting")]
    SelfIntersecting,
}

/// A polygon whose every interior angle is at most 180 degrees.
///
/// Vertices are stored in counterclockwise order (by the shoelace sign);
/// constructors re-wind their input if needed. Edge normals and the centroid
/// are derived once at construction, the value is immutable afterwards.
#[derive(Clone, Debug)]
pub struct ConvexPolygon {
    vertices: Vec<m::Vec2>,
    normals: Vec<Unit<m::Vec2>>,
    centre: m::Vec2,
}

impl ConvexPolygon {
    /// Create a polygon from vertices already known to be convex.
    pub fn new(vertices: Vec<m::Vec2>) -> Self {
        debug_assert!(vertices.len() >= 3);
        let mut vertices = vertices;
        if signed_area_doubled(&vertices) < 0.0 {
            vertices.reverse();
        }
        debug_assert!(is_convex(&vertices));
        Self::from_ccw(vertices)
    }

    /// The four-vertex polygon of an axis-aligned rectangle,
    /// wound so the derived normals point outward.
    pub fn from_rectangle(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::from_ccw(vec![
            m::Vec2::new(left, top),
            m::Vec2::new(right, top),
            m::Vec2::new(right, bottom),
            m::Vec2::new(left, bottom),
        ])
    }

    /// Vertices must already be counterclockwise and convex.
    fn from_ccw(vertices: Vec<m::Vec2>) -> Self {
        let normals = vertices
            .iter()
            .circular_tuple_windows()
            .map(|(a, b)| Unit::new_normalize(m::right_normal(*b - *a)))
            .collect();
        let centre = vertices.iter().fold(m::Vec2::zero(), |acc, v| acc + *v)
            / vertices.len() as f64;
        ConvexPolygon {
            vertices,
            normals,
            centre,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[m::Vec2] {
        &self.vertices
    }

    /// One outward unit normal per edge, in vertex order.
    #[inline]
    pub fn normals(&self) -> &[Unit<m::Vec2>] {
        &self.normals
    }

    /// The centroid, as the mean of the vertices.
    #[inline]
    pub fn centre(&self) -> m::Vec2 {
        self.centre
    }

    pub fn area(&self) -> f64 {
        signed_area_doubled(&self.vertices) * 0.5
    }

    /// The interval covered by the vertices projected onto an axis.
    ///
    /// The axis need not be unit length for overlap comparisons, but only
    /// projections onto unit axes are comparable as penetration depths.
    pub fn project_onto_axis(&self, axis: m::Vec2) -> m::Range {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in &self.vertices {
            let d = v.dot(axis);
            min = min.min(d);
            max = max.max(d);
        }
        m::Range::new(min, max)
    }
}

/// Decompose an arbitrary simple polygon into convex pieces whose union
/// covers the same area.
///
/// Input that is already convex comes back as a single piece with its
/// vertices intact (modulo winding direction). Concave input is ear-clipped
/// into triangles which are then greedily merged back together while the
/// union stays convex. Degenerate input (fewer than 3 vertices, zero area,
/// or an outline the clipper cannot resolve) is rejected with an error.
pub fn generate_convex_polygons(
    vertices: &[m::Vec2],
) -> Result<Vec<ConvexPolygon>, GeometryError> {
    if vertices.len() < 3 {
        return Err(GeometryError::TooFewVertices(vertices.len()));
    }
    let area2 = signed_area_doubled(vertices);
    if area2.abs() <= EPS {
        return Err(GeometryError::ZeroArea);
    }
    let mut verts = vertices.to_vec();
    if area2 < 0.0 {
        verts.reverse();
    }
    if is_convex(&verts) {
        return Ok(vec![ConvexPolygon::from_ccw(verts)]);
    }
    let triangles = ear_clip(&verts)?;
    let pieces = merge_pieces(triangles);
    Ok(pieces.into_iter().map(ConvexPolygon::from_ccw).collect())
}

/// Twice the shoelace area; positive for counterclockwise winding.
fn signed_area_doubled(vertices: &[m::Vec2]) -> f64 {
    vertices
        .iter()
        .circular_tuple_windows()
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum()
}

/// Cross product of (a - o) and (b - o); positive when the corner at `a`
/// turns left going o -> a -> b.
#[inline]
fn cross(o: m::Vec2, a: m::Vec2, b: m::Vec2) -> f64 {
    let oa = a - o;
    let ob = b - o;
    oa.x * ob.y - oa.y * ob.x
}

/// Every corner of a counterclockwise polygon turns left or goes straight.
/// Straight corners are allowed: an interior angle of exactly 180 degrees
/// is still convex.
fn is_convex(vertices: &[m::Vec2]) -> bool {
    vertices
        .iter()
        .circular_tuple_windows()
        .all(|(a, b, c)| cross(*a, *b, *c) >= -EPS)
}

fn point_in_triangle(p: m::Vec2, a: m::Vec2, b: m::Vec2, c: m::Vec2) -> bool {
    cross(a, b, p) >= -EPS && cross(b, c, p) >= -EPS && cross(c, a, p) >= -EPS
}

/// Ear clipping on a counterclockwise simple polygon.
/// Stalling without finding an ear means the outline self-intersects.
fn ear_clip(vertices: &[m::Vec2]) -> Result<Vec<Vec<m::Vec2>>, GeometryError> {
    let mut idx: Vec<usize> = (0..vertices.len()).collect();

    // drop straight and spike corners up front so every remaining corner turns
    let mut i = 0;
    while idx.len() > 3 && i < idx.len() {
        let n = idx.len();
        let prev = vertices[idx[(i + n - 1) % n]];
        let cur = vertices[idx[i]];
        let next = vertices[idx[(i + 1) % n]];
        if cross(prev, cur, next).abs() <= EPS {
            idx.remove(i);
            i = 0;
        } else {
            i += 1;
        }
    }

    let mut triangles = Vec::with_capacity(idx.len() - 2);
    while idx.len() > 3 {
        let n = idx.len();
        let mut clipped = false;
        for i in 0..n {
            let i_prev = (i + n - 1) % n;
            let i_next = (i + 1) % n;
            let prev = vertices[idx[i_prev]];
            let cur = vertices[idx[i]];
            let next = vertices[idx[i_next]];
            if cross(prev, cur, next) <= EPS {
                // reflex corner, not an ear
                continue;
            }
            let ear_is_clear = (0..n).all(|j| {
                j == i_prev
                    || j == i
                    || j == i_next
                    || !point_in_triangle(vertices[idx[j]], prev, cur, next)
            });
            if ear_is_clear {
                triangles.push(vec![prev, cur, next]);
                idx.remove(i);
                clipped = true;
                break;
            }
        }
        if !clipped {
            return Err(GeometryError::SelfIntersecting);
        }
    }
    let last: Vec<m::Vec2> = idx.iter().map(|&i| vertices[i]).collect();
    // a crossing outline doesn't always stall the loop above; it can also
    // leave an inverted (clockwise) remainder triangle behind
    if cross(last[0], last[1], last[2]) <= EPS {
        return Err(GeometryError::SelfIntersecting);
    }
    triangles.push(last);
    Ok(triangles)
}

/// Greedily merge pieces across shared edges while the union stays convex
/// (the Hertel-Mehlhorn idea, without the optimality bookkeeping).
fn merge_pieces(mut pieces: Vec<Vec<m::Vec2>>) -> Vec<Vec<m::Vec2>> {
    loop {
        let mut merged_any = false;
        'search: for i in 0..pieces.len() {
            for j in (i + 1)..pieces.len() {
                if let Some(merged) = try_merge(&pieces[i], &pieces[j]) {
                    pieces[i] = merged;
                    pieces.swap_remove(j);
                    merged_any = true;
                    break 'search;
                }
            }
        }
        if !merged_any {
            return pieces;
        }
    }
}

/// Stitch two pieces across a shared edge if the result is convex.
///
/// Vertex comparison is exact: clipping never invents new vertices, so a
/// shared edge means bitwise-identical endpoints in both pieces.
fn try_merge(p1: &[m::Vec2], p2: &[m::Vec2]) -> Option<Vec<m::Vec2>> {
    let n = p1.len();
    let m_ = p2.len();
    for i in 0..n {
        let a = p1[i];
        let b = p1[(i + 1) % n];
        // a shared edge runs a -> b in p1 and b -> a in p2
        let Some(j) = p2.iter().position(|&v| v == b) else {
            continue;
        };
        if p2[(j + 1) % m_] != a {
            continue;
        }
        let mut merged = Vec::with_capacity(n + m_ - 2);
        merged.extend_from_slice(&p1[..=i]);
        // p2's boundary from a around to b, endpoints excluded
        let mut k = (j + 2) % m_;
        while k != j {
            merged.push(p2[k]);
            k = (k + 1) % m_;
        }
        merged.extend_from_slice(&p1[i + 1..]);
        if is_convex(&merged) {
            return Some(merged);
        }
        return None;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> m::Vec2 {
        m::Vec2::new(x, y)
    }

    #[test]
    fn rectangle_projects_to_its_extents() {
        let poly = ConvexPolygon::from_rectangle(2.0, 3.0, 12.0, 8.0);
        assert_eq!(
            poly.project_onto_axis(m::Vec2::unit_x()),
            m::Range::new(2.0, 12.0)
        );
        assert_eq!(
            poly.project_onto_axis(m::Vec2::unit_y()),
            m::Range::new(3.0, 8.0)
        );
    }

    #[test]
    fn rectangle_normals_point_outward() {
        let poly = ConvexPolygon::from_rectangle(0.0, 0.0, 10.0, 10.0);
        for (edge_start, normal) in poly.vertices().iter().zip(poly.normals()) {
            // every edge start lies on the outward side of the centre
            // along its own normal
            let outward = (*edge_start - poly.centre()).dot(**normal);
            assert!(outward > 0.0, "normal points inward");
            assert!((normal.mag() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn convex_input_comes_back_as_one_piece() {
        let verts = vec![v(0.0, 0.0), v(10.0, 0.0), v(13.0, 5.0), v(5.0, 9.0)];
        let pieces = generate_convex_polygons(&verts).unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].vertices().len(), 4);
    }

    #[test]
    fn convex_input_with_straight_corner_is_kept_whole() {
        // square with a redundant vertex in the middle of the top edge
        let verts = vec![
            v(0.0, 0.0),
            v(5.0, 0.0),
            v(10.0, 0.0),
            v(10.0, 10.0),
            v(0.0, 10.0),
        ];
        let pieces = generate_convex_polygons(&verts).unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].vertices().len(), 5);
    }

    #[test]
    fn l_shape_decomposes_into_convex_pieces_covering_its_area() {
        let verts = vec![
            v(0.0, 0.0),
            v(10.0, 0.0),
            v(10.0, 5.0),
            v(5.0, 5.0),
            v(5.0, 10.0),
            v(0.0, 10.0),
        ];
        let pieces = generate_convex_polygons(&verts).unwrap();
        assert!(pieces.len() >= 2, "an L shape cannot be one convex piece");
        let total_area: f64 = pieces.iter().map(|p| p.area()).sum();
        assert!((total_area - 75.0).abs() < 1e-9);
        for piece in &pieces {
            assert!(piece.vertices().len() >= 3);
            assert!(is_convex(piece.vertices()));
        }
    }

    #[test]
    fn degenerate_input_is_rejected() {
        assert_eq!(
            generate_convex_polygons(&[v(0.0, 0.0), v(1.0, 1.0)]).unwrap_err(),
            GeometryError::TooFewVertices(2)
        );
        assert_eq!(
            generate_convex_polygons(&[v(0.0, 0.0), v(5.0, 5.0), v(10.0, 10.0)]).unwrap_err(),
            GeometryError::ZeroArea
        );
    }

    #[test]
    fn self_intersecting_input_is_rejected() {
        // the edges (10, 0) -> (2, 3) and (10, 5) -> (0, 0) cross; clipping
        // this outline leaves a clockwise remainder instead of stalling
        assert_eq!(
            generate_convex_polygons(&[v(0.0, 0.0), v(10.0, 0.0), v(2.0, 3.0), v(10.0, 5.0)])
                .unwrap_err(),
            GeometryError::SelfIntersecting
        );
    }

    #[test]
    fn clockwise_input_is_rewound() {
        let verts = vec![v(0.0, 0.0), v(0.0, 10.0), v(10.0, 10.0), v(10.0, 0.0)];
        let pieces = generate_convex_polygons(&verts).unwrap();
        assert_eq!(pieces.len(), 1);
        assert!((pieces[0].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn random_star_polygons_decompose_without_losing_area() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x7115);
        for _ in 0..50 {
            // random radii around a circle always give a simple polygon
            let vert_count = rng.gen_range(5..16);
            let verts: Vec<m::Vec2> = (0..vert_count)
                .map(|i| {
                    let angle = i as f64 / vert_count as f64 * std::f64::consts::TAU;
                    let radius = rng.gen_range(2.0..10.0);
                    v(radius * angle.cos(), radius * angle.sin())
                })
                .collect();
            let expected_area = signed_area_doubled(&verts).abs() * 0.5;

            let pieces = generate_convex_polygons(&verts).unwrap();
            let total_area: f64 = pieces.iter().map(|p| p.area()).sum();
            assert!(
                (total_area - expected_area).abs() < 1e-6,
                "area changed: {} vs {}",
                total_area,
                expected_area
            );
            for piece in &pieces {
                assert!(is_convex(piece.vertices()));
            }
        }
    }
}
