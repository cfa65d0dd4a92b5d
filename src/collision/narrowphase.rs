//! The SAT overlap test between a convex collision polygon and a moving
//! body's axis-aligned rectangle.

use super::{polygon::ConvexPolygon, AABB};
use crate::math::{self as m, Unit};

/// An intersection between a collision shape and a body rectangle.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Unit normal on the axis of least penetration,
    /// facing from the shape toward the body.
    pub normal: Unit<m::Vec2>,
    /// Displacement to subtract from the body's position to separate the two.
    pub penetration: m::Vec2,
    /// Penetration depth along `normal`.
    pub depth: f64,
}

/// Check a convex polygon against an axis-aligned rectangle.
///
/// Returns `None` as soon as any candidate axis separates the two.
pub fn intersection_check(poly: &ConvexPolygon, rect: &AABB) -> Option<Contact> {
    let body_poly =
        ConvexPolygon::from_rectangle(rect.min.x, rect.min.y, rect.max.x, rect.max.y);

    // The rectangle contributes no separating axes of its own: its normals
    // are exactly the world axes. Testing those first gives a cheap
    // rejection before the polygon's edge normals.
    let world_axes = [m::Vec2::unit_x(), m::Vec2::unit_y()];
    let axes = world_axes
        .into_iter()
        .chain(poly.normals().iter().map(|n| **n));

    let mut min_depth = f64::INFINITY;
    let mut min_axis = m::Vec2::zero();
    for axis in axes {
        let shape_range = poly.project_onto_axis(axis);
        let body_range = body_poly.project_onto_axis(axis);
        if shape_range.intersection(body_range).is_empty() {
            return None;
        }
        // the smaller of the two possible push-out distances; the overlap
        // length alone overstates it when one range contains the other
        let depth = (shape_range.max - body_range.min)
            .abs()
            .min((body_range.max - shape_range.min).abs());
        if depth < min_depth {
            min_depth = depth;
            min_axis = axis;
        }
    }

    // face the normal from the shape's centroid toward the body's
    let to_body = body_poly.centre() - poly.centre();
    let normal = if to_body.dot(min_axis) < 0.0 {
        -min_axis
    } else {
        min_axis
    };
    Some(Contact {
        normal: Unit::new_unchecked(normal),
        penetration: normal * -min_depth,
        depth: min_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_shape(left: f64, top: f64, right: f64, bottom: f64) -> ConvexPolygon {
        ConvexPolygon::from_rectangle(left, top, right, bottom)
    }

    fn body(left: f64, top: f64, right: f64, bottom: f64) -> AABB {
        AABB::new(m::Vec2::new(left, top), m::Vec2::new(right, bottom))
    }

    #[test]
    fn overlapping_rects_penetrate_along_the_shallow_axis() {
        let shape = rect_shape(0.0, 0.0, 10.0, 10.0);
        let contact = intersection_check(&shape, &body(7.0, 0.0, 17.0, 10.0)).unwrap();
        assert!((contact.depth - 3.0).abs() < 1e-12);
        assert_eq!(*contact.normal, m::Vec2::new(1.0, 0.0));
        // subtracting the penetration pushes the body out to the right
        assert_eq!(contact.penetration, m::Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn disjoint_rects_do_not_collide() {
        let shape = rect_shape(0.0, 0.0, 10.0, 10.0);
        assert!(intersection_check(&shape, &body(11.0, 0.0, 20.0, 10.0)).is_none());
        assert!(intersection_check(&shape, &body(0.0, -20.0, 10.0, -0.5)).is_none());
    }

    #[test]
    fn normal_faces_from_shape_toward_body() {
        let shape = rect_shape(0.0, 0.0, 10.0, 10.0);
        let contact = intersection_check(&shape, &body(-7.0, 0.0, 3.0, 10.0)).unwrap();
        assert_eq!(*contact.normal, m::Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn contained_body_uses_the_shorter_push_out_distance() {
        // the overlap interval is the body's own width (4), but the true
        // minimal push-out along x is 14 to clear the shape's left side
        let shape = rect_shape(0.0, 0.0, 100.0, 100.0);
        let contact = intersection_check(&shape, &body(10.0, 10.0, 14.0, 14.0)).unwrap();
        assert!((contact.depth - 14.0).abs() < 1e-12);
    }

    #[test]
    fn separating_axis_from_a_slanted_edge_is_found() {
        // right triangle with hypotenuse from (10, 0) to (0, 10); a body
        // near the hypotenuse overlaps both world-axis projections but not
        // the hypotenuse normal's
        let shape = ConvexPolygon::new(vec![
            m::Vec2::new(0.0, 0.0),
            m::Vec2::new(10.0, 0.0),
            m::Vec2::new(0.0, 10.0),
        ]);
        assert!(intersection_check(&shape, &body(7.0, 7.0, 9.0, 9.0)).is_none());
        // and just inside the hypotenuse there is a contact
        assert!(intersection_check(&shape, &body(3.0, 3.0, 5.0, 5.0)).is_some());
    }
}
