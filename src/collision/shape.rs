use super::{intersection_check, AABB, Contact, ConvexPolygon};
use crate::tilemap::Properties;

/// One convex piece of tile geometry in the collision world:
/// a polygon, its bounding box, and the originating object's properties.
#[derive(Clone, Debug)]
pub struct Shape {
    polygon: ConvexPolygon,
    aabb: AABB,
    properties: Properties,
}

impl Shape {
    pub fn new(polygon: ConvexPolygon, properties: Properties) -> Self {
        let aabb = AABB::from_vertices(polygon.vertices());
        Shape {
            polygon,
            aabb,
            properties,
        }
    }

    #[inline]
    pub fn polygon(&self) -> &ConvexPolygon {
        &self.polygon
    }

    #[inline]
    pub fn aabb(&self) -> &AABB {
        &self.aabb
    }

    #[inline]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// The SAT predicate against a body rectangle,
    /// behind a bounding box rejection.
    pub fn check_body(&self, body_rect: &AABB) -> Option<Contact> {
        if !self.aabb.overlaps(body_rect) {
            return None;
        }
        intersection_check(&self.polygon, body_rect)
    }
}
