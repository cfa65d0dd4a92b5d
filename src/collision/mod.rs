pub mod polygon;
pub use polygon::{generate_convex_polygons, ConvexPolygon, GeometryError};

pub mod narrowphase;
pub use narrowphase::{intersection_check, Contact};

mod shape;
pub use shape::Shape;

use crate::math as m;

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    pub min: m::Vec2,
    pub max: m::Vec2,
}

impl AABB {
    pub fn new(min: m::Vec2, max: m::Vec2) -> Self {
        AABB { min, max }
    }

    /// The tight bounds of a vertex set, each side tracked independently.
    pub fn from_vertices<'a>(vertices: impl IntoIterator<Item = &'a m::Vec2>) -> Self {
        let mut vertices = vertices.into_iter();
        let first = vertices.next().copied().unwrap_or_default();
        let mut aabb = AABB::new(first, first);
        for v in vertices {
            aabb.min = aabb.min.min_by_component(*v);
            aabb.max = aabb.max.max_by_component(*v);
        }
        aabb
    }

    #[inline]
    pub fn overlaps(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn size(&self) -> m::Vec2 {
        self.max - self.min
    }
}
