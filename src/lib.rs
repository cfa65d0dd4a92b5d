pub mod math;
pub use math::{Angle, Range, Rotor2, Unit, Vec2};

pub mod tilemap;
pub use tilemap::{ObjectLayer, ObjectShape, Properties, PropertyValue, TileObject};

pub mod collision;
pub use collision::{
    generate_convex_polygons, intersection_check, Contact, ConvexPolygon, GeometryError, Shape,
    AABB,
};

pub mod physics;
pub use physics::{Body, Physics, PhysicsError};
