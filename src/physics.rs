//! The collision world: tile geometry ingestion and per-tick resolution of
//! a moving body against it.

use crate::{
    collision::{generate_convex_polygons, Shape, AABB},
    math::{self as m, Angle},
    tilemap::{ObjectLayer, ObjectShape, TileObject},
};

use thiserror::Error;

/// Penetration depth below which a bouncy contact is treated as resting.
/// Filters out the jitter of shallow contacts re-bouncing every tick.
const BOUNCE_THRESHOLD: f64 = 2.0;

#[derive(Clone, Debug, Error)]
pub enum PhysicsError {
    #[error("object layer \"{0}\" not found")]
    LayerNotFound(String),
    #[error("bad polygon in object layer")]
    Geometry(#[from] crate::collision::GeometryError),
}

/// An axis-aligned moving body, owned by the host game.
///
/// The collision world reads position, size and velocity, and writes
/// position, velocity and `contact_normal` during resolution.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub struct Body {
    /// Top-left corner.
    pub position: m::Vec2,
    pub size: m::Vec2,
    pub velocity: m::Vec2,
    /// Normalized sum of the normals of every contact in the latest
    /// resolution pass; hosts use it for things like grounded checks.
    pub contact_normal: m::Vec2,
}

impl Body {
    pub fn new(position: m::Vec2, size: m::Vec2) -> Self {
        Body {
            position,
            size,
            velocity: m::Vec2::zero(),
            contact_normal: m::Vec2::zero(),
        }
    }

    #[inline]
    pub fn aabb(&self) -> AABB {
        AABB::new(self.position, self.position + self.size)
    }
}

/// The collision world. Owns an ordered list of convex shapes built from
/// tile geometry and resolves bodies against them one shape at a time.
pub struct Physics {
    shapes: Vec<Shape>,
    pub gravity: m::Vec2,
}

impl Physics {
    pub fn new(gravity: m::Vec2) -> Self {
        Physics {
            shapes: Vec::new(),
            gravity,
        }
    }

    /// The current shape list, in resolution order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Replace the shape list with the geometry of the named object layer.
    ///
    /// Rectangle and polygon objects become collision shapes;
    /// every other object kind is dropped here.
    pub fn enable_object_layer(
        &mut self,
        layers: &[ObjectLayer],
        name: &str,
    ) -> Result<(), PhysicsError> {
        let layer = layers
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| PhysicsError::LayerNotFound(name.to_string()))?;

        self.shapes.clear();
        for object in &layer.objects {
            match &object.shape {
                ObjectShape::Rect => self.add_rectangle(object)?,
                ObjectShape::Polygon { points } => {
                    self.add_polygon(object, points)?;
                }
                // polylines, ellipses, tiles and text don't collide
                _ => {}
            }
        }
        log::debug!(
            "enabled object layer \"{}\": {} shapes",
            name,
            self.shapes.len()
        );
        Ok(())
    }

    /// Build shapes from a rectangle object, honoring its rotation.
    pub fn add_rectangle(&mut self, object: &TileObject) -> Result<(), PhysicsError> {
        let mut width_vec = m::Vec2::new(object.width, 0.0);
        let mut height_vec = m::Vec2::new(0.0, object.height);
        if object.rotation != 0.0 {
            // map rotation is clockwise degrees, rotors turn counterclockwise
            let rotor = m::Rotor2::from(Angle::Deg(-object.rotation));
            width_vec = rotor * width_vec;
            height_vec = rotor * height_vec;
        }
        let corners = [
            m::Vec2::zero(),
            width_vec,
            width_vec + height_vec,
            height_vec,
        ];
        self.add_polygon(object, &corners)
    }

    /// Build shapes from local polygon vertices: translate to world space,
    /// decompose into convex pieces and append them in generation order.
    pub fn add_polygon(
        &mut self,
        object: &TileObject,
        local_vertices: &[m::Vec2],
    ) -> Result<(), PhysicsError> {
        let origin = m::Vec2::new(object.x, object.y);
        let world_vertices: Vec<m::Vec2> =
            local_vertices.iter().map(|v| *v + origin).collect();
        for piece in generate_convex_polygons(&world_vertices)? {
            self.shapes.push(Shape::new(piece, object.properties.clone()));
        }
        Ok(())
    }

    /// Resolve a body against every shape, in list order.
    ///
    /// Each shape's position correction feeds into the test against the
    /// next one; this sequential pass is an intentional simplification,
    /// not simultaneous multi-contact solving.
    pub fn collide_with(&self, body: &mut Body) {
        let gravity_normal = m::normalized_or_zero(self.gravity);
        let mut contact_sum = m::Vec2::zero();

        for shape in &self.shapes {
            let Some(contact) = shape.check_body(&body.aabb()) else {
                continue;
            };
            contact_sum += *contact.normal;

            // push out, plus one extra unit along the normal so a body
            // sliding over the seam between adjacent tiles doesn't catch
            // on the boundary
            body.position -= contact.penetration;
            body.position += *contact.normal;

            let speed_normal = body.velocity.dot(*contact.normal);
            if speed_normal >= 0.0 {
                // already separating, no velocity response
                continue;
            }
            let velocity_normal = *contact.normal * speed_normal;
            let velocity_tangent = body.velocity - velocity_normal;

            let bounce = shape.properties().bounce();
            let new_velocity_normal =
                if bounce > 0.0 && contact.penetration.mag() > BOUNCE_THRESHOLD {
                    velocity_normal * -bounce
                } else {
                    m::Vec2::zero()
                };
            // friction is unimplemented, the tangential part passes through
            body.velocity = new_velocity_normal + velocity_tangent;

            if contact.normal.dot(self.gravity) < 0.0 {
                // floor-like contact, nudge against gravity so the body
                // doesn't rest embedded in the geometry
                body.position -= gravity_normal;
            }
        }

        body.contact_normal = m::normalized_or_zero(contact_sum);
    }
}
