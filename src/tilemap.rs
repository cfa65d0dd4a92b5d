//! The ingestion boundary: tile-map object records as the collision world
//! consumes them.
//!
//! Parsing a map file into these types is the host's job; the shape kind of
//! every object is decided once, here, as a closed enum, so the core never
//! inspects raw map fields.

use crate::math as m;
use std::collections::HashMap;

/// The geometric kind of a tile object.
///
/// Only `Rect` and `Polygon` produce collision shapes;
/// the rest are dropped at ingestion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum ObjectShape {
    /// The implicit default when a map object carries no other marker.
    Rect,
    /// Vertices are local offsets from the object's origin.
    Polygon { points: Vec<m::Vec2> },
    Polyline { points: Vec<m::Vec2> },
    Ellipse,
    /// A tile image stamped into the object layer.
    Tile { gid: u32 },
    Text,
}

/// One object out of a tile map's object layer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub struct TileObject {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation about the object origin in degrees, clockwise.
    pub rotation: f64,
    pub shape: ObjectShape,
    pub properties: Properties,
}

/// A named group of tile objects. A map usually carries several;
/// the collision world builds its shapes from one at a time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub struct ObjectLayer {
    pub name: String,
    pub objects: Vec<TileObject>,
}

/// A custom property value attached to a tile object.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PropertyValue {
    /// Interpret the value as a number where that makes sense.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Arbitrary key/value properties copied from a tile object onto
/// every collision shape generated from it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub struct Properties(HashMap<String, PropertyValue>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    /// The restitution coefficient, 0.0 when absent or non-numeric.
    pub fn bounce(&self) -> f64 {
        self.get("bounce")
            .and_then(PropertyValue::as_f64)
            .unwrap_or(0.0)
    }
}
