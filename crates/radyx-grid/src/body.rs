//! Circular bodies and their axis-aligned bounds.
//!
//! A [`Body`] is one circle tied to an `(entity_index, body_index)` identity.
//! Bodies are immutable once built: a moving body is modelled by clearing the
//! dynamic registry and inserting a fresh body at the new position.

use serde::{Deserialize, Serialize};

use crate::GridError;

// ---------------------------------------------------------------------------
// Vector2
// ---------------------------------------------------------------------------

/// A 2D point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Vector2 {
    /// Construct a point from its coordinates.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(self, other: Vector2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// The square box enclosing a circle of `radius` centred at `center`.
    #[inline]
    pub fn around(center: Vector2, radius: f64) -> Self {
        Self {
            min_x: center.x - radius,
            min_y: center.y - radius,
            max_x: center.x + radius,
            max_y: center.y + radius,
        }
    }

    /// `(min_x, min_y, max_x, max_y)`.
    #[inline]
    pub fn to_tuple(self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<(f64, f64, f64, f64)> for Bounds {
    fn from((min_x, min_y, max_x, max_y): (f64, f64, f64, f64)) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// One circle shape belonging to an entity.
///
/// `(entity_index, body_index)` identifies the body within the world for the
/// duration of a step. An entity made of several circles uses sequential
/// `body_index` values starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    entity_index: usize,
    body_index: usize,
    position: Vector2,
    radius: f64,
    is_static: bool,
}

impl Body {
    /// Build a body, rejecting non-positive or non-finite radii and
    /// non-finite positions.
    pub fn new(
        entity_index: usize,
        body_index: usize,
        position: Vector2,
        radius: f64,
        is_static: bool,
    ) -> Result<Self, GridError> {
        validate_circle(position, radius)?;
        Ok(Self {
            entity_index,
            body_index,
            position,
            radius,
            is_static,
        })
    }

    #[inline]
    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    #[inline]
    pub fn body_index(&self) -> usize {
        self.body_index
    }

    /// `(entity_index, body_index)`.
    #[inline]
    pub fn identity(&self) -> (usize, usize) {
        (self.entity_index, self.body_index)
    }

    #[inline]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The box `(x - r, y - r, x + r, y + r)` enclosing this circle.
    #[inline]
    pub fn get_bounds(&self) -> Bounds {
        Bounds::around(self.position, self.radius)
    }

    /// Narrow-phase overlap test. Touching circles count as overlapping.
    ///
    /// Compares squared quantities so no square root is taken. Identity is
    /// not considered: a body always overlaps itself.
    #[inline]
    pub fn collided(&self, other: &Body) -> bool {
        circles_overlap(self.position, self.radius, other.position, other.radius)
    }
}

/// Squared-distance overlap test shared by [`Body::collided`] and area queries.
#[inline]
pub(crate) fn circles_overlap(a: Vector2, ra: f64, b: Vector2, rb: f64) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

pub(crate) fn validate_circle(position: Vector2, radius: f64) -> Result<(), GridError> {
    if !(radius > 0.0 && radius.is_finite()) {
        return Err(GridError::InvalidRadius { radius });
    }
    if !position.is_finite() {
        return Err(GridError::NonFinitePosition {
            x: position.x,
            y: position.y,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
