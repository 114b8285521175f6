//! Radyx Grid -- Uniform-grid broad phase for 2D circle collisions.
//!
//! This crate indexes circular bodies in a fixed `grid_size x grid_size`
//! lattice of square cells. Static bodies (walls, terrain) are registered once
//! at world-build time; dynamic bodies are cleared and re-registered every
//! simulation step. Each step the host asks for the set of overlapping pairs
//! that involve at least one dynamic body, and may issue radius queries at any
//! time.
//!
//! # Quick Start
//!
//! ```
//! use radyx_grid::prelude::*;
//!
//! let mut physics = GridPhysics::new(100, 10).unwrap();
//! physics.add_static_circle(7, Vector2::new(50.0, 50.0), 4.0).unwrap();
//!
//! // One simulation step.
//! physics.reset();
//! physics.add_dynamic_circle(0, Vector2::new(20.0, 20.0), 5.0).unwrap();
//! physics.add_dynamic_circle(1, Vector2::new(24.0, 20.0), 5.0).unwrap();
//!
//! let collisions = physics.get_collisions();
//! assert_eq!(collisions.len(), 1);
//! assert!(collisions.contains(&Collision::new(1, 0, 0, 0)));
//!
//! let nearby = physics.get_collisions_within_area(Vector2::new(50.0, 50.0), 1.0).unwrap();
//! assert!(nearby.contains(&7));
//! ```

#![deny(unsafe_code)]

pub mod body;
pub mod collision;
pub mod grid;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced when building or feeding a [`GridPhysics`](grid::GridPhysics).
///
/// All of these are caller mistakes detected at the call that introduced the
/// bad value. Out-of-world coordinates are *not* errors: they are clamped to
/// the boundary cells.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// The world extent must be a positive integer.
    #[error("world size must be positive, got {size}")]
    InvalidSize { size: usize },

    /// The cell edge length must be a positive integer.
    #[error("cell size must be positive, got {cell_size}")]
    InvalidCellSize { cell_size: usize },

    /// The cell storage for a `grid_size x grid_size` grid cannot be allocated.
    #[error("grid of {grid_size}x{grid_size} cells is too large to allocate")]
    GridTooLarge { grid_size: usize },

    /// Circle radii must be positive and finite.
    #[error("circle radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f64 },

    /// Circle centres must be finite.
    #[error("circle position must be finite, got ({x}, {y})")]
    NonFinitePosition { x: f64, y: f64 },

    /// A serialized [`GridConfig`](grid::GridConfig) could not be decoded.
    #[error("invalid grid config: {details}")]
    InvalidConfig { details: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::body::{Body, Bounds, Vector2};
    pub use crate::collision::Collision;
    pub use crate::grid::{CellCoord, CellRange, GridConfig, GridPhysics, GridStats};
    pub use crate::GridError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
