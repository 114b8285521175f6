//! Python-facing wrappers around the grid index.
//!
//! [`PyGridPhysics`] owns a Rust [`GridPhysics`] and forwards every call.
//! [`GridError`]s surface as `ValueError`. [`PyCollision`] is frozen, hashable
//! and ordered, so a returned Python `set` deduplicates exactly like the Rust
//! `HashSet`.

use std::collections::HashSet;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use radyx_grid::prelude::*;

fn grid_err(e: GridError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A position accepted from Python: a 2-tuple or an object with `.x`/`.y`.
#[derive(FromPyObject)]
pub enum PyPoint {
    Pair(f64, f64),
    Object { x: f64, y: f64 },
}

impl From<PyPoint> for Vector2 {
    fn from(p: PyPoint) -> Self {
        match p {
            PyPoint::Pair(x, y) | PyPoint::Object { x, y } => Vector2::new(x, y),
        }
    }
}

// ---------------------------------------------------------------------------
// Collision
// ---------------------------------------------------------------------------

/// An unordered pair of colliding bodies.
///
/// The side with the smaller `(entity_index, body_index)` is always `self`.
#[pyclass(name = "Collision", module = "radyx", frozen, eq, ord, hash)]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PyCollision {
    inner: Collision,
}

#[pymethods]
impl PyCollision {
    #[new]
    fn new(
        self_entity_index: usize,
        other_entity_index: usize,
        self_body_index: usize,
        other_body_index: usize,
    ) -> Self {
        Self {
            inner: Collision::new(
                self_entity_index,
                other_entity_index,
                self_body_index,
                other_body_index,
            ),
        }
    }

    #[getter]
    fn self_entity_index(&self) -> usize {
        self.inner.self_entity_index()
    }

    #[getter]
    fn other_entity_index(&self) -> usize {
        self.inner.other_entity_index()
    }

    #[getter]
    fn self_body_index(&self) -> usize {
        self.inner.self_body_index()
    }

    #[getter]
    fn other_body_index(&self) -> usize {
        self.inner.other_body_index()
    }

    /// Whether either side belongs to `entity_index`.
    fn involves(&self, entity_index: usize) -> bool {
        self.inner.involves(entity_index)
    }

    /// The `(entity_index, body_index)` partner of the given body, or None.
    fn other(&self, entity_index: usize, body_index: usize) -> Option<(usize, usize)> {
        self.inner.other(entity_index, body_index)
    }

    fn __repr__(&self) -> String {
        let ((se, sb), (oe, ob)) = self.inner.identities();
        format!("Collision(({se}, {sb}), ({oe}, {ob}))")
    }
}

impl From<Collision> for PyCollision {
    fn from(inner: Collision) -> Self {
        Self { inner }
    }
}

// ---------------------------------------------------------------------------
// GridPhysics
// ---------------------------------------------------------------------------

/// Uniform-grid broad phase for circles.
///
/// Usage from Python:
/// ```python
/// from radyx import GridPhysics
/// physics = GridPhysics(100, 10)
/// physics.add_static_circle(7, (50.0, 50.0), 4.0)
/// physics.reset()
/// physics.add_dynamic_circle(0, (20.0, 20.0), 5.0)
/// physics.add_dynamic_circle(1, (24.0, 20.0), 5.0)
/// collisions = physics.get_collisions()
/// ```
#[pyclass(name = "GridPhysics", module = "radyx")]
pub struct PyGridPhysics {
    inner: GridPhysics,
}

#[pymethods]
impl PyGridPhysics {
    /// Create an index over a `size x size` world.
    ///
    /// Args:
    ///     size: World extent along each axis (positive).
    ///     cell_size: Cell edge length (positive).
    ///     intra_entity_collisions: Report overlaps between bodies of the
    ///         same entity (default False).
    #[new]
    #[pyo3(signature = (size, cell_size, intra_entity_collisions=false))]
    fn new(size: usize, cell_size: usize, intra_entity_collisions: bool) -> PyResult<Self> {
        let inner = GridPhysics::with_config(GridConfig {
            size,
            cell_size,
            intra_entity_collisions,
        })
        .map_err(grid_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn size(&self) -> usize {
        self.inner.size()
    }

    #[getter]
    fn cell_size(&self) -> usize {
        self.inner.cell_size()
    }

    #[getter]
    fn grid_size(&self) -> usize {
        self.inner.grid_size()
    }

    #[getter]
    fn static_body_count(&self) -> usize {
        self.inner.static_body_count()
    }

    #[getter]
    fn dynamic_body_count(&self) -> usize {
        self.inner.dynamic_body_count()
    }

    /// Clear all dynamic bodies. Static bodies are kept.
    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Map `(min_x, min_y, max_x, max_y)` to the clamped inclusive cell range.
    fn get_grid_bounds(&self, bounds: (f64, f64, f64, f64)) -> (usize, usize, usize, usize) {
        self.inner.get_grid_bounds(Bounds::from(bounds)).to_tuple()
    }

    #[pyo3(signature = (entity_index, pos, radius, body_index=0, is_static=false))]
    fn add_circle(
        &mut self,
        entity_index: usize,
        pos: PyPoint,
        radius: f64,
        body_index: usize,
        is_static: bool,
    ) -> PyResult<()> {
        self.inner
            .add_circle(entity_index, pos.into(), radius, body_index, is_static)
            .map_err(grid_err)
    }

    fn add_static_circle(
        &mut self,
        entity_index: usize,
        pos: PyPoint,
        radius: f64,
    ) -> PyResult<()> {
        self.inner
            .add_static_circle(entity_index, pos.into(), radius)
            .map_err(grid_err)
    }

    fn add_dynamic_circle(
        &mut self,
        entity_index: usize,
        pos: PyPoint,
        radius: f64,
    ) -> PyResult<()> {
        self.inner
            .add_dynamic_circle(entity_index, pos.into(), radius)
            .map_err(grid_err)
    }

    /// Register one static circle per position; `body_index` follows list order.
    fn add_static_circles(
        &mut self,
        entity_index: usize,
        bodies: Vec<PyPoint>,
        radius: f64,
    ) -> PyResult<()> {
        self.inner
            .add_static_circles(entity_index, bodies.into_iter().map(Vector2::from), radius)
            .map_err(grid_err)
    }

    /// Register one dynamic circle per position; `body_index` follows list order.
    fn add_dynamic_circles(
        &mut self,
        entity_index: usize,
        bodies: Vec<PyPoint>,
        radius: f64,
    ) -> PyResult<()> {
        self.inner
            .add_dynamic_circles(entity_index, bodies.into_iter().map(Vector2::from), radius)
            .map_err(grid_err)
    }

    /// Set of collisions involving at least one dynamic body.
    fn get_collisions(&self) -> HashSet<PyCollision> {
        self.inner
            .get_collisions()
            .into_iter()
            .map(PyCollision::from)
            .collect()
    }

    /// Collisions as a list in canonical order.
    fn get_collisions_sorted(&self) -> Vec<PyCollision> {
        self.inner
            .get_collisions_sorted()
            .into_iter()
            .map(PyCollision::from)
            .collect()
    }

    /// Entity indices of all bodies overlapping the given circle.
    fn get_collisions_within_area(
        &self,
        position: PyPoint,
        radius: f64,
    ) -> PyResult<HashSet<usize>> {
        self.inner
            .get_collisions_within_area(position.into(), radius)
            .map_err(grid_err)
    }

    fn __repr__(&self) -> String {
        let stats = self.inner.stats();
        format!(
            "GridPhysics(size={}, cell_size={}, static={}, dynamic={})",
            self.inner.size(),
            self.inner.cell_size(),
            stats.static_bodies,
            stats.dynamic_bodies,
        )
    }
}
