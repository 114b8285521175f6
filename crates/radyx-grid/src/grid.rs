//! Uniform spatial grid with a persistent static layer and a per-step dynamic
//! layer.
//!
//! The world is the square `[0, size) x [0, size)`, cut into
//! `grid_size x grid_size` cells of edge `cell_size` where
//! `grid_size = ceil(size / cell_size)`. A body is registered in every cell its
//! bounding box overlaps, so two bodies that overlap always share at least one
//! cell regardless of where the cell boundaries fall.
//!
//! Each step:
//!
//! 1. [`GridPhysics::reset`] empties the dynamic layer.
//! 2. The host re-inserts every dynamic body at its current position.
//! 3. [`GridPhysics::get_collisions`] returns the deduplicated overlap set.
//!
//! Static bodies are inserted once while building the world and are never
//! touched by `reset`. [`GridPhysics::get_collisions_within_area`] can be
//! called at any point in the cycle.
//!
//! # Storage
//!
//! Each layer owns its bodies in one `Vec`; cells hold indices into it. A
//! body spanning several cells is stored once, and clearing the dynamic layer
//! only visits the cells that were actually written during the step.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::body::{circles_overlap, validate_circle, Body, Bounds, Vector2};
use crate::collision::Collision;
use crate::GridError;

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Construction parameters for a [`GridPhysics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// World extent along each axis. Must be positive.
    pub size: usize,
    /// Edge length of one cell. Must be positive; need not divide `size`.
    pub cell_size: usize,
    /// Report overlaps between two bodies of the same entity. Off by default,
    /// so an entity built from several overlapping circles does not collide
    /// with itself.
    #[serde(default)]
    pub intra_entity_collisions: bool,
}

impl Default for GridConfig {
    /// Defaults to a 1000-unit world in 50-unit cells (20x20 grid).
    fn default() -> Self {
        Self {
            size: 1000,
            cell_size: 50,
            intra_entity_collisions: false,
        }
    }
}

impl GridConfig {
    /// Check the parameters and return the resulting `grid_size`.
    pub fn validate(&self) -> Result<usize, GridError> {
        if self.size == 0 {
            return Err(GridError::InvalidSize { size: self.size });
        }
        if self.cell_size == 0 {
            return Err(GridError::InvalidCellSize {
                cell_size: self.cell_size,
            });
        }
        let grid_size = self.size.div_ceil(self.cell_size);
        // Both layers hold one `Vec` per cell.
        let bytes = grid_size
            .checked_mul(grid_size)
            .and_then(|cells| cells.checked_mul(2 * std::mem::size_of::<Vec<usize>>()));
        match bytes {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(grid_size),
            _ => Err(GridError::GridTooLarge { grid_size }),
        }
    }

    /// Decode a config from JSON and validate it.
    ///
    /// `intra_entity_collisions` may be omitted.
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let config: GridConfig =
            serde_json::from_str(json).map_err(|e| GridError::InvalidConfig {
                details: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Cell addressing
// ---------------------------------------------------------------------------

/// Integer address of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    #[inline]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl CellRange {
    /// `(min_x, min_y, max_x, max_y)`.
    #[inline]
    pub fn to_tuple(self) -> (usize, usize, usize, usize) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Number of cells covered.
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.max_x - self.min_x + 1) * (self.max_y - self.min_y + 1)
    }

    #[inline]
    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.min_x..=self.max_x).contains(&cell.x) && (self.min_y..=self.max_y).contains(&cell.y)
    }

    /// Every cell in the rectangle, row by row.
    pub fn cells(self) -> impl Iterator<Item = CellCoord> {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| CellCoord::new(x, y)))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// One layer of the index: owned bodies plus per-cell slot lists.
#[derive(Debug)]
struct Registry {
    bodies: Vec<Body>,
    /// Cell range each body was registered under, parallel to `bodies`.
    ranges: Vec<CellRange>,
    /// Flattened `grid_size x grid_size` cells, row-major (`y * grid_size + x`).
    cells: Vec<Vec<usize>>,
    /// Indices of non-empty cells, in first-write order.
    occupied: Vec<usize>,
    registrations: usize,
}

impl Registry {
    fn new(grid_size: usize) -> Result<Self, GridError> {
        let cell_count = grid_size * grid_size;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(cell_count)
            .map_err(|_| GridError::GridTooLarge { grid_size })?;
        cells.resize_with(cell_count, Vec::new);
        Ok(Self {
            bodies: Vec::new(),
            ranges: Vec::new(),
            cells,
            occupied: Vec::new(),
            registrations: 0,
        })
    }

    fn insert(&mut self, body: Body, range: CellRange, grid_size: usize) {
        let slot = self.bodies.len();
        self.bodies.push(body);
        self.ranges.push(range);
        for cell in range.cells() {
            let index = cell.y * grid_size + cell.x;
            let bucket = &mut self.cells[index];
            if bucket.is_empty() {
                self.occupied.push(index);
            }
            bucket.push(slot);
        }
        self.registrations += range.cell_count();
    }

    fn clear(&mut self) {
        for index in self.occupied.drain(..) {
            self.cells[index].clear();
        }
        self.bodies.clear();
        self.ranges.clear();
        self.registrations = 0;
    }

    #[inline]
    fn cell(&self, index: usize) -> &[usize] {
        &self.cells[index]
    }

    #[inline]
    fn body(&self, slot: usize) -> &Body {
        &self.bodies[slot]
    }
}

// ---------------------------------------------------------------------------
// GridStats
// ---------------------------------------------------------------------------

/// Occupancy snapshot of a [`GridPhysics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridStats {
    pub grid_size: usize,
    pub static_bodies: usize,
    pub dynamic_bodies: usize,
    /// Cells holding at least one static body.
    pub occupied_static_cells: usize,
    /// Cells holding at least one dynamic body this step.
    pub occupied_dynamic_cells: usize,
    /// Total (body, cell) registrations across both layers.
    pub registrations: usize,
}

// ---------------------------------------------------------------------------
// GridPhysics
// ---------------------------------------------------------------------------

/// Broad-phase collision index over a uniform grid.
///
/// Not internally synchronized: drive it from a single update thread.
#[derive(Debug)]
pub struct GridPhysics {
    config: GridConfig,
    grid_size: usize,
    /// Static layer; grows monotonically.
    grid: Registry,
    /// Dynamic layer; emptied by [`reset`](Self::reset) every step.
    dynamic_bodies: Registry,
}

impl GridPhysics {
    /// Create an index over a `size x size` world with `cell_size` cells.
    pub fn new(size: usize, cell_size: usize) -> Result<Self, GridError> {
        Self::with_config(GridConfig {
            size,
            cell_size,
            ..Default::default()
        })
    }

    /// Create an index from a full [`GridConfig`].
    pub fn with_config(config: GridConfig) -> Result<Self, GridError> {
        let grid_size = config.validate()?;
        let grid = Registry::new(grid_size)?;
        let dynamic_bodies = Registry::new(grid_size)?;
        debug!(
            size = config.size,
            cell_size = config.cell_size,
            grid_size,
            "created grid physics"
        );
        Ok(Self {
            config,
            grid_size,
            grid,
            dynamic_bodies,
        })
    }

    // -- accessors ------------------------------------------------------------

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.config.size
    }

    pub fn cell_size(&self) -> usize {
        self.config.cell_size
    }

    /// Number of cells along each axis.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn static_body_count(&self) -> usize {
        self.grid.bodies.len()
    }

    /// Dynamic bodies inserted since the last [`reset`](Self::reset).
    pub fn dynamic_body_count(&self) -> usize {
        self.dynamic_bodies.bodies.len()
    }

    pub fn stats(&self) -> GridStats {
        GridStats {
            grid_size: self.grid_size,
            static_bodies: self.grid.bodies.len(),
            dynamic_bodies: self.dynamic_bodies.bodies.len(),
            occupied_static_cells: self.grid.occupied.len(),
            occupied_dynamic_cells: self.dynamic_bodies.occupied.len(),
            registrations: self.grid.registrations + self.dynamic_bodies.registrations,
        }
    }

    /// Bodies registered in `cell`, static layer first. Empty for cells
    /// outside the grid.
    pub fn bodies_in_cell(&self, cell: CellCoord) -> impl Iterator<Item = &Body> + '_ {
        let (statics, dynamics): (&[usize], &[usize]) = match self.cell_index(cell) {
            Some(index) => (self.grid.cell(index), self.dynamic_bodies.cell(index)),
            None => (&[], &[]),
        };
        let grid = &self.grid;
        let dynamic = &self.dynamic_bodies;
        statics
            .iter()
            .map(move |&slot| grid.body(slot))
            .chain(dynamics.iter().map(move |&slot| dynamic.body(slot)))
    }

    #[inline]
    fn cell_index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x < self.grid_size && cell.y < self.grid_size {
            Some(cell.y * self.grid_size + cell.x)
        } else {
            None
        }
    }

    // -- step cycle -----------------------------------------------------------

    /// Drop every dynamic registration. The static layer is untouched.
    pub fn reset(&mut self) {
        trace!(
            dynamic_bodies = self.dynamic_bodies.bodies.len(),
            "resetting dynamic layer"
        );
        self.dynamic_bodies.clear();
    }

    // -- cell mapping ---------------------------------------------------------

    /// Map a world-space box to the inclusive range of cells it overlaps.
    ///
    /// Coordinates are divided by `cell_size`, floored, and clamped into
    /// `[0, grid_size - 1]`, so boxes partly or wholly outside the world land
    /// in the nearest boundary cells.
    pub fn get_grid_bounds(&self, bounds: Bounds) -> CellRange {
        self.cell_range(&bounds)
    }

    /// Borrowing form of [`get_grid_bounds`](Self::get_grid_bounds).
    pub fn cell_range(&self, bounds: &Bounds) -> CellRange {
        CellRange {
            min_x: self.to_cell(bounds.min_x),
            min_y: self.to_cell(bounds.min_y),
            max_x: self.to_cell(bounds.max_x),
            max_y: self.to_cell(bounds.max_y),
        }
    }

    #[inline]
    fn to_cell(&self, coord: f64) -> usize {
        let last = self.grid_size - 1;
        let cell = (coord / self.config.cell_size as f64).floor();
        if cell >= last as f64 {
            last
        } else if cell > 0.0 {
            cell as usize
        } else {
            // Negative coordinates land in the first cell.
            0
        }
    }

    // -- insertion ------------------------------------------------------------

    /// Register one circle in every cell its bounding box overlaps.
    ///
    /// Static bodies go to the persistent layer, dynamic ones to the per-step
    /// layer.
    pub fn add_circle(
        &mut self,
        entity_index: usize,
        pos: Vector2,
        radius: f64,
        body_index: usize,
        is_static: bool,
    ) -> Result<(), GridError> {
        let body = Body::new(entity_index, body_index, pos, radius, is_static)?;
        self.insert_body(body);
        Ok(())
    }

    /// Register a single-circle static entity (`body_index` 0).
    pub fn add_static_circle(
        &mut self,
        entity_index: usize,
        pos: Vector2,
        radius: f64,
    ) -> Result<(), GridError> {
        self.add_circle(entity_index, pos, radius, 0, true)
    }

    /// Register a single-circle dynamic entity (`body_index` 0).
    pub fn add_dynamic_circle(
        &mut self,
        entity_index: usize,
        pos: Vector2,
        radius: f64,
    ) -> Result<(), GridError> {
        self.add_circle(entity_index, pos, radius, 0, false)
    }

    /// Register a static entity made of equal circles, one per position, with
    /// `body_index` following the order of `positions`.
    ///
    /// Nothing is inserted if any circle is invalid.
    pub fn add_static_circles(
        &mut self,
        entity_index: usize,
        positions: impl IntoIterator<Item = Vector2>,
        radius: f64,
    ) -> Result<(), GridError> {
        self.add_circles(entity_index, positions, radius, true)
    }

    /// Dynamic counterpart of [`add_static_circles`](Self::add_static_circles).
    pub fn add_dynamic_circles(
        &mut self,
        entity_index: usize,
        positions: impl IntoIterator<Item = Vector2>,
        radius: f64,
    ) -> Result<(), GridError> {
        self.add_circles(entity_index, positions, radius, false)
    }

    fn add_circles(
        &mut self,
        entity_index: usize,
        positions: impl IntoIterator<Item = Vector2>,
        radius: f64,
        is_static: bool,
    ) -> Result<(), GridError> {
        let bodies = positions
            .into_iter()
            .enumerate()
            .map(|(body_index, pos)| Body::new(entity_index, body_index, pos, radius, is_static))
            .collect::<Result<Vec<_>, _>>()?;
        for body in bodies {
            self.insert_body(body);
        }
        Ok(())
    }

    fn insert_body(&mut self, body: Body) {
        let range = self.cell_range(&body.get_bounds());
        let pos = body.position();
        let extent = self.config.size as f64;
        if pos.x < 0.0 || pos.y < 0.0 || pos.x >= extent || pos.y >= extent {
            debug!(
                entity = body.entity_index(),
                body = body.body_index(),
                x = pos.x,
                y = pos.y,
                "body centre outside world, clamped to boundary cells"
            );
        }
        trace!(
            entity = body.entity_index(),
            body = body.body_index(),
            is_static = body.is_static(),
            cells = range.cell_count(),
            "registering body"
        );
        let registry = if body.is_static() {
            &mut self.grid
        } else {
            &mut self.dynamic_bodies
        };
        registry.insert(body, range, self.grid_size);
    }

    // -- queries --------------------------------------------------------------

    /// Every overlapping pair that involves at least one dynamic body.
    ///
    /// Each dynamic body is tested against the dynamic and static bodies that
    /// share any of its cells. A pair met in several shared cells, or from
    /// both sides, collapses to one entry through [`Collision`]'s canonical
    /// identity. Static-static pairs are never examined.
    pub fn get_collisions(&self) -> HashSet<Collision> {
        let mut collisions = HashSet::new();
        let mut tests = 0usize;

        for (slot, (body, range)) in self
            .dynamic_bodies
            .bodies
            .iter()
            .zip(&self.dynamic_bodies.ranges)
            .enumerate()
        {
            for cell in range.cells() {
                let index = cell.y * self.grid_size + cell.x;

                for &other_slot in self.dynamic_bodies.cell(index) {
                    // Two dynamic bodies sharing a cell both visit it, so the
                    // lower slot alone covers the pair.
                    if other_slot <= slot {
                        continue;
                    }
                    let other = self.dynamic_bodies.body(other_slot);
                    tests += self.test_pair(body, other, &mut collisions);
                }

                for &other_slot in self.grid.cell(index) {
                    let other = self.grid.body(other_slot);
                    tests += self.test_pair(body, other, &mut collisions);
                }
            }
        }

        debug!(
            dynamic_bodies = self.dynamic_bodies.bodies.len(),
            narrow_phase_tests = tests,
            collisions = collisions.len(),
            "broad phase complete"
        );
        collisions
    }

    /// [`get_collisions`](Self::get_collisions) in canonical order.
    pub fn get_collisions_sorted(&self) -> Vec<Collision> {
        let mut collisions: Vec<Collision> = self.get_collisions().into_iter().collect();
        collisions.sort_unstable();
        collisions
    }

    /// Run the narrow phase on one candidate pair. Returns the number of
    /// overlap tests performed (0 or 1).
    #[inline]
    fn test_pair(&self, body: &Body, other: &Body, out: &mut HashSet<Collision>) -> usize {
        if body.identity() == other.identity() {
            return 0;
        }
        if !self.config.intra_entity_collisions && body.entity_index() == other.entity_index() {
            return 0;
        }
        if body.collided(other) {
            out.insert(Collision::between(body.identity(), other.identity()));
        }
        1
    }

    /// Entity indices of every static or dynamic body overlapping the circle
    /// at `position` with `radius`.
    ///
    /// Bodies of the same entity collapse to one entry. No body is excluded
    /// implicitly; a caller querying around one of its own bodies gets its own
    /// entity back.
    pub fn get_collisions_within_area(
        &self,
        position: Vector2,
        radius: f64,
    ) -> Result<HashSet<usize>, GridError> {
        validate_circle(position, radius)?;
        let range = self.cell_range(&Bounds::around(position, radius));

        let mut entities = HashSet::new();
        for cell in range.cells() {
            let index = cell.y * self.grid_size + cell.x;
            let layers = [&self.grid, &self.dynamic_bodies];
            for registry in layers {
                for &slot in registry.cell(index) {
                    let body = registry.body(slot);
                    if circles_overlap(position, radius, body.position(), body.radius()) {
                        entities.insert(body.entity_index());
                    }
                }
            }
        }
        Ok(entities)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    // -- construction ---------------------------------------------------------

    #[test]
    fn grid_size_rounds_up() {
        assert_eq!(GridPhysics::new(100, 10).unwrap().grid_size(), 10);
        assert_eq!(GridPhysics::new(105, 10).unwrap().grid_size(), 11);
        assert_eq!(GridPhysics::new(5, 10).unwrap().grid_size(), 1);
    }

    #[test]
    fn zero_size_or_cell_size_rejected() {
        assert_eq!(
            GridPhysics::new(0, 10).unwrap_err(),
            GridError::InvalidSize { size: 0 }
        );
        assert_eq!(
            GridPhysics::new(10, 0).unwrap_err(),
            GridError::InvalidCellSize { cell_size: 0 }
        );
    }

    #[test]
    fn oversized_grid_rejected() {
        let err = GridPhysics::new(usize::MAX, 1).unwrap_err();
        assert!(matches!(err, GridError::GridTooLarge { .. }));
    }

    #[test]
    fn addressable_but_unallocatable_grid_rejected() {
        // 2^62 cells fit in a usize on 64-bit targets, their storage does not.
        let err = GridPhysics::new(1usize << 31, 1).unwrap_err();
        assert_eq!(err, GridError::GridTooLarge { grid_size: 1 << 31 });
        assert!(GridConfig {
            size: 1 << 31,
            cell_size: 1,
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn config_from_json_defaults_intra_entity_flag() {
        let config = GridConfig::from_json(r#"{"size": 200, "cell_size": 25}"#).unwrap();
        assert_eq!(config.size, 200);
        assert_eq!(config.cell_size, 25);
        assert!(!config.intra_entity_collisions);
        assert_eq!(config.validate().unwrap(), 8);
    }

    #[test]
    fn config_from_json_rejects_garbage_and_zero() {
        assert!(matches!(
            GridConfig::from_json("{not json").unwrap_err(),
            GridError::InvalidConfig { .. }
        ));
        assert_eq!(
            GridConfig::from_json(r#"{"size": 100, "cell_size": 0}"#).unwrap_err(),
            GridError::InvalidCellSize { cell_size: 0 }
        );
    }

    // -- cell mapping ---------------------------------------------------------

    #[test]
    fn grid_bounds_floor_coordinates() {
        let physics = GridPhysics::new(100, 10).unwrap();
        let range = physics.get_grid_bounds(Bounds::from((15.0, 25.0, 25.0, 35.0)));
        assert_eq!(range.to_tuple(), (1, 2, 2, 3));
        assert_eq!(range.cell_count(), 4);
    }

    #[test]
    fn grid_bounds_clamp_outside_world() {
        let physics = GridPhysics::new(100, 10).unwrap();
        let range = physics.get_grid_bounds(Bounds::from((-30.0, -5.0, 250.0, 99.9)));
        assert_eq!(range.to_tuple(), (0, 0, 9, 9));

        let far = physics.get_grid_bounds(Bounds::from((500.0, 500.0, 510.0, 510.0)));
        assert_eq!(far.to_tuple(), (9, 9, 9, 9));
    }

    #[test]
    fn exact_world_edge_maps_to_last_cell() {
        let physics = GridPhysics::new(100, 10).unwrap();
        let range = physics.get_grid_bounds(Bounds::from((100.0, 100.0, 100.0, 100.0)));
        assert_eq!(range.to_tuple(), (9, 9, 9, 9));
    }

    #[test]
    fn cell_range_iterates_rectangle() {
        let range = CellRange {
            min_x: 1,
            min_y: 4,
            max_x: 2,
            max_y: 5,
        };
        let cells: Vec<_> = range.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(1, 4),
                CellCoord::new(2, 4),
                CellCoord::new(1, 5),
                CellCoord::new(2, 5),
            ]
        );
        assert!(range.contains(CellCoord::new(2, 5)));
        assert!(!range.contains(CellCoord::new(3, 5)));
    }

    // -- insertion ------------------------------------------------------------

    #[test]
    fn straddling_body_registered_in_every_cell() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics.add_static_circle(1, v(10.0, 10.0), 3.0).unwrap();

        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let ids: Vec<_> = physics
                .bodies_in_cell(CellCoord::new(x, y))
                .map(|b| b.identity())
                .collect();
            assert_eq!(ids, vec![(1, 0)], "cell ({x}, {y})");
        }
        assert_eq!(physics.bodies_in_cell(CellCoord::new(2, 1)).count(), 0);
        assert_eq!(physics.stats().registrations, 4);
        assert_eq!(physics.static_body_count(), 1);
    }

    #[test]
    fn batch_insert_assigns_sequential_body_indices() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics
            .add_dynamic_circles(4, vec![v(5.0, 5.0), v(45.0, 5.0), v(85.0, 5.0)], 1.0)
            .unwrap();

        let mut seen: Vec<_> = [0, 4, 8]
            .into_iter()
            .flat_map(|x| {
                physics
                    .bodies_in_cell(CellCoord::new(x, 0))
                    .map(|b| b.identity())
                    .collect::<Vec<_>>()
            })
            .collect();
        seen.sort();
        assert_eq!(seen, vec![(4, 0), (4, 1), (4, 2)]);
    }

    #[test]
    fn invalid_batch_inserts_nothing() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        let err = physics
            .add_static_circles(1, vec![v(5.0, 5.0), v(f64::NAN, 5.0)], 1.0)
            .unwrap_err();
        assert!(matches!(err, GridError::NonFinitePosition { .. }));
        assert_eq!(physics.static_body_count(), 0);
        assert_eq!(physics.stats().registrations, 0);
    }

    #[test]
    fn reset_clears_only_dynamic_layer() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics.add_static_circle(1, v(50.0, 50.0), 2.0).unwrap();
        physics.add_dynamic_circle(2, v(51.0, 50.0), 2.0).unwrap();
        assert_eq!(physics.bodies_in_cell(CellCoord::new(5, 5)).count(), 2);

        physics.reset();
        assert_eq!(physics.dynamic_body_count(), 0);
        assert_eq!(physics.static_body_count(), 1);
        let stats = physics.stats();
        assert_eq!(stats.occupied_dynamic_cells, 0);
        assert_eq!(stats.occupied_static_cells, 1);
        assert_eq!(physics.bodies_in_cell(CellCoord::new(5, 5)).count(), 1);
    }

    #[test]
    fn body_outside_world_still_collides() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics.add_static_circle(1, v(-4.0, 50.0), 3.0).unwrap();
        physics.add_dynamic_circle(2, v(1.0, 50.0), 3.0).unwrap();
        let collisions = physics.get_collisions();
        assert_eq!(collisions.len(), 1);
        assert!(collisions.contains(&Collision::between((1, 0), (2, 0))));
    }

    // -- collisions -----------------------------------------------------------

    #[test]
    fn dynamic_pair_reported_once() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics.add_dynamic_circle(0, v(20.0, 20.0), 5.0).unwrap();
        physics.add_dynamic_circle(1, v(24.0, 20.0), 5.0).unwrap();
        let collisions = physics.get_collisions();
        assert_eq!(collisions.len(), 1);
        assert!(collisions.contains(&Collision::new(0, 1, 0, 0)));
    }

    #[test]
    fn static_pairs_never_reported() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics.add_static_circle(0, v(20.0, 20.0), 5.0).unwrap();
        physics.add_static_circle(1, v(22.0, 20.0), 5.0).unwrap();
        assert!(physics.get_collisions().is_empty());
    }

    #[test]
    fn dynamic_against_static_reported() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics.add_static_circle(9, v(20.0, 20.0), 5.0).unwrap();
        physics.add_dynamic_circle(1, v(22.0, 20.0), 1.0).unwrap();
        assert_eq!(
            physics.get_collisions_sorted(),
            vec![Collision::between((1, 0), (9, 0))]
        );
    }

    #[test]
    fn same_entity_bodies_collide_when_enabled() {
        let mut physics = GridPhysics::with_config(GridConfig {
            size: 100,
            cell_size: 10,
            intra_entity_collisions: true,
        })
        .unwrap();
        physics
            .add_dynamic_circles(3, vec![v(30.0, 30.0), v(31.0, 30.0)], 2.0)
            .unwrap();
        assert_eq!(
            physics.get_collisions_sorted(),
            vec![Collision::between((3, 0), (3, 1))]
        );
    }

    #[test]
    fn repeated_identity_is_not_a_self_collision() {
        let mut physics = GridPhysics::with_config(GridConfig {
            size: 100,
            cell_size: 10,
            intra_entity_collisions: true,
        })
        .unwrap();
        physics.add_dynamic_circle(3, v(30.0, 30.0), 2.0).unwrap();
        physics.add_dynamic_circle(3, v(31.0, 30.0), 2.0).unwrap();
        assert!(physics.get_collisions().is_empty());
    }

    #[test]
    fn collisions_across_cell_boundary_found() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        // Centres in different cells, circles overlap across x = 30.
        physics.add_dynamic_circle(0, v(28.0, 15.0), 2.0).unwrap();
        physics.add_dynamic_circle(1, v(31.0, 15.0), 2.0).unwrap();
        assert_eq!(physics.get_collisions().len(), 1);
    }

    #[test]
    fn sorted_collisions_are_deterministic() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics.add_dynamic_circle(5, v(50.0, 50.0), 3.0).unwrap();
        physics.add_dynamic_circle(2, v(52.0, 50.0), 3.0).unwrap();
        physics.add_static_circle(0, v(50.0, 53.0), 1.0).unwrap();
        assert_eq!(
            physics.get_collisions_sorted(),
            vec![
                Collision::between((0, 0), (2, 0)),
                Collision::between((0, 0), (5, 0)),
                Collision::between((2, 0), (5, 0)),
            ]
        );
    }

    // -- area queries ---------------------------------------------------------

    #[test]
    fn area_query_collapses_bodies_per_entity() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics
            .add_static_circles(7, vec![v(40.0, 40.0), v(42.0, 40.0), v(44.0, 40.0)], 1.0)
            .unwrap();
        physics.add_dynamic_circle(8, v(46.0, 40.0), 1.0).unwrap();
        physics.add_dynamic_circle(9, v(80.0, 80.0), 1.0).unwrap();

        let hits = physics.get_collisions_within_area(v(43.0, 40.0), 3.0).unwrap();
        assert_eq!(hits, HashSet::from([7, 8]));
    }

    #[test]
    fn area_query_rejects_bad_radius() {
        let physics = GridPhysics::new(100, 10).unwrap();
        assert_eq!(
            physics
                .get_collisions_within_area(v(1.0, 1.0), 0.0)
                .unwrap_err(),
            GridError::InvalidRadius { radius: 0.0 }
        );
    }

    #[test]
    fn area_query_sees_only_statics_after_reset() {
        let mut physics = GridPhysics::new(100, 10).unwrap();
        physics.add_static_circle(1, v(20.0, 20.0), 2.0).unwrap();
        physics.add_dynamic_circle(2, v(22.0, 20.0), 2.0).unwrap();
        assert_eq!(
            physics.get_collisions_within_area(v(21.0, 20.0), 1.0).unwrap(),
            HashSet::from([1, 2])
        );

        physics.reset();
        assert_eq!(
            physics.get_collisions_within_area(v(21.0, 20.0), 1.0).unwrap(),
            HashSet::from([1])
        );
    }
}
