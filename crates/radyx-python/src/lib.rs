//! PyO3 Python bindings for the Radyx grid broad phase.
//!
//! Exposes [`GridPhysics`](radyx_grid::grid::GridPhysics) and
//! [`Collision`](radyx_grid::collision::Collision) to a Python host loop.
//! Positions cross the boundary as `(x, y)` tuples or any object with `x` and
//! `y` attributes.

#![deny(unsafe_code)]

use pyo3::prelude::*;

mod physics;

/// Route `tracing` output from the grid to stderr.
///
/// Args:
///     filter: An `EnvFilter` directive such as `"radyx_grid=debug"`.
///         Defaults to `RUST_LOG`, or `"warn"` when that is unset.
#[pyfunction]
#[pyo3(signature = (filter=None))]
fn init_logging(filter: Option<&str>) -> PyResult<()> {
    let filter = match filter {
        Some(directive) => tracing_subscriber::EnvFilter::try_new(directive).map_err(|e| {
            pyo3::exceptions::PyValueError::new_err(format!("invalid log filter: {e}"))
        })?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    let directive = filter.to_string();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| {
            pyo3::exceptions::PyRuntimeError::new_err(format!(
                "logging already initialised: {e}"
            ))
        })?;
    tracing::debug!(filter = %directive, "radyx logging initialised");
    Ok(())
}

/// The `radyx` native module.
#[pymodule]
fn radyx(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<physics::PyCollision>()?;
    m.add_class::<physics::PyGridPhysics>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    Ok(())
}
