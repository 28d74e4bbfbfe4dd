// Core library: translates between partially known statistics of a two-group
// comparison (sizes, means, SDs, CIs, t, p, effect sizes) by forward-chaining
// through a catalog of equations until nothing new can be derived.

pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod store;

#[cfg(feature = "python")]
pub mod bindings;

pub use compute::{default_registry, solve, ConsistencyLedger, NamedEquation, Session, StatValue, Statslator, Terms};
pub use config::{NonFinitePolicy, SolverConfig};
pub use error::StatslatorError;
pub use store::{AliasResolver, EquationRegistry, TargetName, VarMap};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// --- Module Definition ---
/// This function defines the `statslator._core` Python module.
/// The name `_core` is chosen to indicate it's an internal, compiled component.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    bindings::python::register(m)
}
