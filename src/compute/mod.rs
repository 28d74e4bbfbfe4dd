//! Evaluates the equation catalog against a growing variable set.
pub mod engine;
pub mod equation;
pub mod interval;
pub mod kernel;
pub mod ledger;
pub mod probe;
pub mod terms;

pub use engine::{default_registry, solve, Session, Statslator};
pub use equation::{NamedEquation, Rule};
pub use interval::{find_any_confidence_interval, ConfidenceInterval};
pub use ledger::{ConsistencyLedger, StatValue};
pub use probe::{Dependencies, DependencyProbe};
pub use terms::Terms;
