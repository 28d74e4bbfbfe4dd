//! Names, the equation registry and the built-in catalog.
pub mod alias;
pub mod catalog;
pub mod registry;
pub mod types;

pub use alias::AliasResolver;
pub use registry::EquationRegistry;
pub use types::*;
