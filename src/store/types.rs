use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical variable name -> value. Also used for the parameter namespace.
pub type VarMap = BTreeMap<String, f64>;

pub const CONFIDENCE_LEVEL: &str = "confidence level";
pub const PAIRED: &str = "paired";

/// Renders a confidence level fraction as the literal percentage used in names.
///
/// `0.95` -> `"95%"`, `0.975` -> `"97.5%"`. Float noise from the `* 100` is rounded away
/// so that `0.07` does not become `"7.000000000000001%"`.
pub fn level_label(level: f64) -> String {
    let pct = (level * 100.0 * 1e6).round() / 1e6;
    format!("{}%", pct)
}

/// `MoE <level>%<suffix>`
pub fn moe_name(level: f64, suffix: &str) -> String {
    format!("MoE {}{}", level_label(level), suffix)
}

/// `CI <level>% <bound><suffix>`, where bound is `upper` or `lower`.
pub fn ci_name(level: f64, bound: Bound, suffix: &str) -> String {
    format!("CI {} {}{}", level_label(level), bound.as_str(), suffix)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    Upper,
    Lower,
}

impl Bound {
    pub fn as_str(&self) -> &'static str {
        match self { Bound::Upper => "upper", Bound::Lower => "lower" }
    }

    pub fn other(&self) -> Self {
        match self { Bound::Upper => Bound::Lower, Bound::Lower => Bound::Upper }
    }
}

/// The name an equation writes to.
///
/// Names that depend on the confidence level are kept split around the level so the
/// literal percentage is only spliced in once a concrete level is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetName {
    Fixed(String),
    /// Rendered as `{prefix}{level}%{suffix}`, e.g. `MoE ` + `95%` + `1`.
    AtConfidence { prefix: String, suffix: String },
}

impl TargetName {
    pub fn fixed(name: impl Into<String>) -> Self {
        TargetName::Fixed(name.into())
    }

    pub fn at_confidence(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        TargetName::AtConfidence { prefix: prefix.into(), suffix: suffix.into() }
    }

    /// The concrete name to write back. Fixed names ignore the level.
    pub fn resolve(&self, level: f64) -> String {
        match self {
            TargetName::Fixed(name) => name.clone(),
            TargetName::AtConfidence { prefix, suffix } => {
                format!("{}{}{}", prefix, level_label(level), suffix)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TargetName::Fixed(name) => name.trim().is_empty(),
            TargetName::AtConfidence { prefix, .. } => prefix.trim().is_empty(),
        }
    }
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetName::Fixed(name) => write!(f, "{}", name),
            TargetName::AtConfidence { prefix, suffix } => write!(f, "{}XX%{}", prefix, suffix),
        }
    }
}
