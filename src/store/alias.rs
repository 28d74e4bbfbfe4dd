//! Maps descriptive input names onto canonical short codes.
use super::types::VarMap;
use std::collections::HashMap;

/// Descriptive name -> canonical name.
const ALIASES: &[(&str, &str)] = &[
    ("standard error1", "SE1"),
    ("standard error2", "SE2"),
    ("standard error", "SE"),
    ("standard deviation", "SD"),
    ("standard deviation1", "SD1"),
    ("standard deviation2", "SD2"),
    ("margin of error", "MoE"),
    ("margin of error1", "MoE1"),
    ("margin of error2", "MoE2"),
    ("confidence interval 95% upper", "CI 95% upper"),
    ("confidence interval 95% lower", "CI 95% lower"),
    ("t-value", "t-score"),
    ("average", "mean"),
    ("average1", "mean1"),
    ("average2", "mean2"),
    ("average difference", "mean difference"),
    ("dof", "degrees of freedom"),
    ("Cohen's d", "Cohen d"),
    ("common language effect size", "CLES"),
    ("pooled standard deviation", "pooled SD"),
    ("Cohen's f", "Cohen f"),
    ("rank biserial correlation", "rpb"),
];

#[derive(Debug, Clone)]
pub struct AliasResolver {
    table: HashMap<&'static str, &'static str>,
}

impl AliasResolver {
    pub fn new() -> Self {
        Self { table: ALIASES.iter().copied().collect() }
    }

    /// Canonical form of `name`; unknown names pass through unchanged.
    pub fn canonical<'a>(&self, name: &'a str) -> &'a str {
        self.table.get(name).copied().unwrap_or(name)
    }

    /// Copies `known` with every key canonicalized. If an alias and its canonical name
    /// are both supplied, whichever sorts last wins.
    pub fn normalize(&self, known: &VarMap) -> VarMap {
        known.iter().map(|(k, &v)| (self.canonical(k).to_string(), v)).collect()
    }
}

impl Default for AliasResolver {
    fn default() -> Self {
        Self::new()
    }
}
