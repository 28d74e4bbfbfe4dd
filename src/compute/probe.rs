//! Runtime dependency discovery.
//!
//! Dependencies are found by running a rule against probing `Terms` and collecting the
//! keys it asked for but did not get. Because the full rule body runs, a branch on a
//! known control value (e.g. `paired`) is followed with its real value.
//!
//! Placeholders are random. When the control value itself is absent the branch taken
//! depends on the placeholder, so two probes of the same rule can report different
//! missing sets. The catalog only branches on `paired == 0.0` / `paired == 1.0`, which a
//! placeholder in `(1, 2]` never satisfies, but custom rules get no such guarantee.
//! Set `SolverConfig::probe_seed` for reproducible probing.

use super::terms::Terms;
use crate::store::VarMap;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Serialize, Deserialize};
use std::collections::BTreeSet;

/// The keys a rule read that were absent from the sets it was probed with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    pub missing_variables: BTreeSet<String>,
    pub missing_parameters: BTreeSet<String>,
}

impl Dependencies {
    pub fn is_satisfied(&self) -> bool {
        self.missing_variables.is_empty() && self.missing_parameters.is_empty()
    }

    /// `"a, b, c"`; the key under which alternative derivations are stored.
    pub fn signature(&self) -> String {
        self.missing_variables.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// Source of placeholder values for one solve (or one ad-hoc probe).
#[derive(Debug, Clone)]
pub struct DependencyProbe {
    rng: ChaCha8Rng,
}

impl DependencyProbe {
    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// A fresh stream for one `Terms` view.
    fn fork(&mut self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.rng.next_u64())
    }

    /// Runs `rule` against intercepting views of `variables` and `parameters`.
    /// The rule's numeric result is discarded.
    pub fn run<F>(&mut self, rule: F, variables: &VarMap, parameters: &VarMap) -> Dependencies
    where
        F: FnOnce(&mut Terms<'_>, &mut Terms<'_>) -> f64,
    {
        let mut v = Terms::probing(variables, self.fork());
        let mut p = Terms::probing(parameters, self.fork());
        let _ = rule(&mut v, &mut p);
        Dependencies {
            missing_variables: v.into_missing(),
            missing_parameters: p.into_missing(),
        }
    }
}

impl Default for DependencyProbe {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, f64)]) -> VarMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn dof(v: &mut Terms, _p: &mut Terms) -> f64 {
        if v.get("paired") == 1.0 { v.get("n1") - 1.0 } else { v.get("n1") + v.get("n2") - 2.0 }
    }

    #[test]
    fn test_probe_follows_known_branch() {
        let mut probe = DependencyProbe::seeded(3);

        let paired = vars(&[("paired", 1.0)]);
        let deps = probe.run(dof, &paired, &VarMap::new());
        assert_eq!(deps.signature(), "n1");

        let independent = vars(&[("paired", 0.0), ("n1", 10.0)]);
        let deps = probe.run(dof, &independent, &VarMap::new());
        assert_eq!(deps.signature(), "n2");
    }

    #[test]
    fn test_probe_splits_namespaces() {
        let mut probe = DependencyProbe::seeded(3);
        let deps = probe.run(
            |v, p| v.get("degrees of freedom") * p.get("confidence level"),
            &VarMap::new(),
            &VarMap::new(),
        );
        assert!(deps.missing_variables.contains("degrees of freedom"));
        assert!(deps.missing_parameters.contains("confidence level"));
        assert!(!deps.is_satisfied());
    }

    #[test]
    fn test_seeded_probes_are_reproducible() {
        fn rule(v: &mut Terms, _p: &mut Terms) -> f64 {
            v.get("a")
        }
        let mut a = DependencyProbe::seeded(11);
        let mut b = DependencyProbe::seeded(11);
        assert_eq!(a.fork().next_u64(), b.fork().next_u64());
        assert_eq!(a.run(rule, &VarMap::new(), &VarMap::new()), b.run(rule, &VarMap::new(), &VarMap::new()));
    }
}
