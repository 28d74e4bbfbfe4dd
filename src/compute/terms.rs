//! The read view handed to every equation rule.
//!
//! A rule never touches a `VarMap` directly. It reads through `Terms`, which either
//! passes values straight through (evaluation) or records every absent key it is asked
//! for (probing). This is what lets the solver discover a rule's dependencies by running
//! it, including whichever branch the known values select.

use crate::store::VarMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug)]
struct ProbeState {
    rng: ChaCha8Rng,
    missing: BTreeSet<String>,
    placeholders: HashMap<String, f64>,
}

#[derive(Debug)]
pub struct Terms<'a> {
    values: &'a VarMap,
    probe: Option<ProbeState>,
}

impl<'a> Terms<'a> {
    /// Evaluation view: an absent key reads as `NaN`, so a rule run with incomplete
    /// inputs degrades to `NaN` instead of failing.
    pub fn direct(values: &'a VarMap) -> Self {
        Self { values, probe: None }
    }

    /// Probing view: an absent key is recorded and read as a placeholder in `(1, 2]`.
    pub(crate) fn probing(values: &'a VarMap, rng: ChaCha8Rng) -> Self {
        Self {
            values,
            probe: Some(ProbeState { rng, missing: BTreeSet::new(), placeholders: HashMap::new() }),
        }
    }

    pub fn get(&mut self, name: &str) -> f64 {
        if let Some(&v) = self.values.get(name) {
            return v;
        }
        match &mut self.probe {
            None => f64::NAN,
            Some(state) => {
                state.missing.insert(name.to_string());
                // Strictly above 1 so probed formulas never divide by zero or take log(<=0).
                // Stable per key within one probe.
                let rng = &mut state.rng;
                *state.placeholders
                    .entry(name.to_string())
                    .or_insert_with(|| 2.0 - rng.gen::<f64>())
            }
        }
    }

    /// Names actually present. Listing does not count as a read.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + 'a {
        let values = self.values;
        values.keys().map(String::as_str)
    }

    pub(crate) fn into_missing(self) -> BTreeSet<String> {
        self.probe.map(|p| p.missing).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn vars(pairs: &[(&str, f64)]) -> VarMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_direct_reads_missing_as_nan() {
        let v = vars(&[("n1", 12.0)]);
        let mut t = Terms::direct(&v);
        assert_eq!(t.get("n1"), 12.0);
        assert!(t.get("n2").is_nan());
        assert!(t.into_missing().is_empty());
    }

    #[test]
    fn test_probing_records_and_substitutes() {
        let v = vars(&[("n1", 12.0)]);
        let mut t = Terms::probing(&v, ChaCha8Rng::seed_from_u64(7));
        assert_eq!(t.get("n1"), 12.0);
        let p = t.get("n2");
        assert!(p > 1.0 && p <= 2.0);
        assert_eq!(t.get("n2"), p, "placeholder is stable within a probe");

        let missing = t.into_missing();
        assert_eq!(missing.len(), 1);
        assert!(missing.contains("n2"));
    }

    #[test]
    fn test_names_are_not_reads() {
        let v = vars(&[("CI 90% upper", 4.0), ("CI 90% lower", 2.0)]);
        let t = Terms::probing(&v, ChaCha8Rng::seed_from_u64(1));
        let names: Vec<&str> = t.names().collect();
        assert_eq!(names, vec!["CI 90% lower", "CI 90% upper"]);
        assert!(t.into_missing().is_empty());
    }
}
