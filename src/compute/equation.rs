use super::probe::{Dependencies, DependencyProbe};
use super::terms::Terms;
use crate::store::{TargetName, VarMap};
use std::fmt;

/// `f(variables, parameters) -> value`.
pub type Rule = Box<dyn Fn(&mut Terms<'_>, &mut Terms<'_>) -> f64 + Send + Sync>;

/// A single formula bound to the quantity it produces.
pub struct NamedEquation {
    target: TargetName,
    /// Position within the target's list; 0 is preferred.
    rank: usize,
    rule: Rule,
}

impl NamedEquation {
    pub fn new<F>(target: TargetName, rank: usize, rule: F) -> Self
    where
        F: Fn(&mut Terms<'_>, &mut Terms<'_>) -> f64 + Send + Sync + 'static,
    {
        Self { target, rank, rule: Box::new(rule) }
    }

    pub fn target(&self) -> &TargetName { &self.target }
    pub fn rank(&self) -> usize { self.rank }

    /// Runs the rule on the real sets. Absent terms read as `NaN`; callers gate on
    /// `is_calculable` first.
    pub fn evaluate(&self, variables: &VarMap, parameters: &VarMap) -> f64 {
        let mut v = Terms::direct(variables);
        let mut p = Terms::direct(parameters);
        (self.rule)(&mut v, &mut p)
    }

    pub fn probe_with(&self, probe: &mut DependencyProbe, variables: &VarMap, parameters: &VarMap) -> Dependencies {
        probe.run(|v, p| (self.rule)(v, p), variables, parameters)
    }

    /// Probes with a throwaway entropy-seeded probe.
    pub fn probe_dependencies(&self, variables: &VarMap, parameters: &VarMap) -> Dependencies {
        self.probe_with(&mut DependencyProbe::from_entropy(), variables, parameters)
    }

    pub fn is_calculable(&self, probe: &mut DependencyProbe, variables: &VarMap, parameters: &VarMap) -> bool {
        self.probe_with(probe, variables, parameters).is_satisfied()
    }
}

impl fmt::Debug for NamedEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedEquation")
            .field("target", &self.target)
            .field("rank", &self.rank)
            .finish_non_exhaustive()
    }
}
