use super::types::{TargetName, VarMap};
use crate::compute::equation::NamedEquation;
use crate::compute::terms::Terms;
use crate::error::StatslatorError;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Most targets carry one to three alternative formulas.
type EquationList = SmallVec<[NamedEquation; 2]>;

/// Ordered catalog of equations, grouped by target.
///
/// Two orders matter and neither changes after registration:
/// - targets are scanned in the order they were first registered;
/// - within a target, earlier equations take priority.
#[derive(Debug, Default)]
pub struct EquationRegistry {
    // Columnar: targets[i] owns equations[i].
    targets: Vec<TargetName>,
    equations: Vec<EquationList>,
    index: HashMap<TargetName, usize>,
}

impl EquationRegistry {
    pub fn new() -> Self { Self::default() }

    /// A registry holding the built-in statistical catalog.
    pub fn with_catalog() -> Self {
        let mut registry = Self::new();
        super::catalog::populate(&mut registry);
        registry
    }

    /// Appends an equation for `target`. It ranks below every equation already
    /// registered for the same target.
    pub fn register<F>(&mut self, target: TargetName, rule: F) -> Result<(), StatslatorError>
    where
        F: Fn(&mut Terms<'_>, &mut Terms<'_>) -> f64 + Send + Sync + 'static,
    {
        if target.is_empty() {
            return Err(StatslatorError::EmptyTarget);
        }
        self.push(target, rule);
        Ok(())
    }

    pub(crate) fn push<F>(&mut self, target: TargetName, rule: F)
    where
        F: Fn(&mut Terms<'_>, &mut Terms<'_>) -> f64 + Send + Sync + 'static,
    {
        let slot = match self.index.get(&target) {
            Some(&i) => i,
            None => {
                let i = self.targets.len();
                self.targets.push(target.clone());
                self.equations.push(EquationList::new());
                self.index.insert(target.clone(), i);
                i
            }
        };
        let rank = self.equations[slot].len();
        self.equations[slot].push(NamedEquation::new(target, rank, rule));
    }

    /// Equations for `target` in priority order; empty if none are registered.
    pub fn equations_for(&self, target: &TargetName) -> &[NamedEquation] {
        self.index.get(target).map(|&i| self.equations[i].as_slice()).unwrap_or(&[])
    }

    /// Looks a target up by its display form (`"t-score"`, `"MoE XX%1"`).
    pub fn lookup(&self, name: &str) -> Result<&[NamedEquation], StatslatorError> {
        self.targets
            .iter()
            .position(|t| t.to_string() == name)
            .map(|i| self.equations[i].as_slice())
            .ok_or_else(|| StatslatorError::UnknownTarget(name.to_string()))
    }

    /// `(target, equations)` in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (&TargetName, &[NamedEquation])> {
        self.targets.iter().zip(self.equations.iter().map(|e| e.as_slice()))
    }

    pub fn target_count(&self) -> usize { self.targets.len() }

    pub fn equation_count(&self) -> usize {
        self.equations.iter().map(|e| e.len()).sum()
    }

    /// Every variable name some equation reads when nothing is known.
    pub fn referenced_variables(&self, parameters: &VarMap) -> Vec<String> {
        let mut probe = crate::compute::DependencyProbe::seeded(0);
        let mut names: Vec<String> = self.equations
            .iter()
            .flatten()
            .flat_map(|eq| eq.probe_with(&mut probe, &VarMap::new(), parameters).missing_variables)
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
