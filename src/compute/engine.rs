//! A synchronous, single-threaded forward-chaining solver.
//!
//! Each round scans every target in registry order and every equation in priority
//! order, applies whatever is calculable, and writes results into empty slots only. A
//! round that fills no slot ends the solve. Slots are never overwritten, so the set of
//! known names grows monotonically and the loop terminates.

use super::ledger::{is_conflict, ConsistencyLedger};
use super::probe::DependencyProbe;
use super::equation::NamedEquation;
use crate::config::{check_level, NonFinitePolicy, SolverConfig};
use crate::error::StatslatorError;
use crate::store::{AliasResolver, EquationRegistry, VarMap, CONFIDENCE_LEVEL};
use log::{debug, trace};
use std::sync::OnceLock;

/// The built-in catalog, built on first use and read-only afterwards.
pub fn default_registry() -> &'static EquationRegistry {
    static REGISTRY: OnceLock<EquationRegistry> = OnceLock::new();
    REGISTRY.get_or_init(EquationRegistry::with_catalog)
}

/// Solves with the built-in catalog and default settings at `confidence_level`.
pub fn solve(known: &VarMap, confidence_level: f64) -> Result<ConsistencyLedger, StatslatorError> {
    Statslator::new(default_registry()).solve_at(known, confidence_level)
}

pub struct Statslator<'a> {
    registry: &'a EquationRegistry,
    aliases: AliasResolver,
    config: SolverConfig,
}

impl<'a> Statslator<'a> {
    pub fn new(registry: &'a EquationRegistry) -> Self {
        Self { registry, aliases: AliasResolver::new(), config: SolverConfig::default() }
    }

    pub fn with_config(registry: &'a EquationRegistry, config: SolverConfig) -> Result<Self, StatslatorError> {
        config.validate()?;
        Ok(Self { registry, aliases: AliasResolver::new(), config })
    }

    /// Derives everything reachable from `known` at the configured confidence level.
    /// Only new or conflicting variables are returned; `known` is not modified.
    pub fn solve(&self, known: &VarMap) -> ConsistencyLedger {
        let mut session = self.session(known, self.config.confidence_level);
        session.run();
        session.finish()
    }

    pub fn solve_at(&self, known: &VarMap, confidence_level: f64) -> Result<ConsistencyLedger, StatslatorError> {
        check_level(confidence_level)?;
        let mut session = self.session(known, confidence_level);
        session.run();
        Ok(session.finish())
    }

    /// A solve that can be stepped one round at a time.
    pub fn session(&self, known: &VarMap, confidence_level: f64) -> Session<'_, 'a> {
        let mut parameters = VarMap::new();
        parameters.insert(CONFIDENCE_LEVEL.to_string(), confidence_level);
        Session {
            solver: self,
            variables: self.aliases.normalize(known),
            parameters,
            level: confidence_level,
            ledger: ConsistencyLedger::new(),
            probe: DependencyProbe::from_seed_opt(self.config.probe_seed),
            rounds: 0,
        }
    }
}

/// Working state of one solve. Owned by the caller; nothing is shared across solves.
pub struct Session<'s, 'a> {
    solver: &'s Statslator<'a>,
    variables: VarMap,
    parameters: VarMap,
    level: f64,
    ledger: ConsistencyLedger,
    probe: DependencyProbe,
    rounds: usize,
}

impl<'s, 'a> Session<'s, 'a> {
    /// Rounds until one derives nothing. Returns the number of rounds run.
    pub fn run(&mut self) -> usize {
        while self.step() > 0 {}
        debug!(
            "Solve converged after {} rounds: {} variables known, {} records ({} with alternatives)",
            self.rounds,
            self.variables.len(),
            self.ledger.len(),
            self.ledger.conflicts().count()
        );
        self.rounds
    }

    /// One full pass over the registry. Returns how many new canonical values it wrote.
    pub fn step(&mut self) -> usize {
        self.rounds += 1;
        let registry = self.solver.registry;
        let mut derived = 0;
        for (_, equations) in registry.iter() {
            for eq in equations {
                if self.apply(eq) {
                    derived += 1;
                }
            }
        }
        trace!("Round {} derived {} values", self.rounds, derived);
        derived
    }

    /// Evaluates `eq` if calculable and merges the result. True if a slot was filled.
    fn apply(&mut self, eq: &NamedEquation) -> bool {
        let empty = VarMap::new();
        let direct = eq.is_calculable(&mut self.probe, &self.variables, &empty);
        let needs_level = !direct && eq.is_calculable(&mut self.probe, &self.variables, &self.parameters);
        if !direct && !needs_level {
            return false;
        }

        let value = eq.evaluate(&self.variables, &self.parameters);
        let name = eq.target().resolve(self.level);

        match self.variables.get(&name) {
            None => {
                if !value.is_finite() && self.solver.config.non_finite == NonFinitePolicy::Skip {
                    trace!("Skipping non-finite {} = {} (rank {})", name, value, eq.rank());
                    return false;
                }
                let signature = self.signature(eq);
                trace!("Derived {} = {} from {}", name, value, signature);
                self.variables.insert(name.clone(), value);
                self.ledger.record_derived(&name, value, &signature);
                true
            }
            Some(&existing) => {
                if is_conflict(value, existing, self.solver.config.tolerance) {
                    let signature = self.signature(eq);
                    trace!("Conflict on {}: {} vs {} from {}", name, existing, value, signature);
                    self.ledger.record_alternative(&name, existing, &signature, value);
                }
                false
            }
        }
    }

    /// The variables `eq` references, independent of what is currently known.
    fn signature(&mut self, eq: &NamedEquation) -> String {
        eq.probe_with(&mut self.probe, &VarMap::new(), &self.parameters).signature()
    }

    pub fn variables(&self) -> &VarMap { &self.variables }

    pub fn finish(self) -> ConsistencyLedger {
        self.ledger
    }
}
