//! ledger.rs
//! Per-variable consistency records produced by a solve.

use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// The accepted value of one variable plus every derivation that disagreed with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub value: f64,
    /// `true` if the value was derived during the solve, `false` for a caller input.
    pub calculated: bool,
    pub provenance: String,
    /// Dependency signature -> value that formula produced.
    #[serde(default)]
    pub alternative_calculations: BTreeMap<String, f64>,
}

impl StatValue {
    pub fn new(value: f64, calculated: bool, provenance: impl Into<String>) -> Self {
        Self { value, calculated, provenance: provenance.into(), alternative_calculations: BTreeMap::new() }
    }

    pub fn derived(value: f64, signature: &str) -> Self {
        Self::new(value, true, format!("Calculated from {}", signature))
    }

    pub fn input(value: f64) -> Self {
        Self::new(value, false, "")
    }

    pub fn has_conflicts(&self) -> bool {
        !self.alternative_calculations.is_empty()
    }
}

/// `|(|new| - |existing|)| / |existing|`, or the plain absolute difference when
/// `existing == 0`. `NaN` if either side is `NaN`.
pub fn relative_error(new: f64, existing: f64) -> f64 {
    let diff = new.abs() - existing.abs();
    if existing == 0.0 { diff.abs() } else { (diff / existing).abs() }
}

/// `NaN` never matches anything, so a `NaN` operand is always a conflict. Equal
/// magnitudes never are, infinities included.
pub fn is_conflict(new: f64, existing: f64, tolerance: f64) -> bool {
    if new.is_nan() || existing.is_nan() {
        return true;
    }
    if new.abs() == existing.abs() {
        return false;
    }
    let err = relative_error(new, existing);
    err.is_nan() || err > tolerance
}

/// Records for every variable that was derived or found inconsistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsistencyLedger {
    records: BTreeMap<String, StatValue>,
}

impl ConsistencyLedger {
    pub fn new() -> Self { Self::default() }

    pub fn record_derived(&mut self, name: &str, value: f64, signature: &str) {
        self.records.insert(name.to_string(), StatValue::derived(value, signature));
    }

    /// Attaches an alternative to `name`, wrapping `existing` as a non-derived record if
    /// the variable has none yet.
    pub fn record_alternative(&mut self, name: &str, existing: f64, signature: &str, value: f64) {
        self.records
            .entry(name.to_string())
            .or_insert_with(|| StatValue::input(existing))
            .alternative_calculations
            .insert(signature.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&StatValue> { self.records.get(name) }
    pub fn contains(&self, name: &str) -> bool { self.records.contains_key(name) }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StatValue)> {
        self.records.iter()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = (&String, &StatValue)> {
        self.records.iter().filter(|(_, r)| r.has_conflicts())
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.records.get(name).map(|r| r.value)
    }

    pub fn into_records(self) -> BTreeMap<String, StatValue> {
        self.records
    }

    /// JSON object keyed by canonical name. Non-finite values serialize as `null`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
