use crate::compute::{default_registry, ledger::StatValue, Statslator};
use crate::config::SolverConfig;
use crate::display::trace;
use crate::store::VarMap;
use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;
use std::collections::{BTreeMap, HashMap};

#[pyclass(name = "StatValue")]
#[derive(Debug, Clone)]
pub struct PyStatValue {
    #[pyo3(get)]
    pub value: f64,
    #[pyo3(get)]
    pub calculated: bool,
    #[pyo3(get)]
    pub provenance: String,
    #[pyo3(get)]
    pub alternative_calculations: BTreeMap<String, f64>,
}

impl From<StatValue> for PyStatValue {
    fn from(v: StatValue) -> Self {
        Self {
            value: v.value,
            calculated: v.calculated,
            provenance: v.provenance,
            alternative_calculations: v.alternative_calculations,
        }
    }
}

#[pymethods]
impl PyStatValue {
    fn __repr__(&self) -> String {
        format!("StatValue(value={}, calculated={}, alternatives={})", self.value, self.calculated, self.alternative_calculations.len())
    }
}

fn solver(config_json: Option<&str>) -> PyResult<Statslator<'static>> {
    let config = match config_json {
        Some(s) => SolverConfig::from_json(s).map_err(|e| PyValueError::new_err(e.to_string()))?,
        None => SolverConfig::default(),
    };
    Statslator::with_config(default_registry(), config).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Derives every reachable quantity from `known`. Returns only new or inconsistent values.
#[pyfunction]
#[pyo3(signature = (known, confidence_level=0.95, config_json=None))]
pub fn solve(known: VarMap, confidence_level: f64, config_json: Option<&str>) -> PyResult<HashMap<String, PyStatValue>> {
    let ledger = solver(config_json)?
        .solve_at(&known, confidence_level)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(ledger.into_records().into_iter().map(|(k, v)| (k, v.into())).collect())
}

/// Same as `solve`, rendered as a text audit trace.
#[pyfunction]
#[pyo3(signature = (known, confidence_level=0.95, config_json=None))]
pub fn audit_report(known: VarMap, confidence_level: f64, config_json: Option<&str>) -> PyResult<String> {
    let ledger = solver(config_json)?
        .solve_at(&known, confidence_level)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(trace::format_report(&ledger))
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyStatValue>()?;
    m.add_function(wrap_pyfunction!(solve, m)?)?;
    m.add_function(wrap_pyfunction!(audit_report, m)?)?;
    Ok(())
}
