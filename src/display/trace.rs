use crate::compute::ledger::{relative_error, ConsistencyLedger, StatValue};
use std::fmt::Write;

/// Plain-text audit of a solve: every reported variable, where it came from, and any
/// derivation that disagreed with it.
pub fn format_report(ledger: &ConsistencyLedger) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "AUDIT TRACE ({} variables, {} inconsistent):", ledger.len(), ledger.conflicts().count());
    let _ = writeln!(output, "--------------------------------------------------");

    for (name, record) in ledger.iter() {
        trace_record(&mut output, name, record);
    }
    output
}

fn trace_record(output: &mut String, name: &str, record: &StatValue) {
    let kind = if record.calculated { "derived" } else { "input" };
    let source = record.provenance.strip_prefix("Calculated from ").unwrap_or("");
    if source.is_empty() {
        let _ = writeln!(output, "[{}] {}{}", kind, name, format_value(record.value));
    } else {
        let _ = writeln!(output, "[{}] {}{} <- {}", kind, name, format_value(record.value), source);
    }

    let count = record.alternative_calculations.len();
    for (i, (signature, value)) in record.alternative_calculations.iter().enumerate() {
        let connector = if i == count - 1 { "`--" } else { "|--" };
        let err = relative_error(*value, record.value);
        let _ = writeln!(
            output,
            "   {} ALT {}{} <- {} (rel. err {})",
            connector, name, format_value(*value), signature, format_pct(err)
        );
    }
}

fn format_value(v: f64) -> String {
    if v.is_nan() { "[NaN]".to_string() } else { format!("[{:.3}]", v) }
}

fn format_pct(err: f64) -> String {
    if err.is_finite() { format!("{:.1}%", err * 100.0) } else { "n/a".to_string() }
}
