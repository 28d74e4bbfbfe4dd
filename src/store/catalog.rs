//! The built-in catalog of two-group comparison relationships.
//!
//! Registration order is derivation priority: within a target the most direct (most
//! accurate) formula comes first. Several quantities deliberately have more than one
//! independent route; the solver cross-checks them against each other.

use super::registry::EquationRegistry;
use super::types::{moe_name, TargetName, CONFIDENCE_LEVEL, PAIRED};
use crate::compute::interval::find_any_confidence_interval;
use crate::compute::kernel::{standard_normal_cdf, t_critical, t_inv, t_test_two_sided};
use crate::compute::terms::Terms;
use std::f64::consts::PI;

fn fixed(name: &str) -> TargetName {
    TargetName::fixed(name)
}

fn at_level(prefix: &str, suffix: &str) -> TargetName {
    TargetName::at_confidence(prefix, suffix)
}

fn is_paired(v: &mut Terms) -> bool {
    v.get(PAIRED) == 1.0
}

fn is_independent(v: &mut Terms) -> bool {
    v.get(PAIRED) == 0.0
}

/// `MoE <level>%<suffix>` at the requested confidence level.
fn requested_moe(v: &mut Terms, p: &mut Terms, suffix: &str) -> f64 {
    let level = p.get(CONFIDENCE_LEVEL);
    v.get(&moe_name(level, suffix))
}

/// Margin of error for `suffix` rescaled from whichever interval is known to the
/// requested level. `df` is read after the interval so probing reports both.
fn rescaled_moe(v: &mut Terms, p: &mut Terms, suffix: &str, df: fn(&mut Terms) -> f64) -> f64 {
    let ci = find_any_confidence_interval(v, suffix);
    let df = df(v);
    (ci.margin() / t_critical(ci.level, df)) * t_critical(p.get(CONFIDENCE_LEVEL), df)
}

fn mean_of_any_interval(v: &mut Terms, suffix: &str) -> f64 {
    find_any_confidence_interval(v, suffix).center()
}

pub(crate) fn populate(r: &mut EquationRegistry) {
    r.push(fixed("mean difference"), |v, _| v.get("mean2") - v.get("mean1"));

    // Degrees of freedom / group size
    r.push(fixed("degrees of freedom"), |v, _| {
        if is_paired(v) { v.get("n1") - 1.0 } else { v.get("n1") + v.get("n2") - 2.0 }
    });
    r.push(fixed("n1"), |v, _| {
        if is_paired(v) { v.get("degrees of freedom") + 1.0 } else { v.get("degrees of freedom") - v.get("n2") + 2.0 }
    });
    r.push(fixed("n2"), |v, _| {
        if is_paired(v) { v.get("degrees of freedom") + 1.0 } else { v.get("degrees of freedom") - v.get("n1") + 2.0 }
    });
    // Paired designs have n1 == n2.
    r.push(fixed("n1"), |v, _| if is_paired(v) { v.get("n2") } else { v.get("n1") });
    r.push(fixed("n2"), |v, _| if is_paired(v) { v.get("n1") } else { v.get("n2") });

    // Standard error
    r.push(fixed("SE1"), |v, _| v.get("SD1") / v.get("n1").sqrt());
    r.push(fixed("SE2"), |v, _| v.get("SD2") / v.get("n2").sqrt());
    r.push(fixed("SE"), |v, _| v.get("mean difference") / v.get("t-score"));
    r.push(fixed("SE"), |v, _| v.get("variability component") * v.get("sample size component"));

    // Standard deviation. Without raw data the best source is the standard error; the
    // margin of error route is less reliable.
    r.push(fixed("SD"), |v, _| v.get("variability component"));

    r.push(fixed("SD1"), |v, _| v.get("SE1") * v.get("n1").sqrt());
    r.push(fixed("SD1"), |v, p| {
        let level = p.get(CONFIDENCE_LEVEL);
        let moe = requested_moe(v, p, "1");
        let n1 = v.get("n1");
        (moe / t_critical(level, n1 - 1.0)) * n1.sqrt()
    });

    r.push(fixed("SD2"), |v, _| v.get("SE2") * v.get("n2").sqrt());
    r.push(fixed("SD2"), |v, p| {
        let level = p.get(CONFIDENCE_LEVEL);
        let moe = requested_moe(v, p, "2");
        let n2 = v.get("n2");
        (moe / t_critical(level, n2 - 1.0)) * n2.sqrt()
    });

    // Margins of error
    r.push(at_level("MoE ", ""), |v, p| {
        let t_alpha = t_critical(p.get(CONFIDENCE_LEVEL), v.get("degrees of freedom"));
        (t_alpha * v.get("mean difference") / v.get("t-score")).abs()
    });
    r.push(at_level("MoE ", ""), |v, p| rescaled_moe(v, p, "", |v| v.get("degrees of freedom")).abs());

    r.push(at_level("MoE ", "1"), |v, p| {
        t_critical(p.get(CONFIDENCE_LEVEL), v.get("n1") - 1.0) * v.get("SE1")
    });
    r.push(at_level("MoE ", "1"), |v, p| rescaled_moe(v, p, "1", |v| v.get("n1") - 1.0));

    r.push(at_level("MoE ", "2"), |v, p| {
        t_critical(p.get(CONFIDENCE_LEVEL), v.get("n2") - 1.0) * v.get("SE2")
    });
    r.push(at_level("MoE ", "2"), |v, p| rescaled_moe(v, p, "2", |v| v.get("n2") - 1.0));

    // Assumes symmetric intervals (normal / t based).
    r.push(fixed("mean difference"), |v, _| mean_of_any_interval(v, ""));

    // Confidence intervals
    r.push(at_level("CI ", " upper"), |v, p| v.get("mean difference") + requested_moe(v, p, ""));
    r.push(at_level("CI ", " lower"), |v, p| v.get("mean difference") - requested_moe(v, p, ""));

    r.push(at_level("CI ", " upper1"), |v, p| v.get("mean1") + requested_moe(v, p, "1"));
    r.push(at_level("CI ", " lower1"), |v, p| v.get("mean1") - requested_moe(v, p, "1"));

    r.push(at_level("CI ", " upper2"), |v, p| v.get("mean2") + requested_moe(v, p, "2"));
    r.push(at_level("CI ", " lower2"), |v, p| v.get("mean2") - requested_moe(v, p, "2"));

    r.push(fixed("t-score"), |v, _| {
        let ci = find_any_confidence_interval(v, "");
        let t_alpha = t_critical(ci.level, v.get("degrees of freedom"));
        t_alpha / ci.margin() * v.get("mean difference")
    });

    r.push(fixed("mean1"), |v, _| mean_of_any_interval(v, "1"));
    r.push(fixed("mean2"), |v, _| mean_of_any_interval(v, "2"));

    r.push(fixed("p-value"), |v, _| t_test_two_sided(v.get("t-score"), v.get("degrees of freedom")));

    // Redoing the t-test; last resort.
    // Independent: pooled standard deviation. Paired: SD of the differences.
    r.push(fixed("variability component"), |v, _| {
        if is_independent(v) {
            let (sd1, sd2) = (v.get("SD1"), v.get("SD2"));
            ((sd1 * sd1 + sd2 * sd2) / 2.0).sqrt()
        } else {
            v.get("mean SD difference")
        }
    });
    r.push(fixed("variability component"), |v, _| {
        v.get("mean difference") / v.get("t-score") / v.get("sample size component")
    });

    // Independent: sqrt(1/n1 + 1/n2). Paired: 1/sqrt(n1).
    r.push(fixed("sample size component"), |v, _| {
        if is_independent(v) {
            (1.0 / v.get("n1") + 1.0 / v.get("n2")).sqrt()
        } else {
            1.0 / v.get("n1").sqrt()
        }
    });

    // Prefer recovering t from the p-value; it adds no assumptions.
    r.push(fixed("t-score"), |v, _| t_inv(1.0 - v.get("p-value") / 2.0, v.get("degrees of freedom")));
    r.push(fixed("t-score"), |v, _| {
        let t = if is_independent(v) {
            v.get("Cohen d") / (1.0 / v.get("n1") + 1.0 / v.get("n2")).sqrt()
        } else {
            v.get("Cohen d") * v.get("n2").sqrt()
        };
        t.abs()
    });
    r.push(fixed("t-score"), |v, _| {
        v.get("mean difference") / (v.get("variability component") * v.get("sample size component"))
    });

    // Effect sizes
    r.push(fixed("pooled SD"), |v, _| {
        let (n1, n2) = (v.get("n1"), v.get("n2"));
        let (sd1, sd2) = (v.get("SD1"), v.get("SD2"));
        (((n2 - 1.0) * sd2 * sd2 + (n1 - 1.0) * sd1 * sd1) / (n1 + n2 - 2.0)).sqrt()
    });

    r.push(fixed("Cohen d"), |v, _| {
        let d = if is_independent(v) {
            v.get("mean difference") / v.get("pooled SD")
        } else {
            let (sd1, sd2) = (v.get("SD1"), v.get("SD2"));
            (v.get("mean2") - v.get("mean1")) / ((sd1 * sd1 + sd2 * sd2) / 2.0).sqrt()
        };
        d.abs()
    });
    r.push(fixed("Cohen d"), |v, _| {
        let d = if is_independent(v) {
            v.get("t-score") * (1.0 / v.get("n1") + 1.0 / v.get("n2")).sqrt()
        } else {
            v.get("t-score") / v.get("n2").sqrt()
        };
        d.abs()
    });

    r.push(fixed("rpb"), |v, _| {
        let d = v.get("Cohen d");
        d / (d * d + 4.0).sqrt()
    });
    r.push(fixed("Cohen f"), |v, _| v.get("Cohen d") / 2.0);
    // Logistic approximation.
    r.push(fixed("odds ratio"), |v, _| (v.get("Cohen d") * PI / 3f64.sqrt()).exp());
    r.push(fixed("CLES"), |v, _| standard_normal_cdf(v.get("Cohen d") / 2f64.sqrt()));
    r.push(fixed("S-value"), |v, _| -v.get("p-value").log2());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::DependencyProbe;
    use crate::store::VarMap;
    use rstest::rstest;

    fn vars(pairs: &[(&str, f64)]) -> VarMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn level(l: f64) -> VarMap {
        vars(&[(CONFIDENCE_LEVEL, l)])
    }

    #[test]
    fn test_catalog_shape() {
        let r = EquationRegistry::with_catalog();
        assert!(r.equation_count() >= 40);
        let first: Vec<String> = r.iter().take(4).map(|(t, _)| t.to_string()).collect();
        assert_eq!(first, vec!["mean difference", "degrees of freedom", "n1", "n2"]);
        assert_eq!(r.lookup("t-score").unwrap().len(), 4);
        assert_eq!(r.lookup("mean difference").unwrap().len(), 2);
    }

    #[test]
    fn test_catalog_never_reads_aliases() {
        let r = EquationRegistry::with_catalog();
        let referenced = r.referenced_variables(&level(0.95));
        assert!(referenced.contains(&"MoE 95%1".to_string()));
        assert!(referenced.contains(&"CI 95% upper".to_string()));
        for alias in ["standard deviation1", "t-value", "Cohen's d", "average1"] {
            assert!(!referenced.contains(&alias.to_string()), "{}", alias);
        }
    }

    // Signatures probed with nothing known except `paired`, which picks the branch.
    #[rstest]
    #[case("degrees of freedom", 0, 0.0, "n1, n2")]
    #[case("degrees of freedom", 0, 1.0, "n1")]
    #[case("sample size component", 0, 1.0, "n1")]
    #[case("variability component", 0, 1.0, "mean SD difference")]
    #[case("t-score", 1, 0.0, "degrees of freedom, p-value")]
    #[case("t-score", 0, 0.0, "CI 95% lower, CI 95% upper, degrees of freedom, mean difference")]
    #[case("MoE XX%1", 0, 0.0, "SE1, n1")]
    #[case("SD1", 1, 0.0, "MoE 95%1, n1")]
    fn test_dependency_signatures(#[case] target: &str, #[case] rank: usize, #[case] paired: f64, #[case] expected: &str) {
        let r = EquationRegistry::with_catalog();
        let eq = &r.lookup(target).unwrap()[rank];
        let deps = eq.probe_with(&mut DependencyProbe::seeded(0), &vars(&[(PAIRED, paired)]), &level(0.95));
        assert_eq!(deps.signature(), expected);
    }

    #[test]
    fn test_degrees_of_freedom() {
        let r = EquationRegistry::with_catalog();
        let dof = &r.lookup("degrees of freedom").unwrap()[0];
        assert_eq!(dof.evaluate(&vars(&[("paired", 0.0), ("n1", 12.0), ("n2", 12.0)]), &VarMap::new()), 22.0);
        assert_eq!(dof.evaluate(&vars(&[("paired", 1.0), ("n1", 10.0)]), &VarMap::new()), 9.0);
    }

    #[test]
    fn test_moe_rescaling_round_trip() {
        let r = EquationRegistry::with_catalog();
        let moe = &r.lookup("MoE XX%").unwrap()[1];
        // A 90% interval of half-width 2 rescaled to 90% is unchanged.
        let v = vars(&[("CI 90% upper", 5.0), ("CI 90% lower", 1.0), ("degrees of freedom", 20.0)]);
        assert!((moe.evaluate(&v, &level(0.9)) - 2.0).abs() < 1e-9);
        // Rescaled to 95% it widens by the ratio of critical values.
        let expected = 2.0 / t_critical(0.9, 20.0) * t_critical(0.95, 20.0);
        assert!((moe.evaluate(&v, &level(0.95)) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_effect_sizes() {
        let r = EquationRegistry::with_catalog();
        let d = vars(&[("Cohen d", 0.5)]);
        let eval = |name: &str| r.lookup(name).unwrap()[0].evaluate(&d, &VarMap::new());
        assert!((eval("Cohen f") - 0.25).abs() < 1e-12);
        assert!((eval("rpb") - 0.5 / 4.25f64.sqrt()).abs() < 1e-12);
        assert!((eval("odds ratio") - (0.5 * PI / 3f64.sqrt()).exp()).abs() < 1e-12);
        assert!((eval("CLES") - 0.638_163).abs() < 1e-4);

        let s = r.lookup("S-value").unwrap()[0].evaluate(&vars(&[("p-value", 0.05)]), &VarMap::new());
        assert!((s - 4.321_928).abs() < 1e-6);
    }
}
