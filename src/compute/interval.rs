use super::terms::Terms;
use crate::store::{ci_name, Bound};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Fraction, e.g. 0.95.
    pub level: f64,
}

impl ConfidenceInterval {
    pub fn margin(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }

    pub fn center(&self) -> f64 {
        self.margin() + self.lower
    }
}

/// Splits `CI <level>% <bound><suffix>` into its level (as a fraction) and bound.
fn parse_ci_name(name: &str, suffix: &str) -> Option<(f64, Bound)> {
    let rest = name.strip_prefix("CI ")?;
    let (pct, rest) = rest.split_once("% ")?;
    let bound = match rest.strip_suffix(suffix)? {
        "upper" => Bound::Upper,
        "lower" => Bound::Lower,
        _ => return None,
    };
    if !pct.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let pct: f64 = pct.parse().ok()?;
    if pct <= 0.0 || pct >= 100.0 {
        return None;
    }
    Some((pct / 100.0, bound))
}

/// Finds any complete `upper`/`lower` pair for `suffix` ("", "1" or "2"), whatever its level.
///
/// Bounds are ordered with min/max, so swapped labels still give a valid interval. When
/// no pair exists the 95% names are read anyway, which makes a probe report exactly those
/// two keys as missing.
pub fn find_any_confidence_interval(terms: &mut Terms, suffix: &str) -> ConfidenceInterval {
    // Both halves are matched by parsed level, so `CI 95.0% upper` pairs with `CI 95% lower`.
    let bounds: Vec<(&str, f64, Bound)> = terms
        .names()
        .filter_map(|name| parse_ci_name(name, suffix).map(|(level, bound)| (name, level, bound)))
        .collect();
    for &(name, level, bound) in &bounds {
        let other_half = bounds
            .iter()
            .find(|&&(_, l, b)| b == bound.other() && (l - level).abs() < 1e-9);
        if let Some(&(other, _, _)) = other_half {
            let a = terms.get(name);
            let b = terms.get(other);
            return ConfidenceInterval { lower: a.min(b), upper: a.max(b), level };
        }
    }

    ConfidenceInterval {
        lower: terms.get(&ci_name(0.95, Bound::Lower, suffix)),
        upper: terms.get(&ci_name(0.95, Bound::Upper, suffix)),
        level: 0.95,
    }
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

    #[rstest]
    #[case("CI 95% upper", "", Some((0.95, Bound::Upper)))]
    #[case("CI 90% lower1", "1", Some((0.90, Bound::Lower)))]
    #[case("CI 97.5% upper2", "2", Some((0.975, Bound::Upper)))]
    #[case("CI 95% upper1", "", None)]
    #[case("CI 95% upper", "1", None)]
    #[case("CI XX% upper", "", None)]
    #[case("MoE 95%", "", None)]
    fn test_parse_ci_name(#[case] name: &str, #[case] suffix: &str, #[case] expected: Option<(f64, Bound)>) {
        let parsed = parse_ci_name(name, suffix);
        match (parsed, expected) {
            (Some((l, b)), Some((el, eb))) => {
                assert!((l - el).abs() < 1e-12);
                assert_eq!(b, eb);
            }
            (None, None) => {}
            other => panic!("{}: {:?}", name, other),
        }
    }

    #[test]
    fn test_finds_pair_at_any_level() {
        let v = vars(&[("CI 90% upper1", 7.0), ("CI 90% lower1", 3.0), ("CI 95% upper", 1.0)]);
        let mut t = Terms::direct(&v);
        let ci = find_any_confidence_interval(&mut t, "1");
        assert_eq!(ci, ConfidenceInterval { lower: 3.0, upper: 7.0, level: 0.9 });
        assert_eq!(ci.margin(), 2.0);
        assert_eq!(ci.center(), 5.0);
    }

    #[test]
    fn test_pairs_non_canonical_level_literals() {
        let v = vars(&[("CI 95.0% upper2", 9.0), ("CI 95.0% lower2", 1.0)]);
        let mut t = Terms::direct(&v);
        let ci = find_any_confidence_interval(&mut t, "2");
        assert_eq!(ci, ConfidenceInterval { lower: 1.0, upper: 9.0, level: 0.95 });

        let v = vars(&[("CI 90.00% upper", 6.0), ("CI 90% lower", 2.0)]);
        let mut t = Terms::direct(&v);
        assert_eq!(find_any_confidence_interval(&mut t, "").margin(), 2.0);
    }

    #[test]
    fn test_swapped_bounds_are_normalized() {
        let v = vars(&[("CI 95% upper", 1.0), ("CI 95% lower", 5.0)]);
        let mut t = Terms::direct(&v);
        let ci = find_any_confidence_interval(&mut t, "");
        assert_eq!((ci.lower, ci.upper), (1.0, 5.0));
    }

    #[test]
    fn test_half_pair_falls_back_to_95() {
        let v = vars(&[("CI 90% upper", 4.0)]);
        let mut probe = DependencyProbe::seeded(5);
        let deps = probe.run(
            |v, _| find_any_confidence_interval(v, "").center(),
            &v,
            &VarMap::new(),
        );
        let missing: Vec<&str> = deps.missing_variables.iter().map(String::as_str).collect();
        assert_eq!(missing, vec!["CI 95% lower", "CI 95% upper"]);
    }
}
