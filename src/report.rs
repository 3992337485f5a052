//! Human-readable rendering of check results.

use std::fmt::{Display, Formatter};

use crate::engine::{Counterexample, Misconfiguration, Outcome, Tightness, TightnessReport, Witness};
use crate::value::Value;

fn or_blank(v: &Option<Value>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "_".to_string(),
    }
}

impl Display for Misconfiguration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Misconfiguration::NoClaim => write!(f, "no bound is claimed"),
            Misconfiguration::InconsistentAssumptions => write!(f, "input constraints are unsatisfiable"),
            Misconfiguration::ArityMismatch { expected, found } => {
                write!(f, "expected {} operands, found {}", expected, found)
            }
        }
    }
}

impl Display for Counterexample {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let endpoints: Vec<String> = self
            .endpoints
            .iter()
            .map(|(n, v)| format!("{} = {}", n, or_blank(v)))
            .collect();
        writeln!(f, "endpoints: {}", endpoints.join(", "))?;
        let operands: Vec<String> = self.operands.iter().map(|(n, v)| format!("{} = {}", n, v)).collect();
        writeln!(f, "operands: {}", operands.join(", "))?;
        write!(
            f,
            "{} = {} outside [{}, {}]",
            self.expression,
            self.result,
            or_blank(&self.claimed_lower),
            or_blank(&self.claimed_upper)
        )?;
        match self.confirmed {
            Some(false) => write!(f, " (unconfirmed)")?,
            None => write!(f, " (not replayed)")?,
            Some(true) => {}
        }
        Ok(())
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Proved => write!(f, "proved"),
            Outcome::Disproved(cex) => write!(f, "disproved\n{}", cex),
            Outcome::Indeterminate { reason } => write!(f, "indeterminate ({})", reason),
            Outcome::Misconfigured(m) => write!(f, "misconfigured: {}", m),
        }
    }
}

impl Display for Witness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let operands: Vec<String> = self.operands.iter().map(|(n, v)| format!("{} = {}", n, v)).collect();
        write!(f, "{} gives {} == {}", operands.join(", "), self.result, self.bound)
    }
}

impl Display for Tightness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Tightness::Tight(w) => write!(f, "tight ({})", w),
            Tightness::NotTight => write!(f, "not tight"),
            Tightness::Indeterminate { reason } => write!(f, "indeterminate ({})", reason),
        }
    }
}

impl Display for TightnessReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let side = |t: &Option<Tightness>| match t {
            Some(t) => t.to_string(),
            None => "unclaimed".to_string(),
        };
        match self {
            TightnessReport::Sides { lower, upper } => write!(f, "lower: {}; upper: {}", side(lower), side(upper)),
            TightnessReport::Misconfigured(m) => write!(f, "misconfigured: {}", m),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_counterexample_rendering() {
        let cex = Counterexample {
            expression: "i << j".to_string(),
            endpoints: vec![("a0".to_string(), Some(Value::from(-125))), ("a1".to_string(), None)],
            operands: vec![("i".to_string(), Value::from(-66)), ("j".to_string(), Value::from(-1))],
            result: Value::from(-33),
            claimed_lower: Some(Value::from(-1)),
            claimed_upper: None,
            confirmed: Some(true),
        };
        let text = Outcome::Disproved(Box::new(cex)).to_string();
        assert!(text.starts_with("disproved\n"));
        assert!(text.contains("a0 = -125, a1 = _"));
        assert!(text.contains("i = -66, j = -1"));
        assert!(text.ends_with("i << j = -33 outside [-1, _]"));
    }

    #[test]
    fn test_tightness_rendering() {
        let report = TightnessReport::Sides {
            lower: Some(Tightness::NotTight),
            upper: None,
        };
        assert_eq!(report.to_string(), "lower: not tight; upper: unclaimed");
        assert_eq!(
            TightnessReport::Misconfigured(Misconfiguration::InconsistentAssumptions).to_string(),
            "misconfigured: input constraints are unsatisfiable"
        );
        assert_eq!(
            Outcome::Misconfigured(Misconfiguration::NoClaim).to_string(),
            "misconfigured: no bound is claimed"
        );
    }
}
