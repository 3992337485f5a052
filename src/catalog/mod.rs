//! Named bound rules and what each is expected to yield.
//!
//! Every [`Scenario`] owns a private solver context for the duration of its run.
//! Rules prefixed `bug_` reproduce known-wrong formulas and are expected to be
//! disproved; `fix_` rules are their corrected counterparts.

use log::info;
use z3::Context;

use crate::engine::{Outcome, Problem, Tightness, TightnessReport};
use crate::error::Result;
use crate::solver::{Session, SolverConfig};

mod add;
mod bitwise;
mod boolean;
mod compare;
mod div;
mod minmax;
mod modulo;
mod mul;
mod select;
mod shift_left;
mod shift_right;
mod sub;

/// Expected safety verdict of a scenario.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    Proved,
    Disproved,
    /// Recorded for exploration; any decided outcome is accepted.
    Unspecified,
}

/// What a scenario should produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Expect {
    pub verdict: Verdict,
    /// Expected tightness of the lower claim, when tightness is queried.
    pub lower_tight: Option<bool>,
    pub upper_tight: Option<bool>,
}

impl Expect {
    pub const fn proved() -> Self {
        Self::new(Verdict::Proved)
    }

    pub const fn disproved() -> Self {
        Self::new(Verdict::Disproved)
    }

    pub const fn unspecified() -> Self {
        Self::new(Verdict::Unspecified)
    }

    const fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            lower_tight: None,
            upper_tight: None,
        }
    }

    pub const fn tight(self, lower: Option<bool>, upper: Option<bool>) -> Self {
        Self {
            lower_tight: lower,
            upper_tight: upper,
            ..self
        }
    }

    pub fn wants_tightness(&self) -> bool {
        self.lower_tight.is_some() || self.upper_tight.is_some()
    }

    /// Whether `report` agrees with this expectation.
    pub fn admits(&self, report: &ScenarioReport) -> bool {
        let verdict_ok = match (self.verdict, &report.outcome) {
            (_, Outcome::Misconfigured(_)) | (_, Outcome::Indeterminate { .. }) => false,
            (Verdict::Proved, outcome) => outcome.is_proved(),
            (Verdict::Disproved, outcome) => outcome.is_disproved(),
            (Verdict::Unspecified, _) => true,
        };
        let tight_ok = match &report.tightness {
            None => true,
            Some(TightnessReport::Misconfigured(_)) => false,
            Some(t) => {
                let side = |expected: Option<bool>, got: Option<&Tightness>| match (expected, got) {
                    (None, _) => true,
                    (Some(_), Some(Tightness::Indeterminate { .. })) | (Some(_), None) => false,
                    (Some(want), Some(got)) => got.is_tight() == want,
                };
                side(self.lower_tight, t.lower()) && side(self.upper_tight, t.upper())
            }
        };
        verdict_ok && tight_ok
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cost {
    Cheap,
    /// Known to take the solver a long time.
    Expensive,
}

/// Outcome of running one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub outcome: Outcome,
    /// Present when tightness was requested and the claim was proved.
    pub tightness: Option<TightnessReport>,
}

type Body = for<'ctx> fn(&Session<'ctx>, bool) -> Result<ScenarioReport>;

pub struct Scenario {
    pub family: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub expect: Expect,
    pub cost: Cost,
    body: Body,
}

impl Scenario {
    pub(crate) const fn new(family: &'static str, name: &'static str, description: &'static str, expect: Expect, body: Body) -> Self {
        Self {
            family,
            name,
            description,
            expect,
            cost: Cost::Cheap,
            body,
        }
    }

    pub(crate) const fn expensive(self) -> Self {
        Self {
            cost: Cost::Expensive,
            ..self
        }
    }

    /// `family::name`
    pub fn id(&self) -> String {
        format!("{}::{}", self.family, self.name)
    }

    /// Runs the scenario in a fresh context, querying tightness if requested and expected.
    pub fn run(&self, config: &SolverConfig, tightness: bool) -> Result<ScenarioReport> {
        info!("running {}", self.id());
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config.clone());
        let report = (self.body)(&session, tightness && self.expect.wants_tightness())?;
        info!("{}: {}", self.id(), report.outcome);
        Ok(report)
    }
}

/// Checks `problem`, and its tightness when asked and the claim holds.
pub(crate) fn evaluate<'ctx>(session: &Session<'ctx>, tightness: bool, problem: &impl Problem<'ctx>) -> Result<ScenarioReport> {
    let outcome = problem.check(session)?;
    let tightness = if tightness && outcome.is_proved() {
        Some(problem.check_tightness(session)?)
    } else {
        None
    };
    Ok(ScenarioReport { outcome, tightness })
}

/// Wraps an outcome computed without a [`Problem`].
pub(crate) fn outcome_only(outcome: Outcome) -> Result<ScenarioReport> {
    Ok(ScenarioReport { outcome, tightness: None })
}

/// Every scenario, grouped by family.
pub fn all() -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    scenarios.extend(add::scenarios());
    scenarios.extend(sub::scenarios());
    scenarios.extend(mul::scenarios());
    scenarios.extend(div::scenarios());
    scenarios.extend(modulo::scenarios());
    scenarios.extend(minmax::scenarios());
    scenarios.extend(compare::scenarios());
    scenarios.extend(boolean::scenarios());
    scenarios.extend(select::scenarios());
    scenarios.extend(bitwise::scenarios());
    scenarios.extend(shift_left::scenarios());
    scenarios.extend(shift_right::scenarios());
    scenarios
}

/// Scenarios whose id contains `pattern`.
pub fn matching(pattern: &str) -> Vec<Scenario> {
    all().into_iter().filter(|s| s.id().contains(pattern)).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use test_log::test;

    use super::*;
    use crate::engine::Misconfiguration;

    #[test]
    fn test_ids_are_unique() {
        let scenarios = all();
        let ids: HashSet<String> = scenarios.iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), scenarios.len());
    }

    #[test]
    fn test_bug_and_fix_conventions() {
        for s in all() {
            if s.name.starts_with("bug_") {
                assert_eq!(s.expect.verdict, Verdict::Disproved, "{}", s.id());
            }
        }
    }

    #[test]
    fn test_admits() {
        let proved = ScenarioReport {
            outcome: Outcome::Proved,
            tightness: Some(TightnessReport::Sides {
                lower: Some(Tightness::NotTight),
                upper: None,
            }),
        };
        assert!(Expect::proved().admits(&proved));
        assert!(Expect::proved().tight(Some(false), None).admits(&proved));
        assert!(!Expect::proved().tight(Some(true), None).admits(&proved));
        assert!(!Expect::proved().tight(None, Some(true)).admits(&proved));
        assert!(!Expect::disproved().admits(&proved));
        assert!(Expect::unspecified().admits(&proved));

        let undecided = ScenarioReport {
            outcome: Outcome::Indeterminate {
                reason: "timeout".to_string(),
            },
            tightness: None,
        };
        assert!(!Expect::unspecified().admits(&undecided));
        assert!(!Expect::proved().admits(&undecided));

        let inconsistent = ScenarioReport {
            outcome: Outcome::Proved,
            tightness: Some(TightnessReport::Misconfigured(Misconfiguration::InconsistentAssumptions)),
        };
        assert!(!Expect::proved().admits(&inconsistent));
    }
}
