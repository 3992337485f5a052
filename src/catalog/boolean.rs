use super::{outcome_only, Expect, Scenario, ScenarioReport};
use crate::engine::check_boolean;
use crate::error::Result;
use crate::interval::BoolInterval;
use crate::ops::{make_and, make_not, make_or, BoolOperation};
use crate::solver::Session;

fn and<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = BoolInterval::new(ctx, "a");
    let b = BoolInterval::new(ctx, "b");
    let emin = make_and(a.lower(), b.lower());
    let emax = make_and(a.upper(), b.upper());
    outcome_only(check_boolean(session, BoolOperation::And, &[&a, &b], emin, emax)?)
}

fn or<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = BoolInterval::new(ctx, "a");
    let b = BoolInterval::new(ctx, "b");
    let emin = make_or(a.lower(), b.lower());
    let emax = make_or(a.upper(), b.upper());
    outcome_only(check_boolean(session, BoolOperation::Or, &[&a, &b], emin, emax)?)
}

fn not<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let e = BoolInterval::new(session.context(), "e");
    let emin = make_not(e.upper());
    let emax = make_not(e.lower());
    outcome_only(check_boolean(session, BoolOperation::Not, &[&e], emin, emax)?)
}

/// Negating the extremes without swapping them.
fn bug_not_unswapped<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let e = BoolInterval::new(session.context(), "e");
    let emin = make_not(e.lower());
    let emax = make_not(e.lower());
    outcome_only(check_boolean(session, BoolOperation::Not, &[&e], emin, emax)?)
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "boolean",
            "and",
            "[a0, a1] && [b0, b1] in [a0 && b0, a1 && b1]",
            Expect::proved(),
            and,
        ),
        Scenario::new("boolean", "or", "[a0, a1] || [b0, b1] in [a0 || b0, a1 || b1]", Expect::proved(), or),
        Scenario::new("boolean", "not", "![e0, e1] in [!e1, !e0]", Expect::proved(), not),
        Scenario::new(
            "boolean",
            "bug_not_unswapped",
            "![e0, e1] in [!e0, !e0]",
            Expect::disproved(),
            bug_not_unswapped,
        ),
    ]
}
