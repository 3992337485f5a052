use z3::ast::{Ast, Bool};

use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::domain::{Scalar, Sort};
use crate::engine::{Claim, SelectCheck};
use crate::error::Result;
use crate::interval::{BoolInterval, Interval};
use crate::solver::Session;

/// Which side of the result a rule bounds.
#[derive(Copy, Clone)]
enum Side {
    Min,
    Max,
}

/// What is known about the condition's extremes.
#[derive(Copy, Clone)]
enum Knowledge {
    /// The two operands share the bounded endpoint.
    SameEndpoint,
    SinglePoint,
    /// Known to take both values.
    Both,
    UpperTrue,
    LowerFalse,
    Unknown,
}

fn rule<'ctx>(session: &Session<'ctx>, tightness: bool, side: Side, knowledge: Knowledge) -> Result<ScenarioReport> {
    let ctx = session.context();
    let cond = BoolInterval::new(ctx, "c");
    let (a, b) = match side {
        Side::Min => (Interval::at_least(ctx, "a", Sort::Int), Interval::at_least(ctx, "b", Sort::Int)),
        Side::Max => (Interval::at_most(ctx, "a", Sort::Int), Interval::at_most(ctx, "b", Sort::Int)),
    };
    let (ea, eb) = match side {
        Side::Min => (a.lo().clone(), b.lo().clone()),
        Side::Max => (a.hi().clone(), b.hi().clone()),
    };
    let pick = |x: &Scalar<'ctx>, y: &Scalar<'ctx>| match side {
        Side::Min => x.min(y),
        Side::Max => x.max(y),
    };
    let (c0, c1) = (cond.lower().clone(), cond.upper().clone());

    let (assumption, bound) = match knowledge {
        Knowledge::SameEndpoint => (Some(ea.eq(&eb)), ea.clone()),
        Knowledge::SinglePoint => (Some(c0._eq(&c1)), Scalar::select(&c0, &ea, &eb)),
        Knowledge::Both => (Some(Bool::and(ctx, &[&c0.not(), &c1])), pick(&ea, &eb)),
        Knowledge::UpperTrue => (Some(c1.clone()), pick(&Scalar::select(&c0, &ea, &eb), &ea)),
        Knowledge::LowerFalse => (Some(c0.not()), pick(&Scalar::select(&c1, &ea, &eb), &eb)),
        Knowledge::Unknown => (None, pick(&Scalar::select(&c0, &ea, &eb), &Scalar::select(&c1, &ea, &eb))),
    };
    let claim = match side {
        Side::Min => Claim::at_least(bound),
        Side::Max => Claim::at_most(bound),
    };

    let mut problem = SelectCheck::new(cond, a, b, claim);
    if let Some(assumption) = assumption {
        problem = problem.assume(assumption);
    }
    evaluate(session, tightness, &problem)
}

fn min_same_endpoint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Min, Knowledge::SameEndpoint)
}

fn min_single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Min, Knowledge::SinglePoint)
}

fn min_known_both<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Min, Knowledge::Both)
}

fn min_upper_true<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Min, Knowledge::UpperTrue)
}

fn min_lower_false<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Min, Knowledge::LowerFalse)
}

fn min_unknown<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Min, Knowledge::Unknown)
}

fn max_same_endpoint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Max, Knowledge::SameEndpoint)
}

fn max_single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Max, Knowledge::SinglePoint)
}

fn max_known_both<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Max, Knowledge::Both)
}

fn max_upper_true<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Max, Knowledge::UpperTrue)
}

fn max_lower_false<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Max, Knowledge::LowerFalse)
}

fn max_unknown<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    rule(session, tightness, Side::Max, Knowledge::Unknown)
}

/// Trusts the condition's lower extreme even though it may still flip.
fn bug_min_cond_lower<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let cond = BoolInterval::new(ctx, "c");
    let a = Interval::at_least(ctx, "a", Sort::Int);
    let b = Interval::at_least(ctx, "b", Sort::Int);
    let claim = Claim::at_least(Scalar::select(cond.lower(), a.lo(), b.lo()));
    evaluate(session, tightness, &SelectCheck::new(cond, a, b, claim))
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "select",
            "min_same_endpoint",
            "select(c, [a0, _], [b0, _]), a0 == b0 in [a0, _]",
            Expect::proved().tight(Some(true), None),
            min_same_endpoint,
        ),
        Scenario::new(
            "select",
            "min_single_point",
            "select([c, c], [a0, _], [b0, _]) in [select(c0, a0, b0), _]",
            Expect::proved().tight(Some(true), None),
            min_single_point,
        ),
        Scenario::new(
            "select",
            "min_known_both",
            "select([false, true], [a0, _], [b0, _]) in [min(a0, b0), _]",
            Expect::proved().tight(Some(true), None),
            min_known_both,
        ),
        Scenario::new(
            "select",
            "min_upper_true",
            "select([c0, true], [a0, _], [b0, _]) in [min(select(c0, a0, b0), a0), _]",
            Expect::proved().tight(Some(true), None),
            min_upper_true,
        ),
        Scenario::new(
            "select",
            "min_lower_false",
            "select([false, c1], [a0, _], [b0, _]) in [min(select(c1, a0, b0), b0), _]",
            Expect::proved().tight(Some(true), None),
            min_lower_false,
        ),
        Scenario::new(
            "select",
            "min_unknown",
            "select([c0, c1], [a0, _], [b0, _]) in [min(select(c0, a0, b0), select(c1, a0, b0)), _]",
            Expect::proved().tight(Some(true), None),
            min_unknown,
        ),
        Scenario::new(
            "select",
            "max_same_endpoint",
            "select(c, [_, a1], [_, b1]), a1 == b1 in [_, a1]",
            Expect::proved().tight(None, Some(true)),
            max_same_endpoint,
        ),
        Scenario::new(
            "select",
            "max_single_point",
            "select([c, c], [_, a1], [_, b1]) in [_, select(c0, a1, b1)]",
            Expect::proved().tight(None, Some(true)),
            max_single_point,
        ),
        Scenario::new(
            "select",
            "max_known_both",
            "select([false, true], [_, a1], [_, b1]) in [_, max(a1, b1)]",
            Expect::proved().tight(None, Some(true)),
            max_known_both,
        ),
        Scenario::new(
            "select",
            "max_upper_true",
            "select([c0, true], [_, a1], [_, b1]) in [_, max(select(c0, a1, b1), a1)]",
            Expect::proved().tight(None, Some(true)),
            max_upper_true,
        ),
        Scenario::new(
            "select",
            "max_lower_false",
            "select([false, c1], [_, a1], [_, b1]) in [_, max(select(c1, a1, b1), b1)]",
            Expect::proved().tight(None, Some(true)),
            max_lower_false,
        ),
        Scenario::new(
            "select",
            "max_unknown",
            "select([c0, c1], [_, a1], [_, b1]) in [_, max(select(c0, a1, b1), select(c1, a1, b1))]",
            Expect::proved().tight(None, Some(true)),
            max_unknown,
        ),
        Scenario::new(
            "select",
            "bug_min_cond_lower",
            "select([c0, c1], [a0, _], [b0, _]) in [select(c0, a0, b0), _]",
            Expect::disproved(),
            bug_min_cond_lower,
        ),
    ]
}
