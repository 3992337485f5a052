use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::domain::Sort;
use crate::engine::{BoundCheck, Claim};
use crate::error::Result;
use crate::interval::{Interval, IntervalType};
use crate::ops::Operation;
use crate::solver::Session;

fn single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let claim = Claim::between(a.lo().sub(b.lo()), a.hi().sub(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Sub, a, b, claim))
}

fn bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int).with_kind(IntervalType::NotPoint);
    let b = Interval::bounded(ctx, "b", Sort::Int).with_kind(IntervalType::NotPoint);
    let claim = Claim::between(a.lo().sub(b.hi()), a.hi().sub(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Sub, a, b, claim))
}

fn a_upper_b_lower<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_most(ctx, "a", Sort::Int);
    let b = Interval::at_least(ctx, "b", Sort::Int);
    let claim = Claim::at_most(a.hi().sub(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Sub, a, b, claim))
}

fn a_lower_b_upper<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_least(ctx, "a", Sort::Int);
    let b = Interval::at_most(ctx, "b", Sort::Int);
    let claim = Claim::at_least(a.lo().sub(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Sub, a, b, claim))
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "sub",
            "single_point",
            "[a0, a0] - [b0, b0] in [a0 - b0, a1 - b1]",
            Expect::proved().tight(Some(true), Some(true)),
            single_point,
        ),
        Scenario::new(
            "sub",
            "bounded",
            "[a0, a1] - [b0, b1] in [a0 - b1, a1 - b0]",
            Expect::proved().tight(Some(true), Some(true)),
            bounded,
        ),
        Scenario::new(
            "sub",
            "a_upper_b_lower",
            "[_, a1] - [b0, _] in [_, a1 - b0]",
            Expect::proved().tight(None, Some(true)),
            a_upper_b_lower,
        ),
        Scenario::new(
            "sub",
            "a_lower_b_upper",
            "[a0, _] - [_, b1] in [a0 - b1, _]",
            Expect::proved().tight(Some(true), None),
            a_lower_b_upper,
        ),
    ]
}
