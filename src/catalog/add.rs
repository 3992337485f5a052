use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::domain::Sort;
use crate::engine::{BoundCheck, Claim};
use crate::error::Result;
use crate::interval::{Interval, IntervalType};
use crate::ops::Operation;
use crate::solver::Session;

fn both_sides<'ctx>(session: &Session<'ctx>, tightness: bool, kind: IntervalType) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int).with_kind(kind);
    let b = Interval::bounded(ctx, "b", Sort::Int).with_kind(kind);
    let claim = Claim::between(a.lo().add(b.lo()), a.hi().add(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Add, a, b, claim))
}

fn single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    both_sides(session, tightness, IntervalType::Point)
}

fn bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    both_sides(session, tightness, IntervalType::NotPoint)
}

fn upper_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_most(ctx, "a", Sort::Int);
    let b = Interval::at_most(ctx, "b", Sort::Int);
    let claim = Claim::at_most(a.hi().add(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Add, a, b, claim))
}

fn lower_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_least(ctx, "a", Sort::Int);
    let b = Interval::at_least(ctx, "b", Sort::Int);
    let claim = Claim::at_least(a.lo().add(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Add, a, b, claim))
}

pub(super) fn scenarios() -> Vec<Scenario> {
    let tight = Expect::proved().tight(Some(true), Some(true));
    vec![
        Scenario::new("add", "single_point", "[a0, a0] + [b0, b0] in [a0 + b0, a1 + b1]", tight, single_point),
        Scenario::new("add", "bounded", "[a0, a1] + [b0, b1] in [a0 + b0, a1 + b1]", tight, bounded),
        Scenario::new(
            "add",
            "upper_bounded",
            "[_, a1] + [_, b1] in [_, a1 + b1]",
            Expect::proved().tight(None, Some(true)),
            upper_bounded,
        ),
        Scenario::new(
            "add",
            "lower_bounded",
            "[a0, _] + [b0, _] in [a0 + b0, _]",
            Expect::proved().tight(Some(true), None),
            lower_bounded,
        ),
    ]
}
