use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::domain::Sort;
use crate::engine::{BoundCheck, Claim};
use crate::error::Result;
use crate::interval::Interval;
use crate::ops::Operation;
use crate::solver::Session;

fn max_single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let m = a.lo().max(b.lo());
    evaluate(session, tightness, &BoundCheck::new(Operation::Max, a, b, Claim::between(m.clone(), m)))
}

fn max_not_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::bounded(ctx, "b", Sort::Int);
    let claim = Claim::between(a.lo().max(b.lo()), a.hi().max(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Max, a, b, claim))
}

fn min_single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let m = a.lo().min(b.lo());
    evaluate(session, tightness, &BoundCheck::new(Operation::Min, a, b, Claim::between(m.clone(), m)))
}

fn min_not_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::bounded(ctx, "b", Sort::Int);
    let claim = Claim::between(a.lo().min(b.lo()), a.hi().min(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Min, a, b, claim))
}

/// `max(a0, b0)` is only a lower bound; the upper side is left open.
fn max_lower_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let s16 = Sort::Signed(16);
    let a = Interval::at_least(ctx, "a", s16);
    let b = Interval::at_least(ctx, "b", s16);
    let claim = Claim::at_least(a.lo().max(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Max, a, b, claim))
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "minmax",
            "max_single_point",
            "max([a0, a0], [b0, b0]) in [max(a0, b0), max(a0, b0)]",
            Expect::proved().tight(Some(true), Some(true)),
            max_single_point,
        ),
        Scenario::new(
            "minmax",
            "max_not_point",
            "max([a0, a1], [b0, b1]) in [max(a0, b0), max(a1, b1)]",
            Expect::proved().tight(Some(true), Some(true)),
            max_not_point,
        ),
        Scenario::new(
            "minmax",
            "min_single_point",
            "min([a0, a0], [b0, b0]) in [min(a0, b0), min(a0, b0)]",
            Expect::proved().tight(Some(true), Some(true)),
            min_single_point,
        ),
        Scenario::new(
            "minmax",
            "min_not_point",
            "min([a0, a1], [b0, b1]) in [min(a0, b0), min(a1, b1)]",
            Expect::proved().tight(Some(true), Some(true)),
            min_not_point,
        ),
        Scenario::new(
            "minmax",
            "max_lower_bounded",
            "i16: max([a0, _], [b0, _]) in [max(a0, b0), _]",
            Expect::proved().tight(Some(true), None),
            max_lower_bounded,
        ),
    ]
}
