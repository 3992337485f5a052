use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::bound::Restriction;
use crate::domain::{Scalar, Sort};
use crate::engine::{BoundCheck, Claim};
use crate::error::Result;
use crate::interval::{Interval, IntervalType};
use crate::ops::{abs, halide_div, Operation};
use crate::solver::Session;

fn bounded_pos_unbounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int).restrict_lower(Restriction::NonNegative);
    let b = Interval::unbounded(ctx, "b", Sort::Int);
    let claim = Claim::between(a.hi().neg(), a.hi().clone());
    evaluate(session, tightness, &BoundCheck::new(Operation::Div, a, b, claim))
}

fn bounded_neg_unbounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int).restrict_upper(Restriction::NonPositive);
    let b = Interval::unbounded(ctx, "b", Sort::Int);
    let claim = Claim::between(a.lo().clone(), a.lo().neg());
    evaluate(session, tightness, &BoundCheck::new(Operation::Div, a, b, claim))
}

fn point_unbounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::unbounded(ctx, "b", Sort::Int);
    let magnitude = abs(a.lo());
    let claim = Claim::between(magnitude.neg(), magnitude);
    evaluate(session, tightness, &BoundCheck::new(Operation::Div, a, b, claim))
}

/// `[min(-a1, a0), max(-a1, a0)]` misses large quotients of a negative `a0`.
fn bug_bounded_unbounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int).with_kind(IntervalType::NotPoint);
    let b = Interval::unbounded(ctx, "b", Sort::Int);
    let claim = Claim::between(a.hi().neg().min(a.lo()), a.hi().neg().max(a.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Div, a, b, claim))
}

fn fix_bounded_unbounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int).with_kind(IntervalType::NotPoint);
    let b = Interval::unbounded(ctx, "b", Sort::Int);
    let claim = Claim::between(a.hi().neg().min(a.lo()), a.lo().neg().max(a.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Div, a, b, claim))
}

fn single_points<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let q = halide_div(a.lo(), b.lo())?;
    let claim = Claim::between(q.clone(), q);
    evaluate(session, tightness, &BoundCheck::new(Operation::Div, a, b, claim))
}

/// `a` of the given shape divided by a single point of the given sign.
fn by_signed_point<'ctx>(
    session: &Session<'ctx>,
    tightness: bool,
    a: Interval<'ctx>,
    sign: Restriction,
    claim: impl FnOnce(&Interval<'ctx>, &Interval<'ctx>) -> Result<Claim<'ctx>>,
) -> Result<ScenarioReport> {
    let b = Interval::point(session.context(), "b", Sort::Int).restrict(sign);
    let claim = claim(&a, &b)?;
    evaluate(session, tightness, &BoundCheck::new(Operation::Div, a, b, claim))
}

fn bounded_single_pos<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::bounded(session.context(), "a", Sort::Int);
    by_signed_point(session, tightness, a, Restriction::Positive, |a, b| {
        Ok(Claim::between(halide_div(a.lo(), b.lo())?, halide_div(a.hi(), b.lo())?))
    })
}

fn lower_bounded_single_pos<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::at_least(session.context(), "a", Sort::Int);
    by_signed_point(session, tightness, a, Restriction::Positive, |a, b| {
        Ok(Claim::at_least(halide_div(a.lo(), b.lo())?))
    })
}

fn upper_bounded_single_pos<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::at_most(session.context(), "a", Sort::Int);
    by_signed_point(session, tightness, a, Restriction::Positive, |a, b| {
        Ok(Claim::at_most(halide_div(a.hi(), b.lo())?))
    })
}

fn bounded_single_neg<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::bounded(session.context(), "a", Sort::Int);
    by_signed_point(session, tightness, a, Restriction::Negative, |a, b| {
        Ok(Claim::between(halide_div(a.hi(), b.lo())?, halide_div(a.lo(), b.lo())?))
    })
}

fn lower_bounded_single_neg<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::at_least(session.context(), "a", Sort::Int);
    by_signed_point(session, tightness, a, Restriction::Negative, |a, b| {
        Ok(Claim::at_most(halide_div(a.lo(), b.lo())?))
    })
}

fn upper_bounded_single_neg<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::at_most(session.context(), "a", Sort::Int);
    by_signed_point(session, tightness, a, Restriction::Negative, |a, b| {
        Ok(Claim::at_least(halide_div(a.hi(), b.lo())?))
    })
}

fn bounded_single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::bounded(session.context(), "a", Sort::Int);
    by_signed_point(session, tightness, a, Restriction::None, |a, b| {
        let b0 = b.lo();
        let positive = b0.gt_lit(0);
        let (q0, q1) = (halide_div(a.lo(), b0)?, halide_div(a.hi(), b0)?);
        Ok(Claim::between(
            Scalar::select(&positive, &q0, &q1),
            Scalar::select(&positive, &q1, &q0),
        ))
    })
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "div",
            "bounded_pos_unbounded",
            "[a0, a1], a0 >= 0 / [_, _] in [-a1, a1]",
            Expect::proved().tight(Some(true), Some(true)),
            bounded_pos_unbounded,
        ),
        Scenario::new(
            "div",
            "bounded_neg_unbounded",
            "[a0, a1], a1 <= 0 / [_, _] in [a0, -a0]",
            Expect::proved().tight(Some(true), Some(true)),
            bounded_neg_unbounded,
        ),
        Scenario::new(
            "div",
            "point_unbounded",
            "[a0, a0] / [_, _] in [-|a0|, |a0|]",
            Expect::proved().tight(Some(true), Some(true)),
            point_unbounded,
        ),
        Scenario::new(
            "div",
            "bug_bounded_unbounded",
            "[a0, a1] / [_, _] in [min(-a1, a0), max(-a1, a0)]",
            Expect::disproved(),
            bug_bounded_unbounded,
        ),
        Scenario::new(
            "div",
            "fix_bounded_unbounded",
            "[a0, a1] / [_, _] in [min(-a1, a0), max(-a0, a1)]",
            Expect::proved().tight(Some(true), Some(true)),
            fix_bounded_unbounded,
        ),
        Scenario::new(
            "div",
            "single_points",
            "[a0, a0] / [b0, b0] in [a0 / b0, a0 / b0]",
            Expect::proved().tight(Some(true), Some(true)),
            single_points,
        )
        .expensive(),
        Scenario::new(
            "div",
            "bounded_single_pos",
            "[a0, a1] / [b, b], b > 0 in [a0 / b, a1 / b]",
            Expect::proved().tight(Some(true), Some(true)),
            bounded_single_pos,
        )
        .expensive(),
        Scenario::new(
            "div",
            "lower_bounded_single_pos",
            "[a0, _] / [b, b], b > 0 in [a0 / b, _]",
            Expect::proved().tight(Some(true), None),
            lower_bounded_single_pos,
        )
        .expensive(),
        Scenario::new(
            "div",
            "upper_bounded_single_pos",
            "[_, a1] / [b, b], b > 0 in [_, a1 / b]",
            Expect::proved().tight(None, Some(true)),
            upper_bounded_single_pos,
        )
        .expensive(),
        Scenario::new(
            "div",
            "bounded_single_neg",
            "[a0, a1] / [b, b], b < 0 in [a1 / b, a0 / b]",
            Expect::proved().tight(Some(true), Some(true)),
            bounded_single_neg,
        )
        .expensive(),
        Scenario::new(
            "div",
            "lower_bounded_single_neg",
            "[a0, _] / [b, b], b < 0 in [_, a0 / b]",
            Expect::proved().tight(None, Some(true)),
            lower_bounded_single_neg,
        )
        .expensive(),
        Scenario::new(
            "div",
            "upper_bounded_single_neg",
            "[_, a1] / [b, b], b < 0 in [a1 / b, _]",
            Expect::proved().tight(Some(true), None),
            upper_bounded_single_neg,
        )
        .expensive(),
        Scenario::new(
            "div",
            "bounded_single_point",
            "[a0, a1] / [b, b] in b > 0 ? [a0 / b, a1 / b] : [a1 / b, a0 / b]",
            Expect::proved().tight(Some(true), Some(true)),
            bounded_single_point,
        )
        .expensive(),
    ]
}
