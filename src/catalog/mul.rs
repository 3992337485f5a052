use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::bound::Restriction;
use crate::domain::{Scalar, Sort};
use crate::engine::{BoundCheck, Claim};
use crate::error::Result;
use crate::interval::{Interval, IntervalType};
use crate::ops::Operation;
use crate::solver::Session;

fn single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let product = a.lo().mul(b.lo());
    let claim = Claim::between(product.clone(), product);
    evaluate(session, tightness, &BoundCheck::new(Operation::Mul, a, b, claim))
}

fn b_zero<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::unbounded(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int).restrict(Restriction::IsZero);
    let zero = Scalar::zero(ctx, Sort::Int);
    let claim = Claim::between(zero.clone(), zero);
    evaluate(session, tightness, &BoundCheck::new(Operation::Mul, a, b, claim))
}

fn b_pos_a_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int).restrict(Restriction::NonNegative);
    let claim = Claim::between(a.lo().mul(b.lo()), a.hi().mul(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Mul, a, b, claim))
}

fn b_neg_a_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int).restrict(Restriction::NonPositive);
    let claim = Claim::between(a.hi().mul(b.lo()), a.lo().mul(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Mul, a, b, claim))
}

fn b_pos_a_upper_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_most(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int).restrict(Restriction::NonNegative);
    let claim = Claim::at_most(a.hi().mul(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Mul, a, b, claim))
}

fn b_neg_a_upper_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_most(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int).restrict(Restriction::NonPositive);
    let claim = Claim::at_least(a.hi().mul(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::Mul, a, b, claim))
}

fn b_point_a_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let bp = b.lo();
    let b_nonneg = bp.ge_lit(0);
    let emin = Scalar::select(&b_nonneg, &a.lo().mul(bp), &a.hi().mul(bp));
    let emax = Scalar::select(&b_nonneg, &a.hi().mul(bp), &a.lo().mul(bp));
    let claim = Claim::between(emin, emax);
    evaluate(session, tightness, &BoundCheck::new(Operation::Mul, a, b, claim))
}

fn both_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int).with_kind(IntervalType::NotPoint);
    let b = Interval::bounded(ctx, "b", Sort::Int).with_kind(IntervalType::NotPoint);
    let corners = [
        a.lo().mul(b.lo()),
        a.lo().mul(b.hi()),
        a.hi().mul(b.lo()),
        a.hi().mul(b.hi()),
    ];
    let emin = corners[1..].iter().fold(corners[0].clone(), |acc, c| acc.min(c));
    let emax = corners[1..].iter().fold(corners[0].clone(), |acc, c| acc.max(c));
    let claim = Claim::between(emin, emax);
    evaluate(session, tightness, &BoundCheck::new(Operation::Mul, a, b, claim))
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "mul",
            "single_point",
            "[a0, a0] * [b0, b0] in [a0 * b0, a0 * b0]",
            Expect::proved().tight(Some(true), Some(true)),
            single_point,
        ),
        Scenario::new("mul", "b_zero", "[_, _] * [0, 0] in [0, 0]", Expect::proved(), b_zero),
        Scenario::new(
            "mul",
            "b_pos_a_bounded",
            "[a0, a1] * [b, b], b >= 0 in [a0 * b, a1 * b]",
            Expect::proved(),
            b_pos_a_bounded,
        ),
        Scenario::new(
            "mul",
            "b_neg_a_bounded",
            "[a0, a1] * [b, b], b <= 0 in [a1 * b, a0 * b]",
            Expect::proved(),
            b_neg_a_bounded,
        ),
        Scenario::new(
            "mul",
            "b_pos_a_upper_bounded",
            "[_, a1] * [b, b], b >= 0 in [_, a1 * b]",
            Expect::proved(),
            b_pos_a_upper_bounded,
        ),
        Scenario::new(
            "mul",
            "b_neg_a_upper_bounded",
            "[_, a1] * [b, b], b <= 0 in [a1 * b, _]",
            Expect::proved(),
            b_neg_a_upper_bounded,
        ),
        Scenario::new(
            "mul",
            "b_point_a_bounded",
            "[a0, a1] * [b, b] in b >= 0 ? [a0 * b, a1 * b] : [a1 * b, a0 * b]",
            Expect::proved(),
            b_point_a_bounded,
        ),
        Scenario::new(
            "mul",
            "both_bounded",
            "[a0, a1] * [b0, b1] in [min of corner products, max of corner products]",
            Expect::proved(),
            both_bounded,
        )
        .expensive(),
    ]
}
