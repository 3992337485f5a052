use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::bound::Restriction;
use crate::domain::{Scalar, Sort};
use crate::engine::{BoundCheck, Claim};
use crate::error::Result;
use crate::interval::Interval;
use crate::ops::{halide_mod, Operation};
use crate::solver::Session;

fn single_point<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let r = halide_mod(a.lo(), b.lo())?;
    let claim = Claim::between(r.clone(), r);
    evaluate(session, tightness, &BoundCheck::new(Operation::Mod, a, b, claim))
}

fn pos_lower_unbounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int).restrict_lower(Restriction::NonNegative);
    let b = Interval::unbounded(ctx, "b", Sort::Int);
    let claim = Claim::between(Scalar::zero(ctx, Sort::Int), a.hi().clone());
    evaluate(session, tightness, &BoundCheck::new(Operation::Mod, a, b, claim))
}

fn pos_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::bounded(ctx, "b", Sort::Int).restrict_lower(Restriction::Positive);
    let one = Scalar::one(ctx, Sort::Int);
    let claim = Claim::between(Scalar::zero(ctx, Sort::Int), b.hi().sub(&one));
    evaluate(session, tightness, &BoundCheck::new(Operation::Mod, a, b, claim))
}

fn bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::bounded(ctx, "b", Sort::Int);
    let zero = Scalar::zero(ctx, Sort::Int);
    let minus_one = Scalar::from_i64(ctx, -1, Sort::Int);
    let one = Scalar::one(ctx, Sort::Int);
    let emax = zero.max(&b.hi().sub(&one)).max(&minus_one.sub(b.lo()));
    let claim = Claim::between(zero, emax);
    evaluate(session, tightness, &BoundCheck::new(Operation::Mod, a, b, claim))
}

/// 8-bit unsigned modulo with the divisor pinned to zero.
///
/// `max(0, b1 - 1)` wraps to 255 when `b1 == 0`: safe, but never attained.
fn unsigned_zero_divisor<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let u8s = Sort::Unsigned(8);
    let a = Interval::bounded(ctx, "a", u8s);
    let b = Interval::point(ctx, "b", u8s).restrict(Restriction::IsZero);
    let zero = Scalar::zero(ctx, u8s);
    let emax = zero.max(&b.hi().sub(&Scalar::one(ctx, u8s)));
    let claim = Claim::between(zero, emax);
    evaluate(session, tightness, &BoundCheck::new(Operation::Mod, a, b, claim))
}

fn fix_unsigned_zero_divisor<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let u8s = Sort::Unsigned(8);
    let a = Interval::bounded(ctx, "a", u8s);
    let b = Interval::point(ctx, "b", u8s).restrict(Restriction::IsZero);
    let zero = Scalar::zero(ctx, u8s);
    let emax = Scalar::select(&b.hi().is_zero(), &zero, &b.hi().sub(&Scalar::one(ctx, u8s)));
    let claim = Claim::between(zero, emax);
    evaluate(session, tightness, &BoundCheck::new(Operation::Mod, a, b, claim))
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "mod",
            "single_point",
            "[a0, a0] % [b0, b0] in [a0 % b0, a0 % b0]",
            Expect::proved(),
            single_point,
        )
        .expensive(),
        Scenario::new(
            "mod",
            "pos_lower_unbounded",
            "[a0, a1], a0 >= 0 % [_, _] in [0, a1]",
            Expect::proved(),
            pos_lower_unbounded,
        ),
        Scenario::new(
            "mod",
            "pos_bounded",
            "[a0, a1] % [b0, b1], b0 > 0 in [0, b1 - 1]",
            Expect::proved(),
            pos_bounded,
        ),
        Scenario::new(
            "mod",
            "bounded",
            "[a0, a1] % [b0, b1] in [0, max(max(0, b1 - 1), -1 - b0)]",
            Expect::proved(),
            bounded,
        ),
        Scenario::new(
            "mod",
            "unsigned_zero_divisor",
            "u8: [a0, a1] % [0, 0] in [0, max(0, b1 - 1)]",
            Expect::proved().tight(Some(true), Some(false)),
            unsigned_zero_divisor,
        ),
        Scenario::new(
            "mod",
            "fix_unsigned_zero_divisor",
            "u8: [a0, a1] % [0, 0] in [0, b1 == 0 ? 0 : b1 - 1]",
            Expect::proved().tight(Some(true), Some(true)),
            fix_unsigned_zero_divisor,
        ),
    ]
}
