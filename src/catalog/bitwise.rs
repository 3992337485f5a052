use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::bound::Restriction;
use crate::domain::{Scalar, Sort};
use crate::engine::{BoundCheck, Claim, UnaryCheck};
use crate::error::Result;
use crate::interval::Interval;
use crate::ops::{Operation, UnaryOperation};
use crate::solver::Session;

const I32: Sort = Sort::Signed(32);
const U32: Sort = Sort::Unsigned(32);

fn and_unknown_pos<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", I32);
    let b = Interval::bounded(ctx, "b", I32).restrict_lower(Restriction::NonNegative);
    let claim = Claim::between(Scalar::zero(ctx, I32), b.hi().clone());
    evaluate(session, tightness, &BoundCheck::new(Operation::BitAnd, a, b, claim))
}

fn and_pos_pos<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", I32).restrict_lower(Restriction::NonNegative);
    let b = Interval::bounded(ctx, "b", I32).restrict_lower(Restriction::NonNegative);
    let claim = Claim::between(Scalar::zero(ctx, I32), a.hi().min(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::BitAnd, a, b, claim))
}

fn and_unknown_unknown<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", I32);
    let b = Interval::bounded(ctx, "b", I32);
    let claim = Claim::at_most(a.hi().max(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::BitAnd, a, b, claim))
}

fn or_signed_lower_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_least(ctx, "a", I32);
    let b = Interval::at_least(ctx, "b", I32);
    let claim = Claim::at_least(a.lo().min(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::BitOr, a, b, claim))
}

fn or_unsigned_lower_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_least(ctx, "a", U32);
    let b = Interval::at_least(ctx, "b", U32);
    let claim = Claim::at_least(a.lo().max(b.lo()));
    evaluate(session, tightness, &BoundCheck::new(Operation::BitOr, a, b, claim))
}

fn xor_pos_pos<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_least(ctx, "a", I32).restrict_lower(Restriction::NonNegative);
    let b = Interval::at_least(ctx, "b", I32).restrict_lower(Restriction::NonNegative);
    let claim = Claim::at_least(Scalar::zero(ctx, I32));
    evaluate(session, tightness, &BoundCheck::new(Operation::BitXor, a, b, claim))
}

/// `1 ^ 2 == 3` already escapes `max(a1, b1)`.
fn bug_xor_pos_upper_max<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", I32).restrict_lower(Restriction::NonNegative);
    let b = Interval::bounded(ctx, "b", I32).restrict_lower(Restriction::NonNegative);
    let claim = Claim::at_most(a.hi().max(b.hi()));
    evaluate(session, tightness, &BoundCheck::new(Operation::BitXor, a, b, claim))
}

fn not_upper_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::at_most(session.context(), "a", I32);
    let claim = Claim::at_least(UnaryOperation::BitNot.apply(a.hi())?);
    evaluate(session, tightness, &UnaryCheck::new(UnaryOperation::BitNot, a, claim))
}

fn not_lower_bounded<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let a = Interval::at_least(session.context(), "a", I32);
    let claim = Claim::at_most(UnaryOperation::BitNot.apply(a.lo())?);
    evaluate(session, tightness, &UnaryCheck::new(UnaryOperation::BitNot, a, claim))
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "bitwise",
            "and_unknown_pos",
            "i32: [a0, a1] & [b0, b1], b0 >= 0 in [0, b1]",
            Expect::proved(),
            and_unknown_pos,
        ),
        Scenario::new(
            "bitwise",
            "and_pos_pos",
            "i32: [a0, a1], a0 >= 0 & [b0, b1], b0 >= 0 in [0, min(a1, b1)]",
            Expect::proved(),
            and_pos_pos,
        ),
        Scenario::new(
            "bitwise",
            "and_unknown_unknown",
            "i32: [a0, a1] & [b0, b1] in [_, max(a1, b1)]",
            Expect::proved(),
            and_unknown_unknown,
        ),
        Scenario::new(
            "bitwise",
            "or_signed_lower_bounded",
            "i32: [a0, _] | [b0, _] in [min(a0, b0), _]",
            Expect::proved(),
            or_signed_lower_bounded,
        ),
        Scenario::new(
            "bitwise",
            "or_unsigned_lower_bounded",
            "u32: [a0, _] | [b0, _] in [max(a0, b0), _]",
            Expect::proved().tight(Some(true), None),
            or_unsigned_lower_bounded,
        ),
        Scenario::new(
            "bitwise",
            "xor_pos_pos",
            "i32: [a0, _], a0 >= 0 ^ [b0, _], b0 >= 0 in [0, _]",
            Expect::proved().tight(Some(true), None),
            xor_pos_pos,
        ),
        Scenario::new(
            "bitwise",
            "bug_xor_pos_upper_max",
            "i32: [a0, a1], a0 >= 0 ^ [b0, b1], b0 >= 0 in [_, max(a1, b1)]",
            Expect::disproved(),
            bug_xor_pos_upper_max,
        ),
        Scenario::new(
            "bitwise",
            "not_upper_bounded",
            "i32: ~[_, a1] in [~a1, _]",
            Expect::proved().tight(Some(true), None),
            not_upper_bounded,
        ),
        Scenario::new(
            "bitwise",
            "not_lower_bounded",
            "i32: ~[a0, _] in [_, ~a0]",
            Expect::proved().tight(None, Some(true)),
            not_lower_bounded,
        ),
    ]
}
