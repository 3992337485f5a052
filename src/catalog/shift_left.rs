//! 8-bit left shifts.
//!
//! Each rule bounds `i << j` by the shift of one endpoint pair. Overflowing
//! shifts are excluded from the frame, so a rule only has to hold where the
//! shift is defined.

use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::domain::{Scalar, Sort};
use crate::engine::Claim;
use crate::error::Result;
use crate::ops::{shift_left, shl_overflow};
use crate::shift::{ShiftCheck, ShiftDirection, ShiftParams};
use crate::solver::Session;

const WIDTH: u32 = 8;
const I8: Sort = Sort::Signed(WIDTH);
const U8: Sort = Sort::Unsigned(WIDTH);

fn lower_bound_uint_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a0 = Scalar::new_const(ctx, "a0", U8);
    let b0 = Scalar::new_const(ctx, "b0", U8);
    let emin = shift_left(&a0, &b0)?;
    let no_overflow = shl_overflow(&a0, &b0, &emin)?.not();
    let problem = ShiftCheck::new(
        ctx,
        ShiftDirection::Left,
        WIDTH,
        ShiftParams::unsigned().at_least(&a0),
        ShiftParams::unsigned().at_least(&b0),
        Claim::at_least(emin),
    )
    .assume(b0.lt_lit(WIDTH as i64))
    .assume(no_overflow);
    evaluate(session, tightness, &problem)
}

fn lower_bound_int_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a0 = Scalar::new_const(ctx, "a0", I8);
    let b0 = Scalar::new_const(ctx, "b0", U8);
    let emin = shift_left(&a0, &b0)?;
    let no_overflow = shl_overflow(&a0, &b0, &emin)?.not();
    let problem = ShiftCheck::new(
        ctx,
        ShiftDirection::Left,
        WIDTH,
        ShiftParams::signed().at_least(&a0),
        ShiftParams::unsigned().at_least(&b0),
        Claim::at_least(emin),
    )
    .assume(a0.ge_lit(0))
    .assume(b0.lt_lit(WIDTH as i64))
    .assume(no_overflow);
    evaluate(session, tightness, &problem)
}

fn lower_bound_uint_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a0 = Scalar::new_const(ctx, "a0", U8);
    let b0 = Scalar::new_const(ctx, "b0", I8);
    let emin = shift_left(&a0, &b0)?;
    let no_overflow = shl_overflow(&a0, &b0, &emin)?.not();
    let problem = ShiftCheck::new(
        ctx,
        ShiftDirection::Left,
        WIDTH,
        ShiftParams::unsigned().at_least(&a0),
        ShiftParams::signed().at_least(&b0),
        Claim::at_least(emin),
    )
    .assume(b0.ge_lit(0))
    .assume(b0.lt_lit(WIDTH as i64))
    .assume(no_overflow);
    evaluate(session, tightness, &problem)
}

/// `a0 >> |b0|` for a negative amount, with both operands signed.
fn lower_bound_lshift_neg<'ctx>(
    session: &Session<'ctx>,
    tightness: bool,
    shiftee_sign: Option<bool>,
) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a0 = Scalar::new_const(ctx, "a0", I8);
    let b0 = Scalar::new_const(ctx, "b0", I8);
    // A negative amount shifts right, arithmetically for a signed shiftee.
    let emin = shift_left(&a0, &b0)?;
    let mut problem = ShiftCheck::new(
        ctx,
        ShiftDirection::Left,
        WIDTH,
        ShiftParams::signed().at_least(&a0),
        ShiftParams::signed().at_least(&b0),
        Claim::at_least(emin),
    )
    .assume(b0.lt_lit(0))
    .assume(b0.gt_lit(-(WIDTH as i64)));
    match shiftee_sign {
        Some(true) => problem = problem.assume(a0.ge_lit(0)),
        Some(false) => problem = problem.assume(a0.lt_lit(0)),
        None => {}
    }
    evaluate(session, tightness, &problem)
}

fn bug_lower_bound_lshift_neg<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    lower_bound_lshift_neg(session, tightness, None)
}

fn fix_pos_lower_bound_lshift_neg<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    lower_bound_lshift_neg(session, tightness, Some(true))
}

/// Claims `a0` for a negative shiftee while the amount may still turn positive.
fn neg_lower_bound_lshift_neg<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a0 = Scalar::new_const(ctx, "a0", I8);
    let b0 = Scalar::new_const(ctx, "b0", I8);
    let problem = ShiftCheck::new(
        ctx,
        ShiftDirection::Left,
        WIDTH,
        ShiftParams::signed().at_least(&a0),
        ShiftParams::signed().at_least(&b0),
        Claim::at_least(a0.clone()),
    )
    .assume(a0.lt_lit(0))
    .assume(b0.lt_lit(0))
    .assume(b0.gt_lit(-(WIDTH as i64)));
    evaluate(session, tightness, &problem)
}

fn fix_neg_lower_bound_lshift_nonpos<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a0 = Scalar::new_const(ctx, "a0", I8);
    let b0 = Scalar::new_const(ctx, "b0", I8);
    let b1 = Scalar::new_const(ctx, "b1", I8);
    let problem = ShiftCheck::new(
        ctx,
        ShiftDirection::Left,
        WIDTH,
        ShiftParams::signed().at_least(&a0),
        ShiftParams::signed().at_least(&b0).at_most(&b1),
        Claim::at_least(a0.clone()),
    )
    .assume(a0.lt_lit(0))
    .assume(b0.lt_lit(0))
    .assume(b0.gt_lit(-(WIDTH as i64)))
    .assume(b1.le_lit(0));
    evaluate(session, tightness, &problem)
}

fn upper_bound_int_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a1 = Scalar::new_const(ctx, "a1", I8);
    let b1 = Scalar::new_const(ctx, "b1", U8);
    let emax = shift_left(&a1, &b1)?;
    let no_overflow = shl_overflow(&a1, &b1, &emax)?.not();
    let problem = ShiftCheck::new(
        ctx,
        ShiftDirection::Left,
        WIDTH,
        ShiftParams::signed().at_most(&a1),
        ShiftParams::unsigned().at_most(&b1),
        Claim::at_most(emax),
    )
    .assume(a1.ge_lit(0))
    .assume(b1.lt_lit(WIDTH as i64))
    .assume(no_overflow);
    evaluate(session, tightness, &problem)
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "shl",
            "lower_bound_uint_uint",
            "u8 << u8: [a0, _] << [b0, _] in [a0 << b0, _] when a0 << b0 does not overflow",
            Expect::proved(),
            lower_bound_uint_uint,
        ),
        Scenario::new(
            "shl",
            "lower_bound_int_uint",
            "i8 << u8: [a0, _], a0 >= 0 << [b0, _] in [a0 << b0, _] when a0 << b0 does not overflow",
            Expect::proved(),
            lower_bound_int_uint,
        ),
        Scenario::new(
            "shl",
            "lower_bound_uint_int",
            "u8 << i8: [a0, _] << [b0, _], b0 >= 0 in [a0 << b0, _] when a0 << b0 does not overflow",
            Expect::proved(),
            lower_bound_uint_int,
        ),
        Scenario::new(
            "shl",
            "bug_lower_bound_lshift_neg",
            "i8 << i8: [a0, _] << [b0, _], -8 < b0 < 0 in [a0 >> |b0|, _]",
            Expect::disproved(),
            bug_lower_bound_lshift_neg,
        ),
        Scenario::new(
            "shl",
            "fix_pos_lower_bound_lshift_neg",
            "i8 << i8: [a0, _], a0 >= 0 << [b0, _], -8 < b0 < 0 in [a0 >> |b0|, _]",
            Expect::proved(),
            fix_pos_lower_bound_lshift_neg,
        ),
        Scenario::new(
            "shl",
            "neg_lower_bound_lshift_neg",
            "i8 << i8: [a0, _], a0 < 0 << [b0, _], -8 < b0 < 0 in [a0, _]",
            Expect::disproved(),
            neg_lower_bound_lshift_neg,
        ),
        Scenario::new(
            "shl",
            "fix_neg_lower_bound_lshift_nonpos",
            "i8 << i8: [a0, _], a0 < 0 << [b0, b1], -8 < b0 < 0, b1 <= 0 in [a0, _]",
            Expect::proved(),
            fix_neg_lower_bound_lshift_nonpos,
        ),
        Scenario::new(
            "shl",
            "upper_bound_int_uint",
            "i8 << u8: [_, a1], a1 >= 0 << [_, b1] in [_, a1 << b1] when a1 << b1 does not overflow",
            Expect::proved(),
            upper_bound_int_uint,
        ),
    ]
}
