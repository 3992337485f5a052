//! 8-bit right shifts.
//!
//! A negative signed amount turns the shift around, so rules that let the
//! amount go negative must also account for bits shifted out to the left.

use super::{evaluate, Expect, Scenario, ScenarioReport};
use crate::domain::{Scalar, Sort};
use crate::engine::Claim;
use crate::error::Result;
use crate::ops::{shift_right, shr_overflow};
use crate::shift::{ShiftCheck, ShiftDirection, ShiftParams};
use crate::solver::Session;

const WIDTH: u32 = 8;
const W: i64 = WIDTH as i64;

fn sort(signed: bool) -> Sort {
    Sort::Signed(WIDTH).with_signedness(signed)
}

/// Endpoint terms of a right-shift rule: `a0`/`a1` for the shiftee, `b0`/`b1` for the amount.
struct Endpoints<'ctx> {
    a: Scalar<'ctx>,
    b0: Scalar<'ctx>,
    b1: Scalar<'ctx>,
}

impl<'ctx> Endpoints<'ctx> {
    fn lower(session: &Session<'ctx>, a_signed: bool, b_signed: bool) -> Self {
        Self::new(session, "a0", a_signed, b_signed)
    }

    fn upper(session: &Session<'ctx>, a_signed: bool, b_signed: bool) -> Self {
        Self::new(session, "a1", a_signed, b_signed)
    }

    fn new(session: &Session<'ctx>, a_name: &str, a_signed: bool, b_signed: bool) -> Self {
        let ctx = session.context();
        Self {
            a: Scalar::new_const(ctx, a_name, sort(a_signed)),
            b0: Scalar::new_const(ctx, "b0", sort(b_signed)),
            b1: Scalar::new_const(ctx, "b1", sort(b_signed)),
        }
    }

    fn params(&self) -> (ShiftParams<'_, 'ctx>, ShiftParams<'_, 'ctx>) {
        let a = ShiftParams::new(self.a.sort().is_signed());
        let b = ShiftParams::new(self.b0.sort().is_signed()).at_least(&self.b0).at_most(&self.b1);
        (a, b)
    }

    /// Shiftee bounded below by `a0`.
    fn lower_check(&self, session: &Session<'ctx>, emin: Scalar<'ctx>) -> ShiftCheck<'_, 'ctx> {
        let (a, b) = self.params();
        ShiftCheck::new(session.context(), ShiftDirection::Right, WIDTH, a.at_least(&self.a), b, Claim::at_least(emin))
    }

    /// Shiftee bounded above by `a1`.
    fn upper_check(&self, session: &Session<'ctx>, emax: Scalar<'ctx>) -> ShiftCheck<'_, 'ctx> {
        let (a, b) = self.params();
        ShiftCheck::new(session.context(), ShiftDirection::Right, WIDTH, a.at_most(&self.a), b, Claim::at_most(emax))
    }

    /// `0 <= b1 < w`, and `0 <= b0` as well when `both`.
    fn amount_nonneg<'a>(&'a self, check: ShiftCheck<'a, 'ctx>, both: bool) -> ShiftCheck<'a, 'ctx> {
        let check = check.assume(self.b1.ge_lit(0)).assume(self.b1.lt_lit(W));
        if both {
            check.assume(self.b0.ge_lit(0))
        } else {
            check
        }
    }

    /// `-w < b0 <= b1 < 0`, or only `b0` when not `both`.
    fn amount_neg<'a>(&'a self, check: ShiftCheck<'a, 'ctx>, both: bool) -> ShiftCheck<'a, 'ctx> {
        let check = check.assume(self.b0.lt_lit(0)).assume(self.b0.gt_lit(-W));
        if both {
            check.assume(self.b1.lt_lit(0)).assume(self.b1.gt_lit(-W))
        } else {
            check
        }
    }
}

/// `a0 >> b1` for a non-negative shiftee.
fn pos_lb_by_b1<'ctx>(session: &Session<'ctx>, tightness: bool, a_signed: bool, b_signed: bool) -> Result<ScenarioReport> {
    let e = Endpoints::lower(session, a_signed, b_signed);
    let emin = shift_right(&e.a, &e.b1)?;
    let no_overflow = shr_overflow(&e.a, &e.b1, &emin)?.not();
    let check = e.amount_nonneg(e.lower_check(session, emin), false).assume(no_overflow).assume(e.a.ge_lit(0));
    evaluate(session, tightness, &check)
}

fn pos_int_lb_rshift_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    pos_lb_by_b1(session, tightness, true, true)
}

fn bug_pos_uint_lb_rshift_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    pos_lb_by_b1(session, tightness, false, true)
}

fn pos_uint_lb_rshift_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    pos_lb_by_b1(session, tightness, false, false)
}

fn pos_int_lb_rshift_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    pos_lb_by_b1(session, tightness, true, false)
}

/// An unsigned shiftee may lose bits when a negative amount shifts it left, so only 0 is safe.
fn fix_pos_uint_lb_rshift_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let e = Endpoints::lower(session, false, true);
    let emin = Scalar::zero(session.context(), e.a.sort());
    let check = e.amount_nonneg(e.lower_check(session, emin), false);
    evaluate(session, tightness, &check)
}

/// `min(a0 >> b0, a0 >> b1)` for a non-negative amount range.
fn unk_lb_rshift_pos<'ctx>(session: &Session<'ctx>, tightness: bool, a_signed: bool, b_signed: bool) -> Result<ScenarioReport> {
    let e = Endpoints::lower(session, a_signed, b_signed);
    let emin = shift_right(&e.a, &e.b0)?.min(&shift_right(&e.a, &e.b1)?);
    let check = e.amount_nonneg(e.lower_check(session, emin), true);
    evaluate(session, tightness, &check)
}

fn unk_int_lb_rshift_pos_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    unk_lb_rshift_pos(session, tightness, true, true)
}

fn unk_uint_lb_rshift_pos_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    unk_lb_rshift_pos(session, tightness, false, true)
}

fn unk_uint_lb_rshift_pos_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    unk_lb_rshift_pos(session, tightness, false, false)
}

fn unk_int_lb_rshift_pos_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    unk_lb_rshift_pos(session, tightness, true, false)
}

/// `min(a0 << |b0|, a0 << |b1|)` for a negative amount range.
fn unk_lb_rshift_neg_int<'ctx>(session: &Session<'ctx>, tightness: bool, a_signed: bool) -> Result<ScenarioReport> {
    let e = Endpoints::lower(session, a_signed, true);
    let by_b0 = shift_right(&e.a, &e.b0)?;
    let by_b1 = shift_right(&e.a, &e.b1)?;
    let no_overflow = [shr_overflow(&e.a, &e.b0, &by_b0)?.not(), shr_overflow(&e.a, &e.b1, &by_b1)?.not()];
    let mut check = e.amount_neg(e.lower_check(session, by_b0.min(&by_b1)), true);
    for assumption in no_overflow {
        check = check.assume(assumption);
    }
    evaluate(session, tightness, &check)
}

fn unk_int_lb_rshift_neg_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    unk_lb_rshift_neg_int(session, tightness, true)
}

fn bug_unk_uint_lb_rshift_neg_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    unk_lb_rshift_neg_int(session, tightness, false)
}

/// `a0 << |b1|` for a negative shiftee, though a larger shift pushes it further down.
fn unk_int_lb_rshift_possibly_neg_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let e = Endpoints::lower(session, true, true);
    let emin = shift_right(&e.a, &e.b1)?;
    let no_overflow = shr_overflow(&e.a, &e.b1, &emin)?.not();
    let check = e
        .lower_check(session, emin)
        .assume(e.a.lt_lit(0))
        .assume(e.b1.lt_lit(0))
        .assume(e.b1.gt_lit(-W))
        .assume(no_overflow);
    evaluate(session, tightness, &check)
}

/// `a1 >> b0` for a non-negative upper endpoint and an unsigned amount.
fn possibly_pos_ub_rshift_uint<'ctx>(session: &Session<'ctx>, tightness: bool, a_signed: bool) -> Result<ScenarioReport> {
    let e = Endpoints::upper(session, a_signed, false);
    let emax = shift_right(&e.a, &e.b0)?;
    let check = e.upper_check(session, emax).assume(e.a.ge_lit(0)).assume(e.b0.lt_lit(W));
    evaluate(session, tightness, &check)
}

fn possibly_pos_int_ub_rshift_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    possibly_pos_ub_rshift_uint(session, tightness, true)
}

fn possibly_pos_uint_ub_rshift_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    possibly_pos_ub_rshift_uint(session, tightness, false)
}

/// `a1 << |b0|` for a negative shiftee, though the amount may turn non-negative.
fn neg_int_ub_rshift_possibly_neg_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    let e = Endpoints::upper(session, true, true);
    let emax = shift_right(&e.a, &e.b0)?;
    let no_overflow = shr_overflow(&e.a, &e.b0, &emax)?.not();
    let check = e
        .amount_neg(e.upper_check(session, emax), false)
        .assume(e.a.lt_lit(0))
        .assume(no_overflow);
    evaluate(session, tightness, &check)
}

/// `max(a1 >> b0, a1 >> b1)` for an unsigned amount.
fn ub_rshift_pos_uint<'ctx>(session: &Session<'ctx>, tightness: bool, a_signed: bool) -> Result<ScenarioReport> {
    let e = Endpoints::upper(session, a_signed, false);
    let emax = shift_right(&e.a, &e.b0)?.max(&shift_right(&e.a, &e.b1)?);
    let check = e.amount_nonneg(e.upper_check(session, emax), true);
    evaluate(session, tightness, &check)
}

fn int_ub_rshift_pos_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    ub_rshift_pos_uint(session, tightness, true)
}

fn uint_ub_rshift_pos_uint<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    ub_rshift_pos_uint(session, tightness, false)
}

/// `max(a1 << |b0|, a1 << |b1|)` for a negative amount range.
fn unk_ub_rshift_neg_int<'ctx>(session: &Session<'ctx>, tightness: bool, a_signed: bool) -> Result<ScenarioReport> {
    let e = Endpoints::upper(session, a_signed, true);
    let by_b0 = shift_right(&e.a, &e.b0)?;
    let by_b1 = shift_right(&e.a, &e.b1)?;
    let no_overflow = [shr_overflow(&e.a, &e.b0, &by_b0)?.not(), shr_overflow(&e.a, &e.b1, &by_b1)?.not()];
    let mut check = e.amount_neg(e.upper_check(session, by_b0.max(&by_b1)), true);
    for assumption in no_overflow {
        check = check.assume(assumption);
    }
    evaluate(session, tightness, &check)
}

fn unk_int_ub_rshift_neg_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    unk_ub_rshift_neg_int(session, tightness, true)
}

fn bug_unk_uint_ub_rshift_neg_int<'ctx>(session: &Session<'ctx>, tightness: bool) -> Result<ScenarioReport> {
    unk_ub_rshift_neg_int(session, tightness, false)
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "shr",
            "pos_int_lb_rshift_int",
            "i8 >> i8: [a0, _], a0 >= 0 >> [b0, b1], 0 <= b1 < 8 in [a0 >> b1, _]",
            Expect::proved(),
            pos_int_lb_rshift_int,
        ),
        Scenario::new(
            "shr",
            "bug_pos_uint_lb_rshift_int",
            "u8 >> i8: [a0, _] >> [b0, b1], 0 <= b1 < 8 in [a0 >> b1, _]",
            Expect::disproved(),
            bug_pos_uint_lb_rshift_int,
        ),
        Scenario::new(
            "shr",
            "fix_pos_uint_lb_rshift_int",
            "u8 >> i8: [a0, _] >> [b0, b1], 0 <= b1 < 8 in [0, _]",
            Expect::proved(),
            fix_pos_uint_lb_rshift_int,
        ),
        Scenario::new(
            "shr",
            "pos_uint_lb_rshift_uint",
            "u8 >> u8: [a0, _] >> [b0, b1], b1 < 8 in [a0 >> b1, _]",
            Expect::proved(),
            pos_uint_lb_rshift_uint,
        ),
        Scenario::new(
            "shr",
            "pos_int_lb_rshift_uint",
            "i8 >> u8: [a0, _], a0 >= 0 >> [b0, b1], b1 < 8 in [a0 >> b1, _]",
            Expect::proved(),
            pos_int_lb_rshift_uint,
        ),
        Scenario::new(
            "shr",
            "unk_int_lb_rshift_possibly_neg_int",
            "i8 >> i8: [a0, _], a0 < 0 >> [b0, b1], -8 < b1 < 0 in [a0 << |b1|, _]",
            Expect::disproved(),
            unk_int_lb_rshift_possibly_neg_int,
        ),
        Scenario::new(
            "shr",
            "unk_int_lb_rshift_pos_int",
            "i8 >> i8: [a0, _] >> [b0, b1], 0 <= b0, b1 < 8 in [min(a0 >> b0, a0 >> b1), _]",
            Expect::proved(),
            unk_int_lb_rshift_pos_int,
        ),
        Scenario::new(
            "shr",
            "unk_uint_lb_rshift_pos_int",
            "u8 >> i8: [a0, _] >> [b0, b1], 0 <= b0, b1 < 8 in [min(a0 >> b0, a0 >> b1), _]",
            Expect::proved(),
            unk_uint_lb_rshift_pos_int,
        ),
        Scenario::new(
            "shr",
            "unk_uint_lb_rshift_pos_uint",
            "u8 >> u8: [a0, _] >> [b0, b1], b1 < 8 in [min(a0 >> b0, a0 >> b1), _]",
            Expect::proved(),
            unk_uint_lb_rshift_pos_uint,
        ),
        Scenario::new(
            "shr",
            "unk_int_lb_rshift_pos_uint",
            "i8 >> u8: [a0, _] >> [b0, b1], b1 < 8 in [min(a0 >> b0, a0 >> b1), _]",
            Expect::proved(),
            unk_int_lb_rshift_pos_uint,
        ),
        Scenario::new(
            "shr",
            "unk_int_lb_rshift_neg_int",
            "i8 >> i8: [a0, _] >> [b0, b1], -8 < b0, b1 < 0 in [min(a0 << |b0|, a0 << |b1|), _]",
            Expect::proved(),
            unk_int_lb_rshift_neg_int,
        ),
        Scenario::new(
            "shr",
            "bug_unk_uint_lb_rshift_neg_int",
            "u8 >> i8: [a0, _] >> [b0, b1], -8 < b0, b1 < 0 in [min(a0 << |b0|, a0 << |b1|), _]",
            Expect::disproved(),
            bug_unk_uint_lb_rshift_neg_int,
        ),
        Scenario::new(
            "shr",
            "possibly_pos_int_ub_rshift_uint",
            "i8 >> u8: [_, a1], a1 >= 0 >> [b0, b1], b0 < 8 in [_, a1 >> b0]",
            Expect::proved(),
            possibly_pos_int_ub_rshift_uint,
        ),
        Scenario::new(
            "shr",
            "possibly_pos_uint_ub_rshift_uint",
            "u8 >> u8: [_, a1] >> [b0, b1], b0 < 8 in [_, a1 >> b0]",
            Expect::proved(),
            possibly_pos_uint_ub_rshift_uint,
        ),
        Scenario::new(
            "shr",
            "neg_int_ub_rshift_possibly_neg_int",
            "i8 >> i8: [_, a1], a1 < 0 >> [b0, b1], -8 < b0 < 0 in [_, a1 << |b0|]",
            Expect::disproved(),
            neg_int_ub_rshift_possibly_neg_int,
        ),
        Scenario::new(
            "shr",
            "int_ub_rshift_pos_uint",
            "i8 >> u8: [_, a1] >> [b0, b1], b1 < 8 in [_, max(a1 >> b0, a1 >> b1)]",
            Expect::proved(),
            int_ub_rshift_pos_uint,
        ),
        Scenario::new(
            "shr",
            "uint_ub_rshift_pos_uint",
            "u8 >> u8: [_, a1] >> [b0, b1], b1 < 8 in [_, max(a1 >> b0, a1 >> b1)]",
            Expect::proved(),
            uint_ub_rshift_pos_uint,
        ),
        Scenario::new(
            "shr",
            "unk_int_ub_rshift_neg_int",
            "i8 >> i8: [_, a1] >> [b0, b1], -8 < b0, b1 < 0 in [_, max(a1 << |b0|, a1 << |b1|)]",
            Expect::proved(),
            unk_int_ub_rshift_neg_int,
        ),
        Scenario::new(
            "shr",
            "bug_unk_uint_ub_rshift_neg_int",
            "u8 >> i8: [_, a1] >> [b0, b1], -8 < b0, b1 < 0 in [_, max(a1 << |b0|, a1 << |b1|)]",
            Expect::disproved(),
            bug_unk_uint_ub_rshift_neg_int,
        ),
    ]
}
