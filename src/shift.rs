//! Shift-specific problem shape.
//!
//! Shift rules are stated over loose endpoint terms rather than full intervals:
//! each side of the shiftee and the amount is independently bounded or not, and
//! the signedness of each operand is picked per rule.

use log::debug;
use z3::ast::Bool;
use z3::Context;

use crate::domain::{Scalar, Sort};
use crate::engine::{Claim, Frame, Misconfiguration, Outcome, Problem, TightnessReport};
use crate::error::Result;
use crate::ops::{ensure_compatible, shift_left, shift_right, shl_overflow, shr_overflow};
use crate::solver::{Session, Sink};

/// Bounds on one shift operand. Borrows endpoint terms owned by the rule.
#[derive(Debug, Clone, Copy)]
pub struct ShiftParams<'a, 'ctx> {
    pub lower: Option<&'a Scalar<'ctx>>,
    pub upper: Option<&'a Scalar<'ctx>>,
    pub signed: bool,
}

impl<'a, 'ctx> ShiftParams<'a, 'ctx> {
    pub fn new(signed: bool) -> Self {
        Self {
            lower: None,
            upper: None,
            signed,
        }
    }

    pub fn signed() -> Self {
        Self::new(true)
    }

    pub fn unsigned() -> Self {
        Self::new(false)
    }

    pub fn at_least(mut self, lower: &'a Scalar<'ctx>) -> Self {
        self.lower = Some(lower);
        self
    }

    pub fn at_most(mut self, upper: &'a Scalar<'ctx>) -> Self {
        self.upper = Some(upper);
        self
    }

    fn sort(&self, width: u32) -> Sort {
        Sort::Signed(width).with_signedness(self.signed)
    }
}

/// Emits the bounded sides of `params` on `var`, compared with the params' signedness.
///
/// Every endpoint must be a bit-vector of the width of `var`.
pub fn apply_shift_params<'ctx>(
    sink: &mut impl Sink<'ctx>,
    params: &ShiftParams<'_, 'ctx>,
    var: &Scalar<'ctx>,
) -> Result<()> {
    let var = var.reinterpret(params.signed);
    if let Some(lo) = params.lower {
        ensure_compatible(&var, lo)?;
        sink.add(var.ge(&lo.reinterpret(params.signed)));
    }
    if let Some(hi) = params.upper {
        ensure_compatible(&var, hi)?;
        sink.add(var.le(&hi.reinterpret(params.signed)));
    }
    Ok(())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    pub fn symbol(self) -> &'static str {
        match self {
            ShiftDirection::Left => "<<",
            ShiftDirection::Right => ">>",
        }
    }
}

/// `i << j` or `i >> j` over bit-vectors of one width, excluding overflow.
///
/// The amount is kept within the width: `j < w` when unsigned, `-w < j < w`
/// when signed.
pub struct ShiftCheck<'a, 'ctx> {
    ctx: &'ctx Context,
    direction: ShiftDirection,
    width: u32,
    shiftee: ShiftParams<'a, 'ctx>,
    amount: ShiftParams<'a, 'ctx>,
    claim: Claim<'ctx>,
    assumptions: Vec<Bool<'ctx>>,
}

impl<'a, 'ctx> ShiftCheck<'a, 'ctx> {
    pub fn new(
        ctx: &'ctx Context,
        direction: ShiftDirection,
        width: u32,
        shiftee: ShiftParams<'a, 'ctx>,
        amount: ShiftParams<'a, 'ctx>,
        claim: Claim<'ctx>,
    ) -> Self {
        Self {
            ctx,
            direction,
            width,
            shiftee,
            amount,
            claim,
            assumptions: Vec::new(),
        }
    }

    pub fn assume(mut self, assumption: Bool<'ctx>) -> Self {
        self.assumptions.push(assumption);
        self
    }

    fn frame(&self) -> Result<Frame<'ctx>> {
        let ctx = self.ctx;
        let w = self.width as i64;
        let i = Scalar::new_const(ctx, "i", Sort::bits(self.width, self.shiftee.signed)?);
        let j = Scalar::new_const(ctx, "j", Sort::bits(self.width, self.amount.signed)?);

        let mut constraints: Vec<Bool<'ctx>> = Vec::new();
        apply_shift_params(&mut constraints, &self.shiftee, &i)?;
        apply_shift_params(&mut constraints, &self.amount, &j)?;
        constraints.push(j.lt_lit(w));
        if self.amount.signed {
            constraints.push(j.gt_lit(-w));
        }

        let res = match self.direction {
            ShiftDirection::Left => {
                let res = shift_left(&i, &j)?;
                constraints.push(shl_overflow(&i, &j, &res)?.not());
                res
            }
            ShiftDirection::Right => {
                let res = shift_right(&i, &j)?;
                if self.amount.signed {
                    constraints.push(shr_overflow(&i, &j, &res)?.not());
                }
                res
            }
        };
        constraints.extend(self.assumptions.iter().cloned());
        debug!(
            "shift frame: {} {} {} with {} constraints",
            self.shiftee.sort(self.width),
            self.direction.symbol(),
            self.amount.sort(self.width),
            constraints.len()
        );

        let mut frame = Frame::new(format!("i {} j", self.direction.symbol()), res);
        frame.constraints = constraints;
        for params in [&self.shiftee, &self.amount] {
            for (side, term) in [params.lower, params.upper].into_iter().enumerate() {
                if let Some(t) = term {
                    let name = t.to_string();
                    frame.endpoints.push((name, Some(t.reinterpret(params.signed).into())));
                } else {
                    let placeholder = if side == 0 { "lower" } else { "upper" };
                    frame.endpoints.push((placeholder.to_string(), None));
                }
            }
        }
        frame.operand("i", i);
        frame.operand("j", j);
        Ok(frame)
    }
}

impl<'ctx> Problem<'ctx> for ShiftCheck<'_, 'ctx> {
    fn check(&self, session: &Session<'ctx>) -> Result<Outcome> {
        if self.claim.is_vacuous() {
            return Ok(Outcome::Misconfigured(Misconfiguration::NoClaim));
        }
        self.frame()?.refute_claim(session, &self.claim)
    }

    fn check_tightness(&self, session: &Session<'ctx>) -> Result<TightnessReport> {
        self.frame()?.tightness(session, &self.claim)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::error::Error;
    use crate::solver::SolverConfig;

    #[test]
    fn test_apply_shift_params_uses_signedness() {
        let ctx = Context::new(&z3::Config::new());
        let lo = Scalar::new_const(&ctx, "a0", Sort::Signed(8));
        let var = Scalar::new_const(&ctx, "i", Sort::Signed(8));

        let mut sink: Vec<Bool> = Vec::new();
        apply_shift_params(&mut sink, &ShiftParams::unsigned().at_least(&lo), &var).unwrap();
        assert_eq!(sink.len(), 1);
        assert!(sink[0].to_string().contains("bvuge"));

        let mut sink: Vec<Bool> = Vec::new();
        apply_shift_params(&mut sink, &ShiftParams::signed(), &var).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_endpoint_width_must_match_shift_width() {
        let config = SolverConfig::default();
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config);
        let a0 = Scalar::new_const(&ctx, "a0", Sort::Signed(16));
        let b0 = Scalar::new_const(&ctx, "b0", Sort::Unsigned(8));

        let problem = ShiftCheck::new(
            &ctx,
            ShiftDirection::Left,
            8,
            ShiftParams::signed().at_least(&a0),
            ShiftParams::unsigned().at_least(&b0),
            Claim::at_least(Scalar::zero(&ctx, Sort::Signed(8))),
        );
        let err = problem.check(&session).unwrap_err();
        assert!(matches!(
            err,
            Error::SortMismatch {
                expected: Sort::Signed(8),
                found: Sort::Signed(16)
            }
        ));
        assert!(matches!(problem.check_tightness(&session), Err(Error::SortMismatch { .. })));
    }

    #[test]
    fn test_unsigned_left_shift_lower_bound() {
        let config = SolverConfig::default();
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config);
        let u8s = Sort::Unsigned(8);
        let a0 = Scalar::new_const(&ctx, "a0", u8s);
        let b0 = Scalar::new_const(&ctx, "b0", u8s);
        let emin = shift_left(&a0, &b0).unwrap();
        let no_overflow = shl_overflow(&a0, &b0, &emin).unwrap().not();

        let problem = ShiftCheck::new(
            &ctx,
            ShiftDirection::Left,
            8,
            ShiftParams::unsigned().at_least(&a0),
            ShiftParams::unsigned().at_least(&b0),
            Claim::at_least(emin),
        )
        .assume(no_overflow);
        assert_eq!(problem.check(&session).unwrap(), Outcome::Proved);
    }
}
