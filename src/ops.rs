//! Operation semantics of the analyzed language.
//!
//! Every function here is pure: it builds a result term and never touches a
//! solver. Undefined-behavior predicates ([`shl_overflow`], [`shr_overflow`]) are
//! separate terms that a caller asserts false when a rule is only claimed for
//! well-defined executions.
//!
//! Notable departures from plain machine arithmetic:
//!
//! - Division and modulo by zero yield zero.
//! - Signed division rounds so that the remainder is never negative (Euclidean),
//!   matching the unbounded-integer solver theory.
//! - A negative shift amount shifts the other way by its magnitude.
//! - A signed left shift of a negative value by a non-negative amount goes
//!   through multiplication.

use std::fmt::{Display, Formatter};

use z3::ast::{Ast, Bool, BV};

use crate::domain::{Scalar, Sort};
use crate::error::{Error, Result};

pub(crate) fn ensure_compatible(i: &Scalar, j: &Scalar) -> Result<()> {
    if i.sort().compatible(j.sort()) {
        Ok(())
    } else {
        Err(Error::SortMismatch {
            expected: i.sort(),
            found: j.sort(),
        })
    }
}

fn ensure_bits(operation: &'static str, s: &Scalar) -> Result<()> {
    if s.sort().is_bits() {
        Ok(())
    } else {
        Err(Error::UnsupportedSort { operation, sort: s.sort() })
    }
}

fn ensure_bit_pair(operation: &'static str, i: &Scalar, j: &Scalar) -> Result<()> {
    ensure_bits(operation, i)?;
    ensure_bits(operation, j)?;
    ensure_compatible(i, j)
}

/// Division that yields zero for a zero divisor.
pub fn halide_div<'ctx>(i: &Scalar<'ctx>, j: &Scalar<'ctx>) -> Result<Scalar<'ctx>> {
    ensure_compatible(i, j)?;
    let quotient = match (i.as_int(), j.as_int()) {
        (Some(a), Some(b)) => Scalar::from_int(a.div(b)),
        _ if i.sort().is_signed() => Scalar::from_bits(euclid_div(i.bits(), j.bits()), true),
        _ => Scalar::from_bits(i.bits().bvudiv(j.bits()), false),
    };
    Ok(Scalar::select(&j.is_zero(), &Scalar::zero(i.context(), i.sort()), &quotient))
}

/// Modulo that yields zero for a zero divisor. The remainder is never negative.
pub fn halide_mod<'ctx>(i: &Scalar<'ctx>, j: &Scalar<'ctx>) -> Result<Scalar<'ctx>> {
    ensure_compatible(i, j)?;
    let remainder = match (i.as_int(), j.as_int()) {
        (Some(a), Some(b)) => Scalar::from_int(a.modulo(b)),
        _ if i.sort().is_signed() => Scalar::from_bits(euclid_mod(i.bits(), j.bits()), true),
        _ => Scalar::from_bits(i.bits().bvurem(j.bits()), false),
    };
    Ok(Scalar::select(&j.is_zero(), &Scalar::zero(i.context(), i.sort()), &remainder))
}

fn euclid_div<'ctx>(a: &BV<'ctx>, b: &BV<'ctx>) -> BV<'ctx> {
    let w = a.get_size();
    let ctx = a.get_ctx();
    let zero = BV::from_i64(ctx, 0, w);
    let one = BV::from_i64(ctx, 1, w);
    let q = a.bvsdiv(b);
    let r = a.bvsrem(b);
    let adjusted = b.bvsgt(&zero).ite(&q.bvsub(&one), &q.bvadd(&one));
    r.bvslt(&zero).ite(&adjusted, &q)
}

fn euclid_mod<'ctx>(a: &BV<'ctx>, b: &BV<'ctx>) -> BV<'ctx> {
    let zero = BV::from_i64(a.get_ctx(), 0, a.get_size());
    let r = a.bvsrem(b);
    let magnitude = b.bvslt(&zero).ite(&b.bvneg(), b);
    r.bvslt(&zero).ite(&r.bvadd(&magnitude), &r)
}

/// Left shift under the four shiftee/amount signedness combinations.
///
/// | shiftee | amount | semantics |
/// |---|---|---|
/// | unsigned | unsigned | logical shift left |
/// | signed | unsigned | logical shift left |
/// | unsigned | signed | negative amount: logical shift right by magnitude |
/// | signed | signed | negative amount: arithmetic shift right by magnitude; negative shiftee: multiply by `1 << j` |
pub fn shift_left<'ctx>(i: &Scalar<'ctx>, j: &Scalar<'ctx>) -> Result<Scalar<'ctx>> {
    ensure_bit_pair("<<", i, j)?;
    let (a, b) = (i.bits(), j.bits());
    let signed = i.sort().is_signed();
    let bits = match (signed, j.sort().is_signed()) {
        (_, false) => a.bvshl(b),
        (false, true) => j.lt_lit(0).ite(&a.bvlshr(&b.bvneg()), &a.bvshl(b)),
        (true, true) => {
            let one = BV::from_i64(a.get_ctx(), 1, a.get_size());
            let forward = i.lt_lit(0).ite(&a.bvmul(&one.bvshl(b)), &a.bvshl(b));
            j.lt_lit(0).ite(&a.bvashr(&b.bvneg()), &forward)
        }
    };
    Ok(Scalar::from_bits(bits, signed))
}

/// Right shift under the four shiftee/amount signedness combinations.
///
/// An unsigned shiftee shifts logically, a signed one arithmetically. A negative
/// signed amount turns into a logical left shift by its magnitude.
pub fn shift_right<'ctx>(i: &Scalar<'ctx>, j: &Scalar<'ctx>) -> Result<Scalar<'ctx>> {
    ensure_bit_pair(">>", i, j)?;
    let (a, b) = (i.bits(), j.bits());
    let signed = i.sort().is_signed();
    let forward = if signed { a.bvashr(b) } else { a.bvlshr(b) };
    let bits = if j.sort().is_signed() {
        j.lt_lit(0).ite(&a.bvshl(&b.bvneg()), &forward)
    } else {
        forward
    };
    Ok(Scalar::from_bits(bits, signed))
}

/// Number of set bits, as a bit-vector of the same width.
pub fn count_set_bits<'ctx>(x: &BV<'ctx>) -> BV<'ctx> {
    let w = x.get_size();
    let ctx = x.get_ctx();
    let one = BV::from_i64(ctx, 1, w);
    (0..w).fold(BV::from_i64(ctx, 0, w), |acc, k| {
        let bit = x.bvlshr(&BV::from_u64(ctx, k as u64, w)).bvand(&one);
        acc.bvadd(&bit)
    })
}

/// Whether `i << amount` producing `res` loses information, with `amount` read as non-negative.
fn left_shift_overflows<'ctx>(i: &Scalar<'ctx>, amount: &BV<'ctx>, res: &Scalar<'ctx>) -> Bool<'ctx> {
    let ctx = i.context();
    let a = i.bits();
    let w = a.get_size();
    let bits_lost = Bool::and(
        ctx,
        &[&i.ge_lit(0), &count_set_bits(a)._eq(&count_set_bits(res.bits())).not()],
    );
    match i.sort().min_value().filter(|_| i.sort().is_signed()) {
        Some(min) => {
            let sign_flip = Bool::and(ctx, &[&i.gt_lit(0), &res.lt_lit(0)]);
            let scale = BV::from_i64(ctx, 1, 2 * w).bvshl(&amount.zero_ext(w));
            let wide = a.sign_ext(w).bvmul(&scale);
            let below_min = wide.bvslt(&BV::from_i64(ctx, min, 2 * w));
            Bool::or(ctx, &[&bits_lost, &sign_flip, &below_min])
        }
        None => bits_lost,
    }
}

/// Overflow of `res = i << j` for a non-negative amount.
pub fn shl_overflow<'ctx>(i: &Scalar<'ctx>, j: &Scalar<'ctx>, res: &Scalar<'ctx>) -> Result<Bool<'ctx>> {
    ensure_bit_pair("<<", i, j)?;
    ensure_compatible(i, res)?;
    let overflow = left_shift_overflows(i, j.bits(), res);
    Ok(if j.sort().is_signed() {
        Bool::and(i.context(), &[&j.ge_lit(0), &overflow])
    } else {
        overflow
    })
}

/// Overflow of `res = i >> j`, only possible for a signed shiftee and a negative signed amount.
pub fn shr_overflow<'ctx>(i: &Scalar<'ctx>, j: &Scalar<'ctx>, res: &Scalar<'ctx>) -> Result<Bool<'ctx>> {
    ensure_bit_pair(">>", i, j)?;
    ensure_compatible(i, res)?;
    let ctx = i.context();
    if !(i.sort().is_signed() && j.sort().is_signed()) {
        return Ok(Bool::from_bool(ctx, false));
    }
    let overflow = left_shift_overflows(i, &j.bits().bvneg(), res);
    Ok(Bool::and(ctx, &[&j.lt_lit(0), &overflow]))
}

/// Absolute value in the scalar's own sort.
pub fn abs<'ctx>(i: &Scalar<'ctx>) -> Scalar<'ctx> {
    if i.sort().is_signed() {
        Scalar::select(&i.lt_lit(0), &i.neg(), i)
    } else {
        i.clone()
    }
}

/// Binary operations over scalars.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Min,
    Max,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl Operation {
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mul => "*",
            Operation::Div => "/",
            Operation::Mod => "%",
            Operation::Min => "min",
            Operation::Max => "max",
            Operation::BitAnd => "&",
            Operation::BitOr => "|",
            Operation::BitXor => "^",
            Operation::Shl => "<<",
            Operation::Shr => ">>",
        }
    }

    pub fn apply<'ctx>(self, i: &Scalar<'ctx>, j: &Scalar<'ctx>) -> Result<Scalar<'ctx>> {
        match self {
            Operation::Add => ensure_compatible(i, j).map(|_| i.add(j)),
            Operation::Sub => ensure_compatible(i, j).map(|_| i.sub(j)),
            Operation::Mul => ensure_compatible(i, j).map(|_| i.mul(j)),
            Operation::Div => halide_div(i, j),
            Operation::Mod => halide_mod(i, j),
            Operation::Min => ensure_compatible(i, j).map(|_| i.min(j)),
            Operation::Max => ensure_compatible(i, j).map(|_| i.max(j)),
            Operation::BitAnd => bitwise(self, i, j, |a, b| a.bvand(b)),
            Operation::BitOr => bitwise(self, i, j, |a, b| a.bvor(b)),
            Operation::BitXor => bitwise(self, i, j, |a, b| a.bvxor(b)),
            Operation::Shl => shift_left(i, j),
            Operation::Shr => shift_right(i, j),
        }
    }
}

fn bitwise<'ctx>(
    op: Operation,
    i: &Scalar<'ctx>,
    j: &Scalar<'ctx>,
    f: impl FnOnce(&BV<'ctx>, &BV<'ctx>) -> BV<'ctx>,
) -> Result<Scalar<'ctx>> {
    ensure_bit_pair(op.symbol(), i, j)?;
    Ok(Scalar::from_bits(f(i.bits(), j.bits()), i.sort().is_signed()))
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperation {
    Neg,
    BitNot,
}

impl UnaryOperation {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperation::Neg => "-",
            UnaryOperation::BitNot => "~",
        }
    }

    pub fn apply<'ctx>(self, i: &Scalar<'ctx>) -> Result<Scalar<'ctx>> {
        match self {
            UnaryOperation::Neg => Ok(i.neg()),
            UnaryOperation::BitNot => {
                ensure_bits(self.symbol(), i)?;
                Ok(Scalar::from_bits(i.bits().bvnot(), i.sort().is_signed()))
            }
        }
    }
}

/// Comparison predicates producing a boolean from two scalars.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Eq,
    Ne,
    Lt,
    Le,
}

impl Predicate {
    pub fn symbol(self) -> &'static str {
        match self {
            Predicate::Eq => "==",
            Predicate::Ne => "!=",
            Predicate::Lt => "<",
            Predicate::Le => "<=",
        }
    }

    pub fn apply<'ctx>(self, i: &Scalar<'ctx>, j: &Scalar<'ctx>) -> Result<Bool<'ctx>> {
        ensure_compatible(i, j)?;
        Ok(match self {
            Predicate::Eq => i.eq(j),
            Predicate::Ne => i.ne(j),
            Predicate::Lt => i.lt(j),
            Predicate::Le => i.le(j),
        })
    }
}

/// Boolean connectives over lattice values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoolOperation {
    And,
    Or,
    Not,
}

impl BoolOperation {
    pub fn symbol(self) -> &'static str {
        match self {
            BoolOperation::And => "&&",
            BoolOperation::Or => "||",
            BoolOperation::Not => "!",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            BoolOperation::And | BoolOperation::Or => 2,
            BoolOperation::Not => 1,
        }
    }

    /// Native connective over exactly [`arity`][Self::arity] operands.
    ///
    /// # Panics
    ///
    /// Panics on an arity mismatch.
    pub fn apply<'ctx>(self, operands: &[&Bool<'ctx>]) -> Bool<'ctx> {
        assert_eq!(operands.len(), self.arity(), "arity mismatch for `{}`", self.symbol());
        match self {
            BoolOperation::And => Bool::and(operands[0].get_ctx(), operands),
            BoolOperation::Or => Bool::or(operands[0].get_ctx(), operands),
            BoolOperation::Not => operands[0].not(),
        }
    }

    /// The simplifier's short-circuiting rendition of the connective.
    pub fn make<'ctx>(self, operands: &[&Bool<'ctx>]) -> Bool<'ctx> {
        assert_eq!(operands.len(), self.arity(), "arity mismatch for `{}`", self.symbol());
        match self {
            BoolOperation::And => make_and(operands[0], operands[1]),
            BoolOperation::Or => make_or(operands[0], operands[1]),
            BoolOperation::Not => make_not(operands[0]),
        }
    }
}

/// `a && b`, trying each operand's known truth value before the connective.
pub fn make_and<'ctx>(a: &Bool<'ctx>, b: &Bool<'ctx>) -> Bool<'ctx> {
    let both = Bool::and(a.get_ctx(), &[a, b]);
    let step4 = b.not().ite(b, &both);
    let step3 = a.not().ite(a, &step4);
    let step2 = b.ite(a, &step3);
    a.ite(b, &step2)
}

/// `a || b`, trying each operand's known truth value before the connective.
pub fn make_or<'ctx>(a: &Bool<'ctx>, b: &Bool<'ctx>) -> Bool<'ctx> {
    let either = Bool::or(a.get_ctx(), &[a, b]);
    let step4 = b.not().ite(a, &either);
    let step3 = a.not().ite(b, &step4);
    let step2 = b.ite(b, &step3);
    a.ite(a, &step2)
}

pub fn make_not<'ctx>(e: &Bool<'ctx>) -> Bool<'ctx> {
    let ctx = e.get_ctx();
    let fallback = e.ite(&Bool::from_bool(ctx, true), &e.not());
    e.ite(&Bool::from_bool(ctx, false), &fallback)
}

#[cfg(test)]
mod tests {
    use test_log::test;
    use z3::{Config, Context};

    use super::*;
    use crate::value::Value;

    fn lit<'ctx>(ctx: &'ctx Context, v: i64, sort: Sort) -> Scalar<'ctx> {
        Scalar::from_i64(ctx, v, sort)
    }

    fn value(s: &Scalar) -> Value {
        s.constant_value().unwrap()
    }

    #[test]
    fn test_div_mod_by_zero() {
        let ctx = Context::new(&Config::new());
        for sort in [Sort::Int, Sort::Signed(8), Sort::Unsigned(8)] {
            let i = lit(&ctx, 37, sort);
            let zero = Scalar::zero(&ctx, sort);
            assert_eq!(value(&halide_div(&i, &zero).unwrap()), Value::from(0), "{}", sort);
            assert_eq!(value(&halide_mod(&i, &zero).unwrap()), Value::from(0), "{}", sort);
        }
    }

    #[test]
    fn test_signed_div_mod_euclidean() {
        let ctx = Context::new(&Config::new());
        let cases = [(7, 2, 3, 1), (-7, 2, -4, 1), (7, -2, -3, 1), (-7, -2, 4, 1), (-8, 2, -4, 0)];
        for sort in [Sort::Int, Sort::Signed(8)] {
            for (a, b, q, r) in cases {
                let (i, j) = (lit(&ctx, a, sort), lit(&ctx, b, sort));
                assert_eq!(value(&halide_div(&i, &j).unwrap()), Value::from(q), "{} / {} in {}", a, b, sort);
                assert_eq!(value(&halide_mod(&i, &j).unwrap()), Value::from(r), "{} % {} in {}", a, b, sort);
            }
        }
    }

    #[test]
    fn test_unsigned_div_mod() {
        let ctx = Context::new(&Config::new());
        let u8s = Sort::Unsigned(8);
        let (i, j) = (lit(&ctx, 250, u8s), lit(&ctx, 7, u8s));
        assert_eq!(value(&halide_div(&i, &j).unwrap()), Value::from(35));
        assert_eq!(value(&halide_mod(&i, &j).unwrap()), Value::from(5));
    }

    #[test]
    fn test_shift_left_combinations() {
        let ctx = Context::new(&Config::new());
        let (s8, u8s) = (Sort::Signed(8), Sort::Unsigned(8));
        let shl = |a: i64, sa: Sort, b: i64, sb: Sort| value(&shift_left(&lit(&ctx, a, sa), &lit(&ctx, b, sb)).unwrap());

        assert_eq!(shl(3, u8s, 2, u8s), Value::from(12));
        assert_eq!(shl(-3, s8, 2, u8s), Value::from(-12));
        assert_eq!(shl(12, u8s, -2, s8), Value::from(3));
        assert_eq!(shl(200, u8s, -1, s8), Value::from(100));
        assert_eq!(shl(-66, s8, -1, s8), Value::from(-33));
        assert_eq!(shl(-3, s8, 2, s8), Value::from(-12));
        assert_eq!(shl(5, s8, 1, s8), Value::from(10));
    }

    #[test]
    fn test_shift_right_combinations() {
        let ctx = Context::new(&Config::new());
        let (s8, u8s) = (Sort::Signed(8), Sort::Unsigned(8));
        let shr = |a: i64, sa: Sort, b: i64, sb: Sort| value(&shift_right(&lit(&ctx, a, sa), &lit(&ctx, b, sb)).unwrap());

        assert_eq!(shr(200, u8s, 3, u8s), Value::from(25));
        assert_eq!(shr(-16, s8, 2, u8s), Value::from(-4));
        assert_eq!(shr(3, u8s, -2, s8), Value::from(12));
        assert_eq!(shr(16, u8s, 2, s8), Value::from(4));
        assert_eq!(shr(-3, s8, -1, s8), Value::from(-6));
        assert_eq!(shr(-16, s8, 2, s8), Value::from(-4));
    }

    #[test]
    fn test_shift_rejects_int_sort() {
        let ctx = Context::new(&Config::new());
        let i = lit(&ctx, 1, Sort::Int);
        assert!(matches!(shift_left(&i, &i), Err(Error::UnsupportedSort { .. })));
        assert!(matches!(Operation::BitAnd.apply(&i, &i), Err(Error::UnsupportedSort { .. })));
    }

    #[test]
    fn test_count_set_bits() {
        let ctx = Context::new(&Config::new());
        for (v, n) in [(0u64, 0), (1, 1), (0xFF, 8), (0xA5, 4)] {
            let c = count_set_bits(&BV::from_u64(&ctx, v, 8)).simplify();
            assert_eq!(c.as_u64(), Some(n), "popcount({:#x})", v);
        }
    }

    #[test]
    fn test_shl_overflow() {
        let ctx = Context::new(&Config::new());
        let (s8, u8s) = (Sort::Signed(8), Sort::Unsigned(8));
        let overflows = |a: i64, sa: Sort, b: i64, sb: Sort| {
            let (i, j) = (lit(&ctx, a, sa), lit(&ctx, b, sb));
            let res = shift_left(&i, &j).unwrap();
            shl_overflow(&i, &j, &res).unwrap().simplify().as_bool().unwrap()
        };

        assert!(!overflows(3, s8, 2, s8));
        assert!(overflows(64, s8, 1, s8));
        assert!(overflows(100, s8, 2, u8s));
        assert!(!overflows(-3, s8, 2, s8));
        assert!(overflows(-65, s8, 1, s8));
        assert!(!overflows(-66, s8, -1, s8));
        assert!(overflows(200, u8s, 1, u8s));
        assert!(!overflows(100, u8s, 1, u8s));
    }

    #[test]
    fn test_shr_overflow() {
        let ctx = Context::new(&Config::new());
        let (s8, u8s) = (Sort::Signed(8), Sort::Unsigned(8));
        let overflows = |a: i64, sa: Sort, b: i64, sb: Sort| {
            let (i, j) = (lit(&ctx, a, sa), lit(&ctx, b, sb));
            let res = shift_right(&i, &j).unwrap();
            shr_overflow(&i, &j, &res).unwrap().simplify().as_bool().unwrap()
        };

        assert!(!overflows(64, s8, 1, s8));
        assert!(overflows(64, s8, -1, s8));
        assert!(!overflows(-3, s8, -1, s8));
        assert!(!overflows(200, u8s, -1, s8));
        assert!(!overflows(-100, s8, 1, u8s));
    }

    #[test]
    fn test_make_connectives_agree_with_native() {
        let ctx = Context::new(&Config::new());
        for a in [false, true] {
            let ta = Bool::from_bool(&ctx, a);
            assert_eq!(make_not(&ta).simplify().as_bool(), Some(!a));
            for b in [false, true] {
                let tb = Bool::from_bool(&ctx, b);
                assert_eq!(make_and(&ta, &tb).simplify().as_bool(), Some(a && b));
                assert_eq!(make_or(&ta, &tb).simplify().as_bool(), Some(a || b));
            }
        }
    }

    #[test]
    fn test_bool_operation_arity() {
        assert_eq!(BoolOperation::And.arity(), 2);
        assert_eq!(BoolOperation::Not.arity(), 1);
    }

    #[test]
    fn test_bit_not() {
        let ctx = Context::new(&Config::new());
        let x = lit(&ctx, 5, Sort::Signed(32));
        assert_eq!(value(&UnaryOperation::BitNot.apply(&x).unwrap()), Value::from(-6));
    }
}
