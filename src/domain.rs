//! Numeric domains and sort-aware symbolic scalars.
//!
//! A [`Scalar`] is a symbolic integer living in one of three domains: unbounded
//! mathematical integers, or fixed-width two's complement bit-vectors read as
//! signed or unsigned. Comparisons pick the signed or unsigned solver primitive
//! from the sort, so callers never have to.

use std::fmt::{Display, Formatter};

use z3::ast::{Ast, Bool, Int, BV};
use z3::{Context, Model};

use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Unbounded integers.
    Int,
    /// Signed bit-vectors of the given width.
    Signed(u32),
    /// Unsigned bit-vectors of the given width.
    Unsigned(u32),
}

impl Sort {
    /// Bit-vector sort with a validated width.
    pub fn bits(width: u32, signed: bool) -> Result<Sort> {
        if !(1..=64).contains(&width) {
            return Err(Error::InvalidWidth(width));
        }
        Ok(if signed { Sort::Signed(width) } else { Sort::Unsigned(width) })
    }

    pub fn width(self) -> Option<u32> {
        match self {
            Sort::Int => None,
            Sort::Signed(w) | Sort::Unsigned(w) => Some(w),
        }
    }

    pub fn is_signed(self) -> bool {
        !matches!(self, Sort::Unsigned(_))
    }

    pub fn is_bits(self) -> bool {
        self.width().is_some()
    }

    /// Same width, other signedness. Identity on [`Sort::Int`].
    pub fn with_signedness(self, signed: bool) -> Sort {
        match self {
            Sort::Int => Sort::Int,
            Sort::Signed(w) | Sort::Unsigned(w) => {
                if signed {
                    Sort::Signed(w)
                } else {
                    Sort::Unsigned(w)
                }
            }
        }
    }

    /// Whether values of both sorts share one solver representation.
    pub fn compatible(self, other: Sort) -> bool {
        self.width() == other.width()
    }

    /// Smallest representable value, if bounded.
    pub fn min_value(self) -> Option<i64> {
        match self {
            Sort::Int => None,
            Sort::Unsigned(_) => Some(0),
            Sort::Signed(w) => Some(if w == 64 { i64::MIN } else { -(1i64 << (w - 1)) }),
        }
    }
}

impl Display for Sort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sort::Int => write!(f, "int"),
            Sort::Signed(w) => write!(f, "i{}", w),
            Sort::Unsigned(w) => write!(f, "u{}", w),
        }
    }
}

#[derive(Debug, Clone)]
enum Repr<'ctx> {
    Int(Int<'ctx>),
    Bits(BV<'ctx>),
}

enum Pair<'a, 'ctx> {
    Int(&'a Int<'ctx>, &'a Int<'ctx>),
    Bits(&'a BV<'ctx>, &'a BV<'ctx>),
}

/// Symbolic integer term tagged with its [`Sort`].
///
/// Binary operations require operands of compatible sorts (same width); the
/// result takes the sort of `self`. Mixing incompatible sorts panics, so the
/// fallible entry points in [`ops`][crate::ops] check compatibility first.
#[derive(Debug, Clone)]
pub struct Scalar<'ctx> {
    sort: Sort,
    repr: Repr<'ctx>,
}

impl<'ctx> Scalar<'ctx> {
    /// Fresh uninterpreted constant.
    ///
    /// # Panics
    ///
    /// Panics if the sort is a bit-vector with a width outside `1..=64`.
    pub fn new_const(ctx: &'ctx Context, name: &str, sort: Sort) -> Self {
        let repr = match sort.width() {
            None => Repr::Int(Int::new_const(ctx, name)),
            Some(w) => {
                assert!((1..=64).contains(&w), "bit-vector width must be in 1..=64");
                Repr::Bits(BV::new_const(ctx, name, w))
            }
        };
        Self { sort, repr }
    }

    /// Literal. Bit-vector literals keep the low bits of `value`.
    pub fn from_i64(ctx: &'ctx Context, value: i64, sort: Sort) -> Self {
        let repr = match sort.width() {
            None => Repr::Int(Int::from_i64(ctx, value)),
            Some(w) => {
                assert!((1..=64).contains(&w), "bit-vector width must be in 1..=64");
                Repr::Bits(BV::from_i64(ctx, value, w))
            }
        };
        Self { sort, repr }
    }

    pub fn zero(ctx: &'ctx Context, sort: Sort) -> Self {
        Self::from_i64(ctx, 0, sort)
    }

    pub fn one(ctx: &'ctx Context, sort: Sort) -> Self {
        Self::from_i64(ctx, 1, sort)
    }

    pub(crate) fn from_int(term: Int<'ctx>) -> Self {
        Self { sort: Sort::Int, repr: Repr::Int(term) }
    }

    pub(crate) fn from_bits(term: BV<'ctx>, signed: bool) -> Self {
        let sort = if signed {
            Sort::Signed(term.get_size())
        } else {
            Sort::Unsigned(term.get_size())
        };
        Self { sort, repr: Repr::Bits(term) }
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn context(&self) -> &'ctx Context {
        match &self.repr {
            Repr::Int(t) => t.get_ctx(),
            Repr::Bits(t) => t.get_ctx(),
        }
    }

    pub fn as_int(&self) -> Option<&Int<'ctx>> {
        match &self.repr {
            Repr::Int(t) => Some(t),
            Repr::Bits(_) => None,
        }
    }

    pub fn as_bits(&self) -> Option<&BV<'ctx>> {
        match &self.repr {
            Repr::Int(_) => None,
            Repr::Bits(t) => Some(t),
        }
    }

    pub(crate) fn bits(&self) -> &BV<'ctx> {
        match &self.repr {
            Repr::Bits(t) => t,
            Repr::Int(_) => panic!("expected a bit-vector scalar, found `{}`", self.sort),
        }
    }

    /// Same bits, other signedness.
    pub fn reinterpret(&self, signed: bool) -> Self {
        Self {
            sort: self.sort.with_signedness(signed),
            repr: self.repr.clone(),
        }
    }

    fn pair<'a>(&'a self, other: &'a Self) -> Pair<'a, 'ctx> {
        match (&self.repr, &other.repr) {
            (Repr::Int(a), Repr::Int(b)) => Pair::Int(a, b),
            (Repr::Bits(a), Repr::Bits(b)) if a.get_size() == b.get_size() => Pair::Bits(a, b),
            _ => panic!("sort mismatch: `{}` vs `{}`", self.sort, other.sort),
        }
    }

    fn lift(&self, int: impl FnOnce(&Int<'ctx>) -> Int<'ctx>, bits: impl FnOnce(&BV<'ctx>) -> BV<'ctx>) -> Self {
        let repr = match &self.repr {
            Repr::Int(t) => Repr::Int(int(t)),
            Repr::Bits(t) => Repr::Bits(bits(t)),
        };
        Self { sort: self.sort, repr }
    }

    fn lift2(
        &self,
        other: &Self,
        int: impl FnOnce(&Int<'ctx>, &Int<'ctx>) -> Int<'ctx>,
        bits: impl FnOnce(&BV<'ctx>, &BV<'ctx>) -> BV<'ctx>,
    ) -> Self {
        let repr = match self.pair(other) {
            Pair::Int(a, b) => Repr::Int(int(a, b)),
            Pair::Bits(a, b) => Repr::Bits(bits(a, b)),
        };
        Self { sort: self.sort, repr }
    }

    fn compare(
        &self,
        other: &Self,
        int: impl FnOnce(&Int<'ctx>, &Int<'ctx>) -> Bool<'ctx>,
        signed: impl FnOnce(&BV<'ctx>, &BV<'ctx>) -> Bool<'ctx>,
        unsigned: impl FnOnce(&BV<'ctx>, &BV<'ctx>) -> Bool<'ctx>,
    ) -> Bool<'ctx> {
        match self.pair(other) {
            Pair::Int(a, b) => int(a, b),
            Pair::Bits(a, b) if self.sort.is_signed() => signed(a, b),
            Pair::Bits(a, b) => unsigned(a, b),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        self.lift2(other, |a, b| Int::add(a.get_ctx(), &[a, b]), |a, b| a.bvadd(b))
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.lift2(other, |a, b| Int::sub(a.get_ctx(), &[a, b]), |a, b| a.bvsub(b))
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.lift2(other, |a, b| Int::mul(a.get_ctx(), &[a, b]), |a, b| a.bvmul(b))
    }

    pub fn neg(&self) -> Self {
        self.lift(|t| t.unary_minus(), |t| t.bvneg())
    }

    pub fn lt(&self, other: &Self) -> Bool<'ctx> {
        self.compare(other, |a, b| a.lt(b), |a, b| a.bvslt(b), |a, b| a.bvult(b))
    }

    pub fn le(&self, other: &Self) -> Bool<'ctx> {
        self.compare(other, |a, b| a.le(b), |a, b| a.bvsle(b), |a, b| a.bvule(b))
    }

    pub fn gt(&self, other: &Self) -> Bool<'ctx> {
        self.compare(other, |a, b| a.gt(b), |a, b| a.bvsgt(b), |a, b| a.bvugt(b))
    }

    pub fn ge(&self, other: &Self) -> Bool<'ctx> {
        self.compare(other, |a, b| a.ge(b), |a, b| a.bvsge(b), |a, b| a.bvuge(b))
    }

    pub fn eq(&self, other: &Self) -> Bool<'ctx> {
        match self.pair(other) {
            Pair::Int(a, b) => a._eq(b),
            Pair::Bits(a, b) => a._eq(b),
        }
    }

    pub fn ne(&self, other: &Self) -> Bool<'ctx> {
        self.eq(other).not()
    }

    /// Compares against the literal `value` in this scalar's sort.
    pub fn lt_lit(&self, value: i64) -> Bool<'ctx> {
        self.lt(&Self::from_i64(self.context(), value, self.sort))
    }

    pub fn le_lit(&self, value: i64) -> Bool<'ctx> {
        self.le(&Self::from_i64(self.context(), value, self.sort))
    }

    pub fn gt_lit(&self, value: i64) -> Bool<'ctx> {
        self.gt(&Self::from_i64(self.context(), value, self.sort))
    }

    pub fn ge_lit(&self, value: i64) -> Bool<'ctx> {
        self.ge(&Self::from_i64(self.context(), value, self.sort))
    }

    pub fn eq_lit(&self, value: i64) -> Bool<'ctx> {
        self.eq(&Self::from_i64(self.context(), value, self.sort))
    }

    pub fn is_zero(&self) -> Bool<'ctx> {
        self.eq_lit(0)
    }

    /// `cond ? then : otherwise`.
    pub fn select(cond: &Bool<'ctx>, then: &Self, otherwise: &Self) -> Self {
        then.lift2(otherwise, |a, b| cond.ite(a, b), |a, b| cond.ite(a, b))
    }

    pub fn min(&self, other: &Self) -> Self {
        Self::select(&self.lt(other), self, other)
    }

    pub fn max(&self, other: &Self) -> Self {
        Self::select(&self.gt(other), self, other)
    }

    pub fn simplify(&self) -> Self {
        self.lift(|t| t.simplify(), |t| t.simplify())
    }

    /// Reads this term back as a literal under `model`, completing the model if needed.
    pub fn eval(&self, model: &Model<'ctx>) -> Result<Value> {
        let missing = || Error::Evaluation { term: self.to_string() };
        match &self.repr {
            Repr::Int(t) => {
                let v = model.eval(t, true).ok_or_else(missing)?;
                match v.as_i64() {
                    Some(n) => Ok(Value::from(n)),
                    None => Value::parse_numeral(&v.to_string()).ok_or_else(missing),
                }
            }
            Repr::Bits(t) => {
                let v = model.eval(t, true).ok_or_else(missing)?;
                let bits = v.as_u64().ok_or_else(missing)?;
                Ok(Value::from_bits(bits, t.get_size(), self.sort.is_signed()))
            }
        }
    }

    /// Literal value of a closed term, if it simplifies to one.
    pub fn constant_value(&self) -> Option<Value> {
        match &self.simplify().repr {
            Repr::Int(t) => t.as_i64().map(Value::from),
            Repr::Bits(t) => t
                .as_u64()
                .map(|bits| Value::from_bits(bits, t.get_size(), self.sort.is_signed())),
        }
    }
}

impl Display for Scalar<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.repr {
            Repr::Int(t) => write!(f, "{}", t),
            Repr::Bits(t) => write!(f, "{}", t),
        }
    }
}

/// Either a scalar or a boolean term, for uniform model read-back.
#[derive(Debug, Clone)]
pub enum Term<'ctx> {
    Scalar(Scalar<'ctx>),
    Bool(Bool<'ctx>),
}

impl<'ctx> Term<'ctx> {
    pub fn eval(&self, model: &Model<'ctx>) -> Result<Value> {
        match self {
            Term::Scalar(s) => s.eval(model),
            Term::Bool(b) => model
                .eval(b, true)
                .and_then(|v| v.as_bool())
                .map(Value::Bool)
                .ok_or_else(|| Error::Evaluation { term: b.to_string() }),
        }
    }

    /// Equality of two terms of the same kind, `None` for a kind mismatch.
    pub fn eq(&self, other: &Term<'ctx>) -> Option<Bool<'ctx>> {
        match (self, other) {
            (Term::Scalar(a), Term::Scalar(b)) if a.sort().compatible(b.sort()) => Some(a.eq(b)),
            (Term::Bool(a), Term::Bool(b)) => Some(a._eq(b)),
            _ => None,
        }
    }
}

impl<'ctx> From<Scalar<'ctx>> for Term<'ctx> {
    fn from(s: Scalar<'ctx>) -> Self {
        Term::Scalar(s)
    }
}

impl<'ctx> From<Bool<'ctx>> for Term<'ctx> {
    fn from(b: Bool<'ctx>) -> Self {
        Term::Bool(b)
    }
}

impl Display for Term<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Scalar(s) => write!(f, "{}", s),
            Term::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;
    use z3::Config;

    use super::*;

    #[test]
    fn test_sort_bits_validates_width() {
        assert_eq!(Sort::bits(8, true).ok(), Some(Sort::Signed(8)));
        assert_eq!(Sort::bits(64, false).ok(), Some(Sort::Unsigned(64)));
        assert!(matches!(Sort::bits(0, true), Err(Error::InvalidWidth(0))));
        assert!(matches!(Sort::bits(65, true), Err(Error::InvalidWidth(65))));
    }

    #[test]
    fn test_sort_min_value() {
        assert_eq!(Sort::Signed(8).min_value(), Some(-128));
        assert_eq!(Sort::Signed(64).min_value(), Some(i64::MIN));
        assert_eq!(Sort::Unsigned(8).min_value(), Some(0));
        assert_eq!(Sort::Int.min_value(), None);
    }

    #[test]
    fn test_signedness_drives_comparison() {
        let ctx = Context::new(&Config::new());
        let ff_signed = Scalar::from_i64(&ctx, -1, Sort::Signed(8));
        let one_signed = Scalar::one(&ctx, Sort::Signed(8));
        assert_eq!(ff_signed.lt(&one_signed).simplify().as_bool(), Some(true));

        let ff_unsigned = ff_signed.reinterpret(false);
        let one_unsigned = one_signed.reinterpret(false);
        assert_eq!(ff_unsigned.lt(&one_unsigned).simplify().as_bool(), Some(false));
        assert_eq!(ff_unsigned.constant_value(), Some(Value::from(255)));
    }

    #[test]
    fn test_min_max_literals() {
        let ctx = Context::new(&Config::new());
        let a = Scalar::from_i64(&ctx, -4, Sort::Int);
        let b = Scalar::from_i64(&ctx, 9, Sort::Int);
        assert_eq!(a.min(&b).constant_value(), Some(Value::from(-4)));
        assert_eq!(a.max(&b).constant_value(), Some(Value::from(9)));
    }

    #[test]
    #[should_panic(expected = "sort mismatch")]
    fn test_width_mismatch_panics() {
        let ctx = Context::new(&Config::new());
        let a = Scalar::zero(&ctx, Sort::Signed(8));
        let b = Scalar::zero(&ctx, Sort::Signed(16));
        let _ = a.add(&b);
    }
}
