//! Property-based checks of the operation semantics against native integer arithmetic,
//! sampled elements of proved rules, and a few whole-frame properties of the checker.

use bounds_rs::domain::{Scalar, Sort};
use bounds_rs::engine::{check, Claim, Outcome};
use bounds_rs::interval::{apply_bool_interval, BoolInterval, Interval};
use bounds_rs::ops::{halide_div, halide_mod, shift_left, shift_right, Operation};
use bounds_rs::solver::{Decision, Session, SolverConfig};
use bounds_rs::value::Value;
use proptest::prelude::*;
use z3::ast::{Ast, Bool};
use z3::{Config, Context};

const I8: Sort = Sort::Signed(8);
const U8: Sort = Sort::Unsigned(8);

fn literal(s: &Scalar) -> Value {
    s.constant_value().expect("closed term simplifies to a literal")
}

fn native(s: &Scalar) -> i64 {
    let value = literal(s);
    let n = value.as_int().expect("integer literal");
    i64::try_from(n).expect("fits in i64")
}

/// Endpoints `lo <= hi` and an element between them, from an offset and two widths.
fn within(lo: i64, width: i64, pick: i64) -> (i64, i64, i64) {
    (lo, lo + width, lo + pick % (width + 1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Division and modulo by zero yield zero in every sort.
    #[test]
    fn div_mod_by_zero_is_zero(x in any::<i8>()) {
        let ctx = Context::new(&Config::new());
        for sort in [Sort::Int, I8, U8] {
            let i = Scalar::from_i64(&ctx, x as i64, sort);
            let zero = Scalar::zero(&ctx, sort);
            prop_assert_eq!(literal(&halide_div(&i, &zero).unwrap()), Value::from(0));
            prop_assert_eq!(literal(&halide_mod(&i, &zero).unwrap()), Value::from(0));
        }
    }

    /// Signed 8-bit division is Euclidean, wrapping on `-128 / -1`.
    #[test]
    fn signed_div_mod_are_euclidean(x in any::<i8>(), y in any::<i8>().prop_filter("non-zero", |y| *y != 0)) {
        let ctx = Context::new(&Config::new());
        let i = Scalar::from_i64(&ctx, x as i64, I8);
        let j = Scalar::from_i64(&ctx, y as i64, I8);
        let q = literal(&halide_div(&i, &j).unwrap());
        let r = literal(&halide_mod(&i, &j).unwrap());
        prop_assert_eq!(q, Value::from(x.wrapping_div_euclid(y) as i64));
        prop_assert_eq!(r, Value::from(x.wrapping_rem_euclid(y) as i64));
    }

    #[test]
    fn unsigned_div_mod_truncate(x in any::<u8>(), y in 1..=u8::MAX) {
        let ctx = Context::new(&Config::new());
        let i = Scalar::from_i64(&ctx, x as i64, U8);
        let j = Scalar::from_i64(&ctx, y as i64, U8);
        prop_assert_eq!(literal(&halide_div(&i, &j).unwrap()), Value::from((x / y) as i64));
        prop_assert_eq!(literal(&halide_mod(&i, &j).unwrap()), Value::from((x % y) as i64));
    }

    /// Unbounded integers satisfy `x == q * y + r` with `0 <= r < |y|`.
    #[test]
    fn int_div_mod_identity(x in -1000i64..1000, y in (-50i64..50).prop_filter("non-zero", |y| *y != 0)) {
        let ctx = Context::new(&Config::new());
        let i = Scalar::from_i64(&ctx, x, Sort::Int);
        let j = Scalar::from_i64(&ctx, y, Sort::Int);
        prop_assert_eq!(literal(&halide_div(&i, &j).unwrap()), Value::from(x.div_euclid(y)));
        prop_assert_eq!(literal(&halide_mod(&i, &j).unwrap()), Value::from(x.rem_euclid(y)));
    }

    /// A negative left shift is an arithmetic right shift, and a negative right shift a left shift.
    #[test]
    fn negative_shift_reverses_direction(x in any::<i8>(), k in 0u32..8) {
        let ctx = Context::new(&Config::new());
        let i = Scalar::from_i64(&ctx, x as i64, I8);
        let minus_k = Scalar::from_i64(&ctx, -(k as i64), I8);
        prop_assert_eq!(literal(&shift_left(&i, &minus_k).unwrap()), Value::from((x >> k) as i64));
        let left = ((x as u8) << k) as i8;
        prop_assert_eq!(literal(&shift_right(&i, &minus_k).unwrap()), Value::from(left as i64));
    }

    /// `[a0, a1] + [b0, b1]` stays within `[a0 + b0, a1 + b1]`.
    #[test]
    fn sampled_add_stays_within_claim(
        (a0, da, pa) in (-1000i64..1000, 0i64..100, 0i64..100),
        (b0, db, pb) in (-1000i64..1000, 0i64..100, 0i64..100),
    ) {
        let ctx = Context::new(&Config::new());
        let (a0, a1, x) = within(a0, da, pa);
        let (b0, b1, y) = within(b0, db, pb);
        let res = Operation::Add
            .apply(&Scalar::from_i64(&ctx, x, Sort::Int), &Scalar::from_i64(&ctx, y, Sort::Int))
            .unwrap();
        let res = native(&res);
        prop_assert!(a0 + b0 <= res && res <= a1 + b1);
    }

    /// `[a0, a1] / [_, _]` stays within `[min(-a1, a0), max(-a0, a1)]`, zero divisor included.
    #[test]
    fn sampled_div_stays_within_claim(
        (a0, da, pa) in (-1000i64..1000, 1i64..100, 0i64..100),
        y in -20i64..=20,
    ) {
        let ctx = Context::new(&Config::new());
        let (a0, a1, x) = within(a0, da, pa);
        let q = halide_div(&Scalar::from_i64(&ctx, x, Sort::Int), &Scalar::from_i64(&ctx, y, Sort::Int)).unwrap();
        let q = native(&q);
        prop_assert!((-a1).min(a0) <= q && q <= (-a0).max(a1), "{} / {} = {}", x, y, q);
    }

    /// `[_, _] % [b0, b1]` with `b0 > 0` stays within `[0, b1 - 1]`.
    #[test]
    fn sampled_mod_stays_within_claim(
        x in -1000i64..1000,
        (b0, db, pb) in (1i64..50, 0i64..50, 0i64..50),
    ) {
        let ctx = Context::new(&Config::new());
        let (_, b1, y) = within(b0, db, pb);
        let r = halide_mod(&Scalar::from_i64(&ctx, x, Sort::Int), &Scalar::from_i64(&ctx, y, Sort::Int)).unwrap();
        let r = native(&r);
        prop_assert!(0 <= r && r <= b1 - 1, "{} % {} = {}", x, y, r);
    }

    /// Unsigned `[a0, _] << [b0, _]` without overflow stays at or above `a0 << b0`.
    #[test]
    fn sampled_unsigned_shl_stays_above_claim(k in 0i64..8, raw in 0i64..256, pa in 0i64..=100, pb in 0i64..=100) {
        // Elements chosen so that `x << k` keeps every bit; smaller endpoints then cannot overflow either.
        let x = raw % (256 >> k);
        let (a0, b0) = (x * pa / 100, k * pb / 100);

        let ctx = Context::new(&Config::new());
        let shifted = |v: i64, s: i64| {
            native(&shift_left(&Scalar::from_i64(&ctx, v, U8), &Scalar::from_i64(&ctx, s, U8)).unwrap())
        };
        prop_assert_eq!(shifted(x, k), x << k);
        prop_assert!(shifted(x, k) >= shifted(a0, b0));
    }

    #[test]
    fn unsigned_shifts_are_logical(x in any::<u8>(), k in 0u32..8) {
        let ctx = Context::new(&Config::new());
        let i = Scalar::from_i64(&ctx, x as i64, U8);
        let j = Scalar::from_i64(&ctx, k as i64, U8);
        prop_assert_eq!(literal(&shift_left(&i, &j).unwrap()), Value::from((x << k) as i64));
        prop_assert_eq!(literal(&shift_right(&i, &j).unwrap()), Value::from((x >> k) as i64));
    }
}

/// The lattice constraints admit exactly `lower -> upper` with `inner` on one of the extremes.
#[test]
fn bool_interval_lattice_is_consistent() {
    let config = SolverConfig::default();
    let ctx = Context::new(&config.z3_config());
    let session = Session::new(&ctx, config);
    let c = BoolInterval::new(&ctx, "c");
    for bits in 0..8u8 {
        let (lower, upper, inner) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
        let mut constraints = Vec::new();
        apply_bool_interval(&mut constraints, &c);
        constraints.push(c.lower()._eq(&Bool::from_bool(&ctx, lower)));
        constraints.push(c.upper()._eq(&Bool::from_bool(&ctx, upper)));
        constraints.push(c.inner()._eq(&Bool::from_bool(&ctx, inner)));
        let admitted = (!lower || upper) && (inner == lower || inner == upper);
        let decision = session.decide(&constraints).unwrap();
        assert_eq!(
            matches!(decision, Decision::Satisfiable(_)),
            admitted,
            "lower={} upper={} inner={}",
            lower,
            upper,
            inner
        );
    }
}

/// A refuted claim names every endpoint and operand, and its result really escapes the claim.
#[test]
fn counterexample_is_complete() {
    let config = SolverConfig::default();
    let ctx = Context::new(&config.z3_config());
    let session = Session::new(&ctx, config);
    let a = Interval::bounded(&ctx, "a", I8);
    let b = Interval::bounded(&ctx, "b", I8);
    // Ignores the wrap-around of 8-bit addition.
    let claim = Claim::at_least(a.lo().add(b.lo()));
    let outcome = check(&session, Operation::Add, a, b, claim).unwrap();

    let Outcome::Disproved(cex) = outcome else {
        panic!("expected a counterexample, got {:?}", outcome);
    };
    assert_eq!(cex.confirmed, Some(true));
    let names: Vec<&str> = cex.endpoints.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["a0", "a1", "b0", "b1"]);
    assert!(cex.endpoints.iter().all(|(_, v)| v.is_some()));
    let operands: Vec<&str> = cex.operands.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(operands, ["i", "j"]);
    let result = cex.result.as_int().unwrap();
    let lower = cex.claimed_lower.as_ref().and_then(|v| v.as_int()).unwrap();
    assert!(result < lower);
    assert!(cex.claimed_upper.is_none());
}
