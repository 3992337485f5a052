//! # bounds-rs: Proving interval bound rules with Z3
//!
//! **`bounds-rs`** checks the formulas a compiler's value-range analysis uses to bound the result of an operation.
//! Each rule states a lower and/or upper bound for `a op b` in terms of the endpoints of the operand intervals,
//! and the harness asks Z3 whether any concrete choice of endpoints and operands escapes it.
//!
//! ## How a check works
//!
//! A check builds one *frame*: two symbolic operands `i` and `j`, each constrained to lie within its interval,
//! and a result `i op j` computed with the exact semantics of the analyzed language.
//! The claim is then negated and handed to the solver:
//!
//! - **unsat** means no element escapes the claim, so the rule is [`Proved`][crate::engine::Outcome::Proved].
//! - **sat** yields a model, reported as a [`Counterexample`][crate::engine::Counterexample].
//! - **unknown** (for instance on timeout) is reported as indeterminate, never as proved.
//!
//! A proved claim can additionally be checked for *tightness*: whether some element actually reaches each claimed endpoint.
//!
//! ## Semantics
//!
//! Operations follow the analyzed language rather than machine arithmetic:
//!
//! - Division and modulo by zero yield zero; signed division is Euclidean, so the remainder is never negative.
//! - A negative shift amount reverses the shift direction.
//! - Left shifts that lose bits or flip the sign are overflow and are excluded from the frame.
//!
//! Scalars live either in the unbounded integer theory or in fixed-width bit-vectors of either signedness,
//! see [`Sort`][crate::domain::Sort].
//!
//! ## Basic Usage
//!
//! ```rust
//! use bounds_rs::domain::Sort;
//! use bounds_rs::engine::{check, Claim};
//! use bounds_rs::interval::Interval;
//! use bounds_rs::ops::Operation;
//! use bounds_rs::solver::{Session, SolverConfig};
//! use z3::Context;
//!
//! let config = SolverConfig::default();
//! let ctx = Context::new(&config.z3_config());
//! let session = Session::new(&ctx, config);
//!
//! // [a0, a1] + [b0, b1] lies within [a0 + b0, a1 + b1]
//! let a = Interval::bounded(&ctx, "a", Sort::Int);
//! let b = Interval::bounded(&ctx, "b", Sort::Int);
//! let claim = Claim::between(a.lo().add(b.lo()), a.hi().add(b.hi()));
//!
//! let outcome = check(&session, Operation::Add, a, b, claim).unwrap();
//! assert!(outcome.is_proved());
//! ```
//!
//! ## Core Components
//!
//! - **[`interval`]** and **[`bound`]**: symbolic intervals and their endpoint constraints.
//! - **[`ops`]**: operation semantics, including the overflow predicates for shifts.
//! - **[`engine`]**: soundness and tightness queries, and their results.
//! - **[`shift`]**: the looser problem shape used by shift rules.
//! - **[`catalog`]**: the named rules, each with the verdict it is expected to produce.

pub mod bound;
pub mod catalog;
pub mod domain;
pub mod engine;
pub mod error;
pub mod interval;
pub mod ops;
pub mod report;
pub mod shift;
pub mod solver;
pub mod value;
