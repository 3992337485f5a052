//! Counterexample search for interval-bound claims.
//!
//! Every check follows one protocol. Fresh elements `i` and `j` are placed inside
//! the operand intervals, the operation's result `res` is built, and the solver is
//! asked for an assignment where `res` escapes the claimed bound:
//!
//! - unsatisfiable: the claim holds for every element pair ([`Outcome::Proved`]);
//! - satisfiable: the model is a counterexample ([`Outcome::Disproved`]);
//! - unknown: neither ([`Outcome::Indeterminate`]).
//!
//! Tightness queries reuse the same constraints but ask whether `res` can *equal*
//! a claimed endpoint.
//!
//! # Example
//!
//! ```no_run
//! use bounds_rs::domain::Sort;
//! use bounds_rs::engine::{check, Claim, Outcome};
//! use bounds_rs::interval::Interval;
//! use bounds_rs::ops::Operation;
//! use bounds_rs::solver::{Session, SolverConfig};
//! use z3::Context;
//!
//! let config = SolverConfig::default();
//! let ctx = Context::new(&config.z3_config());
//! let session = Session::new(&ctx, config);
//!
//! let a = Interval::bounded(&ctx, "a", Sort::Int);
//! let b = Interval::bounded(&ctx, "b", Sort::Int);
//! let claim = Claim::between(a.lo().add(b.lo()), a.hi().add(b.hi()));
//! let outcome = check(&session, Operation::Add, a, b, claim).unwrap();
//! assert!(matches!(outcome, Outcome::Proved));
//! ```

use log::{debug, warn};
use z3::ast::{Ast, Bool};
use z3::Model;

use crate::domain::{Scalar, Term};
use crate::error::{Error, Result};
use crate::interval::{apply_bool_interval, apply_interval, BoolInterval, Interval};
use crate::ops::{ensure_compatible, BoolOperation, Operation, Predicate, UnaryOperation};
use crate::solver::{Decision, Session};
use crate::value::Value;

/// Claimed bounds on a scalar result; `None` means no claim on that side.
#[derive(Debug, Clone)]
pub struct Claim<'ctx> {
    pub lower: Option<Scalar<'ctx>>,
    pub upper: Option<Scalar<'ctx>>,
}

impl<'ctx> Claim<'ctx> {
    pub fn new(lower: Option<Scalar<'ctx>>, upper: Option<Scalar<'ctx>>) -> Self {
        Self { lower, upper }
    }

    pub fn between(lower: Scalar<'ctx>, upper: Scalar<'ctx>) -> Self {
        Self::new(Some(lower), Some(upper))
    }

    pub fn at_least(lower: Scalar<'ctx>) -> Self {
        Self::new(Some(lower), None)
    }

    pub fn at_most(upper: Scalar<'ctx>) -> Self {
        Self::new(None, Some(upper))
    }

    pub fn is_vacuous(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    fn ensure_sort(&self, res: &Scalar<'ctx>) -> Result<()> {
        for side in [&self.lower, &self.upper].into_iter().flatten() {
            if !side.sort().compatible(res.sort()) {
                return Err(Error::SortMismatch {
                    expected: res.sort(),
                    found: side.sort(),
                });
            }
        }
        Ok(())
    }

    /// `res < lower || res > upper`, over the claimed sides only.
    fn violation(&self, res: &Scalar<'ctx>) -> Option<Bool<'ctx>> {
        let below = self.lower.as_ref().map(|e0| res.lt(e0));
        let above = self.upper.as_ref().map(|e1| res.gt(e1));
        match (below, above) {
            (Some(b), Some(a)) => Some(Bool::or(res.context(), &[&b, &a])),
            (Some(b), None) => Some(b),
            (None, Some(a)) => Some(a),
            (None, None) => None,
        }
    }

    fn terms(&self) -> [Option<Term<'ctx>>; 2] {
        [self.lower.clone().map(Term::from), self.upper.clone().map(Term::from)]
    }
}

/// Why a check could not be posed meaningfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Misconfiguration {
    /// Neither side of the result is claimed.
    NoClaim,
    /// The interval constraints and assumptions admit no element at all.
    InconsistentAssumptions,
    /// A boolean connective received the wrong number of operands.
    ArityMismatch { expected: usize, found: usize },
}

/// A concrete assignment under which the claimed bound is violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample {
    /// Rendered result expression, e.g. `i + j`.
    pub expression: String,
    /// Interval endpoints by name; `None` for unbounded sides.
    pub endpoints: Vec<(String, Option<Value>)>,
    pub operands: Vec<(String, Value)>,
    pub result: Value,
    pub claimed_lower: Option<Value>,
    pub claimed_upper: Option<Value>,
    /// Whether the constraints and the violation replay under the model; `None` when not checked.
    pub confirmed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Proved,
    Disproved(Box<Counterexample>),
    Indeterminate { reason: String },
    Misconfigured(Misconfiguration),
}

impl Outcome {
    pub fn is_proved(&self) -> bool {
        matches!(self, Outcome::Proved)
    }

    pub fn is_disproved(&self) -> bool {
        matches!(self, Outcome::Disproved(_))
    }

    pub fn counterexample(&self) -> Option<&Counterexample> {
        match self {
            Outcome::Disproved(cex) => Some(cex),
            _ => None,
        }
    }
}

/// An assignment attaining a claimed endpoint exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub operands: Vec<(String, Value)>,
    pub result: Value,
    pub bound: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tightness {
    Tight(Witness),
    /// The endpoint is never attained.
    NotTight,
    Indeterminate { reason: String },
}

impl Tightness {
    pub fn is_tight(&self) -> bool {
        matches!(self, Tightness::Tight(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TightnessReport {
    /// Per-side tightness; `None` for sides without a claim.
    Sides {
        lower: Option<Tightness>,
        upper: Option<Tightness>,
    },
    /// No side was queried because the claim or the inputs are malformed.
    Misconfigured(Misconfiguration),
}

impl TightnessReport {
    pub fn lower(&self) -> Option<&Tightness> {
        match self {
            TightnessReport::Sides { lower, .. } => lower.as_ref(),
            TightnessReport::Misconfigured(_) => None,
        }
    }

    pub fn upper(&self) -> Option<&Tightness> {
        match self {
            TightnessReport::Sides { upper, .. } => upper.as_ref(),
            TightnessReport::Misconfigured(_) => None,
        }
    }

    pub fn misconfiguration(&self) -> Option<&Misconfiguration> {
        match self {
            TightnessReport::Misconfigured(m) => Some(m),
            TightnessReport::Sides { .. } => None,
        }
    }
}

/// A posed bound claim that can be checked for safety and tightness.
pub trait Problem<'ctx> {
    fn check(&self, session: &Session<'ctx>) -> Result<Outcome>;

    fn check_tightness(&self, session: &Session<'ctx>) -> Result<TightnessReport>;
}

/// Everything a query needs: constraints over the elements plus the terms to report.
pub(crate) struct Frame<'ctx> {
    pub expression: String,
    pub constraints: Vec<Bool<'ctx>>,
    pub endpoints: Vec<(String, Option<Term<'ctx>>)>,
    pub operands: Vec<(String, Term<'ctx>)>,
    pub result: Term<'ctx>,
}

impl<'ctx> Frame<'ctx> {
    pub fn new(expression: impl Into<String>, result: impl Into<Term<'ctx>>) -> Self {
        Self {
            expression: expression.into(),
            constraints: Vec::new(),
            endpoints: Vec::new(),
            operands: Vec::new(),
            result: result.into(),
        }
    }

    pub fn operand(&mut self, name: &str, term: impl Into<Term<'ctx>>) {
        self.operands.push((name.to_string(), term.into()));
    }

    pub fn endpoints_of(&mut self, interval: &Interval<'ctx>) {
        for bound in [interval.lower(), interval.upper()] {
            let term = bound.value().cloned().map(Term::from);
            self.endpoints.push((bound.term.to_string(), term));
        }
    }

    pub fn endpoints_of_bool(&mut self, interval: &BoolInterval<'ctx>) {
        for b in [interval.lower(), interval.upper()] {
            self.endpoints.push((b.to_string(), Some(Term::from(b.clone()))));
        }
    }

    fn with(&self, extra: Bool<'ctx>) -> Vec<Bool<'ctx>> {
        let mut constraints = self.constraints.clone();
        constraints.push(extra);
        constraints
    }

    fn named_values(terms: &[(String, Term<'ctx>)], model: &Model<'ctx>) -> Result<Vec<(String, Value)>> {
        terms.iter().map(|(n, t)| Ok((n.clone(), t.eval(model)?))).collect()
    }

    fn holds(model: &Model<'ctx>, b: &Bool<'ctx>) -> bool {
        model.eval(b, true).and_then(|v| v.as_bool()) == Some(true)
    }

    /// Whether the input constraints alone admit no element, when the session asks for the check.
    fn inconsistent(&self, session: &Session<'ctx>) -> Result<bool> {
        if !session.config().check_assumptions {
            return Ok(false);
        }
        let inconsistent = matches!(session.decide(&self.constraints)?, Decision::Unsatisfiable);
        if inconsistent {
            warn!("constraints of `{}` are inconsistent", self.expression);
        }
        Ok(inconsistent)
    }

    /// Searches for a model of the constraints where `violation` holds.
    pub fn refute(
        &self,
        session: &Session<'ctx>,
        claim: [Option<Term<'ctx>>; 2],
        violation: Bool<'ctx>,
    ) -> Result<Outcome> {
        debug!("refute({}) with {} constraints", self.expression, self.constraints.len());
        if self.inconsistent(session)? {
            return Ok(Outcome::Misconfigured(Misconfiguration::InconsistentAssumptions));
        }

        match session.decide(&self.with(violation.clone()))? {
            Decision::Unsatisfiable => Ok(Outcome::Proved),
            Decision::Unknown(reason) => {
                warn!("refute({}) is indeterminate: {}", self.expression, reason);
                Ok(Outcome::Indeterminate { reason })
            }
            Decision::Satisfiable(model) => {
                let confirmed = session.config().confirm_counterexamples.then(|| {
                    Self::holds(&model, &violation) && self.constraints.iter().all(|c| Self::holds(&model, c))
                });
                let endpoints = self
                    .endpoints
                    .iter()
                    .map(|(n, t)| Ok((n.clone(), t.as_ref().map(|t| t.eval(&model)).transpose()?)))
                    .collect::<Result<Vec<_>>>()?;
                let [lower, upper] = claim;
                let cex = Counterexample {
                    expression: self.expression.clone(),
                    endpoints,
                    operands: Self::named_values(&self.operands, &model)?,
                    result: self.result.eval(&model)?,
                    claimed_lower: lower.map(|t| t.eval(&model)).transpose()?,
                    claimed_upper: upper.map(|t| t.eval(&model)).transpose()?,
                    confirmed,
                };
                if cex.confirmed == Some(false) {
                    warn!("counterexample for {} does not replay under its model", self.expression);
                }
                debug!("counterexample for {}: result = {}", self.expression, cex.result);
                Ok(Outcome::Disproved(Box::new(cex)))
            }
        }
    }

    /// Asks whether the result can equal `bound`.
    pub fn attain(&self, session: &Session<'ctx>, bound: &Term<'ctx>) -> Result<Tightness> {
        let Some(hit) = self.result.eq(bound) else {
            return Err(Error::Evaluation { term: bound.to_string() });
        };
        debug!("attain({} == {})", self.expression, bound);
        match session.decide(&self.with(hit))? {
            Decision::Unsatisfiable => Ok(Tightness::NotTight),
            Decision::Unknown(reason) => {
                warn!("attain({} == {}) is indeterminate: {}", self.expression, bound, reason);
                Ok(Tightness::Indeterminate { reason })
            }
            Decision::Satisfiable(model) => Ok(Tightness::Tight(Witness {
                operands: Self::named_values(&self.operands, &model)?,
                result: self.result.eval(&model)?,
                bound: bound.eval(&model)?,
            })),
        }
    }

    fn scalar_result(&self, claim: &Claim<'ctx>) -> Result<&Scalar<'ctx>> {
        let Term::Scalar(res) = &self.result else {
            return Err(Error::Evaluation { term: self.result.to_string() });
        };
        claim.ensure_sort(res)?;
        Ok(res)
    }

    pub fn refute_claim(&self, session: &Session<'ctx>, claim: &Claim<'ctx>) -> Result<Outcome> {
        let res = self.scalar_result(claim)?;
        match claim.violation(res) {
            Some(violation) => self.refute(session, claim.terms(), violation),
            None => Ok(Outcome::Misconfigured(Misconfiguration::NoClaim)),
        }
    }

    pub fn tightness(&self, session: &Session<'ctx>, claim: &Claim<'ctx>) -> Result<TightnessReport> {
        self.scalar_result(claim)?;
        if claim.is_vacuous() {
            return Ok(TightnessReport::Misconfigured(Misconfiguration::NoClaim));
        }
        if self.inconsistent(session)? {
            return Ok(TightnessReport::Misconfigured(Misconfiguration::InconsistentAssumptions));
        }
        let side = |bound: &Option<Scalar<'ctx>>| -> Result<Option<Tightness>> {
            bound.as_ref().map(|b| self.attain(session, &Term::from(b.clone()))).transpose()
        };
        Ok(TightnessReport::Sides {
            lower: side(&claim.lower)?,
            upper: side(&claim.upper)?,
        })
    }
}

fn element<'ctx>(frame_constraints: &mut Vec<Bool<'ctx>>, interval: &Interval<'ctx>, name: &str) -> Scalar<'ctx> {
    let var = Scalar::new_const(interval.lo().context(), name, interval.sort());
    apply_interval(frame_constraints, interval, &var);
    var
}

/// `op` over two scalar intervals with a claimed result interval.
pub struct BoundCheck<'ctx> {
    op: Operation,
    lhs: Interval<'ctx>,
    rhs: Interval<'ctx>,
    claim: Claim<'ctx>,
    assumptions: Vec<Bool<'ctx>>,
}

impl<'ctx> BoundCheck<'ctx> {
    pub fn new(op: Operation, lhs: Interval<'ctx>, rhs: Interval<'ctx>, claim: Claim<'ctx>) -> Self {
        Self {
            op,
            lhs,
            rhs,
            claim,
            assumptions: Vec::new(),
        }
    }

    /// Adds a side condition over the endpoint terms.
    pub fn assume(mut self, assumption: Bool<'ctx>) -> Self {
        self.assumptions.push(assumption);
        self
    }

    pub fn claim(&self) -> &Claim<'ctx> {
        &self.claim
    }

    fn frame(&self) -> Result<Frame<'ctx>> {
        let mut constraints = Vec::new();
        let i = element(&mut constraints, &self.lhs, "i");
        let j = element(&mut constraints, &self.rhs, "j");
        constraints.extend(self.assumptions.iter().cloned());
        let res = self.op.apply(&i, &j)?;

        let mut frame = Frame::new(format!("i {} j", self.op), res);
        frame.constraints = constraints;
        frame.endpoints_of(&self.lhs);
        frame.endpoints_of(&self.rhs);
        frame.operand("i", i);
        frame.operand("j", j);
        Ok(frame)
    }
}

impl<'ctx> Problem<'ctx> for BoundCheck<'ctx> {
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

/// Checks `claim` for `op` over `a` and `b`, consuming both intervals.
pub fn check<'ctx>(
    session: &Session<'ctx>,
    op: Operation,
    a: Interval<'ctx>,
    b: Interval<'ctx>,
    claim: Claim<'ctx>,
) -> Result<Outcome> {
    BoundCheck::new(op, a, b, claim).check(session)
}

/// Tightness of each claimed side of `claim` for `op` over `a` and `b`.
pub fn check_tightness<'ctx>(
    session: &Session<'ctx>,
    op: Operation,
    a: Interval<'ctx>,
    b: Interval<'ctx>,
    claim: Claim<'ctx>,
) -> Result<TightnessReport> {
    BoundCheck::new(op, a, b, claim).check_tightness(session)
}

/// One-operand operation over a scalar interval.
pub struct UnaryCheck<'ctx> {
    op: UnaryOperation,
    operand: Interval<'ctx>,
    claim: Claim<'ctx>,
    assumptions: Vec<Bool<'ctx>>,
}

impl<'ctx> UnaryCheck<'ctx> {
    pub fn new(op: UnaryOperation, operand: Interval<'ctx>, claim: Claim<'ctx>) -> Self {
        Self {
            op,
            operand,
            claim,
            assumptions: Vec::new(),
        }
    }

    pub fn assume(mut self, assumption: Bool<'ctx>) -> Self {
        self.assumptions.push(assumption);
        self
    }

    fn frame(&self) -> Result<Frame<'ctx>> {
        let mut constraints = Vec::new();
        let i = element(&mut constraints, &self.operand, "i");
        constraints.extend(self.assumptions.iter().cloned());
        let res = self.op.apply(&i)?;

        let mut frame = Frame::new(format!("{}i", self.op.symbol()), res);
        frame.constraints = constraints;
        frame.endpoints_of(&self.operand);
        frame.operand("i", i);
        Ok(frame)
    }
}

impl<'ctx> Problem<'ctx> for UnaryCheck<'ctx> {
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

pub fn check_unary<'ctx>(
    session: &Session<'ctx>,
    op: UnaryOperation,
    a: Interval<'ctx>,
    claim: Claim<'ctx>,
) -> Result<Outcome> {
    UnaryCheck::new(op, a, claim).check(session)
}

/// Violation of a boolean claim: the result matches neither extreme.
fn boolean_violation<'ctx>(res: &Bool<'ctx>, emin: &Bool<'ctx>, emax: &Bool<'ctx>) -> Bool<'ctx> {
    Bool::and(res.get_ctx(), &[&res._eq(emin).not(), &res._eq(emax).not()])
}

/// Comparison predicate over two scalar intervals, claimed to land on `emin` or `emax`.
pub fn check_predicate<'ctx>(
    session: &Session<'ctx>,
    pred: Predicate,
    a: Interval<'ctx>,
    b: Interval<'ctx>,
    emin: Bool<'ctx>,
    emax: Bool<'ctx>,
) -> Result<Outcome> {
    let mut constraints = Vec::new();
    let i = element(&mut constraints, &a, "i");
    let j = element(&mut constraints, &b, "j");
    let res = pred.apply(&i, &j)?;
    let violation = boolean_violation(&res, &emin, &emax);

    let mut frame = Frame::new(format!("i {} j", pred.symbol()), res);
    frame.constraints = constraints;
    frame.endpoints_of(&a);
    frame.endpoints_of(&b);
    frame.operand("i", i);
    frame.operand("j", j);
    frame.refute(session, [Some(emin.into()), Some(emax.into())], violation)
}

/// Boolean connective over lattice operands, claimed to land on `emin` or `emax`.
pub fn check_boolean<'ctx>(
    session: &Session<'ctx>,
    op: BoolOperation,
    operands: &[&BoolInterval<'ctx>],
    emin: Bool<'ctx>,
    emax: Bool<'ctx>,
) -> Result<Outcome> {
    if operands.len() != op.arity() {
        return Ok(Outcome::Misconfigured(Misconfiguration::ArityMismatch {
            expected: op.arity(),
            found: operands.len(),
        }));
    }
    let inners: Vec<&Bool<'ctx>> = operands.iter().map(|o| o.inner()).collect();
    let res = op.apply(&inners);
    let violation = boolean_violation(&res, &emin, &emax);

    let expression = match operands {
        [x] => format!("{}{}", op.symbol(), x.name()),
        _ => operands.iter().map(|o| o.name()).collect::<Vec<_>>().join(format!(" {} ", op.symbol()).as_str()),
    };
    let mut frame = Frame::new(expression, res);
    for o in operands {
        apply_bool_interval(&mut frame.constraints, o);
        frame.endpoints_of_bool(o);
        frame.operand(o.name(), o.inner().clone());
    }
    frame.refute(session, [Some(emin.into()), Some(emax.into())], violation)
}

/// `cond ? i : j` where `cond` is a lattice boolean.
pub struct SelectCheck<'ctx> {
    cond: BoolInterval<'ctx>,
    lhs: Interval<'ctx>,
    rhs: Interval<'ctx>,
    claim: Claim<'ctx>,
    assumptions: Vec<Bool<'ctx>>,
}

impl<'ctx> SelectCheck<'ctx> {
    pub fn new(cond: BoolInterval<'ctx>, lhs: Interval<'ctx>, rhs: Interval<'ctx>, claim: Claim<'ctx>) -> Self {
        Self {
            cond,
            lhs,
            rhs,
            claim,
            assumptions: Vec::new(),
        }
    }

    pub fn assume(mut self, assumption: Bool<'ctx>) -> Self {
        self.assumptions.push(assumption);
        self
    }

    fn frame(&self) -> Result<Frame<'ctx>> {
        ensure_compatible(self.lhs.lo(), self.rhs.lo())?;
        let mut constraints = Vec::new();
        apply_bool_interval(&mut constraints, &self.cond);
        let i = element(&mut constraints, &self.lhs, "i");
        let j = element(&mut constraints, &self.rhs, "j");
        constraints.extend(self.assumptions.iter().cloned());
        let res = Scalar::select(self.cond.inner(), &i, &j);

        let mut frame = Frame::new(format!("select({}, i, j)", self.cond.name()), res);
        frame.constraints = constraints;
        frame.endpoints_of_bool(&self.cond);
        frame.endpoints_of(&self.lhs);
        frame.endpoints_of(&self.rhs);
        frame.operand(self.cond.name(), self.cond.inner().clone());
        frame.operand("i", i);
        frame.operand("j", j);
        Ok(frame)
    }
}

impl<'ctx> Problem<'ctx> for SelectCheck<'ctx> {
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

pub fn check_select<'ctx>(
    session: &Session<'ctx>,
    cond: BoolInterval<'ctx>,
    a: Interval<'ctx>,
    b: Interval<'ctx>,
    claim: Claim<'ctx>,
) -> Result<Outcome> {
    SelectCheck::new(cond, a, b, claim).check(session)
}

#[cfg(test)]
mod tests {
    use test_log::test;
    use z3::Context;

    use super::*;
    use crate::bound::Restriction;
    use crate::domain::Sort;
    use crate::interval::IntervalType;
    use crate::ops::{make_and, make_not};
    use crate::solver::SolverConfig;

    fn with_session(f: impl for<'ctx> FnOnce(&'ctx Context, Session<'ctx>)) {
        let config = SolverConfig {
            timeout_ms: Some(30_000),
            ..SolverConfig::default()
        };
        let ctx = Context::new(&config.z3_config());
        f(&ctx, Session::new(&ctx, config));
    }

    #[test]
    fn test_add_bounded_is_proved_and_tight() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Int);
            let b = Interval::bounded(ctx, "b", Sort::Int);
            let claim = Claim::between(a.lo().add(b.lo()), a.hi().add(b.hi()));
            let problem = BoundCheck::new(Operation::Add, a, b, claim);

            assert_eq!(problem.check(&session).unwrap(), Outcome::Proved);
            let report = problem.check_tightness(&session).unwrap();
            for side in [report.lower(), report.upper()] {
                match side {
                    Some(Tightness::Tight(w)) => assert_eq!(w.result, w.bound),
                    other => panic!("expected tight, got {:?}", other),
                }
            }
        });
    }

    #[test]
    fn test_wrong_claim_is_disproved_with_confirmed_witness() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Int);
            let b = Interval::bounded(ctx, "b", Sort::Int);
            // Off by one on the upper side.
            let claim = Claim::at_most(a.hi().add(b.hi()).sub(&Scalar::one(ctx, Sort::Int)));
            let outcome = check(&session, Operation::Add, a, b, claim).unwrap();

            let cex = outcome.counterexample().expect("counterexample");
            assert_eq!(cex.confirmed, Some(true));
            assert_eq!(cex.endpoints.len(), 4);
            assert_eq!(cex.operands.len(), 2);
            let (res, upper) = (cex.result.as_int().unwrap(), cex.claimed_upper.as_ref().unwrap().as_int().unwrap());
            assert!(res > upper);
            assert!(cex.claimed_lower.is_none());
        });
    }

    #[test]
    fn test_vacuous_claim_is_misconfigured() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Int);
            let b = Interval::bounded(ctx, "b", Sort::Int);
            let outcome = check(&session, Operation::Sub, a, b, Claim::new(None, None)).unwrap();
            assert_eq!(outcome, Outcome::Misconfigured(Misconfiguration::NoClaim));
        });
    }

    #[test]
    fn test_inconsistent_assumptions_are_flagged() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Int).with_kind(IntervalType::NotPoint).restrict(Restriction::IsZero);
            let b = Interval::bounded(ctx, "b", Sort::Int);
            let claim = Claim::at_least(Scalar::zero(ctx, Sort::Int));
            let outcome = check(&session, Operation::Add, a, b, claim).unwrap();
            assert_eq!(outcome, Outcome::Misconfigured(Misconfiguration::InconsistentAssumptions));
        });
    }

    #[test]
    fn test_not_tight_bound() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Int);
            let b = Interval::bounded(ctx, "b", Sort::Int);
            let loose = a.hi().add(b.hi()).add(&Scalar::one(ctx, Sort::Int));
            let report = check_tightness(&session, Operation::Add, a, b, Claim::at_most(loose)).unwrap();
            assert_eq!(report.upper(), Some(&Tightness::NotTight));
            assert_eq!(report.lower(), None);
        });
    }

    #[test]
    fn test_sort_mismatch_in_claim() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Signed(8));
            let b = Interval::bounded(ctx, "b", Sort::Signed(8));
            let claim = Claim::at_least(Scalar::zero(ctx, Sort::Int));
            let err = check(&session, Operation::Add, a, b, claim).unwrap_err();
            assert!(matches!(err, Error::SortMismatch { .. }));
        });
    }

    #[test]
    fn test_unary_bit_not() {
        with_session(|ctx, session| {
            let s32 = Sort::Signed(32);
            let a = Interval::at_most(ctx, "a", s32);
            let claim = Claim::at_least(UnaryOperation::BitNot.apply(a.hi()).unwrap());
            assert_eq!(check_unary(&session, UnaryOperation::BitNot, a, claim).unwrap(), Outcome::Proved);
        });
    }

    #[test]
    fn test_predicate_eq() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Int);
            let b = Interval::bounded(ctx, "b", Sort::Int);
            // Equal points compare equal, disjoint intervals compare unequal.
            let emin = Bool::and(ctx, &[&a.lo().eq(a.hi()), &b.lo().eq(b.hi()), &a.lo().eq(b.lo())]);
            let emax = Bool::or(ctx, &[&a.hi().lt(b.lo()), &b.hi().lt(a.lo())]).not();
            let outcome = check_predicate(&session, Predicate::Eq, a, b, emin, emax).unwrap();
            assert_eq!(outcome, Outcome::Proved);
        });
    }

    #[test]
    fn test_boolean_and() {
        with_session(|ctx, session| {
            let a = BoolInterval::new(ctx, "a");
            let b = BoolInterval::new(ctx, "b");
            let emin = make_and(a.lower(), b.lower());
            let emax = make_and(a.upper(), b.upper());
            let outcome = check_boolean(&session, BoolOperation::And, &[&a, &b], emin, emax).unwrap();
            assert_eq!(outcome, Outcome::Proved);
        });
    }

    #[test]
    fn test_boolean_arity_mismatch() {
        with_session(|ctx, session| {
            let a = BoolInterval::new(ctx, "a");
            let emin = make_not(a.upper());
            let emax = make_not(a.lower());
            let outcome = check_boolean(&session, BoolOperation::And, &[&a], emin, emax).unwrap();
            assert_eq!(
                outcome,
                Outcome::Misconfigured(Misconfiguration::ArityMismatch { expected: 2, found: 1 })
            );
        });
    }

    #[test]
    fn test_select_min_of_lowers() {
        with_session(|ctx, session| {
            let c = BoolInterval::new(ctx, "c");
            let a = Interval::at_least(ctx, "a", Sort::Int);
            let b = Interval::at_least(ctx, "b", Sort::Int);
            let claim = Claim::at_least(a.lo().min(b.lo()));
            assert_eq!(check_select(&session, c, a, b, claim).unwrap(), Outcome::Proved);
        });
    }

    #[test]
    fn test_tightness_flags_inconsistent_inputs() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Int).with_kind(IntervalType::NotPoint).restrict(Restriction::IsZero);
            let b = Interval::bounded(ctx, "b", Sort::Int);
            let claim = Claim::at_most(a.hi().add(b.hi()));
            let report = check_tightness(&session, Operation::Add, a, b, claim).unwrap();
            assert_eq!(
                report,
                TightnessReport::Misconfigured(Misconfiguration::InconsistentAssumptions)
            );
            assert_eq!(report.upper(), None);
        });
    }

    #[test]
    fn test_vacuous_claim_tightness_is_misconfigured() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Int);
            let b = Interval::bounded(ctx, "b", Sort::Int);
            let report = check_tightness(&session, Operation::Add, a, b, Claim::new(None, None)).unwrap();
            assert_eq!(report.misconfiguration(), Some(&Misconfiguration::NoClaim));
        });
    }

    #[test]
    fn test_sort_mismatch_in_tightness_claim() {
        with_session(|ctx, session| {
            let a = Interval::bounded(ctx, "a", Sort::Signed(8));
            let b = Interval::bounded(ctx, "b", Sort::Signed(8));
            let claim = Claim::at_most(Scalar::zero(ctx, Sort::Signed(16)));
            let err = check_tightness(&session, Operation::Add, a, b, claim).unwrap_err();
            assert!(matches!(err, Error::SortMismatch { .. }));
        });
    }

    #[test]
    fn test_counterexample_left_unchecked() {
        let config = SolverConfig {
            timeout_ms: Some(30_000),
            confirm_counterexamples: false,
            ..SolverConfig::default()
        };
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config);
        let a = Interval::bounded(&ctx, "a", Sort::Int);
        let b = Interval::bounded(&ctx, "b", Sort::Int);
        let claim = Claim::at_least(a.hi().add(b.hi()));
        let outcome = check(&session, Operation::Add, a, b, claim).unwrap();
        let cex = outcome.counterexample().expect("counterexample");
        assert_eq!(cex.confirmed, None);
    }

    #[test]
    fn test_select_width_mismatch() {
        with_session(|ctx, session| {
            let c = BoolInterval::new(ctx, "c");
            let a = Interval::at_least(ctx, "a", Sort::Signed(8));
            let b = Interval::at_least(ctx, "b", Sort::Signed(16));
            let claim = Claim::at_least(a.lo().clone());
            let err = check_select(&session, c, a, b, claim).unwrap_err();
            assert!(matches!(
                err,
                Error::SortMismatch {
                    expected: Sort::Signed(8),
                    found: Sort::Signed(16)
                }
            ));
        });
    }
}
