//! Symbolic intervals and the boolean two-point lattice.
//!
//! An [`Interval`] is a pair of fresh endpoint constants `<name>0` and `<name>1`
//! together with per-endpoint direction and sign metadata. It does not name the
//! variable it bounds: [`apply_interval`] relates it to any element term.

use std::fmt::{Display, Formatter};

use z3::ast::{Ast, Bool};
use z3::Context;

use crate::bound::{apply_bound, apply_restriction, Bound, BoundType, Restriction};
use crate::domain::{Scalar, Sort};
use crate::solver::Sink;

/// Degeneracy of a whole interval.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IntervalType {
    Unknown,
    /// Both endpoints coincide.
    Point,
    /// The lower endpoint is strictly below the upper one.
    NotPoint,
}

#[derive(Debug, Clone)]
pub struct Interval<'ctx> {
    name: String,
    lower: Bound<'ctx>,
    upper: Bound<'ctx>,
    kind: IntervalType,
}

impl<'ctx> Interval<'ctx> {
    /// Interval with explicit `(restriction, direction)` metadata for each endpoint.
    pub fn new(
        ctx: &'ctx Context,
        name: &str,
        sort: Sort,
        lower: (Restriction, BoundType),
        upper: (Restriction, BoundType),
        kind: IntervalType,
    ) -> Self {
        let lo = Scalar::new_const(ctx, &format!("{}0", name), sort);
        let hi = Scalar::new_const(ctx, &format!("{}1", name), sort);
        Self {
            name: name.to_string(),
            lower: Bound::new(lower.0, lower.1, lo),
            upper: Bound::new(upper.0, upper.1, hi),
            kind,
        }
    }

    /// `[name0, name1]`
    pub fn bounded(ctx: &'ctx Context, name: &str, sort: Sort) -> Self {
        Self::new(
            ctx,
            name,
            sort,
            (Restriction::None, BoundType::LowerBound),
            (Restriction::None, BoundType::UpperBound),
            IntervalType::Unknown,
        )
    }

    /// `[name0, _]`
    pub fn at_least(ctx: &'ctx Context, name: &str, sort: Sort) -> Self {
        Self::new(
            ctx,
            name,
            sort,
            (Restriction::None, BoundType::LowerBound),
            (Restriction::None, BoundType::Unbounded),
            IntervalType::Unknown,
        )
    }

    /// `[_, name1]`
    pub fn at_most(ctx: &'ctx Context, name: &str, sort: Sort) -> Self {
        Self::new(
            ctx,
            name,
            sort,
            (Restriction::None, BoundType::Unbounded),
            (Restriction::None, BoundType::UpperBound),
            IntervalType::Unknown,
        )
    }

    /// `[_, _]`
    pub fn unbounded(ctx: &'ctx Context, name: &str, sort: Sort) -> Self {
        Self::new(
            ctx,
            name,
            sort,
            (Restriction::None, BoundType::Unbounded),
            (Restriction::None, BoundType::Unbounded),
            IntervalType::Unknown,
        )
    }

    /// `[name0, name1]` with `name0 == name1`.
    pub fn point(ctx: &'ctx Context, name: &str, sort: Sort) -> Self {
        Self::bounded(ctx, name, sort).with_kind(IntervalType::Point)
    }

    pub fn with_kind(mut self, kind: IntervalType) -> Self {
        self.kind = kind;
        self
    }

    pub fn restrict_lower(mut self, restriction: Restriction) -> Self {
        self.lower.restriction = restriction;
        self
    }

    pub fn restrict_upper(mut self, restriction: Restriction) -> Self {
        self.upper.restriction = restriction;
        self
    }

    /// Restricts both endpoints alike.
    pub fn restrict(self, restriction: Restriction) -> Self {
        self.restrict_lower(restriction).restrict_upper(restriction)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort(&self) -> Sort {
        self.lower.term.sort()
    }

    pub fn kind(&self) -> IntervalType {
        self.kind
    }

    pub fn lower(&self) -> &Bound<'ctx> {
        &self.lower
    }

    pub fn upper(&self) -> &Bound<'ctx> {
        &self.upper
    }

    /// Lower endpoint term `<name>0`, whether or not it is bounded.
    pub fn lo(&self) -> &Scalar<'ctx> {
        &self.lower.term
    }

    /// Upper endpoint term `<name>1`, whether or not it is bounded.
    pub fn hi(&self) -> &Scalar<'ctx> {
        &self.upper.term
    }

    pub fn is_bounded(&self) -> bool {
        self.lower.is_bounded() && self.upper.is_bounded()
    }
}

impl Display for Interval<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in [{}, {}]", self.name, self.lower, self.upper)?;
        match self.kind {
            IntervalType::Unknown => Ok(()),
            IntervalType::Point => write!(f, " (point)"),
            IntervalType::NotPoint => write!(f, " (not point)"),
        }
    }
}

/// Constrains `var` to lie in `interval`.
///
/// Emits, in order: endpoint restrictions, endpoint bounds on `var`, the ordering
/// of the endpoints, and the degeneracy relation. The last two only apply when
/// both sides are bounded.
pub fn apply_interval<'ctx>(sink: &mut impl Sink<'ctx>, interval: &Interval<'ctx>, var: &Scalar<'ctx>) {
    apply_restriction(sink, &interval.lower);
    apply_restriction(sink, &interval.upper);
    apply_bound(sink, &interval.lower, var);
    apply_bound(sink, &interval.upper, var);
    if interval.is_bounded() {
        let (lo, hi) = (interval.lo(), interval.hi());
        sink.add(lo.le(hi));
        match interval.kind {
            IntervalType::Unknown => {}
            IntervalType::Point => sink.add(lo.eq(hi)),
            IntervalType::NotPoint => sink.add(lo.lt(hi)),
        }
    }
}

/// A boolean known only up to a two-point lattice `lower <= upper`.
///
/// `inner` is the actual value; it always coincides with one of the extremes.
#[derive(Debug, Clone)]
pub struct BoolInterval<'ctx> {
    name: String,
    lower: Bool<'ctx>,
    upper: Bool<'ctx>,
    inner: Bool<'ctx>,
    constraints: Vec<Bool<'ctx>>,
}

impl<'ctx> BoolInterval<'ctx> {
    pub fn new(ctx: &'ctx Context, name: &str) -> Self {
        let lower = Bool::new_const(ctx, format!("{}0", name));
        let upper = Bool::new_const(ctx, format!("{}1", name));
        let inner = Bool::new_const(ctx, name);
        let constraints = vec![
            lower.implies(&upper),
            Bool::or(ctx, &[&inner._eq(&upper), &inner._eq(&lower)]),
        ];
        Self {
            name: name.to_string(),
            lower,
            upper,
            inner,
            constraints,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower(&self) -> &Bool<'ctx> {
        &self.lower
    }

    pub fn upper(&self) -> &Bool<'ctx> {
        &self.upper
    }

    pub fn inner(&self) -> &Bool<'ctx> {
        &self.inner
    }

    /// Lattice constraints fixed at construction.
    pub fn constraints(&self) -> &[Bool<'ctx>] {
        &self.constraints
    }
}

/// Emits the lattice constraints of `interval`.
pub fn apply_bool_interval<'ctx>(sink: &mut impl Sink<'ctx>, interval: &BoolInterval<'ctx>) {
    for c in &interval.constraints {
        sink.add(c.clone());
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;
    use z3::Config;

    use super::*;
    use crate::solver::{Decision, Session, SolverConfig};

    #[test]
    fn test_endpoint_names() {
        let ctx = Context::new(&Config::new());
        let a = Interval::bounded(&ctx, "a", Sort::Int);
        assert_eq!(a.lo().to_string(), "a0");
        assert_eq!(a.hi().to_string(), "a1");
        assert_eq!(a.to_string(), "a in [a0, a1]");
        let b = Interval::at_least(&ctx, "b", Sort::Int).with_kind(IntervalType::NotPoint);
        assert_eq!(b.to_string(), "b in [b0, _] (not point)");
    }

    #[test]
    fn test_constraint_counts() {
        let ctx = Context::new(&Config::new());
        let x = Scalar::new_const(&ctx, "x", Sort::Int);

        let mut sink: Vec<Bool> = Vec::new();
        apply_interval(&mut sink, &Interval::unbounded(&ctx, "a", Sort::Int), &x);
        assert!(sink.is_empty());

        let mut sink: Vec<Bool> = Vec::new();
        apply_interval(&mut sink, &Interval::at_most(&ctx, "a", Sort::Int).restrict(Restriction::Positive), &x);
        assert_eq!(sink.len(), 2);

        let mut sink: Vec<Bool> = Vec::new();
        apply_interval(&mut sink, &Interval::point(&ctx, "a", Sort::Int), &x);
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_point_forces_element() {
        let config = SolverConfig::default();
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config);
        let a = Interval::point(&ctx, "a", Sort::Signed(8));
        let x = Scalar::new_const(&ctx, "x", Sort::Signed(8));

        let mut constraints: Vec<Bool> = Vec::new();
        apply_interval(&mut constraints, &a, &x);
        constraints.push(x.ne(a.lo()));
        assert!(matches!(session.decide(&constraints).unwrap(), Decision::Unsatisfiable));
    }

    #[test]
    fn test_not_point_with_restrictions_is_satisfiable() {
        let config = SolverConfig::default();
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config);
        let a = Interval::bounded(&ctx, "a", Sort::Int)
            .with_kind(IntervalType::NotPoint)
            .restrict_upper(Restriction::IsZero);
        let x = Scalar::new_const(&ctx, "x", Sort::Int);

        let mut constraints: Vec<Bool> = Vec::new();
        apply_interval(&mut constraints, &a, &x);
        constraints.push(x.ge_lit(0));
        assert!(matches!(session.decide(&constraints).unwrap(), Decision::Satisfiable(_)));
        constraints.push(x.gt_lit(0));
        assert!(matches!(session.decide(&constraints).unwrap(), Decision::Unsatisfiable));
    }

    #[test]
    fn test_bool_interval_lattice() {
        let config = SolverConfig::default();
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config);
        let a = BoolInterval::new(&ctx, "a");
        assert_eq!(a.constraints().len(), 2);

        // true <= false is not a lattice value
        let mut broken = a.constraints().to_vec();
        broken.push(a.lower()._eq(&Bool::from_bool(&ctx, true)));
        broken.push(a.upper()._eq(&Bool::from_bool(&ctx, false)));
        assert!(matches!(session.decide(&broken).unwrap(), Decision::Unsatisfiable));

        let mut third = a.constraints().to_vec();
        third.push(a.inner()._eq(a.lower()).not());
        third.push(a.inner()._eq(a.upper()).not());
        assert!(matches!(session.decide(&third).unwrap(), Decision::Unsatisfiable));
    }
}
