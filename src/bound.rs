use std::fmt::{Display, Formatter};

use z3::Model;

use crate::domain::Scalar;
use crate::error::Result;
use crate::solver::Sink;
use crate::value::Value;

/// Direction of one interval endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoundType {
    /// No constraint; the endpoint term is ignored.
    Unbounded,
    UpperBound,
    LowerBound,
}

/// Sign class imposed on the endpoint term itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Restriction {
    None,
    IsZero,
    NonPositive,
    NonNegative,
    Positive,
    Negative,
}

impl Restriction {
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Restriction::None => None,
            Restriction::IsZero => Some("== 0"),
            Restriction::NonPositive => Some("<= 0"),
            Restriction::NonNegative => Some(">= 0"),
            Restriction::Positive => Some("> 0"),
            Restriction::Negative => Some("< 0"),
        }
    }
}

/// One endpoint: a symbolic term, its direction and its sign restriction.
#[derive(Debug, Clone)]
pub struct Bound<'ctx> {
    pub restriction: Restriction,
    pub kind: BoundType,
    pub term: Scalar<'ctx>,
}

impl<'ctx> Bound<'ctx> {
    pub fn new(restriction: Restriction, kind: BoundType, term: Scalar<'ctx>) -> Self {
        Self { restriction, kind, term }
    }

    pub fn is_bounded(&self) -> bool {
        self.kind != BoundType::Unbounded
    }

    /// The endpoint term, if this side is bounded.
    pub fn value(&self) -> Option<&Scalar<'ctx>> {
        self.is_bounded().then_some(&self.term)
    }

    /// Concrete endpoint under `model`, `None` when unbounded.
    pub fn eval(&self, model: &Model<'ctx>) -> Result<Option<Value>> {
        self.value().map(|t| t.eval(model)).transpose()
    }
}

impl Display for Bound<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(t) => write!(f, "{}", t),
            None => write!(f, "_"),
        }
    }
}

/// Asserts that `bound` limits `var` from its side. No-op when unbounded.
pub fn apply_bound<'ctx>(sink: &mut impl Sink<'ctx>, bound: &Bound<'ctx>, var: &Scalar<'ctx>) {
    match bound.kind {
        BoundType::Unbounded => {}
        BoundType::UpperBound => sink.add(var.le(&bound.term)),
        BoundType::LowerBound => sink.add(var.ge(&bound.term)),
    }
}

/// Asserts the sign restriction on the endpoint term.
///
/// Restrictions on an unbounded endpoint are dropped: the term is meaningless there.
pub fn apply_restriction<'ctx>(sink: &mut impl Sink<'ctx>, bound: &Bound<'ctx>) {
    if !bound.is_bounded() {
        return;
    }
    let t = &bound.term;
    match bound.restriction {
        Restriction::None => {}
        Restriction::IsZero => sink.add(t.eq_lit(0)),
        Restriction::NonPositive => sink.add(t.le_lit(0)),
        Restriction::NonNegative => sink.add(t.ge_lit(0)),
        Restriction::Positive => sink.add(t.gt_lit(0)),
        Restriction::Negative => sink.add(t.lt_lit(0)),
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;
    use z3::ast::Bool;
    use z3::{Config, Context};

    use super::*;
    use crate::domain::Sort;

    #[test]
    fn test_unbounded_emits_nothing() {
        let ctx = Context::new(&Config::new());
        let term = Scalar::new_const(&ctx, "x0", Sort::Int);
        let var = Scalar::new_const(&ctx, "x", Sort::Int);
        let bound = Bound::new(Restriction::Positive, BoundType::Unbounded, term);

        let mut sink: Vec<Bool> = Vec::new();
        apply_restriction(&mut sink, &bound);
        apply_bound(&mut sink, &bound, &var);
        assert!(sink.is_empty());
        assert_eq!(bound.to_string(), "_");
    }

    #[test]
    fn test_bounded_emits_one_each() {
        let ctx = Context::new(&Config::new());
        let term = Scalar::new_const(&ctx, "x1", Sort::Signed(8));
        let var = Scalar::new_const(&ctx, "x", Sort::Signed(8));
        let bound = Bound::new(Restriction::NonNegative, BoundType::UpperBound, term);

        let mut sink: Vec<Bool> = Vec::new();
        apply_restriction(&mut sink, &bound);
        apply_bound(&mut sink, &bound, &var);
        assert_eq!(sink.len(), 2);
        assert_eq!(bound.to_string(), "x1");
    }

    #[test]
    fn test_restriction_none_emits_nothing() {
        let ctx = Context::new(&Config::new());
        let term = Scalar::new_const(&ctx, "x0", Sort::Int);
        let bound = Bound::new(Restriction::None, BoundType::LowerBound, term);

        let mut sink: Vec<Bool> = Vec::new();
        apply_restriction(&mut sink, &bound);
        assert!(sink.is_empty());
    }
}
