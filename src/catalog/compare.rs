use z3::ast::Bool;

use super::{outcome_only, Expect, Scenario, ScenarioReport};
use crate::bound::Restriction;
use crate::domain::Sort;
use crate::engine::check_predicate;
use crate::error::Result;
use crate::interval::Interval;
use crate::ops::Predicate;
use crate::solver::Session;

fn eq_trivial<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let e = a.lo().eq(b.lo());
    outcome_only(check_predicate(session, Predicate::Eq, a, b, e.clone(), e)?)
}

fn eq_non_trivial<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::bounded(ctx, "b", Sort::Int);
    let emin = Bool::from_bool(ctx, false);
    let emax = Bool::and(ctx, &[&a.lo().le(b.hi()), &b.lo().le(a.hi())]);
    outcome_only(check_predicate(session, Predicate::Eq, a, b, emin, emax)?)
}

fn eq_disjoint_signs<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_most(ctx, "a", Sort::Int).restrict_upper(Restriction::Negative);
    let b = Interval::at_least(ctx, "b", Sort::Int).restrict_lower(Restriction::Positive);
    let never = Bool::from_bool(ctx, false);
    outcome_only(check_predicate(session, Predicate::Eq, a, b, never.clone(), never)?)
}

fn eq_upper_bounded_lower_bounded<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_most(ctx, "a", Sort::Int);
    let b = Interval::at_least(ctx, "b", Sort::Int);
    let emin = Bool::from_bool(ctx, false);
    let emax = a.hi().ge(b.lo());
    outcome_only(check_predicate(session, Predicate::Eq, a, b, emin, emax)?)
}

fn ne_trivial<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::point(ctx, "a", Sort::Int);
    let b = Interval::point(ctx, "b", Sort::Int);
    let e = a.lo().ne(b.lo());
    outcome_only(check_predicate(session, Predicate::Ne, a, b, e.clone(), e)?)
}

fn ne_non_trivial<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::bounded(ctx, "b", Sort::Int);
    let emin = Bool::or(ctx, &[&a.lo().gt(b.hi()), &b.lo().gt(a.hi())]);
    let emax = Bool::from_bool(ctx, true);
    outcome_only(check_predicate(session, Predicate::Ne, a, b, emin, emax)?)
}

fn ne_upper_bounded_lower_bounded<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_most(ctx, "a", Sort::Int);
    let b = Interval::at_least(ctx, "b", Sort::Int);
    let emin = a.hi().lt(b.lo());
    let emax = Bool::from_bool(ctx, true);
    outcome_only(check_predicate(session, Predicate::Ne, a, b, emin, emax)?)
}

fn le_bounded<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::bounded(ctx, "b", Sort::Int);
    let emin = a.hi().le(b.lo());
    let emax = a.lo().le(b.hi());
    outcome_only(check_predicate(session, Predicate::Le, a, b, emin, emax)?)
}

fn le_upper_bounded_lower_bounded<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_most(ctx, "a", Sort::Int);
    let b = Interval::at_least(ctx, "b", Sort::Int);
    let emin = a.hi().le(b.lo());
    let emax = Bool::from_bool(ctx, true);
    outcome_only(check_predicate(session, Predicate::Le, a, b, emin, emax)?)
}

fn le_lower_bounded_upper_bounded<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::at_least(ctx, "a", Sort::Int);
    let b = Interval::at_most(ctx, "b", Sort::Int);
    let emin = Bool::from_bool(ctx, false);
    let emax = a.lo().le(b.hi());
    outcome_only(check_predicate(session, Predicate::Le, a, b, emin, emax)?)
}

fn lt_unsigned_bounded<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let u8s = Sort::Unsigned(8);
    let a = Interval::bounded(ctx, "a", u8s);
    let b = Interval::bounded(ctx, "b", u8s);
    let emin = a.hi().lt(b.lo());
    let emax = a.lo().lt(b.hi());
    outcome_only(check_predicate(session, Predicate::Lt, a, b, emin, emax)?)
}

/// Judges the whole comparison by the lower endpoints alone.
fn bug_le_lower_endpoints<'ctx>(session: &Session<'ctx>, _: bool) -> Result<ScenarioReport> {
    let ctx = session.context();
    let a = Interval::bounded(ctx, "a", Sort::Int);
    let b = Interval::bounded(ctx, "b", Sort::Int);
    let emin = a.lo().le(b.lo());
    let emax = emin.clone();
    outcome_only(check_predicate(session, Predicate::Le, a, b, emin, emax)?)
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("compare", "eq_trivial", "[a0, a0] == [b0, b0] is a0 == b0", Expect::proved(), eq_trivial),
        Scenario::new(
            "compare",
            "eq_non_trivial",
            "[a0, a1] == [b0, b1] in [false, a0 <= b1 && b0 <= a1]",
            Expect::proved(),
            eq_non_trivial,
        ),
        Scenario::new(
            "compare",
            "eq_disjoint_signs",
            "[_, a1], a1 < 0 == [b0, _], b0 > 0 is false",
            Expect::proved(),
            eq_disjoint_signs,
        ),
        Scenario::new(
            "compare",
            "eq_upper_bounded_lower_bounded",
            "[_, a1] == [b0, _] in [false, a1 >= b0]",
            Expect::proved(),
            eq_upper_bounded_lower_bounded,
        ),
        Scenario::new("compare", "ne_trivial", "[a0, a0] != [b0, b0] is a0 != b0", Expect::proved(), ne_trivial),
        Scenario::new(
            "compare",
            "ne_non_trivial",
            "[a0, a1] != [b0, b1] in [a0 > b1 || b0 > a1, true]",
            Expect::proved(),
            ne_non_trivial,
        ),
        Scenario::new(
            "compare",
            "ne_upper_bounded_lower_bounded",
            "[_, a1] != [b0, _] in [a1 < b0, true]",
            Expect::proved(),
            ne_upper_bounded_lower_bounded,
        ),
        Scenario::new(
            "compare",
            "le_bounded",
            "[a0, a1] <= [b0, b1] in [a1 <= b0, a0 <= b1]",
            Expect::proved(),
            le_bounded,
        ),
        Scenario::new(
            "compare",
            "le_upper_bounded_lower_bounded",
            "[_, a1] <= [b0, _] in [a1 <= b0, true]",
            Expect::proved(),
            le_upper_bounded_lower_bounded,
        ),
        Scenario::new(
            "compare",
            "le_lower_bounded_upper_bounded",
            "[a0, _] <= [_, b1] in [false, a0 <= b1]",
            Expect::proved(),
            le_lower_bounded_upper_bounded,
        ),
        Scenario::new(
            "compare",
            "lt_unsigned_bounded",
            "u8: [a0, a1] < [b0, b1] in [a1 < b0, a0 < b1]",
            Expect::proved(),
            lt_unsigned_bounded,
        ),
        Scenario::new(
            "compare",
            "bug_le_lower_endpoints",
            "[a0, a1] <= [b0, b1] is a0 <= b0",
            Expect::disproved(),
            bug_le_lower_endpoints,
        ),
    ]
}
