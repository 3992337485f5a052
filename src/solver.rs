//! Thin adapter over the z3 decision procedure.
//!
//! A [`Session`] borrows one [`Context`] for the lifetime of a scenario and hands
//! out fresh solvers, one per query. Constraint emitters write into any [`Sink`],
//! which is either a live solver or a plain list collected for later replay.

use log::{debug, trace};
use z3::ast::Bool;
use z3::{Config, Context, Model, Params, SatResult, Solver};

use crate::error::{Error, Result};

/// Solver settings shared by every query of a session.
///
/// # Examples
///
/// ```
/// use bounds_rs::solver::SolverConfig;
///
/// let config = SolverConfig {
///     timeout_ms: Some(10_000),
///     ..SolverConfig::default()
/// };
/// assert!(config.check_assumptions);
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Per-query time limit; `None` lets the solver run to completion (default: None)
    pub timeout_ms: Option<u32>,
    /// Flag scenarios whose input constraints alone are unsatisfiable (default: true)
    pub check_assumptions: bool,
    /// Re-evaluate the violated claim under each counterexample model (default: true)
    pub confirm_counterexamples: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            check_assumptions: true,
            confirm_counterexamples: true,
        }
    }
}

impl SolverConfig {
    /// Context configuration for a fresh [`Context`].
    pub fn z3_config(&self) -> Config {
        let mut cfg = Config::new();
        cfg.set_model_generation(true);
        if let Some(ms) = self.timeout_ms {
            cfg.set_timeout_msec(ms as u64);
        }
        cfg
    }
}

/// Result of one satisfiability query.
pub enum Decision<'ctx> {
    Unsatisfiable,
    Satisfiable(Model<'ctx>),
    Unknown(String),
}

impl Decision<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Unsatisfiable => "unsat",
            Decision::Satisfiable(_) => "sat",
            Decision::Unknown(_) => "unknown",
        }
    }
}

/// Anything that accepts boolean assertions.
pub trait Sink<'ctx> {
    fn add(&mut self, constraint: Bool<'ctx>);
}

impl<'ctx> Sink<'ctx> for Solver<'ctx> {
    fn add(&mut self, constraint: Bool<'ctx>) {
        trace!("assert {}", constraint);
        self.assert(&constraint);
    }
}

impl<'ctx> Sink<'ctx> for Vec<Bool<'ctx>> {
    fn add(&mut self, constraint: Bool<'ctx>) {
        self.push(constraint);
    }
}

/// One scenario's access to the decision procedure.
pub struct Session<'ctx> {
    ctx: &'ctx Context,
    config: SolverConfig,
}

impl<'ctx> Session<'ctx> {
    pub fn new(ctx: &'ctx Context, config: SolverConfig) -> Self {
        Self { ctx, config }
    }

    pub fn context(&self) -> &'ctx Context {
        self.ctx
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fresh solver carrying the configured timeout.
    pub fn solver(&self) -> Solver<'ctx> {
        let solver = Solver::new(self.ctx);
        if let Some(ms) = self.config.timeout_ms {
            let mut params = Params::new(self.ctx);
            params.set_u32("timeout", ms);
            solver.set_params(&params);
        }
        solver
    }

    /// Decides the conjunction of `constraints` on a fresh solver.
    ///
    /// A satisfiable answer without a model is [`Error::MissingModel`].
    pub fn decide(&self, constraints: &[Bool<'ctx>]) -> Result<Decision<'ctx>> {
        let mut solver = self.solver();
        for c in constraints {
            solver.add(c.clone());
        }
        let decision = match solver.check() {
            SatResult::Unsat => Decision::Unsatisfiable,
            SatResult::Sat => Decision::Satisfiable(solver.get_model().ok_or(Error::MissingModel)?),
            SatResult::Unknown => {
                let reason = solver.get_reason_unknown().unwrap_or_else(|| "unknown".to_string());
                Decision::Unknown(reason)
            }
        };
        debug!("decide({} constraints) = {}", constraints.len(), decision.label());
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;
    use z3::ast::Int;

    use super::*;

    #[test]
    fn test_decide_sat_and_unsat() {
        let config = SolverConfig::default();
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config);

        let x = Int::new_const(&ctx, "x");
        let zero = Int::from_i64(&ctx, 0);
        let positive = x.gt(&zero);
        let negative = x.lt(&zero);

        match session.decide(&[positive.clone()]).unwrap() {
            Decision::Satisfiable(model) => {
                let v = model.eval(&x, true).and_then(|v| v.as_i64());
                assert!(matches!(v, Some(n) if n > 0));
            }
            other => panic!("expected sat, got {}", other.label()),
        }
        assert!(matches!(session.decide(&[positive, negative]).unwrap(), Decision::Unsatisfiable));
    }

    #[test]
    fn test_vec_sink_collects() {
        let ctx = Context::new(&Config::new());
        let mut sink: Vec<Bool> = Vec::new();
        sink.add(Bool::from_bool(&ctx, true));
        sink.add(Bool::from_bool(&ctx, false));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_empty_query_is_satisfiable() {
        let config = SolverConfig {
            timeout_ms: Some(1_000),
            ..SolverConfig::default()
        };
        let ctx = Context::new(&config.z3_config());
        let session = Session::new(&ctx, config);
        assert!(matches!(session.decide(&[]).unwrap(), Decision::Satisfiable(_)));
    }
}
