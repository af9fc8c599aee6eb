//! The solver context: variable declarations and the clausal database.
//!
//! A [`Context`] is the seam between the symbolic layer and the search
//! engines. Callers declare their variables, then assert formulas; each
//! assertion is run through the definitional CNF transformer and the
//! resulting clauses accumulate in the clausal database. Ground clauses
//! are additionally lowered into the Boolean abstraction for the SAT
//! engine; universally quantified clauses are collected for the theory
//! side.
//!
//! Proxy variables introduced by the transformer are declared
//! automatically; the free variables of an asserted formula are the
//! caller's responsibility.

use crate::literal::{BooleanAbstraction, Lit, LoweredClause};
use nira_core::{Cnfizer, NiraError, TermId, TermManager, VarId};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

/// Errors from the solver context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// An asserted formula mentions a variable that was never declared.
    #[error("variable `{0}` is used but was never declared")]
    UndeclaredVariable(String),

    /// The symbolic layer failed.
    #[error(transparent)]
    Core(#[from] NiraError),
}

/// Counters over a [`Context`]'s lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextStats {
    /// Formulas asserted.
    pub assertions: u64,
    /// Clauses added to the database.
    pub clauses: u64,
    /// Ground clauses lowered for the SAT engine.
    pub ground_clauses: u64,
    /// Universally quantified clauses kept for the theory side.
    pub quantified_clauses: u64,
    /// Proxy variables declared on behalf of the caller.
    pub proxies_declared: u64,
}

/// Declarations, assertions, and the clausal database.
#[derive(Debug, Default)]
pub struct Context {
    declared: FxHashSet<VarId>,
    clauses: Vec<TermId>,
    ground: Vec<Vec<Lit>>,
    quantified: Vec<TermId>,
    abstraction: BooleanAbstraction,
    stats: ContextStats,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable. Declaring twice is a no-op.
    pub fn declare_var(&mut self, v: VarId) {
        self.declared.insert(v);
    }

    /// Check whether a variable has been declared.
    #[must_use]
    pub fn is_declared(&self, v: VarId) -> bool {
        self.declared.contains(&v)
    }

    /// Assert a formula: convert it to definitional CNF and add the
    /// clauses to the database.
    ///
    /// Every free variable of `f` must have been declared. Proxy
    /// variables introduced by the conversion are declared here, so the
    /// downstream engines see a fully declared clause set.
    pub fn assert(&mut self, f: TermId, manager: &mut TermManager) -> Result<(), ContextError> {
        for v in manager.free_vars(f) {
            if !self.declared.contains(&v) {
                return Err(ContextError::UndeclaredVariable(
                    manager.var_name(v).unwrap_or("<invalid>").to_string(),
                ));
            }
        }

        let mut cnfizer = Cnfizer::new(manager);
        let new_clauses = cnfizer.convert(f)?;
        let proxies: Vec<VarId> = cnfizer.proxies().collect();
        drop(cnfizer);

        for v in proxies {
            if self.declared.insert(v) {
                self.stats.proxies_declared += 1;
            }
        }

        for &clause in &new_clauses {
            match self.abstraction.lower_clause(manager, clause)? {
                LoweredClause::Ground(lits) => {
                    self.ground.push(lits);
                    self.stats.ground_clauses += 1;
                }
                LoweredClause::Tautology => {}
                LoweredClause::Quantified(q) => {
                    self.quantified.push(q);
                    self.stats.quantified_clauses += 1;
                }
            }
        }

        self.stats.assertions += 1;
        self.stats.clauses += new_clauses.len() as u64;
        debug!(
            clauses = new_clauses.len(),
            total = self.clauses.len() + new_clauses.len(),
            "asserted formula"
        );
        self.clauses.extend(new_clauses);
        Ok(())
    }

    /// The clausal database, as formulas.
    #[must_use]
    pub fn clauses(&self) -> &[TermId] {
        &self.clauses
    }

    /// The ground clauses, lowered to packed literals.
    #[must_use]
    pub fn ground_clauses(&self) -> &[Vec<Lit>] {
        &self.ground
    }

    /// The universally quantified clauses, kept symbolic.
    #[must_use]
    pub fn quantified_clauses(&self) -> &[TermId] {
        &self.quantified
    }

    /// The atom/variable mapping shared with the SAT engine.
    #[must_use]
    pub fn abstraction(&self) -> &BooleanAbstraction {
        &self.abstraction
    }

    /// Get lifetime counters.
    #[must_use]
    pub fn stats(&self) -> &ContextStats {
        &self.stats
    }
}
