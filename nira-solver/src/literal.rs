//! Literals and the Boolean abstraction of the clause database.
//!
//! The SAT engine works on packed integer literals; the theory solver works
//! on terms. [`BooleanAbstraction`] is the bridge: it interns every
//! distinct atom (a Boolean variable or a theory atom) as a SAT variable
//! and lowers ground clauses to literal vectors. Universally quantified
//! clauses are not lowered; they stay symbolic for the theory side.

use nira_core::{NiraError, TermId, TermKind, TermManager};
use rustc_hash::FxHashMap;
use std::fmt;

/// A SAT variable identifier.
pub type Var = u32;

/// A literal (signed Boolean variable), packed as `var << 1 | sign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(u32);

impl Lit {
    /// Create a positive literal from a variable.
    #[must_use]
    pub const fn positive(var: Var) -> Self {
        Self(var << 1)
    }

    /// Create a negative literal from a variable.
    #[must_use]
    pub const fn negative(var: Var) -> Self {
        Self((var << 1) | 1)
    }

    /// Get the variable of this literal.
    #[must_use]
    pub const fn var(self) -> Var {
        self.0 >> 1
    }

    /// Check if this literal is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        (self.0 & 1) == 0
    }

    /// Get the negation of this literal.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "{}", self.var())
        } else {
            write!(f, "-{}", self.var())
        }
    }
}

/// Result of lowering one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoweredClause {
    /// A ground clause over packed literals. Empty means a conflict.
    Ground(Vec<Lit>),
    /// The clause is syntactically true and carries no constraint.
    Tautology,
    /// A universally quantified clause, kept symbolic.
    Quantified(TermId),
}

/// Interns atoms as SAT variables and lowers clauses.
#[derive(Debug, Default)]
pub struct BooleanAbstraction {
    atom_to_var: FxHashMap<TermId, Var>,
    var_to_atom: Vec<TermId>,
}

impl BooleanAbstraction {
    /// Create an empty abstraction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of SAT variables allocated so far.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.var_to_atom.len()
    }

    /// The atom a SAT variable stands for.
    #[must_use]
    pub fn atom(&self, var: Var) -> Option<TermId> {
        self.var_to_atom.get(var as usize).copied()
    }

    /// The SAT variable of an atom, if it has been interned.
    #[must_use]
    pub fn var_of(&self, atom: TermId) -> Option<Var> {
        self.atom_to_var.get(&atom).copied()
    }

    fn intern(&mut self, atom: TermId) -> Var {
        if let Some(&var) = self.atom_to_var.get(&atom) {
            return var;
        }
        let var = u32::try_from(self.var_to_atom.len()).unwrap_or(u32::MAX);
        self.var_to_atom.push(atom);
        self.atom_to_var.insert(atom, var);
        var
    }

    /// Lower one clause formula.
    ///
    /// Accepts exactly the shapes the CNF transformer emits: a literal, a
    /// disjunction of literals, a constant, or a universal closure of a
    /// clause. Anything else is an invariant violation.
    pub fn lower_clause(
        &mut self,
        manager: &TermManager,
        clause: TermId,
    ) -> nira_core::Result<LoweredClause> {
        match manager.get(clause).map(|t| &t.kind) {
            Some(TermKind::True) => Ok(LoweredClause::Tautology),
            Some(TermKind::False) => Ok(LoweredClause::Ground(Vec::new())),
            Some(TermKind::Forall { .. }) => Ok(LoweredClause::Quantified(clause)),
            Some(TermKind::Or(args)) => {
                let mut lits = Vec::with_capacity(args.len());
                for &a in args {
                    lits.push(self.lower_literal(manager, a)?);
                }
                Ok(LoweredClause::Ground(lits))
            }
            _ => {
                let lit = self.lower_literal(manager, clause)?;
                Ok(LoweredClause::Ground(vec![lit]))
            }
        }
    }

    /// Lower one literal: an atom or a negated atom.
    pub fn lower_literal(&mut self, manager: &TermManager, lit: TermId) -> nira_core::Result<Lit> {
        match manager.get(lit).map(|t| &t.kind) {
            Some(TermKind::Not(g)) => {
                let inner = *g;
                if manager.is_atomic(inner) {
                    Ok(Lit::negative(self.intern(inner)))
                } else {
                    Err(NiraError::InvariantViolation(format!(
                        "not a literal: {}",
                        manager.display(lit)
                    )))
                }
            }
            Some(
                TermKind::Var(_)
                | TermKind::Eq(..)
                | TermKind::Neq(..)
                | TermKind::Lt(..)
                | TermKind::Le(..)
                | TermKind::Gt(..)
                | TermKind::Ge(..),
            ) => Ok(Lit::positive(self.intern(lit))),
            _ => Err(NiraError::InvariantViolation(format!(
                "not a literal: {}",
                manager.display(lit)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nira_core::Sort;

    #[test]
    fn test_literal_packing() {
        let pos = Lit::positive(5);
        let neg = Lit::negative(5);
        assert!(pos.is_positive());
        assert!(!neg.is_positive());
        assert_eq!(pos.var(), 5);
        assert_eq!(neg.var(), 5);
        assert_eq!(pos.negate(), neg);
        assert_eq!(neg.negate(), pos);
        assert_eq!(pos.to_string(), "5");
        assert_eq!(neg.to_string(), "-5");
    }

    #[test]
    fn test_atoms_intern_once() {
        let mut tm = TermManager::new();
        let mut abs = BooleanAbstraction::new();
        let a = tm.mk_var("a", Sort::Bool);
        let b = tm.mk_var("b", Sort::Bool);

        let la = abs.lower_literal(&tm, a).unwrap();
        let lb = abs.lower_literal(&tm, b).unwrap();
        assert_ne!(la.var(), lb.var());
        let la_again = abs.lower_literal(&tm, a).unwrap();
        assert_eq!(la, la_again);
        assert_eq!(abs.num_vars(), 2);
        assert_eq!(abs.atom(la.var()), Some(a));
    }

    #[test]
    fn test_negated_theory_atom_lowers_negative() {
        let mut tm = TermManager::new();
        let mut abs = BooleanAbstraction::new();
        let x = tm.mk_var("x", Sort::Real);
        let y = tm.mk_var("y", Sort::Real);
        let atom = tm.mk_lt(x, y);
        let neg = tm.mk_not(atom);

        let lit = abs.lower_literal(&tm, neg).unwrap();
        assert!(!lit.is_positive());
        assert_eq!(abs.atom(lit.var()), Some(atom));
    }

    #[test]
    fn test_lower_clause_shapes() {
        let mut tm = TermManager::new();
        let mut abs = BooleanAbstraction::new();
        let a = tm.mk_var("a", Sort::Bool);
        let b = tm.mk_var("b", Sort::Bool);
        let nb = tm.mk_not(b);
        let clause = tm.mk_or(vec![a, nb]);

        match abs.lower_clause(&tm, clause).unwrap() {
            LoweredClause::Ground(lits) => {
                assert_eq!(lits.len(), 2);
                assert_eq!(lits.iter().filter(|l| l.is_positive()).count(), 1);
            }
            other => panic!("unexpected lowering: {:?}", other),
        }

        let t = tm.mk_true();
        assert_eq!(abs.lower_clause(&tm, t).unwrap(), LoweredClause::Tautology);
        let f = tm.mk_false();
        assert_eq!(
            abs.lower_clause(&tm, f).unwrap(),
            LoweredClause::Ground(Vec::new())
        );
    }

    #[test]
    fn test_quantified_clause_stays_symbolic() {
        let mut tm = TermManager::new();
        let mut abs = BooleanAbstraction::new();
        let x = tm.mk_var("x", Sort::Real);
        let y = tm.mk_var("y", Sort::Real);
        let yv = tm.var_id(y).unwrap();
        let atom = tm.mk_le(x, y);
        let q = tm.mk_forall([yv], atom);

        assert_eq!(
            abs.lower_clause(&tm, q).unwrap(),
            LoweredClause::Quantified(q)
        );
        assert_eq!(abs.num_vars(), 0);
    }

    #[test]
    fn test_non_clause_is_rejected() {
        let mut tm = TermManager::new();
        let mut abs = BooleanAbstraction::new();
        let a = tm.mk_var("a", Sort::Bool);
        let b = tm.mk_var("b", Sort::Bool);
        let and_ab = tm.mk_and(vec![a, b]);
        assert!(abs.lower_clause(&tm, and_ab).is_err());
    }
}
