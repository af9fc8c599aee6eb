//! Arena-allocated terms with hash-consing.
//!
//! All terms live in a [`TermManager`] and are referenced by [`TermId`].
//! Construction goes through the `mk_*` methods, which canonicalize as they
//! build: the Boolean connectives behave as ordered, duplicate-free sets
//! over their operands, constants fold, and double negation cancels.
//! Because structurally equal terms are interned to the same id, `TermId`
//! equality is structural equality and the sorted operand lists of
//! [`TermKind::And`] / [`TermKind::Or`] are canonical.
//!
//! Arithmetic operands keep their construction order; only the Boolean
//! connectives are treated as sets.

pub mod normal_forms;

use crate::sort::Sort;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;

/// Index of a term in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(u32);

impl TermId {
    /// The position of this term in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a variable in the manager's variable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(u32);

impl VarId {
    /// The position of this variable in the variable table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Binder list of a quantifier.
pub type BinderList = SmallVec<[VarId; 4]>;

/// A term node: kind plus sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    /// The node kind.
    pub kind: TermKind,
    /// The sort of the term.
    pub sort: Sort,
}

/// Term node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Boolean constant true.
    True,
    /// Boolean constant false.
    False,
    /// Variable reference.
    Var(VarId),
    /// Rational constant.
    RealConst(BigRational),
    /// Sum of real terms.
    Add(Vec<TermId>),
    /// Product of real terms.
    Mul(Vec<TermId>),
    /// Difference of two real terms.
    Sub(TermId, TermId),
    /// Arithmetic negation.
    Neg(TermId),
    /// Power with a constant natural exponent.
    Pow(TermId, u32),
    /// Equality atom.
    Eq(TermId, TermId),
    /// Disequality atom.
    Neq(TermId, TermId),
    /// Strictly-less atom.
    Lt(TermId, TermId),
    /// Less-or-equal atom.
    Le(TermId, TermId),
    /// Strictly-greater atom.
    Gt(TermId, TermId),
    /// Greater-or-equal atom.
    Ge(TermId, TermId),
    /// Conjunction.
    And(Vec<TermId>),
    /// Disjunction.
    Or(Vec<TermId>),
    /// Logical negation.
    Not(TermId),
    /// Universal quantifier.
    Forall {
        /// The bound variables.
        vars: BinderList,
        /// The quantified body.
        body: TermId,
    },
}

#[derive(Debug, Clone)]
struct VarInfo {
    name: String,
    sort: Sort,
}

/// Arena and hash-consing table for terms, plus the variable table.
#[derive(Debug, Default)]
pub struct TermManager {
    terms: Vec<Term>,
    cons: FxHashMap<Term, TermId>,
    vars: Vec<VarInfo>,
    var_cons: FxHashMap<(String, Sort), VarId>,
    fresh_counter: u64,
}

impl TermManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a term by id.
    #[must_use]
    pub fn get(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id.index())
    }

    /// The sort of a term.
    #[must_use]
    pub fn sort(&self, id: TermId) -> Option<Sort> {
        self.get(id).map(|t| t.sort)
    }

    /// Number of terms in the arena.
    #[must_use]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    fn intern(&mut self, term: Term) -> TermId {
        if let Some(&id) = self.cons.get(&term) {
            return id;
        }
        let id = TermId(u32::try_from(self.terms.len()).unwrap_or(u32::MAX));
        self.terms.push(term.clone());
        self.cons.insert(term, id);
        id
    }

    // ------------------------------------------------------------------
    // Variables
    // ------------------------------------------------------------------

    /// Get or create the variable named `name` of the given sort.
    ///
    /// Variables are hash-consed by `(name, sort)`: the same name and sort
    /// always denote the same variable.
    pub fn mk_var(&mut self, name: &str, sort: Sort) -> TermId {
        if let Some(&vid) = self.var_cons.get(&(name.to_string(), sort)) {
            return self.var_term(vid);
        }
        let vid = VarId(u32::try_from(self.vars.len()).unwrap_or(u32::MAX));
        self.vars.push(VarInfo {
            name: name.to_string(),
            sort,
        });
        self.var_cons.insert((name.to_string(), sort), vid);
        self.var_term(vid)
    }

    /// Create a variable guaranteed to be distinct from every existing one,
    /// named `prefix!N` for a manager-global counter `N`.
    pub fn fresh_var(&mut self, prefix: &str, sort: Sort) -> VarId {
        loop {
            let name = format!("{}!{}", prefix, self.fresh_counter);
            self.fresh_counter += 1;
            if !self.var_cons.contains_key(&(name.clone(), sort)) {
                let vid = VarId(u32::try_from(self.vars.len()).unwrap_or(u32::MAX));
                self.vars.push(VarInfo {
                    name: name.clone(),
                    sort,
                });
                self.var_cons.insert((name, sort), vid);
                return vid;
            }
        }
    }

    /// [`fresh_var`](Self::fresh_var), returning the variable as a term.
    pub fn mk_fresh_var(&mut self, prefix: &str, sort: Sort) -> TermId {
        let vid = self.fresh_var(prefix, sort);
        self.var_term(vid)
    }

    /// The term referring to an existing variable.
    ///
    /// # Panics
    ///
    /// Panics if `v` does not belong to this manager.
    pub fn var_term(&mut self, v: VarId) -> TermId {
        let sort = self.vars[v.index()].sort;
        self.intern(Term {
            kind: TermKind::Var(v),
            sort,
        })
    }

    /// The variable underlying a `Var` term, if it is one.
    #[must_use]
    pub fn var_id(&self, id: TermId) -> Option<VarId> {
        match self.get(id).map(|t| &t.kind) {
            Some(TermKind::Var(v)) => Some(*v),
            _ => None,
        }
    }

    /// The name of a variable.
    #[must_use]
    pub fn var_name(&self, v: VarId) -> Option<&str> {
        self.vars.get(v.index()).map(|i| i.name.as_str())
    }

    /// The sort of a variable.
    #[must_use]
    pub fn var_sort(&self, v: VarId) -> Option<Sort> {
        self.vars.get(v.index()).map(|i| i.sort)
    }

    // ------------------------------------------------------------------
    // Constants and arithmetic
    // ------------------------------------------------------------------

    /// Boolean constant true.
    pub fn mk_true(&mut self) -> TermId {
        self.intern(Term {
            kind: TermKind::True,
            sort: Sort::Bool,
        })
    }

    /// Boolean constant false.
    pub fn mk_false(&mut self) -> TermId {
        self.intern(Term {
            kind: TermKind::False,
            sort: Sort::Bool,
        })
    }

    /// Boolean constant.
    pub fn mk_bool(&mut self, b: bool) -> TermId {
        if b {
            self.mk_true()
        } else {
            self.mk_false()
        }
    }

    /// Rational constant.
    pub fn mk_real(&mut self, r: BigRational) -> TermId {
        self.intern(Term {
            kind: TermKind::RealConst(r),
            sort: Sort::Real,
        })
    }

    /// Integer constant, as a real.
    pub fn mk_int(&mut self, n: BigInt) -> TermId {
        self.mk_real(BigRational::from_integer(n))
    }

    /// Sum. Nested sums are flattened; an empty sum is `0`, a singleton is
    /// the operand itself.
    pub fn mk_add(&mut self, args: Vec<TermId>) -> TermId {
        debug_assert!(args.iter().all(|&a| self.sort(a) == Some(Sort::Real)));
        let mut flat: Vec<TermId> = Vec::with_capacity(args.len());
        for a in args {
            match self.get(a).map(|t| &t.kind) {
                Some(TermKind::Add(items)) => flat.extend(items.iter().copied()),
                _ => flat.push(a),
            }
        }
        match flat.len() {
            0 => self.mk_real(BigRational::zero()),
            1 => flat[0],
            _ => self.intern(Term {
                kind: TermKind::Add(flat),
                sort: Sort::Real,
            }),
        }
    }

    /// Product. Nested products are flattened; an empty product is `1`, a
    /// singleton is the operand itself.
    pub fn mk_mul(&mut self, args: Vec<TermId>) -> TermId {
        debug_assert!(args.iter().all(|&a| self.sort(a) == Some(Sort::Real)));
        let mut flat: Vec<TermId> = Vec::with_capacity(args.len());
        for a in args {
            match self.get(a).map(|t| &t.kind) {
                Some(TermKind::Mul(items)) => flat.extend(items.iter().copied()),
                _ => flat.push(a),
            }
        }
        match flat.len() {
            0 => self.mk_real(BigRational::one()),
            1 => flat[0],
            _ => self.intern(Term {
                kind: TermKind::Mul(flat),
                sort: Sort::Real,
            }),
        }
    }

    /// Difference.
    pub fn mk_sub(&mut self, a: TermId, b: TermId) -> TermId {
        debug_assert_eq!(self.sort(a), Some(Sort::Real));
        debug_assert_eq!(self.sort(b), Some(Sort::Real));
        self.intern(Term {
            kind: TermKind::Sub(a, b),
            sort: Sort::Real,
        })
    }

    /// Arithmetic negation.
    pub fn mk_neg(&mut self, a: TermId) -> TermId {
        debug_assert_eq!(self.sort(a), Some(Sort::Real));
        self.intern(Term {
            kind: TermKind::Neg(a),
            sort: Sort::Real,
        })
    }

    /// Power with a constant natural exponent. `x^0` is `1`, `x^1` is `x`.
    pub fn mk_pow(&mut self, base: TermId, exp: u32) -> TermId {
        debug_assert_eq!(self.sort(base), Some(Sort::Real));
        match exp {
            0 => self.mk_real(BigRational::one()),
            1 => base,
            _ => self.intern(Term {
                kind: TermKind::Pow(base, exp),
                sort: Sort::Real,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Theory atoms
    // ------------------------------------------------------------------

    fn mk_relational(
        &mut self,
        kind: fn(TermId, TermId) -> TermKind,
        a: TermId,
        b: TermId,
    ) -> TermId {
        debug_assert_eq!(self.sort(a), self.sort(b));
        self.intern(Term {
            kind: kind(a, b),
            sort: Sort::Bool,
        })
    }

    /// Equality atom. Operands must share a sort; Boolean equality is
    /// admitted and treated as an opaque atom downstream.
    pub fn mk_eq(&mut self, a: TermId, b: TermId) -> TermId {
        self.mk_relational(TermKind::Eq, a, b)
    }

    /// Disequality atom.
    pub fn mk_neq(&mut self, a: TermId, b: TermId) -> TermId {
        self.mk_relational(TermKind::Neq, a, b)
    }

    /// Strictly-less atom over reals.
    pub fn mk_lt(&mut self, a: TermId, b: TermId) -> TermId {
        debug_assert_eq!(self.sort(a), Some(Sort::Real));
        self.mk_relational(TermKind::Lt, a, b)
    }

    /// Less-or-equal atom over reals.
    pub fn mk_le(&mut self, a: TermId, b: TermId) -> TermId {
        debug_assert_eq!(self.sort(a), Some(Sort::Real));
        self.mk_relational(TermKind::Le, a, b)
    }

    /// Strictly-greater atom over reals.
    pub fn mk_gt(&mut self, a: TermId, b: TermId) -> TermId {
        debug_assert_eq!(self.sort(a), Some(Sort::Real));
        self.mk_relational(TermKind::Gt, a, b)
    }

    /// Greater-or-equal atom over reals.
    pub fn mk_ge(&mut self, a: TermId, b: TermId) -> TermId {
        debug_assert_eq!(self.sort(a), Some(Sort::Real));
        self.mk_relational(TermKind::Ge, a, b)
    }

    // ------------------------------------------------------------------
    // Boolean connectives
    // ------------------------------------------------------------------

    /// Conjunction. Flattens nested conjunctions, folds constants, sorts
    /// and deduplicates operands; collapses empty/singleton results.
    pub fn mk_and(&mut self, args: Vec<TermId>) -> TermId {
        debug_assert!(args.iter().all(|&a| self.sort(a) == Some(Sort::Bool)));
        let mut flat: Vec<TermId> = Vec::with_capacity(args.len());
        for a in args {
            match self.get(a).map(|t| &t.kind) {
                Some(TermKind::True) => {}
                Some(TermKind::False) => return self.mk_false(),
                Some(TermKind::And(items)) => flat.extend(items.iter().copied()),
                _ => flat.push(a),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => self.mk_true(),
            1 => flat[0],
            _ => self.intern(Term {
                kind: TermKind::And(flat),
                sort: Sort::Bool,
            }),
        }
    }

    /// Disjunction. Flattens nested disjunctions, folds constants, sorts
    /// and deduplicates operands; collapses empty/singleton results.
    pub fn mk_or(&mut self, args: Vec<TermId>) -> TermId {
        debug_assert!(args.iter().all(|&a| self.sort(a) == Some(Sort::Bool)));
        let mut flat: Vec<TermId> = Vec::with_capacity(args.len());
        for a in args {
            match self.get(a).map(|t| &t.kind) {
                Some(TermKind::False) => {}
                Some(TermKind::True) => return self.mk_true(),
                Some(TermKind::Or(items)) => flat.extend(items.iter().copied()),
                _ => flat.push(a),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => self.mk_false(),
            1 => flat[0],
            _ => self.intern(Term {
                kind: TermKind::Or(flat),
                sort: Sort::Bool,
            }),
        }
    }

    /// Logical negation. Folds constants and cancels double negation;
    /// negated atoms are kept as literals.
    pub fn mk_not(&mut self, f: TermId) -> TermId {
        debug_assert_eq!(self.sort(f), Some(Sort::Bool));
        match self.get(f).map(|t| &t.kind) {
            Some(TermKind::True) => self.mk_false(),
            Some(TermKind::False) => self.mk_true(),
            Some(TermKind::Not(g)) => *g,
            _ => self.intern(Term {
                kind: TermKind::Not(f),
                sort: Sort::Bool,
            }),
        }
    }

    /// Material implication, constructed as the disjunction `¬a ∨ b`.
    pub fn mk_implies(&mut self, a: TermId, b: TermId) -> TermId {
        let na = self.mk_not(a);
        self.mk_or(vec![na, b])
    }

    /// Universal quantifier. Binders are sorted and deduplicated; an empty
    /// binder list returns the body.
    pub fn mk_forall(&mut self, vars: impl IntoIterator<Item = VarId>, body: TermId) -> TermId {
        debug_assert_eq!(self.sort(body), Some(Sort::Bool));
        let mut binders: BinderList = vars.into_iter().collect();
        binders.sort_unstable();
        binders.dedup();
        if binders.is_empty() {
            return body;
        }
        self.intern(Term {
            kind: TermKind::Forall {
                vars: binders,
                body,
            },
            sort: Sort::Bool,
        })
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    /// Check if a term is the constant `true`.
    #[must_use]
    pub fn is_true(&self, id: TermId) -> bool {
        matches!(self.get(id).map(|t| &t.kind), Some(TermKind::True))
    }

    /// Check if a term is the constant `false`.
    #[must_use]
    pub fn is_false(&self, id: TermId) -> bool {
        matches!(self.get(id).map(|t| &t.kind), Some(TermKind::False))
    }

    /// Check if a formula is atomic: a constant, a Boolean variable, or a
    /// theory atom.
    #[must_use]
    pub fn is_atomic(&self, id: TermId) -> bool {
        matches!(
            self.get(id).map(|t| &t.kind),
            Some(
                TermKind::True
                    | TermKind::False
                    | TermKind::Var(_)
                    | TermKind::Eq(..)
                    | TermKind::Neq(..)
                    | TermKind::Lt(..)
                    | TermKind::Le(..)
                    | TermKind::Gt(..)
                    | TermKind::Ge(..)
            )
        ) && self.sort(id) == Some(Sort::Bool)
    }

    /// Check if a formula is a literal: atomic, or the negation of an atom.
    #[must_use]
    pub fn is_literal(&self, id: TermId) -> bool {
        match self.get(id).map(|t| &t.kind) {
            Some(TermKind::Not(g)) => self.is_atomic(*g),
            _ => self.is_atomic(id),
        }
    }

    /// Check if a formula is a clause: a literal, a disjunction of
    /// literals, or a universal closure of a clause.
    #[must_use]
    pub fn is_clause(&self, id: TermId) -> bool {
        match self.get(id).map(|t| &t.kind) {
            Some(TermKind::Or(args)) => args.iter().all(|&a| self.is_literal(a)),
            Some(TermKind::Forall { body, .. }) => self.is_clause(*body),
            _ => self.is_literal(id),
        }
    }

    /// Check if a term is a conjunction.
    #[must_use]
    pub fn is_conjunction(&self, id: TermId) -> bool {
        matches!(self.get(id).map(|t| &t.kind), Some(TermKind::And(_)))
    }

    /// Check if a term is a disjunction.
    #[must_use]
    pub fn is_disjunction(&self, id: TermId) -> bool {
        matches!(self.get(id).map(|t| &t.kind), Some(TermKind::Or(_)))
    }

    // ------------------------------------------------------------------
    // Free variables
    // ------------------------------------------------------------------

    /// The variables free in `id`. Quantifiers subtract their binders.
    #[must_use]
    pub fn free_vars(&self, id: TermId) -> BTreeSet<VarId> {
        let mut memo: FxHashMap<TermId, BTreeSet<VarId>> = FxHashMap::default();
        self.free_vars_rec(id, &mut memo)
    }

    fn free_vars_rec(
        &self,
        id: TermId,
        memo: &mut FxHashMap<TermId, BTreeSet<VarId>>,
    ) -> BTreeSet<VarId> {
        if let Some(cached) = memo.get(&id) {
            return cached.clone();
        }
        let mut out = BTreeSet::new();
        match self.get(id).map(|t| &t.kind) {
            Some(TermKind::Var(v)) => {
                out.insert(*v);
            }
            Some(TermKind::Not(a) | TermKind::Neg(a) | TermKind::Pow(a, _)) => {
                out = self.free_vars_rec(*a, memo);
            }
            Some(
                TermKind::Sub(a, b)
                | TermKind::Eq(a, b)
                | TermKind::Neq(a, b)
                | TermKind::Lt(a, b)
                | TermKind::Le(a, b)
                | TermKind::Gt(a, b)
                | TermKind::Ge(a, b),
            ) => {
                out = self.free_vars_rec(*a, memo);
                out.extend(self.free_vars_rec(*b, memo));
            }
            Some(TermKind::Add(args) | TermKind::Mul(args) | TermKind::And(args)
            | TermKind::Or(args)) => {
                for &a in args {
                    out.extend(self.free_vars_rec(a, memo));
                }
            }
            Some(TermKind::Forall { vars, body }) => {
                out = self.free_vars_rec(*body, memo);
                for v in vars {
                    out.remove(v);
                }
            }
            _ => {}
        }
        memo.insert(id, out.clone());
        out
    }

    // ------------------------------------------------------------------
    // Printing
    // ------------------------------------------------------------------

    /// A displayable view of a term, as an s-expression.
    #[must_use]
    pub fn display(&self, id: TermId) -> TermDisplay<'_> {
        TermDisplay { manager: self, id }
    }

    fn fmt_term(&self, id: TermId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(term) = self.get(id) else {
            return write!(f, "<invalid>");
        };
        match &term.kind {
            TermKind::True => write!(f, "true"),
            TermKind::False => write!(f, "false"),
            TermKind::Var(v) => write!(f, "{}", self.var_name(*v).unwrap_or("<invalid>")),
            TermKind::RealConst(r) => {
                if r.is_integer() {
                    write!(f, "{}", r.numer())
                } else {
                    write!(f, "{}", r)
                }
            }
            TermKind::Add(args) => self.fmt_nary("+", args, f),
            TermKind::Mul(args) => self.fmt_nary("*", args, f),
            TermKind::Sub(a, b) => self.fmt_binary("-", *a, *b, f),
            TermKind::Neg(a) => {
                write!(f, "(- ")?;
                self.fmt_term(*a, f)?;
                write!(f, ")")
            }
            TermKind::Pow(a, k) => {
                write!(f, "(^ ")?;
                self.fmt_term(*a, f)?;
                write!(f, " {})", k)
            }
            TermKind::Eq(a, b) => self.fmt_binary("=", *a, *b, f),
            TermKind::Neq(a, b) => self.fmt_binary("distinct", *a, *b, f),
            TermKind::Lt(a, b) => self.fmt_binary("<", *a, *b, f),
            TermKind::Le(a, b) => self.fmt_binary("<=", *a, *b, f),
            TermKind::Gt(a, b) => self.fmt_binary(">", *a, *b, f),
            TermKind::Ge(a, b) => self.fmt_binary(">=", *a, *b, f),
            TermKind::And(args) => self.fmt_nary("and", args, f),
            TermKind::Or(args) => self.fmt_nary("or", args, f),
            TermKind::Not(a) => {
                write!(f, "(not ")?;
                self.fmt_term(*a, f)?;
                write!(f, ")")
            }
            TermKind::Forall { vars, body } => {
                write!(f, "(forall (")?;
                for (i, v) in vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", self.var_name(*v).unwrap_or("<invalid>"))?;
                }
                write!(f, ") ")?;
                self.fmt_term(*body, f)?;
                write!(f, ")")
            }
        }
    }

    fn fmt_nary(&self, op: &str, args: &[TermId], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", op)?;
        for &a in args {
            write!(f, " ")?;
            self.fmt_term(a, f)?;
        }
        write!(f, ")")
    }

    fn fmt_binary(
        &self,
        op: &str,
        a: TermId,
        b: TermId,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "({} ", op)?;
        self.fmt_term(a, f)?;
        write!(f, " ")?;
        self.fmt_term(b, f)?;
        write!(f, ")")
    }
}

/// Displays a term as an s-expression. Created by [`TermManager::display`].
pub struct TermDisplay<'a> {
    manager: &'a TermManager,
    id: TermId,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.manager.fmt_term(self.id, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_consing() {
        let mut tm = TermManager::new();
        assert_eq!(tm.mk_true(), tm.mk_true());
        let five_a = tm.mk_int(BigInt::from(5));
        let five_b = tm.mk_int(BigInt::from(5));
        assert_eq!(five_a, five_b);
    }

    #[test]
    fn test_variable_consing_by_name_and_sort() {
        let mut tm = TermManager::new();
        let x1 = tm.mk_var("x", Sort::Real);
        let x2 = tm.mk_var("x", Sort::Real);
        assert_eq!(x1, x2);
        let xb = tm.mk_var("x", Sort::Bool);
        assert_ne!(x1, xb);
    }

    #[test]
    fn test_fresh_var_avoids_existing_names() {
        let mut tm = TermManager::new();
        let taken = tm.mk_var("p!0", Sort::Bool);
        let fresh = tm.mk_fresh_var("p", Sort::Bool);
        assert_ne!(taken, fresh);
        let v = tm.var_id(fresh).unwrap();
        assert_eq!(tm.var_name(v), Some("p!1"));
    }

    #[test]
    fn test_and_identity_and_annihilator() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", Sort::Bool);
        let t = tm.mk_true();
        let f = tm.mk_false();
        assert_eq!(tm.mk_and(vec![a, t]), a);
        let bottom = tm.mk_and(vec![a, f]);
        assert!(tm.is_false(bottom));
        let empty = tm.mk_and(vec![]);
        assert!(tm.is_true(empty));
    }

    #[test]
    fn test_or_identity_and_annihilator() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", Sort::Bool);
        let t = tm.mk_true();
        let f = tm.mk_false();
        assert_eq!(tm.mk_or(vec![a, f]), a);
        let top = tm.mk_or(vec![a, t]);
        assert!(tm.is_true(top));
        let empty = tm.mk_or(vec![]);
        assert!(tm.is_false(empty));
    }

    #[test]
    fn test_connectives_behave_as_sets() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", Sort::Bool);
        let b = tm.mk_var("b", Sort::Bool);
        let ab = tm.mk_and(vec![a, b]);
        let ba = tm.mk_and(vec![b, a]);
        assert_eq!(ab, ba);
        assert_eq!(tm.mk_and(vec![a, a]), a);
        // flattening: (a ∧ b) ∧ b = a ∧ b
        let nested = tm.mk_and(vec![ab, b]);
        assert_eq!(nested, ab);
    }

    #[test]
    fn test_double_negation() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", Sort::Bool);
        let na = tm.mk_not(a);
        assert_eq!(tm.mk_not(na), a);
        let t = tm.mk_true();
        let nt = tm.mk_not(t);
        assert!(tm.is_false(nt));
    }

    #[test]
    fn test_implies_is_a_disjunction() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", Sort::Bool);
        let b = tm.mk_var("b", Sort::Bool);
        let imp = tm.mk_implies(a, b);
        assert!(tm.is_disjunction(imp));
        assert!(tm.is_clause(imp));
    }

    #[test]
    fn test_predicates() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", Sort::Bool);
        let x = tm.mk_var("x", Sort::Real);
        let zero = tm.mk_int(BigInt::from(0));
        let atom = tm.mk_le(x, zero);
        let na = tm.mk_not(a);
        let b = tm.mk_var("b", Sort::Bool);

        assert!(tm.is_atomic(a));
        assert!(tm.is_atomic(atom));
        assert!(!tm.is_atomic(na));
        assert!(tm.is_literal(na));
        assert!(tm.is_clause(na));
        let clause = tm.mk_or(vec![na, atom, b]);
        assert!(tm.is_clause(clause));
        let and_ab = tm.mk_and(vec![a, b]);
        assert!(!tm.is_clause(and_ab));
        let non_clause = tm.mk_or(vec![na, and_ab]);
        assert!(!tm.is_clause(non_clause));
    }

    #[test]
    fn test_quantified_clause_is_a_clause() {
        let mut tm = TermManager::new();
        let x = tm.mk_var("x", Sort::Real);
        let y = tm.mk_var("y", Sort::Real);
        let yv = tm.var_id(y).unwrap();
        let zero = tm.mk_int(BigInt::from(0));
        let sum = tm.mk_add(vec![x, y]);
        let atom = tm.mk_le(sum, zero);
        let q = tm.mk_forall([yv], atom);
        assert!(tm.is_clause(q));
        assert!(!tm.is_literal(q));
    }

    #[test]
    fn test_free_vars_with_shadowing() {
        let mut tm = TermManager::new();
        let x = tm.mk_var("x", Sort::Real);
        let y = tm.mk_var("y", Sort::Real);
        let xv = tm.var_id(x).unwrap();
        let yv = tm.var_id(y).unwrap();
        let zero = tm.mk_int(BigInt::from(0));
        let sum = tm.mk_add(vec![x, y]);
        let atom = tm.mk_le(sum, zero);
        let q = tm.mk_forall([yv], atom);

        assert_eq!(tm.free_vars(atom).len(), 2);
        let free = tm.free_vars(q);
        assert!(free.contains(&xv));
        assert!(!free.contains(&yv));
    }

    #[test]
    fn test_forall_empty_binders_is_body() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", Sort::Bool);
        assert_eq!(tm.mk_forall([], a), a);
    }

    #[test]
    fn test_display() {
        let mut tm = TermManager::new();
        let x = tm.mk_var("x", Sort::Real);
        let quarter = tm.mk_real(BigRational::new(BigInt::from(1), BigInt::from(4)));
        let sq = tm.mk_pow(x, 2);
        let atom = tm.mk_le(quarter, sq);
        assert_eq!(tm.display(atom).to_string(), "(<= 1/4 (^ x 2))");
        let a = tm.mk_var("a", Sort::Bool);
        let na = tm.mk_not(a);
        assert_eq!(tm.display(na).to_string(), "(not a)");
    }
}
