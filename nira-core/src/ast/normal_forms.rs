//! Normal-form conversion: definitional CNF.
//!
//! [`Cnfizer`] converts an arbitrary formula into an equisatisfiable list
//! of clauses. It walks the formula once, introduces a fresh Boolean proxy
//! variable for every compound subformula, records the proxy/subformula
//! binding in a definition map, and then emits a small, kind-specific set
//! of clauses realizing each biconditional `p ⇔ φ`. The output conjunction
//! is satisfiable iff the input is, with the proxies read existentially;
//! it is *not* logically equivalent to the input.
//!
//! Universal quantifiers are handled by converting the quantified body in
//! an independent transformer and pushing the quantifier over the resulting
//! conjunction, clause by clause:
//!
//! ```text
//! ∀y. (C₁ ∧ ... ∧ Cₙ)  =  (∀y. C₁) ∧ ... ∧ (∀y. Cₙ)
//! ```
//!
//! Clauses that do not mention a bound variable hoist out of the
//! quantifier unchanged. Each returned clause is therefore either ground
//! or a universal closure of a ground clause.

use crate::ast::{BinderList, TermId, TermKind, TermManager, VarId};
use crate::error::{NiraError, Result};
use crate::sort::Sort;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Counters over a [`Cnfizer`]'s lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct CnfizerStats {
    /// Proxy variables introduced, including those of nested transformers.
    pub proxies_introduced: u64,
    /// Clauses returned from `convert`.
    pub clauses_emitted: u64,
    /// Clauses that were wrapped in a universal quantifier while hoisting.
    pub clauses_quantified: u64,
}

/// Definitional CNF transformer.
///
/// A `Cnfizer` is reusable sequentially; every [`convert`](Self::convert)
/// starts from an empty definition map, and proxies introduced by one call
/// never appear in the output of another.
pub struct Cnfizer<'a> {
    manager: &'a mut TermManager,
    /// Definitions `proxy ↦ body`, ordered by proxy id. Proxy ids are
    /// allocated monotonically, so iteration is allocation order.
    defs: BTreeMap<VarId, TermId>,
    /// Proxies introduced by the current `convert`, nested ones included.
    proxies: Vec<VarId>,
    stats: CnfizerStats,
}

/// Convert `f` to definitional CNF with a throwaway [`Cnfizer`].
pub fn to_cnf(manager: &mut TermManager, f: TermId) -> Result<Vec<TermId>> {
    Cnfizer::new(manager).convert(f)
}

impl<'a> Cnfizer<'a> {
    /// Create a transformer over the given manager.
    pub fn new(manager: &'a mut TermManager) -> Self {
        Self {
            manager,
            defs: BTreeMap::new(),
            proxies: Vec::new(),
            stats: CnfizerStats::default(),
        }
    }

    /// Get lifetime counters.
    #[must_use]
    pub fn stats(&self) -> &CnfizerStats {
        &self.stats
    }

    /// The proxy variables introduced by the most recent
    /// [`convert`](Self::convert), in allocation order.
    pub fn proxies(&self) -> impl Iterator<Item = VarId> + '_ {
        self.proxies.iter().copied()
    }

    /// Convert `f` into a list of clauses whose conjunction is
    /// equisatisfiable with `f`.
    ///
    /// Atomic inputs come back as a singleton list unchanged, including
    /// the constants `true` and `false`. Every returned formula is a
    /// clause, with two exceptions inherited from the input language: a
    /// bare atom stands for its unit clause, and a universally quantified
    /// clause stands for itself.
    pub fn convert(&mut self, f: TermId) -> Result<Vec<TermId>> {
        self.defs.clear();
        self.proxies.clear();
        let head = self.visit(f)?;
        let mut ret = Vec::new();
        if self.defs.is_empty() {
            ret.push(head);
            self.stats.clauses_emitted += 1;
            return Ok(ret);
        }
        let head_var = self.manager.var_id(head).ok_or_else(|| {
            NiraError::InvariantViolation(
                "definition map is non-empty but the visit result is not a proxy".to_string(),
            )
        })?;
        let defs = std::mem::take(&mut self.defs);
        for (&proxy, &body) in &defs {
            if proxy == head_var {
                // The head proxy needs no biconditional: asserting its
                // definition directly is strictly stronger and skips one
                // proxy layer when the definition is a conjunction.
                match self.manager.get(body).map(|t| &t.kind) {
                    Some(TermKind::And(conjuncts)) => ret.extend(conjuncts.iter().copied()),
                    _ => ret.push(body),
                }
            } else {
                self.cnfize(proxy, body, &mut ret)?;
            }
        }
        self.stats.clauses_emitted += ret.len() as u64;
        debug!(
            clauses = ret.len(),
            proxies = self.proxies.len(),
            "cnf conversion complete"
        );
        Ok(ret)
    }

    // ------------------------------------------------------------------
    // Visit
    // ------------------------------------------------------------------

    fn visit(&mut self, f: TermId) -> Result<TermId> {
        let term = self.manager.get(f).ok_or_else(|| {
            NiraError::InvariantViolation(format!("unknown term id {:?}", f))
        })?;
        if !term.sort.is_bool() {
            return Err(NiraError::InvariantViolation(format!(
                "cnf conversion visited a non-formula term: {}",
                self.manager.display(f)
            )));
        }
        let kind = term.kind.clone();
        match kind {
            TermKind::True
            | TermKind::False
            | TermKind::Var(_)
            | TermKind::Eq(..)
            | TermKind::Neq(..)
            | TermKind::Lt(..)
            | TermKind::Le(..)
            | TermKind::Gt(..)
            | TermKind::Ge(..) => Ok(f),
            TermKind::And(args) => self.visit_nary(args, true),
            TermKind::Or(args) => self.visit_nary(args, false),
            TermKind::Not(g) => self.visit_negation(f, g),
            TermKind::Forall { vars, body } => self.visit_forall(vars, body),
            TermKind::RealConst(_)
            | TermKind::Add(_)
            | TermKind::Mul(_)
            | TermKind::Sub(..)
            | TermKind::Neg(_)
            | TermKind::Pow(..) => Err(NiraError::InvariantViolation(format!(
                "cnf conversion visited a non-formula term: {}",
                self.manager.display(f)
            ))),
        }
    }

    fn visit_nary(&mut self, args: Vec<TermId>, conjunction: bool) -> Result<TermId> {
        let mut operands = Vec::with_capacity(args.len());
        for a in args {
            operands.push(self.visit(a)?);
        }
        let body = if conjunction {
            self.manager.mk_and(operands)
        } else {
            self.manager.mk_or(operands)
        };
        let compound = if conjunction {
            self.manager.is_conjunction(body)
        } else {
            self.manager.is_disjunction(body)
        };
        if !compound {
            // Transformed operands collapsed under canonicalization;
            // whatever is left already stands for the whole connective.
            return Ok(body);
        }
        let proxy = self.fresh_proxy(if conjunction { "conj" } else { "disj" });
        self.defs.insert(proxy, body);
        Ok(self.manager.var_term(proxy))
    }

    fn visit_negation(&mut self, f: TermId, operand: TermId) -> Result<TermId> {
        if self.manager.is_atomic(operand) {
            // Already a literal; nothing to define.
            return Ok(f);
        }
        // Allocated before the descent so this definition is emitted
        // before its operand's.
        let proxy = self.fresh_proxy("neg");
        let transformed = self.visit(operand)?;
        let body = self.manager.mk_not(transformed);
        self.defs.insert(proxy, body);
        Ok(self.manager.var_term(proxy))
    }

    fn visit_forall(&mut self, vars: BinderList, body: TermId) -> Result<TermId> {
        let mut inner = Cnfizer::new(&mut *self.manager);
        let mut clauses = inner.convert(body)?;
        let inner_proxies = std::mem::take(&mut inner.proxies);
        let inner_stats = inner.stats;
        drop(inner);
        self.stats.proxies_introduced += inner_stats.proxies_introduced;
        self.stats.clauses_quantified += inner_stats.clauses_quantified;
        self.proxies.extend(inner_proxies);

        let bound: FxHashSet<VarId> = vars.iter().copied().collect();
        for clause in clauses.iter_mut() {
            let free = self.manager.free_vars(*clause);
            if free.iter().any(|v| bound.contains(v)) {
                *clause = self.manager.mk_forall(vars.iter().copied(), *clause);
                self.stats.clauses_quantified += 1;
            }
        }
        debug_assert!(!clauses.is_empty());
        if clauses.len() == 1 {
            return Ok(clauses[0]);
        }
        let conjunction = self.manager.mk_and(clauses);
        if !self.manager.is_conjunction(conjunction) {
            // Duplicate clauses can collapse the conjunction; nothing left
            // to define.
            return Ok(conjunction);
        }
        let proxy = self.fresh_proxy("forall");
        self.defs.insert(proxy, conjunction);
        Ok(self.manager.var_term(proxy))
    }

    fn fresh_proxy(&mut self, family: &str) -> VarId {
        let proxy = self.manager.fresh_var(family, Sort::Bool);
        self.proxies.push(proxy);
        self.stats.proxies_introduced += 1;
        trace!(
            proxy = self.manager.var_name(proxy).unwrap_or("<invalid>"),
            "introduced proxy"
        );
        proxy
    }

    // ------------------------------------------------------------------
    // Clause emission
    // ------------------------------------------------------------------

    /// Emit the clauses of `proxy ⇔ body` by dispatching on the body kind.
    fn cnfize(&mut self, proxy: VarId, body: TermId, out: &mut Vec<TermId>) -> Result<()> {
        let kind = self
            .manager
            .get(body)
            .ok_or_else(|| {
                NiraError::InvariantViolation(format!("unknown term id {:?}", body))
            })?
            .kind
            .clone();
        match kind {
            TermKind::And(operands) => {
                self.cnfize_conjunction(proxy, &operands, out);
                Ok(())
            }
            TermKind::Or(operands) => {
                self.cnfize_disjunction(proxy, body, &operands, out);
                Ok(())
            }
            TermKind::Not(_) => {
                self.cnfize_negation(proxy, body, out);
                Ok(())
            }
            _ => Err(NiraError::InvariantViolation(format!(
                "definition body is not a boolean compound: {}",
                self.manager.display(body)
            ))),
        }
    }

    /// Append `clause` unless it is syntactically `true`.
    fn add(&mut self, clause: TermId, out: &mut Vec<TermId>) {
        if !self.manager.is_true(clause) {
            out.push(clause);
        }
    }

    /// Emit both directions of `lhs ⇔ rhs` as implications.
    fn add_iff(&mut self, lhs: TermId, rhs: TermId, out: &mut Vec<TermId>) {
        let forward = self.manager.mk_implies(lhs, rhs);
        self.add(forward, out);
        let backward = self.manager.mk_implies(rhs, lhs);
        self.add(backward, out);
    }

    /// `p ⇔ ¬b` becomes `(¬p ∨ ¬b) ∧ (b ∨ p)`.
    fn cnfize_negation(&mut self, proxy: VarId, body: TermId, out: &mut Vec<TermId>) {
        let p = self.manager.var_term(proxy);
        self.add_iff(p, body, out);
    }

    /// `p ⇔ (b₁ ∧ ... ∧ bₙ)` becomes
    /// `(¬p ∨ b₁) ∧ ... ∧ (¬p ∨ bₙ) ∧ (¬b₁ ∨ ... ∨ ¬bₙ ∨ p)`.
    fn cnfize_conjunction(&mut self, proxy: VarId, operands: &[TermId], out: &mut Vec<TermId>) {
        let p = self.manager.var_term(proxy);
        let not_p = self.manager.mk_not(p);
        let mut negated = Vec::with_capacity(operands.len() + 1);
        for &b in operands {
            let clause = self.manager.mk_or(vec![not_p, b]);
            self.add(clause, out);
            negated.push(self.manager.mk_not(b));
        }
        negated.push(p);
        let long_clause = self.manager.mk_or(negated);
        self.add(long_clause, out);
    }

    /// `p ⇔ (b₁ ∨ ... ∨ bₙ)` becomes
    /// `(¬p ∨ b₁ ∨ ... ∨ bₙ) ∧ (¬b₁ ∨ p) ∧ ... ∧ (¬bₙ ∨ p)`.
    fn cnfize_disjunction(
        &mut self,
        proxy: VarId,
        body: TermId,
        operands: &[TermId],
        out: &mut Vec<TermId>,
    ) {
        let p = self.manager.var_term(proxy);
        let not_p = self.manager.mk_not(p);
        let aggregate = self.manager.mk_or(vec![not_p, body]);
        self.add(aggregate, out);
        for &b in operands {
            let not_b = self.manager.mk_not(b);
            let clause = self.manager.mk_or(vec![not_b, p]);
            self.add(clause, out);
        }
    }
}
