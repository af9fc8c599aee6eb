//! Models and exact term evaluation.
//!
//! A [`Model`] assigns values to variables; evaluation is exact over
//! rationals, so polynomial arithmetic introduces no rounding. Quantified
//! terms cannot be evaluated.

use crate::ast::{TermId, TermKind, TermManager, VarId};
use crate::error::{NiraError, Result};
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;

/// A value a term can evaluate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Rational value.
    Real(BigRational),
}

impl Value {
    /// The Boolean payload, if this is a Boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Real(_) => None,
        }
    }

    /// The rational payload, if this is a real value.
    #[must_use]
    pub fn as_real(&self) -> Option<&BigRational> {
        match self {
            Value::Real(r) => Some(r),
            Value::Bool(_) => None,
        }
    }
}

/// An assignment of values to variables.
#[derive(Debug, Clone, Default)]
pub struct Model {
    values: FxHashMap<VarId, Value>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a value to a variable.
    pub fn set(&mut self, v: VarId, value: Value) {
        self.values.insert(v, value);
    }

    /// Assign a Boolean value to a variable.
    pub fn set_bool(&mut self, v: VarId, b: bool) {
        self.set(v, Value::Bool(b));
    }

    /// Assign a rational value to a variable.
    pub fn set_real(&mut self, v: VarId, r: BigRational) {
        self.set(v, Value::Real(r));
    }

    /// Look up the value of a variable.
    #[must_use]
    pub fn get(&self, v: VarId) -> Option<&Value> {
        self.values.get(&v)
    }

    /// Evaluate a quantifier-free term under this model.
    pub fn eval(&self, manager: &TermManager, id: TermId) -> Result<Value> {
        let Some(term) = manager.get(id) else {
            return Err(NiraError::InvariantViolation(format!(
                "unknown term id {:?}",
                id
            )));
        };
        match &term.kind {
            TermKind::True => Ok(Value::Bool(true)),
            TermKind::False => Ok(Value::Bool(false)),
            TermKind::Var(v) => match self.values.get(v) {
                Some(value) => Ok(value.clone()),
                None => Err(NiraError::UnboundVariable(
                    manager.var_name(*v).unwrap_or("<invalid>").to_string(),
                )),
            },
            TermKind::RealConst(r) => Ok(Value::Real(r.clone())),
            TermKind::Add(args) => {
                let mut sum = BigRational::zero();
                for &a in args {
                    sum += self.eval_real(manager, a)?;
                }
                Ok(Value::Real(sum))
            }
            TermKind::Mul(args) => {
                let mut product = BigRational::one();
                for &a in args {
                    product *= self.eval_real(manager, a)?;
                }
                Ok(Value::Real(product))
            }
            TermKind::Sub(a, b) => {
                let lhs = self.eval_real(manager, *a)?;
                let rhs = self.eval_real(manager, *b)?;
                Ok(Value::Real(lhs - rhs))
            }
            TermKind::Neg(a) => Ok(Value::Real(-self.eval_real(manager, *a)?)),
            TermKind::Pow(a, k) => {
                let base = self.eval_real(manager, *a)?;
                Ok(Value::Real(base.pow(*k as i32)))
            }
            TermKind::Eq(a, b) => self.eval_comparison(manager, *a, *b, |o| o.is_eq()),
            TermKind::Neq(a, b) => self.eval_comparison(manager, *a, *b, |o| o.is_ne()),
            TermKind::Lt(a, b) => self.eval_comparison(manager, *a, *b, |o| o.is_lt()),
            TermKind::Le(a, b) => self.eval_comparison(manager, *a, *b, |o| o.is_le()),
            TermKind::Gt(a, b) => self.eval_comparison(manager, *a, *b, |o| o.is_gt()),
            TermKind::Ge(a, b) => self.eval_comparison(manager, *a, *b, |o| o.is_ge()),
            TermKind::And(args) => {
                let mut result = true;
                for &a in args {
                    result &= self.eval_bool(manager, a)?;
                }
                Ok(Value::Bool(result))
            }
            TermKind::Or(args) => {
                let mut result = false;
                for &a in args {
                    result |= self.eval_bool(manager, a)?;
                }
                Ok(Value::Bool(result))
            }
            TermKind::Not(a) => Ok(Value::Bool(!self.eval_bool(manager, *a)?)),
            TermKind::Forall { .. } => Err(NiraError::QuantifiedTerm),
        }
    }

    /// Evaluate a formula to a Boolean.
    pub fn eval_bool(&self, manager: &TermManager, id: TermId) -> Result<bool> {
        match self.eval(manager, id)? {
            Value::Bool(b) => Ok(b),
            Value::Real(_) => Err(NiraError::InvariantViolation(format!(
                "expected a boolean value for {}",
                manager.display(id)
            ))),
        }
    }

    fn eval_real(&self, manager: &TermManager, id: TermId) -> Result<BigRational> {
        match self.eval(manager, id)? {
            Value::Real(r) => Ok(r),
            Value::Bool(_) => Err(NiraError::InvariantViolation(format!(
                "expected a real value for {}",
                manager.display(id)
            ))),
        }
    }

    fn eval_comparison(
        &self,
        manager: &TermManager,
        a: TermId,
        b: TermId,
        test: fn(std::cmp::Ordering) -> bool,
    ) -> Result<Value> {
        let lhs = self.eval(manager, a)?;
        let rhs = self.eval(manager, b)?;
        match (&lhs, &rhs) {
            (Value::Real(x), Value::Real(y)) => Ok(Value::Bool(test(x.cmp(y)))),
            (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(test(x.cmp(y)))),
            _ => Err(NiraError::InvariantViolation(format!(
                "comparison between values of different sorts: {} vs {}",
                manager.display(a),
                manager.display(b)
            ))),
        }
    }
}
