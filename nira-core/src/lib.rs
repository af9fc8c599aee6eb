//! nira-core - Terms, Sorts, and CNF Conversion for the nira SMT Solver
//!
//! This crate provides the symbolic layer of a delta-complete SMT solver
//! for nonlinear real arithmetic:
//! - Arena-allocated terms with hash-consed [`TermId`] references
//! - A two-sort type system (`Bool`, `Real`)
//! - Definitional CNF conversion with quantifier hoisting
//! - Exact model evaluation over rationals
//!
//! # Examples
//!
//! ## Creating terms
//!
//! ```
//! use nira_core::{Sort, TermManager};
//! use num_bigint::BigInt;
//!
//! let mut tm = TermManager::new();
//!
//! // Boolean structure
//! let p = tm.mk_var("p", Sort::Bool);
//! let q = tm.mk_var("q", Sort::Bool);
//! let and_pq = tm.mk_and(vec![p, q]);
//!
//! // A theory atom over the reals
//! let x = tm.mk_var("x", Sort::Real);
//! let five = tm.mk_int(BigInt::from(5));
//! let ge = tm.mk_ge(x, five);
//!
//! let f = tm.mk_or(vec![and_pq, ge]);
//! assert!(!tm.is_clause(f));
//! ```
//!
//! ## Converting to CNF
//!
//! ```
//! use nira_core::{to_cnf, Sort, TermManager};
//!
//! let mut tm = TermManager::new();
//! let a = tm.mk_var("a", Sort::Bool);
//! let b = tm.mk_var("b", Sort::Bool);
//! let c = tm.mk_var("c", Sort::Bool);
//! let ab = tm.mk_and(vec![a, b]);
//! let f = tm.mk_or(vec![ab, c]);
//!
//! let clauses = to_cnf(&mut tm, f).unwrap();
//! for &clause in &clauses {
//!     assert!(tm.is_clause(clause));
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod model;
pub mod sort;

pub use ast::normal_forms::{to_cnf, Cnfizer, CnfizerStats};
pub use ast::{BinderList, Term, TermDisplay, TermId, TermKind, TermManager, VarId};
pub use error::{NiraError, Result};
pub use model::{Model, Value};
pub use sort::Sort;
