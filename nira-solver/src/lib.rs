//! nira-solver - Solver Front for the nira SMT Solver
//!
//! This crate sits between the symbolic layer and the search engines: a
//! [`Context`] collects variable declarations and assertions, runs every
//! assertion through definitional CNF conversion, and maintains the
//! clausal database in two views — symbolic clause formulas for the
//! theory side, and packed literals over interned atoms for the SAT
//! engine.
//!
//! # Examples
//!
//! ```
//! use nira_core::{Sort, TermManager};
//! use nira_solver::Context;
//!
//! let mut tm = TermManager::new();
//! let mut ctx = Context::new();
//!
//! let a = tm.mk_var("a", Sort::Bool);
//! let b = tm.mk_var("b", Sort::Bool);
//! let c = tm.mk_var("c", Sort::Bool);
//! let ab = tm.mk_and(vec![a, b]);
//! let f = tm.mk_or(vec![ab, c]);
//!
//! for v in tm.free_vars(f) {
//!     ctx.declare_var(v);
//! }
//! ctx.assert(f, &mut tm).unwrap();
//!
//! assert!(!ctx.clauses().is_empty());
//! assert!(ctx.ground_clauses().len() == ctx.clauses().len());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod literal;

pub use context::{Context, ContextError, ContextStats};
pub use literal::{BooleanAbstraction, Lit, LoweredClause, Var};
