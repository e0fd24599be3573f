//! Postfix equation evaluation
//!
//! `eqn` executes pre-parsed postfix token sequences against a stack
//! machine with persistent named variables and ad-hoc value groupings.
//! Turning expression text into postfix order is the job of an external
//! parser; this crate consumes its token stream as-is.

pub mod eval;
pub mod token;

pub use eval::{Cell, EvalError, EvalResult, Evaluator};
pub use token::{Fn1, Fn2, Token};
