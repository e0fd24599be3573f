//! The postfix stack machine
//!
//! An [`Evaluator`] executes one token sequence at a time against its
//! own scratch stack, while the variable table and group store persist
//! across executions. Calls are synchronous and non-reentrant; each
//! instance owns its state exclusively.

mod error;
mod groups;
mod stack;
mod table;
mod value;

pub use error::{EvalError, EvalResult};
pub use groups::GroupStore;
pub use stack::EvalStack;
pub use table::VariableTable;
pub use value::Cell;

use crate::token::{Fn1, Fn2, Token};
use std::f64::consts;
use tracing::trace;

/// Executes postfix token sequences against persistent variable and
/// grouping state
#[derive(Debug, Default)]
pub struct Evaluator {
    stack: EvalStack,
    table: VariableTable,
    groups: GroupStore,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator::default()
    }

    /// Evaluate a token sequence, surfacing any error
    ///
    /// Clears the scratch stack, then dispatches every token in order.
    /// The result is the value on top of the stack, or zero when the
    /// sequence leaves the stack empty.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn run(&mut self, tokens: &[Token]) -> EvalResult<f64> {
        self.stack.clear();
        for token in tokens {
            self.eval(token)?;
        }
        Ok(self.stack.top().map_or(0.0, Cell::num))
    }

    /// Evaluate a token sequence, mapping any failure to zero
    ///
    /// The boundary for per-frame callers: no error escapes, and a
    /// failed evaluation is indistinguishable from an expression that
    /// evaluated to zero.
    pub fn execute(&mut self, tokens: &[Token]) -> f64 {
        match self.run(tokens) {
            Ok(value) => value,
            Err(err) => {
                self.stack.trace("discarding partial stack");
                trace!("evaluation failed: {err}");
                self.stack.clear();
                0.0
            }
        }
    }

    fn eval(&mut self, token: &Token) -> EvalResult<()> {
        trace!(?token, "eval");
        match token {
            Token::Number(v) => {
                self.stack.push(Cell::Value(*v));
                Ok(())
            }
            Token::Ident { name, value } => {
                self.store(name, *value);
                Ok(())
            }
            Token::Pi => {
                self.stack.push(Cell::Value(consts::PI));
                Ok(())
            }
            Token::E => {
                self.stack.push(Cell::Value(consts::E));
                Ok(())
            }
            Token::Add => self.binary("add", |a, b| a + b),
            Token::Sub => self.binary("sub", |a, b| a - b),
            Token::Neg => self.neg(),
            Token::Mul => self.binary("mul", |a, b| a * b),
            Token::Div => self.div(),
            Token::Mod => self.binary("mod", |a, b| a % b),
            Token::Pow => self.binary("pow", f64::powf),
            Token::Assign => self.assign(),
            Token::Group => self.group(),
            Token::Fn1(f) => self.math_fn1(*f),
            Token::Fn2(f) => self.math_fn2(*f),
            // Reserved kinds have no stack effect
            Token::UserFn | Token::NoOp | Token::Not | Token::BitNot => Ok(()),
        }
    }

    /// Pop the top cell's numeric payload; callers guard depth first
    fn pop_num(&mut self) -> f64 {
        self.stack.pop().map_or(0.0, |cell| cell.num())
    }

    /// Resolve or create the named variable and push a reference to it
    fn store(&mut self, name: &str, value: f64) {
        let index = match self.table.find(name) {
            Some(index) => index,
            None => self.table.insert(name, Cell::Value(value)),
        };
        let current = self.table.get_at(index, 0.0);
        self.stack.push(Cell::Id { index, value: current });
    }

    fn binary(&mut self, op: &'static str, f: impl FnOnce(f64, f64) -> f64) -> EvalResult<()> {
        if self.stack.len() > 1 {
            let b = self.pop_num();
            let a = self.pop_num();
            self.stack.push(Cell::Value(f(a, b)));
            Ok(())
        } else {
            Err(EvalError::Arity { op })
        }
    }

    fn neg(&mut self) -> EvalResult<()> {
        if self.stack.is_empty() {
            Err(EvalError::Arity { op: "neg" })
        } else {
            let a = self.pop_num();
            self.stack.push(Cell::Value(-a));
            Ok(())
        }
    }

    /// Division as a reciprocal multiply
    ///
    /// An effectively-zero divisor yields a NaN reciprocal instead of a
    /// hardware divide; the NaN propagates through later arithmetic.
    fn div(&mut self) -> EvalResult<()> {
        if self.stack.len() > 1 {
            let b = self.pop_num();
            let a = self.pop_num();
            let recip = if b.abs() > f64::EPSILON {
                1.0 / b
            } else {
                f64::NAN
            };
            self.stack.push(Cell::Value(a * recip));
            Ok(())
        } else {
            Err(EvalError::Arity { op: "div" })
        }
    }

    /// Pack the count-marked run of cells into a fresh grouping
    ///
    /// The count cell truncates to `u8`. A zero count, or a count
    /// exceeding the remaining depth, consumes the marker and packs
    /// nothing. The stored list is in pop order: index 0 is the cell
    /// that sat nearest the marker.
    fn group(&mut self) -> EvalResult<()> {
        if self.stack.len() > 1 {
            let count = self.pop_num() as u8 as usize;
            if count > 0 && self.stack.len() > count {
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    if let Some(cell) = self.stack.pop() {
                        values.push(cell);
                    }
                }
                let id = self.groups.create(values);
                self.stack.push(Cell::List(id));
            }
            Ok(())
        } else {
            Err(EvalError::Arity { op: "group" })
        }
    }

    /// `a = b`: canonicalize the right-hand cell, write it through a
    /// valid identifier target, and push it as the expression's value
    ///
    /// An identifier right-hand side aliases the referenced variable's
    /// value as of this moment, not a live binding. A non-identifier
    /// target drops the write but still pushes the canonical cell.
    fn assign(&mut self) -> EvalResult<()> {
        if self.stack.len() > 1 {
            let b = self.stack.pop().unwrap_or(Cell::Value(f64::NAN));
            let a = self.stack.pop().unwrap_or(Cell::Value(f64::NAN));

            let c = match b {
                Cell::Id { index, .. } if index < self.table.len() => Cell::Id {
                    index,
                    value: self.table.get_at(index, f64::NAN),
                },
                // Dangling reference: degrade to a NaN value
                Cell::Id { .. } => Cell::Value(f64::NAN),
                Cell::List(id) => Cell::List(id),
                Cell::Value(v) => Cell::Value(v),
            };

            if let Cell::Id { index, .. } = a {
                self.table.put(index, c);
            }

            self.stack.push(c);
            Ok(())
        } else {
            Err(EvalError::Arity { op: "assign" })
        }
    }

    /// One-argument math function call
    ///
    /// The token stream pushes an argument-count marker on top of the
    /// operand; the marker must read 1.
    fn math_fn1(&mut self, f: Fn1) -> EvalResult<()> {
        if self.stack.len() > 1 {
            let marker = self.stack.pop().map_or(0, |cell| cell.integer());
            if marker != 1 {
                return Err(EvalError::FnArity { expected: 1 });
            }
            let a = self.pop_num();
            self.stack.push(Cell::Value(f.apply(a)));
            Ok(())
        } else {
            Err(EvalError::FnDepth { required: 2 })
        }
    }

    /// Two-argument math function call; marker must read 2, the top
    /// operand is the second argument
    fn math_fn2(&mut self, f: Fn2) -> EvalResult<()> {
        if self.stack.len() > 2 {
            let marker = self.stack.pop().map_or(0, |cell| cell.integer());
            if marker != 2 {
                return Err(EvalError::FnArity { expected: 2 });
            }
            let b = self.pop_num();
            let a = self.pop_num();
            self.stack.push(Cell::Value(f.apply(a, b)));
            Ok(())
        } else {
            Err(EvalError::FnDepth { required: 3 })
        }
    }

    // ---- accessor surface; none of these fail ----

    /// Stable index of a known variable
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.table.find(name)
    }

    /// Value of a named variable, or the default
    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.table.get(name, default)
    }

    /// Value at a variable index, or the default
    pub fn get_at(&self, index: usize, default: f64) -> f64 {
        self.table.get_at(index, default)
    }

    /// Insert-or-overwrite a named variable with a plain value
    pub fn set(&mut self, name: &str, value: f64) {
        self.table.set(name, value);
    }

    /// Overwrite an existing slot by index; out-of-range writes are
    /// dropped
    pub fn set_at(&mut self, index: usize, value: f64) {
        self.table.put(index, Cell::Value(value));
    }

    /// Value at an offset below the top of the result stack, zero when
    /// out of range
    pub fn peek(&self, offset: usize) -> f64 {
        self.stack.peek(offset).map_or(0.0, Cell::num)
    }

    /// Copy the grouping named by `name` into `out`, in the order its
    /// values were originally pushed
    ///
    /// `out` is cleared first and stays empty when the variable is
    /// unknown or does not hold a live grouping id.
    pub fn group_values(&self, name: &str, out: &mut Vec<f64>) {
        out.clear();
        if let Some(cells) = self.groups.resolve(self.table.get(name, -1.0)) {
            // Stored last-pushed-first; walk backwards to restore push order
            for cell in cells.iter().rev() {
                out.push(cell.num());
            }
        }
    }

    /// Forget every variable and grouping
    ///
    /// Id and List cells issued before the clear refer to state that no
    /// longer exists; grouping ids are not reused afterwards.
    pub fn clear_variables(&mut self) {
        self.table.clear();
        self.groups.clear();
    }
}
