//! Postfix token stream format
//!
//! Tokens arrive from an external infix parser already reduced to
//! postfix evaluation order, one token per step. The evaluator performs
//! no reordering or precedence handling.

use serde::{Deserialize, Serialize};

/// One unit of a postfix expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Variable reference; `value` seeds the slot on first sight
    Ident { name: String, value: f64 },
    /// The constant pi
    Pi,
    /// Euler's number
    E,
    Add,
    Sub,
    /// Unary negation
    Neg,
    Mul,
    Div,
    Mod,
    Pow,
    /// Assignment of the top cell into the cell below it
    Assign,
    /// Pack the count-marked run of values into a grouping
    Group,
    /// One-argument math function call
    Fn1(Fn1),
    /// Two-argument math function call
    Fn2(Fn2),
    /// Reserved, no stack effect
    UserFn,
    /// Reserved, no stack effect
    NoOp,
    /// Reserved, no stack effect
    Not,
    /// Reserved, no stack effect
    BitNot,
}

impl Token {
    /// Identifier token with a zero seed value
    pub fn ident(name: impl Into<String>) -> Self {
        Token::Ident {
            name: name.into(),
            value: 0.0,
        }
    }
}

/// One-argument math functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fn1 {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Abs,
    Ceil,
    Floor,
    Exp,
    Log,
    Log10,
    Sqrt,
}

impl Fn1 {
    pub fn apply(self, a: f64) -> f64 {
        match self {
            Fn1::Sin => a.sin(),
            Fn1::Cos => a.cos(),
            Fn1::Tan => a.tan(),
            Fn1::Asin => a.asin(),
            Fn1::Acos => a.acos(),
            Fn1::Atan => a.atan(),
            Fn1::Sinh => a.sinh(),
            Fn1::Cosh => a.cosh(),
            Fn1::Tanh => a.tanh(),
            Fn1::Abs => a.abs(),
            Fn1::Ceil => a.ceil(),
            Fn1::Floor => a.floor(),
            Fn1::Exp => a.exp(),
            Fn1::Log => a.ln(),
            Fn1::Log10 => a.log10(),
            Fn1::Sqrt => a.sqrt(),
        }
    }
}

/// Two-argument math functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fn2 {
    Atan2,
    /// Floor-style modulo, result in `[0, b)` for positive `b`
    Fmod,
    Pow,
}

impl Fn2 {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Fn2::Atan2 => a.atan2(b),
            Fn2::Fmod => floor_mod(a, b),
            Fn2::Pow => a.powf(b),
        }
    }
}

/// Floor-style modulo: the IEEE round-to-nearest remainder, corrected
/// into `[0, b)` when negative
///
/// Distinct from the `%` remainder, which takes the dividend's sign.
pub fn floor_mod(a: f64, b: f64) -> f64 {
    let r = a - b * (a / b).round_ties_even();
    if r < 0.0 { b + r } else { r }
}
