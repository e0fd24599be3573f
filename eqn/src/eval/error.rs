//! Recoverable evaluation errors

use thiserror::Error;

/// Result type for evaluator operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while executing a token sequence
///
/// All of these unwind to the `execute` boundary, which discards the
/// partial stack and reports a neutral zero result; `run` surfaces them
/// to the caller instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    /// An operator found fewer operands than it pops
    #[error("not enough arguments supplied to the '{op}' operation")]
    Arity { op: &'static str },

    /// A math-function call's argument-count marker did not match
    #[error("expected {expected} argument(s) to the supplied math function")]
    FnArity { expected: u8 },

    /// A math-function call found too few cells on the stack
    #[error("supplied math function requires at least {required} elements on the stack")]
    FnDepth { required: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message_names_operator() {
        let err = EvalError::Arity { op: "add" };
        assert_eq!(
            err.to_string(),
            "not enough arguments supplied to the 'add' operation"
        );
    }

    #[test]
    fn test_fn_arity_message() {
        let err = EvalError::FnArity { expected: 2 };
        assert_eq!(
            err.to_string(),
            "expected 2 argument(s) to the supplied math function"
        );
    }

    #[test]
    fn test_fn_depth_message() {
        let err = EvalError::FnDepth { required: 3 };
        assert_eq!(
            err.to_string(),
            "supplied math function requires at least 3 elements on the stack"
        );
    }

    #[test]
    fn test_is_std_error() {
        let err = EvalError::Arity { op: "mul" };
        let _: &dyn std::error::Error = &err;
    }
}
