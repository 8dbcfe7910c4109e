//! Error types for the PBrain interpreter
//!
//! This module defines [`RuntimeError`], which represents every failure a
//! running script can hit (as opposed to structural errors, which are caught
//! by the validator before execution). Runtime errors never escape the engine
//! as `Err` values: they are folded into the [`ExitCode`] of the result.
//!
//! [`ConfigError`] and [`SessionError`] report misuse of the public API.

use super::result::ExitCode;
use thiserror::Error;

/// Failures detected while a script is running
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("pointer moved past the last cell")]
    UpperBoundExceeded,

    #[error("pointer moved before the first cell")]
    LowerBoundExceeded,

    #[error("cell value exceeded the maximum")]
    MaxValueExceeded,

    #[error("cell value would become negative or is out of range")]
    NegativeValue,

    #[error("stdout buffer limit exceeded")]
    StdoutBufferLimitExceeded,

    #[error("stdin buffer exhausted")]
    StdinBufferExhausted,

    #[error("function {key} is already defined")]
    DuplicateFunctionDefinition { key: u16 },

    #[error("too many function definitions")]
    FunctionsLimitExceeded,

    #[error("function {key} is not defined")]
    UndefinedFunctionCalled { key: u16 },

    #[error("function calls nested too deeply")]
    CallDepthExceeded,

    #[error("time budget exceeded")]
    ThresholdExceeded,
}

impl RuntimeError {
    /// The exit flags reported for this failure
    pub fn exit_code(&self) -> ExitCode {
        let specific = match self {
            RuntimeError::UpperBoundExceeded => ExitCode::UPPER_BOUND_EXCEEDED,
            RuntimeError::LowerBoundExceeded => ExitCode::LOWER_BOUND_EXCEEDED,
            RuntimeError::MaxValueExceeded => ExitCode::MAX_VALUE_EXCEEDED,
            RuntimeError::NegativeValue => ExitCode::NEGATIVE_VALUE,
            RuntimeError::StdoutBufferLimitExceeded => ExitCode::STDOUT_BUFFER_LIMIT_EXCEEDED,
            RuntimeError::StdinBufferExhausted => ExitCode::STDIN_BUFFER_EXHAUSTED,
            RuntimeError::DuplicateFunctionDefinition { .. } => {
                ExitCode::DUPLICATE_FUNCTION_DEFINITION
            }
            RuntimeError::FunctionsLimitExceeded => ExitCode::FUNCTIONS_LIMIT_EXCEEDED,
            RuntimeError::UndefinedFunctionCalled { .. } => ExitCode::UNDEFINED_FUNCTION_CALLED,
            RuntimeError::CallDepthExceeded => ExitCode::CALL_DEPTH_EXCEEDED,
            // Resource exhaustion is not an exception
            RuntimeError::ThresholdExceeded => {
                return ExitCode::FAILURE | ExitCode::THRESHOLD_EXCEEDED;
            }
        };
        ExitCode::FAILURE | ExitCode::EXCEPTION_THROWN | specific
    }
}

/// Invalid interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tape size must be positive")]
    EmptyTape,

    #[error("time budget must be positive")]
    ZeroTimeBudget,
}

/// Misuse of an execution session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session has terminated and cannot be continued")]
    Terminated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_flags() {
        let code = RuntimeError::UndefinedFunctionCalled { key: 3 }.exit_code();
        assert!(code.contains(ExitCode::FAILURE | ExitCode::EXCEPTION_THROWN));
        assert!(code.contains(ExitCode::UNDEFINED_FUNCTION_CALLED));
        assert!(!code.contains(ExitCode::SUCCESS));
    }

    #[test]
    fn test_threshold_is_not_an_exception() {
        let code = RuntimeError::ThresholdExceeded.exit_code();
        assert_eq!(code, ExitCode::FAILURE | ExitCode::THRESHOLD_EXCEEDED);
    }

    #[test]
    fn test_display() {
        let err = RuntimeError::DuplicateFunctionDefinition { key: 42 };
        assert_eq!(err.to_string(), "function 42 is already defined");
    }
}
