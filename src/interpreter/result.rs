//! Execution results consumed by callers
//!
//! An [`InterpreterResult`] is an immutable snapshot of a run: its
//! [`ExitCode`] flags, the final [`Tape`], the output text, timing, the
//! cumulative operation count, an optional [`ExecutionTrace`] and the list of
//! functions the script defined.
//!
//! # Exit Codes
//!
//! The exit code is a set of independent flags. Exactly one of
//! [`ExitCode::SUCCESS`] / [`ExitCode::FAILURE`] is always present, as is
//! exactly one of [`ExitCode::NO_OUTPUT`] / [`ExitCode::TEXT_OUTPUT`]; the
//! remaining flags add context. Consumers test membership with
//! [`ExitCode::contains`] rather than comparing for equality.

use crate::memory::Tape;
use bitflags::bitflags;
use std::time::Duration;

bitflags! {
    /// Outcome flags of a run
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExitCode: u32 {
        const SUCCESS = 1 << 0;
        const FAILURE = 1 << 1;
        const NO_OUTPUT = 1 << 2;
        const TEXT_OUTPUT = 1 << 3;
        const BREAKPOINT_REACHED = 1 << 4;
        const EXCEPTION_THROWN = 1 << 5;
        const THRESHOLD_EXCEEDED = 1 << 6;
        const MISMATCHED_PARENTHESES = 1 << 7;
        const NO_CODE_INTERPRETED = 1 << 8;
        const UPPER_BOUND_EXCEEDED = 1 << 9;
        const LOWER_BOUND_EXCEEDED = 1 << 10;
        const MAX_VALUE_EXCEEDED = 1 << 11;
        const NEGATIVE_VALUE = 1 << 12;
        const STDOUT_BUFFER_LIMIT_EXCEEDED = 1 << 13;
        const STDIN_BUFFER_EXHAUSTED = 1 << 14;
        const DUPLICATE_FUNCTION_DEFINITION = 1 << 15;
        const FUNCTIONS_LIMIT_EXCEEDED = 1 << 16;
        const UNDEFINED_FUNCTION_CALLED = 1 << 17;
        const CALL_DEPTH_EXCEEDED = 1 << 18;
    }
}

impl ExitCode {
    pub fn is_success(self) -> bool {
        self.contains(ExitCode::SUCCESS)
    }

    pub fn is_failure(self) -> bool {
        self.contains(ExitCode::FAILURE)
    }

    /// Add the output flag matching the given output text
    pub(crate) fn with_output(self, output: &str) -> Self {
        if output.is_empty() {
            self | ExitCode::NO_OUTPUT
        } else {
            self | ExitCode::TEXT_OUTPUT
        }
    }

    /// Names of the set flags, for display
    pub fn labels(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

/// Stack of source fragments active when a run stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTrace {
    /// Innermost frame first; each frame is the operator text interpreted
    /// so far at that nesting level, up to and including the current one
    pub frames: Vec<String>,
    /// Offset of the operator that failed or hit the breakpoint
    pub offset: usize,
}

/// A function defined by a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    /// Cell value the function is bound to
    pub key: u16,
    /// Offset of the first operator of the body
    pub offset: usize,
    pub body: String,
}

/// Immutable outcome of a run or session step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterResult {
    pub exit_code: ExitCode,
    pub tape: Tape,
    pub output: String,
    /// The executable operators of the script
    pub source: String,
    /// Wall-clock time, including time carried over from earlier session steps
    pub elapsed: Duration,
    pub total_operations: u64,
    pub trace: Option<ExecutionTrace>,
    /// Offset of the breakpoint that paused the run
    pub breakpoint: Option<usize>,
    /// Defined functions, sorted by key
    pub functions: Vec<FunctionDefinition>,
}

impl InterpreterResult {
    /// A result for a script that never started executing
    pub(crate) fn not_started(exit_code: ExitCode, tape: Tape, source: String) -> Self {
        InterpreterResult {
            exit_code: exit_code.with_output(""),
            tape,
            output: String::new(),
            source,
            elapsed: Duration::ZERO,
            total_operations: 0,
            trace: None,
            breakpoint: None,
            functions: Vec::new(),
        }
    }

    pub fn has_flag(&self, flag: ExitCode) -> bool {
        self.exit_code.contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_flag() {
        assert!(ExitCode::SUCCESS.with_output("").contains(ExitCode::NO_OUTPUT));
        assert!(ExitCode::SUCCESS.with_output("x").contains(ExitCode::TEXT_OUTPUT));
    }

    #[test]
    fn test_labels() {
        let code = ExitCode::SUCCESS | ExitCode::BREAKPOINT_REACHED;
        assert_eq!(code.labels(), vec!["SUCCESS", "BREAKPOINT_REACHED"]);
    }

    #[test]
    fn test_not_started() {
        let result = InterpreterResult::not_started(
            ExitCode::FAILURE | ExitCode::NO_CODE_INTERPRETED,
            Tape::new(4),
            String::new(),
        );
        assert!(result.exit_code.is_failure());
        assert!(result.has_flag(ExitCode::NO_OUTPUT));
        assert_eq!(result.total_operations, 0);
        assert!(result.trace.is_none());
    }
}
