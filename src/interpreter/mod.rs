//! PBrain execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Dispatcher over an explicit level stack, with breakpoint suspension and replay
//! - [`loops`]: Loop/function body extraction and the `[-]` idiom
//! - [`functions`]: The value-keyed function table
//! - [`config`]: Caller-supplied settings
//! - [`errors`]: Runtime failure kinds and API misuse errors
//! - [`result`]: The result and diagnostics model handed back to callers
//!
//! # Entry Points
//!
//! [`run`] executes a script once, without breakpoints. Stepwise execution
//! across breakpoints goes through [`Session`](crate::session::Session),
//! which shares the preflight checks below.
//!
//! # Preflight
//!
//! A script is first filtered: if no operator survives, the result is
//! `FAILURE | NO_CODE_INTERPRETED` and the tape is returned untouched. The
//! unfiltered text is then validated; a structural error produces
//! `FAILURE | MISMATCHED_PARENTHESES` with a trace pointing at the offending
//! character. Only a validated token stream ever reaches the engine.

pub mod config;
pub mod constants;
pub(crate) mod engine;
pub mod errors;
pub mod functions;
pub(crate) mod loops;
pub mod result;

pub use config::InterpreterConfig;
pub use errors::{ConfigError, RuntimeError, SessionError};
pub use result::{ExecutionTrace, ExitCode, FunctionDefinition, InterpreterResult};

use crate::memory::{OverflowMode, Tape};
use crate::parser::lexer::{find_operators, render, tokenize, Token};
use crate::parser::validator::check_syntax;
use engine::{execute, ExecutionState, RunOptions};

/// Execute `source` once on a fresh tape
pub fn run(
    source: &str,
    input: &str,
    config: &InterpreterConfig,
) -> Result<InterpreterResult, ConfigError> {
    config.validate()?;
    Ok(run_validated(source, input, Tape::new(config.tape_size), config))
}

/// Execute `source` once, starting from a copy of `tape`
///
/// The tape size in `config` is ignored; `tape` is never modified. Under
/// [`OverflowMode::ByteOverflow`] the copy's cells are reduced modulo 256
/// before the run starts.
pub fn run_with_tape(
    source: &str,
    input: &str,
    tape: &Tape,
    config: &InterpreterConfig,
) -> Result<InterpreterResult, ConfigError> {
    config.validate()?;
    let mut tape = tape.clone();
    if config.mode == OverflowMode::ByteOverflow {
        tape.wrap_to_bytes();
    }
    Ok(run_validated(source, input, tape, config))
}

fn run_validated(
    source: &str,
    input: &str,
    tape: Tape,
    config: &InterpreterConfig,
) -> InterpreterResult {
    let tokens = match preflight(source, tape.clone()) {
        Ok(tokens) => tokens,
        Err(result) => return result,
    };
    let mut state = ExecutionState::new(tape, input, config.mode);
    let options = RunOptions {
        time_budget: config.time_budget,
        ..RunOptions::default()
    };
    execute(&mut state, &tokens, options).result
}

/// Filter and validate `source`, or produce the result that ends the run
///
/// `tape` is only used to fill in the failure result.
pub(crate) fn preflight(source: &str, tape: Tape) -> Result<Vec<Token>, InterpreterResult> {
    if !find_operators(source) {
        return Err(InterpreterResult::not_started(
            ExitCode::FAILURE | ExitCode::NO_CODE_INTERPRETED,
            tape,
            String::new(),
        ));
    }

    let tokens = tokenize(source);
    let validation = check_syntax(source);
    if !validation.valid {
        let mut result = InterpreterResult::not_started(
            ExitCode::FAILURE | ExitCode::MISMATCHED_PARENTHESES,
            tape,
            render(&tokens),
        );
        result.trace = Some(ExecutionTrace {
            frames: Vec::new(),
            offset: validation.error_offset,
        });
        return Err(result);
    }
    Ok(tokens)
}
