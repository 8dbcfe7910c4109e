//! Suspendable execution sessions
//!
//! A [`Session`] runs a script split into chunks, pausing at the first
//! operator of every chunk after the first. Each call to [`Session::resume`]
//! runs to the next breakpoint; [`Session::run_to_completion`] ignores any
//! remaining breakpoints. The tape, pending input, output, function table,
//! elapsed time and operation count all carry over between steps, so every
//! [`InterpreterResult`] a session produces is cumulative.
//!
//! - [`history`]: Bounded record of past results for backward navigation
//!
//! # Lifecycle
//!
//! ```text
//! initialize ──► paused ──resume──► paused ──► ... ──► completed / failed
//!      │                    └──run_to_completion──────┘
//!      └──(no code / structural error)──► terminated
//! ```
//!
//! Advancing takes `&mut self`, so a session can never be advanced from two
//! places at once. Independent sessions share nothing.

pub mod history;

use crate::interpreter::engine::{execute, ExecutionState, ResumePoint, RunOptions};
use crate::interpreter::{preflight, ConfigError, InterpreterConfig, InterpreterResult, SessionError};
use crate::memory::Tape;
use crate::parser::lexer::{tokenize_from, Token};
use rustc_hash::FxHashSet;
use std::time::Duration;
use tracing::debug;

pub use history::{HistoryError, SessionHistory};

/// A script being executed step by step
#[derive(Debug)]
pub struct Session {
    tokens: Vec<Token>,
    breakpoints: FxHashSet<usize>,
    time_budget: Option<Duration>,
    state: ExecutionState,
    resume: Option<ResumePoint>,
    result: InterpreterResult,
}

impl Session {
    /// Start executing `chunks` as one script, up to the first breakpoint
    ///
    /// Offsets refer to the concatenation of all chunks. A chunk without any
    /// operator contributes no breakpoint.
    pub fn initialize<S: AsRef<str>>(
        chunks: &[S],
        input: &str,
        config: &InterpreterConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let source: String = chunks.iter().map(AsRef::as_ref).collect();
        let tape = Tape::new(config.tape_size);
        let mut state = ExecutionState::new(tape.clone(), input, config.mode);

        let tokens = match preflight(&source, tape) {
            Ok(tokens) => tokens,
            Err(result) => {
                debug!(exit_code = ?result.exit_code, "session terminated before execution");
                return Ok(Session {
                    tokens: Vec::new(),
                    breakpoints: FxHashSet::default(),
                    time_budget: config.time_budget,
                    state,
                    resume: None,
                    result,
                });
            }
        };

        let breakpoints = chunk_breakpoints(chunks);
        debug!(
            chunks = chunks.len(),
            breakpoints = breakpoints.len(),
            operators = tokens.len(),
            "session initialized"
        );

        let step = execute(
            &mut state,
            &tokens,
            RunOptions {
                breakpoints: Some(&breakpoints),
                time_budget: config.time_budget,
                resume: None,
            },
        );
        Ok(Session {
            tokens,
            breakpoints,
            time_budget: config.time_budget,
            state,
            resume: step.resume,
            result: step.result,
        })
    }

    /// Run until the next breakpoint or the end of the script
    pub fn resume(&mut self) -> Result<(), SessionError> {
        let point = self.resume.take().ok_or(SessionError::Terminated)?;
        debug!(offset = point.offset, "continuing session");
        self.step(true, Some(point));
        Ok(())
    }

    /// Run to the end of the script, ignoring remaining breakpoints
    pub fn run_to_completion(&mut self) -> Result<(), SessionError> {
        let point = self.resume.take().ok_or(SessionError::Terminated)?;
        debug!(offset = point.offset, "running session to completion");
        self.step(false, Some(point));
        Ok(())
    }

    fn step(&mut self, use_breakpoints: bool, resume: Option<ResumePoint>) {
        let options = RunOptions {
            breakpoints: use_breakpoints.then_some(&self.breakpoints),
            time_budget: self.time_budget,
            resume,
        };
        let step = execute(&mut self.state, &self.tokens, options);
        self.resume = step.resume;
        self.result = step.result;
    }

    /// Whether the last step stopped at a breakpoint
    pub fn can_continue(&self) -> bool {
        self.resume.is_some()
    }

    /// Result of the most recent step
    pub fn result(&self) -> &InterpreterResult {
        &self.result
    }

    /// Breakpoint offsets, in ascending order
    pub fn breakpoints(&self) -> Vec<usize> {
        let mut offsets: Vec<usize> = self.breakpoints.iter().copied().collect();
        offsets.sort_unstable();
        offsets
    }
}

/// The offset of the first operator of every chunk after the first
fn chunk_breakpoints<S: AsRef<str>>(chunks: &[S]) -> FxHashSet<usize> {
    let mut breakpoints = FxHashSet::default();
    let mut base = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        let chunk = chunk.as_ref();
        if i > 0 {
            if let Some(first) = tokenize_from(chunk, base).first() {
                breakpoints.insert(first.offset);
            }
        }
        base += chunk.chars().count();
    }
    breakpoints
}
