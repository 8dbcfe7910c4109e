//! Execution engine
//!
//! [`execute`] interprets a validated token stream against an
//! [`ExecutionState`]. Every body being interpreted (the top level, a loop
//! body or a called function) is a [`Level`] on an explicit stack held on
//! the heap, so neither source nesting nor data-driven recursion through `:`
//! consumes Rust stack. Calls are refused past
//! [`CALL_DEPTH_LIMIT`](super::constants::CALL_DEPTH_LIMIT) levels.
//!
//! # Breakpoints and Resumption
//!
//! Reaching an offset in the breakpoint set suspends the run *before* that
//! operator executes. The suspension records the index every level had
//! reached; the resulting [`ResumePoint`] is all that survives of the
//! control-flow position. Continuing re-enters the levels along the recorded
//! path (a `[` into its body, a `:` into the recorded callee) without
//! executing anything, and resumes real interpretation at the breakpoint
//! itself. The tape, the buffers and the function table live in the
//! [`ExecutionState`] and are never rebuilt.
//!
//! # Operation Counting
//!
//! Every executed operator counts once, except `(` and `)` which count
//! nothing. A failing operator is not counted, but a `[` or `:` whose body
//! fails is. The `[-]` idiom is resolved in closed form with the same count a
//! step-by-step run would produce.

use super::constants::{BYTE_MAX, CALL_DEPTH_LIMIT, SHORT_MAX};
use super::errors::RuntimeError;
use super::functions::FunctionTable;
use super::loops::{function_body, loop_body, reset_idiom};
use super::result::{ExecutionTrace, ExitCode, InterpreterResult};
use crate::memory::{OverflowMode, Stdin, Stdout, Tape};
use crate::parser::lexer::{render, Token};
use crate::parser::Operator;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Mutable state carried across the steps of a session
#[derive(Debug, Clone)]
pub(crate) struct ExecutionState {
    pub(crate) tape: Tape,
    pub(crate) stdin: Stdin,
    pub(crate) stdout: Stdout,
    pub(crate) functions: FunctionTable,
    pub(crate) mode: OverflowMode,
    /// Operations executed by all previous steps
    pub(crate) operations: u64,
    /// Wall-clock time spent by all previous steps
    pub(crate) elapsed: Duration,
}

impl ExecutionState {
    pub(crate) fn new(tape: Tape, input: &str, mode: OverflowMode) -> Self {
        ExecutionState {
            tape,
            stdin: Stdin::new(input),
            stdout: Stdout::new(),
            functions: FunctionTable::new(),
            mode,
            operations: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// One nesting level of a suspended run
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResumeFrame {
    /// Index of the operator reached within this level's body
    pub(crate) index: usize,
    /// Function entered through the `:` at `index`
    pub(crate) callee: Option<u16>,
}

/// Control-flow position of a run paused at a breakpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResumePoint {
    /// Offset of the breakpoint operator
    pub(crate) offset: usize,
    /// Outermost level first; the last frame points at the breakpoint
    pub(crate) frames: Vec<ResumeFrame>,
}

/// Per-run parameters of [`execute`]
#[derive(Debug, Default)]
pub(crate) struct RunOptions<'a> {
    pub(crate) breakpoints: Option<&'a FxHashSet<usize>>,
    pub(crate) time_budget: Option<Duration>,
    pub(crate) resume: Option<ResumePoint>,
}

/// Outcome of one call to [`execute`]
#[derive(Debug)]
pub(crate) struct Step {
    pub(crate) result: InterpreterResult,
    /// Where to continue from when the run paused at a breakpoint
    pub(crate) resume: Option<ResumePoint>,
}

/// A body being interpreted
///
/// `code[start..end]` is the body; `index` is absolute within `code`. A loop
/// body shares its enclosing level's `code` and ends with its `]`.
struct Level {
    code: Arc<[Token]>,
    start: usize,
    end: usize,
    index: usize,
    /// Where the enclosing level continues once this one finishes
    return_to: usize,
    /// Function this level was entered through
    callee: Option<u16>,
}

impl Level {
    fn top(code: Arc<[Token]>) -> Self {
        let end = code.len();
        Level {
            code,
            start: 0,
            end,
            index: 0,
            return_to: 0,
            callee: None,
        }
    }

    /// The body of the loop opened at `open` in `parent`
    fn loop_in(parent: &Level, open: usize) -> Self {
        let close = open + loop_body(&parent.code, open).len();
        Level {
            code: Arc::clone(&parent.code),
            start: open + 1,
            end: close + 1,
            index: open + 1,
            return_to: close + 1,
            callee: None,
        }
    }

    fn call(body: Arc<[Token]>, key: u16, return_to: usize) -> Self {
        let end = body.len();
        Level {
            code: body,
            start: 0,
            end,
            index: 0,
            return_to,
            callee: Some(key),
        }
    }

    fn frame(&self, callee: Option<u16>) -> Frame {
        Frame::at(&self.code[self.start..self.end], self.index - self.start, callee)
    }
}

enum Halt {
    Breakpoint,
    Fault(RuntimeError),
}

/// What one nesting level had reached when the run stopped
struct Frame {
    fragment: String,
    last_offset: Option<usize>,
    index: usize,
    callee: Option<u16>,
}

impl Frame {
    fn at(tokens: &[Token], index: usize, callee: Option<u16>) -> Self {
        Frame {
            fragment: render(&tokens[..=index]),
            last_offset: Some(tokens[index].offset),
            index,
            callee,
        }
    }

    /// Stands in for a level the deadline fired on before it reached anything
    fn empty() -> Self {
        Frame {
            fragment: String::new(),
            last_offset: None,
            index: 0,
            callee: None,
        }
    }
}

/// A run stopping at a breakpoint or a failure, innermost frame first
struct Interrupt {
    halt: Halt,
    frames: Vec<Frame>,
}

impl Interrupt {
    fn offset(&self) -> usize {
        self.frames
            .iter()
            .find_map(|f| f.last_offset)
            .unwrap_or_default()
    }

    fn trace(&self) -> ExecutionTrace {
        ExecutionTrace {
            frames: self.frames.iter().map(|f| f.fragment.clone()).collect(),
            offset: self.offset(),
        }
    }

    fn resume_point(&self) -> ResumePoint {
        ResumePoint {
            offset: self.offset(),
            frames: self
                .frames
                .iter()
                .rev()
                .map(|f| ResumeFrame {
                    index: f.index,
                    callee: f.callee,
                })
                .collect(),
        }
    }
}

fn is_breakpoint(breakpoints: Option<&FxHashSet<usize>>, offset: usize) -> bool {
    breakpoints.is_some_and(|b| b.contains(&offset))
}

struct Engine<'a> {
    state: &'a mut ExecutionState,
    breakpoints: Option<&'a FxHashSet<usize>>,
    stopwatch: Instant,
    deadline: Option<Duration>,
    resume: Option<ResumePoint>,
    stack: Vec<Level>,
}

impl Engine<'_> {
    /// `innermost` followed by the frames of the `outer` outermost levels
    fn unwind(&self, innermost: Frame, outer: usize) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(outer + 1);
        frames.push(innermost);
        for depth in (0..outer).rev() {
            let callee = self.stack.get(depth + 1).and_then(|l| l.callee);
            frames.push(self.stack[depth].frame(callee));
        }
        frames
    }

    /// Stop at the operator the innermost level is on
    fn halt(&self, halt: Halt) -> Interrupt {
        let Some(level) = self.stack.last() else {
            return Interrupt {
                halt,
                frames: vec![Frame::empty()],
            };
        };
        Interrupt {
            halt,
            frames: self.unwind(level.frame(None), self.stack.len() - 1),
        }
    }

    fn fault(&self, error: RuntimeError) -> Interrupt {
        self.halt(Halt::Fault(error))
    }

    /// Checked whenever a level is entered or a loop repeats
    ///
    /// An overrun replaces the innermost level with an empty frame.
    fn check_deadline(&self) -> Result<(), Interrupt> {
        match self.deadline {
            Some(deadline) if self.stopwatch.elapsed() > deadline => Err(Interrupt {
                halt: Halt::Fault(RuntimeError::ThresholdExceeded),
                frames: self.unwind(Frame::empty(), self.stack.len().saturating_sub(1)),
            }),
            _ => Ok(()),
        }
    }

    fn enter(&mut self, level: Level) -> Result<(), Interrupt> {
        self.stack.push(level);
        self.check_deadline()
    }

    fn leave(&mut self) {
        if let Some(done) = self.stack.pop() {
            if let Some(parent) = self.stack.last_mut() {
                parent.index = done.return_to;
            }
        }
    }

    /// Re-enter the levels of the pending resume path, executing nothing
    ///
    /// Returns whether the breakpoint check applies to the first operator.
    fn replay(&mut self) -> Result<bool, Interrupt> {
        let Some(point) = self.resume.take() else {
            return Ok(true);
        };
        debug!(offset = point.offset, depth = point.frames.len(), "resuming at breakpoint");

        let Some((target, path)) = point.frames.split_last() else {
            return Ok(true);
        };
        for frame in path {
            let Some(level) = self.stack.last_mut() else {
                break;
            };
            let i = level.start + frame.index;
            level.index = i;
            let child = match (level.code[i].op, frame.callee) {
                (Operator::LoopStart, _) => Level::loop_in(level, i),
                (Operator::FunctionCall, Some(key)) => {
                    let Some(body) = self.state.functions.get(key) else {
                        return Err(self.fault(RuntimeError::UndefinedFunctionCalled { key }));
                    };
                    Level::call(body, key, i + 1)
                }
                (op, _) => unreachable!("resume path cannot pass through {op}"),
            };
            self.enter(child)?;
        }
        if let Some(level) = self.stack.last_mut() {
            level.index = level.start + target.index;
        }
        Ok(false)
    }

    /// Interpret `tokens` until the stack of levels empties
    fn run(&mut self, tokens: Arc<[Token]>) -> Result<(), Interrupt> {
        self.enter(Level::top(tokens))?;
        // False only for the operator a resumed run stopped at
        let mut armed = self.replay()?;

        while let Some(level) = self.stack.last_mut() {
            if level.index == level.end {
                self.leave();
                continue;
            }
            let i = level.index;
            let token = level.code[i];
            if armed && is_breakpoint(self.breakpoints, token.offset) {
                return Err(self.halt(Halt::Breakpoint));
            }
            armed = true;

            match token.op {
                Operator::LoopStart => {
                    let value = self.state.tape.current_value();
                    if value == 0 {
                        self.state.operations += 1;
                        level.index += loop_body(&level.code, i).len() + 1;
                        continue;
                    }
                    if let Some((minus, end)) = reset_idiom(&level.code, i) {
                        if !is_breakpoint(self.breakpoints, minus)
                            && !is_breakpoint(self.breakpoints, end)
                        {
                            self.state.operations += 2 * u64::from(value) + 1;
                            self.state.tape.reset_to_zero();
                            level.index += 3;
                            continue;
                        }
                    }
                    self.state.operations += 1;
                    let body = Level::loop_in(level, i);
                    self.enter(body)?;
                }
                Operator::LoopEnd => {
                    self.state.operations += 1;
                    if self.state.tape.current_value() == 0 {
                        self.leave();
                    } else {
                        level.index = level.start;
                        self.check_deadline()?;
                    }
                }
                Operator::FunctionStart => {
                    let body = function_body(&level.code, i);
                    let len = body.len();
                    let key = self.state.tape.current_value();
                    if let Err(error) = self.state.functions.define(key, body) {
                        return Err(self.fault(error));
                    }
                    trace!(key, offset = token.offset, "function defined");
                    level.index += len + 2;
                }
                Operator::FunctionEnd => level.index += 1,
                Operator::FunctionCall => {
                    let key = self.state.tape.current_value();
                    let Some(body) = self.state.functions.get(key) else {
                        return Err(self.fault(RuntimeError::UndefinedFunctionCalled { key }));
                    };
                    if self.stack.len() >= CALL_DEPTH_LIMIT {
                        return Err(self.fault(RuntimeError::CallDepthExceeded));
                    }
                    self.state.operations += 1;
                    self.enter(Level::call(body, key, i + 1))?;
                }
                op => {
                    if let Err(error) = apply(self.state, op) {
                        return Err(self.fault(error));
                    }
                    self.state.operations += 1;
                    level.index += 1;
                }
            }
        }
        Ok(())
    }
}

/// Execute a single cell, pointer or I/O operator
fn apply(state: &mut ExecutionState, op: Operator) -> Result<(), RuntimeError> {
    let ExecutionState {
        tape,
        stdin,
        stdout,
        mode,
        ..
    } = state;

    match op {
        Operator::MoveNext => {
            if !tape.can_move_next() {
                return Err(RuntimeError::UpperBoundExceeded);
            }
            tape.move_next();
        }
        Operator::MoveBack => {
            if !tape.can_move_back() {
                return Err(RuntimeError::LowerBoundExceeded);
            }
            tape.move_back();
        }
        Operator::Plus => {
            if *mode == OverflowMode::ByteOverflow && tape.is_at_byte_max() {
                tape.set(0);
            } else if tape.can_increment() {
                tape.increment();
            } else {
                return Err(RuntimeError::MaxValueExceeded);
            }
        }
        Operator::Minus => {
            if tape.can_decrement() {
                tape.decrement();
            } else if *mode == OverflowMode::ByteOverflow {
                tape.set(BYTE_MAX);
            } else {
                return Err(RuntimeError::NegativeValue);
            }
        }
        Operator::PrintChar => {
            if !stdout.can_write() {
                return Err(RuntimeError::StdoutBufferLimitExceeded);
            }
            stdout.write(tape.current_as_char());
        }
        Operator::ReadChar => {
            let c = stdin.read().ok_or(RuntimeError::StdinBufferExhausted)?;
            let code = u32::from(c);
            match mode {
                OverflowMode::ShortNoOverflow => {
                    let value = u16::try_from(code)
                        .ok()
                        .filter(|&v| v <= SHORT_MAX)
                        .ok_or(RuntimeError::NegativeValue)?;
                    tape.set(value);
                }
                OverflowMode::ByteOverflow => tape.set((code % 256) as u16),
            }
        }
        _ => unreachable!("{op} is not a cell operator"),
    }
    Ok(())
}

/// Run `tokens` against `state` until completion, a breakpoint or a failure
///
/// # Panics
///
/// Panics if `tokens` is empty, or if `options.resume` does not describe a
/// position inside `tokens`.
pub(crate) fn execute(
    state: &mut ExecutionState,
    tokens: &[Token],
    options: RunOptions<'_>,
) -> Step {
    assert!(!tokens.is_empty(), "cannot execute an empty token stream");

    let carried = state.elapsed;
    let mut engine = Engine {
        state: &mut *state,
        breakpoints: options.breakpoints,
        stopwatch: Instant::now(),
        deadline: options.time_budget.map(|budget| budget + carried),
        resume: options.resume,
        stack: Vec::new(),
    };
    let outcome = engine.run(Arc::from(tokens));
    let elapsed = engine.stopwatch.elapsed();
    state.elapsed = carried + elapsed;

    let (exit_code, trace, resume) = match outcome {
        Ok(()) => {
            debug!(operations = state.operations, "run completed");
            (ExitCode::SUCCESS, None, None)
        }
        Err(interrupt) => match &interrupt.halt {
            Halt::Breakpoint => {
                let point = interrupt.resume_point();
                debug!(offset = point.offset, depth = point.frames.len(), "breakpoint reached");
                (
                    ExitCode::SUCCESS | ExitCode::BREAKPOINT_REACHED,
                    Some(interrupt.trace()),
                    Some(point),
                )
            }
            Halt::Fault(error) => {
                warn!(%error, offset = interrupt.offset(), "run failed");
                (error.exit_code(), Some(interrupt.trace()), None)
            }
        },
    };

    let output = state.stdout.as_str().to_owned();
    let result = InterpreterResult {
        exit_code: exit_code.with_output(&output),
        tape: state.tape.clone(),
        output,
        source: render(tokens),
        elapsed: state.elapsed,
        total_operations: state.operations,
        trace,
        breakpoint: resume.as_ref().map(|p| p.offset),
        functions: state.functions.definitions(),
    };
    Step { result, resume }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn state(input: &str) -> ExecutionState {
        ExecutionState::new(Tape::new(8), input, OverflowMode::ShortNoOverflow)
    }

    fn run_with(state: &mut ExecutionState, source: &str, breakpoints: &[usize]) -> Step {
        let tokens = tokenize(source);
        let breakpoints: FxHashSet<usize> = breakpoints.iter().copied().collect();
        execute(
            state,
            &tokens,
            RunOptions {
                breakpoints: Some(&breakpoints),
                ..RunOptions::default()
            },
        )
    }

    fn resume(state: &mut ExecutionState, source: &str, breakpoints: &[usize], point: ResumePoint) -> Step {
        let tokens = tokenize(source);
        let breakpoints: FxHashSet<usize> = breakpoints.iter().copied().collect();
        execute(
            state,
            &tokens,
            RunOptions {
                breakpoints: Some(&breakpoints),
                resume: Some(point),
                ..RunOptions::default()
            },
        )
    }

    #[test]
    fn test_function_calls_count_body_operations() {
        let mut state = state("");
        let step = run_with(&mut state, "(+++):>:", &[]);
        assert!(step.result.exit_code.is_success());
        assert_eq!(step.result.total_operations, 9);
        assert_eq!(step.result.tape.cells()[..2], [3, 3]);
        assert_eq!(step.result.functions.len(), 1);
        assert_eq!(step.result.functions[0].body, "+++");
    }

    #[test]
    fn test_breakpoint_inside_loop_pauses_every_iteration() {
        let source = "+++[>+<-]";
        let mut state = state("");
        let mut step = run_with(&mut state, source, &[4]);
        assert_eq!(step.result.total_operations, 4);
        assert_eq!(step.result.breakpoint, Some(4));

        let mut pauses = 1;
        while let Some(point) = step.resume.take() {
            step = resume(&mut state, source, &[4], point);
            if step.resume.is_some() {
                pauses += 1;
            }
        }
        assert_eq!(pauses, 3);
        assert_eq!(step.result.total_operations, 19);
        assert_eq!(step.result.tape.cells()[..2], [0, 3]);
        assert!(!step.result.exit_code.contains(ExitCode::BREAKPOINT_REACHED));
    }

    #[test]
    fn test_resume_inside_called_function() {
        // The breakpoint sits inside the body and is only reached via `:`
        let source = "++(>+-)>++:";
        let mut state = state("");
        let step = run_with(&mut state, source, &[5]);
        assert_eq!(step.result.tape.current_value(), 1);
        let point = step.resume.expect("paused");
        assert_eq!(point.frames.len(), 2);
        assert_eq!(point.frames[0].callee, Some(2));

        let step = resume(&mut state, source, &[5], point);
        assert!(step.resume.is_none());
        assert_eq!(step.result.tape.current_value(), 0);
        assert_eq!(step.result.total_operations, 9);
    }

    #[test]
    fn test_reset_idiom_honours_breakpoints() {
        let mut plain = state("");
        let step = run_with(&mut plain, "+++[-]", &[]);
        assert_eq!(step.result.total_operations, 10);

        let mut guarded = state("");
        let step = run_with(&mut guarded, "+++[-]", &[5]);
        assert_eq!(step.result.breakpoint, Some(5));
        assert_eq!(step.result.tape.current_value(), 2);
        assert_eq!(step.result.total_operations, 5);
    }

    #[test]
    fn test_failure_trace_is_innermost_first() {
        let mut state = state("");
        let step = run_with(&mut state, "+[>+:]", &[]);
        let result = step.result;
        assert!(result.exit_code.contains(ExitCode::UNDEFINED_FUNCTION_CALLED));
        let trace = result.trace.expect("trace");
        assert_eq!(trace.frames, vec![">+:".to_string(), "+[".to_string()]);
        assert_eq!(trace.offset, 4);
        assert_eq!(result.total_operations, 4);
    }

    #[test]
    fn test_deadline_stops_endless_loop() {
        let mut state = state("");
        let tokens = tokenize("+[]");
        let step = execute(
            &mut state,
            &tokens,
            RunOptions {
                time_budget: Some(Duration::from_millis(5)),
                ..RunOptions::default()
            },
        );
        let result = step.result;
        assert_eq!(
            result.exit_code,
            ExitCode::FAILURE | ExitCode::THRESHOLD_EXCEEDED | ExitCode::NO_OUTPUT
        );
        let trace = result.trace.expect("trace");
        assert!(trace.frames[0].is_empty());
        assert_eq!(trace.offset, 1);
    }

    #[test]
    fn test_byte_mode_wraps_and_reduces_input() {
        let mut state = ExecutionState::new(Tape::new(2), "\u{101}", OverflowMode::ByteOverflow);
        let step = run_with(&mut state, "->,", &[]);
        assert!(step.result.exit_code.is_success());
        assert_eq!(step.result.tape.cells(), &[255, 1]);
    }

    #[test]
    fn test_short_mode_rejects_wide_input() {
        let mut state = state("\u{8000}");
        let step = run_with(&mut state, ",", &[]);
        assert!(step.result.exit_code.contains(ExitCode::NEGATIVE_VALUE));
        assert_eq!(step.result.total_operations, 0);
    }
}
