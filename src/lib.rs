//! # Introduction
//!
//! TapeTTY interprets Brainfuck extended with PBrain functions, and can pause
//! a script at breakpoints and resume it later.  A terminal debugger built
//! with [ratatui](https://docs.rs/ratatui) steps through a script between
//! breakpoints, showing the tape, the output and the function table.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Tokenizer → Validator → Engine → Result → (Session / History) → TUI
//! ```
//!
//! 1. [`parser`]: the operator table, tokenization with source offsets, and
//!    bracket/parenthesis validation.
//! 2. [`memory`]: the [`memory::Tape`] and the stdin/stdout buffers.
//! 3. [`interpreter`]: the recursive engine, the function table and the
//!    [`interpreter::InterpreterResult`] diagnostics model; [`interpreter::run`]
//!    is the one-shot entry point.
//! 4. [`session`]: suspendable runs split at chunk boundaries, plus a bounded
//!    history of past results.
//! 5. [`codegen`]: transliteration of a script into a C program.
//! 6. [`ui`]: ratatui-based debugger; not part of the stable library API.
//!
//! ## Language
//!
//! `>` `<` move the pointer, `+` `-` change the current cell, `.` `,` write
//! and read a character, `[` `]` loop while the current cell is non-zero.
//! `(` … `)` defines a function keyed by the current cell value and `:` calls
//! the function keyed by the current cell value. Any other character is a
//! comment.

pub mod codegen;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod session;
pub mod ui;
