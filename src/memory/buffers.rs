//! Standard input and output buffers
//!
//! [`Stdin`] is the pending-input queue consumed by `,`; [`Stdout`] collects
//! the characters written by `.` up to
//! [`STDOUT_BUFFER_LIMIT`](crate::interpreter::constants::STDOUT_BUFFER_LIMIT).
//! Both live inside a session so that input consumed and output produced
//! before a breakpoint carry over to the next continuation.

use crate::interpreter::constants::STDOUT_BUFFER_LIMIT;
use std::collections::VecDeque;

/// Pending input characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stdin {
    pending: VecDeque<char>,
}

impl Stdin {
    pub fn new(input: &str) -> Self {
        Stdin {
            pending: input.chars().collect(),
        }
    }

    /// Dequeue the next character, if any
    pub fn read(&mut self) -> Option<char> {
        self.pending.pop_front()
    }
}

/// Output accumulator with a fixed character cap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stdout {
    text: String,
    len: usize,
}

impl Stdout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether another character fits under the cap
    pub fn can_write(&self) -> bool {
        self.len < STDOUT_BUFFER_LIMIT
    }

    pub fn write(&mut self, c: char) {
        debug_assert!(self.can_write());
        self.text.push(c);
        self.len += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
