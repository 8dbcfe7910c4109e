// Step history for moving back and forth between breakpoints

use crate::interpreter::InterpreterResult;
use thiserror::Error;

/// The history cannot hold another result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("history memory limit exceeded: {used} + {required} > {limit}")]
pub struct HistoryError {
    pub used: usize,
    pub required: usize,
    pub limit: usize,
}

/// Results of the steps taken so far, oldest first
#[derive(Debug)]
pub struct SessionHistory {
    results: Vec<InterpreterResult>,
    max_memory: usize,
    current_memory: usize,
}

impl SessionHistory {
    pub fn new(max_memory: usize) -> Self {
        SessionHistory {
            results: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a result to history
    pub fn push(&mut self, result: InterpreterResult) -> Result<(), HistoryError> {
        let size = estimated_size(&result);

        if self.current_memory + size > self.max_memory {
            return Err(HistoryError {
                used: self.current_memory,
                required: size,
                limit: self.max_memory,
            });
        }

        self.current_memory += size;
        self.results.push(result);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&InterpreterResult> {
        self.results.get(index)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

/// Rough number of bytes retained by a result
fn estimated_size(result: &InterpreterResult) -> usize {
    let tape = result.tape.len() * std::mem::size_of::<u16>();
    let text = result.output.len() + result.source.len();
    let trace = result
        .trace
        .as_ref()
        .map_or(0, |t| t.frames.iter().map(String::len).sum());
    let functions: usize = result.functions.iter().map(|f| f.body.len() + 16).sum();

    std::mem::size_of::<InterpreterResult>() + tape + text + trace + functions
}
