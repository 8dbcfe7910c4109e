//! Interpreter configuration supplied by callers

use super::constants::DEFAULT_TAPE_SIZE;
use super::errors::ConfigError;
use crate::memory::OverflowMode;
use std::time::Duration;

/// Settings shared by one-shot runs and sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub mode: OverflowMode,
    pub tape_size: usize,
    /// Wall-clock budget; `None` runs without a deadline
    pub time_budget: Option<Duration>,
}

impl InterpreterConfig {
    pub fn with_mode(mut self, mode: OverflowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tape_size(mut self, tape_size: usize) -> Self {
        self.tape_size = tape_size;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tape_size == 0 {
            return Err(ConfigError::EmptyTape);
        }
        if self.time_budget.is_some_and(|b| b.is_zero()) {
            return Err(ConfigError::ZeroTimeBudget);
        }
        Ok(())
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            mode: OverflowMode::ShortNoOverflow,
            tape_size: DEFAULT_TAPE_SIZE,
            time_budget: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = InterpreterConfig::default();
        assert_eq!(config.tape_size, 64);
        assert_eq!(config.mode, OverflowMode::ShortNoOverflow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let empty = InterpreterConfig::default().with_tape_size(0);
        assert_eq!(empty.validate(), Err(ConfigError::EmptyTape));

        let zero = InterpreterConfig::default().with_time_budget(Duration::ZERO);
        assert_eq!(zero.validate(), Err(ConfigError::ZeroTimeBudget));
    }
}
