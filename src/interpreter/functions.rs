//! Value-keyed function table
//!
//! A `(` binds the value of the current cell to the body that follows it.
//! Bodies are stored as shared token slices so a call can recurse into one
//! while the table stays borrowed by the engine.

use super::constants::FUNCTION_DEFINITIONS_LIMIT;
use super::errors::RuntimeError;
use super::result::FunctionDefinition;
use crate::parser::lexer::{render, Token};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Functions defined so far by a running script
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    bodies: FxHashMap<u16, Arc<[Token]>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: u16) -> bool {
        self.bodies.contains_key(&key)
    }

    /// Bind `body` to `key`
    ///
    /// Redefinition is a failure rather than an overwrite, and is reported
    /// before the table size is considered.
    pub fn define(&mut self, key: u16, body: &[Token]) -> Result<(), RuntimeError> {
        if self.contains(key) {
            return Err(RuntimeError::DuplicateFunctionDefinition { key });
        }
        if self.bodies.len() == FUNCTION_DEFINITIONS_LIMIT {
            return Err(RuntimeError::FunctionsLimitExceeded);
        }
        debug_assert!(!body.is_empty(), "validated function bodies are never empty");
        self.bodies.insert(key, Arc::from(body));
        Ok(())
    }

    /// The body bound to `key`, if any
    pub fn get(&self, key: u16) -> Option<Arc<[Token]>> {
        self.bodies.get(&key).cloned()
    }

    /// All definitions, sorted by key
    pub fn definitions(&self) -> Vec<FunctionDefinition> {
        let mut definitions: Vec<FunctionDefinition> = self
            .bodies
            .iter()
            .map(|(&key, body)| FunctionDefinition {
                key,
                offset: body.first().map_or(0, |t| t.offset),
                body: render(body),
            })
            .collect();
        definitions.sort_by_key(|d| d.key);
        definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_define_and_get() {
        let mut table = FunctionTable::new();
        let body = tokenize("(+>-)");
        table.define(7, &body[1..4]).unwrap();

        assert!(table.contains(7));
        assert_eq!(render(&table.get(7).unwrap()), "+>-");
        assert!(table.get(8).is_none());
    }

    #[test]
    fn test_duplicate_definition() {
        let mut table = FunctionTable::new();
        let body = tokenize("+");
        table.define(1, &body).unwrap();
        assert_eq!(
            table.define(1, &body),
            Err(RuntimeError::DuplicateFunctionDefinition { key: 1 })
        );
        assert_eq!(table.definitions().len(), 1);
    }

    #[test]
    fn test_limit() {
        let mut table = FunctionTable::new();
        let body = tokenize("+");
        for key in 0..FUNCTION_DEFINITIONS_LIMIT as u16 {
            table.define(key, &body).unwrap();
        }
        assert_eq!(table.define(500, &body), Err(RuntimeError::FunctionsLimitExceeded));
        // Duplicates are still reported as such when the table is full
        assert_eq!(
            table.define(3, &body),
            Err(RuntimeError::DuplicateFunctionDefinition { key: 3 })
        );
    }

    #[test]
    fn test_definitions_sorted() {
        let mut table = FunctionTable::new();
        let tokens = tokenize("ab+-");
        table.define(9, &tokens[1..]).unwrap();
        table.define(2, &tokens[..1]).unwrap();

        let defs = table.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].key, 2);
        assert_eq!(defs[0].offset, 2);
        assert_eq!(defs[0].body, "+");
        assert_eq!(defs[1].key, 9);
        assert_eq!(defs[1].offset, 3);
        assert_eq!(defs[1].body, "-");
    }
}
