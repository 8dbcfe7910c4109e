//! Tokenizer for PBrain source code
//!
//! Strips every non-operator character and tags each surviving operator with
//! its position in the *unfiltered* source. Positions are char indices, so
//! the same offset can be used to report errors, match breakpoints and
//! highlight the source in the UI.

use super::ops::Operator;
use std::fmt;

/// An operator with its position in the original source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub offset: usize,
    pub op: Operator,
}

impl Token {
    pub fn new(offset: usize, op: Operator) -> Self {
        Token { offset, op }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.op, self.offset)
    }
}

/// Tokenize a complete source string
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_from(source, 0)
}

/// Tokenize a source fragment whose first character sits at `base_offset`
///
/// Used by sessions, where every chunk is filtered on its own but offsets
/// refer to the concatenation of all chunks.
pub fn tokenize_from(source: &str, base_offset: usize) -> Vec<Token> {
    source
        .chars()
        .enumerate()
        .filter_map(|(i, c)| Operator::from_char(c).map(|op| Token::new(base_offset + i, op)))
        .collect()
}

/// Check whether the source contains at least one executable operator
pub fn find_operators(source: &str) -> bool {
    source.chars().any(|c| Operator::from_char(c).is_some())
}

/// Render a token sequence back to operator text
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.op.as_char()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_comments() {
        let tokens = tokenize("a+b-\n[c]");
        assert_eq!(render(&tokens), "+-[]");
    }

    #[test]
    fn test_offsets_refer_to_unfiltered_source() {
        let tokens = tokenize("x + y > z");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::new(2, Operator::Plus));
        assert_eq!(tokens[1], Token::new(6, Operator::MoveNext));
    }

    #[test]
    fn test_offsets_are_char_indices() {
        // Multi-byte characters still count as a single position
        let tokens = tokenize("é+");
        assert_eq!(tokens[0].offset, 1);
    }

    #[test]
    fn test_base_offset() {
        let tokens = tokenize_from("--", 10);
        assert_eq!(tokens[0].offset, 10);
        assert_eq!(tokens[1].offset, 11);
    }

    #[test]
    fn test_find_operators() {
        assert!(find_operators("hello, world"));
        assert!(!find_operators("hello world"));
        assert!(!find_operators(""));
    }
}
