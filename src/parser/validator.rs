//! Structural validation of PBrain source code
//!
//! Two independent balance checks run before anything is executed:
//!
//! 1. **Function balance**: `(` and `)` alternate strictly, so functions cannot
//!    nest, every `)` closes an open `(`, every `(` is closed, and a body must
//!    contain at least one operator.
//! 2. **Loop balance**: `[`/`]` nest correctly inside every function body on
//!    its own, and across the top-level code outside function bodies.
//!
//! Errors are reported as a char index into the unfiltered source, the same
//! coordinate system used by [`Token::offset`](super::lexer::Token).

use super::ops::is_operator;

/// Outcome of [`check_syntax`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxValidation {
    pub valid: bool,
    /// Position of the first character that breaks balance, `0` when valid
    pub error_offset: usize,
}

impl SyntaxValidation {
    fn ok() -> Self {
        SyntaxValidation {
            valid: true,
            error_offset: 0,
        }
    }

    fn error(offset: usize) -> Self {
        SyntaxValidation {
            valid: false,
            error_offset: offset,
        }
    }
}

/// Check the bracket and parenthesis structure of a source string
pub fn check_syntax(source: &str) -> SyntaxValidation {
    let chars: Vec<char> = source.chars().collect();

    let bodies = match function_bodies(&chars) {
        Ok(bodies) => bodies,
        Err(offset) => return SyntaxValidation::error(offset),
    };

    if let Some(&(_, end)) = bodies.iter().find(|(start, end)| *end == start + 1) {
        return SyntaxValidation::error(end);
    }

    for &(start, end) in &bodies {
        let body = &chars[start + 1..end];
        if !body.iter().any(|&c| is_operator(c)) {
            return SyntaxValidation::error(end);
        }
        let indexed = body.iter().enumerate().map(|(i, &c)| (start + 1 + i, c));
        if let Err(offset) = check_loops(indexed) {
            return SyntaxValidation::error(offset);
        }
    }

    // Top-level code, with every function definition masked out
    let mut in_body = vec![false; chars.len()];
    for &(start, end) in &bodies {
        in_body[start..=end].fill(true);
    }
    let top_level = chars
        .iter()
        .enumerate()
        .filter(|(i, _)| !in_body[*i])
        .map(|(i, &c)| (i, c));

    match check_loops(top_level) {
        Ok(()) => SyntaxValidation::ok(),
        Err(offset) => SyntaxValidation::error(offset),
    }
}

/// Locate every `(`…`)` pair, enforcing single-level nesting
fn function_bodies(chars: &[char]) -> Result<Vec<(usize, usize)>, usize> {
    let mut bodies = Vec::new();
    let mut open: Option<usize> = None;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => {
                if open.is_some() {
                    return Err(i);
                }
                open = Some(i);
            }
            ')' => match open.take() {
                Some(start) => bodies.push((start, i)),
                None => return Err(i),
            },
            _ => {}
        }
    }

    match open {
        Some(start) => Err(start),
        None => Ok(bodies),
    }
}

/// Loop balance over an indexed character stream
///
/// A dangling `]` is reported at its own position; an unclosed loop is
/// reported at the outermost `[` still open at the end.
fn check_loops(chars: impl Iterator<Item = (usize, char)>) -> Result<(), usize> {
    let mut height = 0usize;
    let mut outermost = 0;

    for (i, c) in chars {
        match c {
            '[' => {
                if height == 0 {
                    outermost = i;
                }
                height += 1;
            }
            ']' => {
                if height == 0 {
                    return Err(i);
                }
                height -= 1;
            }
            _ => {}
        }
    }

    if height == 0 {
        Ok(())
    } else {
        Err(outermost)
    }
}
