//! Loop and function body extraction
//!
//! Both kinds of body are contiguous sub-slices of the token stream they
//! appear in, so the engine recurses into them without copying:
//! - a loop body runs from the token after `[` up to and *including* the
//!   matching `]`, which is the operator that decides whether to repeat
//! - a function body runs from the token after `(` up to but excluding `)`
//!
//! Both helpers assume validated input. An unmatched opener is a programming
//! error and panics.

use crate::parser::lexer::Token;
use crate::parser::Operator;

/// The body of the loop opened at `tokens[start]`, including its closing `]`
pub(crate) fn loop_body(tokens: &[Token], start: usize) -> &[Token] {
    debug_assert_eq!(tokens[start].op, Operator::LoopStart);
    let mut height = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(start + 1) {
        match token.op {
            Operator::LoopStart => height += 1,
            Operator::LoopEnd if height == 0 => return &tokens[start + 1..=i],
            Operator::LoopEnd => height -= 1,
            _ => {}
        }
    }
    panic!("loop opened at offset {} never closes", tokens[start].offset);
}

/// The body of the function defined at `tokens[start]`, excluding its `)`
pub(crate) fn function_body(tokens: &[Token], start: usize) -> &[Token] {
    debug_assert_eq!(tokens[start].op, Operator::FunctionStart);
    let end = tokens[start + 1..]
        .iter()
        .position(|t| t.op == Operator::FunctionEnd)
        .unwrap_or_else(|| {
            panic!("function opened at offset {} never closes", tokens[start].offset)
        });
    &tokens[start + 1..start + 1 + end]
}

/// Whether the loop opened at `tokens[start]` is the `[-]` reset idiom
///
/// Returns the offsets of the `-` and `]` so the caller can check them
/// against the breakpoint set before resolving the loop in closed form.
pub(crate) fn reset_idiom(tokens: &[Token], start: usize) -> Option<(usize, usize)> {
    match tokens.get(start + 1..start + 3) {
        Some([minus, end]) if minus.op == Operator::Minus && end.op == Operator::LoopEnd => {
            Some((minus.offset, end.offset))
        }
        _ => None,
    }
}
