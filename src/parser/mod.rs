//! PBrain source front end
//!
//! This module turns raw source text into an executable token stream:
//! - [`ops`]: The fixed operator table and character classifier
//! - [`lexer`]: Tokenization (source text → offset-tagged tokens)
//! - [`validator`]: Bracket/parenthesis balance checks
//!
//! # Source Model
//!
//! Every character that is not one of the eleven operators is a comment.
//! Tokens keep the char index of their operator in the unfiltered source, so
//! diagnostics and breakpoints can point back into the text the user wrote.

pub mod lexer;
pub mod ops;
pub mod validator;

pub use lexer::Token;
pub use ops::Operator;
pub use validator::{check_syntax, SyntaxValidation};
