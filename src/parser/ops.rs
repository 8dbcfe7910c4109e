//! The fixed operator table
//!
//! Brainfuck's eight operators plus the three PBrain function operators.
//! Any other character in a source file is a comment.

use std::fmt;

/// A single executable operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `>` move the pointer right
    MoveNext,
    /// `<` move the pointer left
    MoveBack,
    /// `+` increment the current cell
    Plus,
    /// `-` decrement the current cell
    Minus,
    /// `.` write the current cell to stdout
    PrintChar,
    /// `,` read one stdin character into the current cell
    ReadChar,
    /// `[` loop while the current cell is not zero
    LoopStart,
    /// `]` end of a loop body
    LoopEnd,
    /// `(` start of a function definition
    FunctionStart,
    /// `)` end of a function definition
    FunctionEnd,
    /// `:` call the function bound to the current cell value
    FunctionCall,
}

/// Every recognized operator character, in table order
pub const OPERATORS: [char; 11] = ['>', '<', '+', '-', '.', ',', '[', ']', '(', ')', ':'];

impl Operator {
    /// Classify a source character, returning `None` for comments
    pub fn from_char(c: char) -> Option<Self> {
        let op = match c {
            '>' => Operator::MoveNext,
            '<' => Operator::MoveBack,
            '+' => Operator::Plus,
            '-' => Operator::Minus,
            '.' => Operator::PrintChar,
            ',' => Operator::ReadChar,
            '[' => Operator::LoopStart,
            ']' => Operator::LoopEnd,
            '(' => Operator::FunctionStart,
            ')' => Operator::FunctionEnd,
            ':' => Operator::FunctionCall,
            _ => return None,
        };
        Some(op)
    }

    /// The source character for this operator
    pub fn as_char(self) -> char {
        match self {
            Operator::MoveNext => '>',
            Operator::MoveBack => '<',
            Operator::Plus => '+',
            Operator::Minus => '-',
            Operator::PrintChar => '.',
            Operator::ReadChar => ',',
            Operator::LoopStart => '[',
            Operator::LoopEnd => ']',
            Operator::FunctionStart => '(',
            Operator::FunctionEnd => ')',
            Operator::FunctionCall => ':',
        }
    }

    /// Whether this operator opens or closes a loop or function body
    pub fn is_bracket(self) -> bool {
        matches!(
            self,
            Operator::LoopStart
                | Operator::LoopEnd
                | Operator::FunctionStart
                | Operator::FunctionEnd
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Check whether a character is an executable operator
pub fn is_operator(c: char) -> bool {
    Operator::from_char(c).is_some()
}
