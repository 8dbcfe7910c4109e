//! C transliteration of PBrain scripts
//!
//! [`translate_to_c`] turns a validated script into a standalone C program
//! over `unsigned char array[size]` and a moving pointer. Loops become
//! `while (*ptr)` blocks. Every function body becomes a `static` C function;
//! the definition site registers it in a 256-slot table under the current
//! cell value, and `:` calls through that table.
//!
//! The generated program follows C semantics: cells wrap as bytes and
//! pointer bounds are not checked.

use crate::parser::lexer::{tokenize, Token};
use crate::parser::validator::check_syntax;
use crate::parser::Operator;
use thiserror::Error;

/// Reasons a script cannot be translated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("array size must be positive")]
    InvalidSize,

    #[error("source is not valid (error at offset {offset})")]
    InvalidSource { offset: usize },
}

/// Translate `source` into a C program with an array of `size` cells
pub fn translate_to_c(source: &str, size: usize) -> Result<String, TranslateError> {
    if size == 0 {
        return Err(TranslateError::InvalidSize);
    }
    let validation = check_syntax(source);
    if !validation.valid {
        return Err(TranslateError::InvalidSource {
            offset: validation.error_offset,
        });
    }

    let tokens = tokenize(source);
    let mut emitter = Emitter::default();
    let main = emitter.block(&tokens);

    let mut program = String::from("#include <stdio.h>\n\n");
    program.push_str(&format!("static unsigned char array[{size}];\n"));
    program.push_str("static unsigned char *ptr = array;\n");
    program.push_str("static void (*functions[256])(void);\n\n");
    for (index, body) in emitter.functions.iter().enumerate() {
        program.push_str(&format!("static void function_{index}(void)\n{{\n{body}}}\n\n"));
    }
    program.push_str(&format!("int main(void)\n{{\n{main}\treturn 0;\n}}\n"));
    Ok(program)
}

/// Collects the C functions hoisted out of the script
#[derive(Default)]
struct Emitter {
    functions: Vec<String>,
}

impl Emitter {
    /// Emit the statements of one C function body
    fn block(&mut self, tokens: &[Token]) -> String {
        let mut out = String::new();
        let mut depth = 1;
        let mut i = 0;
        while i < tokens.len() {
            let tabs = "\t".repeat(depth);
            match tokens[i].op {
                Operator::MoveNext => out.push_str(&format!("{tabs}++ptr;\n")),
                Operator::MoveBack => out.push_str(&format!("{tabs}--ptr;\n")),
                Operator::Plus => out.push_str(&format!("{tabs}++*ptr;\n")),
                Operator::Minus => out.push_str(&format!("{tabs}--*ptr;\n")),
                Operator::PrintChar => out.push_str(&format!("{tabs}putchar(*ptr);\n")),
                Operator::ReadChar => {
                    out.push_str(&format!("{tabs}while ((*ptr = getchar()) == '\\n') {{ }}\n"))
                }
                Operator::LoopStart => {
                    out.push_str(&format!("{tabs}while (*ptr) {{\n"));
                    depth += 1;
                }
                Operator::LoopEnd => {
                    depth -= 1;
                    out.push_str(&format!("{}}}\n", "\t".repeat(depth)));
                }
                Operator::FunctionStart => {
                    let len = tokens[i + 1..]
                        .iter()
                        .take_while(|t| t.op != Operator::FunctionEnd)
                        .count();
                    let body = self.block(&tokens[i + 1..i + 1 + len]);
                    let index = self.functions.len();
                    self.functions.push(body);
                    out.push_str(&format!("{tabs}functions[*ptr] = function_{index};\n"));
                    i += len + 1;
                }
                Operator::FunctionEnd => {}
                Operator::FunctionCall => {
                    out.push_str(&format!("{tabs}if (functions[*ptr]) functions[*ptr]();\n"))
                }
            }
            i += 1;
        }
        out
    }
}
