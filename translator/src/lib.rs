//! ALG front-end: lexer, parser and code generator producing instruction
//! lists for the stack machine.

pub mod codegen;
pub mod lexer;
pub mod parser;

use std::fmt;

use stackharv_core::isa::Instr;

pub use codegen::{Codegen, CodegenError};
pub use lexer::LexError;
pub use parser::ParseError;

/// Any failure on the source-to-instructions path.
#[derive(Debug)]
pub enum TranslateError {
    Lex(LexError),
    Parse(ParseError),
    Codegen(CodegenError),
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "{e}"),
            Self::Codegen(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<LexError> for TranslateError {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<ParseError> for TranslateError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<CodegenError> for TranslateError {
    fn from(e: CodegenError) -> Self {
        Self::Codegen(e)
    }
}

/// Translate ALG source text into a complete program image (vector table
/// plus relocated code).
pub fn translate(src: &str) -> Result<Vec<Instr>, TranslateError> {
    let tokens = lexer::tokenize(src)?;
    let program = parser::Parser::new(tokens).parse()?;
    let code = Codegen::new().generate(&program)?;
    Ok(code)
}
