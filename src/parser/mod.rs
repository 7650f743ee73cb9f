//! Lexing and parsing of C# test sources.
//!
//! [`parse`] produces a [`SourceDocument`]: the pristine text, the document
//! tree and a line index for diagnostics. Parsing never fails; input the
//! parser does not model is preserved verbatim.

pub mod document;
pub mod lexer;

pub use document::{parse, parse_call_expression, SourceDocument};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
