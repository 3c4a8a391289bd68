//! Lexer module for tokenizing ChocoPy source code

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
