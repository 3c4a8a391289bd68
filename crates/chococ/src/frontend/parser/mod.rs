//! Parser module for ChocoPy

mod parser;

pub use parser::Parser;
