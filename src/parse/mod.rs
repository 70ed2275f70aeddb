pub mod arith;
pub mod dice;
pub mod lexer;

pub use lexer::{Token, TokenKind, TokenStream};
