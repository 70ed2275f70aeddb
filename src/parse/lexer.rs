use crate::compare::CompareOp;
use logos::Logos;
use std::fmt;

/// Raw character classes. Everything the grammar does not know becomes an
/// identifier, so there is no hard lexing failure.
#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[0-9]+")]
    Number,
    #[regex(r"[<>=!]+")]
    CmpRun,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("(")]
    ParenLeft,
    #[token(")")]
    ParenRight,
    #[token("[")]
    BracketLeft,
    #[token("]")]
    BracketRight,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token("#")]
    Sharp,
    #[token(",")]
    Comma,
    #[regex(r"[A-Za-z]")]
    Letter,
    #[error]
    Error,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Number(i64),
    CmpOp(CompareOp),
    Plus,
    Minus,
    Asterisk,
    Slash,
    ParenLeft,
    ParenRight,
    BracketLeft,
    BracketRight,
    Question,
    At,
    Sharp,
    Comma,
    Identifier,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn eof() -> Self {
        Self {
            kind: TokenKind::Eof,
            text: "$".into(),
        }
    }

    /// True for an identifier token spelled exactly `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == name
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Token source with single-token lookahead over a command string.
///
/// The input is cut at the first space, so trailing chatter after a command
/// never reaches a parser.
pub struct TokenStream<'a> {
    lexer: logos::Lexer<'a, RawToken>,
    peeked: Option<Token>,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        let source = match source.find(' ') {
            Some(at) => &source[..at],
            None => source,
        };
        Self {
            lexer: RawToken::lexer(source),
            peeked: None,
        }
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.peeked.take() {
            return token;
        }
        self.scan()
    }

    pub fn peek(&mut self) -> &Token {
        if self.peeked.is_none() {
            let token = self.scan();
            self.peeked = Some(token);
        }
        self.peeked.as_ref().unwrap()
    }

    fn scan(&mut self) -> Token {
        let raw = match self.lexer.next() {
            Some(raw) => raw,
            None => return Token::eof(),
        };
        let text = self.lexer.slice();
        let (kind, text) = match raw {
            RawToken::Number => match text.parse() {
                Ok(value) => (TokenKind::Number(value), text.to_owned()),
                // Absurdly long digit runs degrade to identifiers.
                Err(_) => (TokenKind::Identifier, text.to_owned()),
            },
            RawToken::CmpRun => match CompareOp::from_run(text) {
                Some(op) => (TokenKind::CmpOp(op), text.to_owned()),
                None => (TokenKind::Identifier, text.to_owned()),
            },
            RawToken::Plus => (TokenKind::Plus, text.to_owned()),
            RawToken::Minus => (TokenKind::Minus, text.to_owned()),
            RawToken::Asterisk => (TokenKind::Asterisk, text.to_owned()),
            RawToken::Slash => (TokenKind::Slash, text.to_owned()),
            RawToken::ParenLeft => (TokenKind::ParenLeft, text.to_owned()),
            RawToken::ParenRight => (TokenKind::ParenRight, text.to_owned()),
            RawToken::BracketLeft => (TokenKind::BracketLeft, text.to_owned()),
            RawToken::BracketRight => (TokenKind::BracketRight, text.to_owned()),
            RawToken::Question => (TokenKind::Question, text.to_owned()),
            RawToken::At => (TokenKind::At, text.to_owned()),
            RawToken::Sharp => (TokenKind::Sharp, text.to_owned()),
            RawToken::Comma => (TokenKind::Comma, text.to_owned()),
            RawToken::Letter | RawToken::Error => (TokenKind::Identifier, text.to_uppercase()),
        };
        Token { kind, text }
    }
}
