//! Pure integer arithmetic over command text.
//!
//! Grammar:
//!
//! ```text
//! add:   mul (('+' | '-') mul)*
//! mul:   unary (('*' | '/' round?) unary)*
//! round: 'U' | 'C' | 'R' | 'F'
//! unary: '+' unary | '-' unary | term
//! term:  '(' add ')' | NUMBER
//! ```

use super::lexer::{Token, TokenKind, TokenStream};
use enum_dispatch::enum_dispatch;

/// Fallback rounding for division without an explicit suffix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoundMode {
    Floor,
    Ceiling,
    Round,
}

/// Per-division rounding suffix. `U` and `C` both read as `Ceiling` and
/// render back as `C`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DivRounding {
    Default,
    Ceiling,
    Round,
    Floor,
}

impl DivRounding {
    fn suffix(self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Ceiling => "C",
            Self::Round => "R",
            Self::Floor => "F",
        }
    }

    fn resolve(self, fallback: RoundMode) -> RoundMode {
        match self {
            Self::Default => fallback,
            Self::Ceiling => RoundMode::Ceiling,
            Self::Round => RoundMode::Round,
            Self::Floor => RoundMode::Floor,
        }
    }
}

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("division by zero")]
pub struct DivideByZero;

/// Integer division with explicit rounding. `Floor` truncates toward zero,
/// `Round` breaks ties away from zero.
///
/// Wraps on `i64::MIN / -1`, like every other operation in the evaluator.
pub fn divide_rounded(dividend: i64, divisor: i64, mode: RoundMode) -> i64 {
    let quotient = dividend.wrapping_div(divisor);
    let remainder = dividend.wrapping_rem(divisor);
    let negative = (dividend < 0) != (divisor < 0);
    match mode {
        RoundMode::Floor => quotient,
        RoundMode::Ceiling => {
            if remainder != 0 && !negative {
                quotient + 1
            } else {
                quotient
            }
        }
        RoundMode::Round => {
            // Compared as u64 so doubling a near-i64::MAX remainder is exact.
            if remainder.unsigned_abs() * 2 >= divisor.unsigned_abs() {
                quotient + if negative { -1 } else { 1 }
            } else {
                quotient
            }
        }
    }
}

#[enum_dispatch]
pub trait ArithNode {
    fn eval(&self, round: RoundMode) -> Result<i64, DivideByZero>;

    /// Rebuilds the expression text for traces.
    fn render(&self) -> String;
}

#[enum_dispatch(ArithNode)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number,
    Negate,
    Binary,
    Divide,
    Parens,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number(pub i64);

impl ArithNode for Number {
    fn eval(&self, _round: RoundMode) -> Result<i64, DivideByZero> {
        Ok(self.0)
    }

    fn render(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negate(pub Box<Expr>);

impl ArithNode for Negate {
    fn eval(&self, round: RoundMode) -> Result<i64, DivideByZero> {
        Ok(self.0.eval(round)?.wrapping_neg())
    }

    fn render(&self) -> String {
        format!("-{}", self.0.render())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
}

impl BinOp {
    fn as_char(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub op: BinOp,
    pub right: Box<Expr>,
}

impl ArithNode for Binary {
    fn eval(&self, round: RoundMode) -> Result<i64, DivideByZero> {
        let left = self.left.eval(round)?;
        let right = self.right.eval(round)?;
        // Computed values wrap; only literals are range-checked, in the lexer.
        Ok(match self.op {
            BinOp::Add => left.wrapping_add(right),
            BinOp::Sub => left.wrapping_sub(right),
            BinOp::Mul => left.wrapping_mul(right),
        })
    }

    fn render(&self) -> String {
        format!(
            "{}{}{}",
            self.left.render(),
            self.op.as_char(),
            self.right.render()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divide {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub rounding: DivRounding,
}

impl ArithNode for Divide {
    fn eval(&self, round: RoundMode) -> Result<i64, DivideByZero> {
        let dividend = self.left.eval(round)?;
        let divisor = self.right.eval(round)?;
        if divisor == 0 {
            return Err(DivideByZero);
        }
        Ok(divide_rounded(dividend, divisor, self.rounding.resolve(round)))
    }

    fn render(&self) -> String {
        format!(
            "{}/{}{}",
            self.left.render(),
            self.right.render(),
            self.rounding.suffix()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parens(pub Box<Expr>);

impl ArithNode for Parens {
    fn eval(&self, round: RoundMode) -> Result<i64, DivideByZero> {
        self.0.eval(round)
    }

    fn render(&self) -> String {
        format!("({})", self.0.render())
    }
}

struct ParseFailed;

type PResult<T> = Result<T, ParseFailed>;

struct Parser<'a> {
    tokens: TokenStream<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        let mut tokens = TokenStream::new(source);
        let current = tokens.next_token();
        Self { tokens, current }
    }

    fn advance(&mut self) {
        self.current = self.tokens.next_token();
    }

    fn parse_add(&mut self) -> PResult<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            left = Expr::Binary(Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_mul(&mut self) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            match self.current.kind {
                TokenKind::Asterisk => {
                    self.advance();
                    let right = self.parse_unary()?;
                    left = Expr::Binary(Binary {
                        left: Box::new(left),
                        op: BinOp::Mul,
                        right: Box::new(right),
                    });
                }
                TokenKind::Slash => {
                    self.advance();
                    let right = self.parse_unary()?;
                    let rounding = self.parse_rounding();
                    left = Expr::Divide(Divide {
                        left: Box::new(left),
                        right: Box::new(right),
                        rounding,
                    });
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_rounding(&mut self) -> DivRounding {
        if self.current.kind == TokenKind::Identifier {
            let rounding = match self.current.text.as_str() {
                "U" | "C" => DivRounding::Ceiling,
                "R" => DivRounding::Round,
                "F" => DivRounding::Floor,
                _ => return DivRounding::Default,
            };
            self.advance();
            return rounding;
        }
        DivRounding::Default
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        match self.current.kind {
            TokenKind::Plus => {
                self.advance();
                self.parse_unary()
            }
            TokenKind::Minus => {
                self.advance();
                let body = self.parse_unary()?;
                Ok(Expr::Negate(Negate(Box::new(body))))
            }
            _ => self.parse_term(),
        }
    }

    fn parse_term(&mut self) -> PResult<Expr> {
        match self.current.kind {
            TokenKind::ParenLeft => {
                self.advance();
                let expr = self.parse_add()?;
                if self.current.kind != TokenKind::ParenRight {
                    return Err(ParseFailed);
                }
                self.advance();
                Ok(Expr::Parens(Parens(Box::new(expr))))
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::Number(Number(value)))
            }
            _ => Err(ParseFailed),
        }
    }
}

/// Parses a whole arithmetic expression. Trailing tokens fail the parse.
pub fn parse(source: &str) -> Option<Expr> {
    let mut parser = Parser::new(source);
    let expr = parser.parse_add().ok()?;
    if parser.current.kind != TokenKind::Eof {
        return None;
    }
    Some(expr)
}

/// Parses and evaluates in one go. Parse errors and division by zero both
/// yield `None`.
pub fn evaluate(source: &str, round: RoundMode) -> Option<i64> {
    parse(source)?.eval(round).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str) -> Option<i64> {
        evaluate(source, RoundMode::Floor)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1+2*3"), Some(7));
        assert_eq!(eval("(1+2)*3"), Some(9));
        assert_eq!(eval("2*3+4/2"), Some(8));
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval("-5"), Some(-5));
        assert_eq!(eval("--5"), Some(5));
        assert_eq!(eval("-(-5)"), Some(5));
        assert_eq!(eval("+5"), Some(5));
        assert_eq!(eval("10+-5"), Some(5));
    }

    #[test]
    fn test_division_rounding_suffixes() {
        assert_eq!(eval("7/3"), Some(2));
        assert_eq!(eval("7/3U"), Some(3));
        assert_eq!(eval("7/3C"), Some(3));
        assert_eq!(eval("7/3R"), Some(2));
        assert_eq!(eval("8/3R"), Some(3));
        assert_eq!(eval("7/3F"), Some(2));
    }

    #[test]
    fn test_default_round_mode() {
        assert_eq!(evaluate("7/3", RoundMode::Ceiling), Some(3));
        assert_eq!(evaluate("7/3", RoundMode::Round), Some(2));
        // A suffix always wins over the fallback.
        assert_eq!(evaluate("7/3F", RoundMode::Ceiling), Some(2));
    }

    #[test]
    fn test_negative_division() {
        assert_eq!(eval("-7/2"), Some(-3));
        assert_eq!(evaluate("-7/2", RoundMode::Round), Some(-4));
        assert_eq!(evaluate("-7/2", RoundMode::Ceiling), Some(-3));
    }

    #[test]
    fn test_overflow_wraps() {
        assert_eq!(eval("4000000000*4000000000"), Some(-2446744073709551616));
        assert_eq!(eval("-4000000000*4000000000"), Some(2446744073709551616));
        assert_eq!(eval("9223372036854775807+1"), Some(i64::MIN));
    }

    #[test]
    fn test_divide_rounded_extremes() {
        assert_eq!(divide_rounded(i64::MIN, -1, RoundMode::Floor), i64::MIN);
        assert_eq!(divide_rounded(i64::MAX, i64::MIN, RoundMode::Round), -1);
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(eval("10/0"), None);
        assert_eq!(eval("10/(3-3)"), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(eval(""), None);
        assert_eq!(eval("1+"), None);
        assert_eq!(eval("(1+2"), None);
        assert_eq!(eval("1+2)"), None);
        assert_eq!(eval("2D6"), None);
    }

    #[test]
    fn test_render_round_trips() {
        let expr = parse("(1+2)*3/4C").unwrap();
        assert_eq!(expr.render(), "(1+2)*3/4C");
        let expr = parse("7/3U").unwrap();
        assert_eq!(expr.render(), "7/3C");
    }
}
