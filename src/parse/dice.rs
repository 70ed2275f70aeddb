//! Dice-augmented arithmetic.
//!
//! Same shape as the pure grammar plus `nDm` terms, an optional leading `S`
//! for secret rolls, and an optional trailing comparison. Keep/drop filter
//! suffixes (`KH2`, `DL1`, `MAX`, ...) are accepted and ignored, and the
//! parser does not insist on consuming the whole input.

use super::lexer::{Token, TokenKind, TokenStream};
use crate::compare::CompareOp;
use crate::context::GameContext;
use crate::parse::arith::divide_rounded;
use crate::roller::{Roller, TooManyRolls};
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub trait DiceNode {
    /// Evaluates the node, rolling through `roller`.
    fn eval(&mut self, ctx: &dyn GameContext, roller: &mut dyn Roller) -> Result<i64, TooManyRolls>;

    /// Evaluates without rolling; every dice term reads as 0.
    fn fixed_value(&self, ctx: &dyn GameContext) -> i64;

    fn includes_dice(&self) -> bool;

    /// Expression text with dice counts and sides already resolved, so
    /// `(2+3)D6` reads back as `5D6`.
    fn notation(&self, ctx: &dyn GameContext) -> String;

    /// Expression text with the faces rolled by the last `eval`.
    fn output(&self) -> String;
}

#[enum_dispatch(DiceNode)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiceExpr {
    Number,
    Negate,
    Binary,
    Parens,
    DiceRoll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number(pub i64);

impl DiceNode for Number {
    fn eval(&mut self, _ctx: &dyn GameContext, _roller: &mut dyn Roller) -> Result<i64, TooManyRolls> {
        Ok(self.0)
    }

    fn fixed_value(&self, _ctx: &dyn GameContext) -> i64 {
        self.0
    }

    fn includes_dice(&self) -> bool {
        false
    }

    fn notation(&self, _ctx: &dyn GameContext) -> String {
        self.0.to_string()
    }

    fn output(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negate(pub Box<DiceExpr>);

impl DiceNode for Negate {
    fn eval(&mut self, ctx: &dyn GameContext, roller: &mut dyn Roller) -> Result<i64, TooManyRolls> {
        Ok(self.0.eval(ctx, roller)?.wrapping_neg())
    }

    fn fixed_value(&self, ctx: &dyn GameContext) -> i64 {
        self.0.fixed_value(ctx).wrapping_neg()
    }

    fn includes_dice(&self) -> bool {
        self.0.includes_dice()
    }

    fn notation(&self, ctx: &dyn GameContext) -> String {
        format!("-{}", self.0.notation(ctx))
    }

    fn output(&self) -> String {
        format!("-{}", self.0.output())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiceOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl DiceOp {
    fn as_char(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    fn flipped(self) -> Self {
        match self {
            Self::Add => Self::Sub,
            Self::Sub => Self::Add,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub left: Box<DiceExpr>,
    pub op: DiceOp,
    pub right: Box<DiceExpr>,
}

impl Binary {
    /// Division by zero collapses to 1 instead of failing the roll.
    /// Computed values wrap on overflow.
    fn apply(&self, left: i64, right: i64, ctx: &dyn GameContext) -> i64 {
        match self.op {
            DiceOp::Add => left.wrapping_add(right),
            DiceOp::Sub => left.wrapping_sub(right),
            DiceOp::Mul => left.wrapping_mul(right),
            DiceOp::Div => {
                if right == 0 {
                    1
                } else {
                    divide_rounded(left, right, ctx.round_mode())
                }
            }
        }
    }
}

impl DiceNode for Binary {
    fn eval(&mut self, ctx: &dyn GameContext, roller: &mut dyn Roller) -> Result<i64, TooManyRolls> {
        let left = self.left.eval(ctx, roller)?;
        let right = self.right.eval(ctx, roller)?;
        Ok(self.apply(left, right, ctx))
    }

    fn fixed_value(&self, ctx: &dyn GameContext) -> i64 {
        let left = self.left.fixed_value(ctx);
        let right = self.right.fixed_value(ctx);
        self.apply(left, right, ctx)
    }

    fn includes_dice(&self) -> bool {
        self.left.includes_dice() || self.right.includes_dice()
    }

    fn notation(&self, ctx: &dyn GameContext) -> String {
        format!(
            "{}{}{}",
            self.left.notation(ctx),
            self.op.as_char(),
            self.right.notation(ctx)
        )
    }

    fn output(&self) -> String {
        format!("{}{}{}", self.left.output(), self.op.as_char(), self.right.output())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parens(pub Box<DiceExpr>);

impl DiceNode for Parens {
    fn eval(&mut self, ctx: &dyn GameContext, roller: &mut dyn Roller) -> Result<i64, TooManyRolls> {
        self.0.eval(ctx, roller)
    }

    fn fixed_value(&self, ctx: &dyn GameContext) -> i64 {
        self.0.fixed_value(ctx)
    }

    fn includes_dice(&self) -> bool {
        self.0.includes_dice()
    }

    fn notation(&self, ctx: &dyn GameContext) -> String {
        format!("({})", self.0.notation(ctx))
    }

    fn output(&self) -> String {
        format!("({})", self.0.output())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    times: Box<DiceExpr>,
    sides: Option<Box<DiceExpr>>,
    output: String,
}

impl DiceRoll {
    fn new(times: DiceExpr, sides: Option<DiceExpr>) -> Self {
        Self {
            times: Box::new(times),
            sides: sides.map(Box::new),
            output: String::new(),
        }
    }

    fn resolved(&self, ctx: &dyn GameContext) -> (i64, i64) {
        let times = self.times.fixed_value(ctx);
        let sides = match &self.sides {
            Some(sides) => sides.fixed_value(ctx),
            None => ctx.implicit_sides(),
        };
        (times, sides)
    }
}

impl DiceNode for DiceRoll {
    fn eval(&mut self, ctx: &dyn GameContext, roller: &mut dyn Roller) -> Result<i64, TooManyRolls> {
        let (times, sides) = self.resolved(ctx);
        let dice = roller.roll_barabara(times, sides)?;
        let total: i64 = dice.iter().sum();
        let faces = dice
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.output = format!("{}[{{{}}}]", total, faces);
        Ok(total)
    }

    fn fixed_value(&self, _ctx: &dyn GameContext) -> i64 {
        0
    }

    fn includes_dice(&self) -> bool {
        true
    }

    fn notation(&self, ctx: &dyn GameContext) -> String {
        let (times, sides) = self.resolved(ctx);
        format!("{}D{}", times, sides)
    }

    fn output(&self) -> String {
        self.output.clone()
    }
}

/// A parsed dice command: secret flag, dice expression, optional comparison
/// against a dice-free target. A `?` target parses as the placeholder -1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceParsed {
    pub is_secret: bool,
    pub left: DiceExpr,
    pub cmp: Option<(CompareOp, DiceExpr)>,
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

    fn parse(mut self) -> Option<DiceParsed> {
        let is_secret = self.parse_secret();
        let left = self.parse_add().ok()?;
        if !left.includes_dice() {
            return None;
        }

        if let TokenKind::CmpOp(op) = self.current.kind {
            self.advance();
            let right = self.parse_target().ok()?;
            if right.includes_dice() {
                return None;
            }
            return Some(DiceParsed {
                is_secret,
                left,
                cmp: Some((op, right)),
            });
        }

        Some(DiceParsed {
            is_secret,
            left,
            cmp: None,
        })
    }

    fn parse_secret(&mut self) -> bool {
        if self.current.is_ident("S") {
            self.advance();
            return true;
        }
        false
    }

    fn parse_target(&mut self) -> PResult<DiceExpr> {
        if self.current.kind == TokenKind::Question {
            self.advance();
            // Placeholder for a target to be filled in later.
            return Ok(DiceExpr::Number(Number(-1)));
        }
        self.parse_add()
    }

    fn parse_add(&mut self) -> PResult<DiceExpr> {
        let mut left = self.parse_mul()?;
        loop {
            let mut op = match self.current.kind {
                TokenKind::Plus => DiceOp::Add,
                TokenKind::Minus => DiceOp::Sub,
                _ => break,
            };
            self.advance();

            // `a+-b` folds into `a-b`.
            let right = match self.parse_mul()? {
                DiceExpr::Negate(negate) => {
                    op = op.flipped();
                    *negate.0
                }
                other => other,
            };

            left = DiceExpr::Binary(Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_mul(&mut self) -> PResult<DiceExpr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Asterisk => DiceOp::Mul,
                TokenKind::Slash => DiceOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;

            // A rounding suffix after division is tolerated and dropped.
            if op == DiceOp::Div && self.current.kind == TokenKind::Identifier {
                if matches!(self.current.text.as_str(), "U" | "C" | "R" | "F") {
                    self.advance();
                }
            }

            left = DiceExpr::Binary(Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<DiceExpr> {
        match self.current.kind {
            TokenKind::Plus => {
                self.advance();
                self.parse_unary()
            }
            TokenKind::Minus => {
                self.advance();
                match self.parse_unary()? {
                    DiceExpr::Negate(negate) => Ok(*negate.0),
                    body => Ok(DiceExpr::Negate(Negate(Box::new(body)))),
                }
            }
            _ => self.parse_dice(),
        }
    }

    fn parse_dice(&mut self) -> PResult<DiceExpr> {
        // Leading `D6` means one die.
        if self.current.is_ident("D") {
            self.advance();

            if let TokenKind::Number(sides) = self.current.kind {
                self.advance();
                self.skip_filter();
                return Ok(DiceExpr::DiceRoll(DiceRoll::new(
                    DiceExpr::Number(Number(1)),
                    Some(DiceExpr::Number(Number(sides))),
                )));
            }

            return Ok(DiceExpr::DiceRoll(DiceRoll::new(
                DiceExpr::Number(Number(1)),
                None,
            )));
        }

        let term = self.parse_term()?;

        if self.current.is_ident("D") {
            self.advance();

            let sides = match self.current.kind {
                TokenKind::Number(sides) => {
                    self.advance();
                    Some(DiceExpr::Number(Number(sides)))
                }
                _ => None,
            };

            self.skip_filter();
            return Ok(DiceExpr::DiceRoll(DiceRoll::new(term, sides)));
        }

        Ok(term)
    }

    /// Eats `KH2`, `DL`, `MAX`, and friends.
    fn skip_filter(&mut self) {
        if self.current.kind != TokenKind::Identifier {
            return;
        }
        if !matches!(self.current.text.as_str(), "K" | "D" | "M") {
            return;
        }
        self.advance();
        while self.current.kind == TokenKind::Identifier
            && matches!(self.current.text.as_str(), "H" | "L" | "A" | "X" | "I" | "N")
        {
            self.advance();
        }
        if matches!(self.current.kind, TokenKind::Number(_)) {
            self.advance();
        }
    }

    fn parse_term(&mut self) -> PResult<DiceExpr> {
        match self.current.kind {
            TokenKind::ParenLeft => {
                self.advance();
                let expr = self.parse_add()?;
                if self.current.kind != TokenKind::ParenRight {
                    return Err(ParseFailed);
                }
                self.advance();
                Ok(DiceExpr::Parens(Parens(Box::new(expr))))
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(DiceExpr::Number(Number(value)))
            }
            _ => Err(ParseFailed),
        }
    }
}

/// Parses a dice command. The expression must roll at least one die and the
/// comparison target must roll none.
pub fn parse(source: &str) -> Option<DiceParsed> {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DefaultContext;
    use crate::roller::{Randomizer, ScriptedDice};

    fn scripted(values: &[i64]) -> Randomizer<ScriptedDice> {
        Randomizer::with_source(ScriptedDice::new(values.iter().copied()))
    }

    fn eval(source: &str, values: &[i64]) -> (i64, String, String) {
        let mut parsed = parse(source).unwrap();
        let ctx = DefaultContext;
        let mut roller = scripted(values);
        let total = parsed.left.eval(&ctx, &mut roller).unwrap();
        (total, parsed.left.notation(&ctx), parsed.left.output())
    }

    #[test]
    fn test_simple_roll() {
        let (total, notation, output) = eval("2D6", &[3, 4]);
        assert_eq!(total, 7);
        assert_eq!(notation, "2D6");
        assert_eq!(output, "7[{3,4}]");
    }

    #[test]
    fn test_roll_with_modifier() {
        let (total, notation, output) = eval("2D6+3", &[3, 4]);
        assert_eq!(total, 10);
        assert_eq!(notation, "2D6+3");
        assert_eq!(output, "7[{3,4}]+3");
    }

    #[test]
    fn test_requires_dice() {
        assert!(parse("5+3").is_none());
        assert!(parse("7").is_none());
    }

    #[test]
    fn test_target_must_be_fixed() {
        assert!(parse("2D6>=1D6").is_none());
        assert!(parse("2D6>=7").is_some());
    }

    #[test]
    fn test_question_target() {
        let parsed = parse("1D6>=?").unwrap();
        let (op, target) = parsed.cmp.unwrap();
        assert_eq!(op, CompareOp::GreaterOrEqual);
        assert_eq!(target, DiceExpr::Number(Number(-1)));
    }

    #[test]
    fn test_secret_prefix() {
        assert!(parse("S2D6").unwrap().is_secret);
        assert!(!parse("2D6").unwrap().is_secret);
    }

    #[test]
    fn test_leading_d() {
        let (total, notation, _) = eval("D6", &[5]);
        assert_eq!(total, 5);
        assert_eq!(notation, "1D6");
    }

    #[test]
    fn test_computed_times_resolve_in_notation() {
        let (total, notation, _) = eval("(2+3)D6", &[1, 1, 1, 1, 1]);
        assert_eq!(total, 5);
        assert_eq!(notation, "5D6");
    }

    #[test]
    fn test_operator_flip() {
        let (total, notation, _) = eval("2D6+-3", &[3, 4]);
        assert_eq!(total, 4);
        assert_eq!(notation, "2D6-3");
    }

    #[test]
    fn test_double_negation_folds() {
        let (total, notation, _) = eval("--2D6", &[3, 4]);
        assert_eq!(total, 7);
        assert_eq!(notation, "2D6");
    }

    #[test]
    fn test_division_truncates() {
        let (total, _, _) = eval("3D6/2", &[1, 2, 3]);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_division_by_zero_is_one() {
        let (total, _, _) = eval("2D6/0", &[3, 4]);
        assert_eq!(total, 1);
    }

    #[test]
    fn test_overflow_wraps() {
        let (total, _, _) = eval("1D6*9223372036854775807", &[2]);
        assert_eq!(total, -2);
    }

    #[test]
    fn test_filters_are_ignored() {
        let (total, notation, _) = eval("4D6KH3", &[1, 2, 3, 4]);
        assert_eq!(total, 10);
        assert_eq!(notation, "4D6");
    }

    #[test]
    fn test_trailing_junk_is_tolerated() {
        // Whatever follows a complete expression is simply not consumed.
        assert!(parse("2D6ZZZ").is_some());
    }
}
