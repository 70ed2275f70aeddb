use super::Command;
use crate::context::GameContext;
use crate::parse::arith::{self, ArithNode};
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PREFIX: Regex = Regex::new(r"(?i)^S?C[+\-(]*\d+").unwrap();
}

/// Dice-free calculator: `C(10+5)`, `SC-3*4`.
pub struct Calc;

impl Command for Calc {
    fn eval(
        &self,
        command: &str,
        ctx: &dyn GameContext,
        _roller: &mut dyn Roller,
    ) -> Result<Option<CommandResult>, TooManyRolls> {
        if !PREFIX.is_match(command) {
            return Ok(None);
        }

        let mut rest = command;
        let mut is_secret = false;
        if let Some(stripped) = strip_letter(rest, 'S') {
            is_secret = true;
            rest = stripped;
        }
        rest = match strip_letter(rest, 'C') {
            Some(stripped) => stripped,
            None => return Ok(None),
        };

        let node = match arith::parse(rest) {
            Some(node) => node,
            None => return Ok(None),
        };

        let text = match node.eval(ctx.round_mode()) {
            Ok(value) => format!("C({}) ＞ {}", node.render(), value),
            Err(_) => "計算エラー".to_owned(),
        };

        Ok(Some(CommandResult::builder(text).secret(is_secret).build()))
    }
}

fn strip_letter(text: &str, letter: char) -> Option<&str> {
    let first = text.chars().next()?;
    if first.eq_ignore_ascii_case(&letter) {
        Some(&text[first.len_utf8()..])
    } else {
        None
    }
}
