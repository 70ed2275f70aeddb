use super::Command;
use crate::context::GameContext;
use crate::parse::dice::{self, DiceNode};
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PREFIX: Regex = Regex::new(r"(?i)^S?[+\-(]*(\d+|D\d+)").unwrap();
}

/// Sum-of-dice command: `2D6`, `2D6+3`, `2D6+3>=7`, `S1D100<=50`.
pub struct AddDice;

impl Command for AddDice {
    fn eval(
        &self,
        command: &str,
        ctx: &dyn GameContext,
        roller: &mut dyn Roller,
    ) -> Result<Option<CommandResult>, TooManyRolls> {
        if !PREFIX.is_match(command) {
            return Ok(None);
        }
        let mut parsed = match dice::parse(command) {
            Some(parsed) => parsed,
            None => return Ok(None),
        };

        let total = parsed.left.eval(ctx, roller)?;
        let notation = parsed.left.notation(ctx);
        let output = parsed.left.output();

        let mut text = format!("({}", notation);
        if let Some((op, target)) = &parsed.cmp {
            text.push_str(op.as_str());
            text.push_str(&target.fixed_value(ctx).to_string());
        }
        text.push(')');

        // Intermediate faces are shown unless the whole roll was one term.
        if output != total.to_string() && output.contains('[') {
            text.push_str(" ＞ ");
            text.push_str(&output);
        }

        text.push_str(" ＞ ");
        text.push_str(&total.to_string());

        let mut verdict = None;
        if let Some((op, target)) = &parsed.cmp {
            let success = op.compare(total, target.fixed_value(ctx));
            verdict = Some(success);
            text.push_str(" ＞ ");
            text.push_str(if success { "成功" } else { "失敗" });
        }

        let mut builder = CommandResult::builder(text)
            .secret(parsed.is_secret)
            .rolls(roller.rolls().to_vec())
            .detailed_rolls(roller.detailed_rolls().to_vec());
        if let Some(success) = verdict {
            builder = builder.condition(success);
        }
        Ok(Some(builder.build()))
    }
}
