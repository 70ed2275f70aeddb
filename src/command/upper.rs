use super::{join, secret_prefix, Command};
use crate::compare::CompareOp;
use crate::context::GameContext;
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATTERN: Regex = Regex::new(r"(?i)^S?(\d+)[BU](\d+)(?:([<>=!]+)(\d+))?$").unwrap();
}

/// Bonus roll keeping the highest die: `2B6`, `2U6>=4`.
pub struct Upper;

impl Command for Upper {
    fn eval(
        &self,
        command: &str,
        _ctx: &dyn GameContext,
        roller: &mut dyn Roller,
    ) -> Result<Option<CommandResult>, TooManyRolls> {
        let caps = match PATTERN.captures(command) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        let is_secret = secret_prefix(command);
        let count: i64 = match caps[1].parse() {
            Ok(count) => count,
            Err(_) => return Ok(None),
        };
        let sides: i64 = match caps[2].parse() {
            Ok(sides) => sides,
            Err(_) => return Ok(None),
        };
        if count <= 0 || sides <= 0 {
            return Ok(None);
        }

        let rolls = roller.roll_barabara(count, sides)?;
        let kept = rolls.iter().max().copied().unwrap_or(0);

        let comparison = caps.get(3).and_then(|op_str| {
            let op = CompareOp::from_run(op_str.as_str())?;
            let target: i64 = caps[4].parse().ok()?;
            Some((op, target))
        });

        let mut text = format!("({}B{})", count, sides);
        if let Some((op, target)) = comparison {
            text.push_str(op.as_str());
            text.push_str(&target.to_string());
        }
        text.push_str(&format!(" ＞ [{}] ＞ {}", join(&rolls, ","), kept));

        let mut verdict = None;
        if let Some((op, target)) = comparison {
            let success = op.compare(kept, target);
            verdict = Some(success);
            text.push_str(" ＞ ");
            text.push_str(if success { "成功" } else { "失敗" });
        }

        let mut builder = CommandResult::builder(text)
            .secret(is_secret)
            .rolls(roller.rolls().to_vec())
            .detailed_rolls(roller.detailed_rolls().to_vec());
        if let Some(success) = verdict {
            builder = builder.condition(success);
        }
        Ok(Some(builder.build()))
    }
}
