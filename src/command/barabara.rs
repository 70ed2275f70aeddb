use super::{join, parse_groups, secret_prefix, Command};
use crate::compare::CompareOp;
use crate::context::GameContext;
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATTERN: Regex =
        Regex::new(r"(?i)^S?(\d+B\d+(?:\+\d+B\d+)*)(?:([<>=!]+)(\d+))?$").unwrap();
    static ref GROUPS: Regex = Regex::new(r"(?i)(\d+)B(\d+)").unwrap();
}

/// Rolls pools and lists every face: `5B6>=4`, `3B6+2B10>=5`.
pub struct Barabara;

impl Command for Barabara {
    fn eval(
        &self,
        command: &str,
        ctx: &dyn GameContext,
        roller: &mut dyn Roller,
    ) -> Result<Option<CommandResult>, TooManyRolls> {
        let caps = match PATTERN.captures(command) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        let is_secret = secret_prefix(command);
        let notation = &caps[1];

        let mut comparison = match caps.get(2) {
            Some(op_str) => match CompareOp::from_run(op_str.as_str()) {
                Some(op) => {
                    let target: i64 = match caps[3].parse() {
                        Ok(target) => target,
                        Err(_) => return Ok(None),
                    };
                    Some((op, target))
                }
                None => return Ok(None),
            },
            None => None,
        };

        if comparison.is_none() {
            if let (Some(op), Some(target)) = (ctx.default_cmp_op(), ctx.default_target()) {
                comparison = Some((op, target));
            }
        }

        let groups = match parse_groups(notation, &GROUPS) {
            Some(groups) => groups,
            None => return Ok(None),
        };

        let mut all_dice = Vec::new();
        let mut notations = Vec::new();
        for group in &groups {
            let mut rolls = roller.roll_barabara(group.times, group.sides)?;
            if ctx.sort_barabara() {
                rolls.sort_unstable();
            }
            all_dice.extend(rolls);
            notations.push(format!("{}B{}", group.times, group.sides));
        }

        let mut successes = 0i64;
        let mut success_text = None;
        if let Some((op, target)) = comparison {
            successes = all_dice.iter().filter(|&&v| op.compare(v, target)).count() as i64;
            success_text = Some(format!("成功数{}", successes));
        }

        let ones = all_dice.iter().filter(|&&v| v == 1).count();
        let glitch = ctx.glitch_text(ones, all_dice.len(), successes);

        let mut text = format!("({}", notations.join("+"));
        if let Some((op, target)) = comparison {
            text.push_str(op.as_str());
            text.push_str(&target.to_string());
        }
        text.push(')');
        text.push_str(&format!(" ＞ {}", join(&all_dice, ",")));
        if let Some(success_text) = success_text {
            text.push_str(&format!(" ＞ {}", success_text));
        }
        if let Some(glitch) = glitch {
            text.push_str(&format!(" ＞ {}", glitch));
        }

        Ok(Some(
            CommandResult::builder(text)
                .secret(is_secret)
                .rolls(roller.rolls().to_vec())
                .detailed_rolls(roller.detailed_rolls().to_vec())
                .build(),
        ))
    }
}
