use super::{join, parse_groups, secret_prefix, Command};
use crate::compare::CompareOp;
use crate::context::GameContext;
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::VecDeque;

lazy_static! {
    static ref PATTERN: Regex = Regex::new(
        r"(?i)^S?(\d+R\d+(?:\+\d+R\d+)*)(?:\[([<>=!]*)(\d+)\])?(?:([<>=!]+)(\d+))?(?:@([<>=!]*)(\d+))?$"
    )
    .unwrap();
    static ref GROUPS: Regex = Regex::new(r"(?i)(\d+)R(\d+)").unwrap();
}

/// Hard bound on reroll waves, so an always-true condition terminates.
const REROLL_LIMIT: usize = 10_000;

/// Exploding pools: dice meeting the reroll condition spawn another wave.
///
/// `2R6>=5` rerolls on the success condition, `2R6[>3]>=5` carries its own
/// threshold, and `2R6>=5@>3` spells it after `@`.
pub struct Reroll;

impl Command for Reroll {
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
        let notation = caps[1].to_owned();

        let bracket_op = caps.get(2).map(|m| m.as_str().to_owned());
        let bracket_threshold: Option<i64> = caps.get(3).and_then(|m| m.as_str().parse().ok());
        let success_op_str = caps.get(4).map(|m| m.as_str().to_owned());
        let mut success_target: Option<i64> = caps.get(5).and_then(|m| m.as_str().parse().ok());
        let at_op = caps.get(6).map(|m| m.as_str().to_owned());
        let at_threshold: Option<i64> = caps.get(7).and_then(|m| m.as_str().parse().ok());

        let mut success_op = success_op_str.as_deref().and_then(CompareOp::from_run);
        if success_op.is_none() {
            if let Some(op) = ctx.default_cmp_op() {
                success_op = Some(op);
                success_target = ctx.default_target();
            }
        }

        // Threshold priority: `@`, then brackets, then the game default,
        // then the success target itself.
        let (reroll_op, reroll_threshold) = if at_threshold.is_some() {
            let op = at_op
                .filter(|s| !s.is_empty())
                .and_then(|s| CompareOp::from_run(&s))
                .unwrap_or(CompareOp::GreaterOrEqual);
            (op, at_threshold)
        } else if bracket_threshold.is_some() {
            let op = match bracket_op.filter(|s| !s.is_empty()) {
                Some(s) => CompareOp::from_run(&s).unwrap_or(CompareOp::GreaterOrEqual),
                None => success_op.unwrap_or(CompareOp::GreaterOrEqual),
            };
            (op, bracket_threshold)
        } else if let Some(threshold) = ctx.reroll_threshold() {
            (success_op.unwrap_or(CompareOp::GreaterOrEqual), Some(threshold))
        } else {
            (success_op.unwrap_or(CompareOp::GreaterOrEqual), success_target)
        };

        let groups = match parse_groups(&notation, &GROUPS) {
            Some(groups) => groups,
            None => return Ok(None),
        };

        let threshold = match reroll_threshold {
            Some(threshold) => threshold,
            None => return Ok(Some(invalid_condition(command, is_secret))),
        };
        for group in &groups {
            if !valid_reroll_condition(reroll_op, threshold, group.sides) {
                return Ok(Some(invalid_condition(command, is_secret)));
            }
        }

        let mut queue: VecDeque<(i64, i64)> =
            groups.iter().map(|g| (g.times, g.sides)).collect();
        let mut waves: Vec<Vec<i64>> = Vec::new();

        let mut loop_count = 0;
        while let Some((times, sides)) = queue.pop_front() {
            if loop_count >= REROLL_LIMIT {
                break;
            }
            loop_count += 1;

            let mut rolls = roller.roll_barabara(times, sides)?;
            if ctx.sort_barabara() {
                rolls.sort_unstable();
            }

            let rerolls = rolls
                .iter()
                .filter(|&&v| reroll_op.compare(v, threshold))
                .count() as i64;
            waves.push(rolls);
            if rerolls > 0 {
                queue.push_back((rerolls, sides));
            }
        }

        let all_dice: Vec<i64> = waves.iter().flatten().copied().collect();

        // Ones are tallied over the initial pools only.
        let ones = waves
            .iter()
            .take(groups.len())
            .flatten()
            .filter(|&&v| v == 1)
            .count();

        let mut successes = 0i64;
        if let (Some(op), Some(target)) = (success_op, success_target) {
            successes = all_dice.iter().filter(|&&v| op.compare(v, target)).count() as i64;
        }

        let glitch = ctx.glitch_text(ones, all_dice.len(), successes);

        let group_notation: Vec<String> = groups
            .iter()
            .map(|g| format!("{}R{}", g.times, g.sides))
            .collect();
        let reroll_op_text = if Some(reroll_op) == success_op {
            String::new()
        } else {
            reroll_op.as_str().to_owned()
        };

        let mut text = format!("({}[{}{}]", group_notation.join("+"), reroll_op_text, threshold);
        if let (Some(op), Some(target)) = (success_op, success_target) {
            text.push_str(op.as_str());
            text.push_str(&target.to_string());
        }
        text.push(')');

        let wave_text: Vec<String> = waves.iter().map(|w| join(w, ",")).collect();
        text.push_str(&format!(" ＞ {}", wave_text.join(" + ")));
        text.push_str(&format!(" ＞ 成功数{}", successes));
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

fn invalid_condition(command: &str, is_secret: bool) -> CommandResult {
    CommandResult::builder(format!(
        "{} ＞ 条件が間違っています。2R6>=5 あるいは 2R6[5] のように振り足し目標値を指定してください。",
        command
    ))
    .secret(is_secret)
    .build()
}

/// Rejects conditions that would reroll every die forever.
fn valid_reroll_condition(op: CompareOp, threshold: i64, sides: i64) -> bool {
    match op {
        CompareOp::LessOrEqual => threshold < sides,
        CompareOp::LessThan => threshold <= sides,
        CompareOp::GreaterOrEqual => threshold > 1,
        CompareOp::GreaterThan => threshold >= 1,
        CompareOp::NotEqual => threshold >= 1 && threshold <= sides,
        CompareOp::Equal => true,
    }
}
