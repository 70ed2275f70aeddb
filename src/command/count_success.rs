use super::{join, secret_prefix, Command};
use crate::compare::CompareOp;
use crate::context::GameContext;
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATTERN: Regex = Regex::new(r"(?i)^S?(\d+)S(\d+)([<>=!]+)(\d+)$").unwrap();
}

/// Rolls a pool and counts qualifying faces: `5S6>=4`.
pub struct CountSuccess;

impl Command for CountSuccess {
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

        let op = match CompareOp::from_run(&caps[3]) {
            Some(op) => op,
            None => return Ok(None),
        };
        let target: i64 = match caps[4].parse() {
            Ok(target) => target,
            Err(_) => return Ok(None),
        };

        let rolls = roller.roll_barabara(count, sides)?;
        let successes = rolls.iter().filter(|&&v| op.compare(v, target)).count();

        let text = format!(
            "({}S{}{}{}) ＞ [{}] ＞ 成功数{}",
            count,
            sides,
            op,
            target,
            join(&rolls, ","),
            successes
        );

        Ok(Some(
            CommandResult::builder(text)
                .secret(is_secret)
                .rolls(roller.rolls().to_vec())
                .detailed_rolls(roller.detailed_rolls().to_vec())
                .build(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DefaultContext;
    use crate::roller::{Randomizer, ScriptedDice};

    fn eval(command: &str, values: &[i64]) -> Option<CommandResult> {
        let mut roller = Randomizer::with_source(ScriptedDice::new(values.iter().copied()));
        CountSuccess
            .eval(command, &DefaultContext, &mut roller)
            .unwrap()
    }

    #[test]
    fn test_counts_successes() {
        let result = eval("5S6>=4", &[1, 4, 6, 2, 5]).unwrap();
        assert_eq!(result.text, "(5S6>=4) ＞ [1,4,6,2,5] ＞ 成功数3");
        assert!(!result.is_success && !result.is_failure);
    }

    #[test]
    fn test_zero_successes() {
        let result = eval("3S6>5", &[1, 2, 3]).unwrap();
        assert_eq!(result.text, "(3S6>5) ＞ [1,2,3] ＞ 成功数0");
    }

    #[test]
    fn test_operator_is_normalized() {
        let result = eval("3S6=<2", &[1, 2, 3]).unwrap();
        assert_eq!(result.text, "(3S6<=2) ＞ [1,2,3] ＞ 成功数2");
    }

    #[test]
    fn test_secret() {
        assert!(eval("S2S6>=4", &[1, 1]).unwrap().is_secret);
    }

    #[test]
    fn test_requires_comparison() {
        assert!(eval("5S6", &[]).is_none());
        assert!(eval("0S6>=4", &[]).is_none());
        assert!(eval("5S0>=4", &[]).is_none());
    }
}
