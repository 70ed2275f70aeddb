use super::Command;
use crate::compare::CompareOp;
use crate::context::GameContext;
use crate::result::CommandResult;
use crate::roller::{D66Sort, Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATTERN: Regex = Regex::new(r"(?i)^S?D66(?:([ASN]))?(?:([<>=!]+)(\d+))?$").unwrap();
}

/// Two d6 read as tens and ones: `D66`, `D66S`, `D66<=33`.
pub struct D66;

impl Command for D66 {
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

        let lowered = command.to_lowercase();
        let is_secret = lowered.starts_with('s') && !lowered.starts_with('d');

        let mut sort = ctx.d66_sort();
        if let Some(suffix) = caps.get(1) {
            sort = match suffix.as_str().to_uppercase().as_str() {
                "A" | "S" => D66Sort::Ascending,
                "N" => D66Sort::NoSort,
                _ => sort,
            };
        }

        let value = roller.roll_d66(sort)?;
        let tens = value / 10;
        let ones = value % 10;

        let sort_suffix = match sort {
            D66Sort::Ascending | D66Sort::Descending => "S",
            D66Sort::NoSort => "",
        };

        let mut text = format!("(D66{}) ＞ {}[{},{}]", sort_suffix, value, tens, ones);

        let mut verdict = None;
        if let (Some(op_str), Some(target_str)) = (caps.get(2), caps.get(3)) {
            if let Some(op) = CompareOp::from_run(op_str.as_str()) {
                let target: i64 = target_str.as_str().parse().unwrap_or(0);
                let success = op.compare(value, target);
                verdict = Some(success);
                text = format!(
                    "(D66{}{}{}) ＞ {}[{},{}] ＞ {}",
                    sort_suffix,
                    op,
                    target,
                    value,
                    tens,
                    ones,
                    if success { "成功" } else { "失敗" }
                );
            }
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
