use super::{join, secret_prefix, Command};
use crate::context::GameContext;
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATTERN: Regex = Regex::new(r"(?i)^S?(\d+)T([YZ])(\d+)$").unwrap();
}

const MAX_SIDES: i64 = 20;

/// Tallies how often each face came up: `5TY6` hides empty faces, `5TZ6`
/// shows them.
pub struct Tally;

impl Command for Tally {
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
        let times: i64 = match caps[1].parse() {
            Ok(times) => times,
            Err(_) => return Ok(None),
        };
        let kind = caps[2].to_uppercase();
        let sides: i64 = match caps[3].parse() {
            Ok(sides) => sides,
            Err(_) => return Ok(None),
        };
        let show_zeros = kind == "Z";

        if times <= 0 || sides <= 0 {
            return Ok(None);
        }

        let notation = format!("{}T{}{}", times, kind, sides);

        if sides > MAX_SIDES {
            let text = format!("({}) ＞ 面数は1以上、{}以下としてください", notation, MAX_SIDES);
            return Ok(Some(
                CommandResult::builder(text).secret(is_secret).build(),
            ));
        }

        let rolls = roller.roll_barabara(times, sides)?;

        let mut shown = rolls.clone();
        if ctx.sort_barabara() {
            shown.sort_unstable();
        }

        let mut counts = vec![0usize; sides as usize + 1];
        for &value in &rolls {
            if value >= 1 && value <= sides {
                counts[value as usize] += 1;
            }
        }

        let tallies: Vec<String> = (1..=sides)
            .filter_map(|value| {
                let count = counts[value as usize];
                if count == 0 && !show_zeros {
                    None
                } else {
                    Some(format!("[{}]×{}", value, count))
                }
            })
            .collect();

        let text = format!(
            "({}) ＞ {} ＞ {}",
            notation,
            join(&shown, ","),
            tallies.join(", ")
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
