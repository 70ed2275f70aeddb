use super::Command;
use crate::context::GameContext;
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATTERN: Regex = Regex::new(r"(?i)^S?CHOICE\[([^\]]+)\]").unwrap();
}

/// Picks one option at random: `CHOICE[A,B,C]`.
pub struct Choice;

impl Command for Choice {
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

        let lowered = command.to_lowercase();
        let is_secret = lowered.starts_with('s') && !lowered.starts_with("choice");

        let options = split_options(&caps[1]);
        if options.is_empty() {
            return Ok(None);
        }

        let index = (roller.roll_once(options.len() as i64)? - 1).max(0) as usize;
        let selected = options[index].clone();

        let text = format!("({}) ＞ {}", options.join(","), selected);
        Ok(Some(
            CommandResult::builder(text)
                .secret(is_secret)
                .rolls(roller.rolls().to_vec())
                .detailed_rolls(roller.detailed_rolls().to_vec())
                .build(),
        ))
    }
}

/// Splits on commas outside nested brackets, trimming and dropping empty
/// entries.
fn split_options(text: &str) -> Vec<String> {
    let mut options = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                let option = text[start..i].trim();
                if !option.is_empty() {
                    options.push(option.to_owned());
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    let last = text[start..].trim();
    if !last.is_empty() {
        options.push(last.to_owned());
    }
    options
}
