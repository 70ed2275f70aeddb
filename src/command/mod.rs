//! The built-in commands and the dispatch loop that tries them in order.

mod add_dice;
mod barabara;
mod calc;
mod choice;
mod count_success;
mod d66;
mod lower;
mod reroll;
mod tally;
mod upper;

pub use add_dice::AddDice;
pub use barabara::Barabara;
pub use calc::Calc;
pub use choice::Choice;
pub use count_success::CountSuccess;
pub use d66::D66;
pub use lower::Lower;
pub use reroll::Reroll;
pub use tally::Tally;
pub use upper::Upper;

use crate::context::GameContext;
use crate::preprocess::preprocess;
use crate::result::CommandResult;
use crate::roller::{Roller, TooManyRolls};
use regex::Regex;
use vec1::Vec1;

/// One command recognizer. `Ok(None)` means the input is not this command
/// and the next one should be tried.
pub trait Command {
    fn eval(
        &self,
        command: &str,
        ctx: &dyn GameContext,
        roller: &mut dyn Roller,
    ) -> Result<Option<CommandResult>, TooManyRolls>;
}

/// The default command chain, in match order.
///
/// [`Barabara`], [`Reroll`] and [`Tally`] are not in the chain because their
/// `nBm` and `nRm` spellings collide with [`Upper`] and [`Lower`]; games
/// that want them build their own chain.
pub fn standard_commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(Calc),
        Box::new(Choice),
        Box::new(D66),
        Box::new(Upper),
        Box::new(Lower),
        Box::new(CountSuccess),
        Box::new(AddDice),
    ]
}

/// Preprocesses `text` and runs it through `commands`, returning the first
/// recognizer's result.
pub fn execute(
    text: &str,
    ctx: &dyn GameContext,
    roller: &mut dyn Roller,
    commands: &[Box<dyn Command>],
) -> Result<Option<CommandResult>, TooManyRolls> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let command = preprocess(text, ctx);
    for cmd in commands {
        if let Some(result) = cmd.eval(&command, ctx, roller)? {
            return Ok(Some(result));
        }
    }
    Ok(None)
}

/// `nXm` dice group of a multi-group command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct DiceGroup {
    pub times: i64,
    pub sides: i64,
}

/// Extracts every dice group matched by `pattern`. Non-positive counts or
/// sides invalidate the whole command.
pub(crate) fn parse_groups(notation: &str, pattern: &Regex) -> Option<Vec1<DiceGroup>> {
    let mut groups = Vec::new();
    for caps in pattern.captures_iter(notation) {
        let times: i64 = caps[1].parse().ok()?;
        let sides: i64 = caps[2].parse().ok()?;
        if times <= 0 || sides <= 0 {
            return None;
        }
        groups.push(DiceGroup { times, sides });
    }
    Vec1::try_from_vec(groups).ok()
}

/// Secret spelling check shared by commands whose body starts with a digit.
pub(crate) fn secret_prefix(command: &str) -> bool {
    command
        .chars()
        .next()
        .map_or(false, |c| c.eq_ignore_ascii_case(&'s'))
}

pub(crate) fn join(values: &[i64], separator: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
