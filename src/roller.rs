use rand::{rngs::ThreadRng, Rng};
use std::collections::VecDeque;

/// Most dice a single `roll_barabara` call may roll.
pub const UPPER_LIMIT_DICE_TIMES: i64 = 200;
/// Largest die size a roller accepts.
pub const UPPER_LIMIT_DICE_SIDES: i64 = 10_000;
/// Most primitive rolls one roller instance may produce over its lifetime.
pub const UPPER_LIMIT_ROLLS: usize = 10_000;

/// The cumulative roll cap was exceeded; the in-progress call is failed
/// rather than returning partial data.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("too many dice rolled")]
pub struct TooManyRolls;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RollKind {
    Normal,
    /// Tens digit of a percentile roll (0, 10, ..., 90).
    TensD10,
    /// A d10 read as 0-9.
    D9,
}

/// One primitive roll with enough detail to reconstruct a trace.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DetailedRoll {
    pub kind: RollKind,
    pub sides: i64,
    pub value: i64,
}

/// How the two dice of a d66 are ordered before being combined.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum D66Sort {
    NoSort,
    Ascending,
    Descending,
}

/// Source of raw die faces, `1..=sides`.
///
/// Blanket-implemented for every [`Rng`]; tests use [`ScriptedDice`].
pub trait DieSource {
    fn next_die(&mut self, sides: i64) -> i64;
}

impl<R: Rng> DieSource for R {
    fn next_die(&mut self, sides: i64) -> i64 {
        self.gen_range(1..=sides)
    }
}

/// Replays a fixed sequence of faces, then falls back to 1.
pub struct ScriptedDice {
    values: VecDeque<i64>,
}

impl ScriptedDice {
    pub fn new<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl DieSource for ScriptedDice {
    fn next_die(&mut self, _sides: i64) -> i64 {
        self.values.pop_front().unwrap_or(1)
    }
}

/// The abstraction every evaluator rolls through. Owns the roll history and
/// enforces the per-call and cumulative caps.
///
/// A roller instance is cheap to construct and is meant to live for exactly
/// one command evaluation; it is not safe to share between two evaluations.
pub trait Roller {
    /// Rolls `times` dice and returns each face. An out-of-range `times`
    /// yields an empty list, not an error.
    fn roll_barabara(&mut self, times: i64, sides: i64) -> Result<Vec<i64>, TooManyRolls>;

    fn roll_sum(&mut self, times: i64, sides: i64) -> Result<i64, TooManyRolls>;

    /// Rolls one die; an out-of-range `sides` yields 0.
    fn roll_once(&mut self, sides: i64) -> Result<i64, TooManyRolls>;

    /// Zero-based variant of [`Roller::roll_once`], for table lookups.
    fn roll_index(&mut self, sides: i64) -> Result<i64, TooManyRolls>;

    /// Tens digit for percentile systems: 0, 10, ..., 90.
    fn roll_tens_d10(&mut self) -> Result<i64, TooManyRolls>;

    /// A d10 read as 0-9.
    fn roll_d9(&mut self) -> Result<i64, TooManyRolls>;

    /// Two d6 combined as tens and ones, 11-66.
    fn roll_d66(&mut self, sort: D66Sort) -> Result<i64, TooManyRolls>;

    /// Every primitive roll so far, in call order, as `(value, sides)`.
    fn rolls(&self) -> &[(i64, i64)];

    fn detailed_rolls(&self) -> &[DetailedRoll];
}

pub struct Randomizer<S = ThreadRng> {
    source: S,
    rolls: Vec<(i64, i64)>,
    detailed: Vec<DetailedRoll>,
}

impl Randomizer {
    pub fn new() -> Self {
        Self::with_source(rand::thread_rng())
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DieSource> Randomizer<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            rolls: Vec::new(),
            detailed: Vec::new(),
        }
    }

    fn roll_raw(&mut self, sides: i64) -> Result<i64, TooManyRolls> {
        if self.rolls.len() >= UPPER_LIMIT_ROLLS {
            return Err(TooManyRolls);
        }
        let die = self.source.next_die(sides);
        self.rolls.push((die, sides));
        Ok(die)
    }

    fn push_detail(&mut self, kind: RollKind, sides: i64, value: i64) {
        self.detailed.push(DetailedRoll { kind, sides, value });
    }
}

impl<S: DieSource> Roller for Randomizer<S> {
    fn roll_barabara(&mut self, times: i64, sides: i64) -> Result<Vec<i64>, TooManyRolls> {
        if times > 0 && self.rolls.len() + times as usize > UPPER_LIMIT_ROLLS {
            return Err(TooManyRolls);
        }
        if times <= 0 || times > UPPER_LIMIT_DICE_TIMES {
            return Ok(Vec::new());
        }
        (0..times).map(|_| self.roll_once(sides)).collect()
    }

    fn roll_sum(&mut self, times: i64, sides: i64) -> Result<i64, TooManyRolls> {
        Ok(self.roll_barabara(times, sides)?.iter().sum())
    }

    fn roll_once(&mut self, sides: i64) -> Result<i64, TooManyRolls> {
        if sides <= 0 || sides > UPPER_LIMIT_DICE_SIDES {
            return Ok(0);
        }
        let die = self.roll_raw(sides)?;
        self.push_detail(RollKind::Normal, sides, die);
        Ok(die)
    }

    fn roll_index(&mut self, sides: i64) -> Result<i64, TooManyRolls> {
        Ok(self.roll_once(sides)? - 1)
    }

    fn roll_tens_d10(&mut self) -> Result<i64, TooManyRolls> {
        let mut die = self.roll_raw(10)?;
        if die == 10 {
            die = 0;
        }
        let value = die * 10;
        self.push_detail(RollKind::TensD10, 10, value);
        Ok(value)
    }

    fn roll_d9(&mut self) -> Result<i64, TooManyRolls> {
        let die = self.roll_raw(10)? - 1;
        self.push_detail(RollKind::D9, 10, die);
        Ok(die)
    }

    fn roll_d66(&mut self, sort: D66Sort) -> Result<i64, TooManyRolls> {
        let mut first = self.roll_once(6)?;
        let mut second = self.roll_once(6)?;
        match sort {
            D66Sort::Ascending if first > second => std::mem::swap(&mut first, &mut second),
            D66Sort::Descending if first < second => std::mem::swap(&mut first, &mut second),
            _ => {}
        }
        Ok(first * 10 + second)
    }

    fn rolls(&self) -> &[(i64, i64)] {
        &self.rolls
    }

    fn detailed_rolls(&self) -> &[DetailedRoll] {
        &self.detailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(values: &[i64]) -> Randomizer<ScriptedDice> {
        Randomizer::with_source(ScriptedDice::new(values.iter().copied()))
    }

    #[test]
    fn test_roll_barabara_records_history() {
        let mut roller = scripted(&[3, 5]);
        let rolls = roller.roll_barabara(2, 6).unwrap();
        assert_eq!(rolls, vec![3, 5]);
        assert_eq!(roller.rolls(), &[(3, 6), (5, 6)]);
        assert_eq!(
            roller.detailed_rolls(),
            &[
                DetailedRoll {
                    kind: RollKind::Normal,
                    sides: 6,
                    value: 3
                },
                DetailedRoll {
                    kind: RollKind::Normal,
                    sides: 6,
                    value: 5
                },
            ]
        );
    }

    #[test]
    fn test_roll_sum() {
        let mut roller = scripted(&[3, 5, 1]);
        assert_eq!(roller.roll_sum(3, 6).unwrap(), 9);
    }

    #[test]
    fn test_out_of_range_times_yields_empty() {
        let mut roller = scripted(&[]);
        assert_eq!(roller.roll_barabara(0, 6).unwrap(), Vec::<i64>::new());
        assert_eq!(
            roller
                .roll_barabara(UPPER_LIMIT_DICE_TIMES + 1, 6)
                .unwrap(),
            Vec::<i64>::new()
        );
        assert!(roller.rolls().is_empty());
    }

    #[test]
    fn test_out_of_range_sides_yields_zero() {
        let mut roller = scripted(&[]);
        assert_eq!(roller.roll_once(0).unwrap(), 0);
        assert_eq!(roller.roll_once(UPPER_LIMIT_DICE_SIDES + 1).unwrap(), 0);
        assert!(roller.rolls().is_empty());
    }

    #[test]
    fn test_cumulative_cap_fails_the_call() {
        let mut roller = Randomizer::with_source(ScriptedDice::new(std::iter::empty()));
        for _ in 0..(UPPER_LIMIT_ROLLS as i64 / UPPER_LIMIT_DICE_TIMES) {
            roller.roll_barabara(UPPER_LIMIT_DICE_TIMES, 6).unwrap();
        }
        assert_eq!(roller.rolls().len(), UPPER_LIMIT_ROLLS);
        assert_eq!(roller.roll_once(6), Err(TooManyRolls));
        assert_eq!(roller.roll_barabara(2, 6), Err(TooManyRolls));
    }

    #[test]
    fn test_roll_tens_d10_maps_ten_to_zero() {
        let mut roller = scripted(&[10, 4]);
        assert_eq!(roller.roll_tens_d10().unwrap(), 0);
        assert_eq!(roller.roll_tens_d10().unwrap(), 40);
        assert_eq!(
            roller.detailed_rolls()[0],
            DetailedRoll {
                kind: RollKind::TensD10,
                sides: 10,
                value: 0
            }
        );
    }

    #[test]
    fn test_roll_d9() {
        let mut roller = scripted(&[10, 1]);
        assert_eq!(roller.roll_d9().unwrap(), 9);
        assert_eq!(roller.roll_d9().unwrap(), 0);
    }

    #[test]
    fn test_roll_d66_sorting() {
        let mut roller = scripted(&[5, 2]);
        assert_eq!(roller.roll_d66(D66Sort::NoSort).unwrap(), 52);
        let mut roller = scripted(&[5, 2]);
        assert_eq!(roller.roll_d66(D66Sort::Ascending).unwrap(), 25);
        let mut roller = scripted(&[2, 5]);
        assert_eq!(roller.roll_d66(D66Sort::Descending).unwrap(), 52);
    }

    #[test]
    fn test_thread_rng_rolls_in_range() {
        let mut roller = Randomizer::new();
        for _ in 0..100 {
            let die = roller.roll_once(6).unwrap();
            assert!((1..=6).contains(&die));
        }
    }
}
