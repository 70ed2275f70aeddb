use crate::compare::CompareOp;
use crate::parse::arith::RoundMode;
use crate::roller::D66Sort;

/// Per-game tuning knobs consulted by the preprocessor and the built-in
/// commands. Every method has a default, so a plain system implements
/// nothing.
pub trait GameContext {
    /// Rounding applied to division without an explicit suffix.
    fn round_mode(&self) -> RoundMode {
        RoundMode::Floor
    }

    /// Die size substituted for `nD` with no explicit sides.
    fn implicit_sides(&self) -> i64 {
        6
    }

    fn d66_sort(&self) -> D66Sort {
        D66Sort::NoSort
    }

    /// Comparison filled in when a success-count command carries none.
    fn default_cmp_op(&self) -> Option<CompareOp> {
        None
    }

    fn default_target(&self) -> Option<i64> {
        None
    }

    /// Whether multi-die traces list each group in ascending order.
    fn sort_barabara(&self) -> bool {
        false
    }

    /// Reroll threshold used when the command spells none.
    fn reroll_threshold(&self) -> Option<i64> {
        None
    }

    /// Game-specific text rewriting, applied after uppercasing.
    fn change_text(&self, text: &str) -> String {
        text.to_owned()
    }

    /// Extra verdict appended after a success count, keyed on the number of
    /// ones in the initial pools.
    fn glitch_text(&self, _ones: usize, _dice: usize, _successes: i64) -> Option<String> {
        None
    }
}

/// Context with every knob at its default.
pub struct DefaultContext;

impl GameContext for DefaultContext {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = DefaultContext;
        assert_eq!(ctx.round_mode(), RoundMode::Floor);
        assert_eq!(ctx.implicit_sides(), 6);
        assert_eq!(ctx.d66_sort(), D66Sort::NoSort);
        assert_eq!(ctx.default_cmp_op(), None);
        assert!(!ctx.sort_barabara());
        assert_eq!(ctx.change_text("2D6"), "2D6");
        assert_eq!(ctx.glitch_text(1, 5, 2), None);
    }
}
