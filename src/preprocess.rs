//! Input normalization applied before any command is tried.
//!
//! `1d6+4D+(3*4)` with a trailing comment becomes `1D6+4D6+12`: the text is
//! trimmed, cut at the first space, uppercased, parenthesized constant
//! expressions are folded, the game rewrites its aliases, and bare `nD`
//! gains the game's implicit die size.

use crate::context::GameContext;
use crate::parse::arith;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PAREN_EXPR: Regex = Regex::new(r"(?i)\([0-9/+*CURF-]+\)").unwrap();
    static ref IMPLICIT_D: Regex = Regex::new(r"(?i)([0-9]+)D([^\w]|$)").unwrap();
}

pub fn preprocess(text: &str, ctx: &dyn GameContext) -> String {
    let text = text.trim();
    let text = match text.find(' ') {
        Some(at) => &text[..at],
        None => text,
    };
    let mut text = text.to_uppercase();

    // Innermost parens fold first, so nesting resolves over iterations.
    loop {
        let folded = PAREN_EXPR
            .replace_all(&text, |caps: &Captures| {
                match arith::evaluate(&caps[0], ctx.round_mode()) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_owned(),
                }
            })
            .into_owned();
        if folded == text {
            break;
        }
        text = folded;
    }

    let text = ctx.change_text(&text);

    IMPLICIT_D
        .replace_all(&text, |caps: &Captures| {
            format!("{}D{}{}", &caps[1], ctx.implicit_sides(), &caps[2])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DefaultContext;

    fn process(text: &str) -> String {
        preprocess(text, &DefaultContext)
    }

    #[test]
    fn test_readme_example() {
        assert_eq!(process("1d6+4D+(3*4) trailing words"), "1D6+4D6+12");
    }

    #[test]
    fn test_trim_and_truncate() {
        assert_eq!(process("  2d6  "), "2D6");
        assert_eq!(process("2d6 attack roll"), "2D6");
    }

    #[test]
    fn test_nested_parens_fold() {
        assert_eq!(process("((1+2)*3)D6"), "9D6");
    }

    #[test]
    fn test_unfoldable_parens_stay() {
        // Division by zero leaves the group untouched.
        assert_eq!(process("(1/0)D6"), "(1/0)D6");
    }

    #[test]
    fn test_implicit_d_positions() {
        assert_eq!(process("3D"), "3D6");
        assert_eq!(process("3D+1"), "3D6+1");
        assert_eq!(process("3D10"), "3D10");
        assert_eq!(process("1D6+2D"), "1D6+2D6");
    }

    #[test]
    fn test_rounding_suffix_inside_parens() {
        assert_eq!(process("(7/3C)D6"), "3D6");
    }

    #[test]
    fn test_custom_context() {
        struct Tetra;
        impl GameContext for Tetra {
            fn implicit_sides(&self) -> i64 {
                4
            }
            fn change_text(&self, text: &str) -> String {
                text.replace("ATK", "2D")
            }
        }
        assert_eq!(preprocess("atk+1", &Tetra), "2D4+1");
    }

    #[test]
    fn test_idempotent_on_clean_input() {
        let once = process("1d6+4D+(3*4)");
        assert_eq!(process(&once), once);
    }
}
