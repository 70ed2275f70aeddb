//! Tabletop dice notation: parsing, rolling, and trace rendering.
//!
//! Input text is normalized by [`preprocess::preprocess`], then handed to a
//! chain of [`command::Command`] recognizers. The first one that claims the
//! input produces a [`CommandResult`] with the familiar `＞`-separated trace.
//!
//! ```
//! use dice_core::{execute, standard_commands, DefaultContext, Randomizer};
//!
//! let mut roller = Randomizer::new();
//! let result = execute("2D6+3>=7", &DefaultContext, &mut roller, &standard_commands())
//!     .unwrap()
//!     .unwrap();
//! assert!(result.text.starts_with("(2D6+3>=7) ＞ "));
//! assert!(result.is_success || result.is_failure);
//! ```

pub mod command;
pub mod compare;
pub mod context;
pub mod parse;
pub mod preprocess;
pub mod result;
pub mod roller;

pub use command::{execute, standard_commands, Command};
pub use compare::CompareOp;
pub use context::{DefaultContext, GameContext};
pub use preprocess::preprocess;
pub use result::CommandResult;
pub use roller::{D66Sort, DieSource, Randomizer, Roller, ScriptedDice, TooManyRolls};
