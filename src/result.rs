use crate::roller::DetailedRoll;

/// Outcome of one evaluated command.
///
/// Success and failure never both hold, but critical and fumble are
/// independent of the pair, so a fumbled success is representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub text: String,
    pub is_secret: bool,
    pub is_success: bool,
    pub is_failure: bool,
    pub is_critical: bool,
    pub is_fumble: bool,
    pub rolls: Vec<(i64, i64)>,
    pub detailed_rolls: Vec<DetailedRoll>,
}

impl CommandResult {
    pub fn builder(text: impl Into<String>) -> Builder {
        Builder::new(text.into())
    }

    pub fn success(text: impl Into<String>) -> Self {
        Builder::new(text.into()).success(true).build()
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Builder::new(text.into()).failure(true).build()
    }

    /// A critical implies success.
    pub fn critical(text: impl Into<String>) -> Self {
        Builder::new(text.into()).success(true).critical(true).build()
    }

    /// A fumble implies failure.
    pub fn fumble(text: impl Into<String>) -> Self {
        Builder::new(text.into()).failure(true).fumble(true).build()
    }
}

#[derive(Debug, Clone)]
pub struct Builder {
    text: String,
    is_secret: bool,
    is_success: bool,
    is_failure: bool,
    is_critical: bool,
    is_fumble: bool,
    rolls: Vec<(i64, i64)>,
    detailed_rolls: Vec<DetailedRoll>,
}

impl Builder {
    fn new(text: String) -> Self {
        Self {
            text,
            is_secret: false,
            is_success: false,
            is_failure: false,
            is_critical: false,
            is_fumble: false,
            rolls: Vec::new(),
            detailed_rolls: Vec::new(),
        }
    }

    pub fn secret(mut self, is_secret: bool) -> Self {
        self.is_secret = is_secret;
        self
    }

    pub fn success(mut self, is_success: bool) -> Self {
        self.is_success = is_success;
        self
    }

    pub fn failure(mut self, is_failure: bool) -> Self {
        self.is_failure = is_failure;
        self
    }

    pub fn critical(mut self, is_critical: bool) -> Self {
        self.is_critical = is_critical;
        self
    }

    pub fn fumble(mut self, is_fumble: bool) -> Self {
        self.is_fumble = is_fumble;
        self
    }

    /// Sets success and failure from one verdict.
    pub fn condition(mut self, condition: bool) -> Self {
        self.is_success = condition;
        self.is_failure = !condition;
        self
    }

    pub fn rolls(mut self, rolls: Vec<(i64, i64)>) -> Self {
        self.rolls = rolls;
        self
    }

    pub fn detailed_rolls(mut self, detailed_rolls: Vec<DetailedRoll>) -> Self {
        self.detailed_rolls = detailed_rolls;
        self
    }

    pub fn build(self) -> CommandResult {
        CommandResult {
            text: self.text,
            is_secret: self.is_secret,
            is_success: self.is_success,
            is_failure: self.is_failure,
            is_critical: self.is_critical,
            is_fumble: self.is_fumble,
            rolls: self.rolls,
            detailed_rolls: self.detailed_rolls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_sets_both_flags() {
        let result = CommandResult::builder("x").condition(true).build();
        assert!(result.is_success);
        assert!(!result.is_failure);

        let result = CommandResult::builder("x").condition(false).build();
        assert!(!result.is_success);
        assert!(result.is_failure);
    }

    #[test]
    fn test_constructors() {
        assert!(CommandResult::success("s").is_success);
        assert!(CommandResult::failure("f").is_failure);
        let critical = CommandResult::critical("c");
        assert!(critical.is_success && critical.is_critical);
        let fumble = CommandResult::fumble("f");
        assert!(fumble.is_failure && fumble.is_fumble);
    }

    #[test]
    fn test_builder_defaults() {
        let result = CommandResult::builder("2D6 ＞ 7").build();
        assert_eq!(result.text, "2D6 ＞ 7");
        assert!(!result.is_secret);
        assert!(result.rolls.is_empty());
    }
}
