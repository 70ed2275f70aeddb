use std::fmt;

/// Comparison operator of a success condition or a reroll threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl CompareOp {
    /// Classifies a run of `< > = !` characters.
    ///
    /// Longer patterns win over their single-character prefixes, so `=<` and
    /// `<=` both mean less-or-equal and `=!` means not-equal. A run that
    /// matches none of the known spellings yields `None` and is treated as a
    /// plain identifier by the lexer.
    pub fn from_run(run: &str) -> Option<Self> {
        if run.is_empty() {
            return None;
        }
        if run.contains("<=") || run.contains("=<") {
            Some(Self::LessOrEqual)
        } else if run.contains(">=") || run.contains("=>") {
            Some(Self::GreaterOrEqual)
        } else if run.contains("<>") || run.contains("!=") || run.contains("=!") {
            Some(Self::NotEqual)
        } else if run.contains('<') {
            Some(Self::LessThan)
        } else if run.contains('>') {
            Some(Self::GreaterThan)
        } else if run.contains('=') {
            Some(Self::Equal)
        } else {
            None
        }
    }

    pub fn compare(self, left: i64, right: i64) -> bool {
        match self {
            Self::Equal => left == right,
            Self::NotEqual => left != right,
            Self::GreaterThan => left > right,
            Self::GreaterOrEqual => left >= right,
            Self::LessThan => left < right,
            Self::LessOrEqual => left <= right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
