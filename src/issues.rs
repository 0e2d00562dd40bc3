use std::{cmp::Ordering, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    UntranslatedText,
    ReadError,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::UntranslatedText => write!(f, "untranslated-text"),
            Rule::ReadError => write!(f, "read-error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
    pub message: String,
    pub severity: Severity,
    pub rule: Rule,
    pub source_line: Option<String>,
}

impl Issue {
    pub fn untranslated(
        file_path: &str,
        line: usize,
        col: usize,
        text: &str,
        source_line: Option<String>,
    ) -> Self {
        Self {
            file_path: file_path.to_string(),
            line,
            col,
            message: text.to_string(),
            severity: Severity::Error,
            rule: Rule::UntranslatedText,
            source_line,
        }
    }

    pub fn read_error(file_path: &str, error: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            line: 1,
            col: 1,
            message: format!("Failed to read: {}", error),
            severity: Severity::Error,
            rule: Rule::ReadError,
            source_line: None,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> Ordering {
        // Message comparison keeps the order deterministic when several
        // issues land on the same position.
        self.file_path
            .cmp(&other.file_path)
            .then_with(|| self.line.cmp(&other.line))
            .then_with(|| self.col.cmp(&other.col))
            .then_with(|| self.message.cmp(&other.message))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
