use std::fmt;

/// One contiguous run of untranslated plain text found in a template.
///
/// `line` and `col` locate the first character of the run in the original
/// source, both 1-indexed and counted in characters, not bytes. `text` has
/// leading and trailing whitespace stripped; internal whitespace is kept
/// exactly as it appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub line: usize,
    pub col: usize,
    pub text: String,
}

impl Finding {
    pub fn new(line: usize, col: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            col,
            text: text.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.col, self.text)
    }
}
