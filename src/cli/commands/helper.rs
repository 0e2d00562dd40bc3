use super::{CommandResult, CommandSummary};
use crate::issues::{Issue, Rule, Severity};

pub fn finish(summary: CommandSummary, mut issues: Vec<Issue>, files_checked: usize) -> CommandResult {
    issues.sort();

    let read_error_count = issues
        .iter()
        .filter(|i| matches!(i.rule, Rule::ReadError))
        .count();

    let error_count = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();

    CommandResult {
        summary,
        issues,
        error_count,
        read_error_count,
        files_checked,
    }
}
