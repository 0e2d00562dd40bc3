use std::fs;

use anyhow::Result;
use rayon::prelude::*;
use regex::Regex;

use super::super::args::CheckCommand;
use super::{CommandResult, CommandSummary, helper::finish};

use crate::{
    config::load_config,
    core::{Scanner, TranslateMarkers, file_scanner::scan_files},
    issues::Issue,
};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let root = args.path.to_string_lossy().to_string();

    let loaded = load_config(&args.path)?;
    let config = loaded.config;
    if args.verbose && loaded.from_file {
        eprintln!("Using configuration file found from {}", root);
    }

    let scan_result = scan_files(
        &root,
        &config.includes,
        &config.ignores,
        &config.extensions,
        args.verbose,
    );
    if args.verbose && scan_result.skipped_count > 0 {
        eprintln!(
            "Skipped {} inaccessible path(s) during discovery",
            scan_result.skipped_count
        );
    }

    let ignore_texts = config.compiled_ignore_texts()?;
    let markers = TranslateMarkers::new(config.translate_attributes.clone());

    let mut files: Vec<String> = scan_result.files.into_iter().collect();
    files.sort();

    let per_file: Vec<Vec<Issue>> = files
        .par_iter()
        .map(|path| check_file(path, &markers, &ignore_texts))
        .collect();
    let issues: Vec<Issue> = per_file.into_iter().flatten().collect();

    Ok(finish(CommandSummary::Check, issues, files.len()))
}

/// Scan one template file. Read failures become issues rather than aborting
/// the run, so a single unreadable file cannot take down a whole check.
fn check_file(path: &str, markers: &TranslateMarkers, ignore_texts: &[Regex]) -> Vec<Issue> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => return vec![Issue::read_error(path, &err.to_string())],
    };

    let lines: Vec<&str> = source.lines().collect();
    Scanner::with_markers(&source, markers.clone())
        .filter(|finding| !ignore_texts.iter().any(|re| re.is_match(&finding.text)))
        .map(|finding| {
            let source_line = lines.get(finding.line - 1).map(|line| line.to_string());
            Issue::untranslated(path, finding.line, finding.col, &finding.text, source_line)
        })
        .collect()
}
