use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".translintrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Glob patterns or literal path prefixes to skip while walking.
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Directories (or directory globs) to scan. Empty means the whole
    /// project root.
    #[serde(default)]
    pub includes: Vec<String>,
    /// File extensions treated as templates.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Regex patterns; findings whose text matches any of them are dropped.
    #[serde(default)]
    pub ignore_texts: Vec<String>,
    /// Extra attribute names (exact match) that mark an element's content as
    /// translated, in addition to `translate` and the `-translate` suffix
    /// convention.
    #[serde(default)]
    pub translate_attributes: Vec<String>,
}

pub fn default_extensions() -> Vec<String> {
    ["html", "htm", "djhtml", "jinja", "jinja2"]
        .map(String::from)
        .to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            includes: Vec::new(),
            extensions: default_extensions(),
            ignore_texts: Vec::new(),
            translate_attributes: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores`/`includes` or any
    /// regex in `ignoreTexts` fails to parse.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Include patterns without wildcards are literal directory paths and
        // need no validation.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for pattern in &self.ignore_texts {
            Regex::new(pattern)
                .with_context(|| format!("Invalid regex in 'ignoreTexts': \"{}\"", pattern))?;
        }

        Ok(())
    }

    /// Compile the `ignoreTexts` patterns. Call after [`Config::validate`].
    pub fn compiled_ignore_texts(&self) -> Result<Vec<Regex>> {
        self.ignore_texts
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid regex in 'ignoreTexts': \"{}\"", pattern))
            })
            .collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
