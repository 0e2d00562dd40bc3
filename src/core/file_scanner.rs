use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of discovering template files.
pub struct ScanResult {
    pub files: HashSet<String>,
    pub skipped_count: usize,
}

/// Walk the include directories under `base_dir` and collect every template
/// file that survives the ignore patterns.
///
/// `includes` entries are literal directory paths unless they contain glob
/// wildcards, in which case they expand to matching directories. `ignores`
/// mixes literal path prefixes and glob patterns the same way. `extensions`
/// is the set of file extensions considered templates, compared
/// case-insensitively.
pub fn scan_files(
    base_dir: &str,
    includes: &[String],
    ignore_patterns: &[String],
    extensions: &[String],
    verbose: bool,
) -> ScanResult {
    let mut files: HashSet<String> = HashSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            let path = Path::new(base_dir).join(p);
            literal_ignore_paths.push(path);
        }
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![Path::new(base_dir).to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = Path::new(base_dir).join(inc);
                let pattern_str = full_pattern.to_string_lossy();
                match glob(&pattern_str) {
                    Ok(entries) => {
                        for entry in entries.flatten() {
                            if entry.is_dir() {
                                paths.push(entry);
                            }
                        }
                    }
                    Err(e) => {
                        if verbose {
                            eprintln!(
                                "{} Invalid glob pattern '{}': {}",
                                "warning:".bold().yellow(),
                                inc,
                                e
                            );
                        }
                    }
                }
            } else {
                let path = Path::new(base_dir).join(inc);
                if path.exists() {
                    paths.push(path);
                } else if verbose {
                    eprintln!(
                        "{} Include path does not exist: {}",
                        "warning:".bold().yellow(),
                        path.display()
                    );
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && is_template_file(path, extensions) {
                files.insert(path_str.into());
            }
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}

fn is_template_file(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::config::default_extensions;

    fn scan(dir: &Path, includes: &[String], ignores: &[String]) -> ScanResult {
        scan_files(
            dir.to_str().unwrap(),
            includes,
            ignores,
            &default_extensions(),
            false,
        )
    }

    #[test]
    fn collects_template_files_only() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("index.html")).unwrap();
        File::create(dir.path().join("base.djhtml")).unwrap();
        File::create(dir.path().join("style.css")).unwrap();
        File::create(dir.path().join("app.js")).unwrap();

        let result = scan(dir.path(), &[], &[]);

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.ends_with("index.html")));
        assert!(result.files.iter().any(|f| f.ends_with("base.djhtml")));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("INDEX.HTML")).unwrap();

        let result = scan(dir.path(), &[], &[]);
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn walks_nested_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("templates").join("account");
        fs::create_dir_all(&nested).unwrap();
        File::create(nested.join("login.html")).unwrap();

        let result = scan(dir.path(), &[], &[]);
        assert_eq!(result.files.len(), 1);
        assert!(
            result
                .files
                .iter()
                .any(|f| f.ends_with("account/login.html"))
        );
    }

    #[test]
    fn glob_ignore_pattern_excludes_files() {
        let dir = tempdir().unwrap();
        let vendored = dir.path().join("vendor");
        fs::create_dir(&vendored).unwrap();
        File::create(vendored.join("widget.html")).unwrap();
        File::create(dir.path().join("index.html")).unwrap();

        let result = scan(dir.path(), &[], &["**/vendor/**".to_owned()]);

        assert_eq!(result.files.len(), 1);
        assert!(!result.files.iter().any(|f| f.contains("vendor")));
    }

    #[test]
    fn literal_ignore_path_excludes_subtree() {
        let dir = tempdir().unwrap();
        let r#gen = dir.path().join("templates").join("generated");
        fs::create_dir_all(&r#gen).unwrap();
        File::create(r#gen.join("auto.html")).unwrap();
        let templates = dir.path().join("templates");
        File::create(templates.join("index.html")).unwrap();

        let result = scan(dir.path(), &[], &["templates/generated".to_owned()]);

        assert_eq!(result.files.len(), 1);
        assert!(!result.files.iter().any(|f| f.contains("generated")));
    }

    #[test]
    fn includes_restrict_the_walk() {
        let dir = tempdir().unwrap();
        let templates = dir.path().join("templates");
        fs::create_dir(&templates).unwrap();
        File::create(templates.join("index.html")).unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        File::create(docs.join("guide.html")).unwrap();

        let result = scan(dir.path(), &["templates".to_owned()], &[]);

        assert_eq!(result.files.len(), 1);
        assert!(result.files.iter().any(|f| f.ends_with("index.html")));
    }

    #[test]
    fn nonexistent_include_is_skipped() {
        let dir = tempdir().unwrap();
        let templates = dir.path().join("templates");
        fs::create_dir(&templates).unwrap();
        File::create(templates.join("index.html")).unwrap();

        let result = scan(
            dir.path(),
            &["templates".to_owned(), "missing".to_owned()],
            &[],
        );
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn glob_include_expands_to_directories() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("apps").join("shop");
        fs::create_dir_all(&a).unwrap();
        File::create(a.join("cart.html")).unwrap();
        let b = dir.path().join("apps").join("blog");
        fs::create_dir_all(&b).unwrap();
        File::create(b.join("post.html")).unwrap();
        let other = dir.path().join("static");
        fs::create_dir(&other).unwrap();
        File::create(other.join("page.html")).unwrap();

        let result = scan(dir.path(), &["apps/*".to_owned()], &[]);

        assert_eq!(result.files.len(), 2);
        assert!(!result.files.iter().any(|f| f.contains("static")));
    }

    #[test]
    fn overlapping_includes_deduplicate() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("templates").join("shop");
        fs::create_dir_all(&nested).unwrap();
        File::create(nested.join("cart.html")).unwrap();

        let result = scan(
            dir.path(),
            &["templates".to_owned(), "templates/shop".to_owned()],
            &[],
        );
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn is_glob_pattern_detection() {
        assert!(is_glob_pattern("templates/*"));
        assert!(is_glob_pattern("**/*.html"));
        assert!(is_glob_pattern("file?.html"));
        assert!(!is_glob_pattern("templates"));
        assert!(!is_glob_pattern("templates/shop"));
    }
}
