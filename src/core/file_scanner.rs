use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Patterns without wildcards are literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Component source files, sorted.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    ignore_test_files: bool,
    verbose: bool,
) -> ScanResult {
    let mut files: BTreeSet<String> = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Pattern::new("**/node_modules/**").into_iter().collect();

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
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    if ignore_test_files {
        glob_patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = base_dir.join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
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
                let path = base_dir.join(inc);
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

            if path.is_file() && is_component_source(path) {
                files.insert(path_str.into());
            }
        }
    }

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

/// TypeScript and JavaScript sources; declaration files carry no classes to discover.
fn is_component_source(path: &Path) -> bool {
    let name = path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.ends_with(".d.ts") {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts" | "tsx" | "js" | "jsx" | "mjs")
    )
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names(result: &ScanResult, base: &Path) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| {
                Path::new(f)
                    .strip_prefix(base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_component_sources() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        File::create(src.join("button.ts")).unwrap();
        File::create(src.join("types.d.ts")).unwrap();
        File::create(src.join("button.css")).unwrap();
        File::create(src.join("button.test.ts")).unwrap();

        let result = scan_files(dir.path(), &["src".to_owned()], &[], true, false);
        assert_eq!(names(&result, dir.path()), vec!["src/button.ts"]);

        let result = scan_files(dir.path(), &["src".to_owned()], &[], false, false);
        assert_eq!(
            names(&result, dir.path()),
            vec!["src/button.test.ts", "src/button.ts"]
        );
    }

    #[test]
    fn test_scan_ignores_node_modules_and_patterns() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("node_modules/lit")).unwrap();
        File::create(base.join("node_modules/lit/index.js")).unwrap();
        fs::create_dir_all(base.join("src/legacy")).unwrap();
        File::create(base.join("src/legacy/old.ts")).unwrap();
        fs::create_dir_all(base.join("src/gen")).unwrap();
        File::create(base.join("src/gen/out.ts")).unwrap();
        File::create(base.join("src/app.ts")).unwrap();

        let result = scan_files(
            base,
            &[],
            &["src/legacy".to_owned(), "**/gen/**".to_owned()],
            false,
            false,
        );
        assert_eq!(names(&result, base), vec!["src/app.ts"]);
    }

    #[test]
    fn test_scan_with_glob_includes() {
        let dir = tempdir().unwrap();
        let base = dir.path();
        for pkg in ["a", "b"] {
            let src = base.join("packages").join(pkg).join("src");
            fs::create_dir_all(&src).unwrap();
            File::create(src.join("index.ts")).unwrap();
        }

        let includes = ["packages/*/src".to_owned(), "missing".to_owned()];
        let result = scan_files(base, &includes, &[], false, false);
        assert_eq!(
            names(&result, base),
            vec!["packages/a/src/index.ts", "packages/b/src/index.ts"]
        );
    }
}
