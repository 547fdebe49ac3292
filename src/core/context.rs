//! Host side of a discovery run: configuration, file discovery and parsing.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        file_scanner::scan_files,
        model::{Program, lower::lower_module},
        parsers::typescript::{ParsedSource, parse_ts_source},
        utils::normalize_path,
    },
    issues::ParseErrorIssue,
};

/// Everything a discovery run needs before the pipeline starts.
pub struct DiscoverContext {
    pub config: Config,
    /// Directory the config search started from and globs are resolved against.
    pub root_dir: PathBuf,
    /// Source files to parse, sorted.
    pub files: Vec<String>,
    pub verbose: bool,
    /// Paths that could not be walked.
    pub skipped_count: usize,
}

impl DiscoverContext {
    /// Load configuration (CLI args > config file > defaults) and scan source files.
    ///
    /// `source_root` is where the config search starts; the config's own
    /// `sourceRoot` is then resolved against it for scanning.
    pub fn new(source_root: Option<&Path>, verbose: bool) -> Result<Self> {
        let start_dir = source_root
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&start_dir)?;
        if verbose && !config_result.from_file {
            eprintln!("Note: No {CONFIG_FILE_NAME} found, using default configuration");
        }
        let config = config_result.config;

        let mut root_dir = normalize_path(&start_dir.join(&config.source_root));
        if root_dir.as_os_str().is_empty() {
            root_dir = PathBuf::from(".");
        }
        let scan_result = scan_files(
            &root_dir,
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
            verbose,
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose,
            skipped_count: scan_result.skipped_count,
        })
    }

    /// Read and parse every scanned file in parallel, then lower them into a
    /// [`Program`]. Unreadable or unparsable files become issues and are left out.
    pub fn load_program(&self) -> (Program, Vec<ParseErrorIssue>) {
        let results: Vec<(String, Result<ParsedSource>)> = self
            .files
            .par_iter()
            .map(|file_path| {
                let display_path = display_path(file_path);
                let parsed = std::fs::read_to_string(file_path)
                    .map_err(|e| anyhow::anyhow!("Failed to read file: {}", e))
                    .and_then(|code| {
                        let source_map = Arc::new(swc_common::SourceMap::default());
                        parse_ts_source(code, &display_path, source_map)
                    });
                (display_path, parsed)
            })
            .collect();

        let mut units = Vec::new();
        let mut errors = Vec::new();
        for (file_path, result) in results {
            match result {
                Ok(parsed) => {
                    debug!(path = %file_path, "parsed");
                    units.push(lower_module(units.len(), &file_path, &parsed));
                }
                Err(e) => {
                    if self.verbose {
                        eprintln!("Warning: {} - {}", file_path, e);
                    }
                    errors.push(ParseErrorIssue {
                        file_path,
                        error: e.to_string(),
                    });
                }
            }
        }

        (Program::from_units(units), errors)
    }
}

/// Path as shown to users and stored in metadata.
fn display_path(file_path: &str) -> String {
    normalize_path(Path::new(file_path))
        .to_string_lossy()
        .replace('\\', "/")
}
