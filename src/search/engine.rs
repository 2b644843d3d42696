use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::Result;
use crate::fs::list_directory;

pub const DEFAULT_MAX_FILES: usize = 2000;

const SKIP_DIRS: &[&str] = &[".git", "node_modules", ".markspace", "dist", "target"];

fn searchable_file() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\.(md|txt|js|ts|svelte|css|html|json|toml|rs|yml|yaml)$").expect("valid extension regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    /// 1-based line number
    pub line: usize,
    pub line_content: String,
    /// Absolute char offsets into the file
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub file_path: String,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub query: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default)]
    pub whole_word: bool,
    pub root_path: String,
    #[serde(default)]
    pub max_files: Option<usize>,
}

impl SearchOptions {
    pub fn build_pattern(&self) -> Result<Regex> {
        let mut pattern = if self.use_regex {
            self.query.clone()
        } else {
            regex::escape(&self.query)
        };
        if self.whole_word {
            pattern = format!(r"\b{}\b", pattern);
        }
        Ok(RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .build()?)
    }
}

/// Recursively searches `root_path` for `query`, one file at a time.
///
/// An empty root or query yields no results. Unreadable files are skipped.
pub fn global_search(options: &SearchOptions) -> Result<Vec<SearchResult>> {
    let mut results = Vec::new();
    if options.root_path.is_empty() || options.query.is_empty() {
        return Ok(results);
    }

    let pattern = options.build_pattern()?;
    let mut walker = Walker {
        pattern: &pattern,
        max_files: options.max_files.unwrap_or(DEFAULT_MAX_FILES),
        file_count: 0,
        results: &mut results,
    };
    walker.walk(&options.root_path);

    log::debug!(
        "search for {:?} scanned {} files, {} with matches",
        options.query,
        walker.file_count,
        results.len()
    );
    Ok(results)
}

struct Walker<'a> {
    pattern: &'a Regex,
    max_files: usize,
    file_count: usize,
    results: &'a mut Vec<SearchResult>,
}

impl Walker<'_> {
    fn walk(&mut self, dir: &str) {
        if self.file_count >= self.max_files {
            return;
        }

        let entries = match list_directory(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("search walk error in {}: {}", dir, e);
                return;
            }
        };

        for entry in entries {
            if self.file_count >= self.max_files {
                break;
            }
            if entry.is_dir() {
                if !SKIP_DIRS.contains(&entry.name.as_str()) {
                    self.walk(&entry.path);
                }
            } else if searchable_file().is_match(&entry.name) {
                self.file_count += 1;
                self.search_file(&entry.path);
            }
        }
    }

    fn search_file(&mut self, path: &str) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("skipping {}: {}", path, e);
                return;
            }
        };

        let matches = search_text(self.pattern, &content);
        if !matches.is_empty() {
            self.results.push(SearchResult {
                file_path: path.to_string(),
                matches,
            });
        }
    }
}

/// Scans `content` line by line. Offsets are absolute char offsets, with
/// each line break counted as one char.
pub fn search_text(pattern: &Regex, content: &str) -> Vec<SearchMatch> {
    let mut matches = Vec::new();
    let mut line_offset = 0;

    for (i, line) in content.split('\n').enumerate() {
        for m in pattern.find_iter(line) {
            let start = line_offset + line[..m.start()].chars().count();
            let len = m.as_str().chars().count();
            matches.push(SearchMatch {
                line: i + 1,
                line_content: line.trim().to_string(),
                start,
                end: start + len,
            });
        }
        line_offset += line.chars().count() + 1;
    }

    matches
}
