//! Glob pattern compilation.
//!
//! Supported syntax:
//! - `*` any run of characters within one path segment
//! - `?` exactly one character within a segment
//! - `**/` zero or more whole directories, `**` at the end matches everything below
//! - `[abc]`, `[a-z]`, `[!abc]` character classes
//! - `{opus,mp3}` alternatives (may nest)
//! - `\x` a literal `x`

use regex_lite::Regex;
use std::path::{Component, Path};

use super::error::DiscoveryError;

/// A compiled glob, matched against `/`-separated relative paths.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compiles a glob pattern.
    pub fn new(pattern: &str) -> Result<Self, DiscoveryError> {
        let translated = translate(pattern)?;
        let regex = Regex::new(&translated)
            .map_err(|e| DiscoveryError::invalid_pattern(pattern, e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The original glob text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches a relative path already using `/` separators.
    pub fn is_match(&self, relative: &str) -> bool {
        self.regex.is_match(relative)
    }

    /// Matches a relative filesystem path, normalizing separators.
    pub fn matches_path(&self, relative: &Path) -> bool {
        let normalized = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        self.is_match(&normalized)
    }
}

fn translate(pattern: &str) -> Result<String, DiscoveryError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut brace_depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let segment_start = i == 0 || chars[i - 1] == '/';
                match chars.get(i + 2) {
                    Some('/') if segment_start => {
                        out.push_str("(?:[^/]*/)*");
                        i += 3;
                    }
                    None if segment_start => {
                        out.push_str(".*");
                        i += 2;
                    }
                    _ => {
                        // `**` glued to other characters acts like `*`
                        out.push_str("[^/]*");
                        i += 2;
                    }
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let (class, next) = translate_class(pattern, &chars, i)?;
                out.push_str(&class);
                i = next;
                continue;
            }
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            '}' if brace_depth > 0 => {
                brace_depth -= 1;
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            '\\' => {
                let escaped = chars
                    .get(i + 1)
                    .ok_or_else(|| DiscoveryError::invalid_pattern(pattern, "trailing escape"))?;
                out.push_str(&regex_lite::escape(&escaped.to_string()));
                i += 2;
                continue;
            }
            other => out.push_str(&regex_lite::escape(&other.to_string())),
        }
        i += 1;
    }

    if brace_depth > 0 {
        return Err(DiscoveryError::invalid_pattern(pattern, "unbalanced '{'"));
    }

    out.push('$');
    Ok(out)
}

/// Translates a `[...]` class starting at `start`, returning the regex class
/// and the index just past the closing bracket.
fn translate_class(
    pattern: &str,
    chars: &[char],
    start: usize,
) -> Result<(String, usize), DiscoveryError> {
    let mut class = String::from("[");
    let mut j = start + 1;

    if matches!(chars.get(j), Some('!') | Some('^')) {
        class.push('^');
        j += 1;
    }
    // a leading ']' is literal
    if chars.get(j) == Some(&']') {
        class.push_str("\\]");
        j += 1;
    }

    while j < chars.len() && chars[j] != ']' {
        let ch = chars[j];
        if matches!(ch, '\\' | '[' | '&' | '~') {
            class.push('\\');
        }
        class.push(ch);
        j += 1;
    }

    if j >= chars.len() {
        return Err(DiscoveryError::invalid_pattern(
            pattern,
            "unterminated character class",
        ));
    }

    class.push(']');
    Ok((class, j + 1))
}
