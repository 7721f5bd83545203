//! CODEOWNERS style path patterns.
//!
//! Patterns are matched against paths relative to the directory the tool runs in, written
//! with forward slashes and a leading `/`:
//!
//! - a pattern not starting with `/` matches at any depth, `*.c` matches `/a/b.c`
//! - a pattern ending with `/` matches everything below that directory
//! - `*` matches within one path component, `?` matches one character
//! - `**/` matches any number of components; `**` anywhere else is rejected

use crate::error::CliError;
use regex::Regex;
use std::path::{Component, Path};

/// Converts a pattern into a regular expression string.
pub fn pattern_to_regex(pattern: &str) -> Result<String, CliError> {
    let mut glob = String::with_capacity(pattern.len() + 8);
    if !pattern.starts_with('/') {
        glob.push_str("/**/");
    }
    glob.push_str(pattern);
    if glob.ends_with('/') {
        glob.push_str("**/*");
    }

    let mut regex = String::with_capacity(glob.len() * 2);
    let mut rest = glob.as_str();
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("**/") {
            regex.push_str("(?:.*/)?");
            rest = tail;
            continue;
        }
        if rest.starts_with("**") {
            return Err(CliError::InvalidPattern(pattern.to_owned()));
        }
        match c {
            '*' => regex.push_str("[^/]*"),
            '.' => regex.push_str("[.]"),
            '?' => regex.push('.'),
            _ => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        rest = &rest[c.len_utf8()..];
    }

    regex.push('$');
    if regex.starts_with('/') {
        regex.insert(0, '^');
    }
    Ok(regex)
}

/// Compiles a pattern.
pub fn compile(pattern: &str) -> Result<Regex, CliError> {
    let regex = pattern_to_regex(pattern)?;
    Regex::new(&regex).map_err(|source| CliError::Regex {
        pattern: pattern.to_owned(),
        source,
    })
}

/// Compiles every pattern in `patterns`.
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, CliError> {
    patterns.iter().map(|p| compile(p.as_ref())).collect()
}

/// Writes `path` the way patterns expect it: normalised, with forward slashes and a
/// leading `/`.
pub fn match_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut rooted = false;
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                parts.push(prefix.as_os_str().to_string_lossy().replace('\\', "/"))
            }
            Component::RootDir => rooted = true,
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(String::from("..")),
            },
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
        }
    }

    let mut normalised = String::from("/");
    if rooted {
        normalised.push('/');
    }
    normalised.push_str(&parts.join("/"));
    normalised
}

/// Returns `true` if any of `patterns` matches `path`.
pub fn matches_any(path: &Path, patterns: &[Regex]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let path = match_path(path);
    patterns.iter().any(|regex| regex.is_match(&path))
}
