//! Selection of the files to format and the options for each.

use crate::args::Invocation;
use crate::error::CliError;
use crate::patterns::{compile_all, matches_any};
use crate::rules::Rules;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub path: PathBuf,
    pub options: String,
}

/// Files left to format, in command line order.
pub fn select_files(invocation: &Invocation) -> Result<Vec<FileItem>, CliError> {
    match &invocation.tool.rules {
        Some(rules) => {
            let rules = Rules::load(rules)?;
            Ok(select_with_rules(&invocation.files, &rules))
        }
        None => select_simple(
            &invocation.files,
            &invocation.excludes,
            &invocation.forwarded.join(" "),
        ),
    }
}

fn select_simple(
    files: &[PathBuf],
    excludes: &[String],
    options: &str,
) -> Result<Vec<FileItem>, CliError> {
    let excludes = compile_all(excludes)?;
    Ok(files
        .iter()
        .filter(|path| !matches_any(path, &excludes))
        .map(|path| FileItem {
            path: path.clone(),
            options: options.to_owned(),
        })
        .collect())
}

fn select_with_rules(files: &[PathBuf], rules: &Rules) -> Vec<FileItem> {
    files
        .iter()
        .filter_map(|path| {
            let rule = rules.select(path);
            tracing::trace!(path = %path.display(), rule = %rule.name, check = rule.check, "selected rule");
            rule.check.then(|| FileItem {
                path: path.clone(),
                options: rule.options.clone(),
            })
        })
        .collect()
}
