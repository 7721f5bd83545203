//! Command line parsing.
//!
//! The command line is `astyle-fmt [--options...] [files...]`: every leading argument that
//! starts with `--` is an option, the first one that does not starts the file list. Options
//! the tool understands are handed to [`argh`]; all others are forwarded to the formatter
//! unchanged.

use crate::error::CliError;
use argh::FromArgs;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Check or fix the formatting of C, C++, C# and Java files.
///
/// Options not listed here are passed to the formatter, for example `--style=allman`.
#[derive(FromArgs, Debug, Default, PartialEq)]
pub struct ToolArgs {
    /// only check formatting; exit with status 1 if any file would change
    #[argh(switch)]
    pub dry_run: bool,

    /// do not print diagnostics
    #[argh(switch)]
    pub quiet: bool,

    /// print the version and exit
    #[argh(switch)]
    pub version: bool,

    /// version of the formatting engine to use
    #[argh(option)]
    pub astyle_version: Option<String>,

    /// file with further options, one per line
    #[argh(option)]
    pub options: Vec<PathBuf>,

    /// exclude files matching the pattern
    #[argh(option)]
    pub exclude: Vec<String>,

    /// file with exclude patterns, one per line
    #[argh(option)]
    pub exclude_list: Vec<PathBuf>,

    /// rules file (YAML) selecting options per file
    #[argh(option)]
    pub rules: Option<PathBuf>,
}

const SWITCHES: [&str; 3] = ["dry-run", "quiet", "version"];
const VALUE_OPTIONS: [&str; 5] = ["astyle-version", "options", "exclude", "exclude-list", "rules"];

/// A parsed command line.
#[derive(Debug, Default, PartialEq)]
pub struct Invocation {
    pub tool: ToolArgs,
    /// Options for the formatter, in command line order.
    pub forwarded: Vec<String>,
    /// Exclude patterns from `--exclude` and `--exclude-list` files.
    pub excludes: Vec<String>,
    pub files: Vec<PathBuf>,
}

/// Result of parsing the command line.
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Invocation),
    /// `--help` was given; holds the usage text.
    Help(String),
}

/// Parses the arguments following the program name.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Command, CliError> {
    let split = args
        .iter()
        .position(|arg| !arg.as_ref().starts_with("--"))
        .unwrap_or(args.len());
    let (options, files) = args.split_at(split);

    let mut pending: VecDeque<String> = options.iter().map(|o| o.as_ref().to_owned()).collect();
    let mut tool_argv = Vec::new();
    let mut forwarded = Vec::new();
    let mut excludes = Vec::new();

    while let Some(option) = pending.pop_front() {
        let trimmed = option.strip_prefix("--").unwrap_or(&option);
        let (name, value) = match trimmed.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (trimmed, None),
        };

        if name == "help" {
            tool_argv.push(String::from("--help"));
        } else if SWITCHES.contains(&name) {
            tool_argv.push(format!("--{name}"));
            tool_argv.extend(value.map(str::to_owned));
        } else if VALUE_OPTIONS.contains(&name) {
            let value = value
                .filter(|value| !value.is_empty())
                .ok_or_else(|| CliError::MissingValue(name.to_owned()))?;
            match name {
                "options" => pending.extend(read_lines(Path::new(value))?),
                "exclude" => excludes.push(value.to_owned()),
                "exclude-list" => excludes.extend(read_lines(Path::new(value))?),
                _ => {}
            }
            tool_argv.push(format!("--{name}"));
            tool_argv.push(value.to_owned());
        } else {
            forwarded.push(option);
        }
    }

    let argv: Vec<&str> = tool_argv.iter().map(String::as_str).collect();
    let tool = match ToolArgs::from_args(&["astyle-fmt"], &argv) {
        Ok(tool) => tool,
        Err(exit) if exit.status.is_ok() => return Ok(Command::Help(exit.output)),
        Err(exit) => return Err(CliError::Args(exit.output.trim_end().to_owned())),
    };

    if tool.rules.is_some() && !(forwarded.is_empty() && excludes.is_empty()) {
        return Err(CliError::RulesConflict);
    }

    tracing::debug!(?tool, ?forwarded, excludes = excludes.len(), "parsed command line");
    Ok(Command::Run(Invocation {
        tool,
        forwarded,
        excludes,
        files: files.iter().map(|f| PathBuf::from(f.as_ref())).collect(),
    }))
}

/// Reads the non-empty lines of `path` that do not start with `#`, trimmed.
pub fn read_lines(path: &Path) -> Result<Vec<String>, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn run(args: &[&str]) -> Invocation {
        match parse_args(args).unwrap() {
            Command::Run(invocation) => invocation,
            Command::Help(_) => panic!("unexpected help"),
        }
    }

    #[test]
    fn defaults() {
        let invocation = run(&[]);
        assert!(!invocation.tool.quiet);
        assert!(!invocation.tool.dry_run);
        assert!(invocation.files.is_empty());
    }

    #[test]
    fn splits_options_from_files() {
        let invocation = run(&["--quiet", "--dry-run", "--exclude=foo.c", "bar.c", "baz.c"]);
        assert!(invocation.tool.quiet);
        assert!(invocation.tool.dry_run);
        assert_eq!(invocation.files, [PathBuf::from("bar.c"), PathBuf::from("baz.c")]);
        assert_eq!(invocation.excludes, ["foo.c"]);
        assert!(invocation.forwarded.is_empty());
    }

    #[test]
    fn arguments_after_first_file_are_files() {
        let invocation = run(&["--style=allman", "a.c", "--quiet"]);
        assert!(!invocation.tool.quiet);
        assert_eq!(invocation.forwarded, ["--style=allman"]);
        assert_eq!(invocation.files, [PathBuf::from("a.c"), PathBuf::from("--quiet")]);
    }

    #[rstest]
    #[case::exclude("--exclude")]
    #[case::exclude_list("--exclude-list")]
    #[case::options("--options")]
    #[case::rules("--rules")]
    #[case::astyle_version("--astyle-version=")]
    fn value_options_require_a_value(#[case] option: &str) {
        let error = parse_args(&[option]).unwrap_err();
        let name = option.trim_start_matches("--").trim_end_matches('=');
        assert_eq!(error.to_string(), format!("Option --{name} requires a value"));
    }

    #[test]
    fn reads_options_and_excludes_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let exclude_list = dir.path().join("exclude.txt");
        fs::write(&exclude_list, "# comment\n*.inc\n/sub/**/*.c").unwrap();
        let options = dir.path().join("options.txt");
        fs::write(&options, "--style=otbs\n# comment 2\n\n--attach-namespaces\n").unwrap();

        let invocation = run(&[
            "--cmdline-arg=foo",
            "--exclude=bar.c",
            &format!("--exclude-list={}", exclude_list.display()),
            &format!("--options={}", options.display()),
        ]);
        assert_eq!(invocation.excludes, ["bar.c", "*.inc", "/sub/**/*.c"]);
        assert_eq!(
            invocation.forwarded,
            ["--cmdline-arg=foo", "--style=otbs", "--attach-namespaces"]
        );
        assert_eq!(invocation.tool.options, [options]);
    }

    #[test]
    fn options_file_may_hold_tool_options() {
        let dir = tempfile::tempdir().unwrap();
        let options = dir.path().join("options.txt");
        fs::write(&options, "dry-run\nexclude=*.h\npad-oper\n").unwrap();

        let invocation = run(&[&format!("--options={}", options.display())]);
        assert!(invocation.tool.dry_run);
        assert_eq!(invocation.excludes, ["*.h"]);
        assert_eq!(invocation.forwarded, ["pad-oper"]);
    }

    #[rstest]
    #[case::forwarded(&["--rules=r.yml", "--style=java"])]
    #[case::exclude(&["--rules=r.yml", "--exclude=*.h"])]
    fn rules_exclude_other_selection(#[case] args: &[&str]) {
        assert!(matches!(parse_args(args), Err(CliError::RulesConflict)));
    }

    #[test]
    fn astyle_version_is_parsed() {
        let invocation = run(&["--astyle-version=3.1", "--version"]);
        assert_eq!(invocation.tool.astyle_version.as_deref(), Some("3.1"));
        assert!(invocation.tool.version);
    }

    #[test]
    fn help_is_reported() {
        assert!(matches!(parse_args(&["--help"]), Ok(Command::Help(_))));
    }

    #[test]
    fn switch_with_value_is_rejected() {
        assert!(matches!(
            parse_args(&["--quiet=yes"]),
            Err(CliError::Args(_))
        ));
    }
}
