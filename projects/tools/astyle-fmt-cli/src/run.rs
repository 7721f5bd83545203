use crate::args::{parse_args, Command};
use crate::error::CliError;
use crate::files::{select_files, FileItem};
use astyle_fmt_api::{transform, ErrorEvent, GlobalOutputAllocator, ASTYLE_VERSION};
use bytesize::ByteSize;
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// Engine versions that can be selected with `--astyle-version`.
const AVAILABLE_VERSIONS: [&str; 1] = [ASTYLE_VERSION];

/// What formatting a file found.
#[derive(Debug, PartialEq)]
enum Outcome {
    Unchanged,
    Changed(String),
    Failed(String),
}

/// Writes diagnostics unless `--quiet` was given.
struct Diagnostics<'w, W: Write> {
    writer: &'w mut W,
    quiet: bool,
}

impl<W: Write> Diagnostics<'_, W> {
    fn line(&mut self, message: std::fmt::Arguments<'_>) -> Result<(), CliError> {
        if !self.quiet {
            writeln!(self.writer, "{message}")?;
        }
        Ok(())
    }
}

/// Runs the tool with the arguments following the program name and returns the exit
/// status.
pub fn run<O: Write, E: Write>(args: &[String], out: &mut O, err: &mut E) -> Result<u8, CliError> {
    let invocation = match parse_args(args)? {
        Command::Run(invocation) => invocation,
        Command::Help(usage) => {
            write!(out, "{usage}")?;
            return Ok(0);
        }
    };

    let version = invocation
        .tool
        .astyle_version
        .as_deref()
        .unwrap_or(ASTYLE_VERSION);
    if !AVAILABLE_VERSIONS.contains(&version) {
        return Err(CliError::UnsupportedVersion {
            requested: version.to_owned(),
            available: AVAILABLE_VERSIONS.join(", "),
        });
    }

    if invocation.tool.version {
        writeln!(
            out,
            "astyle-fmt {} with Astyle v{version}",
            env!("CARGO_PKG_VERSION")
        )?;
        return Ok(0);
    }

    let mut diag = Diagnostics {
        writer: err,
        quiet: invocation.tool.quiet,
    };
    if invocation.files.is_empty() {
        diag.line(format_args!("No files specified"))?;
        return Ok(0);
    }

    let items = select_files(&invocation)?;
    if items.is_empty() {
        if invocation.tool.rules.is_none() {
            diag.line(format_args!(
                "No files checked, excluded by --exclude/--exclude-list option"
            ))?;
        }
        return Ok(0);
    }

    let outcomes = format_all(&items);
    let total_bytes: u64 = outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().ok())
        .map(|(bytes, _)| *bytes)
        .sum();
    tracing::info!(files = items.len(), size = %ByteSize(total_bytes), "formatted files");

    let mut formatted = 0usize;
    let mut with_errors = 0usize;
    for (item, outcome) in items.iter().zip(outcomes) {
        let path = item.path.display();
        match outcome?.1 {
            Outcome::Unchanged => {}
            Outcome::Failed(message) => {
                diag.line(format_args!("Error formatting {path}: error: {message}"))?;
                return Ok(1);
            }
            Outcome::Changed(_) if invocation.tool.dry_run => {
                diag.line(format_args!("Formatting error in {path}"))?;
                with_errors += 1;
            }
            Outcome::Changed(text) => {
                diag.line(format_args!("Formatting {path}"))?;
                fs::write(&item.path, text).map_err(|source| CliError::Write {
                    path: item.path.clone(),
                    source,
                })?;
                formatted += 1;
            }
        }
    }

    if invocation.tool.dry_run {
        if with_errors > 0 {
            diag.line(format_args!(
                "Formatting errors found in {with_errors} files"
            ))?;
            return Ok(1);
        }
    } else if formatted > 0 {
        diag.line(format_args!("Formatted {formatted} files"))?;
    }
    Ok(0)
}

/// Formats every file, in parallel with the `multithreaded` feature. Results are in the
/// order of `items`.
fn format_all(items: &[FileItem]) -> Vec<Result<(u64, Outcome), CliError>> {
    #[cfg(feature = "multithreaded")]
    let outcomes = items.par_iter().map(format_file).collect();
    #[cfg(not(feature = "multithreaded"))]
    let outcomes = items.iter().map(format_file).collect();
    outcomes
}

fn format_file(item: &FileItem) -> Result<(u64, Outcome), CliError> {
    let source = read_file(&item.path)?;
    let mut events: Vec<ErrorEvent> = Vec::new();
    let outcome = match transform(
        &source,
        item.options.as_bytes(),
        &mut events,
        &GlobalOutputAllocator,
    ) {
        Some(output) if output.as_bytes() == source.as_slice() => Outcome::Unchanged,
        Some(output) => Outcome::Changed(output.into_string()),
        None => Outcome::Failed(
            events
                .into_iter()
                .map(|event| event.message)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    };
    tracing::debug!(path = %item.path.display(), ?outcome, "formatted file");
    Ok((source.len() as u64, outcome))
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const UNFORMATTED: &str = "int main() { foo(); }\n";
    const FORMATTED: &str = "int main()\n{\n    foo();\n}\n";

    struct Output {
        status: u8,
        out: String,
        err: String,
    }

    fn invoke(args: &[&str]) -> Output {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let status = match run(&args, &mut out, &mut err) {
            Ok(status) => status,
            Err(error) => {
                writeln!(err, "{error}").unwrap();
                1
            }
        };
        Output {
            status,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    /// A directory holding `file_a.c` (unformatted) and `file_b.c` (formatted).
    fn sources() -> (TempDir, String, String) {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("file_a.c");
        let b = dir.path().join("file_b.c");
        fs::write(&a, UNFORMATTED).unwrap();
        fs::write(&b, FORMATTED).unwrap();
        let display = |path: PathBuf| path.display().to_string();
        (dir, display(a), display(b))
    }

    #[test]
    fn prints_version() {
        let output = invoke(&["--version"]);
        assert_eq!(output.status, 0);
        assert_eq!(
            output.out,
            format!("astyle-fmt {} with Astyle v3.1\n", env!("CARGO_PKG_VERSION"))
        );
        assert_eq!(output.err, "");
    }

    #[test]
    fn rejects_unknown_engine_version() {
        let output = invoke(&["--astyle-version=1.2.3"]);
        assert_eq!(output.status, 1);
        assert_eq!(output.out, "");
        assert!(output
            .err
            .contains("Unsupported astyle version: 1.2.3. Available versions: 3.1"));
    }

    #[test]
    fn option_requires_value() {
        let output = invoke(&["--exclude"]);
        assert_eq!(output.status, 1);
        assert!(output.err.contains("Option --exclude requires a value"));
    }

    #[test]
    fn no_files() {
        let output = invoke(&[]);
        assert_eq!(output.status, 0);
        assert_eq!(output.out, "");
        assert_eq!(output.err, "No files specified\n");
    }

    #[test]
    fn engine_error_is_reported() {
        let (_dir, a, _) = sources();
        let output = invoke(&["--invalid-arg", &a]);
        assert_eq!(output.status, 1);
        assert_eq!(output.out, "");
        assert!(output.err.contains(&format!(
            "Error formatting {a}: error: Invalid Artistic Style options:\n\tinvalid-arg\n"
        )));
    }

    #[test]
    fn quiet_formats_silently() {
        let (_dir, a, b) = sources();
        let output = invoke(&["--style=otbs", "--quiet", &a, &b]);
        assert_eq!(output.status, 0);
        assert_eq!(output.out, "");
        assert_eq!(output.err, "");
        assert_eq!(fs::read_to_string(&a).unwrap(), FORMATTED);
        assert_eq!(fs::read_to_string(&b).unwrap(), FORMATTED);
    }

    #[test]
    fn quiet_dry_run_fails_silently() {
        let (_dir, a, b) = sources();
        let output = invoke(&["--style=otbs", "--quiet", "--dry-run", &a, &b]);
        assert_eq!(output.status, 1);
        assert_eq!(output.err, "");
        assert_eq!(fs::read_to_string(&a).unwrap(), UNFORMATTED);
    }

    #[test]
    fn reports_formatted_files() {
        let (_dir, a, b) = sources();
        let output = invoke(&["--style=otbs", &a, &b]);
        assert_eq!(output.status, 0);
        assert_eq!(output.out, "");
        assert_eq!(output.err, format!("Formatting {a}\nFormatted 1 files\n"));
        assert_eq!(fs::read_to_string(&a).unwrap(), FORMATTED);
    }

    #[test]
    fn dry_run_reports_formatting_errors() {
        let (_dir, a, b) = sources();
        let output = invoke(&["--style=otbs", "--dry-run", &a, &b]);
        assert_eq!(output.status, 1);
        assert_eq!(
            output.err,
            format!("Formatting error in {a}\nFormatting errors found in 1 files\n")
        );
        assert_eq!(fs::read_to_string(&a).unwrap(), UNFORMATTED);
        assert_eq!(fs::read_to_string(&b).unwrap(), FORMATTED);
    }

    #[test]
    fn all_files_excluded() {
        let (_dir, a, _) = sources();
        let output = invoke(&["--exclude=*.c", &a]);
        assert_eq!(output.status, 0);
        assert_eq!(
            output.err,
            "No files checked, excluded by --exclude/--exclude-list option\n"
        );
    }

    #[test]
    fn rules_choose_options_per_file() {
        let (dir, a, b) = sources();
        let rules = dir.path().join("rules.yml");
        fs::write(
            &rules,
            "DEFAULT:\n    options: \"--style=otbs\"\nkeep_b:\n    include: [\"file_b.c\"]\n    check: false\n",
        )
        .unwrap();

        let output = invoke(&[&format!("--rules={}", rules.display()), "--dry-run", &a, &b]);
        assert_eq!(output.status, 1);
        assert_eq!(
            output.err,
            format!("Formatting error in {a}\nFormatting errors found in 1 files\n")
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.c");
        let output = invoke(&[&missing.display().to_string()]);
        assert_eq!(output.status, 1);
        assert!(output.err.starts_with("Failed to read "));
    }
}
