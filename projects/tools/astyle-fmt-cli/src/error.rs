use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Option --{0} requires a value")]
    MissingValue(String),
    #[error("{0}")]
    Args(String),
    #[error("--options, --exclude, --exclude-list can't be used together with --rules")]
    RulesConflict,
    #[error("Unsupported astyle version: {requested}. Available versions: {available}")]
    UnsupportedVersion {
        requested: String,
        available: String,
    },
    #[error("Likely invalid pattern '{0}': '**' should be followed by '/'")]
    InvalidPattern(String),
    #[error("Invalid pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Failed to parse rules file {}: {source}", .path.display())]
    RulesFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid rule {rule}: {source}")]
    Rule {
        rule: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}
