//! Compiler command-line parsing.
//!
//! Only the handful of options that matter for regenerating a build are
//! understood: output files, include directories, preprocessor definitions
//! and the compile-only switch. Every other switch is kept verbatim.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::path::normalize;

/// Value of a `-D` definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefineValue {
    /// `-DNAME`: defined, with no value.
    Flag,
    /// `-DNAME=VALUE`.
    Value(String),
}

impl DefineValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DefineValue::Flag => None,
            DefineValue::Value(v) => Some(v),
        }
    }
}

/// The compiler configuration of one log entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedConfig {
    /// Switches kept verbatim, in command order. Duplicates allowed.
    pub options: Vec<String>,

    /// Preprocessor definitions. A repeated name keeps its first position
    /// but takes the last value.
    pub defines: IndexMap<String, DefineValue, FxBuildHasher>,

    /// Normalized include directories in first-seen order (`-I` and
    /// `-isystem` alike).
    pub includes: IndexSet<PathBuf, FxBuildHasher>,

    /// Include directories marked as system directories. Always a subset of
    /// `includes`.
    pub system_includes: BTreeSet<PathBuf>,
}

impl ParsedConfig {
    fn add_include(&mut self, path: PathBuf) {
        self.includes.insert(path);
    }

    fn add_system_include(&mut self, path: PathBuf) {
        // An `-I` directory seen earlier is promoted, keeping its position.
        self.includes.insert(path.clone());
        self.system_includes.insert(path);
    }

    fn add_define(&mut self, spec: &str) {
        let (name, value) = match spec.split_once('=') {
            Some((name, "")) => (name, DefineValue::Flag),
            Some((name, value)) => (name, DefineValue::Value(value.to_string())),
            None => (spec, DefineValue::Flag),
        };
        self.defines.insert(name.to_string(), value);
    }

    /// Iterate definitions rendered as `NAME` or `NAME=VALUE`.
    pub fn define_strings(&self) -> impl Iterator<Item = String> + '_ {
        self.defines.iter().map(|(name, value)| match value {
            DefineValue::Flag => name.clone(),
            DefineValue::Value(v) => format!("{}={}", name, v),
        })
    }
}

impl fmt::Display for ParsedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} option(s), {} define(s), {} include(s) ({} system)",
            self.options.len(),
            self.defines.len(),
            self.includes.len(),
            self.system_includes.len()
        )
    }
}

/// Split a shell command line into words with POSIX quoting rules.
///
/// Returns `None` when quoting is unbalanced or the line ends in a lone
/// backslash.
pub fn tokenize(command: &str) -> Option<Vec<String>> {
    shlex::split(command)
}

/// Parse a full command line, the first word being the compiler.
///
/// Returns `None` if the line cannot be tokenized.
pub fn parse_command(command: &str, directory: impl AsRef<Path>) -> Option<ParsedConfig> {
    let words = tokenize(command)?;
    Some(parse_arguments(&words, directory))
}

/// Parse an already-split argument vector, the first element being the
/// compiler.
pub fn parse_arguments<S: AsRef<str>>(words: &[S], directory: impl AsRef<Path>) -> ParsedConfig {
    let directory = directory.as_ref();
    let mut config = ParsedConfig::default();
    let mut words = words.iter().map(AsRef::as_ref).skip(1);

    while let Some(word) = words.next() {
        match word {
            "-o" => {
                words.next();
            }
            "-c" => {}
            "-isystem" => {
                if let Some(path) = words.next() {
                    config.add_system_include(normalize(path, directory));
                }
            }
            "-I" => {
                if let Some(path) = words.next() {
                    config.add_include(normalize(path, directory));
                }
            }
            "-D" => {
                if let Some(spec) = words.next() {
                    config.add_define(spec);
                }
            }
            _ => {
                if let Some(path) = word.strip_prefix("-I") {
                    config.add_include(normalize(path, directory));
                } else if let Some(spec) = word.strip_prefix("-D") {
                    config.add_define(spec);
                } else if word.starts_with('-') {
                    config.options.push(word.to_string());
                } else {
                    log::trace!("ignoring positional argument {}", word);
                }
            }
        }
    }

    config
}
