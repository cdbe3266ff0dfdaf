//! Regenerate a CMake build from a compilation database.
//!
//! This crate provides:
//! - compile_commands.json parsing
//! - compiler command-line parsing into comparable configurations
//! - grouping of source files by identical configuration
//! - CMakeLists.txt generation, one `OBJECT` library per group
//! - Generator configuration (`cmakegen.toml`)
//!
//! # Example
//!
//! ```toml
//! # cmakegen.toml
//! [project]
//! name = "legacy"
//! cmake_minimum_version = "3.16"
//!
//! [files]
//! input = "build/compile_commands.json"
//! output = "CMakeLists.txt"
//!
//! [output]
//! relative_to = "/src/legacy"
//! target_prefix = "objs"
//! ```

mod command;
mod compile_commands;
mod config;
mod emit;
mod error;
mod freeze;
mod model;
mod path;

pub use command::{parse_arguments, parse_command, tokenize, DefineValue, ParsedConfig};
pub use compile_commands::{CompileCommand, CompileCommands};
pub use config::{
    FilesConfig, GeneratorConfig, OutputConfig, ProjectConfig, CONFIG_FILE, DEFAULT_INPUT,
    DEFAULT_OUTPUT,
};
pub use emit::{cmake_argument, render, write_atomically, EmitOptions};
pub use error::{GenError, Result};
pub use freeze::{CanonicalConfig, Freeze, Frozen};
pub use model::{CompilationModel, Group};
pub use path::{normalize, relative_to};

use std::path::Path;

/// Counts from one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub entries: usize,
    pub targets: usize,
}

/// Render CMake source for an already loaded database.
pub fn generate(commands: &CompileCommands, options: &EmitOptions) -> Result<String> {
    let model = CompilationModel::from_commands(commands)?;
    Ok(render(&model, options))
}

/// Read `input`, group its entries and write `output`.
///
/// Nothing is written unless every entry parses.
pub fn convert(input: &Path, output: &Path, options: &EmitOptions) -> Result<Summary> {
    let commands = CompileCommands::from_file(input)?;
    let model = CompilationModel::from_commands(&commands)?;
    write_atomically(output, &render(&model, options))?;

    Ok(Summary {
        entries: commands.len(),
        targets: model.len(),
    })
}
