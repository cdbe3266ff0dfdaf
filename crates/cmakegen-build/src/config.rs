//! Generator configuration (cmakegen.toml format).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::emit::{
    EmitOptions, DEFAULT_MINIMUM_VERSION, DEFAULT_PROJECT_NAME, DEFAULT_TARGET_PREFIX,
};
use crate::error::GenError;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "cmakegen.toml";

/// Default compilation database name.
pub const DEFAULT_INPUT: &str = "compile_commands.json";

/// Default output name.
pub const DEFAULT_OUTPUT: &str = "CMakeLists.txt";

/// Root generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Project metadata written to the header.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Input and output locations.
    #[serde(default)]
    pub files: FilesConfig,

    /// Output formatting.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Project metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project name.
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Minimum CMake version.
    #[serde(default = "default_minimum_version")]
    pub cmake_minimum_version: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            cmake_minimum_version: default_minimum_version(),
        }
    }
}

/// Input and output files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

/// Output formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory include paths are written relative to.
    #[serde(default)]
    pub relative_to: Option<PathBuf>,

    /// Prefix of generated target names.
    #[serde(default = "default_target_prefix")]
    pub target_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            relative_to: None,
            target_prefix: default_target_prefix(),
        }
    }
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

fn default_minimum_version() -> String {
    DEFAULT_MINIMUM_VERSION.to_string()
}

fn default_input() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT)
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_target_prefix() -> String {
    DEFAULT_TARGET_PREFIX.to_string()
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        let config: GeneratorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> crate::Result<Self> {
        if path.is_file() {
            log::debug!("loading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Emitter settings described by this configuration.
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            project_name: self.project.name.clone(),
            minimum_version: self.project.cmake_minimum_version.clone(),
            target_prefix: self.output.target_prefix.clone(),
            relative_to: self.output.relative_to.clone(),
        }
    }
}
