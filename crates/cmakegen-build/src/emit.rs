//! CMakeLists.txt generation.
//!
//! Each group of the model becomes one `OBJECT` library. Target names are
//! sequential within a run.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::GenError;
use crate::model::CompilationModel;
use crate::path::relative_to;

pub const DEFAULT_PROJECT_NAME: &str = "autogenerated";
pub const DEFAULT_MINIMUM_VERSION: &str = "2.8.8";
pub const DEFAULT_TARGET_PREFIX: &str = "autogenerated";

/// Settings for the generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Argument of `project()`.
    pub project_name: String,

    /// Argument of `cmake_minimum_required(VERSION ...)`.
    pub minimum_version: String,

    /// Target names are `<prefix>_<n>`.
    pub target_prefix: String,

    /// Rewrite include directories relative to this directory. Absolute
    /// paths are written when unset.
    pub relative_to: Option<PathBuf>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            minimum_version: DEFAULT_MINIMUM_VERSION.to_string(),
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
            relative_to: None,
        }
    }
}

impl EmitOptions {
    fn include_dir<'p>(&self, path: &'p Path) -> Cow<'p, Path> {
        match &self.relative_to {
            Some(dir) => Cow::Owned(relative_to(path, dir)),
            None => Cow::Borrowed(path),
        }
    }
}

/// Render the whole model as CMake source.
pub fn render(model: &CompilationModel, options: &EmitOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "cmake_minimum_required(VERSION {})\n",
        options.minimum_version
    ));
    out.push_str(&format!("project({})\n\n", cmake_argument(&options.project_name)));

    for (index, group) in model.groups().enumerate() {
        let name = format!("{}_{}", options.target_prefix, index + 1);
        let config = group.config();

        command_block(
            &mut out,
            &format!("add_library({} OBJECT", name),
            group.files().map(|f| f.display().to_string()),
        );
        command_block(
            &mut out,
            &format!("target_compile_options({} PRIVATE", name),
            config.options.iter().cloned(),
        );
        command_block(
            &mut out,
            &format!("target_compile_definitions({} PRIVATE", name),
            config.define_strings(),
        );
        command_block(
            &mut out,
            &format!("target_include_directories({} PRIVATE", name),
            config
                .includes
                .iter()
                .map(|p| options.include_dir(p).display().to_string()),
        );
        command_block(
            &mut out,
            &format!("target_include_directories({} SYSTEM PRIVATE", name),
            config
                .system_includes
                .iter()
                .map(|p| options.include_dir(p).display().to_string()),
        );
        out.push('\n');
    }

    out
}

fn command_block(out: &mut String, open: &str, args: impl Iterator<Item = String>) {
    out.push_str(open);
    out.push('\n');
    for arg in args {
        out.push_str("    ");
        out.push_str(&cmake_argument(&arg));
        out.push('\n');
    }
    out.push_str(")\n");
}

/// Quote `arg` if CMake would otherwise split or interpret it.
pub fn cmake_argument(arg: &str) -> Cow<'_, str> {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '(' | ')' | '"' | '#' | '\\' | '$'));
    if !needs_quotes {
        return Cow::Borrowed(arg);
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '\\' | '"' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Write `contents` to `path` through a temporary file in the same
/// directory, so a failed run never leaves a truncated file behind.
pub fn write_atomically(path: &Path, contents: &str) -> crate::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| GenError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| GenError::io(tmp.path(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(|e| GenError::io(tmp.path(), e))?;
    }

    tmp.persist(path).map_err(|e| GenError::io(path, e.error))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
