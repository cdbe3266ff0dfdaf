//! Grouping of source files by canonical configuration.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use std::path::{Path, PathBuf};

use crate::command::ParsedConfig;
use crate::compile_commands::{CompileCommand, CompileCommands};
use crate::freeze::CanonicalConfig;

/// Source files that share one configuration.
#[derive(Debug, Clone)]
pub struct Group {
    config: ParsedConfig,
    files: IndexSet<PathBuf, FxBuildHasher>,
}

impl Group {
    /// The first configuration recorded for this group. Every other member
    /// canonicalizes to the same key.
    pub fn config(&self) -> &ParsedConfig {
        &self.config
    }

    /// Member files in the order they were first recorded.
    pub fn files(&self) -> impl ExactSizeIterator<Item = &Path> + '_ {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn contains(&self, file: &Path) -> bool {
        self.files.contains(file)
    }
}

/// Every distinct configuration of a build and the files compiled with it.
///
/// The model only grows: [`CompilationModel::record`] is the sole mutation.
#[derive(Debug, Default)]
pub struct CompilationModel {
    groups: IndexMap<CanonicalConfig, Group, FxBuildHasher>,
}

impl CompilationModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from a whole compilation database, in file order.
    ///
    /// The first entry that fails to parse aborts the build.
    pub fn from_commands(commands: &CompileCommands) -> crate::Result<Self> {
        let mut model = Self::new();
        for (index, entry) in commands.commands().iter().enumerate() {
            model.record_entry(index, entry)?;
        }
        log::info!(
            "grouped {} file(s) from {} entries into {} target(s)",
            model.total_files(),
            commands.len(),
            model.len()
        );
        Ok(model)
    }

    /// Parse one database entry and record its file.
    pub fn record_entry(&mut self, index: usize, entry: &CompileCommand) -> crate::Result<()> {
        let config = entry.parse(index)?;
        log::debug!("{}: {}", entry.file.display(), config);
        self.record(entry.file.clone(), config);
        Ok(())
    }

    /// Add `file` to the group keyed by `config`'s canonical form.
    ///
    /// Returns `true` if this created a new group.
    pub fn record(&mut self, file: impl Into<PathBuf>, config: ParsedConfig) -> bool {
        let key = CanonicalConfig::new(&config);
        let file = file.into();

        match self.groups.get_mut(&key) {
            Some(group) => {
                group.files.insert(file);
                false
            }
            None => {
                log::trace!("new configuration for {}", file.display());
                let mut files = IndexSet::default();
                files.insert(file);
                self.groups.insert(key, Group { config, files });
                true
            }
        }
    }

    /// Number of distinct configurations.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in the order their configurations were first seen.
    pub fn groups(&self) -> impl ExactSizeIterator<Item = &Group> + '_ {
        self.groups.values()
    }

    /// Groups together with their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalConfig, &Group)> + '_ {
        self.groups.iter()
    }

    /// The group containing `file`, if any.
    pub fn group_of(&self, file: &Path) -> Option<&Group> {
        self.groups.values().find(|g| g.contains(file))
    }

    /// Number of distinct (group, file) memberships.
    pub fn total_files(&self) -> usize {
        self.groups.values().map(|g| g.files.len()).sum()
    }
}
