//! compile_commands.json parsing.
//!
//! CMake, Bear and most build systems can emit a compilation database: a
//! JSON array with the exact compilation command for each source file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::command::{parse_arguments, parse_command, ParsedConfig};
use crate::error::GenError;

/// A single compile command from compile_commands.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileCommand {
    /// The working directory for compilation.
    pub directory: PathBuf,

    /// The source file path.
    pub file: PathBuf,

    /// The full compilation command, shell-quoted.
    #[serde(default)]
    pub command: Option<String>,

    /// The compilation arguments (array form).
    #[serde(default)]
    pub arguments: Option<Vec<String>>,

    /// Output file (optional).
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl CompileCommand {
    /// Parse this entry's compiler invocation.
    ///
    /// The `arguments` form is preferred when present since it needs no
    /// shell splitting. `index` is only used in error messages.
    pub fn parse(&self, index: usize) -> crate::Result<ParsedConfig> {
        if let Some(args) = &self.arguments {
            return Ok(parse_arguments(args.as_slice(), &self.directory));
        }

        let command = self.command.as_deref().ok_or_else(|| GenError::InvalidEntry {
            index,
            file: self.file.clone(),
            reason: "entry has neither \"command\" nor \"arguments\"".to_string(),
        })?;

        parse_command(command, &self.directory).ok_or_else(|| GenError::Parse {
            file: self.file.clone(),
            command: command.to_string(),
        })
    }
}

/// Collection of compile commands (from compile_commands.json).
#[derive(Debug, Clone, Default)]
pub struct CompileCommands {
    commands: Vec<CompileCommand>,
}

impl CompileCommands {
    /// Load compile commands from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        content.parse()
    }

    /// Get all compile commands, in file order.
    pub fn commands(&self) -> &[CompileCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromStr for CompileCommands {
    type Err = GenError;

    fn from_str(json: &str) -> crate::Result<Self> {
        let commands: Vec<CompileCommand> = serde_json::from_str(json)?;
        Ok(Self { commands })
    }
}

impl From<Vec<CompileCommand>> for CompileCommands {
    fn from(commands: Vec<CompileCommand>) -> Self {
        Self { commands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile_commands() {
        let json = r#"[
            {
                "directory": "/home/user/project/build",
                "file": "/home/user/project/src/main.cc",
                "command": "g++ -I/usr/include -I../include -DDEBUG=1 -std=c++23 -c main.cc"
            },
            {
                "directory": "/home/user/project/build",
                "file": "/home/user/project/src/utils.cc",
                "arguments": ["g++", "-I/usr/include", "-DNDEBUG", "-c", "utils.cc"],
                "output": "utils.o"
            }
        ]"#;

        let cmds: CompileCommands = json.parse().unwrap();

        assert_eq!(cmds.len(), 2);

        let cmd0 = cmds.commands()[0].parse(0).unwrap();
        assert_eq!(cmd0.options, vec!["-std=c++23"]);
        assert_eq!(cmd0.includes.len(), 2);
        assert!(cmd0.includes.contains(Path::new("/home/user/project/include")));
        assert_eq!(cmd0.define_strings().collect::<Vec<_>>(), vec!["DEBUG=1"]);

        let cmd1 = cmds.commands()[1].parse(1).unwrap();
        assert_eq!(cmd1.define_strings().collect::<Vec<_>>(), vec!["NDEBUG"]);
        assert_eq!(cmds.commands()[1].output.as_deref(), Some(Path::new("utils.o")));
    }

    #[test]
    fn test_arguments_preferred_over_command() {
        let json = r#"[{
            "directory": "/build",
            "file": "a.c",
            "command": "cc -DFROM_COMMAND a.c",
            "arguments": ["cc", "-DFROM_ARGUMENTS", "a.c"]
        }]"#;

        let cmds: CompileCommands = json.parse().unwrap();
        let config = cmds.commands()[0].parse(0).unwrap();
        assert!(config.defines.contains_key("FROM_ARGUMENTS"));
        assert!(!config.defines.contains_key("FROM_COMMAND"));
    }

    #[test]
    fn test_missing_command() {
        let json = r#"[{ "directory": "/build", "file": "src/main.cc" }]"#;

        let cmds: CompileCommands = json.parse().unwrap();
        let err = cmds.commands()[0].parse(0).unwrap_err();
        assert!(matches!(err, GenError::InvalidEntry { index: 0, .. }));
    }

    #[test]
    fn test_missing_field_is_input_format_error() {
        let json = r#"[{ "file": "src/main.cc", "command": "cc main.cc" }]"#;
        let err = json.parse::<CompileCommands>().unwrap_err();
        assert!(matches!(err, GenError::InputFormat(_)));
    }

    #[test]
    fn test_not_an_array() {
        let err = r#"{"directory": "/"}"#.parse::<CompileCommands>().unwrap_err();
        assert!(matches!(err, GenError::InputFormat(_)));
    }

    #[test]
    fn test_bad_quoting_is_parse_error() {
        let json = r#"[{ "directory": "/b", "file": "x.c", "command": "cc \"-DX x.c" }]"#;
        let cmds: CompileCommands = json.parse().unwrap();
        let err = cmds.commands()[0].parse(0).unwrap_err();
        assert!(matches!(err, GenError::Parse { .. }));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"directory": "/b", "file": "x.c", "command": "cc x.c"}}]"#).unwrap();

        let cmds = CompileCommands::from_file(file.path()).unwrap();
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds.commands()[0].file, PathBuf::from("x.c"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = CompileCommands::from_file(Path::new("/nonexistent/compile_commands.json"))
            .unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
    }
}
