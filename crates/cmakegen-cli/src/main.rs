use clap::Parser;
use cmakegen_build::{convert, normalize, EmitOptions, GeneratorConfig, CONFIG_FILE};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cmakegen")]
#[command(author, version, about = "Generate a CMakeLists.txt from a compile_commands.json")]
struct Cli {
    /// Compilation database to read [default: compile_commands.json]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CMake file to write [default: CMakeLists.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write include directories relative to this directory
    #[arg(long, value_name = "DIR")]
    relative_to: Option<PathBuf>,

    /// Configuration file [default: cmakegen.toml, if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase message verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all output
    #[arg(short, long)]
    quiet: bool,
}

/// What one run reads, writes and how.
#[derive(Debug, PartialEq)]
struct Plan {
    input: PathBuf,
    output: PathBuf,
    options: EmitOptions,
}

impl Cli {
    fn load_config(&self) -> Result<GeneratorConfig> {
        let config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::load_or_default(Path::new(CONFIG_FILE))?,
        };
        Ok(config)
    }

    /// Flags override the configuration file.
    fn plan(&self, config: GeneratorConfig, cwd: &Path) -> Plan {
        let mut options = config.emit_options();
        if let Some(dir) = &self.relative_to {
            options.relative_to = Some(dir.clone());
        }
        // Include paths are absolute, so the base must be too.
        options.relative_to = options.relative_to.map(|dir| normalize(dir, cwd));

        Plan {
            input: self.input.clone().unwrap_or(config.files.input),
            output: self.output.clone().unwrap_or(config.files.output),
            options,
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    stderrlog::new()
        .module(module_path!())
        .module("cmakegen_build")
        .quiet(cli.quiet)
        .verbosity(1 + cli.verbose as usize)
        .init()
        .into_diagnostic()?;

    let cwd = std::env::current_dir().into_diagnostic()?;
    let plan = cli.plan(cli.load_config()?, &cwd);

    let summary = convert(&plan.input, &plan.output, &plan.options)?;
    log::info!(
        "wrote {} target(s) for {} entries to {}",
        summary.targets,
        summary.entries,
        plan.output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cmakegen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_uses_fixed_names() {
        let plan = cli(&[]).plan(GeneratorConfig::default(), Path::new("/work"));
        assert_eq!(plan.input, PathBuf::from("compile_commands.json"));
        assert_eq!(plan.output, PathBuf::from("CMakeLists.txt"));
        assert_eq!(plan.options, EmitOptions::default());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = GeneratorConfig::default();
        config.files.input = PathBuf::from("from-config.json");
        config.files.output = PathBuf::from("from-config.txt");
        config.output.relative_to = Some(PathBuf::from("/config/dir"));
        config.project.name = "configured".to_string();

        let plan = cli(&["-o", "out/CMakeLists.txt", "--relative-to", "src"])
            .plan(config, Path::new("/work"));

        assert_eq!(plan.input, PathBuf::from("from-config.json"));
        assert_eq!(plan.output, PathBuf::from("out/CMakeLists.txt"));
        assert_eq!(plan.options.relative_to, Some(PathBuf::from("/work/src")));
        assert_eq!(plan.options.project_name, "configured");
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let cli = cli(&["--config", missing.to_str().unwrap()]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = cli(&["-vvv", "-q"]);
        assert_eq!(cli.verbose, 3);
        assert!(cli.quiet);
    }
}
