//! Command-line interface for link-globs
//!
//! Global flags are parsed here; each subcommand lives in [`commands`].

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

use commands::{config, expand, version};

#[derive(Parser)]
#[command(
    name = "link-globs",
    version = env!("CARGO_PKG_VERSION"),
    about = "Expand glob-valued links in HTML into one element per matching file",
    long_about = "link-globs rewrites <a href>, <img src>, <link href> and <script src> \
                  attributes that contain '*' or '?' into one element per matching file, \
                  with paths relative to the document."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand globs in every HTML document below a directory
    Expand(expand::ExpandArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir).with_context(|| format!("Cannot change directory to {}", dir))?;
        }

        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Some(Commands::Expand(args)) => expand::execute(args, self.config.as_deref(), &output),
            Some(Commands::Config(args)) => config::execute(args, self.config.as_deref(), &output),
            Some(Commands::Version(args)) => version::execute(args),
            None => {
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // globset is chatty at debug level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => tracing_subscriber::EnvFilter::new("warn"),
        1 => tracing_subscriber::EnvFilter::new("info,globset=warn"),
        2 => tracing_subscriber::EnvFilter::new("debug,globset=warn"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_expand_dir_and_global_directory_parse_together() {
        let cli = Cli::try_parse_from(["link-globs", "-C", "/srv", "expand", "public", "--dry-run"]).unwrap();
        assert_eq!(cli.directory.as_deref(), Some("/srv"));
        match cli.command {
            Some(Commands::Expand(args)) => {
                assert_eq!(args.site, std::path::PathBuf::from("public"));
                assert!(args.dry_run);
            }
            _ => panic!("expected the expand command"),
        }

        let cli = Cli::try_parse_from(["link-globs", "expand"]).unwrap();
        match cli.command {
            Some(Commands::Expand(args)) => assert_eq!(args.site, std::path::PathBuf::from(".")),
            _ => panic!("expected the expand command"),
        }
    }
}
