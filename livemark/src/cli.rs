use std::path::PathBuf;

use clap::{Parser, Subcommand};
use livemark_config::Theme;

/// Command line interface for livemark
#[derive(Parser, Debug)]
#[command(author, version, about = "livemark: markdown with live playgrounds")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the livemark CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new livemark configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "livemark.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Render a markdown file, mount its playgrounds and print the result.
  Render {
    /// Markdown file to render.
    input: PathBuf,

    /// Write the HTML here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Turn code playgrounds on for this document.
    #[arg(long, conflicts_with = "no_playground")]
    playground: bool,

    /// Turn code playgrounds off for this document.
    #[arg(long = "no-playground")]
    no_playground: bool,

    /// Widget theme (light or dark). Defaults to the configured theme.
    #[arg(short, long)]
    theme: Option<Theme>,
  },
}

impl Cli {
  /// Parse command line arguments
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Per-document playground switch from the command line, if given.
  #[must_use]
  pub const fn playground_flag(&self) -> Option<bool> {
    match self.command {
      Commands::Render {
        playground: true, ..
      } => Some(true),
      Commands::Render {
        no_playground: true,
        ..
      } => Some(false),
      _ => None,
    }
  }
}
