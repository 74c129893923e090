use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use stratus_statusline::StatuslineConfig;

use crate::replay::ReplayOptions;

#[derive(Parser, Debug)]
#[command(name = "stratus")]
#[command(about = "Incremental statusline pipeline driver")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(long, short, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Replay a JSON-lines editor event script and print published lines
	Replay(ReplayArgs),
	/// Validate a configuration file
	CheckConfig {
		/// Configuration file (defaults to the user config)
		path: Option<PathBuf>,
	},
}

/// Arguments of `stratus replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
	/// Script to replay, one `{"at_ms": .., "event": {..}}` object per line
	pub script: PathBuf,

	/// Initial viewport width in columns
	#[arg(long, short, default_value_t = 120)]
	pub width: u16,

	/// Sleep between events instead of jumping through virtual time
	#[arg(long)]
	pub realtime: bool,

	/// Print raw statusline markup instead of justified plain text
	#[arg(long)]
	pub raw: bool,

	/// Virtual time to keep running after the last event, in milliseconds
	#[arg(long, value_name = "MS", default_value_t = 1_500)]
	pub settle_ms: u64,

	/// Configuration file (defaults to $XDG_CONFIG_HOME/stratus/config.toml)
	#[arg(long, short, value_name = "PATH")]
	pub config: Option<PathBuf>,
}

impl ReplayArgs {
	pub fn options(&self) -> ReplayOptions {
		ReplayOptions {
			width: self.width,
			realtime: self.realtime,
			raw: self.raw,
			settle_ms: self.settle_ms,
		}
	}
}

/// User configuration file location, if it exists.
pub fn default_config_path() -> Option<PathBuf> {
	let path = dirs::config_dir()?.join("stratus").join("config.toml");
	path.is_file().then_some(path)
}

/// Loads an explicit configuration file, else the user file, else defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<StatuslineConfig> {
	let Some(path) = explicit.map(Path::to_path_buf).or_else(default_config_path) else {
		return Ok(StatuslineConfig::default());
	};
	let config = StatuslineConfig::load(&path).with_context(|| format!("loading {}", path.display()))?;
	tracing::debug!(path = %path.display(), "config.loaded");
	Ok(config)
}
