//! Stratus statusline driver.
//!
//! Replays a recorded editor session (one JSON event per line) through the
//! statusline pipeline and prints every line the pipeline publishes.

mod cli;
mod host;
mod replay;
mod script;
mod snapshot;
mod sources;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	match cli.command {
		Command::Replay(args) => {
			let config = cli::load_config(args.config.as_deref())?;
			let text = std::fs::read_to_string(&args.script)
				.with_context(|| format!("reading script {}", args.script.display()))?;
			let lines = script::parse_script(&text)
				.with_context(|| format!("parsing script {}", args.script.display()))?;
			info!(script = %args.script.display(), events = lines.len(), "replay.start");

			let stdout = std::io::stdout();
			let mut out = stdout.lock();
			let summary = replay::run(&lines, config, &args.options(), &mut out).await?;
			out.flush()?;
			info!(
				published = summary.published,
				released = summary.released,
				applies = summary.stats.applies,
				pushes = summary.stats.pushes,
				push_ratio = summary.stats.push_ratio(),
				"replay.done"
			);
		}
		Command::CheckConfig { path } => {
			let path = path.or_else(cli::default_config_path).context("no configuration file found")?;
			stratus_statusline::StatuslineConfig::load(&path)
				.with_context(|| format!("checking {}", path.display()))?;
			println!("{}: ok", path.display());
		}
	}

	Ok(())
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let default_filter = || {
		if verbose {
			EnvFilter::new("stratus_statusline=trace,stratus_term=debug,info")
		} else {
			EnvFilter::new("stratus_statusline=info,stratus_term=info,warn")
		}
	};

	// STRATUS_LOG_DIR keeps stdout free for published lines
	if let Some(log_dir) = std::env::var("STRATUS_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("stratus.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter).with(file_layer).init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
