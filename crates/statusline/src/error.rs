//! Error types for the render pipeline.
//!
//! None of these ever escape [`crate::Statusline::apply`]: source failures
//! degrade to an empty fragment and timer failures to a missed update that the
//! fallback watchdog later corrects. Only configuration loading returns errors
//! to the caller.

use std::path::PathBuf;

use stratus_primitives::ComponentId;
use thiserror::Error;

/// A value source could not produce a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
	/// The underlying editor/VCS/LSP query is not available right now.
	#[error("{component} source unavailable: {reason}")]
	Unavailable {
		component: ComponentId,
		reason: String,
	},

	/// The query returned data the source could not interpret.
	#[error("{component} source returned malformed data: {reason}")]
	Malformed {
		component: ComponentId,
		reason: String,
	},

	/// The source panicked while rendering.
	#[error("{component} source panicked: {message}")]
	Panicked {
		component: ComponentId,
		message: String,
	},
}

impl SourceError {
	pub fn unavailable(component: ComponentId, reason: impl Into<String>) -> Self {
		Self::Unavailable {
			component,
			reason: reason.into(),
		}
	}

	pub fn malformed(component: ComponentId, reason: impl Into<String>) -> Self {
		Self::Malformed {
			component,
			reason: reason.into(),
		}
	}
}

/// The host could not schedule a timer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
	/// The host event loop refused the request.
	#[error("timer rejected by host: {0}")]
	Rejected(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but violates a constraint.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
