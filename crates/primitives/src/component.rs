use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

/// One named, independently cacheable fragment of the statusline.
///
/// Every slot except [`ComponentId::Progress`] is filled by the host's value
/// source; `Progress` is rendered by the pipeline's own progress registry.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCount, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComponentId {
	/// Editor mode indicator.
	Mode,
	/// Version-control branch and change counts.
	Git,
	/// Active file name and flags.
	File,
	/// Diagnostic counts.
	Diagnostics,
	/// Attached language-server clients.
	Lsp,
	/// Long-running operation progress with spinner.
	Progress,
	/// Cursor position.
	Position,
	/// Auxiliary right-hand details (recording, search count, file type).
	RightInfo,
}

impl ComponentId {
	/// Number of component slots.
	pub const SLOTS: usize = <Self as EnumCount>::COUNT;

	/// Dense slot index, stable for the lifetime of the process.
	pub const fn index(self) -> usize {
		self as usize
	}

	/// Snake-case name used in configuration and scripts.
	pub fn name(self) -> &'static str {
		self.into()
	}

	/// Whether the fragment comes from the host's value source.
	pub const fn is_sourced(self) -> bool {
		!matches!(self, Self::Progress)
	}

	/// Iterates every slot in declaration order.
	pub fn all() -> impl Iterator<Item = Self> {
		Self::iter()
	}
}

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A component name that does not match any slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown statusline component: {0}")]
pub struct UnknownComponent(pub String);

impl FromStr for ComponentId {
	type Err = UnknownComponent;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::iter()
			.find(|c| c.name() == s)
			.ok_or_else(|| UnknownComponent(s.to_owned()))
	}
}
