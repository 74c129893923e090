//! Width-dependent assembly of the final statusline.
//!
//! Composition is pure: it reads clean fragments from the cache and never
//! calls a value source. Components the current breakpoint hides are skipped
//! entirely, so their slots may stay dirty.

use stratus_primitives::markup::STRETCH;
use stratus_primitives::{ComponentId, SurfaceKind};

use crate::cache::RenderCache;
use crate::config::{Breakpoints, StatuslineConfig};

/// Layout tier selected from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
	UltraNarrow,
	Narrow,
	Normal,
	Wide,
}

impl Breakpoint {
	pub fn for_width(width: u16, breakpoints: &Breakpoints) -> Self {
		if width >= breakpoints.wide {
			Self::Wide
		} else if width >= breakpoints.normal {
			Self::Normal
		} else if width >= breakpoints.narrow {
			Self::Narrow
		} else {
			Self::UltraNarrow
		}
	}
}

/// Left-aligned components, in order.
pub const LEFT: [ComponentId; 3] = [ComponentId::Mode, ComponentId::Git, ComponentId::File];
/// Centered components.
pub const MIDDLE: [ComponentId; 1] = [ComponentId::Progress];
/// Right-aligned components, in order.
pub const RIGHT: [ComponentId; 4] = [
	ComponentId::Diagnostics,
	ComponentId::Lsp,
	ComponentId::RightInfo,
	ComponentId::Position,
];

/// Narrowest tier at which `component` is shown.
pub const fn min_breakpoint(component: ComponentId) -> Breakpoint {
	match component {
		ComponentId::Mode | ComponentId::Position => Breakpoint::UltraNarrow,
		ComponentId::File | ComponentId::Diagnostics => Breakpoint::Narrow,
		ComponentId::Git | ComponentId::Lsp | ComponentId::Progress => Breakpoint::Normal,
		ComponentId::RightInfo => Breakpoint::Wide,
	}
}

pub fn is_visible(component: ComponentId, breakpoint: Breakpoint) -> bool {
	breakpoint >= min_breakpoint(component)
}

/// Components shown at `width`, in slot order.
pub fn visible_components(width: u16, breakpoints: &Breakpoints) -> impl Iterator<Item = ComponentId> {
	let breakpoint = Breakpoint::for_width(width, breakpoints);
	ComponentId::all().filter(move |c| is_visible(*c, breakpoint))
}

/// Builds the statusline for a viewport `width` columns wide.
///
/// Special surfaces get a centered label. Otherwise each section joins the
/// non-empty fragments of its visible components with the configured
/// separator and sections are split by stretch markers. A visible component
/// whose slot is still dirty renders as empty.
pub fn compose(cache: &RenderCache, width: u16, surface: SurfaceKind, config: &StatuslineConfig) -> String {
	if surface.is_special() {
		return special_surface(surface);
	}

	let breakpoint = Breakpoint::for_width(width, &config.breakpoints);
	let section = |components: &[ComponentId]| -> String {
		components
			.iter()
			.filter(|c| is_visible(**c, breakpoint))
			.filter_map(|c| cache.peek(*c))
			.filter(|fragment| !fragment.is_empty())
			.collect::<Vec<_>>()
			.join(config.separator.as_str())
	};

	let left = section(&LEFT);
	let middle = section(&MIDDLE);
	let right = section(&RIGHT);
	if middle.is_empty() {
		format!("{left}{STRETCH}{right}")
	} else {
		format!("{left}{STRETCH}{middle}{STRETCH}{right}")
	}
}

/// Simplified layout for surfaces that bypass the component pipeline.
pub fn special_surface(surface: SurfaceKind) -> String {
	format!("{STRETCH}{}{STRETCH}", surface.label())
}
