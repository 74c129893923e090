//! Per-component render cache.
//!
//! Coherence is purely event-driven: a slot is recomputed only after somebody
//! marks it dirty. There is no TTL.

use stratus_primitives::ComponentId;
use tracing::{trace, warn};

use crate::error::SourceError;
use crate::source::call_guarded;

#[derive(Debug)]
struct Slot {
	dirty: bool,
	rendered: String,
	recomputes: u64,
	failures: u64,
}

impl Slot {
	fn new() -> Self {
		Self {
			dirty: true,
			rendered: String::new(),
			recomputes: 0,
			failures: 0,
		}
	}
}

/// Last rendered fragment and dirty flag for every component.
///
/// A fragment is only trusted while its slot is clean; [`RenderCache::get`]
/// recomputes dirty slots before returning them and [`RenderCache::peek`]
/// refuses to return them at all.
#[derive(Debug)]
pub struct RenderCache {
	slots: [Slot; ComponentId::SLOTS],
}

impl Default for RenderCache {
	fn default() -> Self {
		Self::new()
	}
}

impl RenderCache {
	/// Creates a cache with every slot dirty.
	pub fn new() -> Self {
		Self {
			slots: std::array::from_fn(|_| Slot::new()),
		}
	}

	pub fn mark_dirty(&mut self, component: ComponentId) {
		self.slots[component.index()].dirty = true;
	}

	/// Marks a slot dirty by name. Unknown names are ignored and return `false`.
	pub fn mark_dirty_by_name(&mut self, name: &str) -> bool {
		match name.parse::<ComponentId>() {
			Ok(component) => {
				self.mark_dirty(component);
				true
			}
			Err(_) => {
				trace!(name, "cache.mark_dirty.unknown");
				false
			}
		}
	}

	pub fn mark_all_dirty(&mut self) {
		for slot in &mut self.slots {
			slot.dirty = true;
		}
	}

	pub fn is_dirty(&self, component: ComponentId) -> bool {
		self.slots[component.index()].dirty
	}

	/// Components currently awaiting recomputation.
	pub fn dirty_components(&self) -> impl Iterator<Item = ComponentId> + '_ {
		ComponentId::all().filter(|c| self.is_dirty(*c))
	}

	/// Cached fragment of a clean slot.
	pub fn peek(&self, component: ComponentId) -> Option<&str> {
		let slot = &self.slots[component.index()];
		(!slot.dirty).then_some(slot.rendered.as_str())
	}

	/// Returns the fragment, recomputing it through `read` first if dirty.
	///
	/// `read` runs under the shared failure policy: an error or panic is
	/// logged and the slot caches an empty fragment until the next dirty mark.
	pub fn get<F>(&mut self, component: ComponentId, read: F) -> &str
	where
		F: FnOnce(ComponentId) -> Result<String, SourceError>,
	{
		let slot = &mut self.slots[component.index()];
		if slot.dirty {
			slot.rendered = match call_guarded(component, || read(component)) {
				Ok(text) => text,
				Err(error) => {
					slot.failures += 1;
					warn!(%component, %error, "cache.source_failed");
					String::new()
				}
			};
			slot.dirty = false;
			slot.recomputes += 1;
			trace!(%component, recomputes = slot.recomputes, "cache.recompute");
		}
		&slot.rendered
	}

	/// Times the slot has been recomputed.
	pub fn recomputes(&self, component: ComponentId) -> u64 {
		self.slots[component.index()].recomputes
	}

	/// Source failures across every slot.
	pub fn total_failures(&self) -> u64 {
		self.slots.iter().map(|s| s.failures).sum()
	}
}
