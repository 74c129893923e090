//! Deterministic timer queue for hosts without a native timer facility.
//!
//! Deadlines are plain [`Instant`]s supplied by the caller, so the queue works
//! the same against wall-clock time and against a virtual clock in tests and
//! replays. Cancellation is lazy: cancelled entries stay in the heap until
//! they surface and are then discarded.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::host::TimerHandle;

/// Shortest period a repeating timer is re-armed with.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct Armed {
	deadline: Instant,
	period: Option<Duration>,
}

/// Min-heap of pending one-shot and repeating timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
	next_id: u64,
	seq: u64,
	heap: BinaryHeap<Reverse<(Instant, u64, u64)>>,
	armed: FxHashMap<u64, Armed>,
}

impl TimerQueue {
	pub fn new() -> Self {
		Self::default()
	}

	/// Arms a timer due at `now + delay`.
	pub fn schedule(&mut self, now: Instant, delay: Duration, repeating: bool) -> TimerHandle {
		self.next_id += 1;
		let id = self.next_id;
		let armed = Armed {
			deadline: now + delay,
			period: repeating.then(|| delay.max(MIN_PERIOD)),
		};
		self.armed.insert(id, armed);
		self.push(armed.deadline, id);
		TimerHandle(id)
	}

	/// Disarms a timer. Returns `false` if it was not pending.
	pub fn cancel(&mut self, handle: TimerHandle) -> bool {
		self.armed.remove(&handle.0).is_some()
	}

	pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
		self.armed.contains_key(&handle.0)
	}

	/// Number of armed timers.
	pub fn len(&self) -> usize {
		self.armed.len()
	}

	pub fn is_empty(&self) -> bool {
		self.armed.is_empty()
	}

	/// Earliest pending deadline, if any.
	pub fn next_deadline(&mut self) -> Option<Instant> {
		self.discard_stale();
		self.heap.peek().map(|Reverse((deadline, _, _))| *deadline)
	}

	/// Pops the earliest timer due at or before `now`.
	///
	/// Returns the handle together with the deadline it was due at. Repeating
	/// timers are re-armed one period after that deadline, so a slow caller
	/// observes every missed tick in order.
	pub fn pop_due(&mut self, now: Instant) -> Option<(TimerHandle, Instant)> {
		self.discard_stale();
		let Reverse((deadline, _, id)) = *self.heap.peek()?;
		if deadline > now {
			return None;
		}
		self.heap.pop();

		match self.armed.get(&id).and_then(|armed| armed.period) {
			Some(period) => {
				let next = deadline + period;
				if let Some(armed) = self.armed.get_mut(&id) {
					armed.deadline = next;
				}
				self.push(next, id);
			}
			None => {
				self.armed.remove(&id);
			}
		}
		Some((TimerHandle(id), deadline))
	}

	fn push(&mut self, deadline: Instant, id: u64) {
		self.seq += 1;
		self.heap.push(Reverse((deadline, self.seq, id)));
	}

	fn discard_stale(&mut self) {
		while let Some(Reverse((deadline, _, id))) = self.heap.peek().copied() {
			match self.armed.get(&id) {
				Some(armed) if armed.deadline == deadline => break,
				_ => {
					self.heap.pop();
				}
			}
		}
	}
}
