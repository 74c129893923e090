use crate::config::DEFAULT_SPINNER_FRAMES;
use crate::host::TimerHandle;

/// Shared animation frame index plus the handle of its tick timer.
///
/// The registry owner keeps `timer` populated exactly while at least one
/// progress entry is active.
#[derive(Debug)]
pub struct Spinner {
	frames: Vec<String>,
	index: usize,
	timer: Option<TimerHandle>,
}

impl Spinner {
	/// Creates a spinner; an empty frame list falls back to the default frames.
	pub fn new(frames: Vec<String>) -> Self {
		let frames = if frames.is_empty() {
			DEFAULT_SPINNER_FRAMES.iter().map(|f| (*f).to_owned()).collect()
		} else {
			frames
		};
		Self {
			frames,
			index: 0,
			timer: None,
		}
	}

	pub fn frame(&self) -> &str {
		&self.frames[self.index]
	}

	pub fn index(&self) -> usize {
		self.index
	}

	/// Moves to the next frame, wrapping at the end.
	pub fn advance(&mut self) {
		self.index = (self.index + 1) % self.frames.len();
	}

	pub fn timer(&self) -> Option<TimerHandle> {
		self.timer
	}

	pub fn is_running(&self) -> bool {
		self.timer.is_some()
	}

	pub(crate) fn set_timer(&mut self, handle: TimerHandle) {
		self.timer = Some(handle);
	}

	pub(crate) fn take_timer(&mut self) -> Option<TimerHandle> {
		self.timer.take()
	}
}
