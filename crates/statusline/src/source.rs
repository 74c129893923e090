//! The single failure policy for value-source reads.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use stratus_primitives::ComponentId;

use crate::error::SourceError;

/// Runs one value-source read, turning a panic into [`SourceError::Panicked`].
pub(crate) fn call_guarded<F>(component: ComponentId, read: F) -> Result<String, SourceError>
where
	F: FnOnce() -> Result<String, SourceError>,
{
	match panic::catch_unwind(AssertUnwindSafe(read)) {
		Ok(result) => result,
		Err(payload) => Err(SourceError::Panicked {
			component,
			message: panic_message(payload.as_ref()),
		}),
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_owned()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"non-string panic payload".to_owned()
	}
}
