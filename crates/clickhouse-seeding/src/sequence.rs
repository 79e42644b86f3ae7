//! Monotonic sequences for auto-incrementing factory attributes.

use std::sync::atomic::{AtomicI64, Ordering};

/// Monotonic counter backing `sequence` attributes.
///
/// Produces strictly increasing integers starting at a configured value.
/// State persists for the lifetime of the owning factory definition; there
/// is no reset and no upper bound. The atomic increment is the mutual
/// exclusion a process-wide registry needs; isolation across parallel test
/// workers stays with process separation.
#[derive(Debug)]
pub struct Sequence {
	current: AtomicI64,
}

impl Sequence {
	/// Creates a sequence whose first `next()` returns `start`.
	pub fn new(start: i64) -> Self {
		Self {
			current: AtomicI64::new(start - 1),
		}
	}

	/// Increments the counter and returns the new value.
	pub fn next(&self) -> i64 {
		self.current.fetch_add(1, Ordering::SeqCst) + 1
	}
}
