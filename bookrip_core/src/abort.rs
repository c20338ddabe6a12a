/*!
# Book Rip: Kill Switch
*/

use std::sync::{
	Arc,
	atomic::{
		AtomicBool,
		Ordering::{
			Acquire,
			Release,
		},
	},
};



#[derive(Debug, Clone, Default)]
/// # Kill Switch.
///
/// This is a short-circuit for long-running conversions. The main program's
/// CTRL-C intercept flips it, allowing Book Rip to finish the current chapter,
/// mark the folder, and exit cleanly rather than leave a half-written file
/// behind with no marker.
pub struct KillSwitch(Arc<AtomicBool>);

impl KillSwitch {
	/// # Kill.
	pub fn kill(&self) { self.0.store(true, Release); }

	#[must_use]
	/// # Dead?
	pub fn killed(&self) -> bool { self.0.load(Acquire) }
}
