/*!
# Book Rip: Conversion Options
*/

use crate::{
	BookRipError,
	DEFAULT_BITRATE,
	SEGMENT_SECONDS,
	SPLIT_THRESHOLD,
};



/// # Minimum Bitrate (kbps).
const BITRATE_MIN: u16 = 32;

/// # Maximum Bitrate (kbps).
const BITRATE_MAX: u16 = 320;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Conversion Options.
///
/// This struct holds the encoding and recovery settings used for every source
/// in a run.
///
/// Options are set using builder-style methods, like:
///
/// ```
/// use bookrip_core::ConvertOptions;
///
/// let opts = ConvertOptions::default()
///     .with_bitrate(192)
///     .unwrap()
///     .with_repair(true);
///
/// assert_eq!(opts.bitrate(), 192);
/// assert!(opts.repair());
/// ```
pub struct ConvertOptions {
	bitrate: u16,
	split_threshold: u64,
	segment_seconds: u32,
	repair: bool,
}

impl Default for ConvertOptions {
	fn default() -> Self {
		Self {
			bitrate: DEFAULT_BITRATE,
			split_threshold: SPLIT_THRESHOLD,
			segment_seconds: SEGMENT_SECONDS,
			repair: false,
		}
	}
}

/// ## Setters.
impl ConvertOptions {
	/// # Bitrate.
	///
	/// Set the MP3 bitrate in kbps.
	///
	/// The default is `128`.
	///
	/// ## Errors
	///
	/// Values outside `32..=320` are rejected.
	pub const fn with_bitrate(self, bitrate: u16) -> Result<Self, BookRipError> {
		if BITRATE_MIN <= bitrate && bitrate <= BITRATE_MAX {
			Ok(Self {
				bitrate,
				..self
			})
		}
		else { Err(BookRipError::Bitrate(bitrate)) }
	}

	#[must_use]
	/// # Repair.
	///
	/// When `true`, output folders that are empty or contain corrupt files are
	/// converted into rather than marked and skipped.
	///
	/// The default is `false`.
	pub const fn with_repair(self, repair: bool) -> Self {
		Self {
			repair,
			..self
		}
	}

	#[must_use]
	/// # Segment Length.
	///
	/// Set the duration, in seconds, of the parts an oversized chapter is
	/// split into. Zero is bumped to one.
	///
	/// The default is `300`.
	pub const fn with_segment_seconds(self, secs: u32) -> Self {
		Self {
			segment_seconds: if secs == 0 { 1 } else { secs },
			..self
		}
	}

	#[must_use]
	/// # Split Threshold.
	///
	/// Chapter files larger than this many bytes are split into parts.
	///
	/// The default is 50 MiB.
	pub const fn with_split_threshold(self, bytes: u64) -> Self {
		Self {
			split_threshold: bytes,
			..self
		}
	}
}

/// ## Getters.
impl ConvertOptions {
	#[must_use]
	/// # Bitrate (kbps).
	pub const fn bitrate(&self) -> u16 { self.bitrate }

	#[must_use]
	/// # Repair?
	pub const fn repair(&self) -> bool { self.repair }

	#[must_use]
	/// # Segment Length (seconds).
	pub const fn segment_seconds(&self) -> u32 { self.segment_seconds }

	#[must_use]
	/// # Split Threshold (bytes).
	pub const fn split_threshold(&self) -> u64 { self.split_threshold }
}
