/*!
# Book Rip: Library
*/

#![deny(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::integer_division,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(
	clippy::doc_markdown,
	clippy::module_name_repetitions,
	clippy::redundant_pub_crate,
)]

mod abort;
mod chapter;
mod check;
mod convert;
mod error;
mod folder;
mod library;
mod log;
mod opts;
mod tool;

#[cfg(test)] mod fake;

pub use abort::KillSwitch;
pub use chapter::{
	Chapter,
	extract_chapters,
	sanitize_filename,
};
pub use check::{
	Completion,
	corrupt_files,
	evaluate,
	is_corrupt,
};
pub use convert::{
	convert_chapter,
	convert_chapters,
	split_oversized,
	ChapterOutcome,
};
pub use error::BookRipError;
pub use folder::{
	FolderState,
	locate_folder,
	mark_folder,
	restore_folder,
};
pub use library::{
	Library,
	LibraryPaths,
	Outcome,
	SourceFile,
	SourceStatus,
	Summary,
};
pub use log::{
	ErrorLog,
	ProcessedLog,
};
pub use opts::ConvertOptions;
pub use tool::{
	AudioTool,
	Ffmpeg,
	ToolOutput,
	Transcode,
};



/// # Default Bitrate (kbps).
pub const DEFAULT_BITRATE: u16 = 128;

/// # Default Error Log Name.
///
/// Relative to the library root unless overridden.
pub const ERROR_LOG: &str = "conversion_errors.log";

/// # Output Extension.
pub const OUTPUT_EXT: &str = "mp3";

/// # Default Processed Log Name.
///
/// Relative to the library root unless overridden.
pub const PROCESSED_LOG: &str = "processed_files.log";

/// # Segment Length (seconds).
///
/// Oversized chapters are cut into parts of (at most) this duration.
pub const SEGMENT_SECONDS: u32 = 5 * 60;

/// # Source Extension.
pub const SOURCE_EXT: &str = "m4b";

/// # Split Threshold (bytes).
///
/// Chapter files larger than this get split into parts.
pub const SPLIT_THRESHOLD: u64 = 50 * 1024 * 1024;
