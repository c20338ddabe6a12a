/*!
# Book Rip: CLI
*/

use argyle::Argument;
use bookrip_core::{
	BookRipError,
	ConvertOptions,
	Ffmpeg,
	LibraryPaths,
};
use dactyl::traits::BytesToUnsigned;
use std::path::PathBuf;



/// # Options Return Type.
pub(super) type Parsed = (
	LibraryPaths,
	ConvertOptions,
	Ffmpeg,
	bool,
);



/// # Parse Options.
pub(super) fn parse() -> Result<Parsed, BookRipError> {
	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));

	let mut opts = ConvertOptions::default();
	let mut tool = Ffmpeg::default();
	let mut status = false;
	let mut dir: Option<PathBuf> = None;
	let mut processed = None;
	let mut errors = None;
	for arg in args {
		match arg {
			Argument::Key("-h" | "--help") => return Err(BookRipError::PrintHelp),
			Argument::Key("--repair") => { opts = opts.with_repair(true); },
			Argument::Key("--status") => { status = true; },
			Argument::Key("-V" | "--version") => return Err(BookRipError::PrintVersion),

			Argument::KeyWithValue("-b" | "--bitrate", s) => {
				let s = u16::btou(s.trim().as_bytes())
					.ok_or(BookRipError::CliParse("-b/--bitrate"))?;
				opts = opts.with_bitrate(s)?;
			},
			Argument::KeyWithValue("-e" | "--error-log", s) => { errors.replace(PathBuf::from(s)); },
			Argument::KeyWithValue("--ffmpeg", s) => { tool = tool.with_ffmpeg(s); },
			Argument::KeyWithValue("--ffprobe", s) => { tool = tool.with_ffprobe(s); },
			Argument::KeyWithValue("-l" | "--log", s) => { processed.replace(PathBuf::from(s)); },

			// The library folder, or a typo.
			Argument::Other(s) => {
				if s.starts_with('-') || dir.is_some() {
					return Err(BookRipError::CliArg(s));
				}
				dir.replace(PathBuf::from(s));
			},

			_ => {},
		}
	}

	// Resolve the library root so messages and logs use the full path.
	let dir = dir.unwrap_or_else(|| PathBuf::from("."));
	let root = std::fs::canonicalize(&dir)
		.ok()
		.filter(|p| p.is_dir())
		.ok_or_else(|| BookRipError::Library(dir.to_string_lossy().into_owned()))?;

	let mut paths = LibraryPaths::new(root);
	if let Some(p) = processed { paths = paths.with_processed_log(p); }
	if let Some(p) = errors { paths = paths.with_error_log(p); }

	Ok((paths, opts, tool, status))
}
