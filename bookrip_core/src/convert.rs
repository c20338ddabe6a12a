/*!
# Book Rip: Conversion
*/

use crate::{
	AudioTool,
	BookRipError,
	Chapter,
	ConvertOptions,
	ErrorLog,
	KillSwitch,
	sanitize_filename,
	Transcode,
};
use crate::check::{
	chapter_files,
	chapter_parts,
	ChapterFiles,
};
use dactyl::traits::NiceInflection;
use fyi_msg::Msg;
use std::path::Path;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Chapter Outcome.
///
/// What happened to a single chapter during a conversion pass.
pub enum ChapterOutcome {
	/// # Already Done.
	///
	/// Valid output was already present, so nothing was touched.
	Skipped,

	/// # Transcoded.
	Converted,

	/// # Transcoded and Split Into (N) Parts.
	Split(usize),

	/// # Failed.
	///
	/// The details have been written to the error log.
	Failed,
}

impl ChapterOutcome {
	#[must_use]
	/// # Failed?
	pub const fn is_failed(self) -> bool { matches!(self, Self::Failed) }
}



/// # Convert Chapters.
///
/// Convert each chapter of `src` into its own MP3 under `dir`, creating the
/// folder if needed. Chapters with valid output already in place are skipped,
/// so calling this repeatedly only ever fills in the gaps.
///
/// Individual chapter failures are logged and do not stop the loop. If the
/// kill switch is flipped, the loop stops before starting the next chapter;
/// the returned list will be shorter than the chapter list in that case.
///
/// ## Errors
///
/// This will return an error if the output folder cannot be created.
pub fn convert_chapters<T>(
	tool: &T,
	opts: &ConvertOptions,
	src: &Path,
	dir: &Path,
	chapters: &[Chapter],
	errors: &ErrorLog,
	killed: &KillSwitch,
) -> Result<Vec<ChapterOutcome>, BookRipError>
where T: AudioTool + ?Sized {
	std::fs::create_dir_all(dir)
		.map_err(|_| BookRipError::Mkdir(dir.to_string_lossy().into_owned()))?;

	if chapters.is_empty() {
		errors.push(format!("No chapters found in {}. Skipping file.", src.display()));
		return Ok(Vec::new());
	}

	let mut out = Vec::with_capacity(chapters.len());
	for ch in chapters {
		if killed.killed() { break; }
		out.push(convert_chapter(tool, opts, src, dir, ch, errors));
	}

	Ok(out)
}

/// # Convert Chapter.
///
/// Transcode one chapter, unless valid output for it already exists. Failures
/// are logged rather than returned. A failed transcode or split never leaves a
/// partial or oversized file behind.
pub fn convert_chapter<T>(
	tool: &T,
	opts: &ConvertOptions,
	src: &Path,
	dir: &Path,
	ch: &Chapter,
	errors: &ErrorLog,
) -> ChapterOutcome
where T: AudioTool + ?Sized {
	let name = ch.file_name();
	if matches!(chapter_files(tool, dir, ch), ChapterFiles::Valid) {
		Msg::custom("Skipped", 11, &format!("{name} is already done."))
			.with_newline(true)
			.eprint();
		return ChapterOutcome::Skipped;
	}

	if sanitize_filename(ch.title()) != ch.title() {
		Msg::info(format!("Chapter {} will be saved as {name}.", ch.index())).eprint();
	}

	// Any parts from an earlier split are about to be superseded.
	for part in chapter_parts(dir, &ch.stem()) {
		let _res = std::fs::remove_file(part);
	}

	let dst = dir.join(&name);
	let res = tool.transcode(&Transcode {
		src,
		dst: &dst,
		start: ch.start(),
		duration: ch.duration(),
		bitrate: opts.bitrate(),
	});

	if ! res.ok() {
		if dst.exists() { let _res = std::fs::remove_file(&dst); }
		errors.push(format!("Error processing chapter {}: {}", ch.index(), res.diagnostic()));
		return ChapterOutcome::Failed;
	}

	let size = std::fs::metadata(&dst).map_or(0, |m| m.len());
	if opts.split_threshold() < size {
		match split_oversized(tool, &dst, opts) {
			Ok(parts) => ChapterOutcome::Split(parts),
			Err(e) => {
				// Oversized output doesn't count.
				let _res = std::fs::remove_file(&dst);
				errors.push(format!("Error processing chapter {}: {e}", ch.index()));
				ChapterOutcome::Failed
			},
		}
	}
	else { ChapterOutcome::Converted }
}

/// # Split Oversized File.
///
/// Cut `file` into `<stem>_partNNN.mp3` segments alongside it, then remove
/// the original. Returns the number of parts written.
///
/// The original is only removed once at least one part exists; if anything
/// goes wrong, it is left as-is and any stray parts are cleaned up.
///
/// ## Errors
///
/// This will return an error if the segmenting fails or produces nothing.
pub fn split_oversized<T>(tool: &T, file: &Path, opts: &ConvertOptions)
-> Result<usize, BookRipError>
where T: AudioTool + ?Sized {
	let (Some(dir), Some(stem)) = (file.parent(), file.file_stem().and_then(|s| s.to_str()))
	else {
		return Err(BookRipError::Split(file.to_string_lossy().into_owned()));
	};

	let res = tool.segment(file, opts.segment_seconds(), dir, stem);
	let parts = chapter_parts(dir, stem);
	if ! res.ok() || parts.is_empty() {
		for part in parts { let _res = std::fs::remove_file(part); }
		return Err(BookRipError::Split(format!(
			"{} ({})",
			file.to_string_lossy(),
			res.diagnostic(),
		)));
	}

	std::fs::remove_file(file)
		.map_err(|_| BookRipError::Write(file.to_string_lossy().into_owned()))?;

	Msg::info(format!(
		"{} was split into {}.",
		file.file_name().map_or_else(|| file.to_string_lossy(), |n| n.to_string_lossy()),
		parts.len().nice_inflect("part", "parts"),
	)).eprint();

	Ok(parts.len())
}
