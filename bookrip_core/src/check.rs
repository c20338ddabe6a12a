/*!
# Book Rip: Verification
*/

use crate::{
	AudioTool,
	BookRipError,
	Chapter,
	FolderState,
	OUTPUT_EXT,
};
use std::{
	ffi::OsStr,
	fmt,
	path::{
		Path,
		PathBuf,
	},
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Completion Verdict.
///
/// The result of checking an output folder against its chapter list. Anything
/// other than `Complete` carries the first problem found.
pub enum Completion {
	/// # Every Chapter Present and Valid.
	Complete,

	/// # The Source Has No Usable Chapters.
	NoChapters,

	/// # The Folder Is Missing or Empty.
	Empty,

	/// # A Chapter Has No Output.
	Missing(u32),

	/// # A Chapter's Output Is Corrupt.
	Corrupt(u32),
}

impl fmt::Display for Completion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Complete => f.write_str("complete"),
			Self::NoChapters => f.write_str("no chapters"),
			Self::Empty => f.write_str("empty output folder"),
			Self::Missing(n) => write!(f, "chapter {n} is missing"),
			Self::Corrupt(n) => write!(f, "chapter {n} is corrupt"),
		}
	}
}

impl Completion {
	#[must_use]
	/// # Complete?
	pub const fn is_complete(self) -> bool { matches!(self, Self::Complete) }

	#[must_use]
	/// # Folder State.
	///
	/// The marker a folder should carry after a conversion attempt ends with
	/// this verdict.
	pub const fn folder_state(self) -> FolderState {
		match self {
			Self::Complete => FolderState::Clean,
			Self::Empty => FolderState::Failed,
			Self::Corrupt(_) => FolderState::Corrupt,
			Self::NoChapters | Self::Missing(_) => FolderState::Incomplete,
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Chapter File Status.
pub(crate) enum ChapterFiles {
	/// # Present and Decodable.
	Valid,

	/// # Nothing There.
	Missing,

	/// # Present But Broken.
	Corrupt,
}



#[must_use]
/// # Is Corrupt?
///
/// Run the file through the tool's strict validation mode. Anything short of a
/// clean exit counts as corrupt.
pub fn is_corrupt<T>(tool: &T, file: &Path) -> bool
where T: AudioTool + ?Sized {
	! tool.validate(file).ok()
}

/// # Corrupt Files.
///
/// Validate every MP3 in `dir`, returning the (sorted) paths of any that fail.
///
/// ## Errors
///
/// This will return an error if the directory cannot be read.
pub fn corrupt_files<T>(tool: &T, dir: &Path) -> Result<Vec<PathBuf>, BookRipError>
where T: AudioTool + ?Sized {
	let mut out = mp3_files(dir)?;
	out.retain(|p| is_corrupt(tool, p));
	Ok(out)
}

#[must_use]
/// # Evaluate Completion.
///
/// Check that every chapter has valid output in `dir`. Checks stop at the
/// first problem.
///
/// This only reads, so can be called as often as needed.
pub fn evaluate<T>(tool: &T, dir: &Path, chapters: &[Chapter]) -> Completion
where T: AudioTool + ?Sized {
	if chapters.is_empty() { return Completion::NoChapters; }
	if ! matches!(dir_is_empty(dir), Ok(false)) { return Completion::Empty; }

	for ch in chapters {
		match chapter_files(tool, dir, ch) {
			ChapterFiles::Valid => {},
			ChapterFiles::Missing => return Completion::Missing(ch.index()),
			ChapterFiles::Corrupt => return Completion::Corrupt(ch.index()),
		}
	}

	Completion::Complete
}



/// # Chapter Files.
///
/// A chapter is satisfied either by its own file or, if that was split, by
/// its numbered parts, all of which must be valid.
pub(crate) fn chapter_files<T>(tool: &T, dir: &Path, ch: &Chapter) -> ChapterFiles
where T: AudioTool + ?Sized {
	let whole = dir.join(ch.file_name());
	if whole.is_file() {
		return
			if is_corrupt(tool, &whole) { ChapterFiles::Corrupt }
			else { ChapterFiles::Valid };
	}

	let parts = chapter_parts(dir, &ch.stem());
	if parts.is_empty() { ChapterFiles::Missing }
	else if parts.iter().any(|p| is_corrupt(tool, p)) { ChapterFiles::Corrupt }
	else { ChapterFiles::Valid }
}

/// # Chapter Parts.
///
/// Return the sorted `<stem>_partNNN.mp3` files in `dir`, if any.
pub(crate) fn chapter_parts(dir: &Path, stem: &str) -> Vec<PathBuf> {
	let Ok(iter) = std::fs::read_dir(dir) else { return Vec::new(); };
	let prefix = format!("{stem}_part");
	let suffix = format!(".{OUTPUT_EXT}");

	let mut out: Vec<PathBuf> = iter.filter_map(|e| {
		let e = e.ok()?;
		let name = e.file_name();
		let num = name.to_str()?
			.strip_prefix(prefix.as_str())?
			.strip_suffix(suffix.as_str())?;
		if 3 <= num.len() && num.bytes().all(|b| b.is_ascii_digit()) {
			Some(e.path())
		}
		else { None }
	})
		.collect();

	out.sort_unstable();
	out
}

/// # Directory Is Empty?
///
/// ## Errors
///
/// This will return an error if the directory cannot be read.
pub(crate) fn dir_is_empty(dir: &Path) -> Result<bool, BookRipError> {
	std::fs::read_dir(dir)
		.map(|mut iter| iter.next().is_none())
		.map_err(|_| BookRipError::Read(dir.to_string_lossy().into_owned()))
}

/// # MP3 Files.
///
/// Return the sorted paths of the MP3 files in `dir`.
fn mp3_files(dir: &Path) -> Result<Vec<PathBuf>, BookRipError> {
	let iter = std::fs::read_dir(dir)
		.map_err(|_| BookRipError::Read(dir.to_string_lossy().into_owned()))?;

	let mut out: Vec<PathBuf> = iter.filter_map(|e| {
		let path = e.ok()?.path();
		let good = path.is_file() && path.extension()
			.and_then(OsStr::to_str)
			.is_some_and(|ext| ext.eq_ignore_ascii_case(OUTPUT_EXT));
		if good { Some(path) } else { None }
	})
		.collect();

	out.sort_unstable();
	Ok(out)
}



#[cfg(test)]
mod test {
	use super::*;
	use crate::fake::{
		BAD,
		FakeTool,
	};
	use tempfile::TempDir;

	/// # Three Chapters.
	fn chapters() -> Vec<Chapter> {
		(1..=3_u32)
			.filter_map(|i| Chapter::new(i, Some(format!("Part {i}").as_str()), f64::from(i - 1), f64::from(i)))
			.collect()
	}

	/// # Write Valid Files for Each Chapter.
	fn fill(dir: &Path, chapters: &[Chapter]) {
		for ch in chapters {
			std::fs::write(dir.join(ch.file_name()), b"ID3 data").expect("Write failed.");
		}
	}

	#[test]
	fn t_is_corrupt() {
		let tmp = TempDir::new().expect("Tempdir failed.");
		let tool = FakeTool::default();

		let good = tmp.path().join("good.mp3");
		let zero = tmp.path().join("zero.mp3");
		let bad = tmp.path().join("bad.mp3");
		std::fs::write(&good, b"ID3 data").expect("Write failed.");
		std::fs::write(&zero, b"").expect("Write failed.");
		std::fs::write(&bad, BAD).expect("Write failed.");

		assert!(! is_corrupt(&tool, &good));
		assert!(is_corrupt(&tool, &zero), "Zero-byte files are corrupt.");
		assert!(is_corrupt(&tool, &bad));
		assert!(is_corrupt(&tool, &tmp.path().join("missing.mp3")), "Unreadable files are corrupt.");
	}

	#[test]
	fn t_corrupt_files() {
		let tmp = TempDir::new().expect("Tempdir failed.");
		let tool = FakeTool::default();

		std::fs::write(tmp.path().join("b.mp3"), b"").expect("Write failed.");
		std::fs::write(tmp.path().join("a.MP3"), b"").expect("Write failed.");
		std::fs::write(tmp.path().join("c.mp3"), b"ID3 data").expect("Write failed.");
		std::fs::write(tmp.path().join("cover.jpg"), b"").expect("Write failed.");

		let found = corrupt_files(&tool, tmp.path()).expect("Scan failed.");
		assert_eq!(
			found,
			vec![tmp.path().join("a.MP3"), tmp.path().join("b.mp3")],
			"Only broken MP3s should be returned, in order.",
		);

		assert!(corrupt_files(&tool, &tmp.path().join("nope")).is_err());
	}

	#[test]
	fn t_evaluate() {
		let tmp = TempDir::new().expect("Tempdir failed.");
		let tool = FakeTool::default();
		let dir = tmp.path().join("Book");
		let chapters = chapters();

		// No chapters trumps everything.
		assert_eq!(evaluate(&tool, &dir, &[]), Completion::NoChapters);

		// Missing and empty folders.
		assert_eq!(evaluate(&tool, &dir, &chapters), Completion::Empty);
		std::fs::create_dir(&dir).expect("Mkdir failed.");
		assert_eq!(evaluate(&tool, &dir, &chapters), Completion::Empty);

		// All there.
		fill(&dir, &chapters);
		assert_eq!(evaluate(&tool, &dir, &chapters), Completion::Complete);
		assert_eq!(
			evaluate(&tool, &dir, &chapters),
			Completion::Complete,
			"Evaluation should be repeatable.",
		);

		// Missing chapter two.
		let two = dir.join(chapters[1].file_name());
		std::fs::remove_file(&two).expect("Remove failed.");
		assert_eq!(evaluate(&tool, &dir, &chapters), Completion::Missing(2));

		// Corrupt chapter two.
		std::fs::write(&two, b"").expect("Write failed.");
		assert_eq!(evaluate(&tool, &dir, &chapters), Completion::Corrupt(2));

		// The first problem wins.
		std::fs::remove_file(dir.join(chapters[0].file_name())).expect("Remove failed.");
		assert_eq!(evaluate(&tool, &dir, &chapters), Completion::Missing(1));
	}

	#[test]
	fn t_evaluate_parts() {
		let tmp = TempDir::new().expect("Tempdir failed.");
		let tool = FakeTool::default();
		let chapters = chapters();
		fill(tmp.path(), &chapters);

		// Replace chapter three with parts.
		let stem = chapters[2].stem();
		std::fs::remove_file(tmp.path().join(chapters[2].file_name())).expect("Remove failed.");
		std::fs::write(tmp.path().join(format!("{stem}_part000.mp3")), b"ID3 data").expect("Write failed.");
		std::fs::write(tmp.path().join(format!("{stem}_part001.mp3")), b"ID3 data").expect("Write failed.");
		assert_eq!(evaluate(&tool, tmp.path(), &chapters), Completion::Complete);

		// A bad part spoils the chapter.
		std::fs::write(tmp.path().join(format!("{stem}_part001.mp3")), BAD).expect("Write failed.");
		assert_eq!(evaluate(&tool, tmp.path(), &chapters), Completion::Corrupt(3));
	}

	#[test]
	fn t_chapter_parts() {
		let tmp = TempDir::new().expect("Tempdir failed.");
		for name in [
			"Chapter_1_A_part001.mp3",
			"Chapter_1_A_part000.mp3",
			"Chapter_1_A_part1000.mp3",
			"Chapter_1_A.mp3",
			"Chapter_1_A_part01.mp3",
			"Chapter_1_A_partial_part000.mp3",
			"Chapter_1_A_part000.m4a",
			"Chapter_11_A_part000.mp3",
		] {
			std::fs::write(tmp.path().join(name), b"ID3").expect("Write failed.");
		}

		let parts = chapter_parts(tmp.path(), "Chapter_1_A");
		assert_eq!(
			parts,
			vec![
				tmp.path().join("Chapter_1_A_part000.mp3"),
				tmp.path().join("Chapter_1_A_part001.mp3"),
				tmp.path().join("Chapter_1_A_part1000.mp3"),
			],
		);
	}

	#[test]
	fn t_folder_state() {
		assert_eq!(Completion::Complete.folder_state(), FolderState::Clean);
		assert_eq!(Completion::Empty.folder_state(), FolderState::Failed);
		assert_eq!(Completion::Corrupt(3).folder_state(), FolderState::Corrupt);
		assert_eq!(Completion::Missing(3).folder_state(), FolderState::Incomplete);
		assert_eq!(Completion::NoChapters.folder_state(), FolderState::Incomplete);
	}
}
