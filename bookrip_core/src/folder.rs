/*!
# Book Rip: Folder States

Each source's output folder doubles as a status indicator: when a run ends
without a complete conversion, the folder is renamed with a suffix describing
what went wrong, e.g. `Dune - incomplete`.

The suffix is only a hint for humans. The next run strips it off again before
doing anything else and re-derives the real state from the folder's contents.
*/

use crate::{
	BookRipError,
	ErrorLog,
};
use fyi_msg::Msg;
use std::{
	fmt,
	path::{
		Path,
		PathBuf,
	},
};



#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # Folder State.
pub enum FolderState {
	/// # No Marker.
	///
	/// The folder is either complete or not yet evaluated.
	Clean,

	/// # Failed.
	///
	/// The folder was empty, or something blew up.
	Failed,

	/// # Corrupt.
	///
	/// At least one output file could not be decoded.
	Corrupt,

	/// # Incomplete.
	///
	/// At least one chapter has no output, or there were no chapters.
	Incomplete,
}

impl fmt::Display for FolderState {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FolderState {
	/// # Marked States.
	///
	/// In the order they are checked when restoring.
	pub const MARKED: [Self; 3] = [Self::Failed, Self::Corrupt, Self::Incomplete];

	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Clean => "clean",
			Self::Failed => "failed",
			Self::Corrupt => "corrupt",
			Self::Incomplete => "incomplete",
		}
	}

	#[must_use]
	/// # Folder Name Suffix.
	pub const fn suffix(self) -> &'static str {
		match self {
			Self::Clean => "",
			Self::Failed => " - failed",
			Self::Corrupt => " - corrupt",
			Self::Incomplete => " - incomplete",
		}
	}

	#[must_use]
	/// # From Folder Name.
	///
	/// Split a folder name into its canonical part and marker.
	///
	/// ```
	/// use bookrip_core::FolderState;
	///
	/// assert_eq!(FolderState::from_name("Dune - corrupt"), ("Dune", FolderState::Corrupt));
	/// assert_eq!(FolderState::from_name("Dune"), ("Dune", FolderState::Clean));
	/// ```
	pub fn from_name(name: &str) -> (&str, Self) {
		for state in Self::MARKED {
			if let Some(base) = name.strip_suffix(state.suffix()) {
				if ! base.is_empty() { return (base, state); }
			}
		}
		(name, Self::Clean)
	}

	#[must_use]
	/// # Marked Path.
	///
	/// Append this state's suffix to a canonical folder path.
	pub fn path(self, canonical: &Path) -> PathBuf {
		let mut out = canonical.as_os_str().to_owned();
		out.push(self.suffix());
		PathBuf::from(out)
	}
}



#[must_use]
/// # Locate Folder.
///
/// Return the output folder that currently exists for `canonical`, marked or
/// not, along with its marker. The unmarked name takes priority.
pub fn locate_folder(canonical: &Path) -> Option<(PathBuf, FolderState)> {
	if canonical.is_dir() {
		return Some((canonical.to_path_buf(), FolderState::Clean));
	}

	FolderState::MARKED.into_iter().find_map(|state| {
		let path = state.path(canonical);
		if path.is_dir() { Some((path, state)) }
		else { None }
	})
}

/// # Restore Folder Name.
///
/// If a marked version of `canonical` exists, rename it back so work can
/// resume under the canonical name. Returns the marker that was removed, or
/// `Clean` if nothing was renamed.
///
/// An existing canonical folder is never overwritten; the conflict is logged
/// and the marked folder is left alone.
///
/// ## Errors
///
/// This will return an error if the rename fails.
pub fn restore_folder(canonical: &Path, errors: &ErrorLog) -> Result<FolderState, BookRipError> {
	for state in FolderState::MARKED {
		let marked = state.path(canonical);
		if ! marked.is_dir() { continue; }

		if canonical.exists() {
			errors.push(format!(
				"Unable to restore {}; {} already exists.",
				marked.display(),
				canonical.display(),
			));
			return Ok(FolderState::Clean);
		}

		rename(&marked, canonical)?;
		return Ok(state);
	}

	Ok(FolderState::Clean)
}

/// # Mark Folder.
///
/// Rename `canonical` to carry the given marker, returning the folder's new
/// path. Nothing happens if the state is `Clean`, the folder doesn't exist,
/// or the marked name is already taken (which is logged).
///
/// ## Errors
///
/// This will return an error if the rename fails.
pub fn mark_folder(canonical: &Path, state: FolderState, errors: &ErrorLog)
-> Result<PathBuf, BookRipError> {
	if matches!(state, FolderState::Clean) || ! canonical.is_dir() {
		return Ok(canonical.to_path_buf());
	}

	let dst = state.path(canonical);
	if dst.exists() {
		errors.push(format!(
			"Unable to mark {} as {state}; {} already exists.",
			canonical.display(),
			dst.display(),
		));
		return Ok(canonical.to_path_buf());
	}

	rename(canonical, &dst)?;
	Ok(dst)
}

/// # Rename.
fn rename(src: &Path, dst: &Path) -> Result<(), BookRipError> {
	std::fs::rename(src, dst).map_err(|_| BookRipError::Rename(
		src.to_string_lossy().into_owned(),
		dst.to_string_lossy().into_owned(),
	))?;

	Msg::custom("Renamed", 13, &format!(
		"{} -> {}",
		name(src),
		name(dst),
	))
		.with_newline(true)
		.eprint();

	Ok(())
}

/// # Folder Name.
fn name(src: &Path) -> String {
	src.file_name().map_or_else(
		|| src.to_string_lossy().into_owned(),
		|n| n.to_string_lossy().into_owned(),
	)
}
