/*!
# Book Rip: Library

The driver. A library is a folder of chaptered `.m4b` sources; each gets an
output folder of the same name (minus extension) alongside it.

The output folders are the real state. The processed log only short-circuits
sources already known to be done, and folder markers are only ever hints, so
a run can be interrupted at any point and simply started again.
*/

use crate::{
	AudioTool,
	BookRipError,
	Completion,
	ConvertOptions,
	convert_chapters,
	corrupt_files,
	ERROR_LOG,
	ErrorLog,
	evaluate,
	extract_chapters,
	FolderState,
	KillSwitch,
	locate_folder,
	mark_folder,
	PROCESSED_LOG,
	ProcessedLog,
	restore_folder,
	SOURCE_EXT,
};
use crate::{
	chapter::read_chapters,
	check::dir_is_empty,
};
use fyi_msg::Msg;
use std::{
	ffi::OsStr,
	fmt,
	path::{
		Path,
		PathBuf,
	},
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Library Paths.
///
/// Where the sources live, and where the two logs go. Unless overridden, the
/// logs sit in the library root.
pub struct LibraryPaths {
	root: PathBuf,
	processed: PathBuf,
	errors: PathBuf,
}

impl LibraryPaths {
	#[must_use]
	/// # New.
	pub fn new<P>(root: P) -> Self
	where P: Into<PathBuf> {
		let root = root.into();
		let processed = root.join(PROCESSED_LOG);
		let errors = root.join(ERROR_LOG);
		Self { root, processed, errors }
	}

	#[must_use]
	/// # With Processed Log.
	pub fn with_processed_log<P>(self, path: P) -> Self
	where P: Into<PathBuf> {
		Self { processed: path.into(), ..self }
	}

	#[must_use]
	/// # With Error Log.
	pub fn with_error_log<P>(self, path: P) -> Self
	where P: Into<PathBuf> {
		Self { errors: path.into(), ..self }
	}

	#[must_use]
	/// # Library Root.
	pub fn root(&self) -> &Path { &self.root }

	#[must_use]
	/// # Processed Log.
	pub fn processed_log(&self) -> &Path { &self.processed }

	#[must_use]
	/// # Error Log.
	pub fn error_log(&self) -> &Path { &self.errors }
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Source File.
pub struct SourceFile {
	path: PathBuf,
	name: String,
	dir: PathBuf,
}

impl SourceFile {
	/// # New.
	///
	/// ## Errors
	///
	/// The file name must be valid UTF-8, since it is what gets written to the
	/// processed log.
	pub fn new<P>(path: P) -> Result<Self, BookRipError>
	where P: Into<PathBuf> {
		let path = path.into();
		let (Some(name), Some(stem)) = (
			path.file_name().and_then(OsStr::to_str),
			path.file_stem().and_then(OsStr::to_str),
		) else {
			return Err(BookRipError::Source(path.to_string_lossy().into_owned()));
		};

		let name = name.to_owned();
		let dir = path.with_file_name(stem);
		Ok(Self { path, name, dir })
	}

	#[must_use]
	/// # Path.
	pub fn path(&self) -> &Path { &self.path }

	#[must_use]
	/// # File Name.
	pub fn name(&self) -> &str { &self.name }

	#[must_use]
	/// # Canonical Output Folder.
	///
	/// This is the unmarked name, whether or not it currently exists.
	pub fn output_dir(&self) -> &Path { &self.dir }
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Source Outcome.
pub enum Outcome {
	/// # Already in the Processed Log.
	Logged,

	/// # Found Complete and Recorded.
	Recorded,

	/// # Converted to Completion.
	Converted,

	/// # Marked Failed.
	Failed,

	/// # Marked Corrupt.
	Corrupt,

	/// # Marked Incomplete.
	Incomplete,
}

impl fmt::Display for Outcome {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<FolderState> for Outcome {
	fn from(src: FolderState) -> Self {
		match src {
			FolderState::Clean => Self::Converted,
			FolderState::Failed => Self::Failed,
			FolderState::Corrupt => Self::Corrupt,
			FolderState::Incomplete => Self::Incomplete,
		}
	}
}

impl Outcome {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Logged => "already logged",
			Self::Recorded => "already complete",
			Self::Converted => "converted",
			Self::Failed => "failed",
			Self::Corrupt => "corrupt",
			Self::Incomplete => "incomplete",
		}
	}

	#[must_use]
	/// # Done?
	pub const fn is_done(self) -> bool {
		matches!(self, Self::Logged | Self::Recorded | Self::Converted)
	}
}



#[derive(Debug, Clone, Default)]
/// # Run Summary.
pub struct Summary {
	entries: Vec<(String, Outcome)>,
}

impl Summary {
	/// # Push.
	fn push(&mut self, src: &SourceFile, outcome: Outcome) {
		self.entries.push((src.name().to_owned(), outcome));
	}

	#[must_use]
	/// # Length.
	///
	/// The number of sources visited.
	pub fn len(&self) -> usize { self.entries.len() }

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.entries.is_empty() }

	#[must_use]
	/// # Count.
	pub fn count(&self, outcome: Outcome) -> u32 {
		let len = self.entries.iter().filter(|(_, o)| *o == outcome).count();
		u32::try_from(len).unwrap_or(u32::MAX)
	}

	/// # Entries.
	pub fn entries(&self) -> impl Iterator<Item=(&str, Outcome)> {
		self.entries.iter().map(|(n, o)| (n.as_str(), *o))
	}

	/// # Pending.
	///
	/// The sources that still need work.
	pub fn pending(&self) -> impl Iterator<Item=&str> {
		self.entries.iter().filter_map(|(n, o)|
			if o.is_done() { None }
			else { Some(n.as_str()) }
		)
	}
}



#[derive(Debug, Clone, PartialEq)]
/// # Source Status.
///
/// A read-only snapshot of where a source stands.
pub struct SourceStatus {
	name: String,
	logged: bool,
	folder: Option<(PathBuf, FolderState)>,
	verdict: Option<Completion>,
}

impl SourceStatus {
	#[must_use]
	/// # File Name.
	pub fn name(&self) -> &str { &self.name }

	#[must_use]
	/// # In the Processed Log?
	pub const fn logged(&self) -> bool { self.logged }

	#[must_use]
	/// # Output Folder.
	///
	/// The folder as it currently exists on disk, if it does, and its marker.
	pub fn folder(&self) -> Option<(&Path, FolderState)> {
		self.folder.as_ref().map(|(p, s)| (p.as_path(), *s))
	}

	#[must_use]
	/// # Verdict.
	///
	/// The completion verdict for the output folder. This is only computed for
	/// unlogged sources that have a folder.
	pub const fn verdict(&self) -> Option<Completion> { self.verdict }

	#[must_use]
	/// # Effective State.
	///
	/// The marker the folder should carry given its contents, which may
	/// differ from the marker it actually has.
	pub fn effective_state(&self) -> Option<FolderState> {
		self.verdict.map(Completion::folder_state)
	}
}



#[derive(Debug)]
/// # Library.
///
/// This holds the sources, logs, and settings for a conversion run.
pub struct Library<'a, T: ?Sized> {
	paths: LibraryPaths,
	opts: ConvertOptions,
	tool: &'a T,
	sources: Vec<SourceFile>,
	skipped: Vec<PathBuf>,
	processed: ProcessedLog,
	errors: ErrorLog,
}

impl<'a, T> Library<'a, T>
where T: AudioTool + ?Sized {
	/// # New.
	///
	/// Find the sources and load the processed log.
	///
	/// ## Errors
	///
	/// This will return an error if the library root cannot be read, or the
	/// processed log exists but cannot be read.
	pub fn new(paths: LibraryPaths, opts: ConvertOptions, tool: &'a T)
	-> Result<Self, BookRipError> {
		let (sources, skipped) = find_sources(paths.root())?;
		let processed = ProcessedLog::open(paths.processed_log())?;
		let errors = ErrorLog::new(paths.error_log());

		Ok(Self { paths, opts, tool, sources, skipped, processed, errors })
	}

	#[must_use]
	/// # Quiet.
	///
	/// Keep error log entries out of STDERR.
	pub fn with_quiet(self, quiet: bool) -> Self {
		Self {
			errors: self.errors.with_quiet(quiet),
			..self
		}
	}

	#[must_use]
	/// # Paths.
	pub const fn paths(&self) -> &LibraryPaths { &self.paths }

	#[must_use]
	/// # Sources.
	///
	/// Sorted by file name.
	pub fn sources(&self) -> &[SourceFile] { &self.sources }

	#[must_use]
	/// # Skipped Sources.
	///
	/// `.m4b` files whose names can't be used. These are only written to the
	/// error log once a run begins.
	pub fn skipped(&self) -> &[PathBuf] { &self.skipped }

	#[must_use]
	/// # Processed Log.
	pub const fn processed(&self) -> &ProcessedLog { &self.processed }

	#[must_use]
	/// # Error Log.
	pub const fn errors(&self) -> &ErrorLog { &self.errors }
}

impl<T> Library<'_, T>
where T: AudioTool + ?Sized {
	/// # Run!
	///
	/// Convert everything that isn't already done.
	///
	/// Problems with any one source are logged and reflected in its folder
	/// marker; they do not stop the run. If the kill switch is flipped, the
	/// current source is wrapped up normally and the rest are left for next
	/// time.
	pub fn run(&mut self, killed: &KillSwitch) -> Summary {
		for path in &self.skipped {
			self.errors.push(BookRipError::Source(path.to_string_lossy().into_owned()));
		}

		let mut summary = Summary::default();
		for src in self.sources.clone() {
			if killed.killed() { break; }

			if self.processed.contains(src.name()) {
				summary.push(&src, Outcome::Logged);
				continue;
			}

			Msg::custom("Book", 199, src.name())
				.with_newline(true)
				.eprint();

			let outcome = match self.process(&src, killed) {
				Ok(o) => o,
				Err(e) => {
					self.errors.push(format!("Error processing {}: {e}", src.name()));
					if let Err(e) = mark_folder(src.output_dir(), FolderState::Failed, &self.errors) {
						self.errors.push(e);
					}
					Outcome::Failed
				},
			};

			if outcome.is_done() {
				Msg::success(format!("{} is {outcome}.", src.name())).eprint();
			}
			summary.push(&src, outcome);
		}

		summary
	}

	/// # Process Source.
	fn process(&mut self, src: &SourceFile, killed: &KillSwitch)
	-> Result<Outcome, BookRipError> {
		let dir = src.output_dir();
		restore_folder(dir, &self.errors)?;

		let chapters = extract_chapters(self.tool, src.path(), &self.errors);

		// Deal with existing output first.
		if dir.is_dir() {
			let repair = self.opts.repair();
			if dir_is_empty(dir)? {
				if ! repair {
					self.errors.push(format!("The output folder {} is empty.", dir.display()));
					mark_folder(dir, FolderState::Failed, &self.errors)?;
					return Ok(Outcome::Failed);
				}
			}
			else {
				let corrupt = corrupt_files(self.tool, dir)?;
				if ! corrupt.is_empty() {
					if ! repair {
						self.errors.push(format!(
							"The output folder {} has corrupt files: {}",
							dir.display(),
							file_names(&corrupt),
						));
						mark_folder(dir, FolderState::Corrupt, &self.errors)?;
						return Ok(Outcome::Corrupt);
					}
				}
				else if evaluate(self.tool, dir, &chapters).is_complete() {
					self.processed.append(src.name())?;
					return Ok(Outcome::Recorded);
				}
			}
		}

		convert_chapters(self.tool, &self.opts, src.path(), dir, &chapters, &self.errors, killed)?;

		let verdict = evaluate(self.tool, dir, &chapters);
		if verdict.is_complete() {
			self.processed.append(src.name())?;
			return Ok(Outcome::Converted);
		}

		let state = verdict.folder_state();
		self.errors.push(format!("{} is {state}: {verdict}.", src.name()));
		mark_folder(dir, state, &self.errors)?;
		Ok(Outcome::from(state))
	}

	#[must_use]
	/// # Status.
	///
	/// Report where each source stands without changing anything. Sources in
	/// the processed log are taken at their word; the rest have their output
	/// folders (marked or not) evaluated from scratch.
	pub fn status(&self) -> Vec<SourceStatus> {
		self.sources.iter().map(|src| {
			let name = src.name().to_owned();
			if self.processed.contains(&name) {
				return SourceStatus { name, logged: true, folder: None, verdict: None };
			}

			let folder = locate_folder(src.output_dir());
			let verdict = folder.as_ref().map(|(path, _)| {
				let chapters = read_chapters(self.tool, src.path()).unwrap_or_default();
				evaluate(self.tool, path, &chapters)
			});

			SourceStatus { name, logged: false, folder, verdict }
		})
			.collect()
	}
}



/// # Find Sources.
///
/// Return the `.m4b` files directly inside `root`, sorted by name, along with
/// any whose names are unusable.
///
/// ## Errors
///
/// This will return an error if the folder cannot be read.
fn find_sources(root: &Path) -> Result<(Vec<SourceFile>, Vec<PathBuf>), BookRipError> {
	let iter = std::fs::read_dir(root)
		.map_err(|_| BookRipError::Library(root.to_string_lossy().into_owned()))?;

	let mut out = Vec::new();
	let mut skipped = Vec::new();
	for path in iter.filter_map(|e| e.ok().map(|e| e.path())) {
		// The extension itself may not be UTF-8.
		let good = path.is_file() && path.extension()
			.map(OsStr::to_string_lossy)
			.is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXT));
		if ! good { continue; }

		if let Ok(src) = SourceFile::new(&path) { out.push(src); }
		else { skipped.push(path); }
	}

	out.sort_unstable_by(|a, b| a.name().cmp(b.name()));
	skipped.sort_unstable();
	Ok((out, skipped))
}

/// # File Names.
///
/// Comma-separate the file names of the paths.
fn file_names(src: &[PathBuf]) -> String {
	src.iter()
		.filter_map(|p| p.file_name())
		.map(OsStr::to_string_lossy)
		.collect::<Vec<_>>()
		.join(", ")
}
