/*!
# Book Rip: Logs

Book Rip keeps two plain-text logs, both strictly append-only:

* The processed log lists (by file name) every source that has been fully and
  verifiably converted. It is read once at startup to decide what to skip.
* The error log is a free-form diagnostic trail for humans. Book Rip never
  reads it back.
*/

use crate::BookRipError;
use fyi_msg::Msg;
use std::{
	collections::HashSet,
	fmt,
	fs::{
		File,
		OpenOptions,
	},
	io::Write,
	path::{
		Path,
		PathBuf,
	},
};
use utc2k::FmtUtc2k;



#[derive(Debug, Clone)]
/// # Error Log.
pub struct ErrorLog {
	path: PathBuf,
	quiet: bool,
}

impl ErrorLog {
	#[must_use]
	/// # New.
	///
	/// The file is not touched until the first message is pushed.
	pub fn new<P>(path: P) -> Self
	where P: Into<PathBuf> {
		Self { path: path.into(), quiet: false }
	}

	#[must_use]
	/// # Quiet.
	///
	/// When `true`, messages are only written to the file, not echoed to
	/// STDERR.
	pub fn with_quiet(self, quiet: bool) -> Self {
		Self { quiet, ..self }
	}

	#[must_use]
	/// # Path.
	pub fn path(&self) -> &Path { &self.path }

	/// # Push Message.
	///
	/// Append a timestamped line to the log, echoing it to STDERR as a
	/// warning.
	///
	/// Failing to write a diagnostic is not worth aborting a conversion over,
	/// so write errors are reported to STDERR and otherwise ignored.
	pub fn push<S>(&self, msg: S)
	where S: fmt::Display {
		// Collapse multi-line tool output so each entry stays on one line.
		let msg = msg.to_string()
			.lines()
			.map(str::trim)
			.filter(|l| ! l.is_empty())
			.collect::<Vec<&str>>()
			.join(" / ");

		if ! self.quiet { Msg::warning(msg.as_str()).eprint(); }

		let res = append_file(&self.path)
			.and_then(|mut f| writeln!(f, "[{}] {msg}", FmtUtc2k::now()).and_then(|()| f.flush()));
		if res.is_err() {
			Msg::error(format!("Unable to write to {}.", self.path.display())).eprint();
		}
	}
}



#[derive(Debug, Clone)]
/// # Processed Log.
///
/// The set of source file names that have been completely converted.
pub struct ProcessedLog {
	path: PathBuf,
	done: HashSet<String>,
	newline: bool,
}

impl ProcessedLog {
	/// # Open.
	///
	/// Read the existing entries, if any. A missing log is simply empty.
	///
	/// ## Errors
	///
	/// This will return an error if the log exists but cannot be read.
	pub fn open<P>(path: P) -> Result<Self, BookRipError>
	where P: Into<PathBuf> {
		let path = path.into();
		let raw =
			if path.exists() {
				std::fs::read(&path)
					.map_err(|_| BookRipError::ProcessedLog(path.to_string_lossy().into_owned()))?
			}
			else { Vec::new() };

		// If the last line was never terminated, our first append will need
		// to terminate it.
		let newline = raw.last().is_some_and(|&b| b != b'\n');

		let done = String::from_utf8_lossy(&raw)
			.lines()
			.map(str::trim)
			.filter(|l| ! l.is_empty())
			.map(String::from)
			.collect();

		Ok(Self { path, done, newline })
	}

	#[must_use]
	/// # Path.
	pub fn path(&self) -> &Path { &self.path }

	#[must_use]
	/// # Contains?
	pub fn contains(&self, name: &str) -> bool { self.done.contains(name) }

	#[must_use]
	/// # Length.
	pub fn len(&self) -> usize { self.done.len() }

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.done.is_empty() }

	/// # Append.
	///
	/// Record a completed source. Names already present are not written a
	/// second time.
	///
	/// ## Errors
	///
	/// This will return an error if the log cannot be written to.
	pub fn append(&mut self, name: &str) -> Result<(), BookRipError> {
		if self.done.contains(name) { return Ok(()); }

		let mut line = String::with_capacity(name.len() + 2);
		if self.newline { line.push('\n'); }
		line.push_str(name);
		line.push('\n');

		append_file(&self.path)
			.and_then(|mut f| f.write_all(line.as_bytes()).and_then(|()| f.flush()))
			.map_err(|_| BookRipError::Write(self.path.to_string_lossy().into_owned()))?;

		self.newline = false;
		self.done.insert(name.to_owned());
		Ok(())
	}
}



/// # Open For Appending.
fn append_file(path: &Path) -> std::io::Result<File> {
	OpenOptions::new().create(true).append(true).open(path)
}



#[cfg(test)]
mod test {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn t_processed_log() {
		let tmp = TempDir::new().expect("Tempdir failed.");
		let path = tmp.path().join("processed_files.log");

		// Missing is fine.
		let mut log = ProcessedLog::open(&path).expect("Missing logs should be empty.");
		assert!(log.is_empty());
		assert!(! path.exists(), "Opening should not create the file.");

		log.append("Dune.m4b").expect("Append failed.");
		log.append("Emma.m4b").expect("Append failed.");
		log.append("Dune.m4b").expect("Append failed.");
		assert_eq!(log.len(), 2);
		assert_eq!(
			std::fs::read_to_string(&path).expect("Read failed."),
			"Dune.m4b\nEmma.m4b\n",
			"Duplicates should not be written.",
		);

		// Reopen.
		let log = ProcessedLog::open(&path).expect("Reopen failed.");
		assert!(log.contains("Dune.m4b"));
		assert!(log.contains("Emma.m4b"));
		assert!(! log.contains("Dune"));
	}

	#[test]
	fn t_processed_log_unterminated() {
		let tmp = TempDir::new().expect("Tempdir failed.");
		let path = tmp.path().join("processed_files.log");
		std::fs::write(&path, "Dune.m4b\n\n  Emma.m4b  ").expect("Write failed.");

		let mut log = ProcessedLog::open(&path).expect("Open failed.");
		assert_eq!(log.len(), 2, "Blank lines and padding should be ignored.");
		assert!(log.contains("Emma.m4b"));

		log.append("Persuasion.m4b").expect("Append failed.");
		let raw = std::fs::read_to_string(&path).expect("Read failed.");
		assert!(
			raw.ends_with("  Emma.m4b  \nPersuasion.m4b\n"),
			"Existing content should be preserved and terminated: {raw:?}",
		);
	}

	#[test]
	fn t_processed_log_unreadable() {
		let tmp = TempDir::new().expect("Tempdir failed.");

		// A directory exists but cannot be read like a file.
		assert!(matches!(
			ProcessedLog::open(tmp.path()),
			Err(BookRipError::ProcessedLog(_)),
		));
	}

	#[test]
	fn t_error_log() {
		let tmp = TempDir::new().expect("Tempdir failed.");
		let path = tmp.path().join("conversion_errors.log");
		let log = ErrorLog::new(&path).with_quiet(true);
		assert!(! path.exists(), "Error logs should be created lazily.");

		log.push("Error processing chapter 4: first line\n  second line\n");
		log.push("No chapters found in Emma.m4b. Skipping file.");

		let raw = std::fs::read_to_string(&path).expect("Read failed.");
		let lines: Vec<&str> = raw.lines().collect();
		assert_eq!(lines.len(), 2, "Each push should be exactly one line.");
		assert!(lines[0].starts_with('['), "Lines should be timestamped.");
		assert!(lines[0].ends_with("] Error processing chapter 4: first line / second line"));
		assert!(lines[1].ends_with("] No chapters found in Emma.m4b. Skipping file."));
	}
}
