/*!
# Book Rip: Errors
*/

use fyi_msg::Msg;
use std::{
	error::Error,
	fmt,
};



#[cfg(feature = "bin")]
/// # Help Text.
const HELP: &str = concat!(r#"
     ______
    /     /|   "#, "\x1b[38;5;199mBook Rip\x1b[0;38;5;69m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r#"
   /     / |   Incremental, resumable
  /_____/  |   audiobook chapter ripping.
  |     |  /
  |     | /
  |_____|/

USAGE:
    bookrip [OPTIONS] [DIR]

Every .m4b in <DIR> is split into one .mp3 per chapter, written to a folder
named after the source. Finished sources are recorded in the processed log and
skipped on future runs. Unfinished folders are renamed with a " - failed",
" - corrupt", or " - incomplete" suffix, and retried on the next run.

ENCODING:
    -b, --bitrate <KBPS>
                      The MP3 bitrate to encode chapters with.
                      [default: 128; range: 32..=320]
        --ffmpeg <PATH>
                      The ffmpeg binary to use. [default: ffmpeg]
        --ffprobe <PATH>
                      The ffprobe binary to use. [default: ffprobe]

LOGS:
    -e, --error-log <PATH>
                      Where to append conversion diagnostics.
                      [default: <DIR>/conversion_errors.log]
    -l, --log <PATH>  The list of fully-converted sources, which are skipped
                      on future runs. [default: <DIR>/processed_files.log]

WHEN ALL ELSE FAILS:
        --repair      Convert into empty or corrupt output folders instead of
                      marking and skipping them. Valid chapter files are kept;
                      corrupt ones are overwritten.

MISCELLANEOUS:
    -h, --help        Print help information to STDOUT and exit.
    -V, --version     Print version information to STDOUT and exit.
        --status      Print the state of every source in the library to
                      STDERR and exit without converting, renaming, or
                      logging anything.

ARGS:
    <DIR>             The library folder holding the .m4b sources.
                      [default: .]

EARLY EXIT:
    Press CTRL+C to stop after the current chapter. The interrupted source
    will be marked incomplete and picked up again next time.
"#);



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Errors.
pub enum BookRipError {
	/// # Invalid Bitrate.
	Bitrate(u16),

	/// # User Abort.
	Killed,

	/// # Unreadable Library.
	Library(String),

	/// # Output Folder Creation.
	Mkdir(String),

	/// # Unreadable Processed Log.
	ProcessedLog(String),

	/// # Read Error.
	Read(String),

	/// # Folder Rename.
	Rename(String, String),

	/// # Segment Split Failure.
	Split(String),

	/// # Invalid/Unsupported Source File.
	Source(String),

	/// # Writing to disk.
	Write(String),

	#[cfg(feature = "bin")]
	/// # Invalid CLI arg.
	CliArg(String),

	#[cfg(feature = "bin")]
	/// # CLI Parsing failure.
	CliParse(&'static str),

	#[cfg(feature = "bin")]
	/// # Print Help (Not an Error).
	PrintHelp,

	#[cfg(feature = "bin")]
	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for BookRipError {}

impl From<BookRipError> for Msg {
	#[inline]
	fn from(src: BookRipError) -> Self { Self::error(src.to_string()) }
}

impl fmt::Display for BookRipError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bitrate(n) => write!(f, "Invalid bitrate ({n}); expected 32..=320 kbps."),
			Self::Killed => f.write_str("User abort."),
			Self::Library(s) => write!(f, "Unable to read the library folder {s}."),
			Self::Mkdir(s) => write!(f, "Unable to create the output folder {s}."),
			Self::ProcessedLog(s) => write!(f, "Unable to read the processed log {s}."),
			Self::Read(s) => write!(f, "Unable to read {s}."),
			Self::Rename(a, b) => write!(f, "Unable to rename {a} to {b}."),
			Self::Split(s) => write!(f, "Unable to split {s} into parts."),
			Self::Source(s) => write!(f, "Invalid source file {s}."),
			Self::Write(s) => write!(f, "Unable to write to {s}."),

			#[cfg(feature = "bin")]
			Self::CliArg(s) => write!(f, "Invalid CLI option: {s}"),

			#[cfg(feature = "bin")]
			Self::CliParse(s) => write!(f, "Unable to parse {s}."),

			#[cfg(feature = "bin")]
			Self::PrintHelp => f.write_str(HELP),

			#[cfg(feature = "bin")]
			Self::PrintVersion => f.write_str(concat!("Book Rip v", env!("CARGO_PKG_VERSION"))),
		}
	}
}
