/*!
# Book Rip: External Tools
*/

use std::{
	path::{
		Path,
		PathBuf,
	},
	process::{
		Command,
		Output,
		Stdio,
	},
};



/// # Audio Tool.
///
/// Book Rip doesn't decode or encode anything itself; it hands that work off
/// to an external program. This trait covers the four jobs it needs done.
///
/// Implementations should never panic or bail: anything that goes wrong gets
/// reported through the returned [`ToolOutput`], which callers treat as a
/// failure.
pub trait AudioTool {
	/// # Probe Chapters.
	///
	/// Return the source's chapter table as JSON on STDOUT, shaped like
	/// `{"chapters":[{"start_time":"0.0","end_time":"1.5","tags":{"title":"…"}}]}`.
	fn probe(&self, src: &Path) -> ToolOutput;

	/// # Validate.
	///
	/// Decode the entire file, discarding the output. The exit status must be
	/// non-zero if any decoding error is encountered.
	fn validate(&self, src: &Path) -> ToolOutput;

	/// # Transcode.
	///
	/// Encode the job's time range to a single MP3, overwriting the
	/// destination if it exists.
	fn transcode(&self, job: &Transcode<'_>) -> ToolOutput;

	/// # Segment.
	///
	/// Copy (without re-encoding) `src` into consecutive `secs`-long parts
	/// named `<dir>/<stem>_part000.mp3`, `<dir>/<stem>_part001.mp3`, etc.
	fn segment(&self, src: &Path, secs: u32, dir: &Path, stem: &str) -> ToolOutput;
}



#[derive(Debug, Clone, Copy)]
/// # Transcode Job.
pub struct Transcode<'a> {
	/// # Source File.
	pub src: &'a Path,

	/// # Destination File.
	pub dst: &'a Path,

	/// # Start (Seconds).
	pub start: f64,

	/// # Duration (Seconds).
	pub duration: f64,

	/// # Bitrate (kbps).
	pub bitrate: u16,
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Tool Output.
///
/// The exit code and captured output of an external tool invocation.
pub struct ToolOutput {
	/// # Exit Code.
	///
	/// This is `None` if the program could not be started or was killed by a
	/// signal.
	pub code: Option<i32>,

	/// # STDOUT.
	pub stdout: Vec<u8>,

	/// # STDERR.
	pub stderr: String,
}

impl From<Output> for ToolOutput {
	fn from(src: Output) -> Self {
		Self {
			code: src.status.code(),
			stdout: src.stdout,
			stderr: String::from_utf8_lossy(&src.stderr).trim().to_owned(),
		}
	}
}

impl ToolOutput {
	#[must_use]
	/// # Success.
	pub fn success() -> Self {
		Self { code: Some(0), ..Self::default() }
	}

	#[must_use]
	/// # Failure.
	///
	/// Return a failed result with the given error message.
	pub fn failure<S>(code: Option<i32>, stderr: S) -> Self
	where S: Into<String> {
		Self {
			code,
			stdout: Vec::new(),
			stderr: stderr.into(),
		}
	}

	#[must_use]
	/// # Run a Command.
	///
	/// Execute the command to completion, capturing its output. If it can't
	/// be started at all, a codeless failure is returned instead.
	pub fn run(cmd: &mut Command) -> Self {
		let name = cmd.get_program().to_string_lossy().into_owned();
		match cmd.stdin(Stdio::null()).output() {
			Ok(out) => Self::from(out),
			Err(e) => Self::failure(None, format!("Unable to run {name}: {e}")),
		}
	}

	#[must_use]
	/// # Okay?
	pub const fn ok(&self) -> bool { matches!(self.code, Some(0)) }

	#[must_use]
	/// # Diagnostic.
	///
	/// Return STDERR, or a generic message if it was empty.
	pub fn diagnostic(&self) -> String {
		if ! self.stderr.is_empty() { self.stderr.clone() }
		else if let Some(code) = self.code { format!("exit status {code}") }
		else { "terminated without an exit status".to_owned() }
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # FFmpeg.
///
/// The production [`AudioTool`], backed by the `ffmpeg` and `ffprobe`
/// binaries.
pub struct Ffmpeg {
	ffmpeg: PathBuf,
	ffprobe: PathBuf,
}

impl Default for Ffmpeg {
	fn default() -> Self {
		Self {
			ffmpeg: PathBuf::from("ffmpeg"),
			ffprobe: PathBuf::from("ffprobe"),
		}
	}
}

impl Ffmpeg {
	#[must_use]
	/// # With FFmpeg Binary.
	pub fn with_ffmpeg<P>(self, ffmpeg: P) -> Self
	where P: Into<PathBuf> {
		Self { ffmpeg: ffmpeg.into(), ..self }
	}

	#[must_use]
	/// # With FFprobe Binary.
	pub fn with_ffprobe<P>(self, ffprobe: P) -> Self
	where P: Into<PathBuf> {
		Self { ffprobe: ffprobe.into(), ..self }
	}

	#[must_use]
	/// # FFmpeg Binary.
	pub fn ffmpeg(&self) -> &Path { &self.ffmpeg }

	#[must_use]
	/// # FFprobe Binary.
	pub fn ffprobe(&self) -> &Path { &self.ffprobe }

	/// # Base FFmpeg Command.
	///
	/// Quiet, non-interactive, with `src` as the input.
	fn ffmpeg_cmd(&self, src: &Path) -> Command {
		let mut cmd = Command::new(&self.ffmpeg);
		cmd.args(["-nostdin", "-hide_banner", "-v", "error"]);
		cmd.arg("-i").arg(src);
		cmd
	}
}

impl AudioTool for Ffmpeg {
	fn probe(&self, src: &Path) -> ToolOutput {
		let mut cmd = Command::new(&self.ffprobe);
		cmd.args(["-v", "error", "-print_format", "json", "-show_chapters", "-i"])
			.arg(src);
		ToolOutput::run(&mut cmd)
	}

	fn validate(&self, src: &Path) -> ToolOutput {
		let mut cmd = self.ffmpeg_cmd(src);
		cmd.args(["-xerror", "-f", "null", "-"]);
		ToolOutput::run(&mut cmd)
	}

	fn transcode(&self, job: &Transcode<'_>) -> ToolOutput {
		// Seeking after the input is slower but sample-accurate.
		let mut cmd = self.ffmpeg_cmd(job.src);
		cmd.arg("-ss").arg(job.start.to_string())
			.arg("-t").arg(job.duration.to_string())
			.args(["-vn", "-acodec", "libmp3lame", "-b:a"])
			.arg(format!("{}k", job.bitrate))
			.arg("-y")
			.arg(job.dst);
		ToolOutput::run(&mut cmd)
	}

	fn segment(&self, src: &Path, secs: u32, dir: &Path, stem: &str) -> ToolOutput {
		let pattern = dir.join(format!("{stem}_part%03d.{}", crate::OUTPUT_EXT));
		let mut cmd = self.ffmpeg_cmd(src);
		cmd.args(["-f", "segment", "-segment_time"])
			.arg(secs.to_string())
			.args(["-c", "copy", "-y"])
			.arg(pattern.as_os_str());
		ToolOutput::run(&mut cmd)
	}
}
