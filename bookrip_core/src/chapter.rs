/*!
# Book Rip: Chapters
*/

use crate::{
	AudioTool,
	ErrorLog,
	OUTPUT_EXT,
};
use serde::Deserialize;
use serde_json::Value;
use std::{
	borrow::Cow,
	path::Path,
};



#[derive(Debug, Clone, PartialEq)]
/// # Chapter.
///
/// A titled `[start, end)` slice of a source's timeline, in seconds.
pub struct Chapter {
	index: u32,
	title: String,
	start: f64,
	end: f64,
}

impl Chapter {
	#[must_use]
	/// # New.
	///
	/// Blank or missing titles are replaced with `Chapter_<index>`. Other
	/// titles are kept as-is, surrounding whitespace and all.
	///
	/// This will return `None` if the index is zero, either time is negative
	/// or non-finite, or the chapter doesn't end after it starts.
	pub fn new(index: u32, title: Option<&str>, start: f64, end: f64) -> Option<Self> {
		if
			index == 0 ||
			! start.is_finite() ||
			! end.is_finite() ||
			start < 0.0 ||
			end <= start
		{
			return None;
		}

		// Padding is kept; it is part of the file name.
		let title = title.filter(|t| ! t.trim().is_empty())
			.map_or_else(|| format!("Chapter_{index}"), String::from);

		Some(Self { index, title, start, end })
	}

	#[must_use]
	/// # Index (1-based).
	pub const fn index(&self) -> u32 { self.index }

	#[must_use]
	/// # Title.
	pub fn title(&self) -> &str { &self.title }

	#[must_use]
	/// # Start (Seconds).
	pub const fn start(&self) -> f64 { self.start }

	#[must_use]
	/// # End (Seconds).
	pub const fn end(&self) -> f64 { self.end }

	#[must_use]
	/// # Duration (Seconds).
	pub fn duration(&self) -> f64 { self.end - self.start }

	#[must_use]
	/// # File Stem.
	///
	/// This is the output file name minus the extension, e.g.
	/// `Chapter_3_The_Beginning`. Split parts append `_partNNN` to it.
	pub fn stem(&self) -> String {
		let raw = format!("Chapter_{}_{}", self.index, self.title.replace(' ', "_"));
		sanitize_filename(&raw).into_owned()
	}

	#[must_use]
	/// # File Name.
	///
	/// This is what the chapter gets saved as, and what verification later
	/// looks for, so it must never depend on anything but the index and
	/// title.
	pub fn file_name(&self) -> String {
		let mut out = self.stem();
		out.push('.');
		out.push_str(OUTPUT_EXT);
		out
	}
}



#[must_use]
/// # Sanitize File Name.
///
/// Replace characters that are invalid in file names on common platforms
/// (and control characters) with underscores.
pub fn sanitize_filename(src: &str) -> Cow<'_, str> {
	/// # Invalid?
	fn invalid(c: char) -> bool {
		matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
	}

	if src.chars().any(invalid) {
		Cow::Owned(src.chars().map(|c| if invalid(c) { '_' } else { c }).collect())
	}
	else { Cow::Borrowed(src) }
}



/// # Extract Chapters.
///
/// Ask the probing tool for the source's chapter table.
///
/// Problems are soft: they get recorded in the error log and an empty list is
/// returned, which callers treat as "this source can't be converted".
pub fn extract_chapters<T>(tool: &T, src: &Path, errors: &ErrorLog) -> Vec<Chapter>
where T: AudioTool + ?Sized {
	read_chapters(tool, src).unwrap_or_else(|e| {
		errors.push(e);
		Vec::new()
	})
}

/// # Read Chapters.
///
/// Same as [`extract_chapters`], but the problem is returned instead of
/// logged.
pub(crate) fn read_chapters<T>(tool: &T, src: &Path) -> Result<Vec<Chapter>, String>
where T: AudioTool + ?Sized {
	let out = tool.probe(src);
	if ! out.ok() || out.stdout.iter().all(u8::is_ascii_whitespace) {
		return Err(format!(
			"Failed to extract chapters from {}. Probe error: {}",
			src.display(),
			out.diagnostic(),
		));
	}

	parse_chapters(&out.stdout)
		.map_err(|e| format!("Unable to parse the chapters of {}: {e}", src.display()))
}

/// # Parse Chapters.
///
/// Parse the probe tool's JSON output. Any one bad entry poisons the whole
/// table, since dropping it would shift every later chapter's number.
pub(crate) fn parse_chapters(raw: &[u8]) -> Result<Vec<Chapter>, String> {
	let raw: RawProbe = serde_json::from_slice(raw).map_err(|e| e.to_string())?;

	let mut out = Vec::with_capacity(raw.chapters.len());
	for (k, v) in raw.chapters.into_iter().enumerate() {
		let index = u32::try_from(k + 1).map_err(|_| "too many chapters".to_owned())?;
		let start = seconds(&v.start_time)
			.ok_or_else(|| format!("chapter {index} has an invalid start time"))?;
		let end = seconds(&v.end_time)
			.ok_or_else(|| format!("chapter {index} has an invalid end time"))?;
		let title = v.tags.and_then(|t| t.title);

		let chapter = Chapter::new(index, title.as_deref(), start, end)
			.ok_or_else(|| format!("chapter {index} has an invalid range ({start}..{end})"))?;
		out.push(chapter);
	}

	Ok(out)
}

/// # Seconds.
///
/// FFprobe reports times as decimal strings, but plain numbers are fine too.
fn seconds(src: &Value) -> Option<f64> {
	let out = match src {
		Value::String(s) => s.trim().parse::<f64>().ok(),
		Value::Number(n) => n.as_f64(),
		_ => None,
	};
	out.filter(|n| n.is_finite())
}



#[derive(Deserialize)]
/// # Raw Probe Output.
struct RawProbe {
	#[serde(default)]
	chapters: Vec<RawChapter>,
}

#[derive(Deserialize)]
/// # Raw Chapter.
struct RawChapter {
	#[serde(default)]
	start_time: Value,

	#[serde(default)]
	end_time: Value,

	#[serde(default)]
	tags: Option<RawTags>,
}

#[derive(Deserialize)]
/// # Raw Chapter Tags.
struct RawTags {
	#[serde(default)]
	title: Option<String>,
}
