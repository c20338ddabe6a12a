/*!
# Book Rip: Fake Audio Tool

A scripted stand-in for FFmpeg so the pipeline can be exercised without any
real audio.
*/

use crate::{
	AudioTool,
	KillSwitch,
	ToolOutput,
	Transcode,
};
use std::{
	cell::Cell,
	collections::BTreeSet,
	path::Path,
};



/// # Good Output.
///
/// What a successful transcode writes (repeated as needed).
const GOOD: &[u8] = b"ID3 fake mp3 data ";

/// # Bad Output Prefix.
///
/// Files starting with this fail validation.
pub(crate) const BAD: &[u8] = b"BAD";



#[derive(Debug, Default)]
/// # Fake Tool.
pub(crate) struct FakeTool {
	probe: String,
	probe_fail: bool,
	fail: BTreeSet<u32>,
	corrupt: BTreeSet<u32>,
	size: usize,
	segment_fail: BTreeSet<u32>,
	kill_after: Option<(u32, KillSwitch)>,
	transcodes: Cell<usize>,
	segments: Cell<usize>,
}

impl FakeTool {
	/// # With Probe Output.
	pub(crate) fn with_probe(probe: &str) -> Self {
		Self {
			probe: probe.to_owned(),
			size: GOOD.len(),
			..Self::default()
		}
	}

	/// # With Chapters.
	///
	/// Probe output for `n` one-minute chapters titled "Part 1", "Part 2", etc.
	pub(crate) fn with_chapters(n: u32) -> Self {
		let list = (0..n)
			.map(|i| format!(
				r#"{{"start_time":"{}.000000","end_time":"{}.000000","tags":{{"title":"Part {}"}}}}"#,
				i * 60,
				(i + 1) * 60,
				i + 1,
			))
			.collect::<Vec<String>>()
			.join(",");
		Self::with_probe(&format!(r#"{{"chapters":[{list}]}}"#))
	}

	/// # Fail the Probe.
	pub(crate) fn with_probe_failure(self) -> Self {
		Self { probe_fail: true, ..self }
	}

	/// # Fail a Chapter Transcode.
	pub(crate) fn with_failing_chapter(mut self, idx: u32) -> Self {
		self.fail.insert(idx);
		self
	}

	/// # Corrupt a Chapter Transcode.
	///
	/// The tool will report success, but write garbage.
	pub(crate) fn with_corrupt_chapter(mut self, idx: u32) -> Self {
		self.corrupt.insert(idx);
		self
	}

	/// # Output Size.
	pub(crate) fn with_output_size(self, size: usize) -> Self {
		Self { size, ..self }
	}

	/// # Fail Segmenting a Chapter.
	pub(crate) fn with_segment_failure(mut self, idx: u32) -> Self {
		self.segment_fail.insert(idx);
		self
	}

	/// # Kill After a Chapter.
	///
	/// Flip the switch once chapter `idx` has been transcoded, as if CTRL+C
	/// had been pressed partway through it.
	pub(crate) fn with_kill_after(self, idx: u32, killed: &KillSwitch) -> Self {
		Self { kill_after: Some((idx, killed.clone())), ..self }
	}

	/// # Total Transcodes.
	pub(crate) fn transcodes(&self) -> usize { self.transcodes.get() }

	/// # Total Segments.
	pub(crate) fn segments(&self) -> usize { self.segments.get() }
}

impl AudioTool for FakeTool {
	fn probe(&self, _src: &Path) -> ToolOutput {
		if self.probe_fail { ToolOutput::failure(Some(1), "Invalid data found when processing input") }
		else {
			ToolOutput {
				code: Some(0),
				stdout: self.probe.as_bytes().to_vec(),
				stderr: String::new(),
			}
		}
	}

	fn validate(&self, src: &Path) -> ToolOutput {
		match std::fs::read(src) {
			Ok(v) if ! v.is_empty() && ! v.starts_with(BAD) => ToolOutput::success(),
			Ok(_) => ToolOutput::failure(Some(69), "Invalid data found when processing input"),
			Err(_) => ToolOutput::failure(Some(254), "No such file or directory"),
		}
	}

	fn transcode(&self, job: &Transcode<'_>) -> ToolOutput {
		self.transcodes.set(self.transcodes.get() + 1);

		let idx = chapter_index(job.dst);
		if idx.is_some_and(|i| self.fail.contains(&i)) {
			// Leave a partial file behind, as a crashed encoder would.
			let _res = std::fs::write(job.dst, b"");
			return ToolOutput::failure(Some(1), "Conversion failed!");
		}

		let data =
			if idx.is_some_and(|i| self.corrupt.contains(&i)) { BAD.repeat(self.size.max(1)) }
			else { GOOD.iter().copied().cycle().take(self.size.max(1)).collect() };

		let res =
			if std::fs::write(job.dst, data).is_ok() { ToolOutput::success() }
			else { ToolOutput::failure(Some(1), "Unable to write output.") };

		if let Some((i, killed)) = &self.kill_after {
			if idx == Some(*i) { killed.kill(); }
		}

		res
	}

	fn segment(&self, src: &Path, _secs: u32, dir: &Path, stem: &str) -> ToolOutput {
		self.segments.set(self.segments.get() + 1);
		if chapter_index(Path::new(stem)).is_some_and(|i| self.segment_fail.contains(&i)) {
			return ToolOutput::failure(Some(1), "Segmenting failed!");
		}

		let Ok(raw) = std::fs::read(src) else {
			return ToolOutput::failure(Some(1), "No such file or directory");
		};

		let half = raw.len().div_ceil(2);
		for (k, chunk) in raw.chunks(half.max(1)).enumerate() {
			let dst = dir.join(format!("{stem}_part{k:03}.mp3"));
			if std::fs::write(dst, chunk).is_err() {
				return ToolOutput::failure(Some(1), "Unable to write output.");
			}
		}

		ToolOutput::success()
	}
}



/// # Chapter Index From File Name.
fn chapter_index(dst: &Path) -> Option<u32> {
	let name = dst.file_name()?.to_str()?;
	let rest = name.strip_prefix("Chapter_")?;
	let end = rest.find('_')?;
	rest[..end].parse().ok()
}
