/*!
# Book Rip
*/

#![forbid(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::integer_division,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(
	clippy::doc_markdown,
	clippy::module_name_repetitions,
	clippy::redundant_pub_crate,
)]



mod cli;

use bookrip_core::{
	AudioTool,
	BookRipError,
	KillSwitch,
	Library,
	Outcome,
	SourceStatus,
	Summary,
};
use dactyl::{
	NiceElapsed,
	NiceU32,
	traits::NiceInflection,
};
use fyi_msg::Msg;
use oxford_join::OxfordJoin;
use std::{
	process::ExitCode,
	time::Instant,
};



/// # Main.
///
/// This lets us bubble up startup errors so they can be pretty-printed.
fn main() -> ExitCode {
	match main__() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e @ (BookRipError::PrintHelp | BookRipError::PrintVersion)) => {
			println!("{e}");
			ExitCode::SUCCESS
		},
		Err(e) => {
			Msg::from(e).eprint();
			ExitCode::FAILURE
		},
	}
}

#[inline]
/// # Actual Main.
///
/// This does all the stuff.
fn main__() -> Result<(), BookRipError> {
	let (paths, opts, tool, status) = cli::parse()?;
	let mut library = Library::new(paths, opts, &tool)?;

	// Just checking the status?
	if status {
		print_status(&library);
		return Ok(());
	}

	if library.sources().is_empty() {
		Msg::warning(format!(
			"There are no .m4b files in {}.",
			library.paths().root().display(),
		)).eprint();
		return Ok(());
	}

	// Let CTRL+C stop things between chapters instead of mid-write.
	let killed = KillSwitch::default();
	let handler = killed.clone();
	if ctrlc::set_handler(move || handler.kill()).is_err() {
		Msg::warning("Unable to intercept CTRL+C; aborting early may leave a mess.").eprint();
	}

	// Convert!
	let now = Instant::now();
	let summary = library.run(&killed);
	print_summary(&summary, now);

	if killed.killed() { Err(BookRipError::Killed) }
	else { Ok(()) }
}

/// # Print Status.
///
/// List each source and where it stands, without touching anything.
fn print_status<T>(library: &Library<'_, T>)
where T: AudioTool + ?Sized {
	for path in library.skipped() {
		Msg::warning(format!("Invalid source file {}.", path.display())).eprint();
	}

	let status = library.status();
	let mut done = 0_u32;
	for s in &status {
		if s.logged() { done += 1; }
		print_status_line(s);
	}

	let total = u32::try_from(status.len()).unwrap_or(u32::MAX);
	Msg::custom("Status", 199, &format!(
		"{} of {} complete.",
		NiceU32::from(done),
		total.nice_inflect("book is", "books are"),
	))
		.with_newline(true)
		.eprint();
}

/// # Print Status Line.
fn print_status_line(status: &SourceStatus) {
	let name = status.name();
	if status.logged() {
		Msg::custom("Done", 10, name).with_newline(true).eprint();
		return;
	}

	match (status.folder(), status.verdict()) {
		(Some((_, marker)), Some(verdict)) => {
			let mut msg = format!("{name}: {verdict}");
			if status.effective_state().is_some_and(|s| s != marker) {
				msg.push_str(" (marked ");
				msg.push_str(marker.as_str());
				msg.push(')');
			}
			msg.push('.');

			let color = if verdict.is_complete() { 10 } else { 208 };
			Msg::custom("Found", color, &msg).with_newline(true).eprint();
		},
		_ => {
			Msg::custom("Pending", 15, &format!("{name}: not started."))
				.with_newline(true)
				.eprint();
		},
	}
}

/// # Print Summary.
fn print_summary(summary: &Summary, now: Instant) {
	if summary.is_empty() { return; }

	let converted = summary.count(Outcome::Converted);
	let skipped = summary.count(Outcome::Logged) + summary.count(Outcome::Recorded);
	let elapsed = NiceElapsed::from(now.elapsed());
	Msg::custom("Finished", 199, &format!(
		"{} converted, {} already done, in {elapsed}.",
		converted.nice_inflect("book", "books"),
		NiceU32::from(skipped),
	))
		.with_newline(true)
		.eprint();

	let pending: Vec<&str> = summary.pending().collect();
	if ! pending.is_empty() {
		Msg::warning(format!(
			"Still pending: {}. See the error log for details.",
			pending.oxford_and(),
		)).eprint();
	}
}
