pub mod admission;
pub mod aiff;
pub mod error;
pub mod extended;
mod prelude;
pub mod report;
pub mod timestamp;

use std::path::PathBuf;

use crate::admission::{AccessMode, admit};
use crate::aiff::{ChunkReader, ParsedFile, PatchMode, Session, patch_sample_rate};
use crate::prelude::*;

pub use error::{AiffError, AiffResult};
pub use extended::Extended80;
pub use report::FileReport;

pub fn debug_println(args: std::fmt::Arguments) {
    log::debug!("DEBUG: {}", args);
}

// Helper macro to use it like println!
#[macro_export]
macro_rules! dprintln {
    ($($arg:tt)*) => {
        $crate::debug_println(format_args!($($arg)*))
    };
}

/// What the caller asked for, already validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// New sample rate to write into every file.
    pub rewrite: Option<u32>,
    /// Go through the rewrite seeks but read the field instead of writing it.
    pub dry_run: bool,
    pub verbose: bool,
}

impl Options {
    pub fn access_mode(&self) -> AccessMode {
        if self.rewrite.is_some() {
            AccessMode::ReadWrite
        } else {
            AccessMode::ReadOnly
        }
    }

    pub fn patch_mode(&self) -> PatchMode {
        if self.dry_run {
            PatchMode::DryRun
        } else {
            PatchMode::Write
        }
    }
}

/// Parses one already-opened file and applies the requested rewrite.
///
/// The rewrite happens only after every chunk has been validated, so a
/// file that turns out to be invalid is never modified.
pub fn process_stream<S: Read + Write + Seek>(
    stream: &mut S,
    name: &str,
    options: &Options,
) -> AiffResult<FileReport> {
    let mut reader = ChunkReader::new(&mut *stream)?;
    let session = Session::begin(name, &mut reader)?;
    let parsed = session.run(&mut reader)?;

    if !parsed.common.common.sample_rate.is_integral() {
        warn!("{name}: file has fractional sample rate, integer value shown is only approximate");
    }

    let mut new_rate = None;
    if let Some(rate) = options.rewrite {
        if parsed.is_complete() {
            apply_rate(&mut reader, &parsed, rate, options.patch_mode())?;
            new_rate = Some(rate);
        } else {
            warn!("{name}: sample rate not reset, parsing stopped at an unknown chunk");
        }
    }

    Ok(FileReport::new(name, &parsed, new_rate))
}

fn apply_rate<S: Read + Write + Seek>(
    reader: &mut ChunkReader<S>,
    parsed: &ParsedFile,
    rate: u32,
    mode: PatchMode,
) -> AiffResult<()> {
    let record = &parsed.common;
    reader.seek_to(record.end_offset)?;

    let outcome = patch_sample_rate(
        reader.get_mut(),
        Extended80::from(rate),
        record.declared_size,
        mode,
    )?;

    if let Some(found) = outcome.found {
        dprintln!("dry run read {} at offset {}", found, outcome.offset);
        if found != record.common.sample_rate {
            return Err(AiffError::OffsetMismatch {
                offset: outcome.offset,
                expected: record.common.sample_rate.to_string(),
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Processes each path in order, writing one line per good file to `out`.
/// Problems with one file are logged and never stop the run.
pub fn run<W: Write>(paths: &[PathBuf], options: &Options, out: &mut W) -> R<RunSummary> {
    let mut summary = RunSummary::default();

    for path in paths {
        let name = path.display().to_string();
        dprintln!("processing file: {}", name);

        let mut file = match admit(path, options.access_mode()) {
            Ok(file) => file,
            Err(e) => {
                error!("{e}");
                summary.failed += 1;
                continue;
            }
        };

        let result = process_stream(&mut file, &name, options);
        drop(file);

        match result {
            Ok(report) => {
                writeln!(out, "{}", report.line(options.verbose))?;
                summary.processed += 1;
                if options.rewrite.is_some() && report.new_rate.is_none() {
                    summary.failed += 1;
                }
            }
            Err(e) if e.is_fatal() => {
                error!("ERROR: {name}: {e}, file position lost, abandoning file");
                summary.failed += 1;
            }
            Err(e) => {
                error!("{name}: {e}");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
