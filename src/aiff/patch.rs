//! In-place rewrite of the `COMM` sample rate field.
//!
//! The engine is entered with the stream positioned just past a fully read
//! `COMM` body. It backs up to the 10-byte rate field, writes (or, in a dry
//! run, reads) it, and returns to where it started so chunk reading can
//! carry on from the same offset.

use crate::aiff::{SAMPLE_RATE_OFFSET, padded};
use crate::error::{AiffError, AiffResult};
use crate::extended::{EXTENDED_LEN, Extended80};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    Write,
    /// Same seeks, but the field is read instead of written.
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchOutcome {
    /// Absolute offset of the sample rate field.
    pub offset: u64,
    /// The bytes found at `offset` during a dry run.
    pub found: Option<Extended80>,
}

/// Distance from the end of a padded `COMM` body back to its sample rate.
///
/// For the plain layout this is the 10-byte rate itself. The AIFF-C layout
/// also counts the compression type and name that follow the rate, and any
/// pad byte, all of which are part of `declared_size` or its padding.
pub fn distance_to_sample_rate(declared_size: u32) -> AiffResult<u64> {
    if (declared_size as u64) < SAMPLE_RATE_OFFSET + EXTENDED_LEN as u64 {
        return Err(AiffError::CommonTooSmall {
            size: declared_size,
            needed: (SAMPLE_RATE_OFFSET + EXTENDED_LEN as u64) as u32,
        });
    }
    Ok(padded(declared_size) - SAMPLE_RATE_OFFSET)
}

pub fn patch_sample_rate<S: Read + Write + Seek>(
    stream: &mut S,
    rate: Extended80,
    declared_size: u32,
    mode: PatchMode,
) -> AiffResult<PatchOutcome> {
    let remembered = stream.stream_position()?;
    let distance = distance_to_sample_rate(declared_size)?;
    let target = remembered
        .checked_sub(distance)
        .ok_or(AiffError::SeekMismatch {
            expected: 0,
            actual: remembered,
        })?;

    dprintln!(
        "patch: back up {} bytes from {} to {}",
        distance,
        remembered,
        target
    );

    let landed = stream.seek(SeekFrom::Current(-(distance as i64)))?;
    if landed != target {
        return Err(AiffError::SeekMismatch {
            expected: target,
            actual: landed,
        });
    }

    let found = match mode {
        PatchMode::Write => {
            stream.write_all(&rate.to_bytes())?;
            stream.flush()?;
            None
        }
        PatchMode::DryRun => Some(Extended80::read_from(stream)?),
    };

    let back = stream.seek(SeekFrom::Start(remembered))?;
    if back != remembered {
        return Err(AiffError::SeekMismatch {
            expected: remembered,
            actual: back,
        });
    }

    Ok(PatchOutcome {
        offset: target,
        found,
    })
}
