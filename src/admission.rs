//! Checks a path before the parser sees it and opens it in the right mode.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    /// Needed whenever a new sample rate was requested.
    ReadWrite,
}

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("ERROR: {0} does not exist")]
    NotFound(String),

    #[error("{0} is directory, skipping")]
    IsDirectory(String),

    #[error("ERROR: {0} is not a standard file, skipping")]
    NotRegular(String),

    #[error("ERROR: {0} is not readable, skipping file")]
    NotReadable(String),

    #[error("ERROR: {0} is not writable, skipping file")]
    NotWritable(String),

    #[error("ERROR: {0} is not readable and not writable, skipping file")]
    NotReadableOrWritable(String),

    #[error("ERROR: {name}: {source}, skipping file")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

pub fn admit(path: &Path, mode: AccessMode) -> Result<File, AdmissionError> {
    let name = path.display().to_string();

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(AdmissionError::NotFound(name)),
        Err(source) => return Err(AdmissionError::Open { name, source }),
    };
    if metadata.is_dir() {
        return Err(AdmissionError::IsDirectory(name));
    }
    if !metadata.is_file() {
        return Err(AdmissionError::NotRegular(name));
    }

    let opened = match mode {
        AccessMode::ReadOnly => File::open(path),
        AccessMode::ReadWrite => OpenOptions::new().read(true).write(true).open(path),
    };

    match opened {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(explain_denied(path, mode, name)),
        Err(source) => Err(AdmissionError::Open { name, source }),
    }
}

/// Works out which permission is missing so the message says so plainly.
fn explain_denied(path: &Path, mode: AccessMode, name: String) -> AdmissionError {
    if mode == AccessMode::ReadOnly {
        return AdmissionError::NotReadable(name);
    }
    let readable = File::open(path).is_ok();
    let writable = OpenOptions::new().write(true).open(path).is_ok();
    match (readable, writable) {
        (false, true) => AdmissionError::NotReadable(name),
        (true, false) => AdmissionError::NotWritable(name),
        _ => AdmissionError::NotReadableOrWritable(name),
    }
}
