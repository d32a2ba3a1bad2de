use thiserror::Error;

use crate::aiff::ChunkId;

/// Everything that can go wrong while parsing or patching one file.
///
/// Structural errors mean the file is not a valid AIFF / AIFF-C file; the
/// stream is still aligned and the run simply moves on. Fatal errors mean
/// the byte position inside the file can no longer be trusted.
#[derive(Debug, Error)]
pub enum AiffError {
    #[error("invalid AIFF/AIFF-C file: expected 'FORM' chunk is missing, skipping")]
    MissingForm,

    #[error("'FORM' contains unexpected type '{0}', expected 'AIFF' or 'AIFC', skipping")]
    UnexpectedFormType(ChunkId),

    #[error("invalid AIFF/AIFF-C file, more than one 'FORM' form chunks found, skipping")]
    NestedForm,

    #[error("invalid AIFF/AIFF-C file, contains more than one '{0}' chunk, skipping file")]
    DuplicateChunk(ChunkId),

    #[error("invalid AIFF/AIFF-C file: no 'COMM' common chunk found, skipping file")]
    MissingCommon,

    #[error("invalid AIFF/AIFF-C file: no 'FVER' format version chunk found in an AIFF-C file")]
    MissingFormatVersion,

    #[error("invalid AIFF file: 'FVER' format version chunk found in a non-compressed AIFF file")]
    UnexpectedFormatVersion,

    #[error("invalid AIFF/AIFF-C file: 'COMM' chunk is {size} bytes, need at least {needed}")]
    CommonTooSmall { size: u32, needed: u32 },

    #[error("invalid AIFF-C file: 'FVER' chunk is {size} bytes, need 4")]
    FormatVersionTooSmall { size: u32 },

    #[error("unknown chunk type '{0}' found before the 'COMM' chunk, skipping file")]
    HaltedBeforeCommon(ChunkId),

    #[error("truncated chunk header at offset {offset}: read {got} of {expected} bytes")]
    TruncatedHeader { offset: u64, got: usize, expected: usize },

    #[error("truncated chunk body at offset {offset}: read {got} of {expected} bytes")]
    TruncatedBody { offset: u64, got: usize, expected: usize },

    #[error("seek landed at offset {actual}, expected {expected}")]
    SeekMismatch { expected: u64, actual: u64 },

    #[error("sample rate at offset {offset} reads back as {found}, expected {expected}")]
    OffsetMismatch { offset: u64, expected: String, found: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AiffError {
    /// True when the stream position is no longer verifiable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AiffError::TruncatedHeader { .. }
                | AiffError::TruncatedBody { .. }
                | AiffError::SeekMismatch { .. }
                | AiffError::OffsetMismatch { .. }
                | AiffError::Io(_)
        )
    }
}

pub type AiffResult<T> = Result<T, AiffError>;
