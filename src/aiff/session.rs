//! Per-file chunk dispatch.
//!
//! A [`Session`] exists for exactly one file. It is created after the
//! `FORM` container has been validated, so the form type is fixed for its
//! lifetime and every chunk counter starts at zero.

use crate::aiff::{
    AIFC_VERSION_1, Cardinality, ChunkHeader, ChunkId, ChunkKind, ChunkReader, CommonChunk,
    DecodedChunk, EXT_COMM_MIN_SIZE, ExtendedCommonChunk, FORM_CHUNK_ID, FormType,
    FormatVersionChunk, SAMPLE_RATE_OFFSET, padded, read_container,
};
use crate::error::{AiffError, AiffResult};
use crate::prelude::*;
use crate::timestamp::format_mac_timestamp;

/// Largest `COMM` body kept in memory: the extended layout plus a full
/// Pascal string. Anything beyond is read and dropped.
pub const MAX_COMMON_BODY: usize = EXT_COMM_MIN_SIZE as usize + 1 + 255;
const FORMAT_VERSION_BODY: usize = 4;

/// What the dispatcher produced for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Next {
    /// A `COMM` or `FVER` chunk whose body was read and decoded.
    Decoded(DecodedChunk),
    /// A known chunk that was seeked over.
    Skipped(ChunkId),
    /// An id outside the known set. Nothing after it has been read and the
    /// chunk loop must stop.
    Unrecognized(ChunkId),
    /// The stream ended cleanly on a chunk boundary.
    Eof,
}

/// How the chunk loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEnd {
    Eof,
    Halted(ChunkId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkCounts([u32; ChunkKind::COUNT]);

impl ChunkCounts {
    pub fn get(&self, kind: ChunkKind) -> u32 {
        self.0[kind as usize]
    }

    fn bump(&mut self, kind: ChunkKind) -> u32 {
        let slot = &mut self.0[kind as usize];
        *slot += 1;
        *slot
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// The `COMM` chunk together with where it sits in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonRecord {
    pub chunk: DecodedChunk,
    /// The fields both layouts share, copied out of `chunk`.
    pub common: CommonChunk,
    /// Body size as declared in the chunk header.
    pub declared_size: u32,
    /// Stream offset just past the padded body.
    pub end_offset: u64,
}

impl CommonRecord {
    pub fn body_offset(&self) -> u64 {
        self.end_offset - padded(self.declared_size)
    }

    pub fn sample_rate_offset(&self) -> u64 {
        self.body_offset() + SAMPLE_RATE_OFFSET
    }
}

/// Result of a full pass over one file's chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub form: FormType,
    pub common: CommonRecord,
    pub format_version: Option<FormatVersionChunk>,
    pub counts: ChunkCounts,
    pub end: ParseEnd,
}

impl ParsedFile {
    /// False when parsing stopped at an unrecognized chunk.
    pub fn is_complete(&self) -> bool {
        self.end == ParseEnd::Eof
    }
}

pub struct Session {
    name: String,
    form: FormType,
    counts: ChunkCounts,
    common: Option<CommonRecord>,
    format_version: Option<FormatVersionChunk>,
}

impl Session {
    pub fn new(name: &str, form: FormType) -> Self {
        Self {
            name: name.to_string(),
            form,
            counts: ChunkCounts::default(),
            common: None,
            format_version: None,
        }
    }

    /// Validates the container and opens a session for the chunks after it.
    pub fn begin<S: Read + Seek>(name: &str, reader: &mut ChunkReader<S>) -> AiffResult<Self> {
        let form = read_container(reader)?;
        Ok(Self::new(name, form))
    }

    pub fn counts(&self) -> &ChunkCounts {
        &self.counts
    }

    /// Pulls and handles one chunk.
    ///
    /// Cardinality violations are returned as errors, but only after the
    /// offending chunk has been consumed so the stream stays aligned.
    pub fn next<S: Read + Seek>(&mut self, reader: &mut ChunkReader<S>) -> AiffResult<Next> {
        let Some(header) = reader.read_header()? else {
            return Ok(Next::Eof);
        };

        if header.id.is(FORM_CHUNK_ID) {
            reader.skip_body(header.size)?;
            return Err(AiffError::NestedForm);
        }

        let Some(kind) = ChunkKind::classify(header.id) else {
            return Ok(Next::Unrecognized(header.id));
        };

        let count = self.counts.bump(kind);
        let violation = match kind.cardinality(self.form) {
            Cardinality::Forbidden => Some(AiffError::UnexpectedFormatVersion),
            Cardinality::ExactlyOne | Cardinality::AtMostOne if count > 1 => {
                Some(AiffError::DuplicateChunk(header.id))
            }
            _ => None,
        };
        if let Some(err) = violation {
            reader.skip_body(header.size)?;
            return Err(err);
        }

        match kind {
            ChunkKind::Common => self.read_common(reader, header),
            ChunkKind::FormatVersion => self.read_format_version(reader, header),
            _ => {
                reader.skip_body(header.size)?;
                Ok(Next::Skipped(header.id))
            }
        }
    }

    fn read_common<S: Read + Seek>(
        &mut self,
        reader: &mut ChunkReader<S>,
        header: ChunkHeader,
    ) -> AiffResult<Next> {
        let body = reader.read_body(header.size, MAX_COMMON_BODY)?;
        let (chunk, common) = match self.form {
            FormType::Aiff => {
                let common = CommonChunk::parse(&body)?;
                (DecodedChunk::Common(common), common)
            }
            FormType::Aifc => {
                let ext = ExtendedCommonChunk::parse(&body)?;
                let common = ext.common;
                (DecodedChunk::ExtendedCommon(ext), common)
            }
        };

        self.common = Some(CommonRecord {
            chunk: chunk.clone(),
            common,
            declared_size: header.size,
            end_offset: reader.offset(),
        });
        Ok(Next::Decoded(chunk))
    }

    fn read_format_version<S: Read + Seek>(
        &mut self,
        reader: &mut ChunkReader<S>,
        header: ChunkHeader,
    ) -> AiffResult<Next> {
        let body = reader.read_body(header.size, FORMAT_VERSION_BODY)?;
        let fver = FormatVersionChunk::parse(&body)?;
        dprintln!("{}: FVER timestamp = {}", self.name, fver.timestamp);

        // A mismatched date leaves the file valid.
        if !fver.is_version_1() {
            warn!(
                "{}: 'FVER' version chunk timestamp not AIFF-C Version 1. Expected {} found {}",
                self.name,
                format_mac_timestamp(AIFC_VERSION_1),
                format_mac_timestamp(fver.timestamp)
            );
        }

        self.format_version = Some(fver);
        Ok(Next::Decoded(DecodedChunk::FormatVersion(fver)))
    }

    /// Drives [`Session::next`] until the stream ends or an unrecognized
    /// chunk halts it, then checks the required chunks.
    pub fn run<S: Read + Seek>(mut self, reader: &mut ChunkReader<S>) -> AiffResult<ParsedFile> {
        let end = loop {
            match self.next(reader)? {
                Next::Eof => break ParseEnd::Eof,
                Next::Unrecognized(id) => {
                    error!("{}: unknown chunk type: {}", self.name, id);
                    break ParseEnd::Halted(id);
                }
                Next::Decoded(chunk) => dprintln!("{}: decoded {:?}", self.name, chunk),
                Next::Skipped(id) => dprintln!("{}: skipped '{}'", self.name, id),
            }
        };
        self.finish(end)
    }

    /// Required-chunk checks. After a halt the rest of the file was never
    /// seen, so only the chunk we actually need is demanded.
    pub fn finish(self, end: ParseEnd) -> AiffResult<ParsedFile> {
        let common = match (self.common, end) {
            (Some(common), _) => common,
            (None, ParseEnd::Eof) => return Err(AiffError::MissingCommon),
            (None, ParseEnd::Halted(id)) => return Err(AiffError::HaltedBeforeCommon(id)),
        };

        if end == ParseEnd::Eof && self.form.is_compressed() && self.format_version.is_none() {
            return Err(AiffError::MissingFormatVersion);
        }

        Ok(ParsedFile {
            form: self.form,
            common,
            format_version: self.format_version,
            counts: self.counts,
            end,
        })
    }
}
