//! AIFF / AIFF-C chunk model.
//!
//! A file is one `FORM` container whose body is a form type (`AIFF` or
//! `AIFC`) followed by local chunks. Every chunk is a 4-byte id, a
//! big-endian `u32` body size, and the body padded to an even length.

use crate::error::{AiffError, AiffResult};
use crate::extended::{EXTENDED_LEN, Extended80};
use crate::prelude::*;

pub mod container;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod patch;
pub mod reader;
pub mod session;

pub use container::read_container;
pub use patch::{PatchMode, PatchOutcome, patch_sample_rate};
pub use reader::{ChunkHeader, ChunkReader};
pub use session::{ChunkCounts, CommonRecord, Next, ParseEnd, ParsedFile, Session};

// Chunk Identifiers
pub const FORM_CHUNK_ID: &[u8; 4] = b"FORM";
pub const AIFF_FORMAT_ID: &[u8; 4] = b"AIFF";
pub const AIFC_FORMAT_ID: &[u8; 4] = b"AIFC";
pub const COMM_CHUNK_ID: &[u8; 4] = b"COMM";
pub const FVER_CHUNK_ID: &[u8; 4] = b"FVER";
pub const SSND_CHUNK_ID: &[u8; 4] = b"SSND";
pub const MARK_CHUNK_ID: &[u8; 4] = b"MARK";
pub const INST_CHUNK_ID: &[u8; 4] = b"INST";
pub const MIDI_CHUNK_ID: &[u8; 4] = b"MIDI";
pub const AESD_CHUNK_ID: &[u8; 4] = b"AESD";
pub const APPL_CHUNK_ID: &[u8; 4] = b"APPL";
pub const COMT_CHUNK_ID: &[u8; 4] = b"COMT";
pub const NAME_CHUNK_ID: &[u8; 4] = b"NAME";
pub const AUTH_CHUNK_ID: &[u8; 4] = b"AUTH";
pub const COPYRIGHT_CHUNK_ID: &[u8; 4] = b"(c) ";
pub const ANNO_CHUNK_ID: &[u8; 4] = b"ANNO";
pub const ID3_CHUNK_ID: &[u8; 4] = b"ID3 ";
pub const IXML_CHUNK_ID: &[u8; 4] = b"iXML";

// Chunk Structures
pub const CHUNK_HEADER_SIZE: usize = 8;
pub const FORM_TYPE_SIZE: usize = 4;
pub const COMM_SIZE: u32 = 18; // channels + frames + bits + rate
pub const EXT_COMM_MIN_SIZE: u32 = 22; // COMM_SIZE + compression type
pub const SAMPLE_RATE_OFFSET: u64 = 8; // from the start of the COMM body

/// Timestamp carried by every AIFF-C Version 1 `FVER` chunk
/// (May 23, 1990, 2:40pm, seconds since 1904-01-01).
pub const AIFC_VERSION_1: u32 = 0xA280_5140;

/// A 4-byte chunk identifier. Byte order matters and it is not
/// null-terminated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub fn is(&self, id: &[u8; 4]) -> bool {
        &self.0 == id
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChunkId('{self}')")
    }
}

/// The two recognized `FORM` types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormType {
    Aiff,
    Aifc,
}

impl FormType {
    pub fn from_id(id: ChunkId) -> Option<Self> {
        match &id.0 {
            AIFF_FORMAT_ID => Some(FormType::Aiff),
            AIFC_FORMAT_ID => Some(FormType::Aifc),
            _ => None,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, FormType::Aifc)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormType::Aiff => "AIFF",
            FormType::Aifc => "AIFC",
        }
    }
}

/// How many chunks of one kind a single `FORM` may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ExactlyOne,
    AtMostOne,
    Forbidden,
    Any,
}

/// Every local chunk the dispatcher knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    Common,
    FormatVersion,
    SoundData,
    Marker,
    Instrument,
    MidiData,
    AudioRecording,
    ApplicationSpecific,
    Comment,
    Name,
    Author,
    Copyright,
    Annotation,
    Id3,
    IXml,
}

impl ChunkKind {
    pub const COUNT: usize = 15;

    pub fn classify(id: ChunkId) -> Option<Self> {
        let kind = match &id.0 {
            COMM_CHUNK_ID => ChunkKind::Common,
            FVER_CHUNK_ID => ChunkKind::FormatVersion,
            SSND_CHUNK_ID => ChunkKind::SoundData,
            MARK_CHUNK_ID => ChunkKind::Marker,
            INST_CHUNK_ID => ChunkKind::Instrument,
            MIDI_CHUNK_ID => ChunkKind::MidiData,
            AESD_CHUNK_ID => ChunkKind::AudioRecording,
            APPL_CHUNK_ID => ChunkKind::ApplicationSpecific,
            COMT_CHUNK_ID => ChunkKind::Comment,
            NAME_CHUNK_ID => ChunkKind::Name,
            AUTH_CHUNK_ID => ChunkKind::Author,
            COPYRIGHT_CHUNK_ID => ChunkKind::Copyright,
            ANNO_CHUNK_ID => ChunkKind::Annotation,
            ID3_CHUNK_ID => ChunkKind::Id3,
            IXML_CHUNK_ID => ChunkKind::IXml,
            _ => return None,
        };
        Some(kind)
    }

    pub fn cardinality(&self, form: FormType) -> Cardinality {
        match self {
            ChunkKind::Common => Cardinality::ExactlyOne,
            ChunkKind::FormatVersion => match form {
                FormType::Aifc => Cardinality::ExactlyOne,
                FormType::Aiff => Cardinality::Forbidden,
            },
            ChunkKind::SoundData
            | ChunkKind::Marker
            | ChunkKind::Instrument
            | ChunkKind::AudioRecording
            | ChunkKind::Comment
            | ChunkKind::Name
            | ChunkKind::Author
            | ChunkKind::Copyright => Cardinality::AtMostOne,
            // MIDI data may repeat; so may application and annotation chunks.
            ChunkKind::MidiData
            | ChunkKind::ApplicationSpecific
            | ChunkKind::Annotation
            | ChunkKind::Id3
            | ChunkKind::IXml => Cardinality::Any,
        }
    }
}

/// Fields shared by the plain and extended `COMM` layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommonChunk {
    pub num_channels: i16,
    pub num_sample_frames: u32,
    pub sample_size: i16,
    pub sample_rate: Extended80,
}

impl CommonChunk {
    pub fn parse(body: &[u8]) -> AiffResult<Self> {
        if body.len() < COMM_SIZE as usize {
            return Err(AiffError::CommonTooSmall {
                size: body.len() as u32,
                needed: COMM_SIZE,
            });
        }

        let mut cursor = Cursor::new(body);
        let num_channels = cursor.read_i16::<BigEndian>()?;
        let num_sample_frames = cursor.read_u32::<BigEndian>()?;
        let sample_size = cursor.read_i16::<BigEndian>()?;
        let sample_rate = Extended80::read_from(&mut cursor)?;
        debug_assert_eq!(cursor.position(), SAMPLE_RATE_OFFSET + EXTENDED_LEN as u64);

        Ok(CommonChunk {
            num_channels,
            num_sample_frames,
            sample_size,
            sample_rate,
        })
    }
}

/// AIFF-C `COMM`: the common fields plus the compression type and its
/// Pascal-string name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedCommonChunk {
    pub common: CommonChunk,
    pub compression_type: ChunkId,
    pub compression_name: String,
}

impl ExtendedCommonChunk {
    pub fn parse(body: &[u8]) -> AiffResult<Self> {
        if body.len() < EXT_COMM_MIN_SIZE as usize {
            return Err(AiffError::CommonTooSmall {
                size: body.len() as u32,
                needed: EXT_COMM_MIN_SIZE,
            });
        }

        let common = CommonChunk::parse(body)?;
        let mut compression_type = [0u8; 4];
        compression_type.copy_from_slice(&body[COMM_SIZE as usize..EXT_COMM_MIN_SIZE as usize]);

        let name_start = EXT_COMM_MIN_SIZE as usize;
        let compression_name = match body.get(name_start) {
            Some(&count) => {
                let bytes = &body[name_start + 1..];
                let end = (count as usize).min(bytes.len());
                String::from_utf8_lossy(&bytes[..end]).into_owned()
            }
            None => String::new(),
        };

        Ok(ExtendedCommonChunk {
            common,
            compression_type: ChunkId(compression_type),
            compression_name,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatVersionChunk {
    /// Seconds since 1904-01-01 00:00:00 UTC.
    pub timestamp: u32,
}

impl FormatVersionChunk {
    pub fn parse(body: &[u8]) -> AiffResult<Self> {
        if body.len() < 4 {
            return Err(AiffError::FormatVersionTooSmall {
                size: body.len() as u32,
            });
        }
        Ok(FormatVersionChunk {
            timestamp: BigEndian::read_u32(&body[0..4]),
        })
    }

    pub fn is_version_1(&self) -> bool {
        self.timestamp == AIFC_VERSION_1
    }
}

/// The one chunk the dispatcher has most recently decoded. Which `COMM`
/// variant is produced depends on the form type.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedChunk {
    Common(CommonChunk),
    ExtendedCommon(ExtendedCommonChunk),
    FormatVersion(FormatVersionChunk),
}

impl DecodedChunk {
    pub fn compression_name(&self) -> Option<&str> {
        match self {
            DecodedChunk::ExtendedCommon(ext) => Some(&ext.compression_name),
            _ => None,
        }
    }
}

/// Size of a chunk body once its pad byte is included.
pub fn padded(size: u32) -> u64 {
    size as u64 + (size as u64 & 1)
}
