use crate::aiff::{CHUNK_HEADER_SIZE, ChunkId, FORM_TYPE_SIZE, padded};
use crate::error::{AiffError, AiffResult};
use crate::prelude::*;

/// Tag and declared body size. The size excludes the header and the pad
/// byte that follows an odd-sized body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: ChunkId,
    pub size: u32,
}

impl ChunkHeader {
    pub fn parse(bytes: &[u8; CHUNK_HEADER_SIZE]) -> Self {
        let mut id = [0u8; 4];
        id.copy_from_slice(&bytes[0..4]);
        ChunkHeader {
            id: ChunkId(id),
            size: BigEndian::read_u32(&bytes[4..8]),
        }
    }

    pub fn padded_size(&self) -> u64 {
        padded(self.size)
    }
}

/// Sequential chunk reader that tracks its own byte offset so every read
/// and seek can be checked against where the stream should be.
pub struct ChunkReader<S> {
    inner: S,
    offset: u64,
}

impl<S: Read + Seek> ChunkReader<S> {
    pub fn new(mut inner: S) -> AiffResult<Self> {
        let offset = inner.stream_position()?;
        Ok(Self { inner, offset })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Reads one chunk header. `Ok(None)` means the stream ended cleanly
    /// on a chunk boundary; a partial header is fatal.
    pub fn read_header(&mut self) -> AiffResult<Option<ChunkHeader>> {
        let mut bytes = [0u8; CHUNK_HEADER_SIZE];
        let got = self.fill(&mut bytes)?;
        match got {
            0 => Ok(None),
            CHUNK_HEADER_SIZE => {
                let header = ChunkHeader::parse(&bytes);
                dprintln!(
                    "chunk '{}' size {} at offset {}",
                    header.id,
                    header.size,
                    self.offset - CHUNK_HEADER_SIZE as u64
                );
                Ok(Some(header))
            }
            _ => Err(AiffError::TruncatedHeader {
                offset: self.offset - got as u64,
                got,
                expected: CHUNK_HEADER_SIZE,
            }),
        }
    }

    /// Reads the 4-byte form type that opens the `FORM` body.
    pub fn read_form_type(&mut self) -> AiffResult<ChunkId> {
        let mut id = [0u8; FORM_TYPE_SIZE];
        let got = self.fill(&mut id)?;
        if got != FORM_TYPE_SIZE {
            return Err(AiffError::TruncatedHeader {
                offset: self.offset - got as u64,
                got,
                expected: FORM_TYPE_SIZE,
            });
        }
        Ok(ChunkId(id))
    }

    /// Reads a whole chunk body plus its pad byte. At most `keep` bytes are
    /// returned; the remainder is read and discarded so the stream still
    /// advances by exactly the padded size.
    pub fn read_body(&mut self, size: u32, keep: usize) -> AiffResult<Vec<u8>> {
        let start = self.offset;
        let wanted = (size as usize).min(keep);

        let mut body = vec![0u8; wanted];
        let got = self.fill(&mut body)?;
        if got != wanted {
            return Err(AiffError::TruncatedBody {
                offset: start,
                got,
                expected: size as usize,
            });
        }

        let rest = size as u64 - wanted as u64;
        if rest > 0 {
            let discarded = std::io::copy(&mut (&mut self.inner).take(rest), &mut std::io::sink())?;
            self.offset += discarded;
            if discarded != rest {
                return Err(AiffError::TruncatedBody {
                    offset: start,
                    got: (wanted as u64 + discarded) as usize,
                    expected: size as usize,
                });
            }
        }

        self.consume_pad(size, start)?;
        Ok(body)
    }

    /// Moves past a chunk body without reading it.
    pub fn skip_body(&mut self, size: u32) -> AiffResult<()> {
        let expected = self.offset + padded(size);
        let actual = self.inner.seek(SeekFrom::Current(padded(size) as i64))?;
        if actual != expected {
            return Err(AiffError::SeekMismatch { expected, actual });
        }
        self.offset = actual;
        Ok(())
    }

    /// Re-positions the reader, verifying where the stream lands.
    pub fn seek_to(&mut self, offset: u64) -> AiffResult<()> {
        let actual = self.inner.seek(SeekFrom::Start(offset))?;
        if actual != offset {
            return Err(AiffError::SeekMismatch {
                expected: offset,
                actual,
            });
        }
        self.offset = actual;
        Ok(())
    }

    fn consume_pad(&mut self, size: u32, start: u64) -> AiffResult<()> {
        if size % 2 == 0 {
            return Ok(());
        }
        let mut pad = [0u8; 1];
        if self.fill(&mut pad)? != 1 {
            return Err(AiffError::TruncatedBody {
                offset: start,
                got: size as usize,
                expected: size as usize + 1,
            });
        }
        Ok(())
    }

    /// Reads until `buf` is full or the stream ends, returning the count.
    fn fill(&mut self, buf: &mut [u8]) -> AiffResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }
}
