#![allow(dead_code)]

use std::path::PathBuf;

use affix_lib::Extended80;
use tempfile::TempDir;

pub fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
    out
}

pub fn comm(channels: i16, frames: u32, bits: i16, rate: u32) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&channels.to_be_bytes());
    body.extend_from_slice(&frames.to_be_bytes());
    body.extend_from_slice(&bits.to_be_bytes());
    body.extend_from_slice(&Extended80::from(rate).to_bytes());
    chunk(b"COMM", &body)
}

pub fn ext_comm(rate: u32, compression: &[u8; 4], name: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&2i16.to_be_bytes());
    body.extend_from_slice(&500u32.to_be_bytes());
    body.extend_from_slice(&16i16.to_be_bytes());
    body.extend_from_slice(&Extended80::from(rate).to_bytes());
    body.extend_from_slice(compression);
    body.push(name.len() as u8);
    body.extend_from_slice(name.as_bytes());
    chunk(b"COMM", &body)
}

pub fn fver(timestamp: u32) -> Vec<u8> {
    chunk(b"FVER", &timestamp.to_be_bytes())
}

pub fn ssnd(len: usize) -> Vec<u8> {
    let mut body = vec![0u8; 8];
    body.extend((0..len).map(|i| (i * 7) as u8));
    chunk(b"SSND", &body)
}

pub fn form(form_type: &[u8; 4], chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut body = form_type.to_vec();
    for c in chunks {
        body.extend_from_slice(c);
    }
    chunk(b"FORM", &body)
}

pub fn rate_at(bytes: &[u8], offset: usize) -> f64 {
    let mut field = [0u8; 10];
    field.copy_from_slice(&bytes[offset..offset + 10]);
    Extended80::from_bytes(field).to_f64()
}

/// A scratch directory holding the files under test.
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
