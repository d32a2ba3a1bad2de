//! Byte-image builders for parser tests.

use crate::aiff::AIFC_VERSION_1;
use crate::extended::Extended80;

pub fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
    out
}

pub fn comm_body(channels: i16, frames: u32, bits: i16, rate: Extended80) -> Vec<u8> {
    let mut body = Vec::with_capacity(18);
    body.extend_from_slice(&channels.to_be_bytes());
    body.extend_from_slice(&frames.to_be_bytes());
    body.extend_from_slice(&bits.to_be_bytes());
    body.extend_from_slice(&rate.to_bytes());
    body
}

pub fn ext_comm_body(
    channels: i16,
    frames: u32,
    bits: i16,
    rate: Extended80,
    compression: &[u8; 4],
    name: &str,
) -> Vec<u8> {
    let mut body = comm_body(channels, frames, bits, rate);
    body.extend_from_slice(compression);
    body.push(name.len() as u8);
    body.extend_from_slice(name.as_bytes());
    body
}

pub fn comm(rate: u32) -> Vec<u8> {
    chunk(b"COMM", &comm_body(2, 1000, 16, Extended80::from(rate)))
}

pub fn ext_comm(rate: u32, name: &str) -> Vec<u8> {
    chunk(
        b"COMM",
        &ext_comm_body(2, 1000, 16, Extended80::from(rate), b"NONE", name),
    )
}

pub fn fver() -> Vec<u8> {
    chunk(b"FVER", &AIFC_VERSION_1.to_be_bytes())
}

pub fn ssnd(samples: &[u8]) -> Vec<u8> {
    let mut body = vec![0u8; 8]; // offset + block size
    body.extend_from_slice(samples);
    chunk(b"SSND", &body)
}

pub fn form(form_type: &[u8; 4], chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut body = form_type.to_vec();
    for c in chunks {
        body.extend_from_slice(c);
    }
    chunk(b"FORM", &body)
}

pub fn aiff(chunks: &[Vec<u8>]) -> Vec<u8> {
    form(b"AIFF", chunks)
}

pub fn aifc(chunks: &[Vec<u8>]) -> Vec<u8> {
    form(b"AIFC", chunks)
}
