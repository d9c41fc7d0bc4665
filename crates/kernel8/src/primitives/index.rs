//! Index states.
//!
//! ## Purpose
//!
//! Several combinators hand a transformation its element position as a
//! buffer. This module encodes an index into, and decodes it from, an
//! element-sized byte slice.
//!
//! ## Key concepts
//!
//! * **Index width**: `min(len, 4)` bytes: 8 bits for 1-byte elements,
//!   16 bits for 2-byte elements, 32 bits for anything larger.
//! * **Window width**: the windowed shared-state variants write the running
//!   index into a caller-chosen field using `min(len, 8)` bytes.
//!
//! ## Invariants
//!
//! * Encoding is little-endian and truncation is modular.
//! * Bytes past the index width are zero-filled on write and ignored on read.

/// Width in bytes of an index stored in a `len`-byte element.
#[inline]
pub fn index_width(len: usize) -> usize {
    len.min(4)
}

/// Encode `i` into `dst`, zero-filling the bytes past the index width.
pub fn write_index(i: usize, dst: &mut [u8]) {
    let width = index_width(dst.len());
    let raw = (i as u32).to_le_bytes();
    dst[..width].copy_from_slice(&raw[..width]);
    dst[width..].fill(0);
}

/// Decode the index stored in `src`.
pub fn read_index(src: &[u8]) -> usize {
    let width = index_width(src.len());
    let mut raw = [0u8; 4];
    raw[..width].copy_from_slice(&src[..width]);
    u32::from_le_bytes(raw) as usize
}

/// Encode `i` into a window field of up to 8 bytes, zero-filling the rest.
pub fn write_window_index(i: usize, dst: &mut [u8]) {
    let width = dst.len().min(8);
    let raw = (i as u64).to_le_bytes();
    dst[..width].copy_from_slice(&raw[..width]);
    dst[width..].fill(0);
}
