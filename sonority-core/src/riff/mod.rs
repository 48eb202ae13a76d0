// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `riff` module walks RIFF-style chunked containers.
//!
//! Every chunk begins with an 8-byte header: a four character code followed by a little-endian
//! `u32` payload length. The payload of a `RIFF` or `LIST` chunk begins with a four character list
//! type followed by nested chunks. Payloads with an odd length are followed by a single pad byte
//! that is not counted in the length.
//!
//! Chunk boundaries are validated against the parent chunk before any part of the chunk is read,
//! and the cursor never reads beyond the parent's extent.

use std::io;

use log::debug;

use crate::errors::{malformed_error, Error, Result};
use crate::fourcc::{codes, FourCc};
use crate::io::{FiniteStream, ReadBytes, ScopedStream};

mod builder;
mod record;

pub use builder::{ChunkBuilder, Payload};
pub use record::{
    decode_fixed, decode_versioned, read_var_record, read_wide_string, with_stream_capacity,
    Record, VarRecord,
};

/// The size of a chunk header in bytes.
pub const CHUNK_HEADER_LEN: u64 = 8;

/// The size of a list type in bytes.
const LIST_TYPE_LEN: u64 = 4;

/// A chunk header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk identifier.
    pub id: FourCc,
    /// The list type. Only present if the chunk is a `RIFF` or `LIST` chunk.
    pub list_type: Option<FourCc>,
    /// The payload length, excluding the header and pad byte.
    pub size: u32,
    /// The absolute stream position of the chunk header.
    pub pos: u64,
}

impl Chunk {
    /// Returns `true` if the chunk is a `RIFF` or `LIST` chunk.
    pub fn is_list(&self) -> bool {
        self.list_type.is_some()
    }

    /// Returns `true` if the chunk is a `RIFF` or `LIST` chunk of the given list type.
    pub fn is_list_of(&self, list_type: FourCc) -> bool {
        self.list_type == Some(list_type)
    }

    /// The payload length rounded up to an even number of bytes.
    pub fn padded_size(&self) -> u64 {
        (u64::from(self.size) + 1) & !1
    }

    /// The absolute position of the first byte after the list type, or the first byte of the
    /// payload for non-list chunks.
    pub fn body_pos(&self) -> u64 {
        let list_len = if self.is_list() { LIST_TYPE_LEN } else { 0 };
        self.pos + CHUNK_HEADER_LEN + list_len
    }

    /// The absolute position of the first byte after the payload, excluding the pad byte.
    pub fn payload_end(&self) -> u64 {
        self.pos + CHUNK_HEADER_LEN + u64::from(self.size)
    }

    /// The absolute position of the first byte after the chunk, including the pad byte.
    pub fn end_pos(&self) -> u64 {
        self.pos + CHUNK_HEADER_LEN + self.padded_size()
    }

    /// The number of body bytes, excluding the list type for list chunks.
    pub fn body_len(&self) -> u64 {
        self.payload_end() - self.body_pos()
    }

    /// Returns a stream over the unread remainder of the chunk body. Reads through the returned
    /// stream can never leave the chunk.
    pub fn scoped<'a, B: ReadBytes + ?Sized>(
        &self,
        reader: &'a mut B,
    ) -> Result<ScopedStream<&'a mut B>> {
        let pos = reader.pos();

        if pos > self.payload_end() {
            return malformed_error("riff: overread chunk");
        }

        // Advance to the start of the body if the reader is still before it.
        if pos < self.body_pos() {
            reader.ignore_bytes(self.body_pos() - pos)?;
        }

        let len = self.payload_end() - reader.pos();
        Ok(ScopedStream::new(reader, len))
    }
}

/// Reads a chunk header. If `limit` is provided, it is the number of parent payload bytes after
/// the header, and a chunk whose payload would not fit is rejected before its list type is read.
/// The pad byte of a chunk ending exactly at the limit is allowed to fall outside it.
fn read_chunk_header<B: ReadBytes + ?Sized>(reader: &mut B, limit: Option<u64>) -> Result<Chunk> {
    let pos = reader.pos();
    let id = FourCc::new(reader.read_tag()?);
    let size = reader.read_u32()?;

    if let Some(limit) = limit {
        if u64::from(size) > limit {
            debug!("chunk length exceeds parent: id={:?}, len={}, remaining={}", id, size, limit);
            return malformed_error("riff: chunk length exceeds parent chunk length");
        }
    }

    let list_type = if id == codes::LIST || id == codes::RIFF {
        if u64::from(size) < LIST_TYPE_LEN {
            return malformed_error("riff: list chunk too small for list type");
        }
        Some(FourCc::new(reader.read_tag()?))
    }
    else {
        None
    };

    Ok(Chunk { id, list_type, size, pos })
}

/// Reads the chunk header at the current position of the stream.
///
/// The chunk has no parent. If the stream knows how many bytes it has left, a chunk claiming a
/// longer payload is a `TruncatedStream` error, otherwise its extent is only checked as its
/// payload is read. A stream that ends within the header is also a `TruncatedStream` error.
pub fn get_first_chunk<B: ReadBytes + ?Sized>(reader: &mut B) -> Result<Chunk> {
    let bound = reader.remaining_bound();

    let chunk = read_chunk_header(reader, None).map_err(|err| match err {
        Error::TruncatedStream(_) => Error::TruncatedStream("riff: chunk header"),
        err => err,
    })?;

    debug!("chunk: id={:?}, list_type={:?}, size={}", chunk.id, chunk.list_type, chunk.size);

    if let Some(bound) = bound {
        let available = bound.saturating_sub(CHUNK_HEADER_LEN);

        if u64::from(chunk.size) > available {
            debug!("chunk length exceeds stream: len={}, remaining={}", chunk.size, available);
            return Err(Error::TruncatedStream("riff: chunk length exceeds stream length"));
        }
    }

    Ok(chunk)
}

/// Iterates over the children of a list chunk.
pub struct ChunkCursor {
    /// The position of the first child.
    start: u64,
    /// The position of the first byte after the parent payload.
    end: u64,
    /// The last chunk returned.
    cur: Option<Chunk>,
}

impl ChunkCursor {
    /// Instantiate a cursor over the children of `parent`.
    pub fn new(parent: &Chunk) -> Self {
        ChunkCursor { start: parent.body_pos(), end: parent.payload_end(), cur: None }
    }

    /// The last chunk returned by the cursor.
    pub fn current(&self) -> Option<&Chunk> {
        self.cur.as_ref()
    }

    /// Advances past the extent of the current chunk and reads the header of the next sibling.
    /// Returns `None` when the parent is exhausted.
    ///
    /// A sibling whose header or payload would extend beyond the parent payload is a
    /// `MalformedContainer` error, and is detected before any part of it is read. The pad byte of
    /// the last sibling may be absent.
    pub fn next_chunk<B: ReadBytes + ?Sized>(&mut self, reader: &mut B) -> Result<Option<Chunk>> {
        // A pad byte of the current chunk that lies past the parent payload is not skipped, but
        // a reader that already consumed it has not overread.
        let (target, extent_end) = match &self.cur {
            Some(cur) => (cur.end_pos().min(self.end), cur.end_pos()),
            None => (self.start, self.start),
        };

        let pos = reader.pos();

        if pos > extent_end {
            debug!("overread chunk: pos={}, chunk_end={}", pos, extent_end);
            return malformed_error("riff: overread chunk");
        }

        if pos < target {
            reader.ignore_bytes(target - pos)?;
        }

        // The parent is exhausted.
        if target >= self.end {
            self.cur = None;
            self.start = self.end;
            return Ok(None);
        }

        let remaining = self.end - target;

        if remaining < CHUNK_HEADER_LEN {
            return malformed_error("riff: chunk header exceeds parent chunk length");
        }

        let chunk = read_chunk_header(reader, Some(remaining - CHUNK_HEADER_LEN))?;

        self.cur = Some(chunk);

        Ok(Some(chunk))
    }
}

/// Copies the payload of `chunk` into `buf` and returns the number of bytes copied.
///
/// If the payload is larger than `buf` a `BufferTooSmall` error is returned and nothing is read.
pub fn read_chunk_data<B: ReadBytes + ?Sized>(
    reader: &mut B,
    chunk: &Chunk,
    buf: &mut [u8],
) -> Result<usize> {
    let len = chunk.body_len();

    if len > buf.len() as u64 {
        return Err(Error::BufferTooSmall { needed: len, available: buf.len() as u64 });
    }

    let mut scope = chunk.scoped(reader)?;

    if scope.bytes_available() != len {
        return malformed_error("riff: chunk payload partially consumed");
    }

    scope.read_buf_exact(&mut buf[..len as usize])?;

    Ok(len as usize)
}

/// Advances the stream past the full extent of `chunk` without reading its payload.
///
/// A missing pad byte at the very end of the stream is tolerated.
pub fn skip_chunk<B: ReadBytes + ?Sized>(reader: &mut B, chunk: &Chunk) -> Result<()> {
    let pos = reader.pos();

    if pos > chunk.end_pos() {
        return malformed_error("riff: overread chunk");
    }

    if pos < chunk.payload_end() {
        reader.ignore_bytes(chunk.payload_end() - pos)?;
    }

    if reader.pos() < chunk.end_pos() {
        match reader.ignore_bytes(chunk.end_pos() - reader.pos()) {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => (),
            res => res?,
        }
    }

    Ok(())
}

/// Reads the chunk at the current position of the stream and skips over it entirely.
pub fn skip_first_chunk<B: ReadBytes + ?Sized>(reader: &mut B) -> Result<Chunk> {
    let chunk = get_first_chunk(reader)?;
    skip_chunk(reader, &chunk)?;
    Ok(chunk)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::io::BufReader;

    fn assert_malformed<T: std::fmt::Debug>(res: Result<T>) {
        match res {
            Err(err) => assert!(err.is_malformed(), "unexpected error: {}", err),
            Ok(val) => panic!("expected malformed container, got {:?}", val),
        }
    }

    #[test]
    fn verify_round_trip_framing() {
        let mut rng = SmallRng::seed_from_u64(0x5eed_0001);

        for _ in 0..32 {
            let count = rng.random_range(0..12);
            let mut expected = Vec::new();

            let mut builder = ChunkBuilder::new();
            builder.begin_list(FourCc::new(*b"test"));

            for _ in 0..count {
                let mut id = [0u8; 4];
                rng.fill(&mut id[..]);

                // Avoid list ids, they have a different framing.
                if id == *b"LIST" || id == *b"RIFF" {
                    id[0] = b'x';
                }

                let len = rng.random_range(0..40usize);
                let mut payload = vec![0u8; len];
                rng.fill(&mut payload[..]);

                builder.chunk(FourCc::new(id), &payload);
                expected.push((FourCc::new(id), len as u32));
            }

            builder.end_list();
            let data = builder.finish();

            let mut reader = BufReader::new(&data);
            let root = get_first_chunk(&mut reader).unwrap();
            assert!(root.is_list_of(FourCc::new(*b"test")));

            let mut cursor = ChunkCursor::new(&root);
            let mut actual = Vec::new();

            while let Some(chunk) = cursor.next_chunk(&mut reader).unwrap() {
                assert!(!chunk.is_list());
                actual.push((chunk.id, chunk.size));
            }

            assert_eq!(actual, expected);
            assert_eq!(reader.pos(), data.len() as u64);
        }
    }

    #[test]
    fn verify_nested_lists_and_padding() {
        let mut builder = ChunkBuilder::new();
        builder
            .begin_list(FourCc::new(*b"outr"))
            .chunk(FourCc::new(*b"odd1"), &[1, 2, 3])
            .begin_list(FourCc::new(*b"innr"))
            .chunk(FourCc::new(*b"deep"), &[9])
            .end_list()
            .chunk(FourCc::new(*b"last"), &[7, 7])
            .end_list();
        let data = builder.finish();

        let mut reader = BufReader::new(&data);
        let root = get_first_chunk(&mut reader).unwrap();

        let mut cursor = ChunkCursor::new(&root);

        let odd = cursor.next_chunk(&mut reader).unwrap().unwrap();
        assert_eq!(odd.size, 3);
        assert_eq!(odd.padded_size(), 4);

        let inner = cursor.next_chunk(&mut reader).unwrap().unwrap();
        assert!(inner.is_list_of(FourCc::new(*b"innr")));

        // Descend into the inner list.
        let mut inner_cursor = ChunkCursor::new(&inner);
        let deep = inner_cursor.next_chunk(&mut reader).unwrap().unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(read_chunk_data(&mut reader, &deep, &mut buf).unwrap(), 1);
        assert_eq!(buf[0], 9);
        assert!(inner_cursor.next_chunk(&mut reader).unwrap().is_none());

        let last = cursor.next_chunk(&mut reader).unwrap().unwrap();
        assert_eq!(last.id, FourCc::new(*b"last"));
        assert!(cursor.next_chunk(&mut reader).unwrap().is_none());
        assert!(cursor.next_chunk(&mut reader).unwrap().is_none());
    }

    #[test]
    fn verify_child_exceeding_parent_is_rejected() {
        // A list holding a chunk which claims 100 bytes, followed by unrelated trailing data.
        let mut data = Vec::new();
        data.extend_from_slice(b"LIST");
        data.extend_from_slice(&16u32.to_le_bytes());
        data.extend_from_slice(b"test");
        data.extend_from_slice(b"big ");
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice(&[0xaa; 200]);

        let mut reader = BufReader::new(&data);
        let root = get_first_chunk(&mut reader).unwrap();
        let mut cursor = ChunkCursor::new(&root);

        assert_malformed(cursor.next_chunk(&mut reader));
        assert!(reader.pos() <= root.end_pos());
    }

    #[test]
    fn verify_child_reaching_into_parent_pad_is_rejected() {
        // The list payload holds one byte of the child's two, the second is the list's pad byte.
        let mut data = Vec::new();
        data.extend_from_slice(b"LIST");
        data.extend_from_slice(&13u32.to_le_bytes());
        data.extend_from_slice(b"test");
        data.extend_from_slice(b"abcd");
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[0x11, 0x22]);

        let mut reader = BufReader::new(&data);
        let root = get_first_chunk(&mut reader).unwrap();
        assert_eq!(root.payload_end(), 21);

        let mut cursor = ChunkCursor::new(&root);
        assert_malformed(cursor.next_chunk(&mut reader));
    }

    #[test]
    fn verify_last_child_pad_may_be_parent_pad() {
        let mut data = Vec::new();
        data.extend_from_slice(b"LIST");
        data.extend_from_slice(&13u32.to_le_bytes());
        data.extend_from_slice(b"test");
        data.extend_from_slice(b"abcd");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[0x11, 0x00]);

        for skip_child in [false, true] {
            let mut reader = BufReader::new(&data);
            let root = get_first_chunk(&mut reader).unwrap();
            let mut cursor = ChunkCursor::new(&root);

            let child = cursor.next_chunk(&mut reader).unwrap().unwrap();
            let mut buf = [0u8; 2];
            assert_eq!(read_chunk_data(&mut reader, &child, &mut buf).unwrap(), 1);
            assert_eq!(buf, [0x11, 0]);

            // Consuming the shared pad byte is not an overread.
            if skip_child {
                skip_chunk(&mut reader, &child).unwrap();
            }

            assert!(cursor.next_chunk(&mut reader).unwrap().is_none());
            skip_chunk(&mut reader, &root).unwrap();
            assert_eq!(reader.pos(), data.len() as u64);
        }
    }

    #[test]
    fn verify_first_chunk_exceeding_stream_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(b"LIST");
        data.extend_from_slice(&0xffff_fff0u32.to_le_bytes());
        data.extend_from_slice(b"cord");
        data.extend_from_slice(&[0u8; 20]);

        let mut reader = BufReader::new(&data);
        assert!(matches!(get_first_chunk(&mut reader), Err(Error::TruncatedStream(_))));

        // A payload that fits exactly, without its pad byte, is accepted.
        let data = [b'o', b'd', b'd', b' ', 1, 0, 0, 0, 7];
        let mut reader = BufReader::new(&data);
        assert_eq!(get_first_chunk(&mut reader).unwrap().size, 1);
    }

    #[test]
    fn verify_header_exceeding_parent_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(b"LIST");
        data.extend_from_slice(&10u32.to_le_bytes());
        data.extend_from_slice(b"test");
        data.extend_from_slice(b"tiny");
        data.extend_from_slice(&[0u8; 2]);
        data.extend_from_slice(&[0u8; 16]);

        let mut reader = BufReader::new(&data);
        let root = get_first_chunk(&mut reader).unwrap();
        let mut cursor = ChunkCursor::new(&root);

        assert_malformed(cursor.next_chunk(&mut reader));
        assert_eq!(reader.pos(), root.body_pos());
    }

    #[test]
    fn verify_huge_size_is_rejected_without_reading() {
        let mut builder = ChunkBuilder::new();
        builder.begin_list(FourCc::new(*b"test")).chunk(FourCc::new(*b"ok  "), &[0; 4]);
        builder.end_list();
        let mut data = builder.finish();

        // Corrupt the child's size field.
        data[16..20].copy_from_slice(&u32::MAX.to_le_bytes());

        let mut reader = BufReader::new(&data);
        let root = get_first_chunk(&mut reader).unwrap();
        let mut cursor = ChunkCursor::new(&root);

        assert_malformed(cursor.next_chunk(&mut reader));
    }

    #[test]
    fn verify_truncated_header() {
        let data = [b'L', b'I', b'S', b'T', 4];
        let mut reader = BufReader::new(&data);
        assert!(matches!(get_first_chunk(&mut reader), Err(Error::TruncatedStream(_))));

        let data = [b'L', b'I', b'S', b'T', 2, 0, 0, 0, b'a', b'b'];
        let mut reader = BufReader::new(&data);
        assert_malformed(get_first_chunk(&mut reader));
    }

    #[test]
    fn verify_read_chunk_data_never_truncates() {
        let mut builder = ChunkBuilder::new();
        builder.chunk(FourCc::new(*b"data"), &[1, 2, 3, 4, 5]);
        let data = builder.finish();

        let mut reader = BufReader::new(&data);
        let chunk = get_first_chunk(&mut reader).unwrap();

        let mut small = [0u8; 4];
        let err = read_chunk_data(&mut reader, &chunk, &mut small).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { needed: 5, available: 4 }));
        assert_eq!(small, [0u8; 4]);

        let mut buf = [0u8; 8];
        assert_eq!(read_chunk_data(&mut reader, &chunk, &mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], &[1, 2, 3, 4, 5]);

        // The trailing pad byte is skipped.
        skip_chunk(&mut reader, &chunk).unwrap();
        assert_eq!(reader.pos(), 14);
    }

    #[test]
    fn verify_skip_tolerates_missing_final_pad() {
        let mut data = Vec::new();
        data.extend_from_slice(b"odd ");
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&[1, 2, 3]);

        let mut reader = BufReader::new(&data);
        let chunk = get_first_chunk(&mut reader).unwrap();
        skip_chunk(&mut reader, &chunk).unwrap();
        assert_eq!(reader.pos(), 11);

        let mut reader = BufReader::new(&data);
        let chunk = skip_first_chunk(&mut reader).unwrap();
        assert_eq!(chunk.size, 3);
        assert_eq!(reader.pos(), 11);
    }

    #[test]
    fn verify_overread_is_detected() {
        let mut builder = ChunkBuilder::new();
        builder
            .begin_list(FourCc::new(*b"test"))
            .chunk(FourCc::new(*b"one "), &[0; 2])
            .chunk(FourCc::new(*b"two "), &[0; 2])
            .end_list();
        let data = builder.finish();

        let mut reader = BufReader::new(&data);
        let root = get_first_chunk(&mut reader).unwrap();
        let mut cursor = ChunkCursor::new(&root);

        let one = cursor.next_chunk(&mut reader).unwrap().unwrap();
        assert_eq!(one.id, FourCc::new(*b"one "));

        // Read into the next sibling.
        reader.ignore_bytes(6).unwrap();
        assert_malformed(cursor.next_chunk(&mut reader));
    }
}
