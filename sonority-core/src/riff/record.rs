// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::debug;
use smallvec::{smallvec, SmallVec};

use crate::errors::{malformed_error, size_mismatch_error, Result};
use crate::guid::Guid;
use crate::io::{BufReader, FiniteStream, ReadBytes};

use super::Chunk;

/// Scratch space for a single record. Every record layout in use fits inline.
type RecordBuf = SmallVec<[u8; 64]>;

/// The most memory reserved up front for elements whose count is read from a stream.
const MAX_PREALLOC_BYTES: usize = 64 * 1024;

/// Creates an empty vector for `count` elements whose count was read from a stream.
///
/// The initial reservation never exceeds a small fixed size regardless of `count`. The vector
/// grows as elements are pushed, so a stream claiming more elements than it holds fails on the
/// first missing element instead of on the allocation.
pub fn with_stream_capacity<T>(count: u64) -> Result<Vec<T>> {
    let max = MAX_PREALLOC_BYTES / std::mem::size_of::<T>().max(1);
    let len = usize::try_from(count).unwrap_or(usize::MAX).min(max);

    let mut vec = Vec::new();
    vec.try_reserve_exact(len)?;
    Ok(vec)
}

/// A fixed-layout record stored in a chunk payload.
pub trait Record: Sized {
    /// The size of the record layout in bytes.
    const SIZE: usize;

    /// Parse the record from exactly `SIZE` bytes.
    fn parse(reader: &mut BufReader<'_>) -> Result<Self>;
}

impl Record for u32 {
    const SIZE: usize = 4;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        Ok(reader.read_u32()?)
    }
}

impl Record for u64 {
    const SIZE: usize = 8;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        Ok(reader.read_u64()?)
    }
}

impl Record for Guid {
    const SIZE: usize = Guid::SIZE;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        Guid::read(reader)
    }
}

/// Decodes a record occupying the entire body of `chunk`. The body length must exactly match the
/// record layout.
pub fn decode_fixed<R: Record, B: ReadBytes + ?Sized>(reader: &mut B, chunk: &Chunk) -> Result<R> {
    if chunk.body_len() != R::SIZE as u64 {
        return size_mismatch_error("fixed record", R::SIZE as u64, chunk.body_len());
    }

    let mut buf: RecordBuf = smallvec![0; R::SIZE];
    chunk.scoped(reader)?.read_buf_exact(&mut buf)?;

    R::parse(&mut BufReader::new(&buf))
}

/// Decodes a record whose on-disk size is declared by the stream. Older streams store a smaller
/// layout at the same chunk identifier, therefore at most `min(declared_size, R::SIZE)` bytes are
/// copied and any excess is skipped.
pub fn decode_versioned<R: Record, B: ReadBytes + ?Sized>(
    reader: &mut B,
    declared_size: u32,
) -> Result<R> {
    let declared = declared_size as usize;

    if declared != R::SIZE {
        debug!("record size {} differs from known size {}", declared, R::SIZE);
    }

    let len = declared.min(R::SIZE);

    let mut buf: RecordBuf = smallvec![0; R::SIZE];
    reader.read_buf_exact(&mut buf[..len])?;

    if declared > len {
        reader.ignore_bytes((declared - len) as u64)?;
    }

    R::parse(&mut BufReader::new(&buf))
}

/// A record with a stream-sized header and a trailing array of stream-sized elements.
#[derive(Clone, Debug)]
pub struct VarRecord<H, E> {
    pub header: H,
    pub elements: Vec<E>,
}

/// Reads a variable-length record occupying the entire body of `chunk`.
///
/// The body is laid out as:
///
/// ```text
/// u32          header_size
/// [u8]         header (header_size bytes)
/// u32          count
/// u32          element_size
/// [u8]         elements (count * element_size bytes)
/// ```
///
/// The header may be shorter than the known layout but never longer. The body length must equal
/// `12 + header_size + count * element_size` exactly. Every check is performed before any element
/// is read, and memory for elements is only committed as they are read. For each element, at most
/// `min(element_size, E::SIZE)` bytes are copied and the remainder is skipped.
pub fn read_var_record<H, E, B>(reader: &mut B, chunk: &Chunk) -> Result<VarRecord<H, E>>
where
    H: Record,
    E: Record,
    B: ReadBytes + ?Sized,
{
    let size = chunk.body_len();
    let mut scope = chunk.scoped(reader)?;

    if scope.bytes_available() != size {
        return malformed_error("riff: record chunk partially consumed");
    }

    if size < 4 {
        return malformed_error("riff: record header size missing");
    }

    let header_size = u64::from(scope.read_u32()?);

    if header_size > H::SIZE as u64 {
        debug!("record header size {} exceeds known size {}", header_size, H::SIZE);
        return malformed_error("riff: record header larger than known layout");
    }

    if size - 4 < header_size {
        return malformed_error("riff: record header exceeds chunk");
    }

    let mut header_buf: RecordBuf = smallvec![0; H::SIZE];
    scope.read_buf_exact(&mut header_buf[..header_size as usize])?;

    if size - 4 - header_size < 8 {
        return malformed_error("riff: record element table missing");
    }

    let count = scope.read_u32()?;
    let elem_size = scope.read_u32()?;

    let expected = 12 + header_size + u64::from(count) * u64::from(elem_size);

    if size != expected {
        return size_mismatch_error("variable-length record", expected, size);
    }

    if elem_size == 0 && count > 0 {
        return malformed_error("riff: zero-sized record elements");
    }

    let header = H::parse(&mut BufReader::new(&header_buf))?;

    let mut elements = with_stream_capacity(u64::from(count))?;

    let copy_len = (elem_size as usize).min(E::SIZE);
    let skip_len = u64::from(elem_size) - copy_len as u64;

    for _ in 0..count {
        let mut buf: RecordBuf = smallvec![0; E::SIZE];
        scope.read_buf_exact(&mut buf[..copy_len])?;
        scope.ignore_bytes(skip_len)?;

        elements.push(E::parse(&mut BufReader::new(&buf))?);
    }

    Ok(VarRecord { header, elements })
}

/// Reads a NUL-terminated little-endian UTF-16 string from the body of `chunk`.
///
/// At most `max_chars` code units are read, including the terminator, and never more than the
/// chunk holds. A string that is not terminated within those bounds is cut short. Unread body
/// bytes are left for the cursor to skip.
pub fn read_wide_string<B: ReadBytes + ?Sized>(
    reader: &mut B,
    chunk: &Chunk,
    max_chars: usize,
) -> Result<String> {
    let mut scope = chunk.scoped(reader)?;

    let avail_chars = (scope.bytes_available() / 2).min(max_chars as u64) as usize;

    let mut units = Vec::with_capacity(avail_chars);

    for _ in 0..avail_chars {
        let unit = scope.read_u16()?;

        if unit == 0 {
            break;
        }
        units.push(unit);
    }

    // Leave room for the terminator.
    units.truncate(max_chars.saturating_sub(1));

    Ok(String::from_utf16_lossy(&units))
}
