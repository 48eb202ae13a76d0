// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `io` module provides the forward-only byte streams that chunks are read from.
//!
//! Three streams implement [`ReadBytes`]:
//!
//!  * [`BufReader`] reads an in-memory byte slice. Records are parsed from one once their bytes
//!    have been copied out of a chunk.
//!  * [`ScopedStream`] wraps another stream and refuses to read past a fixed number of bytes.
//!    Every chunk body is decoded through one.
//!  * [`SourceStream`] buffers any [`MediaSource`], seeking over skipped bytes when it can.
//!
//! A read that runs out of bytes fails with [`std::io::ErrorKind::UnexpectedEof`], which the
//! error layer reports as a truncated stream.

use std::io;

mod buf_reader;
mod scoped_stream;
mod source_stream;

pub use buf_reader::BufReader;
pub use scoped_stream::ScopedStream;
pub use source_stream::SourceStream;

#[inline(always)]
fn eof_error<T>(what: &'static str) -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, what))
}

/// A byte source for a [`SourceStream`].
///
/// Every source must implement [`std::io::Seek`], but only sources answering `true` from
/// [`MediaSource::is_seekable`] are ever asked to seek.
pub trait MediaSource: io::Read + io::Seek + Send + Sync {
    /// Returns `true` if skipped bytes may be passed over with a seek.
    fn is_seekable(&self) -> bool;
}

impl MediaSource for std::fs::File {
    fn is_seekable(&self) -> bool {
        // Pipes and devices opened as files cannot seek.
        self.metadata().map(|meta| meta.is_file()).unwrap_or(false)
    }
}

impl<T: AsRef<[u8]> + Send + Sync> MediaSource for io::Cursor<T> {
    fn is_seekable(&self) -> bool {
        true
    }
}

/// Adapts a source that can only be read, such as a pipe or a socket, into a [`MediaSource`].
pub struct ReadOnlySource<R: io::Read>(R);

impl<R: io::Read + Send + Sync> ReadOnlySource<R> {
    pub fn new(inner: R) -> Self {
        ReadOnlySource(inner)
    }

    /// Unwraps the source, returning the reader.
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: io::Read + Send + Sync> MediaSource for ReadOnlySource<R> {
    fn is_seekable(&self) -> bool {
        false
    }
}

impl<R: io::Read> io::Read for ReadOnlySource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: io::Read> io::Seek for ReadOnlySource<R> {
    fn seek(&mut self, _: io::SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "read-only source cannot seek"))
    }
}

/// Reads exactly `N` bytes.
#[inline(always)]
fn read_array<const N: usize, B: ReadBytes + ?Sized>(reader: &mut B) -> io::Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader.read_buf_exact(&mut bytes)?;
    Ok(bytes)
}

/// `ReadBytes` is a forward-only stream of bytes.
///
/// Multi-byte integers are little-endian, the byte order of every chunk header and record this
/// crate reads.
pub trait ReadBytes {
    /// Reads at most `buf.len()` bytes and returns how many were read. Zero is only returned at
    /// the end of the stream, or if `buf` is empty.
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Fills `buf` completely or returns an error.
    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Skips `count` bytes, failing if the stream ends first.
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()>;

    /// Gets the absolute position of the stream.
    fn pos(&self) -> u64;

    /// Gets an upper bound on the number of bytes that can still be read, if the stream knows
    /// one. Chunk headers claiming more than this are rejected before their payload is touched.
    fn remaining_bound(&self) -> Option<u64> {
        None
    }

    /// Reads a four character code in stream order.
    #[inline(always)]
    fn read_tag(&mut self) -> io::Result<[u8; 4]> {
        read_array(self)
    }

    #[inline(always)]
    fn read_u8(&mut self) -> io::Result<u8> {
        Ok(read_array::<1, _>(self)?[0])
    }

    #[inline(always)]
    fn read_u16(&mut self) -> io::Result<u16> {
        Ok(u16::from_le_bytes(read_array(self)?))
    }

    #[inline(always)]
    fn read_u32(&mut self) -> io::Result<u32> {
        Ok(u32::from_le_bytes(read_array(self)?))
    }

    #[inline(always)]
    fn read_i32(&mut self) -> io::Result<i32> {
        Ok(i32::from_le_bytes(read_array(self)?))
    }

    #[inline(always)]
    fn read_u64(&mut self) -> io::Result<u64> {
        Ok(u64::from_le_bytes(read_array(self)?))
    }
}

impl<R: ReadBytes + ?Sized> ReadBytes for &mut R {
    #[inline(always)]
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_buf(buf)
    }

    #[inline(always)]
    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_buf_exact(buf)
    }

    #[inline(always)]
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        (**self).ignore_bytes(count)
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        (**self).pos()
    }

    #[inline(always)]
    fn remaining_bound(&self) -> Option<u64> {
        (**self).remaining_bound()
    }
}

/// A stream with a known end.
pub trait FiniteStream {
    /// Gets the number of bytes that may still be read.
    fn bytes_available(&self) -> u64;
}

impl<F: FiniteStream + ?Sized> FiniteStream for &mut F {
    fn bytes_available(&self) -> u64 {
        (**self).bytes_available()
    }
}
