// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use super::{eof_error, FiniteStream, ReadBytes};

/// A `ScopedStream` is a window onto another stream that ends after a fixed number of bytes.
///
/// Chunk bodies are decoded through a `ScopedStream`, so a decoder can never read into the chunk
/// that follows, even if a count or size inside the body is wrong.
pub struct ScopedStream<B: ReadBytes> {
    inner: B,
    remaining: u64,
}

impl<B: ReadBytes> ScopedStream<B> {
    /// Instantiate a `ScopedStream` allowing at most `len` more bytes to be read from `inner`.
    pub fn new(inner: B, len: u64) -> Self {
        ScopedStream { inner, remaining: len }
    }

    /// Takes `len` bytes out of the window, or fails if the window is too small.
    #[inline(always)]
    fn claim(&mut self, len: u64) -> io::Result<()> {
        if len > self.remaining {
            return eof_error("read past the end of the scope");
        }
        self.remaining -= len;
        Ok(())
    }
}

impl<B: ReadBytes> FiniteStream for ScopedStream<B> {
    fn bytes_available(&self) -> u64 {
        self.remaining
    }
}

impl<B: ReadBytes> ReadBytes for ScopedStream<B> {
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.remaining.min(buf.len() as u64) as usize;
        let read = self.inner.read_buf(&mut buf[..len])?;
        self.remaining -= read as u64;
        Ok(read)
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.claim(buf.len() as u64)?;
        self.inner.read_buf_exact(buf)
    }

    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        self.claim(count)?;
        self.inner.ignore_bytes(count)
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.inner.pos()
    }

    fn remaining_bound(&self) -> Option<u64> {
        match self.inner.remaining_bound() {
            Some(inner) => Some(inner.min(self.remaining)),
            None => Some(self.remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BufReader;

    #[test]
    fn verify_reads_stop_at_scope_end() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut reader = BufReader::new(&data);

        let mut scoped = ScopedStream::new(&mut reader, 6);
        assert_eq!(scoped.read_u32().unwrap(), 0x0403_0201);

        // A read straddling the end of the scope fails without consuming anything.
        assert!(scoped.read_u32().is_err());
        assert_eq!(scoped.bytes_available(), 2);

        let mut buf = [0u8; 8];
        assert_eq!(scoped.read_buf(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[5, 6]);
        assert_eq!(scoped.bytes_available(), 0);

        assert_eq!(reader.pos(), 6);
    }

    #[test]
    fn verify_skip_within_scope() {
        let data = [0u8; 10];
        let mut reader = BufReader::new(&data);

        let mut scoped = ScopedStream::new(&mut reader, 7);
        assert_eq!(scoped.remaining_bound(), Some(7));
        scoped.read_u8().unwrap();
        assert!(scoped.ignore_bytes(7).is_err());
        scoped.ignore_bytes(6).unwrap();
        assert_eq!(scoped.bytes_available(), 0);

        assert_eq!(reader.pos(), 7);
    }

    #[test]
    fn verify_bound_is_tightest_of_scope_and_inner() {
        let data = [0u8; 4];
        let mut reader = BufReader::new(&data);

        let scoped = ScopedStream::new(&mut reader, 100);
        assert_eq!(scoped.remaining_bound(), Some(4));
    }
}
