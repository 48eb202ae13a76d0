// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use super::{eof_error, FiniteStream, ReadBytes};

/// A `BufReader` reads from an in-memory byte slice.
///
/// Whole streams held in memory are loaded through a `BufReader`, and records are parsed from
/// one after their bytes are copied out of a chunk. A failed read consumes nothing.
pub struct BufReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BufReader<'a> {
    /// Instantiate a new `BufReader` over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        BufReader { buf, pos: 0 }
    }

    fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Consumes and returns the next `len` bytes.
    fn take(&mut self, len: usize) -> io::Result<&'a [u8]> {
        let rest = self.remaining();

        if rest.len() < len {
            return eof_error("buffer underrun");
        }

        self.pos += len;
        Ok(&rest[..len])
    }
}

impl ReadBytes for BufReader<'_> {
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.remaining().len());
        buf[..len].copy_from_slice(self.take(len)?);
        Ok(len)
    }

    #[inline(always)]
    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        buf.copy_from_slice(self.take(buf.len())?);
        Ok(())
    }

    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        if count > self.remaining().len() as u64 {
            return eof_error("buffer underrun");
        }

        self.pos += count as usize;
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.pos as u64
    }

    fn remaining_bound(&self) -> Option<u64> {
        Some(self.bytes_available())
    }
}

impl FiniteStream for BufReader<'_> {
    #[inline(always)]
    fn bytes_available(&self) -> u64 {
        self.remaining().len() as u64
    }
}
