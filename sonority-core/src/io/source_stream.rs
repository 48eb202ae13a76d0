// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::io::{BufRead, Read};

use super::{eof_error, MediaSource, ReadBytes};

const DEFAULT_BUFFER_LEN: usize = 8 * 1024;

/// A `SourceStream` adapts any [`MediaSource`] into a [`ReadBytes`] stream.
///
/// Reads are buffered. Skips are performed with a relative seek when the source is seekable,
/// otherwise the skipped bytes are read and discarded, so forward-only sources such as pipes are
/// fully supported.
pub struct SourceStream {
    inner: io::BufReader<Box<dyn MediaSource>>,
    seekable: bool,
    pos: u64,
}

impl SourceStream {
    /// Instantiate a new `SourceStream` over the given source.
    pub fn new(source: Box<dyn MediaSource>) -> Self {
        let seekable = source.is_seekable();

        SourceStream {
            inner: io::BufReader::with_capacity(DEFAULT_BUFFER_LEN, source),
            seekable,
            pos: 0,
        }
    }

    /// Returns if the underlying source is seekable.
    pub fn is_seekable(&self) -> bool {
        self.seekable
    }

    /// Unwraps the `SourceStream`, returning the underlying source. Any buffered bytes are lost.
    pub fn into_inner(self) -> Box<dyn MediaSource> {
        self.inner.into_inner()
    }
}

impl ReadBytes for SourceStream {
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.inner.read(buf)?;
        self.pos += len as u64;
        Ok(len)
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        let buffered = self.inner.buffer().len() as u64;

        if self.seekable && count > buffered {
            let delta = i64::try_from(count)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "skip too large"))?;
            self.inner.seek_relative(delta)?;
        }
        else {
            let mut remaining = count;

            while remaining > 0 {
                let available = self.inner.fill_buf()?.len();

                if available == 0 {
                    return eof_error("end of stream");
                }

                let len = available.min(usize::try_from(remaining).unwrap_or(usize::MAX));
                self.inner.consume(len);
                remaining -= len as u64;
            }
        }

        self.pos += count;
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.pos
    }
}
