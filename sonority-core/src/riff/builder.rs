// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::fourcc::{codes, FourCc};
use crate::guid::Guid;

/// `ChunkBuilder` writes well-formed chunk sequences.
///
/// Lists are opened with [`ChunkBuilder::begin_list`] and closed with
/// [`ChunkBuilder::end_list`]. The sizes of lists are filled in when they are closed, and any lists
/// left open are closed by [`ChunkBuilder::finish`].
#[derive(Default)]
pub struct ChunkBuilder {
    buf: Vec<u8>,
    open: Vec<usize>,
}

impl ChunkBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Writes a chunk with the given payload, followed by a pad byte if the payload length is odd.
    pub fn chunk(&mut self, id: FourCc, payload: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(id.as_bytes());
        self.buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(payload);

        if payload.len() % 2 != 0 {
            self.buf.push(0);
        }
        self
    }

    /// Opens a `LIST` chunk of the given list type.
    pub fn begin_list(&mut self, list_type: FourCc) -> &mut Self {
        self.begin(codes::LIST, list_type)
    }

    /// Opens a `RIFF` chunk of the given form type.
    pub fn begin_riff(&mut self, form_type: FourCc) -> &mut Self {
        self.begin(codes::RIFF, form_type)
    }

    fn begin(&mut self, id: FourCc, list_type: FourCc) -> &mut Self {
        self.open.push(self.buf.len());
        self.buf.extend_from_slice(id.as_bytes());
        self.buf.extend_from_slice(&[0; 4]);
        self.buf.extend_from_slice(list_type.as_bytes());
        self
    }

    /// Closes the innermost open list.
    pub fn end_list(&mut self) -> &mut Self {
        if let Some(start) = self.open.pop() {
            let size = (self.buf.len() - start - 8) as u32;
            self.buf[start + 4..start + 8].copy_from_slice(&size.to_le_bytes());

            if size % 2 != 0 {
                self.buf.push(0);
            }
        }
        self
    }

    /// Closes all open lists and returns the written bytes.
    pub fn finish(&mut self) -> Vec<u8> {
        while !self.open.is_empty() {
            self.end_list();
        }
        std::mem::take(&mut self.buf)
    }
}

/// `Payload` writes little-endian chunk payloads.
#[derive(Default)]
pub struct Payload {
    buf: Vec<u8>,
}

impl Payload {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn u8(mut self, val: u8) -> Self {
        self.buf.push(val);
        self
    }

    pub fn u16(mut self, val: u16) -> Self {
        self.buf.extend_from_slice(&val.to_le_bytes());
        self
    }

    pub fn u32(mut self, val: u32) -> Self {
        self.buf.extend_from_slice(&val.to_le_bytes());
        self
    }

    pub fn i32(mut self, val: i32) -> Self {
        self.buf.extend_from_slice(&val.to_le_bytes());
        self
    }

    pub fn u64(mut self, val: u64) -> Self {
        self.buf.extend_from_slice(&val.to_le_bytes());
        self
    }

    pub fn guid(mut self, val: &Guid) -> Self {
        self.buf.extend_from_slice(&val.to_bytes());
        self
    }

    /// Writes a UTF-16 string into a fixed field of `chars` code units, NUL padded. Strings too
    /// long for the field are cut short to leave room for the terminator.
    pub fn wstr(mut self, val: &str, chars: usize) -> Self {
        let mut units: Vec<u16> = val.encode_utf16().take(chars.saturating_sub(1)).collect();
        units.resize(chars, 0);

        for unit in units {
            self.buf.extend_from_slice(&unit.to_le_bytes());
        }
        self
    }

    pub fn bytes(mut self, val: &[u8]) -> Self {
        self.buf.extend_from_slice(val);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_list_sizes_are_patched() {
        let mut builder = ChunkBuilder::new();
        builder.begin_riff(FourCc::new(*b"form")).chunk(FourCc::new(*b"abcd"), &[1]);
        let data = builder.finish();

        // RIFF header, form type, child header, one payload byte and a pad byte.
        assert_eq!(data.len(), 8 + 4 + 8 + 2);
        assert_eq!(&data[4..8], &14u32.to_le_bytes());
        assert_eq!(&data[16..20], &1u32.to_le_bytes());
    }

    #[test]
    fn verify_wstr_field() {
        let bytes = Payload::new().wstr("ab", 4).into_bytes();
        assert_eq!(bytes, vec![b'a', 0, b'b', 0, 0, 0, 0, 0]);

        let bytes = Payload::new().wstr("abcdef", 3).into_bytes();
        assert_eq!(bytes, vec![b'a', 0, b'b', 0, 0, 0]);
    }
}
