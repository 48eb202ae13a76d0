// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 128-bit identifiers naming object classes, capabilities, and parameter kinds.

use std::fmt;

use crate::errors::Result;
use crate::io::ReadBytes;

/// A 128-bit globally unique identifier.
///
/// On the wire a `Guid` is stored as a little-endian `u32`, two little-endian `u16`s, and eight
/// bytes in stream order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid {
    data1: u32,
    data2: u16,
    data3: u16,
    data4: [u8; 8],
}

impl Guid {
    /// The nil identifier.
    pub const NIL: Guid = Guid::from_fields(0, 0, 0, [0; 8]);

    /// The number of bytes a `Guid` occupies in a stream.
    pub const SIZE: usize = 16;

    /// Construct a `Guid` from its component fields.
    pub const fn from_fields(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Guid { data1, data2, data3, data4 }
    }

    /// Construct a `Guid` from its 16-byte stream representation.
    pub fn from_bytes(buf: &[u8; 16]) -> Self {
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&buf[8..16]);

        Guid {
            data1: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            data2: u16::from_le_bytes([buf[4], buf[5]]),
            data3: u16::from_le_bytes([buf[6], buf[7]]),
            data4,
        }
    }

    /// Returns the 16-byte stream representation of the `Guid`.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut buf = [0u8; 16];
        buf[0..4].copy_from_slice(&self.data1.to_le_bytes());
        buf[4..6].copy_from_slice(&self.data2.to_le_bytes());
        buf[6..8].copy_from_slice(&self.data3.to_le_bytes());
        buf[8..16].copy_from_slice(&self.data4);
        buf
    }

    /// Reads a `Guid` from the stream.
    pub fn read<B: ReadBytes>(reader: &mut B) -> Result<Self> {
        let mut buf = [0u8; 16];
        reader.read_buf_exact(&mut buf)?;
        Ok(Guid::from_bytes(&buf))
    }

    /// Returns `true` if this is the nil identifier.
    pub fn is_nil(&self) -> bool {
        *self == Guid::NIL
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{{{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}}}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// Most DirectMusic identifiers share a common tail.
const fn dmusic(data1: u32) -> Guid {
    Guid::from_fields(data1, 0xb39b, 0x11d1, [0x87, 0x04, 0x00, 0x60, 0x08, 0x93, 0xb1, 0xbd])
}

// Identifiers introduced with DirectX 8 share another.
const fn dmusic8(data1: u32, data2: u16, data3: u16, tail: u8) -> Guid {
    Guid::from_fields(data1, data2, data3, [0x8b, tail, 0x00, 0x60, 0x08, 0x93, 0xb1, 0xb6])
}

/// Track and object class identifiers.
pub mod class {
    use super::{dmusic, dmusic8, Guid};

    pub const SEGMENT: Guid = dmusic(0xd2ac2882);
    pub const STYLE: Guid = dmusic(0xd2ac288a);
    pub const CHORD_MAP: Guid = dmusic(0xd2ac288f);

    pub const SEQ_TRACK: Guid = dmusic(0xd2ac2886);
    pub const SYSEX_TRACK: Guid = dmusic(0xd2ac2887);
    pub const CHORD_TRACK: Guid = dmusic(0xd2ac288b);
    pub const COMMAND_TRACK: Guid = dmusic(0xd2ac288c);
    pub const STYLE_TRACK: Guid = dmusic(0xd2ac288d);
    pub const MOTIF_TRACK: Guid = dmusic(0xd2ac288e);
    pub const CHORD_MAP_TRACK: Guid = dmusic(0xd2ac2896);
    pub const AUDITION_TRACK: Guid = dmusic(0xd2ac2897);
    pub const MUTE_TRACK: Guid = dmusic(0xd2ac2898);

    pub const SIGNPOST_TRACK: Guid = Guid::from_fields(
        0xf17e8672,
        0xc3b4,
        0x11d1,
        [0x87, 0x0b, 0x00, 0x60, 0x08, 0x93, 0xb1, 0xbd],
    );
    pub const SEGTRIGGER_TRACK: Guid = dmusic8(0xbae4d665, 0x4ea1, 0x11d3, 0xda);
    pub const LYRICS_TRACK: Guid = dmusic8(0x995c1cf5, 0x54ff, 0x11d3, 0xda);
    pub const PARAM_CONTROL_TRACK: Guid = dmusic8(0x4be0537b, 0x5c19, 0x11d3, 0xdc);
}

/// Capability (interface) identifiers used by capability queries.
pub mod iid {
    use super::{dmusic, Guid};

    pub const OBJECT: Guid = dmusic(0xd2ac28b5);
    pub const CHORD_MAP: Guid = dmusic(0xd2ac28be);
    pub const STYLE8: Guid = Guid::from_fields(
        0xfd24ad8a,
        0xa260,
        0x453d,
        [0xbf, 0x50, 0x6f, 0x93, 0x84, 0xf7, 0x09, 0x85],
    );
    pub const SEGMENT: Guid = Guid::from_fields(
        0xf96029a2,
        0x4282,
        0x11d2,
        [0x87, 0x17, 0x00, 0x60, 0x08, 0x93, 0xb1, 0xbd],
    );
}

/// Track parameter kinds.
pub mod param {
    use super::{dmusic, Guid};

    pub const COMMAND: Guid = dmusic(0xd2ac289d);
    pub const CHORD: Guid = dmusic(0xd2ac289e);
    pub const RHYTHM: Guid = dmusic(0xd2ac289f);
    pub const STYLE: Guid = dmusic(0xd2ac28a1);
    pub const TIME_SIGNATURE: Guid = dmusic(0xd2ac28a4);
    pub const CHORD_MAP: Guid = dmusic(0xd2ac28a6);
    pub const MUTE: Guid = dmusic(0xd2ac28af);

    pub const COMMAND2: Guid = Guid::from_fields(
        0x28f97ef7,
        0x9538,
        0x11d2,
        [0x97, 0xa9, 0x00, 0xc0, 0x4f, 0xa3, 0x6e, 0x58],
    );
    pub const COMMAND_NEXT: Guid = Guid::from_fields(
        0x472afe7c,
        0x281b,
        0x11d3,
        [0xbc, 0xd5, 0x00, 0xc0, 0x4f, 0xa3, 0x6e, 0x58],
    );
    pub const DISABLE_TIME_SIG: Guid = Guid::from_fields(
        0x45fc707b,
        0x1db4,
        0x11d2,
        [0xbc, 0xac, 0x00, 0xa0, 0xc9, 0x22, 0xe6, 0xeb],
    );
    pub const ENABLE_TIME_SIG: Guid = Guid::from_fields(
        0x45fc707c,
        0x1db4,
        0x11d2,
        [0xbc, 0xac, 0x00, 0xa0, 0xc9, 0x22, 0xe6, 0xeb],
    );
    pub const SEED_VARIATIONS: Guid = Guid::from_fields(
        0x65b76fa5,
        0xff37,
        0x11d2,
        [0x81, 0x4e, 0x00, 0xc0, 0x4f, 0xa3, 0x6e, 0x58],
    );
    pub const VALID_START_TIME: Guid = Guid::from_fields(
        0x7f6b1760,
        0x1fdb,
        0x11d3,
        [0x82, 0x26, 0x44, 0x45, 0x53, 0x54, 0x00, 0x00],
    );
    pub const VARIATIONS: Guid = Guid::from_fields(
        0x11f72cce,
        0x26e6,
        0x4ecd,
        [0xaf, 0x2e, 0xd6, 0x68, 0xe6, 0x67, 0x07, 0xd8],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BufReader;

    #[test]
    fn verify_guid_stream_layout() {
        let bytes = class::CHORD_TRACK.to_bytes();
        assert_eq!(&bytes[0..4], &[0x8b, 0x28, 0xac, 0xd2]);
        assert_eq!(&bytes[4..6], &[0x9b, 0xb3]);

        let mut reader = BufReader::new(&bytes);
        assert_eq!(Guid::read(&mut reader).unwrap(), class::CHORD_TRACK);
    }

    #[test]
    fn verify_guid_display() {
        assert_eq!(
            class::CHORD_TRACK.to_string(),
            "{d2ac288b-b39b-11d1-8704-00600893b1bd}"
        );
        assert!(Guid::NIL.is_nil());
        assert!(!param::CHORD.is_nil());
    }
}
