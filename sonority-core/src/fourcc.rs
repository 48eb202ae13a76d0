// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Four character codes identifying chunks and list types.

use std::fmt;

/// A four character code.
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
#[repr(transparent)]
pub struct FourCc {
    val: [u8; 4],
}

impl FourCc {
    /// Wraps four bytes as a code, in the order they appear in a stream.
    pub const fn new(val: [u8; 4]) -> Self {
        Self { val }
    }

    /// Returns the raw bytes of the code in stream order.
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.val
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.val) {
            Ok(name) => f.write_str(name),
            _ => write!(f, "{:x?}", self.val),
        }
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.val))
    }
}

impl From<[u8; 4]> for FourCc {
    fn from(val: [u8; 4]) -> Self {
        FourCc::new(val)
    }
}

/// Chunk and list type codes used by the container and track forms.
pub mod codes {
    use super::FourCc;

    // Container.
    pub const RIFF: FourCc = FourCc::new(*b"RIFF");
    pub const LIST: FourCc = FourCc::new(*b"LIST");

    // Object references and descriptors.
    pub const REF_LIST: FourCc = FourCc::new(*b"DMRF");
    pub const REF_HEADER: FourCc = FourCc::new(*b"refh");
    pub const GUID: FourCc = FourCc::new(*b"guid");
    pub const NAME: FourCc = FourCc::new(*b"name");
    pub const FILE: FourCc = FourCc::new(*b"file");
    pub const CATEGORY: FourCc = FourCc::new(*b"catg");
    pub const VERSION: FourCc = FourCc::new(*b"vers");
    pub const DATE: FourCc = FourCc::new(*b"date");
    pub const INFO_LIST: FourCc = FourCc::new(*b"UNFO");
    pub const INFO_NAME: FourCc = FourCc::new(*b"UNAM");

    // Chord track.
    pub const CHORD_TRACK_LIST: FourCc = FourCc::new(*b"cord");
    pub const CHORD_TRACK_HEADER: FourCc = FourCc::new(*b"crdh");
    pub const CHORD_TRACK_BODY: FourCc = FourCc::new(*b"crdb");

    // Command track.
    pub const COMMAND_TRACK: FourCc = FourCc::new(*b"cmnd");

    // Style track.
    pub const STYLE_TRACK_LIST: FourCc = FourCc::new(*b"sttr");
    pub const STYLE_REF_LIST: FourCc = FourCc::new(*b"strf");
    pub const TIME_STAMP: FourCc = FourCc::new(*b"stmp");

    // Segment trigger track.
    pub const SEGTRIGGER_TRACK_LIST: FourCc = FourCc::new(*b"segt");
    pub const SEGTRIGGER_TRACK_HEADER: FourCc = FourCc::new(*b"sgth");
    pub const SEGMENT_LIST: FourCc = FourCc::new(*b"lsgl");
    pub const SEGMENT_ITEM_LIST: FourCc = FourCc::new(*b"lseg");
    pub const SEGMENT_ITEM_HEADER: FourCc = FourCc::new(*b"sgih");
    pub const SEGMENT_ITEM_NAME: FourCc = FourCc::new(*b"snam");

    // Lyrics track.
    pub const LYRICS_TRACK_LIST: FourCc = FourCc::new(*b"lyrt");
    pub const LYRICS_EVENTS_LIST: FourCc = FourCc::new(*b"lyrl");
    pub const LYRIC_EVENT_LIST: FourCc = FourCc::new(*b"lyre");
    pub const LYRIC_EVENT_HEADER: FourCc = FourCc::new(*b"lyrh");
    pub const LYRIC_EVENT_TEXT: FourCc = FourCc::new(*b"lyrn");

    // MIDI track.
    pub const MIDI_TRACK: FourCc = FourCc::new(*b"MTrk");
}
