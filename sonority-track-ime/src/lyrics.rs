// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::{info, log_enabled, trace};

use sonority_core::support_track;

use sonority_core::errors::{shape_error, Error, Result};
use sonority_core::fourcc::codes;
use sonority_core::guid::{class, Guid};
use sonority_core::io::{BufReader, ReadBytes};
use sonority_core::riff::{decode_fixed, get_first_chunk, read_wide_string, Chunk, ChunkCursor};
use sonority_core::riff::Record;
use sonority_core::track::{LoadContext, ParamSupport, ParamValue, Track, TrackDescriptor};
use sonority_core::units::MusicTime;

/// The maximum number of characters, including the terminator, of a lyric.
const MAX_LYRIC_CHARS: usize = 256;

/// The header of a lyric event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LyricEventHeader {
    pub flags: u32,
    pub timing_flags: u32,
    pub time_logical: MusicTime,
    pub time_physical: MusicTime,
}

impl Record for LyricEventHeader {
    const SIZE: usize = 16;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        Ok(LyricEventHeader {
            flags: reader.read_u32()?,
            timing_flags: reader.read_u32()?,
            time_logical: reader.read_i32()?,
            time_physical: reader.read_i32()?,
        })
    }
}

/// A lyric and the time it is to be displayed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LyricEvent {
    pub header: LyricEventHeader,
    pub text: String,
}

fn read_lyric_event<B: ReadBytes + ?Sized>(reader: &mut B, lyre: &Chunk) -> Result<LyricEvent> {
    let mut cursor = ChunkCursor::new(lyre);

    let header = match cursor.next_chunk(reader)? {
        Some(chunk) if chunk.id == codes::LYRIC_EVENT_HEADER => decode_fixed(reader, &chunk)?,
        _ => return shape_error("lyrics: event must begin with an event header"),
    };

    let text = match cursor.next_chunk(reader)? {
        Some(chunk) if chunk.id == codes::LYRIC_EVENT_TEXT => {
            read_wide_string(reader, &chunk, MAX_LYRIC_CHARS)?
        }
        _ => return shape_error("lyrics: event header must be followed by the lyric"),
    };

    Ok(LyricEvent { header, text })
}

/// A lyrics track: timed lyric events.
#[derive(Default)]
pub struct LyricsTrack {
    events: Vec<LyricEvent>,
}

impl LyricsTrack {
    /// Gets the lyric events of the track in stream order.
    pub fn events(&self) -> &[LyricEvent] {
        &self.events
    }
}

impl Track for LyricsTrack {
    fn new() -> Self {
        Default::default()
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::LYRICS_TRACK, "lyrics", "Lyrics Track")]
    }

    fn class_id(&self) -> Guid {
        class::LYRICS_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let lyrt = get_first_chunk(reader)?;

        if !lyrt.is_list_of(codes::LYRICS_TRACK_LIST) {
            return shape_error("lyrics: expected a lyrics track list");
        }

        let mut cursor = ChunkCursor::new(&lyrt);

        let lyrl = match cursor.next_chunk(reader)? {
            Some(chunk) if chunk.is_list_of(codes::LYRICS_EVENTS_LIST) => chunk,
            _ => return shape_error("lyrics: expected a lyric event list"),
        };

        let mut events = Vec::new();

        let mut event_cursor = ChunkCursor::new(&lyrl);

        while let Some(chunk) = event_cursor.next_chunk(reader)? {
            if chunk.is_list_of(codes::LYRIC_EVENT_LIST) {
                events.push(read_lyric_event(reader, &chunk)?);
            }
            else {
                info!(
                    "lyrics: ignoring chunk: id={:?}, list_type={:?}",
                    chunk.id, chunk.list_type
                );
            }
        }

        // Consume anything following the event list.
        while cursor.next_chunk(reader)?.is_some() {}

        self.events = events;

        if log_enabled!(log::Level::Trace) {
            for event in &self.events {
                trace!("lyrics: {:?}, text={:?}", event.header, event.text);
            }
        }

        Ok(())
    }

    fn has_param(&self, _: &Guid) -> Result<ParamSupport> {
        Ok(ParamSupport::UnsupportedType)
    }

    fn get_param(&self, _: &Guid, _: MusicTime) -> Result<ParamValue> {
        Err(Error::GetUnsupported)
    }

    fn set_param(&mut self, _: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        Err(Error::SetUnsupported)
    }
}
