// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::debug;

use sonority_core::support_track;

use sonority_core::errors::{limit_error, not_implemented_error, shape_error, Error, Result};
use sonority_core::fourcc::codes;
use sonority_core::guid::{class, Guid};
use sonority_core::io::ReadBytes;
use sonority_core::options::LoadOptions;
use sonority_core::riff::{get_first_chunk, skip_chunk, with_stream_capacity, Chunk};
use sonority_core::track::{LoadContext, ParamSupport, ParamValue, PlaySpan, Track};
use sonority_core::track::TrackDescriptor;
use sonority_core::units::MusicTime;

/// The default upper limit on the size of the event data of a MIDI track.
const DEFAULT_MAX_EVENT_BYTES: usize = 16 * 1024 * 1024;

/// A MIDI track: the raw event data of a standard MIDI file track chunk.
#[derive(Default)]
pub struct MidiTrack {
    events: Vec<u8>,
}

impl MidiTrack {
    /// Instantiate a `MidiTrack` from a track chunk whose header has already been read.
    pub fn from_chunk<B: ReadBytes + ?Sized>(
        reader: &mut B,
        chunk: &Chunk,
        options: &LoadOptions,
    ) -> Result<Self> {
        Ok(MidiTrack { events: read_events(reader, chunk, options)? })
    }

    /// Gets the raw event data of the track.
    pub fn events(&self) -> &[u8] {
        &self.events
    }
}

fn read_events<B: ReadBytes + ?Sized>(
    reader: &mut B,
    chunk: &Chunk,
    options: &LoadOptions,
) -> Result<Vec<u8>> {
    if chunk.id != codes::MIDI_TRACK {
        return shape_error("midi: expected a track chunk");
    }

    let len = chunk.size as usize;

    if let Some(max) = options.limit_chunk_bytes.limit_or_default(DEFAULT_MAX_EVENT_BYTES) {
        if len > max {
            debug!("midi: track of {} bytes exceeds the limit of {} bytes", len, max);
            return limit_error("midi: track event data exceeds the limit");
        }
    }

    let mut events = with_stream_capacity::<u8>(len as u64)?;

    {
        let mut scope = chunk.scoped(reader)?;
        let mut block = [0u8; 4096];

        while events.len() < len {
            let n = (len - events.len()).min(block.len());
            scope.read_buf_exact(&mut block[..n])?;
            events.try_reserve(n)?;
            events.extend_from_slice(&block[..n]);
        }
    }

    skip_chunk(reader, chunk)?;

    Ok(events)
}

impl Track for MidiTrack {
    fn new() -> Self {
        Default::default()
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::SEQ_TRACK, "midi", "MIDI Track")]
    }

    fn class_id(&self) -> Guid {
        class::SEQ_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, ctx: &LoadContext<'_>) -> Result<()> {
        let chunk = get_first_chunk(reader)?;
        self.events = read_events(reader, &chunk, &ctx.options)?;
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

    fn init_play(&self) -> Result<()> {
        not_implemented_error("midi: playback")
    }

    fn end_play(&self) -> Result<()> {
        not_implemented_error("midi: playback")
    }

    fn play(&self, _: &PlaySpan) -> Result<()> {
        not_implemented_error("midi: playback")
    }
}
