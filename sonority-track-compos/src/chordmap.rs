// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::debug;

use sonority_core::support_track;

use sonority_core::errors::{not_implemented_error, Error, Result};
use sonority_core::guid::{class, param, Guid};
use sonority_core::io::ReadBytes;
use sonority_core::riff::skip_first_chunk;
use sonority_core::track::{param_support, ParamSupport, ParamValue};
use sonority_core::track::{LoadContext, Track, TrackDescriptor};
use sonority_core::units::MusicTime;

/// A chord map track.
#[derive(Default)]
pub struct ChordMapTrack;

impl Track for ChordMapTrack {
    fn new() -> Self {
        ChordMapTrack
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::CHORD_MAP_TRACK, "chordmap", "Chord Map Track")]
    }

    fn class_id(&self) -> Guid {
        class::CHORD_MAP_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let chunk = skip_first_chunk(reader)?;
        debug!("chordmap: skipped track body: id={:?}, len={}", chunk.id, chunk.size);
        Ok(())
    }

    fn has_param(&self, kind: &Guid) -> Result<ParamSupport> {
        param_support(kind, &[param::CHORD_MAP])
    }

    fn get_param(&self, kind: &Guid, _: MusicTime) -> Result<ParamValue> {
        match *kind {
            param::CHORD_MAP => not_implemented_error("chordmap: chord map parameter"),
            _ => Err(Error::GetUnsupported),
        }
    }

    fn set_param(&mut self, kind: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        match *kind {
            param::CHORD_MAP => not_implemented_error("chordmap: setting the chord map"),
            _ => Err(Error::SetUnsupported),
        }
    }
}
