// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::debug;

use sonority_core::support_track;

use sonority_core::errors::{not_implemented_error, Result};
use sonority_core::guid::{class, Guid};
use sonority_core::io::ReadBytes;
use sonority_core::riff::skip_first_chunk;
use sonority_core::track::{LoadContext, ParamSupport, ParamValue, Track, TrackDescriptor};
use sonority_core::units::MusicTime;

/// A sign post track. Neither the track body nor any parameter is implemented.
#[derive(Default)]
pub struct SignPostTrack;

impl Track for SignPostTrack {
    fn new() -> Self {
        SignPostTrack
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::SIGNPOST_TRACK, "signpost", "Sign Post Track")]
    }

    fn class_id(&self) -> Guid {
        class::SIGNPOST_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let chunk = skip_first_chunk(reader)?;
        debug!("signpost: skipped track body: id={:?}, len={}", chunk.id, chunk.size);
        Ok(())
    }

    fn has_param(&self, _: &Guid) -> Result<ParamSupport> {
        not_implemented_error("signpost: parameters")
    }

    fn get_param(&self, _: &Guid, _: MusicTime) -> Result<ParamValue> {
        not_implemented_error("signpost: parameters")
    }

    fn set_param(&mut self, _: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        not_implemented_error("signpost: parameters")
    }
}
