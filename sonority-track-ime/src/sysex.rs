// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::debug;

use sonority_core::support_track;

use sonority_core::errors::{Error, Result};
use sonority_core::guid::{class, Guid};
use sonority_core::io::ReadBytes;
use sonority_core::riff::skip_first_chunk;
use sonority_core::track::{LoadContext, ParamSupport, ParamValue, Track, TrackDescriptor};
use sonority_core::units::MusicTime;

/// A system exclusive track. The track body is not interpreted.
#[derive(Default)]
pub struct SysExTrack;

impl Track for SysExTrack {
    fn new() -> Self {
        SysExTrack
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::SYSEX_TRACK, "sysex", "System Exclusive Track")]
    }

    fn class_id(&self) -> Guid {
        class::SYSEX_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let chunk = skip_first_chunk(reader)?;
        debug!("sysex: skipped track body: id={:?}, len={}", chunk.id, chunk.size);
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
