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

/// A motif track. The track body is not interpreted.
#[derive(Default)]
pub struct MotifTrack;

impl Track for MotifTrack {
    fn new() -> Self {
        MotifTrack
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::MOTIF_TRACK, "motif", "Motif Track")]
    }

    fn class_id(&self) -> Guid {
        class::MOTIF_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let chunk = skip_first_chunk(reader)?;
        debug!("motif: skipped track body: id={:?}, len={}", chunk.id, chunk.size);
        Ok(())
    }

    fn has_param(&self, kind: &Guid) -> Result<ParamSupport> {
        param_support(
            kind,
            &[
                param::DISABLE_TIME_SIG,
                param::ENABLE_TIME_SIG,
                param::SEED_VARIATIONS,
                param::VALID_START_TIME,
            ],
        )
    }

    fn get_param(&self, kind: &Guid, _: MusicTime) -> Result<ParamValue> {
        match *kind {
            param::VALID_START_TIME => not_implemented_error("motif: valid start time"),
            _ => Err(Error::GetUnsupported),
        }
    }

    fn set_param(&mut self, kind: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        match *kind {
            param::DISABLE_TIME_SIG => not_implemented_error("motif: disabling time signatures"),
            param::ENABLE_TIME_SIG => not_implemented_error("motif: enabling time signatures"),
            param::SEED_VARIATIONS => not_implemented_error("motif: seeding variations"),
            _ => Err(Error::SetUnsupported),
        }
    }
}
