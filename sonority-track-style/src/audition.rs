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

/// An audition track. The track body is not interpreted.
#[derive(Default)]
pub struct AuditionTrack;

impl Track for AuditionTrack {
    fn new() -> Self {
        AuditionTrack
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::AUDITION_TRACK, "audition", "Audition Track")]
    }

    fn class_id(&self) -> Guid {
        class::AUDITION_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let chunk = skip_first_chunk(reader)?;
        debug!("audition: skipped track body: id={:?}, len={}", chunk.id, chunk.size);
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
                param::VARIATIONS,
            ],
        )
    }

    fn get_param(&self, kind: &Guid, _: MusicTime) -> Result<ParamValue> {
        match *kind {
            param::VALID_START_TIME => not_implemented_error("audition: valid start time"),
            param::VARIATIONS => not_implemented_error("audition: variations"),
            _ => Err(Error::GetUnsupported),
        }
    }

    fn set_param(&mut self, kind: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        match *kind {
            param::DISABLE_TIME_SIG => not_implemented_error("audition: disabling time signatures"),
            param::ENABLE_TIME_SIG => not_implemented_error("audition: enabling time signatures"),
            param::SEED_VARIATIONS => not_implemented_error("audition: seeding variations"),
            _ => Err(Error::SetUnsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use sonority_core::fourcc::FourCc;
    use sonority_core::io::BufReader;
    use sonority_core::object::ObjectCache;
    use sonority_core::riff::ChunkBuilder;
    use sonority_core::track::TrackObject;

    use super::*;

    #[test]
    fn verify_load_skips_form() {
        let mut builder = ChunkBuilder::new();
        builder.begin_list(FourCc::new(*b"audt")).chunk(FourCc::new(*b"abcd"), &[1, 2, 3]);
        let mut data = builder.finish();
        data.extend_from_slice(b"next");

        let cache = ObjectCache::new();
        let mut reader = BufReader::new(&data);
        let mut track = TrackObject::new(Box::new(AuditionTrack::new()));

        track.load(&mut reader, &LoadContext::new(&cache)).unwrap();
        assert!(track.is_loaded());
        assert_eq!(reader.pos(), data.len() as u64 - 4);
    }

    #[test]
    fn verify_params() {
        let mut track = TrackObject::new(Box::new(AuditionTrack::new()));

        assert_eq!(track.has_param(&param::VARIATIONS).unwrap(), ParamSupport::Supported);
        assert_eq!(track.has_param(&param::MUTE).unwrap(), ParamSupport::UnsupportedType);

        assert!(matches!(track.get_param(&param::VARIATIONS, 0), Err(Error::NotImplemented(_))));
        let res = track.get_param(&param::SEED_VARIATIONS, 0);
        assert!(matches!(res, Err(Error::GetUnsupported)));

        let res = track.set_param(&param::VARIATIONS, 0, ParamValue::None);
        assert!(matches!(res, Err(Error::SetUnsupported)));
        let res = track.set_param(&param::SEED_VARIATIONS, 0, ParamValue::U32(7));
        assert!(matches!(res, Err(Error::NotImplemented(_))));
    }
}
