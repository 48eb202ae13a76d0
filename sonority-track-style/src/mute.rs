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

/// A mute track. The track body is not interpreted.
#[derive(Default)]
pub struct MuteTrack;

impl Track for MuteTrack {
    fn new() -> Self {
        MuteTrack
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::MUTE_TRACK, "mute", "Mute Track")]
    }

    fn class_id(&self) -> Guid {
        class::MUTE_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let chunk = skip_first_chunk(reader)?;
        debug!("mute: skipped track body: id={:?}, len={}", chunk.id, chunk.size);
        Ok(())
    }

    fn has_param(&self, kind: &Guid) -> Result<ParamSupport> {
        param_support(kind, &[param::MUTE])
    }

    fn get_param(&self, kind: &Guid, _: MusicTime) -> Result<ParamValue> {
        match *kind {
            param::MUTE => not_implemented_error("mute: mute parameter"),
            _ => Err(Error::UnsupportedType),
        }
    }

    fn set_param(&mut self, kind: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        match *kind {
            param::MUTE => not_implemented_error("mute: setting the mute parameter"),
            _ => Err(Error::UnsupportedType),
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
    fn verify_truncated_form_is_rejected() {
        let mut builder = ChunkBuilder::new();
        builder.begin_list(FourCc::new(*b"mute")).chunk(FourCc::new(*b"abcd"), &[0; 16]);
        let data = builder.finish();

        let cache = ObjectCache::new();
        let mut track = TrackObject::new(Box::new(MuteTrack::new()));

        let res = track.load(&mut BufReader::new(&data[..20]), &LoadContext::new(&cache));
        assert!(matches!(res, Err(Error::TruncatedStream(_))));
        assert!(!track.is_loaded());
        track.destroy();
    }

    #[test]
    fn verify_params() {
        let mut track = TrackObject::new(Box::new(MuteTrack::new()));

        assert_eq!(track.has_param(&param::MUTE).unwrap(), ParamSupport::Supported);
        assert!(matches!(track.get_param(&param::MUTE, 0), Err(Error::NotImplemented(_))));
        assert!(matches!(track.get_param(&param::CHORD, 0), Err(Error::UnsupportedType)));

        let res = track.set_param(&param::MUTE, 0, ParamValue::Bool(true));
        assert!(matches!(res, Err(Error::NotImplemented(_))));
    }
}
