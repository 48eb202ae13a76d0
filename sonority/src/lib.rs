// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Project Sonority
//!
//! Sonority is a 100% pure Rust loader for the chunked, RIFF-style streams that carry the tracks
//! of interactive music segments.
//!
//! ## Support
//!
//! Tracks are grouped into families. Each family is an optional feature that is enabled by
//! default.
//!
//! | Family   | Tracks                                                   | Feature  |
//! |----------|----------------------------------------------------------|----------|
//! | Style    | Chord, command, style, audition, motif, mute             | `style`  |
//! | IME      | Segment trigger, lyrics, MIDI, sysex, parameter control  | `ime`    |
//! | Compos   | Chord map, sign post                                     | `compos` |
//!
//! ## Usage
//!
//! 1. Instantiate a [`TrackObject`][core::track::TrackObject] for a track class using the
//!    [`TrackRegistry`][core::track::TrackRegistry] returned by [`default::get_tracks`], or by
//!    registering tracks on a custom registry with [`default::register_enabled_tracks`].
//! 2. Wrap the stream in a [`BufReader`][core::io::BufReader] for in-memory data, or a
//!    [`SourceStream`][core::io::SourceStream] for anything implementing `std::io::Read`.
//! 3. Provide an [`ObjectLoader`][core::object::ObjectLoader], such as an
//!    [`ObjectCache`][core::object::ObjectCache], through which references to other objects
//!    are resolved, and call `load`.
//! 4. Query the loaded track with `has_param` and `get_param`, or collect several tracks in a
//!    [`TrackList`][core::track::TrackList] to answer parameter queries the way a segment does.
//!
//! A failed load leaves the track empty. It may be dropped, or destroyed, at any time.

pub mod default {
    //! The `default` module holds a ready-made registry of every track kind enabled by the crate
    //! features. Applications with their own track kinds can build a `TrackRegistry` instead,
    //! and the lazy registry here is never constructed unless it is used.

    pub mod tracks {
        //! The `tracks` module re-exports all enabled Sonority tracks.

        #[cfg(feature = "compos")]
        pub use sonority_track_compos::{ChordMapTrack, SignPostTrack};
        #[cfg(feature = "ime")]
        pub use sonority_track_ime::{
            LyricsTrack, MidiTrack, ParamControlTrack, SegmentTriggerTrack, SysExTrack,
        };
        #[cfg(feature = "style")]
        pub use sonority_track_style::{
            AuditionTrack, ChordTrack, CommandTrack, MotifTrack, MuteTrack, StyleTrack,
        };
    }

    use lazy_static::lazy_static;

    use sonority_core::track::TrackRegistry;

    lazy_static! {
        static ref TRACK_REGISTRY: TrackRegistry = {
            let mut registry = TrackRegistry::new();
            register_enabled_tracks(&mut registry);
            registry
        };
    }

    /// Gets the default `TrackRegistry`. This registry pre-registers all the tracks selected by
    /// the `feature` flags in the includer's `Cargo.toml`. If `features` is not set, every
    /// Sonority track is registered.
    ///
    /// This function is lazy and does not instantiate the `TrackRegistry` until the first call
    /// to this function.
    pub fn get_tracks() -> &'static TrackRegistry {
        &TRACK_REGISTRY
    }

    /// Registers all the tracks selected by the `feature` flags in the includer's `Cargo.toml` on
    /// the provided `TrackRegistry`.
    ///
    /// Use this function to easily populate a custom registry with all enabled tracks.
    pub fn register_enabled_tracks(registry: &mut TrackRegistry) {
        #[cfg(feature = "style")]
        {
            registry.register_all::<tracks::AuditionTrack>();
            registry.register_all::<tracks::ChordTrack>();
            registry.register_all::<tracks::CommandTrack>();
            registry.register_all::<tracks::MotifTrack>();
            registry.register_all::<tracks::MuteTrack>();
            registry.register_all::<tracks::StyleTrack>();
        }

        #[cfg(feature = "ime")]
        {
            registry.register_all::<tracks::LyricsTrack>();
            registry.register_all::<tracks::MidiTrack>();
            registry.register_all::<tracks::ParamControlTrack>();
            registry.register_all::<tracks::SegmentTriggerTrack>();
            registry.register_all::<tracks::SysExTrack>();
        }

        #[cfg(feature = "compos")]
        {
            registry.register_all::<tracks::ChordMapTrack>();
            registry.register_all::<tracks::SignPostTrack>();
        }
    }
}

pub use sonority_core as core;

#[cfg(test)]
mod tests {
    use sonority_core::errors::Error;
    use sonority_core::guid::{class, param, Guid};
    use sonority_core::io::BufReader;
    use sonority_core::object::ObjectCache;
    use sonority_core::riff::{ChunkBuilder, Payload};
    use sonority_core::track::{LoadContext, ParamValue, TrackList, TrackRegistry};

    use super::default;

    #[test]
    fn verify_unknown_class() {
        let unknown = Guid::from_fields(0x0bad_cafe, 1, 2, [3; 8]);
        assert!(default::get_tracks().get_track(&unknown).is_none());
        assert!(matches!(default::get_tracks().make(&unknown), Err(Error::NotFound(_))));
    }

    #[cfg(all(feature = "style", feature = "ime", feature = "compos"))]
    #[test]
    fn verify_all_tracks_registered() {
        let classes = [
            class::AUDITION_TRACK,
            class::CHORD_TRACK,
            class::COMMAND_TRACK,
            class::MOTIF_TRACK,
            class::MUTE_TRACK,
            class::STYLE_TRACK,
            class::LYRICS_TRACK,
            class::SEQ_TRACK,
            class::PARAM_CONTROL_TRACK,
            class::SEGTRIGGER_TRACK,
            class::SYSEX_TRACK,
            class::CHORD_MAP_TRACK,
            class::SIGNPOST_TRACK,
        ];

        let mut registry = TrackRegistry::new();
        default::register_enabled_tracks(&mut registry);

        for class_id in classes {
            let track = default::get_tracks().make(&class_id).unwrap();
            assert_eq!(track.class_id(), class_id);
            assert!(!track.is_loaded());

            assert!(registry.get_track(&class_id).is_some());
        }
    }

    #[cfg(all(feature = "style", feature = "compos"))]
    #[test]
    fn verify_segment_param_dispatch() {
        use sonority_core::fourcc::codes;

        let tracks = default::get_tracks();
        let cache = ObjectCache::new();
        let ctx = LoadContext::new(&cache);

        let mut commands = Payload::new().u32(12);
        for (time, cmd) in [(0, 1), (768, 2)] {
            commands = commands.i32(time).u16(0).u8(0).u8(cmd).u8(0).u8(0).u8(0).u8(0);
        }

        let mut builder = ChunkBuilder::new();
        builder.chunk(codes::COMMAND_TRACK, &commands.into_bytes());
        let command_data = builder.finish();

        let mut builder = ChunkBuilder::new();
        builder.chunk(codes::LIST, &[]);
        let empty_data = builder.finish();

        let mut list = TrackList::new();

        // The sign post track cannot answer parameter queries, the mute track answers only its own.
        let mut signpost = tracks.make(&class::SIGNPOST_TRACK).unwrap();
        signpost.load(&mut BufReader::new(&empty_data), &ctx).unwrap_err();
        list.push(signpost);

        let mut mute = tracks.make(&class::MUTE_TRACK).unwrap();
        mute.load(&mut BufReader::new(&[0u8; 8]), &ctx).unwrap();
        list.push(mute);

        let mut command = tracks.make(&class::COMMAND_TRACK).unwrap();
        command.load(&mut BufReader::new(&command_data), &ctx).unwrap();
        list.push(command);

        match list.get_param(&param::COMMAND, 1000) {
            Ok(ParamValue::Command(cmd)) => assert_eq!(cmd.command, 2),
            res => panic!("unexpected command parameter {:?}", res),
        }

        assert!(matches!(list.get_param(&param::MUTE, 0), Err(Error::NotImplemented(_))));
        assert!(matches!(list.get_param(&param::STYLE, 0), Err(Error::NotFound(_))));
        assert!(matches!(list.get_param(&Guid::NIL, 0), Err(Error::InvalidArgument(_))));

        assert_eq!(list.find_class(&class::MUTE_TRACK).map(|t| t.is_loaded()), Some(true));
    }
}
