// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `track` module provides the traits and support structures necessary to implement tracks.
//!
//! A track is loaded from one kind of chunk form and then answers parameter queries. Every track
//! kind implements [`Track`], and is used through the uniform [`TrackObject`] façade, which
//! validates arguments and enforces the parameter protocol on behalf of every kind.

use bitflags::bitflags;
use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::guid::Guid;
use crate::io::ReadBytes;
use crate::object::{DescriptorFlags, ObjectDescriptor, ObjectLoader};
use crate::options::LoadOptions;
use crate::units::MusicTime;

mod list;
mod param;
mod registry;

pub use list::TrackList;
pub use param::{ChordKey, CommandParam, ParamSupport, ParamValue, SubChord};
pub use registry::{TrackDescriptor, TrackRegistry};

/// Everything a track may consult while loading.
#[derive(Copy, Clone)]
pub struct LoadContext<'a> {
    /// Resolves references to other objects.
    pub loader: &'a dyn ObjectLoader,
    /// Load options.
    pub options: LoadOptions,
}

impl<'a> LoadContext<'a> {
    /// Instantiate a new `LoadContext` with default options.
    pub fn new(loader: &'a dyn ObjectLoader) -> Self {
        LoadContext { loader, options: Default::default() }
    }

    /// Instantiate a new `LoadContext` with the provided options.
    pub fn with_options(loader: &'a dyn ObjectLoader, options: LoadOptions) -> Self {
        LoadContext { loader, options }
    }
}

bitflags! {
    /// Flags describing a span of playback.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct PlayFlags: u32 {
        const SEEK       = 0x0001;
        const LOOP       = 0x0002;
        const START      = 0x0004;
        const FLUSH      = 0x0008;
        const DIRTY      = 0x0010;
        const NOTIFY_OFF = 0x0020;
        const PLAY_OFF   = 0x0040;
        const LOOP_END   = 0x0080;
        const STOP       = 0x0100;
        const RECOMPOSE  = 0x0200;
        const CLOCK      = 0x0400;
    }
}

/// A span of the segment to play.
#[derive(Copy, Clone, Debug, Default)]
pub struct PlaySpan {
    pub start: MusicTime,
    pub end: MusicTime,
    pub offset: MusicTime,
    pub flags: PlayFlags,
    pub track_id: u32,
}

/// A `Track` implements the loading and parameter logic of one track kind.
///
/// Implementations should not be used directly, but through a [`TrackObject`], which validates
/// parameter kinds and consults [`Track::has_param`] before any get or set.
pub trait Track: Send + Sync {
    /// Instantiates an empty track.
    fn new() -> Self
    where
        Self: Sized;

    /// Gets a list of track descriptors for the track classes supported by this type.
    fn supported_tracks() -> &'static [TrackDescriptor]
    where
        Self: Sized;

    /// Gets the class identifier of the track.
    fn class_id(&self) -> Guid;

    /// Loads the track from the chunk form at the current position of the stream.
    ///
    /// Loading is all-or-nothing: on error, no items are added to the track.
    fn load(&mut self, reader: &mut dyn ReadBytes, ctx: &LoadContext<'_>) -> Result<()>;

    /// Returns whether the track accepts the parameter kind.
    fn has_param(&self, kind: &Guid) -> Result<ParamSupport>;

    /// Gets the value of a supported parameter at `time`.
    fn get_param(&self, kind: &Guid, time: MusicTime) -> Result<ParamValue>;

    /// Sets the value of a supported parameter at `time`.
    fn set_param(&mut self, kind: &Guid, time: MusicTime, value: ParamValue) -> Result<()>;

    /// Prepares the track for playback.
    fn init_play(&self) -> Result<()> {
        Ok(())
    }

    /// Ends playback of the track.
    fn end_play(&self) -> Result<()> {
        Ok(())
    }

    /// Plays a span of the track.
    fn play(&self, _span: &PlaySpan) -> Result<()> {
        Ok(())
    }
}

/// Helper for the common `has_param` implementation: supported if `kind` is in `kinds`.
pub fn param_support(kind: &Guid, kinds: &[Guid]) -> Result<ParamSupport> {
    if kinds.contains(kind) {
        Ok(ParamSupport::Supported)
    }
    else {
        Ok(ParamSupport::UnsupportedType)
    }
}

/// `TrackObject` is the uniform façade over every track kind.
pub struct TrackObject {
    desc: ObjectDescriptor,
    inner: Box<dyn Track>,
}

impl TrackObject {
    /// Wrap a track.
    pub fn new(inner: Box<dyn Track>) -> Self {
        TrackObject { desc: ObjectDescriptor::with_class(inner.class_id()), inner }
    }

    /// Gets the class identifier of the track.
    pub fn class_id(&self) -> Guid {
        self.desc.class_id
    }

    /// Gets the descriptor of the track.
    pub fn descriptor(&self) -> &ObjectDescriptor {
        &self.desc
    }

    /// Returns `true` if the track was successfully loaded.
    pub fn is_loaded(&self) -> bool {
        self.desc.valid.contains(DescriptorFlags::LOADED)
    }

    /// Gets the wrapped track.
    pub fn track(&self) -> &dyn Track {
        self.inner.as_ref()
    }

    /// Loads the track from the stream. A track may only be loaded once.
    pub fn load(&mut self, reader: &mut dyn ReadBytes, ctx: &LoadContext<'_>) -> Result<()> {
        if self.is_loaded() {
            return Err(Error::InvalidArgument("track already loaded"));
        }

        match self.inner.load(reader, ctx) {
            Ok(()) => {
                self.desc.valid |= DescriptorFlags::LOADED;
                Ok(())
            }
            Err(err) => {
                debug!("track {} failed to load: {}", self.desc.class_id, err);
                Err(err)
            }
        }
    }

    /// Returns whether the track accepts the parameter kind. A nil kind is an invalid argument.
    pub fn has_param(&self, kind: &Guid) -> Result<ParamSupport> {
        if kind.is_nil() {
            return Err(Error::InvalidArgument("nil parameter kind"));
        }
        self.inner.has_param(kind)
    }

    /// Gets the value of a parameter at `time`.
    pub fn get_param(&self, kind: &Guid, time: MusicTime) -> Result<ParamValue> {
        match self.has_param(kind)? {
            ParamSupport::Supported => self.inner.get_param(kind, time),
            ParamSupport::UnsupportedType => Err(Error::UnsupportedType),
        }
    }

    /// Sets the value of a parameter at `time`.
    pub fn set_param(&mut self, kind: &Guid, time: MusicTime, value: ParamValue) -> Result<()> {
        match self.has_param(kind)? {
            ParamSupport::Supported => self.inner.set_param(kind, time, value),
            ParamSupport::UnsupportedType => Err(Error::UnsupportedType),
        }
    }

    /// Prepares the track for playback.
    pub fn init_play(&self) -> Result<()> {
        self.inner.init_play()
    }

    /// Ends playback of the track.
    pub fn end_play(&self) -> Result<()> {
        self.inner.end_play()
    }

    /// Plays a span of the track. Clock-time spans are not supported.
    pub fn play(&self, span: &PlaySpan) -> Result<()> {
        if span.flags.contains(PlayFlags::CLOCK) {
            warn!("clock time playback is not supported");
            return Err(Error::InvalidArgument("clock time span"));
        }
        self.inner.play(span)
    }

    /// Destroys the track, releasing everything it owns. A track may be destroyed regardless of
    /// whether it was loaded.
    pub fn destroy(self) {
        drop(self)
    }
}
