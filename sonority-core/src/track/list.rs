// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::errors::{not_found_error, Result};
use crate::guid::Guid;
use crate::units::MusicTime;

use super::{ParamSupport, ParamValue, TrackObject};

/// An ordered, heterogeneous collection of tracks, such as the tracks of a segment.
///
/// Parameter reads are answered by the first track, in insertion order, that accepts the
/// parameter kind.
#[derive(Default)]
pub struct TrackList {
    tracks: Vec<TrackObject>,
}

impl TrackList {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a track.
    pub fn push(&mut self, track: TrackObject) {
        self.tracks.push(track);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Gets an iterator over the tracks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackObject> {
        self.tracks.iter()
    }

    /// Gets the first track of the given class.
    pub fn find_class(&self, class_id: &Guid) -> Option<&TrackObject> {
        self.tracks.iter().find(|track| track.class_id() == *class_id)
    }

    fn supports(track: &TrackObject, kind: &Guid) -> Result<bool> {
        match track.has_param(kind) {
            Ok(support) => Ok(support == ParamSupport::Supported),
            // A track that cannot answer the query does not accept the kind.
            Err(err) if err.is_param_negative() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Gets a parameter from the first track accepting the parameter kind.
    pub fn get_param(&self, kind: &Guid, time: MusicTime) -> Result<ParamValue> {
        for track in &self.tracks {
            if TrackList::supports(track, kind)? {
                return track.get_param(kind, time);
            }
        }
        not_found_error("track: no track accepts the parameter")
    }

    /// Sets a parameter on every track accepting the parameter kind.
    pub fn set_param(&mut self, kind: &Guid, time: MusicTime, value: ParamValue) -> Result<()> {
        let mut found = false;

        for track in &mut self.tracks {
            if TrackList::supports(track, kind)? {
                track.set_param(kind, time, value.clone())?;
                found = true;
            }
        }

        if !found {
            return not_found_error("track: no track accepts the parameter");
        }
        Ok(())
    }

    /// Destroys every track in the list.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}
