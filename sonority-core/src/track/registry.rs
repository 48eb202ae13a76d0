// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use crate::errors::{not_found_error, Result};
use crate::guid::Guid;

use super::{Track, TrackObject};

/// A `TrackDescriptor` stores a description of a single track class. Common information such as
/// the class identifier, a short name, and a long name are provided. The `TrackDescriptor` also
/// provides an instantiation function. When the instantiation function is called, an empty track
/// for the class is returned.
#[derive(Copy, Clone)]
pub struct TrackDescriptor {
    /// The class identifier.
    pub class_id: Guid,
    /// A short ASCII-only string identifying the track.
    pub short_name: &'static str,
    /// A longer, more descriptive, string identifying the track.
    pub long_name: &'static str,
    // An instantiation function for the track.
    pub inst_func: fn() -> Box<dyn Track>,
}

/// A `TrackRegistry` allows the registration of track classes, and provides a method to
/// instantiate a track given its class identifier.
pub struct TrackRegistry {
    tracks: HashMap<Guid, TrackDescriptor>,
}

impl TrackRegistry {
    /// Instantiate a new `TrackRegistry`.
    pub fn new() -> Self {
        TrackRegistry { tracks: HashMap::new() }
    }

    /// Gets the `TrackDescriptor` for a registered track class.
    pub fn get_track(&self, class_id: &Guid) -> Option<&TrackDescriptor> {
        self.tracks.get(class_id)
    }

    /// Registers all track classes supported by `T`. If a class was previously registered by
    /// another `Track` it will be replaced within the registry.
    pub fn register_all<T: Track>(&mut self) {
        for descriptor in T::supported_tracks() {
            self.register(descriptor);
        }
    }

    /// Register a single track class. If the class was previously registered it will be replaced
    /// within the registry.
    pub fn register(&mut self, descriptor: &TrackDescriptor) {
        self.tracks.insert(descriptor.class_id, *descriptor);
    }

    /// Instantiates an empty track of the given class, wrapped in a [`TrackObject`].
    pub fn make(&self, class_id: &Guid) -> Result<TrackObject> {
        match self.tracks.get(class_id) {
            Some(descriptor) => Ok(TrackObject::new((descriptor.inst_func)())),
            None => not_found_error("track: unsupported track class"),
        }
    }
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience macro for declaring a `TrackDescriptor`.
#[macro_export]
macro_rules! support_track {
    ($class:expr, $short_name:expr, $long_name:expr) => {
        $crate::track::TrackDescriptor {
            class_id: $class,
            short_name: $short_name,
            long_name: $long_name,
            inst_func: || Box::new(Self::new()),
        }
    };
}
