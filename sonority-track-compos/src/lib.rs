// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loaders for the tracks of the composition engine: chord map and sign post tracks.
//!
//! The bodies of both track kinds are not interpreted. Loading consumes the track form so that
//! the stream remains positioned after it.

mod chordmap;
mod signpost;

pub use chordmap::ChordMapTrack;
pub use signpost::SignPostTrack;
