// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `units` module defines the musical time units used by track parameters and playback.

/// A time in music ticks, relative to the start of a segment.
pub type MusicTime = i32;

/// The number of music ticks per quarter note.
pub const PPQ: MusicTime = 768;
