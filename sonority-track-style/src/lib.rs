// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loaders for the style family of tracks: chord, command, style, audition, motif, and mute.

mod audition;
mod chord;
mod command;
mod motif;
mod mute;
mod style;

pub use audition::AuditionTrack;
pub use chord::{ChordEntry, ChordHeader, ChordTrack};
pub use command::{Command, CommandTrack};
pub use motif::MotifTrack;
pub use mute::MuteTrack;
pub use style::{StyleRef, StyleTrack};
