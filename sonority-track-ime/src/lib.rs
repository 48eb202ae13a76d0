// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loaders for the tracks of the interactive music engine: segment trigger, lyrics, MIDI,
//! system exclusive, and parameter control tracks.

mod lyrics;
mod midi;
mod paramcontrol;
mod segtrigger;
mod sysex;

pub use lyrics::{LyricEvent, LyricEventHeader, LyricsTrack};
pub use midi::MidiTrack;
pub use paramcontrol::ParamControlTrack;
pub use segtrigger::{SegmentItem, SegmentItemFlags, SegmentItemHeader, SegmentTriggerTrack};
pub use sysex::SysExTrack;
