// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Values exchanged through track parameters.

use smallvec::SmallVec;

use crate::errors::Result;
use crate::io::{BufReader, ReadBytes};
use crate::object::ObjectHandle;
use crate::riff::Record;
use crate::units::MusicTime;

/// Whether a track accepts a parameter kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamSupport {
    /// The track accepts the parameter kind.
    Supported,
    /// The parameter kind is well-formed, but not accepted by this track.
    UnsupportedType,
}

/// A single chord within a chord, as stored in a chord track body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubChord {
    pub chord_pattern: u32,
    pub scale_pattern: u32,
    pub inversion_points: u32,
    pub levels: u32,
    pub chord_root: u8,
    pub scale_root: u8,
}

impl Record for SubChord {
    const SIZE: usize = 20;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        let sub = SubChord {
            chord_pattern: reader.read_u32()?,
            scale_pattern: reader.read_u32()?,
            inversion_points: reader.read_u32()?,
            levels: reader.read_u32()?,
            chord_root: reader.read_u8()?,
            scale_root: reader.read_u8()?,
        };
        // Two bytes of padding.
        reader.read_u16()?;
        Ok(sub)
    }
}

/// The chord parameter: the chord in effect at a given time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChordKey {
    pub name: String,
    pub measure: u16,
    pub beat: u8,
    pub subchords: SmallVec<[SubChord; 4]>,
    /// The key and scale of the chord track.
    pub scale: u32,
    pub key: u8,
    pub flags: u8,
}

/// The command parameter: the groove command in effect at a given time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandParam {
    pub command: u8,
    pub groove_level: u8,
    pub groove_range: u8,
    pub repeat_mode: u8,
}

/// A parameter value.
#[derive(Clone, Debug, Default)]
pub enum ParamValue {
    /// The parameter carries no data, such as a toggle.
    #[default]
    None,
    Bool(bool),
    U32(u32),
    Time(MusicTime),
    Object(ObjectHandle),
    Chord(ChordKey),
    Command(CommandParam),
}
