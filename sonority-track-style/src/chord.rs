// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::{info, log_enabled, trace};
use smallvec::SmallVec;

use sonority_core::support_track;

use sonority_core::errors::{not_found_error, not_implemented_error, shape_error, Error, Result};
use sonority_core::fourcc::codes;
use sonority_core::guid::{class, param, Guid};
use sonority_core::io::{BufReader, ReadBytes};
use sonority_core::riff::{decode_fixed, get_first_chunk, read_var_record, ChunkCursor};
use sonority_core::riff::{Record, VarRecord};
use sonority_core::track::{param_support, ChordKey, ParamSupport, ParamValue, SubChord};
use sonority_core::track::{LoadContext, Track, TrackDescriptor};
use sonority_core::units::MusicTime;

/// The number of UTF-16 code units in a chord name field.
const CHORD_NAME_CHARS: usize = 16;

/// The fixed part of a chord track body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChordHeader {
    pub name: String,
    pub time: MusicTime,
    pub measure: u16,
    pub beat: u8,
    pub flags: u8,
}

impl Record for ChordHeader {
    const SIZE: usize = 2 * CHORD_NAME_CHARS + 8;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        let mut name = [0u16; CHORD_NAME_CHARS];
        for unit in name.iter_mut() {
            *unit = reader.read_u16()?;
        }

        let len = name.iter().position(|&unit| unit == 0).unwrap_or(CHORD_NAME_CHARS);

        Ok(ChordHeader {
            name: String::from_utf16_lossy(&name[..len]),
            time: reader.read_i32()?,
            measure: reader.read_u16()?,
            beat: reader.read_u8()?,
            flags: reader.read_u8()?,
        })
    }
}

/// A chord and the subchords that make it up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChordEntry {
    pub chord: ChordHeader,
    pub subchords: SmallVec<[SubChord; 4]>,
}

impl From<VarRecord<ChordHeader, SubChord>> for ChordEntry {
    fn from(record: VarRecord<ChordHeader, SubChord>) -> Self {
        ChordEntry { chord: record.header, subchords: SmallVec::from_vec(record.elements) }
    }
}

/// A chord track: a key and scale, and a time-ordered progression of chords.
#[derive(Default)]
pub struct ChordTrack {
    scale: u32,
    chords: Vec<ChordEntry>,
}

impl ChordTrack {
    /// Gets the packed key and scale of the track. The root key is held in the upper 8 bits.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Gets the chords of the track in stream order.
    pub fn chords(&self) -> &[ChordEntry] {
        &self.chords
    }

    /// Gets the chord in effect at `time`. Before the first chord, the first chord is in effect.
    fn chord_at(&self, time: MusicTime) -> Option<&ChordEntry> {
        self.chords.iter().rev().find(|entry| entry.chord.time <= time).or(self.chords.first())
    }

    fn dump(&self) {
        trace!("chord track: scale={:#010x}, chords={}", self.scale, self.chords.len());

        for (i, entry) in self.chords.iter().enumerate() {
            trace!(
                "  chord[{}]: name={:?}, time={}, measure={}, beat={}, flags={:#x}, subchords={}",
                i,
                entry.chord.name,
                entry.chord.time,
                entry.chord.measure,
                entry.chord.beat,
                entry.chord.flags,
                entry.subchords.len()
            );
        }
    }
}

impl Track for ChordTrack {
    fn new() -> Self {
        Default::default()
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::CHORD_TRACK, "chord", "Chord Track")]
    }

    fn class_id(&self) -> Guid {
        class::CHORD_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let list = get_first_chunk(reader)?;

        if !list.is_list_of(codes::CHORD_TRACK_LIST) {
            return shape_error("chord: expected a chord track list");
        }

        let mut scale: u32 = 0;
        let mut chords = Vec::new();

        let mut cursor = ChunkCursor::new(&list);

        while let Some(chunk) = cursor.next_chunk(reader)? {
            match chunk.id {
                codes::CHORD_TRACK_HEADER => {
                    scale = decode_fixed(reader, &chunk)?;
                }
                codes::CHORD_TRACK_BODY => {
                    let record = read_var_record::<ChordHeader, SubChord, _>(reader, &chunk)?;
                    chords.push(ChordEntry::from(record));
                }
                _ => {
                    info!(
                        "chord: ignoring chunk: id={:?}, list_type={:?}",
                        chunk.id, chunk.list_type
                    );
                }
            }
        }

        self.scale = scale;
        self.chords = chords;

        if log_enabled!(log::Level::Trace) {
            self.dump();
        }

        Ok(())
    }

    fn has_param(&self, kind: &Guid) -> Result<ParamSupport> {
        param_support(kind, &[param::CHORD, param::RHYTHM])
    }

    fn get_param(&self, kind: &Guid, time: MusicTime) -> Result<ParamValue> {
        match *kind {
            param::CHORD => {
                let entry = match self.chord_at(time) {
                    Some(entry) => entry,
                    None => return not_found_error("chord: track has no chords"),
                };

                Ok(ParamValue::Chord(ChordKey {
                    name: entry.chord.name.clone(),
                    measure: entry.chord.measure,
                    beat: entry.chord.beat,
                    subchords: entry.subchords.clone(),
                    scale: self.scale & 0x00ff_ffff,
                    key: (self.scale >> 24) as u8,
                    flags: entry.chord.flags,
                }))
            }
            param::RHYTHM => not_implemented_error("chord: rhythm parameter"),
            _ => Err(Error::GetUnsupported),
        }
    }

    fn set_param(&mut self, kind: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        match *kind {
            param::CHORD => not_implemented_error("chord: setting the chord parameter"),
            _ => Err(Error::SetUnsupported),
        }
    }
}
