// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bitflags::bitflags;
use log::{info, log_enabled, trace, warn};

use sonority_core::support_track;

use sonority_core::errors::{malformed_error, shape_error, Error, Result};
use sonority_core::fourcc::codes;
use sonority_core::guid::{class, Guid};
use sonority_core::io::{BufReader, ReadBytes};
use sonority_core::object::{parse_reference, ObjectHandle, MAX_NAME_CHARS};
use sonority_core::riff::{decode_fixed, get_first_chunk, read_wide_string, Chunk, ChunkCursor};
use sonority_core::riff::Record;
use sonority_core::track::{LoadContext, ParamSupport, ParamValue, Track, TrackDescriptor};
use sonority_core::units::MusicTime;

bitflags! {
    /// Flags of a segment trigger item.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct SegmentItemFlags: u32 {
        /// The item triggers a motif of a style rather than a segment.
        const MOTIF = 0x1;
    }
}

/// The header of a segment trigger item.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentItemHeader {
    pub time_logical: MusicTime,
    pub time_physical: MusicTime,
    /// Segment play flags applied when the item is triggered.
    pub play_flags: u32,
    pub flags: SegmentItemFlags,
}

impl Record for SegmentItemHeader {
    const SIZE: usize = 16;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        Ok(SegmentItemHeader {
            time_logical: reader.read_i32()?,
            time_physical: reader.read_i32()?,
            play_flags: reader.read_u32()?,
            flags: SegmentItemFlags::from_bits_retain(reader.read_u32()?),
        })
    }
}

/// A segment, or a motif of a style, triggered at a point in time.
#[derive(Clone, Debug)]
pub struct SegmentItem {
    pub header: SegmentItemHeader,
    /// The referenced segment or style.
    pub object: ObjectHandle,
    /// The name of the motif. Only set for motif items.
    pub motif_name: String,
}

fn read_segment_item<B: ReadBytes + ?Sized>(
    reader: &mut B,
    lseg: &Chunk,
    ctx: &LoadContext<'_>,
) -> Result<SegmentItem> {
    let mut cursor = ChunkCursor::new(lseg);

    let header: SegmentItemHeader = match cursor.next_chunk(reader)? {
        Some(chunk) if chunk.id == codes::SEGMENT_ITEM_HEADER => decode_fixed(reader, &chunk)?,
        _ => return shape_error("segment trigger: item header must be the first chunk"),
    };

    let object = match cursor.next_chunk(reader)? {
        Some(chunk) if chunk.is_list_of(codes::REF_LIST) => {
            parse_reference(reader, &chunk, ctx.loader)?
        }
        _ => return shape_error("segment trigger: item header must be followed by a reference"),
    };

    let mut motif_name = String::new();

    if header.flags.contains(SegmentItemFlags::MOTIF) {
        if let Some(chunk) = cursor.next_chunk(reader)? {
            if chunk.id == codes::SEGMENT_ITEM_NAME {
                motif_name = read_wide_string(reader, &chunk, MAX_NAME_CHARS)?;
            }
        }
    }

    Ok(SegmentItem { header, object, motif_name })
}

/// A segment trigger track: segments and motifs to be played at given times.
#[derive(Default)]
pub struct SegmentTriggerTrack {
    items: Vec<SegmentItem>,
}

impl SegmentTriggerTrack {
    /// Gets the items of the track in stream order.
    pub fn items(&self) -> &[SegmentItem] {
        &self.items
    }
}

impl Track for SegmentTriggerTrack {
    fn new() -> Self {
        Default::default()
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::SEGTRIGGER_TRACK, "segtrigger", "Segment Trigger Track")]
    }

    fn class_id(&self) -> Guid {
        class::SEGTRIGGER_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, ctx: &LoadContext<'_>) -> Result<()> {
        let segt = get_first_chunk(reader)?;

        if !segt.is_list_of(codes::SEGTRIGGER_TRACK_LIST) {
            return shape_error("segment trigger: expected a segment trigger track list");
        }

        let mut cursor = ChunkCursor::new(&segt);

        let mut chunk = match cursor.next_chunk(reader)? {
            Some(chunk) => chunk,
            None => return shape_error("segment trigger: empty track list"),
        };

        // The track header is optional.
        if chunk.id == codes::SEGTRIGGER_TRACK_HEADER {
            let flags: u32 = decode_fixed(reader, &chunk)?;

            if flags != 0 {
                warn!("segment trigger: header flags {:#x} must be zero", flags);

                if ctx.options.strict_flags {
                    return malformed_error("segment trigger: reserved header flags are set");
                }
            }

            chunk = match cursor.next_chunk(reader)? {
                Some(chunk) => chunk,
                None => return shape_error("segment trigger: missing segment list"),
            };
        }

        if !chunk.is_list_of(codes::SEGMENT_LIST) {
            return shape_error("segment trigger: expected a segment list");
        }

        let mut items = Vec::new();

        let mut segments = ChunkCursor::new(&chunk);

        while let Some(child) = segments.next_chunk(reader)? {
            if child.is_list_of(codes::SEGMENT_ITEM_LIST) {
                items.push(read_segment_item(reader, &child, ctx)?);
            }
            else {
                info!(
                    "segment trigger: ignoring chunk: id={:?}, list_type={:?}",
                    child.id, child.list_type
                );
            }
        }

        // Consume anything following the segment list.
        while cursor.next_chunk(reader)?.is_some() {}

        self.items = items;

        if log_enabled!(log::Level::Trace) {
            for item in &self.items {
                trace!(
                    "segment trigger: {:?}, object={}, motif={:?}",
                    item.header,
                    item.object.descriptor().object_id,
                    item.motif_name
                );
            }
        }

        Ok(())
    }

    fn has_param(&self, _: &Guid) -> Result<ParamSupport> {
        Ok(ParamSupport::UnsupportedType)
    }

    fn get_param(&self, _: &Guid, _: MusicTime) -> Result<ParamValue> {
        Err(Error::GetUnsupported)
    }

    fn set_param(&mut self, _: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        Err(Error::SetUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use sonority_core::fourcc::FourCc;
    use sonority_core::guid::{iid, param};
    use sonority_core::object::{DescribedObject, DescriptorFlags, ObjectCache, ObjectDescriptor};
    use sonority_core::options::LoadOptions;
    use sonority_core::riff::{ChunkBuilder, Payload};
    use sonority_core::track::TrackObject;

    use super::*;

    const INTRO: Guid = Guid::from_fields(0x0001_5e90, 7, 7, [7; 8]);
    const BRIDGE: Guid = Guid::from_fields(0x0002_5e90, 7, 7, [7; 8]);

    fn cache() -> ObjectCache {
        let mut cache = ObjectCache::new();
        for id in [INTRO, BRIDGE] {
            let desc = ObjectDescriptor::with_class(class::SEGMENT).object(id);
            cache.insert(DescribedObject::new_handle(desc, &[iid::SEGMENT]));
        }
        cache
    }

    fn item(builder: &mut ChunkBuilder, time: i32, flags: u32, id: &Guid, name: Option<&str>) {
        let sgih = Payload::new().i32(time).i32(0).u32(0).u32(flags).into_bytes();
        let refh = Payload::new().guid(&class::SEGMENT).u32(DescriptorFlags::OBJECT.bits());

        builder
            .begin_list(codes::SEGMENT_ITEM_LIST)
            .chunk(codes::SEGMENT_ITEM_HEADER, &sgih)
            .begin_list(codes::REF_LIST)
            .chunk(codes::REF_HEADER, &refh.into_bytes())
            .chunk(codes::GUID, &Payload::new().guid(id).into_bytes())
            .end_list();

        if let Some(name) = name {
            let snam = Payload::new().wstr(name, MAX_NAME_CHARS).into_bytes();
            builder.chunk(codes::SEGMENT_ITEM_NAME, &snam);
        }

        builder.end_list();
    }

    fn track_data(header_flags: Option<u32>) -> Vec<u8> {
        let mut builder = ChunkBuilder::new();
        builder.begin_list(codes::SEGTRIGGER_TRACK_LIST);

        if let Some(flags) = header_flags {
            builder.chunk(codes::SEGTRIGGER_TRACK_HEADER, &Payload::new().u32(flags).into_bytes());
        }

        builder.begin_list(codes::SEGMENT_LIST);
        item(&mut builder, 0, 0, &INTRO, None);
        builder.chunk(FourCc::new(*b"junk"), &[1]);
        item(&mut builder, 768, SegmentItemFlags::MOTIF.bits(), &BRIDGE, Some("Fill"));
        // A name is only read for motif items.
        item(&mut builder, 1536, 0, &INTRO, Some("Ignored"));
        builder.end_list().end_list();
        builder.finish()
    }

    fn load(data: &[u8], options: LoadOptions) -> (SegmentTriggerTrack, Result<()>) {
        let cache = cache();
        let mut track = SegmentTriggerTrack::new();
        let ctx = LoadContext::with_options(&cache, options);
        let res = track.load(&mut BufReader::new(data), &ctx);
        (track, res)
    }

    #[test]
    fn verify_segment_items() {
        for header in [None, Some(0)] {
            let (track, res) = load(&track_data(header), Default::default());
            res.unwrap();

            let items = track.items();
            assert_eq!(items.len(), 3);

            assert_eq!(items[0].header.time_logical, 0);
            assert_eq!(items[0].object.descriptor().object_id, INTRO);
            assert!(items[0].motif_name.is_empty());

            assert_eq!(items[1].header.time_logical, 768);
            assert!(items[1].header.flags.contains(SegmentItemFlags::MOTIF));
            assert_eq!(items[1].object.descriptor().object_id, BRIDGE);
            assert_eq!(items[1].motif_name, "Fill");

            assert_eq!(items[2].header.time_logical, 1536);
            assert!(items[2].motif_name.is_empty());
        }
    }

    #[test]
    fn verify_nonzero_header_flags() {
        let data = track_data(Some(0x10));

        let (track, res) = load(&data, Default::default());
        res.unwrap();
        assert_eq!(track.items().len(), 3);

        let options = LoadOptions { strict_flags: true, ..Default::default() };
        let (track, res) = load(&data, options);
        assert!(matches!(res, Err(Error::MalformedContainer(_))));
        assert!(track.items().is_empty());
    }

    #[test]
    fn verify_item_header_must_be_first() {
        let refh = Payload::new().guid(&class::SEGMENT).u32(DescriptorFlags::OBJECT.bits());

        let mut builder = ChunkBuilder::new();
        builder
            .begin_list(codes::SEGTRIGGER_TRACK_LIST)
            .begin_list(codes::SEGMENT_LIST)
            .begin_list(codes::SEGMENT_ITEM_LIST)
            .begin_list(codes::REF_LIST)
            .chunk(codes::REF_HEADER, &refh.into_bytes())
            .end_list()
            .chunk(codes::SEGMENT_ITEM_HEADER, &[0; 16]);
        let data = builder.finish();

        let (_, res) = load(&data, Default::default());
        assert!(matches!(res, Err(Error::UnsupportedStreamShape(_))));
    }

    #[test]
    fn verify_missing_segment_list() {
        let mut builder = ChunkBuilder::new();
        builder
            .begin_list(codes::SEGTRIGGER_TRACK_LIST)
            .chunk(codes::SEGTRIGGER_TRACK_HEADER, &Payload::new().u32(0).into_bytes())
            .end_list();
        let (_, res) = load(&builder.finish(), Default::default());
        assert!(matches!(res, Err(Error::UnsupportedStreamShape(_))));

        let mut builder = ChunkBuilder::new();
        builder.begin_list(codes::LYRICS_TRACK_LIST).end_list();
        let (_, res) = load(&builder.finish(), Default::default());
        assert!(matches!(res, Err(Error::UnsupportedStreamShape(_))));
    }

    #[test]
    fn verify_truncation_at_every_offset() {
        let data = track_data(Some(0));
        let cache = cache();

        for len in 0..data.len() {
            let mut track = TrackObject::new(Box::new(SegmentTriggerTrack::new()));
            let res = track.load(&mut BufReader::new(&data[..len]), &LoadContext::new(&cache));
            assert!(res.is_err());
            track.destroy();
        }
    }

    #[test]
    fn verify_params_unsupported() {
        let mut track = TrackObject::new(Box::new(SegmentTriggerTrack::new()));

        for kind in [param::COMMAND, param::STYLE, param::MUTE] {
            assert_eq!(track.has_param(&kind).unwrap(), ParamSupport::UnsupportedType);
            assert!(matches!(track.get_param(&kind, 0), Err(Error::UnsupportedType)));
            let res = track.set_param(&kind, 0, ParamValue::None);
            assert!(matches!(res, Err(Error::UnsupportedType)));
        }
    }
}
