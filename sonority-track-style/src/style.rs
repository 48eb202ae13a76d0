// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use log::{info, log_enabled, trace, warn};

use sonority_core::support_track;

use sonority_core::errors::{not_found_error, not_implemented_error, shape_error, Error, Result};
use sonority_core::fourcc::codes;
use sonority_core::guid::{class, iid, param, Guid};
use sonority_core::io::ReadBytes;
use sonority_core::object::{parse_reference, query_capability, ObjectHandle, ObjectLoader};
use sonority_core::riff::{decode_fixed, get_first_chunk, Chunk, ChunkCursor};
use sonority_core::track::{param_support, ParamSupport, ParamValue};
use sonority_core::track::{LoadContext, Track, TrackDescriptor};
use sonority_core::units::MusicTime;

/// A reference to a style, and the time at which it takes effect.
#[derive(Clone, Debug)]
pub struct StyleRef {
    pub timestamp: u32,
    pub style: ObjectHandle,
}

/// Reads a style reference list: a time stamp followed by a reference to an object supporting the
/// style capability.
fn read_style_ref<B: ReadBytes + ?Sized>(
    reader: &mut B,
    strf: &Chunk,
    loader: &dyn ObjectLoader,
) -> Result<StyleRef> {
    let mut cursor = ChunkCursor::new(strf);

    let timestamp = match cursor.next_chunk(reader)? {
        Some(chunk) if chunk.id == codes::TIME_STAMP => decode_fixed::<u32, _>(reader, &chunk)?,
        _ => return shape_error("style: reference list must begin with a time stamp"),
    };

    let object = match cursor.next_chunk(reader)? {
        Some(chunk) if chunk.is_list_of(codes::REF_LIST) => {
            parse_reference(reader, &chunk, loader)?
        }
        _ => return shape_error("style: time stamp must be followed by a reference"),
    };

    let style = query_capability(&object, &iid::STYLE8).map_err(|err| {
        warn!("style: referenced object {} is not a style", object.descriptor().class_id);
        err
    })?;

    Ok(StyleRef { timestamp, style })
}

/// A style track: the styles played by a segment over time.
#[derive(Default)]
pub struct StyleTrack {
    styles: Vec<StyleRef>,
}

impl StyleTrack {
    /// Gets the style references of the track in stream order.
    pub fn styles(&self) -> &[StyleRef] {
        &self.styles
    }
}

impl Track for StyleTrack {
    fn new() -> Self {
        Default::default()
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::STYLE_TRACK, "style", "Style Track")]
    }

    fn class_id(&self) -> Guid {
        class::STYLE_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, ctx: &LoadContext<'_>) -> Result<()> {
        let list = get_first_chunk(reader)?;

        if !list.is_list_of(codes::STYLE_TRACK_LIST) {
            return shape_error("style: expected a style track list");
        }

        let mut styles = Vec::new();

        let mut cursor = ChunkCursor::new(&list);

        while let Some(chunk) = cursor.next_chunk(reader)? {
            if chunk.is_list_of(codes::STYLE_REF_LIST) {
                styles.push(read_style_ref(reader, &chunk, ctx.loader)?);
            }
            else {
                info!(
                    "style: ignoring chunk: id={:?}, list_type={:?}",
                    chunk.id, chunk.list_type
                );
            }
        }

        self.styles = styles;

        if log_enabled!(log::Level::Trace) {
            for item in &self.styles {
                trace!("style: timestamp={}, style={:?}", item.timestamp, item.style);
            }
        }

        Ok(())
    }

    fn has_param(&self, kind: &Guid) -> Result<ParamSupport> {
        param_support(
            kind,
            &[
                param::DISABLE_TIME_SIG,
                param::ENABLE_TIME_SIG,
                param::STYLE,
                param::SEED_VARIATIONS,
                param::TIME_SIGNATURE,
            ],
        )
    }

    fn get_param(&self, kind: &Guid, _: MusicTime) -> Result<ParamValue> {
        match *kind {
            param::STYLE => match self.styles.first() {
                Some(item) => Ok(ParamValue::Object(Arc::clone(&item.style))),
                None => not_found_error("style: track has no styles"),
            },
            param::TIME_SIGNATURE => not_implemented_error("style: time signature parameter"),
            _ => Err(Error::GetUnsupported),
        }
    }

    fn set_param(&mut self, kind: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        match *kind {
            param::DISABLE_TIME_SIG => not_implemented_error("style: disabling time signatures"),
            param::ENABLE_TIME_SIG => not_implemented_error("style: enabling time signatures"),
            param::STYLE => not_implemented_error("style: setting the style"),
            param::SEED_VARIATIONS => not_implemented_error("style: seeding variations"),
            _ => Err(Error::SetUnsupported),
        }
    }
}
