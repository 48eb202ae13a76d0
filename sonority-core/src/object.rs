// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `object` module defines the boundary to the host object system.
//!
//! Tracks do not embed the objects they refer to (styles, segments, chord maps). Instead, a
//! reference list (`DMRF`) describes the object, and an [`ObjectLoader`] resolves the description
//! into a shared [`ObjectHandle`]. Shared ownership replaces explicit reference counting: cloning a
//! handle adds a reference and dropping it releases the reference.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use log::{debug, info};
use smallvec::SmallVec;

use crate::errors::{not_found_error, shape_error, type_mismatch_error, Result};
use crate::fourcc::codes;
use crate::guid::{iid, Guid};
use crate::io::{BufReader, ReadBytes};
use crate::riff::{decode_fixed, read_wide_string, Chunk, ChunkCursor, Record};

/// The maximum number of characters, including the terminator, of an object name.
pub const MAX_NAME_CHARS: usize = 64;

/// The maximum number of characters, including the terminator, of an object category.
pub const MAX_CATEGORY_CHARS: usize = 64;

/// The maximum number of characters, including the terminator, of an object file name.
pub const MAX_FILE_NAME_CHARS: usize = 260;

bitflags! {
    /// Indicates which fields of an [`ObjectDescriptor`] are valid.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DescriptorFlags: u32 {
        const OBJECT    = 0x0001;
        const CLASS     = 0x0002;
        const NAME      = 0x0004;
        const CATEGORY  = 0x0008;
        const FILE_NAME = 0x0010;
        const FULL_PATH = 0x0020;
        const URL       = 0x0040;
        const VERSION   = 0x0080;
        const DATE      = 0x0100;
        const LOADED    = 0x0200;
        const MEMORY    = 0x0400;
        const STREAM    = 0x0800;
    }
}

/// Describes an object, either as a reference to be resolved, or as the identity of a loaded
/// object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub valid: DescriptorFlags,
    pub class_id: Guid,
    pub object_id: Guid,
    pub name: String,
    pub category: String,
    pub file_name: String,
    /// Most significant and least significant version words.
    pub version: (u32, u32),
    /// A 64-bit file time.
    pub date: u64,
}

impl ObjectDescriptor {
    /// Instantiate a descriptor that only identifies a class.
    pub fn with_class(class_id: Guid) -> Self {
        ObjectDescriptor { valid: DescriptorFlags::CLASS, class_id, ..Default::default() }
    }

    /// Sets the object identifier.
    pub fn object(mut self, object_id: Guid) -> Self {
        self.object_id = object_id;
        self.valid |= DescriptorFlags::OBJECT;
        self
    }

    /// Sets the name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self.valid |= DescriptorFlags::NAME;
        self
    }

    /// Sets the file name.
    pub fn file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self.valid |= DescriptorFlags::FILE_NAME;
        self
    }
}

/// An object owned by the host object system.
pub trait MusicObject: fmt::Debug + Send + Sync {
    /// Gets the descriptor identifying the object.
    fn descriptor(&self) -> &ObjectDescriptor;

    /// Returns `true` if the object supports the capability (interface) `iid`.
    fn supports(&self, iid: &Guid) -> bool;
}

/// A shared handle to an object.
pub type ObjectHandle = Arc<dyn MusicObject>;

/// Resolves object descriptors into objects.
pub trait ObjectLoader {
    /// Gets the object described by `desc`.
    fn get_object(&self, desc: &ObjectDescriptor) -> Result<ObjectHandle>;
}

/// Queries `handle` for the capability `iid`. On success, a new handle to the same object is
/// returned. Otherwise, a `TypeMismatch` error is returned.
pub fn query_capability(handle: &ObjectHandle, iid: &Guid) -> Result<ObjectHandle> {
    if handle.supports(iid) {
        Ok(Arc::clone(handle))
    }
    else {
        debug!("object {:?} does not support {}", handle.descriptor().class_id, iid);
        type_mismatch_error("object does not support the required capability")
    }
}

/// The reference header.
struct ReferenceHeader {
    class_id: Guid,
    valid: DescriptorFlags,
}

impl Record for ReferenceHeader {
    const SIZE: usize = 20;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        Ok(ReferenceHeader {
            class_id: Guid::read(reader)?,
            valid: DescriptorFlags::from_bits_retain(reader.read_u32()?),
        })
    }
}

struct Version {
    ms: u32,
    ls: u32,
}

impl Record for Version {
    const SIZE: usize = 8;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        Ok(Version { ms: reader.read_u32()?, ls: reader.read_u32()? })
    }
}

/// Parses a single descriptor chunk into `desc`. Chunks for fields not permitted by `allowed`,
/// and unknown chunks, are skipped.
fn parse_descriptor_chunk<B: ReadBytes + ?Sized>(
    reader: &mut B,
    chunk: &Chunk,
    desc: &mut ObjectDescriptor,
    allowed: DescriptorFlags,
) -> Result<()> {
    match chunk.id {
        codes::GUID if allowed.contains(DescriptorFlags::OBJECT) => {
            desc.object_id = decode_fixed(reader, chunk)?;
            desc.valid |= DescriptorFlags::OBJECT;
        }
        codes::NAME if allowed.contains(DescriptorFlags::NAME) => {
            desc.name = read_wide_string(reader, chunk, MAX_NAME_CHARS)?;
            desc.valid |= DescriptorFlags::NAME;
        }
        codes::FILE if allowed.contains(DescriptorFlags::FILE_NAME) => {
            desc.file_name = read_wide_string(reader, chunk, MAX_FILE_NAME_CHARS)?;
            desc.valid |= DescriptorFlags::FILE_NAME;
        }
        codes::CATEGORY if allowed.contains(DescriptorFlags::CATEGORY) => {
            desc.category = read_wide_string(reader, chunk, MAX_CATEGORY_CHARS)?;
            desc.valid |= DescriptorFlags::CATEGORY;
        }
        codes::VERSION if allowed.contains(DescriptorFlags::VERSION) => {
            let version: Version = decode_fixed(reader, chunk)?;
            desc.version = (version.ms, version.ls);
            desc.valid |= DescriptorFlags::VERSION;
        }
        codes::DATE if allowed.contains(DescriptorFlags::DATE) => {
            desc.date = decode_fixed(reader, chunk)?;
            desc.valid |= DescriptorFlags::DATE;
        }
        codes::LIST
            if chunk.is_list_of(codes::INFO_LIST) && allowed.contains(DescriptorFlags::NAME) =>
        {
            let mut info = ChunkCursor::new(chunk);

            while let Some(child) = info.next_chunk(reader)? {
                if child.id == codes::INFO_NAME {
                    desc.name = read_wide_string(reader, &child, MAX_NAME_CHARS)?;
                    desc.valid |= DescriptorFlags::NAME;
                }
            }
        }
        _ => {
            debug!("ignoring descriptor chunk: id={:?}, len={}", chunk.id, chunk.size);
        }
    }

    Ok(())
}

/// Parses the descriptor chunks of `list` into `desc`. Only fields permitted by `allowed` are
/// filled in, all other descriptor chunks are skipped.
pub fn parse_descriptor<B: ReadBytes + ?Sized>(
    reader: &mut B,
    list: &Chunk,
    desc: &mut ObjectDescriptor,
    allowed: DescriptorFlags,
) -> Result<()> {
    let mut cursor = ChunkCursor::new(list);

    while let Some(chunk) = cursor.next_chunk(reader)? {
        parse_descriptor_chunk(reader, &chunk, desc, allowed)?;
    }

    Ok(())
}

/// Parses a reference list and returns its object descriptor.
///
/// The list must be a `DMRF` list beginning with a reference header (`refh`).
pub fn parse_reference_descriptor<B: ReadBytes + ?Sized>(
    reader: &mut B,
    list: &Chunk,
) -> Result<ObjectDescriptor> {
    if !list.is_list_of(codes::REF_LIST) {
        return shape_error("object: expected a reference list");
    }

    let mut cursor = ChunkCursor::new(list);

    let header: ReferenceHeader = match cursor.next_chunk(reader)? {
        Some(chunk) if chunk.id == codes::REF_HEADER => decode_fixed(reader, &chunk)?,
        _ => return shape_error("object: missing reference header"),
    };

    let mut desc = ObjectDescriptor::with_class(header.class_id);

    // Only fields flagged valid in the reference header are honoured.
    let allowed = header.valid
        & (DescriptorFlags::OBJECT
            | DescriptorFlags::NAME
            | DescriptorFlags::CATEGORY
            | DescriptorFlags::FILE_NAME
            | DescriptorFlags::VERSION
            | DescriptorFlags::DATE);

    while let Some(chunk) = cursor.next_chunk(reader)? {
        parse_descriptor_chunk(reader, &chunk, &mut desc, allowed)?;
    }

    if header.valid.contains(DescriptorFlags::FULL_PATH) {
        desc.valid |= DescriptorFlags::FULL_PATH;
    }

    Ok(desc)
}

/// Parses a reference list and resolves it into an object using `loader`.
pub fn parse_reference<B: ReadBytes + ?Sized>(
    reader: &mut B,
    list: &Chunk,
    loader: &dyn ObjectLoader,
) -> Result<ObjectHandle> {
    let desc = parse_reference_descriptor(reader, list)?;

    debug!(
        "resolving reference: class={}, object={}, name={:?}, file={:?}",
        desc.class_id, desc.object_id, desc.name, desc.file_name
    );

    loader.get_object(&desc)
}

/// A simple object that supports a fixed set of capabilities.
#[derive(Debug)]
pub struct DescribedObject {
    desc: ObjectDescriptor,
    capabilities: SmallVec<[Guid; 2]>,
}

impl DescribedObject {
    pub fn new(desc: ObjectDescriptor, capabilities: &[Guid]) -> Self {
        DescribedObject { desc, capabilities: SmallVec::from_slice(capabilities) }
    }

    /// Instantiate a new `DescribedObject` and return a shared handle to it.
    pub fn new_handle(desc: ObjectDescriptor, capabilities: &[Guid]) -> ObjectHandle {
        Arc::new(DescribedObject::new(desc, capabilities))
    }
}

impl MusicObject for DescribedObject {
    fn descriptor(&self) -> &ObjectDescriptor {
        &self.desc
    }

    fn supports(&self, capability: &Guid) -> bool {
        *capability == iid::OBJECT || self.capabilities.contains(capability)
    }
}

/// An in-memory [`ObjectLoader`] holding previously registered objects.
///
/// A descriptor is matched by object identifier if one is provided, otherwise by name, and
/// finally by file name. If the descriptor identifies a class, only objects of that class match.
#[derive(Default)]
pub struct ObjectCache {
    objects: Vec<ObjectHandle>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers an object with the cache.
    pub fn insert(&mut self, object: ObjectHandle) {
        self.objects.push(object);
    }

    /// Gets the number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if no objects are registered.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn matches(desc: &ObjectDescriptor, candidate: &ObjectDescriptor) -> bool {
        if desc.valid.contains(DescriptorFlags::CLASS)
            && candidate.valid.contains(DescriptorFlags::CLASS)
            && desc.class_id != candidate.class_id
        {
            return false;
        }

        if desc.valid.contains(DescriptorFlags::OBJECT) {
            candidate.valid.contains(DescriptorFlags::OBJECT)
                && desc.object_id == candidate.object_id
        }
        else if desc.valid.contains(DescriptorFlags::NAME) {
            candidate.valid.contains(DescriptorFlags::NAME) && desc.name == candidate.name
        }
        else if desc.valid.contains(DescriptorFlags::FILE_NAME) {
            candidate.valid.contains(DescriptorFlags::FILE_NAME)
                && desc.file_name.eq_ignore_ascii_case(&candidate.file_name)
        }
        else {
            false
        }
    }
}

impl ObjectLoader for ObjectCache {
    fn get_object(&self, desc: &ObjectDescriptor) -> Result<ObjectHandle> {
        match self.objects.iter().find(|obj| ObjectCache::matches(desc, obj.descriptor())) {
            Some(obj) => Ok(Arc::clone(obj)),
            None => {
                info!("object not found: class={}, name={:?}", desc.class_id, desc.name);
                not_found_error("object")
            }
        }
    }
}
