// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Options controlling how streams are loaded.

/// A `Limit` caps an allocation whose size is read from the stream being loaded.
///
/// Chunk sizes and element counts come from untrusted data, so a loader checks them against a
/// limit before reserving memory. A stream that exceeds its limit fails with a limit error even
/// if it is otherwise well formed. Each loader picks a default large enough for ordinary content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Limit {
    /// Do not impose any limit.
    None,
    /// Use the loader's default.
    #[default]
    Default,
    /// An explicit upper bound. The unit depends on the limit, bytes or elements.
    Maximum(usize),
}

impl Limit {
    /// Resolves the limit against a loader's `default`. Returns `None` if unlimited.
    pub fn limit_or_default(&self, default: usize) -> Option<usize> {
        match self {
            Limit::None => None,
            Limit::Default => Some(default),
            Limit::Maximum(max) => Some(*max),
        }
    }
}

/// `LoadOptions` is a common set of options that all tracks use while loading.
#[derive(Copy, Clone, Debug, Default)]
pub struct LoadOptions {
    /// The maximum size in bytes of raw chunk data, such as a MIDI event blob, that a track will
    /// copy into memory.
    pub limit_chunk_bytes: Limit,

    /// Reject, rather than warn about, reserved flags that are required to be zero.
    pub strict_flags: bool,
}
