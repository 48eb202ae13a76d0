// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod errors;
pub mod fourcc;
pub mod guid;
pub mod io;
pub mod object;
pub mod options;
pub mod riff;
pub mod track;
pub mod units;
