// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the error type shared by every loader and track.

use std::collections::TryReserveError;
use std::error;
use std::fmt;
use std::io;
use std::result;

/// `Error` provides an enumeration of all possible errors reported by Sonority.
///
/// Errors fall into two broad classes. Stream errors (truncation, malformed containers, size
/// mismatches, unexpected stream shapes, and type mismatches) are fatal to a track load. Parameter
/// answers (`UnsupportedType`, `GetUnsupported`, `SetUnsupported`, and `NotImplemented`) are
/// normal negative results of a parameter query and leave the track untouched.
#[derive(Debug)]
pub enum Error {
    /// An IO error occured while reading or seeking the stream.
    IoError(io::Error),
    /// The stream ended before a header or declared payload could be read in full.
    TruncatedStream(&'static str),
    /// A chunk's declared size is inconsistent with the bounds of its parent, or the chunk
    /// framing is otherwise corrupt.
    MalformedContainer(&'static str),
    /// An exact-size check failed. Size mismatches are malformed containers.
    SizeMismatch { what: &'static str, expected: u64, actual: u64 },
    /// A destination buffer cannot hold a chunk's payload.
    BufferTooSmall { needed: u64, available: u64 },
    /// The outer or a required nested chunk does not match the expected grammar.
    UnsupportedStreamShape(&'static str),
    /// A referenced object does not support a required capability.
    TypeMismatch(&'static str),
    /// A default or user-defined limit was reached while loading the stream. Limits are used to
    /// prevent denial-of-service attacks from malicious streams.
    LimitError(&'static str),
    /// A memory reservation dictated by the stream could not be satisfied.
    AllocationFailed,
    /// The requested object or value is not available.
    NotFound(&'static str),
    /// An argument, such as a nil parameter kind, is invalid.
    InvalidArgument(&'static str),
    /// The parameter kind is not accepted by the track.
    UnsupportedType,
    /// The parameter kind is supported, but may not be read.
    GetUnsupported,
    /// The parameter kind is supported, but may not be written.
    SetUnsupported,
    /// The operation is supported, but not implemented.
    NotImplemented(&'static str),
}

impl Error {
    /// Returns `true` if the error indicates a corrupt container.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedContainer(_) | Error::SizeMismatch { .. })
    }

    /// Returns `true` if the error is a normal negative answer to a parameter query rather than
    /// a failure.
    pub fn is_param_negative(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedType
                | Error::GetUnsupported
                | Error::SetUnsupported
                | Error::NotImplemented(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::TruncatedStream(msg) => {
                write!(f, "truncated stream: {}", msg)
            }
            Error::MalformedContainer(msg) => {
                write!(f, "malformed container: {}", msg)
            }
            Error::SizeMismatch { what, expected, actual } => {
                write!(f, "size mismatch: {} (expected {} bytes, got {})", what, expected, actual)
            }
            Error::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {} bytes, have {}", needed, available)
            }
            Error::UnsupportedStreamShape(msg) => {
                write!(f, "unsupported stream shape: {}", msg)
            }
            Error::TypeMismatch(msg) => {
                write!(f, "type mismatch: {}", msg)
            }
            Error::LimitError(constraint) => {
                write!(f, "limit reached: {}", constraint)
            }
            Error::AllocationFailed => {
                write!(f, "allocation failed")
            }
            Error::NotFound(what) => {
                write!(f, "not found: {}", what)
            }
            Error::InvalidArgument(msg) => {
                write!(f, "invalid argument: {}", msg)
            }
            Error::UnsupportedType => {
                write!(f, "parameter type unsupported by track")
            }
            Error::GetUnsupported => {
                write!(f, "parameter may not be read")
            }
            Error::SetUnsupported => {
                write!(f, "parameter may not be written")
            }
            Error::NotImplemented(feature) => {
                write!(f, "not implemented: {}", feature)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::TruncatedStream("unexpected end of stream"),
            _ => Error::IoError(err),
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Error {
        Error::AllocationFailed
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a truncated stream error.
pub fn truncated_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::TruncatedStream(desc))
}

/// Convenience function to create a malformed container error.
pub fn malformed_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::MalformedContainer(desc))
}

/// Convenience function to create a size mismatch error.
pub fn size_mismatch_error<T>(what: &'static str, expected: u64, actual: u64) -> Result<T> {
    Err(Error::SizeMismatch { what, expected, actual })
}

/// Convenience function to create an unsupported stream shape error.
pub fn shape_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::UnsupportedStreamShape(desc))
}

/// Convenience function to create a type mismatch error.
pub fn type_mismatch_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::TypeMismatch(desc))
}

/// Creates a limit error for an allocation that would exceed a configured `Limit`.
pub fn limit_error<T>(constraint: &'static str) -> Result<T> {
    Err(Error::LimitError(constraint))
}

/// Convenience function to create a not found error.
pub fn not_found_error<T>(what: &'static str) -> Result<T> {
    Err(Error::NotFound(what))
}

/// Convenience function to create a not implemented error.
pub fn not_implemented_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::NotImplemented(feature))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_eof_maps_to_truncated_stream() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, Error::TruncatedStream(_)));

        let err: Error = io::Error::new(io::ErrorKind::Other, "other").into();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn verify_error_classes() {
        assert!(Error::SizeMismatch { what: "x", expected: 1, actual: 2 }.is_malformed());
        assert!(Error::MalformedContainer("x").is_malformed());
        assert!(!Error::TypeMismatch("x").is_malformed());

        assert!(Error::UnsupportedType.is_param_negative());
        assert!(Error::NotImplemented("x").is_param_negative());
        assert!(!Error::NotFound("x").is_param_negative());
    }
}
