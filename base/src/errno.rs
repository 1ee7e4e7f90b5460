// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Error type shared by every operation the mapping backend exposes.

use std::io;

/// Failure of a backend operation.
///
/// Every variant here corresponds to a failure mode of one of the backend
/// operations (`open`, `query_length`, `set_length`, `map_region`, ...).
/// Callers in `mmview` sort these into its own reported/fatal/warning
/// channels; `base` itself has no opinion on that classification.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("path contains a byte that cannot be represented in the host's native path encoding")]
    PathEncoding,

    #[error("requested length {0} exceeds the maximum representable file length")]
    LengthOverflow(u64),

    #[error("host is not two's-complement, or has an unrecognized byte order")]
    NotTwosComplement,

    #[error("host page size {0} is invalid (must be >= 8 and a multiple of 8)")]
    BadPageSize(usize),

    #[error("the OS rejected a mapping request: {0}")]
    MapRejected(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds an `Error::Io` from the calling thread's last OS error. Used by
/// both platform backends to turn a failed libc/Win32 call into a `Result`.
pub fn errno_result<T>() -> Result<T> {
    Err(Error::Io(io::Error::last_os_error()))
}
