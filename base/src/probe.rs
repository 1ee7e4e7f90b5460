// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! One-shot host queries, computed once per viewer and cached.

use crate::errno::{Error, Result};
use crate::sys;

/// Writes -2i16 through a raw byte copy and reads back the resulting byte
/// pattern, rather than trusting `cfg(target_endian = ...)`: the point of
/// the probe is to catch a host that isn't two's-complement, which a
/// compile-time cfg cannot detect.
pub fn host_is_little_endian() -> Result<bool> {
    let value: i16 = -2;
    let bytes = value.to_ne_bytes();
    match bytes {
        [0xFE, 0xFF] => Ok(true),
        [0xFF, 0xFE] => Ok(false),
        _ => Err(Error::NotTwosComplement),
    }
}

/// Queries the host's mapping granularity (allocation granularity on
/// Windows, page size on POSIX) and validates it.
pub fn page_size() -> Result<usize> {
    let size = sys::query_page_size()?;
    if size < 8 || size % 8 != 0 {
        return Err(Error::BadPageSize(size));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endianness_matches_cfg() {
        let detected = host_is_little_endian().unwrap();
        assert_eq!(detected, cfg!(target_endian = "little"));
    }

    #[test]
    fn page_size_is_valid() {
        let size = page_size().unwrap();
        assert!(size >= 8);
        assert_eq!(size % 8, 0);
    }
}
