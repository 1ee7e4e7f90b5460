// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The typed integer load/store surface: reads and writes at arbitrary
//! offsets in either byte order.
//!
//! Rather than duplicating a near-identical accessor per width and
//! signedness, every width/signedness pair here is a thin wrapper around two
//! generic, const-width routines (`load_bytes`, `store_bytes`) that do the
//! one real thing: ensure bounds, ensure the window, decide whether to
//! reverse the byte order, and recurse into `Viewer::read_raw`/`write_raw`
//! for the aligned/unaligned split.

use crate::error::FaultKind;
use crate::window::{Viewer, MAX_LEN};

fn check_bounds(viewer: &Viewer, offset: u64, width: u64) {
    if offset >= MAX_LEN {
        viewer.fault(FaultKind::OffsetOutOfBounds, "offset >= MAX_LEN");
    }
    match offset.checked_add(width) {
        Some(end) if end <= viewer.get_length() => {}
        _ => viewer.fault(
            FaultKind::OffsetOutOfBounds,
            "offset + width exceeds the file's length",
        ),
    }
}

/// "Little-endian in the file" means byte-at-offset-0 is the least
/// significant. Reversal is needed exactly when the requested order differs
/// from the host's, regardless of direction.
fn reverse_needed(viewer: &Viewer, le: bool) -> bool {
    le != viewer.host_is_little_endian()
}

fn load_bytes<const N: usize>(viewer: &mut Viewer, offset: u64, le: bool) -> [u8; N] {
    check_bounds(viewer, offset, N as u64);
    let mut buf = [0u8; N];
    viewer.read_raw(offset, &mut buf);
    if reverse_needed(viewer, le) {
        buf.reverse();
    }
    #[cfg(feature = "trace-access")]
    log::trace!("read {N} byte(s) at offset {offset} (le={le}): {buf:?}");
    buf
}

fn store_bytes<const N: usize>(viewer: &mut Viewer, offset: u64, le: bool, mut buf: [u8; N]) {
    check_bounds(viewer, offset, N as u64);
    if viewer.read_only() {
        viewer.fault(FaultKind::WriteOnReadOnly, "write on a read-only viewer");
    }
    if reverse_needed(viewer, le) {
        buf.reverse();
    }
    #[cfg(feature = "trace-access")]
    log::trace!("write {N} byte(s) at offset {offset} (le={le}): {buf:?}");
    viewer.write_raw(offset, &buf);
}

/// Reads an unsigned 8-bit integer at `offset`. A single byte has no byte
/// order, so there is no `le` parameter.
pub fn read8u(viewer: &mut Viewer, offset: u64) -> u8 {
    u8::from_ne_bytes(load_bytes::<1>(viewer, offset, true))
}

pub fn read8s(viewer: &mut Viewer, offset: u64) -> i8 {
    i8::from_ne_bytes(load_bytes::<1>(viewer, offset, true))
}

pub fn write8u(viewer: &mut Viewer, offset: u64, value: u8) {
    store_bytes::<1>(viewer, offset, true, value.to_ne_bytes());
}

pub fn write8s(viewer: &mut Viewer, offset: u64, value: i8) {
    store_bytes::<1>(viewer, offset, true, value.to_ne_bytes());
}

macro_rules! typed_access {
    ($read_u:ident, $read_s:ident, $write_u:ident, $write_s:ident, $uty:ty, $ity:ty, $n:expr) => {
        #[doc = concat!("Reads an unsigned ", stringify!($n), "-byte integer at `offset` in byte order `le`.")]
        pub fn $read_u(viewer: &mut Viewer, offset: u64, le: bool) -> $uty {
            <$uty>::from_ne_bytes(load_bytes::<$n>(viewer, offset, le))
        }

        #[doc = concat!("Reads a signed ", stringify!($n), "-byte integer at `offset` in byte order `le`.")]
        pub fn $read_s(viewer: &mut Viewer, offset: u64, le: bool) -> $ity {
            <$ity>::from_ne_bytes(load_bytes::<$n>(viewer, offset, le))
        }

        #[doc = concat!("Writes an unsigned ", stringify!($n), "-byte integer at `offset` in byte order `le`.")]
        pub fn $write_u(viewer: &mut Viewer, offset: u64, le: bool, value: $uty) {
            store_bytes::<$n>(viewer, offset, le, value.to_ne_bytes());
        }

        #[doc = concat!("Writes a signed ", stringify!($n), "-byte integer at `offset` in byte order `le`.")]
        pub fn $write_s(viewer: &mut Viewer, offset: u64, le: bool, value: $ity) {
            store_bytes::<$n>(viewer, offset, le, value.to_ne_bytes());
        }
    };
}

typed_access!(read16u, read16s, write16u, write16s, u16, i16, 2);
typed_access!(read32u, read32s, write32u, write32s, u32, i32, 4);
typed_access!(read64u, read64s, write64u, write64s, u64, i64, 8);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerConfig;
    use crate::mode::CreateMode;

    fn new_temp_viewer(len: u64) -> (tempfile::NamedTempFile, Viewer) {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut v = Viewer::create(file.path(), CreateMode::Existing, ViewerConfig::default()).unwrap();
        v.set_length(len).unwrap();
        (file, v)
    }

    #[test]
    fn round_trip_every_width() {
        let (_f, mut v) = new_temp_viewer(64);

        write8u(&mut v, 0, 0xAB);
        assert_eq!(read8u(&mut v, 0), 0xAB);

        write16u(&mut v, 2, true, 0x1234);
        assert_eq!(read16u(&mut v, 2, true), 0x1234);

        write32s(&mut v, 8, false, -123456);
        assert_eq!(read32s(&mut v, 8, false), -123456);

        write64u(&mut v, 16, true, 0xDEAD_BEEF_CAFE_F00D);
        assert_eq!(read64u(&mut v, 16, true), 0xDEAD_BEEF_CAFE_F00D);
    }

    #[test]
    fn byte_order_duality() {
        // P3: write LE, read BE back as the byte-reversal of the value.
        let (_f, mut v) = new_temp_viewer(16);
        write32u(&mut v, 0, true, 0x01020304);
        assert_eq!(read32u(&mut v, 0, false), 0x04030201);
    }

    #[test]
    fn negative_values_round_trip() {
        let (_f, mut v) = new_temp_viewer(8);
        write64s(&mut v, 0, true, -1);
        assert_eq!(read64s(&mut v, 0, true), -1);
        assert_eq!(read64u(&mut v, 0, true), u64::MAX);
    }

    #[test]
    fn unaligned_write_then_byte_reads() {
        // write16u at an odd offset, then check individual bytes.
        let (_f, mut v) = new_temp_viewer(16);
        write16u(&mut v, 3, true, 0x1234);
        assert_eq!(read8u(&mut v, 3), 0x34);
        assert_eq!(read8u(&mut v, 4), 0x12);
    }

    #[test]
    fn last_in_range_offset_succeeds() {
        // The last in-range width-W integer (offset = file_length - width)
        // must succeed for every width.
        let (_f, mut v) = new_temp_viewer(16);
        write64u(&mut v, 8, true, 42);
        assert_eq!(read64u(&mut v, 8, true), 42);
    }
}
