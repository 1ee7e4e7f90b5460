// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Viewer and its windowing state machine.

use std::path::{Path, PathBuf};

use base::{FileBackend, MappedRegion};

use crate::error::{CreateError, FaultKind, SetLengthError, ViewerConfig, WarnKind};
use crate::mode::CreateMode;

/// Guards offset arithmetic: `offset + width` for any in-bounds access never
/// overflows a `u64` as long as `file_length <= MAX_LEN`.
pub const MAX_LEN: u64 = (1 << 62) - 1;

/// The hint used when a client never calls `set_hint`.
pub const DEFAULT_HINT: i32 = 1 << 24;

/// No derived window is ever larger than this.
const WINDOW_CEILING: u64 = 1 << 30;

struct Window {
    region: MappedRegion,
    first: u64,
    last: u64,
}

/// An open, memory-mapped file. Not `Send`/`Sync`: callers must serialize
/// all access to one `Viewer` themselves, and a `Viewer` may only be
/// *moved* between threads, not shared.
pub struct Viewer {
    config: ViewerConfig,
    backend: Option<FileBackend>,
    read_only: bool,
    host_le: bool,
    #[allow(dead_code)] // retained per the data model; not yet consulted by any op
    path_copy: PathBuf,
    file_length: u64,
    page_size: u64,
    hint: i32,
    window_size: u64,
    window: Option<Window>,
    dirty: bool,
    timestamp_dirty: bool,
}

/// Computes the actual window size from a hint, page size, and file length:
/// clamp the hint up to at least a page, down to a 1 GiB ceiling, round up to
/// a page-size multiple, then clamp down to the file length.
pub(crate) fn derive_window_size(hint: i32, page_size: u64, file_length: u64) -> u64 {
    let mut wl: u64 = if hint < 0 { 0 } else { hint as u64 };
    if wl < page_size {
        wl = page_size;
    }
    if wl > WINDOW_CEILING {
        wl = WINDOW_CEILING;
    }
    if wl % page_size != 0 {
        wl = (wl / page_size + 1) * page_size;
    }
    if wl > file_length {
        wl = file_length;
    }
    wl
}

impl Viewer {
    /// Opens `path` in `mode`. Reported failures (bad path encoding, the OS
    /// rejecting the open, the length query failing) come back as `Err`; a
    /// host that fails the two's-complement or page-size probe is a fatal
    /// fault, since neither can be locally recovered from.
    pub fn create(
        path: impl AsRef<Path>,
        mode: CreateMode,
        config: ViewerConfig,
    ) -> Result<Viewer, CreateError> {
        let path = path.as_ref();
        let host_le = match base::probe::host_is_little_endian() {
            Ok(v) => v,
            Err(e) => config.fault(FaultKind::NotTwosComplement, &e.to_string()),
        };
        let page_size = match base::probe::page_size() {
            Ok(v) => v as u64,
            Err(e) => config.fault(FaultKind::BadPageSize, &e.to_string()),
        };

        let backend = FileBackend::open(path, mode.to_open_mode())?;
        let file_length = backend
            .query_length()
            .map_err(CreateError::LenQuery)?;
        let hint = DEFAULT_HINT;
        let window_size = derive_window_size(hint, page_size, file_length);

        Ok(Viewer {
            config,
            backend: Some(backend),
            read_only: !mode.is_writable(),
            host_le,
            path_copy: path.to_path_buf(),
            file_length,
            page_size,
            hint,
            window_size,
            window: None,
            dirty: false,
            timestamp_dirty: false,
        })
    }

    pub fn writable(&self) -> bool {
        !self.read_only
    }

    /// O(1): returns the cached length. Stable between `set_length` calls —
    /// never reads the file to answer this.
    pub fn get_length(&self) -> u64 {
        self.file_length
    }

    pub(crate) fn host_is_little_endian(&self) -> bool {
        self.host_le
    }

    /// Panics only after `close`/`Drop` has already torn the backend down,
    /// which the type system prevents a client from observing: `close`
    /// consumes the `Viewer` by value, so no further call through `&mut self`
    /// can reach here with `backend` already `None`.
    fn backend(&self) -> &FileBackend {
        self.backend.as_ref().expect("viewer used after teardown")
    }

    fn backend_mut(&mut self) -> &mut FileBackend {
        self.backend.as_mut().expect("viewer used after teardown")
    }

    /// Resizes the underlying file. No-op if `new_len` equals the current
    /// length; fatal if the viewer is read-only.
    pub fn set_length(&mut self, new_len: u64) -> Result<(), SetLengthError> {
        if self.read_only {
            self.config
                .fault(FaultKind::WriteOnReadOnly, "set_length on a read-only viewer");
        }
        if new_len == self.file_length {
            return Ok(());
        }
        if new_len > MAX_LEN {
            self.config.fault(
                FaultKind::OffsetOutOfBounds,
                "set_length exceeds MAX_LEN",
            );
        }

        self.invalidate_window();
        self.backend_mut().set_length(new_len).map_err(SetLengthError)?;
        // Only update the cached length once the backend call has actually
        // succeeded: if it fails partway through, the on-disk length may be
        // anything, and the cached value should stay at the last length we
        // know is accurate rather than a target that was never reached.
        self.file_length = new_len;
        self.timestamp_dirty = true;
        self.recompute_window_size();
        Ok(())
    }

    /// Changes the window-size hint. No-op if `new_hint` equals the current
    /// hint; may invalidate the mapped window if the derived window size
    /// changes.
    pub fn set_hint(&mut self, new_hint: i32) {
        if new_hint == self.hint {
            return;
        }
        self.hint = new_hint;
        self.recompute_window_size();
    }

    /// Flushes the mapped window if dirty. No-op otherwise.
    pub fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        if let Some(w) = &self.window {
            if let Err(e) = self.backend().flush_region(&w.region) {
                self.config.warn(WarnKind::Flush, &e.to_string());
            }
        }
        self.dirty = false;
    }

    /// Closes the viewer: flush if dirty, unmap, destroy any mapping
    /// object, stamp mtime if timestamp-dirty, close the file handle.
    /// `Drop` performs the same sequence for a viewer that is simply let go
    /// out of scope; `teardown`'s `backend.take()` guard makes running it
    /// twice (once here, once when this function's `self` then drops) a
    /// no-op the second time.
    pub fn close(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(mut backend) = self.backend.take() else {
            return;
        };
        self.invalidate_window_with(&mut backend);
        backend.destroy_mapping();
        if self.timestamp_dirty {
            if let Err(e) = backend.set_last_modified_now() {
                self.config.warn(WarnKind::TimestampUpdate, &e.to_string());
            }
            self.timestamp_dirty = false;
        }
        if let Err(e) = backend.close() {
            self.config.warn(WarnKind::Close, &e.to_string());
        }
    }

    fn recompute_window_size(&mut self) {
        let new_size = derive_window_size(self.hint, self.page_size, self.file_length);
        if new_size != self.window_size {
            self.window_size = new_size;
            self.invalidate_window();
        }
    }

    /// Unmaps the current window if one is mapped, flushing first if dirty.
    /// Leaves no window mapped. Does not destroy the Windows mapping object;
    /// see `teardown` and `FileBackend::set_length` for that.
    fn invalidate_window(&mut self) {
        let Some(w) = self.window.take() else {
            return;
        };
        if self.dirty {
            if let Err(e) = self.backend_mut().flush_region(&w.region) {
                self.config.warn(WarnKind::Flush, &e.to_string());
            }
            self.dirty = false;
        }
        if let Err(e) = self.backend_mut().unmap_region(w.region) {
            self.config.warn(WarnKind::Unmap, &e.to_string());
        }
    }

    /// Same unmap-if-mapped/flush-if-dirty logic as `invalidate_window`, but
    /// taking the backend as a parameter: `teardown` has already taken it out
    /// of `self` (so it can hand the same backend on to `FileBackend::close`
    /// afterwards) by the time it needs this.
    fn invalidate_window_with(&mut self, backend: &mut FileBackend) {
        let Some(w) = self.window.take() else {
            return;
        };
        if self.dirty {
            if let Err(e) = backend.flush_region(&w.region) {
                self.config.warn(WarnKind::Flush, &e.to_string());
            }
            self.dirty = false;
        }
        if let Err(e) = backend.unmap_region(w.region) {
            self.config.warn(WarnKind::Unmap, &e.to_string());
        }
    }

    /// Ensures the window covers byte offset `b`, remapping on miss. `b`
    /// must be `< file_length`; callers (the typed access layer) check
    /// bounds before calling this.
    fn ensure_window(&mut self, b: u64) {
        if let Some(w) = &self.window {
            if w.first <= b && b <= w.last {
                return;
            }
        }
        let old_bounds = self.window.as_ref().map(|w| (w.first, w.last));
        self.invalidate_window();

        debug_assert!(self.window_size > 0, "file_length == 0 implies no access is ever in-bounds");
        let new_first = (b / self.window_size) * self.window_size;
        let new_len = std::cmp::min(self.window_size, self.file_length - new_first);
        let new_last = new_first + new_len - 1;
        match self
            .backend_mut()
            .map_region(new_first, new_len as usize, !self.read_only)
        {
            Ok(region) => {
                log::debug!(
                    "remapped window: old={old_bounds:?} new=[{new_first}, {new_last}]"
                );
                self.window = Some(Window {
                    region,
                    first: new_first,
                    last: new_last,
                });
            }
            Err(e) => self.config.fault(FaultKind::MapRejected, &e.to_string()),
        }
    }

    /// Reads `out.len()` raw (file-order) bytes starting at `offset`. Aligned
    /// accesses (`offset % out.len() == 0`) take the fast path of a single
    /// window-covering check and a direct copy; unaligned accesses recurse
    /// on two half-width halves, bottoming out at width 1 (always aligned),
    /// which naturally spans window boundaries.
    pub(crate) fn read_raw(&mut self, offset: u64, out: &mut [u8]) {
        let width = out.len() as u64;
        if width == 1 || offset % width == 0 {
            self.ensure_window(offset + width - 1);
            let w = self.window.as_ref().expect("ensure_window just mapped one");
            let start = (offset - w.first) as usize;
            // SAFETY: ensure_window guarantees [offset, offset+width) is
            // mapped and readable.
            let slice = unsafe { w.region.as_slice() };
            out.copy_from_slice(&slice[start..start + out.len()]);
        } else {
            let half = (out.len() / 2) as u64;
            let (lo, hi) = out.split_at_mut(half as usize);
            self.read_raw(offset, lo);
            self.read_raw(offset + half, hi);
        }
    }

    /// Writes `data` as raw (file-order) bytes starting at `offset`. Same
    /// aligned/unaligned split as `read_raw`. Marks the viewer dirty and
    /// timestamp-dirty.
    pub(crate) fn write_raw(&mut self, offset: u64, data: &[u8]) {
        let width = data.len() as u64;
        if width == 1 || offset % width == 0 {
            self.ensure_window(offset + width - 1);
            let w = self.window.as_mut().expect("ensure_window just mapped one");
            let start = (offset - w.first) as usize;
            // SAFETY: ensure_window guarantees [offset, offset+width) is
            // mapped read-write (the caller has already checked the viewer
            // is not read-only).
            let slice = unsafe { w.region.as_mut_slice() };
            slice[start..start + data.len()].copy_from_slice(data);
            self.dirty = true;
            self.timestamp_dirty = true;
        } else {
            let half = (data.len() / 2) as usize;
            self.write_raw(offset, &data[..half]);
            self.write_raw(offset + half as u64, &data[half..]);
        }
    }

    pub(crate) fn fault(&self, kind: FaultKind, message: &str) -> ! {
        self.config.fault(kind, message)
    }

    pub(crate) fn read_only(&self) -> bool {
        self.read_only
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_size_derivation_bounds() {
        // A non-positive hint clamps up to page size.
        assert_eq!(derive_window_size(0, 4096, 1 << 20), 4096);
        assert_eq!(derive_window_size(-1, 4096, 1 << 20), 4096);

        // An oversized hint clamps to the 1 GiB ceiling.
        assert_eq!(derive_window_size(i32::MAX, 4096, u64::MAX / 2), 1 << 30);

        // Rounds up to a page-size multiple.
        assert_eq!(derive_window_size(5000, 4096, 1 << 20), 8192);

        // Capped by file length, possibly down to 0 for an empty file.
        assert_eq!(derive_window_size(DEFAULT_HINT, 4096, 0), 0);
        assert_eq!(derive_window_size(DEFAULT_HINT, 4096, 100), 100);
    }
}
