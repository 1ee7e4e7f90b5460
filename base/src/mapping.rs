// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The platform-agnostic handle to one mapped byte range.

/// A mapped window of a file, as returned by `FileBackend::map_region`.
///
/// `MappedRegion` owns nothing but the address and length; the backend that
/// produced it is responsible for actually tearing down the OS-level
/// mapping in `unmap_region`: the region is a thin view, the backend is the
/// owner.
#[derive(Debug)]
pub struct MappedRegion {
    ptr: *mut u8,
    len: usize,
}

impl MappedRegion {
    /// # Safety
    /// `ptr` must be valid for reads and writes (if `writable`) over `len`
    /// bytes for as long as the returned `MappedRegion` lives, i.e. until
    /// it is passed to `unmap_region`.
    pub unsafe fn new(ptr: *mut u8, len: usize) -> Self {
        MappedRegion { ptr, len }
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the mapped bytes as a slice.
    ///
    /// # Safety
    /// The caller must not hold this alongside a `&mut` view of the same
    /// bytes, and must not call it after `unmap_region` has consumed `self`.
    pub unsafe fn as_slice(&self) -> &[u8] {
        std::slice::from_raw_parts(self.ptr, self.len)
    }

    /// # Safety
    /// Same requirements as `as_slice`, plus the mapping must have been
    /// created with read-write protection.
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        std::slice::from_raw_parts_mut(self.ptr, self.len)
    }
}

// SAFETY: a MappedRegion is just an address and a length; sending it across
// threads is sound as long as the client upholds the single-threaded-access
// contract documented on `Viewer` (no concurrent use of one viewer).
unsafe impl Send for MappedRegion {}
