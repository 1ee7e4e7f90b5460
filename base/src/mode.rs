// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Backend-level open modes. `mmview::CreateMode` is the public surface
//! (`ReadOnly`/`Existing`/`Regular`/`Exclusive`); it maps one-to-one onto
//! this enum.

/// How `FileBackend::open` should open the underlying file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// File must already exist; opened read-only.
    ReadOnlyExisting,
    /// File must already exist; opened read-write.
    ReadWriteExisting,
    /// Created if absent, truncated to zero length if present.
    ReadWriteCreateOrTruncate,
    /// Created; fails if the file already exists.
    ReadWriteCreateExclusive,
}

impl OpenMode {
    pub fn is_writable(self) -> bool {
        !matches!(self, OpenMode::ReadOnlyExisting)
    }
}

/// Protection requested for a mapped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    Read,
    ReadWrite,
}
