// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Public creation modes.

use base::OpenMode;

/// One of the four ways a `Viewer` can be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// File must exist; opened read-only.
    ReadOnly,
    /// File must exist; opened read-write, not truncated.
    Existing,
    /// Created if absent; truncated to zero length if already present.
    Regular,
    /// File must *not* already exist.
    Exclusive,
}

impl CreateMode {
    pub fn is_writable(self) -> bool {
        !matches!(self, CreateMode::ReadOnly)
    }

    pub(crate) fn to_open_mode(self) -> OpenMode {
        match self {
            CreateMode::ReadOnly => OpenMode::ReadOnlyExisting,
            CreateMode::Existing => OpenMode::ReadWriteExisting,
            CreateMode::Regular => OpenMode::ReadWriteCreateOrTruncate,
            CreateMode::Exclusive => OpenMode::ReadWriteCreateExclusive,
        }
    }
}
