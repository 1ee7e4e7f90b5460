// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Random-access typed-integer load/store against an ordinary on-disk file,
//! backed by a sliding memory-mapped window.
//!
//! Open a file with [`Viewer::create`], optionally [`Viewer::set_length`] or
//! [`Viewer::set_hint`] it, then read or write 8/16/32/64-bit signed or
//! unsigned integers at arbitrary byte offsets in either byte order with the
//! functions in [`access`]. The viewer transparently remaps its window as
//! accessed offsets move across the file; clients never see the window
//! directly.
//!
//! A `Viewer` is not thread-safe: every operation on one `Viewer` must be
//! externally serialized by the client (it may be *moved* between threads,
//! just not shared). Separate viewers on separate files have no shared
//! state and may be used concurrently without coordination.

mod access;
mod error;
mod mode;
mod window;

pub use access::{
    read16s, read16u, read32s, read32u, read64s, read64u, read8s, read8u, write16s, write16u,
    write32s, write32u, write64s, write64u, write8s, write8u,
};
pub use error::{
    install_fault_handler, install_warn_handler, CreateError, FaultHandler, FaultKind,
    SetLengthError, ViewerConfig, WarnHandler, WarnKind,
};
pub use mode::CreateMode;
pub use window::{Viewer, DEFAULT_HINT, MAX_LEN};
