// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Platform split for the mapping backend.
//!
//! A single abstract capability — open/close a file handle, query/set its
//! length, map/unmap/flush a byte range, stamp its mtime — with two
//! implementations selected at build time via `cfg_if!`, exactly as
//! crosvm's own `base` crate splits into `sys::unix`/`sys::windows`. Neither
//! `Viewer` (in the `mmview` crate) nor anything above this module needs to
//! know which one is active.

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        pub use unix::*;
    } else if #[cfg(windows)] {
        mod windows;
        pub use windows::*;
    } else {
        compile_error!("mmview's base crate supports only unix and windows targets");
    }
}
