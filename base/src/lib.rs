// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Platform probe and mapping-backend primitives underlying `mmview`.
//!
//! This crate has no opinion on windowing, dirty tracking, or typed integer
//! access — that's `mmview`, built on top. `base` only knows how to open a
//! file, ask the OS how big it is or make it a different size, and map,
//! unmap, or flush a byte range. See `sys` for the platform split.

mod errno;
mod mapping;
pub mod mode;
pub mod probe;
pub mod sys;

pub use errno::{errno_result, Error, Result};
pub use mapping::MappedRegion;
pub use mode::{OpenMode, Protection};
pub use sys::FileBackend;
