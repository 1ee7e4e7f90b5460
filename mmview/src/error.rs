// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The three-tier error model: reported errors (ordinary `Result`s), fatal
//! faults (installable handler, default aborts), and warnings (installable
//! handler, default logs and continues).
//!
//! Rather than process-wide function pointers, handlers are primarily
//! configured per-viewer through `ViewerConfig`, passed at `Viewer::create`.
//! We keep a "last writer wins" process-wide registry (documented, rather
//! than left as an implicit surprise) for callers who don't thread a
//! `ViewerConfig` through every call site, but passing handlers explicitly at
//! creation is the primary, recommended path.

use std::sync::RwLock;

use once_cell::sync::Lazy;

/// Reported errors from `Viewer::create`.
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("path contains a byte that cannot be represented in the host's native path encoding")]
    PathTranslate,

    #[error("failed to open the file: {0}")]
    Open(#[from] base::Error),

    #[error("failed to query the file's length: {0}")]
    LenQuery(base::Error),
}

impl CreateError {
    /// A short, static description of the error, for callers that want a
    /// plain string rather than matching on the enum or using `Display`
    /// (which also includes the wrapped OS error's own message).
    pub fn errstr(&self) -> &'static str {
        match self {
            CreateError::PathTranslate => "path encoding conversion failed",
            CreateError::Open(_) => "failed to open the file",
            CreateError::LenQuery(_) => "failed to query the file's length",
        }
    }
}

/// Reported error from `Viewer::set_length`.
#[derive(Debug, thiserror::Error)]
#[error("failed to resize the file: {0}")]
pub struct SetLengthError(#[from] pub base::Error);

/// A fatal fault: a programming error or invariant violation. Distinguished
/// from `CreateError`/`SetLengthError` because it can never be locally
/// recovered from; see `FaultHandler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    NullViewer,
    OffsetOutOfBounds,
    WriteOnReadOnly,
    NotTwosComplement,
    BadPageSize,
    MapRejected,
    AllocationFailure,
}

impl FaultKind {
    /// A short, static description of the fault kind, independent of the
    /// caller-supplied message passed alongside it to `FaultHandler`.
    pub fn errstr(&self) -> &'static str {
        match self {
            FaultKind::NullViewer => "null viewer handle",
            FaultKind::OffsetOutOfBounds => "offset out of bounds",
            FaultKind::WriteOnReadOnly => "write attempted on a read-only viewer",
            FaultKind::NotTwosComplement => "host is not two's-complement",
            FaultKind::BadPageSize => "host page size is invalid",
            FaultKind::MapRejected => "the OS rejected a mapping request",
            FaultKind::AllocationFailure => "allocation failure",
        }
    }
}

/// A non-fatal teardown failure: a failing unmap, flush, or close during
/// `Viewer::close` or a window remap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnKind {
    Unmap,
    Flush,
    Close,
    TimestampUpdate,
}

impl WarnKind {
    /// A short, static description of the warning kind.
    pub fn errstr(&self) -> &'static str {
        match self {
            WarnKind::Unmap => "failed to unmap the window",
            WarnKind::Flush => "failed to flush the window",
            WarnKind::Close => "failed to close the file handle",
            WarnKind::TimestampUpdate => "failed to update the file's modification time",
        }
    }
}

/// Invoked on a fatal fault. The default implementation logs at `error`
/// level and aborts the process — these cannot be locally recovered from,
/// and continuing risks corrupting the viewer's state.
pub type FaultHandler = Box<dyn Fn(FaultKind, &str) -> ! + Send + Sync>;

/// Invoked on a non-fatal warning. The default logs at `warn` level and
/// returns, allowing teardown to keep making progress.
pub type WarnHandler = Box<dyn Fn(WarnKind, &str) + Send + Sync>;

fn default_fault_handler(kind: FaultKind, message: &str) -> ! {
    log::error!("mmview: fatal fault {kind:?}: {message}");
    std::process::abort();
}

fn default_warn_handler(kind: WarnKind, message: &str) {
    log::warn!("mmview: warning {kind:?}: {message}");
}

static FAULT_HANDLER: Lazy<RwLock<FaultHandler>> =
    Lazy::new(|| RwLock::new(Box::new(default_fault_handler)));
static WARN_HANDLER: Lazy<RwLock<WarnHandler>> =
    Lazy::new(|| RwLock::new(Box::new(default_warn_handler)));

/// Installs a process-wide fault handler. Last writer wins: a later call
/// from anywhere in the process replaces an earlier one. Prefer passing a
/// handler through `ViewerConfig` at `Viewer::create` when possible; this is
/// for callers who can't thread one through every call site.
pub fn install_fault_handler(handler: FaultHandler) {
    *FAULT_HANDLER.write().unwrap() = handler;
}

/// Installs a process-wide warn handler. Same "last writer wins" semantics
/// as `install_fault_handler`.
pub fn install_warn_handler(handler: WarnHandler) {
    *WARN_HANDLER.write().unwrap() = handler;
}

/// Per-viewer handler overrides, passed at creation. Falls back to the
/// process-wide registry above when `None`.
#[derive(Default)]
pub struct ViewerConfig {
    pub fault_handler: Option<FaultHandler>,
    pub warn_handler: Option<WarnHandler>,
}

impl ViewerConfig {
    pub(crate) fn fault(&self, kind: FaultKind, message: &str) -> ! {
        match &self.fault_handler {
            Some(handler) => handler(kind, message),
            None => (FAULT_HANDLER.read().unwrap())(kind, message),
        }
    }

    pub(crate) fn warn(&self, kind: WarnKind, message: &str) {
        match &self.warn_handler {
            Some(handler) => handler(kind, message),
            None => (WARN_HANDLER.read().unwrap())(kind, message),
        }
    }
}
