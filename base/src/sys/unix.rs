// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! POSIX mapping backend: `mmap`/`munmap`/`msync`/`ftruncate`.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::ptr;

use crate::errno::{errno_result, Error, Result};
use crate::mapping::MappedRegion;
use crate::mode::OpenMode;

/// Runs a libc call returning a negative value on error and turns that into
/// an `errno`-sourced `Error`.
macro_rules! syscall {
    ($e:expr) => {{
        let res = $e;
        if res < 0 {
            errno_result()
        } else {
            Ok(res)
        }
    }};
}

pub fn query_page_size() -> Result<usize> {
    // SAFETY: sysconf with a valid name argument has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size < 0 {
        return errno_result();
    }
    Ok(size as usize)
}

/// POSIX has no separate file-mapping object; this collapses into a single
/// open file descriptor.
pub struct FileBackend {
    file: File,
}

impl FileBackend {
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        let mut opts = OpenOptions::new();
        match mode {
            OpenMode::ReadOnlyExisting => {
                opts.read(true);
            }
            OpenMode::ReadWriteExisting => {
                opts.read(true).write(true);
            }
            OpenMode::ReadWriteCreateOrTruncate => {
                opts.read(true).write(true).create(true).truncate(true);
            }
            OpenMode::ReadWriteCreateExclusive => {
                opts.read(true).write(true).create_new(true);
            }
        }
        // Owner/group/other read+write, filtered by umask.
        opts.mode(0o666);
        let file = opts.open(path)?;
        Ok(FileBackend { file })
    }

    pub fn query_length(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Growth: seek-to-last-byte + single-byte write. Shrink: `ftruncate`.
    /// Windows instead uses `SetEndOfFile` for both directions; POSIX has no
    /// single call that extends a file's length without also writing to it,
    /// so growth and shrink take different paths here.
    pub fn set_length(&mut self, new_len: u64) -> Result<()> {
        let current = self.query_length()?;
        let fd = self.file.as_raw_fd();
        if new_len > current {
            if new_len == 0 {
                return Ok(());
            }
            // SAFETY: fd is a valid, open file descriptor owned by `self`.
            unsafe {
                syscall!(libc::lseek(fd, (new_len - 1) as libc::off_t, libc::SEEK_SET))?;
                let zero: u8 = 0;
                syscall!(libc::write(
                    fd,
                    &zero as *const u8 as *const libc::c_void,
                    1
                ))?;
            }
        } else if new_len < current {
            // SAFETY: fd is valid; ftruncate has no other preconditions.
            unsafe {
                syscall!(libc::ftruncate(fd, new_len as libc::off_t))?;
            }
        }
        Ok(())
    }

    /// POSIX folds Windows's separate file-mapping object into `map_region`.
    pub fn create_mapping(&mut self, _writable: bool) -> Result<()> {
        Ok(())
    }

    /// No separate mapping object exists on POSIX; nothing to destroy.
    pub fn destroy_mapping(&mut self) {}

    pub fn map_region(
        &mut self,
        file_offset: u64,
        length: usize,
        writable: bool,
    ) -> Result<MappedRegion> {
        let prot = if writable {
            libc::PROT_READ | libc::PROT_WRITE
        } else {
            libc::PROT_READ
        };
        // SAFETY: fd is valid and open for the requested protection; the
        // caller (the windowing engine) guarantees file_offset is a multiple
        // of the page size and length >= 1.
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                length,
                prot,
                libc::MAP_SHARED,
                self.file.as_raw_fd(),
                file_offset as libc::off_t,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(Error::MapRejected(io::Error::last_os_error()));
        }
        // SAFETY: mmap succeeded and returned `length` valid bytes.
        Ok(unsafe { MappedRegion::new(ptr as *mut u8, length) })
    }

    /// Failure here is non-fatal; the caller logs it as a warning.
    pub fn unmap_region(&self, region: MappedRegion) -> Result<()> {
        // SAFETY: region was produced by a prior, matching map_region call
        // on this same backend and has not already been unmapped.
        let res = unsafe { libc::munmap(region.as_ptr() as *mut libc::c_void, region.len()) };
        if res < 0 {
            return errno_result();
        }
        Ok(())
    }

    /// Failure here is non-fatal; the caller logs it as a warning.
    pub fn flush_region(&self, region: &MappedRegion) -> Result<()> {
        // SAFETY: region is currently mapped and owned by this backend.
        let res = unsafe {
            libc::msync(
                region.as_ptr() as *mut libc::c_void,
                region.len(),
                libc::MS_SYNC,
            )
        };
        if res < 0 {
            return errno_result();
        }
        Ok(())
    }

    pub fn set_last_modified_now(&self) -> Result<()> {
        // SAFETY: fd is valid; a null `times` pointer sets both atime and
        // mtime to the current time.
        let res = unsafe { libc::futimens(self.file.as_raw_fd(), ptr::null()) };
        if res < 0 {
            return errno_result();
        }
        Ok(())
    }

    /// Failure here is non-fatal; the caller logs it as a warning.
    pub fn close(self) -> Result<()> {
        drop(self.file);
        Ok(())
    }
}
