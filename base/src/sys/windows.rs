// Copyright 2026 The mmview Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Windows mapping backend: `CreateFileMapping`/`MapViewOfFile`/
//! `FlushViewOfFile`/`SetEndOfFile`.
//!
//! Windows distinguishes a *file-mapping object* from a *view* over it;
//! `mapping_handle` below is that object, created lazily and destroyed on
//! close or resize, independent of whatever view is currently mapped.

use std::fs::{File, OpenOptions};
use std::io;
use std::mem;
use std::os::windows::fs::OpenOptionsExt;
use std::os::windows::io::AsRawHandle;
use std::path::Path;
use std::ptr;

use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::fileapi::{SetEndOfFile, SetFilePointerEx, SetFileTime};
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::memoryapi::{
    CreateFileMappingW, FlushViewOfFile, MapViewOfFile, UnmapViewOfFile, FILE_MAP_READ,
    FILE_MAP_WRITE,
};
use winapi::um::sysinfoapi::{GetSystemInfo, GetSystemTimeAsFileTime, SYSTEM_INFO};
use winapi::um::winbase::FILE_BEGIN;
use winapi::um::winnt::{HANDLE, PAGE_READONLY, PAGE_READWRITE};

use crate::errno::{errno_result, Error, Result};
use crate::mapping::MappedRegion;
use crate::mode::OpenMode;

pub fn query_page_size() -> Result<usize> {
    // SAFETY: `info` is a plain-old-data struct GetSystemInfo fills in fully.
    let info: SYSTEM_INFO = unsafe {
        let mut info = mem::zeroed();
        GetSystemInfo(&mut info);
        info
    };
    Ok(info.dwAllocationGranularity as usize)
}

pub struct FileBackend {
    file: File,
    mapping_handle: Option<HANDLE>,
}

// SAFETY: HANDLE is an opaque kernel handle; FileBackend's methods require
// `&mut self` for anything that mutates `mapping_handle`, so there is no
// unsynchronized concurrent access as long as the client upholds the
// single-threaded-access contract documented on `Viewer`.
unsafe impl Send for FileBackend {}

impl FileBackend {
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        use winapi::um::winnt::{FILE_SHARE_READ, GENERIC_READ, GENERIC_WRITE};

        let mut opts = OpenOptions::new();
        match mode {
            OpenMode::ReadOnlyExisting => {
                opts.read(true)
                    .access_mode(GENERIC_READ)
                    .share_mode(FILE_SHARE_READ);
            }
            OpenMode::ReadWriteExisting => {
                opts.read(true)
                    .write(true)
                    .access_mode(GENERIC_READ | GENERIC_WRITE)
                    .share_mode(0);
            }
            OpenMode::ReadWriteCreateOrTruncate => {
                opts.read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .access_mode(GENERIC_READ | GENERIC_WRITE)
                    .share_mode(0);
            }
            OpenMode::ReadWriteCreateExclusive => {
                opts.read(true)
                    .write(true)
                    .create_new(true)
                    .access_mode(GENERIC_READ | GENERIC_WRITE)
                    .share_mode(0);
            }
        }
        let file = opts.open(path)?;
        Ok(FileBackend {
            file,
            mapping_handle: None,
        })
    }

    pub fn query_length(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn set_length(&mut self, new_len: u64) -> Result<()> {
        self.destroy_mapping_object();
        let handle = self.file.as_raw_handle() as HANDLE;
        let mut distance = winapi::um::winnt::LARGE_INTEGER::default();
        // SAFETY: `distance` is a valid LARGE_INTEGER; handle is open.
        unsafe {
            *distance.QuadPart_mut() = new_len as i64;
            if SetFilePointerEx(handle, distance, ptr::null_mut(), FILE_BEGIN) == FALSE {
                return errno_result();
            }
            if SetEndOfFile(handle) == FALSE {
                return errno_result();
            }
        }
        Ok(())
    }

    /// Lazily creates the Windows file-mapping object for this file, sized
    /// to the file's current length. Destroyed by `set_length` and `close`.
    pub fn create_mapping(&mut self, writable: bool) -> Result<()> {
        if self.mapping_handle.is_some() {
            return Ok(());
        }
        let protect: DWORD = if writable {
            PAGE_READWRITE
        } else {
            PAGE_READONLY
        };
        let handle = self.file.as_raw_handle() as HANDLE;
        // SAFETY: handle is a valid, open file handle; a null size means
        // "map the whole current file length".
        let mapping = unsafe {
            CreateFileMappingW(handle, ptr::null_mut(), protect, 0, 0, ptr::null())
        };
        if mapping.is_null() || mapping == INVALID_HANDLE_VALUE {
            return errno_result();
        }
        self.mapping_handle = Some(mapping);
        Ok(())
    }

    pub fn map_region(
        &mut self,
        file_offset: u64,
        length: usize,
        writable: bool,
    ) -> Result<MappedRegion> {
        self.create_mapping(writable)?;
        let mapping = self.mapping_handle.expect("create_mapping just populated this");
        let access = if writable {
            FILE_MAP_WRITE | FILE_MAP_READ
        } else {
            FILE_MAP_READ
        };
        let offset_high = (file_offset >> 32) as DWORD;
        let offset_low = (file_offset & 0xFFFF_FFFF) as DWORD;
        // SAFETY: `mapping` is valid; the Windowing Engine guarantees
        // file_offset is a multiple of the allocation granularity.
        let ptr = unsafe { MapViewOfFile(mapping, access, offset_high, offset_low, length) };
        if ptr.is_null() {
            return Err(Error::MapRejected(io::Error::last_os_error()));
        }
        // SAFETY: MapViewOfFile succeeded and reserved `length` valid bytes.
        Ok(unsafe { MappedRegion::new(ptr as *mut u8, length) })
    }

    /// Failure here is non-fatal; the caller logs it as a warning.
    pub fn unmap_region(&self, region: MappedRegion) -> Result<()> {
        // SAFETY: region was produced by a prior map_region call on this
        // same backend's current mapping object and has not been unmapped.
        let ok = unsafe { UnmapViewOfFile(region.as_ptr() as *mut _) };
        if ok == FALSE {
            return errno_result();
        }
        Ok(())
    }

    /// Failure here is non-fatal; the caller logs it as a warning.
    pub fn flush_region(&self, region: &MappedRegion) -> Result<()> {
        // SAFETY: region is currently mapped.
        let ok = unsafe { FlushViewOfFile(region.as_ptr() as *const _, region.len()) };
        if ok == FALSE {
            return errno_result();
        }
        Ok(())
    }

    pub fn set_last_modified_now(&self) -> Result<()> {
        let handle = self.file.as_raw_handle() as HANDLE;
        // SAFETY: `now` is a valid out-param for GetSystemTimeAsFileTime;
        // handle is open.
        unsafe {
            let mut now = mem::zeroed();
            GetSystemTimeAsFileTime(&mut now);
            if SetFileTime(handle, ptr::null(), ptr::null(), &now) == FALSE {
                return errno_result();
            }
        }
        Ok(())
    }

    /// Destroys the file-mapping object, if one exists. Called on resize
    /// and on close; ordinary remaps that only change which view is mapped
    /// leave the mapping object alone.
    pub fn destroy_mapping(&mut self) {
        self.destroy_mapping_object();
    }

    fn destroy_mapping_object(&mut self) {
        if let Some(mapping) = self.mapping_handle.take() {
            // SAFETY: mapping is a valid handle owned by this backend and no
            // view derived from it is still mapped (callers unmap first).
            unsafe {
                CloseHandle(mapping);
            }
        }
    }

    /// Failure here is non-fatal; the caller logs it as a warning.
    pub fn close(mut self) -> Result<()> {
        self.destroy_mapping_object();
        drop(self.file);
        Ok(())
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        self.destroy_mapping_object();
    }
}
