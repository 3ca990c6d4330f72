//! OS locking backends.
//!
//! Two platform families expose different advisory locking APIs. Rather than
//! branching on the platform at every call site, the lock picks a
//! [`LockBackend`] once and routes every lock and unlock through it.

use std::fs::File;
use std::io;

/// Whether an acquisition may wait for the current holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Wait until the OS grants the lock.
    Blocking,
    /// Fail immediately if the lock is held elsewhere.
    NonBlocking,
}

/// Advisory locking capability of the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockBackend {
    /// POSIX-style whole-file `flock(LOCK_EX)`.
    Flock,

    /// Windows-style record lock on a single byte at offset 0 (`LockFileEx`).
    RecordLock,
}

impl LockBackend {
    /// Returns the backend supported by the platform this binary was built for.
    pub fn detect() -> Self {
        if cfg!(windows) {
            LockBackend::RecordLock
        } else {
            LockBackend::Flock
        }
    }

    /// Returns `true` if this backend can be used on the current platform.
    pub fn is_supported(self) -> bool {
        match self {
            LockBackend::Flock => cfg!(unix),
            LockBackend::RecordLock => cfg!(windows),
        }
    }

    /// Applies an exclusive lock to `file`.
    ///
    /// Returns `Ok(false)` when the lock is held elsewhere and `mode` is
    /// [`LockMode::NonBlocking`].
    pub(crate) fn lock(self, file: &File, mode: LockMode) -> io::Result<bool> {
        match self {
            #[cfg(unix)]
            LockBackend::Flock => flock::lock(file, mode),
            #[cfg(windows)]
            LockBackend::RecordLock => record::lock(file, mode),
            #[allow(unreachable_patterns)]
            other => {
                let _ = (file, mode);
                Err(other.unsupported())
            }
        }
    }

    /// Releases the lock held on `file`.
    pub(crate) fn unlock(self, file: &File) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            LockBackend::Flock => flock::unlock(file),
            #[cfg(windows)]
            LockBackend::RecordLock => record::unlock(file),
            #[allow(unreachable_patterns)]
            other => {
                let _ = file;
                Err(other.unsupported())
            }
        }
    }

    #[allow(dead_code)]
    fn unsupported(self) -> io::Error {
        io::Error::new(
            io::ErrorKind::Unsupported,
            format!("{:?} locking is not available on this platform", self),
        )
    }
}

impl Default for LockBackend {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(unix)]
mod flock {
    use super::LockMode;
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;

    pub(super) fn lock(file: &File, mode: LockMode) -> io::Result<bool> {
        let mut operation = libc::LOCK_EX;
        if mode == LockMode::NonBlocking {
            operation |= libc::LOCK_NB;
        }

        loop {
            // SAFETY: flock is a standard POSIX call and the descriptor is
            // owned by `file`, which outlives this call.
            let result = unsafe { libc::flock(file.as_raw_fd(), operation) };
            if result == 0 {
                return Ok(true);
            }

            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                io::ErrorKind::WouldBlock => return Ok(false),
                _ if err.raw_os_error() == Some(libc::EWOULDBLOCK) => return Ok(false),
                _ => return Err(err),
            }
        }
    }

    pub(super) fn unlock(file: &File) -> io::Result<()> {
        // SAFETY: see `lock`.
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

#[cfg(windows)]
mod record {
    use super::LockMode;
    use std::fs::File;
    use std::io;
    use std::os::windows::io::AsRawHandle;
    use windows_sys::Win32::Foundation::{ERROR_LOCK_VIOLATION, HANDLE};
    use windows_sys::Win32::Storage::FileSystem::{
        LockFileEx, UnlockFileEx, LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY,
    };
    use windows_sys::Win32::System::IO::OVERLAPPED;

    pub(super) fn lock(file: &File, mode: LockMode) -> io::Result<bool> {
        let mut flags = LOCKFILE_EXCLUSIVE_LOCK;
        if mode == LockMode::NonBlocking {
            flags |= LOCKFILE_FAIL_IMMEDIATELY;
        }

        // SAFETY: OVERLAPPED is plain data; all-zero selects offset 0.
        let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
        // SAFETY: the handle is owned by `file` and `overlapped` lives across
        // the call, which completes synchronously on a non-overlapped handle.
        let ok = unsafe {
            LockFileEx(
                file.as_raw_handle() as HANDLE,
                flags,
                0,
                1,
                0,
                &mut overlapped,
            )
        };
        if ok != 0 {
            return Ok(true);
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(ERROR_LOCK_VIOLATION as i32) {
            Ok(false)
        } else {
            Err(err)
        }
    }

    pub(super) fn unlock(file: &File) -> io::Result<()> {
        // SAFETY: see `lock`.
        let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
        // SAFETY: see `lock`.
        let ok = unsafe { UnlockFileEx(file.as_raw_handle() as HANDLE, 0, 1, 0, &mut overlapped) };
        if ok != 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}
