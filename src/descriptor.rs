//! Streams over raw OS file descriptors.

use crate::{Capabilities, Error, Result, SeekOrigin, Stream};
use rustix::event::{poll, PollFd, PollFlags};
use rustix::fd::{AsFd, BorrowedFd, IntoRawFd, OwnedFd};
use rustix::fs::SeekFrom;
use rustix::io::Errno;
use std::io;
use std::sync::{Mutex, OnceLock};

// Upper bound on the buffer a single `read` allocates.
const MAX_READ_CHUNK: usize = 1 << 20;

#[derive(Debug)]
enum Handle {
    Owned(OwnedFd),
    // The process's standard descriptors, which outlive every stream.
    Standard(BorrowedFd<'static>),
}

impl AsFd for Handle {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            Self::Owned(fd) => fd.as_fd(),
            Self::Standard(fd) => fd.as_fd(),
        }
    }
}

/// A [`Stream`] that reads and writes a file descriptor directly.
///
/// Every primitive is a single syscall. When [`Capabilities::timeout`] is set
/// and a timeout is configured, reads and writes first `poll` the
/// descriptor for readiness.
///
/// After [`close`], every operation fails with [`Error::Closed`].
///
/// [`close`]: Stream::close
#[derive(Debug)]
pub struct DescriptorStream {
    handle: Option<Handle>,
    capabilities: Capabilities,
    read_timeout: u32,
    write_timeout: u32,
}

impl DescriptorStream {
    /// Takes ownership of `fd`; it's closed by [`Stream::close`] or on drop.
    #[inline]
    #[must_use]
    pub fn new(fd: OwnedFd, capabilities: Capabilities) -> Self {
        Self::with_handle(Handle::Owned(fd), capabilities)
    }

    /// A stream over the process's standard input, which can't be written.
    #[must_use]
    pub fn stdin() -> Self {
        Self::with_handle(
            Handle::Standard(rustix::stdio::stdin()),
            Capabilities::read_only(),
        )
    }

    /// A stream over the process's standard output, which can't be read.
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_handle(
            Handle::Standard(rustix::stdio::stdout()),
            Capabilities::write_only(),
        )
    }

    /// A stream over the process's standard error, which can't be read.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_handle(
            Handle::Standard(rustix::stdio::stderr()),
            Capabilities::write_only(),
        )
    }

    #[inline]
    fn with_handle(handle: Handle, capabilities: Capabilities) -> Self {
        Self {
            handle: Some(handle),
            capabilities,
            read_timeout: 0,
            write_timeout: 0,
        }
    }

    /// Borrows the descriptor, or fails with [`Error::Closed`] once the
    /// stream has been closed.
    #[inline]
    pub fn descriptor(&self) -> Result<BorrowedFd<'_>> {
        self.handle
            .as_ref()
            .map(AsFd::as_fd)
            .ok_or(Error::Closed)
    }

    /// Returns `true` once [`Stream::close`] has succeeded.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }
}

/// Waits up to `millis` for `fd` to report `events`.
fn wait_ready(
    fd: BorrowedFd<'_>,
    events: PollFlags,
    millis: u32,
    on_error: fn(i32) -> Error,
) -> Result<()> {
    let mut fds = [PollFd::new(&fd, events)];
    let timeout = i32::try_from(millis).unwrap_or(i32::MAX);
    match poll(&mut fds, timeout) {
        Ok(0) => {
            log::debug!("fd {:?} not ready for {:?} after {}ms", fd, events, millis);
            Err(Error::TimedOut)
        }
        Ok(_) => Ok(()),
        Err(err) => Err(on_error(err.raw_os_error())),
    }
}

impl Stream for DescriptorStream {
    #[inline]
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn position(&self) -> Result<i64> {
        let offset =
            rustix::fs::tell(self.descriptor()?).map_err(|e| Error::SeekFailed(e.raw_os_error()))?;
        i64::try_from(offset).map_err(|_| Error::SeekFailed(Errno::OVERFLOW.raw_os_error()))
    }

    #[inline]
    fn read_timeout(&self) -> u32 {
        self.read_timeout
    }

    #[inline]
    fn set_read_timeout(&mut self, millis: u32) {
        self.read_timeout = millis;
    }

    #[inline]
    fn write_timeout(&self) -> u32 {
        self.write_timeout
    }

    #[inline]
    fn set_write_timeout(&mut self, millis: u32) {
        self.write_timeout = millis;
    }

    fn read(&mut self, count: usize) -> Result<Vec<u8>> {
        if !self.capabilities.read {
            return Err(Error::ReadFailed(0));
        }
        let fd = self.descriptor()?;
        if count == 0 {
            return Ok(Vec::new());
        }
        if self.read_timeout != 0 && self.capabilities.timeout {
            wait_ready(fd, PollFlags::IN, self.read_timeout, Error::ReadFailed)?;
        }

        let mut bytes = vec![0_u8; count.min(MAX_READ_CHUNK)];
        let n = rustix::io::read(fd, &mut bytes).map_err(|e| Error::ReadFailed(e.raw_os_error()))?;
        // A zero-length read means the other end is gone, not that no data
        // is available yet.
        if n == 0 {
            return Err(Error::Closed);
        }
        bytes.truncate(n);
        Ok(bytes)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if !self.capabilities.write {
            return Err(Error::WriteFailed(0));
        }
        let fd = self.descriptor()?;
        if self.write_timeout != 0 && self.capabilities.timeout {
            wait_ready(fd, PollFlags::OUT, self.write_timeout, Error::WriteFailed)?;
        }

        rustix::io::write(fd, bytes).map_err(|e| Error::WriteFailed(e.raw_os_error()))
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<()> {
        if !self.capabilities.seek {
            return Err(Error::SeekFailed(0));
        }
        let fd = self.descriptor()?;
        let pos = match origin {
            SeekOrigin::Beginning => SeekFrom::Start(
                u64::try_from(offset).map_err(|_| Error::SeekFailed(Errno::INVAL.raw_os_error()))?,
            ),
            SeekOrigin::Current => SeekFrom::Current(offset),
            SeekOrigin::End => SeekFrom::End(offset),
        };

        rustix::fs::seek(fd, pos).map_err(|e| Error::SeekFailed(e.raw_os_error()))?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        match self.handle.take().ok_or(Error::Closed)? {
            Handle::Owned(fd) => {
                log::trace!("closing fd {:?}", fd);
                // `OwnedFd` discards the result of `close(2)`, so close the
                // raw descriptor instead.
                let raw = fd.into_raw_fd();
                if unsafe { libc::close(raw) } == -1 {
                    let code = io::Error::last_os_error()
                        .raw_os_error()
                        .unwrap_or(libc::EIO);
                    log::debug!("close of fd {} failed: os error {}", raw, code);
                    return Err(Error::CloseFailed(code));
                }
            }
            Handle::Standard(fd) => log::trace!("detaching from standard fd {:?}", fd),
        }
        Ok(())
    }
}

/// The process-wide standard input stream.
pub fn stdin() -> &'static Mutex<DescriptorStream> {
    static STDIN: OnceLock<Mutex<DescriptorStream>> = OnceLock::new();
    STDIN.get_or_init(|| Mutex::new(DescriptorStream::stdin()))
}

/// The process-wide standard output stream.
pub fn stdout() -> &'static Mutex<DescriptorStream> {
    static STDOUT: OnceLock<Mutex<DescriptorStream>> = OnceLock::new();
    STDOUT.get_or_init(|| Mutex::new(DescriptorStream::stdout()))
}

/// The process-wide standard error stream.
pub fn stderr() -> &'static Mutex<DescriptorStream> {
    static STDERR: OnceLock<Mutex<DescriptorStream>> = OnceLock::new();
    STDERR.get_or_init(|| Mutex::new(DescriptorStream::stderr()))
}
