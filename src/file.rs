//! Streams over files opened by path.

use crate::{Capabilities, CreationMode, DescriptorStream, Error, Result, SeekOrigin, Stream};
use rustix::fs::{Access, Mode, OFlags, RawMode};
use std::path::{Path, PathBuf};

/// Which directions a [`FileStream`] may transfer data in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FileAccess {
    /// Read only.
    ReadOnly,
    /// Write only.
    WriteOnly,
    /// Read and write.
    #[default]
    ReadWrite,
}

/// What must be true of the target path, and what happens to an existing
/// file, when opening a [`FileStream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Open an existing file for appending. Requires write-only access.
    Append,
    /// Create the file, or truncate it if it exists. Requires write access.
    Create,
    /// Create the file, failing if it exists.
    CreateNew,
    /// Open an existing file.
    Open,
    /// Open the file, creating it if it doesn't exist.
    #[default]
    OpenOrCreate,
    /// Open an existing file and truncate it.
    Truncate,
}

/// The outcome of checking an access/mode pair against the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenPlan {
    flags: OFlags,
    readable: bool,
    writable: bool,
}

/// Resolves `access` and `mode` into open flags, given whether the target
/// path currently exists. Fails without touching the filesystem.
fn plan(access: FileAccess, mode: FileMode, exists: bool) -> Result<OpenPlan> {
    let (mut flags, readable, writable) = match access {
        FileAccess::ReadOnly => (OFlags::RDONLY, true, false),
        FileAccess::WriteOnly => (OFlags::WRONLY, false, true),
        FileAccess::ReadWrite => (OFlags::RDWR, true, true),
    };

    match mode {
        FileMode::Append => {
            if readable {
                return Err(Error::InvalidArgument(
                    "read access not allowed with FileMode::Append",
                ));
            }
            if !exists {
                return Err(Error::FileNotFound);
            }
            flags |= OFlags::APPEND;
        }
        FileMode::Create => {
            if !writable {
                return Err(Error::InvalidArgument(
                    "write access required with FileMode::Create",
                ));
            }
            flags |= if exists { OFlags::TRUNC } else { OFlags::CREATE };
        }
        FileMode::CreateNew => {
            if exists {
                return Err(Error::FileExists);
            }
            // A file created after the check fails the open with `EEXIST`.
            flags |= OFlags::CREATE | OFlags::EXCL;
        }
        FileMode::Open => {
            if !exists {
                return Err(Error::FileNotFound);
            }
        }
        FileMode::OpenOrCreate => {
            if !exists {
                flags |= OFlags::CREATE;
            }
        }
        FileMode::Truncate => {
            if !exists {
                return Err(Error::FileNotFound);
            }
            flags |= OFlags::TRUNC;
        }
    }

    Ok(OpenPlan {
        flags,
        readable,
        writable,
    })
}

/// Options and flags which can be used to configure how a [`FileStream`]
/// is opened.
///
/// Defaults to [`FileMode::OpenOrCreate`], [`FileAccess::ReadWrite`], and a
/// creation mode of `0o644`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    mode: FileMode,
    access: FileAccess,
    creation_mode: CreationMode,
}

impl OpenOptions {
    /// Creates the default set of options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file mode.
    #[inline]
    pub fn mode(&mut self, mode: FileMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Sets the access directions.
    #[inline]
    pub fn access(&mut self, access: FileAccess) -> &mut Self {
        self.access = access;
        self
    }

    /// Sets the permissions given to a newly created file.
    #[inline]
    pub fn creation_mode(&mut self, creation_mode: CreationMode) -> &mut Self {
        self.creation_mode = creation_mode;
        self
    }

    /// Opens the file at `path` with these options.
    ///
    /// Mode preconditions are checked before the file is opened, so
    /// [`Error::FileNotFound`], [`Error::FileExists`], and
    /// [`Error::InvalidArgument`] never leave anything behind on disk.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<FileStream> {
        let path = path.as_ref();
        let exists = rustix::fs::access(path, Access::EXISTS).is_ok();
        let plan = plan(self.access, self.mode, exists)?;
        log::trace!(
            "opening {} ({:?}, {:?}) with {:?}",
            path.display(),
            self.access,
            self.mode,
            plan.flags
        );

        let creation_mode = Mode::from_raw_mode(self.creation_mode.raw() as RawMode);
        let fd = rustix::fs::open(path, plan.flags | OFlags::CLOEXEC, creation_mode).map_err(
            |err| {
                log::debug!("open of {} failed: {}", path.display(), err);
                Error::OpenFailed(err.raw_os_error())
            },
        )?;

        let capabilities = Capabilities {
            read: plan.readable,
            write: plan.writable,
            seek: true,
            timeout: false,
        };
        Ok(FileStream {
            inner: DescriptorStream::new(fd, capabilities),
            path: path.to_owned(),
            mode: self.mode,
            access: self.access,
        })
    }
}

/// A [`Stream`] over a file opened by path.
///
/// Seekable, never honors timeouts, and readable or writable according to
/// its [`FileAccess`].
#[derive(Debug)]
pub struct FileStream {
    inner: DescriptorStream,
    path: PathBuf,
    mode: FileMode,
    access: FileAccess,
}

impl FileStream {
    /// Opens `path` with the given mode and access, using the default
    /// creation mode.
    #[inline]
    pub fn open<P: AsRef<Path>>(path: P, mode: FileMode, access: FileAccess) -> Result<Self> {
        OpenOptions::new().mode(mode).access(access).open(path)
    }

    /// Shorthand for [`OpenOptions::new`].
    #[inline]
    #[must_use]
    pub fn options() -> OpenOptions {
        OpenOptions::new()
    }

    /// The path this stream was opened with.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The mode this stream was opened with.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// The access this stream was opened with.
    #[inline]
    #[must_use]
    pub fn access(&self) -> FileAccess {
        self.access
    }

    /// Consumes the stream, returning the descriptor stream underneath.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> DescriptorStream {
        self.inner
    }
}

impl Stream for FileStream {
    #[inline]
    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities()
    }

    #[inline]
    fn position(&self) -> Result<i64> {
        self.inner.position()
    }

    #[inline]
    fn read_timeout(&self) -> u32 {
        self.inner.read_timeout()
    }

    #[inline]
    fn set_read_timeout(&mut self, millis: u32) {
        self.inner.set_read_timeout(millis)
    }

    #[inline]
    fn write_timeout(&self) -> u32 {
        self.inner.write_timeout()
    }

    #[inline]
    fn set_write_timeout(&mut self, millis: u32) {
        self.inner.set_write_timeout(millis)
    }

    #[inline]
    fn read(&mut self, count: usize) -> Result<Vec<u8>> {
        self.inner.read(count)
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.inner.write(bytes)
    }

    #[inline]
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<()> {
        self.inner.seek(offset, origin)
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
