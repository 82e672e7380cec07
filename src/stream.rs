use crate::value::{to_bytes, FixedSize};
use crate::{Error, Result};

/// The reference point a [`Stream::seek`] offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekOrigin {
    /// The start of the stream.
    Beginning,
    /// The current position.
    Current,
    /// The end of the stream.
    End,
}

/// The operation categories a stream instance supports.
///
/// Fixed when the stream is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Whether [`Stream::read`] may be called.
    pub read: bool,
    /// Whether [`Stream::write`] may be called.
    pub write: bool,
    /// Whether [`Stream::seek`] may be called.
    pub seek: bool,
    /// Whether configured timeouts are honored.
    pub timeout: bool,
}

impl Capabilities {
    /// Every capability enabled.
    pub const ALL: Self = Self {
        read: true,
        write: true,
        seek: true,
        timeout: true,
    };

    /// Everything except writing.
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            write: false,
            ..Self::ALL
        }
    }

    /// Everything except reading.
    #[must_use]
    pub const fn write_only() -> Self {
        Self {
            read: false,
            ..Self::ALL
        }
    }
}

impl Default for Capabilities {
    #[inline]
    fn default() -> Self {
        Self::ALL
    }
}

/// A sequential byte stream with a position.
///
/// Backends implement the four primitives ([`read`], [`write`], [`seek`],
/// [`close`]) and the accessors; every other method is built from those and
/// works the same on any backend.
///
/// Primitives check the relevant capability first and fail with a code of
/// `0` when it's absent. Reads and writes may transfer fewer bytes than
/// requested; [`read_exact`] and [`write_all`] loop until they don't.
///
/// A stream instance is meant to be used from one thread at a time.
///
/// [`read`]: Stream::read
/// [`write`]: Stream::write
/// [`seek`]: Stream::seek
/// [`close`]: Stream::close
/// [`read_exact`]: Stream::read_exact
/// [`write_all`]: Stream::write_all
pub trait Stream {
    /// Returns the capabilities this stream was constructed with.
    fn capabilities(&self) -> Capabilities;

    /// Returns the current offset from the start of the stream.
    fn position(&self) -> Result<i64>;

    /// Returns the read timeout in milliseconds; `0` blocks indefinitely.
    fn read_timeout(&self) -> u32;

    /// Sets the read timeout in milliseconds; `0` blocks indefinitely.
    ///
    /// Only honored when [`Capabilities::timeout`] is set.
    fn set_read_timeout(&mut self, millis: u32);

    /// Returns the write timeout in milliseconds; `0` blocks indefinitely.
    fn write_timeout(&self) -> u32;

    /// Sets the write timeout in milliseconds; `0` blocks indefinitely.
    ///
    /// Only honored when [`Capabilities::timeout`] is set.
    fn set_write_timeout(&mut self, millis: u32);

    /// Reads up to `count` bytes.
    fn read(&mut self, count: usize) -> Result<Vec<u8>>;

    /// Writes some prefix of `bytes`, returning how many were written.
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;

    /// Moves the position to `offset` bytes from `origin`.
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<()>;

    /// Releases the underlying resource.
    fn close(&mut self) -> Result<()>;

    /// Shorthand for `self.capabilities().read`.
    #[inline]
    fn can_read(&self) -> bool {
        self.capabilities().read
    }

    /// Shorthand for `self.capabilities().write`.
    #[inline]
    fn can_write(&self) -> bool {
        self.capabilities().write
    }

    /// Shorthand for `self.capabilities().seek`.
    #[inline]
    fn can_seek(&self) -> bool {
        self.capabilities().seek
    }

    /// Shorthand for `self.capabilities().timeout`.
    #[inline]
    fn can_timeout(&self) -> bool {
        self.capabilities().timeout
    }

    /// Reads exactly `count` bytes, issuing as many reads as it takes.
    fn read_exact(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(count);
        while bytes.len() < count {
            let chunk = self.read(count - bytes.len())?;
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    /// Writes all of `bytes`, issuing as many writes as it takes.
    ///
    /// Fails with [`Error::WriteZero`] if a write accepts nothing.
    fn write_all(&mut self, mut bytes: &[u8]) -> Result<()> {
        while !bytes.is_empty() {
            match self.write(bytes)? {
                0 => return Err(Error::WriteZero),
                n => bytes = &bytes[n..],
            }
        }
        Ok(())
    }

    /// Reads a single byte.
    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact(1)?[0])
    }

    /// Reads a single byte as a signed value.
    #[inline]
    fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_ne_bytes([self.read_u8()?]))
    }

    /// Writes a single byte.
    #[inline]
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])
    }

    /// Writes a single signed byte.
    #[inline]
    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_all(&value.to_ne_bytes())
    }

    /// Reads the byte representation of a `T` and decodes it.
    fn read_value<T: FixedSize>(&mut self) -> Result<T>
    where
        Self: Sized,
    {
        let bytes = self.read_exact(T::SIZE)?;
        Ok(T::decode(&bytes))
    }

    /// Writes the byte representation of `value`.
    fn write_value<T: FixedSize>(&mut self, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.write_all(&to_bytes(value))
    }

    /// Reads bytes up to a NUL byte and decodes them as UTF-8.
    ///
    /// The NUL is consumed but not included.
    fn read_cstring(&mut self) -> Result<String> {
        let bytes = self.read_until(0)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Writes the UTF-8 bytes of `s`.
    ///
    /// No terminator is appended, so this is not the inverse of
    /// [`Stream::read_cstring`] unless the caller also writes a `0` byte.
    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_all(s.as_bytes())
    }

    /// Reads bytes up to `delimiter`, one at a time.
    ///
    /// The delimiter is consumed but not included.
    fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        loop {
            match self.read_u8()? {
                byte if byte == delimiter => return Ok(bytes),
                byte => bytes.push(byte),
            }
        }
    }

    /// Returns the length of the stream's content.
    ///
    /// The default seeks to the end and reports the resulting position, so
    /// the position may be left there.
    fn stream_len(&mut self) -> Result<u64> {
        self.seek(0, SeekOrigin::End)?;
        let end = self.position()?;
        u64::try_from(end).map_err(|_| Error::SeekFailed(0))
    }

    /// Reads the whole content of the stream from the beginning.
    ///
    /// Requires [`Capabilities::seek`]. Leaves the position at the end of
    /// what was read.
    fn read_all(&mut self) -> Result<Vec<u8>> {
        let len = self.stream_len()?;
        self.seek(0, SeekOrigin::Beginning)?;
        let len = usize::try_from(len).map_err(|_| Error::ReadFailed(0))?;
        if len == 0 {
            return Ok(Vec::new());
        }
        self.read_exact(len)
    }
}
