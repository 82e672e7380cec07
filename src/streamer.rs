use crate::{Error, SeekOrigin, Stream};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A [`Read`]/[`Write`]/[`Seek`] implementation that forwards to a
/// [`Stream`] it owns.
///
/// [`Error::Closed`] on read is end of file, as is a zero-code
/// [`Error::ReadFailed`] from a readable stream, which is how
/// [`MemoryStream`] reports running out of data.
///
/// Seeks go straight to [`Stream::seek`], so they keep the wrapped stream's
/// rules rather than std's. On a [`MemoryStream`], `SeekFrom::End(0)` lands
/// on the last byte (`len - 1`), not one past it, so it can't be used to
/// measure the length; use [`Stream::stream_len`] instead. `SeekFrom::Start`
/// at or past the length fails, and an empty buffer can't be seeked at all.
///
/// [`MemoryStream`]: crate::MemoryStream
#[derive(Debug)]
pub struct IoStreamer<S> {
    inner: S,
}

impl<S: Stream> IoStreamer<S> {
    /// Wraps `inner`.
    #[inline]
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns a reference to the wrapped stream.
    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the wrapped stream.
    #[inline]
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwraps the stream.
    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Stream> Read for IoStreamer<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.inner.read(buf.len()) {
            Ok(bytes) => {
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Err(Error::Closed) => Ok(0),
            Err(Error::ReadFailed(0)) if self.inner.can_read() => Ok(0),
            Err(err) => Err(err.into()),
        }
    }
}

impl<S: Stream> Write for IoStreamer<S> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.inner.write(buf)?)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Stream> Seek for IoStreamer<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, origin) = match pos {
            SeekFrom::Start(offset) => (
                i64::try_from(offset)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?,
                SeekOrigin::Beginning,
            ),
            SeekFrom::Current(offset) => (offset, SeekOrigin::Current),
            SeekFrom::End(offset) => (offset, SeekOrigin::End),
        };
        self.inner.seek(offset, origin)?;
        let position = self.inner.position()?;
        u64::try_from(position).map_err(|err| io::Error::new(io::ErrorKind::Other, err))
    }
}
