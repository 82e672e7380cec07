use crate::{Capabilities, Error, Result, SeekOrigin, Stream};
use std::cmp::min;

/// A [`Stream`] over a growable in-memory buffer.
///
/// Always readable, writable, and seekable; timeouts are stored but never
/// apply.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    buffer: Vec<u8>,
    position: i64,
    read_timeout: u32,
    write_timeout: u32,
}

impl MemoryStream {
    /// Creates an empty stream.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the underlying buffer.
    #[inline]
    #[must_use]
    pub fn get_ref(&self) -> &Vec<u8> {
        &self.buffer
    }

    /// Returns a mutable reference to the underlying buffer.
    ///
    /// Shrinking the buffer below the current position is allowed; the next
    /// write zero-fills the gap.
    #[inline]
    pub fn get_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }

    /// Consumes the stream, returning the underlying buffer.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Returns the number of bytes in the buffer.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    // `position` is never negative; seeks reject negative targets.
    #[inline]
    fn offset(&self) -> usize {
        usize::try_from(self.position).unwrap_or(usize::MAX)
    }
}

impl From<Vec<u8>> for MemoryStream {
    /// Wraps `buffer`, positioned at its start.
    #[inline]
    fn from(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            ..Self::default()
        }
    }
}

impl Stream for MemoryStream {
    #[inline]
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            timeout: false,
            ..Capabilities::ALL
        }
    }

    #[inline]
    fn position(&self) -> Result<i64> {
        Ok(self.position)
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
        let at: &[u8] = self.buffer.get(self.offset()..).unwrap_or(&[]);
        let len = min(at.len(), count);
        if len == 0 {
            return Err(Error::ReadFailed(0));
        }
        let bytes = at[..len].to_vec();
        self.position += len as i64;
        Ok(bytes)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let start = self.offset();
        let end = start
            .checked_add(bytes.len())
            .ok_or(Error::WriteFailed(0))?;
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[start..end].copy_from_slice(bytes);
        self.position += bytes.len() as i64;
        Ok(bytes.len())
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<()> {
        let len = i64::try_from(self.buffer.len()).map_err(|_| Error::SeekFailed(0))?;
        // `End` is measured from the last byte, not one past it.
        let reference = match origin {
            SeekOrigin::Beginning => 0,
            SeekOrigin::Current => self.position,
            SeekOrigin::End => len - 1,
        };
        let target = reference
            .checked_add(offset)
            .ok_or(Error::SeekFailed(0))?;
        if target < 0 || target >= len {
            return Err(Error::SeekFailed(0));
        }
        self.position = target;
        Ok(())
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn stream_len(&mut self) -> Result<u64> {
        Ok(self.buffer.len() as u64)
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        self.position = self.buffer.len() as i64;
        Ok(self.buffer.clone())
    }
}
