//! Capability-described byte streams
//!
//! Everything goes through the [`Stream`] trait: four primitives (read,
//! write, seek, close) plus typed and delimited helpers built on them. Pick a
//! backend to get one:
//!
//!  - [`DescriptorStream`] over an OS file descriptor, including the
//!    process's standard streams ([`stdin`], [`stdout`], [`stderr`]),
//!  - [`FileStream`] over a file opened by path with a [`FileMode`] and
//!    [`FileAccess`],
//!  - [`MemoryStream`] over a growable in-memory buffer.
//!
//! [`IoStreamer`] adapts any of them to `std::io::{Read, Write, Seek}`.

#![deny(missing_docs)]

#[cfg(not(windows))]
mod descriptor;
mod error;
#[cfg(not(windows))]
mod file;
mod memory;
mod permissions;
mod stream;
mod streamer;
mod value;

#[cfg(not(windows))]
pub use descriptor::{stderr, stdin, stdout, DescriptorStream};
pub use error::{Error, Result};
#[cfg(not(windows))]
pub use file::{FileAccess, FileMode, FileStream, OpenOptions};
pub use memory::MemoryStream;
pub use permissions::{CreationMode, Permissions};
pub use stream::{Capabilities, SeekOrigin, Stream};
pub use streamer::IoStreamer;
pub use value::FixedSize;
