//! The permission bits handed to the OS when a file is created.

use std::fmt;

/// Read, write, and execute bits for one class of user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Permissions {
    /// May read.
    pub read: bool,
    /// May write.
    pub write: bool,
    /// May execute.
    pub execute: bool,
}

impl Permissions {
    /// No access.
    pub const NONE: Self = Self::from_bits(0);
    /// Read only.
    pub const READ: Self = Self::from_bits(0o4);
    /// Read and write.
    pub const READ_WRITE: Self = Self::from_bits(0o6);
    /// Read, write, and execute.
    pub const ALL: Self = Self::from_bits(0o7);

    /// Decodes the low three bits of `bits` in `rwx` order.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            read: bits & 0o4 != 0,
            write: bits & 0o2 != 0,
            execute: bits & 0o1 != 0,
        }
    }

    /// Encodes these permissions as three `rwx` bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        (self.read as u32) << 2 | (self.write as u32) << 1 | self.execute as u32
    }
}

/// A creation-mode value, as taken by `open(2)` when `O_CREAT` is given.
///
/// Only the permission bits and the setuid, setgid, and sticky bits are
/// kept. The value is passed to the OS unchanged, so the process umask
/// still applies.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CreationMode(u32);

const SETUID: u32 = 0o4000;
const SETGID: u32 = 0o2000;
const STICKY: u32 = 0o1000;
const MASK: u32 = 0o7777;

impl CreationMode {
    /// Builds a mode from a raw value, discarding bits above the special
    /// bits.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw & MASK)
    }

    /// Builds a mode from per-class permissions with no special bits.
    #[must_use]
    pub const fn new(owner: Permissions, group: Permissions, other: Permissions) -> Self {
        Self(owner.bits() << 6 | group.bits() << 3 | other.bits())
    }

    /// Parses three or four octal digits, such as `"644"` or `"4755"`.
    #[must_use]
    pub fn from_octal(digits: &str) -> Option<Self> {
        if !matches!(digits.len(), 3 | 4) || !digits.bytes().all(|b| matches!(b, b'0'..=b'7')) {
            return None;
        }
        u32::from_str_radix(digits, 8).ok().map(Self)
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the value in octal, without a leading `0o`.
    #[must_use]
    pub fn to_octal(self) -> String {
        format!("{:o}", self.0)
    }

    /// Permissions for the file's owner.
    #[inline]
    #[must_use]
    pub const fn owner(self) -> Permissions {
        Permissions::from_bits(self.0 >> 6)
    }

    /// Permissions for the file's group.
    #[inline]
    #[must_use]
    pub const fn group(self) -> Permissions {
        Permissions::from_bits(self.0 >> 3)
    }

    /// Permissions for everyone else.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Permissions {
        Permissions::from_bits(self.0)
    }

    /// Whether the setuid bit is set.
    #[inline]
    #[must_use]
    pub const fn setuid(self) -> bool {
        self.0 & SETUID != 0
    }

    /// Whether the setgid bit is set.
    #[inline]
    #[must_use]
    pub const fn setgid(self) -> bool {
        self.0 & SETGID != 0
    }

    /// Whether the sticky bit is set.
    #[inline]
    #[must_use]
    pub const fn sticky(self) -> bool {
        self.0 & STICKY != 0
    }

    /// Returns this mode with the setuid bit set or cleared.
    #[must_use]
    pub const fn with_setuid(self, on: bool) -> Self {
        self.with_bit(SETUID, on)
    }

    /// Returns this mode with the setgid bit set or cleared.
    #[must_use]
    pub const fn with_setgid(self, on: bool) -> Self {
        self.with_bit(SETGID, on)
    }

    /// Returns this mode with the sticky bit set or cleared.
    #[must_use]
    pub const fn with_sticky(self, on: bool) -> Self {
        self.with_bit(STICKY, on)
    }

    const fn with_bit(self, bit: u32, on: bool) -> Self {
        if on {
            Self(self.0 | bit)
        } else {
            Self(self.0 & !bit)
        }
    }
}

impl Default for CreationMode {
    /// `rw-r--r--`
    #[inline]
    fn default() -> Self {
        Self(0o644)
    }
}

impl fmt::Debug for CreationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CreationMode({:#o})", self.0)
    }
}
