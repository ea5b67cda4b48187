//! File kind classification from mode type bits.

use std::fmt;

/// Mask selecting the file type bits of a mode.
pub const S_IFMT: u32 = 0o170000;
/// Socket.
pub const S_IFSOCK: u32 = 0o140000;
/// Symbolic link.
pub const S_IFLNK: u32 = 0o120000;
/// Regular file.
pub const S_IFREG: u32 = 0o100000;
/// Block device.
pub const S_IFBLK: u32 = 0o060000;
/// Directory.
pub const S_IFDIR: u32 = 0o040000;
/// Character device.
pub const S_IFCHR: u32 = 0o020000;
/// FIFO.
pub const S_IFIFO: u32 = 0o010000;

/// Classified file type of a portable status record.
///
/// The discriminant order is part of the public contract: `Regular` is `0`
/// through `Socket` at `6`. Serialized records and [`FileKind::index`] rely on
/// it, so new kinds may only ever be appended.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum FileKind {
    /// Regular file, also the fallback for unrecognized type bits.
    #[default]
    Regular = 0,
    /// Directory.
    Directory = 1,
    /// Character device.
    CharDevice = 2,
    /// Block device.
    BlockDevice = 3,
    /// Symbolic link.
    Symlink = 4,
    /// Named pipe.
    Fifo = 5,
    /// Unix domain socket.
    Socket = 6,
}

/// Type tags tested in order; the first match wins.
const CLASSIFICATION: [(u32, FileKind); 7] = [
    (S_IFREG, FileKind::Regular),
    (S_IFDIR, FileKind::Directory),
    (S_IFCHR, FileKind::CharDevice),
    (S_IFBLK, FileKind::BlockDevice),
    (S_IFLNK, FileKind::Symlink),
    (S_IFIFO, FileKind::Fifo),
    (S_IFSOCK, FileKind::Socket),
];

impl FileKind {
    /// Every kind in discriminant order.
    pub const ALL: [Self; 7] = [
        Self::Regular,
        Self::Directory,
        Self::CharDevice,
        Self::BlockDevice,
        Self::Symlink,
        Self::Fifo,
        Self::Socket,
    ];

    /// Classifies the type bits of `mode`.
    ///
    /// Permission bits are ignored. Type bits that match none of the known
    /// tags yield [`FileKind::Regular`].
    #[must_use]
    pub fn from_mode(mode: u32) -> Self {
        let tag = mode & S_IFMT;
        CLASSIFICATION
            .iter()
            .find(|(bits, _)| *bits == tag)
            .map_or(Self::Regular, |(_, kind)| *kind)
    }

    /// Returns the stable discriminant of this kind.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a kind by its stable discriminant.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Returns the type tag this kind is classified from.
    #[must_use]
    pub const fn type_bits(self) -> u32 {
        match self {
            Self::Regular => S_IFREG,
            Self::Directory => S_IFDIR,
            Self::CharDevice => S_IFCHR,
            Self::BlockDevice => S_IFBLK,
            Self::Symlink => S_IFLNK,
            Self::Fifo => S_IFIFO,
            Self::Socket => S_IFSOCK,
        }
    }

    /// Short lowercase name used in text output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Directory => "directory",
            Self::CharDevice => "char_device",
            Self::BlockDevice => "block_device",
            Self::Symlink => "symlink",
            Self::Fifo => "fifo",
            Self::Socket => "socket",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
