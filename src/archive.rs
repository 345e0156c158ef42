// Skin archive access
//
//  This file is part of Wasabi.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Case-insensitive access to the files of a packaged skin.
//!
//! A skin is distributed as a bundle of files:
//!   descriptor documents,
//!   images,
//!   and compiled scripts.
//! Documents reference one another by relative path,
//!   but skin authors have historically been careless with case,
//!     since the original host platform's filesystem was
//!     case-insensitive.
//! An [`Archive`] therefore resolves paths by comparing each path segment
//!   without regard to case.
//!
//!   - [`Archive`] provides a trait for locating and reading entries;
//!   - [`MemArchive`] holds entries in memory,
//!       which is useful both for tests and for callers that have already
//!       unpacked a skin by other means; and
//!   - [`DirArchive`] serves entries from an unpacked skin directory.
//!
//! Path Normalization
//! ==================
//! Before comparison,
//!   a path has its backslashes converted into forward slashes,
//!   empty and `.` segments are dropped,
//!   and `..` segments remove the preceding segment.
//! A `..` that would climb above the root of the archive is ignored.
//!
//! ```
//! use wasabi::archive::{Archive, MemArchive};
//!
//! let mut archive = MemArchive::new();
//! archive.insert("Scripts/Player.MAKI", b"FG".to_vec());
//!
//! let file = archive.find("scripts/./extra/../player.maki").unwrap();
//! assert_eq!("Scripts/Player.MAKI", file.path());
//! ```

use fxhash::FxHashMap;
use std::{
    error::Error,
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Handle to an entry located by [`Archive::find`].
///
/// The handle carries the path of the entry _as stored in the archive_,
///   which may differ in case from the path that was requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    path: String,
}

impl FileHandle {
    /// Path of the entry as stored in the archive.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A packaged store of skin files.
pub trait Archive {
    /// Locate the entry at `path`,
    ///   comparing path segments case-insensitively.
    fn find(&self, path: &str) -> Result<FileHandle, ArchiveError>;

    /// Read the raw bytes of an entry.
    fn read(&self, file: &FileHandle) -> Result<Vec<u8>, ArchiveError>;

    /// Read an entry as text.
    ///
    /// A leading UTF-8 byte order mark is removed and invalid sequences are
    ///   replaced rather than failing,
    ///     since skin documents in the wild frequently declare one
    ///     encoding and use another.
    fn read_as_text(&self, file: &FileHandle) -> Result<String, ArchiveError> {
        self.read(file).map(|bytes| decode_text(&bytes))
    }
}

impl<A: Archive + ?Sized> Archive for &A {
    fn find(&self, path: &str) -> Result<FileHandle, ArchiveError> {
        (**self).find(path)
    }

    fn read(&self, file: &FileHandle) -> Result<Vec<u8>, ArchiveError> {
        (**self).read(file)
    }

    fn read_as_text(&self, file: &FileHandle) -> Result<String, ArchiveError> {
        (**self).read_as_text(file)
    }
}

fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    String::from_utf8_lossy(bytes).into_owned()
}

/// Normalize `path` into its segments.
///
/// See the [module-level documentation](self) for the rules.
pub fn normalize_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .fold(Vec::new(), |mut segs, seg| {
            match seg {
                "" | "." => (),
                ".." => {
                    segs.pop();
                }
                _ => segs.push(seg),
            }

            segs
        })
}

/// Key under which an entry is indexed for case-insensitive lookup.
fn lookup_key(path: &str) -> String {
    normalize_segments(path)
        .iter()
        .map(|seg| seg.to_lowercase())
        .collect::<Vec<_>>()
        .join("/")
}

/// Case-insensitive index from normalized paths to stored paths.
///
/// If two stored paths differ only by case,
///   the one indexed last wins.
#[derive(Debug, Default)]
struct EntryIndex(FxHashMap<String, String>);

impl EntryIndex {
    fn insert(&mut self, stored: &str) {
        self.0.insert(lookup_key(stored), stored.to_string());
    }

    fn find(&self, path: &str) -> Result<FileHandle, ArchiveError> {
        self.0
            .get(&lookup_key(path))
            .map(|stored| FileHandle {
                path: stored.clone(),
            })
            .ok_or_else(|| ArchiveError::NotFound(path.to_string()))
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// An archive whose entries are held in memory.
#[derive(Debug, Default)]
pub struct MemArchive {
    index: EntryIndex,
    entries: FxHashMap<String, Vec<u8>>,
}

impl MemArchive {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add an entry,
    ///   replacing any entry stored under the exact same path.
    pub fn insert<P: Into<String>>(&mut self, path: P, data: Vec<u8>) {
        let path = path.into();

        self.index.insert(&path);
        self.entries.insert(path, data);
    }

    /// Builder-style [`MemArchive::insert`].
    pub fn with_entry<P: Into<String>, D: Into<Vec<u8>>>(
        mut self,
        path: P,
        data: D,
    ) -> Self {
        self.insert(path, data.into());
        self
    }

    /// Number of entries in the archive.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>, D: Into<Vec<u8>>> FromIterator<(P, D)> for MemArchive {
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |archive, (path, data)| {
                archive.with_entry(path, data)
            })
    }
}

impl Archive for MemArchive {
    fn find(&self, path: &str) -> Result<FileHandle, ArchiveError> {
        self.index.find(path)
    }

    fn read(&self, file: &FileHandle) -> Result<Vec<u8>, ArchiveError> {
        self.entries
            .get(file.path())
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(file.path().to_string()))
    }
}

/// An archive backed by an unpacked skin directory.
///
/// The directory is indexed once upon [`DirArchive::open`];
///   files added afterward will not be found.
#[derive(Debug)]
pub struct DirArchive {
    root: PathBuf,
    index: EntryIndex,
}

impl DirArchive {
    /// Index all files beneath `root`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, ArchiveError> {
        let root = root.as_ref().to_path_buf();
        let mut index = EntryIndex::default();

        Self::index_dir(&root, &mut index)?;

        Ok(Self { root, index })
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    fn index_dir(root: &Path, index: &mut EntryIndex) -> Result<(), ArchiveError> {
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| walk_error(root, e))?;

            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            index.insert(&rel);
        }

        Ok(())
    }
}

fn walk_error(root: &Path, e: walkdir::Error) -> ArchiveError {
    let path = e.path().unwrap_or(root).to_string_lossy().into_owned();
    let kind = e
        .io_error()
        .map(io::Error::kind)
        .unwrap_or(io::ErrorKind::Other);

    ArchiveError::Io(path, kind)
}

impl Archive for DirArchive {
    fn find(&self, path: &str) -> Result<FileHandle, ArchiveError> {
        self.index.find(path)
    }

    fn read(&self, file: &FileHandle) -> Result<Vec<u8>, ArchiveError> {
        let path = file
            .path()
            .split('/')
            .fold(self.root.clone(), |path, seg| path.join(seg));

        fs::read(path)
            .map_err(|e| ArchiveError::Io(file.path().to_string(), e.kind()))
    }
}

/// Failure to locate or read an archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// No entry matches the requested path.
    NotFound(String),

    /// An entry exists but could not be read.
    Io(String, io::ErrorKind),
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "no archive entry matches `{path}`")
            }
            Self::Io(path, kind) => {
                write!(f, "failed to read archive entry `{path}`: {kind}")
            }
        }
    }
}

impl Error for ArchiveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}
