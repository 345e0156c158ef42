// External resource collaborators
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

//! Loading of resources referenced by skin documents.
//!
//! The interpreter does not itself understand images or compiled scripts;
//!   it only locates them within the archive and hands their bytes to a
//!   collaborator:
//!
//!   - an [`ImageLoader`] produces an [`Image`] for each
//!       [`Bitmap`](super::object::Bitmap) once it has been constructed;
//!       and
//!   - a [`ScriptDecoder`] produces an opaque [`Script`] for each
//!       `<script>` element,
//!         which is attached to a
//!         [`SystemObject`](super::object::SystemObject).
//!
//! Both are traits so that tests
//!   (and hosts with real codecs)
//!   can substitute their own implementations.
//! The defaults provided here do only as much as can be done without a
//!   codec:
//!     [`ArchiveImageLoader`] identifies the image format and dimensions
//!     from its header,
//!   and [`MakiDecoder`] validates the compiled script header.

use super::object::Bitmap;
use crate::archive::{Archive, ArchiveError};
use std::{error::Error, fmt::Display, sync::Arc};

/// Format of an image,
///   as identified by its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Bmp,
    Jpeg,
    Gif,
    Unknown,
}

impl ImageFormat {
    /// Identify the format of `data` by its leading signature bytes.
    pub fn sniff(data: &[u8]) -> Self {
        match data {
            [0x89, b'P', b'N', b'G', ..] => Self::Png,
            [b'B', b'M', ..] => Self::Bmp,
            [0xFF, 0xD8, 0xFF, ..] => Self::Jpeg,
            [b'G', b'I', b'F', b'8', ..] => Self::Gif,
            _ => Self::Unknown,
        }
    }
}

/// Image data associated with a [`Bitmap`].
///
/// The pixel data are not decoded;
///   rendering is the concern of whatever consumes the skin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    format: ImageFormat,
    dimensions: Option<(u32, u32)>,
    data: Arc<[u8]>,
}

impl Image {
    pub fn new(data: Vec<u8>) -> Self {
        let format = ImageFormat::sniff(&data);
        let dimensions = header_dimensions(format, &data);

        Self {
            format,
            dimensions,
            data: data.into(),
        }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Width and height in pixels,
    ///   if they could be read from the image header.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn header_dimensions(format: ImageFormat, data: &[u8]) -> Option<(u32, u32)> {
    let be = |at: usize| -> Option<u32> {
        Some(u32::from_be_bytes(data.get(at..at + 4)?.try_into().ok()?))
    };
    let le = |at: usize| -> Option<i32> {
        Some(i32::from_le_bytes(data.get(at..at + 4)?.try_into().ok()?))
    };

    match format {
        // Signature (8), IHDR length (4), `IHDR` (4), width, height.
        ImageFormat::Png => Some((be(16)?, be(20)?)),

        // File header (14), DIB header size (4), width, height;
        //   height is negative for top-down bitmaps.
        ImageFormat::Bmp => Some((le(18)?.unsigned_abs(), le(22)?.unsigned_abs())),

        _ => None,
    }
}

/// Produces an [`Image`] for a [`Bitmap`].
///
/// Failure to load an image does not abort interpretation;
///   the bitmap is retained without an image and a warning is recorded.
pub trait ImageLoader {
    fn load(&self, bitmap: &Bitmap, archive: &dyn Archive) -> Result<Image, ImageError>;
}

/// Reads the bitmap's `file` from the archive.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveImageLoader;

impl ImageLoader for ArchiveImageLoader {
    fn load(&self, bitmap: &Bitmap, archive: &dyn Archive) -> Result<Image, ImageError> {
        let path = bitmap.file().ok_or(ImageError::MissingFile)?;
        let file = archive.find(path)?;

        archive.read(&file).map(Image::new).map_err(Into::into)
    }
}

/// Does not load images at all.
///
/// This is useful for hosts that only want the structure of a skin.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoImageLoader;

impl ImageLoader for NoImageLoader {
    fn load(&self, _bitmap: &Bitmap, _archive: &dyn Archive) -> Result<Image, ImageError> {
        Err(ImageError::Disabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The bitmap has no `file` attribute.
    MissingFile,

    /// The image could not be located or read.
    Archive(ArchiveError),

    /// Image loading was disabled by the host.
    Disabled,
}

impl From<ArchiveError> for ImageError {
    fn from(e: ArchiveError) -> Self {
        Self::Archive(e)
    }
}

impl Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFile => write!(f, "bitmap has no `file` attribute"),
            Self::Archive(e) => Display::fmt(e, f),
            Self::Disabled => write!(f, "image loading is disabled"),
        }
    }
}

impl Error for ImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Archive(e) => Some(e),
            _ => None,
        }
    }
}

/// A decoded behavior script.
///
/// The interpreter treats scripts as opaque;
///   executing them is the concern of whatever consumes the skin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    version: u16,
    data: Arc<[u8]>,
}

impl Script {
    pub fn new(version: u16, data: Vec<u8>) -> Self {
        Self {
            version,
            data: data.into(),
        }
    }

    /// Format version declared by the script.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Raw script bytes,
    ///   including the header.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Produces a [`Script`] from the raw bytes of a compiled script file.
pub trait ScriptDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Script, ScriptDecodeError>;
}

/// Magic bytes beginning every compiled MAKI script.
pub const MAKI_MAGIC: &[u8; 2] = b"FG";

/// Validates the header of a compiled MAKI script.
///
/// A MAKI file begins with the magic bytes `FG` followed by a
///   little-endian 16-bit format version.
#[derive(Debug, Default, Clone, Copy)]
pub struct MakiDecoder;

impl ScriptDecoder for MakiDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Script, ScriptDecodeError> {
        match bytes {
            [m0, m1, v0, v1, ..] if [*m0, *m1] == *MAKI_MAGIC => {
                Ok(Script::new(u16::from_le_bytes([*v0, *v1]), bytes.to_vec()))
            }
            [m0, m1, _, _, ..] => Err(ScriptDecodeError::BadMagic([*m0, *m1])),
            _ => Err(ScriptDecodeError::Truncated(bytes.len())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptDecodeError {
    /// The file is too short to contain a header;
    ///   its length is provided.
    Truncated(usize),

    /// The file does not begin with [`MAKI_MAGIC`].
    BadMagic([u8; 2]),

    /// A decoder-specific failure.
    Invalid(String),
}

impl Display for ScriptDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated(len) => {
                write!(f, "script is truncated ({len} bytes)")
            }
            Self::BadMagic(found) => write!(
                f,
                "expected script magic `FG`, found `{}`",
                String::from_utf8_lossy(found)
            ),
            Self::Invalid(msg) => write!(f, "invalid script: {msg}"),
        }
    }
}

impl Error for ScriptDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}
