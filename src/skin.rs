// Skin object model and interpreter
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

//! Skin object model and descriptor interpreter.
//!
//! A skin is described by one or more descriptor documents held in an
//!   [`Archive`](crate::archive::Archive),
//!     along with the images and compiled scripts that they reference.
//! [`SkinParser`] walks those documents and produces a [`Skin`]:
//!   a graph of [`Container`]s,
//!     their [`Layout`]s and [`Layer`]s,
//!   [`Group`] regions and the [`SystemObject`] scripts bound to them,
//!   and a registry of [`Bitmap`]s.
//!
//! The modules are,
//!   from the leaves up:
//!
//!   - [`attr`] decodes attribute values;
//!   - [`object`] holds the objects themselves;
//!   - [`load`] defines the image and script collaborators;
//!   - [`graph`] relates objects to one another;
//!   - [`error`] holds the errors and warnings of interpretation; and
//!   - [`parse`] is the interpreter.

pub mod attr;
pub mod error;
pub mod graph;
pub mod load;
pub mod object;
pub mod parse;

pub use error::{ContextSlot, Malformation, SkinError, SkinWarning};
pub use graph::{Object, ObjectIndex, ObjectKind, RegionIndex, Skin};
pub use load::{
    ArchiveImageLoader, Image, ImageError, ImageFormat, ImageLoader,
    MakiDecoder, NoImageLoader, Script, ScriptDecodeError, ScriptDecoder,
};
pub use object::{
    AcceptAttribute, Bitmap, Container, GuiObject, Group, Layer, Layout,
    SkinInfo, SystemObject,
};
pub use parse::{
    parse_skin, ContextScoping, OrphanLayerPolicy, ParseOptions,
    ScriptFailurePolicy, SkinParser,
};
