// Skin objects
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

//! Objects that make up a skin.
//!
//! Each element kind that the interpreter constructs has a corresponding
//!   object here:
//!
//!   - [`Container`]: one named skin surface,
//!       owning an ordered sequence of [`Layout`]s;
//!   - [`Layout`]: one arrangement of a container,
//!       owning an ordered sequence of [`Layer`]s;
//!   - [`Layer`]: a placed visual element;
//!   - [`Group`]: a region that hosts behavior scripts and nested regions;
//!   - [`SystemObject`]: a decoded [`Script`] bound to its owning region;
//!       and
//!   - [`Bitmap`]: an image resource referenced by id.
//!
//! [`SkinInfo`] holds descriptive metadata that is not part of the graph.
//!
//! Ownership between these objects is represented by edges on the
//!   [`Skin`](super::Skin) graph rather than by the objects themselves.
//!
//! Attributes
//! ==========
//! Objects that are configured by element attributes implement
//!   [`AcceptAttribute`].
//! Region-like objects layer their attribute sets:
//!   a [`Layout`] first tries its own keys,
//!     then those of [`Group`],
//!     and finally the generic [`GuiObject`] keys common to everything
//!       placed on screen.
//! A key that no layer recognizes is declined by returning `false`,
//!   and callers ignore it.
//!
//! Keys are expected to already be lowercase;
//!   see [`set_xml_attributes`].

use super::{
    attr::{parse_bool, parse_number},
    load::{Image, Script},
};
use crate::xml::Element;

/// Something that may be configured by string-keyed attributes.
pub trait AcceptAttribute {
    /// Apply the attribute `key` if it is recognized,
    ///   returning whether it was.
    ///
    /// `key` must be lowercase.
    fn accept_attribute(&mut self, key: &str, value: &str) -> bool;
}

/// Apply each attribute of `ele` to `obj`,
///   lowercasing keys.
///
/// Returns the names of attributes that were declined,
///   which callers are free to ignore.
pub fn set_xml_attributes<'e, O: AcceptAttribute>(
    obj: &mut O,
    ele: &'e Element,
) -> Vec<&'e str> {
    ele.attrs()
        .iter()
        .filter(|attr| {
            !obj.accept_attribute(&attr.name().to_ascii_lowercase(), attr.value())
        })
        .map(|attr| attr.name())
        .collect()
}

/// Attributes common to everything placed on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiObject {
    id: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    w: Option<f64>,
    h: Option<f64>,
    alpha: Option<f64>,
    visible: bool,
    ghost: bool,
    tooltip: Option<String>,
}

impl Default for GuiObject {
    fn default() -> Self {
        Self {
            id: None,
            x: None,
            y: None,
            w: None,
            h: None,
            alpha: None,
            visible: true,
            ghost: false,
            tooltip: None,
        }
    }
}

impl GuiObject {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn x(&self) -> Option<f64> {
        self.x
    }

    pub fn y(&self) -> Option<f64> {
        self.y
    }

    pub fn w(&self) -> Option<f64> {
        self.w
    }

    pub fn h(&self) -> Option<f64> {
        self.h
    }

    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Whether the object ignores mouse input.
    pub fn ghost(&self) -> bool {
        self.ghost
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }
}

impl AcceptAttribute for GuiObject {
    fn accept_attribute(&mut self, key: &str, value: &str) -> bool {
        match key {
            "id" => self.id = Some(value.to_string()),
            "x" => self.x = Some(parse_number(value)),
            "y" => self.y = Some(parse_number(value)),
            "w" => self.w = Some(parse_number(value)),
            "h" => self.h = Some(parse_number(value)),
            "alpha" => self.alpha = Some(parse_number(value)),
            "visible" => self.visible = parse_bool(value),
            "ghost" => self.ghost = parse_bool(value),
            "tooltip" => self.tooltip = Some(value.to_string()),
            _ => return false,
        }

        true
    }
}

/// A region that hosts behavior scripts and nested regions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    gui: GuiObject,
    background: Option<String>,
    draw_background: bool,
    minimum_h: Option<f64>,
    minimum_w: Option<f64>,
    maximum_h: Option<f64>,
    maximum_w: Option<f64>,
}

impl Group {
    pub fn gui(&self) -> &GuiObject {
        &self.gui
    }

    pub fn id(&self) -> Option<&str> {
        self.gui.id()
    }

    /// Id of the [`Bitmap`] drawn as this group's background.
    ///
    /// See [`Skin::background`](super::Skin::background) to resolve it.
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn draw_background(&self) -> bool {
        self.draw_background
    }

    pub fn minimum_h(&self) -> Option<f64> {
        self.minimum_h
    }

    pub fn minimum_w(&self) -> Option<f64> {
        self.minimum_w
    }

    pub fn maximum_h(&self) -> Option<f64> {
        self.maximum_h
    }

    pub fn maximum_w(&self) -> Option<f64> {
        self.maximum_w
    }
}

impl AcceptAttribute for Group {
    fn accept_attribute(&mut self, key: &str, value: &str) -> bool {
        match key {
            "background" => self.background = Some(value.to_string()),
            "drawbackground" => self.draw_background = parse_bool(value),
            "minimum_h" => self.minimum_h = Some(parse_number(value)),
            "minimum_w" => self.minimum_w = Some(parse_number(value)),
            "maximum_h" => self.maximum_h = Some(parse_number(value)),
            "maximum_w" => self.maximum_w = Some(parse_number(value)),
            _ => return self.gui.accept_attribute(key, value),
        }

        true
    }
}

/// One arrangement of a [`Container`].
///
/// A layout is itself a region,
///   exposing the attributes of [`Group`] and hosting scripts of its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    group: Group,
    desktop_alpha: bool,
    resizable: bool,
    scalable: bool,
    link_width: Option<String>,
    link_height: Option<String>,
}

impl Layout {
    /// The region attributes of this layout.
    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn id(&self) -> Option<&str> {
        self.group.id()
    }

    pub fn desktop_alpha(&self) -> bool {
        self.desktop_alpha
    }

    pub fn resizable(&self) -> bool {
        self.resizable
    }

    pub fn scalable(&self) -> bool {
        self.scalable
    }

    /// Id of the layout whose width is kept in sync with this one.
    pub fn link_width(&self) -> Option<&str> {
        self.link_width.as_deref()
    }

    /// Id of the layout whose height is kept in sync with this one.
    pub fn link_height(&self) -> Option<&str> {
        self.link_height.as_deref()
    }
}

impl AcceptAttribute for Layout {
    fn accept_attribute(&mut self, key: &str, value: &str) -> bool {
        match key {
            "desktopalpha" => self.desktop_alpha = parse_bool(value),
            "resizable" => self.resizable = parse_bool(value),
            "scalable" => self.scalable = parse_bool(value),
            "linkwidth" => self.link_width = Some(value.to_string()),
            "linkheight" => self.link_height = Some(value.to_string()),
            _ => return self.group.accept_attribute(key, value),
        }

        true
    }
}

/// The top-level grouping for one named skin surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: Option<String>,
    name: Option<String>,
    default_visible: bool,
    default_x: Option<f64>,
    default_y: Option<f64>,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            default_visible: true,
            default_x: None,
            default_y: None,
        }
    }
}

impl Container {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn default_visible(&self) -> bool {
        self.default_visible
    }

    pub fn default_x(&self) -> Option<f64> {
        self.default_x
    }

    pub fn default_y(&self) -> Option<f64> {
        self.default_y
    }
}

impl AcceptAttribute for Container {
    fn accept_attribute(&mut self, key: &str, value: &str) -> bool {
        match key {
            "id" => self.id = Some(value.to_string()),
            "name" => self.name = Some(value.to_string()),
            "default_visible" => self.default_visible = parse_bool(value),
            "default_x" => self.default_x = Some(parse_number(value)),
            "default_y" => self.default_y = Some(parse_number(value)),
            _ => return false,
        }

        true
    }
}

/// A placed visual element of a [`Layout`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    gui: GuiObject,
    image: Option<String>,
    inactive_image: Option<String>,
    tile: bool,
}

impl Layer {
    pub fn gui(&self) -> &GuiObject {
        &self.gui
    }

    pub fn id(&self) -> Option<&str> {
        self.gui.id()
    }

    /// Id of the [`Bitmap`] displayed by this layer.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Id of the [`Bitmap`] displayed while the layout is inactive.
    pub fn inactive_image(&self) -> Option<&str> {
        self.inactive_image.as_deref()
    }

    pub fn tile(&self) -> bool {
        self.tile
    }
}

impl AcceptAttribute for Layer {
    fn accept_attribute(&mut self, key: &str, value: &str) -> bool {
        match key {
            "image" => self.image = Some(value.to_string()),
            "inactiveimage" => self.inactive_image = Some(value.to_string()),
            "tile" => self.tile = parse_bool(value),
            _ => return self.gui.accept_attribute(key, value),
        }

        true
    }
}

/// An image resource,
///   registered by id so that any region may reference it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bitmap {
    id: Option<String>,
    file: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    w: Option<f64>,
    h: Option<f64>,
    gamma_group: Option<String>,

    /// Populated after construction by an
    ///   [`ImageLoader`](super::load::ImageLoader).
    image: Option<Image>,
}

impl Bitmap {
    pub fn with_file<S: Into<String>>(mut self, file: S) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Path of the image within the archive.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Offset of this bitmap within a larger sprite sheet.
    pub fn x(&self) -> Option<f64> {
        self.x
    }

    pub fn y(&self) -> Option<f64> {
        self.y
    }

    pub fn w(&self) -> Option<f64> {
        self.w
    }

    pub fn h(&self) -> Option<f64> {
        self.h
    }

    pub fn gamma_group(&self) -> Option<&str> {
        self.gamma_group.as_deref()
    }

    /// Image data,
    ///   if it has been loaded.
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Image) {
        self.image = Some(image);
    }
}

impl AcceptAttribute for Bitmap {
    fn accept_attribute(&mut self, key: &str, value: &str) -> bool {
        match key {
            "id" => self.id = Some(value.to_string()),
            "file" => self.file = Some(value.to_string()),
            "x" => self.x = Some(parse_number(value)),
            "y" => self.y = Some(parse_number(value)),
            "w" => self.w = Some(parse_number(value)),
            "h" => self.h = Some(parse_number(value)),
            "gammagroup" => self.gamma_group = Some(value.to_string()),
            _ => return false,
        }

        true
    }
}

/// A decoded behavior script bound to the region that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemObject {
    id: String,
    file: String,
    param: Option<String>,
    script: Script,
}

impl SystemObject {
    pub fn new<I: Into<String>, F: Into<String>>(id: I, file: F, script: Script) -> Self {
        Self {
            id: id.into(),
            file: file.into(),
            param: None,
            script,
        }
    }

    pub fn with_param<S: Into<String>>(mut self, param: S) -> Self {
        self.param = Some(param.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the script as referenced by its element.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Parameter string passed to the script at startup.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    pub fn script(&self) -> &Script {
        &self.script
    }
}

/// Descriptive metadata about a skin from its `<skininfo>` element.
///
/// Each field is populated from the text of the child element of the same
///   name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkinInfo {
    version: Option<String>,
    name: Option<String>,
    comment: Option<String>,
    author: Option<String>,
    email: Option<String>,
    homepage: Option<String>,
    screenshot: Option<String>,
}

impl SkinInfo {
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }

    /// Path of a preview image within the archive.
    pub fn screenshot(&self) -> Option<&str> {
        self.screenshot.as_deref()
    }
}

impl AcceptAttribute for SkinInfo {
    fn accept_attribute(&mut self, key: &str, value: &str) -> bool {
        let field = match key {
            "version" => &mut self.version,
            "name" => &mut self.name,
            "comment" => &mut self.comment,
            "author" => &mut self.author,
            "email" => &mut self.email,
            "homepage" => &mut self.homepage,
            "screenshot" => &mut self.screenshot,
            _ => return false,
        };

        *field = Some(value.to_string());
        true
    }
}
