// Skin element dispatch table
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

//! Element dispatch table.
//!
//! Every element name that the interpreter recognizes is mapped to a
//!   [`NodeKind`] along with the [`Policy`] that determines how the
//!   element's content is treated.
//! Names are matched case-insensitively.
//!
//! An element whose name is absent from the table is an error;
//!   see [`SkinError::UnknownNodeKind`](crate::skin::SkinError).
//! Many recognized elements describe features that are not modeled by
//!   the [`Skin`](crate::skin::Skin) graph;
//!     those are [`Policy::Stub`] and are validated but otherwise
//!     ignored.
//!
//! Adding support for a new element is a matter of adding a row to
//!   [`DISPATCH`] and,
//!     if it constructs an object,
//!     a handler in the [parent module](super).

/// How the content of an element is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Child elements are dispatched in document order.
    Structural,

    /// The element must have no content and is otherwise ignored.
    Stub,

    /// The element must have no content and is handled in full by its
    ///   handler.
    Terminal,

    /// The element's content is consumed by its handler without being
    ///   dispatched.
    Opaque,
}

impl Policy {
    /// Whether the element must not have content.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Stub | Self::Terminal)
    }
}

/// Recognized element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    WasabiXml,
    WinampAbstractionLayer,
    Include,
    SkinInfo,
    Elements,
    Bitmap,
    Color,
    GroupDef,
    Layer,
    Container,
    LayoutStatus,
    HideObject,
    Button,
    ToggleButton,
    Group,
    Layout,
    Component,
    GammaSet,
    GammaGroup,
    Slider,
    Script,
    Scripts,
    Text,
    SendParams,
    WasabiTitleBar,
    WasabiButton,
    TrueTypeFont,
    WasabiStandardFrameStatus,
    WasabiStandardFrameNoStatus,
    EqVis,
    ColorThemesList,
    Status,
}

/// Element names,
///   their kinds,
///   and content policies.
pub const DISPATCH: &[(&str, NodeKind, Policy)] = {
    use NodeKind::*;
    use Policy::*;

    &[
        ("wasabixml", WasabiXml, Structural),
        ("winampabstractionlayer", WinampAbstractionLayer, Structural),
        // Content of an include is ignored rather than rejected.
        ("include", Include, Opaque),
        ("skininfo", SkinInfo, Opaque),
        ("elements", Elements, Structural),
        ("bitmap", Bitmap, Terminal),
        ("color", Color, Stub),
        ("groupdef", GroupDef, Structural),
        ("layer", Layer, Structural),
        ("container", Container, Structural),
        ("layoutstatus", LayoutStatus, Stub),
        ("hideobject", HideObject, Stub),
        ("button", Button, Stub),
        ("togglebutton", ToggleButton, Stub),
        ("group", Group, Structural),
        ("layout", Layout, Structural),
        ("component", Component, Structural),
        ("gammaset", GammaSet, Structural),
        ("gammagroup", GammaGroup, Structural),
        ("slider", Slider, Stub),
        ("script", Script, Terminal),
        ("scripts", Scripts, Structural),
        ("text", Text, Stub),
        ("sendparams", SendParams, Stub),
        ("wasabi:titlebar", WasabiTitleBar, Stub),
        ("wasabi:button", WasabiButton, Stub),
        ("truetypefont", TrueTypeFont, Stub),
        ("wasabi:standardframe:status", WasabiStandardFrameStatus, Stub),
        ("wasabi:standardframe:nostatus", WasabiStandardFrameNoStatus, Stub),
        ("eqvis", EqVis, Stub),
        ("colorthemes:list", ColorThemesList, Structural),
        ("status", Status, Stub),
    ]
};

impl NodeKind {
    /// Look up the kind of element by name,
    ///   ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        DISPATCH
            .iter()
            .find(|(tag, ..)| tag.eq_ignore_ascii_case(name))
            .map(|(_, kind, _)| *kind)
    }

    pub fn policy(&self) -> Policy {
        DISPATCH
            .iter()
            .find(|(_, kind, _)| kind == self)
            .map(|(.., policy)| *policy)
            .unwrap_or(Policy::Structural)
    }

    /// Canonical lowercase element name.
    pub fn name(&self) -> &'static str {
        DISPATCH
            .iter()
            .find(|(_, kind, _)| kind == self)
            .map(|(tag, ..)| *tag)
            .unwrap_or("")
    }
}
