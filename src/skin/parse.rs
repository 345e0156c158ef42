// Skin descriptor interpreter
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

//! Interpret skin descriptor documents into a [`Skin`].
//!
//! Interpretation is a single depth-first walk over the element tree of
//!   the root document,
//!     beginning with [`ParseOptions::root_document`].
//! Each element is looked up in the [dispatch table](node) and handled
//!   according to its [`NodeKind`] and [`Policy`]:
//!
//!   - a structural element may construct an object and make it active
//!       in the [`ParseContext`] before its children are dispatched;
//!   - a terminal element (`<bitmap>`, `<script>`) must be empty and is
//!       handled in full without dispatching children;
//!   - a stub element is validated and ignored; and
//!   - an opaque element is handled without its content being dispatched
//!       or validated:
//!         `<skininfo>` is read into [`SkinInfo`],
//!         and any content of `<include>` is ignored.
//!
//! The first error aborts the walk and no [`Skin`] is produced.
//! Conditions that only degrade the result are recorded as
//!   [`SkinWarning`]s on the [`Skin`] and emitted as [`tracing`] events.
//!
//! Includes
//! ========
//! `<include file="a/b/c.xml"/>` splices the top-level elements of another
//!   document into the walk at the position of the include,
//!     sharing the active [`ParseContext`].
//! The directory components of `file` are pushed onto a prefix stack for
//!   the duration of the include,
//!     and `file` is resolved against the entire stack;
//!   an include within `c.xml` of `d.xml` therefore resolves to
//!   `a/b/d.xml`.
//! The prefix stack is seeded with the directory of the root document.
//!
//! Other paths
//!   (the `file` of a `<bitmap>` or `<script>`)
//!   are resolved from the root of the archive.
//!
//! An include that re-enters a document that is still being processed is
//!   an error,
//!     as is nesting includes beyond [`ParseOptions::max_include_depth`].
//!
//! Collaborators
//! =============
//! Images and scripts are opaque to the interpreter.
//! A [`SkinParser`] is configured with an [`ImageLoader`] that is invoked
//!   for each bitmap after it is registered,
//!     and a [`ScriptDecoder`] that is invoked for each script.
//! The defaults are [`ArchiveImageLoader`] and [`MakiDecoder`].
//!
//! ```
//! use wasabi::archive::MemArchive;
//! use wasabi::skin::{parse_skin, NoImageLoader, SkinParser};
//!
//! let archive = MemArchive::new().with_entry(
//!     "skin.xml",
//!     r#"<WasabiXML>
//!          <container id="main">
//!            <layout id="normal"><layer id="bg"/></layout>
//!          </container>
//!        </WasabiXML>"#,
//! );
//!
//! let skin = SkinParser::new(&archive)
//!     .with_image_loader(NoImageLoader)
//!     .parse()
//!     .unwrap();
//!
//! let main = skin.containers()[0];
//! let normal = skin.layouts(main)[0];
//!
//! assert_eq!(Some("normal"), skin.get(normal).id());
//! assert_eq!(1, skin.layers(normal).len());
//! # assert!(parse_skin(&archive).is_ok());
//! ```

mod context;
mod node;

pub use context::{ContextScoping, Frame, ParseContext};
pub use node::{NodeKind, Policy, DISPATCH};

use tracing::{debug, trace, warn};

use super::{
    error::{ContextSlot, Malformation, SkinError, SkinWarning},
    load::{
        ArchiveImageLoader, ImageError, ImageLoader, MakiDecoder,
        ScriptDecoder,
    },
    object::{
        set_xml_attributes, AcceptAttribute, Bitmap, Container, Group,
        Layer, Layout, SkinInfo, SystemObject,
    },
    Skin,
};
use crate::{
    archive::{Archive, ArchiveError, FileHandle},
    span::{Context, Span},
    xml::{parse_fragment, Element},
};

/// Treatment of a `<layer>` with no enclosing `<layout>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanLayerPolicy {
    /// Drop the layer and its content,
    ///   recording [`SkinWarning::OrphanLayer`].
    #[default]
    Drop,

    /// Fail with [`SkinError::MissingContext`].
    Fail,
}

/// Treatment of a script that the [`ScriptDecoder`] rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptFailurePolicy {
    /// Drop the script,
    ///   recording [`SkinWarning::ScriptDropped`].
    #[default]
    Drop,

    /// Fail with [`SkinError::ScriptDecode`].
    Abort,
}

/// Configuration of a [`SkinParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Path of the root document within the archive.
    pub root_document: String,

    pub scoping: ContextScoping,
    pub orphan_layers: OrphanLayerPolicy,
    pub script_failures: ScriptFailurePolicy,

    /// Maximum number of nested includes.
    pub max_include_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            root_document: "skin.xml".into(),
            scoping: ContextScoping::default(),
            orphan_layers: OrphanLayerPolicy::default(),
            script_failures: ScriptFailurePolicy::default(),
            max_include_depth: 64,
        }
    }
}

/// Interpreter for the skin held by an [`Archive`].
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug)]
pub struct SkinParser<A, I = ArchiveImageLoader, S = MakiDecoder> {
    archive: A,
    images: I,
    scripts: S,
    opts: ParseOptions,
}

impl<A: Archive> SkinParser<A> {
    pub fn new(archive: A) -> Self {
        Self {
            archive,
            images: ArchiveImageLoader,
            scripts: MakiDecoder,
            opts: ParseOptions::default(),
        }
    }
}

impl<A: Archive, I: ImageLoader, S: ScriptDecoder> SkinParser<A, I, S> {
    pub fn with_options(self, opts: ParseOptions) -> Self {
        Self { opts, ..self }
    }

    pub fn with_image_loader<J: ImageLoader>(
        self,
        images: J,
    ) -> SkinParser<A, J, S> {
        let Self {
            archive,
            scripts,
            opts,
            ..
        } = self;

        SkinParser {
            archive,
            images,
            scripts,
            opts,
        }
    }

    pub fn with_script_decoder<T: ScriptDecoder>(
        self,
        scripts: T,
    ) -> SkinParser<A, I, T> {
        let Self {
            archive,
            images,
            opts,
            ..
        } = self;

        SkinParser {
            archive,
            images,
            scripts,
            opts,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.opts
    }

    /// Interpret the skin.
    ///
    /// The archive is only read;
    ///   a parser may be used any number of times and will produce an
    ///   equivalent [`Skin`] each time.
    pub fn parse(&self) -> Result<Skin, SkinError> {
        let mut walk = Walk::new(&self.archive, &self.images, &self.scripts, &self.opts);

        walk.root()?;
        Ok(walk.finish())
    }
}

/// Interpret the skin held by `archive` using default options and
///   collaborators.
pub fn parse_skin<A: Archive>(archive: A) -> Result<Skin, SkinError> {
    SkinParser::new(archive).parse()
}

/// State of a single interpretation.
struct Walk<'p> {
    archive: &'p dyn Archive,
    images: &'p dyn ImageLoader,
    scripts: &'p dyn ScriptDecoder,
    opts: &'p ParseOptions,

    skin: Skin,
    ctx: ParseContext,

    /// Directory prefix against which includes are resolved.
    dirs: Vec<String>,

    /// Archive paths of documents being processed,
    ///   outermost first.
    chain: Vec<String>,
}

impl<'p> Walk<'p> {
    fn new(
        archive: &'p dyn Archive,
        images: &'p dyn ImageLoader,
        scripts: &'p dyn ScriptDecoder,
        opts: &'p ParseOptions,
    ) -> Self {
        Self {
            archive,
            images,
            scripts,
            opts,
            skin: Skin::new(),
            ctx: ParseContext::new(opts.scoping),
            dirs: Vec::new(),
            chain: Vec::new(),
        }
    }

    fn root(&mut self) -> Result<(), SkinError> {
        let opts = self.opts;
        let path = opts.root_document.as_str();
        let span = Span::unknown();

        let file = self
            .archive
            .find(path)
            .map_err(|e| archive_error(e, path, &span, SkinError::NotFound))?;

        let (dirs, _) = split_path(path);
        self.dirs = dirs.into_iter().map(String::from).collect();

        self.document(&file, &span)
    }

    /// Dispatch the top-level elements of the document `file`.
    ///
    /// `span` is the location of whatever requested the document.
    fn document(&mut self, file: &FileHandle, span: &Span) -> Result<(), SkinError> {
        let text = self
            .archive
            .read_as_text(file)
            .map_err(|e| SkinError::Archive(e, span.clone()))?;

        let root = parse_fragment(&text, Context::from(file.path()))?;

        self.chain.push(file.path().to_string());
        self.children(&root)?;
        self.chain.pop();

        Ok(())
    }

    fn children(&mut self, ele: &Element) -> Result<(), SkinError> {
        ele.child_elements().try_for_each(|child| self.element(child))
    }

    fn element(&mut self, ele: &Element) -> Result<(), SkinError> {
        let kind = NodeKind::from_name(ele.name()).ok_or_else(|| {
            SkinError::UnknownNodeKind(ele.name().to_string(), ele.span().clone())
        })?;

        #[cfg(feature = "parser-trace")]
        debug!(element = ele.name(), span = %ele.span(), "dispatch");

        let policy = kind.policy();

        if policy.is_leaf() {
            assert_leaf(ele)?;
        }

        match policy {
            Policy::Stub => Ok(()),
            Policy::Terminal | Policy::Opaque => self.terminal(kind, ele),

            Policy::Structural => {
                self.ctx.enter();

                if self.open(kind, ele)? {
                    self.children(ele)?;
                }

                self.ctx.exit();
                Ok(())
            }
        }
    }

    /// Construct the object for a structural element,
    ///   if any,
    ///   returning whether its children should be dispatched.
    fn open(&mut self, kind: NodeKind, ele: &Element) -> Result<bool, SkinError> {
        match kind {
            NodeKind::Container => self.container(ele),
            NodeKind::Layout => self.layout(ele),
            NodeKind::Group => self.group(ele),
            NodeKind::GroupDef => self.group_def(ele),
            NodeKind::Layer => self.layer(ele),
            _ => Ok(true),
        }
    }

    fn terminal(&mut self, kind: NodeKind, ele: &Element) -> Result<(), SkinError> {
        match kind {
            NodeKind::Include => self.include(ele),
            NodeKind::Bitmap => self.bitmap(ele),
            NodeKind::Script => self.script(ele),
            NodeKind::SkinInfo => {
                self.skin_info(ele);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn container(&mut self, ele: &Element) -> Result<bool, SkinError> {
        let mut container = Container::default();
        set_attributes(&mut container, ele);

        let oi = self.skin.add_container(container, ele.span().clone());
        self.ctx.set_container(oi);

        Ok(true)
    }

    fn layout(&mut self, ele: &Element) -> Result<bool, SkinError> {
        let container = self
            .ctx
            .container()
            .ok_or_else(|| missing_context(ele, ContextSlot::Container))?;

        let mut layout = Layout::default();
        set_attributes(&mut layout, ele);

        let oi = self.skin.add_layout(container, layout, ele.span().clone());
        self.ctx.set_layout(oi);
        self.ctx.set_parent_region(oi);

        Ok(true)
    }

    fn group(&mut self, ele: &Element) -> Result<bool, SkinError> {
        let mut group = Group::default();
        set_attributes(&mut group, ele);

        let parent = self.ctx.parent_region();
        let oi = self.skin.add_group(parent, group, ele.span().clone());
        self.ctx.set_parent_region(oi);

        Ok(true)
    }

    fn group_def(&mut self, ele: &Element) -> Result<bool, SkinError> {
        let mut group = Group::default();
        set_attributes(&mut group, ele);

        let oi = self.skin.add_group_def(group, ele.span().clone());
        self.ctx.set_parent_region(oi);

        Ok(true)
    }

    fn layer(&mut self, ele: &Element) -> Result<bool, SkinError> {
        let mut layer = Layer::default();
        set_attributes(&mut layer, ele);

        match (self.ctx.layout(), self.opts.orphan_layers) {
            (Some(layout), _) => {
                self.skin.add_layer(layout, layer, ele.span().clone());
                Ok(true)
            }

            (None, OrphanLayerPolicy::Fail) => {
                Err(missing_context(ele, ContextSlot::Layout))
            }

            (None, OrphanLayerPolicy::Drop) => {
                self.warn(SkinWarning::OrphanLayer(ele.span().clone()));
                Ok(false)
            }
        }
    }

    fn bitmap(&mut self, ele: &Element) -> Result<(), SkinError> {
        let span = ele.span();

        let mut bitmap = Bitmap::default();
        set_attributes(&mut bitmap, ele);

        let name = bitmap.id().or(bitmap.file()).unwrap_or_default().to_string();
        let (oi, prev) = self.skin.register_bitmap(bitmap, span.clone());

        if let Some(prev) = prev {
            let prev_span = self.skin.span(prev).clone();
            self.warn(SkinWarning::DuplicateBitmap(name.clone(), span.clone(), prev_span));
        }

        match self.images.load(self.skin.get(oi), self.archive) {
            Ok(image) => self.skin.get_mut(oi).set_image(image),
            Err(ImageError::Disabled) => (),
            Err(e) => {
                self.warn(SkinWarning::ImageUnavailable(name, e, span.clone()))
            }
        }

        Ok(())
    }

    fn script(&mut self, ele: &Element) -> Result<(), SkinError> {
        let span = ele.span();
        let file = required_attr(ele, "file")?;
        let id = required_attr(ele, "id")?;

        let region = self
            .ctx
            .parent_region()
            .ok_or_else(|| missing_context(ele, ContextSlot::ParentRegion))?;

        let handle = self
            .archive
            .find(file)
            .map_err(|e| archive_error(e, file, span, SkinError::NotFound))?;

        let bytes = self
            .archive
            .read(&handle)
            .map_err(|e| SkinError::Archive(e, span.clone()))?;

        match (self.scripts.decode(&bytes), self.opts.script_failures) {
            (Ok(script), _) => {
                let mut sysobj = SystemObject::new(id, file, script);

                if let Some(param) = ele.attr("param") {
                    sysobj = sysobj.with_param(param);
                }

                self.skin.add_system_object(region, sysobj, span.clone());
            }

            (Err(e), ScriptFailurePolicy::Abort) => {
                return Err(SkinError::ScriptDecode(file.into(), e, span.clone()));
            }

            (Err(e), ScriptFailurePolicy::Drop) => {
                self.warn(SkinWarning::ScriptDropped(file.into(), e, span.clone()))
            }
        }

        Ok(())
    }

    fn include(&mut self, ele: &Element) -> Result<(), SkinError> {
        let span = ele.span();
        let file = required_attr(ele, "file")?;

        if self.chain.len() > self.opts.max_include_depth {
            return Err(SkinError::IncludeTooDeep(
                self.opts.max_include_depth,
                span.clone(),
            ));
        }

        let (dirs, name) = split_path(file);
        let pushed = dirs.len();
        self.dirs.extend(dirs.into_iter().map(String::from));

        let path = self
            .dirs
            .iter()
            .map(String::as_str)
            .chain([name])
            .collect::<Vec<_>>()
            .join("/");

        debug!(file, path = %path, depth = self.chain.len(), "include");

        let handle = self.archive.find(&path).map_err(|e| {
            archive_error(e, &path, span, SkinError::IncludeNotFound)
        })?;

        if self.chain.iter().any(|active| active == handle.path()) {
            return Err(SkinError::IncludeCycle(
                handle.path().to_string(),
                span.clone(),
            ));
        }

        self.document(&handle, span)?;
        self.dirs.truncate(self.dirs.len() - pushed);

        Ok(())
    }

    fn skin_info(&mut self, ele: &Element) {
        let mut info = SkinInfo::default();

        for child in ele.child_elements() {
            let key = child.name().to_ascii_lowercase();

            if !info.accept_attribute(&key, &child.text()) {
                trace!(element = child.name(), "ignoring unknown skin info");
            }
        }

        self.skin.set_info(info);
    }

    fn warn(&mut self, warning: SkinWarning) {
        warn!(span = %warning.span(), "{warning}");
        self.skin.push_warning(warning);
    }

    /// Complete interpretation,
    ///   checking references that may be satisfied by elements
    ///   appearing later in the walk.
    fn finish(mut self) -> Skin {
        let unresolved = self
            .skin
            .regions()
            .filter_map(|region| {
                let id = self.skin.region(region).background()?;

                self.skin.bitmap(id).is_none().then(|| {
                    SkinWarning::UnresolvedBackground(
                        id.to_string(),
                        self.skin.region_span(region).clone(),
                    )
                })
            })
            .collect::<Vec<_>>();

        unresolved.into_iter().for_each(|w| self.warn(w));
        self.skin
    }
}

/// Apply the attributes of `ele` to `obj`,
///   tracing those that were ignored.
fn set_attributes<O: AcceptAttribute>(obj: &mut O, ele: &Element) {
    for name in set_xml_attributes(obj, ele) {
        trace!(element = ele.name(), attr = name, "ignoring unknown attribute");
    }
}

fn assert_leaf(ele: &Element) -> Result<(), SkinError> {
    match ele.first_content() {
        None => Ok(()),
        Some(child) => Err(SkinError::MalformedDocument(
            ele.name().to_string(),
            Malformation::UnexpectedChild(child.span().clone()),
            ele.span().clone(),
        )),
    }
}

fn required_attr<'e>(
    ele: &'e Element,
    name: &'static str,
) -> Result<&'e str, SkinError> {
    ele.attr(name).ok_or_else(|| {
        SkinError::MalformedDocument(
            ele.name().to_string(),
            Malformation::MissingAttribute(name),
            ele.span().clone(),
        )
    })
}

fn missing_context(ele: &Element, slot: ContextSlot) -> SkinError {
    SkinError::MissingContext(ele.name().to_string(), slot, ele.span().clone())
}

/// Convert an archive failure for `path` into a [`SkinError`],
///   using `not_found` to construct the error for a missing entry.
fn archive_error(
    e: ArchiveError,
    path: &str,
    span: &Span,
    not_found: fn(String, Span) -> SkinError,
) -> SkinError {
    match e {
        ArchiveError::NotFound(_) => not_found(path.to_string(), span.clone()),
        e => SkinError::Archive(e, span.clone()),
    }
}

/// Split `path` into its directory components and final name.
///
/// Both `/` and `\` separate components,
///   as they do for archive lookup.
/// Empty and relative (`.`, `..`) components are retained;
///   they are resolved later by archive path normalization against the
///   entire prefix stack.
fn split_path(path: &str) -> (Vec<&str>, &str) {
    let mut parts: Vec<&str> = path.split(['/', '\\']).collect();
    let name = parts.pop().unwrap_or_default();

    (parts, name)
}

#[cfg(test)]
mod test;
