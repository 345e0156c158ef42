// Skin object graph
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

//! Object graph produced by skin interpretation.
//!
//! Objects are stored as nodes on a directed graph and ownership is
//!   represented by edges from owner to owned:
//!
//!   - [`Container`] → [`Layout`];
//!   - [`Layout`] → [`Layer`];
//!   - region ([`Group`] or [`Layout`]) → [`Group`]; and
//!   - region → [`SystemObject`].
//!
//! Every object other than a [`Container`] or top-level [`Group`] has
//!   exactly one owner.
//! [`Bitmap`]s have no owner;
//!   they are instead held in an id-keyed registry so that any region may
//!   reference them.
//!
//! Objects are referenced by [`ObjectIndex`],
//!   which is typed by the kind of object that it is expected to
//!   reference.
//! Objects are never removed,
//!   so an index remains valid for the lifetime of its [`Skin`].
//!
//! Ordering
//! ========
//! Children are returned in the order in which they were added,
//!   which is document order.
//! [`petgraph`] does not guarantee any order of edge iteration,
//!   so edges are ordered by their index,
//!     which increases monotonically since edges are never removed.

use std::{
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use fxhash::FxHashMap;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
    Direction,
};

use super::{
    error::SkinWarning,
    object::{
        Bitmap, Container, Group, Layer, Layout, SkinInfo, SystemObject,
    },
};
use crate::span::Span;

/// Any object that may be stored on the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Container(Container),
    Layout(Layout),
    Layer(Layer),
    Group(Group),
    SystemObject(SystemObject),
    Bitmap(Bitmap),
}

/// A type of [`Object`] that an [`ObjectIndex`] may reference.
pub trait ObjectKind: Into<Object> {
    /// Human-readable name of this kind of object.
    const NAME: &'static str;

    fn narrow(obj: &Object) -> Option<&Self>;
    fn narrow_mut(obj: &mut Object) -> Option<&mut Self>;
}

macro_rules! object_kinds {
    ($($kind:ident => $name:literal,)*) => {
        $(
            impl From<$kind> for Object {
                fn from(obj: $kind) -> Self {
                    Self::$kind(obj)
                }
            }

            impl ObjectKind for $kind {
                const NAME: &'static str = $name;

                fn narrow(obj: &Object) -> Option<&Self> {
                    match obj {
                        Object::$kind(x) => Some(x),
                        _ => None,
                    }
                }

                fn narrow_mut(obj: &mut Object) -> Option<&mut Self> {
                    match obj {
                        Object::$kind(x) => Some(x),
                        _ => None,
                    }
                }
            }
        )*

        impl Object {
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $( Self::$kind(_) => $name, )*
                }
            }
        }
    }
}

object_kinds! {
    Container => "container",
    Layout => "layout",
    Layer => "layer",
    Group => "group",
    SystemObject => "system object",
    Bitmap => "bitmap",
}

/// Index of an object of kind `O` on a [`Skin`].
///
/// An index is only meaningful for the [`Skin`] that produced it.
pub struct ObjectIndex<O: ObjectKind>(NodeIndex, PhantomData<O>);

impl<O: ObjectKind> ObjectIndex<O> {
    fn new(index: NodeIndex) -> Self {
        Self(index, PhantomData)
    }

    fn node(&self) -> NodeIndex {
        self.0
    }
}

// Derives would place bounds on `O`.
impl<O: ObjectKind> Clone for ObjectIndex<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: ObjectKind> Copy for ObjectIndex<O> {}

impl<O: ObjectKind> PartialEq for ObjectIndex<O> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<O: ObjectKind> Eq for ObjectIndex<O> {}

impl<O: ObjectKind> Hash for ObjectIndex<O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<O: ObjectKind> Debug for ObjectIndex<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ObjectIndex<{}>({})", O::NAME, self.0.index())
    }
}

/// An object that may own [`Group`]s and [`SystemObject`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionIndex {
    Group(ObjectIndex<Group>),
    Layout(ObjectIndex<Layout>),
}

impl RegionIndex {
    fn node(&self) -> NodeIndex {
        match self {
            Self::Group(oi) => oi.node(),
            Self::Layout(oi) => oi.node(),
        }
    }
}

impl From<ObjectIndex<Group>> for RegionIndex {
    fn from(oi: ObjectIndex<Group>) -> Self {
        Self::Group(oi)
    }
}

impl From<ObjectIndex<Layout>> for RegionIndex {
    fn from(oi: ObjectIndex<Layout>) -> Self {
        Self::Layout(oi)
    }
}

#[derive(Debug, Clone)]
struct Node {
    obj: Object,
    span: Span,
}

/// The result of interpreting a skin.
#[derive(Debug, Default)]
pub struct Skin {
    graph: DiGraph<Node, ()>,

    /// Containers in document order.
    containers: Vec<ObjectIndex<Container>>,

    /// Groups constructed outside of any region.
    groups: Vec<ObjectIndex<Group>>,

    /// Groups constructed by `<groupdef>`,
    ///   in document order.
    group_defs: Vec<ObjectIndex<Group>>,

    /// Group definitions by lowercase id.
    group_def_ids: FxHashMap<String, ObjectIndex<Group>>,

    /// Bitmap registry by lowercase id.
    bitmaps: FxHashMap<String, ObjectIndex<Bitmap>>,

    info: Option<SkinInfo>,
    warnings: Vec<SkinWarning>,
}

impl Skin {
    pub fn new() -> Self {
        Self::default()
    }

    fn add<O: ObjectKind>(&mut self, obj: O, span: Span) -> ObjectIndex<O> {
        ObjectIndex::new(self.graph.add_node(Node {
            obj: obj.into(),
            span,
        }))
    }

    fn add_owned<O: ObjectKind>(
        &mut self,
        owner: NodeIndex,
        obj: O,
        span: Span,
    ) -> ObjectIndex<O> {
        let oi = self.add(obj, span);
        self.graph.add_edge(owner, oi.node(), ());
        oi
    }

    pub(super) fn add_container(
        &mut self,
        container: Container,
        span: Span,
    ) -> ObjectIndex<Container> {
        let oi = self.add(container, span);
        self.containers.push(oi);
        oi
    }

    pub(super) fn add_layout(
        &mut self,
        container: ObjectIndex<Container>,
        layout: Layout,
        span: Span,
    ) -> ObjectIndex<Layout> {
        self.add_owned(container.node(), layout, span)
    }

    pub(super) fn add_layer(
        &mut self,
        layout: ObjectIndex<Layout>,
        layer: Layer,
        span: Span,
    ) -> ObjectIndex<Layer> {
        self.add_owned(layout.node(), layer, span)
    }

    /// Add a group beneath `parent`,
    ///   or as a top-level group if there is no parent.
    pub(super) fn add_group(
        &mut self,
        parent: Option<RegionIndex>,
        group: Group,
        span: Span,
    ) -> ObjectIndex<Group> {
        match parent {
            Some(region) => self.add_owned(region.node(), group, span),
            None => {
                let oi = self.add(group, span);
                self.groups.push(oi);
                oi
            }
        }
    }

    /// Add a group definition,
    ///   registering it by id if it has one.
    ///
    /// A later definition of the same id replaces the former in the id
    ///   lookup,
    ///     but both remain in [`Skin::group_defs`].
    pub(super) fn add_group_def(
        &mut self,
        group: Group,
        span: Span,
    ) -> ObjectIndex<Group> {
        let key = group.id().map(str::to_ascii_lowercase);
        let oi = self.add(group, span);

        self.group_defs.push(oi);
        if let Some(key) = key {
            self.group_def_ids.insert(key, oi);
        }

        oi
    }

    pub(super) fn add_system_object(
        &mut self,
        region: RegionIndex,
        sysobj: SystemObject,
        span: Span,
    ) -> ObjectIndex<SystemObject> {
        self.add_owned(region.node(), sysobj, span)
    }

    /// Register a bitmap by its id,
    ///   returning the index of any bitmap that it replaced.
    ///
    /// A bitmap without an id is stored but cannot be referenced.
    pub(super) fn register_bitmap(
        &mut self,
        bitmap: Bitmap,
        span: Span,
    ) -> (ObjectIndex<Bitmap>, Option<ObjectIndex<Bitmap>>) {
        let key = bitmap.id().map(str::to_ascii_lowercase);
        let oi = self.add(bitmap, span);

        let prev = key.and_then(|key| self.bitmaps.insert(key, oi));
        (oi, prev)
    }

    pub(super) fn set_info(&mut self, info: SkinInfo) {
        self.info = Some(info);
    }

    pub(super) fn push_warning(&mut self, warning: SkinWarning) {
        self.warnings.push(warning);
    }

    /// Retrieve the object referenced by `oi`.
    ///
    /// Panics
    /// ======
    /// An [`ObjectIndex`] can only be constructed by this graph for an
    ///   object of its own kind,
    ///     so this panics only if `oi` was produced by a different
    ///     [`Skin`].
    pub fn get<O: ObjectKind>(&self, oi: ObjectIndex<O>) -> &O {
        let obj = &self.graph[oi.node()].obj;

        O::narrow(obj).unwrap_or_else(|| {
            panic!("{oi:?} references a {}", obj.kind_name())
        })
    }

    pub fn get_mut<O: ObjectKind>(&mut self, oi: ObjectIndex<O>) -> &mut O {
        let obj = &mut self.graph[oi.node()].obj;
        let found = obj.kind_name();

        match O::narrow_mut(obj) {
            Some(x) => x,
            None => panic!("{oi:?} references a {found}"),
        }
    }

    /// Location of the element from which the object was constructed.
    pub fn span<O: ObjectKind>(&self, oi: ObjectIndex<O>) -> &Span {
        &self.graph[oi.node()].span
    }

    /// Region attributes of a group or layout.
    pub fn region(&self, region: RegionIndex) -> &Group {
        match region {
            RegionIndex::Group(oi) => self.get(oi),
            RegionIndex::Layout(oi) => self.get(oi).group(),
        }
    }

    pub fn region_span(&self, region: RegionIndex) -> &Span {
        &self.graph[region.node()].span
    }

    /// Objects of kind `O` owned by `owner`,
    ///   in the order in which they were added.
    fn owned<O: ObjectKind>(&self, owner: NodeIndex) -> Vec<ObjectIndex<O>> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(owner, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();

        edges.sort_by_key(|(id, _)| *id);

        edges
            .into_iter()
            .filter(|(_, target)| O::narrow(&self.graph[*target].obj).is_some())
            .map(|(_, target)| ObjectIndex::new(target))
            .collect()
    }

    fn owner(&self, owned: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(owned, Direction::Incoming)
            .next()
    }

    fn region_of(&self, node: NodeIndex) -> Option<RegionIndex> {
        self.owner(node).and_then(|owner| match self.graph[owner].obj {
            Object::Group(_) => Some(ObjectIndex::<Group>::new(owner).into()),
            Object::Layout(_) => Some(ObjectIndex::<Layout>::new(owner).into()),
            _ => None,
        })
    }

    /// Containers in document order.
    pub fn containers(&self) -> &[ObjectIndex<Container>] {
        &self.containers
    }

    /// Groups that were constructed outside of any region.
    pub fn groups(&self) -> &[ObjectIndex<Group>] {
        &self.groups
    }

    /// Groups constructed by `<groupdef>` in document order.
    pub fn group_defs(&self) -> &[ObjectIndex<Group>] {
        &self.group_defs
    }

    /// Look up a group definition by id,
    ///   ignoring case.
    pub fn group_def(&self, id: &str) -> Option<ObjectIndex<Group>> {
        self.group_def_ids.get(&id.to_ascii_lowercase()).copied()
    }

    pub fn layouts(
        &self,
        container: ObjectIndex<Container>,
    ) -> Vec<ObjectIndex<Layout>> {
        self.owned(container.node())
    }

    pub fn layers(&self, layout: ObjectIndex<Layout>) -> Vec<ObjectIndex<Layer>> {
        self.owned(layout.node())
    }

    /// Groups nested directly within `region`.
    pub fn child_groups<R: Into<RegionIndex>>(
        &self,
        region: R,
    ) -> Vec<ObjectIndex<Group>> {
        self.owned(region.into().node())
    }

    pub fn system_objects<R: Into<RegionIndex>>(
        &self,
        region: R,
    ) -> Vec<ObjectIndex<SystemObject>> {
        self.owned(region.into().node())
    }

    pub fn container_of(
        &self,
        layout: ObjectIndex<Layout>,
    ) -> Option<ObjectIndex<Container>> {
        self.owner(layout.node()).map(ObjectIndex::new)
    }

    pub fn layout_of(&self, layer: ObjectIndex<Layer>) -> Option<ObjectIndex<Layout>> {
        self.owner(layer.node()).map(ObjectIndex::new)
    }

    /// Region that a script is bound to.
    pub fn owner_of(
        &self,
        sysobj: ObjectIndex<SystemObject>,
    ) -> Option<RegionIndex> {
        self.region_of(sysobj.node())
    }

    /// Region enclosing a group,
    ///   or [`None`] for top-level groups and group definitions.
    pub fn parent_of(&self, group: ObjectIndex<Group>) -> Option<RegionIndex> {
        self.region_of(group.node())
    }

    /// Every group and layout on the graph,
    ///   in the order in which they were added.
    pub fn regions(&self) -> impl Iterator<Item = RegionIndex> + '_ {
        self.graph
            .node_indices()
            .filter_map(|ni| match self.graph[ni].obj {
                Object::Group(_) => Some(ObjectIndex::<Group>::new(ni).into()),
                Object::Layout(_) => {
                    Some(ObjectIndex::<Layout>::new(ni).into())
                }
                _ => None,
            })
    }

    /// Look up a registered bitmap by id,
    ///   ignoring case.
    pub fn bitmap(&self, id: &str) -> Option<ObjectIndex<Bitmap>> {
        self.bitmaps.get(&id.to_ascii_lowercase()).copied()
    }

    /// Registered bitmaps in the order in which they were registered.
    ///
    /// Bitmaps that were replaced by a later registration of the same id
    ///   are omitted.
    pub fn bitmaps(&self) -> Vec<ObjectIndex<Bitmap>> {
        let mut all: Vec<_> = self.bitmaps.values().copied().collect();
        all.sort_by_key(|oi| oi.node());
        all
    }

    /// Resolve the background bitmap of a region through the bitmap
    ///   registry.
    pub fn background<R: Into<RegionIndex>>(
        &self,
        region: R,
    ) -> Option<ObjectIndex<Bitmap>> {
        self.region(region.into())
            .background()
            .and_then(|id| self.bitmap(id))
    }

    pub fn info(&self) -> Option<&SkinInfo> {
        self.info.as_ref()
    }

    /// Non-fatal conditions encountered during interpretation,
    ///   in the order in which they occurred.
    pub fn warnings(&self) -> &[SkinWarning] {
        &self.warnings
    }

    /// Total number of objects on the graph.
    pub fn object_count(&self) -> usize {
        self.graph.node_count()
    }
}
