// Skin parse context
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

//! Ancestor state threaded through the interpreter walk.
//!
//! Three slots identify the objects that newly constructed objects are
//!   owned by:
//!
//!   - the active [`Container`],
//!       which owns any new [`Layout`];
//!   - the active [`Layout`],
//!       which owns any new [`Layer`](crate::skin::Layer);
//!       and
//!   - the active parent region,
//!       which owns any new [`Group`](crate::skin::Group) or
//!       [`SystemObject`](crate::skin::SystemObject).
//!
//! The context never owns the objects that it references;
//!   it holds only indexes into the [`Skin`](crate::skin::Skin) graph.
//!
//! Scoping
//! =======
//! With [`ContextScoping::Lexical`],
//!   the interpreter calls [`ParseContext::enter`] before processing a
//!   structural element and [`ParseContext::exit`] afterward,
//!     so that slots set by an element are visible only to its
//!     descendants.
//! With [`ContextScoping::Flat`],
//!   entering and exiting have no effect and a slot retains its value
//!   until it is next overwritten,
//!     even by a following sibling of an unrelated ancestor.
//! Some skins may depend on the latter.

use crate::skin::{Container, Layout, ObjectIndex, RegionIndex};

/// How slots of the [`ParseContext`] are restored when leaving an
///   element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextScoping {
    /// Restore all slots on exit from a structural element.
    #[default]
    Lexical,

    /// Never restore slots.
    Flat,
}

/// A snapshot of context slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    container: Option<ObjectIndex<Container>>,
    layout: Option<ObjectIndex<Layout>>,
    parent_region: Option<RegionIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContext {
    scoping: ContextScoping,
    top: Frame,

    /// Frames to restore on [`ParseContext::exit`],
    ///   innermost last.
    saved: Vec<Frame>,
}

impl ParseContext {
    pub fn new(scoping: ContextScoping) -> Self {
        Self {
            scoping,
            top: Frame::default(),
            saved: Vec::new(),
        }
    }

    pub fn scoping(&self) -> ContextScoping {
        self.scoping
    }

    pub fn container(&self) -> Option<ObjectIndex<Container>> {
        self.top.container
    }

    pub fn layout(&self) -> Option<ObjectIndex<Layout>> {
        self.top.layout
    }

    pub fn parent_region(&self) -> Option<RegionIndex> {
        self.top.parent_region
    }

    pub fn set_container(&mut self, oi: ObjectIndex<Container>) {
        self.top.container = Some(oi);
    }

    pub fn set_layout(&mut self, oi: ObjectIndex<Layout>) {
        self.top.layout = Some(oi);
    }

    pub fn set_parent_region<R: Into<RegionIndex>>(&mut self, region: R) {
        self.top.parent_region = Some(region.into());
    }

    /// Begin a new scope.
    pub fn enter(&mut self) {
        if self.scoping == ContextScoping::Lexical {
            self.saved.push(self.top);
        }
    }

    /// End the scope begun by the most recent [`ParseContext::enter`],
    ///   restoring the slots that were active when it began.
    ///
    /// Exiting more scopes than were entered leaves the outermost slots
    ///   unchanged.
    pub fn exit(&mut self) {
        if let Some(frame) = self.saved.pop() {
            self.top = frame;
        }
    }

    /// Number of scopes that have been entered but not yet exited.
    ///
    /// This is always zero for [`ContextScoping::Flat`].
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(ContextScoping::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        skin::{Group, Skin},
        span::Span,
    };

    fn fixture() -> (Skin, ObjectIndex<Container>, ObjectIndex<Container>) {
        let mut skin = Skin::new();
        let a = skin.add_container(Container::default(), Span::unknown());
        let b = skin.add_container(Container::default(), Span::unknown());
        (skin, a, b)
    }

    #[test]
    fn lexical_restores_on_exit() {
        let (_, a, b) = fixture();
        let mut sut = ParseContext::new(ContextScoping::Lexical);

        sut.enter();
        sut.set_container(a);

        sut.enter();
        sut.set_container(b);
        assert_eq!(Some(b), sut.container());
        sut.exit();

        assert_eq!(Some(a), sut.container());
        sut.exit();

        assert_eq!(None, sut.container());
        assert_eq!(0, sut.depth());
    }

    #[test]
    fn flat_persists_after_exit() {
        let (_, a, _) = fixture();
        let mut sut = ParseContext::new(ContextScoping::Flat);

        sut.enter();
        sut.set_container(a);
        sut.exit();

        assert_eq!(Some(a), sut.container());
        assert_eq!(0, sut.depth());
    }

    #[test]
    fn slots_are_independent() {
        let (mut skin, a, _) = fixture();
        let layout = skin.add_layout(a, Layout::default(), Span::unknown());
        let group = skin.add_group(None, Group::default(), Span::unknown());

        let mut sut = ParseContext::default();

        sut.set_container(a);
        sut.set_layout(layout);
        sut.set_parent_region(layout);

        sut.enter();
        sut.set_parent_region(group);

        assert_eq!(Some(layout), sut.layout());
        assert_eq!(Some(RegionIndex::Group(group)), sut.parent_region());

        sut.exit();
        assert_eq!(Some(RegionIndex::Layout(layout)), sut.parent_region());
    }

    #[test]
    fn unbalanced_exit_keeps_slots() {
        let (_, a, _) = fixture();
        let mut sut = ParseContext::default();

        sut.set_container(a);
        sut.exit();

        assert_eq!(Some(a), sut.container());
    }
}
