//! Selection state and the live-range bookkeeping that keeps it stable across tree mutation.
//!
//! The update rules mirror the DOM's live range behaviour for insertion, removal, text
//! splitting and `normalize()`, so that inserting and then removing a measurement marker leaves
//! the selection exactly where it started.

/// A position in the tree: a character offset into a text node, or a child index into an
/// element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: usize,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: usize, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The live selection. `anchor` is where the selection started, `focus` where it ends; the
/// focus may precede the anchor for backwards selections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: BoundaryPoint,
    pub focus: BoundaryPoint,
}

impl Selection {
    pub fn new(anchor: BoundaryPoint, focus: BoundaryPoint) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self::new(point, point)
    }

    pub(crate) fn points_mut(&mut self) -> [&mut BoundaryPoint; 2] {
        [&mut self.anchor, &mut self.focus]
    }
}

/// A snapshot of a range. Unlike the selection it is not updated by mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetachedRange {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl DetachedRange {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn collapse_to_start(&mut self) {
        self.end = self.start;
    }
}

/// `child` was inserted into `parent` at `index`.
pub(crate) fn on_insert(point: &mut BoundaryPoint, parent: usize, index: usize) {
    if point.node == parent && point.offset > index {
        point.offset += 1;
    }
}

/// The child at `index` of `parent` is about to be removed. `inside_removed` tells whether
/// `point` lives in the removed subtree.
pub(crate) fn on_remove(point: &mut BoundaryPoint, parent: usize, index: usize, inside_removed: bool) {
    if inside_removed {
        *point = BoundaryPoint::new(parent, index);
    } else if point.node == parent && point.offset > index {
        point.offset -= 1;
    }
}

/// Text node `text` (child `index` of `parent`) was split at `offset`, the tail moving to
/// `tail`, which was inserted right after it.
pub(crate) fn on_split(
    point: &mut BoundaryPoint,
    text: usize,
    offset: usize,
    tail: usize,
    parent: usize,
    index: usize,
) {
    if point.node == text && point.offset > offset {
        *point = BoundaryPoint::new(tail, point.offset - offset);
    } else if point.node == parent && point.offset > index {
        point.offset += 1;
    }
}

/// Text node `merged` (child `index` of `parent`) is being appended onto `into`, whose text was
/// `length` characters long before the merge.
pub(crate) fn on_merge(
    point: &mut BoundaryPoint,
    into: usize,
    length: usize,
    merged: usize,
    parent: usize,
    index: usize,
) {
    if point.node == merged {
        *point = BoundaryPoint::new(into, length + point.offset);
    } else if point.node == parent && point.offset == index {
        *point = BoundaryPoint::new(into, length);
    }
}
