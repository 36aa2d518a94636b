use crate::HostTypes;
use kurbo::Rect;

/// Read access to the host's active text selection, plus the handful of mutations needed to
/// measure a collapsed selection that has no layout box of its own.
pub trait SelectionApi: HostTypes {
    /// A detached copy of a selection range. Mutating it does not move the live selection.
    type Range;

    /// The serialized text of the active selection. Empty when nothing is selected.
    fn selected_text(&self) -> String;

    /// The node the selection started in.
    fn anchor_node(&self) -> Option<Self::Node>;

    /// Whether the element containing `node` is user-editable.
    fn is_in_editable_region(&self, node: &Self::Node) -> bool;

    /// A copy of the first range of the active selection.
    fn first_range(&self) -> Option<Self::Range>;

    fn collapse_to_start(&self, range: &mut Self::Range);

    /// The client rectangles of `range`, in viewport coordinates.
    fn range_rects(&self, range: &Self::Range) -> Vec<Rect>;

    /// Inserts a zero-width marker element at the start of `range` and returns it.
    fn insert_marker(&mut self, range: &Self::Range) -> Option<Self::Node>;

    fn node_rects(&self, node: &Self::Node) -> Vec<Rect>;

    /// Detaches a marker created by [`insert_marker`](Self::insert_marker) and merges the text
    /// nodes it split, leaving the document as it was before.
    fn remove_marker(&mut self, marker: &Self::Node);
}
