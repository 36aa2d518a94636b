//! Finding where on screen the active selection starts.

use formatbar_traits::{Point, Rect, SelectionApi};

/// The viewport position of the start of the active selection.
///
/// The first range is collapsed to its start and measured. Engines that have no layout box for
/// a collapsed caret report `(0, 0)`; in that case a zero-width marker is inserted at the caret,
/// measured, and removed again. Returns [`Point::ZERO`] when nothing is selected.
pub fn resolve_anchor<H: SelectionApi>(host: &mut H) -> Point {
    let Some(mut range) = host.first_range() else {
        return Point::ZERO;
    };
    host.collapse_to_start(&mut range);

    let caret = top_left(&host.range_rects(&range));
    if caret != Point::ZERO {
        return caret;
    }

    let Some(marker) = host.insert_marker(&range) else {
        return Point::ZERO;
    };
    let guard = MarkerGuard { host, marker };
    let anchor = top_left(&guard.host.node_rects(&guard.marker));

    #[cfg(feature = "tracing")]
    tracing::trace!("Measured collapsed selection through marker: {anchor:?}");

    anchor
}

fn top_left(rects: &[Rect]) -> Point {
    rects
        .first()
        .map_or(Point::ZERO, |rect| Point::new(rect.min_x(), rect.min_y()))
}

/// Removes the measurement marker when dropped, whichever way measurement went.
struct MarkerGuard<'a, H: SelectionApi> {
    host: &'a mut H,
    marker: H::Node,
}

impl<H: SelectionApi> Drop for MarkerGuard<'_, H> {
    fn drop(&mut self) {
        self.host.remove_marker(&self.marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formatbar_dom::{DocumentOptions, HeadlessDocument, TextLayout};

    fn document(degenerate: bool) -> (HeadlessDocument, usize, usize) {
        let mut doc = HeadlessDocument::with_options(DocumentOptions {
            degenerate_collapsed_rects: degenerate,
            ..Default::default()
        });
        let div = doc.create_element("div");
        doc.set_attribute(div, "contenteditable", "true");
        doc.append_child(doc.body_id(), div);
        let text = doc.create_text_node("hello world");
        doc.append_child(div, text);
        doc.set_text_layout(text, TextLayout::new(Point::new(40.0, 100.0), 10.0, 20.0));
        (doc, div, text)
    }

    #[test]
    fn nothing_selected_resolves_to_origin() {
        let (mut doc, _, _) = document(false);
        assert_eq!(resolve_anchor(&mut doc), Point::ZERO);
    }

    #[test]
    fn caret_rect_is_used_when_available() {
        let (mut doc, _, text) = document(false);
        doc.select_text(text, 6, 11);
        let count = doc.node_count();

        assert_eq!(resolve_anchor(&mut doc), Point::new(100.0, 100.0));
        assert_eq!(doc.node_count(), count);
    }

    #[test]
    fn degenerate_caret_falls_back_to_a_marker_that_is_removed() {
        let (mut doc, div, text) = document(true);
        doc.select_text(text, 6, 11);
        let selection = doc.selection();
        let count = doc.node_count();

        assert_eq!(resolve_anchor(&mut doc), Point::new(100.0, 100.0));
        assert_eq!(doc.children(div), &[text]);
        assert_eq!(doc.text(text), Some("hello world"));
        assert_eq!(doc.node_count(), count);
        assert_eq!(doc.selection(), selection);
        assert_eq!(doc.selected_text(), "world");
    }

    #[test]
    fn backwards_selection_anchors_at_its_document_start() {
        let (mut doc, _, text) = document(true);
        doc.select_text(text, 11, 6);
        assert_eq!(resolve_anchor(&mut doc), Point::new(100.0, 100.0));
        assert_eq!(doc.children(doc.parent(text).unwrap()), &[text]);
    }

    #[test]
    fn marker_is_removed_even_when_it_cannot_be_measured() {
        let (mut doc, div, text) = document(true);
        let bare = doc.create_text_node("no layout");
        doc.append_child(div, bare);
        doc.select_text(bare, 0, 2);
        let count = doc.node_count();

        assert_eq!(resolve_anchor(&mut doc), Point::ZERO);
        assert_eq!(doc.children(div), &[text, bare]);
        assert_eq!(doc.node_count(), count);
    }

    #[test]
    fn collapsed_selection_falls_back_to_a_marker_and_is_restored() {
        let (mut doc, div, text) = document(true);
        doc.select_text(text, 3, 3);
        let selection = doc.selection();
        let count = doc.node_count();

        assert_eq!(resolve_anchor(&mut doc), Point::new(70.0, 100.0));
        assert_eq!(doc.children(div), &[text]);
        assert_eq!(doc.text(text), Some("hello world"));
        assert_eq!(doc.node_count(), count);
        assert_eq!(doc.selection(), selection);
        assert_eq!(doc.selected_text(), "");
    }

    #[test]
    fn selection_at_an_element_boundary() {
        let (mut doc, div, text) = document(false);
        doc.set_selection(
            formatbar_dom::BoundaryPoint::new(div, 0),
            formatbar_dom::BoundaryPoint::new(text, 5),
        );
        let count = doc.node_count();

        // No caret box for an element container: the marker lands before the text run.
        assert_eq!(resolve_anchor(&mut doc), Point::new(40.0, 100.0));
        assert_eq!(doc.children(div), &[text]);
        assert_eq!(doc.node_count(), count);
    }
}
