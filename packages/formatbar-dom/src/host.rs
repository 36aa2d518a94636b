//! Host capability implementations for [`HeadlessDocument`].

use crate::document::HeadlessDocument;
use crate::node::{Node, TextLayout};
use crate::selection::DetachedRange;
use formatbar_traits::markup::{ElementTemplate, Stylesheet, TemplateChild, ToolbarMarkup};
use formatbar_traits::{
    CommandApi, CommandError, Display, FormatCommand, HostTypes, InstallError, Point, Rect,
    SelectionApi, Size, StyleApi,
};
use std::time::Duration;

/// Content of the measurement marker: a single zero-width space.
const MARKER_TEXT: &str = "\u{200b}";

impl HostTypes for HeadlessDocument {
    type Node = usize;
}

impl SelectionApi for HeadlessDocument {
    type Range = DetachedRange;

    fn selected_text(&self) -> String {
        self.selection
            .map(|selection| self.range_text(&self.ordered(selection)))
            .unwrap_or_default()
    }

    fn anchor_node(&self) -> Option<usize> {
        self.selection.map(|selection| selection.anchor.node)
    }

    fn is_in_editable_region(&self, node: &usize) -> bool {
        self.parent_element(*node)
            .is_some_and(|parent| self.is_content_editable(parent))
    }

    fn first_range(&self) -> Option<DetachedRange> {
        self.selection.map(|selection| self.ordered(selection))
    }

    fn collapse_to_start(&self, range: &mut DetachedRange) {
        range.collapse_to_start();
    }

    fn range_rects(&self, range: &DetachedRange) -> Vec<Rect> {
        self.rects_for_range(range)
    }

    fn insert_marker(&mut self, range: &DetachedRange) -> Option<usize> {
        let start = range.start;
        let node = self.get_node(start.node)?;

        // Like `Range.insertNode`, a text container is split and the marker goes between the
        // two halves.
        let (parent, index, split) = if node.is_text_node() {
            let parent = self.parent(start.node)?;
            let tail = self.split_text(start.node, start.offset)?;
            (parent, self.child_index(tail)?, Some(start.node))
        } else {
            (start.node, start.offset.min(node.children.len()), None)
        };

        let layout = self.layout_at(parent, index).map(|layout| TextLayout {
            advance: 0.0,
            ..layout
        });
        let marker = self.create_element("span");
        let text = self.create_text_node(MARKER_TEXT);
        if let Some(layout) = layout {
            self.set_text_layout(text, layout);
        }
        self.append_child(marker, text);
        self.insert_at(parent, marker, index);
        if let Some(head) = split {
            self.split_markers.insert(marker, head);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("Inserted marker {marker} into node {parent} at {index}");

        Some(marker)
    }

    fn node_rects(&self, node: &usize) -> Vec<Rect> {
        self.rects_for_node(*node)
    }

    fn remove_marker(&mut self, marker: &usize) {
        self.drop_node(*marker);
        // Only the split made for the marker is undone; text nodes that were already adjacent
        // stay separate.
        if let Some(head) = self.split_markers.remove(marker) {
            self.merge_with_next_text(head);
        }
    }
}

impl HeadlessDocument {
    fn build(&mut self, template: &ElementTemplate) -> usize {
        let id = self.create_element(&template.tag);
        for (name, value) in &template.attrs {
            self.set_attribute(id, name, value);
        }
        for child in &template.children {
            let child_id = match child {
                TemplateChild::Element(el) => self.build(el),
                TemplateChild::Text(text) => self.create_text_node(text),
            };
            self.append_child(id, child_id);
        }
        id
    }

    fn style_mut(&mut self, element: usize) -> Option<&mut crate::node::InlineStyle> {
        self.get_node_mut(element)
            .and_then(Node::element_data_mut)
            .map(|el| &mut el.style)
    }
}

impl StyleApi for HeadlessDocument {
    fn install(
        &mut self,
        markup: &ToolbarMarkup,
        stylesheet: &Stylesheet,
    ) -> Result<usize, InstallError> {
        let head = self.head_id();
        for href in &stylesheet.links {
            let linked = self
                .stylesheets
                .iter()
                .any(|sheet| sheet.links.contains(href));
            if linked {
                continue;
            }
            let link = self.build(
                &ElementTemplate::new("link")
                    .attr("rel", "stylesheet")
                    .attr("href", href.as_str()),
            );
            self.append_child(head, link);
        }
        let style = self.build(&ElementTemplate::new("style").text(stylesheet.css.as_str()));
        self.append_child(head, style);
        self.stylesheets.push(stylesheet.clone());

        let root = self.build(&markup.root);
        self.append_child(self.body_id(), root);
        Ok(root)
    }

    fn set_position(&mut self, element: &usize, top_left: Point) {
        if let Some(style) = self.style_mut(*element) {
            style.top = Some(top_left.y);
            style.left = Some(top_left.x);
        }
    }

    fn opacity(&self, element: &usize) -> Option<f64> {
        self.get_node(*element)?.element_data()?.style.opacity
    }

    fn set_opacity(&mut self, element: &usize, opacity: f64) {
        if let Some(style) = self.style_mut(*element) {
            style.opacity = Some(opacity);
        }
    }

    fn set_display(&mut self, element: &usize, display: Display) {
        if let Some(style) = self.style_mut(*element) {
            style.display = Some(display);
        }
    }

    fn set_transition(&mut self, element: &usize, duration: Option<Duration>) {
        if let Some(style) = self.style_mut(*element) {
            style.transition = duration;
        }
    }

    fn supports_transitions(&self) -> bool {
        self.options.supports_transitions
    }

    fn contains(&self, root: &usize, node: &usize) -> bool {
        self.is_inclusive_ancestor(*root, *node)
    }

    fn closest_attribute(&self, node: &usize, name: &str) -> Option<String> {
        let mut current = Some(*node);
        while let Some(id) = current {
            let node = self.get_node(id)?;
            if let Some(value) = node.attr(name) {
                return Some(value.to_string());
            }
            current = node.parent;
        }
        None
    }

    fn element_size(&self, element: &usize) -> Option<Size> {
        self.get_node(*element)?.element_data()?.size
    }
}

impl CommandApi for HeadlessDocument {
    fn exec_command(&mut self, command: FormatCommand) -> Result<(), CommandError> {
        if self.reject_commands {
            return Err(CommandError::Rejected {
                command: command.name(),
            });
        }
        if let Some(value) = command.value() {
            self.set_command_value(command.name(), &value);
        }
        self.command_log.push(command);
        Ok(())
    }

    fn query_command_value(&self, name: &str) -> Option<String> {
        self.command_values.get(&name.to_ascii_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::BoundaryPoint;

    fn editable_text(doc: &mut HeadlessDocument, text: &str) -> (usize, usize) {
        let div = doc.create_element("div");
        doc.set_attribute(div, "contenteditable", "");
        doc.append_child(doc.body_id(), div);
        let t = doc.create_text_node(text);
        doc.append_child(div, t);
        doc.set_text_layout(t, TextLayout::new(Point::new(20.0, 100.0), 10.0, 18.0));
        (div, t)
    }

    #[test]
    fn selection_reports_text_and_editability() {
        let mut doc = HeadlessDocument::new();
        let (_, t) = editable_text(&mut doc, "some words");
        assert_eq!(doc.selected_text(), "");

        doc.select_text(t, 5, 10);
        assert_eq!(doc.selected_text(), "words");
        let anchor = doc.anchor_node().unwrap();
        assert!(doc.is_in_editable_region(&anchor));

        let plain = doc.create_text_node("read only");
        doc.append_child(doc.body_id(), plain);
        assert!(!doc.is_in_editable_region(&plain));
    }

    #[test]
    fn marker_in_text_is_measured_at_the_split_and_cleaned_up() {
        let mut doc = HeadlessDocument::new();
        let (div, t) = editable_text(&mut doc, "some words");
        doc.select_text(t, 5, 10);
        let count = doc.node_count();

        let mut range = doc.first_range().unwrap();
        doc.collapse_to_start(&mut range);
        let marker = doc.insert_marker(&range).unwrap();
        assert_eq!(doc.children(div).len(), 3);
        assert_eq!(
            doc.node_rects(&marker),
            vec![Rect::new(70.0, 100.0, 70.0, 118.0)]
        );

        doc.remove_marker(&marker);
        assert_eq!(doc.children(div), &[t]);
        assert_eq!(doc.text(t), Some("some words"));
        assert_eq!(doc.node_count(), count);
        assert_eq!(
            doc.selection().map(|s| (s.anchor, s.focus)),
            Some((BoundaryPoint::new(t, 5), BoundaryPoint::new(t, 10)))
        );
    }

    #[test]
    fn install_builds_the_fragment_once_per_link() {
        let mut doc = HeadlessDocument::new();
        let markup = ToolbarMarkup {
            root: ElementTemplate::new("div")
                .attr("id", "bar")
                .child(ElementTemplate::new("button").attr("data-action", "bold")),
        };
        let sheet = Stylesheet {
            css: "#bar { display: none; }".into(),
            links: vec!["https://example.com/icons.css".into()],
        };

        let root = doc.install(&markup, &sheet).unwrap();
        doc.install(&markup, &sheet).unwrap();

        assert_eq!(doc.element_by_id("bar"), Some(root));
        let links = doc
            .children(doc.head_id())
            .iter()
            .filter(|id| doc.get_node(**id).and_then(|n| n.attr("rel")) == Some("stylesheet"))
            .count();
        assert_eq!(links, 1);

        let button = doc.children(root)[0];
        assert_eq!(
            doc.closest_attribute(&button, "data-action").as_deref(),
            Some("bold")
        );
        assert_eq!(doc.closest_attribute(&root, "data-action"), None);
        assert!(doc.contains(&root, &button));
        assert!(!doc.contains(&button, &root));
    }

    #[test]
    fn commands_are_logged_and_font_size_is_queryable() {
        let mut doc = HeadlessDocument::new();
        assert_eq!(doc.query_command_value("fontSize"), None);
        doc.exec_command(FormatCommand::FontSize(5)).unwrap();
        assert_eq!(doc.query_command_value("fontSize").as_deref(), Some("5"));

        doc.reject_commands(true);
        assert_eq!(
            doc.exec_command(FormatCommand::Bold),
            Err(CommandError::Rejected { command: "bold" })
        );
        assert_eq!(doc.executed_commands(), &[FormatCommand::FontSize(5)]);
    }
}
