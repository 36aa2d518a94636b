use crate::node::{ElementData, Node, NodeData, TextData, TextLayout};
use crate::selection::{self, BoundaryPoint, DetachedRange, Selection};
use formatbar_traits::markup::Stylesheet;
use formatbar_traits::{FormatCommand, Point, Rect, Size};
use slab::Slab;
use std::collections::HashMap;

/// Options used when constructing a [`HeadlessDocument`]
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    /// Report a `(0, 0)` rectangle for every collapsed range, the way some engines do for a
    /// caret that has no layout box.
    pub degenerate_collapsed_rects: bool,
    /// Advertise native opacity transitions to the toolbar.
    pub supports_transitions: bool,
}

/// An in-memory document: `#document > html > (head, body)`.
pub struct HeadlessDocument {
    pub(crate) nodes: Slab<Node>,
    root: usize,
    head: usize,
    body: usize,

    pub(crate) selection: Option<Selection>,
    pub(crate) options: DocumentOptions,

    pub(crate) stylesheets: Vec<Stylesheet>,
    pub(crate) command_log: Vec<FormatCommand>,
    pub(crate) command_values: HashMap<String, String>,
    pub(crate) reject_commands: bool,
    /// Measurement markers that split a text node, mapped to the node holding the head
    pub(crate) split_markers: HashMap<usize, usize>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Self {
        let mut nodes = Slab::new();
        let root = nodes.insert(Node::new(0, NodeData::Document));
        nodes[root].id = root;

        let mut doc = Self {
            nodes,
            root,
            head: root,
            body: root,
            selection: None,
            options,
            stylesheets: Vec::new(),
            command_log: Vec::new(),
            command_values: HashMap::new(),
            reject_commands: false,
            split_markers: HashMap::new(),
        };

        let html = doc.create_element("html");
        doc.append_child(root, html);
        doc.head = doc.create_element("head");
        doc.append_child(html, doc.head);
        doc.body = doc.create_element("body");
        doc.append_child(html, doc.body);
        doc
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DocumentOptions {
        &mut self.options
    }

    pub fn root_id(&self) -> usize {
        self.root
    }

    pub fn head_id(&self) -> usize {
        self.head
    }

    pub fn body_id(&self) -> usize {
        self.body
    }

    /// Number of allocated nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get_node(&self, node_id: usize) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn get_node_mut(&mut self, node_id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    fn create_node(&mut self, data: NodeData) -> usize {
        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        entry.insert(Node::new(id, data));
        id
    }

    pub fn create_element(&mut self, name: &str) -> usize {
        self.create_node(NodeData::Element(ElementData::new(name)))
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        self.create_node(NodeData::Text(TextData::new(text.to_string())))
    }

    pub fn set_attribute(&mut self, node_id: usize, name: &str, value: &str) {
        if let Some(el) = self.nodes.get_mut(node_id).and_then(Node::element_data_mut) {
            el.set_attr(name, value);
        }
    }

    pub fn set_text_layout(&mut self, node_id: usize, layout: TextLayout) {
        if let Some(text) = self.nodes.get_mut(node_id).and_then(Node::text_data_mut) {
            text.layout = Some(layout);
        }
    }

    pub fn set_element_box(&mut self, node_id: usize, origin: Point, size: Size) {
        if let Some(el) = self.nodes.get_mut(node_id).and_then(Node::element_data_mut) {
            el.origin = Some(origin);
            el.size = Some(size);
        }
    }

    pub fn parent(&self, node_id: usize) -> Option<usize> {
        self.nodes.get(node_id)?.parent
    }

    pub fn children(&self, node_id: usize) -> &[usize] {
        self.nodes
            .get(node_id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn child_index(&self, node_id: usize) -> Option<usize> {
        let parent = self.parent(node_id)?;
        self.nodes[parent]
            .children
            .iter()
            .position(|id| *id == node_id)
    }

    /// The content of a text node.
    pub fn text(&self, node_id: usize) -> Option<&str> {
        self.nodes
            .get(node_id)?
            .text_data()
            .map(|text| text.content.as_str())
    }

    fn text_len(&self, node_id: usize) -> usize {
        self.nodes[node_id].text_data().map_or(0, TextData::len)
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn parent_element(&self, node_id: usize) -> Option<usize> {
        let parent = self.parent(node_id)?;
        self.nodes[parent].is_element().then_some(parent)
    }

    /// `isContentEditable`: the nearest `contenteditable` attribute on the element or its
    /// ancestors decides.
    pub fn is_content_editable(&self, node_id: usize) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            let Some(el) = self.nodes.get(id).and_then(Node::element_data) else {
                return false;
            };
            match el.attr("contenteditable") {
                Some("" | "true" | "plaintext-only") => return true,
                Some("false") => return false,
                _ => current = self.nodes[id].parent,
            }
        }
        false
    }

    /// Appends `child` as the last child of `parent`, detaching it from its old parent first.
    pub fn append_child(&mut self, parent: usize, child: usize) {
        let index = self.nodes[parent].children.len();
        self.insert_at(parent, child, index);
    }

    /// Inserts `child` into `parent` before `reference`, or at the end when `reference` is
    /// `None` or not a child of `parent`.
    pub fn insert_before(&mut self, parent: usize, child: usize, reference: Option<usize>) {
        if self.nodes[child].parent.is_some() {
            self.remove_node(child);
        }
        let index = reference
            .and_then(|reference| {
                self.nodes[parent]
                    .children
                    .iter()
                    .position(|id| *id == reference)
            })
            .unwrap_or(self.nodes[parent].children.len());
        self.insert_at(parent, child, index);
    }

    pub(crate) fn insert_at(&mut self, parent: usize, child: usize, index: usize) {
        if self.nodes[child].parent.is_some() {
            self.remove_node(child);
        }
        let index = index.min(self.nodes[parent].children.len());
        self.nodes[parent].children.insert(index, child);
        self.nodes[child].parent = Some(parent);

        self.update_live_points(|point, _| selection::on_insert(point, parent, index));
    }

    /// Detaches `node_id` from its parent. The node stays allocated and can be re-inserted.
    pub fn remove_node(&mut self, node_id: usize) {
        let Some(parent) = self.parent(node_id) else {
            return;
        };
        let Some(index) = self.child_index(node_id) else {
            return;
        };

        self.update_live_points(|point, doc| {
            let inside = doc.is_inclusive_ancestor(node_id, point.node);
            selection::on_remove(point, parent, index, inside);
        });

        self.nodes[parent].children.remove(index);
        self.nodes[node_id].parent = None;
    }

    /// Detaches `node_id` and frees it along with its descendants.
    pub fn drop_node(&mut self, node_id: usize) {
        self.remove_node(node_id);
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.try_remove(id) {
                stack.extend(node.children);
            }
        }
    }

    /// Splits a text node at character `offset`, returning the new node holding the tail.
    pub fn split_text(&mut self, node_id: usize, offset: usize) -> Option<usize> {
        let text = self.nodes.get(node_id)?.text_data()?;
        let offset = offset.min(text.len());
        let byte_index = text.byte_index(offset);
        let tail_content = text.content[byte_index..].to_string();
        let tail_layout = text.layout.map(|layout| layout.shifted(offset));

        if let Some(text) = self.nodes[node_id].text_data_mut() {
            text.content.truncate(byte_index);
        }
        let tail = self.create_node(NodeData::Text(TextData {
            content: tail_content,
            layout: tail_layout,
        }));

        if let Some(parent) = self.parent(node_id) {
            let index = self.child_index(node_id).unwrap_or_default();
            self.nodes[parent].children.insert(index + 1, tail);
            self.nodes[tail].parent = Some(parent);
            self.update_live_points(|point, _| {
                selection::on_split(point, node_id, offset, tail, parent, index)
            });
        }

        Some(tail)
    }

    /// `Node.normalize()`: removes empty text nodes and merges adjacent ones in the subtree.
    pub fn normalize(&mut self, node_id: usize) {
        let mut index = 0;
        while index < self.children(node_id).len() {
            let child = self.nodes[node_id].children[index];

            if self.nodes[child].is_element() {
                self.normalize(child);
                index += 1;
                continue;
            }
            if !self.nodes[child].is_text_node() {
                index += 1;
                continue;
            }
            if self.text_len(child) == 0 {
                self.drop_node(child);
                continue;
            }

            while self.merge_with_next_text(child) {}
            index += 1;
        }
    }

    /// Appends the text of the sibling following `node_id` onto it and frees the sibling, if
    /// both are text nodes. Returns whether a merge happened.
    pub(crate) fn merge_with_next_text(&mut self, node_id: usize) -> bool {
        let (Some(parent), Some(index)) = (self.parent(node_id), self.child_index(node_id)) else {
            return false;
        };
        let Some(&next) = self.nodes[parent].children.get(index + 1) else {
            return false;
        };
        if !self.nodes[node_id].is_text_node() || !self.nodes[next].is_text_node() {
            return false;
        }

        let length = self.text_len(node_id);
        let appended = self.nodes[next]
            .text_data()
            .map(|text| text.content.clone())
            .unwrap_or_default();
        if let Some(text) = self.nodes[node_id].text_data_mut() {
            text.content.push_str(&appended);
        }
        self.update_live_points(|point, _| {
            selection::on_merge(point, node_id, length, next, parent, index + 1)
        });
        self.drop_node(next);
        true
    }

    /// Runs `update` over every live boundary point.
    fn update_live_points(&mut self, mut update: impl FnMut(&mut BoundaryPoint, &Self)) {
        if let Some(mut selection) = self.selection.take() {
            for point in selection.points_mut() {
                update(point, self);
            }
            self.selection = Some(selection);
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, anchor: BoundaryPoint, focus: BoundaryPoint) {
        self.selection = Some(Selection::new(anchor, focus));
    }

    /// Selects characters `start..end` of a text node.
    pub fn select_text(&mut self, node_id: usize, start: usize, end: usize) {
        self.set_selection(
            BoundaryPoint::new(node_id, start),
            BoundaryPoint::new(node_id, end),
        );
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Text nodes in tree order.
    pub fn text_nodes(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_text_node() {
                out.push(id);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// The concatenated text of a subtree.
    pub fn text_content(&self, node_id: usize) -> String {
        let mut out = String::new();
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if let Some(text) = node.text_data() {
                out.push_str(&text.content);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Number of characters in text nodes that precede `node_id` in tree order, excluding its
    /// own subtree.
    fn chars_before(&self, node_id: usize) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if id == node_id {
                return count;
            }
            let node = &self.nodes[id];
            count += node.text_data().map_or(0, TextData::len);
            stack.extend(node.children.iter().rev());
        }
        count
    }

    /// The position of a boundary point in the document's flattened text.
    pub(crate) fn text_position(&self, point: BoundaryPoint) -> usize {
        let Some(node) = self.nodes.get(point.node) else {
            return 0;
        };
        if let Some(text) = node.text_data() {
            return self.chars_before(point.node) + point.offset.min(text.len());
        }
        match node.children.get(point.offset) {
            Some(&child) => self.chars_before(child),
            None => {
                let inside = self.text_content(point.node).chars().count();
                self.chars_before(point.node) + inside
            }
        }
    }

    /// The selection's endpoints in document order.
    pub(crate) fn ordered(&self, selection: Selection) -> DetachedRange {
        let anchor = self.text_position(selection.anchor);
        let focus = self.text_position(selection.focus);
        if focus < anchor {
            DetachedRange {
                start: selection.focus,
                end: selection.anchor,
            }
        } else {
            DetachedRange {
                start: selection.anchor,
                end: selection.focus,
            }
        }
    }

    /// The text between two boundary points.
    pub fn range_text(&self, range: &DetachedRange) -> String {
        let start = self.text_position(range.start);
        let end = self.text_position(range.end);
        self.text_content(self.root)
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }

    /// Client rectangles of a range: a caret for a collapsed range, one box per text run
    /// otherwise.
    pub(crate) fn rects_for_range(&self, range: &DetachedRange) -> Vec<Rect> {
        if range.is_collapsed() {
            if self.options.degenerate_collapsed_rects {
                return vec![Rect::ZERO];
            }
            let Some(text) = self.nodes.get(range.start.node).and_then(Node::text_data) else {
                return Vec::new();
            };
            return text
                .layout
                .map(|layout| layout.caret_rect(range.start.offset.min(text.len())))
                .into_iter()
                .collect();
        }

        let start = self.text_position(range.start);
        let end = self.text_position(range.end);
        let mut rects = Vec::new();
        let mut position = 0;
        for id in self.text_nodes() {
            let Some(text) = self.nodes[id].text_data() else {
                continue;
            };
            let len = text.len();
            let (from, to) = (start.max(position), end.min(position + len));
            if from < to {
                if let Some(layout) = text.layout {
                    rects.push(layout.span_rect(from - position, to - position));
                }
            }
            position += len;
        }
        rects
    }

    /// Boxes of the laid-out text inside a node.
    pub(crate) fn rects_for_node(&self, node_id: usize) -> Vec<Rect> {
        let mut rects = Vec::new();
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if let Some(text) = node.text_data() {
                if let Some(layout) = text.layout {
                    rects.push(layout.span_rect(0, text.len()));
                }
            }
            stack.extend(node.children.iter().rev());
        }
        rects
    }

    /// Where text inserted at `index` among `parent`'s children would be laid out: after the
    /// preceding text run, else before the following one, else at the parent's own box.
    pub(crate) fn layout_at(&self, parent: usize, index: usize) -> Option<TextLayout> {
        let children = self.children(parent);
        let previous = index
            .checked_sub(1)
            .and_then(|i| children.get(i))
            .and_then(|id| self.nodes[*id].text_data())
            .and_then(|text| Some(text.layout?.shifted(text.len())));
        let next = || {
            children
                .get(index)
                .and_then(|id| self.nodes[*id].text_data())
                .and_then(|text| text.layout)
        };
        let own_box = || {
            let el = self.nodes[parent].element_data()?;
            let origin = el.origin?;
            let height = el.size.map_or(0.0, |size| size.height);
            Some(TextLayout::new(origin, 0.0, height))
        };
        previous.or_else(next).or_else(own_box)
    }

    /// Commands executed through the command facility, oldest first.
    pub fn executed_commands(&self) -> &[FormatCommand] {
        &self.command_log
    }

    /// Makes `queryCommandValue(name)` report `value`.
    pub fn set_command_value(&mut self, name: &str, value: &str) {
        self.command_values
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Makes every subsequent command report failure.
    pub fn reject_commands(&mut self, reject: bool) {
        self.reject_commands = reject;
    }

    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }

    /// Finds the first element with the given `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<usize> {
        let mut stack = vec![self.root];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            if node.attr("id") == Some(id) {
                return Some(node_id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}
