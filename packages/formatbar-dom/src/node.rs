//! The nodes themselves, and their data.

use formatbar_traits::{Display, Point};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Node {
    pub id: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(id: usize, data: NodeData) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_text_node(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    pub fn element_data(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn element_data_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn text_data(&self) -> Option<&TextData> {
        match &self.data {
            NodeData::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn text_data_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.data {
            NodeData::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element_data().and_then(|el| el.attr(name))
    }
}

#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document root
    Document,
    Element(ElementData),
    Text(TextData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub style: InlineStyle,
    /// Top-left of the element's box, if it has been laid out
    pub origin: Option<Point>,
    pub size: Option<kurbo::Size>,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: InlineStyle::default(),
            origin: None,
            size: None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attrs.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// The subset of inline style the toolbar writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub opacity: Option<f64>,
    pub display: Option<Display>,
    pub transition: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    pub content: String,
    pub layout: Option<TextLayout>,
}

impl TextData {
    pub fn new(content: String) -> Self {
        Self {
            content,
            layout: None,
        }
    }

    /// Length in characters. Boundary offsets into text nodes count characters.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Byte index of the `offset`-th character, clamped to the end of the text.
    pub(crate) fn byte_index(&self, offset: usize) -> usize {
        self.content
            .char_indices()
            .nth(offset)
            .map_or(self.content.len(), |(idx, _)| idx)
    }
}

/// A single-line, fixed-advance layout for a text node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    /// Top-left of the first character
    pub origin: Point,
    /// Horizontal advance of every character
    pub advance: f64,
    pub line_height: f64,
}

impl TextLayout {
    pub fn new(origin: Point, advance: f64, line_height: f64) -> Self {
        Self {
            origin,
            advance,
            line_height,
        }
    }

    /// The x coordinate of the caret before character `offset`.
    pub fn caret_x(&self, offset: usize) -> f64 {
        self.origin.x + self.advance * offset as f64
    }

    /// The layout of the text that starts at character `offset`.
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            origin: Point::new(self.caret_x(offset), self.origin.y),
            ..*self
        }
    }

    pub fn caret_rect(&self, offset: usize) -> kurbo::Rect {
        let x = self.caret_x(offset);
        kurbo::Rect::new(x, self.origin.y, x, self.origin.y + self.line_height)
    }

    pub fn span_rect(&self, start: usize, end: usize) -> kurbo::Rect {
        kurbo::Rect::new(
            self.caret_x(start),
            self.origin.y,
            self.caret_x(end),
            self.origin.y + self.line_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_count_characters_not_bytes() {
        let text = TextData::new("héllo".into());
        assert_eq!(text.len(), 5);
        assert_eq!(text.byte_index(2), 3);
        assert_eq!(text.byte_index(99), text.content.len());
    }

    #[test]
    fn shifted_layout_starts_at_the_caret() {
        let layout = TextLayout::new(Point::new(10.0, 20.0), 8.0, 16.0);
        assert_eq!(layout.shifted(3).origin, Point::new(34.0, 20.0));
        assert_eq!(layout.caret_rect(1), kurbo::Rect::new(18.0, 20.0, 18.0, 36.0));
    }
}
