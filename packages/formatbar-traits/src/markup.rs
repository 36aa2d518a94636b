//! Structured element templates, built in Rust and materialised by the host.

/// A child of an [`ElementTemplate`].
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChild {
    Element(ElementTemplate),
    Text(String),
}

/// An element to be created by the host, with its attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTemplate {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<TemplateChild>,
}

impl ElementTemplate {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: ElementTemplate) -> Self {
        self.children.push(TemplateChild::Element(child));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(TemplateChild::Text(text.into()));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Depth-first iterator over this element and its element descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &ElementTemplate> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            for child in next.children.iter().rev() {
                if let TemplateChild::Element(el) = child {
                    stack.push(el);
                }
            }
            Some(next)
        })
    }
}

/// The toolbar fragment injected into the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarMarkup {
    pub root: ElementTemplate,
}

/// Style rules injected once into the document head, plus external stylesheets to link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub css: String,
    pub links: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendants_are_visited_in_document_order() {
        let tree = ElementTemplate::new("div")
            .attr("id", "root")
            .child(ElementTemplate::new("button").child(ElementTemplate::new("i").text("a")))
            .child(ElementTemplate::new("button"));

        let tags: Vec<&str> = tree.descendants().map(|el| el.tag.as_str()).collect();
        assert_eq!(tags, ["div", "button", "i", "button"]);
        assert_eq!(tree.get_attr("id"), Some("root"));
        assert_eq!(tree.get_attr("class"), None);
    }
}
