use crate::HostTypes;
use crate::markup::{Stylesheet, ToolbarMarkup};
use kurbo::{Point, Size};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    None,
    Block,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstallError {
    #[error("no document is available")]
    MissingDocument,
    #[error("the document has no <head> element")]
    MissingHead,
    #[error("the document has no <body> element")]
    MissingBody,
    #[error("host error: {0}")]
    Host(String),
}

/// Injection of the toolbar fragment and inline style mutation on it.
pub trait StyleApi: HostTypes {
    /// Inserts the stylesheet and the toolbar markup into the document, returning the toolbar
    /// root element.
    fn install(
        &mut self,
        markup: &ToolbarMarkup,
        stylesheet: &Stylesheet,
    ) -> Result<Self::Node, InstallError>;

    /// Sets the element's `top`/`left` from `top_left`.
    fn set_position(&mut self, element: &Self::Node, top_left: Point);

    /// The element's inline opacity, `None` if unset.
    fn opacity(&self, element: &Self::Node) -> Option<f64>;

    fn set_opacity(&mut self, element: &Self::Node, opacity: f64);

    fn set_display(&mut self, element: &Self::Node, display: Display);

    /// Sets (or with `None`, clears) a linear opacity transition of the given length.
    fn set_transition(&mut self, element: &Self::Node, duration: Option<Duration>) {
        let _ = (element, duration);
    }

    /// Whether [`set_transition`](Self::set_transition) animates opacity on its own.
    fn supports_transitions(&self) -> bool {
        false
    }

    /// Whether `node` is `root` or one of its descendants.
    fn contains(&self, root: &Self::Node, node: &Self::Node) -> bool;

    /// The value of attribute `name` on `node` or its nearest ancestor carrying it.
    fn closest_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// The rendered size of an element, if the host performs layout.
    fn element_size(&self, element: &Self::Node) -> Option<Size> {
        let _ = element;
        None
    }
}
