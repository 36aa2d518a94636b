/// The notifications the toolbar reacts to.
///
/// Pointer and keyboard payloads are not carried. Only clicks and scrolls say where they
/// happened, which decides whether they dismiss the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarEvent<N> {
    SelectionChange,
    MouseUp,
    KeyUp,
    Click { target: N },
    Scroll { target: N },
}

impl<N> ToolbarEvent<N> {
    /// Returns the name of the event ("selectionchange", "click", etc)
    pub fn name(&self) -> &'static str {
        match self {
            ToolbarEvent::SelectionChange => "selectionchange",
            ToolbarEvent::MouseUp => "mouseup",
            ToolbarEvent::KeyUp => "keyup",
            ToolbarEvent::Click { .. } => "click",
            ToolbarEvent::Scroll { .. } => "scroll",
        }
    }

    /// The node the event was dispatched to, if the event is targeted.
    pub fn target(&self) -> Option<&N> {
        match self {
            ToolbarEvent::Click { target } | ToolbarEvent::Scroll { target } => Some(target),
            _ => None,
        }
    }
}
