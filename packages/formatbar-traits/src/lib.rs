//! Shared traits and types for formatbar.
//!
//! The toolbar controller never talks to a document directly. Everything it needs from its
//! embedder (selection queries, inline style mutation, rich-text commands) is expressed by the
//! capability traits in this crate, so that a headless document and a browser backend can be
//! swapped without touching the controller.

pub use kurbo::{Point, Rect, Size};

mod events;
pub use events::ToolbarEvent;

mod command;
pub use command::{CommandApi, CommandError, FormatAction, FormatCommand, ParseActionError};

mod selection;
pub use selection::SelectionApi;

mod style;
pub use style::{Display, InstallError, StyleApi};

pub mod markup;

/// Types shared by every host capability.
pub trait HostTypes {
    /// A handle to a node in the host document.
    type Node: Clone + std::fmt::Debug;
}

/// Everything the toolbar controller needs from its embedder.
pub trait Host: SelectionApi + StyleApi + CommandApi {}
impl<T: SelectionApi + StyleApi + CommandApi> Host for T {}
