//! A headless document for formatbar.
//!
//! [`HeadlessDocument`] is a small slab-backed DOM with just enough behaviour to stand in for a
//! browser page: element and text nodes, `contenteditable` inheritance, a live selection that
//! survives tree mutation the way DOM live ranges do, a fixed-advance text layout, inline
//! styles, and a log of executed rich-text commands.
//!
//! It implements every host capability from `formatbar-traits`, so a toolbar controller can be
//! driven end to end in tests.

mod document;
mod host;
pub mod node;
mod selection;

pub use document::{DocumentOptions, HeadlessDocument};
pub use node::{Attribute, ElementData, InlineStyle, Node, NodeData, TextData, TextLayout};
pub use selection::{BoundaryPoint, DetachedRange, Selection};
