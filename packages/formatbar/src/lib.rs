//! A floating formatting toolbar for text selections.
//!
//! When the user finishes selecting text inside an editable region, a small toolbar fades in
//! near the start of the selection offering bold, italic, underline and font size controls.
//! It fades out again when the selection goes away or the user clicks or scrolls elsewhere.
//!
//! The controller ([`TextFormatter`]) is sans-IO: it reaches the document only through the
//! capability traits in [`traits`] and keeps time only through the `now` values its embedder
//! passes in. Two hosts are available:
//!
//!  - [`HeadlessDocument`](https://docs.rs/formatbar-dom) from the `formatbar-dom` crate, an
//!    in-memory document used for tests and for embedders that do their own rendering.
//!  - [`web::WebHost`] (with the `web` feature), which drives a real browser page through
//!    `web-sys`. [`web::mount`] wires up the event listeners and timers as well.
//!
//! ## Feature flags
//!  - `default`: Enables `tracing`.
//!  - `tracing`: Enables tracing support.
//!  - `serde`: Enables (de)serialization of [`FormatterConfig`].
//!  - `web`: Enables the browser backend.

mod anchor;
mod config;
mod fade;
mod formatter;
mod markup;
mod placement;
mod timer;

#[cfg(feature = "web")]
pub mod web;

pub use anchor::resolve_anchor;
pub use config::{ConfigError, FontSizeRange, FormatterConfig};
pub use fade::{FadeAnimator, FadeDirection, FadeTimer};
pub use formatter::{FormatterError, TextFormatter, VisibilityState};
pub use markup::{
    ACTION_ATTRIBUTE, BUTTON_CLASS, MATERIAL_ICONS_URL, TOOLBAR_ID, stylesheet, toolbar_markup,
};
pub use placement::PlacementPolicy;
pub use timer::{TimerId, TimerQueue};

pub use formatbar_traits as traits;
pub use formatbar_traits::{FormatAction, Host, Point, ToolbarEvent};
