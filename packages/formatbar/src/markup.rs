//! The toolbar fragment and its stylesheet.

use formatbar_traits::FormatAction;
use formatbar_traits::markup::{ElementTemplate, Stylesheet, ToolbarMarkup};

/// `id` of the toolbar root element.
pub const TOOLBAR_ID: &str = "highlightTooltip";

/// Attribute naming the [`FormatAction`] a toolbar button performs.
pub const ACTION_ATTRIBUTE: &str = "data-format-action";

pub const BUTTON_CLASS: &str = "text-formatter-button";

pub const MATERIAL_ICONS_URL: &str = "https://fonts.googleapis.com/icon?family=Material+Icons";

const TOOLBAR_CSS: &str = "\
.text-formatter-button {cursor: pointer; background-color: transparent; border: 0; padding: 2px; color: white; border-radius: 2px;}\
.text-formatter-button:hover {background-color: #616161;}\
.material-icons.md-18 {font-size: 18px;}\
#highlightTooltip {box-shadow: 0 4px 5px 0 rgba(0,0,0,0.14), 0 1px 10px 0 rgba(0,0,0,0.12), 0 2px 4px -1px rgba(0,0,0,0.3); border-radius: 4px; position: absolute; display: none; background-color: #212121; padding: 8px;}";

fn button_id(action: FormatAction) -> &'static str {
    match action {
        FormatAction::Bold => "formatBoldButton",
        FormatAction::Italic => "formatItalicButton",
        FormatAction::Underline => "formatUnderlineButton",
        FormatAction::FontSizeDown => "fontSizeDownButton",
        FormatAction::FontSizeUp => "fontSizeUpButton",
    }
}

fn icon(action: FormatAction) -> ElementTemplate {
    let glyph = match action {
        FormatAction::Bold => "format_bold",
        FormatAction::Italic => "format_italic",
        FormatAction::Underline => "format_underline",
        FormatAction::FontSizeDown | FormatAction::FontSizeUp => "format_size",
    };
    let icon = ElementTemplate::new("i");
    let icon = match action {
        // smaller glyph for "smaller text"
        FormatAction::FontSizeDown => icon
            .attr("class", "material-icons md-18")
            .attr("style", "padding: 3px"),
        _ => icon.attr("class", "material-icons"),
    };
    icon.text(glyph)
}

/// The toolbar: a panel holding one button per [`FormatAction`].
pub fn toolbar_markup() -> ToolbarMarkup {
    let root = FormatAction::ALL
        .into_iter()
        .fold(ElementTemplate::new("div").attr("id", TOOLBAR_ID), |root, action| {
            root.child(
                ElementTemplate::new("button")
                    .attr("class", BUTTON_CLASS)
                    .attr("id", button_id(action))
                    .attr("type", "button")
                    .attr(ACTION_ATTRIBUTE, action.as_str())
                    .child(icon(action)),
            )
        });
    ToolbarMarkup { root }
}

/// The toolbar stylesheet, linking the icon font when one is configured.
pub fn stylesheet(icon_font_url: Option<&str>) -> Stylesheet {
    Stylesheet {
        css: TOOLBAR_CSS.to_string(),
        links: icon_font_url.map(str::to_string).into_iter().collect(),
    }
}
