//! Browser backend on `web-sys`.
//!
//! [`WebHost`] implements the host capabilities over the live page. [`mount`] installs a
//! [`TextFormatter`] into the current page and keeps it fed with DOM events and timer wake-ups
//! until the returned [`WebToolbar`] is dropped.

use crate::config::FormatterConfig;
use crate::formatter::{FormatterError, TextFormatter};
use formatbar_traits::markup::{ElementTemplate, Stylesheet, TemplateChild, ToolbarMarkup};
use formatbar_traits::{
    CommandApi, CommandError, Display, FormatCommand, HostTypes, InstallError, Point, Rect,
    SelectionApi, Size, StyleApi, ToolbarEvent,
};
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use js_sys::Reflect;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CssStyleDeclaration, DomRect, DomRectList, Element, Event, HtmlDocument, HtmlElement, Node,
    Performance, Range, Selection, Window,
};

const MARKER_TEXT: &str = "\u{200b}";

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn to_rect(rect: DomRect) -> Rect {
    Rect::new(
        rect.x(),
        rect.y(),
        rect.x() + rect.width(),
        rect.y() + rect.height(),
    )
}

fn to_rects(list: DomRectList) -> Vec<Rect> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .map(to_rect)
        .collect()
}

/// The current page, as seen by the toolbar.
#[derive(Debug, Clone)]
pub struct WebHost {
    window: Window,
    document: HtmlDocument,
}

impl WebHost {
    pub fn new() -> Result<Self, InstallError> {
        let window = web_sys::window().ok_or(InstallError::MissingDocument)?;
        Self::from_window(window)
    }

    pub fn from_window(window: Window) -> Result<Self, InstallError> {
        let document = window
            .document()
            .and_then(|document| document.dyn_into::<HtmlDocument>().ok())
            .ok_or(InstallError::MissingDocument)?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &HtmlDocument {
        &self.document
    }

    fn selection(&self) -> Option<Selection> {
        self.window.get_selection().ok().flatten()
    }

    fn style(node: &Node) -> Option<CssStyleDeclaration> {
        node.dyn_ref::<HtmlElement>().map(HtmlElement::style)
    }

    fn build(&self, template: &ElementTemplate) -> Result<Element, InstallError> {
        let element = self
            .document
            .create_element(&template.tag)
            .map_err(|err| InstallError::Host(js_error(err)))?;
        for (name, value) in &template.attrs {
            element
                .set_attribute(name, value)
                .map_err(|err| InstallError::Host(js_error(err)))?;
        }
        for child in &template.children {
            let node: Node = match child {
                TemplateChild::Element(child) => self.build(child)?.into(),
                TemplateChild::Text(text) => self.document.create_text_node(text).into(),
            };
            element
                .append_child(&node)
                .map_err(|err| InstallError::Host(js_error(err)))?;
        }
        Ok(element)
    }

    fn has_stylesheet_link(&self, href: &str) -> bool {
        let selector = format!("link[rel=\"stylesheet\"][href=\"{href}\"]");
        matches!(self.document.query_selector(&selector), Ok(Some(_)))
    }
}

impl HostTypes for WebHost {
    type Node = Node;
}

impl SelectionApi for WebHost {
    type Range = Range;

    fn selected_text(&self) -> String {
        self.selection()
            .map(|selection| String::from(selection.to_string()))
            .unwrap_or_default()
    }

    fn anchor_node(&self) -> Option<Node> {
        self.selection()?.anchor_node()
    }

    fn is_in_editable_region(&self, node: &Node) -> bool {
        node.parent_element()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
            .is_some_and(|parent| parent.is_content_editable())
    }

    fn first_range(&self) -> Option<Range> {
        let selection = self.selection()?;
        if selection.range_count() == 0 {
            return None;
        }
        selection
            .get_range_at(0)
            .ok()
            .map(|range| range.clone_range())
    }

    fn collapse_to_start(&self, range: &mut Range) {
        range.collapse_with_to_start(true);
    }

    fn range_rects(&self, range: &Range) -> Vec<Rect> {
        range.get_client_rects().map(to_rects).unwrap_or_default()
    }

    fn insert_marker(&mut self, range: &Range) -> Option<Node> {
        let span = self.document.create_element("span").ok()?;
        span.set_text_content(Some(MARKER_TEXT));
        range.insert_node(&span).ok()?;
        Some(span.into())
    }

    fn node_rects(&self, node: &Node) -> Vec<Rect> {
        node.dyn_ref::<Element>()
            .map(|element| to_rects(element.get_client_rects()))
            .unwrap_or_default()
    }

    fn remove_marker(&mut self, marker: &Node) {
        let Some(parent) = marker.parent_node() else {
            return;
        };
        if let Err(_err) = parent.remove_child(marker) {
            #[cfg(feature = "tracing")]
            tracing::warn!("Could not remove measurement marker: {}", js_error(_err));
            return;
        }
        parent.normalize();
    }
}

impl StyleApi for WebHost {
    fn install(
        &mut self,
        markup: &ToolbarMarkup,
        stylesheet: &Stylesheet,
    ) -> Result<Node, InstallError> {
        let head = self.document.head().ok_or(InstallError::MissingHead)?;
        let body = self.document.body().ok_or(InstallError::MissingBody)?;

        for href in &stylesheet.links {
            if self.has_stylesheet_link(href) {
                continue;
            }
            let link = ElementTemplate::new("link")
                .attr("rel", "stylesheet")
                .attr("href", href.as_str());
            head.append_child(&self.build(&link)?)
                .map_err(|err| InstallError::Host(js_error(err)))?;
        }

        let style = ElementTemplate::new("style").text(stylesheet.css.as_str());
        head.append_child(&self.build(&style)?)
            .map_err(|err| InstallError::Host(js_error(err)))?;

        let root = self.build(&markup.root)?;
        body.append_child(&root)
            .map_err(|err| InstallError::Host(js_error(err)))
    }

    fn set_position(&mut self, element: &Node, top_left: Point) {
        if let Some(style) = Self::style(element) {
            let _ = style.set_property("top", &format!("{}px", top_left.y));
            let _ = style.set_property("left", &format!("{}px", top_left.x));
        }
    }

    fn opacity(&self, element: &Node) -> Option<f64> {
        Self::style(element)?
            .get_property_value("opacity")
            .ok()?
            .parse()
            .ok()
    }

    fn set_opacity(&mut self, element: &Node, opacity: f64) {
        if let Some(style) = Self::style(element) {
            let _ = style.set_property("opacity", &opacity.to_string());
        }
    }

    fn set_display(&mut self, element: &Node, display: Display) {
        if let Some(style) = Self::style(element) {
            let _ = style.set_property("display", display.as_css());
        }
    }

    fn set_transition(&mut self, element: &Node, duration: Option<Duration>) {
        let Some(style) = Self::style(element) else {
            return;
        };
        match duration {
            Some(duration) => {
                let transition = format!("opacity {}ms linear", duration.as_millis());
                let _ = style.set_property("transition", &transition);
            }
            None => {
                let _ = style.remove_property("transition");
            }
        }
    }

    fn supports_transitions(&self) -> bool {
        self.document
            .body()
            .is_some_and(|body| Reflect::has(&body.style(), &"transition".into()).unwrap_or(false))
    }

    fn contains(&self, root: &Node, node: &Node) -> bool {
        root.contains(Some(node))
    }

    fn closest_attribute(&self, node: &Node, name: &str) -> Option<String> {
        let element = match node.dyn_ref::<Element>() {
            Some(element) => element.clone(),
            None => node.parent_element()?,
        };
        element
            .closest(&format!("[{name}]"))
            .ok()??
            .get_attribute(name)
    }

    fn element_size(&self, element: &Node) -> Option<Size> {
        let rect = element.dyn_ref::<Element>()?.get_bounding_client_rect();
        Some(Size::new(rect.width(), rect.height()))
    }
}

impl CommandApi for WebHost {
    fn exec_command(&mut self, command: FormatCommand) -> Result<(), CommandError> {
        let value = command.value().unwrap_or_default();
        match self
            .document
            .exec_command_with_show_ui_and_value(command.name(), false, &value)
        {
            Ok(true) => Ok(()),
            Ok(false) => Err(CommandError::Rejected {
                command: command.name(),
            }),
            Err(err) => Err(CommandError::Host(js_error(err))),
        }
    }

    fn query_command_value(&self, name: &str) -> Option<String> {
        self.document.query_command_value(name).ok()
    }
}

struct Shared {
    formatter: RefCell<TextFormatter<WebHost>>,
    wake: RefCell<Option<Timeout>>,
    performance: Option<Performance>,
}

impl Shared {
    fn now(&self) -> Duration {
        let millis = self.performance.as_ref().map_or(0.0, Performance::now);
        Duration::try_from_secs_f64(millis / 1000.0).unwrap_or_default()
    }

    fn dispatch(self: &Rc<Self>, event: Option<ToolbarEvent<Node>>) {
        let now = self.now();
        let Ok(mut formatter) = self.formatter.try_borrow_mut() else {
            return;
        };
        if let Some(event) = event {
            formatter.handle_event(event, now);
        }
        formatter.poll(now);
        let deadline = formatter.next_deadline();
        drop(formatter);

        let timeout = deadline.map(|deadline| {
            // rounded up, an early wake-up finds nothing due
            let delay = deadline.saturating_sub(now).as_micros().div_ceil(1000);
            let shared: Weak<Self> = Rc::downgrade(self);
            Timeout::new(u32::try_from(delay).unwrap_or(u32::MAX), move || {
                if let Some(shared) = shared.upgrade() {
                    shared.dispatch(None);
                }
            })
        });
        // replacing a pending wake-up cancels it
        if let Ok(mut wake) = self.wake.try_borrow_mut() {
            *wake = timeout;
        }
    }
}

/// A toolbar mounted into the current page. Dropping it stops all event handling.
pub struct WebToolbar {
    shared: Rc<Shared>,
    _listeners: Vec<EventListener>,
}

impl WebToolbar {
    /// Runs `f` against the formatter, unless it is already in use by an event handler.
    pub fn with_formatter<R>(&self, f: impl FnOnce(&mut TextFormatter<WebHost>) -> R) -> Option<R> {
        let mut formatter = self.shared.formatter.try_borrow_mut().ok()?;
        Some(f(&mut formatter))
    }

    /// Dismisses the toolbar.
    pub fn hide(&self) {
        let now = self.shared.now();
        self.with_formatter(|formatter| formatter.hide(now));
        self.shared.dispatch(None);
    }
}

impl Drop for WebToolbar {
    fn drop(&mut self) {
        if let Ok(mut wake) = self.shared.wake.try_borrow_mut() {
            wake.take();
        }
    }
}

fn event_target(event: &Event) -> Option<Node> {
    event.target()?.dyn_into::<Node>().ok()
}

/// Installs a toolbar into the current page.
pub fn mount(config: FormatterConfig) -> Result<WebToolbar, FormatterError> {
    let host = WebHost::new()?;
    let document = host.document().clone();
    let performance = host.window().performance();
    let formatter = TextFormatter::new(host, config)?;
    let toolbar = formatter.toolbar().clone();

    let shared = Rc::new(Shared {
        formatter: RefCell::new(formatter),
        wake: RefCell::new(None),
        performance,
    });

    let mut listeners = Vec::new();
    let simple = [
        ("selectionchange", ToolbarEvent::SelectionChange),
        ("mouseup", ToolbarEvent::MouseUp),
        ("keyup", ToolbarEvent::KeyUp),
    ];
    for (name, event) in simple {
        let shared = shared.clone();
        listeners.push(EventListener::new(&document, name, move |_| {
            shared.dispatch(Some(event.clone()));
        }));
    }

    let click = {
        let shared = shared.clone();
        EventListener::new(&document, "click", move |event: &Event| {
            if let Some(target) = event_target(event) {
                shared.dispatch(Some(ToolbarEvent::Click { target }));
            }
        })
    };
    listeners.push(click);

    // scroll does not bubble, so catch it on the way down
    let scroll = {
        let shared = shared.clone();
        EventListener::new_with_options(
            &document,
            "scroll",
            EventListenerOptions {
                phase: EventListenerPhase::Capture,
                passive: true,
            },
            move |event: &Event| {
                if let Some(target) = event_target(event) {
                    shared.dispatch(Some(ToolbarEvent::Scroll { target }));
                }
            },
        )
    };
    listeners.push(scroll);

    // pressing a button must not clear the selection it formats
    listeners.push(EventListener::new_with_options(
        &toolbar,
        "mousedown",
        EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        },
        |event: &Event| event.prevent_default(),
    ));

    #[cfg(feature = "tracing")]
    tracing::debug!("Mounted toolbar with {} listeners", listeners.len());

    Ok(WebToolbar {
        shared,
        _listeners: listeners,
    })
}
