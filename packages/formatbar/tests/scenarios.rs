//! End-to-end toolbar behaviour against a headless document and a virtual clock.

use formatbar::traits::{Display, FormatCommand, Point, Size, ToolbarEvent};
use formatbar::{FormatterConfig, TextFormatter, VisibilityState};
use formatbar_dom::{DocumentOptions, HeadlessDocument, InlineStyle, TextLayout};
use std::time::Duration;

struct Harness {
    formatter: TextFormatter<HeadlessDocument>,
    text: usize,
    now: Duration,
}

impl Harness {
    /// An editable paragraph whose characters are 10px wide, starting at `origin`.
    fn new(origin: Point) -> Self {
        Self::with(origin, DocumentOptions::default(), FormatterConfig::default())
    }

    fn with(origin: Point, options: DocumentOptions, config: FormatterConfig) -> Self {
        let mut doc = HeadlessDocument::with_options(options);
        let div = doc.create_element("div");
        doc.set_attribute(div, "contenteditable", "true");
        doc.append_child(doc.body_id(), div);
        let text = doc.create_text_node("hello world");
        doc.append_child(div, text);
        doc.set_text_layout(text, TextLayout::new(origin, 10.0, 20.0));
        Self {
            formatter: TextFormatter::new(doc, config).unwrap(),
            text,
            now: Duration::ZERO,
        }
    }

    fn doc(&mut self) -> &mut HeadlessDocument {
        self.formatter.host_mut()
    }

    fn send(&mut self, event: ToolbarEvent<usize>) {
        self.formatter.handle_event(event, self.now);
    }

    /// Selects `start..end` of the paragraph and releases the mouse.
    fn select(&mut self, start: usize, end: usize) {
        let text = self.text;
        self.doc().select_text(text, start, end);
        self.send(ToolbarEvent::SelectionChange);
        self.send(ToolbarEvent::MouseUp);
    }

    fn advance_to(&mut self, millis: u64) {
        let target = Duration::from_millis(millis);
        while let Some(deadline) = self.formatter.next_deadline().filter(|d| *d <= target) {
            self.formatter.poll(deadline);
        }
        self.now = target;
    }

    fn style(&self) -> InlineStyle {
        let toolbar = *self.formatter.toolbar();
        self.formatter
            .host()
            .get_node(toolbar)
            .and_then(|node| node.element_data())
            .map(|el| el.style.clone())
            .unwrap()
    }

    fn position(&self) -> (f64, f64) {
        let style = self.style();
        (style.top.unwrap(), style.left.unwrap())
    }

    fn button(&self, id: &str) -> usize {
        let doc = self.formatter.host();
        let button = doc.element_by_id(id).unwrap();
        // the icon inside the button, where the click actually lands
        doc.children(button)[0]
    }

    fn click(&mut self, target: usize) {
        self.send(ToolbarEvent::Click { target });
    }

    fn click_outside(&mut self) {
        let body = self.formatter.host().body_id();
        self.click(body);
    }
}

#[test]
fn toolbar_is_placed_above_a_low_selection() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    h.select(6, 11);

    assert_eq!(h.formatter.state(), VisibilityState::PendingShow);
    assert_eq!(h.position(), (45.0, 50.0));
    assert_eq!(h.style().display, Some(Display::Block));

    h.advance_to(199);
    assert_eq!(h.formatter.state(), VisibilityState::PendingShow);
    h.advance_to(200);
    assert_eq!(h.formatter.state(), VisibilityState::Visible);
    assert_eq!(h.style().opacity, Some(1.0));
    assert!(!h.formatter.is_fading_in());
}

#[test]
fn toolbar_is_placed_below_a_selection_near_the_top_left() {
    let mut h = Harness::new(Point::new(0.0, 40.0));
    h.select(3, 8);
    assert_eq!(h.position(), (65.0, 5.0));
}

#[test]
fn degenerate_caret_rects_give_the_same_placement() {
    let options = DocumentOptions {
        degenerate_collapsed_rects: true,
        ..Default::default()
    };
    let mut h = Harness::with(Point::new(40.0, 100.0), options, FormatterConfig::default());
    let count = h.formatter.host().node_count();

    h.select(6, 11);
    assert_eq!(h.position(), (45.0, 50.0));
    assert_eq!(h.formatter.host().node_count(), count);
    assert_eq!(h.formatter.host().text_content(h.text), "hello world");
}

#[test]
fn click_outside_a_visible_toolbar_dismisses_it() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    h.select(6, 11);
    h.advance_to(300);

    h.click_outside();
    assert_eq!(h.formatter.state(), VisibilityState::Hidden);
    assert_eq!(h.style().display, Some(Display::Block));

    h.advance_to(500);
    assert_eq!(h.style().opacity, Some(0.0));
    assert_eq!(h.style().display, Some(Display::None));
    assert_eq!(h.formatter.next_deadline(), None);
}

#[test]
fn click_ending_the_selection_does_not_dismiss() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    h.select(6, 11);
    h.click_outside();
    assert_eq!(h.formatter.state(), VisibilityState::PendingShow);

    h.advance_to(200);
    assert_eq!(h.formatter.state(), VisibilityState::Visible);
}

#[test]
fn selection_cleared_during_the_delay_never_shows() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    h.select(6, 11);
    h.advance_to(100);

    h.doc().clear_selection();
    h.send(ToolbarEvent::SelectionChange);
    assert_eq!(h.formatter.state(), VisibilityState::Hidden);
    assert!(!h.formatter.has_selection());

    // the fade-in completes before the fade-out starts
    assert!(h.formatter.is_fading_in());
    h.advance_to(200);
    assert_eq!(h.style().opacity, Some(1.0));
    assert_eq!(h.formatter.state(), VisibilityState::Hidden);

    h.advance_to(1000);
    assert_eq!(h.formatter.state(), VisibilityState::Hidden);
    assert_eq!(h.style().display, Some(Display::None));
    assert_eq!(h.style().opacity, Some(0.0));
}

#[test]
fn selection_outside_an_editable_region_is_ignored() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    let doc = h.doc();
    let body = doc.body_id();
    let plain = doc.create_text_node("read only");
    doc.append_child(body, plain);
    doc.select_text(plain, 0, 4);

    h.send(ToolbarEvent::SelectionChange);
    h.send(ToolbarEvent::MouseUp);
    assert!(!h.formatter.has_selection());
    assert_eq!(h.formatter.state(), VisibilityState::Hidden);
    assert_eq!(h.formatter.next_deadline(), None);
}

#[test]
fn keyboard_selection_shows_the_toolbar() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    let text = h.text;
    h.doc().select_text(text, 0, 5);
    h.send(ToolbarEvent::SelectionChange);
    h.send(ToolbarEvent::KeyUp);
    assert_eq!(h.formatter.state(), VisibilityState::PendingShow);
}

#[test]
fn buttons_run_their_command_without_dismissing() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    h.select(6, 11);
    h.advance_to(250);

    for id in ["formatBoldButton", "formatItalicButton", "formatUnderlineButton"] {
        let button = h.button(id);
        h.click(button);
    }
    assert_eq!(
        h.formatter.host().executed_commands(),
        &[
            FormatCommand::Bold,
            FormatCommand::Italic,
            FormatCommand::Underline
        ]
    );
    assert_eq!(h.formatter.state(), VisibilityState::Visible);
}

#[test]
fn font_size_buttons_step_and_clamp() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    let up = h.button("fontSizeUpButton");
    let down = h.button("fontSizeDownButton");

    // nothing reported yet, so stepping starts from 3
    h.click(up);
    h.click(up);
    h.doc().set_command_value("fontSize", "7");
    h.click(up);
    h.doc().set_command_value("fontSize", "1");
    h.click(down);

    assert_eq!(
        h.formatter.host().executed_commands(),
        &[
            FormatCommand::FontSize(4),
            FormatCommand::FontSize(5),
            FormatCommand::FontSize(7),
            FormatCommand::FontSize(1)
        ]
    );
}

#[test]
fn rejected_commands_leave_the_toolbar_alone() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    h.select(6, 11);
    h.advance_to(250);
    h.doc().reject_commands(true);

    let bold = h.button("formatBoldButton");
    h.click(bold);
    assert!(h.formatter.host().executed_commands().is_empty());
    assert_eq!(h.formatter.state(), VisibilityState::Visible);
}

#[test]
fn scrolling_elsewhere_dismisses_unless_disabled() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    h.select(6, 11);
    h.advance_to(250);
    let toolbar = *h.formatter.toolbar();
    h.send(ToolbarEvent::Scroll { target: toolbar });
    assert_eq!(h.formatter.state(), VisibilityState::Visible);
    let body = h.formatter.host().body_id();
    h.send(ToolbarEvent::Scroll { target: body });
    assert_eq!(h.formatter.state(), VisibilityState::Hidden);

    let config = FormatterConfig {
        dismiss_on_scroll: false,
        ..Default::default()
    };
    let mut h = Harness::with(Point::new(40.0, 100.0), DocumentOptions::default(), config);
    h.select(6, 11);
    h.advance_to(250);
    let body = h.formatter.host().body_id();
    h.send(ToolbarEvent::Scroll { target: body });
    assert_eq!(h.formatter.state(), VisibilityState::Visible);
}

#[test]
fn reshowing_during_a_fade_out_wins() {
    let mut h = Harness::new(Point::new(40.0, 100.0));
    h.select(6, 11);
    h.advance_to(250);
    h.click_outside();
    h.advance_to(300);
    let faded = h.style().opacity.unwrap();
    assert!(faded < 1.0 && faded > 0.0);

    h.send(ToolbarEvent::MouseUp);
    assert!(h.formatter.is_fading_in());
    h.advance_to(2000);
    assert_eq!(h.formatter.state(), VisibilityState::Visible);
    assert_eq!(h.style().opacity, Some(1.0));
    assert_eq!(h.style().display, Some(Display::Block));
}

#[test]
fn native_transitions_replace_the_stepper() {
    let options = DocumentOptions {
        supports_transitions: true,
        ..Default::default()
    };
    let mut h = Harness::with(Point::new(40.0, 100.0), options, FormatterConfig::default());
    h.select(6, 11);
    assert_eq!(h.style().transition, Some(Duration::from_millis(200)));
    assert_eq!(h.style().opacity, Some(1.0));

    h.advance_to(250);
    h.click_outside();
    assert_eq!(h.style().opacity, Some(0.0));
    assert_eq!(h.style().display, Some(Display::Block));
    h.advance_to(450);
    assert_eq!(h.style().display, Some(Display::None));
}

#[test]
fn measured_toolbar_size_drives_placement() {
    let config = FormatterConfig {
        measure_toolbar: true,
        ..Default::default()
    };
    let mut h = Harness::with(Point::new(300.0, 200.0), DocumentOptions::default(), config);
    let toolbar = *h.formatter.toolbar();
    h.doc()
        .set_element_box(toolbar, Point::ZERO, Size::new(200.0, 40.0));

    h.select(0, 5);
    // 40px tall plus the 25px gap above, centred on a 200px width
    assert_eq!(h.position(), (135.0, 200.0));
}
