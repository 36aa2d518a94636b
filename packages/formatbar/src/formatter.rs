//! The selection toolbar controller.

use crate::anchor::resolve_anchor;
use crate::config::{ConfigError, FormatterConfig};
use crate::fade::{FadeAnimator, FadeTimer};
use crate::markup::{ACTION_ATTRIBUTE, stylesheet, toolbar_markup};
use crate::placement::PlacementPolicy;
use crate::timer::{TimerId, TimerQueue};
use formatbar_traits::{
    CommandError, Display, FormatAction, FormatCommand, Host, InstallError, ToolbarEvent,
};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    /// Fading in, but not yet dismissable by clicks or scrolls
    PendingShow,
    Visible,
}

#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not install the toolbar: {0}")]
    Install(#[from] InstallError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    ShowDelay,
    Fade(FadeTimer),
}

impl From<FadeTimer> for Timer {
    fn from(timer: FadeTimer) -> Self {
        Timer::Fade(timer)
    }
}

/// A floating formatting toolbar for the text selected in an editable region of `H`.
///
/// The formatter never reads a clock. The embedder forwards [`ToolbarEvent`]s to
/// [`handle_event`](Self::handle_event) and calls [`poll`](Self::poll) once
/// [`next_deadline`](Self::next_deadline) has passed.
pub struct TextFormatter<H: Host> {
    host: H,
    config: FormatterConfig,
    toolbar: H::Node,
    placement: PlacementPolicy,

    /// Whether the current selection is non-empty and editable
    has_selection: bool,
    state: VisibilityState,
    show_timer: Option<TimerId>,

    timers: TimerQueue<Timer>,
    fader: FadeAnimator,
}

impl<H: Host> TextFormatter<H> {
    /// Validates `config` and installs the toolbar and its stylesheet into `host`. The toolbar
    /// starts out hidden.
    pub fn new(mut host: H, config: FormatterConfig) -> Result<Self, FormatterError> {
        config.validate()?;
        let toolbar = host.install(
            &toolbar_markup(),
            &stylesheet(config.icon_font_url.as_deref()),
        )?;
        host.set_display(&toolbar, Display::None);
        host.set_opacity(&toolbar, 0.0);

        #[cfg(feature = "tracing")]
        tracing::debug!("Installed toolbar {toolbar:?}");

        Ok(Self {
            fader: FadeAnimator::new(config.tick_interval, config.prefer_native_transitions),
            placement: config.placement,
            host,
            config,
            toolbar,
            has_selection: false,
            state: VisibilityState::Hidden,
            show_timer: None,
            timers: TimerQueue::new(),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// The installed toolbar root element.
    pub fn toolbar(&self) -> &H::Node {
        &self.toolbar
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == VisibilityState::Visible
    }

    pub fn has_selection(&self) -> bool {
        self.has_selection
    }

    pub fn is_fading_in(&self) -> bool {
        self.fader.is_fading_in()
    }

    /// When [`poll`](Self::poll) next has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn handle_event(&mut self, event: ToolbarEvent<H::Node>, now: Duration) {
        match event {
            ToolbarEvent::SelectionChange => self.observe_selection(now),
            ToolbarEvent::MouseUp | ToolbarEvent::KeyUp => {
                if self.has_selection {
                    self.show(now);
                }
            }
            ToolbarEvent::Click { target } => {
                if self.host.contains(&self.toolbar, &target) {
                    self.click_toolbar(&target);
                } else if self.is_visible() {
                    self.hide(now);
                }
            }
            ToolbarEvent::Scroll { target } => {
                let outside = !self.host.contains(&self.toolbar, &target);
                if self.config.dismiss_on_scroll && outside && self.is_visible() {
                    self.hide(now);
                }
            }
        }
    }

    /// Fires every timer due at `now`. Returns whether any did.
    pub fn poll(&mut self, now: Duration) -> bool {
        let mut fired = false;
        while let Some((deadline, timer)) = self.timers.pop_due(now) {
            fired = true;
            match timer {
                Timer::ShowDelay => {
                    self.show_timer = None;
                    if self.state == VisibilityState::PendingShow && self.has_selection {
                        #[cfg(feature = "tracing")]
                        tracing::debug!("Toolbar visible");

                        self.state = VisibilityState::Visible;
                    }
                }
                Timer::Fade(timer) => {
                    self.fader.on_timer(
                        &mut self.host,
                        &self.toolbar,
                        &mut self.timers,
                        deadline,
                        timer,
                    );
                }
            }
        }
        fired
    }

    /// Performs `action` on the current selection.
    ///
    /// The size actions step from the size the host reports for the selection.
    pub fn apply(&mut self, action: FormatAction) -> Result<(), CommandError> {
        let command = match action {
            FormatAction::Bold => FormatCommand::Bold,
            FormatAction::Italic => FormatCommand::Italic,
            FormatAction::Underline => FormatCommand::Underline,
            FormatAction::FontSizeDown | FormatAction::FontSizeUp => {
                let delta = if action == FormatAction::FontSizeUp { 1 } else { -1 };
                let current = self.host.query_command_value(FormatCommand::FONT_SIZE);
                FormatCommand::FontSize(self.config.font_sizes.step(current.as_deref(), delta))
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!("Applying {action} as {command:?}");

        let result = self.host.exec_command(command);
        if let Err(_err) = &result {
            #[cfg(feature = "tracing")]
            tracing::warn!("{action} failed: {_err}");
        }
        result
    }

    /// Dismisses the toolbar, cancelling a pending show.
    pub fn hide(&mut self, now: Duration) {
        if let Some(timer) = self.show_timer.take() {
            self.timers.cancel(timer);
        }
        if self.state == VisibilityState::Hidden {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Hiding toolbar from {:?}", self.state);

        self.state = VisibilityState::Hidden;
        self.fader.fade_out(
            &mut self.host,
            &self.toolbar,
            &mut self.timers,
            now,
            self.config.fade_duration,
        );
    }

    fn observe_selection(&mut self, now: Duration) {
        let editable = !self.host.selected_text().is_empty()
            && self
                .host
                .anchor_node()
                .is_some_and(|node| self.host.is_in_editable_region(&node));
        self.has_selection = editable;

        if !editable && self.state != VisibilityState::Hidden {
            self.hide(now);
        }
    }

    fn show(&mut self, now: Duration) {
        let anchor = resolve_anchor(&mut self.host);
        self.fader.fade_in(
            &mut self.host,
            &self.toolbar,
            &mut self.timers,
            now,
            self.config.fade_duration,
        );

        // measured after fading in, a hidden element has no size
        if self.config.measure_toolbar {
            let size = self.host.element_size(&self.toolbar);
            if let Some(size) = size.filter(|size| size.width > 0.0 && size.height > 0.0) {
                self.placement = PlacementPolicy::for_toolbar_size(size);
            }
        }
        let top_left = self.placement.place(anchor);
        self.host.set_position(&self.toolbar, top_left);

        #[cfg(feature = "tracing")]
        tracing::debug!("Showing toolbar at {top_left:?} for anchor {anchor:?}");

        if self.state != VisibilityState::Visible {
            if let Some(timer) = self.show_timer.take() {
                self.timers.cancel(timer);
            }
            self.show_timer = Some(
                self.timers
                    .schedule(now.saturating_add(self.config.show_delay), Timer::ShowDelay),
            );
            self.state = VisibilityState::PendingShow;
        }
    }

    fn click_toolbar(&mut self, target: &H::Node) {
        let Some(value) = self.host.closest_attribute(target, ACTION_ATTRIBUTE) else {
            return;
        };
        match value.parse::<FormatAction>() {
            // failures are logged by `apply`
            Ok(action) => {
                let _ = self.apply(action);
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Ignoring toolbar click: {_err}");
            }
        }
    }
}
