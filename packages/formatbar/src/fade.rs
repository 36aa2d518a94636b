//! Linear opacity fades for the toolbar element.
//!
//! Hosts with native transitions get a CSS `transition` and the target opacity; everything else
//! gets a fixed-tick stepper. Either way at most one fade runs at a time. Starting a fade-in
//! pre-empts a running fade-out, while a fade-out requested during a fade-in waits for it to
//! complete.

use crate::timer::{TimerId, TimerQueue};
use formatbar_traits::{Display, StyleApi};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// Timer payload scheduled by a [`FadeAnimator`]. Only the most recent fade's timers are acted
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTimer {
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    direction: FadeDirection,
    start: f64,
    duration: Duration,
    ticks: u32,
    native: bool,
}

#[derive(Debug)]
pub struct FadeAnimator {
    tick: Duration,
    prefer_native: bool,
    active: Option<Fade>,
    fading_in: bool,
    /// Fade-out requested while fading in, started once the fade-in completes
    queued_out: Option<Duration>,
    timer: Option<TimerId>,
    generation: u64,
}

impl FadeAnimator {
    pub fn new(tick: Duration, prefer_native: bool) -> Self {
        Self {
            tick,
            prefer_native,
            active: None,
            fading_in: false,
            queued_out: None,
            timer: None,
            generation: 0,
        }
    }

    pub fn is_fading_in(&self) -> bool {
        self.fading_in
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn direction(&self) -> Option<FadeDirection> {
        self.active.map(|fade| fade.direction)
    }

    /// Shows `element` and raises its opacity to 1 over `duration`, starting from its current
    /// opacity (0 if unset).
    pub fn fade_in<H, T>(
        &mut self,
        host: &mut H,
        element: &H::Node,
        timers: &mut TimerQueue<T>,
        now: Duration,
        duration: Duration,
    ) where
        H: StyleApi,
        T: From<FadeTimer>,
    {
        self.stop(timers);
        self.queued_out = None;
        let start = host.opacity(element).unwrap_or(0.0).clamp(0.0, 1.0);
        host.set_display(element, Display::Block);
        self.fading_in = true;
        self.begin(host, element, timers, now, FadeDirection::In, start, duration);
    }

    /// Lowers the opacity of `element` to 0 over `duration`, then hides it. A running fade-in
    /// is left to complete first.
    pub fn fade_out<H, T>(
        &mut self,
        host: &mut H,
        element: &H::Node,
        timers: &mut TimerQueue<T>,
        now: Duration,
        duration: Duration,
    ) where
        H: StyleApi,
        T: From<FadeTimer>,
    {
        if self.fading_in {
            #[cfg(feature = "tracing")]
            tracing::trace!("Fade out queued behind a running fade in");

            self.queued_out = Some(duration);
            return;
        }
        self.stop(timers);
        let start = host.opacity(element).unwrap_or(1.0).clamp(0.0, 1.0);
        self.begin(host, element, timers, now, FadeDirection::Out, start, duration);
    }

    #[allow(clippy::too_many_arguments)]
    fn begin<H, T>(
        &mut self,
        host: &mut H,
        element: &H::Node,
        timers: &mut TimerQueue<T>,
        now: Duration,
        direction: FadeDirection,
        start: f64,
        duration: Duration,
    ) where
        H: StyleApi,
        T: From<FadeTimer>,
    {
        let target = match direction {
            FadeDirection::In => 1.0,
            FadeDirection::Out => 0.0,
        };
        if duration.is_zero() || start == target {
            self.finish(host, element, timers, now, direction);
            return;
        }

        let native = self.prefer_native && host.supports_transitions();
        let fade = Fade {
            direction,
            start,
            duration,
            ticks: 0,
            native,
        };
        let deadline = if native {
            host.set_transition(element, Some(duration));
            host.set_opacity(element, target);
            now.saturating_add(duration)
        } else {
            host.set_opacity(element, start);
            now.saturating_add(self.tick)
        };

        #[cfg(feature = "tracing")]
        tracing::trace!("Fade {direction:?} from {start} over {duration:?} (native: {native})");

        self.active = Some(fade);
        self.schedule(timers, deadline);
    }

    /// Advances the running fade. `deadline` is the time the timer was due, which keeps ticks
    /// evenly spaced however late the embedder polls.
    pub fn on_timer<H, T>(
        &mut self,
        host: &mut H,
        element: &H::Node,
        timers: &mut TimerQueue<T>,
        deadline: Duration,
        timer: FadeTimer,
    ) where
        H: StyleApi,
        T: From<FadeTimer>,
    {
        if timer.generation != self.generation {
            return;
        }
        self.timer = None;
        let Some(mut fade) = self.active else {
            return;
        };

        if fade.native {
            self.finish(host, element, timers, deadline, fade.direction);
            return;
        }

        fade.ticks += 1;
        let elapsed = self.tick.saturating_mul(fade.ticks);
        let progress = elapsed.as_nanos() as f64 / fade.duration.as_nanos() as f64;
        let opacity = match fade.direction {
            FadeDirection::In => (fade.start + progress).min(1.0),
            FadeDirection::Out => (fade.start - progress).max(0.0),
        };

        #[cfg(feature = "tracing")]
        tracing::trace!("Fade {:?} tick {}: opacity {opacity}", fade.direction, fade.ticks);

        let done = match fade.direction {
            FadeDirection::In => opacity >= 1.0,
            FadeDirection::Out => opacity <= 0.0,
        };
        if done {
            self.finish(host, element, timers, deadline, fade.direction);
        } else {
            host.set_opacity(element, opacity);
            self.active = Some(fade);
            self.schedule(timers, deadline.saturating_add(self.tick));
        }
    }

    fn finish<H, T>(
        &mut self,
        host: &mut H,
        element: &H::Node,
        timers: &mut TimerQueue<T>,
        now: Duration,
        direction: FadeDirection,
    ) where
        H: StyleApi,
        T: From<FadeTimer>,
    {
        self.active = None;
        match direction {
            FadeDirection::In => {
                host.set_opacity(element, 1.0);
                self.fading_in = false;
                if let Some(duration) = self.queued_out.take() {
                    self.begin(host, element, timers, now, FadeDirection::Out, 1.0, duration);
                }
            }
            FadeDirection::Out => {
                host.set_opacity(element, 0.0);
                host.set_display(element, Display::None);
            }
        }
    }

    fn schedule<T: From<FadeTimer>>(&mut self, timers: &mut TimerQueue<T>, deadline: Duration) {
        let timer = FadeTimer {
            generation: self.generation,
        };
        self.timer = Some(timers.schedule(deadline, timer.into()));
    }

    /// Abandons the running fade, leaving the opacity where it is.
    fn stop<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(timer) = self.timer.take() {
            timers.cancel(timer);
        }
        self.active = None;
        self.generation += 1;
    }
}
