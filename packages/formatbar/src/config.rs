use crate::markup::MATERIAL_ICONS_URL;
use crate::placement::PlacementPolicy;
use std::time::Duration;

/// Options used when constructing a [`TextFormatter`](crate::TextFormatter)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormatterConfig {
    /// Time between the fade-in starting and the toolbar counting as visible. Clicks that land
    /// before then (such as the click ending the selecting drag) do not dismiss it.
    pub show_delay: Duration,
    /// Length of the fade-in and fade-out animations
    pub fade_duration: Duration,
    /// Step interval of the fallback fade animation
    pub tick_interval: Duration,
    /// Dismiss the visible toolbar on a scroll outside of it
    pub dismiss_on_scroll: bool,
    /// Use the host's native transitions for fades when it has them
    pub prefer_native_transitions: bool,
    /// Derive the placement from the toolbar's rendered size instead of `placement`
    pub measure_toolbar: bool,
    pub placement: PlacementPolicy,
    pub font_sizes: FontSizeRange,
    /// Stylesheet providing the icon glyphs. `None` if the page already loads one.
    pub icon_font_url: Option<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            show_delay: Duration::from_millis(200),
            fade_duration: Duration::from_millis(200),
            tick_interval: Duration::from_millis(25),
            dismiss_on_scroll: true,
            prefer_native_transitions: true,
            measure_toolbar: false,
            placement: PlacementPolicy::default(),
            font_sizes: FontSizeRange::default(),
            icon_font_url: Some(MATERIAL_ICONS_URL.to_string()),
        }
    }
}

impl FormatterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if !self.placement.is_valid() {
            return Err(ConfigError::InvalidPlacement);
        }
        self.font_sizes.validate()
    }
}

/// The legacy HTML font sizes the size buttons step through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontSizeRange {
    pub min: u8,
    pub max: u8,
    /// Assumed when the host cannot report the current size
    pub default: u8,
}

impl Default for FontSizeRange {
    fn default() -> Self {
        Self {
            min: 1,
            max: 7,
            default: 3,
        }
    }
}

impl FontSizeRange {
    /// HTML only knows sizes 1 through 7.
    pub const LIMITS: std::ops::RangeInclusive<u8> = 1..=7;

    /// The size one `delta` away from `current` (as reported by `queryCommandValue`), clamped
    /// to the range.
    pub fn step(&self, current: Option<&str>, delta: i32) -> u8 {
        let current = current
            .and_then(|value| value.trim().parse::<i32>().ok())
            .unwrap_or(i32::from(self.default));
        let stepped = (current + delta).clamp(i32::from(self.min), i32::from(self.max));
        u8::try_from(stepped).unwrap_or(self.default)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let in_limits = |size: &u8| Self::LIMITS.contains(size);
        if self.min > self.max || !in_limits(&self.min) || !in_limits(&self.max) {
            return Err(ConfigError::InvalidFontSizeRange {
                min: self.min,
                max: self.max,
            });
        }
        if !(self.min..=self.max).contains(&self.default) {
            return Err(ConfigError::DefaultFontSizeOutOfRange {
                default: self.default,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("placement offsets must be finite and non-negative")]
    InvalidPlacement,
    #[error("font size range {min}..={max} is not within 1..=7")]
    InvalidFontSizeRange { min: u8, max: u8 },
    #[error("default font size {default} is outside {min}..={max}")]
    DefaultFontSizeOutOfRange { default: u8, min: u8, max: u8 },
}
