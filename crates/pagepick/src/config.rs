//! Picker configuration.
//!
//! [`PickerConfig`] carries the knobs a host sets once per picker: choice
//! mode, whether preview is offered, row geometry for virtualization, and
//! search case handling. Values can come from code, from environment
//! variables, or both; [`PickerConfig::validated`] clamps them into range.

use crate::search::MatchCase;
use crate::selection::ChoiceMode;
use crate::virtualized::DEFAULT_ROW_HEIGHT;

const ENV_CHOICE: &str = "PAGEPICK_CHOICE";
const ENV_CAN_PREVIEW: &str = "PAGEPICK_CAN_PREVIEW";
const ENV_ROW_HEIGHT: &str = "PAGEPICK_ROW_HEIGHT";
const ENV_OVERSCAN: &str = "PAGEPICK_OVERSCAN";
const ENV_IGNORE_CASE: &str = "PAGEPICK_IGNORE_CASE";

/// Smallest accepted row height in pixels.
pub const MIN_ROW_HEIGHT: u32 = 1;

/// Largest accepted row height in pixels.
pub const MAX_ROW_HEIGHT: u32 = 512;

/// Default number of rows rendered beyond each viewport edge.
pub const DEFAULT_OVERSCAN: usize = 2;

/// Largest accepted overscan.
pub const MAX_OVERSCAN: usize = 64;

/// Settings for one picker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PickerConfig {
    /// Single or multiple choice.
    /// Default: multiple.
    pub choice: ChoiceMode,

    /// Whether rows offer a preview action.
    /// Default: true.
    pub can_preview: bool,

    /// Fixed row height in pixels.
    /// Default: 28.
    pub row_height: u32,

    /// Extra rows rendered above and below the viewport.
    /// Default: 2.
    pub overscan: usize,

    /// Case handling for search queries.
    /// Default: case-sensitive.
    pub match_case: MatchCase,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            choice: ChoiceMode::Multiple,
            can_preview: true,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            match_case: MatchCase::Sensitive,
        }
    }
}

impl PickerConfig {
    #[must_use]
    pub fn with_choice(mut self, choice: ChoiceMode) -> Self {
        self.choice = choice;
        self
    }

    #[must_use]
    pub fn with_preview(mut self, can_preview: bool) -> Self {
        self.can_preview = can_preview;
        self
    }

    #[must_use]
    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    #[must_use]
    pub fn with_match_case(mut self, match_case: MatchCase) -> Self {
        self.match_case = match_case;
        self
    }

    /// Load config from the process environment.
    ///
    /// Reads:
    /// - `PAGEPICK_CHOICE`: `single` or `multiple`
    /// - `PAGEPICK_CAN_PREVIEW`: boolean
    /// - `PAGEPICK_ROW_HEIGHT`: pixels
    /// - `PAGEPICK_OVERSCAN`: rows
    /// - `PAGEPICK_IGNORE_CASE`: boolean
    ///
    /// Unparseable values are ignored; the result is validated.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load config using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = get_env(ENV_CHOICE)
            && let Some(choice) = parse_choice(&value)
        {
            config.choice = choice;
        }

        if let Some(value) = get_env(ENV_CAN_PREVIEW)
            && let Some(enabled) = parse_bool(&value)
        {
            config.can_preview = enabled;
        }

        if let Some(value) = get_env(ENV_ROW_HEIGHT)
            && let Ok(px) = value.trim().parse::<u32>()
        {
            config.row_height = px;
        }

        if let Some(value) = get_env(ENV_OVERSCAN)
            && let Ok(rows) = value.trim().parse::<usize>()
        {
            config.overscan = rows;
        }

        if let Some(value) = get_env(ENV_IGNORE_CASE)
            && let Some(ignore) = parse_bool(&value)
        {
            config.match_case = if ignore {
                MatchCase::Insensitive
            } else {
                MatchCase::Sensitive
            };
        }

        config.validated()
    }

    /// Clamp values to safe ranges.
    ///
    /// # Example
    ///
    /// ```
    /// use pagepick::config::PickerConfig;
    ///
    /// let config = PickerConfig::default().with_row_height(0).validated();
    /// assert_eq!(config.row_height, 1);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.row_height = self.row_height.clamp(MIN_ROW_HEIGHT, MAX_ROW_HEIGHT);
        self.overscan = self.overscan.min(MAX_OVERSCAN);
        self
    }

    /// Check if values are within valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (MIN_ROW_HEIGHT..=MAX_ROW_HEIGHT).contains(&self.row_height)
            && self.overscan <= MAX_OVERSCAN
    }
}

fn parse_choice(value: &str) -> Option<ChoiceMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "single" => Some(ChoiceMode::Single),
        "multiple" | "multi" => Some(ChoiceMode::Multiple),
        _ => None,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
