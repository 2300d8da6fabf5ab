// ProxAlert - Shared Value Types

use crate::config::*;

// ---------------------------------------------------------------------------
// Backlight Color
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const TEAL: Rgb = Rgb::new(0, 128, 64);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

// ---------------------------------------------------------------------------
// Severity Classification
// ---------------------------------------------------------------------------
/// Alert level for one distance reading, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    Warning,
    Caution,
    Clear,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Warning,
        Severity::Caution,
        Severity::Clear,
    ];

    /// Classify a distance in centimeters. Each threshold belongs to the
    /// less severe level: 5 is Warning, 10 is Caution, 15 is Clear.
    pub fn from_distance(cm: i32) -> Self {
        if cm < THRESHOLD_CRITICAL_CM {
            Self::Critical
        } else if cm < THRESHOLD_WARNING_CM {
            Self::Warning
        } else if cm < THRESHOLD_CAUTION_CM {
            Self::Caution
        } else {
            Self::Clear
        }
    }
}

// ---------------------------------------------------------------------------
// Pause / Resume
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    #[default]
    Enabled,
    Paused,
}

impl ToggleState {
    pub fn flipped(self) -> Self {
        match self {
            Self::Enabled => Self::Paused,
            Self::Paused => Self::Enabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

/// One-shot notification emitted when the button flips the toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange(pub ToggleState);

impl StatusChange {
    pub fn message(&self) -> &'static str {
        match self.0 {
            ToggleState::Enabled => "System Enabled",
            ToggleState::Paused => "System Paused",
        }
    }

    pub fn color(&self) -> Rgb {
        match self.0 {
            ToggleState::Enabled => Rgb::TEAL,
            ToggleState::Paused => Rgb::YELLOW,
        }
    }
}
