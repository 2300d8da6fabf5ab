// ProxAlert - Actuation Profiles
//
// Declarative description of what each severity level does to the outputs.
// The alert engine walks one of these front to back; nothing here has side
// effects.

use crate::events::{Rgb, Severity};

/// LED blink train: `count` times on for `on_ms`, then off for `off_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    pub count: u8,
    pub on_ms: u32,
    pub off_ms: u32,
}

/// When the two-note chime plays relative to the blink train.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chime {
    None,
    /// Once per blink, right after the LED turns on.
    EachBlink,
    /// `count` times after the blink train, `gap_ms` apart.
    After { count: u8, gap_ms: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuationProfile {
    pub vibration: bool,
    pub blink: Option<Blink>,
    pub chime: Chime,
    pub message: &'static str,
    pub color: Rgb,
    /// Logged when the level is entered; Clear stays quiet.
    pub alert: Option<&'static str>,
}

const CRITICAL: ActuationProfile = ActuationProfile {
    vibration: true,
    blink: Some(Blink { count: 5, on_ms: 100, off_ms: 100 }),
    chime: Chime::EachBlink,
    message: "Too Close!\nDanger Zone",
    color: Rgb::RED,
    alert: Some("Object extremely close!"),
};

const WARNING: ActuationProfile = ActuationProfile {
    vibration: true,
    blink: Some(Blink { count: 3, on_ms: 150, off_ms: 150 }),
    chime: Chime::After { count: 2, gap_ms: 100 },
    message: "Object too near\nBack off!",
    color: Rgb::GREEN,
    alert: Some("Object very close!"),
};

const CAUTION: ActuationProfile = ActuationProfile {
    vibration: true,
    blink: Some(Blink { count: 2, on_ms: 200, off_ms: 200 }),
    chime: Chime::After { count: 1, gap_ms: 0 },
    message: "Object Ahead\nCaution",
    color: Rgb::ORANGE,
    alert: Some("Object approaching."),
};

const CLEAR: ActuationProfile = ActuationProfile {
    vibration: false,
    blink: None,
    chime: Chime::None,
    message: "Distance OK\nAll Clear",
    color: Rgb::BLUE,
    alert: None,
};

impl Severity {
    pub fn profile(self) -> &'static ActuationProfile {
        match self {
            Self::Critical => &CRITICAL,
            Self::Warning => &WARNING,
            Self::Caution => &CAUTION,
            Self::Clear => &CLEAR,
        }
    }
}
