// ProxAlert - Capability Interfaces
//
// Digital pins, the I2C bus and delays come from `embedded-hal`. The two
// capabilities below have no embedded-hal equivalent: a PWM tone generator
// whose frequency changes per note, and the ADC acquisition board.

use core::fmt;

/// Square-wave speaker driver.
pub trait ToneGenerator {
    fn set_frequency(&mut self, hz: u32) -> anyhow::Result<()>;
    fn start(&mut self, duty_percent: u8) -> anyhow::Result<()>;
    fn stop(&mut self) -> anyhow::Result<()>;
}

/// Result of [`AdcBoard::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    Ok,
    /// Bus transfer failed.
    Error,
    /// Something answered but the product id is wrong.
    DeviceNotDetected,
    /// Right product, unsupported firmware version.
    SoftVersion,
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::Error => "bus error",
            Self::DeviceNotDetected => "device not detected",
            Self::SoftVersion => "unsupported firmware version",
        };
        f.write_str(s)
    }
}

/// Analog input on the acquisition board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcChannel {
    A0,
    A1,
    A2,
    A3,
}

impl AdcChannel {
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Vendor ADC board that digitises the distance sensor.
pub trait AdcBoard {
    /// Addresses on the bus that answer with this board's product id.
    fn detect(&mut self) -> Vec<u8>;
    fn begin(&mut self) -> BoardStatus;
    fn enable_adc(&mut self) -> anyhow::Result<()>;
    fn read_channel(&mut self, channel: AdcChannel) -> anyhow::Result<u16>;
}
