// ProxAlert - On/Off Output Driver
//
// GPIO-driven load: the vibration motor or the alert LED.

use embedded_hal::digital::OutputPin;

pub struct Switch<P> {
    pin: P,
    name: &'static str,
}

impl<P: OutputPin> Switch<P> {
    pub fn new(pin: P, name: &'static str) -> Self {
        Self { pin, name }
    }

    pub fn set(&mut self, on: bool) {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        if let Err(e) = res {
            log::warn!("{} write failed: {:?}", self.name, e);
        }
    }

    /// Drive the line low and give up the pin.
    pub fn release(mut self) {
        self.set(false);
    }
}
