// ProxAlert - Alert Engine
//
// Owns every output (vibration motor, LED, speaker, display, backlight) and
// the delay source, and plays a severity level's actuation profile on them.
// Profiles run to completion: nothing else happens on the control loop
// while one is playing.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use crate::drivers::panel::Panel;
use crate::drivers::speaker::Speaker;
use crate::drivers::switch::Switch;
use crate::events::{Rgb, Severity, StatusChange};
use crate::hal::ToneGenerator;
use crate::profile::Chime;

pub struct AlertEngine<V, L, T, I, D> {
    vibration: Switch<V>,
    led: Switch<L>,
    speaker: Speaker<T>,
    panel: Panel<I>,
    delay: D,
}

impl<V, L, T, I, D> AlertEngine<V, L, T, I, D>
where
    V: OutputPin,
    L: OutputPin,
    T: ToneGenerator,
    I: I2c,
    D: DelayNs,
{
    pub fn new(vibration: V, led: L, tone: T, i2c: I, delay: D) -> Self {
        Self {
            vibration: Switch::new(vibration, "Vibration"),
            led: Switch::new(led, "LED"),
            speaker: Speaker::new(tone),
            panel: Panel::new(i2c),
            delay,
        }
    }

    /// Bring up the display and show the ready screen.
    pub fn startup(&mut self) {
        self.panel.init(&mut self.delay);
        self.panel.set_rgb(Rgb::TEAL);
        self.panel.set_text("System Ready", &mut self.delay);
    }

    pub fn show_status(&mut self, change: StatusChange) {
        self.panel.set_text(change.message(), &mut self.delay);
        self.panel.set_rgb(change.color());
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Play `level`'s profile. Blocks until the whole sequence is done.
    pub fn actuate(&mut self, level: Severity) {
        let profile = level.profile();
        if let Some(alert) = profile.alert {
            log::warn!("{}", alert);
        }

        self.vibration.set(profile.vibration);

        match profile.blink {
            Some(blink) => {
                for _ in 0..blink.count {
                    self.led.set(true);
                    if profile.chime == Chime::EachBlink {
                        self.speaker.chime(&mut self.delay);
                    }
                    self.delay.delay_ms(blink.on_ms);
                    self.led.set(false);
                    self.delay.delay_ms(blink.off_ms);
                }
            }
            None => self.led.set(false),
        }

        if let Chime::After { count, gap_ms } = profile.chime {
            for i in 0..count {
                if i > 0 {
                    self.delay.delay_ms(gap_ms);
                }
                self.speaker.chime(&mut self.delay);
            }
        }

        self.panel.set_text(profile.message, &mut self.delay);
        self.panel.set_rgb(profile.color);

        if profile.vibration {
            self.vibration.set(false);
        }
    }

    /// Silence and release everything, then leave a stopped screen up.
    pub fn shutdown(self) {
        let Self {
            vibration,
            led,
            mut speaker,
            mut panel,
            mut delay,
        } = self;

        speaker.silence();
        vibration.release();
        led.release();
        log::info!("GPIO cleaned up");

        panel.clear();
        panel.set_text("System Stopped\n", &mut delay);
        panel.set_rgb(Rgb::OFF);
    }
}
