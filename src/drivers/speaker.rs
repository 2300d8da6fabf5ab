// ProxAlert - Speaker Driver
//
// Plays fixed-length tones on the PWM tone generator. Every call blocks for
// the full duration of the sound.

use embedded_hal::delay::DelayNs;

use crate::config::*;
use crate::hal::ToneGenerator;

pub struct Speaker<T> {
    tone: T,
}

impl<T: ToneGenerator> Speaker<T> {
    pub fn new(tone: T) -> Self {
        Self { tone }
    }

    pub fn play_tone(&mut self, hz: u32, duration_ms: u32, delay: &mut impl DelayNs) {
        if let Err(e) = self
            .tone
            .set_frequency(hz)
            .and_then(|()| self.tone.start(SPEAKER_DUTY_PERCENT))
        {
            log::warn!("Tone {} Hz failed to start: {}", hz, e);
        }
        delay.delay_ms(duration_ms);
        self.silence();
    }

    /// Two-note ascending alert cue, E6 then G6.
    pub fn chime(&mut self, delay: &mut impl DelayNs) {
        self.play_tone(CHIME_NOTE_A_HZ, CHIME_NOTE_MS, delay);
        delay.delay_ms(CHIME_GAP_MS);
        self.play_tone(CHIME_NOTE_B_HZ, CHIME_NOTE_MS, delay);
    }

    pub fn silence(&mut self) {
        if let Err(e) = self.tone.stop() {
            log::warn!("Tone stop failed: {}", e);
        }
    }
}
