// ProxAlert - Control Loop
//
// One iteration: poll the button, apply a toggle if one fired, then either
// idle briefly (paused) or sample -> convert -> classify -> actuate and wait
// out the cycle. A stop request is honoured between iterations only; the
// loop then runs the shutdown sequence exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;

use crate::alert::AlertEngine;
use crate::config::*;
use crate::distance;
use crate::events::{Severity, ToggleState};
use crate::hal::{AdcBoard, AdcChannel, BoardStatus, ToneGenerator};
use crate::input::ToggleController;

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Paused,
    Sampled { raw: u16, distance: i32, level: Severity },
    SampleFailed,
}

/// Block until the ADC board answers, retrying every `BOARD_RETRY_MS`, then
/// switch its ADC on. Gives up only if a stop is requested meanwhile.
pub fn bring_up<A: AdcBoard, D: DelayNs>(
    board: &mut A,
    delay: &mut D,
    stop: &AtomicBool,
) -> anyhow::Result<()> {
    let found = board.detect();
    if found.is_empty() {
        log::warn!("ADC board: no device found during detection");
    } else {
        log::info!("ADC board: found at {:02x?}", found);
    }

    loop {
        if stop.load(Ordering::SeqCst) {
            bail!("stopped before the ADC board came up");
        }
        match board.begin() {
            BoardStatus::Ok => break,
            status => {
                log::warn!("Board begin failed: {}", status);
                delay.delay_ms(BOARD_RETRY_MS);
            }
        }
    }
    log::info!("Board begin success");

    board.enable_adc().context("enabling ADC")
}

pub struct ControlLoop<B, A, V, L, T, I, D> {
    engine: AlertEngine<V, L, T, I, D>,
    button: B,
    board: A,
    toggle: ToggleController,
    stop: Arc<AtomicBool>,
}

impl<B, A, V, L, T, I, D> ControlLoop<B, A, V, L, T, I, D>
where
    B: InputPin,
    A: AdcBoard,
    V: OutputPin,
    L: OutputPin,
    T: ToneGenerator,
    I: I2c,
    D: DelayNs,
{
    pub fn new(engine: AlertEngine<V, L, T, I, D>, button: B, board: A, stop: Arc<AtomicBool>) -> Self {
        Self {
            engine,
            button,
            board,
            toggle: ToggleController::new(),
            stop,
        }
    }

    pub fn toggle_state(&self) -> ToggleState {
        self.toggle.state()
    }

    /// Show the ready screen, loop until stopped, then shut down.
    /// Only the host build ever raises `stop`; on the device this never returns.
    pub fn run(mut self) {
        self.engine.startup();
        log::info!("Monitoring started");

        while !self.stop.load(Ordering::SeqCst) {
            self.step();
        }

        log::info!("User interrupted");
        self.engine.shutdown();
    }

    pub fn step(&mut self) -> Step {
        let high = self.button.is_high().unwrap_or_else(|e| {
            log::warn!("Button read failed: {:?}", e);
            false
        });

        if let Some(change) = self.toggle.update(high) {
            log::info!("Toggle: {:?}", change.0);
            self.engine.show_status(change);
            self.engine.delay_ms(DEBOUNCE_MS);
        }

        if !self.toggle.state().is_enabled() {
            self.engine.delay_ms(PAUSED_POLL_MS);
            return Step::Paused;
        }

        let raw = match self.board.read_channel(AdcChannel::A0) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("ADC read failed: {:#}", e);
                self.engine.delay_ms(CYCLE_DELAY_MS);
                return Step::SampleFailed;
            }
        };
        log::info!("Raw ADC value: {}", raw);

        let distance = distance::to_centimeters(i32::from(raw));
        log::info!("Distance: {} cm", distance);

        let level = Severity::from_distance(distance);
        self.engine.actuate(level);
        self.engine.delay_ms(CYCLE_DELAY_MS);

        Step::Sampled { raw, distance, level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Rgb;
    use crate::sim::{Journal, SimBoard, SimButton, SimDelay, SimI2c, SimPin, SimTone, Trace};

    type SimLoop = ControlLoop<SimButton, SimBoard, SimPin, SimPin, SimTone, SimI2c, SimDelay>;

    fn control(journal: &Journal, button: SimButton, samples: &[u16], stop: &Arc<AtomicBool>) -> SimLoop {
        let engine = AlertEngine::new(
            SimPin::new(journal, "vibration"),
            SimPin::new(journal, "led"),
            SimTone::new(journal),
            SimI2c::new(journal),
            SimDelay::new(journal),
        );
        ControlLoop::new(
            engine,
            button,
            SimBoard::new(journal, samples.iter().copied()),
            Arc::clone(stop),
        )
    }

    #[test]
    fn enabled_iteration_samples_and_waits_the_cycle() {
        let journal = Journal::default();
        let stop = Arc::new(AtomicBool::new(false));
        let mut control = control(&journal, SimButton::released(&journal), &[500], &stop);

        let step = control.step();

        assert_eq!(
            step,
            Step::Sampled { raw: 500, distance: 97, level: Severity::Clear }
        );
        assert_eq!(journal.pin_level("vibration"), Some(false));
        assert_eq!(journal.pin_level("led"), Some(false));
        assert_eq!(journal.lcd_rows(), ["Distance OK".to_string(), "All Clear".to_string()]);
        assert_eq!(journal.backlight(), Some(Rgb::new(0, 0, 255)));
        assert_eq!(journal.traces().last(), Some(&Trace::Delay(2000)));
    }

    #[test]
    fn press_pauses_without_sampling() {
        let journal = Journal::default();
        let stop = Arc::new(AtomicBool::new(false));
        let button = SimButton::scripted(&journal, [true, true, false]);
        let mut control = control(&journal, button, &[10], &stop);

        assert_eq!(control.step(), Step::Paused);
        assert_eq!(control.toggle_state(), ToggleState::Paused);
        assert_eq!(journal.lcd_rows()[0], "System Paused");
        assert_eq!(journal.backlight(), Some(Rgb::YELLOW));
        assert_eq!(journal.delays_ms(), vec![100, 300, 100]);

        // Held, then released: still paused, no new status screen.
        journal.clear();
        assert_eq!(control.step(), Step::Paused);
        assert_eq!(control.step(), Step::Paused);
        assert_eq!(journal.delays_ms(), vec![100, 100]);
        assert!(!journal.traces().iter().any(|t| matches!(t, Trace::AdcRead(_))));
    }

    #[test]
    fn second_press_resumes_in_same_iteration() {
        let journal = Journal::default();
        let stop = Arc::new(AtomicBool::new(false));
        let button = SimButton::scripted(&journal, [true, false, true]);
        let mut control = control(&journal, button, &[10], &stop);

        control.step();
        control.step();
        journal.clear();

        let step = control.step();
        assert_eq!(control.toggle_state(), ToggleState::Enabled);
        assert!(matches!(step, Step::Sampled { level: Severity::Critical, .. }));
        assert!(journal.traces().contains(&Trace::AdcRead(10)));
    }

    #[test]
    fn failed_sample_skips_actuation() {
        let journal = Journal::default();
        let stop = Arc::new(AtomicBool::new(false));
        let mut control = control(&journal, SimButton::released(&journal), &[], &stop);

        assert_eq!(control.step(), Step::SampleFailed);
        assert_eq!(journal.pin_level("vibration"), None);
        assert_eq!(journal.delays_ms(), vec![2000]);
    }

    #[test]
    fn button_is_not_polled_during_actuation() {
        let journal = Journal::default();
        let stop = Arc::new(AtomicBool::new(false));
        let button = SimButton::scripted(&journal, [false, true]);
        let mut control = control(&journal, button, &[0], &stop);

        // Critical sequence runs to the end even though the next read is a press.
        let step = control.step();
        assert!(matches!(step, Step::Sampled { level: Severity::Critical, .. }));
        let reads = journal
            .traces()
            .iter()
            .filter(|t| matches!(t, Trace::ButtonRead(_)))
            .count();
        assert_eq!(reads, 1);
        assert_eq!(control.toggle_state(), ToggleState::Enabled);

        // The press lands on the next iteration.
        assert_eq!(control.step(), Step::Paused);
    }

    #[test]
    fn run_stops_and_shuts_down_once() {
        let journal = Journal::default();
        let stop = Arc::new(AtomicBool::new(false));
        let button = SimButton::scripted(&journal, [false, false]).then_stop(&stop);
        let control = control(&journal, button, &[30, 500], &stop);

        control.run();

        let traces = journal.traces();
        // Ready screen, two sampled cycles, then a third poll raises the stop
        // and still finishes that iteration.
        let reads = traces.iter().filter(|t| matches!(t, Trace::AdcRead(_))).count();
        assert_eq!(reads, 3);
        // Shutdown follows the last cycle delay directly.
        let last_cycle_end = traces.iter().rposition(|t| *t == Trace::Delay(2000)).unwrap();
        assert_eq!(traces[last_cycle_end + 1], Trace::ToneStop);
        assert_eq!(
            traces.iter().filter(|t| **t == Trace::Released("led")).count(),
            1
        );
        assert_eq!(journal.lcd_rows(), ["System Stopped".to_string(), String::new()]);
        assert_eq!(journal.backlight(), Some(Rgb::OFF));
    }

    #[test]
    fn run_with_stop_already_requested_only_starts_and_stops() {
        let journal = Journal::default();
        let stop = Arc::new(AtomicBool::new(true));
        let control = control(&journal, SimButton::released(&journal), &[0], &stop);

        control.run();

        let traces = journal.traces();
        assert!(!traces.iter().any(|t| matches!(t, Trace::ButtonRead(_))));
        assert_eq!(traces.iter().filter(|t| **t == Trace::ToneStop).count(), 1);
        assert_eq!(journal.backlight(), Some(Rgb::OFF));
    }

    #[test]
    fn bring_up_retries_until_board_answers() {
        let journal = Journal::default();
        let stop = AtomicBool::new(false);
        let mut board = SimBoard::new(&journal, [1]).failing_begins(3);
        let mut delay = SimDelay::new(&journal);

        bring_up(&mut board, &mut delay, &stop).unwrap();

        assert_eq!(journal.delays_ms(), vec![2000, 2000, 2000]);
    }

    #[test]
    fn bring_up_gives_up_on_stop() {
        let journal = Journal::default();
        let stop = AtomicBool::new(true);
        let mut board = SimBoard::new(&journal, [1]).failing_begins(u32::MAX);
        let mut delay = SimDelay::new(&journal);

        assert!(bring_up(&mut board, &mut delay, &stop).is_err());
        assert!(journal.delays_ms().is_empty());
    }
}
