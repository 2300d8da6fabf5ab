// End-to-end runs of the control loop against simulated hardware.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use proxalert::alert::AlertEngine;
use proxalert::control::{bring_up, ControlLoop, Step};
use proxalert::events::{Rgb, Severity, ToggleState};
use proxalert::sim::{Journal, SimBoard, SimButton, SimDelay, SimI2c, SimPin, SimTone, Trace};

type SimLoop = ControlLoop<SimButton, SimBoard, SimPin, SimPin, SimTone, SimI2c, SimDelay>;

fn build(journal: &Journal, button: SimButton, board: SimBoard, stop: &Arc<AtomicBool>) -> SimLoop {
    let engine = AlertEngine::new(
        SimPin::new(journal, "vibration"),
        SimPin::new(journal, "led"),
        SimTone::new(journal),
        SimI2c::new(journal),
        SimDelay::new(journal),
    );
    ControlLoop::new(engine, button, board, Arc::clone(stop))
}

fn shutdowns(journal: &Journal) -> usize {
    journal
        .traces()
        .iter()
        .filter(|t| **t == Trace::Released("vibration"))
        .count()
}

#[test]
fn mid_scale_sample_reads_all_clear() {
    let journal = Journal::default();
    let stop = Arc::new(AtomicBool::new(false));
    let mut control = build(
        &journal,
        SimButton::released(&journal),
        SimBoard::new(&journal, [500]),
        &stop,
    );

    let step = control.step();

    assert_eq!(step, Step::Sampled { raw: 500, distance: 97, level: Severity::Clear });
    assert_eq!(journal.pin_level("vibration"), Some(false));
    assert_eq!(journal.pin_level("led"), Some(false));
    assert_eq!(journal.lcd_rows(), ["Distance OK".to_string(), "All Clear".to_string()]);
    assert_eq!(journal.backlight(), Some(Rgb::new(0, 0, 255)));
}

#[test]
fn approaching_object_walks_through_every_level() {
    let journal = Journal::default();
    let stop = Arc::new(AtomicBool::new(false));
    let mut control = build(
        &journal,
        SimButton::released(&journal),
        SimBoard::new(&journal, [100, 60, 40, 10]),
        &stop,
    );

    let levels: Vec<Severity> = (0..4)
        .map(|_| match control.step() {
            Step::Sampled { level, .. } => level,
            other => panic!("unexpected step {other:?}"),
        })
        .collect();

    assert_eq!(
        levels,
        vec![Severity::Clear, Severity::Caution, Severity::Warning, Severity::Critical]
    );
    assert_eq!(journal.backlight(), Some(Rgb::RED));
}

#[test]
fn pause_during_critical_takes_effect_next_iteration() {
    let journal = Journal::default();
    let stop = Arc::new(AtomicBool::new(false));
    let button = SimButton::scripted(&journal, [false, true, false]).then_stop(&stop);
    let control = build(&journal, button, SimBoard::new(&journal, [0]), &stop);

    control.run();

    let traces = journal.traces();
    // One critical cycle, then paused polls until the stop; no second sample.
    assert_eq!(traces.iter().filter(|t| matches!(t, Trace::AdcRead(_))).count(), 1);
    let led_pulses = traces
        .iter()
        .filter(|t| **t == Trace::Pin { name: "led", high: true })
        .count();
    assert_eq!(led_pulses, 5);
    assert_eq!(shutdowns(&journal), 1);
    assert_eq!(journal.lcd_rows(), ["System Stopped".to_string(), String::new()]);
}

#[test]
fn shutdown_runs_once_whatever_the_state() {
    for (levels, expected) in [
        (vec![false, false], ToggleState::Enabled),
        (vec![true, false], ToggleState::Paused),
    ] {
        let journal = Journal::default();
        let stop = Arc::new(AtomicBool::new(false));
        let button = SimButton::scripted(&journal, levels).then_stop(&stop);
        let mut control = build(&journal, button, SimBoard::new(&journal, [20]), &stop);

        while !stop.load(Ordering::SeqCst) {
            control.step();
        }
        assert_eq!(control.toggle_state(), expected);
        assert_eq!(shutdowns(&journal), 0);

        control.run();
        assert_eq!(shutdowns(&journal), 1);
        assert_eq!(journal.backlight(), Some(Rgb::OFF));
    }
}

#[test]
fn bring_up_then_loop() {
    let journal = Journal::default();
    let stop = Arc::new(AtomicBool::new(false));
    let mut board = SimBoard::new(&journal, [500]).failing_begins(2);
    let mut delay = SimDelay::new(&journal);

    bring_up(&mut board, &mut delay, &stop).unwrap();
    assert_eq!(journal.delays_ms(), vec![2000, 2000]);

    let button = SimButton::scripted(&journal, [false]).then_stop(&stop);
    build(&journal, button, board, &stop).run();

    assert_eq!(shutdowns(&journal), 1);
}
