// ProxAlert - Firmware Entry Point
//
// Startup sequence:
//   1. Bring up logging and the hardware backend.
//   2. Wait for the ADC board (retry every 2 s).
//   3. Show the ready screen and enter the control loop.
//   4. On a stop request, silence and release the outputs and show
//      "System Stopped".
//
// On the ESP32-C3 the loop runs until power-off. On a host the same loop
// runs against simulated hardware and Ctrl-C stops it.

#[cfg(target_os = "espidf")]
mod board;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    board::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    simulation::run()
}

#[cfg(not(target_os = "espidf"))]
mod simulation {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use proxalert::alert::AlertEngine;
    use proxalert::control::{bring_up, ControlLoop};
    use proxalert::sim::{
        approach_and_retreat, Journal, SimBoard, SimButton, SimDelay, SimI2c, SimPin, SimTone,
    };

    /// Button presses every this many polls.
    const BUTTON_PERIOD: u32 = 15;

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("ProxAlert starting on simulated hardware (Ctrl-C to stop)");

        let stop = Arc::new(AtomicBool::new(false));
        {
            let stop = Arc::clone(&stop);
            ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))?;
        }

        let journal = Journal::log_only();
        let mut board = SimBoard::new(&journal, approach_and_retreat());
        let mut delay = SimDelay::realtime(&journal);
        bring_up(&mut board, &mut delay, &stop)?;

        let engine = AlertEngine::new(
            SimPin::new(&journal, "vibration"),
            SimPin::new(&journal, "led"),
            SimTone::new(&journal),
            SimI2c::new(&journal),
            delay,
        );
        let button = SimButton::periodic(&journal, BUTTON_PERIOD);

        ControlLoop::new(engine, button, board, stop).run();
        log::info!("Simulation finished");
        Ok(())
    }
}
