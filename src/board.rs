// ProxAlert - ESP32-C3 Hardware Binding
//
// Wires the real peripherals into the controller: GPIO pins through
// `PinDriver`, the speaker through an LEDC PWM channel, and one I2C bus
// shared by the display, the backlight and the ADC board.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver};
use esp_idf_hal::prelude::*;

use proxalert::alert::AlertEngine;
use proxalert::config::*;
use proxalert::control::{bring_up, ControlLoop};
use proxalert::drivers::adc_board::ExpansionBoard;
use proxalert::drivers::shared_bus::SharedI2c;
use proxalert::hal::ToneGenerator;

/// Speaker on LEDC channel 0, clocked by LEDC timer 0.
struct LedcTone {
    channel: LedcDriver<'static>,
}

impl ToneGenerator for LedcTone {
    fn set_frequency(&mut self, hz: u32) -> anyhow::Result<()> {
        // The channel owns its timer driver, so retune the timer directly.
        // SAFETY: timer 0 was configured by `LedcTimerDriver::new` in `run` and
        // stays alive inside `channel`; `ledc_set_freq` only touches that timer.
        esp_idf_sys::esp!(unsafe {
            esp_idf_sys::ledc_set_freq(
                esp_idf_sys::ledc_mode_t_LEDC_LOW_SPEED_MODE,
                esp_idf_sys::ledc_timer_t_LEDC_TIMER_0,
                hz,
            )
        })?;
        Ok(())
    }

    fn start(&mut self, duty_percent: u8) -> anyhow::Result<()> {
        let duty = self.channel.get_max_duty() * u32::from(duty_percent) / 100;
        self.channel.set_duty(duty)?;
        Ok(())
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        self.channel.set_duty(0)?;
        Ok(())
    }
}

pub fn run() -> anyhow::Result<()> {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("ProxAlert firmware starting…");

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // ---- GPIO -------------------------------------------------------------
    let mut button = PinDriver::input(pins.gpio3)?;
    button.set_pull(Pull::Down)?;
    let vibration = PinDriver::output(pins.gpio4)?;
    let led = PinDriver::output(pins.gpio5)?;
    log::info!(
        "GPIO: button={} vibration={} led={} speaker={}",
        PIN_BUTTON,
        PIN_VIBRATION,
        PIN_LED,
        PIN_SPEAKER
    );

    // ---- Speaker (LEDC PWM) -----------------------------------------------
    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default().frequency(SPEAKER_IDLE_FREQ_HZ.Hz().into()),
    )?;
    let mut channel = LedcDriver::new(peripherals.ledc.channel0, timer, pins.gpio10)?;
    channel.set_duty(0)?;

    // ---- I2C bus (display, backlight and ADC board) -----------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        pins.gpio6, // SDA
        pins.gpio7, // SCL
        &i2c_config,
    )?;
    log::info!("I2C: sda={} scl={}", PIN_I2C_SDA, PIN_I2C_SCL);
    // Lives for the whole programme; firmware never exits.
    let i2c_bus: &'static Mutex<I2cDriver<'static>> = Box::leak(Box::new(Mutex::new(i2c)));

    // ---- ADC board --------------------------------------------------------
    let mut board = ExpansionBoard::new(SharedI2c::new(i2c_bus), I2C_ADDR_ADC_BOARD_DEFAULT);
    let mut delay = FreeRtos;
    // Nothing on the device requests a stop; the loop runs until power-off.
    let stop = Arc::new(AtomicBool::new(false));
    bring_up(&mut board, &mut delay, &stop)?;

    let engine = AlertEngine::new(
        vibration,
        led,
        LedcTone { channel },
        SharedI2c::new(i2c_bus),
        delay,
    );

    ControlLoop::new(engine, button, board, stop).run();
    Ok(())
}
