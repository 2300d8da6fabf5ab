// ProxAlert - Proximity Alert Controller
//
// Samples a distance sensor, classifies each reading into a severity level
// and drives vibration, LED, speaker, character display and RGB backlight
// to match. A push-button pauses and resumes alerting.
//
// All logic is hardware-agnostic: outputs are `embedded-hal` pins, buses and
// delays plus the two capability traits in `hal`. The firmware binary plugs
// in ESP-IDF peripherals; the host build and the tests plug in `sim`.

pub mod alert;
pub mod config;
pub mod control;
pub mod distance;
pub mod drivers;
pub mod events;
pub mod hal;
pub mod input;
pub mod layout;
pub mod profile;
pub mod sim;
