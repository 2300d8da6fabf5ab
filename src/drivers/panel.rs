// ProxAlert - Character Display + RGB Backlight
//
// 16x2 character LCD and its RGB backlight controller, both addressed with
// single register writes on the byte bus. Bus faults never propagate past
// this driver: they are logged and the display keeps whatever it showed.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use thiserror::Error;

use crate::config::*;
use crate::events::Rgb;
use crate::layout::{self, LcdOp};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PanelError {
    #[error("bus write to {addr:#04x} register {reg:#04x} failed: {kind:?}")]
    Bus { addr: u8, reg: u8, kind: ErrorKind },
}

pub struct Panel<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Panel<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    fn write_byte(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), PanelError> {
        self.i2c.write(addr, &[reg, value]).map_err(|e| PanelError::Bus {
            addr,
            reg,
            kind: e.kind(),
        })
    }

    fn command(&mut self, cmd: u8) {
        if let Err(e) = self.write_byte(I2C_ADDR_LCD, LCD_MODE_COMMAND, cmd) {
            log::error!("Error communicating with LCD: {}", e);
        }
    }

    fn put(&mut self, ch: char) {
        let byte = u8::try_from(ch).unwrap_or(b'?');
        if let Err(e) = self.write_byte(I2C_ADDR_LCD, LCD_MODE_DATA, byte) {
            log::error!("Error communicating with LCD: {}", e);
        }
    }

    /// Controller power-on sequence: 4-bit mode, 2 lines, display on, no cursor.
    pub fn init(&mut self, delay: &mut impl DelayNs) {
        delay.delay_ms(LCD_SETTLE_MS);
        for cmd in LCD_INIT_SEQUENCE {
            self.command(cmd);
        }
        delay.delay_ms(LCD_SETTLE_MS);
    }

    pub fn clear(&mut self) {
        self.command(LCD_CMD_CLEAR);
    }

    /// Replace the display contents. `\n` moves to the second row.
    pub fn set_text(&mut self, text: &str, delay: &mut impl DelayNs) {
        log::debug!("LCD: {:?}", text);
        for op in layout::layout(text) {
            match op {
                LcdOp::Clear => self.clear(),
                LcdOp::Settle => delay.delay_ms(LCD_SETTLE_MS),
                LcdOp::NextRow => self.command(LCD_CMD_ROW_1),
                LcdOp::Put { ch, .. } => self.put(ch),
            }
        }
    }

    pub fn set_rgb(&mut self, color: Rgb) {
        log::info!("Setting RGB to: R={}, G={}, B={}", color.r, color.g, color.b);
        if let Err(e) = self.write_rgb(color) {
            log::error!("Error communicating with RGB backlight: {}", e);
        }
    }

    fn write_rgb(&mut self, color: Rgb) -> Result<(), PanelError> {
        self.write_byte(I2C_ADDR_RGB, RGB_REG_MODE1, 0x00)?;
        self.write_byte(I2C_ADDR_RGB, RGB_REG_MODE2, 0x00)?;
        self.write_byte(I2C_ADDR_RGB, RGB_REG_OUTPUT, RGB_OUTPUT_ALL_PWM)?;
        self.write_byte(I2C_ADDR_RGB, RGB_REG_RED, color.r)?;
        self.write_byte(I2C_ADDR_RGB, RGB_REG_GREEN, color.g)?;
        self.write_byte(I2C_ADDR_RGB, RGB_REG_BLUE, color.b)
    }
}
