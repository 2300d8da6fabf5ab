// ProxAlert - ADC Expansion Board Driver
//
// Register-level driver for the I2C IO expansion board that digitises the
// distance sensor. Only the ADC path is used; the board's PWM outputs are
// parked at zero during `begin`.

use anyhow::anyhow;
use embedded_hal::i2c::{Error as _, I2c};

use crate::config::*;
use crate::hal::{AdcBoard, AdcChannel, BoardStatus};

pub struct ExpansionBoard<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> ExpansionBoard<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    fn read_reg_at(&mut self, address: u8, reg: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(address, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn read_ids(&mut self) -> Result<(u8, u8), I2C::Error> {
        let pid = self.read_reg_at(self.address, ADC_REG_PID)?;
        let vid = self.read_reg_at(self.address, ADC_REG_VID)?;
        Ok((pid, vid))
    }

    fn write_regs(&mut self, reg: u8, values: &[u8]) -> Result<(), I2C::Error> {
        let mut frame = Vec::with_capacity(values.len() + 1);
        frame.push(reg);
        frame.extend_from_slice(values);
        self.i2c.write(self.address, &frame)
    }

    /// Disable PWM, zero every duty cycle and switch the ADC off.
    fn park(&mut self) -> Result<(), I2C::Error> {
        self.write_regs(ADC_REG_PWM_CTRL, &[0x00])?;
        for chan in 0..ADC_PWM_CHANNELS {
            self.write_regs(ADC_REG_PWM_DUTY1 + chan * 2, &[0x00, 0x00])?;
        }
        self.write_regs(ADC_REG_ADC_CTRL, &[0x00])
    }
}

impl<I2C: I2c> AdcBoard for ExpansionBoard<I2C> {
    fn detect(&mut self) -> Vec<u8> {
        let mut found = Vec::new();
        for addr in I2C_ADDR_ADC_BOARD {
            if self.read_reg_at(addr, ADC_REG_PID).ok() == Some(ADC_EXPECTED_PID) {
                found.push(addr);
            }
        }
        found
    }

    fn begin(&mut self) -> BoardStatus {
        let (pid, vid) = match self.read_ids() {
            Ok(ids) => ids,
            Err(e) => {
                log::debug!("ADC board id read failed: {:?}", e.kind());
                return BoardStatus::Error;
            }
        };

        if pid != ADC_EXPECTED_PID {
            return BoardStatus::DeviceNotDetected;
        }
        if vid != ADC_EXPECTED_VID {
            return BoardStatus::SoftVersion;
        }

        match self.park() {
            Ok(()) => BoardStatus::Ok,
            Err(e) => {
                log::debug!("ADC board reset failed: {:?}", e.kind());
                BoardStatus::Error
            }
        }
    }

    fn enable_adc(&mut self) -> anyhow::Result<()> {
        self.write_regs(ADC_REG_ADC_CTRL, &[0x01])
            .map_err(|e| anyhow!("ADC enable failed: {:?}", e.kind()))
    }

    fn read_channel(&mut self, channel: AdcChannel) -> anyhow::Result<u16> {
        let reg = ADC_REG_ADC_VAL1 + channel.index() * 2;
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|e| anyhow!("ADC read on {:?} failed: {:?}", channel, e.kind()))?;
        Ok(u16::from_be_bytes(buf))
    }
}
