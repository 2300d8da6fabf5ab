// ProxAlert - Shared I2C Bus
//
// The display, the backlight and the ADC board all sit on one I2C bus. Each
// driver gets its own `SharedI2c` handle; a transfer holds the lock for its
// whole duration, so transactions never interleave.

use std::sync::{Mutex, PoisonError};

use embedded_hal::i2c::{ErrorType, I2c, Operation};

pub struct SharedI2c<'a, I> {
    bus: &'a Mutex<I>,
}

impl<'a, I> SharedI2c<'a, I> {
    pub fn new(bus: &'a Mutex<I>) -> Self {
        Self { bus }
    }

    fn with_bus<R>(&self, f: impl FnOnce(&mut I) -> R) -> R {
        // Poisoned only means another holder panicked; the bus is still usable.
        let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *bus)
    }
}

impl<I: ErrorType> ErrorType for SharedI2c<'_, I> {
    type Error = I::Error;
}

impl<I: I2c> I2c for SharedI2c<'_, I> {
    fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        self.with_bus(|bus| bus.read(address, read))
    }

    fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        self.with_bus(|bus| bus.write(address, write))
    }

    fn write_read(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        self.with_bus(|bus| bus.write_read(address, write, read))
    }

    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.with_bus(|bus| bus.transaction(address, operations))
    }
}
