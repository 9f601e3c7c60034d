//! Byte-level register access to the MAX31856.
//!
//! Every MAX31856 transaction is an opcode byte followed by data, all inside one chip-select
//! assertion. The chip auto-increments the register address after each data byte, so a single
//! transaction can read or write a run of consecutive registers.

use std::io::Write as _;
use std::path::Path;

use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;
use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};
use thiserror::Error;

use crate::registers::{read_opcode, write_opcode};

/// The SPI clock the MAX31856 is driven at.
pub const SPI_CLOCK_HZ: u32 = 10_000_000;

/// The SPI mode for `embedded-hal` buses. The chip samples SDI on the rising edge of SCLK.
pub const MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_1;

/// Burst access to the chip's registers.
pub trait RegisterTransport {
    type Error;

    /// Fills `buf` with the registers starting at `register`, in one transaction.
    fn read_burst(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `data` to the registers starting at `register`, in one transaction.
    fn write_burst(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &mut T {
    type Error = T::Error;

    fn read_burst(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_burst(register, buf)
    }

    fn write_burst(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_burst(register, data)
    }
}

/// A MAX31856 behind the Linux kernel's SPI API.
///
/// The chip select is picked by the device node: `/dev/spidev0.1` is bus 0, chip select 1. The
/// kernel asserts it for the length of each transfer.
#[derive(Debug)]
pub struct SpidevTransport {
    spi: Spidev,
}

impl SpidevTransport {
    /// Opens and configures the given SPI path, usually something like `/dev/spidev0.0`.
    pub fn open(spi_path: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::open_with_speed(spi_path, SPI_CLOCK_HZ)
    }

    /// Like [`SpidevTransport::open`], with a slower clock for long cables.
    pub fn open_with_speed(spi_path: impl AsRef<Path>, max_speed_hz: u32) -> std::io::Result<Self> {
        let spi_path = spi_path.as_ref();
        let mut spi = Spidev::open(spi_path)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(max_speed_hz)
            .lsb_first(false)
            .mode(SpiModeFlags::SPI_MODE_1)
            .build();
        spi.configure(&options)?;
        tracing::debug!(path = %spi_path.display(), max_speed_hz, "opened MAX31856 spidev");

        Ok(Self { spi })
    }

    pub fn into_inner(self) -> Spidev {
        self.spi
    }
}

impl RegisterTransport for SpidevTransport {
    type Error = std::io::Error;

    fn read_burst(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut tx = vec![0_u8; buf.len() + 1];
        tx[0] = read_opcode(register);
        let mut rx = vec![0_u8; buf.len() + 1];
        {
            let mut transfer = SpidevTransfer::read_write(&tx, &mut rx);
            self.spi.transfer(&mut transfer)?;
        }
        // The first byte clocked in is while the opcode goes out
        buf.copy_from_slice(&rx[1..]);
        Ok(())
    }

    fn write_burst(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut tx = Vec::with_capacity(data.len() + 1);
        tx.push(write_opcode(register));
        tx.extend_from_slice(data);
        self.spi.write_all(&tx)
    }
}

/// Errors from an [`HalTransport`].
#[derive(Debug, Error)]
pub enum HalTransportError<SpiE, CsE> {
    #[error("SPI bus error: {0:?}")]
    Spi(SpiE),
    #[error("couldn't drive the chip select pin: {0:?}")]
    ChipSelect(CsE),
}

/// A MAX31856 on an `embedded-hal` SPI bus, with its chip select on a GPIO.
///
/// The bus should be set up with [`MODE`], MSB first, at up to [`SPI_CLOCK_HZ`]. SDO should have
/// a pull-up so that a missing chip reads as all ones.
#[derive(Debug)]
pub struct HalTransport<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS, SpiE, CsE> HalTransport<SPI, CS>
where
    SPI: spi::Transfer<u8, Error = SpiE> + spi::Write<u8, Error = SpiE>,
    CS: OutputPin<Error = CsE>,
{
    /// Takes the bus and chip select, leaving the chip deselected.
    pub fn new(spi: SPI, mut cs: CS) -> Result<Self, HalTransportError<SpiE, CsE>> {
        cs.set_high().map_err(HalTransportError::ChipSelect)?;
        Ok(Self { spi, cs })
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    fn transaction(
        &mut self,
        f: impl FnOnce(&mut SPI) -> Result<(), SpiE>,
    ) -> Result<(), HalTransportError<SpiE, CsE>> {
        self.cs.set_low().map_err(HalTransportError::ChipSelect)?;
        let result = f(&mut self.spi).map_err(HalTransportError::Spi);
        // Deselect even when the transfer failed, so the next one starts clean.
        self.cs.set_high().map_err(HalTransportError::ChipSelect)?;
        result
    }
}

impl<SPI, CS, SpiE, CsE> RegisterTransport for HalTransport<SPI, CS>
where
    SPI: spi::Transfer<u8, Error = SpiE> + spi::Write<u8, Error = SpiE>,
    CS: OutputPin<Error = CsE>,
{
    type Error = HalTransportError<SpiE, CsE>;

    fn read_burst(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.transaction(|spi| {
            spi.write(&[read_opcode(register)])?;
            buf.fill(0);
            spi.transfer(buf).map(|_| ())
        })
    }

    fn write_burst(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.transaction(|spi| {
            spi.write(&[write_opcode(register)])?;
            spi.write(data)
        })
    }
}
