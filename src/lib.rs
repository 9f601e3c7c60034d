//! # linux_max31856
//!
//! A library that helps you read from a MAX31856 thermocouple digitizer over SPI.
//!
//! The MAX31856 has to be configured before it takes readings, and it forgets that
//! configuration whenever it loses power. On a rig where the chip sits at the end of a cable
//! next to the cold junction, that happens every time someone bumps the connector. This driver
//! keeps a copy of every register it writes. When a reading comes back as exactly zero it checks
//! the chip against that copy, and if they disagree it writes the whole copy back. The poll that
//! notices the loss returns [`Max31856Error::NoDevice`]; the next one reads normally.
//!
//! ## Usage
//!
//! To use this library, you'll need to know which SPI device to select.
//! On Linux, you can use `ls /dev -1 | grep spidev` to figure it out!
//!
//! Then, you can use something like this example in your binary...
//!
//! ```no_run
//! fn main() -> anyhow::Result<()> {
//!     use linux_max31856::{Config, Max31856, Max31856Error, ThermocoupleType, Unit};
//!     use std::time::Duration;
//!
//!     let mut max = Max31856::open("/dev/spidev0.0")?;
//!     max.configure(&Config::continuous(ThermocoupleType::K))?;
//!
//!     loop {
//!         match max.read_thermocouple(Unit::Celsius) {
//!             Ok(temp) => println!("Read Celsius! Got: {temp}° C."),
//!             Err(Max31856Error::NoDevice) => println!("no MAX31856 yet..."),
//!             Err(e) => println!("couldn't read: {e}"),
//!         }
//!         std::thread::sleep(Duration::from_millis(500));
//!     }
//! }
//! ```
//!
//! On other platforms, wrap any `embedded-hal` SPI bus and chip select pin in a
//! [`HalTransport`] and pass that to [`Max31856::new`].

use std::path::Path;

pub mod config;
pub mod decode;
mod error;
pub mod registers;
pub mod transport;

pub use config::{
    Averaging, Config, ConversionMode, NoiseFilter, OpenCircuitDetection, ThermocoupleType,
};
pub use decode::Unit;
pub use error::Max31856Error;
pub use registers::FaultStatus;
pub use transport::{HalTransport, HalTransportError, RegisterTransport, SpidevTransport};

use registers::*;

/// A representation of the MAX31856 thermocouple digitizer.
///
/// The driver owns its transport and a shadow of registers 0x00 through 0x0B. Use one driver per
/// chip; drivers never share state, so several chips can be polled from one process as long as
/// each has its own chip select.
#[derive(Debug)]
pub struct Max31856<T> {
    transport: T,
    registers: RegisterBank,
}

impl Max31856<SpidevTransport> {
    /// Tries to open a MAX31856 at the given SPI path, which usually looks like `/dev/spidev0.0`.
    /// Only fails if there's something wrong with the SPI connection.
    pub fn open(spi_path: impl AsRef<Path>) -> Result<Self, Max31856Error<std::io::Error>> {
        Ok(Self::new(SpidevTransport::open(spi_path)?))
    }
}

impl<T: RegisterTransport> Max31856<T> {
    /// Wraps a transport. Nothing is sent to the chip; the shadow registers start at the chip's
    /// power-on values.
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            registers: DEFAULT_REGISTERS,
        }
    }

    /// The values the driver believes registers 0x00 through 0x0B hold.
    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Direct access to the bus. Writes made through it bypass the shadow registers and will be
    /// undone by the next recovery.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Gives the transport back.
    pub fn release(self) -> T {
        self.transport
    }

    /// Writes one register and remembers the value so it can be restored after a power loss.
    ///
    /// Registers past 0x0B are read-only on the chip and are ignored here without an error. If
    /// the transfer fails, the shadow copy keeps its old value.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Max31856Error<T::Error>> {
        let Some(slot) = self.registers.get_mut(register as usize) else {
            tracing::debug!(register, "ignoring write to a register outside the shadow bank");
            return Ok(());
        };

        tracing::trace!(register, value, "writing register");
        self.transport
            .write_burst(register, &[value])
            .map_err(Max31856Error::Transport)?;
        *slot = value;

        Ok(())
    }

    /// Writes CR0, CR1 and the fault mask.
    pub fn configure(&mut self, config: &Config) -> Result<(), Max31856Error<T::Error>> {
        self.write_register(CR0, config.cr0())?;
        self.write_register(CR1, config.cr1())?;
        self.write_register(MASK, config.fault_mask)
    }

    /// Changes the thermocouple type, keeping the averaging mode.
    pub fn set_thermocouple_type(
        &mut self,
        thermocouple_type: ThermocoupleType,
    ) -> Result<(), Max31856Error<T::Error>> {
        let cr1 = (self.registers[CR1 as usize] & !CR1_TC_TYPE_MASK) | thermocouple_type as u8;
        self.write_register(CR1, cr1)
    }

    /// Sets the cold-junction offset (CJTO), in counts of 0.0625 °C.
    pub fn set_cold_junction_offset(&mut self, offset: i8) -> Result<(), Max31856Error<T::Error>> {
        self.write_register(CJTO, offset as u8)
    }

    /// Tries to read the thermocouple temperature.
    ///
    /// The chip converts in the background, taking around 155 ms or longer depending on the
    /// averaging mode in CR1, so this returns the latest finished conversion.
    pub fn read_thermocouple(&mut self, unit: Unit) -> Result<f64, Max31856Error<T::Error>> {
        let raw = self.read_sample(LTCBH)?;
        let celsius = decode::thermocouple_celsius(raw)?;
        Ok(unit.convert(celsius))
    }

    /// Tries to read the chip's own (cold-junction) temperature.
    pub fn read_cold_junction(&mut self, unit: Unit) -> Result<f64, Max31856Error<T::Error>> {
        // LTLFTL comes along in the top byte so that CJTO lands next to CJTH/CJTL
        let raw = self.read_sample(LTLFTL)?;
        Ok(unit.convert(decode::cold_junction_celsius(raw)))
    }

    /// Reads every flag in the fault status register.
    pub fn read_fault_status(&mut self) -> Result<FaultStatus, Max31856Error<T::Error>> {
        let mut status = [0_u8; 1];
        self.transport
            .read_burst(SR, &mut status)
            .map_err(Max31856Error::Transport)?;

        // A floating, pulled-up SDO reads as every fault at once
        if status[0] == 0xFF {
            return Err(Max31856Error::NoDevice);
        }
        Ok(FaultStatus::from_register(status[0]))
    }

    /// Clears latched faults by pulsing CR0's FAULTCLR bit.
    pub fn clear_faults(&mut self) -> Result<(), Max31856Error<T::Error>> {
        let cr0 = self.registers[CR0 as usize];
        self.transport
            .write_burst(CR0, &[cr0 | CR0_FAULTCLR])
            .map_err(Max31856Error::Transport)?;
        self.write_register(CR0, cr0)
    }

    /// Reads four registers as one big-endian word, screening out a missing or reset chip.
    fn read_sample(&mut self, register: u8) -> Result<i32, Max31856Error<T::Error>> {
        let raw = self.read_word(register)?;

        // Nothing is driving SDO, so the pull-up makes every bit high
        if raw == -1 {
            return Err(Max31856Error::NoDevice);
        }

        // Either exactly 0.000° or a chip that came back from a power loss with cleared
        // registers and no conversions yet
        if raw == 0 {
            self.verify()?;
        }

        Ok(raw)
    }

    /// Checks CR0 through CJHF against the shadow copy, restoring every register if they differ.
    ///
    /// A restore still reports `NoDevice`, since the chip needs a conversion cycle with the
    /// restored settings before its readings mean anything.
    fn verify(&mut self) -> Result<(), Max31856Error<T::Error>> {
        let actual = self.read_word(CR0)?;
        if actual == -1 {
            return Err(Max31856Error::NoDevice);
        }

        let expected = config_word(&self.registers);
        if actual as u32 == expected {
            tracing::debug!("MAX31856 configuration intact");
            return Ok(());
        }

        tracing::warn!(
            expected = %format!("{expected:#010x}"),
            actual = %format!("{:#010x}", actual as u32),
            "MAX31856 lost its configuration, restoring registers"
        );
        self.transport
            .write_burst(CR0, &self.registers)
            .map_err(Max31856Error::Transport)?;

        Err(Max31856Error::NoDevice)
    }

    fn read_word(&mut self, register: u8) -> Result<i32, Max31856Error<T::Error>> {
        let mut buf = [0_u8; 4];
        self.transport
            .read_burst(register, &mut buf)
            .map_err(Max31856Error::Transport)?;
        tracing::trace!(register, data = ?buf, "read registers");

        Ok(i32::from_be_bytes(buf))
    }
}
