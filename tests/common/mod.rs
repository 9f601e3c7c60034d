#![allow(dead_code)]

use linux_max31856::registers::{CR0, CR0_FAULTCLR, DEFAULT_REGISTERS, NUM_REGISTERS, SR};
use linux_max31856::RegisterTransport;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Read { register: u8, len: usize },
    Write { register: u8, data: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// A MAX31856 register file that can be unplugged and power-cycled.
#[derive(Debug)]
pub struct MockMax31856 {
    pub registers: [u8; 16],
    /// When false, SDO floats high and writes go nowhere.
    pub present: bool,
    /// Lets this many transactions through, then fails one without touching the registers.
    pub fail_after: Option<usize>,
    pub log: Vec<Op>,
}

impl MockMax31856 {
    pub fn new() -> Self {
        Self {
            registers: Self::power_on_registers(),
            present: true,
            fail_after: None,
            log: Vec::new(),
        }
    }

    pub fn power_on_registers() -> [u8; 16] {
        let mut registers = [0_u8; 16];
        registers[..NUM_REGISTERS].copy_from_slice(&DEFAULT_REGISTERS);
        registers
    }

    /// The chip comes back with default settings and no conversion results.
    pub fn power_cycle(&mut self) {
        self.registers = Self::power_on_registers();
    }

    /// Sets LTCBH, LTCBM, LTCBL and SR from one big-endian word.
    pub fn set_thermocouple(&mut self, word: u32) {
        self.registers[12..16].copy_from_slice(&word.to_be_bytes());
    }

    pub fn set_cold_junction(&mut self, offset: u8, junction: u16) {
        self.registers[9] = offset;
        self.registers[10..12].copy_from_slice(&junction.to_be_bytes());
    }

    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.log
            .iter()
            .filter_map(|op| match op {
                Op::Write { register, data } => Some((*register, data.clone())),
                Op::Read { .. } => None,
            })
            .collect()
    }

    fn check_bus(&mut self) -> Result<(), BusFault> {
        match self.fail_after {
            Some(0) => {
                self.fail_after = None;
                Err(BusFault)
            }
            Some(n) => {
                self.fail_after = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl RegisterTransport for MockMax31856 {
    type Error = BusFault;

    fn read_burst(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.check_bus()?;
        self.log.push(Op::Read { register, len: buf.len() });

        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = if self.present {
                self.registers[(register as usize + i) % 16]
            } else {
                0xFF
            };
        }
        Ok(())
    }

    fn write_burst(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.check_bus()?;
        self.log.push(Op::Write { register, data: data.to_vec() });

        if !self.present {
            return Ok(());
        }
        for (i, byte) in data.iter().enumerate() {
            let address = (register as usize + i) % 16;
            // Temperature and status registers are read-only
            if address < NUM_REGISTERS {
                self.registers[address] = *byte;
            }
            if address == CR0 as usize && byte & CR0_FAULTCLR != 0 {
                self.registers[SR as usize] = 0;
            }
        }
        Ok(())
    }
}
