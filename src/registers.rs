//! MAX31856 register map and bit definitions.
//!
//! See the [MAX31856 datasheet](https://www.analog.com/media/en/technical-documentation/data-sheets/MAX31856.pdf),
//! table 6, for the full layout.

/// Configuration register 0: conversion mode, one-shot, open-circuit detection, CJ disable,
/// fault mode, fault clear, mains filter.
pub const CR0: u8 = 0x00;
/// Configuration register 1: averaging mode and thermocouple type.
pub const CR1: u8 = 0x01;
/// Fault mask register.
pub const MASK: u8 = 0x02;
/// Cold-junction high fault threshold.
pub const CJHF: u8 = 0x03;
/// Cold-junction low fault threshold.
pub const CJLF: u8 = 0x04;
/// Linearized temperature high fault threshold, MSB.
pub const LTHFTH: u8 = 0x05;
/// Linearized temperature high fault threshold, LSB.
pub const LTHFTL: u8 = 0x06;
/// Linearized temperature low fault threshold, MSB.
pub const LTLFTH: u8 = 0x07;
/// Linearized temperature low fault threshold, LSB.
pub const LTLFTL: u8 = 0x08;
/// Cold-junction temperature offset.
pub const CJTO: u8 = 0x09;
/// Cold-junction temperature, MSB.
pub const CJTH: u8 = 0x0A;
/// Cold-junction temperature, LSB.
pub const CJTL: u8 = 0x0B;
/// Linearized thermocouple temperature, byte 2.
pub const LTCBH: u8 = 0x0C;
/// Linearized thermocouple temperature, byte 1.
pub const LTCBM: u8 = 0x0D;
/// Linearized thermocouple temperature, byte 0.
pub const LTCBL: u8 = 0x0E;
/// Fault status register.
pub const SR: u8 = 0x0F;

/// Number of registers the driver shadows (0x00 through 0x0B).
pub const NUM_REGISTERS: usize = 12;

/// Register contents after the chip powers up.
pub const DEFAULT_REGISTERS: RegisterBank = [
    0x00, 0x03, 0xFF, 0x7F, 0xC0, 0x7F, 0xFF, 0x80, 0x00, 0x00, 0x00, 0x00,
];

/// Host-side copy of the chip's writable registers.
pub type RegisterBank = [u8; NUM_REGISTERS];

/// Builds the opcode that reads starting at `register`.
pub const fn read_opcode(register: u8) -> u8 {
    register & 0x7F
}

/// Builds the opcode that writes starting at `register`.
pub const fn write_opcode(register: u8) -> u8 {
    register | 0x80
}

/// The first four bank entries as they read back from the chip in one burst.
pub fn config_word(bank: &RegisterBank) -> u32 {
    u32::from_be_bytes([bank[0], bank[1], bank[2], bank[3]])
}

// CR0 bits
pub const CR0_FILTER_50HZ: u8 = 1 << 0;
pub const CR0_FAULTCLR: u8 = 1 << 1;
pub const CR0_FAULT_INTERRUPT: u8 = 1 << 2;
pub const CR0_CJ_DISABLED: u8 = 1 << 3;
pub const CR0_OC_SHIFT: u8 = 4;
pub const CR0_OC_MASK: u8 = 0b11 << CR0_OC_SHIFT;
pub const CR0_ONESHOT: u8 = 1 << 6;
pub const CR0_AUTOCONVERT: u8 = 1 << 7;

// CR1 fields
pub const CR1_TC_TYPE_MASK: u8 = 0x0F;
pub const CR1_AVG_SHIFT: u8 = 4;
pub const CR1_AVG_MASK: u8 = 0b111 << CR1_AVG_SHIFT;

// Fault status bits. MASK uses the same positions for the lower six.
pub const SR_CJ_RANGE: u8 = 1 << 7;
pub const SR_TC_RANGE: u8 = 1 << 6;
pub const SR_CJ_HIGH: u8 = 1 << 5;
pub const SR_CJ_LOW: u8 = 1 << 4;
pub const SR_TC_HIGH: u8 = 1 << 3;
pub const SR_TC_LOW: u8 = 1 << 2;
pub const SR_OVUV: u8 = 1 << 1;
pub const SR_OPEN: u8 = 1 << 0;

/// The MAX31856's fault status register, unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultStatus {
    pub cj_range: bool,
    pub tc_range: bool,
    pub cj_high: bool,
    pub cj_low: bool,
    pub tc_high: bool,
    pub tc_low: bool,
    pub ovuv: bool,
    pub open: bool,
}

impl FaultStatus {
    pub fn from_register(reg: u8) -> Self {
        Self {
            cj_range: (reg & SR_CJ_RANGE) != 0,
            tc_range: (reg & SR_TC_RANGE) != 0,
            cj_high: (reg & SR_CJ_HIGH) != 0,
            cj_low: (reg & SR_CJ_LOW) != 0,
            tc_high: (reg & SR_TC_HIGH) != 0,
            tc_low: (reg & SR_TC_LOW) != 0,
            ovuv: (reg & SR_OVUV) != 0,
            open: (reg & SR_OPEN) != 0,
        }
    }

    /// True if any fault flag is set.
    pub fn has_fault(&self) -> bool {
        self.cj_range
            || self.tc_range
            || self.cj_high
            || self.cj_low
            || self.tc_high
            || self.tc_low
            || self.ovuv
            || self.open
    }
}
