//! Fixed-point decoding of the MAX31856 temperature registers.
//!
//! Both decoders take the four register bytes of a burst read packed big-endian into an `i32`,
//! which is how they come off the wire.

use crate::registers::{SR_OPEN, SR_OVUV};

/// Degrees Celsius per LSB of the linearized thermocouple temperature (2^-7).
pub const THERMOCOUPLE_RESOLUTION: f64 = 0.0078125;

/// Degrees Celsius per LSB of the cold-junction temperature (2^-6).
pub const COLD_JUNCTION_RESOLUTION: f64 = 0.015625;

/// The temperature unit a reading is returned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    /// Converts degrees Celsius into this unit.
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            Unit::Celsius => celsius,
            Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

/// A fault flagged in the low bits of a thermocouple sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFault {
    OpenCircuit,
    OverUnderVoltage,
}

/// Decodes registers 0x0C..=0x0F (LTCBH, LTCBM, LTCBL, SR) into degrees Celsius.
///
/// Open circuit takes precedence over over/under voltage when both bits are set.
pub fn thermocouple_celsius(raw: i32) -> Result<f64, SampleFault> {
    let status = raw as u8;
    if status & SR_OPEN != 0 {
        return Err(SampleFault::OpenCircuit);
    }
    if status & SR_OVUV != 0 {
        return Err(SampleFault::OverUnderVoltage);
    }

    // The arithmetic shift drops the status byte and the five unused bits of LTCBL while
    // keeping the sign of negative temperatures.
    Ok(f64::from(raw >> 13) * THERMOCOUPLE_RESOLUTION)
}

/// Decodes registers 0x08..=0x0B (LTLFTL, CJTO, CJTH, CJTL) into degrees Celsius.
///
/// CJTO is added to the cold-junction count before scaling.
pub fn cold_junction_celsius(raw: i32) -> f64 {
    let offset = i32::from((raw >> 16) as u8 as i8);
    // The two lowest bits of CJTL are unused.
    let junction = i32::from((raw as u16 as i16) >> 2);

    f64::from(junction + offset) * COLD_JUNCTION_RESOLUTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_thermocouple() {
        let celsius = thermocouple_celsius(0x0C8F_0000).unwrap();
        assert_eq!(celsius, 200.9375);
        assert_eq!(Unit::Fahrenheit.convert(celsius), 393.6875);
    }

    #[test]
    fn negative_thermocouple_keeps_its_sign() {
        // -250.0 °C is 0xF06000 in LTCB, followed by a clear status byte.
        let raw = 0xF060_0000_u32 as i32;
        assert_eq!(thermocouple_celsius(raw).unwrap(), -250.0);

        // Smallest negative step.
        let raw = 0xFFFF_E000_u32 as i32;
        assert_eq!(thermocouple_celsius(raw).unwrap(), -THERMOCOUPLE_RESOLUTION);
    }

    #[test]
    fn thermocouple_ignores_unused_bits() {
        // bits 8..13 are unused and the range/threshold faults don't block a reading
        let raw = 0x0C8F_0000 | 0x1F00 | i32::from(crate::registers::SR_TC_HIGH);
        assert_eq!(thermocouple_celsius(raw).unwrap(), 200.9375);
    }

    #[test]
    fn thermocouple_faults() {
        assert_eq!(thermocouple_celsius(0x0C8F_0001), Err(SampleFault::OpenCircuit));
        assert_eq!(thermocouple_celsius(0x0C8F_0002), Err(SampleFault::OverUnderVoltage));
        assert_eq!(thermocouple_celsius(0x0C8F_0003), Err(SampleFault::OpenCircuit));
    }

    #[test]
    fn cold_junction_with_offset() {
        // 0x1900 >> 2 = 1600, plus an offset of 2
        assert_eq!(cold_junction_celsius(0x0002_1900), 25.03125);
    }

    #[test]
    fn cold_junction_negative_parts() {
        // CJTO = -1, CJT = 0xFF00 (-256 >> 2 = -64)
        let raw = 0x00FF_FF00_u32 as i32;
        assert_eq!(cold_junction_celsius(raw), -65.0 * COLD_JUNCTION_RESOLUTION);
    }

    #[test]
    fn cold_junction_ignores_the_threshold_byte() {
        assert_eq!(
            cold_junction_celsius(0x7F02_1900),
            cold_junction_celsius(0x0002_1900)
        );
        assert_eq!(
            cold_junction_celsius(0x8002_1900_u32 as i32),
            cold_junction_celsius(0x0002_1900)
        );
    }

    #[test]
    fn celsius_is_passed_through() {
        assert_eq!(Unit::Celsius.convert(-40.0), -40.0);
        assert_eq!(Unit::Fahrenheit.convert(-40.0), -40.0);
        assert_eq!(Unit::Fahrenheit.convert(100.0), 212.0);
    }
}
