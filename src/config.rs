//! Typed chip configuration, encoded into CR0, CR1 and MASK.

use crate::registers::*;

/// The thermocouple type the chip linearizes for (CR1 bits 3:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ThermocoupleType {
    B = 0x0,
    E = 0x1,
    J = 0x2,
    #[default]
    K = 0x3,
    N = 0x4,
    R = 0x5,
    S = 0x6,
    T = 0x7,
    /// Raw voltage mode, gain of 8. The thermocouple register holds a voltage, not a temperature.
    VoltageGain8 = 0x8,
    /// Raw voltage mode, gain of 32.
    VoltageGain32 = 0xC,
}

/// Samples averaged per conversion (CR1 bits 6:4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Averaging {
    #[default]
    One = 0,
    Two = 1,
    Four = 2,
    Eight = 3,
    Sixteen = 4,
}

/// Mains frequency rejected by the input filter (CR0 bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseFilter {
    #[default]
    Hz60,
    Hz50,
}

/// CR0 bit 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Conversions only happen on a one-shot request.
    #[default]
    NormallyOff,
    /// A conversion roughly every 100 ms.
    Continuous,
}

/// Open-circuit fault detection (CR0 bits 5:4). The variants follow the source resistance and
/// time constant of the thermocouple circuit, see datasheet table 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum OpenCircuitDetection {
    #[default]
    Disabled = 0,
    /// Rs < 5 kΩ.
    LowResistance = 1,
    /// 40 kΩ > Rs > 5 kΩ, time constant < 2 ms.
    FastSettling = 2,
    /// 40 kΩ > Rs > 5 kΩ, time constant > 2 ms.
    SlowSettling = 3,
}

/// Chip settings the driver writes through its shadow registers.
///
/// The default is the chip's own power-on state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub thermocouple_type: ThermocoupleType,
    pub averaging: Averaging,
    pub noise_filter: NoiseFilter,
    pub conversion_mode: ConversionMode,
    pub open_circuit: OpenCircuitDetection,
    pub cold_junction_enabled: bool,
    /// A set bit keeps the matching fault off the FAULT pin. Readings still report faults.
    pub fault_mask: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thermocouple_type: ThermocoupleType::default(),
            averaging: Averaging::default(),
            noise_filter: NoiseFilter::default(),
            conversion_mode: ConversionMode::default(),
            open_circuit: OpenCircuitDetection::default(),
            cold_junction_enabled: true,
            fault_mask: DEFAULT_REGISTERS[MASK as usize],
        }
    }
}

impl Config {
    /// Continuous conversions with open-circuit detection, which is what a polling loop wants.
    pub fn continuous(thermocouple_type: ThermocoupleType) -> Self {
        Self {
            thermocouple_type,
            conversion_mode: ConversionMode::Continuous,
            open_circuit: OpenCircuitDetection::LowResistance,
            ..Self::default()
        }
    }

    pub fn cr0(&self) -> u8 {
        let mut cr0 = (self.open_circuit as u8) << CR0_OC_SHIFT;
        if self.conversion_mode == ConversionMode::Continuous {
            cr0 |= CR0_AUTOCONVERT;
        }
        if !self.cold_junction_enabled {
            cr0 |= CR0_CJ_DISABLED;
        }
        if self.noise_filter == NoiseFilter::Hz50 {
            cr0 |= CR0_FILTER_50HZ;
        }
        cr0
    }

    pub fn cr1(&self) -> u8 {
        ((self.averaging as u8) << CR1_AVG_SHIFT) | self.thermocouple_type as u8
    }
}
