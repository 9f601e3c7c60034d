use thiserror::Error;

use crate::decode::SampleFault;

/// An error emitted due to problems with the MAX31856.
///
/// `E` is the error type of the [`RegisterTransport`](crate::RegisterTransport) in use.
#[derive(Debug, Error)]
pub enum Max31856Error<E> {
    #[error("The SPI transfer to the MAX31856 failed: {0:?}")]
    Transport(E),
    #[error("No MAX31856 answered on the bus (all bits read high), or it lost power and its registers are being restored. Try again on the next poll.")]
    NoDevice,
    #[error("The MAX31856 detected an open circuit. Please check the thermocouple connection and try again.")]
    OpenCircuit,
    #[error("The MAX31856 detected an over- or under-voltage on its thermocouple inputs.")]
    OverUnderVoltage,
}

impl<E> Max31856Error<E> {
    /// True for `NoDevice`, which also covers the poll spent restoring a power-cycled chip.
    pub fn is_no_device(&self) -> bool {
        matches!(self, Max31856Error::NoDevice)
    }
}

impl<E> From<SampleFault> for Max31856Error<E> {
    fn from(fault: SampleFault) -> Self {
        match fault {
            SampleFault::OpenCircuit => Max31856Error::OpenCircuit,
            SampleFault::OverUnderVoltage => Max31856Error::OverUnderVoltage,
        }
    }
}

impl From<std::io::Error> for Max31856Error<std::io::Error> {
    fn from(source: std::io::Error) -> Self {
        Max31856Error::Transport(source)
    }
}
