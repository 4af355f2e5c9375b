/// board is the capability interface to the hardware: one output pin and the CPU temperature
use crate::errors::Result;

/// Which board implementation to construct
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum BoardKind {
    /// Linux single board computer, GPIO and thermal zones through sysfs
    Sysfs,
    /// In-memory board, for machines without GPIO
    Dummy,
}

pub trait Board {
    /// Human readable name, for logging
    fn name(&self) -> String;

    /// Set the pin up as output, driven low
    fn configure_output(&mut self) -> Result<()>;

    /// Current CPU temperature in degrees Celsius
    fn cpu_temperature(&mut self) -> Result<f64>;

    fn pin(&mut self) -> Result<bool>;

    fn set_pin(&mut self, value: bool) -> Result<()>;

    /// Give back any platform resources held for the pin
    fn release(&mut self) -> Result<()>;
}
