/// dummy is an in-memory board: the pin is a bool and temperatures come from a script.
use crate::board::Board;
use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct DummyBoard {
    pin: bool,
    temperature: f64,
    // Upcoming readings; the last one sticks once the script runs out
    script: std::collections::VecDeque<f64>,
    released: bool,
}

impl DummyBoard {
    pub fn new(temperature: f64) -> Self {
        Self {
            pin: false,
            temperature,
            script: std::collections::VecDeque::new(),
            released: false,
        }
    }

    /// Queue readings returned by subsequent `cpu_temperature` calls
    pub fn push_temperatures(&mut self, temperatures: &[f64]) {
        self.script.extend(temperatures.iter().copied());
    }

    /// Change the pin behind the agent's back, like an external driver would
    pub fn force_pin(&mut self, value: bool) {
        self.pin = value;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Board for DummyBoard {
    fn name(&self) -> String {
        "dummy".to_string()
    }

    fn configure_output(&mut self) -> Result<()> {
        self.pin = false;
        Ok(())
    }

    fn cpu_temperature(&mut self) -> Result<f64> {
        if let Some(next) = self.script.pop_front() {
            self.temperature = next;
        }
        Ok(self.temperature)
    }

    fn pin(&mut self) -> Result<bool> {
        Ok(self.pin)
    }

    fn set_pin(&mut self, value: bool) -> Result<()> {
        log::debug!("Dummy pin set to {}", value);
        self.pin = value;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.released = true;
        Ok(())
    }
}
