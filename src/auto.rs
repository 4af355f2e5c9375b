/// auto contains the automation rules: when to report a change and when to raise the alert
pub const TEMPERATURE_THRESHOLD_HIGH: f64 = 58.0;
pub const TEMPERATURE_THRESHOLD_LOW: f64 = 56.0;
/// Minimal temperature change worth a new status report
pub const TEMPERATURE_DELTA: f64 = 2.0;

/// Whether a new temperature reading differs enough from the last reported one
pub fn temperature_changed(last_published: f64, current: f64) -> bool {
    (current - last_published).abs() > TEMPERATURE_DELTA
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AlertChange {
    On,
    Off,
}

impl AlertChange {
    pub fn payload(&self) -> &'static str {
        match self {
            AlertChange::On => "on",
            AlertChange::Off => "off",
        }
    }
}

/// High temperature alert with hysteresis between the low and high threshold
#[derive(Debug, Copy, Clone)]
pub struct Alert {
    high: f64,
    low: f64,
    active: bool,
}

impl Default for Alert {
    fn default() -> Self {
        Self::new(TEMPERATURE_THRESHOLD_HIGH, TEMPERATURE_THRESHOLD_LOW)
    }
}

impl Alert {
    pub fn new(high: f64, low: f64) -> Self {
        Self {
            high,
            low,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed a reading; returns the transition, if any
    pub fn update(&mut self, temperature: f64) -> Option<AlertChange> {
        if temperature > self.high && !self.active {
            self.active = true;
            Some(AlertChange::On)
        } else if temperature < self.low && self.active {
            self.active = false;
            Some(AlertChange::Off)
        } else {
            None
        }
    }
}
