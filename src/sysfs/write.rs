/// Write pin configuration and values back by updating the related file system entries
use log;
use std;
use std::io::Write;

use crate::errors::Result;

fn write_str(path: &std::path::Path, content: &str) -> Result<()> {
    log::debug!("Writing {:?} to {:?}", content, path);
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn write_value(path: &std::path::Path, value: bool) -> Result<()> {
    let content = match value {
        true => "1",
        false => "0",
    };
    write_str(path, content)
}

/// Hand a GPIO line over to sysfs; no-op when it is already exported
pub fn export(gpio_dir: &std::path::Path, gpio: u32) -> Result<()> {
    if gpio_dir.join(format!("gpio{}", gpio)).is_dir() {
        log::debug!("GPIO {} already exported", gpio);
        return Ok(());
    }
    write_str(&gpio_dir.join("export"), &gpio.to_string())
}

pub fn unexport(gpio_dir: &std::path::Path, gpio: u32) -> Result<()> {
    write_str(&gpio_dir.join("unexport"), &gpio.to_string())
}

pub fn set_output(pin_dir: &std::path::Path) -> Result<()> {
    write_str(&pin_dir.join("direction"), "out")
}
