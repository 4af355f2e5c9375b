/// sysfs contains the interface the file system based view on IO
pub mod read;
pub mod write;

use crate::board::Board;
use crate::errors::{MausError, Result};

pub const PATH: &str = "/sys/class";

/// Board backed by the Linux sysfs GPIO and thermal interfaces, e.g. a Raspberry Pi
#[derive(Debug)]
pub struct SysfsBoard {
    gpio: u32,
    gpio_dir: std::path::PathBuf,
    pin_dir: std::path::PathBuf,
    temperature_path: std::path::PathBuf,
}

impl SysfsBoard {
    /// Look up the GPIO and thermal trees below `sysfs_path`
    ///
    /// Fails with `MausError::UnsupportedBoard` when either is missing.
    pub fn new(sysfs_path: &std::path::Path, gpio: u32) -> Result<Self> {
        let gpio_dir = sysfs_path.join("gpio");
        if !gpio_dir.is_dir() {
            return Err(MausError::UnsupportedBoard(format!(
                "no GPIO interface at {:?}",
                gpio_dir
            )));
        }
        let temperature_path = read::find_thermal_zone(&sysfs_path.join("thermal"))?;
        log::info!("Using temperature sensor {:?}", temperature_path);

        Ok(Self {
            gpio,
            pin_dir: gpio_dir.join(format!("gpio{}", gpio)),
            gpio_dir,
            temperature_path,
        })
    }

    fn value_path(&self) -> std::path::PathBuf {
        self.pin_dir.join("value")
    }
}

impl Board for SysfsBoard {
    fn name(&self) -> String {
        format!("sysfs GPIO {}", self.gpio)
    }

    fn configure_output(&mut self) -> Result<()> {
        write::export(&self.gpio_dir, self.gpio)?;
        write::set_output(&self.pin_dir)?;
        write::write_value(&self.value_path(), false)
    }

    fn cpu_temperature(&mut self) -> Result<f64> {
        read::read_temperature(&self.temperature_path)
    }

    fn pin(&mut self) -> Result<bool> {
        read::read_value(&self.value_path())
    }

    fn set_pin(&mut self, value: bool) -> Result<()> {
        write::write_value(&self.value_path(), value)
    }

    fn release(&mut self) -> Result<()> {
        write::unexport(&self.gpio_dir, self.gpio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir;

    /// Lay out a minimal sysfs tree with an already exported pin
    fn fake_sysfs() -> tempdir::TempDir {
        let tmp_dir = tempdir::TempDir::new("sysfs").expect("Could not create a temporary folder");
        let root = tmp_dir.path();
        std::fs::create_dir_all(root.join("gpio/gpio5")).unwrap();
        std::fs::write(root.join("gpio/export"), "").unwrap();
        std::fs::write(root.join("gpio/unexport"), "").unwrap();
        std::fs::write(root.join("gpio/gpio5/direction"), "in").unwrap();
        std::fs::write(root.join("gpio/gpio5/value"), "1").unwrap();
        std::fs::create_dir_all(root.join("thermal/thermal_zone0")).unwrap();
        std::fs::write(root.join("thermal/thermal_zone0/temp"), "50000\n").unwrap();
        tmp_dir
    }

    #[test]
    fn test_missing_gpio_is_unsupported() {
        let tmp_dir = tempdir::TempDir::new("sysfs").expect("Could not create a temporary folder");
        assert!(matches!(
            SysfsBoard::new(tmp_dir.path(), 5),
            Err(MausError::UnsupportedBoard(_))
        ));
    }

    #[test]
    fn test_configure_output_drives_low() {
        let tmp_dir = fake_sysfs();
        let root = tmp_dir.path();
        let mut board = SysfsBoard::new(root, 5).expect("Could not create board");

        board.configure_output().unwrap();

        assert_eq!(
            std::fs::read_to_string(root.join("gpio/gpio5/direction")).unwrap(),
            "out"
        );
        assert!(!board.pin().unwrap());
    }

    #[test]
    fn test_pin_and_temperature() {
        let tmp_dir = fake_sysfs();
        let mut board = SysfsBoard::new(tmp_dir.path(), 5).expect("Could not create board");

        board.set_pin(true).unwrap();
        assert!(board.pin().unwrap());
        assert!((board.cpu_temperature().unwrap() - 50.0).abs() < 1e-9);

        board.release().unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp_dir.path().join("gpio/unexport")).unwrap(),
            "5"
        );
    }
}
