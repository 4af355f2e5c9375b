use log;
use regex;
use std;
use std::io::{Read, Seek};

use crate::errors::{MausError, Result};

const THERMAL_ZONE_PATTERN: &str = r"^thermal_zone(?P<zone>\d+)$";

/// Read the first character of a GPIO value file and parse it to bool
pub fn read_value(path: &std::path::Path) -> Result<bool> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let mut first_char = [0; 1];

    reader.seek(std::io::SeekFrom::Start(0))?;
    reader.read_exact(&mut first_char)?;

    match first_char[0] as char {
        '0' => Ok(false),
        '1' => Ok(true),
        other => Err(MausError::Parse(format!(
            "pin value {:?} in {:?}",
            other, path
        ))),
    }
}

/// Read a thermal zone temperature file; the kernel reports millidegrees Celsius
pub fn read_temperature(path: &std::path::Path) -> Result<f64> {
    let contents = std::fs::read_to_string(path)?;
    let millidegrees = contents
        .trim()
        .parse::<i64>()
        .map_err(|_| MausError::Parse(format!("temperature {:?} in {:?}", contents.trim(), path)))?;
    Ok(millidegrees as f64 / 1000.0)
}

/// Find the temperature file of the lowest numbered thermal zone
///
/// The entries of /sys/class/thermal are symlinks, so only the top level is scanned.
pub fn find_thermal_zone(dir: &std::path::Path) -> Result<std::path::PathBuf> {
    let re = regex::Regex::new(THERMAL_ZONE_PATTERN).unwrap();
    let mut found: Option<(u32, std::path::PathBuf)> = None;

    log::debug!("Checking dir {:?} for thermal zones", dir);
    for entry in std::fs::read_dir(dir)? {
        let entry: std::fs::DirEntry = entry?;
        let file_name = entry.file_name();
        let zone = match file_name
            .to_str()
            .and_then(|name| re.captures(name))
            .and_then(|captures| captures.name("zone"))
            .and_then(|zone| zone.as_str().parse::<u32>().ok())
        {
            Some(zone) => zone,
            None => continue,
        };

        let path = entry.path().join("temp");
        if !path.exists() {
            continue;
        }
        log::debug!("Found thermal zone {} at {:?}", zone, path);
        if found.as_ref().map_or(true, |(lowest, _)| zone < *lowest) {
            found = Some((zone, path));
        }
    }

    found.map(|(_, path)| path).ok_or_else(|| {
        MausError::UnsupportedBoard(format!("no thermal zone found in {:?}", dir))
    })
}
