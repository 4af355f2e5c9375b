pub mod auto;
pub mod board;
pub mod config;
pub mod device;
pub mod dummy;
pub mod errors;
pub mod maus;
pub mod mqtt;
pub mod sysfs;
