use std::path::PathBuf;

/// Errors for device information configuration
///
/// Snapshot operations never fail; missing facts fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum DeviceInfoError {
    #[error("config file does not exist: {}", .0.display())]
    ConfigFileMissing(PathBuf),

    #[error("invalid device information config: {0}")]
    InvalidConfig(#[source] Box<figment::Error>),
}

impl From<figment::Error> for DeviceInfoError {
    fn from(e: figment::Error) -> Self {
        Self::InvalidConfig(Box::new(e))
    }
}
