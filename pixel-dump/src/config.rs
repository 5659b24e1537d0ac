use derivative::Derivative;
use log::error;
use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path};
use thiserror::Error;

pub const DEFAULT_THRESHOLD: u8 = 50;
pub const DEFAULT_OUTPUT_NAME: &str = "Output.txt";
pub const MAX_CHANNEL: u8 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Channel {0} is out of range, pixels are read as RGBA (0-3)")]
    InvalidChannel(u8),
}

/// Order in which the pixel coordinates of an image are visited
#[derive(Debug, Clone, Copy, Derivative, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScanOrder {
    /// Outer loop over x, inner loop over y
    #[derivative(Default)]
    ColumnMajor,
    /// Outer loop over y, inner loop over x
    RowMajor,
}

impl core::fmt::Display for ScanOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Self::ColumnMajor => write!(f, "column-major"),
            Self::RowMajor => write!(f, "row-major"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Values strictly below this are written as 0
    pub threshold: u8,
    /// Index into the RGBA representation of each pixel
    pub channel: u8,
    pub order: ScanOrder,
    /// Name of the output file, created inside the scanned directory
    pub output_name: String,
    /// Log and skip entries that can't be decoded instead of aborting
    pub skip_invalid: bool,
    /// Visit entries in file-name order instead of directory order
    pub sort_entries: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            channel: 0,
            order: ScanOrder::default(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            skip_invalid: false,
            sort_entries: false,
        }
    }
}

impl DumpConfig {
    pub fn new_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_file = match read_to_string(path) {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to read config file: {}", e);
                return Err(e.into());
            }
        };

        let config: Self = match toml::from_str(&config_file) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to parse config file: {}", e);
                return Err(e.into());
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel > MAX_CHANNEL {
            return Err(ConfigError::InvalidChannel(self.channel));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;
    use std::io::Write;

    #[test]
    fn test_ser_config() {
        let config: DumpConfig = Default::default();
        let serialized = toml::to_string(&config).unwrap();
        let deser = toml::from_str(&serialized);
        assert_eq!(deser, Ok(config));
    }

    #[test]
    fn test_defaults() {
        let config = DumpConfig::default();
        assert_eq!(config.threshold, 50);
        assert_eq!(config.channel, 0);
        assert_eq!(config.order, ScanOrder::ColumnMajor);
        assert_eq!(config.output_name, "Output.txt");
        assert!(!config.skip_invalid);
        assert!(!config.sort_entries);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: DumpConfig = toml::from_str(indoc!(
            r#"threshold = 80
               order = "row-major""#
        ))
        .unwrap();
        assert_eq!(config.threshold, 80);
        assert_eq!(config.order, ScanOrder::RowMajor);
        assert_eq!(config.output_name, DEFAULT_OUTPUT_NAME);
    }

    #[test]
    fn test_new_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            "{}",
            indoc!(
                r#"channel = 2
                   output_name = "dump.txt"
                   skip_invalid = true"#
            )
        )?;
        let config = DumpConfig::new_from_file(file.path())?;
        assert_eq!(config.channel, 2);
        assert_eq!(config.output_name, "dump.txt");
        assert!(config.skip_invalid);
        Ok(())
    }

    #[test]
    fn test_invalid_channel() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "channel = 4")?;
        let res = DumpConfig::new_from_file(file.path());
        assert!(matches!(res, Err(ConfigError::InvalidChannel(4))));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let res = DumpConfig::new_from_file("/this/path/does/not/exist.toml");
        assert!(matches!(res, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_bad_toml() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "threshold = \"high\"")?;
        let res = DumpConfig::new_from_file(file.path());
        assert!(matches!(res, Err(ConfigError::Parse(_))));
        Ok(())
    }
}
