//! INI file configuration adapter.

use crate::domain::error::TraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, TraderError> {
        match self.config.getint(section, key) {
            Ok(value) => Ok(value.unwrap_or(default)),
            Err(e) => Err(TraderError::invalid(section, key, e)),
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, TraderError> {
        match self.config.getfloat(section, key) {
            Ok(value) => Ok(value.unwrap_or(default)),
            Err(e) => Err(TraderError::invalid(section, key, e)),
        }
    }
}
