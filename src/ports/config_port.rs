//! Configuration access port trait.

use crate::domain::error::TraderError;

/// Missing keys yield the default; a present key that does not parse is a
/// `ConfigInvalid` naming the section and key.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, TraderError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, TraderError>;
}
