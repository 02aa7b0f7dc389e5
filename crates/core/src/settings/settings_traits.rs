//! Repository traits for analysis settings.

use std::collections::HashMap;

use crate::errors::Result;

/// Read access to the string key/value settings store.
pub trait SettingsRepositoryTrait: Send + Sync {
    /// All stored settings as raw strings.
    fn get_settings_map(&self) -> Result<HashMap<String, String>>;

    /// A single raw setting value. Returns None if not found.
    fn get_setting(&self, setting_key: &str) -> Result<Option<String>>;
}
