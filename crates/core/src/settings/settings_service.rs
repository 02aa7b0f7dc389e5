use std::sync::Arc;

use log::{debug, error};

use super::settings_model::AnalysisSettings;
use super::settings_traits::SettingsRepositoryTrait;
use crate::errors::Result;

pub trait SettingsServiceTrait: Send + Sync {
    /// Loads and validates the analysis settings.
    fn get_analysis_settings(&self) -> Result<AnalysisSettings>;

    fn get_setting_value(&self, key: &str) -> Result<Option<String>>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }
}

impl SettingsServiceTrait for SettingsService {
    fn get_analysis_settings(&self) -> Result<AnalysisSettings> {
        let values = self.settings_repository.get_settings_map()?;
        debug!("Loading analysis settings from {} stored keys", values.len());

        let settings = AnalysisSettings::from_key_values(&values)?;
        if let Err(e) = settings.validate() {
            error!("Stored analysis settings are invalid: {}", e);
            return Err(e);
        }
        Ok(settings)
    }

    fn get_setting_value(&self, key: &str) -> Result<Option<String>> {
        self.settings_repository.get_setting(key)
    }
}
