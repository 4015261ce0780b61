use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use super::{
    ConfigContentProvider, ConfigError, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

/// Loads, validates and caches a configuration value. A missing backing
/// store yields `TConfig::default()`.
pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl AsRef<Path>) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path.as_ref()),
            YamlConfigSerializer::new(),
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer> ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(config_content_provider: TConfigContentProvider, config_serializer: TConfigSerializer) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            config_content_provider,
            config_serializer,
        }
    }

    pub fn get_config(&self) -> Result<TConfig, ConfigError> {
        let mut current = self.config.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(config_data) = self.config_content_provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.config_serializer.deserialize(&config_data)?;
        config.validate().map_err(ConfigError::Validation)?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::Validation)?;

        let serialized_config = self.config_serializer.serialize(config)?;
        self.config_content_provider.set_config_content(&serialized_config)?;

        let mut current = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::{BoundaryMode, SimulationConfig};

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_snake_sim_config_{}.yaml", random_number));
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = SimulationConfig::default();
        let serializer = YamlConfigSerializer::new();
        let serialized = serializer.serialize(&default_config).unwrap();
        let deserialized: SimulationConfig = serializer.deserialize(&serialized).unwrap();
        assert_eq!(default_config, deserialized);
    }

    #[test]
    fn test_config_can_be_saved_and_loaded_through_manager() {
        let config = SimulationConfig {
            player_count: 3,
            boundary_mode: BoundaryMode::Death,
            seed: Some(17),
            ..SimulationConfig::default()
        };
        let file_path = get_temp_file_path();
        let manager: ConfigManager<_, SimulationConfig, _> = ConfigManager::from_yaml_file(&file_path);

        manager.set_config(&config).unwrap();
        assert_eq!(manager.get_config().unwrap(), config);

        let fresh: ConfigManager<_, SimulationConfig, _> = ConfigManager::from_yaml_file(&file_path);
        assert_eq!(fresh.get_config().unwrap(), config);

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let manager: ConfigManager<_, SimulationConfig, _> =
            ConfigManager::from_yaml_file("this_file_does_not_exist.yaml");
        assert_eq!(manager.get_config().unwrap(), SimulationConfig::default());
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(&file_path);
        content_provider
            .set_config_content("grid_rows: 3\nplayer_count: 2\n")
            .unwrap();

        let manager: ConfigManager<_, SimulationConfig, _> =
            ConfigManager::new(content_provider, YamlConfigSerializer::new());
        assert!(matches!(manager.get_config(), Err(ConfigError::Validation(_))));

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_malformed_yaml_is_reported() {
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(&file_path);
        content_provider.set_config_content("player_count: [oops").unwrap();

        let manager: ConfigManager<_, SimulationConfig, _> =
            ConfigManager::new(content_provider, YamlConfigSerializer::new());
        assert!(matches!(manager.get_config(), Err(ConfigError::Deserialize(_))));

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_invalid_config_is_not_written() {
        let file_path = get_temp_file_path();
        let manager: ConfigManager<_, SimulationConfig, _> = ConfigManager::from_yaml_file(&file_path);
        let config = SimulationConfig {
            player_count: 9,
            ..SimulationConfig::default()
        };
        assert!(matches!(manager.set_config(&config), Err(ConfigError::Validation(_))));
        assert!(!Path::new(&file_path).exists());
    }
}
