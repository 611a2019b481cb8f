use serde::Deserialize;

use crate::error::ConfigError;
use crate::storage::file_stem;

/// Tunables for a session. Every field has a default, so an empty document is
/// a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Storage key holding the user-added sites.
    pub sites_key: String,
    /// Storage key holding the favorite ids.
    pub favorites_key: String,
    /// Storage key holding the access-gate state.
    pub auth_key: String,
    /// Prefix of generated site ids. Built-in ids must not start with it.
    pub id_prefix: String,
    /// Category assigned to every site created by a bulk add.
    pub bulk_category_id: String,
    pub bulk_category_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sites_key: "customSites".to_string(),
            favorites_key: "favorites".to_string(),
            auth_key: "auth".to_string(),
            id_prefix: "custom".to_string(),
            bulk_category_id: "9d530a41-510a-4f03-9f63-140f5c377761".to_string(),
            bulk_category_name: "Outros".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects layouts where one store would overwrite another's record, or
    /// where generated entries could never be valid. Storage keys must also
    /// stay distinct once mapped to file names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let keys = [
            ("sites_key", &self.sites_key),
            ("favorites_key", &self.favorites_key),
            ("auth_key", &self.auth_key),
        ];
        for (i, (name, key)) in keys.iter().enumerate() {
            if key.is_empty() {
                return Err(ConfigError::Invalid(format!("`{name}` is empty")));
            }
            for (other_name, other) in &keys[..i] {
                if file_stem(key) == file_stem(other) {
                    return Err(ConfigError::Invalid(format!(
                        "`{other_name}` and `{name}` name the same record"
                    )));
                }
            }
        }
        if self.id_prefix.is_empty() {
            return Err(ConfigError::Invalid("`id_prefix` is empty".to_string()));
        }
        if self.bulk_category_id.is_empty() {
            return Err(ConfigError::Invalid("`bulk_category_id` is empty".to_string()));
        }
        Ok(())
    }
}
