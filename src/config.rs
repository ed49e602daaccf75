use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Where and under which keys recipes are persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Field bounds enforced by the recipe factory
    #[serde(default)]
    pub validation: ValidationRules,
}

/// Configuration for the persistent key-value medium
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding one file per key (file medium only)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Key under which the recipe collection is stored
    #[serde(default = "default_recipes_key")]
    pub recipes_key: String,
    /// Key under which the in-progress form draft is stored
    #[serde(default = "default_draft_key")]
    pub draft_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            recipes_key: default_recipes_key(),
            draft_key: default_draft_key(),
        }
    }
}

/// Bounds checked when a recipe is built from raw fields.
///
/// Lengths are counted in characters after trimming; times are minutes.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    #[serde(default = "default_title_min")]
    pub title_min_length: usize,
    #[serde(default = "default_title_max")]
    pub title_max_length: usize,
    #[serde(default = "default_description_min")]
    pub description_min_length: usize,
    #[serde(default = "default_description_max")]
    pub description_max_length: usize,
    #[serde(default = "default_list_min")]
    pub ingredients_min: usize,
    #[serde(default = "default_list_max")]
    pub ingredients_max: usize,
    #[serde(default = "default_list_min")]
    pub steps_min: usize,
    #[serde(default = "default_list_max")]
    pub steps_max: usize,
    #[serde(default)]
    pub prep_time_min: u32,
    #[serde(default = "default_time_max")]
    pub prep_time_max: u32,
    #[serde(default)]
    pub cook_time_min: u32,
    #[serde(default = "default_time_max")]
    pub cook_time_max: u32,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            title_min_length: default_title_min(),
            title_max_length: default_title_max(),
            description_min_length: default_description_min(),
            description_max_length: default_description_max(),
            ingredients_min: default_list_min(),
            ingredients_max: default_list_max(),
            steps_min: default_list_min(),
            steps_max: default_list_max(),
            prep_time_min: 0,
            prep_time_max: default_time_max(),
            cook_time_min: 0,
            cook_time_max: default_time_max(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    PathBuf::from(".recipe-box")
}

fn default_recipes_key() -> String {
    "recipes".to_string()
}

fn default_draft_key() -> String {
    "recipe_form_draft".to_string()
}

fn default_title_min() -> usize {
    1
}

fn default_title_max() -> usize {
    100
}

fn default_description_min() -> usize {
    1
}

fn default_description_max() -> usize {
    500
}

fn default_list_min() -> usize {
    1
}

fn default_list_max() -> usize {
    50
}

fn default_time_max() -> u32 {
    1440
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BOX__ prefix
    /// 2. recipe-box.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BOX__STORAGE__DATA_DIR
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-box").required(false))
        // Use double underscore for nested: RECIPE_BOX__VALIDATION__TITLE_MAX_LENGTH
        .add_source(
            Environment::with_prefix("RECIPE_BOX")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
