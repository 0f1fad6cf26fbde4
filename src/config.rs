use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use recommender_catalog::QualityFilter;
use recommender_clustering::TrainingOptions;
use recommender_saved::CacheConfig;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub saved: SavedConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// JSON array of recipe records
    pub catalog_path: String,
    /// Trained cluster model written by `train`
    pub artifact_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrainingConfig {
    #[serde(default = "default_clusters")]
    pub clusters: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Drop low-quality recipes before training
    #[serde(default)]
    pub quality_filter: bool,
    #[serde(default = "default_max_complexity")]
    pub max_complexity: u64,
    #[serde(default = "default_min_avg_rating")]
    pub min_avg_rating: f64,
    #[serde(default = "default_min_interactions")]
    pub min_interactions: u32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            clusters: default_clusters(),
            max_iterations: default_max_iterations(),
            seed: default_seed(),
            quality_filter: false,
            max_complexity: default_max_complexity(),
            min_avg_rating: default_min_avg_rating(),
            min_interactions: default_min_interactions(),
        }
    }
}

impl TrainingConfig {
    pub fn options(&self) -> TrainingOptions {
        TrainingOptions {
            clusters: self.clusters,
            max_iterations: self.max_iterations,
            seed: self.seed,
        }
    }

    /// Quality filter to apply before training, if enabled
    pub fn filter(&self) -> Option<QualityFilter> {
        self.quality_filter.then_some(QualityFilter {
            max_complexity: self.max_complexity,
            min_avg_rating: self.min_avg_rating,
            min_interactions: self.min_interactions,
        })
    }
}

fn default_clusters() -> usize {
    TrainingOptions::default().clusters
}

fn default_max_iterations() -> usize {
    TrainingOptions::default().max_iterations
}

fn default_seed() -> u64 {
    TrainingOptions::default().seed
}

fn default_max_complexity() -> u64 {
    QualityFilter::default().max_complexity
}

fn default_min_avg_rating() -> f64 {
    QualityFilter::default().min_avg_rating
}

fn default_min_interactions() -> u32 {
    QualityFilter::default().min_interactions
}

#[derive(Debug, Deserialize, Clone)]
pub struct SavedConfig {
    #[serde(default = "default_saved_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SavedConfig {
    fn default() -> Self {
        Self {
            base_url: default_saved_base_url(),
            token: None,
            ttl_secs: default_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SavedConfig {
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.ttl_secs),
            fetch_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn default_saved_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_ttl_secs() -> u64 {
    5 * 60
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (RECOMMENDER__SERVER__PORT, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("model.catalog_path", "data/recipes.json")?
            .set_default("model.artifact_path", "models/clusters.json")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored if not found
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("RECOMMENDER")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(token) = env::var("SAVED_RECIPES_TOKEN") {
            builder = builder.set_override("saved.token", token)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.model.catalog_path.trim().is_empty() {
            return Err("Model catalog_path must not be empty".to_string());
        }
        if self.model.artifact_path.trim().is_empty() {
            return Err("Model artifact_path must not be empty".to_string());
        }
        if self.training.clusters == 0 {
            return Err("Training clusters must be at least 1".to_string());
        }
        if self.training.max_iterations == 0 {
            return Err("Training max_iterations must be at least 1".to_string());
        }
        if self.saved.ttl_secs == 0 {
            return Err("Saved ttl_secs must be greater than 0".to_string());
        }
        if self.saved.timeout_secs == 0 {
            return Err("Saved timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            model: ModelConfig {
                catalog_path: "data/recipes.json".to_string(),
                artifact_path: "models/clusters.json".to_string(),
            },
            training: TrainingConfig::default(),
            saved: SavedConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_clusters() {
        let mut config = valid_config();
        config.training.clusters = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_paths() {
        let mut config = valid_config();
        config.model.artifact_path = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_saved_durations() {
        let mut config = valid_config();
        config.saved.ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.saved.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_training_defaults() {
        let training = TrainingConfig::default();
        assert_eq!(training.options(), TrainingOptions::default());
        assert!(training.filter().is_none());

        let enabled = TrainingConfig {
            quality_filter: true,
            ..TrainingConfig::default()
        };
        assert_eq!(enabled.filter(), Some(QualityFilter::default()));
    }

    #[test]
    fn test_saved_cache_config() {
        let cache = SavedConfig::default().cache_config();
        assert_eq!(cache, CacheConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("recommender.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[model]
catalog_path = "fixtures/catalog.json"

[training]
clusters = 4
quality_filter = true
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_string_lossy().to_string())).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.model.catalog_path, "fixtures/catalog.json");
        assert_eq!(config.model.artifact_path, "models/clusters.json");
        assert_eq!(config.training.clusters, 4);
        assert!(config.training.filter().is_some());
        assert_eq!(config.saved.ttl_secs, 300);
        assert!(config.validate().is_ok());
    }
}
