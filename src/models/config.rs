use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

const MIB: u64 = 1024 * 1024;

/// Server configuration loaded from an optional YAML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address; `BIND_ADDR` overrides it.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Input ceilings enforced by the HTTP handlers
    #[serde(default)]
    pub limits: Limits,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

/// Request and image ceilings.
///
/// Every field may be omitted from the YAML; missing ones keep their default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Limits {
    /// Body size ceiling for `/resize` and `/jpeg`, in MiB
    pub max_request_mb: u64,

    /// `/compose` accepts `max_request_mb * compose_request_multiplier` MiB
    pub compose_request_multiplier: u64,

    /// Longest accepted side for decoded images and resize targets
    pub max_image_size: u32,

    /// Ceiling on `sqrt(base_w * base_h) / block_size`
    pub max_base_to_block_ratio: f64,

    /// Ceiling on the number of tile images per `/compose` request
    pub max_tile_count: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_request_mb: 8,
            compose_request_multiplier: 8,
            max_image_size: 10_000,
            max_base_to_block_ratio: 100.0,
            max_tile_count: 250,
        }
    }
}

impl Limits {
    /// Body ceiling in bytes for single-image endpoints.
    pub fn request_bytes(&self) -> usize {
        self.max_request_mb.saturating_mul(MIB) as usize
    }

    /// Body ceiling in bytes for `/compose`.
    pub fn compose_request_bytes(&self) -> usize {
        self.max_request_mb
            .saturating_mul(self.compose_request_multiplier)
            .saturating_mul(MIB) as usize
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            limits: Limits::default(),
        }
    }
}

impl ServerConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file is absent, unreadable or invalid.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        max_request_mb = config.limits.max_request_mb,
                        max_image_size = config.limits.max_image_size,
                        max_tile_count = config.limits.max_tile_count,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from `CONFIG_FILE` and apply the `BIND_ADDR` override.
    pub fn from_env() -> Self {
        let config_file = std::env::var("CONFIG_FILE").ok();
        let mut config = Self::load(config_file.as_deref().map(Path::new));
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.limits.max_request_mb, 8);
        assert_eq!(config.limits.compose_request_multiplier, 8);
        assert_eq!(config.limits.max_image_size, 10_000);
        assert_eq!(config.limits.max_base_to_block_ratio, 100.0);
        assert_eq!(config.limits.max_tile_count, 250);
    }

    #[test]
    fn test_request_byte_limits() {
        let limits = Limits::default();
        assert_eq!(limits.request_bytes(), 8 * 1024 * 1024);
        assert_eq!(limits.compose_request_bytes(), 64 * 1024 * 1024);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
limits:
  max_tile_count: 10
  max_image_size: 2048
"#;
        let config = ServerConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.limits.max_tile_count, 10);
        assert_eq!(config.limits.max_image_size, 2048);
        assert_eq!(config.limits.max_request_mb, 8);
    }

    #[test]
    fn test_empty_mapping_is_default() {
        let config = ServerConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = ServerConfig::load(Some(Path::new("/nonexistent/photomosaic.yaml")));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_load_invalid_yaml_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limits: [this is not a mapping").unwrap();

        let config = ServerConfig::load(Some(file.path()));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr: 127.0.0.1:8080").unwrap();
        writeln!(file, "limits:").unwrap();
        writeln!(file, "  max_request_mb: 2").unwrap();

        let config = ServerConfig::load(Some(file.path()));
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.limits.max_request_mb, 2);
        assert_eq!(config.limits.request_bytes(), 2 * 1024 * 1024);
    }
}
