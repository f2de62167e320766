//! Server configuration from the environment
//!
//! | Variable | Default |
//! |---|---|
//! | `PEPTIQ_ADDR` | `0.0.0.0:8787` |
//! | `PEPTIQ_SCORING_CONFIG_DIR` | unset (built-in versions only) |
//! | `PEPTIQ_DEFAULT_SCORING_VERSION` | unset (`v1.0`) |
//! | `PEPTIQ_CORS_ORIGINS` | `http://localhost:3000,http://localhost:3001` |

use anyhow::Context;
use peptiq_registry::{ConfigRegistry, ConfigRegistryBuilder};
use std::path::{Path, PathBuf};

const DEFAULT_ADDR: &str = "0.0.0.0:8787";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Listen address
    pub addr: String,
    /// Directory of extra scoring config YAML files
    pub scoring_config_dir: Option<PathBuf>,
    /// Default scoring version override
    pub default_scoring_version: Option<String>,
    /// Browser origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            addr: get("PEPTIQ_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            scoring_config_dir: get("PEPTIQ_SCORING_CONFIG_DIR").map(PathBuf::from),
            default_scoring_version: get("PEPTIQ_DEFAULT_SCORING_VERSION"),
            cors_origins: get("PEPTIQ_CORS_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// Build the scoring registry: built-in versions plus any YAML files
    pub fn build_registry(&self) -> anyhow::Result<ConfigRegistry> {
        let mut builder = ConfigRegistryBuilder::standard();

        if let Some(dir) = &self.scoring_config_dir {
            for path in yaml_files(dir)? {
                let yaml = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading scoring config {}", path.display()))?;
                builder = builder
                    .register_yaml(&yaml)
                    .with_context(|| format!("registering scoring config {}", path.display()))?;
            }
        }

        if let Some(version) = &self.default_scoring_version {
            builder = builder.default_version(version.clone());
        }

        let registry = builder.build()?;
        tracing::info!(
            versions = ?registry.list_versions(),
            default = registry.default_version(),
            "scoring registry loaded"
        );
        Ok(registry)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// `*.yaml` / `*.yml` files in a directory, sorted by file name
fn yaml_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading scoring config dir {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("yaml") | Some("yml")
                )
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const V2_YAML: &str = r#"
version: "v2.0"
purity_weight: 0.7
endotoxin_threshold: 4.0
endotoxin_max_penalty: 15
heavy_metal_threshold: 10
heavy_metal_max_penalty: 10
variance_max_penalty: 5
time_decay_days: 120
time_decay_max_penalty: 10
min_sample_size_for_full_confidence: 3
"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("peptiq-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.addr, "0.0.0.0:8787");
        assert!(config.scoring_config_dir.is_none());
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("PEPTIQ_ADDR", "127.0.0.1:9000"),
            ("PEPTIQ_DEFAULT_SCORING_VERSION", "v1.0"),
            ("PEPTIQ_CORS_ORIGINS", "https://app.example, "),
            ("PEPTIQ_SCORING_CONFIG_DIR", "  "),
        ]
        .into_iter()
        .collect();

        let config = ApiConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.default_scoring_version.as_deref(), Some("v1.0"));
        assert_eq!(config.cors_origins, vec!["https://app.example"]);
        assert!(config.scoring_config_dir.is_none());
    }

    #[test]
    fn test_build_registry_from_dir() {
        let dir = scratch_dir("registry");
        std::fs::write(dir.join("v2.yaml"), V2_YAML).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let config = ApiConfig {
            scoring_config_dir: Some(dir.clone()),
            default_scoring_version: Some("v2.0".to_string()),
            ..ApiConfig::default()
        };
        let registry = config.build_registry().unwrap();

        assert_eq!(registry.list_versions(), vec!["v1.0", "v2.0"]);
        assert_eq!(registry.resolve(None).unwrap().time_decay_days, 120.0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_build_registry_rejects_duplicate() {
        let dir = scratch_dir("duplicate");
        std::fs::write(dir.join("a.yaml"), V2_YAML).unwrap();
        std::fs::write(dir.join("b.yml"), V2_YAML).unwrap();

        let config = ApiConfig {
            scoring_config_dir: Some(dir.clone()),
            ..ApiConfig::default()
        };
        let err = config.build_registry().unwrap_err();
        assert!(format!("{:#}", err).contains("already published"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
