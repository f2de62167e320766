//! Config Registry
//!
//! Resolves a version string to its published parameter set. The registry is
//! built once at start-up and is immutable afterwards; callers pass it by
//! reference to whatever needs to score.

use crate::scoring_config::ScoringConfig;
use crate::DEFAULT_SCORING_VERSION;
use peptiq_core::PeptiqError;
use std::collections::HashMap;

/// Immutable lookup table of published scoring configs
#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    /// Configs in publication order
    configs: Vec<ScoringConfig>,
    index: HashMap<String, usize>,
    default_version: String,
}

impl ConfigRegistry {
    /// Start building a registry
    pub fn builder() -> ConfigRegistryBuilder {
        ConfigRegistryBuilder::new()
    }

    /// Registry holding only the built-in parameter sets
    pub fn standard() -> Self {
        let v1 = ScoringConfig::v1_0();
        let mut index = HashMap::new();
        index.insert(v1.version.clone(), 0);
        Self {
            default_version: v1.version.clone(),
            configs: vec![v1],
            index,
        }
    }

    /// Resolve a version, or the default version when `version` is `None`
    ///
    /// An unknown version is always an error; it is never replaced by the
    /// default.
    pub fn resolve(&self, version: Option<&str>) -> Result<&ScoringConfig, PeptiqError> {
        let requested = version.unwrap_or(&self.default_version);
        match self.index.get(requested) {
            Some(&i) => Ok(&self.configs[i]),
            None => Err(PeptiqError::ConfigNotFound {
                requested: requested.to_string(),
                available: self.list_versions(),
            }),
        }
    }

    /// Registered versions in publication order
    pub fn list_versions(&self) -> Vec<String> {
        self.configs.iter().map(|c| c.version.clone()).collect()
    }

    /// Version resolved when none is requested
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Check whether a version is published
    pub fn contains(&self, version: &str) -> bool {
        self.index.contains_key(version)
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Append-only builder for [`ConfigRegistry`]
#[derive(Debug, Default)]
pub struct ConfigRegistryBuilder {
    configs: Vec<ScoringConfig>,
    default_version: Option<String>,
}

impl ConfigRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-loaded with the built-in parameter sets
    pub fn standard() -> Self {
        Self {
            configs: vec![ScoringConfig::v1_0()],
            default_version: None,
        }
    }

    /// Publish a config; a version can only be published once
    pub fn register(mut self, config: ScoringConfig) -> Result<Self, PeptiqError> {
        config.validate()?;
        if self.configs.iter().any(|c| c.version == config.version) {
            return Err(PeptiqError::DuplicateVersion(config.version));
        }
        tracing::debug!(version = %config.version, "registered scoring config");
        self.configs.push(config);
        Ok(self)
    }

    /// Publish a config from a YAML document
    pub fn register_yaml(self, yaml: &str) -> Result<Self, PeptiqError> {
        let config = ScoringConfig::from_yaml(yaml)?;
        self.register(config)
    }

    /// Designate the default version
    pub fn default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = Some(version.into());
        self
    }

    /// Freeze the registry
    ///
    /// Without an explicit default, [`DEFAULT_SCORING_VERSION`] is used when
    /// registered, otherwise the first published version.
    pub fn build(self) -> Result<ConfigRegistry, PeptiqError> {
        let default_version = match self.default_version {
            Some(v) => v,
            None if self.configs.iter().any(|c| c.version == DEFAULT_SCORING_VERSION) => {
                DEFAULT_SCORING_VERSION.to_string()
            }
            None => match self.configs.first() {
                Some(first) => first.version.clone(),
                None => return Err(PeptiqError::NoDefaultVersion(DEFAULT_SCORING_VERSION.to_string())),
            },
        };

        let index: HashMap<String, usize> = self
            .configs
            .iter()
            .enumerate()
            .map(|(i, c)| (c.version.clone(), i))
            .collect();

        if !index.contains_key(&default_version) {
            return Err(PeptiqError::NoDefaultVersion(default_version));
        }

        Ok(ConfigRegistry {
            configs: self.configs,
            index,
            default_version,
        })
    }
}
