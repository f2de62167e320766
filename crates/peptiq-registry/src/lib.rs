//! PeptIQ Registry: versioned scoring configurations
//!
//! A scoring version is a named, immutable set of weights and thresholds.
//! Once a version is published to a [`ConfigRegistry`] it never changes, so
//! any score can be replayed under the parameters it was computed with.
//!
//! # Example
//!
//! ```
//! use peptiq_registry::{ConfigRegistry, ScoringConfig};
//!
//! let registry = ConfigRegistry::builder()
//!     .register(ScoringConfig::v1_0())
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let config = registry.resolve(None).unwrap();
//! assert_eq!(config.version, "v1.0");
//! assert!(registry.resolve(Some("v9")).is_err());
//! ```

pub mod config_registry;
pub mod scoring_config;

pub use config_registry::{ConfigRegistry, ConfigRegistryBuilder};
pub use scoring_config::ScoringConfig;

/// Version resolved when a caller does not name one
pub const DEFAULT_SCORING_VERSION: &str = "v1.0";
