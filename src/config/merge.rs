//! MergeService: orchestrates sources and deserializes to RosterConfig.

use crate::config::sources::{environment, global_file};
use crate::config::RosterConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<RosterConfig, ConfigError> {
        let builder = Config::builder();
        let builder = global_file::add_to_builder(builder)?;
        let builder = Self::add_explicit_file(builder, explicit);
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from one file with environment overlay, skipping the global file.
    pub fn load_from_file(path: &Path) -> Result<RosterConfig, ConfigError> {
        let builder = Self::add_explicit_file(Config::builder(), Some(path));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    fn add_explicit_file(
        builder: ConfigBuilder<DefaultState>,
        explicit: Option<&Path>,
    ) -> ConfigBuilder<DefaultState> {
        match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder,
        }
    }
}
