//! Global config file: `<config dir>/rollcall/config.toml`, optional.

use crate::config::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use tracing::debug;

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Some(path) = paths::global_config_path() else {
        return Ok(builder);
    };
    debug!(path = %path.display(), exists = path.exists(), "Global config file");
    Ok(builder.add_source(File::from(path).required(false)))
}
