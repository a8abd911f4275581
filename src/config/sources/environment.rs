//! Environment variable source: ROLLCALL_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const ENV_PREFIX: &str = "ROLLCALL";

/// Add environment variable overlay to builder.
/// Uses ROLLCALL_ prefix and __ as separator for nested keys,
/// e.g. `ROLLCALL_TEAM__EMAIL_DOMAIN`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
