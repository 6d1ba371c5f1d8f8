//! Application-wide constants.

/// The display name of the application.
pub const APP_NAME: &str = "ProbeMapper";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "probemapper";

/// Labels of the normal and flipped outputs when none are configured.
pub const DEFAULT_VERSION_LABELS: [&str; 2] = ["version1", "version2"];

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "PROBEMAPPER_CONFIG";
