use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Raised when two products that do not refer to the same item are merged.
    /// Callers are expected to check identity first, so this is a bug.
    #[error("cannot merge \"{incoming}\" into \"{existing}\": products do not refer to the same item")]
    IdentityMismatch { existing: String, incoming: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file must have a .json extension: {path}")]
    InvalidExtension { path: String },

    #[error("catalog I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to access settings file {path}: {source}")]
    SettingsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file: {0}")]
    SettingsParse(#[from] serde_yaml::Error),

    #[error("invalid value for setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("setting {0} is not configured")]
    MissingSetting(&'static str),
}
