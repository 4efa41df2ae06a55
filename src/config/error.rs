use thiserror::Error;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("de error: {0}")]
    TomlDeError(#[from] toml::de::Error),
    #[error("config is not valid utf-8")]
    NotUtf8,
    #[error("config value `{0}` is missing or empty")]
    MissingValue(&'static str),
    #[error("config not found")]
    ConfigNotFound,
}
