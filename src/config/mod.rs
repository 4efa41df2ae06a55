use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_ENCRYPTION_KEY: &str = "ADMINHUB_ENCRYPTION_KEY";
pub const ENV_JWT_SECRET: &str = "ADMINHUB_JWT_SECRET";
pub const ENV_BIND: &str = "ADMINHUB_BIND";

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
    #[serde(default)]
    bootstrap: Option<Bootstrap>,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    encryption_key: String,
    #[serde(default)]
    docs: bool,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// Initial administrator account, created on startup when missing.
#[derive(Debug, Deserialize)]
pub struct Bootstrap {
    admin_email: String,
    admin_password: String,
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    let config = Self::from_slice(&bytes)?;
                    config.with_env_overrides(|key| std::env::var(key).ok())
                };

                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found or invalid.");
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        Ok(toml::from_str(text)?)
    }

    /// Applies environment overrides on top of the file values. `lookup` is injected so tests
    /// don't have to touch the process environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup(ENV_DATABASE_URL) {
            self.app.database_uri = uri;
        }
        if let Some(key) = lookup(ENV_ENCRYPTION_KEY) {
            self.app.encryption_key = key;
        }
        if let Some(jwt) = lookup(ENV_JWT_SECRET) {
            self.app.jwt = jwt;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.host.bindto = bind;
        }

        if self.app.encryption_key.trim().is_empty() {
            return Err(ConfigError::MissingValue("app.encryption_key"));
        }
        if self.app.jwt.trim().is_empty() {
            return Err(ConfigError::MissingValue("app.jwt"));
        }

        Ok(self)
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn bootstrap(&self) -> Option<&Bootstrap> {
        self.bootstrap.as_ref()
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn encryption_key(&self) -> &str {
        &self.encryption_key
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

impl Bootstrap {
    #[inline]
    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    #[inline]
    pub fn admin_password(&self) -> &str {
        &self.admin_password
    }
}
