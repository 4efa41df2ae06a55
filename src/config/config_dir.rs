use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::error::{ConfigError, ConfigResult};

const LOCAL_CONFIG: &str = "./config.toml";

pub fn find_config_file(use_local: bool) -> PathBuf {
    if use_local {
        return PathBuf::from(LOCAL_CONFIG);
    }

    #[cfg(unix)]
    let base = std::env::var_os("HOME");
    #[cfg(windows)]
    let base = std::env::var_os("APPDATA");

    #[cfg(any(unix, windows))]
    if let Some(base) = base {
        let path = user_config_path(Path::new(&base));
        if path.exists() {
            return path;
        }
    }

    PathBuf::from(LOCAL_CONFIG)
}

/// `$HOME/.config/adminhub/config.toml` on unix, `%APPDATA%\adminhub\config.toml` on windows.
fn user_config_path(base: &Path) -> PathBuf {
    let mut path = base.to_path_buf();
    if cfg!(unix) {
        path = path.join(".config");
    }
    path.join(crate::APPLICATION_NAME).join("config.toml")
}

pub fn read_config(use_local: bool) -> ConfigResult<Vec<u8>> {
    read_config_from(&find_config_file(use_local))
}

fn read_config_from(filename: &Path) -> ConfigResult<Vec<u8>> {
    tracing::trace!("looking for config at: {}", filename.display());
    if !filename.exists() {
        return Err(ConfigError::ConfigNotFound);
    }

    let filename = filename.canonicalize()?;
    debug!("using {} as configuration file", filename.display());

    let mut fd = File::open(filename)?;
    let mut buf = Vec::new();
    fd.read_to_end(&mut buf)?;

    Ok(buf)
}
