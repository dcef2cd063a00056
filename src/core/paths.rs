use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base pyrename config directory (universal ~/.config/pyrename/ on all platforms)
pub fn pyrename() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("pyrename"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("pyrename"))
    }
}

/// Global pyrename.json config file path
pub fn pyrename_json() -> Result<PathBuf> {
    Ok(pyrename()?.join("pyrename.json"))
}
