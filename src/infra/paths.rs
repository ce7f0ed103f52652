// src/infra/paths.rs — Config path management
//
// DOCQUERY_HOME overrides the config directory. When unset, config lives in
// ~/.docquery/.

use std::path::PathBuf;

/// Returns the DOCQUERY_HOME override, if set.
fn docquery_home() -> Option<PathBuf> {
    std::env::var_os("DOCQUERY_HOME").map(PathBuf::from)
}

/// Home directory, or the working directory when none can be determined.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $DOCQUERY_HOME/ or ~/.docquery/
pub fn config_dir() -> PathBuf {
    docquery_home().unwrap_or_else(|| dirs_home().join(".docquery"))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_config_dir() {
        let path = config_file_path();
        assert!(path.starts_with(config_dir()));
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
