use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TASKLIST_DATA_DIR";
/// Environment variable enabling the debug file log.
pub const LOG_FILE_ENV: &str = "TASKLIST_LOG_FILE";

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    /// When set, `tracing_setup` also writes DEBUG-level logs here.
    pub log_file: Option<PathBuf>,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            log_file: None,
        }
    }

    /// Build a config from `TASKLIST_DATA_DIR` / `TASKLIST_LOG_FILE`,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(PathBuf::from(dir)),
            _ => Self::default(),
        };
        config.log_file = std::env::var_os(LOG_FILE_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        config
    }

    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.log_file = Some(path.as_ref().to_path_buf());
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        match dirs::data_local_dir() {
            Some(dir) => Self::new(dir.join("tasklist")),
            None => Self::new("tasklist_data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_given_dir() {
        let config = CoreConfig::new("/tmp/lists");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/lists"));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_with_log_file() {
        let config = CoreConfig::new("data").with_log_file("data/debug.log");
        assert_eq!(config.log_file, Some(PathBuf::from("data/debug.log")));
    }

    #[test]
    fn test_default_ends_in_tasklist_dir() {
        let config = CoreConfig::default();
        let name = config.data_dir.file_name().and_then(|n| n.to_str());
        assert!(matches!(name, Some("tasklist") | Some("tasklist_data")));
    }
}
