use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "./data";

/// Location of the local blobs (collections and meal plans).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Environment variables:
    /// - APP_DATA_DIR: directory for local state (default: "./data")
    pub fn from_env() -> Self {
        Self::new(env::var("APP_DATA_DIR").ok())
    }

    pub fn new(data_dir: Option<String>) -> Self {
        let data_dir = data_dir
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        Self {
            data_dir: PathBuf::from(data_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_data_dir_when_unset_or_blank() {
        assert_eq!(StorageConfig::new(None).data_dir, PathBuf::from("./data"));
        assert_eq!(
            StorageConfig::new(Some(" ".to_string())).data_dir,
            PathBuf::from("./data")
        );
    }

    #[test]
    fn should_use_configured_data_dir() {
        let config = StorageConfig::new(Some("/var/lib/pantry".to_string()));

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/pantry"));
    }
}
