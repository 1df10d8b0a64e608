use crate::error::{Result, ShiftError};
use crate::io;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SheetConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_sheet_path")]
    pub path: PathBuf,
}

fn default_sheet_path() -> PathBuf {
    PathBuf::from("sheet.yaml")
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: default_sheet_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// StorageBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum StorageBackend {
    /// Directory tree on the local host.
    Local {
        #[serde(default = "default_local_dir")]
        dir: PathBuf,
    },
    /// Cloud-disk REST API. The OAuth token is read from the named
    /// environment variable, never from the config file.
    Disk {
        #[serde(default = "default_api_base")]
        api_base: String,
        #[serde(default = "default_token_env")]
        token_env: String,
    },
}

fn default_local_dir() -> PathBuf {
    PathBuf::from("materials")
}

fn default_api_base() -> String {
    crate::disk::DEFAULT_API_BASE.to_string()
}

fn default_token_env() -> String {
    "SHIFTCREW_DISK_TOKEN".to_string()
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::Local {
            dir: default_local_dir(),
        }
    }
}

impl StorageBackend {
    /// Resolve the OAuth token for the disk backend from the environment.
    pub fn resolve_token(&self) -> Result<String> {
        match self {
            StorageBackend::Local { .. } => Ok(String::new()),
            StorageBackend::Disk { token_env, .. } => std::env::var(token_env).map_err(|_| {
                ShiftError::UploadUnavailable(format!("environment variable {token_env} is not set"))
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Logical root folder for material uploads.
    #[serde(default = "default_folder_root")]
    pub folder_root: String,
    /// Request public links for uploaded folders.
    #[serde(default)]
    pub publish: bool,
    #[serde(default)]
    pub backend: StorageBackend,
}

fn default_folder_root() -> String {
    "/shiftcrew".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            folder_root: default_folder_root(),
            publish: false,
            backend: StorageBackend::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            sheet: SheetConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShiftError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(path, data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !self.storage.folder_root.starts_with('/') {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "storage.folder_root '{}' should be an absolute logical path",
                    self.storage.folder_root
                ),
            });
        }

        if self.storage.publish {
            if let StorageBackend::Local { .. } = self.storage.backend {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "publish is enabled on the local backend; links will be file:// \
                              paths only reachable on this host"
                        .to_string(),
                });
            }
        }

        if let StorageBackend::Disk { token_env, .. } = &self.storage.backend {
            if token_env.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "storage.backend.token_env is empty".to_string(),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.sheet.path, PathBuf::from("sheet.yaml"));
        assert_eq!(parsed.storage.folder_root, "/shiftcrew");
        assert!(!parsed.storage.publish);
    }

    #[test]
    fn minimal_yaml_fills_in_defaults() {
        let cfg: Config = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(cfg.sheet.path, PathBuf::from("sheet.yaml"));
        assert!(matches!(cfg.storage.backend, StorageBackend::Local { .. }));
    }

    #[test]
    fn disk_backend_is_tagged_by_provider() {
        let yaml = r#"
version: 1
storage:
  publish: true
  backend:
    provider: disk
    token_env: MY_TOKEN
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        match &cfg.storage.backend {
            StorageBackend::Disk {
                api_base,
                token_env,
            } => {
                assert_eq!(api_base, crate::disk::DEFAULT_API_BASE);
                assert_eq!(token_env, "MY_TOKEN");
            }
            other => panic!("expected disk backend, got {other:?}"),
        }

        let out = serde_yaml::to_string(&cfg).unwrap();
        assert!(out.contains("provider: disk"));
    }

    #[test]
    fn load_missing_file_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ShiftError::ConfigNotFound(_)));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut cfg = Config::default();
        cfg.storage.publish = true;
        cfg.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(loaded.storage.publish);
    }

    #[test]
    fn validate_flags_relative_folder_root() {
        let mut cfg = Config::default();
        cfg.storage.folder_root = "shiftcrew".to_string();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("absolute logical path")));
    }

    #[test]
    fn validate_flags_publish_on_local_backend() {
        let mut cfg = Config::default();
        cfg.storage.publish = true;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("file://")));
    }

    #[test]
    fn validate_clean_config_has_no_warnings() {
        let cfg = Config::default();
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn resolve_token_reads_the_named_env_var() {
        let backend = StorageBackend::Disk {
            api_base: default_api_base(),
            token_env: "SHIFTCREW_TEST_TOKEN_VAR".to_string(),
        };
        std::env::set_var("SHIFTCREW_TEST_TOKEN_VAR", "secret");
        assert_eq!(backend.resolve_token().unwrap(), "secret");
        std::env::remove_var("SHIFTCREW_TEST_TOKEN_VAR");
        assert!(backend.resolve_token().is_err());
    }
}
