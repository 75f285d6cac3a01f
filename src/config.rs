//! Service configuration: optional TOML file plus environment overrides.
//!
//! Schema (every field optional):
//! ```toml
//! port = 3000
//! words_path = "data.md"
//! static_dir = "./static"
//!
//! [storage]
//! kind = "file"            # file | memory | none
//! path = "./progress.json"
//! namespace = "english-vocab"
//! ```
//! Environment variables win over the file: PORT, WORDS_PATH, STATIC_DIR,
//! STORAGE_BACKEND, STORAGE_PATH, STORAGE_NAMESPACE.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to read config file: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to parse TOML config: {0}")]
  Toml(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub port: u16,
  pub words_path: PathBuf,
  pub static_dir: PathBuf,
  pub storage: StorageConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      port: 3000,
      words_path: PathBuf::from("data.md"),
      static_dir: PathBuf::from("./static"),
      storage: StorageConfig::default(),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  pub kind: StorageKind,
  pub path: PathBuf,
  /// Prefix of every stored key, e.g. `english-vocab-progress`.
  pub namespace: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      kind: StorageKind::File,
      path: PathBuf::from("./progress.json"),
      namespace: "english-vocab".into(),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
  File,
  Memory,
  None,
}

impl FromStr for StorageKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "file" => Ok(StorageKind::File),
      "memory" => Ok(StorageKind::Memory),
      "none" | "off" => Ok(StorageKind::None),
      other => Err(format!("unknown storage backend '{}'", other)),
    }
  }
}

impl AppConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(s)?)
  }

  pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
    let s = std::fs::read_to_string(path)?;
    Self::from_toml_str(&s)
  }

  /// Load from VOCAB_CONFIG_PATH (if set) and apply env overrides.
  /// A broken config file is logged and replaced by defaults.
  pub fn load() -> Self {
    let mut cfg = match std::env::var("VOCAB_CONFIG_PATH") {
      Ok(path) => match Self::from_toml_file(Path::new(&path)) {
        Ok(cfg) => {
          info!(target: "vocab_backend", %path, "Loaded config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "vocab_backend", %path, error = %e, "Failed to load config; using defaults");
          Self::default()
        }
      },
      Err(_) => Self::default(),
    };
    cfg.apply_env(|k| std::env::var(k).ok());
    cfg
  }

  /// Overlay values from `lookup` (normally the process environment).
  pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(p) = lookup("PORT") {
      match p.parse::<u16>() {
        Ok(port) => self.port = port,
        Err(_) => warn!(target: "vocab_backend", value = %p, "Ignoring invalid PORT"),
      }
    }
    if let Some(p) = lookup("WORDS_PATH") { self.words_path = p.into(); }
    if let Some(p) = lookup("STATIC_DIR") { self.static_dir = p.into(); }
    if let Some(p) = lookup("STORAGE_PATH") { self.storage.path = p.into(); }
    if let Some(ns) = lookup("STORAGE_NAMESPACE") { self.storage.namespace = ns; }
    if let Some(k) = lookup("STORAGE_BACKEND") {
      match k.parse::<StorageKind>() {
        Ok(kind) => self.storage.kind = kind,
        Err(e) => warn!(target: "vocab_backend", error = %e, "Ignoring STORAGE_BACKEND"),
      }
    }
  }
}
