//! Configuration loading and root folder resolution
//!
//! Every setting resolves through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable config file is never fatal: it is logged and the
//! next source is used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MOODLY_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "moodly.db";

/// Compiled-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub port: u16,
    pub profile_cache_ttl_secs: u64,
    pub demo_mode: bool,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: "info".to_string(),
            port: 5830,
            profile_cache_ttl_secs: 300,
            demo_mode: false,
        }
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/moodly (or /var/lib/moodly for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("moodly"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/moodly"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("moodly"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/moodly"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("moodly"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\moodly"))
    } else {
        PathBuf::from("./moodly_data")
    }
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub profile_cache_ttl_secs: Option<u64>,
    pub demo_mode: Option<bool>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load `explicit` if given, otherwise the first default location
    ///
    /// `Ok(None)` when no default config file exists.
    pub fn load_from(explicit: Option<&Path>) -> Result<Option<Self>> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        let config = Self::load(&path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded config file: {}", path.display());
        Ok(Some(config))
    }
}

/// First existing config file: `~/.config/moodly/config.toml`, then `/etc/moodly/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("moodly").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/moodly/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolves the root folder from CLI, environment, config file, or defaults
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    config: Option<TomlConfig>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            config: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_config(mut self, config: Option<TomlConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!(module = %self.module_name, "Root folder from command line");
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                debug!(module = %self.module_name, "Root folder from {}", ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = self.config.as_ref().and_then(|c| c.root_folder.clone()) {
            debug!(module = %self.module_name, "Root folder from config file");
            return path;
        }

        debug!(module = %self.module_name, "Root folder from compiled default");
        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Prepares the resolved root folder
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
        }
        if !self.root_folder.is_dir() {
            return Err(Error::Config(format!(
                "Root folder is not a directory: {}",
                self.root_folder.display()
            )));
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }
}

/// Effective settings for the feedback review service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub port: u16,
    pub log_level: String,
    pub profile_cache_ttl: Duration,
    pub demo_mode: bool,
}

impl ServiceSettings {
    /// Merge config file values over compiled defaults; `port` (CLI or env) wins over both
    pub fn resolve(config: Option<&TomlConfig>, port: Option<u16>) -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        let file = config.cloned().unwrap_or_default();

        Self {
            port: port.or(file.port).unwrap_or(defaults.port),
            log_level: file.log_level.unwrap_or(defaults.log_level),
            profile_cache_ttl: Duration::from_secs(
                file.profile_cache_ttl_secs
                    .unwrap_or(defaults.profile_cache_ttl_secs),
            ),
            demo_mode: file.demo_mode.unwrap_or(defaults.demo_mode),
        }
    }
}
