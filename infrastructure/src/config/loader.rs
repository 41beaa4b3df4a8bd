//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["conductor.toml", ".conductor.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CONDUCTOR_` environment variables (`CONDUCTOR_EXECUTOR__CONFIRMED=true`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./conductor.toml` or `./.conductor.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/conductor/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("CONDUCTOR_").split("__"))
    }

    /// Load a single file over the defaults, ignoring every other source
    pub fn load_file(path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/conductor/config.toml` (or the platform equivalent)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("conductor").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: CONDUCTOR_<SECTION>__<KEY>");

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./conductor.toml or ./.conductor.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
