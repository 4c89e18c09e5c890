use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
pub struct Configuration {
    /// Where `user_data.json` lives. Defaults to `~/.upnext`.
    pub data_dir: Option<PathBuf>,
    pub retention_hours: u32,
    pub theme: String,
}

const DEFAULT_CONFIG: &str = r#"
# Directory holding user_data.json (default: ~/.upnext)
# data_dir = "/home/me/.upnext"

# Hours a completed task stays visible before it is purged.
retention_hours = 24

theme = "default"
"#;

impl Configuration {
    /// Loads `~/.config/upnext/upnext.toml`, writing the default file first
    /// if there is none. `UPNEXT_*` environment variables override it.
    pub fn load() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Self::load_from(&home_dir.join(".config/upnext/upnext.toml"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("could not create {}", parent.display()))?;
            }
            fs::write(config_path, DEFAULT_CONFIG.trim_start())
                .with_context(|| format!("could not write {}", config_path.display()))?;
        }

        let settings = Config::builder()
            .set_default("retention_hours", 24)?
            .set_default("theme", "default")?
            .add_source(File::from(config_path.to_path_buf()).required(true))
            .add_source(Environment::with_prefix("UPNEXT"))
            .build()
            .with_context(|| format!("could not read {}", config_path.display()))?;

        settings
            .try_deserialize::<Configuration>()
            .context("invalid configuration")
    }
}
