use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.nytimes.com";
pub const DEFAULT_SECTION: &str = "nyregion";
pub const API_KEY_ENV: &str = "NYT_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub section: Option<String>,
    pub api_base: Option<String>,
    pub title: Option<String>,
    pub open_command: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_key: Option<String>,
    pub section: String,
    pub api_base: Url,
    pub title: String,
    pub open_command: Option<String>,
}

pub fn load(
    config_override: Option<&Path>,
    section_override: Option<String>,
) -> Result<RuntimeConfig> {
    let file = match config_override {
        // An explicit path has to exist
        Some(p) => {
            if !p.is_file() {
                bail!("config file not found: {}", p.display());
            }
            Some(read_config(p)?)
        }
        None => match default_config_path() {
            Some(p) if p.is_file() => Some(read_config(&p)?),
            _ => None,
        },
    };

    let env_key = env::var(API_KEY_ENV).ok();
    resolve(file.unwrap_or_default(), env_key, section_override)
}

/// Merges the file config with the environment and CLI overrides.
pub fn resolve(
    file: AppConfig,
    env_key: Option<String>,
    section_override: Option<String>,
) -> Result<RuntimeConfig> {
    let api_key = env_key
        .or(file.api_key)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let section = section_override
        .or(file.section)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SECTION.to_string());

    let base = file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
    let api_base = Url::parse(base).with_context(|| format!("invalid api_base: {}", base))?;

    let title = file
        .title
        .unwrap_or_else(|| format!("Top Stories: {}", section));

    Ok(RuntimeConfig {
        api_key,
        section,
        api_base,
        title,
        open_command: file.open_command,
    })
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("topstories");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("topstories");
        p.push("config.toml");
        return Some(p);
    }
    None
}
