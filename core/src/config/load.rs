use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;

pub const CONFIG_FILE_NAME: &str = "skullstrip.toml";

/// Loads the app config.
///
/// An explicit path must exist. Otherwise `./skullstrip.toml` is tried, then
/// `<config dir>/skullstrip/config.toml`, then built-in defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => discover(),
    };

    let mut cfg = match path {
        Some(p) => {
            let s = std::fs::read_to_string(&p)
                .with_context(|| format!("reading config {}", p.display()))?;
            tracing::debug!(target: "skullstrip.config", path = %p.display(), "loaded config file");
            toml::from_str::<AppConfig>(&s)
                .with_context(|| format!("parsing config {}", p.display()))?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    expand_paths(&mut cfg);
    Ok(cfg)
}

fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("skullstrip").join("config.toml");
    user.exists().then_some(user)
}

/// Applies `SKULLSTRIP_*` overrides; blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("SKULLSTRIP_BET_BIN") {
        cfg.tool.bin = v;
    }
    if let Some(v) = get("SKULLSTRIP_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = get("SKULLSTRIP_LOG_DIR") {
        cfg.logging.directory = Some(v);
    }
}

fn expand_paths(cfg: &mut AppConfig) {
    cfg.tool.bin = shellexpand::tilde(&cfg.tool.bin).into_owned();
    if let Some(dir) = cfg.logging.directory.as_mut() {
        *dir = shellexpand::tilde(dir).into_owned();
    }
}
