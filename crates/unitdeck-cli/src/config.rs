// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use unitdeck_systemd::SystemdScope;

const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub systemd: Systemd,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            systemd: Systemd::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Systemd {
    pub user: Option<bool>,
}

impl Default for Systemd {
    fn default() -> Self {
        Self { user: Some(false) }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("UNITDECK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set UNITDECK_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(unitdeck_systemd::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned; add `version = 1`",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        Ok(config)
    }

    /// Which systemd manager to talk to; `--user` on the command line
    /// overrides this.
    pub fn scope(&self) -> SystemdScope {
        if self.systemd.user.unwrap_or(false) {
            SystemdScope::User
        } else {
            SystemdScope::System
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# unitdeck configuration ({})\nversion = 1\n\n[systemd]\n# Manage the per-user service manager instead of the system one.\nuser = false\n",
            path.display()
        )
    }
}
