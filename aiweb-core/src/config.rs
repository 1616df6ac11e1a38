use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

use crate::client::BASE_PATH;

/// One reverse-proxy rule: requests whose path starts with the map key are
/// forwarded to `target`. With `change_origin` set the forwarded request
/// carries the target's host, so the backend sees a same-origin request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRule {
    pub target: String,

    #[serde(default)]
    pub change_origin: bool,
}

impl ProxyRule {
    /// Forward URL for a matched path. The path shape is kept unmodified.
    pub fn forward_url(&self, path: &str) -> String {
        format!("{}{}", self.target.trim_end_matches('/'), path)
    }

    /// Host header the forwarded request should present, when `change_origin`
    /// is set.
    pub fn rewritten_host(&self) -> Option<&str> {
        if !self.change_origin {
            return None;
        }

        let authority =
            self.target.split_once("://").map_or(self.target.as_str(), |(_, rest)| rest);

        Some(authority.split('/').next().unwrap_or(authority))
    }
}

/// Declarative dev-server table: plugins to activate, listening port, proxy
/// rules and build-time import aliases. Read once at startup, never mutated
/// at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevServerConfig {
    pub port: u16,

    pub plugins: Vec<String>,

    /// Example TOML:
    /// [proxy."/ai"]
    /// target = "http://localhost:8080"
    /// change_origin = true
    pub proxy: BTreeMap<String, ProxyRule>,

    /// Import symbol -> local source directory, resolved at build time.
    pub alias: BTreeMap<String, PathBuf>,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        let mut proxy = BTreeMap::new();
        proxy.insert(
            BASE_PATH.to_string(),
            ProxyRule { target: "http://localhost:8080".to_string(), change_origin: true },
        );

        let mut alias = BTreeMap::new();
        alias.insert("@".to_string(), PathBuf::from("./src"));

        Self {
            port: 5173,
            plugins: vec![
                "vue".to_string(),
                "vue-jsx".to_string(),
                "vue-devtools".to_string(),
            ],
            proxy,
            alias,
        }
    }
}

impl DevServerConfig {
    /// Longest-prefix match over the proxy table. Exactly the paths starting
    /// with a configured prefix match, no others.
    pub fn route(&self, path: &str) -> Option<(&str, &ProxyRule)> {
        self.proxy
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, rule)| (prefix.as_str(), rule))
    }

    /// Resolve a build-time import specifier through the alias table.
    ///
    /// `@/components/App.vue` resolves to `./src/components/App.vue`; a bare
    /// alias resolves to the aliased directory itself. Specifiers that merely
    /// begin with an alias symbol (`@x/y`) are left alone.
    pub fn resolve_import(&self, spec: &str) -> Option<PathBuf> {
        for (symbol, dir) in &self.alias {
            if spec == symbol {
                return Some(dir.clone());
            }

            if let Some(rest) = spec.strip_prefix(symbol.as_str())
                && let Some(rest) = rest.strip_prefix('/')
            {
                return Some(dir.join(rest));
            }
        }

        None
    }

    /// Load config from disk, or return the built-in defaults if no file
    /// exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: DevServerConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = self.to_toml()?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "aiweb", "aiweb-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("devserver.toml"))
    }
}
