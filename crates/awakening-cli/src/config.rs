use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AwakeningConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub identity: IdentitySection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IdentitySection {
    pub caller: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    Plain,
    Table,
}

impl AwakeningConfig {
    pub fn for_store(store_path: &Path) -> Self {
        Self {
            store: StoreSection {
                path: Some(store_path.to_string_lossy().to_string()),
            },
            ..Self::default()
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("protocol.db"))
}

/// Read the config file, or the defaults if it does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<AwakeningConfig> {
    if !path.exists() {
        return Ok(AwakeningConfig::default());
    }
    read_config(path)
}

pub fn read_config(path: &Path) -> anyhow::Result<AwakeningConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &AwakeningConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("awakening"));
        }
    }
    Ok(home_dir()?.join(".config").join("awakening"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("awakening"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("awakening"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: AwakeningConfig = toml::from_str(
            r#"
            [store]
            path = "/tmp/protocol.db"

            [identity]
            caller = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG"

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.path.as_deref(), Some("/tmp/protocol.db"));
        assert_eq!(
            config.identity.caller.as_deref(),
            Some("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG")
        );
        assert_eq!(config.output.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_sections_are_optional() {
        let config: AwakeningConfig = toml::from_str("").unwrap();
        assert!(config.store.path.is_none());
        assert!(config.identity.caller.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        write_config(&path, &AwakeningConfig::for_store(Path::new("/data/p.db"))).unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.store.path.as_deref(), Some("/data/p.db"));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert!(config.store.path.is_none());
    }
}
