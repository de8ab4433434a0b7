//! Configuration file management for studymap.
//!
//! Provides a TOML-based config file at `~/.config/studymap/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studymap_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    pub owner: OwnerSection,
    /// Optional live chat backend. Absent means chat answers locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionSection>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerSection {
    /// Stable identity for this installation's roadmaps.
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSection {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the studymap config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/studymap` or
/// `~/.config/studymap`. We intentionally ignore the platform-specific
/// `dirs::config_dir()` (which returns `~/Library/Application Support` on
/// macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("studymap");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("studymap")
}

/// Return the path to the studymap config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since it may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct StudymapConfig {
    pub db_config: DbConfig,
    pub owner_id: Uuid,
    pub completion: Option<CompletionSection>,
}

impl StudymapConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    ///
    /// - DB URL: `cli_db_url` > `STUDYMAP_DATABASE_URL` env >
    ///   `config_file.database.url` > `DbConfig::DEFAULT_URL`
    /// - Owner: `STUDYMAP_OWNER_ID` env > `config_file.owner.id` > error
    /// - Completion: `STUDYMAP_API_KEY` env > `config_file.completion` > none
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let db_url = if let Some(url) = cli_db_url {
            url.to_string()
        } else if let Ok(url) = std::env::var("STUDYMAP_DATABASE_URL") {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_string()
        };
        let db_config = DbConfig::new(db_url);

        let owner_id = if let Ok(raw) = std::env::var("STUDYMAP_OWNER_ID") {
            raw.parse()
                .context("STUDYMAP_OWNER_ID env var is not a valid UUID")?
        } else if let Some(ref cfg) = file_config {
            cfg.owner.id
        } else {
            bail!("owner identity not found; set STUDYMAP_OWNER_ID or run `studymap init`");
        };

        let completion = if let Ok(api_key) = std::env::var("STUDYMAP_API_KEY") {
            Some(CompletionSection {
                api_key,
                model: None,
                endpoint: None,
            })
        } else {
            file_config.and_then(|cfg| cfg.completion)
        };

        Ok(Self {
            db_config,
            owner_id,
            completion,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_round_trips() {
        let original = ConfigFile {
            database: DatabaseSection {
                url: "postgresql://testhost:5432/testdb".to_string(),
            },
            owner: OwnerSection { id: Uuid::new_v4() },
            completion: Some(CompletionSection {
                api_key: "sk-test".to_string(),
                model: Some("gpt-4o-mini".to_string()),
                endpoint: None,
            }),
        };

        let rendered = toml::to_string_pretty(&original).unwrap();
        let parsed: ConfigFile = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.database.url, original.database.url);
        assert_eq!(parsed.owner.id, original.owner.id);
        assert_eq!(
            parsed.completion.as_ref().map(|c| c.api_key.as_str()),
            Some("sk-test")
        );
    }

    #[test]
    fn completion_section_is_optional() {
        let parsed: ConfigFile = toml::from_str(
            "[database]\nurl = \"postgresql://localhost:5432/studymap\"\n\
             [owner]\nid = \"00000000-0000-0000-0000-000000000001\"\n",
        )
        .unwrap();
        assert!(parsed.completion.is_none());
    }
}
