//! `packsync.toml` configuration.
//!
//! ```toml
//! base_url = "https://example.com/downloads/"
//! game_dir = "C:/Users/me/AppData/Roaming/.minecraft_pack"
//!
//! [profile]
//! path = "C:/Users/me/AppData/Roaming/.minecraft/launcher_profiles.json"
//! key = "Pack"
//!
//! [server]
//! name = "Pack Server"
//! address = "mc.example.com"
//! ```
//!
//! Relative document paths resolve under the game directory. String values
//! may use `{minecraft}` (target game version) and `{key}` (profile key).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pack_docs::ResourcePackRules;
use pack_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings template used when no `settings.template` is configured.
pub const BUNDLED_SETTINGS_TEMPLATE: &str = include_str!("../templates/options.txt");

fn default_version_document() -> String {
    "abcd-mods-latest.txt".to_string()
}

fn default_manifest_name() -> String {
    "abcd-update-packs-{minecraft}.txt".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("packsync/{}", env!("CARGO_PKG_VERSION"))
}

fn default_container() -> String {
    "profiles".to_string()
}

fn default_stale_keys() -> Vec<String> {
    vec!["fabric-loader-{minecraft}".to_string()]
}

fn default_profile_name() -> String {
    "{key} {minecraft}".to_string()
}

fn default_icon() -> String {
    "Furnace".to_string()
}

fn default_java_args() -> String {
    "-Xmx4G -XX:+UnlockExperimentalVMOptions -XX:+UseG1GC -XX:G1NewSizePercent=20 \
     -XX:G1ReservePercent=20 -XX:MaxGCPauseMillis=50 -XX:G1HeapRegionSize=32M"
        .to_string()
}

fn default_servers_path() -> PathBuf {
    PathBuf::from("servers.dat")
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("options.txt")
}

fn default_overrides() -> BTreeMap<String, String> {
    [
        ("lang", "ja_jp"),
        ("skipMultiplayerWarning", "true"),
        ("joinedFirstServer", "true"),
        ("onboardAccessibility", "false"),
        ("key_key.saveToolbarActivator", "key.keyboard.unknown"),
        ("key_key.loadToolbarActivator", "key.keyboard.unknown"),
        ("key_key.quickActions", "key.keyboard.unknown"),
        ("soundCategory_master", "0.10264900662251655"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_pack_directory() -> PathBuf {
    PathBuf::from("resourcepacks")
}

fn default_pack_prefix() -> Vec<String> {
    vec!["vanilla".to_string(), "fabric".to_string()]
}

fn default_pack_priority() -> Vec<String> {
    vec!["Faithful*.zip".to_string(), "AngelWing*.zip".to_string()]
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// The managed launcher profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// Registry document; usually outside the game directory
    pub path: PathBuf,
    /// Key of the managed section
    pub key: String,
    /// Key of the object holding all profiles
    #[serde(default = "default_container")]
    pub container: String,
    /// Sections removed before the managed one is re-inserted
    #[serde(default = "default_stale_keys")]
    pub stale_keys: Vec<String>,
    #[serde(default = "default_profile_name")]
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_java_args")]
    pub java_args: String,
}

/// The server record kept in the multiplayer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_servers_path")]
    pub path: PathBuf,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePackSettings {
    #[serde(default = "default_pack_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_pack_prefix")]
    pub prefix: Vec<String>,
    #[serde(default = "default_pack_priority")]
    pub priority: Vec<String>,
}

impl Default for ResourcePackSettings {
    fn default() -> Self {
        Self {
            directory: default_pack_directory(),
            prefix: default_pack_prefix(),
            priority: default_pack_priority(),
        }
    }
}

impl ResourcePackSettings {
    pub fn rules(&self) -> ResourcePackRules {
        ResourcePackRules {
            prefix: self.prefix.clone(),
            priority: self.priority.clone(),
        }
    }
}

/// The client settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFileSettings {
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
    /// Seed for a missing settings file; the bundled template when unset
    #[serde(default)]
    pub template: Option<PathBuf>,
    /// Values written over existing keys. `resourcePacks` is always computed.
    #[serde(default = "default_overrides")]
    pub overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub resource_packs: ResourcePackSettings,
}

impl Default for SettingsFileSettings {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
            template: None,
            overrides: default_overrides(),
            resource_packs: ResourcePackSettings::default(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Download base; manifests and pack files are relative to it
    pub base_url: String,
    #[serde(default = "default_version_document")]
    pub version_document: String,
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
    #[serde(default)]
    pub game_dir: Option<PathBuf>,
    /// Version of the running updater; a newer published one aborts the run
    #[serde(default)]
    pub updater_version: Option<String>,
    /// Installed mod loader version, used for the profile's version id
    #[serde(default)]
    pub loader_version: Option<String>,
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub profile: Option<ProfileSettings>,
    #[serde(default)]
    pub server: Option<ServerSettings>,
    #[serde(default)]
    pub settings: SettingsFileSettings,
}

impl SyncConfig {
    /// A configuration with every optional value at its default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            version_document: default_version_document(),
            manifest_name: default_manifest_name(),
            game_dir: None,
            updater_version: None,
            loader_version: None,
            network: NetworkSettings::default(),
            profile: None,
            server: None,
            settings: SettingsFileSettings::default(),
        }
    }

    /// Parse configuration from TOML text. `origin` names the source in
    /// error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// The game directory, or a configuration error if none was given.
    pub fn require_game_dir(&self) -> Result<NormalizedPath> {
        self.game_dir
            .as_deref()
            .map(NormalizedPath::new)
            .ok_or_else(|| Error::Config {
                path: PathBuf::from("packsync.toml"),
                message: "game_dir is not set; pass --game-dir or set game_dir".to_string(),
            })
    }

    /// Settings file template text.
    pub fn settings_template(&self, game_dir: &NormalizedPath) -> Result<String> {
        match &self.settings.template {
            Some(path) => {
                let path = resolve_document(game_dir, path);
                Ok(pack_fs::io::read_text(&path)?)
            }
            None => Ok(BUNDLED_SETTINGS_TEMPLATE.to_string()),
        }
    }
}

/// Resolve a configured document path; relative paths land under `game_dir`.
pub fn resolve_document(game_dir: &NormalizedPath, path: &Path) -> NormalizedPath {
    if path.is_absolute() || path.has_root() {
        NormalizedPath::new(path)
    } else {
        game_dir.join(&path.to_string_lossy())
    }
}

/// Substitute `{minecraft}` and `{key}` placeholders.
pub fn expand(template: &str, minecraft: &str, key: &str) -> String {
    template
        .replace("{minecraft}", minecraft)
        .replace("{key}", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = SyncConfig::parse(
            r#"base_url = "https://example.com/downloads/""#,
            Path::new("packsync.toml"),
        )
        .unwrap();

        assert_eq!(config, SyncConfig::new("https://example.com/downloads/"));
        assert_eq!(config.settings.overrides.get("lang").map(String::as_str), Some("ja_jp"));
        assert!(!config.settings.overrides.contains_key("resourcePacks"));
    }

    #[test]
    fn test_missing_base_url_names_origin() {
        let err = SyncConfig::parse("game_dir = \"/g\"", Path::new("/etc/packsync.toml")).unwrap_err();
        assert!(err.to_string().contains("/etc/packsync.toml"));
    }

    #[test]
    fn test_expand() {
        assert_eq!(expand("{key} {minecraft}", "1.21.6", "Pack"), "Pack 1.21.6");
        assert_eq!(expand("fabric-loader-{minecraft}", "1.21.6", "Pack"), "fabric-loader-1.21.6");
    }

    #[test]
    fn test_resolve_document() {
        let game_dir = NormalizedPath::new("/games/pack");
        assert_eq!(
            resolve_document(&game_dir, Path::new("servers.dat")).as_str(),
            "/games/pack/servers.dat"
        );
        assert_eq!(
            resolve_document(&game_dir, Path::new("/launcher/launcher_profiles.json")).as_str(),
            "/launcher/launcher_profiles.json"
        );
    }

    #[test]
    fn test_bundled_template_has_resource_packs_line() {
        assert!(BUNDLED_SETTINGS_TEMPLATE
            .lines()
            .any(|line| line.starts_with("resourcePacks:")));
    }
}
