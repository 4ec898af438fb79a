//! Layered configuration for `extrepo`.
//!
//! Sources are merged in order, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. The user configuration file (`<config dir>/extrepo/config.toml`)
//! 3. `extrepo.toml` in the working directory (or the nearest parent that has one)
//! 4. An explicitly requested file (TOML, YAML or JSON, chosen by extension)
//! 5. The `ANDROID_HOME` environment variable
//! 6. `EXTREPO_`-prefixed environment variables (`__` separates nested keys)

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file, looked up in the working directory.
pub const PROJECT_FILE: &str = "extrepo.toml";
/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "EXTREPO_";
/// The SDK location variable understood by the Android tooling.
pub const ANDROID_HOME_VAR: &str = "ANDROID_HOME";

const TEAM_LANH_LUNG: &str = "Team Lạnh Lùng";

/// A source descriptor attached to every manifest record it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub lang: String,
    pub id: String,
    pub base_url: String,
}

/// Attaches [`SourceSpec`] to every APK whose file name contains `matches`
/// (compared case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRule {
    pub matches: String,
    pub source: SourceSpec,
}

/// Template for a manifest record when `aapt` is unavailable.
///
/// Applies to APKs whose file name contains `matches` (case-insensitive). The
/// version label is read from the file name when it carries a `v1.2.3` marker,
/// otherwise `version` is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRule {
    pub matches: String,
    pub name: String,
    pub pkg: String,
    pub lang: String,
    pub code: u64,
    pub version: String,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository root; the other paths default to locations beneath it.
    pub repo_dir: PathBuf,
    pub apk_dir: Option<PathBuf>,
    pub icon_dir: Option<PathBuf>,
    pub index_file: Option<PathBuf>,
    /// Android SDK root. Usually populated from `ANDROID_HOME`.
    pub android_home: Option<PathBuf>,
    /// Language recorded for APKs whose file name carries no language marker.
    pub default_lang: String,
    pub sources: Vec<SourceRule>,
    pub fallback: Vec<FallbackRule>,
}

impl Default for Config {
    fn default() -> Self {
        let team_lanh_lung = SourceSpec {
            name: TEAM_LANH_LUNG.to_string(),
            lang: "vi".to_string(),
            id: "teamlanhlung".to_string(),
            base_url: "https://teamlanhlungday.me".to_string(),
        };
        Self {
            repo_dir: PathBuf::from("repo"),
            apk_dir: None,
            icon_dir: None,
            index_file: None,
            android_home: None,
            default_lang: "vi".to_string(),
            sources: vec![SourceRule { matches: "teamlanhlung".to_string(), source: team_lanh_lung.clone() }],
            fallback: vec![FallbackRule {
                matches: "teamlanhlung".to_string(),
                name: TEAM_LANH_LUNG.to_string(),
                pkg: "eu.kanade.tachiyomi.extension.vi.teamlanhlung".to_string(),
                lang: "vi".to_string(),
                code: 26,
                version: "1.4.26".to_string(),
                nsfw: true,
                sources: vec![team_lanh_lung],
            }],
        }
    }
}

impl Config {
    /// Loads the configuration from every layer, including the user config file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(user_config_file(), explicit)?)
    }

    /// Builds the layered [`Figment`] without extracting it.
    ///
    /// `user` is the optional per-user configuration file; it is skipped when
    /// missing, as is `extrepo.toml`. An `explicit` file, however, must exist.
    pub fn figment(user: Option<PathBuf>, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user) = user {
            tracing::trace!(path = %user.display(), "Merging user configuration file");
            figment = figment.merge(Toml::file(user));
        }
        figment = figment.merge(Toml::file(PROJECT_FILE));
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
            figment = match extension.as_str() {
                "toml" => figment.merge(Toml::file(path)),
                "yaml" | "yml" => figment.merge(Yaml::file(path)),
                "json" => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(extension)),
            };
            tracing::debug!(path = %path.display(), "Merged explicit configuration file");
        }
        Ok(figment
            .merge(Env::raw().filter(|key| key.as_str().eq_ignore_ascii_case(ANDROID_HOME_VAR)))
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extracts and validates a configuration from an already-built [`Figment`].
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Invalid)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_lang.trim().is_empty() {
            exn::bail!(ErrorKind::Validation("default_lang must not be empty".to_string()));
        }
        if self.sources.iter().any(|rule| rule.matches.is_empty()) {
            exn::bail!(ErrorKind::Validation("source rules need a non-empty `matches`".to_string()));
        }
        if self.fallback.iter().any(|rule| rule.matches.is_empty()) {
            exn::bail!(ErrorKind::Validation("fallback rules need a non-empty `matches`".to_string()));
        }
        Ok(())
    }

    /// Directory scanned for `*.apk` files.
    pub fn apk_dir(&self) -> PathBuf {
        self.apk_dir.clone().unwrap_or_else(|| self.repo_dir.join("apk"))
    }

    /// Directory extracted icons are written to.
    pub fn icon_dir(&self) -> PathBuf {
        self.icon_dir.clone().unwrap_or_else(|| self.repo_dir.join("icon"))
    }

    /// Location of the written manifest.
    pub fn index_file(&self) -> PathBuf {
        self.index_file.clone().unwrap_or_else(|| self.repo_dir.join("index.min.json"))
    }
}

fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "extrepo").map(|dirs| dirs.config_dir().join("config.toml"))
}
