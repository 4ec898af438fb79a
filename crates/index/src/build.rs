use crate::apk::{file_name, language_from_filename, list_apks, name_matches, version_from_filename};
use crate::consts::ICON_EXTENSION;
use crate::error::{ErrorKind, Result};
use crate::icon::extract_icon;
use crate::models::{Extension, Index, Source};
use exn::ResultExt;
use extrepo_badging::Dumper;
use extrepo_badging::error::ErrorKind as BadgingErrorKind;
use extrepo_config::{Config, FallbackRule};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// How the manifest records were produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Metadata came from `aapt dump badging`.
    Badging,
    /// `aapt` was unavailable; records were built from file names and
    /// configured templates.
    Fallback,
}

/// Why an APK is missing from the manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The badging dump lacked a required field.
    Incomplete,
    /// Dumping or parsing the badging failed.
    Failed(BadgingErrorKind),
    /// No fallback rule matched the file name.
    Unmatched,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    pub apk: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of a build: the manifest as written, and what was left out.
#[derive(Clone, Debug)]
pub struct Report {
    pub mode: Mode,
    pub index_file: PathBuf,
    pub index: Index,
    pub skipped: Vec<Skipped>,
}

/// Builds and writes the manifest for the repository described by a [`Config`].
pub struct Builder<'a> {
    config: &'a Config,
}

impl<'a> Builder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Builds the manifest from badging dumps, extracting icons along the way.
    ///
    /// Packages whose badging cannot be read are skipped; only listing the
    /// APK directory, creating the icon directory and writing the manifest
    /// are fatal.
    pub fn build_with_badging<D: Dumper + ?Sized>(&self, dumper: &D) -> Result<Report> {
        let icon_dir = self.create_icon_dir()?;
        let mut index = Index::default();
        let mut skipped = Vec::new();
        for apk in list_apks(self.config.apk_dir())? {
            match self.extension_from_badging(dumper, &apk, &icon_dir) {
                Ok(extension) => index.push(extension),
                Err(reason) => skipped.push(Skipped { apk, reason }),
            }
        }
        self.finish(Mode::Badging, index, skipped)
    }

    /// Builds the manifest from file names alone, using the configured
    /// fallback rules. APKs no rule matches are left out.
    ///
    /// The icon directory is still created, although nothing is extracted.
    pub fn build_from_filenames(&self) -> Result<Report> {
        self.create_icon_dir()?;
        let mut index = Index::default();
        let mut skipped = Vec::new();
        for apk in list_apks(self.config.apk_dir())? {
            let name = file_name(&apk);
            match self.config.fallback.iter().find(|rule| name_matches(&name, &rule.matches)) {
                Some(rule) => index.push(fallback_extension(rule, name)),
                None => {
                    tracing::debug!(apk = %apk.display(), "No fallback rule matches APK; skipping");
                    skipped.push(Skipped { apk, reason: SkipReason::Unmatched });
                },
            }
        }
        self.finish(Mode::Fallback, index, skipped)
    }

    #[instrument(skip_all, fields(apk = %apk.display()))]
    fn extension_from_badging<D: Dumper + ?Sized>(
        &self,
        dumper: &D,
        apk: &Path,
        icon_dir: &Path,
    ) -> std::result::Result<Extension, SkipReason> {
        let badging = match extrepo_badging::read(dumper, apk) {
            Ok(badging) => badging,
            Err(err) if err.is_incomplete() => {
                tracing::debug!(error = ?err, "Badging is missing required fields; skipping");
                return Err(SkipReason::Incomplete);
            },
            Err(err) => {
                tracing::warn!(error = ?err, "Error processing APK; skipping");
                return Err(SkipReason::Failed((*err).clone()));
            },
        };
        if let Some(icon) = &badging.icon {
            let dest = icon_dir.join(format!("{}.{}", badging.package_name, ICON_EXTENSION));
            if let Err(err) = extract_icon(apk, icon, &dest) {
                tracing::warn!(error = ?err, "Icon extraction failed; continuing without it");
            }
        }
        let name = file_name(apk);
        Ok(Extension {
            lang: language_from_filename(&name).unwrap_or(&self.config.default_lang).to_string(),
            sources: self.sources_for(&name),
            name: badging.label,
            pkg: badging.package_name,
            apk: name,
            code: badging.version_code,
            version: badging.version_name,
            nsfw: u8::from(badging.nsfw),
        })
    }

    /// Both modes leave the repository with the same directory layout.
    fn create_icon_dir(&self) -> Result<PathBuf> {
        let icon_dir = self.config.icon_dir();
        std::fs::create_dir_all(&icon_dir).or_raise(|| ErrorKind::Io)?;
        Ok(icon_dir)
    }

    fn sources_for(&self, name: &str) -> Vec<Source> {
        self.config
            .sources
            .iter()
            .filter(|rule| name_matches(name, &rule.matches))
            .map(|rule| Source::from(&rule.source))
            .collect()
    }

    fn finish(&self, mode: Mode, index: Index, skipped: Vec<Skipped>) -> Result<Report> {
        for pkg in index.duplicate_packages() {
            tracing::warn!(pkg, "Package identifier appears more than once in the manifest");
        }
        let index_file = self.config.index_file();
        index.write_to(&index_file)?;
        Ok(Report { mode, index_file, index, skipped })
    }
}

fn fallback_extension(rule: &FallbackRule, apk: String) -> Extension {
    let version = version_from_filename(&apk).unwrap_or(&rule.version).to_string();
    Extension {
        name: rule.name.clone(),
        pkg: rule.pkg.clone(),
        apk,
        lang: rule.lang.clone(),
        code: rule.code,
        version,
        nsfw: u8::from(rule.nsfw),
        sources: rule.sources.iter().map(Source::from).collect(),
    }
}
