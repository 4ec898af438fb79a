//! Extension repository manifest.
//!
//! Builds `index.min.json` for a directory of APKs, either from `aapt`
//! badging dumps ([`Builder::build_with_badging`]) or, when the Android SDK
//! is not available, from file names alone ([`Builder::build_from_filenames`]).

mod apk;
mod build;
mod consts;
pub mod error;
mod icon;
pub mod models;

pub use crate::apk::{language_from_filename, list_apks, version_from_filename};
pub use crate::build::{Builder, Mode, Report, SkipReason, Skipped};
use crate::error::Result;
pub use crate::icon::extract_icon;
use extrepo_badging::Aapt;
use extrepo_config::Config;
use tracing::instrument;

/// Top-level entrypoint: discovers `aapt` and builds the manifest.
///
/// Falls back to file name matching when `aapt` cannot be found or when
/// `force_fallback` is set.
#[instrument(skip_all, fields(repo = %config.repo_dir.display()))]
pub fn build(config: &Config, force_fallback: bool) -> Result<Report> {
    let builder = Builder::new(config);
    if force_fallback {
        tracing::info!("Fallback requested; not looking for aapt");
        return builder.build_from_filenames();
    }
    match Aapt::discover(config.android_home.as_deref()) {
        Ok(aapt) => {
            tracing::info!(aapt = %aapt.path().display(), "Using aapt for package metadata");
            builder.build_with_badging(&aapt)
        },
        Err(err) => {
            tracing::warn!(error = ?err, "Android build tools not found; using fallback method");
            builder.build_from_filenames()
        },
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;

    pub(crate) const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

    /// Writes a zip archive standing in for an APK.
    pub(crate) fn write_apk(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            zip.start_file(*name, zip::write::FileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn forced_fallback_skips_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            repo_dir: dir.path().join("repo"),
            android_home: Some(dir.path().join("sdk")),
            ..Config::default()
        };
        fs::create_dir_all(config.apk_dir()).unwrap();
        fs::write(config.apk_dir().join("tachiyomi-vi.teamlanhlung-v1.4.27.apk"), b"").unwrap();

        let report = build(&config, true).unwrap();

        assert_eq!(report.mode, Mode::Fallback);
        assert_eq!(report.index.extensions[0].version, "1.4.27");
        assert!(report.index_file.is_file());
    }
}
