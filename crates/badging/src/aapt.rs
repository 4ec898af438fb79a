use crate::error::{ErrorKind, Result};
use directories::BaseDirs;
use exn::ResultExt;
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::instrument;

/// SDK locations probed when no SDK root was configured.
const SDK_LOCATIONS: [&str; 2] = ["/usr/local/android-sdk", "/opt/android-sdk"];
const AAPT: &str = if cfg!(windows) { "aapt.exe" } else { "aapt" };

/// Produces the textual badging report for an APK.
pub trait Dumper {
    fn dump_badging(&self, apk: &Path) -> Result<String>;
}

/// The Android Asset Packaging Tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aapt {
    path: PathBuf,
}

impl Aapt {
    /// Uses the given executable as-is.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Locates `aapt` inside the newest Android SDK build-tools, falling back
    /// to `PATH`.
    ///
    /// When `android_home` is `None` or empty the well-known SDK install
    /// locations are probed instead (`/usr/local/android-sdk`,
    /// `/opt/android-sdk`, `~/Android/Sdk`).
    pub fn discover(android_home: Option<&Path>) -> Result<Self> {
        let search_path = std::env::var_os("PATH");
        Self::discover_in(android_home, &default_sdk_locations(), search_path.as_deref())
    }

    fn discover_in(android_home: Option<&Path>, sdk_locations: &[PathBuf], search_path: Option<&OsStr>) -> Result<Self> {
        let sdk = match android_home.filter(|path| !path.as_os_str().is_empty()) {
            Some(path) => Some(path.to_path_buf()),
            None => sdk_locations.iter().find(|p| p.exists()).cloned(),
        };
        match &sdk {
            Some(sdk) => {
                if let Some(path) = find_in_build_tools(sdk) {
                    tracing::debug!(aapt = %path.display(), "Discovered aapt in Android build tools");
                    return Ok(Self { path });
                }
                tracing::info!(sdk = %sdk.display(), "No build tools containing aapt found in Android SDK");
            },
            None => tracing::info!("Android SDK not found; set ANDROID_HOME"),
        }
        let cwd = std::env::current_dir().unwrap_or_default();
        if let Ok(path) = which::which_in(AAPT, search_path, cwd) {
            tracing::debug!(aapt = %path.display(), "Discovered aapt in PATH");
            return Ok(Self { path });
        }
        exn::bail!(ErrorKind::AaptNotFound);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Dumper for Aapt {
    #[instrument(skip_all, fields(apk = %apk.display()))]
    fn dump_badging(&self, apk: &Path) -> Result<String> {
        let output = Command::new(&self.path)
            .args(["dump", "--include-meta-data", "badging"])
            .arg(apk)
            .output()
            .or_raise(|| ErrorKind::Io)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(stderr = %stderr.trim(), "aapt reported an error");
            exn::bail!(ErrorKind::AaptFailed(output.status.code().unwrap_or(-1)));
        }
        String::from_utf8(output.stdout).or_raise(|| ErrorKind::InvalidOutput)
    }
}

fn default_sdk_locations() -> Vec<PathBuf> {
    let mut locations: Vec<PathBuf> = SDK_LOCATIONS.iter().map(PathBuf::from).collect();
    if let Some(dirs) = BaseDirs::new() {
        locations.push(dirs.home_dir().join("Android").join("Sdk"));
    }
    locations
}

/// The `aapt` of the newest `build-tools/<version>` directory that has one.
fn find_in_build_tools(sdk: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(sdk.join("build-tools")).ok()?;
    let mut versions: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|entry| Some((entry.file_name().into_string().ok()?, entry.path())))
        .collect();
    versions.sort_by(|(a, _), (b, _)| compare_versions(b, a));
    versions.into_iter().map(|(_, dir)| dir.join(AAPT)).find(|aapt| aapt.is_file())
}

/// Compares build-tools directory names such as `34.0.0` or `35.0.0-rc1`.
///
/// Numeric components compare numerically; a pre-release suffix sorts before
/// the plain release of the same version.
pub(crate) fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_release, a_suffix) = a.split_once('-').map_or((a, None), |(r, s)| (r, Some(s)));
    let (b_release, b_suffix) = b.split_once('-').map_or((b, None), |(r, s)| (r, Some(s)));
    let numbers = |release: &str| -> Vec<u64> { release.split('.').map(|n| n.parse().unwrap_or(0)).collect() };
    numbers(a_release).cmp(&numbers(b_release)).then_with(|| match (a_suffix, b_suffix) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn fake_sdk(versions: &[(&str, bool)]) -> tempfile::TempDir {
        let sdk = tempfile::tempdir().unwrap();
        for (version, with_aapt) in versions {
            let dir = sdk.path().join("build-tools").join(version);
            fs::create_dir_all(&dir).unwrap();
            if *with_aapt {
                fs::write(dir.join(AAPT), b"").unwrap();
            }
        }
        sdk
    }

    #[rstest]
    #[case("34.0.0", "9.0.0", Ordering::Greater)]
    #[case("30.0.3", "30.0.10", Ordering::Less)]
    #[case("35.0.0", "35.0.0-rc1", Ordering::Greater)]
    #[case("35.0.0-rc1", "35.0.0-rc2", Ordering::Less)]
    #[case("33.0.1", "33.0.1", Ordering::Equal)]
    fn version_ordering(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare_versions(a, b), expected);
    }

    #[test]
    fn discovers_newest_build_tools() {
        let sdk = fake_sdk(&[("9.0.0", true), ("30.0.3", true), ("29.0.2", true)]);
        let aapt = Aapt::discover(Some(sdk.path())).unwrap();
        assert_eq!(aapt.path(), sdk.path().join("build-tools/30.0.3").join(AAPT));
    }

    #[test]
    fn skips_build_tools_without_aapt() {
        let sdk = fake_sdk(&[("34.0.0", false), ("33.0.2", true)]);
        let aapt = Aapt::discover(Some(sdk.path())).unwrap();
        assert_eq!(aapt.path(), sdk.path().join("build-tools/33.0.2").join(AAPT));
    }

    #[test]
    fn empty_sdk_without_path_fallback() {
        let sdk = fake_sdk(&[("34.0.0", false)]);
        let bin = tempfile::tempdir().unwrap();
        let err = Aapt::discover_in(Some(sdk.path()), &[], Some(bin.path().as_os_str())).unwrap_err();
        assert_eq!(*err, ErrorKind::AaptNotFound);
    }

    #[test]
    fn no_sdk_anywhere() {
        let bin = tempfile::tempdir().unwrap();
        let missing = bin.path().join("android-sdk");
        let err = Aapt::discover_in(None, &[missing], Some(bin.path().as_os_str())).unwrap_err();
        assert_eq!(*err, ErrorKind::AaptNotFound);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn unset_android_home_probes_default_locations(#[case] android_home: Option<&str>) {
        let sdk = fake_sdk(&[("33.0.2", true)]);
        let bin = tempfile::tempdir().unwrap();
        let locations = [bin.path().join("missing-sdk"), sdk.path().to_path_buf()];
        let aapt = Aapt::discover_in(android_home.map(Path::new), &locations, Some(bin.path().as_os_str())).unwrap();
        assert_eq!(aapt.path(), sdk.path().join("build-tools/33.0.2").join(AAPT));
    }

    #[cfg(unix)]
    mod exec {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> Aapt {
            let path = dir.join("aapt");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            Aapt::new(path)
        }

        #[test]
        fn dump_passes_arguments_and_captures_stdout() {
            let dir = tempfile::tempdir().unwrap();
            let aapt = script(dir.path(), "echo \"$1 $2 $3 $4\"");
            let out = aapt.dump_badging(Path::new("repo/apk/ext.apk")).unwrap();
            assert_eq!(out, "dump --include-meta-data badging repo/apk/ext.apk\n");
        }

        #[test]
        fn dump_reports_exit_code() {
            let dir = tempfile::tempdir().unwrap();
            let aapt = script(dir.path(), "echo 'ERROR: dump failed' >&2\nexit 3");
            let err = aapt.dump_badging(Path::new("broken.apk")).unwrap_err();
            assert_eq!(*err, ErrorKind::AaptFailed(3));
        }

        #[test]
        fn falls_back_to_search_path() {
            let sdk = fake_sdk(&[]);
            let bin = tempfile::tempdir().unwrap();
            let expected = script(bin.path(), "exit 0");
            let aapt = Aapt::discover_in(Some(sdk.path()), &[], Some(bin.path().as_os_str())).unwrap();
            assert_eq!(aapt, expected);
        }

        #[test]
        fn missing_executable_is_io() {
            let dir = tempfile::tempdir().unwrap();
            let err = Aapt::new(dir.path().join("nope")).dump_badging(Path::new("x.apk")).unwrap_err();
            assert_eq!(*err, ErrorKind::Io);
        }
    }
}
