use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// File names look like `tachiyomi-vi.teamlanhlung-v1.4.26.apk`.
regex!(LANGUAGE_REGEX, r"tachiyomi-([^.]+)");
regex!(FILENAME_VERSION_REGEX, r"v(\d+\.\d+\.\d+)");

/// Extension of the package files picked up from the APK directory.
pub(crate) const APK_EXTENSION: &str = "apk";
/// Extension given to extracted icons.
pub(crate) const ICON_EXTENSION: &str = "png";
