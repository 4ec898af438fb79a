use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Applied to the `package: ` line only.
regex!(PACKAGE_NAME_REGEX, r"package: name='([^']+)'");
regex!(VERSION_CODE_REGEX, r"versionCode='([^']+)'");
regex!(VERSION_NAME_REGEX, r"versionName='([^']+)'");
// Applied to the whole dump.
regex!(IS_NSFW_REGEX, r"'tachiyomi.extension.nsfw' value='([^']+)'");
regex!(APPLICATION_LABEL_REGEX, r"(?m)^application-label:'([^']+)'");
regex!(APPLICATION_ICON_320_REGEX, r"(?m)^application-icon-320:'([^']+)'");
regex!(APPLICATION_ICON_REGEX, r"(?m)^application-icon-(\d+):'([^']+)'");

/// Prefix of the badging line carrying package name and versions.
pub(crate) const PACKAGE_LINE_PREFIX: &str = "package: ";
