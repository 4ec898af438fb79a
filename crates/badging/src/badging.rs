use crate::consts::*;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use regex::Regex;

/// Package metadata read from an `aapt dump badging` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badging {
    pub package_name: String,
    pub version_code: u64,
    pub version_name: String,
    /// The `application-label` line.
    pub label: String,
    pub nsfw: bool,
    /// Path of the launcher icon inside the APK, preferring the 320dpi rendition.
    pub icon: Option<String>,
}

impl Badging {
    /// Parses a badging dump.
    ///
    /// Package name, version code, version name and label are required. The
    /// NSFW flag defaults to `false` when the extension does not declare it.
    pub fn parse(dump: &str) -> Result<Self> {
        let package_line = dump
            .lines()
            .find(|line| line.starts_with(PACKAGE_LINE_PREFIX))
            .ok_or_raise(|| ErrorKind::MissingField("package"))?;
        let package_name = capture(&PACKAGE_NAME_REGEX, package_line).ok_or_raise(|| ErrorKind::MissingField("name"))?;
        let version_code = capture(&VERSION_CODE_REGEX, package_line)
            .ok_or_raise(|| ErrorKind::MissingField("versionCode"))?;
        let version_name = capture(&VERSION_NAME_REGEX, package_line)
            .ok_or_raise(|| ErrorKind::MissingField("versionName"))?;
        let label = capture(&APPLICATION_LABEL_REGEX, dump).ok_or_raise(|| ErrorKind::MissingField("label"))?;

        let version_code = version_code.parse::<u64>().or_raise(|| ErrorKind::ParseError {
            field: "versionCode",
            value: version_code.to_string(),
        })?;
        let nsfw = match capture(&IS_NSFW_REGEX, dump) {
            None | Some("0") => false,
            Some("1") => true,
            Some(other) => exn::bail!(ErrorKind::ParseError { field: "nsfw", value: other.to_string() }),
        };

        Ok(Self {
            package_name: package_name.to_string(),
            version_code,
            version_name: version_name.to_string(),
            label: label.to_string(),
            nsfw,
            icon: icon_path(dump).map(str::to_string),
        })
    }
}

fn capture<'a>(regex: &Regex, haystack: &'a str) -> Option<&'a str> {
    regex.captures(haystack).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// The 320dpi icon if declared, otherwise the densest one listed.
fn icon_path(dump: &str) -> Option<&str> {
    if let Some(icon) = capture(&APPLICATION_ICON_320_REGEX, dump) {
        return Some(icon);
    }
    APPLICATION_ICON_REGEX
        .captures_iter(dump)
        .filter_map(|c| {
            let density = c.get(1)?.as_str().parse::<u32>().ok()?;
            Some((density, c.get(2)?.as_str()))
        })
        .max_by_key(|(density, _)| *density)
        .map(|(_, path)| path)
}
