use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use extrepo_config::SourceSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A source served by an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub lang: String,
    pub id: String,
    #[serde(rename = "baseUrl")]
    pub base_url: String,
}
impl From<&SourceSpec> for Source {
    fn from(spec: &SourceSpec) -> Self {
        Self {
            name: spec.name.clone(),
            lang: spec.lang.clone(),
            id: spec.id.clone(),
            base_url: spec.base_url.clone(),
        }
    }
}

/// One manifest record, describing a single APK.
///
/// Field order is the key order of the written JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Application label.
    pub name: String,
    /// Package identifier.
    pub pkg: String,
    /// APK file name, without directory.
    pub apk: String,
    pub lang: String,
    /// Numeric version code.
    pub code: u64,
    /// Version label.
    pub version: String,
    /// `1` when the extension is flagged NSFW, otherwise `0`.
    pub nsfw: u8,
    pub sources: Vec<Source>,
}

/// The repository manifest: an ordered list of [`Extension`] records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    pub extensions: Vec<Extension>,
}

impl Index {
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn push(&mut self, extension: Extension) {
        self.extensions.push(extension);
    }

    /// Package identifiers that appear on more than one record.
    pub fn duplicate_packages(&self) -> Vec<&str> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for extension in &self.extensions {
            *counts.entry(extension.pkg.as_str()).or_default() += 1;
        }
        counts.into_iter().filter(|(_, n)| *n > 1).map(|(pkg, _)| pkg).collect()
    }

    /// Compact JSON with non-ASCII characters written verbatim.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).or_raise(|| ErrorKind::Serialize)
    }

    /// Writes the compact JSON manifest, creating missing parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
        }
        fs::write(path, self.to_json()?).or_raise(|| ErrorKind::Io)?;
        tracing::debug!(path = %path.display(), extensions = self.len(), "Manifest written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extension(pkg: &str) -> Extension {
        Extension {
            name: "Team Lạnh Lùng".to_string(),
            pkg: pkg.to_string(),
            apk: "tachiyomi-vi.teamlanhlung-v1.4.26.apk".to_string(),
            lang: "vi".to_string(),
            code: 26,
            version: "1.4.26".to_string(),
            nsfw: 1,
            sources: vec![Source {
                name: "Team Lạnh Lùng".to_string(),
                lang: "vi".to_string(),
                id: "teamlanhlung".to_string(),
                base_url: "https://teamlanhlungday.me".to_string(),
            }],
        }
    }

    #[test]
    fn json_is_compact_ordered_and_unescaped() {
        let index = Index { extensions: vec![extension("eu.kanade.tachiyomi.extension.vi.teamlanhlung")] };
        assert_eq!(
            index.to_json().unwrap(),
            r#"[{"name":"Team Lạnh Lùng","pkg":"eu.kanade.tachiyomi.extension.vi.teamlanhlung","apk":"tachiyomi-vi.teamlanhlung-v1.4.26.apk","lang":"vi","code":26,"version":"1.4.26","nsfw":1,"sources":[{"name":"Team Lạnh Lùng","lang":"vi","id":"teamlanhlung","baseUrl":"https://teamlanhlungday.me"}]}]"#
        );
    }

    #[test]
    fn empty_index_is_empty_array() {
        assert_eq!(Index::default().to_json().unwrap(), "[]");
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo").join("index.min.json");
        let index = Index { extensions: vec![extension("a")] };
        index.write_to(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, index.to_json().unwrap());
        assert_eq!(serde_json::from_str::<Index>(&written).unwrap(), index);
    }

    #[test]
    fn duplicates_are_reported_not_removed() {
        let index = Index { extensions: vec![extension("a"), extension("b"), extension("a")] };
        assert_eq!(index.duplicate_packages(), vec!["a"]);
        assert_eq!(index.len(), 3);
    }
}
