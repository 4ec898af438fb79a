use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::instrument;

/// Copies the zip entry `entry` out of `apk` into `dest`.
///
/// The entry is read completely before `dest` is created, so a failed
/// extraction never leaves a truncated icon behind.
#[instrument(skip_all, fields(apk = %apk.display(), entry = entry))]
pub fn extract_icon(apk: &Path, entry: &str, dest: &Path) -> Result<()> {
    let file = File::open(apk).or_raise(|| ErrorKind::Io)?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file)).or_raise(|| ErrorKind::Archive)?;
    let name = entry.trim_start_matches("./").trim_start_matches('/');
    let mut icon = zip.by_name(name).or_raise(|| ErrorKind::IconNotFound(entry.to_string()))?;
    let mut bytes = Vec::with_capacity(usize::try_from(icon.size()).unwrap_or_default());
    icon.read_to_end(&mut bytes).or_raise(|| ErrorKind::Archive)?;
    std::fs::write(dest, &bytes).or_raise(|| ErrorKind::Io)?;
    tracing::trace!(dest = %dest.display(), size = bytes.len(), "Icon extracted");
    Ok(())
}
