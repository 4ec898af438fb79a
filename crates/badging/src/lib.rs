//! Package metadata via the Android SDK's `aapt`.
//!
//! [`Aapt::discover`] finds the tool, [`Dumper::dump_badging`] runs
//! `aapt dump --include-meta-data badging`, and [`Badging::parse`] picks the
//! fields a repository index needs out of the report.

mod aapt;
mod badging;
mod consts;
pub mod error;

pub use crate::aapt::{Aapt, Dumper};
pub use crate::badging::Badging;
use crate::error::Result;
use std::path::Path;

/// Dumps and parses the badging of a single APK.
pub fn read<D: Dumper + ?Sized>(dumper: &D, apk: &Path) -> Result<Badging> {
    Badging::parse(&dumper.dump_badging(apk)?)
}
