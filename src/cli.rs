//! Command-line arguments.

use clap::{ArgAction, Parser};
use extrepo_config::Config;
use std::path::PathBuf;

/// Build `index.min.json` for a directory of extension APKs.
#[derive(Parser, Debug)]
#[command(name = "extrepo", version, about)]
#[command(after_help = concat!(
    "ENVIRONMENT:\n",
    "  ANDROID_HOME    Android SDK root used to locate build-tools/<version>/aapt\n",
    "  EXTREPO_<KEY>   Override any configuration key, e.g. EXTREPO_DEFAULT_LANG=en\n",
    "  RUST_LOG        Log filter, overrides -v/-q\n",
))]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository root containing `apk/`; icons and the manifest are written beneath it.
    #[arg(short, long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Android SDK root.
    #[arg(long, value_name = "DIR")]
    pub android_home: Option<PathBuf>,

    /// Build the manifest from file names only, without running aapt.
    #[arg(long)]
    pub fallback: bool,

    /// More log output (repeatable: -v, -vv).
    #[arg(short, long = "verbose", action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbosity: u8,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbosity) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(repo) = &self.repo {
            config.repo_dir = repo.clone();
        }
        if let Some(android_home) = &self.android_home {
            config.android_home = Some(android_home.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::parse_from(["extrepo", "--repo", "public", "--android-home", "/sdk", "-vv"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.repo_dir, PathBuf::from("public"));
        assert_eq!(config.android_home, Some(PathBuf::from("/sdk")));
        assert_eq!(cli.log_level(), "trace");
        assert!(!cli.fallback);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["extrepo", "-q", "-v"]).is_err());
        assert_eq!(Cli::parse_from(["extrepo", "-q"]).log_level(), "warn");
    }
}
