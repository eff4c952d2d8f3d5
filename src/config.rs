use crate::cli;
use crate::options::{OptionError, OptionTable};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REPO: &str = "maven.google.com";
pub const DEFAULT_INDEX: &str = "master-index.xml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Everything a run needs, read from the parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub out_dir: PathBuf,
    /// Set only when `--deps` was given.
    pub deps_dir: Option<PathBuf>,
    pub repo: String,
    pub index: String,
    pub force: bool,
}

impl Settings {
    pub fn from_table(table: &OptionTable) -> Result<Self, OptionError> {
        let value = |label: &str| -> Result<String, OptionError> {
            match table.get(label) {
                Some(opt) => opt.value_at(0).map(str::to_string),
                None => Err(OptionError::OutOfRange {
                    label: label.to_string(),
                    index: 0,
                    len: 0,
                }),
            }
        };
        let bound = |label: &str| table.get(label).is_some_and(|opt| opt.is_bound());

        Ok(Self {
            out_dir: PathBuf::from(value(cli::OUT_DIR)?),
            deps_dir: if bound(cli::DEPS) {
                Some(PathBuf::from(value(cli::DEPS)?))
            } else {
                None
            },
            repo: value(cli::REPO)?,
            index: value(cli::INDEX)?,
            force: bound(cli::FORCE),
        })
    }

    /// Repository base url, with `https://` added when no scheme was given.
    pub fn repo_url(&self) -> String {
        let repo = self.repo.trim_end_matches('/');
        if repo.contains("://") {
            repo.to_string()
        } else {
            format!("https://{repo}")
        }
    }

    pub fn index_url(&self) -> String {
        format!("{}/{}", self.repo_url(), self.index.trim_start_matches('/'))
    }
}

/// Transport tuning for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    pub show_progress: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("adept/{}", env!("CARGO_PKG_VERSION")),
            show_progress: false,
        }
    }
}
