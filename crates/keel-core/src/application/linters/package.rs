use tracing::instrument;
use url::Url;

use crate::application::ports::Filesystem;
use crate::domain::{LintingIssue, Package};

/// Checks that a package reference can be resolved at all.
pub struct PackageLinter<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> PackageLinter<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    #[instrument(skip_all, fields(package = %package.identity()))]
    pub fn lint(&self, package: &Package) -> Vec<LintingIssue> {
        match package {
            Package::Local { path } if !self.fs.exists(path) => {
                vec![LintingIssue::error(format!(
                    "Package with local path ({}) does not exist.",
                    path.display()
                ))]
            }
            Package::Remote { url, .. } if !is_resolvable(url) => {
                vec![LintingIssue::error(format!(
                    "Invalid URL for Swift Package: {url}"
                ))]
            }
            _ => Vec::new(),
        }
    }
}

/// An absolute URL with a host, e.g. `https://github.com/org/repo`, or an
/// scp-style SSH remote such as `git@github.com:org/repo.git`.
fn is_resolvable(url: &str) -> bool {
    let has_host = |candidate: &str| Url::parse(candidate).is_ok_and(|u| u.has_host());
    has_host(url) || scp_remote_as_url(url).is_some_and(|ssh| has_host(&ssh))
}

/// Rewrites `user@host:path` to `ssh://user@host/path`.
fn scp_remote_as_url(remote: &str) -> Option<String> {
    if remote.contains("://") || remote.contains(char::is_whitespace) {
        return None;
    }
    let (authority, path) = remote.split_once(':')?;
    let (user, host) = authority.split_once('@')?;
    if user.is_empty() || host.is_empty() || path.is_empty() {
        return None;
    }
    Some(format!("ssh://{authority}/{}", path.trim_start_matches('/')))
}
