//! Browsable-URL resolution for license files.
//!
//! Prefers the metadata of the enclosing git working tree (each configured
//! remote tried in order, every failure message preserved); falls back to
//! deriving host/user/project from the library's canonical name. All
//! resolution is local string and filesystem work, never network I/O.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::library::Library;

/// Browsable-file path templates per hosting provider. An unknown host is
/// a resolution error the caller downgrades to an empty URL.
const REPO_PATH_TEMPLATES: &[(&str, &str)] = &[
    ("github.com", "blob/master"),
    ("gitlab.com", "-/blob/master"),
    ("bitbucket.org", "src/master"),
];

#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("unable to read git config at {path}: {source}")]
    Config {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("remote {0:?} is not configured")]
    NoRemote(String),

    #[error("cannot parse remote url {0:?}")]
    UnparseableRemote(String),

    #[error("unsupported host {host:?} for {name:?}")]
    UnsupportedHost { host: String, name: String },

    #[error("cannot determine URL for {0:?} package")]
    InsufficientName(String),

    #[error("{path} is not inside the working tree {root}")]
    OutsideWorkTree { path: String, root: String },

    #[error("failed to find license URL: {}", .0.join("; "))]
    AllRemotesFailed(Vec<String>),
}

/// `{host, user, project}` parsed from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub host: String,
    pub user: String,
    pub project: String,
}

/// A git working tree located on disk.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Walk upward from `path` until a directory containing `.git` is
    /// found. `None` means the path is not in a working tree (a module
    /// cache or vendored copy).
    pub fn discover(path: &Path) -> Option<Self> {
        let start = if path.is_dir() { path } else { path.parent()? };
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir.join(".git").exists() {
                return Some(Self {
                    root: dir.to_path_buf(),
                });
            }
            current = dir.parent();
        }
        None
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configured URL of the named remote.
    pub fn remote_url(&self, remote: &str) -> Result<String, VcsError> {
        let config_path = self.root.join(".git").join("config");
        let config = std::fs::read_to_string(&config_path).map_err(|source| VcsError::Config {
            path: config_path,
            source,
        })?;
        parse_remotes(&config)
            .remove(remote)
            .ok_or_else(|| VcsError::NoRemote(remote.to_string()))
    }

    /// Browsable URL for `file` through the named remote.
    pub fn file_url(&self, file: &Path, remote: &str) -> Result<String, VcsError> {
        let url = self.remote_url(remote)?;
        let info = parse_remote(&url).ok_or(VcsError::UnparseableRemote(url))?;
        let template = host_template(&info.host).ok_or_else(|| VcsError::UnsupportedHost {
            host: info.host.clone(),
            name: remote.to_string(),
        })?;
        let rel = file
            .strip_prefix(&self.root)
            .map_err(|_| VcsError::OutsideWorkTree {
                path: file.display().to_string(),
                root: self.root.display().to_string(),
            })?;
        Ok(format!(
            "https://{}/{}/{}/{}/{}",
            info.host,
            info.user,
            info.project,
            template,
            rel.display()
        ))
    }
}

/// Resolve the browsable URL for a library's license file: working-tree
/// remotes first (in order, first success wins, all failures aggregated),
/// then the library-name fallback.
pub fn resolve_license_url(
    lib: &Library,
    license_path: &Path,
    remotes: &[String],
) -> Result<String, VcsError> {
    match GitRepo::discover(license_path) {
        Some(repo) => {
            let mut failures = Vec::new();
            for remote in remotes {
                match repo.file_url(license_path, remote) {
                    Ok(url) => return Ok(url),
                    Err(err) => failures.push(err.to_string()),
                }
            }
            Err(VcsError::AllRemotesFailed(failures))
        }
        None => name_derived_url(lib, license_path),
    }
}

/// Derive a URL from the library's canonical name alone: the first three
/// `/`-segments are host, user and project; a fourth, if present, is an
/// in-repo subpath.
fn name_derived_url(lib: &Library, license_path: &Path) -> Result<String, VcsError> {
    let name = lib.name();
    let parts: Vec<&str> = name.splitn(4, '/').collect();
    if parts.len() < 3 {
        return Err(VcsError::InsufficientName(name));
    }
    let (host, user, project) = (parts[0], parts[1], parts[2]);
    let template = host_template(host).ok_or_else(|| VcsError::UnsupportedHost {
        host: host.to_string(),
        name: name.clone(),
    })?;

    let file_name = license_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut path = format!("{user}/{project}/{template}");
    if let Some(subpath) = parts.get(3) {
        path.push('/');
        path.push_str(subpath);
    }
    Ok(format!("https://{host}/{path}/{file_name}"))
}

fn host_template(host: &str) -> Option<&'static str> {
    REPO_PATH_TEMPLATES
        .iter()
        .find(|(h, _)| *h == host)
        .map(|(_, t)| *t)
}

/// Extract `{host, user, project}` from https/git/ssh/scp-style remote
/// URLs. Trailing `.git` and embedded credentials/ports are stripped.
pub fn parse_remote(url: &str) -> Option<RemoteInfo> {
    let trimmed = url.trim();

    let host_and_path = if let Some(rest) = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .or_else(|| trimmed.strip_prefix("git://"))
        .or_else(|| trimmed.strip_prefix("ssh://"))
    {
        let rest = rest.rsplit_once('@').map(|(_, h)| h).unwrap_or(rest);
        rest.to_string()
    } else if let Some((prefix, path)) = trimmed.split_once(':') {
        // scp-like syntax: [user@]host:user/project.git
        if prefix.contains('/') {
            return None;
        }
        let host = prefix.rsplit_once('@').map(|(_, h)| h).unwrap_or(prefix);
        format!("{host}/{path}")
    } else {
        return None;
    };

    let mut segments = host_and_path.split('/').filter(|s| !s.is_empty());
    let host = segments.next()?.split(':').next()?.to_string();
    let user = segments.next()?.to_string();
    let project = segments.next()?;
    let project = project.strip_suffix(".git").unwrap_or(project).to_string();
    if host.is_empty() || user.is_empty() || project.is_empty() {
        return None;
    }
    Some(RemoteInfo {
        host,
        user,
        project,
    })
}

fn parse_remotes(config: &str) -> HashMap<String, String> {
    let mut remotes = HashMap::new();
    let mut current: Option<String> = None;

    for line in config.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            current = line
                .strip_prefix("[remote \"")
                .and_then(|rest| rest.strip_suffix("\"]"))
                .map(str::to_string);
        } else if let Some(name) = &current {
            if let Some(rest) = line.strip_prefix("url") {
                if let Some(value) = rest.trim_start().strip_prefix('=') {
                    remotes.insert(name.clone(), value.trim().to_string());
                }
            }
        }
    }
    remotes
}
