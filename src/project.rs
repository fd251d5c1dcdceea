//! Note collection: the directory tree under a `.loli` root.

use crate::config::{LoliConfig, PROJECT_DIR_NAME};
use crate::error::{LoliError, Result};
use log::warn;
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Always ignored, whatever the settings say.
const LOLI_DIR_PATTERN: &str = r"^\.loli($|/)";

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    ignores: Vec<Regex>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, patterns: &[String]) -> Result<Self> {
        let mut ignores = Vec::new();
        for pattern in patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty())
        {
            ignores.push(Regex::new(pattern)?);
        }
        ignores.push(Regex::new(LOLI_DIR_PATTERN)?);
        Ok(Self {
            root: root.into(),
            ignores,
        })
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &LoliConfig) -> Result<Self> {
        Self::new(root, &config.project.ignore_patterns)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Match ignore patterns against the `/`-joined root-relative path.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let rel = relative_string(path, &self.root);
        self.ignores.iter().any(|re| re.is_match(&rel))
    }

    fn walk(&self) -> impl Iterator<Item = walkdir::DirEntry> + '_ {
        WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(move |entry| !self.is_ignored(entry.path()))
    }

    pub fn md_paths(&self) -> Vec<PathBuf> {
        self.walk()
            .filter(|e| e.file_type().is_file() && is_md(e.path()))
            .map(|e| e.into_path())
            .collect()
    }

    pub fn dir_paths(&self) -> Vec<PathBuf> {
        self.walk()
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.into_path())
            .collect()
    }
}

pub fn is_md(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("md")
}

/// A resourced note is the only markdown file in its directory subtree and
/// shares its directory with at least one other file.
pub fn is_resourced(note: &Path) -> bool {
    let Some(dir) = note.parent() else {
        return false;
    };
    if !note.is_file() {
        return false;
    }
    let lone_note = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_md(e.path()))
        .all(|e| e.path() == note);
    if !lone_note {
        return false;
    }
    fs::read_dir(dir)
        .map(|entries| {
            entries.filter_map(|e| e.ok()).any(|e| {
                e.path() != note && e.file_type().map(|t| t.is_file()).unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

/// Every file under the note's directory except the note itself.
pub fn resource_paths(note: &Path) -> Vec<PathBuf> {
    let Some(dir) = note.parent() else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.path() != note)
        .map(|e| e.into_path())
        .collect();
    paths.sort();
    paths
}

pub fn modified(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Newest first.
pub fn sort_by_mtime_desc(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| std::cmp::Reverse(modified(p)));
}

pub fn relative_string(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve the project root: `LOLI_ROOT`, then the nearest ancestor of
/// `start` holding a `.loli` directory, then `user.default_project_dir`.
pub fn locate_root(start: &Path, config: &LoliConfig) -> Option<PathBuf> {
    if let Ok(dir) = env::var("LOLI_ROOT") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    find_root(start, &config.user.default_project_dir)
}

pub fn find_root(start: &Path, default_project_dir: &str) -> Option<PathBuf> {
    if let Some(found) = start
        .ancestors()
        .find(|dir| dir.join(PROJECT_DIR_NAME).is_dir())
    {
        return Some(found.to_path_buf());
    }
    let fallback = expand_home(default_project_dir.trim())?;
    fallback.is_dir().then_some(fallback)
}

fn expand_home(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None if raw == "~" => dirs::home_dir(),
        None => Some(PathBuf::from(raw)),
    }
}

pub fn require_root(start: &Path, config: &LoliConfig) -> Result<PathBuf> {
    locate_root(start, config).ok_or(LoliError::NoProject)
}
