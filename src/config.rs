//! Layered lolikit settings.
//!
//! Settings merge from the built-in defaults, the user's `~/.lolikitrc.toml`
//! and the project's `.loli/lolikitrc.toml`, later layers winning. Missing
//! files are skipped.

use crate::error::Result;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const USER_RC_NAME: &str = ".lolikitrc.toml";
pub const PROJECT_DIR_NAME: &str = ".loli";
pub const PROJECT_RC_NAME: &str = "lolikitrc.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineMode {
    Posix,
    Windows,
    Mac,
}

impl NewlineMode {
    pub fn platform() -> Self {
        if cfg!(windows) { NewlineMode::Windows } else { NewlineMode::Posix }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NewlineMode::Posix => "\n",
            NewlineMode::Windows => "\r\n",
            NewlineMode::Mac => "\r",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NewlineMode::Posix => "posix",
            NewlineMode::Windows => "windows",
            NewlineMode::Mac => "mac",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSection {
    /// Project used when the working directory is outside any loli tree.
    pub default_project_dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Regexes matched against root-relative paths.
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSection {
    pub editor: String,
    pub file_browser: String,
    pub reverse: bool,
    pub page_size: usize,
    pub list_format: String,
    pub list_dir_format: String,
}

impl Default for SelectorSection {
    fn default() -> Self {
        Self {
            editor: platform_opener().to_string(),
            file_browser: platform_opener().to_string(),
            reverse: false,
            page_size: 10,
            list_format: "[{mtime:%m/%d %H:%M}] {resourced_icon}{title}"
                .to_string(),
            list_dir_format: "[{mtime:%m/%d %H:%M}] {root_relative_path}/"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixSection {
    pub danger_pathname_chars: String,
    pub danger_pathname_chars_fix_to: String,
    pub newline_mode: NewlineMode,
    /// Notes smaller than this many bytes are checked for blank content.
    pub small_size: u64,
}

impl Default for FixSection {
    fn default() -> Self {
        Self {
            danger_pathname_chars: "\\/:\"*?<>|".to_string(),
            danger_pathname_chars_fix_to: "=".to_string(),
            newline_mode: NewlineMode::platform(),
            small_size: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoliConfig {
    pub user: UserSection,
    pub project: ProjectSection,
    pub selector: SelectorSection,
    pub fix: FixSection,
}

impl LoliConfig {
    /// Merge defaults, the user rc and (when `root` is known) the project rc.
    pub fn load(root: Option<&Path>) -> Result<Self> {
        let mut files = Vec::new();
        if let Some(path) = user_rc_path() {
            files.push(path);
        }
        if let Some(root) = root {
            files.push(project_rc_path(root));
        }
        Self::load_from(&files)
    }

    /// Merge defaults with `files` in order; absent files are ignored.
    pub fn load_from(files: &[PathBuf]) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&Self::default())?);
        for path in files {
            log::debug!("config layer {}", path.display());
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Default settings with every line commented out, for fresh rc files.
    pub fn commented_defaults() -> Result<String> {
        let body = Self::default()
            .to_toml()?
            .lines()
            .map(|line| {
                if line.is_empty() { String::new() } else { format!("# {line}") }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("# See \"loli help --config\" for more detail\n\n{body}\n"))
    }
}

pub fn platform_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "start"
    } else {
        "xdg-open"
    }
}

pub fn user_rc_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(USER_RC_NAME))
}

pub fn project_rc_path(root: &Path) -> PathBuf {
    root.join(PROJECT_DIR_NAME).join(PROJECT_RC_NAME)
}
