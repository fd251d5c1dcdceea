//! Path-backed note properties and the `{name}` / `{name:fmt}` text
//! templates used by the selectors.

use crate::project::{is_resourced, relative_string};
use chrono::format::{Item as FmtItem, StrftimeItems};
use chrono::{DateTime, Local};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const RESOURCED_ICON: &str = "[+] ";
pub const DEFAULT_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_]+)(?::([^}]*))?\}").expect("static regex")
});

/// A note (or directory) inside a project, read fresh on every access.
#[derive(Debug, Clone)]
pub struct NoteInfo {
    path: PathBuf,
    root: PathBuf,
}

enum Value {
    Text(String),
    Time(Option<DateTime<Local>>),
}

impl NoteInfo {
    pub fn new(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: root.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn parent_dirname(&self) -> String {
        self.path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn absolute_path(&self) -> PathBuf {
        fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    pub fn absolute_parent_dirpath(&self) -> PathBuf {
        let abs = self.absolute_path();
        abs.parent().map(Path::to_path_buf).unwrap_or(abs)
    }

    pub fn root_relative_path(&self) -> String {
        relative_string(&self.path, &self.root)
    }

    pub fn root_relative_dirname(&self) -> String {
        let rel = self.root_relative_path();
        match rel.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => ".".to_string(),
        }
    }

    pub fn top_dirname(&self) -> String {
        let rel = self.root_relative_path();
        rel.split('/').next().unwrap_or_default().to_string()
    }

    pub fn mtime(&self) -> Option<DateTime<Local>> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Local>::from(modified))
    }

    pub fn atime(&self) -> Option<DateTime<Local>> {
        let accessed = fs::metadata(&self.path).and_then(|m| m.accessed()).ok()?;
        Some(DateTime::<Local>::from(accessed))
    }

    pub fn resourced_icon(&self) -> &'static str {
        if is_resourced(&self.path) { RESOURCED_ICON } else { "" }
    }

    fn value(&self, name: &str) -> Option<Value> {
        let text = match name {
            "title" => self.title(),
            "filename" => self.filename(),
            "parent_dirname" => self.parent_dirname(),
            "absolute_path" => self.absolute_path().display().to_string(),
            "absolute_parent_dirpath" => {
                self.absolute_parent_dirpath().display().to_string()
            }
            "root_relative_path" => self.root_relative_path(),
            "root_relative_dirname" => self.root_relative_dirname(),
            "top_dirname" => self.top_dirname(),
            "resourced_icon" => self.resourced_icon().to_string(),
            "mtime" => return Some(Value::Time(self.mtime())),
            "atime" => return Some(Value::Time(self.atime())),
            _ => return None,
        };
        Some(Value::Text(text))
    }

    /// Fill a text template. Unknown placeholders stay as written; times
    /// that cannot be read render as `?`.
    pub fn render(&self, template: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(template, |caps: &Captures| {
                let spec = caps.get(2).map(|m| m.as_str());
                match self.value(&caps[1]) {
                    Some(Value::Text(text)) => pad(&text, spec),
                    Some(Value::Time(Some(dt))) => {
                        format_time(&dt, spec.unwrap_or(DEFAULT_TIME_FMT))
                    }
                    Some(Value::Time(None)) => "?".to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// strftime with a user-supplied format; a malformed format is echoed back.
pub fn format_time(dt: &DateTime<Local>, fmt: &str) -> String {
    if StrftimeItems::new(fmt).any(|item| matches!(item, FmtItem::Error)) {
        return fmt.to_string();
    }
    dt.format(fmt).to_string()
}

/// `<N`, `>N` or `N` width specs for text placeholders.
fn pad(text: &str, spec: Option<&str>) -> String {
    let Some(spec) = spec else {
        return text.to_string();
    };
    let (right, digits) = match spec.strip_prefix('>') {
        Some(rest) => (true, rest),
        None => (false, spec.strip_prefix('<').unwrap_or(spec)),
    };
    let Ok(width) = digits.parse::<usize>() else {
        return text.to_string();
    };
    if right {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}
