//! Detect and repair project defects: non-UTF-8 notes, empty notes and
//! directories, unsafe path names and inconsistent newlines.

use crate::config::{FixSection, NewlineMode};
use crate::error::Result;
use crate::formatting::FormatContext;
use crate::project::Project;
use dialoguer::Confirm;
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct FixOptions {
    pub verbose: bool,
    pub resolve: bool,
    pub always_yes: bool,
}

pub fn encoding_error_paths(project: &Project) -> Vec<PathBuf> {
    project
        .md_paths()
        .into_iter()
        .filter(|path| match fs::read(path) {
            Ok(bytes) => std::str::from_utf8(&bytes).is_err(),
            Err(_) => false,
        })
        .collect()
}

/// Notes below `small_size` bytes whose content is only whitespace.
pub fn empty_note_paths(project: &Project, small_size: u64) -> Vec<PathBuf> {
    project
        .md_paths()
        .into_iter()
        .filter(|path| {
            let small = fs::metadata(path).map(|m| m.len() < small_size).unwrap_or(false);
            small
                && fs::read_to_string(path)
                    .map(|content| content.trim().is_empty())
                    .unwrap_or(false)
        })
        .collect()
}

pub fn empty_dir_paths(project: &Project) -> Vec<PathBuf> {
    project
        .dir_paths()
        .into_iter()
        .filter(|dir| {
            fs::read_dir(dir)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false)
        })
        .collect()
}

pub fn has_danger_chars(name: &str, danger_chars: &str) -> bool {
    name.chars().any(|c| danger_chars.contains(c))
}

pub fn danger_paths(project: &Project, danger_chars: &str) -> Vec<PathBuf> {
    project
        .dir_paths()
        .into_iter()
        .chain(project.md_paths())
        .filter(|path| {
            path.file_name()
                .map(|name| has_danger_chars(&name.to_string_lossy(), danger_chars))
                .unwrap_or(false)
        })
        .collect()
}

pub fn safe_name(name: &str, danger_chars: &str, fix_to: &str) -> String {
    name.chars()
        .map(|c| if danger_chars.contains(c) { fix_to.to_string() } else { c.to_string() })
        .collect()
}

/// First newline style found in `content`; `None` when there is no newline.
pub fn detect_newline(content: &str) -> Option<NewlineMode> {
    if content.contains("\r\n") {
        Some(NewlineMode::Windows)
    } else if content.contains('\r') {
        Some(NewlineMode::Mac)
    } else if content.contains('\n') {
        Some(NewlineMode::Posix)
    } else {
        None
    }
}

/// Rewrite every newline (any style) as `to`.
pub fn convert_newlines(content: &str, to: NewlineMode) -> String {
    content
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', to.as_str())
}

pub fn inconsistent_newline_paths(project: &Project, want: NewlineMode) -> Vec<PathBuf> {
    project
        .md_paths()
        .into_iter()
        .filter(|path| {
            fs::read_to_string(path)
                .ok()
                .and_then(|content| detect_newline(&content))
                .is_some_and(|mode| mode != want)
        })
        .collect()
}

pub struct Fixer<'a> {
    project: &'a Project,
    settings: &'a FixSection,
    options: FixOptions,
    fmt: FormatContext,
}

impl<'a> Fixer<'a> {
    pub fn new(project: &'a Project, settings: &'a FixSection, options: FixOptions) -> Self {
        Self {
            project,
            settings,
            options,
            fmt: FormatContext::from_env(),
        }
    }

    pub fn with_format(mut self, fmt: FormatContext) -> Self {
        self.fmt = fmt;
        self
    }

    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let bad_encoding = encoding_error_paths(self.project);
        if !bad_encoding.is_empty() {
            writeln!(
                out,
                "{} Following files are *NOT* encoding as utf8.\n\
                 You should fix it manually as soon as possible before doing anything else.\n",
                self.fmt.format_alert("ALERT:")
            )?;
            for path in bad_encoding {
                writeln!(out, "{}", path.display())?;
            }
            return Ok(());
        }

        let paths = empty_note_paths(self.project, self.settings.small_size);
        self.deal(
            out,
            paths,
            "Empty notes",
            "remove empty notes?",
            Self::remove_paths,
        )?;

        let paths = empty_dir_paths(self.project);
        self.deal(
            out,
            paths,
            "Empty directories",
            "remove empty directories?",
            Self::remove_paths,
        )?;

        let paths = danger_paths(self.project, &self.settings.danger_pathname_chars);
        self.deal(
            out,
            paths,
            "Pathname has danger chars",
            "Rename those pathnames?",
            Self::rename_paths,
        )?;

        let want = self.settings.newline_mode;
        let paths = inconsistent_newline_paths(self.project, want);
        let detected = format!("Newline mode inconsistent (setting is \"{}\")", want.name());
        self.deal(out, paths, &detected, "Change newline mode of files?", Self::rewrite_newlines)
    }

    fn deal(
        &self,
        out: &mut dyn Write,
        mut paths: Vec<PathBuf>,
        detected: &str,
        confirm: &str,
        resolve: fn(&Self, &[PathBuf], &mut dyn Write) -> Result<()>,
    ) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        writeln!(out, "{} {detected}: {}", self.fmt.format_header("[DETECTED]"), paths.len())?;
        // children before parents, so renames and removals do not orphan each other
        paths.sort_by(|a, b| b.cmp(a));
        if self.options.verbose {
            writeln!(out, "  include:")?;
            for path in &paths {
                writeln!(out, "    \"{}\"", self.fmt.format_path(&path.display().to_string()))?;
            }
            writeln!(out)?;
        }
        if self.options.resolve && (self.options.always_yes || self.confirm(confirm)?) {
            resolve(self, &paths, out)?;
        }
        Ok(())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }

    fn resolved(&self, out: &mut dyn Write, what: &str, count: usize) -> Result<()> {
        writeln!(out, "\n  {} {what}: {count}", self.fmt.format_ok("[RESOLVED]"))?;
        Ok(())
    }

    fn remove_paths(&self, paths: &[PathBuf], out: &mut dyn Write) -> Result<()> {
        writeln!(out, "  deleting...")?;
        let mut count = 0;
        for path in paths {
            if path.is_file() {
                fs::remove_file(path)?;
            } else if path.is_dir() {
                fs::remove_dir_all(path)?;
            } else {
                continue;
            }
            info!("removed {}", path.display());
            if self.options.verbose {
                writeln!(out, "    \"{}\"", path.display())?;
            }
            count += 1;
        }
        self.resolved(out, "Deleted", count)
    }

    fn rename_paths(&self, paths: &[PathBuf], out: &mut dyn Write) -> Result<()> {
        writeln!(out, "  renaming...")?;
        let mut count = 0;
        for path in paths {
            match rename_danger_path(
                path,
                &self.settings.danger_pathname_chars,
                &self.settings.danger_pathname_chars_fix_to,
            )? {
                Some(new_path) => {
                    info!("renamed {} -> {}", path.display(), new_path.display());
                    if self.options.verbose {
                        let new_name = new_path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        writeln!(out, "    \"{}\"  >>  \"{new_name}\"", path.display())?;
                    }
                    count += 1;
                }
                None => {
                    writeln!(
                        out,
                        "    {} \"{}\" be occupied!",
                        self.fmt.format_alert("[ABORT]:"),
                        safe_target(
                            path,
                            &self.settings.danger_pathname_chars,
                            &self.settings.danger_pathname_chars_fix_to
                        )
                        .display()
                    )?;
                }
            }
        }
        self.resolved(out, "Renamed", count)
    }

    fn rewrite_newlines(&self, paths: &[PathBuf], out: &mut dyn Write) -> Result<()> {
        writeln!(out, "  changing newline...")?;
        let want = self.settings.newline_mode;
        let mut count = 0;
        for path in paths {
            let content = fs::read_to_string(path)?;
            fs::write(path, convert_newlines(&content, want))?;
            info!("rewrote newlines of {} as {}", path.display(), want.name());
            if self.options.verbose {
                writeln!(out, "    \"{}\"", path.display())?;
            }
            count += 1;
        }
        self.resolved(out, "Changed files", count)
    }
}

fn safe_target(path: &Path, danger_chars: &str, fix_to: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(safe_name(&name, danger_chars, fix_to))
}

/// Rename to the safe name; `None` when that name is already taken.
pub fn rename_danger_path(
    path: &Path,
    danger_chars: &str,
    fix_to: &str,
) -> Result<Option<PathBuf>> {
    let target = safe_target(path, danger_chars, fix_to);
    if target.exists() {
        return Ok(None);
    }
    fs::rename(path, &target)?;
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn project(root: &Path) -> Project {
        fs::create_dir_all(root.join(".loli")).unwrap();
        Project::new(root, &[]).unwrap()
    }

    fn run_fix(project: &Project, settings: &FixSection, options: FixOptions) -> String {
        let mut out = Vec::new();
        Fixer::new(project, settings, options)
            .with_format(FormatContext::new(false))
            .run(&mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn settings() -> FixSection {
        FixSection {
            newline_mode: NewlineMode::Posix,
            ..FixSection::default()
        }
    }

    #[test]
    fn test_detect_newline() {
        assert_eq!(detect_newline("a\r\nb"), Some(NewlineMode::Windows));
        assert_eq!(detect_newline("a\rb"), Some(NewlineMode::Mac));
        assert_eq!(detect_newline("a\nb"), Some(NewlineMode::Posix));
        assert_eq!(detect_newline("ab"), None);
    }

    #[test]
    fn test_convert_newlines() {
        assert_eq!(convert_newlines("a\r\nb\rc\n", NewlineMode::Posix), "a\nb\nc\n");
        assert_eq!(convert_newlines("a\nb", NewlineMode::Windows), "a\r\nb");
    }

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name("a:b?c.md", "\\/:\"*?<>|", "="), "a=b=c.md");
        assert!(!has_danger_chars("fine.md", ":?"));
    }

    #[cfg(unix)]
    #[test]
    fn test_detection_only_reports() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let project = project(root);
        fs::write(root.join("blank.md"), " ").unwrap();
        fs::write(root.join("what?.md"), "hello").unwrap();
        fs::write(root.join("dos.md"), "a\r\nb\r\n").unwrap();
        fs::create_dir_all(root.join("hollow")).unwrap();

        let out = run_fix(&project, &settings(), FixOptions::default());
        assert!(out.contains("[DETECTED] Empty notes: 1"));
        assert!(out.contains("[DETECTED] Empty directories: 1"));
        assert!(out.contains("[DETECTED] Pathname has danger chars: 1"));
        assert!(out.contains("[DETECTED] Newline mode inconsistent (setting is \"posix\"): 1"));
        assert!(!out.contains("[RESOLVED]"));
        assert!(root.join("blank.md").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_everything() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let project = project(root);
        fs::write(root.join("blank.md"), "\n").unwrap();
        fs::write(root.join("what?.md"), "hello").unwrap();
        fs::write(root.join("dos.md"), "a\r\nb\r\n").unwrap();
        fs::create_dir_all(root.join("hollow")).unwrap();

        let options = FixOptions {
            verbose: true,
            resolve: true,
            always_yes: true,
        };
        let out = run_fix(&project, &settings(), options);
        assert!(out.contains("[RESOLVED] Deleted: 1"));
        assert!(out.contains("[RESOLVED] Renamed: 1"));
        assert!(out.contains("[RESOLVED] Changed files: 1"));
        assert!(!root.join("blank.md").exists());
        assert!(!root.join("hollow").exists());
        assert!(root.join("what=.md").exists());
        assert_eq!(fs::read_to_string(root.join("dos.md")).unwrap(), "a\nb\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_skips_occupied_target() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let project = project(root);
        fs::write(root.join("a:b.md"), "one").unwrap();
        fs::write(root.join("a=b.md"), "two").unwrap();

        let options = FixOptions {
            verbose: false,
            resolve: true,
            always_yes: true,
        };
        let out = run_fix(&project, &settings(), options);
        assert!(out.contains("be occupied!"));
        assert!(out.contains("[RESOLVED] Renamed: 0"));
        assert!(root.join("a:b.md").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_renames_children_before_parents() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let project = project(root);
        fs::create_dir_all(root.join("x:y")).unwrap();
        fs::write(root.join("x:y/p?q.md"), "body").unwrap();

        let options = FixOptions {
            verbose: false,
            resolve: true,
            always_yes: true,
        };
        run_fix(&project, &settings(), options);
        assert!(root.join("x=y/p=q.md").exists());
    }

    #[test]
    fn test_non_utf8_blocks_other_checks() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        let project = project(root);
        fs::write(root.join("latin1.md"), b"fo\xe9\n").unwrap();
        fs::write(root.join("blank.md"), "").unwrap();

        let options = FixOptions {
            verbose: false,
            resolve: true,
            always_yes: true,
        };
        let out = run_fix(&project, &settings(), options);
        assert!(out.contains("*NOT* encoding as utf8"));
        assert!(out.contains("latin1.md"));
        assert!(root.join("blank.md").exists());
    }
}
