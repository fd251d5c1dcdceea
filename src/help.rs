//! Long-form help: the note ruleset and the settings guide.

use crate::config::{LoliConfig, PROJECT_DIR_NAME, PROJECT_RC_NAME, USER_RC_NAME};
use crate::error::Result;

pub const RULES: &str = "\
# Loli's Rules #

1. One note. One file. Every notes are INDEPENDENTLY.
2. Note files are MARKDOWN format.
3. Note's filename equiv to \"title + .md\".
4. All notes in a multi-level directory tree.
5. Note's order is the filename string order.
6. Root folder should have a directory which be named as \".loli\".
7. Note content must encoding as \"utf8\".";

#[derive(Clone, Copy)]
pub(crate) struct SettingTopic<'a> {
    pub section: &'a str,
    pub name: &'a str,
    pub details: &'a [&'a str],
    pub examples: &'a [&'a str],
}

pub(crate) const SETTINGS: &[SettingTopic<'static>] = &[
    SettingTopic {
        section: "user",
        name: "default_project_dir",
        details: &[
            "Project used when the current directory is not inside any loli",
            "project. Leave it blank to disable. Only meaningful in the user file.",
        ],
        examples: &["\"~/.notes\""],
    },
    SettingTopic {
        section: "project",
        name: "ignore_patterns",
        details: &[
            "Regex patterns of paths (relative to the project root) lolikit",
            "should skip. \"^\\.loli\" is always appended and cannot be removed.",
        ],
        examples: &["[\"\\\\.swp$\", \"~$\"]"],
    },
    SettingTopic {
        section: "selector",
        name: "editor",
        details: &[
            "Program used to open notes. \"{path}\" marks where the note path",
            "goes; without it the path is appended.",
        ],
        examples: &["\"vim\"", "\"gedit \\\"{path}\\\"\""],
    },
    SettingTopic {
        section: "selector",
        name: "file_browser",
        details: &["Program used to open note folders."],
        examples: &["\"nautilus\"", "\"ranger {path}\""],
    },
    SettingTopic {
        section: "selector",
        name: "reverse",
        details: &["Show each page bottom-up (page info on top)."],
        examples: &[],
    },
    SettingTopic {
        section: "selector",
        name: "page_size",
        details: &["How many items one page shows."],
        examples: &[],
    },
    SettingTopic {
        section: "selector",
        name: "list_format",
        details: &[
            "Line format of \"list\". Fields: title, filename, parent_dirname,",
            "absolute_path, root_relative_path, root_relative_dirname,",
            "top_dirname, resourced_icon, mtime, atime (e.g. {mtime:%m/%d}).",
        ],
        examples: &[],
    },
    SettingTopic {
        section: "selector",
        name: "list_dir_format",
        details: &["Line format of \"list --dir\". Same fields as list_format."],
        examples: &[],
    },
    SettingTopic {
        section: "fix",
        name: "danger_pathname_chars",
        details: &["Characters treated as unsafe in path names."],
        examples: &[],
    },
    SettingTopic {
        section: "fix",
        name: "danger_pathname_chars_fix_to",
        details: &["Replacement for unsafe characters when fixing."],
        examples: &[],
    },
    SettingTopic {
        section: "fix",
        name: "newline_mode",
        details: &["Newline style notes should use: posix, windows or mac."],
        examples: &[],
    },
    SettingTopic {
        section: "fix",
        name: "small_size",
        details: &["Notes smaller than this (bytes) are checked for being empty."],
        examples: &[],
    },
];

fn lookup(table: &toml::Value, section: &str, name: &str) -> String {
    table
        .get(section)
        .and_then(|s| s.get(name))
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(unset)".to_string())
}

/// Settings guide with the default and current value of every key.
pub fn config_guide(current: &LoliConfig) -> Result<String> {
    let default = toml::Value::try_from(LoliConfig::default())?;
    let current = toml::Value::try_from(current)?;

    let mut out = String::new();
    out.push_str("# Lolikit Configuration #\n\n");
    out.push_str("Settings merge from three levels, later ones winning:\n\n");
    out.push_str("- default - built into lolikit\n");
    out.push_str(&format!("- user    - \"~/{USER_RC_NAME}\"\n"));
    out.push_str(&format!(
        "- project - \"<project>/{PROJECT_DIR_NAME}/{PROJECT_RC_NAME}\"\n\n"
    ));
    out.push_str("Files are TOML, for example:\n\n");
    out.push_str("    [selector]\n    reverse = true\n    editor = \"vim\"\n\n");

    let mut section = "";
    for topic in SETTINGS {
        if topic.section != section {
            section = topic.section;
            out.push_str(&format!("## [{section}] ##\n\n"));
        }
        out.push_str(&format!("### {} ###\n\n", topic.name));
        for line in topic.details {
            out.push_str(line);
            out.push('\n');
        }
        if !topic.examples.is_empty() {
            out.push_str("\nexample:\n");
            for example in topic.examples {
                out.push_str(&format!("    {} = {example}\n", topic.name));
            }
        }
        out.push_str(&format!(
            "\n- default: {}\n- current: {}\n\n",
            lookup(&default, topic.section, topic.name),
            lookup(&current, topic.section, topic.name)
        ));
    }
    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_setting_has_a_default() {
        let guide = config_guide(&LoliConfig::default()).unwrap();
        assert!(!guide.contains("(unset)"));
        for topic in SETTINGS {
            assert!(guide.contains(&format!("### {} ###", topic.name)));
        }
    }

    #[test]
    fn test_guide_shows_current_value() {
        let mut cfg = LoliConfig::default();
        cfg.selector.page_size = 25;
        let guide = config_guide(&cfg).unwrap();
        assert!(guide.contains("- default: 10\n- current: 25"));
    }

    #[test]
    fn test_rules_mention_loli_dir() {
        assert!(RULES.contains(".loli"));
        assert_eq!(RULES.lines().filter(|l| l.starts_with(char::is_numeric)).count(), 7);
    }
}
