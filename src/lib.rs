//! lolikit: manage a directory tree of Markdown notes from the terminal.

pub mod config;
pub mod error;
pub mod fix;
pub mod formatting;
pub mod help;
pub mod logging;
pub mod note;
pub mod noteselector;
pub mod opener;
pub mod project;
pub mod selector;

use clap::{CommandFactory, Parser, Subcommand};
use log::info;
use crate::config::{LoliConfig, PROJECT_DIR_NAME, project_rc_path, user_rc_path};
use crate::error::{LoliError, Result};
use crate::fix::{FixOptions, Fixer};
use crate::formatting::FormatContext;
use crate::noteselector::{SelectorContext, directory_selector, note_selector};
use crate::project::{Project, locate_root, require_root, sort_by_mtime_desc};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Parser)]
#[command(
    name = "loli",
    version,
    about = "Plain-text note manager for a tree of Markdown files",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse notes, most recently changed first
    List {
        /// Browse directories instead of notes
        #[arg(short, long)]
        dir: bool,
    },
    /// Point out and help to fix project defects
    Fix {
        /// Print information verbosely
        #[arg(short)]
        verbose: bool,
        /// Try to resolve all problems interactively
        #[arg(short)]
        resolve: bool,
        /// Resolve problems without asking
        #[arg(short = 'y')]
        always_yes: bool,
    },
    /// Print merged settings, or edit a settings file
    Config {
        /// Editor to use instead of selector.editor
        editor: Option<String>,
        /// Open the user's settings file
        #[arg(short = 'u', long = "user-settings", conflicts_with = "project_settings")]
        user_settings: bool,
        /// Open the project's settings file
        #[arg(short = 'p', long = "project-settings")]
        project_settings: bool,
    },
    /// Show the current project's info
    Show,
    /// Show the note rules or the settings guide
    Help {
        /// Show the lolinote ruleset
        #[arg(long)]
        rules: bool,
        /// Show how to configure lolikit and the current values
        #[arg(long)]
        config: bool,
    },
}

pub fn entry() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;
    let user_config = LoliConfig::load(None)?;
    let root = locate_root(&cwd, &user_config);
    info!("command {:?} in {:?}", cli.command, root);

    match cli.command {
        Commands::List { dir } => {
            let root = require_root(&cwd, &user_config)?;
            list(&root, dir)
        }
        Commands::Fix { verbose, resolve, always_yes } => {
            let root = require_root(&cwd, &user_config)?;
            let config = LoliConfig::load(Some(&root))?;
            let project = Project::from_config(&root, &config)?;
            let options = FixOptions {
                verbose,
                resolve,
                always_yes,
            };
            let stdout = io::stdout();
            Fixer::new(&project, &config.fix, options).run(&mut stdout.lock())
        }
        Commands::Config { editor, user_settings, project_settings } => {
            let config = LoliConfig::load(root.as_deref())?;
            let editor = editor.unwrap_or_else(|| config.selector.editor.clone());
            if user_settings {
                let path = user_rc_path()
                    .ok_or_else(|| LoliError::from("could not determine home directory"))?;
                edit_settings(&path, &editor)
            } else if project_settings {
                let root = root.ok_or(LoliError::NoProject)?;
                fs::create_dir_all(root.join(PROJECT_DIR_NAME))?;
                edit_settings(&project_rc_path(&root), &editor)
            } else {
                println!("{}", config.to_toml()?);
                Ok(())
            }
        }
        Commands::Show => {
            let root = root.ok_or(LoliError::NoProject)?;
            println!(" - Current Project Folder:  \"{}\"", root.display());
            Ok(())
        }
        Commands::Help { rules, config } => {
            if rules {
                println!("{}", help::RULES);
            }
            if config {
                let current = LoliConfig::load(root.as_deref())?;
                println!("{}", help::config_guide(&current)?);
            }
            if !rules && !config {
                let mut cmd = Cli::command();
                if let Some(sub) = cmd.find_subcommand_mut("help") {
                    sub.print_help()?;
                }
                return Err(LoliError::from("help: pass --rules or --config"));
            }
            Ok(())
        }
    }
}

fn list(root: &Path, dirs: bool) -> Result<()> {
    let config = LoliConfig::load(Some(root))?;
    let project = Project::from_config(root, &config)?;
    let ctx = SelectorContext::new(project.root(), config);
    if dirs {
        let mut paths = project.dir_paths();
        sort_by_mtime_desc(&mut paths);
        directory_selector(paths, ctx).run()
    } else {
        let mut paths = project.md_paths();
        sort_by_mtime_desc(&mut paths);
        note_selector(paths, ctx).run()
    }
}

/// Open a settings file, seeding it with commented defaults first.
fn edit_settings(path: &Path, editor: &str) -> Result<()> {
    if !path.exists() {
        let mut file = fs::File::create(path)?;
        file.write_all(LoliConfig::commented_defaults()?.as_bytes())?;
        let fmt = FormatContext::from_env();
        println!("Created {}", fmt.format_path(&path.display().to_string()));
    }
    opener::open_with(editor, path)
}
