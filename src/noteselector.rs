//! Note, attachment and directory selectors built on [`Selector`].

use crate::config::LoliConfig;
use crate::error::{LoliError, Result};
use crate::formatting::FormatContext;
use crate::note::NoteInfo;
use crate::opener::{open_default, open_with};
use crate::project::{is_resourced, resource_paths};
use crate::selector::{CommandSpec, Flow, Item, Selector, Session};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const NOTE_PROMPT: &str = "note> ";
pub const ATTACHMENT_PROMPT: &str = "attachment> ";
pub const DIRECTORY_PROMPT: &str = "directory> ";

const NOTE_USAGE: &str = "
How to use
=================================================
## Open a note ##
    <number>
    <number> @
        - open file with default editor
    <number> @ <editor>
        - open file with special editor

## Open a note directory ##
    <number> /
        - open folder with default filebrowser
    <number> / <file_browser>
        - open folder with special filebrowser

## Open attachment selector ##
    <number> .
        - view attachments of one of note

## Example ##
    5
    5@gedit
    5/
    5/nautilus
";

const ATTACHMENT_USAGE: &str = "How to use
=================================================
## Open a attach ##
    <number>
    <number> @
        - open file with system default program
    <number> @ <opener>
        - open file with special program

## Example ##
    5
    5@firefox
";

const DIRECTORY_USAGE: &str = "
How to use
==================================================
## Open a Directory ##
    <number>               => e.g., 9
    <number> /             => e.g., 9/
        - open folder with default filebrowser
    <number> @ <opener>    => e.g., 9@firefox
        - open folder with special filebrowser
";

/// What to do with a selected note, decoded from the text after its number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteTask {
    Open(Option<String>),
    FileBrowse(Option<String>),
    Attachments,
}

/// `@x` opens with `x`, `/x` browses the folder with `x`, `.` lists
/// attachments; anything else opens with the default editor.
pub fn parse_note_task(after: &str) -> NoteTask {
    let after = after.trim();
    let mut chars = after.chars();
    let opener = |rest: &str| Some(rest.trim().to_string()).filter(|s| !s.is_empty());
    match chars.next() {
        Some('@') => NoteTask::Open(opener(chars.as_str())),
        Some('/') => NoteTask::FileBrowse(opener(chars.as_str())),
        Some('.') => NoteTask::Attachments,
        _ => NoteTask::Open(None),
    }
}

/// Opener named after a leading marker (`@` or `/`), if any.
pub fn parse_opener(after: &str, markers: &[char]) -> Option<String> {
    let rest = after.trim().strip_prefix(markers)?;
    Some(rest.trim().to_string()).filter(|s| !s.is_empty())
}

/// Settings and project root shared by every item of a session.
pub struct SelectorContext {
    pub root: PathBuf,
    pub config: LoliConfig,
    pub fmt: FormatContext,
}

impl SelectorContext {
    pub fn new(root: impl Into<PathBuf>, config: LoliConfig) -> Rc<Self> {
        Rc::new(Self {
            root: root.into(),
            config,
            fmt: FormatContext::from_env(),
        })
    }

    fn intro(&self, title: &str) -> String {
        self.fmt.banner(title)
    }

    fn cancel(&self, out: &mut dyn Write, message: &str) -> Result<()> {
        writeln!(out, "{}", self.fmt.format_alert(&format!("[cancel]: {message}")))?;
        Ok(())
    }

    /// Report an opener the user can fix at the prompt. Other errors pass
    /// through.
    fn cancel_opener(
        &self,
        out: &mut dyn Write,
        kind: &str,
        opener: &str,
        err: LoliError,
    ) -> Result<()> {
        match err {
            LoliError::OpenerNotFound(_) => {
                self.cancel(out, &format!("{kind} \"{opener}\" not found."))
            }
            LoliError::InvalidOpener(_) => {
                self.cancel(out, &format!("{kind} \"{opener}\" invalid."))
            }
            err => Err(err),
        }
    }
}

/// Run `opener` on `path`; `true` once the program ran, `false` after a
/// `[cancel]` message.
fn launch(
    ctx: &SelectorContext,
    out: &mut dyn Write,
    kind: &str,
    opener: &str,
    path: &Path,
) -> Result<bool> {
    match open_with(opener, path) {
        Ok(()) => Ok(true),
        Err(err) => {
            ctx.cancel_opener(out, kind, opener, err)?;
            Ok(false)
        }
    }
}

pub fn note_item(path: PathBuf, ctx: Rc<SelectorContext>) -> Item<NoteTask> {
    let info = Rc::new(NoteInfo::new(path, ctx.root.clone()));
    let text_info = Rc::clone(&info);
    let text_ctx = Rc::clone(&ctx);
    Item::computed(
        move || text_info.render(&text_ctx.config.selector.list_format),
        move |task: NoteTask, session| match task {
            NoteTask::Open(opener) => {
                let opener = opener.unwrap_or_else(|| ctx.config.selector.editor.clone());
                launch(&ctx, session, "editor", &opener, &info.absolute_path())
            }
            NoteTask::FileBrowse(opener) => {
                let opener =
                    opener.unwrap_or_else(|| ctx.config.selector.file_browser.clone());
                let dir = info.absolute_parent_dirpath();
                launch(&ctx, session, "file_browser", &opener, &dir)
            }
            NoteTask::Attachments => {
                if is_resourced(info.path()) {
                    attachment_selector(&info, &ctx).run_in(session)?;
                } else {
                    let message = format!("\"{}\" not a resourced note.", info.title());
                    ctx.cancel(session, &message)?;
                }
                Ok(false)
            }
        },
    )
}

pub fn note_selector(paths: Vec<PathBuf>, ctx: Rc<SelectorContext>) -> Selector<NoteTask> {
    let items = paths
        .into_iter()
        .map(|path| note_item(path, Rc::clone(&ctx)))
        .collect();
    let root = ctx.root.clone();
    Selector::with_mapper(items, parse_note_task)
        .usage(NOTE_USAGE)
        .prompt(NOTE_PROMPT)
        .intro(ctx.intro("Select a Item (press \"help\" for usage)"))
        .page_size(ctx.config.selector.page_size)
        .reverse(ctx.config.selector.reverse)
        .with_command(
            CommandSpec::new(
                "root",
                "Print the project root folder\n    example: root",
                move |_, _, out| {
                    writeln!(out, "{}", root.display())?;
                    Ok(Flow::Continue)
                },
            )
            .quiet(),
        )
}

pub fn attachment_item(path: PathBuf, ctx: Rc<SelectorContext>) -> Item<Option<String>> {
    let text = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Item::new(text, move |opener: Option<String>, session| {
        let result = match &opener {
            Some(opener) => open_with(opener, &path),
            None => open_default(&path),
        };
        if let Err(err) = result {
            let name = match (&opener, &err) {
                (Some(opener), _) => opener.clone(),
                (None, LoliError::OpenerNotFound(name)) => name.clone(),
                (None, _) => String::new(),
            };
            ctx.cancel_opener(session, "opener", &name, err)?;
        }
        Ok(false)
    })
}

pub fn attachment_selector(
    note: &NoteInfo,
    ctx: &Rc<SelectorContext>,
) -> Selector<Option<String>> {
    let items = resource_paths(note.path())
        .into_iter()
        .map(|path| attachment_item(path, Rc::clone(ctx)))
        .collect();
    Selector::with_mapper(items, |after| parse_opener(after, &['@']))
        .usage(ATTACHMENT_USAGE)
        .prompt(ATTACHMENT_PROMPT)
        .intro(ctx.intro("Select a Item (press \"help\" for usage)"))
        .page_size(ctx.config.selector.page_size)
        .reverse(ctx.config.selector.reverse)
}

pub fn directory_item(path: PathBuf, ctx: Rc<SelectorContext>) -> Item<Option<String>> {
    let info = Rc::new(NoteInfo::new(path, ctx.root.clone()));
    let text_info = Rc::clone(&info);
    let text_ctx = Rc::clone(&ctx);
    Item::computed(
        move || text_info.render(&text_ctx.config.selector.list_dir_format),
        move |opener: Option<String>, session| {
            let opener =
                opener.unwrap_or_else(|| ctx.config.selector.file_browser.clone());
            launch(&ctx, session, "opener", &opener, &info.absolute_path())
        },
    )
}

pub fn directory_selector(
    paths: Vec<PathBuf>,
    ctx: Rc<SelectorContext>,
) -> Selector<Option<String>> {
    let items = paths
        .into_iter()
        .map(|path| directory_item(path, Rc::clone(&ctx)))
        .collect();
    Selector::with_mapper(items, |after| parse_opener(after, &['/', '@']))
        .usage(DIRECTORY_USAGE)
        .prompt(DIRECTORY_PROMPT)
        .intro(ctx.intro("Select a Directory (press \"help\" for usage)"))
        .page_size(ctx.config.selector.page_size)
        .reverse(ctx.config.selector.reverse)
}
