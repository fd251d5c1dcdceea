//! Command table and line parsing for the item selector.

use super::pager::Pager;
use crate::error::Result;
use regex::Regex;
use std::io::Write;
use std::sync::LazyLock;

/// Page number used by `last`; clamping brings it down to the final page.
pub const LAST_PAGE: i64 = 99_999_999;

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(.*)").expect("static regex"));

/// Whether the selector session should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

impl From<bool> for Flow {
    fn from(stop: bool) -> Self {
        if stop { Flow::Stop } else { Flow::Continue }
    }
}

pub type Handler =
    Box<dyn Fn(&mut Pager, &str, &mut dyn Write) -> Result<Flow>>;

/// A named selector command. `redraw` controls whether the current page is
/// printed again after the handler returns `Flow::Continue`.
pub struct CommandSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub redraw: bool,
    pub(crate) handler: Handler,
}

impl CommandSpec {
    pub fn new(
        name: &'static str,
        summary: &'static str,
        handler: impl Fn(&mut Pager, &str, &mut dyn Write) -> Result<Flow>
        + 'static,
    ) -> Self {
        Self {
            name,
            summary,
            redraw: true,
            handler: Box::new(handler),
        }
    }

    /// Mark the command as printing its own output (no page redraw).
    pub fn quiet(mut self) -> Self {
        self.redraw = false;
        self
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("redraw", &self.redraw)
            .finish()
    }
}

/// Split a trimmed line into its command word and the rest.
pub fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    }
}

/// Match `^(\d+)(.*)`: a leading in-page ordinal and the trailing fragment.
/// Ordinals too large for `usize` saturate so they land out of range.
pub fn split_ordinal(line: &str) -> Option<(usize, &str)> {
    let caps = ORDINAL_RE.captures(line)?;
    let digits = caps.get(1)?.as_str();
    let after = caps.get(2).map_or("", |m| m.as_str());
    Some((digits.parse().unwrap_or(usize::MAX), after))
}

/// Page step for `next`/`prev`: at least 1, and 1 when unparsable.
pub fn parse_step(arg: &str) -> i64 {
    arg.trim().parse::<i64>().map(|n| n.max(1)).unwrap_or(1)
}

/// Positive number for `goto`/`size`; `None` means "ignore the command".
pub fn parse_positive(arg: &str) -> Option<i64> {
    arg.trim().parse::<i64>().ok().map(|n| n.max(1))
}

/// The navigation commands every selector starts with.
pub fn builtins() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("exit", "Leave the selector\n    example: exit", |_, _, _| {
            Ok(Flow::Stop)
        }),
        CommandSpec::new(
            "next",
            "Go to next page(s)\n    example: next [page_count]",
            |pager, arg, _| {
                pager.advance(parse_step(arg));
                Ok(Flow::Continue)
            },
        ),
        CommandSpec::new(
            "prev",
            "Go to previous page(s)\n    example: prev [page_count]",
            |pager, arg, _| {
                pager.advance(-parse_step(arg));
                Ok(Flow::Continue)
            },
        ),
        CommandSpec::new("first", "Go to first page\n    example: first", |pager, _, _| {
            pager.set_page(1);
            Ok(Flow::Continue)
        }),
        CommandSpec::new("last", "Go to last page\n    example: last", |pager, _, _| {
            pager.set_page(LAST_PAGE);
            Ok(Flow::Continue)
        }),
        CommandSpec::new(
            "goto",
            "Go to a special page\n    example: goto <page_number>",
            |pager, arg, _| {
                if let Some(page) = parse_positive(arg) {
                    pager.set_page(page);
                }
                Ok(Flow::Continue)
            },
        ),
        CommandSpec::new(
            "size",
            "Set the page size, keeping the first item of the page in view\n    \
             example: size <item_count>",
            |pager, arg, _| {
                if let Some(size) = parse_positive(arg) {
                    pager.set_page_size(usize::try_from(size).unwrap_or(usize::MAX));
                }
                Ok(Flow::Continue)
            },
        ),
        CommandSpec::new(
            "reverse",
            "Toggle reverse display mode\n    example: reverse",
            |pager, _, _| {
                pager.toggle_reverse();
                Ok(Flow::Continue)
            },
        ),
        CommandSpec::new("show", "Show current page\n    example: show", |_, _, _| {
            Ok(Flow::Continue)
        }),
    ]
}
